//! Joint-transform resampling.
//!
//! Takes a previously extracted [`RawSkeleton`] and resamples a named clip
//! into dense, fixed-period keys: one [`JointTrack`] per joint, in skeleton
//! traversal order. Every track is complete and playable — joints without a
//! matching scene node fall back to a single bind-pose key.

use glam::{Quat, Vec3};
use log::{debug, error};

use crate::errors::{ExtractError, Result};
use crate::sampling::SamplingWindow;
use crate::skeleton::RawSkeleton;
use crate::source::{SceneSession, SceneSource};

/// Translation key on clip-relative seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TranslationKey {
    pub time: f32,
    pub value: Vec3,
}

/// Rotation key on clip-relative seconds. The value is a unit quaternion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationKey {
    pub time: f32,
    pub value: Quat,
}

/// Scale key on clip-relative seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleKey {
    pub time: f32,
    pub value: Vec3,
}

/// Sampled transform curves for one joint. Joint keys interpolate linearly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JointTrack {
    pub translations: Vec<TranslationKey>,
    pub rotations: Vec<RotationKey>,
    pub scales: Vec<ScaleKey>,
}

/// A fixed-rate resampled animation for a whole skeleton.
///
/// `tracks` pairs with the skeleton's traversal order:
/// `tracks.len() == skeleton.num_joints()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawAnimationClip {
    pub name: String,
    /// May differ from the sampled span under the pose-only fallback.
    pub duration: f32,
    pub tracks: Vec<JointTrack>,
}

impl RawAnimationClip {
    /// True when the clip is playable: finite positive duration and, per
    /// component track, key times sorted within `[0, duration]`.
    #[must_use]
    pub fn validate(&self) -> bool {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return false;
        }
        self.tracks.iter().all(|track| {
            sorted_in_range(track.translations.iter().map(|k| k.time), self.duration)
                && sorted_in_range(track.rotations.iter().map(|k| k.time), self.duration)
                && sorted_in_range(track.scales.iter().map(|k| k.time), self.duration)
        })
    }
}

fn sorted_in_range(times: impl Iterator<Item = f32>, duration: f32) -> bool {
    let mut previous = 0.0_f32;
    for t in times {
        if t < previous || t > duration {
            return false;
        }
        previous = t;
    }
    true
}

/// Names of the animation clips the source scene contains.
#[must_use]
pub fn clip_names<S: SceneSource>(session: &SceneSession<S>) -> Vec<String> {
    session.source().clip_names()
}

/// Resamples the named clip over `skeleton` at a fixed period.
///
/// `sampling_rate` is in Hz; zero or negative means "use the scene frame
/// rate". Root joints sample the node's global transform, parented joints
/// the local one. Key times are clip-relative (first key at 0). A joint with
/// no matching scene node gets exactly one key per component, holding its
/// bind pose. Any transform conversion failure aborts the whole clip, and
/// the assembled clip must pass [`RawAnimationClip::validate`] before it is
/// returned.
pub fn extract_animation<S: SceneSource>(
    name: &str,
    session: &SceneSession<S>,
    skeleton: &RawSkeleton,
    sampling_rate: f32,
) -> Result<RawAnimationClip> {
    let source = session.source();
    let window = SamplingWindow::resolve(source, name, sampling_rate)?;

    debug!("extracting animation \"{name}\"");

    let mut clip = RawAnimationClip {
        name: name.to_string(),
        duration: window.duration,
        tracks: Vec::with_capacity(skeleton.num_joints()),
    };

    for joint in skeleton.iter() {
        let joint_name = joint.joint.name.as_str();
        let mut track = JointTrack::default();

        let Some(node) = source.find_node(joint_name) else {
            // No source node: hold the bind pose so the track stays playable.
            debug!("no animation track found for joint \"{joint_name}\", using bind pose");
            let bind = joint.joint.transform;
            track.translations.push(TranslationKey {
                time: 0.0,
                value: bind.translation,
            });
            track.rotations.push(RotationKey {
                time: 0.0,
                value: bind.rotation,
            });
            track.scales.push(ScaleKey {
                time: 0.0,
                value: bind.scale,
            });
            clip.tracks.push(track);
            continue;
        };

        let max_keys = window.max_keys();
        track.translations.reserve(max_keys);
        track.rotations.reserve(max_keys);
        track.scales.reserve(max_keys);

        for t in window.frames() {
            let matrix = if joint.has_parent {
                source.local_transform(node, t)
            } else {
                source.global_transform(node, t)
            };

            let Some(transform) = session.converter().convert_transform(matrix) else {
                error!(
                    "failed to extract animation transform for joint \"{joint_name}\" at t = {t}s"
                );
                return Err(ExtractError::TransformDecomposition {
                    name: joint_name.to_string(),
                    time: t,
                });
            };

            let local_time = t - window.start;
            track.translations.push(TranslationKey {
                time: local_time,
                value: transform.translation,
            });
            track.rotations.push(RotationKey {
                time: local_time,
                value: transform.rotation,
            });
            track.scales.push(ScaleKey {
                time: local_time,
                value: transform.scale,
            });
        }
        clip.tracks.push(track);
    }

    if !clip.validate() {
        error!("extracted animation \"{name}\" failed validation");
        return Err(ExtractError::InvalidOutput(name.to_string()));
    }
    Ok(clip)
}
