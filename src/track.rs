//! Property-curve resampling.
//!
//! Resamples a single animated property of a named node into a
//! [`RawPropertyTrack`] of one fixed value shape: scalar ([`RawFloatTrack`]),
//! 2-vector ([`RawFloat2Track`]) or 3-vector ([`RawFloat3Track`]). Unlike
//! joint tracks, property keys are stored on a duration-normalized ratio in
//! `[0, 1]`, which makes them reusable across clips of different lengths.

use glam::{Vec2, Vec3};
use log::{debug, error};

use crate::errors::{ExtractError, Result};
use crate::sampling::SamplingWindow;
use crate::source::{PropertyType, PropertyValue, SceneSession, SceneSource};

/// How a keyframe reaches the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    /// Hold the value until the next key.
    Step,
    Linear,
}

/// Property keyframe, keyed on a duration-normalized ratio in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe<T> {
    pub interpolation: Interpolation,
    pub ratio: f32,
    pub value: T,
}

/// Resampled curve of one property. Extraction validates the track before
/// returning it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPropertyTrack<T> {
    pub keyframes: Vec<Keyframe<T>>,
}

impl<T> Default for RawPropertyTrack<T> {
    fn default() -> Self {
        Self {
            keyframes: Vec::new(),
        }
    }
}

impl<T> RawPropertyTrack<T> {
    /// True when key ratios are sorted and inside `[0, 1]`.
    #[must_use]
    pub fn validate(&self) -> bool {
        let mut previous = 0.0_f32;
        for key in &self.keyframes {
            if key.ratio < previous || key.ratio > 1.0 {
                return false;
            }
            previous = key.ratio;
        }
        true
    }
}

pub type RawFloatTrack = RawPropertyTrack<f32>;
pub type RawFloat2Track = RawPropertyTrack<Vec2>;
pub type RawFloat3Track = RawPropertyTrack<Vec3>;

/// A value shape a property track can hold, and the declared source types it
/// accepts.
pub trait TrackValue: Copy + Sized {
    /// Whether `ty` can feed this shape. Decided before any time evaluation.
    fn accepts(ty: PropertyType) -> bool;

    /// Converts one evaluated value. `None` means the collaborator returned
    /// a shape inconsistent with the property's declared type.
    fn from_value(value: PropertyValue) -> Option<Self>;
}

impl TrackValue for f32 {
    fn accepts(ty: PropertyType) -> bool {
        matches!(
            ty,
            PropertyType::Bool | PropertyType::Int | PropertyType::Float | PropertyType::Double
        )
    }

    fn from_value(value: PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Bool(v) => Some(if v { 1.0 } else { 0.0 }),
            PropertyValue::Int(v) => Some(v as f32),
            PropertyValue::Float(v) => Some(v),
            PropertyValue::Double(v) => Some(v as f32),
            _ => None,
        }
    }
}

impl TrackValue for Vec2 {
    fn accepts(ty: PropertyType) -> bool {
        ty == PropertyType::Double2
    }

    fn from_value(value: PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Double2([x, y]) => Some(Vec2::new(x as f32, y as f32)),
            _ => None,
        }
    }
}

impl TrackValue for Vec3 {
    fn accepts(ty: PropertyType) -> bool {
        ty == PropertyType::Double3
    }

    fn from_value(value: PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Double3([x, y, z]) => {
                Some(Vec3::new(x as f32, y as f32, z as f32))
            }
            _ => None,
        }
    }
}

/// Resamples a scalar property. Booleans map to 0/1, integer and double
/// values are cast.
pub fn extract_float_track<S: SceneSource>(
    clip: &str,
    node: &str,
    property: &str,
    session: &SceneSession<S>,
    sampling_rate: f32,
) -> Result<RawFloatTrack> {
    extract_track_impl(clip, node, property, session, sampling_rate)
}

/// Resamples a 2-vector (double2) property.
pub fn extract_float2_track<S: SceneSource>(
    clip: &str,
    node: &str,
    property: &str,
    session: &SceneSession<S>,
    sampling_rate: f32,
) -> Result<RawFloat2Track> {
    extract_track_impl(clip, node, property, session, sampling_rate)
}

/// Resamples a 3-vector (double3) property.
pub fn extract_float3_track<S: SceneSource>(
    clip: &str,
    node: &str,
    property: &str,
    session: &SceneSession<S>,
    sampling_rate: f32,
) -> Result<RawFloat3Track> {
    extract_track_impl(clip, node, property, session, sampling_rate)
}

fn extract_track_impl<S: SceneSource, T: TrackValue>(
    clip: &str,
    node_name: &str,
    property_name: &str,
    session: &SceneSession<S>,
    sampling_rate: f32,
) -> Result<RawPropertyTrack<T>> {
    let source = session.source();

    // Name resolution comes first: clip, then node, then property.
    if !source.has_clip(clip) {
        return Err(ExtractError::ClipNotFound(clip.to_string()));
    }

    debug!("extracting property track \"{node_name}:{property_name}\"");

    let node = source
        .find_node(node_name)
        .ok_or_else(|| ExtractError::NodeNotFound(node_name.to_string()))?;

    let property = source.find_property(node, property_name).ok_or_else(|| {
        ExtractError::PropertyNotFound {
            node: node_name.to_string(),
            property: property_name.to_string(),
        }
    })?;

    // Shape check before any time evaluation.
    let ty = source.property_type(property);
    if !T::accepts(ty) {
        error!("property track cannot be sampled from a property of type {ty}");
        return Err(ExtractError::UnsupportedPropertyType(ty));
    }

    let window = SamplingWindow::resolve(source, clip, sampling_rate)?;

    let mut track = RawPropertyTrack::default();
    if source.is_property_animated(property) {
        track.keyframes.reserve(window.max_keys());
        for t in window.frames() {
            let value = T::from_value(source.evaluate_property(property, t))
                .ok_or(ExtractError::MismatchedPropertyValue(ty))?;
            track.keyframes.push(Keyframe {
                interpolation: Interpolation::Linear,
                ratio: (t - window.start) / window.duration,
                value,
            });
        }
    } else {
        // Constant: a single step key at ratio 0 holds the value forever.
        let value = T::from_value(source.evaluate_property(property, window.start))
            .ok_or(ExtractError::MismatchedPropertyValue(ty))?;
        track.keyframes.push(Keyframe {
            interpolation: Interpolation::Step,
            ratio: 0.0,
            value,
        });
    }

    if !track.validate() {
        error!("property track \"{node_name}:{property_name}\" failed validation");
        return Err(ExtractError::InvalidOutput(format!(
            "{node_name}:{property_name}"
        )));
    }
    Ok(track)
}
