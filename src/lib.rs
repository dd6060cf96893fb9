//! ossein — offline extraction of coordinate-normalized skeletons and raw,
//! fixed-rate animation tracks from loaded 3D scenes.
//!
//! The scene itself is reached through the [`SceneSource`] trait, implemented
//! by the caller over their importer or SDK session. A [`SceneSession`]
//! derives the coordinate/unit [`SceneConverter`] from the scene metadata;
//! [`extract_skeleton`] discovers the joint hierarchy, [`extract_animation`]
//! resamples a clip's joint transforms at a fixed period, and the
//! `extract_*_track` functions resample individual scalar/vector properties.
//!
//! Output types are raw: dense key sequences meant to be fed to later
//! optimization or runtime-building stages, not played back directly.

pub mod animation;
pub mod convert;
pub mod errors;
pub mod sampling;
pub mod skeleton;
pub mod source;
pub mod track;

pub use animation::{
    JointTrack, RawAnimationClip, RotationKey, ScaleKey, TranslationKey, clip_names,
    extract_animation,
};
pub use convert::{AxisSystem, FrontParity, Handedness, SceneConverter, Transform, UnitScale};
pub use errors::{ExtractError, Result};
pub use sampling::SamplingWindow;
pub use skeleton::{RawSkeleton, SkeletonJoint, extract_skeleton};
pub use source::{
    NodeId, PropertyId, PropertyType, PropertyValue, SceneSession, SceneSource, TimeSpan,
};
pub use track::{
    Interpolation, Keyframe, RawFloat2Track, RawFloat3Track, RawFloatTrack, RawPropertyTrack,
    TrackValue, extract_float2_track, extract_float3_track, extract_float_track,
};
