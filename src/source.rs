//! The scene-graph collaborator seam.
//!
//! Scene file parsing and SDK session lifetime live outside this crate. A
//! loaded scene reaches the extractors through the [`SceneSource`] trait,
//! which exposes exactly what extraction needs: hierarchy walking, transform
//! evaluation at arbitrary times, scene metadata, named clips and animatable
//! properties.
//!
//! [`SceneSession`] pairs a source with the [`SceneConverter`] derived from
//! its metadata. The session owns both; extraction calls borrow it and must
//! not outlive it. Everything is synchronous and single-threaded — a stuck
//! evaluation call blocks the whole extraction, by design.

use core::fmt;

use glam::Mat4;
use log::debug;

use crate::convert::{AxisSystem, SceneConverter, UnitScale};
use crate::errors::Result;

/// Opaque handle to a node of the source scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// Opaque handle to an animatable property of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyId(pub u32);

/// A clip or scene time span, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSpan {
    pub start: f32,
    pub end: f32,
}

/// Declared type tag of a source property.
///
/// Only a subset can feed property tracks (see [`crate::track::TrackValue`]);
/// the rest exist so a mismatch can be reported with the offending type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    Undefined,
    Bool,
    Int,
    Float,
    Double,
    Double2,
    Double3,
    Double4,
    Matrix,
    Enum,
    String,
    Time,
    Blob,
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Undefined => "Undefined - unidentified",
            Self::Bool => "Bool - boolean",
            Self::Int => "Int - 32 bit signed integer",
            Self::Float => "Float - floating point value",
            Self::Double => "Double - double width floating point value",
            Self::Double2 => "Double2 - vector of two double values",
            Self::Double3 => "Double3 - vector of three double values",
            Self::Double4 => "Double4 - vector of four double values",
            Self::Matrix => "Matrix - four vectors of four double values",
            Self::Enum => "Enum - enumeration",
            Self::String => "String - string",
            Self::Time => "Time - time value",
            Self::Blob => "Blob - binary data block",
        };
        f.write_str(name)
    }
}

/// Value of a property evaluated at one instant.
///
/// Only the sampleable shapes appear here: properties of any other declared
/// type are rejected before evaluation is ever attempted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Double(f64),
    Double2([f64; 2]),
    Double3([f64; 3]),
}

/// A loaded scene, as seen by the extractors.
///
/// Implemented by the caller over their scene SDK or importer. Transform and
/// property evaluation take a time argument in seconds and are expected to
/// be continuous — the samplers decide where to evaluate.
pub trait SceneSource {
    // ===== Hierarchy =====

    /// The root node of the scene graph.
    fn root_node(&self) -> NodeId;

    /// Children of `node`, in scene order.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    fn node_name(&self, node: NodeId) -> &str;

    /// Whether the node carries a joint-kind attribute.
    fn is_joint(&self, node: NodeId) -> bool;

    /// Finds a node by name anywhere in the scene.
    fn find_node(&self, name: &str) -> Option<NodeId>;

    // ===== Transform evaluation =====

    /// Local (parent-relative) transform of `node` at `time` seconds.
    fn local_transform(&self, node: NodeId, time: f32) -> Mat4;

    /// Global (scene-space) transform of `node` at `time` seconds.
    fn global_transform(&self, node: NodeId, time: f32) -> Mat4;

    // ===== Scene metadata =====

    fn axis_system(&self) -> AxisSystem;

    fn unit_scale(&self) -> UnitScale;

    /// The scene's default timeline span, used by clips without their own.
    fn default_time_span(&self) -> TimeSpan;

    /// The scene frame rate, in Hz.
    fn frame_rate(&self) -> f32;

    // ===== Clips =====

    /// Names of the animation clips the scene contains.
    fn clip_names(&self) -> Vec<String>;

    /// The clip's explicit time span, if it declares one.
    fn clip_time_span(&self, clip: &str) -> Option<TimeSpan>;

    fn has_clip(&self, clip: &str) -> bool {
        self.clip_names().iter().any(|name| name == clip)
    }

    // ===== Properties =====

    /// Finds an animatable property of `node` by name.
    fn find_property(&self, node: NodeId, name: &str) -> Option<PropertyId>;

    fn property_type(&self, property: PropertyId) -> PropertyType;

    /// Whether the property value varies over time (as opposed to holding a
    /// single constant value).
    fn is_property_animated(&self, property: PropertyId) -> bool;

    /// Evaluates the property at `time` seconds.
    fn evaluate_property(&self, property: PropertyId, time: f32) -> PropertyValue;
}

/// A scene source together with the conversion operator derived from its
/// metadata.
///
/// Building the session is the moment malformed axis/unit metadata surfaces;
/// after that the converter is immutable and shared read-only by every
/// extraction call. Whether the underlying source tolerates concurrent reads
/// is not guaranteed here — callers wanting parallel extraction must confirm
/// that themselves or serialize.
pub struct SceneSession<S: SceneSource> {
    source: S,
    converter: SceneConverter,
}

impl<S: SceneSource> SceneSession<S> {
    pub fn new(source: S) -> Result<Self> {
        let axis = source.axis_system();
        let unit = source.unit_scale();
        let converter = SceneConverter::new(axis, unit)?;
        debug!(
            "scene session ready: up axis {}, {} cm/unit",
            axis.up, unit.centimeters_per_unit
        );
        Ok(Self { source, converter })
    }

    #[inline]
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    #[inline]
    #[must_use]
    pub fn converter(&self) -> &SceneConverter {
        &self.converter
    }
}
