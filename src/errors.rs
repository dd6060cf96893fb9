//! Error Types
//!
//! Every public extraction API returns [`Result<T>`], an alias for
//! `std::result::Result<T, ExtractError>`. Extraction is all-or-nothing per
//! call: an `Err` means no partial output was produced, and previously
//! extracted results are unaffected.

use thiserror::Error;

use crate::source::PropertyType;

/// The error type for scene extraction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractError {
    // ========================================================================
    // Contract violations (malformed collaborator metadata)
    // ========================================================================
    /// The axis-system descriptor names an unrecognized up axis.
    ///
    /// Not recoverable: no conversion operator can be derived, so the scene
    /// session refuses to build.
    #[error("invalid axis system descriptor: up axis {0} (expected ±1, ±2 or ±3)")]
    InvalidAxisSystem(i32),

    /// The unit-scale factor is non-finite or not positive.
    #[error("invalid unit scale: {0} centimeters per unit")]
    InvalidUnitScale(f32),

    // ========================================================================
    // Conversion failures
    // ========================================================================
    /// A sampled matrix could not be decomposed into translation, rotation
    /// and scale. Aborts the current skeleton, clip or track.
    #[error("failed to decompose transform for \"{name}\" at t = {time}s")]
    TransformDecomposition {
        /// Joint or node the matrix was sampled from.
        name: String,
        /// Sample time, in seconds.
        time: f32,
    },

    // ========================================================================
    // Lookup failures
    // ========================================================================
    /// No node of the scene was accepted as a skeleton joint.
    #[error("no skeleton found in scene")]
    NoSkeleton,

    /// The named animation clip does not exist in the scene.
    #[error("animation clip \"{0}\" not found")]
    ClipNotFound(String),

    /// The named node does not exist in the scene.
    #[error("node \"{0}\" not found")]
    NodeNotFound(String),

    /// The named property does not exist on the resolved node.
    #[error("property \"{property}\" not found on node \"{node}\"")]
    PropertyNotFound {
        /// Node the property was looked up on.
        node: String,
        /// The missing property name.
        property: String,
    },

    // ========================================================================
    // Type mismatches
    // ========================================================================
    /// The property's declared type cannot feed the requested track shape.
    /// Checked before any time evaluation is attempted.
    #[error("property track cannot be sampled from a property of type {0}")]
    UnsupportedPropertyType(PropertyType),

    /// The collaborator evaluated the property to a value shape inconsistent
    /// with its declared type.
    #[error("property value shape does not match the declared type {0}")]
    MismatchedPropertyValue(PropertyType),

    // ========================================================================
    // Output validation
    // ========================================================================
    /// The assembled clip or track failed its final consistency check:
    /// unsorted keys, or keys outside the valid range. Typically caused by a
    /// malformed source time span.
    #[error("extraction of \"{0}\" produced inconsistent keys")]
    InvalidOutput(String),
}

/// Alias for `Result<T, ExtractError>`.
pub type Result<T> = std::result::Result<T, ExtractError>;
