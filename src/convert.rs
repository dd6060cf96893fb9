//! Axis-system and unit conversion.
//!
//! Source scenes arrive in arbitrary coordinate conventions (which axis is
//! up, handedness, unit of length). [`SceneConverter`] derives a single
//! conversion operator from that metadata and applies it consistently to
//! matrices, points, normals and decomposed transforms, normalizing
//! everything to the engine convention: Y-up, right-handed, meters.

use glam::{Mat3, Mat4, Quat, Vec3, Vec4};

use crate::errors::{ExtractError, Result};

/// Source coordinate convention, as reported by the scene metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisSystem {
    /// Signed up-axis index: ±1 = X, ±2 = Y, ±3 = Z. The sign gives the
    /// direction (negative means the axis points down relative to the
    /// observer). Kept raw on purpose: any other value is malformed
    /// collaborator metadata and rejected by [`SceneConverter::new`].
    pub up: i32,
    /// Selects the front axis among the two axes the up choice leaves free.
    pub front: FrontParity,
    pub handedness: Handedness,
}

/// Front-axis parity relative to the up axis.
///
/// `Even` picks the first remaining axis, `Odd` the second:
/// up=X → {Y, Z}, up=Y → {X, Z}, up=Z → {X, Y}.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontParity {
    Even,
    Odd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handedness {
    Right,
    Left,
}

/// Unit of length of the source scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitScale {
    /// Number of centimeters per source unit.
    pub centimeters_per_unit: f32,
}

impl UnitScale {
    pub const MILLIMETERS: Self = Self {
        centimeters_per_unit: 0.1,
    };
    pub const CENTIMETERS: Self = Self {
        centimeters_per_unit: 1.0,
    };
    pub const METERS: Self = Self {
        centimeters_per_unit: 100.0,
    };
    pub const INCHES: Self = Self {
        centimeters_per_unit: 2.54,
    };
}

impl Default for UnitScale {
    fn default() -> Self {
        Self::CENTIMETERS
    }
}

/// Translation, rotation and scale decomposed from an affine matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    /// Unit quaternion.
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// Orthonormalization tolerance for decomposition: per-axis scale must stay
// above this, and normalized axes must be mutually orthogonal within it.
const DECOMPOSE_TOLERANCE: f32 = 1e-4;

/// The conversion operator: an immutable triple of 4×4 affine matrices.
///
/// Built once per scene session and shared read-only by every extraction
/// call. Invariants: `inverse == convert.inverse()` and
/// `inverse_transpose == inverse.transpose()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneConverter {
    convert: Mat4,
    inverse: Mat4,
    inverse_transpose: Mat4,
}

fn build_axis_matrix(axis: AxisSystem) -> Result<Mat4> {
    let sign = if axis.up < 0 { -1.0 } else { 1.0 };

    let up = match axis.up.abs() {
        1 => Vec3::X * sign,
        2 => Vec3::Y * sign,
        3 => Vec3::Z * sign,
        _ => return Err(ExtractError::InvalidAxisSystem(axis.up)),
    };

    // Fixed pairing table: the up choice leaves two axes free, parity picks
    // the front among them.
    let front = match (axis.up.abs(), axis.front) {
        (1, FrontParity::Even) => Vec3::Y,
        (1, FrontParity::Odd) | (2, FrontParity::Odd) => Vec3::Z,
        (2, FrontParity::Even) | (3, FrontParity::Even) => Vec3::X,
        (3, FrontParity::Odd) => Vec3::Y,
        _ => unreachable!("up axis validated above"),
    };

    // Up and front determine the third axis; handedness fixes its direction.
    let right = match axis.handedness {
        Handedness::Right => up.cross(front),
        Handedness::Left => front.cross(up),
    };

    Ok(Mat4::from_cols(
        right.extend(0.0),
        up.extend(0.0),
        front.extend(0.0),
        Vec4::W,
    ))
}

impl SceneConverter {
    /// Builds the conversion operator for a scene's axis system and unit.
    ///
    /// Fails fast on malformed metadata ([`ExtractError::InvalidAxisSystem`],
    /// [`ExtractError::InvalidUnitScale`]); these signal a collaborator bug
    /// and are not recoverable.
    pub fn new(axis: AxisSystem, unit: UnitScale) -> Result<Self> {
        if !unit.centimeters_per_unit.is_finite() || unit.centimeters_per_unit <= 0.0 {
            return Err(ExtractError::InvalidUnitScale(unit.centimeters_per_unit));
        }

        let from_matrix = build_axis_matrix(axis)?;

        // The source scale factor is relative to centimeters; the engine
        // works in meters.
        let to_meters = unit.centimeters_per_unit * 0.01;

        let convert = from_matrix.inverse() * Mat4::from_scale(Vec3::splat(to_meters));
        let inverse = convert.inverse();
        Ok(Self {
            convert,
            inverse,
            inverse_transpose: inverse.transpose(),
        })
    }

    /// The forward conversion matrix.
    #[inline]
    #[must_use]
    pub fn convert(&self) -> &Mat4 {
        &self.convert
    }

    #[inline]
    #[must_use]
    pub fn inverse(&self) -> &Mat4 {
        &self.inverse
    }

    #[inline]
    #[must_use]
    pub fn inverse_transpose(&self) -> &Mat4 {
        &self.inverse_transpose
    }

    /// Re-expresses a source-space matrix in the normalized system.
    #[must_use]
    pub fn convert_matrix(&self, m: Mat4) -> Mat4 {
        self.convert * m * self.inverse
    }

    /// Converts a point (w = 1).
    #[must_use]
    pub fn convert_point(&self, p: Vec3) -> Vec3 {
        self.convert.transform_point3(p)
    }

    /// Converts a normal (w = 0) through the inverse-transpose, which keeps
    /// it perpendicular under non-uniform scale.
    #[must_use]
    pub fn convert_normal(&self, n: Vec3) -> Vec3 {
        self.inverse_transpose.transform_vector3(n)
    }

    /// Converts a source-space matrix and decomposes it.
    ///
    /// Returns `None` when the rotational part cannot be orthonormalized
    /// within tolerance (singular scale, shear, non-finite input), so wrong
    /// data never escapes silently. Callers abort the surrounding extraction.
    #[must_use]
    pub fn convert_transform(&self, m: Mat4) -> Option<Transform> {
        decompose(self.convert_matrix(m))
    }
}

/// Failable TRS decomposition of an affine matrix.
///
/// glam's `to_scale_rotation_translation` happily returns garbage for
/// degenerate input; this one rejects it instead.
fn decompose(m: Mat4) -> Option<Transform> {
    if !m.is_finite() {
        return None;
    }

    let translation = m.w_axis.truncate();

    let mut x = m.x_axis.truncate();
    let mut y = m.y_axis.truncate();
    let mut z = m.z_axis.truncate();

    let mut scale = Vec3::new(x.length(), y.length(), z.length());
    if scale.min_element() < DECOMPOSE_TOLERANCE {
        // Singular: at least one axis collapsed.
        return None;
    }

    x /= scale.x;
    y /= scale.y;
    z /= scale.z;

    // A reflection is carried as one negative scale, conventionally on X.
    if Mat3::from_cols(x, y, z).determinant() < 0.0 {
        scale.x = -scale.x;
        x = -x;
    }

    // Shear check: the normalized axes must form an orthonormal basis.
    if x.dot(y).abs() > DECOMPOSE_TOLERANCE
        || y.dot(z).abs() > DECOMPOSE_TOLERANCE
        || z.dot(x).abs() > DECOMPOSE_TOLERANCE
    {
        return None;
    }

    let rotation = Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize();
    if !rotation.is_finite() {
        return None;
    }

    Some(Transform {
        translation,
        rotation,
        scale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decompose_identity() {
        let t = decompose(Mat4::IDENTITY).unwrap();
        assert_eq!(t, Transform::IDENTITY);
    }

    #[test]
    fn decompose_rejects_shear() {
        let mut m = Mat4::IDENTITY;
        m.y_axis.x = 0.5;
        assert!(decompose(m).is_none());
    }

    #[test]
    fn decompose_rejects_singular() {
        let m = Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0));
        assert!(decompose(m).is_none());
    }

    #[test]
    fn decompose_rejects_non_finite() {
        let m = Mat4::from_translation(Vec3::new(f32::NAN, 0.0, 0.0));
        assert!(decompose(m).is_none());
    }

    #[test]
    fn decompose_handles_reflection() {
        let t = decompose(Mat4::from_scale(Vec3::new(-2.0, 3.0, 1.0))).unwrap();
        // The sign lands on X by convention, magnitudes are preserved.
        assert!((t.scale.x + 2.0).abs() < 1e-5);
        assert!((t.scale.y - 3.0).abs() < 1e-5);
        assert!((t.rotation.length() - 1.0).abs() < 1e-5);
    }
}
