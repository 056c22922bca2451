use std::ops::Mul;

use glam::{DMat4, DQuat, DVec3};

/// An affine 4x4 transform.
///
/// Composition follows the usual column-vector convention: `a * b` applies `b` first, then `a`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    matrix: DMat4,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            matrix: DMat4::IDENTITY,
        }
    }

    pub fn from_translation(translation: DVec3) -> Self {
        Self {
            matrix: DMat4::from_translation(translation),
        }
    }

    /// Builds a rotation from an `[x, y, z, w]` quaternion, normalizing it first.
    ///
    /// Returns `None` when the quaternion has zero (or non-finite) length.
    pub fn from_rotation(rotation: [f64; 4]) -> Option<Self> {
        let [x, y, z, w] = rotation;
        let norm = (x * x + y * y + z * z + w * w).sqrt();
        if norm == 0.0 || !norm.is_finite() {
            return None;
        }

        let unit = DQuat::from_xyzw(x / norm, y / norm, z / norm, w / norm);
        Some(Self {
            matrix: DMat4::from_quat(unit),
        })
    }

    pub fn from_scale(scale: DVec3) -> Self {
        Self {
            matrix: DMat4::from_scale(scale),
        }
    }

    /// Takes 16 values in column-major order, as glTF stores node matrices.
    pub fn from_matrix(values: [f64; 16]) -> Self {
        Self {
            matrix: DMat4::from_cols_array(&values),
        }
    }

    pub fn rows(&self) -> [[f64; 4]; 4] {
        [0, 1, 2, 3].map(|i| self.matrix.row(i).to_array())
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        Transform {
            matrix: self.matrix * rhs.matrix,
        }
    }
}
