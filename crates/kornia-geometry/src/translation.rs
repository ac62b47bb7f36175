use serde::{Deserialize, Serialize};

use crate::transform::{check_params_len, Transform, WarpJacobian};
use crate::GeometryError;

/// A 2d translation `W(x; p) = x + p`.
///
/// # Example
///
/// ```
/// use kornia_geometry::{Transform, Translation2d};
///
/// let t = Translation2d::new(1.0, -2.0);
/// assert_eq!(t.apply_point([3.0, 3.0]), [4.0, 1.0]);
/// assert_eq!(t.as_vector(), vec![1.0, -2.0]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Translation2d {
    /// Translation along x and y.
    pub t: [f64; 2],
}

impl Translation2d {
    /// Create a translation by `(tx, ty)`.
    pub fn new(tx: f64, ty: f64) -> Self {
        Self { t: [tx, ty] }
    }

    /// The zero translation.
    pub fn identity() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl Default for Translation2d {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform for Translation2d {
    fn n_parameters(&self) -> usize {
        2
    }

    fn as_vector(&self) -> Vec<f64> {
        self.t.to_vec()
    }

    fn from_vector(&self, params: &[f64]) -> Result<Self, GeometryError> {
        check_params_len(params, 2)?;
        Ok(Self::new(params[0], params[1]))
    }

    fn apply_point(&self, point: [f64; 2]) -> [f64; 2] {
        [point[0] + self.t[0], point[1] + self.t[1]]
    }

    fn jacobian(&self, points: &[[f64; 2]]) -> WarpJacobian {
        // the identity at every point
        WarpJacobian::from_fn(points.len(), 2, |_, dim, param| {
            if dim == param {
                1.0
            } else {
                0.0
            }
        })
    }

    fn compose(&self, other: &Self) -> Self {
        Self::new(self.t[0] + other.t[0], self.t[1] + other.t[1])
    }

    fn inverse(&self) -> Result<Self, GeometryError> {
        Ok(Self::new(-self.t[0], -self.t[1]))
    }
}
