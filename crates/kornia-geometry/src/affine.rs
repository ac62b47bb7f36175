use serde::{Deserialize, Serialize};

use crate::transform::{check_params_len, Transform, WarpJacobian};
use crate::GeometryError;

/// Determinants below this magnitude are treated as singular.
const SINGULAR_DETERMINANT: f64 = 1e-12;

/// A 2d affine warp with the parameterization
///
/// | 1 + p1   p3    p5 |
/// |   p2   1 + p4  p6 |
///
/// so the zero parameter vector is the identity warp.
///
/// # Example
///
/// ```
/// use kornia_geometry::{Affine2d, Transform};
///
/// let scale = Affine2d::from_matrix(&[[2.0, 0.0, 1.0], [0.0, 2.0, 0.0]]);
/// assert_eq!(scale.as_vector(), vec![1.0, 0.0, 0.0, 1.0, 1.0, 0.0]);
/// assert_eq!(scale.apply_point([1.0, 3.0]), [3.0, 6.0]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Affine2d {
    /// The parameter vector `[p1, p2, p3, p4, p5, p6]`.
    pub params: [f64; 6],
}

impl Affine2d {
    /// Create an affine warp from its parameter vector.
    pub fn new(params: [f64; 6]) -> Self {
        Self { params }
    }

    /// The identity warp.
    pub fn identity() -> Self {
        Self { params: [0.0; 6] }
    }

    /// Create an affine warp from a 2x3 matrix.
    pub fn from_matrix(m: &[[f64; 3]; 2]) -> Self {
        Self {
            params: [
                m[0][0] - 1.0,
                m[1][0],
                m[0][1],
                m[1][1] - 1.0,
                m[0][2],
                m[1][2],
            ],
        }
    }

    /// The 2x3 matrix of the warp.
    pub fn matrix(&self) -> [[f64; 3]; 2] {
        let p = &self.params;
        [[1.0 + p[0], p[2], p[4]], [p[1], 1.0 + p[3], p[5]]]
    }
}

impl Default for Affine2d {
    fn default() -> Self {
        Self::identity()
    }
}

/// Inverts a 2x3 affine transformation matrix.
fn invert_affine_transform(m: &[[f64; 3]; 2]) -> Result<[[f64; 3]; 2], GeometryError> {
    let (a, b, c) = (m[0][0], m[0][1], m[0][2]);
    let (d, e, f) = (m[1][0], m[1][1], m[1][2]);

    let determinant = a * e - b * d;
    if determinant.abs() < SINGULAR_DETERMINANT {
        return Err(GeometryError::SingularTransform(determinant));
    }
    let inv_determinant = 1.0 / determinant;

    let new_a = e * inv_determinant;
    let new_b = -b * inv_determinant;
    let new_d = -d * inv_determinant;
    let new_e = a * inv_determinant;
    let new_c = -(new_a * c + new_b * f);
    let new_f = -(new_d * c + new_e * f);

    Ok([[new_a, new_b, new_c], [new_d, new_e, new_f]])
}

impl Transform for Affine2d {
    fn n_parameters(&self) -> usize {
        6
    }

    fn as_vector(&self) -> Vec<f64> {
        self.params.to_vec()
    }

    fn from_vector(&self, params: &[f64]) -> Result<Self, GeometryError> {
        check_params_len(params, 6)?;
        let mut p = [0.0; 6];
        p.copy_from_slice(params);
        Ok(Self::new(p))
    }

    fn apply_point(&self, point: [f64; 2]) -> [f64; 2] {
        let m = self.matrix();
        let (x, y) = (point[0], point[1]);
        [
            m[0][0] * x + m[0][1] * y + m[0][2],
            m[1][0] * x + m[1][1] * y + m[1][2],
        ]
    }

    fn jacobian(&self, points: &[[f64; 2]]) -> WarpJacobian {
        // dW/dp = | x 0 y 0 1 0 |
        //         | 0 x 0 y 0 1 |
        // independent of the current parameters
        WarpJacobian::from_fn(points.len(), 6, |i, dim, param| {
            let [x, y] = points[i];
            match (param % 2 == dim, param / 2) {
                (true, 0) => x,
                (true, 1) => y,
                (true, _) => 1.0,
                (false, _) => 0.0,
            }
        })
    }

    fn compose(&self, other: &Self) -> Self {
        let a = self.matrix();
        let b = other.matrix();
        let mut m = [[0.0; 3]; 2];
        for (i, row) in m.iter_mut().enumerate() {
            for (j, val) in row.iter_mut().enumerate() {
                *val = a[i][0] * b[0][j] + a[i][1] * b[1][j];
            }
            // homogeneous row of `b` is [0, 0, 1]
            row[2] += a[i][2];
        }
        Self::from_matrix(&m)
    }

    fn inverse(&self) -> Result<Self, GeometryError> {
        Ok(Self::from_matrix(&invert_affine_transform(&self.matrix())?))
    }
}
