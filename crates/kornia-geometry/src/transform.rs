use crate::GeometryError;

/// Jacobian of a warp with respect to its parameters, `dW(x; p) / dp`.
///
/// The jacobian is evaluated at a set of sample points and stored as a dense
/// `n_points x 2 x n_params` array in point-major order: for every point, the row of
/// derivatives of the warped x coordinate followed by the row of the warped y coordinate.
#[derive(Clone, Debug, PartialEq)]
pub struct WarpJacobian {
    n_points: usize,
    n_params: usize,
    data: Vec<f64>,
}

impl WarpJacobian {
    /// Create a jacobian from its raw point-major data.
    ///
    /// # Errors
    ///
    /// If the data length is not `n_points * 2 * n_params`.
    pub fn new(n_points: usize, n_params: usize, data: Vec<f64>) -> Result<Self, GeometryError> {
        if data.len() != n_points * 2 * n_params {
            return Err(GeometryError::InvalidJacobianShape(
                data.len(),
                n_points * 2 * n_params,
            ));
        }
        Ok(Self {
            n_points,
            n_params,
            data,
        })
    }

    /// Create a jacobian by evaluating `f(point, dim, param)` for every entry.
    pub fn from_fn(
        n_points: usize,
        n_params: usize,
        f: impl Fn(usize, usize, usize) -> f64,
    ) -> Self {
        let mut data = Vec::with_capacity(n_points * 2 * n_params);
        for point in 0..n_points {
            for dim in 0..2 {
                for param in 0..n_params {
                    data.push(f(point, dim, param));
                }
            }
        }
        Self {
            n_points,
            n_params,
            data,
        }
    }

    /// Number of sample points.
    pub fn n_points(&self) -> usize {
        self.n_points
    }

    /// Number of warp parameters.
    pub fn n_params(&self) -> usize {
        self.n_params
    }

    /// Derivative of the warped coordinate `dim` (0 for x, 1 for y) of `point` with
    /// respect to `param`.
    ///
    /// PRECONDITION: the indices are within the jacobian shape.
    pub fn get(&self, point: usize, dim: usize, param: usize) -> f64 {
        self.data[(point * 2 + dim) * self.n_params + param]
    }

    /// The `2 x n_params` block of a single point, x row first.
    pub fn point(&self, point: usize) -> &[f64] {
        let stride = 2 * self.n_params;
        &self.data[point * stride..(point + 1) * stride]
    }

    /// The raw point-major data.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

/// A parameterized 2d warp `W(x; p)`.
///
/// A transform doubles as the codec between its parameter vector and transform
/// instances: [`Transform::from_vector`] builds a new transform of the same family.
pub trait Transform: Clone + std::fmt::Debug {
    /// Number of parameters of the warp.
    fn n_parameters(&self) -> usize;

    /// The parameter vector `p` of this warp.
    fn as_vector(&self) -> Vec<f64>;

    /// Build a transform of the same family from a parameter vector.
    ///
    /// # Errors
    ///
    /// If the vector length does not match [`Transform::n_parameters`].
    fn from_vector(&self, params: &[f64]) -> Result<Self, GeometryError>;

    /// Warp a single `[x, y]` point.
    fn apply_point(&self, point: [f64; 2]) -> [f64; 2];

    /// Warp a set of `[x, y]` points.
    fn apply(&self, points: &[[f64; 2]]) -> Vec<[f64; 2]> {
        points.iter().map(|&p| self.apply_point(p)).collect()
    }

    /// The jacobian `dW / dp` evaluated at the current parameters on every point.
    fn jacobian(&self, points: &[[f64; 2]]) -> WarpJacobian;

    /// The warp applying `other` first and then `self`, i.e. `W_self(W_other(x))`.
    fn compose(&self, other: &Self) -> Self;

    /// The inverse warp.
    ///
    /// # Errors
    ///
    /// If the warp is not invertible.
    fn inverse(&self) -> Result<Self, GeometryError>;
}

/// Check a parameter vector length against the expected parameterization.
pub(crate) fn check_params_len(params: &[f64], expected: usize) -> Result<(), GeometryError> {
    if params.len() != expected {
        return Err(GeometryError::InvalidParameterLength(params.len(), expected));
    }
    Ok(())
}
