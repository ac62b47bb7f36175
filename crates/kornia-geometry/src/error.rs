/// An error type for the geometry module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum GeometryError {
    /// Error when a parameter vector does not match the transform parameterization.
    #[error("Invalid parameter vector length. Got: {0}, expected: {1}")]
    InvalidParameterLength(usize, usize),

    /// Error when a jacobian buffer does not match its declared shape.
    #[error("Invalid jacobian data length. Got: {0}, expected: {1}")]
    InvalidJacobianShape(usize, usize),

    /// Error when a transform cannot be inverted.
    #[error("Transform is singular (determinant {0})")]
    SingularTransform(f64),
}
