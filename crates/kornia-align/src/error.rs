use kornia_geometry::GeometryError;
use kornia_image::{ImageError, ImageSize};

/// An error type for the alignment module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum AlignError {
    /// Error when two collaborators disagree on a dimension.
    #[error("Dimension mismatch in {what}. Got: {actual}, expected: {expected}")]
    DimensionMismatch {
        /// The quantity whose dimension disagrees.
        what: &'static str,
        /// The dimension required by the other operand.
        expected: usize,
        /// The dimension that was provided.
        actual: usize,
    },

    /// Error when two images that must share a pixel grid do not.
    #[error("Size mismatch in {what}. Got: {actual}, expected: {expected}")]
    SizeMismatch {
        /// The image whose size disagrees.
        what: &'static str,
        /// The size of the reference grid.
        expected: ImageSize,
        /// The size that was provided.
        actual: ImageSize,
    },

    /// Error when the normal equations of an iteration cannot be solved.
    #[error("Hessian is singular, the parameter update is ill-posed")]
    SingularHessian,

    /// Error when the iteration budget cannot run a single iteration.
    #[error("Invalid iteration budget ({0}), at least 2 is required")]
    InvalidIterationBudget(usize),

    /// Error when the convergence threshold is not strictly positive.
    #[error("Invalid convergence threshold ({0}), must be positive")]
    InvalidEpsilon(f64),

    /// Error from the image containers or image processing operations.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error from the transforms.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Fail with [`AlignError::SizeMismatch`] unless both sizes agree.
pub(crate) fn ensure_same_size(
    what: &'static str,
    expected: ImageSize,
    actual: ImageSize,
) -> Result<(), AlignError> {
    if expected != actual {
        return Err(AlignError::SizeMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Fail with [`AlignError::DimensionMismatch`] unless both dimensions agree.
pub(crate) fn ensure_dimension(
    what: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), AlignError> {
    if expected != actual {
        return Err(AlignError::DimensionMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}
