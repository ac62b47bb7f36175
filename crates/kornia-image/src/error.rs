/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when two images (or an image and a mask) do not share the same size.
    #[error("Invalid image size. Got: {0}x{1}, expected: {2}x{3}")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when a sampling map does not cover the destination image.
    #[error("Sampling map length ({0}) does not match the number of pixels ({1})")]
    InvalidMapSize(usize, usize),

    /// Error when the image has no pixels.
    #[error("Image is empty")]
    EmptyImage,

    /// Error when a pixel value cannot be cast to the requested type.
    #[error("Failed to cast image data")]
    CastError,
}
