#![deny(missing_docs)]
//! Image and mask containers for dense image alignment

/// image representation for computer vision purposes.
pub mod image;

/// pixel validity masks and masked images.
pub mod mask;

/// Error types for the image module.
pub mod error;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
pub use crate::mask::{ImageMask, MaskedImage};
