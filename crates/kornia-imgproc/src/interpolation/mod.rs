//! Pixel interpolation methods for image resampling.
//!
//! # Interpolation Modes
//!
//! - **Nearest**: Fastest, uses nearest pixel value (no interpolation)
//! - **Bilinear**: Smooth linear interpolation between adjacent pixels
//!
//! Warp samplers use [`remap`] to pull a source image onto the pixel grid of a
//! template through a precomputed coordinate map.

mod bilinear;
pub(crate) mod interpolate;
mod nearest;
mod remap;

pub use interpolate::InterpolationMode;
pub use remap::remap;
