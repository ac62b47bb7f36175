#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// 2d affine warps.
pub mod affine;

/// Error types for the geometry module.
pub mod error;

/// The parameterized transform abstraction and warp jacobians.
pub mod transform;

/// 2d translation warps.
pub mod translation;

pub use crate::affine::Affine2d;
pub use crate::error::GeometryError;
pub use crate::transform::{Transform, WarpJacobian};
pub use crate::translation::Translation2d;
