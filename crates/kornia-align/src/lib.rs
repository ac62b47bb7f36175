#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Configuration of the alignment sessions.
pub mod config;

/// Error types for the alignment module.
pub mod error;

/// Image gradients in the template frame.
pub mod gradient;

/// The Lucas-Kanade alignment sessions and their update rules.
pub mod lucas_kanade;

/// Residuals driving the optimization.
pub mod residual;

/// Warp samplers pulling the target image onto the template grid.
pub mod warp;

pub use crate::config::{LucasKanadeAlgorithm, LucasKanadeConfig, Optimisation};
pub use crate::error::AlignError;
pub use crate::gradient::ImageGradient;
pub use crate::lucas_kanade::{
    solve_parameter_delta, AlignmentStatus, LucasKanade, DEFAULT_MAX_ITERS,
};
pub use crate::residual::{Residual, SumSquaredDifferences};
pub use crate::warp::{ImageWarp, WarpSampler};
