//! Filter operations
//!
//! This module provides the derivative filters used to build steepest descent images.

/// Filter kernels
pub mod kernels;

/// Filter operations
mod ops;
pub use ops::*;
