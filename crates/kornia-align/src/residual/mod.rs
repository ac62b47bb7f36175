use faer::{Col, Mat};
use kornia_geometry::WarpJacobian;
use kornia_image::{Image, ImageMask};

use crate::error::AlignError;
use crate::gradient::ImageGradient;

mod ssd;

pub use ssd::SumSquaredDifferences;

/// The residual minimized by a Lucas-Kanade session.
///
/// A residual turns image gradients and warp jacobians into steepest descent images,
/// builds the Gauss-Newton Hessian from them and projects the pixel error onto them.
///
/// Steepest descent images are stored as a `(n_valid * C) x n_params` matrix where
/// `n_valid` is the number of valid mask pixels; row `k * C + c` holds channel `c` of
/// the `k`-th valid pixel in row-major order.
pub trait Residual<const C: usize> {
    /// Compute the gradient of an image.
    ///
    /// Defaults to a normalized Sobel gradient.
    fn gradient(&self, image: &Image<f64, C>) -> Result<ImageGradient<C>, AlignError> {
        ImageGradient::new(image)
    }

    /// Chain the image gradient with the warp jacobian at every valid mask pixel.
    ///
    /// # Errors
    ///
    /// If the gradient does not cover the mask, or the jacobian is not evaluated at
    /// every valid pixel.
    fn steepest_descent_images(
        &self,
        gradient: &ImageGradient<C>,
        mask: &ImageMask,
        dw_dp: &WarpJacobian,
    ) -> Result<Mat<f64>, AlignError>;

    /// The `n_params x n_params` Hessian approximation of the steepest descent images.
    fn calculate_hessian(&self, sdi: &Mat<f64>) -> Mat<f64>;

    /// Project the error between `a` and `b` on the valid pixels onto the steepest
    /// descent images.
    ///
    /// # Errors
    ///
    /// If the images or the steepest descent images do not match the mask.
    fn steepest_descent_update(
        &self,
        sdi: &Mat<f64>,
        mask: &ImageMask,
        a: &Image<f64, C>,
        b: &Image<f64, C>,
    ) -> Result<Col<f64>, AlignError>;

    /// The scalar cost between `a` and `b` on the valid pixels.
    ///
    /// # Errors
    ///
    /// If the images do not match the mask.
    fn cost(
        &self,
        mask: &ImageMask,
        a: &Image<f64, C>,
        b: &Image<f64, C>,
    ) -> Result<f64, AlignError>;
}
