use faer::{Col, Mat};
use kornia_geometry::WarpJacobian;
use kornia_image::{Image, ImageMask};

use super::Residual;
use crate::error::{ensure_dimension, ensure_same_size, AlignError};
use crate::gradient::ImageGradient;

/// Sum of squared differences between the template and the warped image.
///
/// The Hessian is `sdi^T sdi` and the update is `sdi^T (a - b)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SumSquaredDifferences;

impl SumSquaredDifferences {
    /// Create the residual.
    pub fn new() -> Self {
        Self
    }
}

/// Per-row pixel differences `a - b` on the valid pixels, in steepest descent row order.
fn masked_difference<const C: usize>(
    mask: &ImageMask,
    a: &Image<f64, C>,
    b: &Image<f64, C>,
) -> Result<Vec<f64>, AlignError> {
    ensure_same_size("residual image a", mask.size(), a.size())?;
    ensure_same_size("residual image b", mask.size(), b.size())?;

    let (a, b) = (a.as_slice(), b.as_slice());
    let error = mask
        .true_indices()
        .into_iter()
        .flat_map(|idx| (0..C).map(move |c| idx * C + c))
        .map(|i| a[i] - b[i])
        .collect();

    Ok(error)
}

impl<const C: usize> Residual<C> for SumSquaredDifferences {
    fn steepest_descent_images(
        &self,
        gradient: &ImageGradient<C>,
        mask: &ImageMask,
        dw_dp: &WarpJacobian,
    ) -> Result<Mat<f64>, AlignError> {
        ensure_same_size("gradient", mask.size(), gradient.size())?;

        let indices = mask.true_indices();
        ensure_dimension("warp jacobian points", indices.len(), dw_dp.n_points())?;

        let (dx, dy) = (gradient.dx.as_slice(), gradient.dy.as_slice());

        // sdi[k * C + c, p] = dI/dx * dWx/dp + dI/dy * dWy/dp
        let sdi = Mat::from_fn(indices.len() * C, dw_dp.n_params(), |row, param| {
            let (k, c) = (row / C, row % C);
            let i = indices[k] * C + c;
            dx[i] * dw_dp.get(k, 0, param) + dy[i] * dw_dp.get(k, 1, param)
        });

        Ok(sdi)
    }

    fn calculate_hessian(&self, sdi: &Mat<f64>) -> Mat<f64> {
        let n_params = sdi.ncols();
        let mut hessian = Mat::<f64>::zeros(n_params, n_params);
        faer::linalg::matmul::matmul(
            hessian.as_mut(),
            sdi.transpose(),
            sdi.as_ref(),
            None,
            1.0,
            faer::Parallelism::None,
        );
        hessian
    }

    fn steepest_descent_update(
        &self,
        sdi: &Mat<f64>,
        mask: &ImageMask,
        a: &Image<f64, C>,
        b: &Image<f64, C>,
    ) -> Result<Col<f64>, AlignError> {
        let error = masked_difference(mask, a, b)?;
        ensure_dimension("steepest descent images rows", error.len(), sdi.nrows())?;

        let update = Col::from_fn(sdi.ncols(), |param| {
            error
                .iter()
                .enumerate()
                .map(|(row, e)| sdi.read(row, param) * e)
                .sum()
        });

        Ok(update)
    }

    fn cost(
        &self,
        mask: &ImageMask,
        a: &Image<f64, C>,
        b: &Image<f64, C>,
    ) -> Result<f64, AlignError> {
        let error = masked_difference(mask, a, b)?;
        Ok(error.iter().map(|e| e * e).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::SumSquaredDifferences;
    use crate::gradient::ImageGradient;
    use crate::residual::Residual;
    use crate::AlignError;
    use approx::assert_relative_eq;
    use kornia_geometry::{Transform, Translation2d};
    use kornia_image::{Image, ImageMask};

    fn ramp_gradient() -> Result<ImageGradient<2>, AlignError> {
        // channel 0 varies along x, channel 1 along y
        let dx = Image::<f64, 2>::from_size_fn([3, 2].into(), |x, _| [x as f64 + 1.0, 0.0])?;
        let dy = Image::<f64, 2>::from_size_fn([3, 2].into(), |_, y| [0.0, y as f64 + 1.0])?;
        ImageGradient::from_parts(dx, dy)
    }

    #[test]
    fn test_ssd_steepest_descent_layout() -> Result<(), AlignError> {
        let gradient = ramp_gradient()?;
        let mask = ImageMask::from_fn([3, 2].into(), |x, _| x != 1);
        let dw_dp = Translation2d::identity().jacobian(&mask.true_points());

        let sdi = SumSquaredDifferences.steepest_descent_images(&gradient, &mask, &dw_dp)?;
        assert_eq!(sdi.nrows(), 4 * 2);
        assert_eq!(sdi.ncols(), 2);

        // second valid pixel is (x=2, y=0)
        assert_eq!(sdi.read(2, 0), 3.0);
        assert_eq!(sdi.read(2, 1), 0.0);
        assert_eq!(sdi.read(3, 0), 0.0);
        assert_eq!(sdi.read(3, 1), 1.0);
        // last valid pixel is (x=2, y=1)
        assert_eq!(sdi.read(7, 1), 2.0);

        Ok(())
    }

    #[test]
    fn test_ssd_hessian_and_update() -> Result<(), AlignError> {
        let gradient = ramp_gradient()?;
        let mask = ImageMask::all_true([3, 2].into());
        let dw_dp = Translation2d::identity().jacobian(&mask.true_points());
        let ssd = SumSquaredDifferences::new();

        let sdi = ssd.steepest_descent_images(&gradient, &mask, &dw_dp)?;
        let hessian = Residual::<2>::calculate_hessian(&ssd, &sdi);

        // sum over columns of (x + 1)^2 for both rows, and sum of (y + 1)^2 per column
        assert_relative_eq!(hessian.read(0, 0), 2.0 * (1.0 + 4.0 + 9.0));
        assert_relative_eq!(hessian.read(1, 1), 3.0 * (1.0 + 4.0));
        assert_relative_eq!(hessian.read(0, 1), 0.0);
        assert_relative_eq!(hessian.read(1, 0), 0.0);

        let a = Image::<f64, 2>::from_size_val([3, 2].into(), 1.0)?;
        let b = Image::<f64, 2>::from_size_val([3, 2].into(), 0.5)?;
        let update = ssd.steepest_descent_update(&sdi, &mask, &a, &b)?;
        assert_relative_eq!(update.read(0), 0.5 * 2.0 * (1.0 + 2.0 + 3.0));
        assert_relative_eq!(update.read(1), 0.5 * 3.0 * (1.0 + 2.0));

        // swapping the operands flips the sign
        let flipped = ssd.steepest_descent_update(&sdi, &mask, &b, &a)?;
        assert_relative_eq!(flipped.read(0), -update.read(0));

        assert_relative_eq!(ssd.cost(&mask, &a, &b)?, 12.0 * 0.25);

        Ok(())
    }

    #[test]
    fn test_ssd_dimension_mismatch() -> Result<(), AlignError> {
        let gradient = ramp_gradient()?;
        let mask = ImageMask::all_true([3, 2].into());
        let ssd = SumSquaredDifferences;

        // jacobian evaluated on fewer points than valid pixels
        let dw_dp = Translation2d::identity().jacobian(&[[0.0, 0.0]]);
        let res = ssd.steepest_descent_images(&gradient, &mask, &dw_dp);
        assert_eq!(
            res.err(),
            Some(AlignError::DimensionMismatch {
                what: "warp jacobian points",
                expected: 6,
                actual: 1,
            })
        );

        let a = Image::<f64, 2>::from_size_val([3, 2].into(), 1.0)?;
        let b = Image::<f64, 2>::from_size_val([2, 3].into(), 1.0)?;
        assert!(matches!(
            ssd.cost(&mask, &a, &b),
            Err(AlignError::SizeMismatch { .. })
        ));

        Ok(())
    }
}
