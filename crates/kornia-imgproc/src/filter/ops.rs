use kornia_image::{Image, ImageError};
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

use super::kernels;

/// Compute one row of the x and y derivatives with a pair of 3x3 kernels.
///
/// Pixels outside the image are replicated from the nearest border pixel.
///
/// # Arguments
///
/// * `src_data` - The source image with full data
/// * `rows` - Rows of the source image
/// * `cols` - Cols of the source image
/// * `kernel_x` - 3x3 kernel for compute dx_row
/// * `kernel_y` - 3x3 kernel for compute dy_row
/// * `dx_row` - The slice for the current row in dx output, length should be cols * C
/// * `dy_row` - The slice for the current row in dy output, length should be cols * C
/// * `row` - current row idx in source image
#[allow(clippy::too_many_arguments)]
fn filter_kernel3_row_calc<const C: usize>(
    src_data: &[f64],
    rows: usize,
    cols: usize,
    kernel_x: &[[f64; 3]; 3],
    kernel_y: &[[f64; 3]; 3],
    dx_row: &mut [f64],
    dy_row: &mut [f64],
    row: usize,
) {
    for col in 0..cols {
        let mut sum_x = [0.0; C];
        let mut sum_y = [0.0; C];
        for ky in 0..3 {
            let r = (row + ky).saturating_sub(1).min(rows - 1);
            for kx in 0..3 {
                let c = (col + kx).saturating_sub(1).min(cols - 1);
                let offset = (r * cols + c) * C;
                for ch in 0..C {
                    let val = src_data[offset + ch];
                    sum_x[ch] += val * kernel_x[ky][kx];
                    sum_y[ch] += val * kernel_y[ky][kx];
                }
            }
        }
        dx_row[col * C..(col + 1) * C].copy_from_slice(&sum_x);
        dy_row[col * C..(col + 1) * C].copy_from_slice(&sum_y);
    }
}

/// Compute the first order image derivative in both x and y using a Sobel operator.
///
/// The kernels are normalized so the derivatives are expressed in intensity units per
/// pixel, which is what the warp Jacobians are chained with. Rows are processed in
/// parallel.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dx` - The destination x derivative with shape (H, W, C).
/// * `dy` - The destination y derivative with shape (H, W, C).
///
/// # Errors
///
/// If the destination images do not match the source size, or the source is empty.
///
/// # Example
///
/// ```
/// use kornia_image::Image;
/// use kornia_imgproc::filter::spatial_gradient;
///
/// // a ramp of slope 2 along x
/// let src = Image::<f64, 1>::from_size_fn([5, 5].into(), |x, _| [2.0 * x as f64]).unwrap();
/// let mut dx = Image::<f64, 1>::from_size_val(src.size(), 0.0).unwrap();
/// let mut dy = Image::<f64, 1>::from_size_val(src.size(), 0.0).unwrap();
///
/// spatial_gradient(&src, &mut dx, &mut dy).unwrap();
///
/// assert_eq!(dx.get([2, 2, 0]), Some(&2.0));
/// assert_eq!(dy.get([2, 2, 0]), Some(&0.0));
/// ```
pub fn spatial_gradient<const C: usize>(
    src: &Image<f64, C>,
    dx: &mut Image<f64, C>,
    dy: &mut Image<f64, C>,
) -> Result<(), ImageError> {
    if src.size() != dx.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dx.cols(),
            dx.rows(),
        ));
    }

    if src.size() != dy.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dy.cols(),
            dy.rows(),
        ));
    }

    if src.size().num_pixels() == 0 {
        return Err(ImageError::EmptyImage);
    }

    let (sobel_x, sobel_y) = kernels::normalized_sobel_kernel3();
    let (rows, cols) = (src.rows(), src.cols());
    let src_data = src.as_slice();

    dx.as_slice_mut()
        .par_chunks_exact_mut(cols * C)
        .zip(dy.as_slice_mut().par_chunks_exact_mut(cols * C))
        .enumerate()
        .for_each(|(r, (dx_row, dy_row))| {
            filter_kernel3_row_calc::<C>(
                src_data, rows, cols, &sobel_x, &sobel_y, dx_row, dy_row, r,
            );
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use kornia_image::{Image, ImageError};

    #[test]
    fn test_spatial_gradient_plane() -> Result<(), ImageError> {
        // I(x, y) = 0.5 x - 3 y + 1, channel 1 is its negative
        let src = Image::<f64, 2>::from_size_fn([6, 4].into(), |x, y| {
            let v = 0.5 * x as f64 - 3.0 * y as f64 + 1.0;
            [v, -v]
        })?;
        let mut dx = Image::<f64, 2>::from_size_val(src.size(), 0.0)?;
        let mut dy = Image::<f64, 2>::from_size_val(src.size(), 0.0)?;

        super::spatial_gradient(&src, &mut dx, &mut dy)?;

        // interior pixels see the exact slope
        for row in 1..3 {
            for col in 1..5 {
                assert_relative_eq!(*dx.get([row, col, 0]).unwrap(), 0.5, epsilon = 1e-12);
                assert_relative_eq!(*dy.get([row, col, 0]).unwrap(), -3.0, epsilon = 1e-12);
                assert_relative_eq!(*dx.get([row, col, 1]).unwrap(), -0.5, epsilon = 1e-12);
                assert_relative_eq!(*dy.get([row, col, 1]).unwrap(), 3.0, epsilon = 1e-12);
            }
        }

        // the replicated border halves the response
        assert_relative_eq!(*dx.get([1, 0, 0]).unwrap(), 0.25, epsilon = 1e-12);
        assert_relative_eq!(*dy.get([0, 2, 0]).unwrap(), -1.5, epsilon = 1e-12);

        Ok(())
    }

    #[test]
    fn test_spatial_gradient_size_mismatch() -> Result<(), ImageError> {
        let src = Image::<f64, 1>::from_size_val([4, 4].into(), 1.0)?;
        let mut dx = Image::<f64, 1>::from_size_val([4, 3].into(), 0.0)?;
        let mut dy = Image::<f64, 1>::from_size_val([4, 4].into(), 0.0)?;

        let res = super::spatial_gradient(&src, &mut dx, &mut dy);
        assert_eq!(res, Err(ImageError::InvalidImageSize(4, 4, 4, 3)));

        Ok(())
    }
}
