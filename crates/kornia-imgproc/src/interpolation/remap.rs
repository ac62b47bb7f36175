use crate::parallel;

use super::interpolate::interpolate_pixel;
use super::InterpolationMode;
use kornia_image::{Image, ImageError};

/// Apply generic geometric transformation to an image.
///
/// Every destination pixel `i` is sampled from `src` at `(map_x[i], map_y[i])`.
/// Samples falling outside `[0, cols - 1] x [0, rows - 1]` are set to zero.
///
/// # Arguments
///
/// * `src` - The input image container with shape (height, width, C).
/// * `dst` - The output image container with shape (height, width, C).
/// * `map_x` - The x coordinates of the pixels to interpolate, row-major over `dst`.
/// * `map_y` - The y coordinates of the pixels to interpolate, row-major over `dst`.
/// * `interpolation` - The interpolation mode to use.
///
/// # Errors
///
/// * The map_x and map_y must have one entry per destination pixel.
/// * The source image must not be empty.
pub fn remap<const C: usize>(
    src: &Image<f64, C>,
    dst: &mut Image<f64, C>,
    map_x: &[f64],
    map_y: &[f64],
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    let num_pixels = dst.size().num_pixels();

    if map_x.len() != num_pixels {
        return Err(ImageError::InvalidMapSize(map_x.len(), num_pixels));
    }

    if map_y.len() != num_pixels {
        return Err(ImageError::InvalidMapSize(map_y.len(), num_pixels));
    }

    if src.size().num_pixels() == 0 {
        return Err(ImageError::EmptyImage);
    }

    let (max_x, max_y) = ((src.cols() - 1) as f64, (src.rows() - 1) as f64);

    // parallelize the remap operation by rows
    parallel::par_iter_rows_resample(dst, map_x, map_y, |&x, &y, dst_pixel| {
        // check if the position is within the bounds of the src image
        let inside = x >= 0.0 && x <= max_x && y >= 0.0 && y <= max_y;
        dst_pixel.iter_mut().enumerate().for_each(|(c, pixel)| {
            *pixel = if inside {
                interpolate_pixel(src, x, y, c, interpolation)
            } else {
                0.0
            };
        });
    });

    Ok(())
}
