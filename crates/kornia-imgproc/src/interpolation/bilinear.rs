use kornia_image::Image;

/// Kernel for bilinear interpolation
///
/// # Arguments
///
/// * `image` - The input image container.
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
/// * `c` - The channel of the pixel to interpolate.
///
/// # Returns
///
/// The interpolated pixel value.
///
/// PRECONDITION: `u` and `v` lie inside `[0, cols - 1] x [0, rows - 1]`.
pub(crate) fn bilinear_interpolation<const C: usize>(
    image: &Image<f64, C>,
    u: f64,
    v: f64,
    c: usize,
) -> f64 {
    let (rows, cols) = (image.rows(), image.cols());

    let iu0 = (u.trunc() as usize).min(cols - 1);
    let iv0 = (v.trunc() as usize).min(rows - 1);

    let frac_u = u.fract();
    let frac_v = v.fract();

    let iu1 = if iu0 + 1 < cols { iu0 + 1 } else { iu0 };
    let iv1 = if iv0 + 1 < rows { iv0 + 1 } else { iv0 };

    let data = image.as_slice();
    let pixel = |iv: usize, iu: usize| data[(iv * cols + iu) * C + c];

    let val00 = pixel(iv0, iu0);
    let val01 = pixel(iv0, iu1);
    let val10 = pixel(iv1, iu0);
    let val11 = pixel(iv1, iu1);

    let frac_uu = 1.0 - frac_u;
    let frac_vv = 1.0 - frac_v;

    val00 * frac_uu * frac_vv
        + val01 * frac_u * frac_vv
        + val10 * frac_uu * frac_v
        + val11 * frac_u * frac_v
}
