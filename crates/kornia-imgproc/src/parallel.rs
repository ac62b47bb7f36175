use rayon::prelude::*;

use kornia_image::Image;

/// Apply a function to each pixel of the destination image in parallel by rows,
/// passing along the coordinates it should be sampled from.
///
/// PRECONDITION: `map_x` and `map_y` hold one entry per destination pixel.
pub fn par_iter_rows_resample<const C: usize>(
    dst: &mut Image<f64, C>,
    map_x: &[f64],
    map_y: &[f64],
    f: impl Fn(&f64, &f64, &mut [f64]) + Send + Sync,
) {
    let cols = dst.cols();
    if cols == 0 {
        return;
    }

    dst.as_slice_mut()
        .par_chunks_exact_mut(C * cols)
        .zip(map_x.par_chunks_exact(cols))
        .zip(map_y.par_chunks_exact(cols))
        .for_each(|((dst_chunk, map_x_chunk), map_y_chunk)| {
            dst_chunk
                .chunks_exact_mut(C)
                .zip(map_x_chunk.iter().zip(map_y_chunk.iter()))
                .for_each(|(dst_pixel, (x, y))| {
                    f(x, y, dst_pixel);
                });
        });
}
