/// Create a sobel kernel.
///
/// # Returns
///
/// The separable (derivative, smoothing) pair of the 3-tap sobel kernel.
pub fn sobel_kernel_1d() -> ([f64; 3], [f64; 3]) {
    ([-1.0, 0.0, 1.0], [1.0, 2.0, 1.0])
}

/// Create the 3x3 sobel kernels normalized to unit gain.
///
/// The kernels are scaled by `1/8` so that the response to a ramp of slope one is one,
/// i.e. the output is a derivative in intensity units per pixel.
///
/// # Returns
///
/// The `(kernel_x, kernel_y)` pair indexed as `kernel[row][col]`.
pub fn normalized_sobel_kernel3() -> ([[f64; 3]; 3], [[f64; 3]; 3]) {
    let (derivative, smoothing) = sobel_kernel_1d();
    let mut kernel_x = [[0.0; 3]; 3];
    let mut kernel_y = [[0.0; 3]; 3];
    for r in 0..3 {
        for c in 0..3 {
            kernel_x[r][c] = smoothing[r] * derivative[c] / 8.0;
            kernel_y[r][c] = derivative[r] * smoothing[c] / 8.0;
        }
    }
    (kernel_x, kernel_y)
}
