use faer::{prelude::SpSolver, Col, Mat};

use crate::error::{ensure_dimension, AlignError};

/// Hessians whose reciprocal condition number is below this are treated as singular.
const MIN_RECIPROCAL_CONDITION: f64 = 1e-12;

/// Ratio of the smallest to the largest singular value, zero for a null matrix.
fn reciprocal_condition(hessian: &Mat<f64>) -> f64 {
    let svd = hessian.svd();
    let s = svd.s_diagonal();
    let (min, max) = (0..s.nrows())
        .map(|i| s.read(i))
        .fold((f64::INFINITY, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if max > 0.0 {
        min / max
    } else {
        0.0
    }
}

/// Solve the Gauss-Newton normal equations `hessian * delta_p = sd_delta_p`.
///
/// The Hessian of a least-squares residual is symmetric positive semi-definite, so the
/// system is solved with a Cholesky factorization. Hessians that are singular up to
/// rounding, i.e. whose reciprocal condition number is below `1e-12`, are rejected
/// before factorizing. The returned update is real valued.
///
/// # Arguments
///
/// * `hessian` - The `n_params x n_params` Hessian approximation.
/// * `sd_delta_p` - The steepest descent parameter update of length `n_params`.
///
/// # Errors
///
/// * [`AlignError::DimensionMismatch`] if the Hessian is not square or does not match
///   the update length.
/// * [`AlignError::SingularHessian`] if the Hessian is numerically singular, cannot be
///   factorized or the solution is not finite.
///
/// # Example
///
/// ```
/// use faer::{Col, Mat};
/// use kornia_align::solve_parameter_delta;
///
/// let hessian = Mat::from_fn(2, 2, |i, j| if i == j { 4.0 } else { 0.0 });
/// let sd_delta_p = Col::from_fn(2, |i| 2.0 * (i + 1) as f64);
///
/// let delta_p = solve_parameter_delta(&hessian, &sd_delta_p).unwrap();
/// assert_eq!(delta_p.read(0), 0.5);
/// assert_eq!(delta_p.read(1), 1.0);
/// ```
pub fn solve_parameter_delta(
    hessian: &Mat<f64>,
    sd_delta_p: &Col<f64>,
) -> Result<Col<f64>, AlignError> {
    ensure_dimension("hessian columns", hessian.nrows(), hessian.ncols())?;
    ensure_dimension("steepest descent update", hessian.nrows(), sd_delta_p.nrows())?;

    // rank deficient hessians can still have tiny positive pivots
    let rcond = reciprocal_condition(hessian);
    if rcond.is_nan() || rcond < MIN_RECIPROCAL_CONDITION {
        return Err(AlignError::SingularHessian);
    }

    let cholesky = hessian
        .cholesky(faer::Side::Lower)
        .map_err(|_| AlignError::SingularHessian)?;

    let n_params = sd_delta_p.nrows();
    let rhs = Mat::from_fn(n_params, 1, |i, _| sd_delta_p.read(i));
    let solution = cholesky.solve(rhs);

    // a nearly singular factorization can still overflow
    let delta_p = Col::from_fn(n_params, |i| solution.read(i, 0));
    if (0..n_params).any(|i| !delta_p.read(i).is_finite()) {
        return Err(AlignError::SingularHessian);
    }

    Ok(delta_p)
}

/// Copy a column into a parameter vector.
pub(crate) fn col_to_vec(col: &Col<f64>) -> Vec<f64> {
    (0..col.nrows()).map(|i| col.read(i)).collect()
}

#[cfg(test)]
mod tests {
    use super::solve_parameter_delta;
    use crate::AlignError;
    use approx::assert_relative_eq;
    use faer::{Col, Mat};

    #[test]
    fn test_solve_spd_system() -> Result<(), AlignError> {
        // H = [[4, 2], [2, 3]], x = [1, -2]
        let hessian = Mat::from_fn(2, 2, |i, j| [[4.0, 2.0], [2.0, 3.0]][i][j]);
        let rhs = Col::from_fn(2, |i| [0.0, -4.0][i]);

        let delta_p = solve_parameter_delta(&hessian, &rhs)?;
        assert_relative_eq!(delta_p.read(0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(delta_p.read(1), -2.0, epsilon = 1e-12);

        Ok(())
    }

    #[test]
    fn test_solve_singular() {
        let hessian = Mat::<f64>::zeros(3, 3);
        let rhs = Col::from_fn(3, |i| i as f64);
        assert_eq!(
            solve_parameter_delta(&hessian, &rhs).err(),
            Some(AlignError::SingularHessian)
        );
    }

    #[test]
    fn test_solve_numerically_singular() -> Result<(), AlignError> {
        // positive pivots, but the second direction carries only rounding noise
        let hessian = Mat::from_fn(3, 3, |i, j| match (i, j) {
            (0, 0) | (2, 2) => 2.0e3,
            (1, 1) => 1e-28,
            _ => 0.0,
        });
        let rhs = Col::from_fn(3, |_| 1.0);
        assert_eq!(
            solve_parameter_delta(&hessian, &rhs).err(),
            Some(AlignError::SingularHessian)
        );

        // badly scaled but well posed
        let hessian = Mat::from_fn(2, 2, |i, j| match (i, j) {
            (0, 0) => 1e6,
            (1, 1) => 1.0,
            _ => 0.0,
        });
        let rhs = Col::from_fn(2, |i| [2e6, 3.0][i]);
        let delta_p = solve_parameter_delta(&hessian, &rhs)?;
        assert_relative_eq!(delta_p.read(0), 2.0, epsilon = 1e-9);
        assert_relative_eq!(delta_p.read(1), 3.0, epsilon = 1e-9);

        Ok(())
    }

    #[test]
    fn test_solve_dimension_mismatch() {
        let hessian = Mat::from_fn(2, 2, |i, j| if i == j { 1.0 } else { 0.0 });
        let rhs = Col::from_fn(3, |_| 1.0);
        assert_eq!(
            solve_parameter_delta(&hessian, &rhs).err(),
            Some(AlignError::DimensionMismatch {
                what: "steepest descent update",
                expected: 2,
                actual: 3,
            })
        );

        let hessian = Mat::<f64>::zeros(2, 3);
        assert!(matches!(
            solve_parameter_delta(&hessian, &rhs),
            Err(AlignError::DimensionMismatch { .. })
        ));
    }
}
