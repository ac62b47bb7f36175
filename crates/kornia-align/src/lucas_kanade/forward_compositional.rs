use kornia_geometry::{Transform, WarpJacobian};

use super::solve::col_to_vec;
use super::{Iteration, Problem};
use crate::error::AlignError;
use crate::residual::Residual;
use crate::warp::WarpSampler;

/// The jacobian of the initial warp at the template points, reused every iteration.
pub(super) fn precompute<R, T, W, const C: usize>(problem: &Problem<'_, R, T, W, C>) -> WarpJacobian
where
    T: Transform,
{
    problem.initial_transform.jacobian(problem.points)
}

/// One forward compositional step, `W(x; p) <- W(x; p) o W(x; delta_p)`.
pub(super) fn iterate<R, T, W, const C: usize>(
    problem: &Problem<'_, R, T, W, C>,
    dw_dp: &WarpJacobian,
    current: &T,
) -> Result<Iteration<T>, AlignError>
where
    R: Residual<C>,
    T: Transform,
    W: WarpSampler<T, C>,
{
    let template = problem.template;
    let mask = template.mask();

    let iwxp = problem.sample(current)?;

    // gradient of the warped image, taken in the template frame
    let gradient = problem.residual.gradient(&iwxp)?;
    let sdi = problem
        .residual
        .steepest_descent_images(&gradient, mask, dw_dp)?;
    let hessian = problem.residual.calculate_hessian(&sdi);

    let sd_delta_p = problem
        .residual
        .steepest_descent_update(&sdi, mask, template.image(), &iwxp)?;
    let delta_p = problem.solve(&hessian, &sd_delta_p)?;

    let delta = problem.initial_transform.from_vector(&col_to_vec(&delta_p))?;
    let transform = current.compose(&delta);
    let cost = problem.residual.cost(mask, template.image(), &iwxp)?;

    Ok(Iteration {
        transform,
        delta_p,
        hessian: Some(hessian),
        cost,
    })
}
