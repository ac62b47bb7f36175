use kornia_geometry::Transform;

use super::{Iteration, Problem};
use crate::error::{ensure_dimension, AlignError};
use crate::residual::Residual;
use crate::warp::WarpSampler;

/// One forward additive step, `p <- p + delta_p`.
///
/// The jacobian and the steepest descent images depend on the current parameters, so
/// nothing is cached across iterations.
pub(super) fn iterate<R, T, W, const C: usize>(
    problem: &Problem<'_, R, T, W, C>,
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
    let dw_dp = current.jacobian(problem.points);

    // grad(I) evaluated at W(x; p)
    let gradient = problem
        .residual
        .gradient(problem.image)?
        .warp(problem.warp, template, current)?;

    let sdi = problem
        .residual
        .steepest_descent_images(&gradient, mask, &dw_dp)?;
    let hessian = problem.residual.calculate_hessian(&sdi);

    let sd_delta_p = problem
        .residual
        .steepest_descent_update(&sdi, mask, template.image(), &iwxp)?;
    let delta_p = problem.solve(&hessian, &sd_delta_p)?;

    let mut params = current.as_vector();
    ensure_dimension("parameter update", params.len(), delta_p.nrows())?;
    params
        .iter_mut()
        .enumerate()
        .for_each(|(i, p)| *p += delta_p.read(i));

    let transform = problem.initial_transform.from_vector(&params)?;
    let cost = problem.residual.cost(mask, template.image(), &iwxp)?;

    Ok(Iteration {
        transform,
        delta_p,
        hessian: Some(hessian),
        cost,
    })
}
