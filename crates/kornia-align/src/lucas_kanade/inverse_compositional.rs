use faer::Mat;
use kornia_geometry::Transform;

use super::solve::col_to_vec;
use super::{Iteration, Problem};
use crate::error::AlignError;
use crate::residual::Residual;
use crate::warp::WarpSampler;

/// Everything the inverse compositional update takes from the template alone.
pub(super) struct InverseCompositionalCache {
    pub sdi: Mat<f64>,
    pub hessian: Mat<f64>,
}

/// Steepest descent images from the template gradient and their Hessian, computed once.
pub(super) fn precompute<R, T, W, const C: usize>(
    problem: &Problem<'_, R, T, W, C>,
) -> Result<InverseCompositionalCache, AlignError>
where
    R: Residual<C>,
    T: Transform,
{
    let template = problem.template;
    let dw_dp = problem.initial_transform.jacobian(problem.points);
    let gradient = problem.residual.gradient(template.image())?;
    let sdi = problem
        .residual
        .steepest_descent_images(&gradient, template.mask(), &dw_dp)?;
    let hessian = problem.residual.calculate_hessian(&sdi);

    Ok(InverseCompositionalCache { sdi, hessian })
}

/// One inverse compositional step, `W(x; p) <- W(x; p) o W(x; delta_p)^-1`.
pub(super) fn iterate<R, T, W, const C: usize>(
    problem: &Problem<'_, R, T, W, C>,
    cache: &InverseCompositionalCache,
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

    // template and warped image swap roles with respect to the forward updates
    let sd_delta_p = problem
        .residual
        .steepest_descent_update(&cache.sdi, mask, &iwxp, template.image())?;
    let delta_p = problem.solve(&cache.hessian, &sd_delta_p)?;

    let delta = problem.initial_transform.from_vector(&col_to_vec(&delta_p))?;
    let transform = current.compose(&delta.inverse()?);
    let cost = problem.residual.cost(mask, &iwxp, template.image())?;

    Ok(Iteration {
        transform,
        delta_p,
        hessian: None,
        cost,
    })
}
