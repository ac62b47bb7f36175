use faer::{Col, Mat};
use kornia_geometry::{Transform, WarpJacobian};
use kornia_image::{Image, ImageError, MaskedImage};

use crate::config::{LucasKanadeAlgorithm, LucasKanadeConfig, Optimisation};
use crate::error::AlignError;
use crate::residual::Residual;
use crate::warp::WarpSampler;

mod forward_additive;
mod forward_compositional;
mod inverse_compositional;
mod solve;

pub use solve::solve_parameter_delta;

use inverse_compositional::InverseCompositionalCache;

/// Default iteration budget of [`LucasKanade::align`].
pub const DEFAULT_MAX_ITERS: usize = 30;

/// Termination state of an alignment session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentStatus {
    /// No alignment has finished yet.
    Running,
    /// The norm of the last parameter update fell below the threshold.
    Converged,
    /// The iteration budget ran out before convergence.
    MaxItersExhausted,
}

/// Quantities computed once per session by the selected update rule.
enum Precomputed {
    ForwardAdditive,
    ForwardCompositional { dw_dp: WarpJacobian },
    InverseCompositional(InverseCompositionalCache),
}

/// The outcome of a single update, not yet committed to the session.
struct Iteration<T> {
    transform: T,
    delta_p: Col<f64>,
    hessian: Option<Mat<f64>>,
    cost: f64,
}

/// Read-only view over the session state an update needs.
struct Problem<'a, R, T, W, const C: usize> {
    template: &'a MaskedImage<f64, C>,
    image: &'a Image<f64, C>,
    residual: &'a R,
    initial_transform: &'a T,
    warp: &'a W,
    points: &'a [[f64; 2]],
    optimisation: Optimisation,
}

impl<R, T, W, const C: usize> Problem<'_, R, T, W, C>
where
    T: Transform,
    W: WarpSampler<T, C>,
{
    /// The target image warped onto the template grid, `I(W(x; p))`.
    fn sample(&self, transform: &T) -> Result<Image<f64, C>, AlignError> {
        self.warp.warp(self.image, self.template, transform)
    }

    fn solve(&self, hessian: &Mat<f64>, sd_delta_p: &Col<f64>) -> Result<Col<f64>, AlignError> {
        match self.optimisation {
            Optimisation::GaussNewton => solve_parameter_delta(hessian, sd_delta_p),
        }
    }
}

/// A Lucas-Kanade alignment session.
///
/// The session aligns a target image to a masked template by iteratively refining the
/// parameters of a transform. The update rule is chosen once at construction with
/// [`LucasKanadeAlgorithm`]; its precomputation runs immediately.
///
/// Every accepted update is appended to the transform history, which starts with the
/// initial transform, so `transform_history().len() == n_iters() + 1` at all times.
///
/// # Example
///
/// ```
/// use kornia_align::{
///     ImageWarp, LucasKanade, LucasKanadeAlgorithm, LucasKanadeConfig, SumSquaredDifferences,
/// };
/// use kornia_geometry::Translation2d;
/// use kornia_image::{Image, ImageMask, MaskedImage};
///
/// let blob = |x: f64, y: f64| (-((x - 16.0).powi(2) + (y - 14.0).powi(2)) / 50.0).exp();
/// let size = [32, 32].into();
///
/// let template = MaskedImage::new(
///     Image::<f64, 1>::from_size_fn(size, |x, y| [blob(x as f64, y as f64)]).unwrap(),
///     ImageMask::from_fn(size, |x, y| (4..28).contains(&x) && (4..28).contains(&y)),
/// )
/// .unwrap();
/// let image = Image::<f64, 1>::from_size_fn(size, |x, y| {
///     [blob(x as f64 - 0.5, y as f64 + 0.25)]
/// })
/// .unwrap();
///
/// let mut lk = LucasKanade::new(
///     &template,
///     &image,
///     SumSquaredDifferences,
///     Translation2d::identity(),
///     ImageWarp::default(),
///     LucasKanadeAlgorithm::InverseCompositional,
///     LucasKanadeConfig::default(),
/// )
/// .unwrap();
///
/// let transform = lk.align(30).unwrap();
/// assert!((transform.t[0] - 0.5).abs() < 0.05);
/// assert!((transform.t[1] + 0.25).abs() < 0.05);
/// ```
pub struct LucasKanade<'a, R, T, W, const C: usize> {
    template: &'a MaskedImage<f64, C>,
    image: &'a Image<f64, C>,
    residual: R,
    initial_transform: T,
    warp: W,
    algorithm: LucasKanadeAlgorithm,
    config: LucasKanadeConfig,
    points: Vec<[f64; 2]>,
    precomputed: Precomputed,
    transforms: Vec<T>,
    hessian: Option<Mat<f64>>,
    error: f64,
    status: AlignmentStatus,
}

impl<'a, R, T, W, const C: usize> LucasKanade<'a, R, T, W, C>
where
    R: Residual<C>,
    T: Transform,
    W: WarpSampler<T, C>,
{
    /// Create an alignment session and run the precomputation of its update rule.
    ///
    /// # Arguments
    ///
    /// * `template` - The template and the mask of the pixels to align.
    /// * `image` - The target image to align to the template.
    /// * `residual` - The residual to minimize.
    /// * `initial_transform` - The starting transform; also decodes parameter vectors.
    /// * `warp` - The sampler pulling the target image onto the template grid.
    /// * `algorithm` - The Lucas-Kanade update rule.
    /// * `config` - The optimisation method and the convergence threshold.
    ///
    /// # Errors
    ///
    /// * If the template, its mask or the target image are empty.
    /// * If the convergence threshold is not strictly positive.
    /// * If the precomputation fails, e.g. the jacobian does not match the mask.
    pub fn new(
        template: &'a MaskedImage<f64, C>,
        image: &'a Image<f64, C>,
        residual: R,
        initial_transform: T,
        warp: W,
        algorithm: LucasKanadeAlgorithm,
        config: LucasKanadeConfig,
    ) -> Result<Self, AlignError> {
        if template.size().num_pixels() == 0 || image.size().num_pixels() == 0 {
            return Err(ImageError::EmptyImage.into());
        }

        if template.mask().count() == 0 {
            return Err(ImageError::EmptyImage.into());
        }

        if config.epsilon.is_nan() || config.epsilon <= 0.0 {
            return Err(AlignError::InvalidEpsilon(config.epsilon));
        }

        let points = template.mask().true_points();

        let problem = Problem {
            template,
            image,
            residual: &residual,
            initial_transform: &initial_transform,
            warp: &warp,
            points: &points,
            optimisation: config.optimisation,
        };

        let precomputed = match algorithm {
            LucasKanadeAlgorithm::ForwardAdditive => Precomputed::ForwardAdditive,
            LucasKanadeAlgorithm::ForwardCompositional => Precomputed::ForwardCompositional {
                dw_dp: forward_compositional::precompute(&problem),
            },
            LucasKanadeAlgorithm::InverseCompositional => {
                Precomputed::InverseCompositional(inverse_compositional::precompute(&problem)?)
            }
        };

        log::debug!(
            "Lucas-Kanade {:?}: {} template points, {} parameters",
            algorithm,
            points.len(),
            initial_transform.n_parameters()
        );

        let transforms = vec![initial_transform.clone()];

        Ok(Self {
            template,
            image,
            residual,
            initial_transform,
            warp,
            algorithm,
            config,
            points,
            precomputed,
            transforms,
            hessian: None,
            error: f64::INFINITY,
            status: AlignmentStatus::Running,
        })
    }

    /// Iterate the update rule until the parameter update is small enough or the
    /// iteration budget runs out.
    ///
    /// At most `max_iters - 1` updates are performed by this call; every update is
    /// appended to the transform history. Running out of budget is not an error: the
    /// best transform is returned and [`LucasKanade::status`] reports
    /// [`AlignmentStatus::MaxItersExhausted`].
    ///
    /// # Arguments
    ///
    /// * `max_iters` - The iteration budget, see [`DEFAULT_MAX_ITERS`].
    ///
    /// # Errors
    ///
    /// * [`AlignError::InvalidIterationBudget`] if `max_iters < 2`.
    /// * [`AlignError::SingularHessian`] if an update cannot be solved for.
    /// * Any error raised by the residual, the warp sampler or the transform.
    ///
    /// On error the history keeps every update accepted before the failure.
    pub fn align(&mut self, max_iters: usize) -> Result<&T, AlignError> {
        if max_iters < 2 {
            return Err(AlignError::InvalidIterationBudget(max_iters));
        }

        let epsilon = self.config.epsilon;
        let mut error = epsilon + 1.0;
        self.status = AlignmentStatus::Running;

        while self.n_iters() < max_iters - 1 && error > epsilon {
            let iteration = self.iterate()?;
            error = iteration.delta_p.norm_l2();

            log::debug!(
                "Iteration {}: |delta_p| = {:e}, cost = {:e}",
                self.n_iters(),
                error,
                iteration.cost
            );

            if iteration.hessian.is_some() {
                self.hessian = iteration.hessian;
            }
            self.transforms.push(iteration.transform);
            self.error = error;
        }

        if self.error <= epsilon {
            log::debug!(
                "Converged after {} iterations, |delta_p| = {:e}",
                self.n_iters(),
                self.error
            );
            self.status = AlignmentStatus::Converged;
        } else {
            log::warn!(
                "Lucas-Kanade did not converge in {} iterations, |delta_p| = {:e} > {:e}",
                self.n_iters(),
                self.error,
                epsilon
            );
            self.status = AlignmentStatus::MaxItersExhausted;
        }

        Ok(self.optimal_transform())
    }

    /// Evaluate the parameter update at the current optimal transform without
    /// committing it to the history.
    ///
    /// # Errors
    ///
    /// The same errors as a single iteration of [`LucasKanade::align`].
    pub fn delta_p(&self) -> Result<Col<f64>, AlignError> {
        Ok(self.iterate()?.delta_p)
    }

    fn iterate(&self) -> Result<Iteration<T>, AlignError> {
        let problem = Problem {
            template: self.template,
            image: self.image,
            residual: &self.residual,
            initial_transform: &self.initial_transform,
            warp: &self.warp,
            points: &self.points,
            optimisation: self.config.optimisation,
        };
        let current = self.optimal_transform();

        match &self.precomputed {
            Precomputed::ForwardAdditive => forward_additive::iterate(&problem, current),
            Precomputed::ForwardCompositional { dw_dp } => {
                forward_compositional::iterate(&problem, dw_dp, current)
            }
            Precomputed::InverseCompositional(cache) => {
                inverse_compositional::iterate(&problem, cache, current)
            }
        }
    }
}

impl<R, T, W, const C: usize> LucasKanade<'_, R, T, W, C> {
    /// Every transform visited so far, starting with the initial transform.
    pub fn transform_history(&self) -> &[T] {
        &self.transforms
    }

    /// The latest transform of the history.
    pub fn optimal_transform(&self) -> &T {
        self.transforms.last().unwrap_or(&self.initial_transform)
    }

    /// The transform the session started from.
    pub fn initial_transform(&self) -> &T {
        &self.initial_transform
    }

    /// Number of updates accepted so far.
    pub fn n_iters(&self) -> usize {
        self.transforms.len().saturating_sub(1)
    }

    /// The Hessian used by the latest update.
    ///
    /// For the inverse compositional rule this is the precomputed Hessian; for the
    /// forward rules it is `None` until the first update.
    pub fn hessian(&self) -> Option<&Mat<f64>> {
        match &self.precomputed {
            Precomputed::InverseCompositional(cache) => Some(&cache.hessian),
            _ => self.hessian.as_ref(),
        }
    }

    /// The precomputed steepest descent images of the inverse compositional rule.
    pub fn steepest_descent_images(&self) -> Option<&Mat<f64>> {
        match &self.precomputed {
            Precomputed::InverseCompositional(cache) => Some(&cache.sdi),
            _ => None,
        }
    }

    /// The termination state of the latest [`LucasKanade::align`] call.
    pub fn status(&self) -> AlignmentStatus {
        self.status
    }

    /// The norm of the latest parameter update, infinite before the first update.
    pub fn error(&self) -> f64 {
        self.error
    }

    /// The convergence threshold.
    pub fn epsilon(&self) -> f64 {
        self.config.epsilon
    }

    /// The update rule of the session.
    pub fn algorithm(&self) -> LucasKanadeAlgorithm {
        self.algorithm
    }

    /// The residual being minimized.
    pub fn residual(&self) -> &R {
        &self.residual
    }

    /// The template being aligned to.
    pub fn template(&self) -> &MaskedImage<f64, C> {
        self.template
    }
}
