use serde::{Deserialize, Serialize};

/// Default convergence threshold on the norm of the parameter update.
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// The optimisation method solving for the parameter update of every iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Optimisation {
    /// Gauss-Newton: solve the normal equations `H dp = sd_delta_p`.
    #[default]
    GaussNewton,
}

/// The Lucas-Kanade update rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LucasKanadeAlgorithm {
    /// Additive update of the parameters, gradients taken on the target image.
    ForwardAdditive,
    /// Compose an incremental warp, gradients taken on the warped image.
    ForwardCompositional,
    /// Compose the inverse of an incremental warp, gradients taken once on the template.
    InverseCompositional,
}

/// Structure to define the alignment parameters.
///
/// # Example
///
/// ```
/// use kornia_align::{LucasKanadeConfig, Optimisation};
///
/// let config = LucasKanadeConfig {
///     epsilon: 1e-4,
///     ..Default::default()
/// };
/// assert_eq!(config.optimisation, Optimisation::GaussNewton);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LucasKanadeConfig {
    /// The method solving for the parameter update.
    pub optimisation: Optimisation,
    /// Convergence threshold on the norm of the parameter update, fixed for a session.
    pub epsilon: f64,
}

impl Default for LucasKanadeConfig {
    fn default() -> Self {
        Self {
            optimisation: Optimisation::GaussNewton,
            epsilon: DEFAULT_EPSILON,
        }
    }
}
