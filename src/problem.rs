//! The collaborator contract: spherically symmetric likelihood and prior.
//!
//! Modeled after the teacher's `Likelihood<M>: Sync + Clone + fmt::Debug`
//! trait in `likelihood.rs` — a small, `Sync` capability object shared
//! read-only across the drivers (never mutated, never cloned per-sample).

use ndarray::Array1;
use rand::RngCore;

pub mod builtin;

/// The closed-form geometry of a spherically symmetric likelihood/prior
/// pair: the inverse-CDF map from log prior volume to radius, the radial
/// likelihood, and an n-sphere shell sampler.
pub trait Problem: Sync {
    /// Dimensionality of the full parameter space.
    fn n_dim(&self) -> usize;

    /// Monotonic inverse map from log prior volume to radius.
    fn r_given_logx(&self, logx: f64) -> f64;

    /// Likelihood along the radial direction.
    fn logl_given_r(&self, r: f64) -> f64;

    /// Composition of `r_given_logx` and `logl_given_r`, used by the
    /// analytic-reference integrator. Overridable if a collaborator has a
    /// more direct closed form.
    fn logl_given_logx(&self, logx: f64) -> f64 {
        self.logl_given_r(self.r_given_logx(logx))
    }

    /// Uniform sample on the n-sphere of radius `r`, truncated to the first
    /// `dims_to_sample` coordinates.
    fn sample_nsphere_shell(
        &self,
        r: f64,
        dims_to_sample: usize,
        rng: &mut dyn RngCore,
    ) -> Array1<f64>;

    /// Closed-form log-evidence, if available.
    fn logz_analytic(&self) -> Option<f64> {
        None
    }

    /// A log prior volume beyond which the tail contribution to evidence is
    /// negligible, if available.
    fn analytic_logx_terminate(&self) -> Option<f64> {
        None
    }

    /// Closed-form one-tailed credible interval on a single sampled
    /// coordinate, if available. Depends only on `p`, not on which
    /// coordinate, since every `Problem` is spherically symmetric.
    fn param_cred_analytic(&self, _p: f64) -> Option<f64> {
        None
    }

    /// Element-wise `r_given_logx` over a vector of log prior volumes.
    fn r_given_logx_vec(&self, logx: &Array1<f64>) -> Array1<f64> {
        logx.mapv(|x| self.r_given_logx(x))
    }

    /// Element-wise `logl_given_r` over a vector of radii.
    fn logl_given_r_vec(&self, r: &Array1<f64>) -> Array1<f64> {
        r.mapv(|x| self.logl_given_r(x))
    }
}
