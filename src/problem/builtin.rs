//! Reference `Problem` implementations used by tests and doctests.
//!
//! The specific likelihood and prior objects are explicitly out of scope
//! for this crate in production use (they are supplied by a collaborator);
//! these two exist only to exercise and document the [`super::Problem`]
//! trait without depending on that collaborator crate.

use super::Problem;
use ndarray::Array1;
use rand::distributions::Distribution;
use rand::RngCore;
use statrs::distribution::{ChiSquared, ContinuousCDF, Normal};
use std::f64::consts::PI;

/// Geometry shared by any spherically symmetric Gaussian prior: maps log
/// prior volume to radius via the inverse CDF of a scaled chi distribution.
fn r_given_logx_gaussian_prior(logx: f64, n_dim: usize, prior_scale: f64) -> f64 {
    let x = logx.exp().clamp(0.0, 1.0);
    if x <= 0.0 {
        return 0.0;
    }
    let chi2 = ChiSquared::new(n_dim as f64).expect("n_dim > 0 gives a valid ChiSquared");
    let t = chi2.inverse_cdf(x);
    prior_scale * t.sqrt()
}

/// Gaussian likelihood centred at the origin, radius-only form:
/// `L(r) = (2*pi*sigma_L^2)^(-d/2) * exp(-r^2 / (2*sigma_L^2))`.
///
/// Paired with a Gaussian prior of scale `prior_scale`, for which the
/// evidence and posterior credible intervals have closed forms (the
/// product of two zero-mean Gaussians is itself Gaussian).
#[derive(Clone, Debug)]
pub struct GaussianGaussian {
    n_dim: usize,
    likelihood_scale: f64,
    prior_scale: f64,
}

impl GaussianGaussian {
    /// Construct a Gaussian likelihood x Gaussian prior problem.
    pub fn new(n_dim: usize, likelihood_scale: f64, prior_scale: f64) -> Self {
        Self {
            n_dim,
            likelihood_scale,
            prior_scale,
        }
    }

    /// The standard deviation of the Gaussian posterior on a single
    /// parameter: `(sigma_L^-2 + sigma_pi^-2)^(-1/2)`.
    pub fn posterior_scale(&self) -> f64 {
        (self.likelihood_scale.powi(-2) + self.prior_scale.powi(-2)).powf(-0.5)
    }
}

impl Problem for GaussianGaussian {
    fn n_dim(&self) -> usize {
        self.n_dim
    }

    fn r_given_logx(&self, logx: f64) -> f64 {
        r_given_logx_gaussian_prior(logx, self.n_dim, self.prior_scale)
    }

    fn logl_given_r(&self, r: f64) -> f64 {
        let d = self.n_dim as f64;
        let var = self.likelihood_scale * self.likelihood_scale;
        -0.5 * r * r / var - 0.5 * d * (2.0 * PI * var).ln()
    }

    fn sample_nsphere_shell(
        &self,
        r: f64,
        dims_to_sample: usize,
        rng: &mut dyn RngCore,
    ) -> Array1<f64> {
        sample_nsphere_shell(self.n_dim, r, dims_to_sample, rng)
    }

    fn logz_analytic(&self) -> Option<f64> {
        let d = self.n_dim as f64;
        let combined = self.likelihood_scale.powi(2) + self.prior_scale.powi(2);
        Some(-0.5 * d * (2.0 * PI * combined).ln())
    }

    fn analytic_logx_terminate(&self) -> Option<f64> {
        // Conservative: log prior volume at which remaining probability
        // mass under the (narrower) likelihood is numerically negligible.
        Some(-50.0)
    }

    fn param_cred_analytic(&self, p: f64) -> Option<f64> {
        let posterior = Normal::new(0.0, self.posterior_scale()).ok()?;
        Some(posterior.inverse_cdf(p))
    }
}

/// Exponential-power likelihood centred at the origin:
/// `L(r) ∝ exp(-(r / likelihood_scale)^power)`, paired with a Gaussian
/// prior. Has no closed-form evidence, used as a non-Gaussian fixture.
#[derive(Clone, Debug)]
pub struct ExpPowerGaussian {
    n_dim: usize,
    likelihood_scale: f64,
    power: f64,
    prior_scale: f64,
}

impl ExpPowerGaussian {
    /// Construct an exponential-power likelihood x Gaussian prior problem.
    pub fn new(n_dim: usize, likelihood_scale: f64, power: f64, prior_scale: f64) -> Self {
        Self {
            n_dim,
            likelihood_scale,
            power,
            prior_scale,
        }
    }
}

impl Problem for ExpPowerGaussian {
    fn n_dim(&self) -> usize {
        self.n_dim
    }

    fn r_given_logx(&self, logx: f64) -> f64 {
        r_given_logx_gaussian_prior(logx, self.n_dim, self.prior_scale)
    }

    fn logl_given_r(&self, r: f64) -> f64 {
        -(r / self.likelihood_scale).powf(self.power)
    }

    fn sample_nsphere_shell(
        &self,
        r: f64,
        dims_to_sample: usize,
        rng: &mut dyn RngCore,
    ) -> Array1<f64> {
        sample_nsphere_shell(self.n_dim, r, dims_to_sample, rng)
    }

    // logz_analytic and analytic_logx_terminate are left at their `None`
    // defaults: this family has no closed form.
}

/// Draw a uniform point on the n-sphere of radius `r` (in `n_dim`
/// dimensions), returning only the first `dims_to_sample` coordinates.
///
/// Standard normalized-Gaussian construction: draw an n_dim-dimensional
/// standard normal vector, normalize to unit length, scale by `r`.
fn sample_nsphere_shell(
    n_dim: usize,
    r: f64,
    dims_to_sample: usize,
    rng: &mut dyn RngCore,
) -> Array1<f64> {
    let standard_normal = Normal::new(0.0, 1.0).expect("0, 1 is a valid Normal");
    let raw: Vec<f64> = (0..n_dim).map(|_| standard_normal.sample(rng)).collect();
    let norm = raw.iter().map(|x| x * x).sum::<f64>().sqrt();
    let scale = if norm > 0.0 { r / norm } else { 0.0 };
    Array1::from_iter(raw.into_iter().take(dims_to_sample).map(|x| x * scale))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn r_given_logx_is_monotonic_increasing() {
        let problem = GaussianGaussian::new(3, 1.0, 10.0);
        let mut prev = 0.0;
        for logx in [-20.0, -10.0, -5.0, -1.0, -0.01] {
            let r = problem.r_given_logx(logx);
            assert!(r >= prev, "r should increase as logx increases toward 0");
            prev = r;
        }
    }

    #[test]
    fn logl_given_r_decreases_away_from_peak() {
        let problem = GaussianGaussian::new(1, 1.0, 10.0);
        assert!(problem.logl_given_r(0.0) > problem.logl_given_r(1.0));
        assert!(problem.logl_given_r(1.0) > problem.logl_given_r(5.0));
    }

    #[test]
    fn shell_sample_has_norm_r() {
        let problem = GaussianGaussian::new(5, 1.0, 1.0);
        let mut rng = StdRng::seed_from_u64(42);
        let theta = problem.sample_nsphere_shell(2.5, 5, &mut rng);
        let norm = theta.iter().map(|x| x * x).sum::<f64>().sqrt();
        assert_relative_eq!(norm, 2.5, epsilon = 1e-9);
    }

    #[test]
    fn truncated_sample_keeps_only_requested_dims() {
        let problem = GaussianGaussian::new(5, 1.0, 1.0);
        let mut rng = StdRng::seed_from_u64(7);
        let theta = problem.sample_nsphere_shell(2.5, 2, &mut rng);
        assert_eq!(theta.len(), 2);
    }

    #[test]
    fn exp_power_gaussian_has_no_analytic_evidence() {
        let problem = ExpPowerGaussian::new(2, 1.0, 1.5, 5.0);
        assert!(problem.logz_analytic().is_none());
    }

    #[test]
    fn param_cred_analytic_is_zero_at_median() {
        let problem = GaussianGaussian::new(3, 1.0, 10.0);
        assert_relative_eq!(problem.param_cred_analytic(0.5).unwrap(), 0.0, epsilon = 1e-9);
        assert!(problem.param_cred_analytic(0.975).unwrap() > 0.0);
    }
}
