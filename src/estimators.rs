//! Estimators (component H): a tagged family of posterior estimators, each
//! consuming `logw` and a finished [`crate::run::Run`], with an optional
//! closed-form reference value.
//!
//! Generalizes the teacher's `StatisticValue`/`Summarizer` pair
//! (`statistics.rs`, `summary.rs`) — two ad hoc variants tied to MCMC
//! diagnostics — into the complete capability-checked family spec.md §9
//! calls for: a tagged enum where each variant knows which capabilities
//! (`estimate`, `analytical`) it has, rather than a trait object reached for
//! per estimator instance.

use crate::error::{Error, Result};
use crate::importance::relative_weights;
use crate::integrate;
use crate::math::log_sum_exp;
use crate::problem::Problem;
use crate::run::Run;
use crate::settings::{validate_probability, Settings};

/// A single posterior or evidence estimator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Estimator {
    /// Log-evidence: `logsumexp(logw)`.
    LogZ,
    /// Evidence: `exp(LogZ)`.
    Z,
    /// Number of samples in the run.
    NumSamples,
    /// Weighted mean radius.
    RadialMean,
    /// Weighted mean of sampled coordinate `k`.
    ParamMean(usize),
    /// Weighted mean of sampled coordinate `k` squared.
    ParamSquaredMean(usize),
    /// One-tailed credible radius at probability `p`.
    RadialCred(f64),
    /// One-tailed credible value of sampled coordinate `k` at probability `p`.
    ParamCred(f64, usize),
}

/// Linearly interpolate `(xs, ys)` (sorted ascending by `xs`) to find `y` at
/// `cdf = target`, used by the one-tailed credible-interval estimators.
fn interpolate_cred(values: &[f64], cdf: &[f64], target: f64) -> f64 {
    if target <= cdf[0] {
        return values[0];
    }
    if target >= *cdf.last().unwrap() {
        return *values.last().unwrap();
    }
    for i in 1..cdf.len() {
        if cdf[i] >= target {
            let t = (target - cdf[i - 1]) / (cdf[i] - cdf[i - 1]);
            return values[i - 1] + t * (values[i] - values[i - 1]);
        }
    }
    *values.last().unwrap()
}

/// Sort `(values, w)` pairs by `values` ascending and return the
/// skew-corrected, normalized CDF (`cumsum(w) - w[0]/2`, divided by
/// `sum(w)`) alongside the sorted values. Kept separate from
/// [`raw_cdf`] per spec.md §9's "expose the raw CDF for testing" note.
fn sorted_cdf(values: &[f64], w: &[f64], skew_correct: bool) -> (Vec<f64>, Vec<f64>) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap());
    let sorted_values: Vec<f64> = order.iter().map(|&i| values[i]).collect();
    let sorted_w: Vec<f64> = order.iter().map(|&i| w[i]).collect();
    let total: f64 = sorted_w.iter().sum();
    let mut cumsum = 0.0;
    let cdf: Vec<f64> = sorted_w
        .iter()
        .map(|&wi| {
            cumsum += wi;
            let correction = if skew_correct { sorted_w[0] / 2.0 } else { 0.0 };
            (cumsum - correction) / total
        })
        .collect();
    (sorted_values, cdf)
}

impl Estimator {
    /// Short, stable identifier (used as a table column key).
    pub fn name(&self) -> String {
        match self {
            Estimator::LogZ => "logz".to_string(),
            Estimator::Z => "z".to_string(),
            Estimator::NumSamples => "n_samples".to_string(),
            Estimator::RadialMean => "r_mean".to_string(),
            Estimator::ParamMean(k) => format!("theta{}_mean", k),
            Estimator::ParamSquaredMean(k) => format!("theta{}_sq_mean", k),
            Estimator::RadialCred(p) => format!("r_cred_{}", p),
            Estimator::ParamCred(p, k) => format!("theta{}_cred_{}", k, p),
        }
    }

    /// Human-readable display label.
    pub fn label(&self) -> String {
        match self {
            Estimator::LogZ => "log(Z)".to_string(),
            Estimator::Z => "Z".to_string(),
            Estimator::NumSamples => "# samples".to_string(),
            Estimator::RadialMean => "mean(|theta|)".to_string(),
            Estimator::ParamMean(k) => format!("mean(theta[{}])", k),
            Estimator::ParamSquaredMean(k) => format!("mean(theta[{}]^2)", k),
            Estimator::RadialCred(p) => format!("credible(|theta|, p={})", p),
            Estimator::ParamCred(p, k) => format!("credible(theta[{}], p={})", k, p),
        }
    }

    /// Evaluate this estimator on a run given its reconstructed `logw`.
    pub fn estimate(&self, logw: &[f64], run: &Run) -> Result<f64> {
        match self {
            Estimator::LogZ => Ok(log_sum_exp(logw)),
            Estimator::Z => Ok(log_sum_exp(logw).exp()),
            Estimator::NumSamples => Ok(logw.len() as f64),
            Estimator::RadialMean => {
                let w = relative_weights(logw);
                let weight_sum: f64 = w.iter().sum();
                let weighted: f64 = w.iter().zip(&run.r).map(|(&wi, &ri)| wi * ri).sum();
                Ok(weighted / weight_sum)
            }
            Estimator::ParamMean(k) => {
                let w = relative_weights(logw);
                let weight_sum: f64 = w.iter().sum();
                let weighted: f64 = w
                    .iter()
                    .zip(run.theta.column(*k).iter())
                    .map(|(&wi, &ti)| wi * ti)
                    .sum();
                Ok(weighted / weight_sum)
            }
            Estimator::ParamSquaredMean(k) => {
                let w = relative_weights(logw);
                let weight_sum: f64 = w.iter().sum();
                let weighted: f64 = w
                    .iter()
                    .zip(run.theta.column(*k).iter())
                    .map(|(&wi, &ti)| wi * ti * ti)
                    .sum();
                Ok(weighted / weight_sum)
            }
            Estimator::RadialCred(p) => {
                validate_probability(*p)?;
                let w = relative_weights(logw);
                let (values, cdf) = sorted_cdf(&run.r, &w, true);
                Ok(interpolate_cred(&values, &cdf, *p))
            }
            Estimator::ParamCred(p, k) => {
                validate_probability(*p)?;
                let w = relative_weights(logw);
                let values: Vec<f64> = run.theta.column(*k).to_vec();
                let (sorted_values, cdf) = sorted_cdf(&values, &w, true);
                Ok(interpolate_cred(&sorted_values, &cdf, *p))
            }
        }
    }

    /// The uncorrected CDF (no `- w[0]/2` skew correction), exposed for
    /// testing per spec.md §9.
    pub fn raw_cdf(&self, logw: &[f64], run: &Run) -> Result<Vec<f64>> {
        let w = relative_weights(logw);
        match self {
            Estimator::RadialCred(_) => Ok(sorted_cdf(&run.r, &w, false).1),
            Estimator::ParamCred(_, k) => {
                let values: Vec<f64> = run.theta.column(*k).to_vec();
                Ok(sorted_cdf(&values, &w, false).1)
            }
            _ => Err(Error::NotApplicable),
        }
    }

    /// Closed-form reference value, if the problem/settings combination
    /// supports one.
    pub fn analytical(&self, problem: &dyn Problem, settings: &Settings) -> Result<f64> {
        match self {
            Estimator::LogZ => problem.logz_analytic().ok_or(Error::NotApplicable),
            Estimator::Z => problem.logz_analytic().map(f64::exp).ok_or(Error::NotApplicable),
            Estimator::NumSamples => Err(Error::NotApplicable),
            Estimator::RadialMean => Ok(0.0),
            Estimator::ParamMean(_) => Ok(0.0),
            Estimator::ParamSquaredMean(k) => {
                let _ = k;
                param_squared_mean_analytic(problem, settings)
            }
            Estimator::RadialCred(_) => Err(Error::NotApplicable),
            Estimator::ParamCred(p, _) => {
                problem.param_cred_analytic(*p).ok_or(Error::NotApplicable)
            }
        }
    }
}

/// `∫ e^{logl(logx)+logx} · r(logx)^2 / n_dim dlogx / Z` over
/// `[logx_terminate, 0]`, the analytic reference value shared by every
/// `ParamSquaredMean(k)` (spherical symmetry makes it independent of `k`).
fn param_squared_mean_analytic(problem: &dyn Problem, settings: &Settings) -> Result<f64> {
    let logx_terminate = settings
        .logx_terminate
        .or_else(|| problem.analytic_logx_terminate())
        .ok_or_else(|| {
            Error::NumericalFailure("no logx_terminate available for analytic integration".into())
        })?;
    let n_dim = settings.n_dim as f64;

    let numerator = integrate::adaptive_quad(
        |logx| {
            let logl = problem.logl_given_logx(logx);
            let r = problem.r_given_logx(logx);
            (logl + logx).exp() * r * r / n_dim
        },
        logx_terminate,
        0.0,
        1e-8,
    )?;

    let z = match problem.logz_analytic() {
        Some(logz) => logz.exp(),
        None => integrate::adaptive_quad(
            |logx| (problem.logl_given_logx(logx) + logx).exp(),
            logx_terminate,
            0.0,
            1e-8,
        )?,
    };

    Ok(numerator / z)
}

/// Evaluate `estimator.analytical(...)` for a whole table of estimators,
/// substituting `f64::NAN` for any that return `Error::NotApplicable`
/// rather than failing the whole table. Mirrors the original's
/// `try/except` around `est.analytical(settings)`, ported to `Result`.
pub fn reference_table(
    estimators: &[Estimator],
    problem: &dyn Problem,
    settings: &Settings,
) -> Vec<(String, f64)> {
    estimators
        .iter()
        .map(|est| {
            let value = match est.analytical(problem, settings) {
                Ok(v) => v,
                Err(Error::NotApplicable) => f64::NAN,
                Err(_) => f64::NAN,
            };
            (est.name(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::standard::StandardDriver;
    use crate::problem::builtin::GaussianGaussian;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_run() -> (GaussianGaussian, Run) {
        let problem = GaussianGaussian::new(1, 1.0, 10.0);
        let settings = Settings::new(1, 100);
        let driver = StandardDriver::new(&problem, settings);
        let mut rng = StdRng::seed_from_u64(3);
        let run = driver.run(&mut rng).unwrap();
        (problem, run)
    }

    #[test]
    fn logz_estimate_matches_run_logz() {
        let (_problem, run) = sample_run();
        let logw = run.logw();
        let est = Estimator::LogZ.estimate(&logw, &run).unwrap();
        assert_relative_eq!(est, run.logz(), epsilon = 1e-9);
    }

    #[test]
    fn radial_mean_analytical_is_zero() {
        let (problem, _run) = sample_run();
        let settings = Settings::new(1, 100);
        assert_relative_eq!(
            Estimator::RadialMean.analytical(&problem, &settings).unwrap(),
            0.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn credible_interval_is_monotone_in_p() {
        let (_problem, run) = sample_run();
        let logw = run.logw();
        let low = Estimator::RadialCred(0.1).estimate(&logw, &run).unwrap();
        let mid = Estimator::RadialCred(0.5).estimate(&logw, &run).unwrap();
        let high = Estimator::RadialCred(0.9).estimate(&logw, &run).unwrap();
        assert!(low <= mid);
        assert!(mid <= high);
    }

    #[test]
    fn rejects_out_of_range_probability() {
        let (_problem, run) = sample_run();
        let logw = run.logw();
        assert!(matches!(
            Estimator::RadialCred(1.5).estimate(&logw, &run),
            Err(Error::InvalidSettings(_))
        ));
    }

    #[test]
    fn reference_table_substitutes_nan_for_not_applicable() {
        let (problem, _run) = sample_run();
        let settings = Settings::new(1, 100);
        let table = reference_table(&[Estimator::NumSamples], &problem, &settings);
        assert!(table[0].1.is_nan());
    }

    #[test]
    fn param_squared_mean_analytical_matches_closed_form() {
        let problem = GaussianGaussian::new(1, 1.0, 10.0);
        let settings = Settings::new(1, 100);
        let sigma2 = problem.posterior_scale().powi(2);
        let analytic = Estimator::ParamSquaredMean(0)
            .analytical(&problem, &settings)
            .unwrap();
        assert_relative_eq!(analytic, sigma2, max_relative = 1e-3);
    }
}
