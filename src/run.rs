//! `Run`: the immutable, finished record a driver returns.

use crate::error::Error;
use crate::math::log_sum_exp;
use crate::problem::Problem;
use crate::settings::Settings;
use itertools::Itertools;
use ndarray::Array2;

/// A completed nested-sampling run: five parallel columns (in ascending
/// `logl` order), a parameter matrix, and a snapshot of the settings used
/// to produce it.
///
/// Constructed only by [`crate::driver::standard::StandardDriver`] and
/// [`crate::driver::dynamic::DynamicDriver`]; immutable once returned, with
/// no external references apart from its embedded `settings`.
#[derive(Debug, Clone)]
pub struct Run {
    /// Log-likelihood of each sample, non-decreasing.
    pub logl: Vec<f64>,
    /// Radial coordinate of each sample.
    pub r: Vec<f64>,
    /// Log prior-volume coordinate of each sample (thread-local, not
    /// globally monotone across dynamic threads).
    pub logx: Vec<f64>,
    /// Thread label (>=1) that produced each sample.
    pub thread_label: Vec<u64>,
    /// Sampled coordinates, `(n_samples, dims_to_sample)`.
    pub theta: Array2<f64>,
    /// Number of live points active at each sample.
    pub nlive_array: Vec<u64>,
    /// Per thread: `(start_logl_or_nan, end_logl)`, indexed by
    /// `thread_label - 1`.
    pub thread_min_max: Vec<(f64, f64)>,
    /// The settings snapshot used to produce this run.
    pub settings: Settings,
}

impl Run {
    /// Number of samples in the run.
    pub fn len(&self) -> usize {
        self.logl.len()
    }

    /// Whether the run has zero samples.
    pub fn is_empty(&self) -> bool {
        self.logl.is_empty()
    }

    /// Number of threads that began by sampling the whole prior (their
    /// `thread_min_max` start is `NaN`), i.e. `nlive_array[0]` per spec.md
    /// §3's invariant.
    pub fn initial_live_threads(&self) -> usize {
        self.thread_min_max
            .iter()
            .filter(|(start, _)| start.is_nan())
            .count()
    }

    /// Reconstruct `logw` (not stored) via trapezoidal quadrature of the
    /// geometric-shrinkage volume model driven by `nlive_array`.
    pub fn logw(&self) -> Vec<f64> {
        let mut logx_cum = 0.0_f64;
        self.logl
            .iter()
            .zip(&self.nlive_array)
            .map(|(&logl, &nlive)| {
                let nlive = (nlive.max(1)) as f64;
                logx_cum -= 1.0 / nlive;
                logl + crate::math::log_trapz_factor(nlive) + logx_cum
            })
            .collect()
    }

    /// Log-evidence of the run: `logsumexp(logw)`.
    pub fn logz(&self) -> f64 {
        log_sum_exp(&self.logw())
    }

    /// Re-derive every per-row geometric quantity from the problem's
    /// closed forms and compare against the stored columns, within
    /// `tol`. Also checks the `nlive_array` telescoping invariant and (for
    /// a run with a single, whole-prior-born thread per label) that thread
    /// labels partition the samples into contiguous runs of the label.
    ///
    /// Exposed as a reusable property-test helper (spec.md §8) rather than
    /// duplicated inline in every test.
    pub fn check_invariants(&self, problem: &dyn Problem, tol: f64) -> Result<(), Error> {
        if self.logl.is_empty() {
            return Ok(());
        }

        if let Some((i, (prev, next))) = self
            .logl
            .iter()
            .tuple_windows()
            .enumerate()
            .find(|(_, (prev, next))| next < prev)
        {
            return Err(Error::InvalidSettings(format!(
                "logl is not non-decreasing at row {}: {} < {}",
                i + 1,
                next,
                prev
            )));
        }

        for i in 0..self.logl.len() {
            let expected_r = problem.r_given_logx(self.logx[i]);
            if (expected_r - self.r[i]).abs() > tol * expected_r.abs().max(1.0) {
                return Err(Error::NumericalFailure(format!(
                    "row {}: r_given_logx(logx) = {}, stored r = {}",
                    i, expected_r, self.r[i]
                )));
            }
            let expected_logl = problem.logl_given_r(self.r[i]);
            if (expected_logl - self.logl[i]).abs() > tol * expected_logl.abs().max(1.0) {
                return Err(Error::NumericalFailure(format!(
                    "row {}: logl_given_r(r) = {}, stored logl = {}",
                    i, expected_logl, self.logl[i]
                )));
            }
            let norm: f64 = self.theta.row(i).iter().map(|x| x * x).sum::<f64>().sqrt();
            if self.theta.ncols() == problem.n_dim() && (norm - self.r[i]).abs() > tol * self.r[i].max(1.0) {
                return Err(Error::NumericalFailure(format!(
                    "row {}: |theta| = {}, stored r = {}",
                    i, norm, self.r[i]
                )));
            }
        }

        if self.nlive_array.first() != Some(&(self.initial_live_threads() as u64)) {
            return Err(Error::InvalidSettings(
                "nlive_array[0] must equal the number of whole-prior-born threads".into(),
            ));
        }

        let mut last_logl_by_thread: std::collections::HashMap<u64, f64> =
            std::collections::HashMap::new();
        for i in 0..self.logl.len() {
            let label = self.thread_label[i];
            if let Some(&prev) = last_logl_by_thread.get(&label) {
                if self.logl[i] < prev {
                    return Err(Error::InvalidSettings(format!(
                        "thread {} is not monotone in logl at row {}",
                        label, i
                    )));
                }
            }
            last_logl_by_thread.insert(label, self.logl[i]);
        }

        Ok(())
    }
}
