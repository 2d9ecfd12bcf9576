//! `Samples`: the growable structure-of-arrays builder a driver accumulates
//! rows into before finalizing a [`crate::run::Run`].
//!
//! Kept as parallel `Vec`s (plus a `Vec<Vec<f64>>` for `theta`, flattened
//! into an `ndarray::Array2` only at [`Samples::finalize`]) rather than a
//! `Vec` of per-sample structs, per the "cyclic shared state" design note:
//! this layout makes the stable sort by `logl` and the prefix-sum
//! reconstruction of `nlive_array` cheap operations over contiguous slices.

use crate::math::log_trapz_factor;
use crate::run::Run;
use crate::settings::Settings;
use ndarray::Array2;

/// One fully materialized single-live-point trajectory, ready to be
/// appended to a [`Samples`] builder.
#[derive(Debug, Clone)]
pub struct ThreadSamples {
    /// Log-likelihoods along the thread, in the order generated (i.e.
    /// increasing, since nested sampling only ever moves to higher
    /// likelihood).
    pub logl: Vec<f64>,
    /// Radii along the thread.
    pub r: Vec<f64>,
    /// Log prior volumes along the thread (strictly decreasing).
    pub logx: Vec<f64>,
    /// Sampled coordinates, one row per sample.
    pub theta: Vec<Vec<f64>>,
    /// Thread label assigned to every row.
    pub label: u64,
}

impl ThreadSamples {
    /// Number of samples in this thread.
    pub fn len(&self) -> usize {
        self.logl.len()
    }

    /// Whether the thread retained zero samples.
    pub fn is_empty(&self) -> bool {
        self.logl.is_empty()
    }

    /// The log-likelihood of the thread's final (highest) retained sample.
    pub fn final_logl(&self) -> f64 {
        *self.logl.last().expect("thread is non-empty")
    }
}

/// Growable structure-of-arrays accumulator used by the drivers while a run
/// is in progress.
#[derive(Debug, Clone, Default)]
pub struct Samples {
    /// Log-likelihood column, not yet necessarily sorted.
    pub logl: Vec<f64>,
    /// Radial coordinate column.
    pub r: Vec<f64>,
    /// Log prior volume column (thread-local, not globally monotone).
    pub logx: Vec<f64>,
    /// Thread label column.
    pub thread_label: Vec<u64>,
    /// Net live-point births (+1) minus deaths (-1) at this row.
    pub delta_nlive: Vec<i64>,
    /// Sampled coordinates, one row per sample.
    pub theta: Vec<Vec<f64>>,
}

impl Samples {
    /// An empty builder with row capacity pre-reserved for `n` samples,
    /// avoiding amortized reallocation while the dynamic driver grows and
    /// repeatedly sorts the matrix (spec.md §5).
    pub fn with_capacity(n: usize) -> Self {
        Self {
            logl: Vec::with_capacity(n),
            r: Vec::with_capacity(n),
            logx: Vec::with_capacity(n),
            thread_label: Vec::with_capacity(n),
            delta_nlive: Vec::with_capacity(n),
            theta: Vec::with_capacity(n),
        }
    }

    /// Number of rows currently held.
    pub fn len(&self) -> usize {
        self.logl.len()
    }

    /// Whether the builder holds no rows.
    pub fn is_empty(&self) -> bool {
        self.logl.is_empty()
    }

    /// Append a single row, returning its index.
    pub fn push_row(
        &mut self,
        logl: f64,
        r: f64,
        logx: f64,
        thread_label: u64,
        delta_nlive: i64,
        theta: Vec<f64>,
    ) -> usize {
        let idx = self.len();
        self.logl.push(logl);
        self.r.push(r);
        self.logx.push(logx);
        self.thread_label.push(thread_label);
        self.delta_nlive.push(delta_nlive);
        self.theta.push(theta);
        idx
    }

    /// Append every row of a completed thread, marking the change-in-nlive
    /// column as `-1` on the final retained sample and `0` elsewhere, per
    /// the thread generator's contract.
    pub fn push_thread(&mut self, thread: &ThreadSamples) -> std::ops::Range<usize> {
        let start = self.len();
        let n = thread.len();
        for i in 0..n {
            let delta = if i + 1 == n { -1 } else { 0 };
            self.push_row(
                thread.logl[i],
                thread.r[i],
                thread.logx[i],
                thread.label,
                delta,
                thread.theta[i].clone(),
            );
        }
        start..self.len()
    }

    /// Stable-sort every column by `logl` ascending, preserving relative
    /// order of ties (required so ties within a thread remain contiguous).
    pub fn sort_by_logl(&mut self) {
        let n = self.len();
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| {
            self.logl[a]
                .partial_cmp(&self.logl[b])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        self.logl = order.iter().map(|&i| self.logl[i]).collect();
        self.r = order.iter().map(|&i| self.r[i]).collect();
        self.logx = order.iter().map(|&i| self.logx[i]).collect();
        self.thread_label = order.iter().map(|&i| self.thread_label[i]).collect();
        self.delta_nlive = order.iter().map(|&i| self.delta_nlive[i]).collect();
        self.theta = order.iter().map(|&i| self.theta[i].clone()).collect();
    }

    /// Reconstruct `nlive_array` from the `delta_nlive` column and the
    /// count of threads that began by sampling the whole prior (spec.md
    /// §3's telescoping invariant).
    pub fn nlive_array(&self, initial_live_threads: u64) -> Vec<u64> {
        let mut nlive = initial_live_threads as i64;
        self.delta_nlive
            .iter()
            .map(|&delta| {
                nlive += delta;
                nlive.max(0) as u64
            })
            .collect()
    }

    /// Reconstruct `logw` from `logl` and a (caller-supplied or
    /// self-derived) `nlive_array`, by trapezoidal quadrature of the
    /// geometric-shrinkage volume model: the global prior-volume pointer
    /// shrinks by `1/nlive(i)` at each row regardless of which thread
    /// produced it. This is the same bookkeeping the standard driver
    /// performs inline for a fixed `nlive` (§4.C), generalized to a
    /// varying local live count.
    pub fn logw(&self, nlive_array: &[u64]) -> Vec<f64> {
        let mut logx_cum = 0.0_f64;
        self.logl
            .iter()
            .zip(nlive_array)
            .map(|(&logl, &nlive)| {
                let nlive = nlive.max(1) as f64;
                logx_cum -= 1.0 / nlive;
                logl + log_trapz_factor(nlive) + logx_cum
            })
            .collect()
    }

    /// Rebuild a growable `Samples` (plus its `thread_min_max` table) from
    /// a finished `Run`, for the dynamic driver's initial-exploratory-run
    /// step. The inverse of [`Samples::finalize`].
    pub fn from_run(run: &Run) -> (Self, Vec<(f64, f64)>) {
        let n = run.len();
        let mut delta_nlive = vec![0_i64; n];
        let mut prev = run.initial_live_threads() as i64;
        for i in 0..n {
            let cur = run.nlive_array[i] as i64;
            delta_nlive[i] = cur - prev;
            prev = cur;
        }
        let theta: Vec<Vec<f64>> = run
            .theta
            .outer_iter()
            .map(|row| row.to_vec())
            .collect();
        let samples = Self {
            logl: run.logl.clone(),
            r: run.r.clone(),
            logx: run.logx.clone(),
            thread_label: run.thread_label.clone(),
            delta_nlive,
            theta,
        };
        (samples, run.thread_min_max.clone())
    }

    /// Consume the builder into a finished, immutable [`Run`]. Rows are
    /// assumed to already be sorted by `logl`.
    pub fn finalize(self, thread_min_max: Vec<(f64, f64)>, settings: Settings) -> Run {
        let n = self.len();
        let dims = self.theta.first().map(|row| row.len()).unwrap_or(0);
        let mut theta = Array2::zeros((n, dims));
        for (i, row) in self.theta.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                theta[[i, j]] = v;
            }
        }
        let initial_live_threads = thread_min_max
            .iter()
            .filter(|(start, _)| start.is_nan())
            .count() as u64;
        let nlive_array = self.nlive_array(initial_live_threads);
        Run {
            logl: self.logl,
            r: self.r,
            logx: self.logx,
            thread_label: self.thread_label,
            theta,
            nlive_array,
            thread_min_max,
            settings,
        }
    }
}
