//! Standard driver (component E): fixed-`nlive` nested sampling with a
//! geometric-shrinkage volume model and live-evidence termination.
//!
//! Builder idiom follows the teacher's `runner::runner_builder::Runner`:
//! every setter takes `&self` and returns a modified clone, so a driver can
//! be built up as `StandardDriver::new(problem, settings).with_log_interval(500)`.

use crate::error::Result;
use crate::math::{log_sum_exp, log_trapz_factor};
use crate::problem::Problem;
use crate::run::Run;
use crate::samples::Samples;
use crate::settings::Settings;
use rand::Rng;

#[derive(Clone)]
struct LivePoint {
    logx: f64,
    r: f64,
    logl: f64,
    theta: Vec<f64>,
    label: u64,
}

/// Runs the fixed-`nlive` standard nested-sampling loop against a `Problem`.
///
/// `settings.nlive_const` is the live-point count; `settings.termination_fraction`
/// is the live-evidence termination threshold.
#[derive(Clone)]
pub struct StandardDriver<'a> {
    problem: &'a dyn Problem,
    settings: Settings,
    log_interval: u64,
}

impl<'a> StandardDriver<'a> {
    /// Build a driver with the given problem and settings.
    pub fn new(problem: &'a dyn Problem, settings: Settings) -> Self {
        Self {
            problem,
            settings,
            log_interval: 1000,
        }
    }

    /// How many replacement steps between `log::debug!` progress lines.
    /// Pass `0` to disable progress logging entirely.
    pub fn with_log_interval(&self, log_interval: u64) -> Self {
        Self {
            log_interval,
            ..(*self).clone()
        }
    }

    /// Run the standard driver to termination.
    pub fn run(&self, rng: &mut impl Rng) -> Result<Run> {
        self.settings.validate()?;
        let n = self.settings.nlive_const;
        let d = self.settings.dims_to_sample;
        let problem = self.problem;

        let mut live: Vec<LivePoint> = (1..=n as u64)
            .map(|label| {
                let logx: f64 = rng.gen::<f64>().ln();
                let r = problem.r_given_logx(logx);
                let logl = problem.logl_given_r(r);
                let theta = problem.sample_nsphere_shell(r, d, rng).to_vec();
                LivePoint { logx, r, logl, theta, label }
            })
            .collect();

        let mut samples = Samples::with_capacity(n * 8);
        let mut logx_i = 0.0_f64;
        let logtrapz = log_trapz_factor(n as f64);
        let mut logz_dead = f64::NEG_INFINITY;
        let mut final_logl_by_label = vec![f64::NAN; n];
        let mut step: u64 = 0;

        loop {
            let min_idx = live
                .iter()
                .enumerate()
                .min_by(|a, b| {
                    a.1.logl
                        .partial_cmp(&b.1.logl)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .map(|(i, _)| i)
                .expect("live set is never empty");

            let dying = live[min_idx].clone();
            logx_i -= 1.0 / n as f64;
            let contribution = dying.logl + logtrapz + logx_i;
            logz_dead = log_sum_exp(&[logz_dead, contribution]);

            samples.push_row(dying.logl, dying.r, dying.logx, dying.label, 0, dying.theta);
            final_logl_by_label[(dying.label - 1) as usize] = dying.logl;

            let logx_new = dying.logx + rng.gen::<f64>().ln();
            let r_new = problem.r_given_logx(logx_new);
            let logl_new = problem.logl_given_r(r_new);
            let theta_new = problem.sample_nsphere_shell(r_new, d, rng).to_vec();
            live[min_idx] = LivePoint {
                logx: logx_new,
                r: r_new,
                logl: logl_new,
                theta: theta_new,
                label: dying.label,
            };

            step += 1;
            if self.log_interval > 0 && step % self.log_interval == 0 {
                log::debug!(
                    "standard driver: step {}, logz_dead = {:.4}",
                    step,
                    logz_dead
                );
            }

            let live_logls: Vec<f64> = live.iter().map(|p| p.logl).collect();
            let logz_live = log_sum_exp(&live_logls) + logx_i - (n as f64).ln();
            if logz_live - self.settings.termination_fraction.ln() <= logz_dead {
                break;
            }
        }

        live.sort_by(|a, b| {
            a.logl
                .partial_cmp(&b.logl)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        for (j, point) in live.into_iter().enumerate() {
            let delta = if j == 0 { 0 } else { -1 };
            samples.push_row(point.logl, point.r, point.logx, point.label, delta, point.theta);
            final_logl_by_label[(point.label - 1) as usize] = point.logl;
        }

        let thread_min_max: Vec<(f64, f64)> = final_logl_by_label
            .into_iter()
            .map(|logl| (f64::NAN, logl))
            .collect();

        log::trace!(
            "standard driver finished with {} samples, logz_dead = {:.4}",
            samples.len(),
            logz_dead
        );

        Ok(samples.finalize(thread_min_max, self.settings.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::builtin::GaussianGaussian;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn run_produces_non_decreasing_logl_and_telescoping_nlive() {
        let problem = GaussianGaussian::new(2, 1.0, 10.0);
        let settings = Settings::new(2, 30);
        let driver = StandardDriver::new(&problem, settings);
        let mut rng = StdRng::seed_from_u64(5);
        let run = driver.run(&mut rng).unwrap();
        assert!(run.check_invariants(&problem, 1e-6).is_ok());
        let tail = &run.nlive_array[run.nlive_array.len() - 30..];
        for (i, w) in tail.windows(2).enumerate() {
            assert!(w[1] == w[0] - 1, "tail should step down by 1 at index {}", i);
        }
        assert_eq!(*run.nlive_array.last().unwrap(), 1);
    }

    #[test]
    fn thread_labels_form_a_permutation() {
        let problem = GaussianGaussian::new(1, 1.0, 5.0);
        let settings = Settings::new(1, 20);
        let driver = StandardDriver::new(&problem, settings);
        let mut rng = StdRng::seed_from_u64(11);
        let run = driver.run(&mut rng).unwrap();
        let mut labels: Vec<u64> = run.thread_label.clone();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels, (1..=20).collect::<Vec<u64>>());
    }

    #[test]
    fn evidence_is_close_to_analytic_for_wide_prior() {
        let problem = GaussianGaussian::new(1, 1.0, 10.0);
        let settings = Settings::new(1, 50).with_termination_fraction(1e-3);
        let mut rng = StdRng::seed_from_u64(2024);
        let n_runs = 20;
        let analytic = problem.logz_analytic().unwrap();
        let mean: f64 = (0..n_runs)
            .map(|_| {
                StandardDriver::new(&problem, settings.clone())
                    .run(&mut rng)
                    .unwrap()
                    .logz()
            })
            .sum::<f64>()
            / n_runs as f64;
        assert!(
            (mean - analytic).abs() < 1.0,
            "mean logz {} vs analytic {}",
            mean,
            analytic
        );
    }
}
