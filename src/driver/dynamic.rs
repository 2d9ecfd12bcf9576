//! Dynamic driver (component G): an initial exploratory run followed by
//! iterative importance-driven thread insertion.
//!
//! Batch thread generation uses `rayon::scope`, mirroring the teacher's
//! `runner::runner_builder::Runner::run` parallel-chain fan-out: seeds for
//! each spawned unit are drawn sequentially off the driving RNG before the
//! scope opens (so the `&mut R` borrow never has to be shared across
//! threads), and each unit reseeds its own RNG from that seed.

use crate::error::{Error, Result};
use crate::importance;
use crate::problem::Problem;
use crate::run::Run;
use crate::samples::{Samples, ThreadSamples};
use crate::settings::Settings;
use crate::thread::generate_thread;
use ndarray::Array2;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

fn theta_to_array2(theta: &[Vec<f64>]) -> Array2<f64> {
    let n = theta.len();
    let dims = theta.first().map(|row| row.len()).unwrap_or(0);
    let mut array = Array2::zeros((n, dims));
    for (i, row) in theta.iter().enumerate() {
        for (j, &v) in row.iter().enumerate() {
            array[[i, j]] = v;
        }
    }
    array
}

/// Runs the importance-driven dynamic nested-sampling algorithm against a
/// `Problem`. `settings.dynamic_goal` selects the objective (`0` evidence,
/// `1` parameter estimation, in between a blend); it must be `Some`.
#[derive(Clone)]
pub struct DynamicDriver<'a> {
    problem: &'a dyn Problem,
    settings: Settings,
}

impl<'a> DynamicDriver<'a> {
    /// Build a driver with the given problem and settings.
    pub fn new(problem: &'a dyn Problem, settings: Settings) -> Self {
        Self { problem, settings }
    }

    /// Run the dynamic driver to its (possibly estimated) sample budget.
    pub fn run<R: Rng + SeedableRng>(&self, rng: &mut R) -> Result<Run> {
        self.settings.validate()?;
        let goal = self
            .settings
            .dynamic_goal
            .ok_or_else(|| Error::InvalidSettings("dynamic_goal must be set".into()))?;

        let initial_settings = Settings {
            nlive_const: self.settings.ninit,
            ..self.settings.clone()
        };
        let initial_run =
            super::standard::StandardDriver::new(self.problem, initial_settings).run(rng)?;

        let n_samples_max = self.settings.n_samples_max.unwrap_or_else(|| {
            ((initial_run.len() as f64) * (self.settings.nlive_const as f64)
                / (self.settings.ninit as f64))
                .round() as usize
        });

        let (mut samples, mut thread_min_max) = Samples::from_run(&initial_run);
        let mut next_label = thread_min_max.len() as u64 + 1;

        while samples.len() < n_samples_max {
            let initial_live_threads =
                thread_min_max.iter().filter(|(start, _)| start.is_nan()).count() as u64;
            let nlive_array = samples.nlive_array(initial_live_threads);
            let logw = samples.logw(&nlive_array);
            let nlive_f: Vec<f64> = nlive_array.iter().map(|&n| n as f64).collect();
            let theta = theta_to_array2(&samples.theta);

            let imp = importance::importance(
                &logw,
                &nlive_f,
                &theta,
                goal,
                self.settings.tuned_dynamic_p,
            );

            let above: Vec<usize> = imp
                .iter()
                .enumerate()
                .filter(|(_, &v)| v > self.settings.dynamic_fraction)
                .map(|(i, _)| i)
                .collect();

            let (h_first, h_last) = match (above.first(), above.last()) {
                (Some(&first), Some(&last)) => (first, last),
                _ => {
                    log::debug!("dynamic driver: no sample exceeds dynamic_fraction, stopping early");
                    break;
                }
            };

            let last_index = samples.len() - 1;

            let (birth_logl, birth_idx, logx_start) = if h_first == 0 {
                (None, None, 0.0)
            } else {
                let idx = h_first - 1;
                (Some(samples.logl[idx]), Some(idx), samples.logx[idx])
            };

            let logx_end = if h_last == last_index {
                samples.logx[last_index]
            } else {
                samples.logx[h_last + 1]
            };

            let labels: Vec<u64> = (0..self.settings.nbatch)
                .map(|i| next_label + i as u64)
                .collect();
            next_label += self.settings.nbatch as u64;
            let seeds: Vec<u64> = (0..self.settings.nbatch).map(|_| rng.gen()).collect();

            let problem = self.problem;
            let dims_to_sample = self.settings.dims_to_sample;
            let results: Mutex<Vec<(u64, Result<ThreadSamples>)>> =
                Mutex::new(Vec::with_capacity(self.settings.nbatch));
            rayon::scope(|scope| {
                for (&label, &seed) in labels.iter().zip(seeds.iter()) {
                    let results = &results;
                    scope.spawn(move |_| {
                        let mut local_rng = R::seed_from_u64(seed);
                        let thread = generate_thread(
                            problem,
                            &mut local_rng,
                            logx_start,
                            logx_end,
                            label,
                            dims_to_sample,
                            true,
                        );
                        results.lock().unwrap().push((label, thread));
                    });
                }
            });

            let mut batch = results.into_inner().unwrap();
            batch.sort_by_key(|(label, _)| *label);
            for (_, thread_result) in batch {
                let thread = thread_result?;
                let final_logl = thread.final_logl();
                samples.push_thread(&thread);
                if let Some(idx) = birth_idx {
                    samples.delta_nlive[idx] += 1;
                }
                thread_min_max.push((birth_logl.unwrap_or(f64::NAN), final_logl));
            }

            samples.sort_by_logl();
        }

        log::trace!(
            "dynamic driver finished with {} samples (budget {})",
            samples.len(),
            n_samples_max
        );

        Ok(samples.finalize(thread_min_max, self.settings.clone()))
    }
}
