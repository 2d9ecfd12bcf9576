//! Thread generator (component D): the trajectory of a single live point
//! across a given log prior-volume interval.
//!
//! Mirrors the teacher's `SteppingAlg::sample` trajectory collection in
//! spirit (`(0..).scan(...)` folding a running model forward one step at a
//! time) but terminates on a threshold rather than a fixed draw count,
//! since each "step" here shrinks prior volume by a random geometric
//! factor rather than taking a fixed-size Markov step.

use crate::error::{Error, Result};
use crate::problem::Problem;
use crate::samples::ThreadSamples;
use rand::Rng;

/// Generate a single-live-point trajectory from `logx_start` down to
/// `logx_end`.
///
/// ```text
/// lx_0 = logx_start + ln(U_0)
/// lx_k = lx_{k-1} + ln(U_k)   while lx_k > logx_end
/// ```
///
/// If `keep_final_point` is false the terminating sample (the first one
/// that falls at or below `logx_end`) is discarded. Fails with
/// `Error::InvalidInterval` if `logx_start <= logx_end`, and with
/// `Error::EmptyThread` if zero points survive.
pub fn generate_thread(
    problem: &dyn Problem,
    rng: &mut impl Rng,
    logx_start: f64,
    logx_end: f64,
    label: u64,
    dims_to_sample: usize,
    keep_final_point: bool,
) -> Result<ThreadSamples> {
    if !(logx_start > logx_end) {
        return Err(Error::InvalidInterval { logx_start, logx_end });
    }

    let mut logx_values = Vec::new();
    let mut current = logx_start;
    loop {
        let u: f64 = rng.gen();
        current += u.ln();
        if current <= logx_end {
            if keep_final_point {
                logx_values.push(current);
            }
            break;
        }
        logx_values.push(current);
    }

    if logx_values.is_empty() {
        return Err(Error::EmptyThread);
    }

    let mut logl = Vec::with_capacity(logx_values.len());
    let mut r = Vec::with_capacity(logx_values.len());
    let mut theta = Vec::with_capacity(logx_values.len());
    for &logx in &logx_values {
        let ri = problem.r_given_logx(logx);
        logl.push(problem.logl_given_r(ri));
        r.push(ri);
        theta.push(
            problem
                .sample_nsphere_shell(ri, dims_to_sample, rng)
                .to_vec(),
        );
    }

    Ok(ThreadSamples {
        logl,
        r,
        logx: logx_values,
        theta,
        label,
    })
}
