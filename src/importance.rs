//! Importance functions (component F): per-sample scalars in `[0, 1]`
//! steering the dynamic driver toward the regions of greatest marginal
//! benefit for its chosen goal.
//!
//! Generalizes the teacher's single-purpose diagnostic functions
//! (`diagnostics::rhat`, a pure function of a vector of chains) into a
//! small family of pure functions over a run's weight column.

use ndarray::Array2;

/// Normalize relative weights `w[i] = exp(logw[i] - max(logw))`.
pub fn relative_weights(logw: &[f64]) -> Vec<f64> {
    let max = logw.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    logw.iter().map(|&x| (x - max).exp()).collect()
}

fn max_normalize(mut xs: Vec<f64>) -> Vec<f64> {
    let max = xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if max > 0.0 {
        for x in xs.iter_mut() {
            *x /= max;
        }
    }
    xs
}

/// Tail cumulative weight divided by the local live-point count, rescaled
/// to a maximum of 1. This is the evidence-accuracy importance.
pub fn z_importance(w: &[f64], nlive: &[f64]) -> Vec<f64> {
    let mut cumsum = 0.0;
    let cumulative: Vec<f64> = w
        .iter()
        .map(|&wi| {
            cumsum += wi;
            cumsum
        })
        .collect();
    let total = cumulative.last().cloned().unwrap_or(0.0);
    let tail: Vec<f64> = cumulative
        .iter()
        .zip(nlive)
        .map(|(&c, &n)| (total - c) / n.max(1.0))
        .collect();
    max_normalize(tail)
}

/// The `exact=true` weighting from the original implementation
/// (`((nlive^2 - 3) * nlive^1.5) / ((nlive+1)^3 * (nlive+2)^1.5)`, blended
/// with a `w * nlive^0.5 / (nlive+2)^1.5` term). Reachable only via
/// internal callers never enabled in the source this crate is ported from;
/// preserved here for parity but not wired into [`crate::driver::dynamic`]'s
/// default importance path. See spec.md §9.
pub fn z_importance_exact(w: &[f64], nlive: &[f64]) -> Vec<f64> {
    let mut cumsum = 0.0;
    let cumulative: Vec<f64> = w
        .iter()
        .map(|&wi| {
            cumsum += wi;
            cumsum
        })
        .collect();
    let total = cumulative.last().cloned().unwrap_or(0.0);
    let tail: Vec<f64> = cumulative.iter().map(|&c| total - c).collect();
    let weighted: Vec<f64> = tail
        .iter()
        .zip(nlive)
        .zip(w)
        .map(|((&t, &n), &wi)| {
            let term_a = t * ((n * n - 3.0) * n.powf(1.5)) / ((n + 1.0).powi(3) * (n + 2.0).powf(1.5));
            let term_b = wi * n.sqrt() / (n + 2.0).powf(1.5);
            term_a + term_b
        })
        .collect();
    max_normalize(weighted)
}

/// Parameter-estimation importance. Untuned: `w / max(w)`. Tuned
/// (`tuning_type = "theta1"`): weight by `|f - f_bar| * w` where `f` is the
/// first sampled coordinate, normalized to a maximum of 1.
pub fn p_importance(theta: &Array2<f64>, w: &[f64], tuned: bool) -> Vec<f64> {
    if !tuned {
        return max_normalize(w.to_vec());
    }
    let f: Vec<f64> = theta.column(0).to_vec();
    let weighted_sum: f64 = f.iter().zip(w).map(|(&fi, &wi)| fi * wi).sum();
    let weight_sum: f64 = w.iter().sum();
    let f_bar = if weight_sum > 0.0 {
        weighted_sum / weight_sum
    } else {
        0.0
    };
    let weighted: Vec<f64> = f
        .iter()
        .zip(w)
        .map(|(&fi, &wi)| (fi - f_bar).abs() * wi)
        .collect();
    max_normalize(weighted)
}

/// Blend evidence- and parameter-importance by `goal` (`0` => pure
/// evidence, `1` => pure parameter), each normalized by its own sum before
/// blending, then rescaled to a maximum of 1.
pub fn blended_importance(z_importance: &[f64], p_importance: &[f64], goal: f64) -> Vec<f64> {
    let z_sum: f64 = z_importance.iter().sum();
    let p_sum: f64 = p_importance.iter().sum();
    let blended: Vec<f64> = z_importance
        .iter()
        .zip(p_importance)
        .map(|(&zi, &pi)| {
            let z_norm = if z_sum > 0.0 { zi / z_sum } else { 0.0 };
            let p_norm = if p_sum > 0.0 { pi / p_sum } else { 0.0 };
            (1.0 - goal) * z_norm + goal * p_norm
        })
        .collect();
    max_normalize(blended)
}

/// Dispatch on `dynamic_goal`: `0` => [`z_importance`], `1` =>
/// [`p_importance`], otherwise the [`blended_importance`] of both.
pub fn importance(
    logw: &[f64],
    nlive: &[f64],
    theta: &Array2<f64>,
    goal: f64,
    tuned: bool,
) -> Vec<f64> {
    let w = relative_weights(logw);
    if goal <= 0.0 {
        z_importance(&w, nlive)
    } else if goal >= 1.0 {
        p_importance(theta, &w, tuned)
    } else {
        let z = z_importance(&w, nlive);
        let p = p_importance(theta, &w, tuned);
        blended_importance(&z, &p, goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn z_importance_is_one_at_last_sample_max() {
        let w = vec![1.0, 1.0, 1.0, 1.0];
        let nlive = vec![4.0, 4.0, 4.0, 4.0];
        let imp = z_importance(&w, &nlive);
        let max = imp.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert_relative_eq!(max, 1.0, epsilon = 1e-12);
        // tail cumulative weight decreases monotonically, so importance
        // should be non-increasing along the run.
        for w in imp.windows(2) {
            assert!(w[0] >= w[1] - 1e-12);
        }
    }

    #[test]
    fn untuned_p_importance_is_weights_normalized() {
        let theta = Array2::from_shape_vec((3, 1), vec![1.0, 2.0, 3.0]).unwrap();
        let w = vec![0.5, 1.0, 0.25];
        let imp = p_importance(&theta, &w, false);
        assert_eq!(imp, vec![0.5, 1.0, 0.25]);
    }

    #[test]
    fn tuned_p_importance_peaks_away_from_mean() {
        let theta = Array2::from_shape_vec((3, 1), vec![-10.0, 0.0, 10.0]).unwrap();
        let w = vec![1.0, 1.0, 1.0];
        let imp = p_importance(&theta, &w, true);
        assert!(imp[0] > imp[1]);
        assert!(imp[2] > imp[1]);
    }

    #[test]
    fn blended_importance_interpolates_goal() {
        let z = vec![1.0, 0.0];
        let p = vec![0.0, 1.0];
        let evidence_only = blended_importance(&z, &p, 0.0);
        let param_only = blended_importance(&z, &p, 1.0);
        assert_relative_eq!(evidence_only[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(param_only[1], 1.0, epsilon = 1e-12);
    }
}
