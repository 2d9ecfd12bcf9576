//! Numerically stable scalar helpers shared by the drivers and estimators.

/// Numerically stable `ln(sum(exp(xs)))`.
///
/// Shifts by the maximum finite element before exponentiating. Returns
/// `f64::NEG_INFINITY` for an empty slice or a slice whose only finite
/// value is `-inf` (e.g. all weights vanished) rather than panicking; a
/// vanished evidence contribution is a legitimate intermediate state, not a
/// caller error.
pub fn log_sum_exp(xs: &[f64]) -> f64 {
    let max = xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return max;
    }
    let sum: f64 = xs.iter().map(|&x| (x - max).exp()).sum();
    max + sum.ln()
}

/// The geometric-shrinkage trapezoidal weight factor for a fixed live-point
/// count, `ln(1/2 * (e^{1/nlive} - e^{-1/nlive}))`.
///
/// Lifted out of the standard driver so it can be checked independently
/// against the small-`nlive` series expansion (it tends to `ln(1/nlive)` as
/// `nlive -> inf`).
pub fn log_trapz_factor(nlive: f64) -> f64 {
    let inv = 1.0 / nlive;
    (0.5 * (inv.exp() - (-inv).exp())).ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn log_sum_exp_matches_naive_sum() {
        let xs = [1.0_f64, 2.0, 3.0];
        let naive = (xs.iter().map(|x| x.exp()).sum::<f64>()).ln();
        assert_relative_eq!(log_sum_exp(&xs), naive, epsilon = 1e-12);
    }

    #[test]
    fn log_sum_exp_empty_is_neg_infinity() {
        assert_eq!(log_sum_exp(&[]), f64::NEG_INFINITY);
    }

    #[test]
    fn log_sum_exp_avoids_overflow() {
        let xs = [1000.0_f64, 1000.0, 1000.0];
        let result = log_sum_exp(&xs);
        assert_relative_eq!(result, 1000.0 + 3.0_f64.ln(), epsilon = 1e-9);
    }

    #[test]
    fn log_trapz_factor_tends_to_log_inv_nlive_for_large_nlive() {
        let nlive = 1.0e6;
        let approx_val = -(nlive.ln());
        assert_relative_eq!(log_trapz_factor(nlive), approx_val, epsilon = 1e-6);
    }
}
