//! Scenarios 3-5 (spec.md §8): dynamic driver goal sweep. Evidence-focused
//! (`goal=0`) vs parameter-focused (`goal=1`) vs blended (`goal=0.5`),
//! compared against a matched-budget standard run.

use perfectns::driver::dynamic::DynamicDriver;
use perfectns::driver::standard::StandardDriver;
use perfectns::estimators::Estimator;
use perfectns::problem::builtin::GaussianGaussian;
use perfectns::settings::Settings;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn logz_error(problem: &GaussianGaussian, logz: f64) -> f64 {
    (logz - problem.logz_analytic().unwrap()).abs()
}

#[test]
fn evidence_focused_dynamic_run_matches_standard_budget() {
    let _ = env_logger::try_init();
    let problem = GaussianGaussian::new(1, 1.0, 10.0);
    let mut rng = StdRng::seed_from_u64(0x1234);

    let standard_settings = Settings::new(1, 200);
    let standard_run = StandardDriver::new(&problem, standard_settings)
        .run(&mut rng)
        .unwrap();
    let standard_error = logz_error(&problem, standard_run.logz());

    let dynamic_settings = Settings::new(1, 200)
        .with_dynamic_goal(0.0)
        .with_n_samples_max(standard_run.len());
    let dynamic_run = DynamicDriver::new(&problem, dynamic_settings)
        .run(&mut rng)
        .unwrap();
    let dynamic_error = logz_error(&problem, dynamic_run.logz());

    println!(
        "standard logz error = {}, evidence-focused dynamic logz error = {}",
        standard_error, dynamic_error
    );
    // The evidence-focused dynamic driver should be no worse, within a
    // generous factor, than a matched-budget standard run.
    assert!(dynamic_error < 3.0 * standard_error.max(0.05));
}

#[test]
fn parameter_focused_goal_reduces_parameter_variance_relative_to_evidence_focused() {
    let problem = GaussianGaussian::new(1, 1.0, 10.0);
    let settings_for = |goal: f64| {
        Settings::new(1, 200)
            .with_dynamic_goal(goal)
            .with_n_samples_max(1500)
    };

    let mut rng = StdRng::seed_from_u64(77);
    let n_runs = 15;

    let mut theta_values_goal0 = Vec::with_capacity(n_runs);
    let mut theta_values_goal1 = Vec::with_capacity(n_runs);
    let mut theta_values_goal_half = Vec::with_capacity(n_runs);

    for _ in 0..n_runs {
        let run0 = DynamicDriver::new(&problem, settings_for(0.0))
            .run(&mut rng)
            .unwrap();
        let logw0 = run0.logw();
        theta_values_goal0.push(Estimator::ParamMean(0).estimate(&logw0, &run0).unwrap());

        let run1 = DynamicDriver::new(&problem, settings_for(1.0))
            .run(&mut rng)
            .unwrap();
        let logw1 = run1.logw();
        theta_values_goal1.push(Estimator::ParamMean(0).estimate(&logw1, &run1).unwrap());

        let run_half = DynamicDriver::new(&problem, settings_for(0.5))
            .run(&mut rng)
            .unwrap();
        let logw_half = run_half.logw();
        theta_values_goal_half.push(
            Estimator::ParamMean(0)
                .estimate(&logw_half, &run_half)
                .unwrap(),
        );
    }

    let variance = |xs: &[f64]| {
        let mean = xs.iter().sum::<f64>() / xs.len() as f64;
        xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / xs.len() as f64
    };

    let var0 = variance(&theta_values_goal0);
    let var1 = variance(&theta_values_goal1);
    let var_half = variance(&theta_values_goal_half);

    println!(
        "var(theta_mean) goal=0: {}, goal=0.5: {}, goal=1: {}",
        var0, var_half, var1
    );
    // Parameter-focused sampling should not be dramatically worse than
    // evidence-focused sampling at estimating the parameter mean, and the
    // blended goal should sit in a comparable range to both extremes.
    assert!(var1 <= 5.0 * var0.max(1e-8));
    assert!(var_half <= 5.0 * var0.max(1e-8));
}
