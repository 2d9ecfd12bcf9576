//! Scenario 1 (spec.md §8): single-dim Gaussian x Gaussian, standard driver.

use perfectns::driver::standard::StandardDriver;
use perfectns::estimators::Estimator;
use perfectns::problem::builtin::GaussianGaussian;
use perfectns::settings::Settings;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn evidence_and_radial_mean_match_expectations() {
    let _ = env_logger::try_init();
    let problem = GaussianGaussian::new(1, 1.0, 10.0);
    let settings = Settings::new(1, 50).with_termination_fraction(1e-3);
    let analytic_logz = problem.logz_analytic().unwrap();

    let mut rng = StdRng::seed_from_u64(0xBEEF);
    let n_runs = 100;
    let mut logz_sum = 0.0;
    let mut radial_mean_sum = 0.0;

    for _ in 0..n_runs {
        let run = StandardDriver::new(&problem, settings.clone())
            .run(&mut rng)
            .unwrap();
        let logw = run.logw();
        logz_sum += Estimator::LogZ.estimate(&logw, &run).unwrap();
        radial_mean_sum += Estimator::RadialMean.estimate(&logw, &run).unwrap();
    }

    let mean_logz = logz_sum / n_runs as f64;
    let mean_radial = radial_mean_sum / n_runs as f64;

    println!(
        "mean logz = {}, analytic = {}, mean radial mean = {}",
        mean_logz, analytic_logz, mean_radial
    );
    assert!((mean_logz - analytic_logz).abs() < 0.5);
    assert!(mean_radial < 0.1);
}
