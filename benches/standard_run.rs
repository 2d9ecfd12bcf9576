//! Benchmark the standard driver across dimensionality and live-point count.

use criterion::{criterion_group, criterion_main, Criterion};
use perfectns::driver::standard::StandardDriver;
use perfectns::problem::builtin::GaussianGaussian;
use perfectns::settings::Settings;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

fn criterion_benchmark(c: &mut Criterion) {
    let mut rng = Xoshiro256Plus::seed_from_u64(0);

    let mut group = c.benchmark_group("dimensions");

    for dims in [1, 2, 5, 10] {
        let problem = GaussianGaussian::new(dims, 1.0, 10.0);
        group.bench_with_input(
            format!("standard run, {} dims, nlive=200", dims),
            &dims,
            |b, _| {
                let settings = Settings::new(dims, 200);
                b.iter(|| {
                    StandardDriver::new(&problem, settings.clone())
                        .run(&mut rng)
                        .unwrap()
                })
            },
        );
    }

    group.finish();

    let mut group = c.benchmark_group("live_points");
    let problem = GaussianGaussian::new(2, 1.0, 10.0);
    for nlive in [50, 200, 500] {
        group.bench_with_input(
            format!("standard run, 2 dims, nlive={}", nlive),
            &nlive,
            |b, &nlive| {
                let settings = Settings::new(2, nlive);
                b.iter(|| {
                    StandardDriver::new(&problem, settings.clone())
                        .run(&mut rng)
                        .unwrap()
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
