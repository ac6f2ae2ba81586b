//! Benchmarks for model fitting and full forecasting runs.

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use demand_forecast::core::{ObservedSeries, SeriesKey};
use demand_forecast::models::{BaselineForecaster, Forecaster, PointForecaster, RegressionForecaster};
use demand_forecast::pipeline::{ForecastConfig, ForecastOrchestrator};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn generate_demand(rng: &mut StdRng, n: usize) -> Vec<f64> {
    let base = rng.gen_range(10.0..60.0);
    (0..n)
        .map(|i| {
            let daily = (2.0 * std::f64::consts::PI * (i % 24) as f64 / 24.0).sin();
            (base * (1.0 + 0.4 * daily) + rng.gen_range(-3.0..3.0_f64)).max(0.0)
        })
        .collect()
}

fn generate_series(count: usize, n: usize) -> Vec<ObservedSeries> {
    let mut rng = StdRng::seed_from_u64(42);
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let timestamps: Vec<_> = (0..n).map(|i| start + Duration::hours(i as i64)).collect();
    (0..count)
        .map(|i| {
            let key = SeriesKey::new(format!("zone_{}", i / 3), format!("segment_{}", i % 3));
            ObservedSeries::new(key, timestamps.clone(), generate_demand(&mut rng, n)).unwrap()
        })
        .collect()
}

fn bench_models(c: &mut Criterion) {
    let mut group = c.benchmark_group("model_fit_predict");

    for size in [336, 720, 1440].iter() {
        let series = generate_series(1, *size).remove(0);

        group.bench_with_input(BenchmarkId::new("baseline", size), size, |b, _| {
            let forecaster = BaselineForecaster::default();
            b.iter(|| forecaster.fit(black_box(&series)).map(|m| m.predict(72)))
        });

        group.bench_with_input(BenchmarkId::new("regression", size), size, |b, _| {
            let forecaster = RegressionForecaster::new();
            b.iter(|| forecaster.fit(black_box(&series)).map(|m| m.predict(72)))
        });
    }

    group.finish();
}

fn bench_orchestrator(c: &mut Criterion) {
    let mut group = c.benchmark_group("orchestrator_run");
    group.sample_size(20);

    for count in [6, 24, 96].iter() {
        let series = generate_series(*count, 720);

        for parallel in [false, true] {
            let label = if parallel { "parallel" } else { "sequential" };
            let orchestrator =
                ForecastOrchestrator::new(ForecastConfig::default().with_parallel(parallel))
                    .unwrap();
            group.bench_with_input(BenchmarkId::new(label, count), count, |b, _| {
                b.iter(|| orchestrator.run_series(black_box(&series)))
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_models, bench_orchestrator);
criterion_main!(benches);
