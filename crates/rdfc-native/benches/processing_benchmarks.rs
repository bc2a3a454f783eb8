//! Benchmarks for the rdFC processing chain

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use rdfc_core::math::rolling_pearson;
use rdfc_core::{Epoch, NotchFrequency};
use rdfc_native::processing::{
    filters::{FilterConfig, FilterStage},
    pattern::PatternGenerator,
    pipeline::{PipelineConfig, RdfcPipeline},
};

/// Generate synthetic EEG data (sinusoid plus mains and pseudo-noise)
fn generate_eeg_samples(n: usize, freq_hz: f64, sample_rate: f64) -> Vec<f64> {
    use std::f64::consts::PI;

    (0..n)
        .map(|i| {
            let t = i as f64 / sample_rate;
            let signal = (2.0 * PI * freq_hz * t).sin();
            let mains = 0.3 * (2.0 * PI * 50.0 * t).sin();
            let noise = (i as f64 * 0.123).sin() * 0.1; // Pseudo-noise
            (signal + mains + noise) * 50.0 // Scale to ~50 µV
        })
        .collect()
}

fn generate_epoch(sample_rate: u32) -> Epoch {
    let n = Epoch::expected_len(sample_rate);
    let fs = f64::from(sample_rate);
    Epoch::new(
        sample_rate,
        [
            generate_eeg_samples(n, 10.0, fs),
            generate_eeg_samples(n, 11.5, fs),
            generate_eeg_samples(n, 7.25, fs),
        ],
    )
    .expect("valid synthetic epoch")
}

fn bench_zero_phase_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("zero_phase_filter");
    group.sample_size(10);

    let stage = FilterStage::design(256, NotchFrequency::Hz50, &FilterConfig::default())
        .expect("256 Hz design is feasible");

    for seconds in [10, 60, 300].iter() {
        let samples = generate_eeg_samples(seconds * 256, 10.0, 256.0);

        group.bench_with_input(BenchmarkId::from_parameter(seconds), seconds, |b, _| {
            b.iter(|| {
                let filtered = stage.filter_channel(black_box(&samples));
                black_box(filtered)
            });
        });
    }

    group.finish();
}

fn bench_rolling_correlation(c: &mut Criterion) {
    let mut group = c.benchmark_group("rolling_correlation");

    for window in [128, 256, 512].iter() {
        let x = generate_eeg_samples(76_800, 10.0, 256.0);
        let y = generate_eeg_samples(76_800, 11.5, 256.0);

        group.bench_with_input(BenchmarkId::from_parameter(window), window, |b, &window| {
            b.iter(|| {
                let trace = rolling_pearson(black_box(&x), black_box(&y), window);
                black_box(trace)
            });
        });
    }

    group.finish();
}

fn bench_pattern_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern_generation");

    let epoch = generate_epoch(256);
    let generator = PatternGenerator::for_sampling_rate(256).expect("valid window");

    group.bench_function("five_orders_256hz", |b| {
        b.iter(|| {
            let pattern = generator.generate(black_box(&epoch));
            black_box(pattern)
        });
    });

    group.finish();
}

fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(10);

    let epoch = generate_epoch(256);
    let pipeline = RdfcPipeline::new(PipelineConfig::default());

    group.bench_function("run_256hz", |b| {
        b.iter(|| {
            let analysis = pipeline.run(black_box(&epoch), NotchFrequency::Hz50);
            black_box(analysis)
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_zero_phase_filter,
    bench_rolling_correlation,
    bench_pattern_generation,
    bench_full_pipeline,
);

criterion_main!(benches);
