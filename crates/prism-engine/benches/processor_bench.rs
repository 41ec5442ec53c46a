//! Criterion benchmarks for the stereo processor block path
//!
//! Run with: cargo bench -p prism-engine
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use prism_engine::layout::ids;
use prism_engine::{EngineConfig, create};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 256, 1024];

fn bench_process_block(c: &mut Criterion) {
    let mut group = c.benchmark_group("Processor");

    for &block_size in BLOCK_SIZES {
        group.throughput(Throughput::Elements(block_size as u64));

        let config = EngineConfig::default()
            .with_sample_rate(SAMPLE_RATE)
            .with_max_block_size(block_size);
        let (mut processor, controller) = create(config).expect("engine");
        controller.set_param(ids::PHASER_MIX, 0.5).expect("param");
        controller.set_param(ids::CHORUS_MIX, 0.5).expect("param");
        controller.set_param(ids::OVERDRIVE_DRIVE, 8.0).expect("param");
        controller.set_param(ids::LADDER_CUTOFF, 3000.0).expect("param");
        controller.set_param(ids::FILTER_GAIN, 6.0).expect("param");

        let mut left: Vec<f32> = (0..block_size)
            .map(|i| (i as f32 * 440.0 * 2.0 * std::f32::consts::PI / SAMPLE_RATE).sin())
            .collect();
        let mut right = left.clone();

        group.bench_with_input(BenchmarkId::new("steady", block_size), &block_size, |b, _| {
            b.iter(|| {
                processor.process_block(black_box(&mut left), black_box(&mut right));
            });
        });

        // Every block retargets the filter frequency, so coefficients are recomputed per chunk
        let mut sweep = 200.0_f32;
        group.bench_with_input(BenchmarkId::new("sweeping", block_size), &block_size, |b, _| {
            b.iter(|| {
                sweep = if sweep > 8000.0 { 200.0 } else { sweep * 1.01 };
                controller.set_param(ids::FILTER_FREQ, sweep).expect("param");
                processor.process_block(black_box(&mut left), black_box(&mut right));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_process_block);
criterion_main!(benches);
