//! Benchmarks for the compressor presets.

use std::hint::black_box;

use casa_drums::dsp::dynamics::Compressor;
use criterion::{BenchmarkId, Criterion};

use super::test_signal;
use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_dynamics(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/dynamics");

    for &size in BLOCK_SIZES {
        let input = test_signal(size);
        let mut buffer = input.clone();

        let presets = [
            ("channel", Compressor::channel()),
            ("master", Compressor::master()),
            ("limiter", Compressor::limiter()),
        ];
        for (name, mut compressor) in presets {
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    compressor.render(black_box(&mut buffer), SAMPLE_RATE);
                })
            });
        }
    }

    group.finish();
}
