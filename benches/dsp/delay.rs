//! Benchmarks for the feedback delay line behind the echo return.

use std::hint::black_box;

use casa_drums::dsp::delay::DelayLine;
use criterion::{BenchmarkId, Criterion};

use super::test_signal;
use crate::BLOCK_SIZES;

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    // Dotted eighths at 180, 120 and 60 BPM (48kHz)
    let delay_times: &[usize] = &[12_000, 18_000, 36_000];

    for &size in BLOCK_SIZES {
        let input = test_signal(size);

        for &delay_samples in delay_times {
            let delay_ms = delay_samples / 48;
            let mut delay = DelayLine::new();
            let mut buffer = input.clone();
            group.bench_with_input(
                BenchmarkId::new(format!("render_{delay_ms}ms"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        buffer.copy_from_slice(&input);
                        delay.render(black_box(&mut buffer), black_box(delay_samples), 0.35);
                    })
                },
            );
        }
    }

    group.finish();
}
