//! Benchmarks for the three-band EQ.

use std::hint::black_box;

use casa_drums::dsp::eq::{Band, ThreeBandEq};
use criterion::{BenchmarkId, Criterion};

use super::test_signal;
use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_eq(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/eq");

    for &size in BLOCK_SIZES {
        let input = test_signal(size);
        let mut buffer = input.clone();

        // Flat EQ is the default on every channel strip
        let mut flat = ThreeBandEq::flat();
        group.bench_with_input(BenchmarkId::new("flat", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                flat.render(black_box(&mut buffer), SAMPLE_RATE);
            })
        });

        let mut shaped = ThreeBandEq::flat();
        shaped.set_gain_db(Band::Low, 4.0);
        shaped.set_gain_db(Band::Mid, -3.0);
        shaped.set_gain_db(Band::High, 6.0);
        group.bench_with_input(BenchmarkId::new("shaped", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                shaped.render(black_box(&mut buffer), SAMPLE_RATE);
            })
        });
    }

    group.finish();
}
