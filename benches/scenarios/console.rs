//! Benchmarks for the full mixing console.
//!
//! Eight channel strips (trim, EQ, compressor, fader), the echo return and
//! the master bus.

use std::hint::black_box;

use casa_drums::{graph::node::RenderCtx, mixer::Console, sequencing::Instrument};
use criterion::{BenchmarkId, Criterion};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

/// Fill every channel input with a different partial.
fn feed(console: &mut Console, size: usize) {
    console.begin_block(size);
    for instrument in Instrument::ALL {
        let freq = 0.01 * (instrument.index() + 1) as f32;
        for (i, sample) in console.channel_input(instrument, size).iter_mut().enumerate() {
            *sample = (i as f32 * freq).sin() * 0.5;
        }
    }
}

pub fn bench_console(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/console");
    let ctx = RenderCtx::new(SAMPLE_RATE);

    for &size in BLOCK_SIZES {
        let mut out = vec![0.0f32; size];

        let mut dry = Console::new();
        group.bench_with_input(BenchmarkId::new("dry", size), &size, |b, _| {
            b.iter(|| {
                feed(&mut dry, size);
                dry.mix_into(black_box(&mut out), &ctx);
            })
        });

        // Every channel feeding the echo
        let mut wet = Console::new();
        for instrument in Instrument::ALL {
            wet.set_fx_send(instrument, 0.4);
        }
        group.bench_with_input(BenchmarkId::new("with_echo", size), &size, |b, _| {
            b.iter(|| {
                feed(&mut wet, size);
                wet.mix_into(black_box(&mut out), &ctx);
            })
        });
    }

    group.finish();
}
