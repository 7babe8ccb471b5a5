//! Benchmarks for drum voices and the kit.

use std::hint::black_box;

use casa_drums::{
    mixer::Console,
    sequencing::Instrument,
    synth::{kit::DrumKit, recipe::Recipe, voice::DrumVoice},
};
use criterion::{BatchSize, BenchmarkId, Criterion};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Single hits: the sine kick, the two-layer snare, the noisy crash
        for instrument in [Instrument::Kick, Instrument::Snare, Instrument::Crash] {
            let recipe = Recipe::builtin(instrument);
            group.bench_with_input(
                BenchmarkId::new(instrument.as_str(), size),
                &size,
                |b, _| {
                    b.iter_batched(
                        || DrumVoice::new(instrument, &recipe, 0, SAMPLE_RATE),
                        |mut voice| {
                            buffer.fill(0.0);
                            voice.render_add(black_box(&mut buffer), 0);
                        },
                        BatchSize::SmallInput,
                    )
                },
            );
        }

        // Every instrument hit at once, rendered into the console inputs
        let mut console = Console::new();
        group.bench_with_input(BenchmarkId::new("full_kit", size), &size, |b, _| {
            b.iter_batched(
                || {
                    let mut kit = DrumKit::new(SAMPLE_RATE);
                    for instrument in Instrument::ALL {
                        kit.trigger(instrument, 0);
                    }
                    kit
                },
                |mut kit| {
                    console.begin_block(size);
                    kit.render(black_box(&mut console), 0, size);
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}
