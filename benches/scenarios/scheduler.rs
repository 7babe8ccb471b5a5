//! Benchmarks for the look-ahead step scheduler.

use std::hint::black_box;

use casa_drums::{
    mixer::Channels,
    sequencing::{compute_step_schedule, Cursor, Instrument, Pattern, PatternSpec},
};
use criterion::{BenchmarkId, Criterion};

pub fn bench_scheduler(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/scheduler");

    // Every step of every row on, swung: the worst case per tick
    let spec = Instrument::ALL
        .into_iter()
        .fold(PatternSpec::new().tempo(180.0).swing(50.0), |spec, instrument| {
            spec.row(instrument, "1111111111111111")
        });
    let pattern = Pattern::from_spec(1, "dense", &spec, 0);

    let mut soloed = Channels::default();
    soloed.get_mut(Instrument::Snare).soloed = true;

    // 100ms is the live horizon; a full second models a long stall
    for horizon in [0.1, 1.0] {
        let label = format!("{}ms", (horizon * 1000.0) as u32);

        let channels = Channels::default();
        group.bench_with_input(BenchmarkId::new("all_channels", &label), &horizon, |b, &h| {
            b.iter(|| {
                compute_step_schedule(
                    black_box(Cursor::new(0, 0.0)),
                    black_box(&pattern),
                    &channels,
                    0.0,
                    h,
                )
            })
        });

        group.bench_with_input(BenchmarkId::new("one_soloed", &label), &horizon, |b, &h| {
            b.iter(|| {
                compute_step_schedule(
                    black_box(Cursor::new(0, 0.0)),
                    black_box(&pattern),
                    &soloed,
                    0.0,
                    h,
                )
            })
        });
    }

    group.finish();
}
