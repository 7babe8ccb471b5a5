//! Benchmarks for the mixer's DSP primitives.

mod delay;
mod dynamics;
mod eq;

pub use delay::bench_delay;
pub use dynamics::bench_dynamics;
pub use eq::bench_eq;

/// A test signal with some level for the processors to work on.
pub fn test_signal(size: usize) -> Vec<f32> {
    (0..size).map(|i| (i as f32 * 0.05).sin() * 0.8).collect()
}
