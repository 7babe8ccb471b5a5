//! Drum machine scenario benchmarks.
//!
//! A busy kit through the full console, and the scheduler working through a
//! dense pattern.

mod console;
mod scheduler;
mod voices;

pub use console::bench_console;
pub use scheduler::bench_scheduler;
pub use voices::bench_voices;
