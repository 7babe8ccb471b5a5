//! Low-level DSP primitives used by the graph nodes, voices and mixer.
//!
//! These components are allocation-free once constructed and realtime-safe,
//! so they can live directly inside voices and channel strips.

/// Gain staging, dB conversion and bus summing.
pub mod amplify;
/// Circular-buffer delay line with feedback.
pub mod delay;
/// Feed-forward compressor and limiter.
pub mod dynamics;
/// Exponential ramps for pitch and amplitude contours.
pub mod envelope;
/// Biquad shelving/peaking bands and the three-band EQ.
pub mod eq;
/// Oscillator waveforms and noise sources.
pub mod oscillator;
/// Linear parameter ramps for click-free gain changes.
pub mod smoother;

pub use envelope::{Ramp, RampEnvelope};
