use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

/*
Oscillator waveforms for percussion.

Phase runs 0.0..1.0 and advances by frequency / sample_rate each sample, so
the frequency may change every sample (pitch sweeps) without clicks.

  Sine      kick body
  Triangle  snare body
  Square    hats, clap, rim, cowbell (bright, odd harmonics)
  Sawtooth  crash (all harmonics)
  Noise     snare wires; frequency is ignored
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
    Noise,
}

/// Xorshift32 white-noise source. Deterministic for a given seed.
#[derive(Debug, Clone)]
pub struct NoiseSource {
    state: u32,
}

impl NoiseSource {
    pub fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    /// Next sample in [-1.0, 1.0).
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        (self.state as f32 / u32::MAX as f32) * 2.0 - 1.0
    }
}

#[derive(Debug, Clone)]
pub struct Oscillator {
    waveform: Waveform,
    phase: f32,
    noise: NoiseSource,
}

impl Oscillator {
    pub fn new(waveform: Waveform) -> Self {
        Self::with_seed(waveform, 0x2424_1987)
    }

    pub fn with_seed(waveform: Waveform, seed: u32) -> Self {
        Self {
            waveform,
            phase: 0.0,
            noise: NoiseSource::new(seed),
        }
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Produce one sample at `frequency` Hz and advance the phase.
    #[inline]
    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let value = match self.waveform {
            Waveform::Sine => (TAU * self.phase).sin(),
            Waveform::Square => {
                if self.phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * self.phase - 1.0,
            Waveform::Triangle => {
                if self.phase < 0.5 {
                    4.0 * self.phase - 1.0
                } else {
                    3.0 - 4.0 * self.phase
                }
            }
            Waveform::Noise => self.noise.next_sample(),
        };

        self.phase += frequency / sample_rate;
        self.phase -= self.phase.floor();
        value
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}
