use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

/*
Three-Band Equalizer
====================

Each channel strip and the master bus carry the same three bands:

| band | shape      | default freq | boosts / cuts            |
| ---- | ---------- | ------------ | ------------------------ |
| low  | low shelf  | 200 Hz       | everything below freq    |
| mid  | peaking    | 1 kHz        | a bell around freq       |
| high | high shelf | 5 kHz        | everything above freq    |

All bands start at 0 dB, where the biquad coefficients reduce to the
identity filter (b = a) and the band passes audio untouched.

Coefficients follow the RBJ "Audio EQ Cookbook":

    A     = 10 ^ (gain_db / 40)
    w0    = 2π × freq / sample_rate
    alpha = sin(w0) / (2 × Q)

Shelves use shelf slope S = 1, i.e. alpha = sin(w0) / 2 × √2.

Processing uses transposed direct form II: two state values per band.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BandShape {
    LowShelf,
    Peak,
    HighShelf,
}

#[derive(Debug, Clone, Copy, Default)]
struct Coefficients {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
}

#[derive(Debug, Clone)]
pub struct EqBand {
    shape: BandShape,
    freq: f32,
    gain_db: f32,
    q: f32,
    coeffs: Coefficients,
    /// Sample rate the coefficients were computed for (0 = stale).
    coeff_rate: f32,
    z1: f32,
    z2: f32,
}

impl EqBand {
    pub fn new(shape: BandShape, freq: f32, q: f32) -> Self {
        Self {
            shape,
            freq,
            gain_db: 0.0,
            q: q.max(0.05),
            coeffs: Coefficients::default(),
            coeff_rate: 0.0,
            z1: 0.0,
            z2: 0.0,
        }
    }

    pub fn set_gain_db(&mut self, gain_db: f32) {
        self.gain_db = gain_db.clamp(-24.0, 24.0);
        self.coeff_rate = 0.0;
    }

    pub fn gain_db(&self) -> f32 {
        self.gain_db
    }

    fn update_coefficients(&mut self, sample_rate: f32) {
        let freq = self.freq.min(sample_rate * 0.45);
        let a = 10.0_f32.powf(self.gain_db / 40.0);
        let w0 = TAU * freq / sample_rate;
        let (sin_w0, cos_w0) = w0.sin_cos();

        let (b0, b1, b2, a0, a1, a2) = match self.shape {
            BandShape::Peak => {
                let alpha = sin_w0 / (2.0 * self.q);
                (
                    1.0 + alpha * a,
                    -2.0 * cos_w0,
                    1.0 - alpha * a,
                    1.0 + alpha / a,
                    -2.0 * cos_w0,
                    1.0 - alpha / a,
                )
            }
            BandShape::LowShelf => {
                let alpha = sin_w0 / 2.0 * std::f32::consts::SQRT_2;
                let two_sqrt_a_alpha = 2.0 * a.sqrt() * alpha;
                (
                    a * ((a + 1.0) - (a - 1.0) * cos_w0 + two_sqrt_a_alpha),
                    2.0 * a * ((a - 1.0) - (a + 1.0) * cos_w0),
                    a * ((a + 1.0) - (a - 1.0) * cos_w0 - two_sqrt_a_alpha),
                    (a + 1.0) + (a - 1.0) * cos_w0 + two_sqrt_a_alpha,
                    -2.0 * ((a - 1.0) + (a + 1.0) * cos_w0),
                    (a + 1.0) + (a - 1.0) * cos_w0 - two_sqrt_a_alpha,
                )
            }
            BandShape::HighShelf => {
                let alpha = sin_w0 / 2.0 * std::f32::consts::SQRT_2;
                let two_sqrt_a_alpha = 2.0 * a.sqrt() * alpha;
                (
                    a * ((a + 1.0) + (a - 1.0) * cos_w0 + two_sqrt_a_alpha),
                    -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_w0),
                    a * ((a + 1.0) + (a - 1.0) * cos_w0 - two_sqrt_a_alpha),
                    (a + 1.0) - (a - 1.0) * cos_w0 + two_sqrt_a_alpha,
                    2.0 * ((a - 1.0) - (a + 1.0) * cos_w0),
                    (a + 1.0) - (a - 1.0) * cos_w0 - two_sqrt_a_alpha,
                )
            }
        };

        self.coeffs = Coefficients {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        };
        self.coeff_rate = sample_rate;
    }

    #[inline]
    pub fn next_sample(&mut self, x: f32) -> f32 {
        let c = self.coeffs;
        let y = c.b0 * x + self.z1;
        self.z1 = c.b1 * x - c.a1 * y + self.z2;
        self.z2 = c.b2 * x - c.a2 * y;
        y
    }

    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        if self.coeff_rate != sample_rate {
            self.update_coefficients(sample_rate);
        }
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }
}

/// Selects one band of a `ThreeBandEq`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Low,
    Mid,
    High,
}

#[derive(Debug, Clone)]
pub struct ThreeBandEq {
    low: EqBand,
    mid: EqBand,
    high: EqBand,
}

impl ThreeBandEq {
    /// Flat EQ with the default band frequencies.
    pub fn flat() -> Self {
        Self {
            low: EqBand::new(BandShape::LowShelf, 200.0, 0.707),
            mid: EqBand::new(BandShape::Peak, 1_000.0, 1.0),
            high: EqBand::new(BandShape::HighShelf, 5_000.0, 0.707),
        }
    }

    pub fn band_mut(&mut self, band: Band) -> &mut EqBand {
        match band {
            Band::Low => &mut self.low,
            Band::Mid => &mut self.mid,
            Band::High => &mut self.high,
        }
    }

    pub fn set_gain_db(&mut self, band: Band, gain_db: f32) {
        self.band_mut(band).set_gain_db(gain_db);
    }

    pub fn is_flat(&self) -> bool {
        self.low.gain_db == 0.0 && self.mid.gain_db == 0.0 && self.high.gain_db == 0.0
    }

    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        self.low.render(buffer, sample_rate);
        self.mid.render(buffer, sample_rate);
        self.high.render(buffer, sample_rate);
    }

    pub fn reset(&mut self) {
        self.low.reset();
        self.mid.reset();
        self.high.reset();
    }
}

impl Default for ThreeBandEq {
    fn default() -> Self {
        Self::flat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::{Oscillator, Waveform};

    const SAMPLE_RATE: f32 = 48_000.0;

    fn sine(freq: f32, len: usize) -> Vec<f32> {
        let mut osc = Oscillator::new(Waveform::Sine);
        (0..len).map(|_| osc.next_sample(freq, SAMPLE_RATE)).collect()
    }

    fn peak_after_transient(buffer: &[f32]) -> f32 {
        buffer[buffer.len() / 2..]
            .iter()
            .fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    #[test]
    fn flat_eq_is_transparent() {
        let input = sine(440.0, 512);
        let mut output = input.clone();
        let mut eq = ThreeBandEq::flat();
        assert!(eq.is_flat());
        eq.render(&mut output, SAMPLE_RATE);

        for (a, b) in input.iter().zip(&output) {
            assert!((a - b).abs() < 1e-4, "flat EQ altered signal: {a} vs {b}");
        }
    }

    #[test]
    fn low_shelf_boost_lifts_bass_only() {
        let mut eq = ThreeBandEq::flat();
        eq.set_gain_db(Band::Low, 12.0);

        let mut bass = sine(50.0, 8_192);
        eq.render(&mut bass, SAMPLE_RATE);
        eq.reset();
        let mut treble = sine(10_000.0, 8_192);
        eq.render(&mut treble, SAMPLE_RATE);

        let bass_peak = peak_after_transient(&bass);
        let treble_peak = peak_after_transient(&treble);
        assert!(bass_peak > 3.0, "expected ~+12 dB on bass, got {bass_peak}");
        assert!((treble_peak - 1.0).abs() < 0.1, "treble should pass, got {treble_peak}");
    }

    #[test]
    fn peak_cut_notches_centre() {
        let mut band = EqBand::new(BandShape::Peak, 1_000.0, 1.0);
        band.set_gain_db(-12.0);
        let mut centre = sine(1_000.0, 8_192);
        band.render(&mut centre, SAMPLE_RATE);
        let peak = peak_after_transient(&centre);
        assert!((peak - 0.25).abs() < 0.05, "expected ~-12 dB, got {peak}");
    }

    #[test]
    fn gain_is_clamped() {
        let mut band = EqBand::new(BandShape::HighShelf, 5_000.0, 0.707);
        band.set_gain_db(60.0);
        assert_eq!(band.gain_db(), 24.0);
    }
}
