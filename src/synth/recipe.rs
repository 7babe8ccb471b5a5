/*
Percussion Recipes
==================

Every drum is one or two layers. A layer is a source (an oscillator or a
loaded sample) with an exponential pitch contour and an exponential
amplitude contour:

  layer = source(freq(t)) × amp(t) × gain

| instrument | source   | pitch                  | amplitude              |
| ---------- | -------- | ---------------------- | ---------------------- |
| kick       | sine     | 150 Hz → 0.01 in 0.5 s | 1.0 → 0.01 in 0.5 s    |
| snare      | triangle | 200 → 100 Hz in 0.1 s  | 0.7 → 0.01 in 0.1 s    |
|            | noise    |                        | 1.0 → 0.01 in 0.2 s    |
| hihat      | square   | 8 kHz                  | 0.3 → 0.01 in 0.05 s   |
| openhat    | square   | 8 kHz                  | 0.3 → 0.01 in 0.3 s    |
| clap       | square   | 1.2 kHz                | 0.6 → 0.01 in 0.1 s    |
| rim        | square   | 1.7 kHz                | 0.5 → 0.01 in 0.1 s    |
| cowbell    | square   | 800 Hz                 | 0.5 → 0.01 in 0.1 s    |
| crash      | sawtooth | 5 kHz                  | 0.4 → 0.01 in 1.0 s    |

The kick's pitch drop is what makes it a kick: the first few milliseconds
are a click at 150 Hz, and the body falls through the sub range.

Adding a drum is adding a row here; the voice code is generic.
*/

use std::path::PathBuf;

use crate::{
    dsp::{envelope::Ramp, oscillator::Waveform},
    sequencing::instrument::Instrument,
    synth::sample::SampleBuffer,
};

/// Upper bound on layers per recipe (voices store layers inline).
pub const MAX_LAYERS: usize = 2;

#[derive(Debug, Clone)]
pub enum Source {
    Tone(Waveform),
    Sample(SampleBuffer),
}

#[derive(Debug, Clone)]
pub struct Layer {
    pub source: Source,
    /// Oscillator frequency in Hz. Ignored by sample layers.
    pub pitch: Ramp,
    pub amp: Ramp,
    pub gain: f32,
}

impl Layer {
    pub fn tone(waveform: Waveform, pitch: Ramp, amp: Ramp) -> Self {
        Self {
            source: Source::Tone(waveform),
            pitch,
            amp,
            gain: 1.0,
        }
    }

    /// One-shot sample playback at unity gain.
    pub fn sample(buffer: SampleBuffer) -> Self {
        let length = buffer.duration_secs();
        Self {
            source: Source::Sample(buffer),
            pitch: Ramp::hold(1.0),
            amp: Ramp::hold(1.0).with_duration(length),
            gain: 1.0,
        }
    }

    /// Seconds until this layer is silent.
    pub fn duration(&self) -> f32 {
        match &self.source {
            Source::Tone(_) => self.amp.duration,
            Source::Sample(buffer) => buffer.duration_secs(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Recipe {
    layers: Vec<Layer>,
}

impl Recipe {
    /// Build a recipe; layers past `MAX_LAYERS` are dropped.
    pub fn new(mut layers: Vec<Layer>) -> Self {
        layers.truncate(MAX_LAYERS);
        Self { layers }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn duration(&self) -> f32 {
        self.layers
            .iter()
            .map(Layer::duration)
            .fold(0.0, f32::max)
    }

    pub fn builtin(instrument: Instrument) -> Self {
        Self::new(
            BUILTIN_TONES[instrument.index()]
                .iter()
                .map(ToneSpec::layer)
                .collect(),
        )
    }
}

/// Synthesized layer description. Pitch and level both decay over `decay`
/// seconds; the level always falls to 0.01.
#[derive(Debug, Clone, Copy)]
struct ToneSpec {
    waveform: Waveform,
    pitch: f32,
    /// `None` holds `pitch` for the whole hit.
    pitch_end: Option<f32>,
    level: f32,
    decay: f32,
}

impl ToneSpec {
    const fn fixed(waveform: Waveform, pitch: f32, level: f32, decay: f32) -> Self {
        Self {
            waveform,
            pitch,
            pitch_end: None,
            level,
            decay,
        }
    }

    const fn sweep(waveform: Waveform, pitch: f32, pitch_end: f32, level: f32, decay: f32) -> Self {
        Self {
            waveform,
            pitch,
            pitch_end: Some(pitch_end),
            level,
            decay,
        }
    }

    fn layer(&self) -> Layer {
        let pitch = match self.pitch_end {
            Some(end) => Ramp::exp(self.pitch, end, self.decay),
            None => Ramp::hold(self.pitch),
        };
        Layer::tone(self.waveform, pitch, Ramp::exp(self.level, 0.01, self.decay))
    }
}

/// Layers per instrument, in `Instrument::ALL` order.
static BUILTIN_TONES: [&[ToneSpec]; Instrument::COUNT] = [
    // kick
    &[ToneSpec::sweep(Waveform::Sine, 150.0, 0.01, 1.0, 0.5)],
    // snare
    &[
        ToneSpec::sweep(Waveform::Triangle, 200.0, 100.0, 0.7, 0.1),
        ToneSpec::fixed(Waveform::Noise, 1.0, 1.0, 0.2),
    ],
    // hihat
    &[ToneSpec::fixed(Waveform::Square, 8_000.0, 0.3, 0.05)],
    // openhat
    &[ToneSpec::fixed(Waveform::Square, 8_000.0, 0.3, 0.3)],
    // clap
    &[ToneSpec::fixed(Waveform::Square, 1_200.0, 0.6, 0.1)],
    // rim
    &[ToneSpec::fixed(Waveform::Square, 1_700.0, 0.5, 0.1)],
    // cowbell
    &[ToneSpec::fixed(Waveform::Square, 800.0, 0.5, 0.1)],
    // crash
    &[ToneSpec::fixed(Waveform::Sawtooth, 5_000.0, 0.4, 1.0)],
];

/// One recipe per instrument.
#[derive(Debug, Clone)]
pub struct RecipeBook {
    recipes: Vec<Recipe>,
}

impl RecipeBook {
    pub fn builtin() -> Self {
        Self {
            recipes: Instrument::ALL.into_iter().map(Recipe::builtin).collect(),
        }
    }

    pub fn get(&self, instrument: Instrument) -> &Recipe {
        &self.recipes[instrument.index()]
    }

    pub fn set(&mut self, instrument: Instrument, recipe: Recipe) {
        self.recipes[instrument.index()] = recipe;
    }

    /// Replace an instrument's synthesized sound with a sample.
    pub fn set_sample(&mut self, instrument: Instrument, buffer: SampleBuffer) {
        self.set(instrument, Recipe::new(vec![Layer::sample(buffer)]));
    }

    /// Built-in recipes with the given WAV overrides. Files that fail to
    /// load become silent placeholders.
    pub fn with_samples<'a>(
        samples: impl IntoIterator<Item = (&'a Instrument, &'a PathBuf)>,
        sample_rate: u32,
    ) -> Self {
        let mut book = Self::builtin();
        for (&instrument, path) in samples {
            book.set_sample(instrument, SampleBuffer::load_or_silent(path, sample_rate));
        }
        book
    }

    /// Restore the synthesized recipe for `instrument`.
    pub fn restore(&mut self, instrument: Instrument) {
        self.set(instrument, Recipe::builtin(instrument));
    }
}

impl Default for RecipeBook {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_instrument_has_a_recipe() {
        let book = RecipeBook::builtin();
        for inst in Instrument::ALL {
            let recipe = book.get(inst);
            assert!(!recipe.layers().is_empty());
            assert!(recipe.duration() > 0.0);
        }
    }

    #[test]
    fn kick_sweeps_from_150_hz() {
        let kick = Recipe::builtin(Instrument::Kick);
        let layer = &kick.layers()[0];
        assert_eq!(layer.pitch.start, 150.0);
        assert_eq!(layer.pitch.end, 0.01);
        assert_eq!(layer.amp.duration, 0.5);
    }

    #[test]
    fn builtin_tones_follow_instrument_order() {
        let waveform = |inst| match Recipe::builtin(inst).layers()[0].source {
            Source::Tone(waveform) => waveform,
            Source::Sample(_) => panic!("{inst} should be synthesized"),
        };
        assert!(matches!(waveform(Instrument::Kick), Waveform::Sine));
        assert!(matches!(waveform(Instrument::Snare), Waveform::Triangle));
        assert!(matches!(waveform(Instrument::Crash), Waveform::Sawtooth));

        let pitch = |inst| Recipe::builtin(inst).layers()[0].pitch.start;
        assert_eq!(pitch(Instrument::HiHat), 8_000.0);
        assert_eq!(pitch(Instrument::Clap), 1_200.0);
        assert_eq!(pitch(Instrument::Rim), 1_700.0);
        assert_eq!(pitch(Instrument::Cowbell), 800.0);

        let hihat = Recipe::builtin(Instrument::HiHat);
        assert_eq!(hihat.layers()[0].pitch.end, 8_000.0);
        assert_eq!(hihat.layers()[0].amp.start, 0.3);
        assert_eq!(hihat.duration(), 0.05);
    }

    #[test]
    fn snare_has_body_and_noise() {
        let snare = Recipe::builtin(Instrument::Snare);
        assert_eq!(snare.layers().len(), 2);
        assert!(matches!(snare.layers()[1].source, Source::Tone(Waveform::Noise)));
        assert_eq!(snare.duration(), 0.2);
    }

    #[test]
    fn open_hat_rings_longer_than_closed() {
        let closed = Recipe::builtin(Instrument::HiHat).duration();
        let open = Recipe::builtin(Instrument::OpenHat).duration();
        assert!(open > closed);
    }

    #[test]
    fn sample_override_and_restore() {
        let mut book = RecipeBook::builtin();
        book.set_sample(Instrument::Clap, SampleBuffer::silent(44_100));
        assert!(matches!(book.get(Instrument::Clap).layers()[0].source, Source::Sample(_)));

        book.restore(Instrument::Clap);
        assert!(matches!(
            book.get(Instrument::Clap).layers()[0].source,
            Source::Tone(Waveform::Square)
        ));
    }

    #[test]
    fn unreadable_sample_becomes_silent_placeholder() {
        let missing = PathBuf::from("/definitely/not/here/rim.wav");
        let book = RecipeBook::with_samples([(&Instrument::Rim, &missing)], 44_100);
        match &book.get(Instrument::Rim).layers()[0].source {
            Source::Sample(buffer) => assert!(buffer.is_silent()),
            other => panic!("expected a sample layer, got {other:?}"),
        }
        assert!(matches!(book.get(Instrument::Kick).layers()[0].source, Source::Tone(_)));
    }
}
