use crate::{
    dsp::{envelope::RampEnvelope, oscillator::Oscillator},
    sequencing::instrument::Instrument,
    synth::{
        recipe::{Layer, Recipe, Source, MAX_LAYERS},
        sample::SamplePlayer,
    },
};

enum LayerSource {
    Tone(Oscillator),
    Sample(SamplePlayer),
}

struct LayerVoice {
    source: LayerSource,
    pitch: RampEnvelope,
    amp: RampEnvelope,
    gain: f32,
}

impl LayerVoice {
    fn new(layer: &Layer, sample_rate: f32, seed: u32) -> Self {
        let source = match &layer.source {
            Source::Tone(waveform) => LayerSource::Tone(Oscillator::with_seed(*waveform, seed)),
            Source::Sample(buffer) => LayerSource::Sample(SamplePlayer::new(buffer.clone(), sample_rate)),
        };
        Self {
            source,
            pitch: RampEnvelope::new(layer.pitch, sample_rate),
            amp: RampEnvelope::new(layer.amp, sample_rate),
            gain: layer.gain,
        }
    }

    #[inline]
    fn next_sample(&mut self, sample_rate: f32) -> f32 {
        let freq = self.pitch.next_value();
        let amp = self.amp.next_value();
        let raw = match &mut self.source {
            LayerSource::Tone(osc) => osc.next_sample(freq, sample_rate),
            LayerSource::Sample(player) => player.next_sample(),
        };
        raw * amp * self.gain
    }

    fn is_finished(&self) -> bool {
        match &self.source {
            LayerSource::Tone(_) => self.amp.is_finished(),
            LayerSource::Sample(player) => player.is_finished(),
        }
    }
}

/// One drum hit: created per trigger, dropped once every layer has decayed.
///
/// Layers are stored inline so starting a voice does not allocate.
pub struct DrumVoice {
    instrument: Instrument,
    layers: [Option<LayerVoice>; MAX_LAYERS],
    /// Absolute output frame of the first sample.
    start_frame: u64,
    sample_rate: f32,
}

impl DrumVoice {
    pub fn new(instrument: Instrument, recipe: &Recipe, start_frame: u64, sample_rate: f32) -> Self {
        let mut layers: [Option<LayerVoice>; MAX_LAYERS] = Default::default();
        // Vary the noise seed per hit so consecutive snares are not identical.
        let seed = (start_frame as u32) ^ 0x9E37_79B9;
        for (slot, layer) in layers.iter_mut().zip(recipe.layers()) {
            *slot = Some(LayerVoice::new(layer, sample_rate, seed));
        }

        Self {
            instrument,
            layers,
            start_frame,
            sample_rate,
        }
    }

    pub fn instrument(&self) -> Instrument {
        self.instrument
    }

    pub fn start_frame(&self) -> u64 {
        self.start_frame
    }

    /// Add this voice's output for the block starting at `block_start` into
    /// `out`. Frames before `start_frame` are left untouched.
    pub fn render_add(&mut self, out: &mut [f32], block_start: u64) {
        let offset = self.start_frame.saturating_sub(block_start);
        if offset >= out.len() as u64 {
            return;
        }
        let sample_rate = self.sample_rate;

        for layer in self.layers.iter_mut().flatten() {
            for sample in &mut out[offset as usize..] {
                if layer.is_finished() {
                    break;
                }
                *sample += layer.next_sample(sample_rate);
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.layers.iter().flatten().all(LayerVoice::is_finished)
    }
}
