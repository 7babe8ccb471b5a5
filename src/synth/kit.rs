use crate::{
    mixer::console::Console,
    sequencing::instrument::Instrument,
    synth::{recipe::RecipeBook, voice::DrumVoice},
};

/// Voices alive at once before the oldest is stolen.
pub const MAX_VOICES: usize = 64;

/// The set of sounding drum hits.
///
/// Each trigger starts a fresh voice from the recipe book; finished voices
/// are dropped after every block. Capacity is reserved up front, and at
/// `MAX_VOICES` the oldest hit is cut to make room.
pub struct DrumKit {
    recipes: RecipeBook,
    voices: Vec<DrumVoice>,
    sample_rate: f32,
}

impl DrumKit {
    pub fn new(sample_rate: f32) -> Self {
        Self::with_recipes(RecipeBook::builtin(), sample_rate)
    }

    pub fn with_recipes(recipes: RecipeBook, sample_rate: f32) -> Self {
        Self {
            recipes,
            voices: Vec::with_capacity(MAX_VOICES),
            sample_rate,
        }
    }

    pub fn trigger(&mut self, instrument: Instrument, start_frame: u64) {
        if self.voices.len() >= MAX_VOICES {
            self.voices.remove(0);
        }
        let recipe = self.recipes.get(instrument);
        self.voices
            .push(DrumVoice::new(instrument, recipe, start_frame, self.sample_rate));
    }

    /// Render every voice into its channel input for the block starting at
    /// `block_start`, then drop finished voices.
    pub fn render(&mut self, console: &mut Console, block_start: u64, frames: usize) {
        for voice in &mut self.voices {
            let instrument = voice.instrument();
            voice.render_add(console.channel_input(instrument, frames), block_start);
        }
        self.voices.retain(|voice| !voice.is_finished());
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }
}
