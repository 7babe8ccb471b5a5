// Purpose: the audio-thread renderer
// Consumes control messages, starts voices on exact frames, runs the mixer
// and advances the audio clock.

use crate::{
    dsp::amplify::peak,
    graph::node::RenderCtx,
    mixer::{channel::Channels, console::Console},
    sequencing::clock::{AudioClock, FrameClock},
    synth::{
        kit::DrumKit,
        message::{ControlSink, EngineMessage, MessageReceiver},
        recipe::RecipeBook,
    },
    MAX_BLOCK_SIZE,
};

pub struct Engine {
    clock: FrameClock,
    kit: DrumKit,
    console: Console,
    block: Vec<f32>,
    sample_rate: f32,
    last_peak: f32,
}

impl Engine {
    /// The engine advances `clock`; hand a clone of it to the transport.
    pub fn new(clock: FrameClock) -> Self {
        Self::with_recipes(clock, RecipeBook::builtin())
    }

    pub fn with_recipes(clock: FrameClock, recipes: RecipeBook) -> Self {
        let sample_rate = clock.sample_rate() as f32;
        Self {
            clock,
            kit: DrumKit::with_recipes(recipes, sample_rate),
            console: Console::new(),
            block: vec![0.0; MAX_BLOCK_SIZE],
            sample_rate,
            last_peak: 0.0,
        }
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn active_voices(&self) -> usize {
        self.kit.active_voices()
    }

    /// Peak of the most recent rendered block (for meters).
    pub fn last_peak(&self) -> f32 {
        self.last_peak
    }

    /// Set every fader and send from `channels` without ramping.
    pub fn apply_channels(&mut self, channels: &Channels) {
        for (instrument, state) in channels.iter() {
            self.console
                .strip_mut(instrument)
                .set_gain_immediate(state.effective_gain());
            self.console.set_fx_send(instrument, state.fx_send);
        }
    }

    pub fn handle(&mut self, message: EngineMessage) {
        match message {
            EngineMessage::Trigger(trigger) => {
                // Late triggers start at the top of the next block.
                let start = self.clock.frame_at(trigger.time).max(self.clock.frames());
                self.kit.trigger(trigger.instrument, start);
            }
            EngineMessage::SetChannelGain { instrument, gain } => {
                self.console
                    .set_channel_gain(instrument, gain, self.sample_rate);
            }
            EngineMessage::SetFxSend { instrument, amount } => {
                self.console.set_fx_send(instrument, amount);
            }
            EngineMessage::SetMasterGain { gain } => {
                self.console.set_master_gain(gain, self.sample_rate);
            }
            EngineMessage::SetTempo { bpm } => {
                self.console.set_tempo(bpm);
            }
        }
    }

    /// Apply every pending message.
    pub fn drain<R: MessageReceiver + ?Sized>(&mut self, rx: &mut R) {
        while let Some(message) = rx.pop() {
            self.handle(message);
        }
    }

    /// Render mono output. While the clock is suspended the output is
    /// silence and time does not move.
    pub fn render(&mut self, out: &mut [f32]) {
        if self.clock.is_suspended() {
            out.fill(0.0);
            self.last_peak = 0.0;
            return;
        }

        let mut peak_level = 0.0f32;
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            let frames = chunk.len();
            let block_start = self.clock.frames();
            let ctx = RenderCtx::at(self.sample_rate, self.clock.now());

            self.console.begin_block(frames);
            self.kit.render(&mut self.console, block_start, frames);
            self.console.mix_into(chunk, &ctx);

            peak_level = peak_level.max(peak(chunk));
            self.clock.advance(frames as u64);
        }
        self.last_peak = peak_level;
    }

    /// Render into an interleaved device buffer, copying mono to every
    /// channel.
    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        let total_frames = data.len() / channels;
        let mut frames_written = 0;

        while frames_written < total_frames {
            let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
            let mut block = std::mem::take(&mut self.block);
            self.render(&mut block[..frames_to_render]);

            let out_off = frames_written * channels;
            for (i, &s) in block[..frames_to_render].iter().enumerate() {
                let frame = out_off + i * channels;
                data[frame..frame + channels].fill(s);
            }
            self.block = block;

            frames_written += frames_to_render;
        }
    }
}

/// Offline rendering: messages are applied immediately.
impl ControlSink for Engine {
    fn send(&mut self, message: EngineMessage) -> bool {
        self.handle(message);
        true
    }
}
