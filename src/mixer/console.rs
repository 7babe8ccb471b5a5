use crate::{
    dsp::amplify::{sum_into, sum_scaled_into},
    graph::{
        delay::EchoNode,
        node::{GraphNode, RenderCtx},
    },
    mixer::{channel::ChannelStrip, master::MasterBus},
    sequencing::{instrument::Instrument, pattern::DEFAULT_TEMPO},
    MAX_BLOCK_SIZE,
};

pub const FX_FEEDBACK: f32 = 0.35;

/// The whole audio-side mixer: eight strips, the effects return and the
/// master bus.
///
/// Per block, voices render into their channel buffers, then `mix_into`
/// runs the strips, sums them (plus the echo return) into the master bus
/// and writes the result. All buffers are allocated up front.
pub struct Console {
    strips: Vec<ChannelStrip>,
    channel_buffers: Vec<Vec<f32>>,
    fx_bus: Vec<f32>,
    echo: EchoNode,
    master: MasterBus,
}

impl Console {
    pub fn new() -> Self {
        Self {
            strips: (0..Instrument::COUNT).map(|_| ChannelStrip::new()).collect(),
            channel_buffers: vec![vec![0.0; MAX_BLOCK_SIZE]; Instrument::COUNT],
            fx_bus: vec![0.0; MAX_BLOCK_SIZE],
            echo: EchoNode::tempo_synced(DEFAULT_TEMPO as f32, FX_FEEDBACK),
            master: MasterBus::new(),
        }
    }

    /// Zero the channel buffers for a block of `frames`.
    pub fn begin_block(&mut self, frames: usize) {
        let frames = frames.min(MAX_BLOCK_SIZE);
        for buffer in &mut self.channel_buffers {
            buffer[..frames].fill(0.0);
        }
    }

    /// Input buffer of `instrument`'s strip for the current block.
    pub fn channel_input(&mut self, instrument: Instrument, frames: usize) -> &mut [f32] {
        &mut self.channel_buffers[instrument.index()][..frames.min(MAX_BLOCK_SIZE)]
    }

    /// Run every strip and the master bus, overwriting `out`.
    pub fn mix_into(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let frames = out.len().min(MAX_BLOCK_SIZE);
        let out = &mut out[..frames];
        out.fill(0.0);
        let fx_bus = &mut self.fx_bus[..frames];
        fx_bus.fill(0.0);

        for (strip, buffer) in self.strips.iter_mut().zip(&mut self.channel_buffers) {
            let buffer = &mut buffer[..frames];
            strip.process(buffer, ctx);
            sum_into(out, buffer);
            sum_scaled_into(fx_bus, buffer, strip.fx_send());
        }

        self.echo.render_block(fx_bus, ctx);
        sum_into(out, fx_bus);

        self.master.process(out, ctx);
    }

    pub fn strip_mut(&mut self, instrument: Instrument) -> &mut ChannelStrip {
        &mut self.strips[instrument.index()]
    }

    pub fn set_channel_gain(&mut self, instrument: Instrument, gain: f32, sample_rate: f32) {
        self.strip_mut(instrument).set_gain(gain, sample_rate);
    }

    pub fn set_fx_send(&mut self, instrument: Instrument, amount: f32) {
        self.strip_mut(instrument).set_fx_send(amount);
    }

    pub fn set_master_gain(&mut self, gain: f32, sample_rate: f32) {
        self.master.set_output_gain(gain, sample_rate);
    }

    /// Retune the echo to three 16th notes at `bpm`.
    pub fn set_tempo(&mut self, bpm: f32) {
        self.echo.set_delay_secs(EchoNode::dotted_eighth(bpm));
    }

    /// True while the echo tail is still audible.
    pub fn is_ringing(&self) -> bool {
        self.echo.is_active()
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}
