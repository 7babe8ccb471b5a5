use crate::{
    dsp::{amplify::peak, delay::DelayLine},
    graph::node::{GraphNode, RenderCtx},
    MAX_DELAY_SAMPLES,
};

/// Below this the echo tail counts as silent.
const SILENCE: f32 = 1e-4;

/// Feedback echo used as the effects return. Output is wet only; the dry
/// signal reaches the master bus through the channel strips.
pub struct EchoNode {
    delay_line: DelayLine,
    delay_secs: f32,
    feedback: f32,
    ringing: bool,
}

impl EchoNode {
    pub fn new(delay_secs: f32, feedback: f32) -> Self {
        Self {
            delay_line: DelayLine::with_capacity(MAX_DELAY_SAMPLES),
            delay_secs: delay_secs.max(0.0),
            feedback: feedback.clamp(0.0, 0.95),
            ringing: false,
        }
    }

    /// Echo three 16th notes behind the beat.
    pub fn tempo_synced(bpm: f32, feedback: f32) -> Self {
        Self::new(Self::dotted_eighth(bpm), feedback)
    }

    /// Length of three 16th notes at `bpm`, in seconds.
    pub fn dotted_eighth(bpm: f32) -> f32 {
        3.0 * 60.0 / bpm.max(1.0) / 4.0
    }

    pub fn set_delay_secs(&mut self, delay_secs: f32) {
        self.delay_secs = delay_secs.max(0.0);
    }

    pub fn delay_secs(&self) -> f32 {
        self.delay_secs
    }

    pub fn feedback(&self) -> f32 {
        self.feedback
    }
}

impl GraphNode for EchoNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let input_peak = peak(out);
        let delay_samples = (self.delay_secs * ctx.sample_rate).round() as usize;
        self.delay_line.render(out, delay_samples, self.feedback);

        self.ringing = input_peak > SILENCE || peak(out) > SILENCE;
    }

    fn reset(&mut self) {
        self.delay_line.reset();
        self.ringing = false;
    }

    fn is_active(&self) -> bool {
        self.ringing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_eighth_at_120_bpm() {
        assert!((EchoNode::dotted_eighth(120.0) - 0.375).abs() < 1e-6);
    }

    #[test]
    fn echo_is_wet_only_and_delayed() {
        let ctx = RenderCtx::new(1_000.0);
        let mut echo = EchoNode::new(0.01, 0.35); // 10 samples
        let mut buffer = vec![0.0; 32];
        buffer[0] = 1.0;
        echo.render_block(&mut buffer, &ctx);

        assert_eq!(buffer[0], 0.0);
        assert_eq!(buffer[10], 1.0);
        assert!((buffer[20] - 0.35).abs() < 1e-6);
    }

    #[test]
    fn tail_dies_out() {
        let ctx = RenderCtx::new(1_000.0);
        let mut echo = EchoNode::new(0.01, 0.35);
        let mut buffer = vec![0.0; 16];
        buffer[0] = 1.0;
        echo.render_block(&mut buffer, &ctx);
        assert!(echo.is_active());

        let mut silence = vec![0.0; 16];
        for _ in 0..20 {
            silence.fill(0.0);
            echo.render_block(&mut silence, &ctx);
        }
        assert!(!echo.is_active());
    }
}
