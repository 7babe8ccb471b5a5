use crate::{
    dsp::{
        amplify::{apply_gain, db_to_gain},
        smoother::Smoother,
    },
    graph::node::{GraphNode, RenderCtx},
};

/// Fixed gain stage (input trims, output level).
#[derive(Debug, Clone, Copy)]
pub struct Gain {
    gain: f32,
}

impl Gain {
    pub fn new(gain: f32) -> Self {
        Self { gain: gain.max(0.0) }
    }

    pub fn from_db(db: f32) -> Self {
        Self::new(db_to_gain(db))
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain.max(0.0);
    }
}

impl GraphNode for Gain {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        if self.gain != 1.0 {
            apply_gain(out, self.gain);
        }
    }
}

/// A smoothed gain is a gain stage whose value glides to new targets.
impl GraphNode for Smoother {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        self.process(out);
    }

    fn reset(&mut self) {
        let target = self.target();
        self.set_immediate(target);
    }
}
