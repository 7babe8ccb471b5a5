use crate::{
    dsp::{dynamics::Compressor, eq::ThreeBandEq},
    graph::node::{GraphNode, RenderCtx},
};

impl GraphNode for ThreeBandEq {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.render(out, ctx.sample_rate);
    }

    fn reset(&mut self) {
        ThreeBandEq::reset(self);
    }
}

impl GraphNode for Compressor {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.render(out, ctx.sample_rate);
    }

    fn reset(&mut self) {
        Compressor::reset(self);
    }
}
