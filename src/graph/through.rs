use crate::graph::node::{GraphNode, RenderCtx};

/*
Serial Signal Chain (Through)
=============================

Through connects two nodes in series, passing the output of the first into
the second. Every stage of a channel strip is a Through:

  [trim] ──→ [EQ] ──→ [compressor] ──→ post-gain

and so is the master bus:

  [sum + fx return] ──→ [EQ] ──→ [compressor] ──→ [limiter] ──→ out

How It Works:
-------------
1. Render the first stage into the buffer (in place)
2. Pass that same buffer through the second stage (in place)

    let strip = Gain::from_db(-20.0)
        .through(ThreeBandEq::flat())
        .through(Compressor::channel());

Nesting is left-associative, so the type of that strip is
Through<Through<Gain, ThreeBandEq>, Compressor>. No boxing, no allocation.
*/

pub struct Through<S, F> {
    source: S,
    filter: F,
}

impl<S, F> Through<S, F> {
    pub fn new(source: S, filter: F) -> Self {
        Self { source, filter }
    }

    /// Second stage of the chain.
    pub fn filter(&self) -> &F {
        &self.filter
    }
}

impl<S: GraphNode, F: GraphNode> GraphNode for Through<S, F> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source.render_block(out, ctx);
        self.filter.render_block(out, ctx);
    }

    fn reset(&mut self) {
        self.source.reset();
        self.filter.reset();
    }

    fn is_active(&self) -> bool {
        self.source.is_active() || self.filter.is_active()
    }
}
