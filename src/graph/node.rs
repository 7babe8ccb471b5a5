/// Context passed to graph nodes during rendering
///
/// - sample_rate: Audio sample rate (e.g., 44100.0)
/// - time: Clock time of the first sample in the block, in seconds
#[derive(Debug, Clone, Copy)]
pub struct RenderCtx {
    pub sample_rate: f32,
    pub time: f64,
}

impl RenderCtx {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            time: 0.0,
        }
    }

    pub fn at(sample_rate: f32, time: f64) -> Self {
        Self { sample_rate, time }
    }
}

/// Core trait for block-based audio processors
///
/// Mixer stages (trim, EQ, dynamics, echo) all process a buffer in place, so
/// they can be chained with `NodeExt::through`.
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);

    /// Drop any internal state (filter memory, delay buffers, gain reduction).
    ///
    /// Default implementation does nothing (stateless nodes).
    fn reset(&mut self) {}

    /// Check if this node still has output pending without new input
    ///
    /// Stateless processors are never "ringing"; delays and reverbs are.
    fn is_active(&self) -> bool {
        false
    }
}

/// Allow boxed graph nodes to be used as graph nodes (for dynamic dispatch)
impl GraphNode for Box<dyn GraphNode> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        (**self).render_block(out, ctx)
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }
}
