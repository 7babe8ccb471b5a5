use crate::{
    dsp::{dynamics::Compressor, eq::ThreeBandEq, smoother::Smoother},
    graph::{
        extensions::NodeExt,
        node::{GraphNode, RenderCtx},
        through::Through,
    },
};

type MasterChain = Through<Through<ThreeBandEq, Compressor>, Compressor>;

/// Master bus: EQ → glue compressor → limiter → output gain.
pub struct MasterBus {
    chain: MasterChain,
    output: Smoother,
}

impl MasterBus {
    pub fn new() -> Self {
        Self {
            chain: ThreeBandEq::flat()
                .through(Compressor::master())
                .through(Compressor::limiter()),
            output: Smoother::new(1.0),
        }
    }

    pub fn limiter(&self) -> &Compressor {
        self.chain.filter()
    }

    pub fn set_output_gain(&mut self, gain: f32, sample_rate: f32) {
        self.output.set_target(gain.clamp(0.0, 2.0), sample_rate);
    }

    pub fn process(&mut self, buffer: &mut [f32], ctx: &RenderCtx) {
        self.chain.render_block(buffer, ctx);
        self.output.render_block(buffer, ctx);
    }
}

impl Default for MasterBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::amplify::{gain_to_db, peak};

    #[test]
    fn hot_bus_is_held_under_the_ceiling() {
        let mut master = MasterBus::new();
        let ctx = RenderCtx::new(48_000.0);
        let mut buffer = vec![2.0; 9_600];
        master.process(&mut buffer, &ctx);

        let settled = peak(&buffer[4_800..]);
        assert!(gain_to_db(settled) < -2.0, "master let {settled} through");
        assert!(master.limiter().reduction_db() >= 0.0);
    }

    #[test]
    fn quiet_bus_passes_at_unity() {
        let mut master = MasterBus::new();
        let ctx = RenderCtx::new(48_000.0);
        let mut buffer = vec![0.01; 128];
        master.process(&mut buffer, &ctx);
        assert!(buffer.iter().all(|&s| (s - 0.01).abs() < 1e-5));
    }
}
