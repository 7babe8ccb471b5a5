pub mod config;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod export;
pub mod graph; // Composable audio graph nodes
pub mod mixer; // Channel strips and master bus
pub mod sequencing; // Patterns, look-ahead scheduling, transport
pub mod synth; // Percussion recipes and one-shot voices

pub use config::MachineConfig;
pub use engine::Engine;
pub use error::{Error, Result};
pub use sequencing::{
    instrument::Instrument,
    pattern::Pattern,
    transport::DrumMachine,
};

pub const MAX_BLOCK_SIZE: usize = 2048;
/// Number of 16th-note steps in one pattern bar.
pub const STEPS: usize = 16;
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;
/// Two seconds at 96 kHz; enough for a dotted-eighth echo at 60 BPM.
pub const MAX_DELAY_SAMPLES: usize = 192_000;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
