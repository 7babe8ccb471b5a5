//! Per-frame copy of what the UI draws, taken under the machine lock.

use casa_drums::{mixer::Channels, sequencing::TransportState, Pattern};

use crate::app::LiveMachine;

pub struct UiState {
    pub pattern: Pattern,
    pub transport: TransportState,
    /// Step under the playhead, if any.
    pub highlighted: Option<usize>,
    pub channels: Channels,
    pub peak: f32,
    pub sample_rate: f64,
}

impl UiState {
    pub fn capture(machine: &LiveMachine, peak: f32) -> Self {
        Self {
            pattern: machine.pattern().clone(),
            transport: machine.state(),
            highlighted: machine.highlighted_step(),
            channels: machine.channels().clone(),
            peak,
            sample_rate: machine.clock().sample_rate(),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.transport == TransportState::Playing
    }
}
