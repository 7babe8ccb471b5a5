//! Patterns, the preset catalog, look-ahead scheduling and the transport.

pub mod clock;
pub mod instrument;
pub mod pattern;
pub mod presets;
pub mod scheduler;
pub mod store;
pub mod transport;

pub use clock::{AudioClock, FrameClock, ManualClock};
pub use instrument::Instrument;
pub use pattern::{Pattern, PatternSpec};
pub use scheduler::{compute_step_schedule, Cursor, StepEvent, StepSchedule, Trigger};
pub use store::PatternStore;
pub use transport::{DrumMachine, TransportState};
