//! Per-instrument channel strips, the effects return and the master bus.

pub mod channel;
pub mod console;
pub mod master;

pub use channel::{ChannelState, ChannelStrip, Channels};
pub use console::Console;
pub use master::MasterBus;
