// Purpose: procedural percussion, one-shot voices, control messages
// This layer sits between the scheduler's triggers and the mixer's channels

pub mod kit;
pub mod message;
pub mod recipe;
pub mod sample;
pub mod voice;

pub use kit::DrumKit;
pub use message::{ControlSink, EngineMessage, MessageReceiver};
pub use recipe::{Recipe, RecipeBook};
