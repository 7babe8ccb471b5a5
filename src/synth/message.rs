#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer};

use std::collections::VecDeque;

use crate::sequencing::{instrument::Instrument, scheduler::Trigger};

/// Control → audio thread messages.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum EngineMessage {
    /// Start a voice at the trigger's absolute clock time.
    Trigger(Trigger),
    /// Ramp a channel fader (volume, or 0.0 when muted).
    SetChannelGain { instrument: Instrument, gain: f32 },
    SetFxSend { instrument: Instrument, amount: f32 },
    SetMasterGain { gain: f32 },
    /// Keep tempo-synced effects in time.
    SetTempo { bpm: f32 },
}

/// Where the transport sends engine messages.
pub trait ControlSink: Send {
    /// Returns `false` if the message was dropped.
    fn send(&mut self, message: EngineMessage) -> bool;
}

/// Where the engine reads them from.
pub trait MessageReceiver {
    fn pop(&mut self) -> Option<EngineMessage>;
}

#[cfg(feature = "rtrb")]
impl ControlSink for Producer<EngineMessage> {
    fn send(&mut self, message: EngineMessage) -> bool {
        match self.push(message) {
            Ok(()) => true,
            Err(_) => {
                tracing::warn!(?message, "engine queue full, dropping message");
                false
            }
        }
    }
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<EngineMessage> {
    fn pop(&mut self) -> Option<EngineMessage> {
        Consumer::pop(self).ok()
    }
}

/// Records messages (tests, offline tools).
impl ControlSink for Vec<EngineMessage> {
    fn send(&mut self, message: EngineMessage) -> bool {
        self.push(message);
        true
    }
}

impl MessageReceiver for VecDeque<EngineMessage> {
    fn pop(&mut self) -> Option<EngineMessage> {
        self.pop_front()
    }
}

#[cfg(all(test, feature = "rtrb"))]
mod tests {
    use super::*;

    #[test]
    fn ring_buffer_round_trip() {
        let (mut tx, mut rx) = rtrb::RingBuffer::<EngineMessage>::new(2);
        let msg = EngineMessage::SetMasterGain { gain: 0.5 };

        assert!(tx.send(msg));
        assert!(tx.send(msg));
        assert!(!tx.send(msg), "third push should overflow");

        assert_eq!(MessageReceiver::pop(&mut rx), Some(msg));
        assert_eq!(MessageReceiver::pop(&mut rx), Some(msg));
        assert_eq!(MessageReceiver::pop(&mut rx), None);
    }
}
