use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};

/// A monotonic audio-time source in seconds.
///
/// The scheduler only ever reads the clock; whoever renders audio advances
/// it. Trigger times handed to the engine are absolute values of this clock.
pub trait AudioClock: Send {
    fn now(&self) -> f64;

    /// A suspended clock does not advance (the device is paused or not yet
    /// started).
    fn is_suspended(&self) -> bool {
        false
    }

    /// Try to resume a suspended clock. Returns whether it is running now.
    fn resume(&self) -> bool {
        true
    }
}

/// Clock driven by frames rendered on the audio thread.
///
/// Clones share the same counters, so the engine advances the copy it owns
/// and the transport reads its own.
#[derive(Debug, Clone)]
pub struct FrameClock {
    frames: Arc<AtomicU64>,
    suspended: Arc<AtomicBool>,
    sample_rate: f64,
}

impl FrameClock {
    /// Starts suspended: the device resumes it on the first `play()`.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            frames: Arc::new(AtomicU64::new(0)),
            suspended: Arc::new(AtomicBool::new(true)),
            sample_rate: sample_rate.max(1) as f64,
        }
    }

    /// A clock that is already running (offline rendering).
    pub fn running(sample_rate: u32) -> Self {
        let clock = Self::new(sample_rate);
        clock.suspended.store(false, Ordering::Release);
        clock
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Acquire)
    }

    pub fn advance(&self, frames: u64) {
        self.frames.fetch_add(frames, Ordering::AcqRel);
    }

    pub fn suspend(&self) {
        self.suspended.store(true, Ordering::Release);
    }

    /// Frame index of absolute time `t` (rounded to the nearest frame).
    pub fn frame_at(&self, t: f64) -> u64 {
        (t.max(0.0) * self.sample_rate).round() as u64
    }
}

impl AudioClock for FrameClock {
    fn now(&self) -> f64 {
        self.frames() as f64 / self.sample_rate
    }

    fn is_suspended(&self) -> bool {
        self.suspended.load(Ordering::Acquire)
    }

    fn resume(&self) -> bool {
        self.suspended.store(false, Ordering::Release);
        true
    }
}

/// Hand-driven clock for tests and tools. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    bits: Arc<AtomicU64>,
    suspended: Arc<AtomicBool>,
    refuse_resume: bool,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(t: f64) -> Self {
        let clock = Self::new();
        clock.set(t);
        clock
    }

    /// A suspended clock whose `resume()` always fails.
    pub fn stuck_suspended() -> Self {
        let clock = Self {
            refuse_resume: true,
            ..Self::default()
        };
        clock.suspend();
        clock
    }

    pub fn set(&self, t: f64) {
        self.bits.store(t.to_bits(), Ordering::Release);
    }

    pub fn advance(&self, dt: f64) {
        self.set(self.now() + dt);
    }

    pub fn suspend(&self) {
        self.suspended.store(true, Ordering::Release);
    }
}

impl AudioClock for ManualClock {
    fn now(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }

    fn is_suspended(&self) -> bool {
        self.suspended.load(Ordering::Acquire)
    }

    fn resume(&self) -> bool {
        if self.refuse_resume {
            return false;
        }
        self.suspended.store(false, Ordering::Release);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_clock_counts_seconds() {
        let clock = FrameClock::running(48_000);
        let reader = clock.clone();
        clock.advance(24_000);
        assert_eq!(reader.now(), 0.5);
        assert_eq!(reader.frame_at(0.25), 12_000);
    }

    #[test]
    fn frame_clock_starts_suspended() {
        let clock = FrameClock::new(44_100);
        assert!(clock.is_suspended());
        assert!(clock.resume());
        assert!(!clock.is_suspended());
    }

    #[test]
    fn manual_clock_is_shared() {
        let clock = ManualClock::starting_at(1.0);
        let other = clock.clone();
        clock.advance(0.5);
        assert_eq!(other.now(), 1.5);
    }

    #[test]
    fn stuck_clock_refuses_resume() {
        let clock = ManualClock::stuck_suspended();
        assert!(!clock.resume());
        assert!(clock.is_suspended());
    }
}
