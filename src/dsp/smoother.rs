//! Click-free parameter changes.
//!
//! Jumping a gain from 0.8 to 0.0 between two samples puts a step into the
//! waveform, which is heard as a click. `Smoother` moves linearly to a new
//! target over `DEFAULT_RAMP_SECS` instead.

/// Ramp time for volume and mute changes.
pub const DEFAULT_RAMP_SECS: f32 = 0.02;

#[derive(Debug, Clone)]
pub struct Smoother {
    current: f32,
    target: f32,
    step: f32,
    remaining: u32,
    ramp_secs: f32,
}

impl Smoother {
    pub fn new(value: f32) -> Self {
        Self::with_ramp(value, DEFAULT_RAMP_SECS)
    }

    pub fn with_ramp(value: f32, ramp_secs: f32) -> Self {
        Self {
            current: value,
            target: value,
            step: 0.0,
            remaining: 0,
            ramp_secs: ramp_secs.max(0.0),
        }
    }

    /// Start ramping towards `target` from wherever the value is now.
    pub fn set_target(&mut self, target: f32, sample_rate: f32) {
        self.target = target;
        let samples = (self.ramp_secs * sample_rate).round() as u32;
        if samples == 0 {
            self.current = target;
            self.remaining = 0;
            return;
        }
        self.step = (target - self.current) / samples as f32;
        self.remaining = samples;
    }

    /// Jump straight to `value`.
    pub fn set_immediate(&mut self, value: f32) {
        self.current = value;
        self.target = value;
        self.remaining = 0;
    }

    #[inline]
    pub fn next_value(&mut self) -> f32 {
        if self.remaining > 0 {
            self.remaining -= 1;
            self.current = if self.remaining == 0 {
                self.target
            } else {
                self.current + self.step
            };
        }
        self.current
    }

    /// Multiply a buffer by the (moving) value in place.
    pub fn process(&mut self, buffer: &mut [f32]) {
        if self.remaining == 0 {
            let gain = self.current;
            for sample in buffer.iter_mut() {
                *sample *= gain;
            }
            return;
        }
        for sample in buffer.iter_mut() {
            *sample *= self.next_value();
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_ramping(&self) -> bool {
        self.remaining > 0
    }
}
