use crate::MIN_TIME;

/*
Exponential Ramp Envelope
=========================

Percussion is all attack and decay: there is no gate to hold and no sustain
stage. Every amplitude and pitch contour in the drum recipes is a single
exponential ramp from a start value to an end value over a fixed time.

Vocabulary
----------

  start       Value at the trigger instant (e.g. 150 Hz, or gain 1.0).

  end         Value the ramp arrives at after `duration` seconds, and holds
              afterwards.

  floor       Exponential curves can never reach zero: (end / start) would be
              zero and the log undefined. Every ramp value is clamped to at
              least ENVELOPE_FLOOR. A "decay to silence" is a decay to 0.01
              (-40 dB), after which the voice is simply dropped.


The Shape
---------

    value(t) = start * (end / start) ^ (t / duration)      0 <= t <= duration
    value(t) = end                                          t > duration

  Level
    1.0 ┐╲
        │ ╲
        │  ╲_
        │    ╲__
        │       ╲____
   0.01 └────────────╲══════→ Time
         0        duration

Equal time steps multiply the value by the same ratio, which is how acoustic
drums decay and why linear decays sound "wooden" on percussion.


Per-sample form
---------------

Evaluating powf per sample is wasteful. Over N = duration * sample_rate
samples the value is multiplied N times by

    ratio = (end / start) ^ (1 / N)

so the renderer only needs one multiply per sample. `value_at` keeps the
closed form for analysis and tests.
*/

/// Lowest value any ramp reaches.
pub const ENVELOPE_FLOOR: f32 = 0.01;

/// An exponential contour from `start` to `end` over `duration` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ramp {
    pub start: f32,
    pub end: f32,
    pub duration: f32,
}

impl Ramp {
    /// Exponential ramp. Both endpoints are floored at `ENVELOPE_FLOOR`.
    pub fn exp(start: f32, end: f32, duration: f32) -> Self {
        Self {
            start: start.max(ENVELOPE_FLOOR),
            end: end.max(ENVELOPE_FLOOR),
            duration: duration.max(MIN_TIME),
        }
    }

    /// Constant value. Used for fixed-pitch oscillators.
    pub fn hold(value: f32) -> Self {
        Self {
            start: value.max(ENVELOPE_FLOOR),
            end: value.max(ENVELOPE_FLOOR),
            duration: MIN_TIME,
        }
    }

    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration.max(MIN_TIME);
        self
    }

    /// Closed-form value `t` seconds after the trigger.
    pub fn value_at(&self, t: f32) -> f32 {
        if t <= 0.0 {
            self.start
        } else if t >= self.duration {
            self.end
        } else {
            self.start * (self.end / self.start).powf(t / self.duration)
        }
    }
}

/// Sample-by-sample renderer for a `Ramp`.
#[derive(Debug, Clone)]
pub struct RampEnvelope {
    level: f32,
    ratio: f32,
    end: f32,
    remaining: u32,
}

impl RampEnvelope {
    pub fn new(ramp: Ramp, sample_rate: f32) -> Self {
        let samples = (ramp.duration * sample_rate).round().max(1.0);
        Self {
            level: ramp.start,
            ratio: (ramp.end / ramp.start).powf(1.0 / samples),
            end: ramp.end,
            remaining: samples as u32,
        }
    }

    /// Current value, then advance one sample.
    #[inline]
    pub fn next_value(&mut self) -> f32 {
        let value = self.level;
        if self.remaining > 0 {
            self.remaining -= 1;
            self.level = if self.remaining == 0 {
                self.end
            } else {
                self.level * self.ratio
            };
        }
        value.max(ENVELOPE_FLOOR)
    }

    /// True once the ramp has arrived at its end value.
    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    pub fn level(&self) -> f32 {
        self.level
    }
}
