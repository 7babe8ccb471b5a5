/*
Look-ahead Step Scheduling
==========================

Timer callbacks on the control thread are imprecise (jitter of several ms is
normal), but the audio clock is sample-accurate. So the timer never decides
WHEN a drum sounds; it only decides how often we look ahead:

    every lookahead_ms (25 ms):
        schedule every step whose time falls before now + horizon (100 ms)

  time ──────────────────────────────────────────────────────→
        now          now + horizon
         │━━━━━━━━━━━━━━│
         ▲     ▲     ▲        ▲
         s5    s6    s7       s8 (next tick)

Each scheduled trigger carries its absolute clock time, and the engine starts
the voice on exactly that frame. Because the horizon is longer than the tick
interval, a late tick still finds its steps ahead of the playhead.

Step timing
-----------

    seconds_per_step = 60 / tempo / 4           (16th notes)

With swing s (0-100 %), steps are paired (0-1, 2-3, ...). The first step of
a pair is lengthened and the second shortened by the same amount, so each
pair still spans two straight steps:

    even step:  sps + sps × (s / 100) × 0.5
    odd step:   sps - sps × (s / 100) × 0.5

At s = 100 the pair is 1.5 : 0.5, a hard triplet-ish shuffle.

This module is pure: it computes a schedule from a cursor and a pattern and
returns the advanced cursor. Timers, channels and the engine live elsewhere.
*/

use super::{instrument::Instrument, pattern::Pattern};
use crate::{mixer::channel::Channels, STEPS};

/// Where the scheduler is in the bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    /// Step that will be scheduled next, in `[0, 16)`.
    pub current_step: usize,
    /// Absolute clock time of `current_step`.
    pub next_step_time: f64,
}

impl Cursor {
    pub fn new(current_step: usize, next_step_time: f64) -> Self {
        Self {
            current_step: current_step % STEPS,
            next_step_time,
        }
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new(0, 0.0)
    }
}

/// Start `instrument` at absolute clock time `time`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trigger {
    pub instrument: Instrument,
    pub time: f64,
}

/// Step `step` becomes audible at `time` (drives the grid highlight).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepEvent {
    pub step: usize,
    pub time: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepSchedule {
    pub triggers: Vec<Trigger>,
    pub steps: Vec<StepEvent>,
    pub cursor: Cursor,
}

/// Straight 16th-note length at `tempo` BPM.
pub fn seconds_per_step(tempo: f64) -> f64 {
    60.0 / tempo / 4.0
}

/// Length of `step` at `tempo` with `swing` percent.
pub fn step_duration(step: usize, tempo: f64, swing: f64) -> f64 {
    let sps = seconds_per_step(tempo);
    if swing <= 0.0 {
        return sps;
    }
    let offset = sps * (swing / 100.0) * 0.5;
    if step % 2 == 0 {
        sps + offset
    } else {
        sps - offset
    }
}

/// Schedule every step that starts before `now + horizon`.
///
/// Triggers are emitted for each instrument with a hit on the step that
/// passes the channel filter (not muted; when anything is soloed, soloed
/// itself). A step event is emitted for every step, hit or not.
pub fn compute_step_schedule(
    cursor: Cursor,
    pattern: &Pattern,
    channels: &Channels,
    now: f64,
    horizon: f64,
) -> StepSchedule {
    let mut schedule = StepSchedule {
        cursor,
        ..StepSchedule::default()
    };
    let limit = now + horizon;
    let cursor = &mut schedule.cursor;

    while cursor.next_step_time < limit {
        let step = cursor.current_step;
        let time = cursor.next_step_time;

        schedule.triggers.extend(
            pattern
                .hits_at(step)
                .filter(|&inst| channels.should_trigger(inst))
                .map(|instrument| Trigger { instrument, time }),
        );
        schedule.steps.push(StepEvent { step, time });

        cursor.next_step_time += step_duration(step, pattern.tempo, pattern.swing);
        cursor.current_step = (step + 1) % STEPS;
    }

    schedule
}
