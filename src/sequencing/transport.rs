//! Transport: the control-side context that ties the store, the scheduler,
//! the channel states and the visual queue together.
//!
//! ```text
//!            play()               pause()
//!  Stopped ─────────→ Playing ─────────→ Paused
//!     ▲                 │  ▲                │
//!     │     stop()      │  └────────────────┘
//!     └─────────────────┘       play()
//! ```
//!
//! `tick()` is called from a timer every `lookahead_ms`. It is a no-op
//! unless playing. Nothing here touches audio directly: triggers and gain
//! changes leave through the `ControlSink`.

use std::collections::VecDeque;

use super::{
    clock::AudioClock,
    instrument::Instrument,
    pattern::{Pattern, PatternSpec},
    scheduler::{compute_step_schedule, Cursor, StepEvent},
    store::PatternStore,
};
use crate::{
    config::MachineConfig,
    mixer::channel::{ChannelState, Channels},
    synth::message::{ControlSink, EngineMessage},
};

pub const DEFAULT_SCHEDULE_AHEAD: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Stopped,
    Playing,
    Paused,
}

pub struct DrumMachine<C: AudioClock, S: ControlSink> {
    store: PatternStore,
    channels: Channels,
    cursor: Cursor,
    state: TransportState,
    visual_queue: VecDeque<StepEvent>,
    highlighted: Option<usize>,
    schedule_ahead: f64,
    clock: C,
    sink: S,
}

impl<C: AudioClock, S: ControlSink> DrumMachine<C, S> {
    pub fn new(store: PatternStore, clock: C, sink: S) -> Self {
        Self {
            store,
            channels: Channels::default(),
            cursor: Cursor::default(),
            state: TransportState::Stopped,
            visual_queue: VecDeque::with_capacity(64),
            highlighted: None,
            schedule_ahead: DEFAULT_SCHEDULE_AHEAD,
            clock,
            sink,
        }
    }

    /// Machine with the built-in catalog, config presets merged over it, and
    /// the configured default pattern loaded.
    pub fn from_config(config: &MachineConfig, clock: C, sink: S) -> crate::Result<Self> {
        let mut store = PatternStore::with_builtin_presets();
        if let Some(path) = &config.presets_path {
            store.merge(super::presets::load_file(path)?);
        }
        store.load_pattern(&config.default_pattern);

        let mut machine = Self::new(store, clock, sink);
        machine.schedule_ahead = config.schedule_ahead_secs;
        machine.sync_tempo();
        Ok(machine)
    }

    /// Replace the channel states and push them to the engine.
    pub fn with_channels(mut self, channels: Channels) -> Self {
        self.channels = channels;
        self.sync_channels();
        self
    }

    // ---- Transport ----

    /// Start (or resume) playback from the current step. Calling it while
    /// already playing does nothing.
    pub fn play(&mut self) {
        if self.state == TransportState::Playing {
            return;
        }
        if self.clock.is_suspended() && !self.clock.resume() {
            tracing::warn!("audio clock could not be resumed, playing silently");
        }

        self.cursor.next_step_time = self.clock.now();
        self.state = TransportState::Playing;
        tracing::debug!(step = self.cursor.current_step, "play");
        self.tick();
    }

    /// Stop scheduling; the cursor is kept for the next `play()`.
    pub fn pause(&mut self) {
        if self.state == TransportState::Playing {
            self.state = TransportState::Paused;
            tracing::debug!(step = self.cursor.current_step, "pause");
        }
    }

    /// Pause, rewind to step 0 and clear the highlight.
    pub fn stop(&mut self) {
        self.state = TransportState::Stopped;
        self.cursor.current_step = 0;
        self.visual_queue.clear();
        self.highlighted = None;
        tracing::debug!("stop");
    }

    pub fn toggle_play(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Schedule everything inside the look-ahead horizon.
    pub fn tick(&mut self) {
        if self.state != TransportState::Playing {
            return;
        }

        let now = self.clock.now();
        let schedule = compute_step_schedule(
            self.cursor,
            self.store.current(),
            &self.channels,
            now,
            self.schedule_ahead,
        );

        for trigger in schedule.triggers {
            self.sink.send(EngineMessage::Trigger(trigger));
        }
        self.visual_queue.extend(schedule.steps);
        self.cursor = schedule.cursor;
        // Fired steps go even if nobody polls; the queue only spans the horizon.
        self.consume_visual(now);
    }

    /// Advance the highlight to the latest step whose time has come.
    pub fn poll_visual(&mut self) -> Option<usize> {
        let now = self.clock.now();
        self.consume_visual(now);
        self.highlighted
    }

    fn consume_visual(&mut self, now: f64) {
        while let Some(event) = self.visual_queue.front() {
            if event.time > now {
                break;
            }
            self.highlighted = Some(event.step);
            self.visual_queue.pop_front();
        }
    }

    // ---- Pattern editing ----

    pub fn toggle_step(&mut self, instrument: Instrument, step: usize) -> Option<bool> {
        self.store.toggle_step(instrument, step)
    }

    /// Toggle by instrument id; unknown ids are ignored.
    pub fn toggle_step_by_id(&mut self, id: &str, step: usize) -> Option<bool> {
        let Some(instrument) = Instrument::parse(id) else {
            tracing::warn!(id, "unknown instrument");
            return None;
        };
        self.toggle_step(instrument, step)
    }

    pub fn clear_pattern(&mut self) {
        self.store.clear_pattern();
    }

    pub fn reset_pattern(&mut self) -> bool {
        let restored = self.store.reset_pattern();
        if restored {
            self.sync_tempo();
        }
        restored
    }

    pub fn load_pattern(&mut self, name: &str) -> bool {
        let loaded = self.store.load_pattern(name);
        if loaded {
            self.sync_tempo();
        }
        loaded
    }

    pub fn create_pattern(&mut self, name: &str, spec: PatternSpec) -> Pattern {
        self.store.create_pattern(name, spec)
    }

    /// Load the preset after the current one.
    pub fn next_pattern(&mut self) -> bool {
        match self.store.next_preset_name().map(str::to_string) {
            Some(name) => self.load_pattern(&name),
            None => false,
        }
    }

    /// Takes effect from the next scheduled step; queued triggers stay.
    pub fn set_tempo(&mut self, bpm: f64) -> f64 {
        let tempo = self.store.set_tempo(bpm);
        self.sync_tempo();
        tempo
    }

    pub fn set_swing(&mut self, percent: f64) -> f64 {
        self.store.set_swing(percent)
    }

    fn sync_tempo(&mut self) {
        let bpm = self.store.current().tempo as f32;
        self.sink.send(EngineMessage::SetTempo { bpm });
    }

    // ---- Channels ----

    pub fn set_track_volume(&mut self, instrument: Instrument, volume: f32) {
        let state = self.channels.get_mut(instrument);
        state.volume = if volume.is_finite() { volume.clamp(0.0, 1.0) } else { 0.0 };
        self.send_gain(instrument);
    }

    /// Returns the new mute flag.
    pub fn toggle_mute(&mut self, instrument: Instrument) -> bool {
        let state = self.channels.get_mut(instrument);
        state.muted = !state.muted;
        let muted = state.muted;
        self.send_gain(instrument);
        tracing::debug!(%instrument, muted, "mute");
        muted
    }

    /// Returns the new solo flag. Solo only affects which triggers are
    /// scheduled.
    pub fn toggle_solo(&mut self, instrument: Instrument) -> bool {
        let state = self.channels.get_mut(instrument);
        state.soloed = !state.soloed;
        tracing::debug!(%instrument, soloed = state.soloed, "solo");
        state.soloed
    }

    pub fn set_fx_send(&mut self, instrument: Instrument, amount: f32) {
        let amount = if amount.is_finite() { amount.clamp(0.0, 1.0) } else { 0.0 };
        self.channels.get_mut(instrument).fx_send = amount;
        self.sink.send(EngineMessage::SetFxSend { instrument, amount });
    }

    pub fn set_master_gain(&mut self, gain: f32) {
        self.sink.send(EngineMessage::SetMasterGain { gain });
    }

    fn send_gain(&mut self, instrument: Instrument) {
        let gain = self.channels.get(instrument).effective_gain();
        self.sink
            .send(EngineMessage::SetChannelGain { instrument, gain });
    }

    /// Push every channel's fader and send to the engine (after a new
    /// engine is attached).
    pub fn sync_channels(&mut self) {
        for instrument in Instrument::ALL {
            self.send_gain(instrument);
            let amount = self.channels.get(instrument).fx_send;
            self.sink.send(EngineMessage::SetFxSend { instrument, amount });
        }
        self.sync_tempo();
    }

    // ---- Accessors ----

    pub fn is_playing(&self) -> bool {
        self.state == TransportState::Playing
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn pattern(&self) -> &Pattern {
        self.store.current()
    }

    pub fn store(&self) -> &PatternStore {
        &self.store
    }

    pub fn channel(&self, instrument: Instrument) -> &ChannelState {
        self.channels.get(instrument)
    }

    pub fn channels(&self) -> &Channels {
        &self.channels
    }

    pub fn highlighted_step(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}
