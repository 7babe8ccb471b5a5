use std::time::{SystemTime, UNIX_EPOCH};

use super::{
    instrument::Instrument,
    pattern::{clamp_swing, clamp_tempo, Pattern, PatternSpec},
    presets,
};

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Named presets plus the pattern currently being edited.
///
/// Presets are never edited in place: loading one copies it into `current`,
/// and `reset_pattern` copies it again.
#[derive(Debug, Clone)]
pub struct PatternStore {
    presets: Vec<Pattern>,
    current: Pattern,
    next_id: u64,
}

impl PatternStore {
    /// Store with no presets and a silent current pattern.
    pub fn new() -> Self {
        Self {
            presets: Vec::new(),
            current: Pattern::empty("Untitled"),
            next_id: 1,
        }
    }

    /// Store whose current pattern is `pattern` (offline rendering).
    pub fn with_current(pattern: Pattern) -> Self {
        Self {
            current: pattern,
            ..Self::new()
        }
    }

    /// Store seeded with the built-in catalog; the first preset is loaded.
    pub fn with_builtin_presets() -> Self {
        let mut store = Self::new();
        store.merge(presets::builtin());
        if let Some(first) = store.presets.first() {
            store.current = first.clone();
        }
        store
    }

    /// Register every preset in `catalog`, overwriting same-named entries.
    pub fn merge(&mut self, catalog: Vec<(String, PatternSpec)>) {
        for (name, spec) in catalog {
            self.create_pattern(name, spec);
        }
    }

    /// Register a preset under `name`. An existing preset with the same
    /// name is replaced (it keeps its catalog position).
    pub fn create_pattern(&mut self, name: impl Into<String>, spec: PatternSpec) -> Pattern {
        let name = name.into();
        let pattern = Pattern::from_spec(self.next_id, name.clone(), &spec, unix_millis());
        self.next_id += 1;

        match self.presets.iter_mut().find(|p| p.name == name) {
            Some(existing) => {
                tracing::debug!(name = %name, "overwriting preset");
                *existing = pattern.clone();
            }
            None => self.presets.push(pattern.clone()),
        }
        pattern
    }

    /// Make a copy of the named preset the current pattern. Unknown names
    /// leave everything as it was and return `false`.
    pub fn load_pattern(&mut self, name: &str) -> bool {
        match self.get(name).cloned() {
            Some(preset) => {
                self.current = preset;
                tracing::debug!(name, tempo = self.current.tempo, "loaded pattern");
                true
            }
            None => {
                tracing::warn!(name, "unknown pattern");
                false
            }
        }
    }

    /// Flip one step of the current pattern. Returns the new flag, or
    /// `None` when `step` is out of range.
    pub fn toggle_step(&mut self, instrument: Instrument, step: usize) -> Option<bool> {
        self.current.toggle(instrument, step)
    }

    pub fn clear_pattern(&mut self) {
        self.current.clear();
    }

    /// Restore steps, tempo and swing from the preset the current pattern
    /// was loaded from. Returns `false` if that preset no longer exists.
    pub fn reset_pattern(&mut self) -> bool {
        let Some(preset) = self.get(&self.current.name).cloned() else {
            tracing::debug!(name = %self.current.name, "no preset to reset from");
            return false;
        };
        self.current.steps = preset.steps;
        self.current.tempo = preset.tempo;
        self.current.swing = preset.swing;
        true
    }

    pub fn set_tempo(&mut self, bpm: f64) -> f64 {
        self.current.tempo = clamp_tempo(bpm);
        self.current.tempo
    }

    pub fn set_swing(&mut self, percent: f64) -> f64 {
        self.current.swing = clamp_swing(percent);
        self.current.swing
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.presets.len();
        self.presets.retain(|p| p.name != name);
        self.presets.len() != before
    }

    pub fn get(&self, name: &str) -> Option<&Pattern> {
        self.presets.iter().find(|p| p.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.iter().map(|p| p.name.as_str())
    }

    pub fn current(&self) -> &Pattern {
        &self.current
    }

    /// Preset after the current one in catalog order, wrapping around.
    pub fn next_preset_name(&self) -> Option<&str> {
        let position = self
            .presets
            .iter()
            .position(|p| p.name == self.current.name);
        let next = match position {
            Some(i) => (i + 1) % self.presets.len(),
            None => 0,
        };
        self.presets.get(next).map(|p| p.name.as_str())
    }
}

impl Default for PatternStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{sequencing::pattern::row_to_string, STEPS};

    #[test]
    fn last_write_wins() {
        let mut store = PatternStore::new();
        store.create_pattern("a", PatternSpec::new().tempo(100.0));
        store.create_pattern("a", PatternSpec::new().tempo(150.0));

        assert_eq!(store.names().count(), 1);
        assert_eq!(store.get("a").map(|p| p.tempo), Some(150.0));
    }

    #[test]
    fn loading_unknown_name_is_a_noop() {
        let mut store = PatternStore::with_builtin_presets();
        let before = store.current().clone();
        assert!(!store.load_pattern("Nope"));
        assert_eq!(store.current(), &before);
    }

    #[test]
    fn edits_never_touch_the_preset() {
        let mut store = PatternStore::with_builtin_presets();
        assert!(store.load_pattern(presets::TRAFFIC_JAM_GROOVE));
        store.toggle_step(Instrument::Kick, 1);
        store.clear_pattern();

        let preset = store.get(presets::TRAFFIC_JAM_GROOVE).unwrap();
        assert_eq!(row_to_string(&preset.row(Instrument::Kick)), "1000100010001000");
    }

    #[test]
    fn clear_keeps_tempo_and_swing() {
        let mut store = PatternStore::with_builtin_presets();
        store.load_pattern("Boom bap");
        store.clear_pattern();

        let current = store.current();
        assert_eq!(current.hit_count(), 0);
        assert_eq!(current.tempo, 90.0);
        assert_eq!(current.swing, 30.0);
    }

    #[test]
    fn reset_restores_grid_and_tempo() {
        let mut store = PatternStore::with_builtin_presets();
        store.load_pattern(presets::TRAFFIC_JAM_GROOVE);
        let original = store.current().clone();

        store.toggle_step(Instrument::Snare, 3);
        store.set_tempo(170.0);
        store.set_swing(80.0);
        assert!(store.reset_pattern());

        assert_eq!(store.current().steps, original.steps);
        assert_eq!(store.current().tempo, 95.0);
        assert_eq!(store.current().swing, 0.0);
    }

    #[test]
    fn reset_without_preset_is_a_noop() {
        let mut store = PatternStore::with_builtin_presets();
        store.load_pattern("Breakbeat");
        store.toggle_step(Instrument::Kick, 1);
        let edited = store.current().clone();

        assert!(store.remove("Breakbeat"));
        assert!(!store.reset_pattern());
        assert_eq!(store.current(), &edited);
    }

    #[test]
    fn out_of_range_toggle_changes_nothing() {
        let mut store = PatternStore::with_builtin_presets();
        let before = store.current().clone();
        assert_eq!(store.toggle_step(Instrument::Kick, STEPS), None);
        assert_eq!(store.toggle_step(Instrument::Kick, 99), None);
        assert_eq!(store.current(), &before);
    }

    #[test]
    fn next_preset_wraps() {
        let mut store = PatternStore::with_builtin_presets();
        let names: Vec<String> = store.names().map(str::to_string).collect();
        let last = names.last().unwrap().clone();
        store.load_pattern(&last);
        assert_eq!(store.next_preset_name(), Some(names[0].as_str()));
    }
}
