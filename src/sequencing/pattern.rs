/*
Step Pattern
============

One bar of 16th notes per instrument. Each row is a fixed array of 16 flags:

    kick    ■ · · · ■ · · · ■ · · · ■ · · ·
    snare   · · · · ■ · · · · · · · ■ · · ·
    hihat   ■ · ■ · ■ · ■ · ■ · ■ · ■ · ■ ·
            0       4       8       12

Every instrument of the channel set always has a row, so lookups never
miss. Rows coming from outside (preset files, `PatternSpec`) are normalized
on the way in: missing rows become silent, short rows are zero-padded and
long rows are truncated.
*/

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::instrument::Instrument;
use crate::STEPS;

pub const MIN_TEMPO: f64 = 60.0;
pub const MAX_TEMPO: f64 = 180.0;
pub const DEFAULT_TEMPO: f64 = 120.0;
pub const MAX_SWING: f64 = 100.0;

pub type StepRow = [bool; STEPS];

pub fn clamp_tempo(bpm: f64) -> f64 {
    if bpm.is_finite() {
        bpm.clamp(MIN_TEMPO, MAX_TEMPO)
    } else {
        DEFAULT_TEMPO
    }
}

pub fn clamp_swing(percent: f64) -> f64 {
    if percent.is_finite() {
        percent.clamp(0.0, MAX_SWING)
    } else {
        0.0
    }
}

/// Normalize an arbitrary-length row of 0/1 values to exactly 16 flags.
pub fn normalize_row(values: &[u8]) -> StepRow {
    let mut row = [false; STEPS];
    for (flag, &value) in row.iter_mut().zip(values) {
        *flag = value != 0;
    }
    row
}

/// Parse a grid string such as `"1000100010001000"`. Any character other
/// than `1`, `x` or `X` is a rest; separators like `|` and spaces are skipped.
pub fn row_from_str(grid: &str) -> StepRow {
    let values: Vec<u8> = grid
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '|')
        .map(|c| matches!(c, '1' | 'x' | 'X') as u8)
        .collect();
    normalize_row(&values)
}

pub fn row_to_string(row: &StepRow) -> String {
    row.iter().map(|&on| if on { '1' } else { '0' }).collect()
}

/// Input to `PatternStore::create_pattern`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternSpec {
    pub tempo: Option<f64>,
    pub swing: Option<f64>,
    pub steps: BTreeMap<Instrument, Vec<u8>>,
}

impl PatternSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tempo(mut self, bpm: f64) -> Self {
        self.tempo = Some(bpm);
        self
    }

    pub fn swing(mut self, percent: f64) -> Self {
        self.swing = Some(percent);
        self
    }

    /// Add a row from a grid string (see `row_from_str`).
    pub fn row(mut self, instrument: Instrument, grid: &str) -> Self {
        let values = row_from_str(grid).iter().map(|&on| on as u8).collect();
        self.steps.insert(instrument, values);
        self
    }

    pub fn row_values(mut self, instrument: Instrument, values: Vec<u8>) -> Self {
        self.steps.insert(instrument, values);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub id: u64,
    pub name: String,
    /// Beats per minute, 60–180.
    pub tempo: f64,
    /// Swing amount in percent, 0–100.
    pub swing: f64,
    pub steps: BTreeMap<Instrument, StepRow>,
    /// Unix time in milliseconds.
    pub created_at: u64,
}

impl Pattern {
    /// Build a pattern from a spec, applying every normalization rule.
    pub fn from_spec(id: u64, name: impl Into<String>, spec: &PatternSpec, created_at: u64) -> Self {
        let steps = Instrument::ALL
            .into_iter()
            .map(|inst| {
                let row = spec
                    .steps
                    .get(&inst)
                    .map(|values| normalize_row(values))
                    .unwrap_or([false; STEPS]);
                (inst, row)
            })
            .collect();

        Self {
            id,
            name: name.into(),
            tempo: spec.tempo.map(clamp_tempo).unwrap_or(DEFAULT_TEMPO),
            swing: spec.swing.map(clamp_swing).unwrap_or(0.0),
            steps,
            created_at,
        }
    }

    /// Silent pattern at the default tempo.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::from_spec(0, name, &PatternSpec::default(), 0)
    }

    pub fn row(&self, instrument: Instrument) -> StepRow {
        self.steps
            .get(&instrument)
            .copied()
            .unwrap_or([false; STEPS])
    }

    pub fn is_on(&self, instrument: Instrument, step: usize) -> bool {
        step < STEPS && self.row(instrument)[step]
    }

    /// Flip one flag. Returns the new value, or `None` if `step` is out of
    /// range (nothing is modified).
    pub fn toggle(&mut self, instrument: Instrument, step: usize) -> Option<bool> {
        if step >= STEPS {
            return None;
        }
        let row = self.steps.entry(instrument).or_insert([false; STEPS]);
        row[step] = !row[step];
        Some(row[step])
    }

    /// Silence every row. Tempo and swing are untouched.
    pub fn clear(&mut self) {
        for row in self.steps.values_mut() {
            *row = [false; STEPS];
        }
    }

    /// Instruments with a hit at `step`, in channel order.
    pub fn hits_at(&self, step: usize) -> impl Iterator<Item = Instrument> + '_ {
        Instrument::ALL
            .into_iter()
            .filter(move |&inst| self.is_on(inst, step))
    }

    pub fn hit_count(&self) -> usize {
        self.steps
            .values()
            .map(|row| row.iter().filter(|&&on| on).count())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_rows_default_to_silence() {
        let spec = PatternSpec::new().row(Instrument::Kick, "1000100010001000");
        let pattern = Pattern::from_spec(1, "test", &spec, 0);

        assert_eq!(pattern.steps.len(), Instrument::COUNT);
        assert_eq!(pattern.row(Instrument::Snare), [false; STEPS]);
        assert_eq!(row_to_string(&pattern.row(Instrument::Kick)), "1000100010001000");
    }

    #[test]
    fn rows_are_padded_or_truncated() {
        let spec = PatternSpec::new()
            .row_values(Instrument::Kick, vec![1, 1, 1])
            .row_values(Instrument::Snare, vec![1; 20]);
        let pattern = Pattern::from_spec(1, "test", &spec, 0);

        assert_eq!(row_to_string(&pattern.row(Instrument::Kick)), "1110000000000000");
        assert_eq!(pattern.row(Instrument::Snare), [true; STEPS]);
    }

    #[test]
    fn tempo_and_swing_are_clamped_and_defaulted() {
        let defaulted = Pattern::from_spec(1, "a", &PatternSpec::new(), 0);
        assert_eq!(defaulted.tempo, DEFAULT_TEMPO);
        assert_eq!(defaulted.swing, 0.0);

        let clamped = Pattern::from_spec(1, "b", &PatternSpec::new().tempo(300.0).swing(-5.0), 0);
        assert_eq!(clamped.tempo, MAX_TEMPO);
        assert_eq!(clamped.swing, 0.0);
    }

    #[test]
    fn toggle_out_of_range_is_ignored() {
        let mut pattern = Pattern::empty("t");
        let before = pattern.clone();
        assert_eq!(pattern.toggle(Instrument::Kick, 16), None);
        assert_eq!(pattern, before);
    }

    #[test]
    fn grid_strings_skip_separators() {
        assert_eq!(
            row_to_string(&row_from_str("x..x|..x.|x...|x.x.")),
            "1001001010001010"
        );
    }

    #[test]
    fn hits_at_lists_instruments_in_channel_order() {
        let spec = PatternSpec::new()
            .row(Instrument::HiHat, "1")
            .row(Instrument::Kick, "1");
        let pattern = Pattern::from_spec(1, "t", &spec, 0);
        let hits: Vec<_> = pattern.hits_at(0).collect();
        assert_eq!(hits, vec![Instrument::Kick, Instrument::HiHat]);
        assert_eq!(pattern.hit_count(), 2);
    }
}
