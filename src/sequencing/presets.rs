//! Built-in preset catalog and the optional JSON preset file.
//!
//! A preset file maps pattern names to specs. Rows are keyed by instrument
//! id and may be written either as a grid string or as an array of 0/1:
//!
//! ```json
//! {
//!   "Late night": {
//!     "tempo": 84,
//!     "swing": 40,
//!     "steps": {
//!       "kick":  "1000000010100000",
//!       "snare": [0,0,0,0,1,0,0,0,0,0,0,0,1,0,0,0]
//!     }
//!   }
//! }
//! ```

use std::{collections::BTreeMap, path::Path};

use serde::Deserialize;

use super::{
    instrument::Instrument,
    pattern::{row_from_str, PatternSpec},
};
use crate::error::Error;

pub const TRAFFIC_JAM_GROOVE: &str = "Traffic jam groove";

/// The built-in catalog, in display order.
pub fn builtin() -> Vec<(String, PatternSpec)> {
    use Instrument::*;

    vec![
        (
            TRAFFIC_JAM_GROOVE.to_string(),
            PatternSpec::new()
                .tempo(95.0)
                .row(Kick, "1000100010001000")
                .row(Snare, "0000100000001000")
                .row(HiHat, "1010101010101010")
                .row(OpenHat, "0000000000000010")
                .row(Clap, "0000000000001000"),
        ),
        (
            "Four on the floor".to_string(),
            PatternSpec::new()
                .tempo(124.0)
                .row(Kick, "1000100010001000")
                .row(Clap, "0000100000001000")
                .row(HiHat, "0010001000100010")
                .row(OpenHat, "0000000000000001")
                .row(Crash, "1000000000000000"),
        ),
        (
            "Boom bap".to_string(),
            PatternSpec::new()
                .tempo(90.0)
                .swing(30.0)
                .row(Kick, "1000000110100000")
                .row(Snare, "0000100000001000")
                .row(HiHat, "1010101010101010")
                .row(Rim, "0000000000000100"),
        ),
        (
            "Breakbeat".to_string(),
            PatternSpec::new()
                .tempo(135.0)
                .row(Kick, "1000001000100000")
                .row(Snare, "0000100100001001")
                .row(HiHat, "1010101010101010")
                .row(Crash, "1000000000000000"),
        ),
        (
            "Cowbell shuffle".to_string(),
            PatternSpec::new()
                .tempo(110.0)
                .swing(55.0)
                .row(Kick, "1000001010000010")
                .row(Rim, "0010000000100000")
                .row(Cowbell, "1001001000101000")
                .row(HiHat, "0011001100110011"),
        ),
    ]
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RowEntry {
    Grid(String),
    Values(Vec<u8>),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PresetEntry {
    tempo: Option<f64>,
    swing: Option<f64>,
    steps: BTreeMap<String, RowEntry>,
}

/// Parse a preset file body. Rows for unknown instruments are skipped with a
/// warning.
pub fn parse_presets(data: &str) -> Result<Vec<(String, PatternSpec)>, serde_json::Error> {
    let entries: BTreeMap<String, PresetEntry> = serde_json::from_str(data)?;

    let presets = entries
        .into_iter()
        .map(|(name, entry)| {
            let mut spec = PatternSpec {
                tempo: entry.tempo,
                swing: entry.swing,
                steps: BTreeMap::new(),
            };
            for (id, row) in entry.steps {
                let Some(instrument) = Instrument::parse(&id) else {
                    tracing::warn!(preset = %name, instrument = %id, "skipping unknown instrument row");
                    continue;
                };
                let values = match row {
                    RowEntry::Grid(grid) => row_from_str(&grid).iter().map(|&on| on as u8).collect(),
                    RowEntry::Values(values) => values,
                };
                spec.steps.insert(instrument, values);
            }
            (name, spec)
        })
        .collect();

    Ok(presets)
}

pub fn load_file(path: &Path) -> crate::Result<Vec<(String, PatternSpec)>> {
    let data = std::fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
    let presets = parse_presets(&data).map_err(|source| Error::Config {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), count = presets.len(), "loaded preset file");
    Ok(presets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencing::pattern::Pattern;

    #[test]
    fn traffic_jam_groove_is_first_and_at_95_bpm() {
        let catalog = builtin();
        let (name, spec) = &catalog[0];
        assert_eq!(name, TRAFFIC_JAM_GROOVE);
        assert_eq!(spec.tempo, Some(95.0));
    }

    #[test]
    fn builtin_names_are_unique() {
        let catalog = builtin();
        let mut names: Vec<_> = catalog.iter().map(|(n, _)| n.clone()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), catalog.len());
    }

    #[test]
    fn preset_file_accepts_grids_and_arrays() {
        let json = r#"{
            "Late night": {
                "tempo": 84,
                "steps": {
                    "kick": "1000000010100000",
                    "snare": [0,0,0,0,1],
                    "tambourine": "1111"
                }
            }
        }"#;
        let presets = parse_presets(json).unwrap();
        assert_eq!(presets.len(), 1);

        let (name, spec) = &presets[0];
        let pattern = Pattern::from_spec(1, name.clone(), spec, 0);
        assert_eq!(pattern.tempo, 84.0);
        assert!(pattern.is_on(Instrument::Kick, 8));
        assert!(pattern.is_on(Instrument::Snare, 4));
        assert_eq!(pattern.hit_count(), 4);
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(parse_presets("[1, 2").is_err());
    }
}
