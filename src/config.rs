//! Machine configuration.
//!
//! Every field has a default so a partial (or missing) JSON file is valid.
//!
//! ```json
//! {
//!   "sample_rate": 44100,
//!   "lookahead_ms": 25,
//!   "schedule_ahead_secs": 0.1,
//!   "default_pattern": "Traffic jam groove",
//!   "export_dir": "bounces",
//!   "presets_path": "my_presets.json",
//!   "export_bars": 2,
//!   "samples": { "snare": "samples/snare.wav" }
//! }
//! ```

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{error::Error, sequencing::instrument::Instrument, DEFAULT_SAMPLE_RATE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Engine sample rate in Hz (the device rate wins when playing live).
    pub sample_rate: u32,
    /// Interval of the scheduler tick timer.
    pub lookahead_ms: u64,
    /// How far past "now" each tick schedules triggers.
    pub schedule_ahead_secs: f64,
    /// Preset loaded at startup.
    pub default_pattern: String,
    /// Where bounces (and the log file) are written.
    pub export_dir: PathBuf,
    /// Optional JSON preset catalog merged over the built-ins.
    pub presets_path: Option<PathBuf>,
    /// Number of bars rendered by an export.
    pub export_bars: u32,
    /// WAV files that replace an instrument's synthesized sound.
    pub samples: BTreeMap<Instrument, PathBuf>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            lookahead_ms: 25,
            schedule_ahead_secs: 0.1,
            default_pattern: "Traffic jam groove".to_string(),
            export_dir: PathBuf::from("."),
            presets_path: None,
            export_bars: 2,
            samples: BTreeMap::new(),
        }
    }
}

impl MachineConfig {
    /// Load config from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> crate::Result<Self> {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(err) => return Err(Error::io(path, err)),
        };

        Self::from_json(&data).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(data)?;
        Ok(config.sanitized())
    }

    /// Clamp timing values into a range the scheduler can work with.
    fn sanitized(mut self) -> Self {
        self.sample_rate = self.sample_rate.clamp(8_000, 192_000);
        self.lookahead_ms = self.lookahead_ms.clamp(1, 1_000);
        // The horizon must outlast one tick or steps would be scheduled late.
        let min_ahead = self.lookahead_ms as f64 / 1000.0;
        if !self.schedule_ahead_secs.is_finite() || self.schedule_ahead_secs < min_ahead {
            self.schedule_ahead_secs = min_ahead.max(0.1);
        }
        self.export_bars = self.export_bars.max(1);
        self
    }
}
