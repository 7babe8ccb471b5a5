use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The fixed percussion channel set.
///
/// Order matters: it is the row order of the grid, the channel index in the
/// mixer, and the iteration order of pattern rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Instrument {
    Kick,
    Snare,
    #[serde(rename = "hihat")]
    HiHat,
    #[serde(rename = "openhat")]
    OpenHat,
    Clap,
    Rim,
    Cowbell,
    Crash,
}

impl Instrument {
    pub const COUNT: usize = 8;

    pub const ALL: [Instrument; Self::COUNT] = [
        Instrument::Kick,
        Instrument::Snare,
        Instrument::HiHat,
        Instrument::OpenHat,
        Instrument::Clap,
        Instrument::Rim,
        Instrument::Cowbell,
        Instrument::Crash,
    ];

    /// Position in `ALL` (and channel index in the mixer).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Instrument::Kick => "kick",
            Instrument::Snare => "snare",
            Instrument::HiHat => "hihat",
            Instrument::OpenHat => "openhat",
            Instrument::Clap => "clap",
            Instrument::Rim => "rim",
            Instrument::Cowbell => "cowbell",
            Instrument::Crash => "crash",
        }
    }

    /// Parse an instrument id; unknown ids yield `None`.
    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|inst| inst.as_str().eq_ignore_ascii_case(id.trim()))
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown instrument '{0}'")]
pub struct UnknownInstrument(pub String);

impl FromStr for Instrument {
    type Err = UnknownInstrument;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownInstrument(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for inst in Instrument::ALL {
            assert_eq!(inst.as_str().parse::<Instrument>(), Ok(inst));
            assert_eq!(Instrument::from_index(inst.index()), Some(inst));
        }
    }

    #[test]
    fn unknown_id_is_none() {
        assert_eq!(Instrument::parse("tambourine"), None);
        assert!("".parse::<Instrument>().is_err());
    }

    #[test]
    fn unknown_id_error_names_the_input() {
        let err = "tambourine".parse::<Instrument>().unwrap_err();
        assert_eq!(err, UnknownInstrument("tambourine".to_string()));
        assert_eq!(err.to_string(), "unknown instrument 'tambourine'");
    }

    #[test]
    fn serde_uses_lowercase_ids() {
        let json = serde_json::to_string(&Instrument::OpenHat).unwrap();
        assert_eq!(json, "\"openhat\"");
        let back: Instrument = serde_json::from_str("\"hihat\"").unwrap();
        assert_eq!(back, Instrument::HiHat);
    }
}
