//! Crate-wide error type.
//!
//! Only genuinely fallible edges produce errors: reading configuration,
//! decoding and encoding WAV files, and opening the audio device. Unknown
//! pattern or instrument names are not errors; those operations are no-ops.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("wav encoding failed: {0}")]
    Wav(#[from] hound::Error),

    #[error("invalid config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("audio device unavailable: {0}")]
    AudioDevice(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
