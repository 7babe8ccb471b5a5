use std::{path::Path, sync::Arc};

use hound::{SampleFormat, WavReader};

use crate::error::Error;

/// Length of the silent stand-in for a sample that failed to load.
const PLACEHOLDER_SECS: f32 = 0.05;

/// Mono sample data shared between the recipe book and playing voices.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    data: Arc<[f32]>,
    sample_rate: u32,
}

impl SampleBuffer {
    pub fn new(data: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            data: data.into(),
            sample_rate: sample_rate.max(1),
        }
    }

    /// A short buffer of zeros.
    pub fn silent(sample_rate: u32) -> Self {
        let frames = (PLACEHOLDER_SECS * sample_rate as f32) as usize;
        Self::new(vec![0.0; frames.max(1)], sample_rate)
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration_secs(&self) -> f32 {
        self.data.len() as f32 / self.sample_rate as f32
    }

    pub fn is_silent(&self) -> bool {
        self.data.iter().all(|&s| s == 0.0)
    }

    /// Decode a WAV file, downmixing to mono.
    pub fn try_load(path: &Path) -> crate::Result<Self> {
        let reader = WavReader::open(path).map_err(|err| match err {
            hound::Error::IoError(io) => Error::io(path, io),
            other => Error::Wav(other),
        })?;
        let spec = reader.spec();
        let channels = spec.channels.max(1) as usize;

        let interleaved: Vec<f32> = match spec.sample_format {
            SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<Result<_, _>>()?,
            SampleFormat::Int => {
                let scale = 1.0 / (1_i64 << (spec.bits_per_sample.max(1) - 1)) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<Result<_, _>>()?
            }
        };

        let mono = interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect();

        Ok(Self::new(mono, spec.sample_rate))
    }

    /// Decode a WAV file. On failure, log a warning and return a silent
    /// placeholder so the session keeps running.
    pub fn load_or_silent(path: &Path, sample_rate: u32) -> Self {
        match Self::try_load(path) {
            Ok(buffer) => {
                tracing::debug!(path = %path.display(), frames = buffer.data.len(), "loaded sample");
                buffer
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "sample load failed, using silence");
                Self::silent(sample_rate)
            }
        }
    }
}

/// Plays a `SampleBuffer` once, resampling to the output rate.
#[derive(Debug, Clone)]
pub struct SamplePlayer {
    buffer: SampleBuffer,
    position: f64,
    increment: f64,
}

impl SamplePlayer {
    pub fn new(buffer: SampleBuffer, output_rate: f32) -> Self {
        let increment = buffer.sample_rate as f64 / output_rate.max(1.0) as f64;
        Self {
            buffer,
            position: 0.0,
            increment,
        }
    }

    /// Next sample (linear interpolation); 0.0 once past the end.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let data = &self.buffer.data;
        let index = self.position as usize;
        if index >= data.len() {
            return 0.0;
        }
        let frac = (self.position - index as f64) as f32;
        let a = data[index];
        let b = data.get(index + 1).copied().unwrap_or(0.0);
        self.position += self.increment;
        a + (b - a) * frac
    }

    pub fn is_finished(&self) -> bool {
        self.position as usize >= self.buffer.data.len()
    }
}
