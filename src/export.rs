//! Offline bounce and WAV export.
//!
//! A bounce runs the real transport and engine against a frame clock that
//! advances only as fast as we render, so the export sounds exactly like
//! live playback (same scheduler, same swing, same mixer).

use std::{
    fs::File,
    io::{BufWriter, Seek, Write},
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::{
    engine::Engine,
    error::Error,
    mixer::channel::Channels,
    sequencing::{
        clock::FrameClock, pattern::Pattern, scheduler::seconds_per_step, store::PatternStore,
        transport::DrumMachine,
    },
    STEPS,
};

/// Exports are interleaved stereo.
pub const EXPORT_CHANNELS: u16 = 2;
pub const BITS_PER_SAMPLE: u16 = 16;
/// Size of the canonical RIFF/WAVE header written for PCM.
pub const WAV_HEADER_BYTES: usize = 44;

/// Frames rendered between scheduler ticks; well inside the look-ahead.
const BOUNCE_BLOCK: usize = 128;

/// Length of `bars` bars of `pattern` in seconds. Swing does not change it.
pub fn bar_duration(pattern: &Pattern, bars: u32) -> f64 {
    bars as f64 * STEPS as f64 * seconds_per_step(pattern.tempo)
}

/// Render `bars` bars of `pattern` through the full mixer. Mono output.
pub fn bounce(pattern: &Pattern, channels: &Channels, bars: u32, sample_rate: u32) -> Vec<f32> {
    let frames = (bar_duration(pattern, bars) * sample_rate as f64).round() as usize;
    let clock = FrameClock::running(sample_rate);
    let mut engine = Engine::new(clock.clone());
    engine.apply_channels(channels);

    let mut machine = DrumMachine::new(PatternStore::with_current(pattern.clone()), clock, engine)
        .with_channels(channels.clone());
    machine.play();

    let mut out = vec![0.0; frames];
    for block in out.chunks_mut(BOUNCE_BLOCK) {
        machine.tick();
        machine.sink_mut().render(block);
    }

    tracing::debug!(
        pattern = %pattern.name,
        bars,
        frames,
        "bounced pattern"
    );
    out
}

/// Encode mono `samples` as 16-bit PCM, duplicated to `channels`.
///
/// `channels` is clamped to mono or stereo: hound writes an extensible
/// header (longer than `WAV_HEADER_BYTES`) for anything wider.
pub fn encode_wav<W: Write + Seek>(
    samples: &[f32],
    channels: u16,
    sample_rate: u32,
    writer: W,
) -> crate::Result<()> {
    let spec = WavSpec {
        channels: channels.clamp(1, EXPORT_CHANNELS),
        sample_rate,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    };
    let mut wav = WavWriter::new(writer, spec)?;
    for &sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        for _ in 0..spec.channels {
            wav.write_sample(value)?;
        }
    }
    wav.finalize()?;
    Ok(())
}

/// File name for an export made at `unix_secs`.
pub fn export_file_name(unix_secs: u64) -> String {
    format!("casa24-beat-{unix_secs}.wav")
}

/// Write `samples` as a timestamped stereo WAV in `dir`.
pub fn export_wav(dir: &Path, samples: &[f32], sample_rate: u32) -> crate::Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|err| Error::io(dir, err))?;

    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    let path = dir.join(export_file_name(secs));

    let file = File::create(&path).map_err(|err| Error::io(&path, err))?;
    encode_wav(samples, EXPORT_CHANNELS, sample_rate, BufWriter::new(file))?;

    tracing::info!(path = %path.display(), frames = samples.len(), sample_rate, "exported beat");
    Ok(path)
}

/// Bounce and export in one step.
pub fn export_pattern(
    dir: &Path,
    pattern: &Pattern,
    channels: &Channels,
    bars: u32,
    sample_rate: u32,
) -> crate::Result<PathBuf> {
    let samples = bounce(pattern, channels, bars, sample_rate);
    export_wav(dir, &samples, sample_rate)
}
