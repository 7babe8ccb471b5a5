//! Offline bounce and WAV export end to end.

use std::io::Cursor;

use casa_drums::{
    dsp::amplify::peak,
    export::{bounce, encode_wav, export_pattern, EXPORT_CHANNELS, WAV_HEADER_BYTES},
    mixer::Channels,
    sequencing::{presets::TRAFFIC_JAM_GROOVE, PatternStore},
    Instrument, DEFAULT_SAMPLE_RATE,
};

fn groove() -> casa_drums::Pattern {
    PatternStore::with_builtin_presets()
        .get(TRAFFIC_JAM_GROOVE)
        .cloned()
        .unwrap()
}

#[test]
fn wav_size_is_header_plus_pcm() {
    let sample_rate = DEFAULT_SAMPLE_RATE;
    let seconds = 0.5;
    let samples = vec![0.1; (sample_rate as f64 * seconds) as usize];

    let mut out = Cursor::new(Vec::new());
    encode_wav(&samples, EXPORT_CHANNELS, sample_rate, &mut out).unwrap();

    let expected = WAV_HEADER_BYTES + (sample_rate as f64 * seconds) as usize * EXPORT_CHANNELS as usize * 2;
    assert_eq!(out.into_inner().len(), expected);
}

#[test]
fn bounce_is_audible_and_within_range() {
    let audio = bounce(&groove(), &Channels::default(), 1, 22_050);

    let level = peak(&audio);
    assert!(level > 0.01, "groove should be audible, peak {level}");
    assert!(level <= 1.0, "master limiter should hold the peak, got {level}");
}

#[test]
fn solo_bounce_only_contains_the_soloed_channel() {
    let pattern = groove();
    let mut soloed = Channels::default();
    soloed.get_mut(Instrument::Clap).soloed = true;

    // Clap only hits on step 12 of the groove
    let audio = bounce(&pattern, &soloed, 1, 22_050);
    let clap_at = (12.0 * 60.0 / 95.0 / 4.0 * 22_050.0) as usize;
    assert_eq!(peak(&audio[..clap_at]), 0.0);
    assert!(peak(&audio[clap_at..]) > 0.0);
}

#[test]
fn export_writes_a_timestamped_file() {
    let dir = std::env::temp_dir().join(format!("casa_drums_export_{}", std::process::id()));
    let pattern = groove();

    let path = export_pattern(&dir, &pattern, &Channels::default(), 1, 8_000).unwrap();
    let name = path.file_name().and_then(|n| n.to_str()).unwrap().to_string();
    let reader = hound::WavReader::open(&path).unwrap();
    let spec = reader.spec();
    let frames = reader.duration();
    let _ = std::fs::remove_dir_all(&dir);

    assert!(name.starts_with("casa24-beat-") && name.ends_with(".wav"));
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_rate, 8_000);
    let bar = 16.0 * 60.0 / 95.0 / 4.0;
    assert_eq!(frames as usize, (bar * 8_000.0_f64).round() as usize);
}
