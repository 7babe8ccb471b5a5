//! Casa - audio setup, scheduler ticker and UI wiring

use std::{
    sync::{
        atomic::{AtomicBool, AtomicU32, Ordering},
        Arc, Mutex,
    },
    thread,
    time::Duration,
};

use casa_drums::{
    sequencing::clock::FrameClock,
    synth::{message::EngineMessage, recipe::RecipeBook},
    DrumMachine, Engine, Error, MachineConfig,
};
use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Producer, RingBuffer};

use super::ui::UiApp;

/// Control → audio queue depth. One tick at 180 BPM schedules a handful of
/// triggers; this leaves room for a burst of fader moves as well.
const MESSAGE_QUEUE: usize = 1024;

/// The machine the UI and the ticker share.
pub type LiveMachine = DrumMachine<FrameClock, Producer<EngineMessage>>;

pub struct Casa {
    config: MachineConfig,
}

impl Casa {
    pub fn new(config: MachineConfig) -> Self {
        Self { config }
    }

    /// Open the audio device, start the scheduler and run the TUI until quit.
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| Error::AudioDevice("no default output device available".into()))?;
        let stream_config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = stream_config.sample_rate().0;
        let channels = stream_config.channels() as usize;
        tracing::info!(
            device = %device.name().unwrap_or_default(),
            sample_rate,
            channels,
            "audio device opened"
        );

        // Starts suspended; the first play() resumes it.
        let clock = FrameClock::new(sample_rate);
        let recipes = RecipeBook::with_samples(&self.config.samples, sample_rate);
        let mut engine = Engine::with_recipes(clock.clone(), recipes);
        let (tx, mut rx) = RingBuffer::<EngineMessage>::new(MESSAGE_QUEUE);

        let peak = Arc::new(AtomicU32::new(0));
        let peak_out = peak.clone();

        let stream = device
            .build_output_stream(
                &stream_config.into(),
                move |data: &mut [f32], _| {
                    engine.drain(&mut rx);
                    engine.render_interleaved(data, channels);
                    peak_out.store(engine.last_peak().to_bits(), Ordering::Relaxed);
                },
                |err| tracing::error!(%err, "audio stream error"),
                None,
            )
            .map_err(|err| Error::AudioDevice(err.to_string()))?;
        stream
            .play()
            .map_err(|err| Error::AudioDevice(err.to_string()))?;

        let mut machine = DrumMachine::from_config(&self.config, clock.clone(), tx)?;
        machine.sync_channels();
        let machine = Arc::new(Mutex::new(machine));

        let running = Arc::new(AtomicBool::new(true));
        let ticker = spawn_ticker(
            machine.clone(),
            running.clone(),
            Duration::from_millis(self.config.lookahead_ms),
        )?;

        let mut terminal = ratatui::init();
        let result = UiApp::new(machine, peak, self.config).run(&mut terminal);
        ratatui::restore();

        running.store(false, Ordering::Relaxed);
        if ticker.join().is_err() {
            tracing::warn!("scheduler thread panicked");
        }
        clock.suspend();
        drop(stream);

        tracing::info!("casa stopped");
        result
    }
}

/// Drive `tick()` every `interval` until `running` goes false.
fn spawn_ticker(
    machine: Arc<Mutex<LiveMachine>>,
    running: Arc<AtomicBool>,
    interval: Duration,
) -> EyreResult<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("casa-scheduler".into())
        .spawn(move || {
            while running.load(Ordering::Relaxed) {
                match machine.lock() {
                    Ok(mut machine) => machine.tick(),
                    Err(_) => {
                        tracing::error!("transport lock poisoned, stopping scheduler");
                        break;
                    }
                }
                thread::sleep(interval);
            }
        })
        .map_err(|err| eyre!("failed to start scheduler thread: {err}"))
}
