//! TUI for casa
//!
//! Step grid, transport bar and a key-driven editor over the shared machine.

mod grid;
mod state;
mod transport;

use std::{
    sync::{
        atomic::{AtomicU32, Ordering},
        mpsc, Arc, Mutex, MutexGuard,
    },
    thread,
    time::Duration,
};

use casa_drums::{export::export_pattern, sequencing::Instrument, MachineConfig, STEPS};
use color_eyre::eyre::{eyre, Result as EyreResult};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    DefaultTerminal, Frame,
};

use super::app::LiveMachine;
use grid::render_grid;
use state::UiState;
use transport::render_transport;

const TEMPO_STEP: f64 = 1.0;
const SWING_STEP: f64 = 5.0;
const VOLUME_STEP: f32 = 0.1;
/// Send level used when the effects send is switched on.
const FX_SEND_ON: f32 = 0.3;

pub struct UiApp {
    machine: Arc<Mutex<LiveMachine>>,
    /// Output peak published by the audio callback (f32 bits).
    peak: Arc<AtomicU32>,
    config: MachineConfig,
    /// Grid cursor: instrument row and step column.
    row: usize,
    col: usize,
    status: String,
    export_tx: mpsc::Sender<String>,
    export_rx: mpsc::Receiver<String>,
    should_quit: bool,
}

impl UiApp {
    pub fn new(machine: Arc<Mutex<LiveMachine>>, peak: Arc<AtomicU32>, config: MachineConfig) -> Self {
        let (export_tx, export_rx) = mpsc::channel();
        Self {
            machine,
            peak,
            config,
            row: 0,
            col: 0,
            status: String::new(),
            export_tx,
            export_rx,
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            while let Ok(message) = self.export_rx.try_recv() {
                self.status = message;
            }

            let state = self.snapshot()?;
            terminal.draw(|frame| self.render(frame, &state))?;

            // ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn lock(&self) -> EyreResult<MutexGuard<'_, LiveMachine>> {
        self.machine
            .lock()
            .map_err(|_| eyre!("transport lock poisoned"))
    }

    fn snapshot(&self) -> EyreResult<UiState> {
        let mut machine = self.lock()?;
        machine.poll_visual();
        Ok(UiState::capture(
            &machine,
            f32::from_bits(self.peak.load(Ordering::Relaxed)),
        ))
    }

    fn selected(&self) -> Instrument {
        Instrument::ALL[self.row]
    }

    fn handle_key(&mut self, key: KeyCode) -> EyreResult<()> {
        let instrument = self.selected();
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Up => self.row = self.row.saturating_sub(1),
            KeyCode::Down => self.row = (self.row + 1).min(Instrument::COUNT - 1),
            KeyCode::Left => self.col = (self.col + STEPS - 1) % STEPS,
            KeyCode::Right => self.col = (self.col + 1) % STEPS,
            KeyCode::Enter => {
                self.lock()?.toggle_step(instrument, self.col);
            }
            KeyCode::Char(' ') => self.lock()?.toggle_play(),
            KeyCode::Char('s') => self.lock()?.stop(),
            KeyCode::Char('c') => {
                self.lock()?.clear_pattern();
                self.status = "pattern cleared".into();
            }
            KeyCode::Char('r') => {
                let name = {
                    let mut machine = self.lock()?;
                    machine.reset_pattern();
                    machine.pattern().name.clone()
                };
                self.status = format!("reset {name}");
            }
            KeyCode::Char('p') => {
                let name = {
                    let mut machine = self.lock()?;
                    machine.next_pattern();
                    machine.pattern().name.clone()
                };
                self.status = format!("loaded {name}");
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let mut machine = self.lock()?;
                let tempo = machine.pattern().tempo;
                machine.set_tempo(tempo + TEMPO_STEP);
            }
            KeyCode::Char('-') => {
                let mut machine = self.lock()?;
                let tempo = machine.pattern().tempo;
                machine.set_tempo(tempo - TEMPO_STEP);
            }
            KeyCode::Char(']') => {
                let mut machine = self.lock()?;
                let swing = machine.pattern().swing;
                machine.set_swing(swing + SWING_STEP);
            }
            KeyCode::Char('[') => {
                let mut machine = self.lock()?;
                let swing = machine.pattern().swing;
                machine.set_swing(swing - SWING_STEP);
            }
            KeyCode::Char('.') => {
                let mut machine = self.lock()?;
                let volume = machine.channel(instrument).volume;
                machine.set_track_volume(instrument, volume + VOLUME_STEP);
            }
            KeyCode::Char(',') => {
                let mut machine = self.lock()?;
                let volume = machine.channel(instrument).volume;
                machine.set_track_volume(instrument, volume - VOLUME_STEP);
            }
            KeyCode::Char('m') => {
                self.lock()?.toggle_mute(instrument);
            }
            KeyCode::Char('o') => {
                self.lock()?.toggle_solo(instrument);
            }
            KeyCode::Char('f') => {
                let mut machine = self.lock()?;
                let amount = if machine.channel(instrument).fx_send > 0.0 {
                    0.0
                } else {
                    FX_SEND_ON
                };
                machine.set_fx_send(instrument, amount);
            }
            KeyCode::Char('e') => self.start_export()?,
            _ => {}
        }
        Ok(())
    }

    /// Bounce the current pattern on a worker thread; the result shows up
    /// in the status line.
    fn start_export(&mut self) -> EyreResult<()> {
        let (pattern, channels) = {
            let machine = self.lock()?;
            (machine.pattern().clone(), machine.channels().clone())
        };
        let dir = self.config.export_dir.clone();
        let bars = self.config.export_bars;
        let sample_rate = self.config.sample_rate;
        let tx = self.export_tx.clone();

        self.status = format!("exporting {}...", pattern.name);
        thread::Builder::new()
            .name("casa-export".into())
            .spawn(move || {
                let message = match export_pattern(&dir, &pattern, &channels, bars, sample_rate) {
                    Ok(path) => format!("exported {}", path.display()),
                    Err(err) => {
                        tracing::error!(%err, "export failed");
                        format!("export failed: {err}")
                    }
                };
                // The UI may already be gone.
                let _ = tx.send(message);
            })
            .map_err(|err| eyre!("failed to start export thread: {err}"))?;
        Ok(())
    }

    fn render(&self, frame: &mut Frame, state: &UiState) {
        let area = frame.area();

        // Transport, grid, status, help
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(Instrument::COUNT as u16 + 3),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(area);

        render_transport(frame, chunks[0], state);

        let grid_block = Block::default()
            .title(format!(" {} ", state.pattern.name))
            .borders(Borders::ALL);
        let grid_inner = grid_block.inner(chunks[1]);
        frame.render_widget(grid_block, chunks[1]);
        render_grid(frame, grid_inner, state, (self.row, self.col));

        let status = Paragraph::new(format!(" {}", self.status))
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(status, chunks[2]);

        let help = Paragraph::new(
            " [Space] Play/Pause  [S] Stop  [Enter] Toggle  [C] Clear  [R] Reset  [P] Next  \
             [+/-] Tempo  [[/]] Swing  [,/.] Volume  [M] Mute  [O] Solo  [F] FX  [E] Export  [Q] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}
