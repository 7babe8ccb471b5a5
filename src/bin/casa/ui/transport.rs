//! Transport bar widget - shows play state, tempo, swing, step and output level

use casa_drums::{dsp::amplify::gain_to_db, sequencing::TransportState, STEPS};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::state::UiState;

const METER_WIDTH: usize = 12;
/// Bottom of the level meter.
const METER_FLOOR_DB: f32 = -48.0;

pub fn render_transport(frame: &mut Frame, area: Rect, state: &UiState) {
    let block = Block::default().title(" casa ").borders(Borders::ALL);

    let (symbol, label, color) = match state.transport {
        TransportState::Playing => ("▶", "Playing", Color::Green),
        TransportState::Paused => ("⏸", "Paused", Color::Yellow),
        TransportState::Stopped => ("■", "Stopped", Color::DarkGray),
    };

    let step = state
        .highlighted
        .map(|s| format!("{:>2}/{STEPS}", s + 1))
        .unwrap_or_else(|| format!("--/{STEPS}"));

    let line = Line::from(vec![
        Span::styled(format!(" {symbol} {label}  "), Style::default().fg(color)),
        Span::styled(
            format!("BPM: {:.0}  ", state.pattern.tempo),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("Swing: {:.0}%  ", state.pattern.swing),
            Style::default().fg(Color::Magenta),
        ),
        Span::styled(format!("Step {step}  "), Style::default().fg(Color::White)),
        Span::styled(
            format!("{:.1}kHz  ", state.sample_rate / 1000.0),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(meter(state.peak), Style::default().fg(meter_color(state.peak))),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn meter(peak: f32) -> String {
    let db = gain_to_db(peak.max(1e-6)).max(METER_FLOOR_DB);
    let filled = (((db - METER_FLOOR_DB) / -METER_FLOOR_DB) * METER_WIDTH as f32).round() as usize;
    let filled = filled.min(METER_WIDTH);
    format!("[{}{}]", "█".repeat(filled), "·".repeat(METER_WIDTH - filled))
}

fn meter_color(peak: f32) -> Color {
    if peak >= 0.99 {
        Color::Red
    } else if peak >= 0.5 {
        Color::Yellow
    } else {
        Color::Green
    }
}
