//! Step grid widget - one row per instrument, sixteen steps per row

use casa_drums::{sequencing::Instrument, STEPS};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::state::UiState;

const LABEL_WIDTH: usize = 8;

/// Render the grid with the playhead column and the edit cursor.
pub fn render_grid(frame: &mut Frame, area: Rect, state: &UiState, cursor: (usize, usize)) {
    if area.height < 2 || area.width < 20 {
        return;
    }

    let mut lines = Vec::with_capacity(Instrument::COUNT + 1);

    // Beat markers
    let mut markers = " ".repeat(LABEL_WIDTH);
    for step in 0..STEPS {
        markers.push_str(if step % 4 == 0 { "|" } else { " " });
        markers.push_str(&format!("{:<2}", step + 1));
    }
    lines.push(Line::from(Span::styled(
        markers,
        Style::default().fg(Color::DarkGray),
    )));

    let any_solo = state.channels.any_soloed();
    for (row, instrument) in Instrument::ALL.into_iter().enumerate() {
        let channel = state.channels.get(instrument);
        let audible = state.channels.should_trigger(instrument) && !channel.muted;

        let flags = match (channel.muted, channel.soloed) {
            (true, _) => "M",
            (_, true) => "S",
            _ => " ",
        };
        let mut spans = vec![Span::styled(
            format!("{:<7.7}{flags}", instrument.as_str()),
            Style::default().fg(if audible {
                Color::White
            } else if any_solo {
                Color::DarkGray
            } else {
                Color::Red
            }),
        )];

        for step in 0..STEPS {
            let on = state.pattern.is_on(instrument, step);
            let is_playhead = state.highlighted == Some(step);
            let is_cursor = cursor == (row, step);

            let mut style = Style::default().fg(match (on, audible) {
                (true, true) => Color::Cyan,
                (true, false) => Color::DarkGray,
                (false, _) if step % 4 == 0 => Color::Gray,
                (false, _) => Color::DarkGray,
            });
            if is_playhead {
                style = style.bg(Color::Yellow).fg(Color::Black);
            }
            if is_cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }

            let cell = if on { "▓▓" } else { "░░" };
            spans.push(Span::raw(" "));
            spans.push(Span::styled(cell, style));
        }

        // Fader and send readout
        spans.push(Span::styled(
            format!("  vol {:>3.0}%  fx {:>3.0}%", channel.volume * 100.0, channel.fx_send * 100.0),
            Style::default().fg(Color::DarkGray),
        ));

        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), area);
}
