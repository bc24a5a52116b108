//! Header bar - tuning, key, patch and octave

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::UiState;

pub fn render_header(frame: &mut Frame, area: Rect, state: &UiState) {
    let block = Block::default().title(" serpentone ").borders(Borders::ALL);

    let key = state.key.map_or_else(|| "-".to_string(), |k| k.to_string());
    let line = Line::from(vec![
        Span::styled(
            format!(" {}  ", state.tuning_name),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(format!("Key: {key}  "), Style::default().fg(Color::White)),
        Span::styled(
            format!("Patch: {}  ", state.patch),
            Style::default().fg(Color::Green),
        ),
        Span::styled(
            format!("Octave: {}  ", state.octave()),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(
            format!("{} sounding", state.notes.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}
