//! Notes panel - one row per sounding note

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::UiState;

pub fn render_notes(frame: &mut Frame, area: Rect, state: &UiState) {
    let block = Block::default().title(" Notes ").borders(Borders::ALL);

    let lines: Vec<Line> = state
        .notes
        .iter()
        .map(|(note, row)| {
            let cents_color = if row.cents.abs() < 0.05 {
                Color::DarkGray
            } else if row.cents > 0.0 {
                Color::LightRed
            } else {
                Color::LightBlue
            };
            Line::from(vec![
                Span::styled(format!(" {:<4}", note.to_string()), Style::default().fg(Color::White)),
                Span::styled(format!("{:3} ", note.get()), Style::default().fg(Color::DarkGray)),
                Span::styled(
                    format!("{:9.2} Hz ", row.frequency),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(format!("{:+7.2}¢ │ ", row.cents), Style::default().fg(cents_color)),
                Span::styled(
                    "█".repeat((row.velocity / 16) as usize),
                    Style::default().fg(Color::Green),
                ),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
