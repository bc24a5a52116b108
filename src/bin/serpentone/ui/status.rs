//! Status log - newest message at the bottom

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::UiState;

pub fn render_status(frame: &mut Frame, area: Rect, state: &UiState) {
    let block = Block::default().title(" Status ").borders(Borders::ALL);
    let visible = block.inner(area).height as usize;

    let skip = state.status.len().saturating_sub(visible);
    let lines: Vec<Line> = state
        .status
        .iter()
        .skip(skip)
        .map(|(elapsed, message)| {
            Line::from(vec![
                Span::styled(
                    format!(" {:>7.1}s ", elapsed.as_secs_f64()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(message.as_str()),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
