use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the footer status line
pub fn draw_footer(frame: &mut Frame, area: Rect, status: Option<Line<'static>>) {
  let line = status.unwrap_or_else(|| Line::from(""));
  let paragraph = Paragraph::new(line).style(Style::default().bg(Color::Black));

  frame.render_widget(paragraph, area);
}
