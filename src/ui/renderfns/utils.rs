use ratatui::prelude::*;

/// Style for a todo's text: completed items are struck through and dimmed
pub fn todo_style(done: bool) -> Style {
  if done {
    Style::default()
      .fg(Color::DarkGray)
      .add_modifier(Modifier::CROSSED_OUT)
  } else {
    Style::default().fg(Color::White)
  }
}
