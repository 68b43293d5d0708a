pub mod components;
pub mod renderfns;
pub mod view;
pub mod views;

use crate::app::App;
use ratatui::prelude::*;
use ratatui::widgets::ListState;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Main content
      Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

  let shortcuts = app.view().shortcuts();
  renderfns::draw_header(frame, chunks[0], app.title(), app.host(), &shortcuts);

  app.view_mut().render(frame, chunks[1]);

  let status = app.view().status_line();
  renderfns::draw_footer(frame, chunks[2], status);
}

/// Keep a list selection inside `0..len`, selecting the first row when
/// there was none and clearing it when the list is empty.
pub fn ensure_valid_selection(state: &mut ListState, len: usize) {
  if len == 0 {
    state.select(None);
    return;
  }

  match state.selected() {
    None => state.select(Some(0)),
    Some(i) if i >= len => state.select(Some(len - 1)),
    Some(_) => {}
  }
}
