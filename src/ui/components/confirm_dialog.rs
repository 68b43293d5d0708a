use super::KeyResult;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

/// Answer given to a confirm dialog, carrying the value it was asked about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmEvent<T> {
  pub target: T,
  pub confirmed: bool,
}

/// Modal yes/no prompt.
///
/// While active it swallows every key; `y` confirms, `n` / `Esc` / `q`
/// declines.
#[derive(Debug, Clone)]
pub struct ConfirmDialog<T> {
  pending: Option<(String, T)>,
}

impl<T> Default for ConfirmDialog<T> {
  fn default() -> Self {
    Self { pending: None }
  }
}

impl<T: Clone> ConfirmDialog<T> {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.pending.is_some()
  }

  /// Ask `prompt` about `target`
  pub fn show(&mut self, prompt: impl Into<String>, target: T) {
    self.pending = Some((prompt.into(), target));
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<ConfirmEvent<T>> {
    if self.pending.is_none() {
      return KeyResult::NotHandled;
    }

    let confirmed = match key.code {
      KeyCode::Char('y') | KeyCode::Char('Y') => true,
      KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Char('q') | KeyCode::Esc => false,
      _ => return KeyResult::Handled,
    };

    match self.pending.take() {
      Some((_, target)) => KeyResult::Event(ConfirmEvent { target, confirmed }),
      None => KeyResult::Handled,
    }
  }

  /// Render the dialog centered in `area` if active
  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    let Some((prompt, _)) = &self.pending else {
      return;
    };

    let width = (prompt.chars().count() as u16 + 4)
      .max(30)
      .min(area.width.saturating_sub(4));
    let height = 5u16.min(area.height);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let overlay_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Red))
      .title(" Confirm ");

    let text = vec![
      Line::from(prompt.as_str()),
      Line::from(""),
      Line::from(vec![
        Span::styled("<y>", Style::default().fg(Color::Cyan)),
        Span::styled(" yes   ", Style::default().fg(Color::DarkGray)),
        Span::styled("<n>", Style::default().fg(Color::Cyan)),
        Span::styled(" no", Style::default().fg(Color::DarkGray)),
      ]),
    ];

    let paragraph = Paragraph::new(text)
      .block(block)
      .alignment(Alignment::Center)
      .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, overlay_area);
  }
}
