use crate::config::InsertStrategy;
use crate::controller::{ListView, StatusMessage, TodoController, DELETE_PROMPT};
use crate::graphql::{Todo, TodoApi, TodoId};
use crate::ui::components::{ConfirmDialog, ConfirmEvent, InputResult, KeyResult};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::todo_style;
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

const PLACEHOLDER: &str = "Write your todo";

/// The checklist screen: input line on top, todo list below
pub struct TodoListView<A: TodoApi> {
  controller: TodoController<A>,
  list_state: ListState,
  confirm: ConfirmDialog<TodoId>,
  editing: bool,
}

impl<A: TodoApi> TodoListView<A> {
  pub fn new(api: A, insert_strategy: InsertStrategy) -> Self {
    Self {
      controller: TodoController::new(api, insert_strategy),
      list_state: ListState::default(),
      confirm: ConfirmDialog::new(),
      editing: false,
    }
  }

  fn selected_todo(&self) -> Option<&Todo> {
    match self.controller.list_view() {
      ListView::Ready(todos) => self.list_state.selected().and_then(|i| todos.get(i)),
      _ => None,
    }
  }

  fn visible_len(&self) -> usize {
    match self.controller.list_view() {
      ListView::Ready(todos) => todos.len(),
      _ => 0,
    }
  }

  fn render_input(&self, frame: &mut Frame, area: Rect) {
    let border = if self.editing {
      Color::Yellow
    } else {
      Color::DarkGray
    };

    let block = Block::default()
      .title(" New todo ")
      .borders(Borders::ALL)
      .border_style(Style::default().fg(border));
    let inner = block.inner(area);

    let draft = self.controller.draft();
    let content = if draft.is_empty() && !self.editing {
      Line::from(Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray)))
    } else {
      Line::from(draft.value())
    };

    // scroll so the cursor cell stays inside the box
    let cursor = u16::try_from(draft.cursor_width()).unwrap_or(u16::MAX);
    let offset = cursor.saturating_add(1).saturating_sub(inner.width);

    frame.render_widget(
      Paragraph::new(content).block(block).scroll((0, offset)),
      area,
    );

    if self.editing && inner.width > 0 {
      frame.set_cursor_position((inner.x + cursor - offset, inner.y));
    }
  }

  fn render_list(&mut self, frame: &mut Frame, area: Rect) {
    let len = self.visible_len();
    ensure_valid_selection(&mut self.list_state, len);

    let view = self.controller.list_view();

    let title = match view {
      ListView::Ready(todos) => {
        let done = todos.iter().filter(|t| t.done).count();
        if self.controller.is_fetching() {
          format!(" Todos ({}/{}) (refreshing...) ", done, todos.len())
        } else {
          format!(" Todos ({}/{}) ", done, todos.len())
        }
      }
      _ => " Todos ".to_string(),
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Magenta));

    let placeholder = match view {
      ListView::Loading => Some(("Loading todos...", Color::DarkGray)),
      ListView::Error => Some(("Error fetching", Color::Red)),
      ListView::Ready([]) => Some(("Nothing to do. Press 'a' to add a todo.", Color::DarkGray)),
      ListView::Ready(_) => None,
    };

    if let Some((text, color)) = placeholder {
      let paragraph = Paragraph::new(text)
        .block(block)
        .style(Style::default().fg(color));
      frame.render_widget(paragraph, area);
      return;
    }

    let items: Vec<ListItem> = match view {
      ListView::Ready(todos) => todos.iter().map(|t| ListItem::new(todo_line(t))).collect(),
      _ => Vec::new(),
    };

    let list = List::new(items)
      .block(block)
      .highlight_style(Style::default().bg(Color::DarkGray))
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut self.list_state);
  }

  // Key handling helpers for or_else chain pattern
  fn handle_overlays(&mut self, key: KeyEvent) -> Option<ViewAction> {
    match self.confirm.handle_key(key) {
      KeyResult::Handled => Some(ViewAction::None),
      KeyResult::Event(ConfirmEvent { target, confirmed }) => {
        self.controller.delete(&target, |_| confirmed);
        Some(ViewAction::None)
      }
      KeyResult::NotHandled => None,
    }
  }

  fn handle_input(&mut self, key: KeyEvent) -> Option<ViewAction> {
    if !self.editing {
      return None;
    }

    match self.controller.draft_mut().handle_key(key) {
      InputResult::Submitted(_) => {
        self.controller.submit();
      }
      InputResult::Cancelled => self.editing = false,
      InputResult::Consumed => {}
      InputResult::NotHandled => return None,
    }
    Some(ViewAction::None)
  }

  fn handle_navigation(&mut self, key: KeyEvent) -> Option<ViewAction> {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => {
        self.list_state.select_next();
        Some(ViewAction::None)
      }
      KeyCode::Char('k') | KeyCode::Up => {
        self.list_state.select_previous();
        Some(ViewAction::None)
      }
      _ => None,
    }
  }

  fn handle_actions(&mut self, key: KeyEvent) -> Option<ViewAction> {
    match key.code {
      KeyCode::Char('a') | KeyCode::Char('i') => {
        self.editing = true;
        Some(ViewAction::None)
      }
      KeyCode::Char(' ') | KeyCode::Enter => {
        if let Some(id) = self.selected_todo().map(|t| t.id.clone()) {
          self.controller.toggle(&id);
        }
        Some(ViewAction::None)
      }
      KeyCode::Char('d') | KeyCode::Char('x') | KeyCode::Delete => {
        if let Some(id) = self.selected_todo().map(|t| t.id.clone()) {
          self.confirm.show(DELETE_PROMPT, id);
        }
        Some(ViewAction::None)
      }
      KeyCode::Char('r') => {
        self.controller.refresh();
        Some(ViewAction::None)
      }
      KeyCode::Char('q') => Some(ViewAction::Quit),
      _ => None,
    }
  }
}

/// One list row: checkbox, text (struck through when done), delete mark
pub fn todo_line(todo: &Todo) -> Line<'static> {
  let (checkbox, checkbox_color) = if todo.done {
    ("[x] ", Color::Green)
  } else {
    ("[ ] ", Color::DarkGray)
  };

  Line::from(vec![
    Span::styled(checkbox, Style::default().fg(checkbox_color)),
    Span::styled(todo.text.clone(), todo_style(todo.done)),
    Span::raw(" "),
    Span::styled("×", Style::default().fg(Color::Red)),
  ])
}

impl<A: TodoApi> View for TodoListView<A> {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    self
      .handle_overlays(key)
      .or_else(|| self.handle_input(key))
      .or_else(|| self.handle_navigation(key))
      .or_else(|| self.handle_actions(key))
      .unwrap_or(ViewAction::None)
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(3), // Input
        Constraint::Min(1),    // List
      ])
      .split(area);

    self.render_input(frame, chunks[0]);
    self.render_list(frame, chunks[1]);
    self.confirm.render_overlay(frame, area);
  }

  fn tick(&mut self) {
    if self.controller.poll() {
      let len = self.visible_len();
      ensure_valid_selection(&mut self.list_state, len);
    }
  }

  fn status_line(&self) -> Option<Line<'static>> {
    let mut spans = Vec::new();

    match self.controller.status() {
      Some(StatusMessage::Info(msg)) => {
        spans.push(Span::styled(format!(" {}", msg), Style::default().fg(Color::Green)))
      }
      Some(StatusMessage::Error(msg)) => {
        spans.push(Span::styled(format!(" {}", msg), Style::default().fg(Color::Red)))
      }
      None => {}
    }

    let pending = self.controller.in_flight();
    if pending > 0 {
      spans.push(Span::styled(
        format!(" ({} pending)", pending),
        Style::default().fg(Color::Yellow),
      ));
    }

    if spans.is_empty() {
      None
    } else {
      Some(Line::from(spans))
    }
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    if self.confirm.is_active() {
      return vec![
        ShortcutInfo::new("y", "delete").with_priority(10),
        ShortcutInfo::new("n", "keep").with_priority(20),
      ];
    }

    if self.editing {
      return vec![
        ShortcutInfo::new("enter", "create").with_priority(10),
        ShortcutInfo::new("esc", "done").with_priority(20),
      ];
    }

    vec![
      ShortcutInfo::new("a", "add").with_priority(10),
      ShortcutInfo::new("space", "toggle").with_priority(20),
      ShortcutInfo::new("d", "delete").with_priority(30),
      ShortcutInfo::new("r", "refresh").with_priority(40),
      ShortcutInfo::new("q", "quit").with_priority(90),
    ]
  }
}
