use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::graphql::GraphqlClient;
use crate::ui;
use crate::ui::view::{View, ViewAction};
use crate::ui::views::TodoListView;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;
use tracing::info;

/// Main application state
pub struct App {
  view: Box<dyn View>,
  title: String,
  host: String,
  should_quit: bool,
}

impl App {
  pub fn new(config: Config) -> Result<Self> {
    let client = GraphqlClient::new(&config)?;
    let host = match client.endpoint().port() {
      Some(port) => format!("{}:{}", client.endpoint().host_str().unwrap_or_default(), port),
      None => client.endpoint().host_str().unwrap_or_default().to_string(),
    };

    info!(endpoint = %client.endpoint(), "starting checklist");

    Ok(Self {
      view: Box::new(TodoListView::new(client, config.insert_strategy)),
      title: config.title().to_string(),
      host,
      should_quit: false,
    })
  }

  pub async fn run(&mut self) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = self.event_loop(&mut terminal).await;

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
    let mut events = EventHandler::new(Duration::from_millis(100));

    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(Event::Key(key)) => self.handle_key(key),
        Some(Event::Tick) => self.view.tick(),
        Some(Event::Resize) => {}
        None => break,
      }
    }

    info!("exiting");
    Ok(())
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    if self.view.handle_key(key) == ViewAction::Quit {
      self.should_quit = true;
    }
  }

  // Accessors for UI rendering
  pub fn view(&self) -> &dyn View {
    self.view.as_ref()
  }

  pub fn view_mut(&mut self) -> &mut dyn View {
    self.view.as_mut()
  }

  pub fn title(&self) -> &str {
    &self.title
  }

  pub fn host(&self) -> &str {
    &self.host
  }
}
