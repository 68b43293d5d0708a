mod app;
mod cache;
mod config;
mod controller;
mod event;
mod graphql;
mod logging;
mod query;
mod ui;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gql-checklist")]
#[command(about = "A terminal checklist backed by a GraphQL todo API")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/gql-checklist/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// GraphQL endpoint, overrides the config file
  #[arg(short, long)]
  endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let config = config::Config::load(args.config.as_deref(), args.endpoint)?;

  let _log_guard = logging::init()?;

  let mut app = app::App::new(config)?;
  app.run().await?;

  Ok(())
}
