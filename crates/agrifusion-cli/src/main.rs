//! `agrifusion`: command-line client for the AgriFusion API.
//!
//! # Usage
//!
//! ```
//! agrifusion --url http://localhost:8080 --token <TOKEN> notifications --unread
//! agrifusion --config ~/.config/agrifusion/config.toml filters
//! ```

mod client;
mod output;

use std::path::PathBuf;

use agrifusion_core::inbox::Inbox;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reqwest::StatusCode;
use client::{ApiClient, ApiConfig};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "agrifusion", about = "Command-line client for the AgriFusion API")]
struct Args {
  /// Path to a TOML config file (url, token).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the server (default: http://localhost:8080).
  #[arg(long, env = "AGRIFUSION_URL")]
  url: Option<String>,

  /// Bearer token issued for your account.
  #[arg(long, env = "AGRIFUSION_TOKEN", hide_env_values = true)]
  token: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Show your profile and dashboard access.
  Whoami,
  /// List district, state and crop filters over unassigned farmers.
  Filters,
  /// List your notifications.
  Notifications {
    /// Only show unread notifications.
    #[arg(long)]
    unread: bool,
  },
  /// Mark one notification as read.
  Read { id: Uuid },
  /// Mark every notification as read.
  ReadAll,
  /// Delete one notification.
  Delete { id: Uuid },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:   String,
  #[serde(default)]
  token: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  // Logs go to stderr so command output stays pipeable.
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://localhost:8080".to_string()),
    token:    args
      .token
      .or_else(|| (!file_cfg.token.is_empty()).then(|| file_cfg.token.clone()))
      .unwrap_or_default(),
  };

  if api_config.token.is_empty() {
    tracing::warn!("no token configured; the server will answer 401");
  }

  let client = ApiClient::new(api_config)?;
  let result = run(client, args.command).await;

  if let Err(err) = &result
    && is_unauthorized(err)
  {
    tracing::warn!(
      "token rejected; mint a new one with `agrifusion-server --issue-token <PROFILE_ID>`"
    );
  }
  result
}

async fn run(client: ApiClient, command: Command) -> Result<()> {
  match command {
    Command::Whoami => {
      let summary = client.whoami().await?;
      print!("{}", output::profile(&summary));
    }
    Command::Filters => {
      let filters = client.farmer_filters().await?;
      print!("{}", output::filters(&filters));
    }
    Command::Notifications { unread } => {
      let list = client.notifications(unread).await?;
      print!("{}", output::notifications(&list.notifications, list.unread_count));
    }
    Command::Read { id } => {
      let mut inbox = Inbox::new(client);
      inbox.mark_as_read(id).await?;
      println!("marked {id} read; {} unread", inbox.unread_count());
    }
    Command::ReadAll => {
      let mut inbox = Inbox::new(client);
      let updated = inbox.mark_all_as_read().await?;
      println!("marked {updated} read; {} unread", inbox.unread_count());
    }
    Command::Delete { id } => {
      let mut inbox = Inbox::new(client);
      inbox.delete(id).await?;
      println!("deleted {id}; {} unread", inbox.unread_count());
    }
  }
  Ok(())
}

/// Whether `err` is the server refusing our token.
fn is_unauthorized(err: &anyhow::Error) -> bool {
  err
    .downcast_ref::<client::Error>()
    .and_then(client::Error::status)
    == Some(StatusCode::UNAUTHORIZED)
}
