//! agrifusion-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store, and serves the JSON API over HTTP.
//!
//! # Local setup
//!
//! ```
//! agrifusion-server --seed fixtures.json --issue-token <PROFILE_ID>
//! agrifusion-server
//! ```

use std::{path::PathBuf, sync::Arc};

use agrifusion_server::{ServerConfig, app, seed::SeedData};
use agrifusion_store_sqlite::SqliteStore;
use anyhow::Context as _;
use chrono::TimeDelta;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser)]
#[command(author, version, about = "AgriFusion API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Load profiles, farmers and notifications from a JSON file before
  /// anything else.
  #[arg(long, value_name = "FILE")]
  seed: Option<PathBuf>,

  /// Print a new bearer token for the owner of this profile and exit.
  #[arg(long, value_name = "PROFILE_ID")]
  issue_token: Option<Uuid>,

  /// Lifetime of the token printed by `--issue-token`; no expiry if omitted.
  #[arg(long, value_name = "HOURS", requires = "issue_token")]
  token_ttl_hours: Option<i64>,

  /// Exit after seeding instead of serving.
  #[arg(long, requires = "seed")]
  seed_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config.clone()).required(false))
    .add_source(config::Environment::with_prefix("AGRIFUSION"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Open SQLite store.
  let store_path = server_cfg.resolved_store_path();
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  if let Some(path) = &cli.seed {
    SeedData::from_file(path)?.apply(&store).await?;
    if cli.seed_only {
      return Ok(());
    }
  }

  // Helper mode: mint a token and exit.
  if let Some(profile_id) = cli.issue_token {
    let ttl = cli.token_ttl_hours.map(TimeDelta::hours);
    let token = store
      .issue_token_for_profile(profile_id, ttl)
      .await
      .with_context(|| format!("failed to issue token for profile {profile_id}"))?;
    println!("{token}");
    return Ok(());
  }

  let app = app(Arc::new(store));
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
