//! littlesteps server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), applies
//! `LITTLESTEPS_*` environment overrides, and serves the document store
//! over HTTP.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use littlesteps_server::{AppState, ServerConfig};
use littlesteps_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "littlesteps childcare record service")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("LITTLESTEPS"))
    .build()
    .context("failed to read config file")?;

  let mut server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;
  server_cfg.database_url = expand_tilde(&server_cfg.database_url);

  // Fail fast on an unusable database before accepting traffic. The
  // connection is dropped immediately; requests open their own.
  SqliteStore::open(&server_cfg.database_url)
    .await
    .with_context(|| {
      format!("failed to open store at {:?}", server_cfg.database_url)
    })?;

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  let state = AppState { config: Arc::new(server_cfg) };
  let app = littlesteps_server::router(state);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &str) -> String {
  if let Some(rest) = path.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return Path::new(&home).join(rest).to_string_lossy().into_owned();
  }
  path.to_owned()
}
