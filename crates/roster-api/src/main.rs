//! roster-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), overlays
//! `ROSTER_*` environment variables, builds a demo directory, and serves the
//! JSON API over HTTP.
//!
//! ```
//! cargo run -p roster-api --bin roster-server -- --config config.toml
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use roster_api::{ApiState, Directory, ServerConfig};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Roster demo API server")]
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
    .add_source(config::Environment::with_prefix("ROSTER"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  if server_cfg.default_page_size == 0 || server_cfg.max_page_size == 0 {
    anyhow::bail!("page sizes in the configuration must be greater than zero");
  }

  let today = chrono::Local::now().date_naive();
  let directory = Directory::demo(server_cfg.seed_employees, today);
  tracing::info!(
    employees = server_cfg.seed_employees,
    "seeded demo directory"
  );

  let state = ApiState {
    directory: Arc::new(directory),
    limits:    server_cfg.limits(),
  };

  let app = roster_api::app(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
