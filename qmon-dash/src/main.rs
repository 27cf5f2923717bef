//! qmon-dash - quality dashboard JSON API
//!
//! Serves read-only analytics over the assessment stores in the data
//! directory. Stores are re-read at most once per cache TTL.

use anyhow::Result;
use clap::Parser;
use qmon_common::config::DashboardConfig;
use qmon_common::time::SystemClock;
use qmon_common::QueryFacade;
use qmon_dash::{build_router, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "qmon-dash", version, about = "Quality dashboard JSON API")]
struct Args {
    /// Directory holding the JSON stores (overrides QMON_DATA_DIR and config)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// HTTP port
    #[arg(long, short)]
    port: Option<u16>,

    /// TOML config file (defaults to <config dir>/qmon/config.toml)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Log level, overrides the config file; RUST_LOG takes precedence
    #[arg(long, env = "QMON_LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = DashboardConfig::resolve(
        args.data_dir.as_deref(),
        args.port,
        args.config.as_deref(),
    )?;

    let level = args.log_level.as_deref().unwrap_or(&config.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .init();

    info!("Starting qmon-dash v{}", env!("CARGO_PKG_VERSION"));
    info!("Data directory: {}", config.data_dir.display());
    if !config.data_dir.is_dir() {
        info!("Data directory does not exist yet; views will be empty until stores appear");
    }

    let facade = QueryFacade::new(&config, Arc::new(SystemClock));
    let app = build_router(AppState::new(facade));

    let addr = format!("127.0.0.1:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("qmon-dash listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
