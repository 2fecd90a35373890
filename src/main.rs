use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use txt_dashboard::config::AppConfig;
use txt_dashboard::ingest::MessageTable;
use txt_dashboard::logging::{init_logging, OperationTimer};
use txt_dashboard::sampler::PhotoLibrary;
use txt_dashboard::server::{router, AppState};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the message export CSV (overrides configuration)
    #[arg(short, long)]
    csv: Option<PathBuf>,

    /// Host to bind the dashboard on (overrides configuration)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind the dashboard on (overrides configuration)
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory of photos for the random-photo panel (overrides configuration)
    #[arg(long)]
    photos: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration and apply command-line overrides
    let mut config = AppConfig::load()?;
    config.data.csv_path = config.get_csv_path();

    let cli = Cli::parse();
    if let Some(csv) = cli.csv {
        config.data.csv_path = csv.display().to_string();
    }
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(photos) = cli.photos {
        config.data.photos_dir = photos.display().to_string();
    }

    // Initialize logging; the guard keeps the file appender alive
    let _log_guard = init_logging(
        Some(&config.get_log_level()),
        config.logging.file_path.as_deref().map(Path::new),
    )?;

    info!("Starting txt-dashboard");

    // A missing or malformed export is fatal: this is a fixed personal
    // dataset, not a service ingesting arbitrary input.
    let timer = OperationTimer::new("load_message_table");
    let table = MessageTable::load(&config.data)
        .with_context(|| format!("failed to load message export from {}", config.data.csv_path))?;
    timer.finish();

    // A missing photo directory only disables the photo panel
    let photos = match PhotoLibrary::scan(Path::new(&config.data.photos_dir)) {
        Ok(library) => {
            info!(photos = library.len(), "Photo library ready");
            library
        }
        Err(e) => {
            warn!(
                dir = %config.data.photos_dir,
                error = %e,
                "Photo directory unavailable; random-photo panel disabled"
            );
            PhotoLibrary::empty()
        }
    };

    let state = Arc::new(AppState::new(table, photos, config.dashboard.clone())?);
    let app = router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "Dashboard listening");
    axum::serve(listener, app).await?;

    Ok(())
}
