//! InnoTrue Hub API Server
//!
//! Run with: cargo run --bin innotrue-hub
//!
//! # Configuration
//!
//! Reads `config.toml` from the usual locations (see [`Config::load_default`]),
//! or the path given as the first argument. `INNOTRUE_*` environment
//! variables override file settings; `RUST_LOG` overrides the log level.

use innotrue_hub::api::{serve, ApiConfig, AppState};
use innotrue_hub::config::Config;
use innotrue_hub::session::FilePreferenceStore;
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => Config::load_with_env(&path)?,
        None => Config::load_default(),
    };

    config.logging.init();

    tracing::info!("Starting InnoTrue Hub API server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Role preferences: {}", config.session.preferences_path);
    tracing::info!(
        "Calendar product id: {} (fallback warnings: {})",
        config.calendar.product_id,
        config.calendar.warn_on_fallback
    );

    let preferences = Arc::new(FilePreferenceStore::new(&config.session.preferences_path));
    let api_config = ApiConfig::from(&config.api);

    let state = AppState::with_store(
        config.calendar.ics_options(),
        api_config.clone(),
        preferences,
    );

    serve(state, &api_config).await?;

    tracing::info!("InnoTrue Hub API server stopped");
    Ok(())
}
