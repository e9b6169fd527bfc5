//! Asset Browser - headless front end for the asset browser core
//!
//! Usage: `asset_browser [ASSET_DIR] [FILTER]`

mod app;

use anyhow::Result;
use std::path::PathBuf;

fn main() -> Result<()> {
    // Initialize logging and panic hook first
    let _log_guard = asset_log::init()?;

    // Clean up old logs (7 days)
    if let Err(e) = asset_log::cleanup_old_logs(7) {
        tracing::warn!("Failed to cleanup old logs: {}", e);
    }

    tracing::info!("Asset browser starting...");

    let mut args = std::env::args().skip(1);
    let mut config = asset_core::BrowserConfig::load().unwrap_or_default();
    if let Some(dir) = args.next() {
        config.project.asset_directory = PathBuf::from(dir);
    }
    let filter = args.next();

    app::run(config, filter.as_deref())
}
