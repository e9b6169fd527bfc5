//! Asset browser logging & crash reporting
//!
//! Provides structured logging and a panic hook that writes crash reports next to the logs.

mod panic_hook;
mod logging;

pub use panic_hook::{init_panic_hook, write_crash_dump};
pub use logging::{init_logging, cleanup_old_logs, cleanup_old_logs_in};

use std::path::PathBuf;
use directories::ProjectDirs;
use tracing_appender::non_blocking::WorkerGuard;

/// Get the application log directory
pub fn log_dir() -> PathBuf {
    ProjectDirs::from("com", "AssetBrowser", "AssetBrowser")
        .map(|dirs| dirs.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

/// Initialize logging and the panic hook.
///
/// The returned guard flushes the file writer when dropped, so the caller
/// keeps it alive for the lifetime of the process.
pub fn init() -> anyhow::Result<WorkerGuard> {
    let guard = init_logging()?;
    init_panic_hook();
    Ok(guard)
}
