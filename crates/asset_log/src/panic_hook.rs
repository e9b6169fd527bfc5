//! Panic hook for crash reporting

use backtrace::Backtrace;
use chrono::Local;
use std::panic::PanicHookInfo;
use std::path::{Path, PathBuf};

/// Initialize the panic hook for crash reporting
pub fn init_panic_hook() {
    std::panic::set_hook(Box::new(panic_handler));
    tracing::debug!("Panic hook initialized");
}

fn panic_handler(info: &PanicHookInfo) {
    let report = CrashReport::capture(info).render();

    eprintln!("{}", report);
    tracing::error!("{}", report);

    // Next to the logs when possible, else the temp directory
    let crash_dir = super::log_dir().join("crashes");
    let written = write_crash_dump(&crash_dir, &report)
        .or_else(|_| write_crash_dump(&std::env::temp_dir(), &report));
    match written {
        Ok(path) => eprintln!("Crash report written to {}", path.display()),
        Err(e) => eprintln!("Failed to write crash dump: {}", e),
    }
}

struct CrashReport {
    timestamp: String,
    thread: String,
    location: String,
    message: String,
    backtrace: Backtrace,
}

impl CrashReport {
    fn capture(info: &PanicHookInfo) -> Self {
        let message = info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "<unknown>".to_string());

        Self {
            timestamp: Local::now().to_rfc3339(),
            thread: std::thread::current().name().unwrap_or("<unnamed>").to_string(),
            location: info
                .location()
                .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
                .unwrap_or_else(|| "<unknown>".to_string()),
            message,
            backtrace: Backtrace::new(),
        }
    }

    fn render(&self) -> String {
        format!(
            "=== ASSET BROWSER PANIC ===\n\
             Timestamp: {}\n\
             Thread: {}\n\
             Location: {}\n\
             Message: {}\n\n\
             Stack Trace:\n{:?}",
            self.timestamp, self.thread, self.location, self.message, self.backtrace
        )
    }
}

/// Write `report` to a timestamped file in `dir`, creating it if needed
pub fn write_crash_dump(dir: &Path, report: &str) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let file_name = format!("asset_browser_crash_{}.txt", Local::now().format("%Y%m%d_%H%M%S"));
    let path = dir.join(file_name);
    std::fs::write(&path, report)?;
    Ok(path)
}
