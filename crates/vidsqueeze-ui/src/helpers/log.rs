// crates/vidsqueeze-ui/src/helpers/log.rs
//
// Logging for the whole process.
//
// In release builds with `windows_subsystem = "windows"` (double-click launch)
// there is no console attached, so stderr output is lost. Every event is also
// appended to a file in the OS temp directory.
//
// File:   $TMP/vidsqueeze.log (append-only, plain text)
// Filter: RUST_LOG, default `info`

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn log_path() -> PathBuf {
    std::env::temp_dir().join("vidsqueeze.log")
}

/// Install the global subscriber. Safe to call more than once; only the
/// first call takes effect.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path())
        .ok()
        .map(|file| fmt::layer().with_ansi(false).with_writer(Mutex::new(file)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init();
}
