//! File logging. The terminal belongs to the UI, so tracing output goes
//! to a log file instead of stderr.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Installs a global subscriber appending to `path`, filtered by
/// `RUST_LOG` (default `info`).
pub fn init(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .compact()
        .with_ansi(false)
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err.to_string()))?;

    tracing::info!(
        started = %chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "reptype starting"
    );
    Ok(())
}
