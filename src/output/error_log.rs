//! Append-only error log file

use crate::output::traits::{ErrorEntry, ErrorSink};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Error sink that appends every entry to a file
///
/// Each entry is also mirrored as a one-line `tracing` error pointing at the
/// log file. Appends are serialized so concurrent crawl tasks never
/// interleave partial entries.
#[derive(Debug)]
pub struct ErrorLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl ErrorLog {
    /// Creates a sink appending to `path`
    ///
    /// The file is created lazily on the first recorded error.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Returns the log file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, text: &str) -> std::io::Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(text.as_bytes())
    }
}

impl ErrorSink for ErrorLog {
    fn record_error(&self, entry: &ErrorEntry) {
        match self.append(&entry.to_log_entry()) {
            Ok(()) => {
                tracing::error!(
                    kind = %entry.kind,
                    "Error: {} (Details logged to {})",
                    entry.message,
                    self.path.display()
                );
            }
            Err(e) => {
                tracing::error!("Failed to log error to file: {}", e);
                tracing::error!("Original error: {}", entry.message);
            }
        }
    }
}
