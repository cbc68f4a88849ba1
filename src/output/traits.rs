//! Output sink traits and types
//!
//! This module defines the error-sink interface the crawler reports
//! failures through, along with the entry type it records.

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Invalid output format: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Classification of a logged failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request hit its hard timeout
    Timeout,
    /// Any other fetch failure: connection, non-success status, body read
    FetchError,
    /// Link extraction failed for a fetched page
    ExtractError,
    /// A failure at the per-node or whole-run boundary
    CrawlError,
}

impl ErrorKind {
    /// Returns the label used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::FetchError => "fetch-error",
            Self::ExtractError => "extract-error",
            Self::CrawlError => "crawl-error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single failure reported during a crawl
#[derive(Debug, Clone)]
pub struct ErrorEntry {
    /// When the failure was observed
    pub timestamp: DateTime<Utc>,

    /// What kind of failure this was
    pub kind: ErrorKind,

    /// Human-readable summary, including the offending URL
    pub message: String,

    /// The error and its chain of causes, one per line
    pub detail: String,
}

impl ErrorEntry {
    /// Creates an entry stamped with the current time
    ///
    /// The detail is built from `error` and every `source()` beneath it.
    pub fn new(
        kind: ErrorKind,
        message: impl Into<String>,
        error: &(dyn std::error::Error + 'static),
    ) -> Self {
        let mut detail = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            detail.push_str("\n    caused by: ");
            detail.push_str(&cause.to_string());
            source = cause.source();
        }

        Self {
            timestamp: Utc::now(),
            kind,
            message: message.into(),
            detail,
        }
    }

    /// Formats the entry as it appears in the error log
    ///
    /// `<timestamp> - <message>`, the detail on the following line(s), then
    /// a blank line separating it from the next entry.
    pub fn to_log_entry(&self) -> String {
        format!(
            "{} - {}\n{}\n\n",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.message,
            self.detail
        )
    }
}

/// Trait for error sinks
///
/// The crawler never lets a failure escape a node; instead each one is
/// handed to an error sink. Implementations must be thread-safe because
/// crawl tasks run in parallel.
pub trait ErrorSink: Send + Sync {
    /// Records a failure
    ///
    /// Recording must not fail from the caller's point of view; sinks deal
    /// with their own I/O problems.
    fn record_error(&self, entry: &ErrorEntry);
}
