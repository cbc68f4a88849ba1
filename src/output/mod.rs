//! Output module for crawl results and failures
//!
//! This module handles:
//! - Writing the record sequence as a delimited file
//! - The append-only error log the crawler reports failures to
//! - Completion statistics

mod error_log;
pub mod stats;
mod traits;
mod writer;

pub use error_log::ErrorLog;
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{ErrorEntry, ErrorKind, ErrorSink, OutputError, OutputResult};
pub use writer::{format_records, write_records, OutputFormat};
