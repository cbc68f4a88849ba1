//! Configuration module
//!
//! Crawl tuning comes from built-in defaults, optionally overridden by a
//! TOML file. Positional CLI arguments (root URL, max depth, output format)
//! are applied on top by the binary.
//!
//! # Example
//!
//! ```no_run
//! use rank_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Rate limit delay: {}ms", config.crawler.rate_limit_delay);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, UserAgentConfig, DEFAULT_ERROR_LOG,
    DEFAULT_MAX_CONCURRENCY, DEFAULT_RATE_LIMIT_DELAY_MS, DEFAULT_REQUEST_TIMEOUT_MS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
