//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The per-run crawl context (visited set, page cache, records)
//! - Request scheduling (global concurrency cap and pre-request delay)
//! - HTTP fetching with content-type gating
//! - HTML parsing and link extraction
//! - Domain-locality rank calculation
//! - Overall crawl coordination

mod context;
mod coordinator;
mod fetcher;
mod parser;
mod rank;
mod scheduler;

pub use context::{CrawlContext, PageRecord};
pub use coordinator::{run_crawl, Coordinator, CrawlFuture};
pub use fetcher::{build_http_client, fetch_url, FetchResult, Fetcher};
pub use parser::{extract_links, parse_html, ParsedPage};
pub use rank::calculate_rank;
pub use scheduler::{RequestSlot, Scheduler};
