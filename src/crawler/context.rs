//! Shared state for one crawl run

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One successfully crawled page
#[derive(Debug, Clone, PartialEq)]
pub struct PageRecord {
    /// Normalized absolute URL of the page
    pub url: String,

    /// Link distance from the root URL (the root is 0)
    pub depth: u32,

    /// Share of the page's links that stay on its hostname, in `[0, 1]`
    pub rank: f64,
}

/// State owned by a single crawl run
///
/// Holds the visited set, the raw HTML cache and the record sequence. It is
/// created with the coordinator and shared with the fetcher and every crawl
/// task through an `Arc`; nothing outside the crawler mutates it.
#[derive(Debug, Default)]
pub struct CrawlContext {
    visited: Mutex<HashSet<String>>,
    page_cache: Mutex<HashMap<String, String>>,
    results: Mutex<Vec<PageRecord>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl CrawlContext {
    /// Creates an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a URL as visited
    ///
    /// The check and the insert happen under one lock, so exactly one caller
    /// ever gets `true` for a given URL.
    ///
    /// # Returns
    ///
    /// * `true` - The URL was not visited before and is now claimed
    /// * `false` - The URL was already visited
    pub fn mark_visited(&self, url: &str) -> bool {
        let mut visited = lock(&self.visited);
        if visited.contains(url) {
            return false;
        }
        visited.insert(url.to_string())
    }

    /// Returns true if the URL has been visited
    pub fn is_visited(&self, url: &str) -> bool {
        lock(&self.visited).contains(url)
    }

    /// Returns the number of visited URLs
    pub fn visited_count(&self) -> usize {
        lock(&self.visited).len()
    }

    /// Returns the cached HTML for a URL, if any
    pub fn cached_page(&self, url: &str) -> Option<String> {
        lock(&self.page_cache).get(url).cloned()
    }

    /// Caches the HTML of a fetched page
    pub fn cache_page(&self, url: &str, html: &str) {
        lock(&self.page_cache).insert(url.to_string(), html.to_string());
    }

    /// Returns the number of cached pages
    pub fn cached_count(&self) -> usize {
        lock(&self.page_cache).len()
    }

    /// Appends a record to the results
    pub fn push_record(&self, record: PageRecord) {
        lock(&self.results).push(record);
    }

    /// Returns a copy of the records, in the order they were appended
    pub fn records(&self) -> Vec<PageRecord> {
        lock(&self.results).clone()
    }

    /// Returns the number of records
    pub fn record_count(&self) -> usize {
        lock(&self.results).len()
    }
}
