//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator walks the link graph depth-first from the root URL:
//! - Dedup through the shared visited set (claimed before any I/O)
//! - Depth bounding
//! - Fetch → extract → rank → record for every page
//! - Fan-out to child URLs as tasks in a `JoinSet`, all of which are joined
//!
//! Every failure is contained at the node that produced it: it's reported
//! to the error sink and the node simply yields no record.

use crate::config::Config;
use crate::crawler::context::{CrawlContext, PageRecord};
use crate::crawler::fetcher::{build_http_client, Fetcher};
use crate::crawler::parser::parse_html;
use crate::crawler::rank::calculate_rank;
use crate::crawler::scheduler::Scheduler;
use crate::output::{ErrorEntry, ErrorKind, ErrorSink};
use crate::url::{extract_hostname, normalize_url, parse_absolute};
use crate::CrawlError;
use reqwest::Client;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;

/// A boxed crawl of one node and everything below it
pub type CrawlFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Main crawler coordinator structure
///
/// Cloning is cheap and every clone drives the same run: the context,
/// fetcher and error sink are shared.
#[derive(Clone)]
pub struct Coordinator {
    context: Arc<CrawlContext>,
    fetcher: Arc<Fetcher>,
    errors: Arc<dyn ErrorSink>,
    max_depth: u32,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `errors` - Where every failure of the run is reported
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(CrawlError)` - The HTTP client could not be built
    pub fn new(config: &Config, errors: Arc<dyn ErrorSink>) -> Result<Self, CrawlError> {
        let client = build_http_client(config)?;
        Ok(Self::with_client(config, client, errors))
    }

    /// Creates a coordinator around an existing HTTP client
    pub fn with_client(config: &Config, client: Client, errors: Arc<dyn ErrorSink>) -> Self {
        let context = Arc::new(CrawlContext::new());
        let scheduler = Scheduler::from_config(&config.crawler);
        let fetcher = Fetcher::new(
            client,
            scheduler,
            Arc::clone(&context),
            Arc::clone(&errors),
        );

        Self {
            context,
            fetcher: Arc::new(fetcher),
            errors,
            max_depth: config.crawler.max_depth,
        }
    }

    /// Returns the shared crawl context
    pub fn context(&self) -> &Arc<CrawlContext> {
        &self.context
    }

    /// Runs a whole crawl from the root URL
    ///
    /// The root is normalized, crawled at depth 0, and every task it spawns
    /// is joined before this returns. An invalid root, or a failure escaping
    /// the traversal, is reported to the error sink instead of returned.
    ///
    /// # Returns
    ///
    /// The records of every crawled page, in completion order
    pub async fn run(&self, root_url: &str) -> Vec<PageRecord> {
        let root = match normalize_url(root_url) {
            Ok(root) => root,
            Err(e) => {
                self.report(
                    ErrorKind::CrawlError,
                    format!("Invalid root URL {}", root_url),
                    &CrawlError::from(e),
                );
                return Vec::new();
            }
        };

        tracing::info!(
            "Starting crawl at {} with max depth {}",
            root,
            self.max_depth
        );
        let start_time = Instant::now();

        if let Err(e) = tokio::spawn(self.crawl(root, 0)).await {
            self.report(
                ErrorKind::CrawlError,
                "An error occurred during crawling".to_string(),
                &CrawlError::Task(e),
            );
        }

        tracing::info!(
            "Crawl completed: {} pages recorded, {} URLs visited in {:?}",
            self.context.record_count(),
            self.context.visited_count(),
            start_time.elapsed()
        );

        self.context.records()
    }

    /// Crawls one URL and, recursively, the pages it links to
    ///
    /// # Node Flow
    ///
    /// 1. Stop if `depth` exceeds the maximum or the URL is already visited
    /// 2. Claim the URL in the visited set (before any I/O)
    /// 3. Fetch; no HTML means no record and no recursion
    /// 4. Extract links; a parse failure is logged and counts as no links
    /// 5. Rank against the URL's hostname
    /// 6. Append the record
    /// 7. Claim every unvisited link, spawn one child crawl per claimed link
    ///    at `depth + 1`, and join them all
    ///
    /// Any error escaping steps 3–7 is logged and the node yields nothing.
    pub fn crawl(&self, url: String, depth: u32) -> CrawlFuture {
        let this = self.clone();
        Box::pin(async move {
            if depth > this.max_depth {
                tracing::trace!("Depth {} exceeds max for {}", depth, url);
                return;
            }

            if !this.context.mark_visited(&url) {
                tracing::trace!("Already visited {}", url);
                return;
            }

            this.explore(url, depth).await;
        })
    }

    /// Crawls a URL this node has already claimed
    fn explore(&self, url: String, depth: u32) -> CrawlFuture {
        let this = self.clone();
        Box::pin(async move {
            if let Err(e) = this.visit(&url, depth).await {
                this.report(ErrorKind::CrawlError, format!("Error crawling {}", url), &e);
            }
        })
    }

    /// Processes a claimed URL (steps 3–7)
    async fn visit(&self, url: &str, depth: u32) -> Result<(), CrawlError> {
        let Some(html) = self.fetcher.fetch(url).await else {
            return Ok(());
        };

        let links = match parse_html(&html, url) {
            Ok(parsed) => {
                tracing::debug!(
                    "Parsed {} ({}): {} links",
                    url,
                    parsed.title.as_deref().unwrap_or("untitled"),
                    parsed.links.len()
                );
                parsed.links
            }
            Err(e) => {
                self.report(
                    ErrorKind::ExtractError,
                    format!("Error extracting links from {}", url),
                    &e,
                );
                Vec::new()
            }
        };

        let page_url = parse_absolute(url)?;
        let rank = match extract_hostname(&page_url) {
            Some(hostname) => calculate_rank(&links, &hostname),
            None => 0.0,
        };

        self.context.push_record(PageRecord {
            url: url.to_string(),
            depth,
            rank,
        });
        tracing::debug!("Recorded {} at depth {} with rank {:.3}", url, depth, rank);

        self.fan_out(url, links, depth + 1).await;
        Ok(())
    }

    /// Crawls every child link concurrently and waits for all of them
    ///
    /// All children are claimed in link order before the first one is
    /// spawned, so a sibling is never recorded through a deeper path. The
    /// number of fetches actually running is bounded by the scheduler, not
    /// here. A child task that dies is logged against the child's URL.
    async fn fan_out(&self, parent: &str, links: Vec<String>, depth: u32) {
        if links.is_empty() {
            return;
        }

        if depth > self.max_depth {
            tracing::trace!(
                "Not following {} links from {}: depth limit reached",
                links.len(),
                parent
            );
            return;
        }

        let claimed: Vec<String> = links
            .into_iter()
            .filter(|link| self.context.mark_visited(link))
            .collect();

        let mut children = JoinSet::new();
        let mut pending = HashMap::with_capacity(claimed.len());
        for link in claimed {
            let handle = children.spawn(self.explore(link.clone(), depth));
            pending.insert(handle.id(), link);
        }

        tracing::trace!("Spawned {} child crawls from {}", pending.len(), parent);

        while let Some(joined) = children.join_next_with_id().await {
            match joined {
                Ok((id, ())) => {
                    pending.remove(&id);
                }
                Err(e) => {
                    let link = pending.remove(&e.id()).unwrap_or_default();
                    self.report(
                        ErrorKind::CrawlError,
                        format!("Error crawling {}", link),
                        &CrawlError::Task(e),
                    );
                }
            }
        }
    }

    fn report(&self, kind: ErrorKind, message: String, error: &CrawlError) {
        self.errors
            .record_error(&ErrorEntry::new(kind, message, error));
    }
}

/// Runs a whole crawl with a freshly built coordinator
///
/// # Example
///
/// ```no_run
/// use rank_crawler::config::Config;
/// use rank_crawler::crawler::run_crawl;
/// use rank_crawler::output::ErrorLog;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut config = Config::default();
/// config.crawler.max_depth = 1;
/// let records = run_crawl(&config, "https://example.com/", Arc::new(ErrorLog::new("error_log.txt"))).await?;
/// println!("{} pages", records.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: &Config,
    root_url: &str,
    errors: Arc<dyn ErrorSink>,
) -> Result<Vec<PageRecord>, CrawlError> {
    let coordinator = Coordinator::new(config, errors)?;
    Ok(coordinator.run(root_url).await)
}
