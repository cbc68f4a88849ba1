//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent and timeout
//! - GET requests to fetch page content
//! - Content-Type gating (only HTML is accepted)
//! - Error classification (timeout vs. other fetch errors)
//! - The per-run HTML cache

use crate::config::Config;
use crate::crawler::context::CrawlContext;
use crate::crawler::scheduler::Scheduler;
use crate::output::{ErrorEntry, ErrorKind, ErrorSink};
use crate::CrawlError;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched an HTML page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value
        content_type: String,
        /// Page body content
        body: String,
    },

    /// Page is not HTML (Content-Type missing or mismatched)
    ContentMismatch {
        /// The Content-Type received, if any
        content_type: Option<String>,
    },

    /// Server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// The request or body read hit the hard timeout
    Timeout {
        /// The underlying client error
        source: reqwest::Error,
    },

    /// Any other network error (connection refused, DNS, TLS, body decoding)
    NetworkError {
        /// The underlying client error
        source: reqwest::Error,
    },
}

/// Builds an HTTP client with proper configuration
///
/// The configured request timeout covers connecting, sending and reading the
/// whole body.
///
/// # Example
///
/// ```no_run
/// use rank_crawler::config::Config;
/// use rank_crawler::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(Duration::from_millis(config.crawler.request_timeout))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and classifies the outcome
///
/// # Request Flow
///
/// 1. Send GET request (redirects are followed by the client)
/// 2. Non-success status → HttpError
/// 3. Content-Type missing or not `text/html` → ContentMismatch
/// 4. Read the body → Success
///
/// Timeouts anywhere in the flow become Timeout; every other client error
/// becomes NetworkError. Nothing is retried.
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(e),
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let content_type = match content_type {
        Some(ct) if ct.contains("text/html") => ct,
        other => return FetchResult::ContentMismatch { content_type: other },
    };

    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            content_type,
            body,
        },
        Err(e) => classify_error(e),
    }
}

fn classify_error(error: reqwest::Error) -> FetchResult {
    if error.is_timeout() {
        FetchResult::Timeout { source: error }
    } else {
        FetchResult::NetworkError { source: error }
    }
}

/// Cache-aware, rate-limited page fetcher
///
/// Callers only ever see "HTML" or "nothing": every failure is reported to
/// the error sink here and never propagates further.
pub struct Fetcher {
    client: Client,
    scheduler: Scheduler,
    context: Arc<CrawlContext>,
    errors: Arc<dyn ErrorSink>,
}

impl Fetcher {
    /// Creates a fetcher
    ///
    /// # Arguments
    ///
    /// * `client` - The HTTP client to use
    /// * `scheduler` - Gate applied to every uncached request
    /// * `context` - The crawl context holding the page cache
    /// * `errors` - Where fetch failures are reported
    pub fn new(
        client: Client,
        scheduler: Scheduler,
        context: Arc<CrawlContext>,
        errors: Arc<dyn ErrorSink>,
    ) -> Self {
        Self {
            client,
            scheduler,
            context,
            errors,
        }
    }

    /// Fetches the HTML of a page
    ///
    /// A cached page is returned without delay or network I/O. Otherwise the
    /// scheduler is passed (slot + delay) and one GET is issued. Only HTML
    /// bodies are cached; non-HTML responses are skipped silently and are not
    /// cached.
    ///
    /// # Returns
    ///
    /// * `Some(String)` - The page HTML
    /// * `None` - Timeout, network error, non-success status or non-HTML content
    pub async fn fetch(&self, url: &str) -> Option<String> {
        if let Some(html) = self.context.cached_page(url) {
            tracing::trace!("Cache hit for {}", url);
            return Some(html);
        }

        let _slot = self.scheduler.acquire().await;

        tracing::debug!("Fetching {}", url);
        match fetch_url(&self.client, url).await {
            FetchResult::Success {
                final_url,
                status_code,
                body,
                ..
            } => {
                tracing::debug!(
                    "Fetched {} ({} bytes, status {}, final URL {})",
                    url,
                    body.len(),
                    status_code,
                    final_url
                );
                self.context.cache_page(url, &body);
                Some(body)
            }

            FetchResult::ContentMismatch { content_type } => {
                tracing::debug!(
                    "Skipping {}: not HTML (content-type: {})",
                    url,
                    content_type.as_deref().unwrap_or("none")
                );
                None
            }

            FetchResult::HttpError { status_code } => {
                let error = CrawlError::HttpStatus {
                    url: url.to_string(),
                    status: status_code,
                };
                self.report(ErrorKind::FetchError, format!("Error fetching {}", url), &error);
                None
            }

            FetchResult::Timeout { source } => {
                let error = CrawlError::Timeout {
                    url: url.to_string(),
                    source,
                };
                self.report(ErrorKind::Timeout, format!("Timeout fetching {}", url), &error);
                None
            }

            FetchResult::NetworkError { source } => {
                let error = CrawlError::Http {
                    url: url.to_string(),
                    source,
                };
                self.report(ErrorKind::FetchError, format!("Error fetching {}", url), &error);
                None
            }
        }
    }

    fn report(&self, kind: ErrorKind, message: String, error: &CrawlError) {
        self.errors.record_error(&ErrorEntry::new(kind, message, error));
    }
}
