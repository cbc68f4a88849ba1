use serde::Deserialize;

/// Default number of concurrently running fetches
pub const DEFAULT_MAX_CONCURRENCY: u32 = 5;

/// Default delay before every uncached request (milliseconds)
pub const DEFAULT_RATE_LIMIT_DELAY_MS: u64 = 1000;

/// Default hard timeout per request (milliseconds)
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Default error log file name
pub const DEFAULT_ERROR_LOG: &str = "error_log.txt";

/// Main configuration structure
///
/// Every section and key is optional; a missing file or an empty one yields
/// the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum link depth from the root URL (the root is depth 0)
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Maximum number of fetches running at the same time
    #[serde(rename = "max-concurrency")]
    pub max_concurrency: u32,

    /// Delay before each uncached request (milliseconds)
    #[serde(rename = "rate-limit-delay")]
    pub rate_limit_delay: u64,

    /// Hard timeout for a single request, including the body (milliseconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 0,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            rate_limit_delay: DEFAULT_RATE_LIMIT_DELAY_MS,
            request_timeout: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value
    ///
    /// Format: `CrawlerName/Version` or `CrawlerName/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the `output.<format>` file is written to
    pub directory: String,

    /// Path of the append-only error log
    #[serde(rename = "error-log")]
    pub error_log: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
            error_log: DEFAULT_ERROR_LOG.to_string(),
        }
    }
}
