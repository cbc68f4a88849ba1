use url::Url;

/// Extracts the hostname from a parsed URL
///
/// The hostname is the host portion without the port, lowercased. URLs
/// without a host (which can't happen for valid HTTP(S) URLs) yield None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use rank_crawler::url::extract_hostname;
///
/// let url = Url::parse("https://Example.COM:8080/path").unwrap();
/// assert_eq!(extract_hostname(&url), Some("example.com".to_string()));
/// ```
pub fn extract_hostname(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Parses a URL string and extracts its hostname
///
/// Returns None when the string is not a valid absolute URL or has no host.
pub fn parse_hostname(url_str: &str) -> Option<String> {
    Url::parse(url_str)
        .ok()
        .and_then(|url| extract_hostname(&url))
}
