use crate::UrlError;
use url::Url;

/// Parses an absolute HTTP(S) URL
///
/// # Arguments
///
/// * `url_str` - The URL string to parse
///
/// # Returns
///
/// * `Ok(Url)` - The parsed URL
/// * `Err(UrlError)` - The string is malformed, relative, not HTTP(S), or hostless
pub fn parse_absolute(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if !is_http_scheme(&url) {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}

/// Normalizes a URL string into the form used as a crawl key
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed or not HTTP(S)
/// 2. Serialize through the WHATWG URL serializer, which lowercases the
///    host, drops default ports, resolves dot segments and turns an empty
///    path into `/`
/// 3. Remove the fragment
///
/// No other rewriting happens, so two URLs for the same resource that differ
/// in query order, `www.` prefix or trailing slash stay distinct.
///
/// # Examples
///
/// ```
/// use rank_crawler::url::normalize_url;
///
/// let url = normalize_url("HTTP://Example.COM:80/a/../b#top").unwrap();
/// assert_eq!(url, "http://example.com/b");
/// ```
pub fn normalize_url(url_str: &str) -> Result<String, UrlError> {
    let mut url = parse_absolute(url_str)?;
    url.set_fragment(None);
    Ok(url.into())
}

/// Resolves an anchor href against the page it appeared on
///
/// Handles relative paths, protocol-relative references and dot segments
/// per standard URL resolution, then strips the fragment.
///
/// Returns None if the link should be excluded:
/// - Empty (or whitespace-only) hrefs
/// - References that fail to resolve
/// - Anything that isn't HTTP(S) after resolution (`mailto:`, `javascript:`, ...)
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    let mut resolved = base_url.join(href).ok()?;
    if !is_http_scheme(&resolved) {
        return None;
    }

    resolved.set_fragment(None);
    Some(resolved)
}

/// Returns true if the URL uses the `http` or `https` scheme
pub fn is_http_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}
