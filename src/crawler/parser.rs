//! HTML parser for extracting links and metadata
//!
//! Pages are parsed with html5ever (through `scraper`), which builds a DOM
//! without running scripts or loading any external resource, so parsing is
//! free of side effects regardless of what the page embeds.

use crate::url::resolve_link;
use crate::CrawlError;
use scraper::{Html, Selector};
use url::Url;

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// Absolute URLs of every followable anchor, in document order
    pub links: Vec<String>,
}

/// Parses HTML content and extracts links and metadata
///
/// # Link Extraction Rules
///
/// - The `href` of every `<a>` element is collected, in document order,
///   duplicates preserved
/// - Empty hrefs are dropped
/// - Each href is resolved against `base_url` and its fragment stripped
/// - Only `http`/`https` results are kept (`mailto:`, `javascript:`,
///   `tel:`, `data:` and friends fall out naturally)
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - The page URL relative links are resolved against
///
/// # Returns
///
/// * `Ok(ParsedPage)` - Successfully parsed page
/// * `Err(CrawlError::HtmlParse)` - The base URL is unusable
///
/// # Example
///
/// ```
/// use rank_crawler::crawler::parse_html;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let parsed = parse_html(html, "https://example.com/").unwrap();
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.links, vec!["https://example.com/page".to_string()]);
/// ```
pub fn parse_html(html: &str, base_url: &str) -> Result<ParsedPage, CrawlError> {
    let base = Url::parse(base_url).map_err(|e| CrawlError::HtmlParse {
        url: base_url.to_string(),
        message: format!("invalid base URL: {}", e),
    })?;

    let document = Html::parse_document(html);

    let title = extract_title(&document);
    let links = collect_links(&document, &base)?;

    Ok(ParsedPage { title, links })
}

/// Extracts the resolved anchor targets of a page
///
/// Convenience wrapper around [`parse_html`] for callers that only need the
/// links.
pub fn extract_links(html: &str, base_url: &str) -> Result<Vec<String>, CrawlError> {
    parse_html(html, base_url).map(|parsed| parsed.links)
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Collects every resolvable anchor href from the document
fn collect_links(document: &Html, base_url: &Url) -> Result<Vec<String>, CrawlError> {
    let selector = Selector::parse("a[href]").map_err(|e| CrawlError::HtmlParse {
        url: base_url.to_string(),
        message: format!("invalid anchor selector: {:?}", e),
    })?;

    let links = document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .map(String::from)
        .collect();

    Ok(links)
}
