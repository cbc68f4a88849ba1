//! Domain-locality rank
//!
//! The rank of a page is the fraction of its extracted links that point at
//! the page's own hostname. It measures how inward-looking a page is, not
//! how relevant it is.

use crate::url::parse_hostname;

/// Calculates the domain-locality rank of a page
///
/// `rank = same-host links / all links`, with `0.0` for a page without
/// links. Hostnames are compared exactly (case-insensitively), so
/// subdomains count as different hosts. A link whose hostname can't be
/// parsed still counts toward the total but never as same-host.
///
/// # Examples
///
/// ```
/// use rank_crawler::crawler::calculate_rank;
///
/// let links = vec![
///     "https://example.com/a".to_string(),
///     "https://example.com/b".to_string(),
///     "https://other.com/".to_string(),
/// ];
/// let rank = calculate_rank(&links, "example.com");
/// assert!((rank - 2.0 / 3.0).abs() < f64::EPSILON);
/// ```
pub fn calculate_rank<S: AsRef<str>>(links: &[S], base_hostname: &str) -> f64 {
    if links.is_empty() {
        return 0.0;
    }

    let same_domain = links
        .iter()
        .filter_map(|link| parse_hostname(link.as_ref()))
        .filter(|host| host.eq_ignore_ascii_case(base_hostname))
        .count();

    same_domain as f64 / links.len() as f64
}
