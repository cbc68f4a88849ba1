//! URL handling module
//!
//! Every component that touches URLs goes through these helpers: parsing
//! and validating absolute HTTP(S) URLs, resolving hrefs against a base,
//! and extracting hostnames for rank calculation.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{extract_hostname, parse_hostname};
pub use normalize::{is_http_scheme, normalize_url, parse_absolute, resolve_link};
