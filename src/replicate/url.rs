//! Identifier extraction from URL-like strings.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::drive::ResourceRef;

/// Drive item ids are runs of at least 25 characters drawn from
/// `[A-Za-z0-9_-]`.
#[allow(clippy::expect_used)] // literal pattern, compiles or the crate is broken
static ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("[A-Za-z0-9_-]{25,}").expect("valid id pattern"));

/// Pull the item id out of a URL-like string.
///
/// Returns the longest qualifying run (the first one on length ties), or
/// `None` when the string contains no parsable identifier. No provider
/// validation happens here.
#[must_use]
pub fn extract_drive_id(url: &str) -> Option<ResourceRef> {
    let mut best: Option<&str> = None;
    for candidate in ID_PATTERN.find_iter(url) {
        let token = candidate.as_str();
        if best.is_none_or(|current| token.len() > current.len()) {
            best = Some(token);
        }
    }
    best.map(ResourceRef::new)
}
