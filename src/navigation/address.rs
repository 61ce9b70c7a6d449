//! Address-bar input normalization.

use url::form_urlencoded;
use url::Url;

use crate::types::settings::SearchEngine;

/// Turns address-bar input into a navigable URL.
///
/// Returns `None` for blank input. Explicit `http(s)://` URLs pass through,
/// dotted input without whitespace gets `https://`, anything else becomes a
/// search on `engine`.
pub fn normalize_input(input: &str, engine: SearchEngine) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return Some(trimmed.to_string());
    }
    if trimmed.contains('.') && !trimmed.contains(char::is_whitespace) {
        let candidate = format!("https://{}", trimmed);
        if Url::parse(&candidate).is_ok() {
            return Some(candidate);
        }
    }
    Some(search_url(trimmed, engine))
}

/// Search URL for `query` on `engine`.
pub fn search_url(query: &str, engine: SearchEngine) -> String {
    let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
    format!("{}{}", engine.query_base(), encoded)
}
