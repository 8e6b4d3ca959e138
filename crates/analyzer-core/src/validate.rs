//! Syntactic URL validation for QR payloads.
//!
//! Network-free gate applied between QR extraction and scoring: a payload
//! that is not URL-shaped is rejected before it can reach feature
//! extraction.

use std::sync::LazyLock;

use regex::Regex;

// Optional http(s) scheme, then a dotted hostname, `localhost`, or a
// dotted-quad IPv4 literal, then an optional port and path/query tail.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:https?://)?",
        r"(?:(?:[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}",
        r"|localhost",
        r"|(?:\d{1,3}\.){3}\d{1,3})",
        r"(?::\d{1,5})?",
        r"(?:[/?]\S*)?$",
    ))
    .expect("URL pattern compiles")
});

/// Check whether a string is URL-shaped. Syntactic only, no resolution.
pub fn is_valid_url(candidate: &str) -> bool {
    URL_PATTERN.is_match(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_urls() {
        assert!(is_valid_url("https://www.google.com/search?q=x"));
        assert!(is_valid_url("http://example.com"));
        assert!(is_valid_url("example.com/path"));
        assert!(is_valid_url("http://sub.domain.example.co.kr"));
    }

    #[test]
    fn accepts_localhost_and_ipv4_with_port() {
        assert!(is_valid_url("192.168.1.1:8080/path"));
        assert!(is_valid_url("localhost"));
        assert!(is_valid_url("http://localhost:3000"));
    }

    #[test]
    fn accepts_query_without_path() {
        assert!(is_valid_url("http://example.com?x=1"));
    }

    #[test]
    fn rejects_non_urls() {
        assert!(!is_valid_url("not a url at all"));
        assert!(!is_valid_url(""));
        assert!(!is_valid_url("javascript:alert(1)"));
        assert!(!is_valid_url("mailto:user@example.com"));
        assert!(!is_valid_url("ftp://example.com/file"));
    }

    #[test]
    fn rejects_bare_single_label() {
        assert!(!is_valid_url("example"));
        assert!(!is_valid_url("http://example"));
    }
}
