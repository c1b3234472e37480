//! URL resolution utilities.
//!
//! Used to rewrite relative links once a document's own URL is known.

use url::Url;

/// Resolve a potentially relative URL against a base URL.
///
/// # Algorithm
///
/// STEP 1: If `href` is already absolute, return it unchanged.
///
/// STEP 2: Otherwise join it onto `base_url` following the URL Standard.
///
/// Without a usable base the href is returned as-is.
#[must_use]
pub fn resolve_url(href: &str, base_url: Option<&str>) -> String {
    // STEP 1: Absolute URLs carry their own scheme.
    if is_absolute(href) {
        return href.to_string();
    }

    // STEP 2: Join against the base.
    let Some(base) = base_url.and_then(|b| Url::parse(&with_scheme(b)).ok()) else {
        return href.to_string();
    };

    base.join(href)
        .map_or_else(|_| href.to_string(), String::from)
}

/// Returns true if `href` parses as a URL with its own scheme.
#[must_use]
pub fn is_absolute(href: &str) -> bool {
    Url::parse(href).is_ok()
}

/// Prepend `http://` to URLs that are missing a scheme.
///
/// `example.com/search` becomes `http://example.com/search`; anything that
/// already names a scheme is left alone.
#[must_use]
pub fn with_scheme(url: &str) -> String {
    if url.contains("://") || is_absolute(url) {
        url.to_string()
    } else {
        format!("http://{url}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_url_unchanged() {
        assert_eq!(
            resolve_url("https://example.com/a", Some("http://other.org/")),
            "https://example.com/a"
        );
    }

    #[test]
    fn test_root_relative_path() {
        assert_eq!(
            resolve_url("/search?q=1", Some("http://example.com/news/today")),
            "http://example.com/search?q=1"
        );
    }

    #[test]
    fn test_relative_path_uses_base_directory() {
        assert_eq!(
            resolve_url("page2.html", Some("http://example.com/docs/page1.html")),
            "http://example.com/docs/page2.html"
        );
    }

    #[test]
    fn test_protocol_relative() {
        assert_eq!(
            resolve_url("//cdn.example.com/x.js", Some("https://example.com/")),
            "https://cdn.example.com/x.js"
        );
    }

    #[test]
    fn test_no_base_returns_href() {
        assert_eq!(resolve_url("/about", None), "/about");
    }

    #[test]
    fn test_base_without_scheme() {
        assert_eq!(
            resolve_url("/about", Some("example.com")),
            "http://example.com/about"
        );
    }

    #[test]
    fn test_with_scheme() {
        assert_eq!(with_scheme("example.com"), "http://example.com");
        assert_eq!(with_scheme("https://example.com"), "https://example.com");
        assert_eq!(with_scheme("mailto:someone@example.com"), "mailto:someone@example.com");
    }
}
