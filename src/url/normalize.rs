/// Prefix prepended to URLs that carry no recognized scheme
pub const DEFAULT_SCHEME_PREFIX: &str = "http://";

/// Scheme prefixes accepted as-is
const RECOGNIZED_PREFIXES: &[&str] = &["http://", "https://"];

/// Returns true if the URL starts with a recognized scheme prefix
///
/// The comparison ignores ASCII case, so `HTTPS://example.com` counts.
pub fn has_recognized_scheme(url: &str) -> bool {
    RECOGNIZED_PREFIXES.iter().any(|prefix| {
        url.len() >= prefix.len()
            && url.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
    })
}

/// Normalizes the scheme of a URL before fetching
///
/// URLs without a recognized scheme get `http://` prepended. URLs that
/// already carry one are returned unchanged. Applied once, when a URL
/// enters the fetcher stage.
///
/// # Examples
///
/// ```
/// use sumi_sift::url::normalize_scheme;
///
/// assert_eq!(normalize_scheme("example.com"), "http://example.com");
/// assert_eq!(normalize_scheme("https://example.com/a"), "https://example.com/a");
/// ```
pub fn normalize_scheme(url: &str) -> String {
    if has_recognized_scheme(url) {
        url.to_string()
    } else {
        format!("{}{}", DEFAULT_SCHEME_PREFIX, url)
    }
}
