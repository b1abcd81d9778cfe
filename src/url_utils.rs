//! URL helpers for the metadata resolver.

use url::Url;

/// Parse an absolute `http(s)` URL with a host.
#[must_use]
pub fn parse_absolute(url_str: &str) -> Option<Url> {
    let url = Url::parse(url_str.trim()).ok()?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none_or(str::is_empty) {
        return None;
    }
    Some(url)
}

/// Validate a URL, resolving relative references against `base`.
///
/// Returns the normalized URL: fragment dropped, trailing slash removed from
/// non-root paths.
#[must_use]
pub fn validate_url(url_str: &str, base: Option<&Url>) -> Option<String> {
    let url_str = url_str.trim();
    if url_str.is_empty() {
        return None;
    }
    let url = match parse_absolute(url_str) {
        Some(url) => url,
        None => parse_absolute(base?.join(url_str).ok()?.as_str())?,
    };
    Some(normalize_url(url))
}

fn normalize_url(mut url: Url) -> String {
    url.set_fragment(None);
    let path = url.path().to_string();
    if path.len() > 1 && path.ends_with('/') {
        url.set_path(&path[..path.len() - 1]);
    }
    url.to_string()
}

/// Hostname of a URL without a leading `www.` (or `www2.` and the like).
#[must_use]
pub fn extract_hostname(url_str: &str) -> Option<String> {
    let url = parse_absolute(url_str)?;
    let host = url.host_str()?.to_lowercase();
    let stripped: &str = match host.strip_prefix("www") {
        Some(rest) => {
            let rest = rest.trim_start_matches(|c: char| c.is_ascii_digit());
            rest.strip_prefix('.').unwrap_or(host.as_str())
        }
        None => &host,
    };
    Some(stripped.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_absolute() {
        assert!(parse_absolute("https://example.org/a").is_some());
        assert!(parse_absolute("ftp://example.org/a").is_none());
        assert!(parse_absolute("/relative/path").is_none());
        assert!(parse_absolute("not a url").is_none());
    }

    #[test]
    fn test_validate_url() {
        assert_eq!(
            validate_url("https://example.org/post/#comments", None).as_deref(),
            Some("https://example.org/post")
        );
        let base = Url::parse("https://example.org/blog/").unwrap();
        assert_eq!(
            validate_url("/2021/post.html", Some(&base)).as_deref(),
            Some("https://example.org/2021/post.html")
        );
        assert!(validate_url("/2021/post.html", None).is_none());
        assert!(validate_url("  ", None).is_none());
    }

    #[test]
    fn test_extract_hostname() {
        assert_eq!(extract_hostname("https://www.example.org/x").as_deref(), Some("example.org"));
        assert_eq!(extract_hostname("https://www2.example.org/x").as_deref(), Some("example.org"));
        assert_eq!(extract_hostname("https://blog.example.org").as_deref(), Some("blog.example.org"));
        assert_eq!(extract_hostname("https://wwwexample.org").as_deref(), Some("wwwexample.org"));
        assert!(extract_hostname("/relative").is_none());
    }
}
