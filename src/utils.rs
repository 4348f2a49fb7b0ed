use chrono::{DateTime, FixedOffset};
use url::Url;

/// Query keys the site has used for the page number over the years
pub const PAGINATION_KEYS: [&str; 4] = ["page", "pageNum", "pn", "curPage"];

/// Sets every known pagination key to `page`, keeping other query pairs.
///
/// Existing pagination keys are rewritten in place; missing ones are
/// appended in `PAGINATION_KEYS` order. Unparsable URLs are returned as-is.
pub fn set_page_params(raw_url: &str, page: u32) -> String {
    if page == 0 {
        return raw_url.to_string();
    }
    let Ok(mut url) = Url::parse(raw_url) else {
        return raw_url.to_string();
    };

    let value = page.to_string();
    let mut pairs: Vec<(String, String)> = Vec::new();
    let mut seen = [false; PAGINATION_KEYS.len()];
    for (key, val) in url.query_pairs() {
        match PAGINATION_KEYS.iter().position(|k| *k == key) {
            Some(idx) if seen[idx] => {}
            Some(idx) => {
                seen[idx] = true;
                pairs.push((key.into_owned(), value.clone()));
            }
            None => pairs.push((key.into_owned(), val.into_owned())),
        }
    }
    for (idx, key) in PAGINATION_KEYS.iter().enumerate() {
        if !seen[idx] {
            pairs.push((key.to_string(), value.clone()));
        }
    }

    url.query_pairs_mut().clear().extend_pairs(pairs);
    url.to_string()
}

/// The `query` parameter of a search page or search endpoint URL
pub fn keyword_from_url(raw_url: &str) -> String {
    Url::parse(raw_url)
        .ok()
        .and_then(|url| {
            url.query_pairs()
                .find(|(k, _)| k == "query")
                .map(|(_, v)| v.trim().to_string())
        })
        .unwrap_or_default()
}

/// Resolves `href` against `base`; empty input or a bad base yields `None`
pub fn resolve_url(base: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    Url::parse(base)
        .and_then(|b| b.join(href))
        .map(|u| u.to_string())
        .ok()
}

/// Formats epoch milliseconds as `MM-DD HH:MM` in UTC+8.
///
/// Zero, negative and out-of-range timestamps produce an empty string.
pub fn format_timestamp(ts_ms: i64) -> String {
    if ts_ms <= 0 {
        return String::new();
    }
    let Some(offset) = FixedOffset::east_opt(8 * 3600) else {
        return String::new();
    };
    DateTime::from_timestamp_millis(ts_ms)
        .map(|dt| dt.with_timezone(&offset).format("%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

/// Whether `raw` is an absolute http or https URL
pub fn is_http_url(raw: &str) -> bool {
    Url::parse(raw)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_of(raw: &str) -> Vec<(String, String)> {
        Url::parse(raw)
            .unwrap()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_set_page_params_sets_every_key() {
        let rewritten = set_page_params("https://www.nowcoder.com/search?page=2&pn=2&other=x", 5);
        let pairs = query_of(&rewritten);
        for key in PAGINATION_KEYS {
            assert!(
                pairs.contains(&(key.to_string(), "5".to_string())),
                "{key} missing from {rewritten}"
            );
        }
        assert!(pairs.contains(&("other".to_string(), "x".to_string())));
        assert_eq!(pairs.len(), 5);
    }

    #[test]
    fn test_set_page_params_is_idempotent() {
        let once = set_page_params("https://www.nowcoder.com/search?query=java", 3);
        let twice = set_page_params(&once, 3);
        assert_eq!(once, twice);
        assert!(once.starts_with("https://www.nowcoder.com/search?query=java&page=3"));
    }

    #[test]
    fn test_keyword_from_url() {
        assert_eq!(
            keyword_from_url("https://www.nowcoder.com/search/all?query=%E9%9D%A2%E7%BB%8F&type=all"),
            "面经"
        );
        assert_eq!(keyword_from_url("https://www.nowcoder.com/"), "");
        assert_eq!(keyword_from_url("not a url"), "");
    }

    #[test]
    fn test_resolve_url() {
        assert_eq!(
            resolve_url("https://www.nowcoder.com/search?q=1", "/feed/main/detail/abc").as_deref(),
            Some("https://www.nowcoder.com/feed/main/detail/abc")
        );
        assert_eq!(
            resolve_url("https://www.nowcoder.com/a", "https://cdn.example.com/x.png").as_deref(),
            Some("https://cdn.example.com/x.png")
        );
        assert_eq!(resolve_url("https://www.nowcoder.com/", "  "), None);
    }

    #[test]
    fn test_format_timestamp() {
        // 2024-01-01T00:00:00Z is 08:00 in UTC+8
        assert_eq!(format_timestamp(1_704_067_200_000), "01-01 08:00");
        assert_eq!(format_timestamp(0), "");
        assert_eq!(format_timestamp(i64::MAX), "");
    }

    #[test]
    fn test_is_http_url() {
        assert!(is_http_url("https://www.nowcoder.com/discuss/1"));
        assert!(is_http_url("http://example.com"));
        assert!(!is_http_url("ftp://example.com"));
        assert!(!is_http_url("www.nowcoder.com"));
    }
}
