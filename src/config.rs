use crate::error::CrawlError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Configuration for a crawl run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Referer sent with every request
    #[serde(default = "default_referer")]
    pub referer: String,

    /// Accept header for page requests
    #[serde(default = "default_accept")]
    pub accept: String,

    /// Accept-Language header
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// Origin of the site, used to build canonical links
    #[serde(default = "default_site_origin")]
    pub site_origin: String,

    /// Structured search endpoint
    #[serde(default = "default_search_api_url")]
    pub search_api_url: String,

    /// Cookie forwarded when the request carries none
    #[serde(default)]
    pub default_credential: Option<String>,

    /// TCP connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Read timeout in seconds
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,

    /// Pause between successive detail fetches, in milliseconds
    #[serde(default = "default_detail_delay_ms")]
    pub detail_delay_ms: u64,

    /// Selector chains for rendered list pages
    #[serde(default)]
    pub list_selectors: ListSelectors,

    /// Selector chains for detail pages
    #[serde(default)]
    pub detail_selectors: DetailSelectors,
}

/// Selector chains used on rendered list pages.
///
/// Every chain is tried in order. New markup generations are added by
/// prepending to the relevant chain; older entries stay as fallbacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListSelectors {
    /// Item container selectors, newest markup first
    pub containers: Vec<String>,
    pub title: Vec<String>,
    pub preview: Vec<String>,
    /// Anchors whose `href` is the item link
    pub link: Vec<String>,
    pub author: Vec<String>,
    pub time: Vec<String>,
    pub images: Vec<String>,
    /// Attributes holding an image URL, in priority order
    pub image_attrs: Vec<String>,
}

impl Default for ListSelectors {
    fn default() -> Self {
        Self {
            containers: strings(&[
                "div.tw-bg-white.tw-mt-3.tw-rounded-xl div.tw-px-5.tw-relative.tw-pb-5.tw-pt-5",
                "div.tw-px-5.tw-relative.tw-pb-5.tw-cursor-pointer",
                "div.feed-item, div.feed-main, div.feed-card",
            ]),
            title: strings(&["a.dy", ".tw-text-lg.tw-font-bold"]),
            preview: strings(&[".feed-text", ".tw-text-gray-800"]),
            link: strings(&[
                "a.dy[href*='/feed/main/detail/']",
                "a[href*='/feed/main/detail/']",
                "a[href*='/discuss/']",
            ]),
            author: strings(&[".user-nickname"]),
            time: strings(&[".show-time"]),
            images: strings(&[".feed-img img, .el-image__inner"]),
            image_attrs: strings(&["src", "data-src"]),
        }
    }
}

/// Selector chains used on detail pages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailSelectors {
    pub title: Vec<String>,
    /// `meta` elements whose `content` attribute is a title fallback
    pub title_meta: Vec<String>,
    /// Main body container; its text is used even when short
    pub content_primary: Vec<String>,
    /// Generic body containers tried when the primary one is missing
    pub content_secondary: Vec<String>,
    pub images: Vec<String>,
    /// Embedded JSON keys holding a title
    pub json_title_keys: Vec<String>,
    /// Embedded JSON keys holding body text
    pub json_content_keys: Vec<String>,
}

impl Default for DetailSelectors {
    fn default() -> Self {
        Self {
            title: strings(&[
                "h1.tw-text-size-title-lg-pure",
                "section h1.tw-font-medium",
                "h1.feed-title, h1.post-title, h1.title",
            ]),
            title_meta: strings(&["meta[property='og:title']"]),
            content_primary: strings(&["section .feed-content-text", "div.feed-content-text"]),
            content_secondary: strings(&["div.rich-text, article, div.post-content"]),
            images: strings(&["section .feed-img img, img.el-image__inner, .feed-img img"]),
            json_title_keys: strings(&["title", "seoTitle"]),
            json_content_keys: strings(&[
                "content",
                "fullContent",
                "text",
                "richText",
                "description",
            ]),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36"
        .to_string()
}

fn default_referer() -> String {
    "https://www.nowcoder.com/".to_string()
}

fn default_accept() -> String {
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8"
        .to_string()
}

fn default_accept_language() -> String {
    "zh-CN,zh;q=0.9,en;q=0.8".to_string()
}

fn default_site_origin() -> String {
    "https://www.nowcoder.com".to_string()
}

fn default_search_api_url() -> String {
    "https://gw-c.nowcoder.com/api/sparta/pc/search".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_read_timeout_secs() -> u64 {
    10
}

fn default_detail_delay_ms() -> u64 {
    300
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            referer: default_referer(),
            accept: default_accept(),
            accept_language: default_accept_language(),
            site_origin: default_site_origin(),
            search_api_url: default_search_api_url(),
            default_credential: None,
            connect_timeout_secs: default_connect_timeout_secs(),
            read_timeout_secs: default_read_timeout_secs(),
            detail_delay_ms: default_detail_delay_ms(),
            list_selectors: ListSelectors::default(),
            detail_selectors: DetailSelectors::default(),
        }
    }
}

impl CrawlerConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CrawlError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, CrawlError> {
        serde_json::from_str(json).map_err(|e| CrawlError::Config(e.to_string()))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    pub fn detail_delay(&self) -> Duration {
        Duration::from_millis(self.detail_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = CrawlerConfig::from_json("{}").unwrap();
        assert_eq!(config.site_origin, "https://www.nowcoder.com");
        assert_eq!(config.detail_delay_ms, 300);
        assert_eq!(config.list_selectors.containers.len(), 3);
        assert!(config.default_credential.is_none());
    }

    #[test]
    fn test_partial_selector_override() {
        let config = CrawlerConfig::from_json(
            r#"{"list_selectors": {"containers": ["li.post"]}, "detail_delay_ms": 0}"#,
        )
        .unwrap();
        assert_eq!(config.list_selectors.containers, vec!["li.post".to_string()]);
        // Untouched chains keep their defaults
        assert_eq!(config.list_selectors.title[0], "a.dy");
        assert_eq!(config.detail_delay(), Duration::ZERO);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = CrawlerConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, CrawlError::Config(_)));
    }
}
