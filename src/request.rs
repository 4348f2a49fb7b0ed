use std::time::Duration;

use crate::error::CrawlError;
use crate::parsers::PageKind;
use crate::utils::is_http_url;

/// Largest number of items taken from one rendered list page
pub const MAX_ITEM_LIMIT: i64 = 30;
/// Largest page size requested from the search endpoint
pub const MAX_API_PAGE_SIZE: i64 = 50;

const DEFAULT_LIMIT: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// A list page, search page or keyword search
    List,
    /// A single post
    Detail,
}

/// Raw request parameters as they arrive from a query string or the CLI
#[derive(Debug, Clone, Default)]
pub struct RequestParams {
    pub url: Option<String>,
    pub keyword: Option<String>,
    pub mode: Option<String>,
    pub detail: Option<String>,
    pub page: Option<String>,
    pub pages: Option<String>,
    pub limit: Option<String>,
    pub cookie: Option<String>,
    pub debug: Option<String>,
    pub delay_ms: Option<String>,
}

impl RequestParams {
    /// Reads parameters from a URL query string (with or without the `?`).
    ///
    /// `query` wins over `q` for the keyword; repeated keys keep the first value.
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        let mut q_alias = None;
        for (key, value) in url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        {
            let slot = match &*key {
                "url" => &mut params.url,
                "query" => &mut params.keyword,
                "q" => &mut q_alias,
                "type" => &mut params.mode,
                "detail" => &mut params.detail,
                "page" => &mut params.page,
                "pages" => &mut params.pages,
                "limit" => &mut params.limit,
                "cookie" => &mut params.cookie,
                "debug" => &mut params.debug,
                "delay" => &mut params.delay_ms,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        if params.keyword.as_deref().is_none_or(|k| k.trim().is_empty()) {
            params.keyword = q_alias;
        }
        params
    }

    /// Validates the parameters. Fails before any network activity when
    /// neither target nor keyword is present or the URL is not http(s).
    ///
    /// `credential_header` is a credential supplied out of band (a request
    /// header in a web front end); it wins over the `cookie` parameter.
    pub fn into_request(self, credential_header: Option<&str>) -> Result<CrawlRequest, CrawlError> {
        let url = non_blank(self.url);
        let keyword = non_blank(self.keyword);

        if url.is_none() && keyword.is_none() {
            return Err(CrawlError::MissingTarget);
        }
        if let Some(url) = &url {
            if !is_http_url(url) {
                return Err(CrawlError::InvalidUrl(url.clone()));
            }
        }

        let mode = match self.mode.as_deref().map(str::trim) {
            Some("list") => Mode::List,
            Some("detail") => Mode::Detail,
            _ if keyword.is_some() => Mode::List,
            _ if url
                .as_deref()
                .is_some_and(|u| PageKind::from_target(u).is_listing()) =>
            {
                Mode::List
            }
            _ => Mode::Detail,
        };

        let credential = non_blank(credential_header.map(str::to_string)).or(non_blank(self.cookie));

        Ok(CrawlRequest {
            url,
            keyword,
            mode,
            start_page: parse_or(self.page.as_deref(), 1_i64).clamp(1, u32::MAX as i64) as u32,
            page_count: parse_or(self.pages.as_deref(), 1_i64).clamp(1, u32::MAX as i64) as u32,
            limit: parse_or(self.limit.as_deref(), DEFAULT_LIMIT),
            enrich_detail: self.detail.as_deref().map(str::trim) != Some("0"),
            credential,
            debug: self.debug.as_deref().map(str::trim) == Some("1"),
            delay: self
                .delay_ms
                .as_deref()
                .and_then(|d| d.trim().parse::<u64>().ok())
                .map(Duration::from_millis),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|r| r.trim().parse::<i64>().ok())
        .unwrap_or(default)
}

/// A validated crawl request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    pub url: Option<String>,
    pub keyword: Option<String>,
    pub mode: Mode,
    /// First page to fetch, at least 1
    pub start_page: u32,
    /// Number of pages to walk, at least 1
    pub page_count: u32,
    /// Limit as supplied; use [`item_limit`](Self::item_limit) or
    /// [`api_page_size`](Self::api_page_size)
    pub limit: i64,
    pub enrich_detail: bool,
    pub credential: Option<String>,
    pub debug: bool,
    /// Pause between detail fetches; the configured default when `None`
    pub delay: Option<Duration>,
}

impl CrawlRequest {
    /// Items taken per rendered page, within `[1, 30]`
    pub fn item_limit(&self) -> usize {
        self.limit.clamp(1, MAX_ITEM_LIMIT) as usize
    }

    /// Page size asked of the search endpoint, within `[1, 50]`
    pub fn api_page_size(&self) -> u32 {
        self.limit.clamp(1, MAX_API_PAGE_SIZE) as u32
    }
}
