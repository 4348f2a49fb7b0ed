//! Route over the structured JSON search endpoint.

use serde::Deserialize;
use serde_json::{Value, json};

use crate::config::CrawlerConfig;
use crate::crawlers::fetcher::Fetcher;
use crate::crawlers::{ListOutcome, PageFailure};
use crate::error::CrawlError;
use crate::parsers::normalize_record;
use crate::results::{CanonicalRecord, PageResult, SUCCESS_MESSAGE};

/// Envelope of a search answer; unknown fields are ignored
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchEnvelope {
    success: bool,
    msg: Option<String>,
    data: Option<SearchData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchData {
    records: Option<Vec<Value>>,
    #[serde(rename = "totalPage")]
    total_page: Option<u32>,
}

/// Answer to one search request
#[derive(Debug)]
pub enum SearchRound {
    /// Normalized records plus the endpoint's status message
    Page { result: PageResult, message: String },
    /// The endpoint answered but reported failure
    Rejected(String),
}

/// Request body for one page of keyword results
pub fn search_payload(keyword: &str, page: u32, size: u32) -> Value {
    json!({
        "type": "all",
        "query": keyword,
        "page": page,
        "size": size,
        "tag": [],
        "order": "",
    })
}

/// Fetches and normalizes one page of search results
pub async fn fetch_search_page<F: Fetcher + ?Sized>(
    fetcher: &F,
    config: &CrawlerConfig,
    keyword: &str,
    page: u32,
    size: u32,
) -> Result<SearchRound, CrawlError> {
    let raw = fetcher
        .post_json(&config.search_api_url, &search_payload(keyword, page, size))
        .await?;
    let envelope: SearchEnvelope =
        serde_json::from_value(raw).map_err(|source| CrawlError::Decode {
            url: config.search_api_url.clone(),
            source,
        })?;

    if !envelope.success {
        let message = envelope
            .msg
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| "search endpoint returned an error".to_string());
        return Ok(SearchRound::Rejected(message));
    }

    let data = envelope.data.unwrap_or_default();
    let records = data.records.unwrap_or_default();
    let items: Vec<CanonicalRecord> = records
        .iter()
        .map(|record| normalize_record(record, &config.site_origin))
        .collect();

    // A missing total means there is nothing further to ask for
    let page_result = PageResult {
        has_more: !items.is_empty() && data.total_page.is_some_and(|total| page < total),
        items,
        total_pages: data.total_page,
        message: None,
    };
    let message = envelope
        .msg
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| SUCCESS_MESSAGE.to_string());
    Ok(SearchRound::Page {
        result: page_result,
        message,
    })
}

/// Walks `page_count` pages of results starting at `start_page`.
///
/// Stops after the last reported page or the first empty page. A rejection
/// or a transport failure ends the walk and is recorded on the outcome next
/// to whatever earlier pages produced.
pub async fn crawl_search<F: Fetcher + ?Sized>(
    fetcher: &F,
    config: &CrawlerConfig,
    keyword: &str,
    start_page: u32,
    page_count: u32,
    size: u32,
) -> ListOutcome {
    let mut outcome = ListOutcome::default();
    let last_page = start_page.saturating_add(page_count.saturating_sub(1));

    for page in start_page..=last_page {
        ::log::info!("Querying search API for {:?}, page {}", keyword, page);
        match fetch_search_page(fetcher, config, keyword, page, size).await {
            Ok(SearchRound::Page { result, message }) => {
                ::log::info!(
                    "Search page {} returned {} records ({} pages reported)",
                    page,
                    result.items.len(),
                    result
                        .total_pages
                        .map_or_else(|| "no".to_string(), |t| t.to_string())
                );
                let has_more = result.has_more;
                outcome.items.extend(result.items);
                outcome.message = Some(message);
                if !has_more {
                    break;
                }
            }
            Ok(SearchRound::Rejected(message)) => {
                ::log::warn!("Search API rejected page {}: {}", page, message);
                outcome.failure = Some(PageFailure::Rejected(message));
                break;
            }
            Err(e) => {
                ::log::error!("Search API page {} failed: {}", page, e);
                outcome.failure = Some(PageFailure::Fetch(e));
                break;
            }
        }
    }

    outcome
}
