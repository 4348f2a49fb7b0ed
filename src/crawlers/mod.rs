//! Crawl orchestration: route selection, pagination and detail enrichment.
//!
//! A crawl runs as one sequential task. Requests are awaited one after the
//! other; the only pacing is the delay between detail fetches.

pub mod detail;
pub mod fetcher;
pub mod pages;
pub mod search_api;


use std::time::Duration;

use crate::config::CrawlerConfig;
use crate::error::CrawlError;
use crate::parsers::{DetailPage, PageKind};
use crate::request::{CrawlRequest, Mode};
use crate::results::{CanonicalRecord, CrawlResponse, SUCCESS_MESSAGE};
use crate::utils::keyword_from_url;

pub use fetcher::{Fetcher, HttpFetcher};

/// Why pagination ended before the requested range was covered
#[derive(Debug)]
pub enum PageFailure {
    /// The search endpoint answered with `success: false`
    Rejected(String),
    /// A page could not be fetched or decoded
    Fetch(CrawlError),
}

/// Items gathered by one list route
#[derive(Debug, Default)]
pub struct ListOutcome {
    pub items: Vec<CanonicalRecord>,
    /// Last informative status message seen
    pub message: Option<String>,
    pub failure: Option<PageFailure>,
}

/// Result of enriching one item from its detail page
#[derive(Debug)]
pub enum Enrichment {
    Enriched(DetailPage),
    Failed(String),
    /// The item has no link to follow
    Skipped,
}

/// Which list route a request takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    SearchApi,
    RenderedPages,
}

/// Keyword requests and requests aimed at the search endpoint use the API
pub fn select_route(request: &CrawlRequest, config: &CrawlerConfig) -> Route {
    let targets_api = request
        .url
        .as_deref()
        .is_some_and(|u| PageKind::from_url(u, &config.search_api_url) == PageKind::SearchApi);
    if request.keyword.is_some() || targets_api {
        Route::SearchApi
    } else {
        Route::RenderedPages
    }
}

/// Runs one validated request to completion
pub async fn crawl<F: Fetcher + ?Sized>(
    request: &CrawlRequest,
    config: &CrawlerConfig,
    fetcher: &F,
) -> CrawlResponse {
    match request.mode {
        Mode::Detail => crawl_detail(request, config, fetcher).await,
        Mode::List => crawl_list(request, config, fetcher).await,
    }
}

async fn crawl_detail<F: Fetcher + ?Sized>(
    request: &CrawlRequest,
    config: &CrawlerConfig,
    fetcher: &F,
) -> CrawlResponse {
    let Some(url) = request.url.as_deref() else {
        return CrawlResponse::failure(400, CrawlError::MissingTarget.to_string());
    };

    ::log::info!("Fetching detail page {}", url);
    match detail::fetch_detail(fetcher, config, url).await {
        Ok(page) => CrawlResponse::detail(page.into_record(url, request.debug), SUCCESS_MESSAGE),
        Err(e) => {
            ::log::error!("Detail page {} failed: {}", url, e);
            CrawlResponse::failure(e.status_code(), format!("crawl failed: {e}"))
        }
    }
}

async fn crawl_list<F: Fetcher + ?Sized>(
    request: &CrawlRequest,
    config: &CrawlerConfig,
    fetcher: &F,
) -> CrawlResponse {
    let route = select_route(request, config);
    ::log::info!("Crawling list via {:?}", route);

    let mut outcome = match route {
        Route::SearchApi => {
            let keyword = request
                .keyword
                .clone()
                .or_else(|| request.url.as_deref().map(keyword_from_url))
                .unwrap_or_default();
            search_api::crawl_search(
                fetcher,
                config,
                &keyword,
                request.start_page,
                request.page_count,
                request.api_page_size(),
            )
            .await
        }
        Route::RenderedPages => {
            let Some(url) = request.url.as_deref() else {
                return CrawlResponse::failure(400, CrawlError::MissingTarget.to_string());
            };
            pages::crawl_pages(
                fetcher,
                config,
                url,
                request.start_page,
                request.page_count,
                request.item_limit(),
            )
            .await
        }
    };

    match outcome.failure.take() {
        Some(PageFailure::Fetch(e)) => {
            return CrawlResponse::partial(
                e.status_code(),
                outcome.items,
                format!("crawl failed: {e}"),
            );
        }
        Some(PageFailure::Rejected(message)) => {
            return CrawlResponse::list(outcome.items, message);
        }
        None => {}
    }

    if request.enrich_detail {
        let delay = request.delay.unwrap_or_else(|| config.detail_delay());
        enrich_items(&mut outcome.items, config, fetcher, delay, request.debug).await;
    }

    let message = outcome
        .message
        .unwrap_or_else(|| SUCCESS_MESSAGE.to_string());
    CrawlResponse::list(outcome.items, message)
}

/// Fetches the detail page of one item; failures are returned, not raised
pub async fn enrich_one<F: Fetcher + ?Sized>(
    item: &CanonicalRecord,
    config: &CrawlerConfig,
    fetcher: &F,
) -> Enrichment {
    if item.link.is_empty() {
        return Enrichment::Skipped;
    }
    match detail::fetch_detail(fetcher, config, &item.link).await {
        Ok(page) => Enrichment::Enriched(page),
        Err(e) => Enrichment::Failed(e.to_string()),
    }
}

/// Fills `full_content` and `images` of every item from its detail page.
///
/// A failing item gets a placeholder body and the rest carry on. `delay` is
/// awaited between successive detail fetches, not after the last one.
pub async fn enrich_items<F: Fetcher + ?Sized>(
    items: &mut [CanonicalRecord],
    config: &CrawlerConfig,
    fetcher: &F,
    delay: Duration,
    debug: bool,
) {
    let mut fetched_any = false;
    for item in items.iter_mut() {
        if item.link.is_empty() {
            continue;
        }
        if fetched_any && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        fetched_any = true;

        match enrich_one(item, config, fetcher).await {
            Enrichment::Enriched(page) => {
                item.full_content = page.content;
                if !page.images.is_empty() {
                    item.images = page.images;
                }
                if debug {
                    item.debug = Some(page.provenance);
                }
            }
            Enrichment::Failed(reason) => {
                ::log::warn!("Detail enrichment failed for {}: {}", item.link, reason);
                item.full_content = format!("detail fetch failed: {reason}");
            }
            Enrichment::Skipped => {}
        }
    }
}
