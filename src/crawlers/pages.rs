//! Route over rendered list pages.

use crate::config::CrawlerConfig;
use crate::crawlers::fetcher::Fetcher;
use crate::crawlers::{ListOutcome, PageFailure};
use crate::error::CrawlError;
use crate::parsers::parse_list_page;
use crate::results::PageResult;
use crate::utils::set_page_params;

/// Fetches one list page with the page number injected into every known
/// pagination key
pub async fn fetch_list_page<F: Fetcher + ?Sized>(
    fetcher: &F,
    config: &CrawlerConfig,
    url: &str,
    page: u32,
) -> Result<PageResult, CrawlError> {
    let target = set_page_params(url, page);
    let html = fetcher.get_text(&target).await?;
    Ok(parse_list_page(&html, &target, &config.list_selectors))
}

/// Walks `page_count` list pages starting at `start_page`.
///
/// Each page contributes at most `item_limit` items. The walk stops on the
/// first empty page, once `item_limit * page_count` items are collected, or
/// on a fetch failure.
pub async fn crawl_pages<F: Fetcher + ?Sized>(
    fetcher: &F,
    config: &CrawlerConfig,
    url: &str,
    start_page: u32,
    page_count: u32,
    item_limit: usize,
) -> ListOutcome {
    let mut outcome = ListOutcome::default();
    let ceiling = item_limit.saturating_mul(page_count as usize);
    let last_page = start_page.saturating_add(page_count.saturating_sub(1));

    for page in start_page..=last_page {
        ::log::info!("Fetching list page {} of {}", page, url);
        match fetch_list_page(fetcher, config, url, page).await {
            Ok(mut result) => {
                result.items.truncate(item_limit);
                ::log::info!("List page {} yielded {} items", page, result.items.len());
                if result.items.is_empty() {
                    // Only explain an empty page when nothing came before it
                    if outcome.items.is_empty() {
                        outcome.message = result.message;
                    }
                    break;
                }
                outcome.items.extend(result.items);
                if outcome.items.len() >= ceiling {
                    break;
                }
            }
            Err(e) => {
                ::log::error!("List page {} failed: {}", page, e);
                outcome.failure = Some(PageFailure::Fetch(e));
                break;
            }
        }
    }

    outcome
}
