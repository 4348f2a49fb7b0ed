use crate::config::CrawlerConfig;
use crate::crawlers::fetcher::Fetcher;
use crate::error::CrawlError;
use crate::parsers::{DetailPage, parse_detail_page};

/// Fetches one item page and resolves its title, body and images
pub async fn fetch_detail<F: Fetcher + ?Sized>(
    fetcher: &F,
    config: &CrawlerConfig,
    url: &str,
) -> Result<DetailPage, CrawlError> {
    let html = fetcher.get_text(url).await?;
    Ok(parse_detail_page(&html, url, &config.detail_selectors))
}
