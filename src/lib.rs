//! Content extraction and crawl orchestration for nowcoder.com.
//!
//! A request names either a keyword or a target link. List requests walk the
//! JSON search endpoint or rendered list pages and can enrich every item from
//! its detail page; detail requests extract a single post.

// Re-export modules
pub mod config;
pub mod crawlers;
pub mod error;
pub mod parsers;
pub mod request;
pub mod results;
pub mod session;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::CrawlerConfig;
pub use error::CrawlError;
pub use request::{CrawlRequest, RequestParams};
pub use results::{CanonicalRecord, CrawlResponse};

use crawlers::HttpFetcher;
use session::SessionContext;

/// Runs a validated request against the live site
pub async fn run(request: &CrawlRequest, config: &CrawlerConfig) -> CrawlResponse {
    let session = SessionContext::new(config, request.credential.as_deref());
    let fetcher = match HttpFetcher::new(config, session) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            ::log::error!("Failed to set up HTTP client: {}", e);
            return CrawlResponse::failure(e.status_code(), e.to_string());
        }
    };

    crawlers::crawl(request, config, &fetcher).await
}

/// Validates raw parameters and runs the request.
///
/// Invalid parameters answer with code 400 before anything is fetched.
pub async fn respond(
    params: RequestParams,
    credential_header: Option<&str>,
    config: &CrawlerConfig,
) -> CrawlResponse {
    match params.into_request(credential_header) {
        Ok(request) => run(&request, config).await,
        Err(e) => {
            ::log::warn!("Rejected request: {}", e);
            CrawlResponse::failure(e.status_code(), e.to_string())
        }
    }
}
