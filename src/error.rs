use thiserror::Error;

/// Errors raised while validating a request or talking to the upstream site
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Neither a target URL nor a keyword was supplied
    #[error("pass a search keyword (query=) or a target link (url=)")]
    MissingTarget,

    /// The target URL is not an absolute http(s) URL
    #[error("url must start with http:// or https://, got {0:?}")]
    InvalidUrl(String),

    /// The upstream answered with a non-success status
    #[error("upstream returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// The request never produced a response (connect, timeout, body read)
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The upstream body was not the JSON shape we expected
    #[error("unexpected JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configuration could not be used
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CrawlError {
    /// Response code this error maps to
    pub fn status_code(&self) -> u16 {
        if self.is_validation() { 400 } else { 500 }
    }

    /// Whether the error was caused by caller input rather than the upstream
    pub fn is_validation(&self) -> bool {
        matches!(self, CrawlError::MissingTarget | CrawlError::InvalidUrl(_))
    }
}
