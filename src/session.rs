use crate::config::CrawlerConfig;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, COOKIE, HeaderMap, HeaderName,
    HeaderValue, ORIGIN, REFERER, USER_AGENT,
};

/// Outbound identity for one crawl invocation.
///
/// Built once from the configuration plus the caller's credential and handed
/// to the fetcher; nothing here reads process environment.
#[derive(Debug, Clone)]
pub struct SessionContext {
    user_agent: String,
    referer: String,
    accept: String,
    accept_language: String,
    origin: String,
    credential: Option<String>,
}

impl SessionContext {
    /// The request credential wins over the configured default; blank values
    /// count as absent.
    pub fn new(config: &CrawlerConfig, credential: Option<&str>) -> Self {
        let credential = credential
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .or_else(|| {
                config
                    .default_credential
                    .as_deref()
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
            })
            .map(str::to_string);

        Self {
            user_agent: config.user_agent.clone(),
            referer: config.referer.clone(),
            accept: config.accept.clone(),
            accept_language: config.accept_language.clone(),
            origin: config.site_origin.clone(),
            credential,
        }
    }

    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    /// Headers for rendered page requests.
    ///
    /// `Accept-Encoding` is left to the client, which only advertises
    /// encodings it can decode.
    pub fn page_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        insert(&mut headers, USER_AGENT, &self.user_agent);
        insert(&mut headers, REFERER, &self.referer);
        insert(&mut headers, ACCEPT, &self.accept);
        insert(&mut headers, ACCEPT_LANGUAGE, &self.accept_language);
        if let Some(cookie) = &self.credential {
            insert(&mut headers, COOKIE, cookie);
        }
        headers
    }

    /// Headers for the JSON search endpoint
    pub fn api_headers(&self) -> HeaderMap {
        let mut headers = self.page_headers();
        insert(&mut headers, ORIGIN, &self.origin);
        insert(&mut headers, CONTENT_TYPE, "application/json;charset=UTF-8");
        insert(
            &mut headers,
            HeaderName::from_static("x-requested-with"),
            "XMLHttpRequest",
        );
        headers
    }
}

fn insert(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(v) => {
            headers.insert(name, v);
        }
        Err(_) => {
            ::log::warn!("Dropping header {} with an invalid value", name);
        }
    }
}
