pub mod detail;
pub mod embedded;
pub mod html;
pub mod list;
pub mod normalize;
pub mod resolver;

#[cfg(test)]
mod tests;

pub use detail::{DetailPage, parse_detail_page};
pub use list::parse_list_page;
pub use normalize::normalize_record;
pub use resolver::{FieldResolver, Resolved, Strategy};

/// Which kind of page a URL points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// The JSON search endpoint
    SearchApi,
    /// A rendered list or search page
    List,
    /// A single post
    Detail,
}

impl PageKind {
    /// Classifies a target URL against the configured search endpoint
    pub fn from_url(url: &str, search_api_url: &str) -> Self {
        let endpoint = search_api_url
            .split("://")
            .nth(1)
            .unwrap_or(search_api_url)
            .trim_end_matches('/');
        let path_only = url.split(['?', '#']).next().unwrap_or(url);

        if (!endpoint.is_empty() && url.contains(endpoint))
            || path_only.trim_end_matches('/').ends_with("/api/sparta/pc/search")
        {
            ::log::debug!("Classifying as search API: {}", url);
            PageKind::SearchApi
        } else if url.contains("search") {
            ::log::debug!("Classifying as list page: {}", url);
            PageKind::List
        } else {
            ::log::debug!("Classifying as detail page: {}", url);
            PageKind::Detail
        }
    }

    /// Classifies by URL shape alone, recognising the search endpoint by path
    pub fn from_target(url: &str) -> Self {
        Self::from_url(url, "")
    }

    /// Whether the page yields a list of items rather than a single post
    pub fn is_listing(self) -> bool {
        !matches!(self, PageKind::Detail)
    }
}
