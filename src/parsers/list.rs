use scraper::{ElementRef, Html};

use crate::config::ListSelectors;
use crate::parsers::html;
use crate::parsers::resolver::FieldResolver;
use crate::results::{CanonicalRecord, PageResult};
use crate::utils::resolve_url;

/// Diagnostic returned for a list page without usable containers
pub const NO_ITEMS_MESSAGE: &str =
    "no post containers found on the list page; it may require login or the markup has changed";

/// Parses a rendered list or search page into partially filled records.
///
/// Containers come from the first selector in `selectors.containers` that
/// matches anything. Containers without a title are dropped. `page_url` is
/// the base for relative links and images.
pub fn parse_list_page(html: &str, page_url: &str, selectors: &ListSelectors) -> PageResult {
    let doc = Html::parse_document(html);
    let root = doc.root_element();

    let containers = find_containers(&root, &selectors.containers);
    let items: Vec<CanonicalRecord> = containers
        .iter()
        .filter_map(|container| parse_container(container, page_url, selectors))
        .collect();

    ::log::debug!(
        "List page {} yielded {} items from {} containers",
        page_url,
        items.len(),
        containers.len()
    );

    let message = items.is_empty().then(|| NO_ITEMS_MESSAGE.to_string());
    PageResult {
        has_more: !items.is_empty(),
        items,
        total_pages: None,
        message,
    }
}

fn find_containers<'a>(root: &ElementRef<'a>, candidates: &[String]) -> Vec<ElementRef<'a>> {
    for selector in candidates {
        let found = html::select_all(root, selector);
        if !found.is_empty() {
            ::log::debug!("Using container selector {:?} ({} matches)", selector, found.len());
            return found;
        }
    }
    Vec::new()
}

fn parse_container(
    container: &ElementRef<'_>,
    page_url: &str,
    selectors: &ListSelectors,
) -> Option<CanonicalRecord> {
    let title = FieldResolver::<ElementRef>::new()
        .then_selectors(&selectors.title)
        .resolve_value(container);
    if title.is_empty() {
        return None;
    }

    let preview = FieldResolver::<ElementRef>::new()
        .then_selectors(&selectors.preview)
        .resolve_value(container);
    let href = FieldResolver::<ElementRef>::new()
        .then_selector_attrs(&selectors.link, "href")
        .resolve_value(container);
    let author = FieldResolver::<ElementRef>::new()
        .then_selectors(&selectors.author)
        .resolve_value(container);
    let published_at = FieldResolver::<ElementRef>::new()
        .then_selectors(&selectors.time)
        .resolve_value(container);

    Some(CanonicalRecord {
        title,
        preview,
        link: resolve_url(page_url, &href).unwrap_or_default(),
        author,
        published_at,
        full_content: String::new(),
        images: html::image_urls(container, &selectors.images, &selectors.image_attrs, page_url),
        debug: None,
    })
}
