use scraper::{ElementRef, Html};
use serde_json::Value;

use crate::config::DetailSelectors;
use crate::parsers::embedded;
use crate::parsers::html::{self, IMAGE_ATTRS};
use crate::parsers::resolver::{FieldResolver, Resolved};
use crate::results::{CanonicalRecord, Provenance};

/// DOM content shorter than this (in characters) loses to longer embedded JSON
pub const MIN_CONTENT_CHARS: usize = 10;

/// Title, body and images resolved from one detail page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailPage {
    pub title: String,
    pub content: String,
    pub images: Vec<String>,
    pub provenance: Provenance,
}

impl DetailPage {
    /// A canonical record for the page itself
    pub fn into_record(self, link: &str, debug: bool) -> CanonicalRecord {
        CanonicalRecord {
            title: self.title,
            link: link.to_string(),
            full_content: self.content,
            images: self.images,
            debug: debug.then_some(self.provenance),
            ..CanonicalRecord::default()
        }
    }
}

/// Resolves title, body and images of a detail page
pub fn parse_detail_page(html: &str, page_url: &str, selectors: &DetailSelectors) -> DetailPage {
    let doc = Html::parse_document(html);
    let root = doc.root_element();
    let forest = embedded::extract(&doc);

    let title = FieldResolver::<ElementRef>::new()
        .then_selectors(&selectors.title)
        .then_selector_attrs(&selectors.title_meta, "content")
        .then_json_keys(&forest, &selectors.json_title_keys)
        .resolve(&root);
    let mut content = dom_content(&root, selectors);

    if content.value.chars().count() < MIN_CONTENT_CHARS {
        merge_embedded_content(&forest, selectors, !title.is_empty(), &mut content);
    }

    let images = html::image_urls(&root, &selectors.images, &IMAGE_ATTRS, page_url);

    ::log::debug!(
        "Detail {} resolved title via {:?}, content via {:?}, {} images",
        page_url,
        title.source,
        content.source,
        images.len()
    );

    DetailPage {
        provenance: Provenance {
            title_from: title.source,
            content_from: content.source,
        },
        title: title.value,
        content: content.value,
        images,
    }
}

/// Body text from the primary container (even when short), else the
/// secondary containers
fn dom_content(root: &ElementRef<'_>, selectors: &DetailSelectors) -> Resolved {
    for selector in &selectors.content_primary {
        if let Some(el) = html::select_first(root, selector) {
            return Resolved {
                value: html::element_text(&el),
                source: Some(selector.clone()),
            };
        }
    }
    FieldResolver::<ElementRef>::new()
        .then_selectors(&selectors.content_secondary)
        .resolve(root)
}

/// Replaces absent or too-short content with a strictly longer embedded
/// candidate. Documents are scanned in order until title and content are
/// both present.
fn merge_embedded_content(
    forest: &[Value],
    selectors: &DetailSelectors,
    has_title: bool,
    content: &mut Resolved,
) {
    for doc in forest {
        if content.value.chars().count() < MIN_CONTENT_CHARS {
            let candidate = embedded::find_string_in(doc, &selectors.json_content_keys);
            if candidate.chars().count() > content.value.chars().count() {
                *content = Resolved {
                    value: candidate,
                    source: Some("inline JSON".to_string()),
                };
            }
        }
        if has_title && !content.is_empty() {
            break;
        }
    }
}
