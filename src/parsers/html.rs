use crate::utils::resolve_url;
use scraper::{ElementRef, Selector};

/// Attributes probed for an image URL on detail pages, in priority order.
/// `*srcset` values contribute their first URL.
pub const IMAGE_ATTRS: [&str; 5] = ["src", "data-src", "data-original", "data-srcset", "srcset"];

/// Parses a selector, logging and skipping invalid ones
pub fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(sel) => Some(sel),
        Err(e) => {
            ::log::warn!("Skipping invalid selector {:?}: {}", selector, e);
            None
        }
    }
}

/// Text content of an element with whitespace collapsed to single spaces
pub fn element_text(el: &ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// First descendant of `el` matching `selector`
pub fn select_first<'a>(el: &ElementRef<'a>, selector: &str) -> Option<ElementRef<'a>> {
    let sel = parse_selector(selector)?;
    el.select(&sel).next()
}

/// All descendants of `el` matching `selector`, in document order
pub fn select_all<'a>(el: &ElementRef<'a>, selector: &str) -> Vec<ElementRef<'a>> {
    match parse_selector(selector) {
        Some(sel) => el.select(&sel).collect(),
        None => Vec::new(),
    }
}

/// Text of the first match; `None` when nothing matches
pub fn select_text(el: &ElementRef<'_>, selector: &str) -> Option<String> {
    select_first(el, selector).map(|found| element_text(&found))
}

/// Attribute of the first match
pub fn select_attr(el: &ElementRef<'_>, selector: &str, attr: &str) -> Option<String> {
    select_first(el, selector)
        .and_then(|found| found.value().attr(attr))
        .map(str::to_string)
}

/// First non-blank attribute among `attrs`.
///
/// Source-set attributes yield the URL of their first candidate.
pub fn first_attr<S: AsRef<str>>(el: &ElementRef<'_>, attrs: &[S]) -> Option<String> {
    attrs.iter().find_map(|attr| {
        let attr = attr.as_ref();
        let raw = el.value().attr(attr)?.trim();
        let value = if attr.ends_with("srcset") {
            raw.split_whitespace().next()?
        } else {
            raw
        };
        (!value.is_empty()).then(|| value.to_string())
    })
}

/// Absolute image URLs under `scope`, in document order.
///
/// `selectors` are tried together (each element counted once); each image
/// takes the first present attribute from `attrs`.
pub fn image_urls<S: AsRef<str>, A: AsRef<str>>(
    scope: &ElementRef<'_>,
    selectors: &[S],
    attrs: &[A],
    base_url: &str,
) -> Vec<String> {
    let joined = selectors
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(", ");
    if joined.trim().is_empty() {
        return Vec::new();
    }

    select_all(scope, &joined)
        .iter()
        .filter_map(|img| first_attr(img, attrs))
        .filter_map(|src| resolve_url(base_url, &src))
        .collect()
}
