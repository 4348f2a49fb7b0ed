//! Maps records returned by the search endpoint into [`CanonicalRecord`]s.
//!
//! A search record looks like
//! `{"data": {"momentData": {...}, "contentData": {...}, "userBrief": {...}}}`.
//! Feed posts fill `momentData`, discussion posts fill `contentData`; both may
//! carry rich-text node arrays (`newTitle`, `newContent`) next to flat strings.

use serde_json::Value;

use crate::parsers::resolver::FieldResolver;
use crate::results::CanonicalRecord;
use crate::utils::format_timestamp;

/// Borrowed view of the nested payload variants of one record
struct RecordView<'v> {
    record: &'v Value,
    moment: &'v Value,
    content: &'v Value,
    user: &'v Value,
}

impl<'v> RecordView<'v> {
    fn new(record: &'v Value) -> Self {
        let data = &record["data"];
        Self {
            record,
            moment: &data["momentData"],
            content: &data["contentData"],
            user: &data["userBrief"],
        }
    }
}

/// Converts one raw search record. Never fails; unknown shapes produce
/// empty fields.
pub fn normalize_record(record: &Value, site_origin: &str) -> CanonicalRecord {
    let view = RecordView::new(record);

    let title = FieldResolver::<RecordView>::new()
        .then_with("momentData.newTitle", |v| text_nodes(&v.moment["newTitle"]))
        .then_with("momentData.title", |v| string_at(&v.moment["title"]))
        .then_with("contentData.newTitle", |v| text_nodes(&v.content["newTitle"]))
        .then_with("contentData.title", |v| string_at(&v.content["title"]))
        .then_with("title", |v| string_at(&v.record["title"]))
        .resolve_value(&view);

    let preview = FieldResolver::<RecordView>::new()
        .then_with("momentData.newContent", |v| text_nodes(&v.moment["newContent"]))
        .then_with("momentData.content", |v| string_at(&v.moment["content"]))
        .then_with("contentData.newContent", |v| text_nodes(&v.content["newContent"]))
        .then_with("contentData.content", |v| string_at(&v.content["content"]))
        .resolve_value(&view);

    CanonicalRecord {
        title,
        preview,
        link: canonical_link(&view, site_origin),
        author: string_at(&view.user["nickname"])
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
        published_at: published_at(&view),
        full_content: String::new(),
        images: images(&view),
        debug: None,
    }
}

/// Joins the `text` fragments of a rich-text node list.
///
/// Accepts either the list itself or an object wrapping it under `data`.
pub fn text_nodes(node: &Value) -> Option<String> {
    let nodes = match node {
        Value::Array(items) => items,
        Value::Object(map) => map.get("data")?.as_array()?,
        _ => return None,
    };
    let joined = nodes
        .iter()
        .filter_map(|n| n.get("text"))
        .filter_map(scalar_string)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    Some(joined.trim().to_string())
}

fn string_at(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

/// Strings and numbers as text; everything else is absent
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Identifier usable in a URL path; blank strings, zero and non-scalars are absent
fn identifier(value: &Value) -> Option<String> {
    let id = scalar_string(value)?;
    let id = id.trim();
    (!id.is_empty() && id != "0").then(|| id.to_string())
}

/// Feed items link to the feed detail page, discussion posts to `/discuss/`
fn canonical_link(view: &RecordView<'_>, site_origin: &str) -> String {
    let origin = site_origin.trim_end_matches('/');
    if let Some(uuid) = identifier(&view.moment["uuid"]) {
        return format!("{origin}/feed/main/detail/{uuid}?source=search");
    }
    [
        &view.content["id"],
        &view.moment["id"],
        &view.moment["contentId"],
    ]
    .into_iter()
    .find_map(identifier)
    .map(|id| format!("{origin}/discuss/{id}?source=search"))
    .unwrap_or_default()
}

fn images(view: &RecordView<'_>) -> Vec<String> {
    let blocks = [
        &view.moment["imgMoment"],
        &view.content["contentImageUrls"],
    ]
    .into_iter()
    .filter_map(Value::as_array)
    .find(|blocks| !blocks.is_empty());

    blocks
        .map(|blocks| {
            blocks
                .iter()
                .filter_map(|block| {
                    ["src", "url"].iter().find_map(|key| {
                        block
                            .get(key)
                            .and_then(Value::as_str)
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(str::to_string)
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// First non-null timestamp candidate, formatted; anything unusable is empty
fn published_at(view: &RecordView<'_>) -> String {
    let candidate = [
        &view.moment["showTime"],
        &view.moment["createdAt"],
        &view.content["showTime"],
        &view.content["createTime"],
    ]
    .into_iter()
    .find(|v| !v.is_null());

    let millis = match candidate {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    millis.map(format_timestamp).unwrap_or_default()
}
