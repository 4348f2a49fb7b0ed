//! Structured state embedded in `<script>` blocks.
//!
//! Pages rendered by the newer front-ends ship their data as JSON next to (or
//! instead of) the visible markup. This module collects every script payload
//! that decodes as JSON and offers a depth-first lookup across them.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};
use serde_json::Value;

use crate::parsers::html;

/// Global-state assignments such as `window.__INITIAL_STATE__ = {...}`
static STATE_ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:window\.)?(__NUXT__|__INITIAL_STATE__|__PRELOADED_STATE__)\s*=\s*")
        .expect("global state pattern should be valid")
});

const JSON_SCRIPT_TYPES: [&str; 2] = ["application/json", "application/ld+json"];

/// Decodes every JSON payload found in script blocks, in document order.
///
/// Blocks that fail to decode are skipped.
pub fn extract(doc: &Html) -> Vec<Value> {
    let mut forest = Vec::new();

    for script in html::select_all(&doc.root_element(), "script") {
        let text: String = script.text().collect();
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        if is_json_block(&script) {
            match serde_json::from_str::<Value>(text) {
                Ok(value) => {
                    forest.push(value);
                    continue;
                }
                Err(e) => {
                    ::log::debug!("Skipping undecodable JSON script block: {}", e);
                }
            }
        }

        if let Some(value) = decode_assignment(text) {
            forest.push(value);
        }
    }

    ::log::debug!("Decoded {} embedded JSON documents", forest.len());
    forest
}

fn is_json_block(script: &ElementRef<'_>) -> bool {
    let el = script.value();
    let typed = el
        .attr("type")
        .map(|t| JSON_SCRIPT_TYPES.contains(&t.trim().to_ascii_lowercase().as_str()))
        .unwrap_or(false);
    typed || el.attr("id") == Some("__NEXT_DATA__")
}

/// Decodes the first JSON value following a known state assignment,
/// ignoring whatever script follows it.
fn decode_assignment(text: &str) -> Option<Value> {
    for found in STATE_ASSIGNMENT.find_iter(text) {
        let rest = &text[found.end()..];
        let mut stream = serde_json::Deserializer::from_str(rest).into_iter::<Value>();
        match stream.next() {
            Some(Ok(value)) if value.is_object() => return Some(value),
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                ::log::debug!("Skipping undecodable state assignment: {}", e);
            }
            None => {}
        }
    }
    None
}

/// First non-blank string stored under any of `keys`, searched depth-first.
///
/// Objects are checked for the candidate keys (in `keys` order) before their
/// children are visited; children are visited in document order. Returns the
/// trimmed value, or an empty string when nothing qualifies.
pub fn find_string<K: AsRef<str>>(forest: &[Value], keys: &[K]) -> String {
    forest
        .iter()
        .find_map(|doc| visit(doc, keys))
        .unwrap_or_default()
}

/// [`find_string`] over a single document
pub fn find_string_in<K: AsRef<str>>(doc: &Value, keys: &[K]) -> String {
    visit(doc, keys).unwrap_or_default()
}

fn visit<K: AsRef<str>>(node: &Value, keys: &[K]) -> Option<String> {
    match node {
        Value::Object(map) => {
            let direct = keys.iter().find_map(|key| {
                map.get(key.as_ref())
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
            });
            if let Some(found) = direct {
                return Some(found.to_string());
            }
            map.values().find_map(|child| visit(child, keys))
        }
        Value::Array(items) => items.iter().find_map(|child| visit(child, keys)),
        Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => None,
    }
}
