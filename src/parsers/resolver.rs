//! First-match evaluation over ordered extraction strategies.
//!
//! Every field that can come from more than one place (old and new markup,
//! meta tags, embedded JSON, API payload variants) is resolved by building a
//! [`FieldResolver`] at the call site. The order strategies are added in is
//! the priority order.

use crate::parsers::embedded;
use crate::parsers::html;
use scraper::ElementRef;
use serde_json::Value;

type Extract<'r, S> = Box<dyn Fn(&S) -> Option<String> + 'r>;

/// One candidate source for a field
pub struct Strategy<'r, S> {
    label: String,
    extract: Extract<'r, S>,
}

impl<'r, S> Strategy<'r, S> {
    pub fn new(label: impl Into<String>, extract: impl Fn(&S) -> Option<String> + 'r) -> Self {
        Self {
            label: label.into(),
            extract: Box::new(extract),
        }
    }

    /// Always yields `value`
    pub fn fixed(value: impl Into<String>) -> Self {
        let value = value.into();
        Self::new("static", move |_| Some(value.clone()))
    }
}

/// A resolved value and the label of the strategy that produced it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolved {
    pub value: String,
    pub source: Option<String>,
}

impl Resolved {
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// Ordered list of strategies evaluated until one yields non-blank text
pub struct FieldResolver<'r, S> {
    strategies: Vec<Strategy<'r, S>>,
}

impl<'r, S> Default for FieldResolver<'r, S> {
    fn default() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }
}

impl<'r, S> FieldResolver<'r, S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a strategy with the lowest priority so far
    pub fn then(mut self, strategy: Strategy<'r, S>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Appends a closure strategy
    pub fn then_with(
        self,
        label: impl Into<String>,
        extract: impl Fn(&S) -> Option<String> + 'r,
    ) -> Self {
        self.then(Strategy::new(label, extract))
    }

    /// Returns the first trimmed non-empty result; later strategies are not run
    pub fn resolve(&self, source: &S) -> Resolved {
        for strategy in &self.strategies {
            let Some(raw) = (strategy.extract)(source) else {
                continue;
            };
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                ::log::trace!("Resolved field via {}", strategy.label);
                return Resolved {
                    value: trimmed.to_string(),
                    source: Some(strategy.label.clone()),
                };
            }
        }
        Resolved::default()
    }

    /// Like [`resolve`](Self::resolve) without the provenance
    pub fn resolve_value(&self, source: &S) -> String {
        self.resolve(source).value
    }
}

impl<'r, 'a: 'r> FieldResolver<'r, ElementRef<'a>> {
    /// Appends one text strategy per selector
    pub fn then_selectors<I, T>(self, selectors: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        selectors.into_iter().fold(self, |resolver, selector| {
            let selector = selector.as_ref().to_string();
            resolver.then(Strategy::new(selector.clone(), move |el: &ElementRef<'a>| {
                html::select_text(el, &selector)
            }))
        })
    }

    /// Appends one attribute strategy per selector, reading `attr` of the
    /// first matching element
    pub fn then_selector_attrs<I, T>(self, selectors: I, attr: &str) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        selectors.into_iter().fold(self, |resolver, selector| {
            let selector = selector.as_ref().to_string();
            let attr = attr.to_string();
            let label = format!("{selector} @{attr}");
            resolver.then(Strategy::new(label, move |el: &ElementRef<'a>| {
                html::select_attr(el, &selector, &attr)
            }))
        })
    }

    /// Appends a lookup over already-decoded embedded JSON
    pub fn then_json_keys<K: AsRef<str>>(self, forest: &'r [Value], keys: &'r [K]) -> Self {
        self.then(Strategy::new("inline JSON", move |_: &ElementRef<'a>| {
            Some(embedded::find_string(forest, keys))
        }))
    }
}
