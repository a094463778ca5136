use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use scraper::{Html, Selector};
use serde::Serialize;

use super::observer::Observer;
use crate::corpus::Document;

static COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"color\s*:\s*(#[0-9a-fA-F]{3,6})").unwrap());
static CONTENT_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".entry-content").unwrap());
static STYLED_SPAN_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span[style]").unwrap());

/// Hex color (as written, `#` included) → number of styled spans using it.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ColorTable {
    counts: IndexMap<String, u64>,
}

impl ColorTable {
    pub fn scan_document(&mut self, doc: &Document, observer: &mut dyn Observer) {
        for color in span_colors(&doc.content) {
            let count = self.counts.entry(color).or_insert_with_key(|color| {
                observer.color_seen(&doc.name, color);
                0
            });
            *count += 1;
        }
    }

    #[cfg(test)]
    pub fn get(&self, color: &str) -> Option<u64> {
        self.counts.get(color).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Colors of the inline-styled spans in the chapter body. Falls back to the
/// whole document when there is no `.entry-content` element.
pub fn span_colors(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let scope = doc
        .select(&CONTENT_SEL)
        .next()
        .unwrap_or_else(|| doc.root_element());

    scope
        .select(&STYLED_SPAN_SEL)
        .filter_map(|span| span.value().attr("style"))
        .filter_map(|style| COLOR_RE.captures(style))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
