use std::sync::LazyLock;

use scraper::{Html, Selector};

static ENTRY_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".chapter-entry").unwrap());
static LINK_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// Chapter URLs from a table of contents page, in reading order. Only the
/// first link of each `.chapter-entry` counts; entries without one are skipped.
pub fn chapter_urls(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    doc.select(&ENTRY_SEL)
        .filter_map(|entry| entry.select(&LINK_SEL).next())
        .filter_map(|link| link.value().attr("href"))
        .map(str::to_string)
        .collect()
}

/// `<index>_<last path segment>`, e.g. `0_1-00` for `.../2016/07/27/1-00/`.
pub fn chapter_file_name(index: usize, url: &str) -> String {
    let trimmed = url.trim_matches('/');
    let slug = trimmed.rsplit('/').next().unwrap_or(trimmed);
    format!("{}_{}", index, slug)
}
