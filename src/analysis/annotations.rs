use std::sync::LazyLock;

use regex::Regex;

// `[...]` up to the next `]` on the same line, whose first and last inner
// characters are neither an em-dash nor an ellipsis.
static ANNOTATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^—…\]\n](?:[^\]\n]*?[^—…\]\n])??)\]").unwrap());

/// Bracketed status annotations in `text`, left to right, without brackets.
pub fn annotations(text: &str) -> impl Iterator<Item = &str> + '_ {
    ANNOTATION_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
}
