use std::sync::LazyLock;

use regex::Regex;

static LEVEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Level ([0-9]+)").unwrap());

/// Digit strings of every `Level <N>` mention in `text`, brackets or not.
pub fn occurrences(text: &str) -> impl Iterator<Item = &str> + '_ {
    LEVEL_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_prose_and_bracket_mentions() {
        let text = "[Fighter Level 5]\nShe was only Level 5, he was Level 12.";
        let found: Vec<_> = occurrences(text).collect();
        assert_eq!(found, vec!["5", "5", "12"]);
    }

    #[test]
    fn requires_digits_after_a_single_space() {
        assert_eq!(occurrences("Level up! level 3. Level  4").count(), 0);
    }

    #[test]
    fn keeps_leading_zeros_literal() {
        let found: Vec<_> = occurrences("Level 07").collect();
        assert_eq!(found, vec!["07"]);
    }
}
