use std::sync::LazyLock;

use regex::Regex;

use super::Category;

/// Annotation shapes we know how to read, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    SkillObtained,
    SkillAssigned,
    SkillChange,
    LevelUp,
    ClassObtained,
    ClassLevelTransition,
    ConsolidationRemoved,
    ConsolidationChanged,
    ConditionsMet,
}

struct Matcher {
    rule: Rule,
    category: Category,
    re: Regex,
    /// Capture groups recorded on a match, in insertion order.
    groups: &'static [usize],
}

impl Matcher {
    fn new(rule: Rule, category: Category, pattern: &str, groups: &'static [usize]) -> Self {
        Self {
            rule,
            category,
            re: Regex::new(pattern).unwrap(),
            groups,
        }
    }
}

// First match wins. Several patterns overlap (SkillAssigned is a subset of
// SkillObtained; LevelUp also matches every ClassLevelTransition), so the
// order is part of the behaviour and must not be changed.
static RULES: LazyLock<Vec<Matcher>> = LazyLock::new(|| {
    use Category::{Classes, Skills};
    vec![
        Matcher::new(
            Rule::SkillObtained,
            Skills,
            r"^(?:Temporary\s)?Skill\s[–—]\s(.*?)\s(?:[oO]btained|[lL]earned|[aA]ssigned)[.!]?$",
            &[1],
        ),
        Matcher::new(
            Rule::SkillAssigned,
            Skills,
            r"^(?:Temporary\s)?Skill\s[–—]\s(.*?)\s[aA]ssigned[.!]?$",
            &[1],
        ),
        // Records the new name twice and never the old one.
        Matcher::new(
            Rule::SkillChange,
            Skills,
            r"^Skill\sChange\s[–—]\s(.*?)\s→\s(.*?)[.!]?$",
            &[2, 2],
        ),
        Matcher::new(Rule::LevelUp, Classes, r"^(.*?)\sLevel\s[0-9]+[.!]?$", &[1]),
        Matcher::new(
            Rule::ClassObtained,
            Classes,
            r"^(.*?)\s[cC]lass\s[oO]btained[.!]?$",
            &[1],
        ),
        Matcher::new(
            Rule::ClassLevelTransition,
            Classes,
            r"^(.*?)\sLevel\s[0-9]+\s→\s(.*?)\sLevel\s[0-9]+[.!]?$",
            &[1, 2],
        ),
        Matcher::new(
            Rule::ConsolidationRemoved,
            Classes,
            r"^Class\sConsolidation:\s(.*?)\s[rR]emoved[.!]?$",
            &[1],
        ),
        Matcher::new(
            Rule::ConsolidationChanged,
            Classes,
            r"^Class\sConsolidation:\s(.*?)\s→\s(.*?)\s?[.!]?$",
            &[1, 2],
        ),
        Matcher::new(
            Rule::ConditionsMet,
            Classes,
            r"^Conditions\sMet:\s(.*?)\s→\s(.*?)(?:\s[cC]lass)?[.!]?$",
            &[1, 2],
        ),
    ]
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification<'a> {
    pub rule: Rule,
    pub category: Category,
    pub names: Vec<&'a str>,
}

/// Classify one annotation (brackets already stripped). `None` means no
/// rule matched and the caller should file it as unknown.
pub fn classify(annotation: &str) -> Option<Classification<'_>> {
    RULES.iter().find_map(|m| {
        let caps = m.re.captures(annotation)?;
        let names = m
            .groups
            .iter()
            .filter_map(|&g| caps.get(g))
            .map(|g| g.as_str())
            .collect();
        Some(Classification {
            rule: m.rule,
            category: m.category,
            names,
        })
    })
}
