use serde::Serialize;
use tracing::trace;

use super::annotations::annotations;
use super::levels;
use super::observer::Observer;
use super::rules::classify;
use super::tally::Tally;
use super::Category;
use crate::corpus::Document;

/// Per-category counts mined from status annotations and level mentions.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Levelling {
    pub levels: Tally,
    pub classes: Tally,
    pub skills: Tally,
    pub unknown: Tally,
}

impl Levelling {
    pub fn tally(&self, category: Category) -> &Tally {
        match category {
            Category::Levels => &self.levels,
            Category::Classes => &self.classes,
            Category::Skills => &self.skills,
            Category::Unknown => &self.unknown,
        }
    }

    fn tally_mut(&mut self, category: Category) -> &mut Tally {
        match category {
            Category::Levels => &mut self.levels,
            Category::Classes => &mut self.classes,
            Category::Skills => &mut self.skills,
            Category::Unknown => &mut self.unknown,
        }
    }

    fn record(
        &mut self,
        category: Category,
        document: &str,
        name: &str,
        observer: &mut dyn Observer,
    ) {
        if self.tally_mut(category).add(name) {
            observer.first_seen(category, document, name);
        }
    }

    pub fn scan_document(&mut self, doc: &Document, observer: &mut dyn Observer) {
        for annotation in annotations(&doc.content) {
            match classify(annotation) {
                Some(found) => {
                    trace!(document = %doc.name, rule = ?found.rule, "{}", annotation);
                    for name in found.names {
                        self.record(found.category, &doc.name, name, observer);
                    }
                }
                None => self.record(Category::Unknown, &doc.name, annotation, observer),
            }
        }

        for digits in levels::occurrences(&doc.content) {
            self.record(Category::Levels, &doc.name, digits, observer);
        }
    }

    /// Move unknown entries that turned out to be known classes or skills
    /// into those tallies. Must run after every document has been scanned.
    pub fn reconcile(&mut self) {
        let pending: Vec<(String, u64)> = self.unknown.drain().collect();
        for (name, count) in pending {
            if self.classes.contains(&name) {
                self.classes.add_n(&name, count);
            } else if self.skills.contains(&name) {
                self.skills.add_n(&name, count);
            } else {
                self.unknown.add_n(&name, count);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::observer::Recorder;

    fn doc(name: &str, content: &str) -> Document {
        Document {
            name: name.to_string(),
            content: content.to_string(),
        }
    }

    fn scan(texts: &[&str]) -> Levelling {
        let mut levelling = Levelling::default();
        let mut rec = Recorder::default();
        for (i, text) in texts.iter().enumerate() {
            levelling.scan_document(&doc(&i.to_string(), text), &mut rec);
        }
        levelling
    }

    #[test]
    fn skill_obtained_is_counted() {
        let l = scan(&["[Skill – Basic Observation Obtained!]"]);
        assert_eq!(l.skills.get("Basic Observation"), Some(1));
        assert_eq!(l.skills.len(), 1);
        assert!(l.unknown.is_empty());
    }

    #[test]
    fn level_up_counts_class_and_level() {
        let l = scan(&["[Fighter Level 5]"]);
        assert_eq!(l.classes.get("Fighter"), Some(1));
        assert_eq!(l.levels.get("5"), Some(1));
    }

    #[test]
    fn class_names_merge_across_case() {
        let l = scan(&["[Rogue Level 2!]", "[rogue Level 3.]"]);
        assert_eq!(l.classes.len(), 1);
        assert_eq!(l.classes.get("ROGUE"), Some(2));
        assert_eq!(l.classes.display_name("rogue"), Some("Rogue"));
    }

    #[test]
    fn skill_change_double_counts_new_name() {
        let l = scan(&["[Skill Change – Basic Cleaning → Advanced Cleaning.]"]);
        assert_eq!(l.skills.get("Advanced Cleaning"), Some(2));
        assert!(!l.skills.contains("Basic Cleaning"));
    }

    #[test]
    fn trailing_ellipsis_keeps_later_annotations() {
        let l = scan(&["He trailed off [so…] then [Fighter Level 5]"]);
        assert_eq!(l.classes.get("Fighter"), Some(1));
        assert_eq!(l.classes.len(), 1);
        assert!(l.unknown.is_empty());
    }

    #[test]
    fn unicode_case_folding_merges_classes() {
        let l = scan(&["[Straße Level 2] [STRASSE Level 3]"]);
        assert_eq!(l.classes.len(), 1);
        assert_eq!(l.classes.get("strasse"), Some(2));
        assert_eq!(l.classes.display_name("STRASSE"), Some("Straße"));
    }

    #[test]
    fn unmatched_annotation_goes_to_unknown() {
        let l = scan(&["[Mrsha] and [Goblin Chieftain]"]);
        assert_eq!(l.unknown.get("Mrsha"), Some(1));
        assert_eq!(l.unknown.get("goblin chieftain"), Some(1));
    }

    #[test]
    fn reconcile_moves_unknown_into_classes() {
        let mut l = scan(&["[Innkeeper Level 3]", "[innkeeper] [INNKEEPER] [Innkeeper Level 4]"]);
        assert_eq!(l.classes.get("Innkeeper"), Some(2));
        assert_eq!(l.unknown.get("innkeeper"), Some(2));
        l.reconcile();
        assert_eq!(l.classes.get("Innkeeper"), Some(4));
        assert!(!l.unknown.contains("innkeeper"));
    }

    #[test]
    fn reconcile_prefers_classes_then_skills() {
        let mut l = scan(&[
            "[Skill – Lesser Strength obtained!]",
            "[Lesser Strength] [Mrsha] [lesser strength]",
        ]);
        l.reconcile();
        assert_eq!(l.skills.get("Lesser Strength"), Some(3));
        assert_eq!(l.unknown.get("Mrsha"), Some(1));
        assert_eq!(l.unknown.len(), 1);
    }

    #[test]
    fn chapter_fixture() {
        let html = std::fs::read_to_string("tests/fixtures/chapter.html").unwrap();
        let mut l = Levelling::default();
        let mut rec = Recorder::default();
        l.scan_document(&doc("0_1-00", &html), &mut rec);
        l.reconcile();

        assert_eq!(l.classes.get("Innkeeper"), Some(3));
        assert_eq!(l.classes.get("Magical Innkeeper"), Some(1));
        assert_eq!(l.skills.get("Basic Cleaning"), Some(1));
        assert_eq!(l.skills.get("Basic Cooking"), Some(1));
        assert_eq!(l.levels.get("1"), Some(2));
        assert_eq!(l.unknown.get("Mrsha"), Some(1));
        assert_eq!(l.unknown.len(), 1);
    }

    #[test]
    fn first_sightings_are_reported_once_per_category() {
        let mut l = Levelling::default();
        let mut rec = Recorder::default();
        l.scan_document(&doc("a", "[Mage Level 1] [mage Level 2]"), &mut rec);
        l.scan_document(&doc("b", "[MAGE Level 3]"), &mut rec);

        let classes: Vec<_> = rec
            .entries
            .iter()
            .filter(|(c, _, _)| *c == Category::Classes)
            .collect();
        assert_eq!(
            classes,
            vec![&(Category::Classes, "a".to_string(), "Mage".to_string())]
        );
        let levels: Vec<_> = rec
            .entries
            .iter()
            .filter(|(c, _, _)| *c == Category::Levels)
            .map(|(_, d, n)| (d.as_str(), n.as_str()))
            .collect();
        assert_eq!(levels, vec![("a", "1"), ("a", "2"), ("b", "3")]);
    }

    #[test]
    fn serializes_all_four_categories() {
        let mut l = scan(&["[Fighter Level 5]"]);
        l.reconcile();
        let v = serde_json::to_value(&l).unwrap();
        assert_eq!(v["classes"]["Fighter"], 1);
        assert_eq!(v["levels"]["5"], 1);
        assert!(v["skills"].as_object().unwrap().is_empty());
        assert!(v["unknown"].as_object().unwrap().is_empty());
    }
}
