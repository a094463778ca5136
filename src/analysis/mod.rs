pub mod annotations;
pub mod color;
pub mod levelling;
pub mod levels;
pub mod observer;
pub mod rules;
pub mod tally;

use std::fmt;

use anyhow::Result;
use indicatif::ProgressBar;

use crate::corpus::Corpus;
use color::ColorTable;
use levelling::Levelling;
use observer::Observer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Levels,
    Classes,
    Skills,
    Unknown,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Levels,
        Category::Classes,
        Category::Skills,
        Category::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Levels => "levels",
            Category::Classes => "classes",
            Category::Skills => "skills",
            Category::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which analyses to run over the corpus.
#[derive(Debug, Clone, Copy, Default)]
pub struct Analyses {
    pub color: bool,
    pub levels: bool,
}

#[derive(Debug, Default)]
pub struct Report {
    pub colors: Option<ColorTable>,
    pub levelling: Option<Levelling>,
}

/// Single pass over a corpus: each document is read once and handed to
/// every enabled analysis, then the unknown bucket is reconciled.
pub fn analyze(
    corpus: &Corpus,
    analyses: Analyses,
    observer: &mut dyn Observer,
    pb: &ProgressBar,
) -> Result<Report> {
    let mut colors = analyses.color.then(ColorTable::default);
    let mut levelling = analyses.levels.then(Levelling::default);

    for doc in corpus.documents() {
        let doc = doc?;
        if let Some(table) = colors.as_mut() {
            table.scan_document(&doc, observer);
        }
        if let Some(levelling) = levelling.as_mut() {
            levelling.scan_document(&doc, observer);
        }
        pb.inc(1);
    }

    if let Some(levelling) = levelling.as_mut() {
        levelling.reconcile();
    }

    Ok(Report { colors, levelling })
}

// ── Tests ──
