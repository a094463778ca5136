use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use scraper::{Html, Selector};
use tracing::{info, warn};

use crate::corpus::Corpus;
use crate::error::ConfigError;

static CONTENT_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".entry-content").unwrap());

#[derive(Debug)]
pub struct CleanStats {
    pub written: usize,
    pub skipped: usize,
}

/// Refuse to run unless both directories exist and, without `overwrite`,
/// the target is empty.
pub fn check_dirs(source: &Path, target: &Path, overwrite: bool) -> Result<()> {
    if !source.is_dir() {
        return Err(ConfigError::NotADirectory {
            role: "Source",
            path: source.to_path_buf(),
        }
        .into());
    }
    if !target.is_dir() {
        return Err(ConfigError::NotADirectory {
            role: "Target",
            path: target.to_path_buf(),
        }
        .into());
    }
    if !overwrite {
        let mut entries = fs::read_dir(target)
            .with_context(|| format!("Failed to list {}", target.display()))?;
        if entries.next().is_some() {
            return Err(ConfigError::TargetNotEmpty {
                path: target.to_path_buf(),
            }
            .into());
        }
    }
    Ok(())
}

/// Text of the chapter body, or `None` when the page has no `.entry-content`.
pub fn main_content(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let content = doc.select(&CONTENT_SEL).next()?;
    Some(content.text().collect())
}

/// Write the main-content text of every document in `corpus` to a file of
/// the same name under `target`.
pub fn clean_files(corpus: &Corpus, target: &Path, pb: &ProgressBar) -> Result<CleanStats> {
    let mut stats = CleanStats {
        written: 0,
        skipped: 0,
    };

    for doc in corpus.documents() {
        let doc = doc?;
        info!("{}", doc.name);
        match main_content(&doc.content) {
            Some(text) => {
                let path = target.join(&doc.name);
                fs::write(&path, text)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                stats.written += 1;
            }
            None => {
                warn!("No .entry-content in {}; skipped", doc.name);
                stats.skipped += 1;
            }
        }
        pb.inc(1);
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chapter_fixture_body_text() {
        let html = fs::read_to_string("tests/fixtures/chapter.html").unwrap();
        let text = main_content(&html).unwrap();
        assert!(text.contains("The inn was empty."));
        assert!(text.contains("[Innkeeper Class Obtained!]"));
        assert!(!text.contains("<span"));
        assert!(!text.contains("Next Chapter"));
        assert!(!text.contains("The Wandering Inn"));
    }

    #[test]
    fn page_without_content_has_no_text() {
        assert_eq!(main_content("<html><body><p>menu</p></body></html>"), None);
    }

    #[test]
    fn non_empty_target_needs_overwrite() {
        let source = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        fs::write(target.path().join("old"), "x").unwrap();

        let err = check_dirs(source.path(), target.path(), false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::TargetNotEmpty { .. })
        ));
        assert!(check_dirs(source.path(), target.path(), true).is_ok());
    }

    #[test]
    fn missing_source_is_rejected() {
        let target = tempfile::tempdir().unwrap();
        let err = check_dirs(&target.path().join("absent"), target.path(), false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::NotADirectory { role: "Source", .. })
        ));
    }

    #[test]
    fn cleans_directory_and_skips_pages_without_content() {
        let source = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        let html = fs::read_to_string("tests/fixtures/chapter.html").unwrap();
        fs::write(source.path().join("0_1-00"), html).unwrap();
        fs::write(source.path().join("1_404"), "<html><body>gone</body></html>").unwrap();

        let corpus = Corpus::open(source.path()).unwrap();
        let stats = clean_files(&corpus, target.path(), &ProgressBar::hidden()).unwrap();

        assert_eq!(stats.written, 1);
        assert_eq!(stats.skipped, 1);
        let cleaned = fs::read_to_string(target.path().join("0_1-00")).unwrap();
        assert!(cleaned.contains("[Skill – Basic Cleaning obtained!]"));
        assert!(!target.path().join("1_404").exists());
    }
}
