use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tracing::info;

use crate::analysis::Report;
use crate::error::ConfigError;

/// Top-level statistics object as written to disk.
pub type Statistics = Map<String, Value>;

/// Starting point for a run: the existing file when appending to one,
/// otherwise an empty object.
pub fn load(target: &Path, append: bool) -> Result<Statistics> {
    if !append || !target.is_file() {
        return Ok(Statistics::new());
    }
    let raw = fs::read_to_string(target)
        .with_context(|| format!("Failed to read {}", target.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", target.display()))?;
    match value {
        Value::Object(stats) => {
            info!("Appending to {} ({} existing keys)", target.display(), stats.len());
            Ok(stats)
        }
        _ => Err(ConfigError::Statistics {
            path: target.to_path_buf(),
        }
        .into()),
    }
}

/// Overwrite `color` and/or `levelling` with this run's results. Other
/// top-level keys are left alone.
pub fn merge(stats: &mut Statistics, report: &Report) -> Result<()> {
    if let Some(colors) = &report.colors {
        stats.insert("color".to_string(), serde_json::to_value(colors)?);
    }
    if let Some(levelling) = &report.levelling {
        stats.insert("levelling".to_string(), serde_json::to_value(levelling)?);
    }
    Ok(())
}

pub fn save(target: &Path, stats: &Statistics) -> Result<()> {
    let json = serde_json::to_string(stats)?;
    fs::write(target, json).with_context(|| format!("Failed to write {}", target.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::color::ColorTable;
    use crate::analysis::levelling::Levelling;
    use crate::analysis::observer::Recorder;
    use crate::corpus::Document;

    fn levelling_report() -> Report {
        let mut levelling = Levelling::default();
        let doc = Document {
            name: "0_1-00".to_string(),
            content: "[Fighter Level 5]".to_string(),
        };
        levelling.scan_document(&doc, &mut Recorder::default());
        levelling.reconcile();
        Report {
            colors: None,
            levelling: Some(levelling),
        }
    }

    #[test]
    fn fresh_run_ignores_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("stats.json");
        fs::write(&target, r#"{"old": 1}"#).unwrap();

        assert!(load(&target, false).unwrap().is_empty());
    }

    #[test]
    fn append_keeps_unrelated_keys() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("stats.json");
        fs::write(&target, r##"{"notes": {"a": 1}, "color": {"#fff": 9}}"##).unwrap();

        let mut stats = load(&target, true).unwrap();
        merge(&mut stats, &levelling_report()).unwrap();
        save(&target, &stats).unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(&target).unwrap()).unwrap();
        assert_eq!(written["notes"]["a"], 1);
        assert_eq!(written["color"]["#fff"], 9);
        assert_eq!(written["levelling"]["classes"]["Fighter"], 1);
        assert_eq!(written["levelling"]["levels"]["5"], 1);
    }

    #[test]
    fn append_to_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(&dir.path().join("absent.json"), true).unwrap().is_empty());
    }

    #[test]
    fn non_object_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("stats.json");
        fs::write(&target, "[1, 2]").unwrap();

        let err = load(&target, true).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Statistics { .. })
        ));
    }

    #[test]
    fn color_results_replace_previous_color_key() {
        let mut stats = Statistics::new();
        stats.insert("color".to_string(), serde_json::json!({"#000": 4}));
        let report = Report {
            colors: Some(ColorTable::default()),
            levelling: None,
        };
        merge(&mut stats, &report).unwrap();
        assert_eq!(stats["color"], serde_json::json!({}));
        assert!(!stats.contains_key("levelling"));
    }
}
