use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// One chapter file.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub content: String,
}

/// The regular files of a flat directory, sorted by name. Documents are
/// read lazily, one at a time.
#[derive(Debug)]
pub struct Corpus {
    paths: Vec<PathBuf>,
}

impl Corpus {
    pub fn open(dir: &Path) -> Result<Self> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                paths.push(entry.path());
            }
        }
        paths.sort();
        Ok(Self { paths })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn documents(&self) -> impl Iterator<Item = Result<Document>> + '_ {
        self.paths.iter().map(|path| read_document(path))
    }
}

fn read_document(path: &Path) -> Result<Document> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Document { name, content })
}
