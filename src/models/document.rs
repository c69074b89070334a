// file: src/models/document.rs
// description: markdown document read from the watch folder for a single attempt
// reference: internal data structures

use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub content: String,
}

impl Document {
    pub fn new(path: PathBuf, content: String) -> Self {
        Self { path, content }
    }

    /// File name without extension, used as the last-resort title.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn file_name(&self) -> String {
        display_name(&self.path)
    }

    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
