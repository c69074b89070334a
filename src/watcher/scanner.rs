// file: src/watcher/scanner.rs
// description: lists markdown files already waiting in the watch folder
// reference: https://docs.rs/walkdir

use crate::error::{PipelineError, Result};
use crate::utils::Validator;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

pub struct FileScanner {
    root: PathBuf,
}

impl FileScanner {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Direct `.md` children of the root, sorted by name.
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        debug!("Scanning directory: {}", self.root.display());
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                PipelineError::Io(e.into_io_error().unwrap_or_else(|| {
                    std::io::Error::other(format!("Failed to scan {}", self.root.display()))
                }))
            })?;

            if entry.file_type().is_file() && Validator::is_markdown(entry.path()) {
                files.push(entry.path().to_path_buf());
            }
        }

        if !files.is_empty() {
            info!("Found {} existing markdown files", files.len());
        }
        Ok(files)
    }

    /// Whether `path` is a direct markdown child of the root.
    pub fn is_candidate(&self, path: &Path) -> bool {
        path.parent() == Some(self.root.as_path()) && Validator::is_markdown(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::write_file;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_directory() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "b.md", "# B");
        write_file(temp.path(), "a.md", "# A");
        write_file(temp.path(), "notes.txt", "skip");
        fs::create_dir(temp.path().join("nested")).unwrap();
        write_file(&temp.path().join("nested"), "deep.md", "skip");
        fs::create_dir(temp.path().join("folder.md")).unwrap();

        let scanner = FileScanner::new(temp.path().to_path_buf());
        let files = scanner.scan().unwrap();

        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.md", "b.md"]);
    }

    #[test]
    fn test_missing_root_is_error() {
        let scanner = FileScanner::new(PathBuf::from("/nonexistent/watch"));
        assert!(scanner.scan().is_err());
    }

    #[test]
    fn test_is_candidate() {
        let scanner = FileScanner::new(PathBuf::from("/watch"));

        assert!(scanner.is_candidate(Path::new("/watch/post.md")));
        assert!(!scanner.is_candidate(Path::new("/watch/post.txt")));
        assert!(!scanner.is_candidate(Path::new("/watch/published/post.md")));
        assert!(!scanner.is_candidate(Path::new("/elsewhere/post.md")));
    }
}
