// file: src/utils/validation.rs
// description: data validation utilities and helpers
// reference: input validation patterns

use crate::error::{PipelineError, Result};
use reqwest::Url;
use std::fs;
use std::path::{Path, PathBuf};

pub struct Validator;

impl Validator {
    /// Absolute http(s) URL with a host.
    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(PipelineError::Validation(format!(
                "URL must start with http:// or https://: {}",
                url
            )));
        }

        let parsed = Url::parse(url).map_err(|e| {
            PipelineError::Validation(format!("Invalid URL format: {} ({})", url, e))
        })?;

        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(PipelineError::Validation(format!(
                "URL has no host: {}",
                url
            )));
        }

        Ok(())
    }

    pub fn validate_directory(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(PipelineError::Validation(format!(
                "Directory does not exist: {}",
                path.display()
            )));
        }

        if !path.is_dir() {
            return Err(PipelineError::Validation(format!(
                "Path is not a directory: {}",
                path.display()
            )));
        }

        Ok(())
    }

    /// Creates `path` when missing and returns its canonical form.
    pub fn ensure_directory(path: &Path) -> Result<PathBuf> {
        fs::create_dir_all(path).map_err(|e| {
            PipelineError::Validation(format!(
                "Cannot create directory {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::validate_directory(path)?;

        fs::canonicalize(path).map_err(|e| {
            PipelineError::Validation(format!(
                "Cannot canonicalize path {}: {}",
                path.display(),
                e
            ))
        })
    }

    pub fn is_markdown(path: &Path) -> bool {
        path.extension().and_then(|e| e.to_str()) == Some("md")
    }

    pub fn validate_positive(name: &str, value: u64) -> Result<()> {
        if value == 0 {
            return Err(PipelineError::Validation(format!(
                "{} must be greater than 0",
                name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_validate_directory() {
        let temp = TempDir::new().unwrap();
        assert!(Validator::validate_directory(temp.path()).is_ok());
        assert!(Validator::validate_directory(Path::new("/nonexistent")).is_err());

        let file = temp.path().join("file.md");
        fs::write(&file, "x").unwrap();
        assert!(Validator::validate_directory(&file).is_err());
    }

    #[test]
    fn test_ensure_directory_creates_nested() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a/b/published");

        let canonical = Validator::ensure_directory(&nested).unwrap();
        assert!(nested.is_dir());
        assert!(canonical.is_absolute());
    }

    #[test]
    fn test_ensure_directory_rejects_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("taken");
        fs::write(&file, "x").unwrap();

        assert!(Validator::ensure_directory(&file).is_err());
    }

    #[test]
    fn test_is_markdown() {
        assert!(Validator::is_markdown(Path::new("post.md")));
        assert!(!Validator::is_markdown(Path::new("post.markdown")));
        assert!(!Validator::is_markdown(Path::new("post.md.swp")));
        assert!(!Validator::is_markdown(Path::new("README")));
    }

    #[test]
    fn test_validate_url() {
        assert!(Validator::validate_url("https://example.com").is_ok());
        assert!(Validator::validate_url("http://localhost:8080/blog").is_ok());
        assert!(Validator::validate_url("example.com").is_err());
        assert!(Validator::validate_url("ftp://example.com").is_err());
        assert!(Validator::validate_url("https://").is_err());
    }

    #[test]
    fn test_validate_positive() {
        assert!(Validator::validate_positive("attempts", 3).is_ok());
        assert!(Validator::validate_positive("attempts", 0).is_err());
    }
}
