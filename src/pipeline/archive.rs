// file: src/pipeline/archive.rs
// description: moves published documents into the archive folder without overwriting
// reference: https://doc.rust-lang.org/std/fs/fn.rename.html

use crate::error::{PipelineError, Result};
use chrono::Utc;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveEntry {
    pub destination: PathBuf,
    /// Where a previously archived file of the same name was moved to.
    pub backup: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Archiver {
    archive_dir: PathBuf,
}

impl Archiver {
    pub fn new(archive_dir: PathBuf) -> Self {
        Self { archive_dir }
    }

    /// Moves `source` into the archive folder. An existing file with the same
    /// name is first renamed to `<stem>_<unix-seconds><suffix>`.
    pub fn archive(&self, source: &Path) -> Result<ArchiveEntry> {
        fs::create_dir_all(&self.archive_dir).map_err(|source_err| {
            PipelineError::FileOperation {
                path: self.archive_dir.clone(),
                source: source_err,
            }
        })?;

        let file_name = source.file_name().ok_or_else(|| PipelineError::Archive {
            path: source.to_path_buf(),
            message: "path has no file name".to_string(),
        })?;
        let destination = self.archive_dir.join(file_name);

        let backup = if destination.exists() {
            let backup = self.backup_path(&destination, Utc::now().timestamp());
            move_file(&destination, &backup)?;
            info!("Backed up existing archive file to {}", backup.display());
            Some(backup)
        } else {
            None
        };

        move_file(source, &destination)?;
        debug!("Archived {} to {}", source.display(), destination.display());

        Ok(ArchiveEntry {
            destination,
            backup,
        })
    }

    fn backup_path(&self, destination: &Path, timestamp: i64) -> PathBuf {
        let stem = destination
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let suffix = destination
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        let mut candidate = self
            .archive_dir
            .join(format!("{}_{}{}", stem, timestamp, suffix));
        let mut counter = 1;
        while candidate.exists() {
            candidate = self
                .archive_dir
                .join(format!("{}_{}_{}{}", stem, timestamp, counter, suffix));
            counter += 1;
        }
        candidate
    }
}

/// `rename`, falling back to copy + remove across filesystems.
fn move_file(from: &Path, to: &Path) -> Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::CrossesDevices => {
            fs::copy(from, to).map_err(|source| PipelineError::FileOperation {
                path: to.to_path_buf(),
                source,
            })?;
            fs::remove_file(from).map_err(|source| PipelineError::FileOperation {
                path: from.to_path_buf(),
                source,
            })
        }
        Err(source) => Err(PipelineError::FileOperation {
            path: from.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::write_file;
    use tempfile::TempDir;

    #[test]
    fn test_archive_moves_file() {
        let temp = TempDir::new().unwrap();
        let source = write_file(temp.path(), "post.md", "new");
        let archiver = Archiver::new(temp.path().join("published"));

        let entry = archiver.archive(&source).unwrap();

        assert!(!source.exists());
        assert_eq!(entry.destination, temp.path().join("published/post.md"));
        assert_eq!(fs::read_to_string(&entry.destination).unwrap(), "new");
        assert_eq!(entry.backup, None);
    }

    #[test]
    fn test_collision_keeps_both_files() {
        let temp = TempDir::new().unwrap();
        let archive_dir = temp.path().join("published");
        fs::create_dir(&archive_dir).unwrap();
        write_file(&archive_dir, "post.md", "old");
        let source = write_file(temp.path(), "post.md", "new");

        let entry = Archiver::new(archive_dir.clone()).archive(&source).unwrap();

        let backup = entry.backup.expect("existing file should be backed up");
        assert_eq!(fs::read_to_string(&backup).unwrap(), "old");
        assert_eq!(fs::read_to_string(&entry.destination).unwrap(), "new");

        let backup_name = backup.file_name().unwrap().to_string_lossy().into_owned();
        assert!(backup_name.starts_with("post_"));
        assert!(backup_name.ends_with(".md"));
        assert_eq!(fs::read_dir(&archive_dir).unwrap().count(), 2);
    }

    #[test]
    fn test_backup_name_never_reused() {
        let temp = TempDir::new().unwrap();
        let archiver = Archiver::new(temp.path().to_path_buf());
        write_file(temp.path(), "post_100.md", "first backup");
        write_file(temp.path(), "post_100_1.md", "second backup");

        let candidate = archiver.backup_path(&temp.path().join("post.md"), 100);
        assert_eq!(candidate, temp.path().join("post_100_2.md"));
    }

    #[test]
    fn test_missing_source_is_error() {
        let temp = TempDir::new().unwrap();
        let archiver = Archiver::new(temp.path().join("published"));

        let result = archiver.archive(&temp.path().join("gone.md"));
        assert!(matches!(result, Err(PipelineError::FileOperation { .. })));
    }
}
