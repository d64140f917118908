//! Tool file persistence.
//!
//! The `ToolFileStore` writes rendered tool files below a project root and
//! reports what happened to each one.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info};

use crate::error::{Result, StorageError};

/// A rendered file waiting to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    /// Path relative to the project root.
    pub path: PathBuf,

    /// Full file contents.
    pub contents: String,
}

/// What to do when a target file already exists with different contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnConflict {
    /// Replace the existing file.
    #[default]
    Overwrite,

    /// Leave the existing file untouched.
    Skip,
}

/// Outcome for a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// File did not exist and was written.
    Create,
    /// File existed with different contents and was replaced.
    Force,
    /// File existed with different contents and was kept.
    Skip,
    /// File already had the rendered contents.
    Identical,
    /// File was deleted.
    Remove,
    /// File to delete did not exist.
    Missing,
}

impl FileStatus {
    /// Status label printed next to the path.
    pub fn label(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Force => "force",
            Self::Skip => "skip",
            Self::Identical => "identical",
            Self::Remove => "remove",
            Self::Missing => "missing",
        }
    }
}

/// A file and what happened to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAction {
    /// Path relative to the project root.
    pub path: PathBuf,
    pub status: FileStatus,
}

/// Writes and removes tool files under a project root.
pub struct ToolFileStore {
    /// Project root that planned paths are relative to.
    root: PathBuf,

    on_conflict: OnConflict,

    /// Report actions without touching the filesystem.
    pretend: bool,
}

impl ToolFileStore {
    /// Create a store rooted at the given project directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            on_conflict: OnConflict::default(),
            pretend: false,
        }
    }

    /// Set the conflict policy.
    pub fn with_conflict_policy(mut self, on_conflict: OnConflict) -> Self {
        self.on_conflict = on_conflict;
        self
    }

    /// Enable pretend mode.
    pub fn pretend(mut self, pretend: bool) -> Self {
        self.pretend = pretend;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write every planned file in order, stopping at the first failure.
    ///
    /// Files written before a failure stay on disk.
    pub async fn write_all(&self, files: &[PlannedFile]) -> Result<Vec<FileAction>> {
        let mut actions = Vec::with_capacity(files.len());
        for file in files {
            actions.push(self.write(file).await?);
        }
        info!("Processed {} tool files", actions.len());
        Ok(actions)
    }

    /// Write a single planned file.
    pub async fn write(&self, file: &PlannedFile) -> Result<FileAction> {
        let path = self.root.join(&file.path);

        let status = match fs::read_to_string(&path).await {
            Ok(existing) if existing == file.contents => FileStatus::Identical,
            Ok(_) => match self.on_conflict {
                OnConflict::Overwrite => FileStatus::Force,
                OnConflict::Skip => FileStatus::Skip,
            },
            Err(e) if e.kind() == ErrorKind::NotFound => FileStatus::Create,
            Err(e) => {
                return Err(StorageError::ReadFile(format!("{}: {e}", path.display())).into());
            }
        };

        if matches!(status, FileStatus::Create | FileStatus::Force) && !self.pretend {
            self.save_file(&path, &file.contents).await?;
        }

        debug!("{} {}", status.label(), file.path.display());
        Ok(FileAction {
            path: file.path.clone(),
            status,
        })
    }

    /// Remove a file if it exists.
    pub async fn remove(&self, relative: &Path) -> Result<FileAction> {
        let path = self.root.join(relative);

        let status = match fs::metadata(&path).await {
            Ok(_) => {
                if !self.pretend {
                    fs::remove_file(&path).await.map_err(|e| {
                        StorageError::DeleteFile(format!("{}: {e}", path.display()))
                    })?;
                }
                FileStatus::Remove
            }
            Err(e) if e.kind() == ErrorKind::NotFound => FileStatus::Missing,
            Err(e) => {
                return Err(StorageError::ReadFile(format!("{}: {e}", path.display())).into());
            }
        };

        debug!("{} {}", status.label(), relative.display());
        Ok(FileAction {
            path: relative.to_path_buf(),
            status,
        })
    }

    /// Remove a directory if it is empty.
    pub async fn remove_empty_dir(&self, relative: &Path) {
        if self.pretend {
            return;
        }
        let path = self.root.join(relative);
        if let Err(e) = fs::remove_dir(&path).await {
            debug!("Keeping directory {}: {e}", path.display());
        }
    }

    async fn save_file(&self, path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::CreateDirectory(format!("{}: {e}", parent.display()))
            })?;
        }

        // Write atomically
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, contents)
            .await
            .map_err(|e| StorageError::WriteFile(format!("{}: {e}", path.display())))?;

        fs::rename(&temp_path, path)
            .await
            .map_err(|e| StorageError::WriteFile(format!("{}: {e}", path.display())))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn planned(contents: &str) -> PlannedFile {
        PlannedFile {
            path: PathBuf::from("app/tools/ping.json"),
            contents: contents.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_then_identical() {
        let temp_dir = TempDir::new().unwrap();
        let store = ToolFileStore::new(temp_dir.path());

        let first = store.write(&planned("one\n")).await.unwrap();
        assert_eq!(first.status, FileStatus::Create);

        let second = store.write(&planned("one\n")).await.unwrap();
        assert_eq!(second.status, FileStatus::Identical);

        let written = std::fs::read_to_string(temp_dir.path().join("app/tools/ping.json")).unwrap();
        assert_eq!(written, "one\n");
        assert!(!temp_dir.path().join("app/tools/ping.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_conflict_policies() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("app/tools/ping.json");

        ToolFileStore::new(temp_dir.path())
            .write(&planned("one\n"))
            .await
            .unwrap();

        let skip = ToolFileStore::new(temp_dir.path()).with_conflict_policy(OnConflict::Skip);
        assert_eq!(
            skip.write(&planned("two\n")).await.unwrap().status,
            FileStatus::Skip
        );
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "one\n");

        let force = ToolFileStore::new(temp_dir.path());
        assert_eq!(
            force.write(&planned("two\n")).await.unwrap().status,
            FileStatus::Force
        );
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "two\n");
    }

    #[tokio::test]
    async fn test_pretend_never_writes() {
        let temp_dir = TempDir::new().unwrap();
        let store = ToolFileStore::new(temp_dir.path()).pretend(true);

        let action = store.write(&planned("one\n")).await.unwrap();
        assert_eq!(action.status, FileStatus::Create);
        assert!(!temp_dir.path().join("app").exists());
    }

    #[tokio::test]
    async fn test_remove() {
        let temp_dir = TempDir::new().unwrap();
        let store = ToolFileStore::new(temp_dir.path());
        store.write(&planned("one\n")).await.unwrap();

        let path = Path::new("app/tools/ping.json");
        assert_eq!(store.remove(path).await.unwrap().status, FileStatus::Remove);
        assert_eq!(store.remove(path).await.unwrap().status, FileStatus::Missing);
    }
}
