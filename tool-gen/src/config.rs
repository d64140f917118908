//! Project configuration for the generators.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::{Result, StorageError, ToolError};
use crate::storage::OnConflict;

/// Name of the configuration file looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "mcpgen.toml";

/// Configuration for a project the generators write into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScaffoldConfig {
    /// Project root. Not read from the file; set by the caller.
    #[serde(skip)]
    pub project_root: PathBuf,

    /// Tools directory, relative to the project root.
    pub tools_dir: PathBuf,

    /// Schema dump used for model introspection, relative to the project root.
    pub schema_path: PathBuf,

    /// What to do with existing files that differ.
    pub on_conflict: OnConflict,

    /// Report actions without writing.
    #[serde(skip)]
    pub pretend: bool,
}

impl ScaffoldConfig {
    /// Create a configuration with default values for a project root.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            ..Default::default()
        }
    }

    /// Load `mcpgen.toml` from the project root if it exists.
    pub async fn discover(project_root: impl Into<PathBuf>) -> Result<Self> {
        let project_root = project_root.into();
        let path = project_root.join(CONFIG_FILE_NAME);
        if fs::metadata(&path).await.is_ok() {
            Self::load(&path, project_root).await
        } else {
            Ok(Self::new(project_root))
        }
    }

    /// Load configuration from an explicit file.
    pub async fn load(path: &Path, project_root: impl Into<PathBuf>) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| StorageError::ReadFile(format!("{}: {e}", path.display())))?;
        let mut config = Self::from_toml(&content)
            .map_err(|e| ToolError::Config(format!("{}: {e}", path.display())))?;
        config.project_root = project_root.into();
        Ok(config)
    }

    /// Parse configuration text.
    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Set the tools directory.
    pub fn with_tools_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tools_dir = dir.into();
        self
    }

    /// Set the conflict policy.
    pub fn with_conflict_policy(mut self, on_conflict: OnConflict) -> Self {
        self.on_conflict = on_conflict;
        self
    }

    /// Enable pretend mode.
    pub fn pretend(mut self) -> Self {
        self.pretend = true;
        self
    }

    /// Absolute tools directory.
    pub fn tools_root(&self) -> PathBuf {
        self.project_root.join(&self.tools_dir)
    }

    /// Absolute schema file path.
    pub fn schema_file(&self) -> PathBuf {
        self.project_root.join(&self.schema_path)
    }
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            tools_dir: PathBuf::from("app/tools"),
            schema_path: PathBuf::from("db/schema.rb"),
            on_conflict: OnConflict::Overwrite,
            pretend: false,
        }
    }
}
