//! Startup discovery of generated tool files.
//!
//! The autoloader walks the tools directory, parses every tool file and
//! registers the descriptors into a caller-owned `ToolRegistry`. A file
//! that fails to load aborts the whole load.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{Result, ToolError};
use crate::registry::ToolRegistry;
use crate::template::TOOL_FILE_EXTENSION;
use crate::tool::ToolDescriptor;

/// Counts from one load pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub discovered: usize,
    pub added: usize,
    pub replaced: usize,
    pub unchanged: usize,
    /// Tools no file declares any more.
    pub removed: usize,
}

/// Discovers tool files below a tools directory.
pub struct ToolAutoloader {
    tools_root: PathBuf,
}

impl ToolAutoloader {
    pub fn new(tools_root: impl Into<PathBuf>) -> Self {
        Self {
            tools_root: tools_root.into(),
        }
    }

    pub fn tools_root(&self) -> &Path {
        &self.tools_root
    }

    /// Find every tool file, recursively. A missing root yields no files.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        if !self.tools_root.exists() {
            debug!("Tools directory {} does not exist", self.tools_root.display());
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.tools_root).sort_by_file_name() {
            let entry = entry.map_err(|e| ToolError::Load {
                path: e
                    .path()
                    .map_or_else(|| self.tools_root.clone(), Path::to_path_buf),
                reason: e.to_string(),
            })?;

            let path = entry.path();
            if entry.file_type().is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext == TOOL_FILE_EXTENSION)
            {
                files.push(path.to_path_buf());
            }
        }

        Ok(files)
    }

    /// Load and validate a single tool file.
    pub async fn load_file(path: &Path) -> Result<ToolDescriptor> {
        let load_error = |reason: String| ToolError::Load {
            path: path.to_path_buf(),
            reason,
        };

        let content = fs::read_to_string(path)
            .await
            .map_err(|e| load_error(e.to_string()))?;
        let descriptor: ToolDescriptor =
            serde_json::from_str(&content).map_err(|e| load_error(e.to_string()))?;
        descriptor.validate().map_err(load_error)?;

        Ok(descriptor)
    }

    /// Discover, load and register every tool file.
    ///
    /// The files are registered into a fresh registry that replaces
    /// `registry` only once every file has loaded without conflict, so the
    /// result always matches a first load of the same tree. On error
    /// `registry` is left untouched.
    pub async fn load_into(&self, registry: &mut ToolRegistry) -> Result<LoadSummary> {
        let files = self.discover()?;

        let mut loaded = ToolRegistry::new();
        for path in &files {
            let descriptor = Self::load_file(path).await?;
            debug!("Loaded tool {} from {}", descriptor.tool_name, path.display());
            loaded.register(descriptor, path.clone())?;
        }

        let mut summary = LoadSummary {
            discovered: files.len(),
            ..Default::default()
        };
        for tool in loaded.list() {
            match registry.get(&tool.descriptor.tool_name) {
                None => summary.added += 1,
                Some(previous)
                    if previous.source == tool.source && previous.descriptor == tool.descriptor =>
                {
                    summary.unchanged += 1;
                }
                Some(_) => summary.replaced += 1,
            }
        }
        summary.removed = registry
            .list()
            .filter(|previous| !loaded.contains(&previous.descriptor.tool_name))
            .count();

        *registry = loaded;

        info!(
            "Loaded {} tools from {} ({} new, {} replaced, {} removed)",
            registry.len(),
            self.tools_root.display(),
            summary.added,
            summary.replaced,
            summary.removed
        );
        Ok(summary)
    }
}
