//! Error types for the scaffolding system.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for scaffolding operations.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Errors that can occur while generating or loading tools.
#[derive(Error, Debug)]
pub enum ToolError {
    /// A tool, resource or attribute name cannot form an identifier.
    #[error("invalid identifier {name:?}: {reason}")]
    InvalidIdentifier { name: String, reason: String },

    /// A malformed `name:type` attribute argument.
    #[error("invalid attribute {0:?}")]
    InvalidAttribute(String),

    /// A descriptor could not be rendered for its target file.
    #[error("failed to render {}: {source}", path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A discovered tool file could not be loaded.
    #[error("failed to load tool file {}: {reason}", path.display())]
    Load { path: PathBuf, reason: String },

    /// Two different files declare the same tool.
    #[error("tool {name} is declared by both {} and {}", first.display(), second.display())]
    DuplicateTool {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// Model introspection failed.
    #[error("schema error: {0}")]
    Schema(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Storage-specific errors. Each carries the offending path.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to create a tools directory.
    #[error("failed to create directory: {0}")]
    CreateDirectory(String),

    /// Failed to read a file.
    #[error("failed to read file: {0}")]
    ReadFile(String),

    /// Failed to write a tool file.
    #[error("failed to write file: {0}")]
    WriteFile(String),

    /// Failed to delete a tool file.
    #[error("failed to delete file: {0}")]
    DeleteFile(String),
}
