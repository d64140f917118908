//! # MCP Tool Scaffolding
//!
//! This crate generates MCP tool definition files and loads them back at
//! startup. It provides:
//!
//! - **Type Mapping**: Declared attribute types collapse to `integer`,
//!   `boolean` or `string`
//! - **Single Tools**: One tool file from a name and attributes
//! - **Resource Tool Sets**: Index, show, create, update and delete tools
//!   for a resource
//! - **Autoloading**: Discover generated files and register them into a
//!   `ToolRegistry`
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Tool Scaffolding                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  GenerationRequest ──► ToolGenerator ──► ToolFileStore         │
//! │        │                    │                  │                │
//! │        ▼                    ▼                  ▼                │
//! │    Attribute          template::render   app/tools/**/*.json   │
//! │                                                │                │
//! │                 ToolRegistry ◄── ToolAutoloader ◄┘              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod autoload;
pub mod config;
pub mod error;
pub mod generator;
pub mod naming;
pub mod registry;
pub mod schema_source;
pub mod spec;
pub mod storage;
pub mod template;
pub mod tool;

pub use autoload::{LoadSummary, ToolAutoloader};
pub use config::{CONFIG_FILE_NAME, ScaffoldConfig};
pub use error::{Result, StorageError, ToolError};
pub use generator::{
    GenerationPlan, GenerationReport, GenerationRequest, GeneratorKind, ToolGenerator,
};
pub use registry::{RegisteredTool, Registration, ToolRegistry};
pub use schema_source::{SchemaFile, SchemaSource};
pub use spec::{Attribute, EmptyProperty, FieldKind, InputSchema, Property};
pub use storage::{FileAction, FileStatus, OnConflict, PlannedFile, ToolFileStore};
pub use template::{ResourceTemplate, render};
pub use tool::{Endpoint, HttpMethod, ToolDescriptor};
