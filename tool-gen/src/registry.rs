//! Tool registry.
//!
//! The `ToolRegistry` holds the descriptors the autoloader discovered. It is
//! an ordinary value owned by the caller: create it with `new`, fill it
//! with `ToolAutoloader::load_into`, and tear it down with `clear`.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, ToolError};
use crate::tool::ToolDescriptor;

/// A descriptor together with the file it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredTool {
    pub descriptor: ToolDescriptor,

    /// File the descriptor was loaded from.
    pub source: PathBuf,

    /// Signature of the descriptor at registration time.
    pub signature: String,
}

/// Result of registering one descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The tool was not registered before.
    Added,
    /// The tool was registered from the same file with different contents.
    Replaced,
    /// The tool was already registered with the same contents.
    Unchanged,
}

/// Registry of loaded tools, keyed by tool name.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, RegisteredTool>,

    /// Class name to tool name.
    class_index: HashMap<String, String>,

    /// Source file to tool name.
    source_index: HashMap<PathBuf, String>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor loaded from `source`.
    ///
    /// Registering the same file again is not an error. A tool name or class
    /// name already claimed by a different file is.
    pub fn register(
        &mut self,
        descriptor: ToolDescriptor,
        source: impl Into<PathBuf>,
    ) -> Result<Registration> {
        let source = source.into();
        let signature = descriptor.compute_signature();

        if let Some(existing) = self.tools.get(&descriptor.tool_name) {
            if existing.source != source {
                return Err(ToolError::DuplicateTool {
                    name: descriptor.tool_name,
                    first: existing.source.clone(),
                    second: source,
                });
            }
        }

        let class_owner = self
            .class_index
            .get(&descriptor.class_name)
            .filter(|owner| **owner != descriptor.tool_name)
            .and_then(|owner| self.tools.get(owner));
        if let Some(existing) = class_owner {
            if existing.source != source {
                return Err(ToolError::DuplicateTool {
                    name: descriptor.class_name,
                    first: existing.source.clone(),
                    second: source,
                });
            }
        }

        // The file may previously have declared a different tool.
        let previous = self
            .source_index
            .get(&source)
            .filter(|previous| **previous != descriptor.tool_name)
            .cloned();
        if let Some(previous) = previous {
            self.remove(&previous);
        }

        let registration = match self.tools.get(&descriptor.tool_name) {
            Some(existing) if existing.signature == signature => {
                return Ok(Registration::Unchanged);
            }
            Some(existing) => {
                self.class_index.remove(&existing.descriptor.class_name);
                Registration::Replaced
            }
            None => Registration::Added,
        };

        debug!("Registered tool {} from {}", descriptor.tool_name, source.display());
        self.class_index
            .insert(descriptor.class_name.clone(), descriptor.tool_name.clone());
        self.source_index
            .insert(source.clone(), descriptor.tool_name.clone());
        self.tools.insert(
            descriptor.tool_name.clone(),
            RegisteredTool {
                descriptor,
                source,
                signature,
            },
        );

        Ok(registration)
    }

    /// Remove a tool by name.
    pub fn remove(&mut self, tool_name: &str) -> Option<RegisteredTool> {
        let removed = self.tools.remove(tool_name)?;
        self.class_index.remove(&removed.descriptor.class_name);
        self.source_index.remove(&removed.source);
        Some(removed)
    }

    /// Get a tool by name.
    pub fn get(&self, tool_name: &str) -> Option<&RegisteredTool> {
        self.tools.get(tool_name)
    }

    /// Get a tool by class name.
    pub fn get_by_class(&self, class_name: &str) -> Option<&RegisteredTool> {
        self.class_index
            .get(class_name)
            .and_then(|name| self.tools.get(name))
    }

    /// Get the tool loaded from a file.
    pub fn get_by_source(&self, source: &Path) -> Option<&RegisteredTool> {
        self.source_index
            .get(source)
            .and_then(|name| self.tools.get(name))
    }

    pub fn contains(&self, tool_name: &str) -> bool {
        self.tools.contains_key(tool_name)
    }

    /// List all tools, ordered by tool name.
    pub fn list(&self) -> impl Iterator<Item = &RegisteredTool> {
        self.tools.values()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Remove every tool.
    pub fn clear(&mut self) {
        self.tools.clear();
        self.class_index.clear();
        self.source_index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{EmptyProperty, InputSchema};
    use pretty_assertions::assert_eq;

    fn descriptor(class_name: &str, tool_name: &str) -> ToolDescriptor {
        ToolDescriptor::new(
            class_name,
            tool_name,
            "test",
            InputSchema::Empty(EmptyProperty),
        )
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ToolRegistry::new();
        let registration = registry
            .register(descriptor("Ping", "ping"), "app/tools/ping.json")
            .unwrap();

        assert_eq!(registration, Registration::Added);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("ping"));
        assert_eq!(registry.get_by_class("Ping").unwrap().descriptor.tool_name, "ping");
        assert!(
            registry
                .get_by_source(Path::new("app/tools/ping.json"))
                .is_some()
        );
    }

    #[test]
    fn test_register_same_file_twice() {
        let mut registry = ToolRegistry::new();
        registry
            .register(descriptor("Ping", "ping"), "app/tools/ping.json")
            .unwrap();

        let again = registry
            .register(descriptor("Ping", "ping"), "app/tools/ping.json")
            .unwrap();
        assert_eq!(again, Registration::Unchanged);

        let mut changed = descriptor("Ping", "ping");
        changed.description = "changed".to_string();
        let replaced = registry.register(changed, "app/tools/ping.json").unwrap();
        assert_eq!(replaced, Registration::Replaced);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_tool_from_other_file() {
        let mut registry = ToolRegistry::new();
        registry
            .register(descriptor("Ping", "ping"), "app/tools/ping.json")
            .unwrap();

        let err = registry
            .register(descriptor("Pong", "ping"), "app/tools/pong.json")
            .unwrap_err();
        assert!(matches!(err, ToolError::DuplicateTool { .. }));

        let err = registry
            .register(descriptor("Ping", "pong"), "app/tools/pong.json")
            .unwrap_err();
        assert!(matches!(err, ToolError::DuplicateTool { .. }));
    }

    #[test]
    fn test_file_renames_its_tool() {
        let mut registry = ToolRegistry::new();
        registry
            .register(descriptor("Ping", "ping"), "app/tools/ping.json")
            .unwrap();
        registry
            .register(descriptor("Ping", "ping_v2"), "app/tools/ping.json")
            .unwrap();

        assert!(!registry.contains("ping"));
        assert!(registry.contains("ping_v2"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_description_change_replaces_descriptor() {
        let mut registry = ToolRegistry::new();
        registry
            .register(descriptor("Ping", "ping"), "app/tools/ping.json")
            .unwrap();

        let mut edited = descriptor("Ping", "ping");
        edited.description = "Ping the server".to_string();
        let registration = registry.register(edited, "app/tools/ping.json").unwrap();

        assert_eq!(registration, Registration::Replaced);
        assert_eq!(registry.get("ping").unwrap().descriptor.description, "Ping the server");
    }

    #[test]
    fn test_remove_and_clear() {
        let mut registry = ToolRegistry::new();
        registry
            .register(descriptor("Ping", "ping"), "app/tools/ping.json")
            .unwrap();
        registry
            .register(descriptor("Pong", "pong"), "app/tools/pong.json")
            .unwrap();

        assert!(registry.remove("pong").is_some());
        assert!(registry.contains("ping"));
        assert!(registry.get_by_class("Pong").is_none());
        assert!(registry.get_by_source(Path::new("app/tools/pong.json")).is_none());

        registry.clear();
        assert!(registry.is_empty());
    }
}
