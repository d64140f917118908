//! Tool file templates.
//!
//! Each template turns derived names and attributes into a `ToolDescriptor`,
//! and `render` turns a descriptor into file text. Neither touches the
//! filesystem.

use crate::naming::{ResourceNames, ToolNames};
use crate::spec::{Attribute, FieldKind, InputSchema, Property};
use crate::tool::{Endpoint, HttpMethod, ToolDescriptor};

/// Extension of generated tool files.
pub const TOOL_FILE_EXTENSION: &str = "json";

/// Record identifier property added by the show, update and delete tools.
pub const ID_PROPERTY: &str = "id";

/// Build the descriptor for a standalone tool.
pub fn single_tool(names: &ToolNames, attributes: &[Attribute]) -> ToolDescriptor {
    let properties = attributes
        .iter()
        .map(|attribute| attribute.to_property(true))
        .collect();

    ToolDescriptor::new(
        &names.class_name,
        &names.tool_name,
        format!("Describe what the {} tool does.", names.tool_name),
        InputSchema::from_properties(properties),
    )
}

/// The five tools generated for a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceTemplate {
    Show,
    Index,
    Create,
    Update,
    Delete,
}

impl ResourceTemplate {
    /// All resource templates, in generation order.
    pub const ALL: [Self; 5] = [
        Self::Show,
        Self::Index,
        Self::Create,
        Self::Update,
        Self::Delete,
    ];

    /// File name inside the resource directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Show => "show_tool.json",
            Self::Index => "index_tool.json",
            Self::Create => "create_tool.json",
            Self::Update => "update_tool.json",
            Self::Delete => "delete_tool.json",
        }
    }

    fn class_suffix(self) -> &'static str {
        match self {
            Self::Show => "ShowTool",
            Self::Index => "IndexTool",
            Self::Create => "CreateTool",
            Self::Update => "UpdateTool",
            Self::Delete => "DeleteTool",
        }
    }

    /// Build this template's descriptor.
    pub fn build(self, names: &ResourceNames, attributes: &[Attribute]) -> ToolDescriptor {
        let class_name = format!("{}::{}", names.module_name, self.class_suffix());
        let member_path = format!("{}/{{id}}", names.route_path);
        let singular = names.human_singular();

        let id = || {
            Property::required(
                ID_PROPERTY,
                FieldKind::Integer,
                format!("ID of the {}", names.param_key.replace('_', " ")),
            )
        };
        let fields = |required: bool| {
            attributes
                .iter()
                .map(move |attribute| attribute.to_property(required))
        };

        let (tool_name, description, properties, endpoint) = match self {
            Self::Index => (
                format!("list_{}", names.plural_key),
                format!("List {}", names.human_plural()),
                Vec::new(),
                Endpoint::new(HttpMethod::Get, &names.route_path),
            ),
            Self::Show => (
                format!("show_{}", names.singular_key),
                format!("Show {singular}"),
                vec![id()],
                Endpoint::new(HttpMethod::Get, &member_path),
            ),
            Self::Create => (
                format!("create_{}", names.singular_key),
                format!("Create {singular}"),
                fields(true).collect(),
                Endpoint::new(HttpMethod::Post, &names.route_path)
                    .with_body_key(&names.param_key),
            ),
            Self::Update => (
                format!("update_{}", names.singular_key),
                format!("Update {singular}"),
                std::iter::once(id()).chain(fields(false)).collect(),
                Endpoint::new(HttpMethod::Patch, &member_path).with_body_key(&names.param_key),
            ),
            Self::Delete => (
                format!("delete_{}", names.singular_key),
                format!("Delete {singular}"),
                vec![id()],
                Endpoint::new(HttpMethod::Delete, &member_path),
            ),
        };

        ToolDescriptor::new(
            class_name,
            tool_name,
            description,
            InputSchema::from_properties(properties),
        )
        .with_endpoint(endpoint)
    }
}

/// Render a descriptor as tool file text.
pub fn render(descriptor: &ToolDescriptor) -> serde_json::Result<String> {
    let mut text = serde_json::to_string_pretty(descriptor)?;
    text.push('\n');
    Ok(text)
}
