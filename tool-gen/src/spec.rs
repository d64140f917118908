//! Tool input specification types.
//!
//! Defines attributes as declared by the user, the canonical field kinds
//! they map to, and the input schema written into each tool file.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, ToolError};
use crate::naming;

/// Canonical kind of a tool input field.
///
/// Tool schemas only distinguish these three kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Integer,
    Boolean,
    String,
}

impl FieldKind {
    /// Map a declared column or relation type to a field kind.
    ///
    /// Case-insensitive and total: unrecognized types map to `String`.
    pub fn from_declared_type(declared_type: &str) -> Self {
        match declared_type.to_ascii_lowercase().as_str() {
            "references" | "belongs_to" | "timestamp" | "integer" => Self::Integer,
            "boolean" => Self::Boolean,
            _ => Self::String,
        }
    }

    /// Convert to JSON Schema type string.
    pub fn to_json_type(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::String => "string",
        }
    }
}

/// A `(name, declared_type)` pair supplied by the user or a schema source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name.
    pub name: String,

    /// Declared type, free-form.
    pub declared_type: String,
}

impl Attribute {
    /// Create a new attribute.
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
        }
    }

    /// Parse a `name[:type[:index]]` command line argument.
    ///
    /// A missing type means `string`. Type options in braces, as in
    /// `decimal{10,2}`, are dropped.
    pub fn parse(arg: &str) -> Result<Self> {
        let mut parts = arg.split(':');
        let name = parts.next().unwrap_or_default();

        if name.contains('/') {
            return Err(ToolError::InvalidAttribute(arg.to_string()));
        }
        naming::validate_identifier(name)?;

        let declared_type = parts
            .next()
            .map(|ty| ty.split('{').next().unwrap_or_default())
            .filter(|ty| !ty.is_empty())
            .unwrap_or("string");

        if !declared_type
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(ToolError::InvalidAttribute(arg.to_string()));
        }

        Ok(Self::new(name, declared_type))
    }

    /// Parse every argument, failing on the first malformed one.
    pub fn parse_all<S: AsRef<str>>(args: &[S]) -> Result<Vec<Self>> {
        args.iter().map(|arg| Self::parse(arg.as_ref())).collect()
    }

    /// Reject attributes whose schema columns collide with each other or
    /// with a `reserved` property the template adds itself.
    pub fn check_columns(attributes: &[Self], reserved: &[&str]) -> Result<()> {
        let mut seen = HashSet::new();
        for attribute in attributes {
            let column = attribute.column_name();
            if reserved.contains(&column.as_str()) {
                return Err(ToolError::InvalidAttribute(format!(
                    "{}: {column} is generated automatically",
                    attribute.name
                )));
            }
            if !seen.insert(column.clone()) {
                return Err(ToolError::InvalidAttribute(format!(
                    "{}: column {column} is declared twice",
                    attribute.name
                )));
            }
        }
        Ok(())
    }

    /// The canonical kind of this attribute.
    pub fn kind(&self) -> FieldKind {
        FieldKind::from_declared_type(&self.declared_type)
    }

    /// Whether the attribute is a relation to another resource.
    pub fn is_reference(&self) -> bool {
        matches!(
            self.declared_type.to_ascii_lowercase().as_str(),
            "references" | "belongs_to"
        )
    }

    /// Column name used in the tool schema (`user:references` -> `user_id`).
    pub fn column_name(&self) -> String {
        if self.is_reference() && !self.name.ends_with("_id") {
            format!("{}_id", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Convert to a schema property.
    pub fn to_property(&self, required: bool) -> Property {
        let column = self.column_name();
        let description = column.replace('_', " ");
        Property {
            name: column,
            kind: self.kind(),
            description,
            required,
        }
    }
}

/// One input property of a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Property name.
    pub name: String,

    /// Canonical kind.
    pub kind: FieldKind,

    /// Description of the property.
    pub description: String,

    /// Whether the property is required.
    pub required: bool,
}

impl Property {
    /// Create a new required property.
    pub fn required(
        name: impl Into<String>,
        kind: FieldKind,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            description: description.into(),
            required: true,
        }
    }

    /// Convert to JSON Schema.
    pub fn to_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": self.kind.to_json_type(),
            "description": self.description
        })
    }
}

const EMPTY_PROPERTY_TAG: &str = "EmptyProperty";

/// Marker for a tool that declares no input properties.
///
/// Serialized as the string `"EmptyProperty"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EmptyProperty;

impl Serialize for EmptyProperty {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(EMPTY_PROPERTY_TAG)
    }
}

impl<'de> Deserialize<'de> for EmptyProperty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        if tag == EMPTY_PROPERTY_TAG {
            Ok(EmptyProperty)
        } else {
            Err(serde::de::Error::custom(format!(
                "expected {EMPTY_PROPERTY_TAG:?}, found {tag:?}"
            )))
        }
    }
}

/// Input schema of a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputSchema {
    /// No input properties.
    Empty(EmptyProperty),

    /// Ordered, non-empty list of properties.
    Properties(Vec<Property>),
}

impl InputSchema {
    /// Build a schema, using the `EmptyProperty` marker when there are no properties.
    pub fn from_properties(properties: Vec<Property>) -> Self {
        if properties.is_empty() {
            Self::Empty(EmptyProperty)
        } else {
            Self::Properties(properties)
        }
    }

    /// Whether the tool declares no inputs and carries the `EmptyProperty` marker.
    pub fn is_empty_property(&self) -> bool {
        matches!(self, Self::Empty(_))
    }

    /// Properties in declaration order.
    pub fn properties(&self) -> &[Property] {
        match self {
            Self::Empty(_) => &[],
            Self::Properties(properties) => properties,
        }
    }

    /// Check structural invariants: a property list is non-empty and names are unique.
    pub fn validate(&self) -> std::result::Result<(), String> {
        let Self::Properties(properties) = self else {
            return Ok(());
        };

        if properties.is_empty() {
            return Err(format!(
                "empty property list must be written as {EMPTY_PROPERTY_TAG:?}"
            ));
        }

        let mut seen = HashSet::new();
        for property in properties {
            if property.name.is_empty() {
                return Err("property name cannot be empty".to_string());
            }
            if !seen.insert(property.name.as_str()) {
                return Err(format!("duplicate property: {}", property.name));
            }
        }

        Ok(())
    }

    /// Generate an MCP `inputSchema` object.
    pub fn to_json_schema(&self) -> serde_json::Value {
        match self {
            Self::Empty(_) => serde_json::json!({ "type": "object" }),
            Self::Properties(properties) => {
                let mut schema_properties = serde_json::Map::new();
                let mut required = Vec::new();

                for property in properties {
                    schema_properties.insert(property.name.clone(), property.to_schema());
                    if property.required {
                        required.push(serde_json::Value::String(property.name.clone()));
                    }
                }

                serde_json::json!({
                    "type": "object",
                    "properties": schema_properties,
                    "required": required
                })
            }
        }
    }
}
