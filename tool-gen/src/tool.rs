//! Tool descriptor types.
//!
//! A descriptor is the content of one generated tool file: the class
//! identifier a runtime registers it under, the MCP tool name, and its
//! input schema.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::spec::InputSchema;

/// The content of one generated tool file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Class identifier, e.g. `Posts::CreateTool`.
    pub class_name: String,

    /// Tool name exposed to MCP clients, e.g. `create_post`.
    pub tool_name: String,

    /// Description of what the tool does.
    pub description: String,

    /// Declared input schema.
    pub input_schema: InputSchema,

    /// Application route the tool calls, for resource tools.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<Endpoint>,
}

impl ToolDescriptor {
    /// Create a descriptor without an endpoint.
    pub fn new(
        class_name: impl Into<String>,
        tool_name: impl Into<String>,
        description: impl Into<String>,
        input_schema: InputSchema,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            tool_name: tool_name.into(),
            description: description.into(),
            input_schema,
            endpoint: None,
        }
    }

    /// Bind the descriptor to an application route.
    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Check that a loaded descriptor is usable.
    pub fn validate(&self) -> Result<(), String> {
        if self.class_name.is_empty() {
            return Err("class_name cannot be empty".to_string());
        }
        if self.tool_name.is_empty() {
            return Err("tool_name cannot be empty".to_string());
        }
        self.input_schema.validate()
    }

    /// Compute a signature hash over every field of the descriptor.
    pub fn compute_signature(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(format!("{self:?}").as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// HTTP method of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

/// The application route a scaffolded tool calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub method: HttpMethod,

    /// Path template, with `{id}` standing for the record identifier.
    pub path: String,

    /// Key the attributes are nested under in the request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_key: Option<String>,
}

impl Endpoint {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body_key: None,
        }
    }

    pub fn with_body_key(mut self, key: impl Into<String>) -> Self {
        self.body_key = Some(key.into());
        self
    }
}
