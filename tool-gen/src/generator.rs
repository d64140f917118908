//! Tool file generation.
//!
//! The `ToolGenerator` turns a `GenerationRequest` into rendered files and
//! hands them to the `ToolFileStore`. Every file is rendered before the
//! first one is written, so invalid names and render failures never leave
//! partial output behind. Write failures can: files written earlier in the
//! same run stay on disk.

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::autoload::ToolAutoloader;
use crate::config::ScaffoldConfig;
use crate::error::{Result, ToolError};
use crate::naming::{ResourceNames, ToolNames};
use crate::schema_source::SchemaSource;
use crate::spec::Attribute;
use crate::storage::{FileAction, PlannedFile, ToolFileStore};
use crate::template::{self, ResourceTemplate, TOOL_FILE_EXTENSION};
use crate::tool::ToolDescriptor;

/// Which generator to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorKind {
    /// One standalone tool file.
    Tool,
    /// The five CRUD tool files for a resource.
    Resource,
}

/// A request to generate (or destroy) tool files.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub kind: GeneratorKind,

    /// Tool or resource name, optionally namespaced.
    pub name: String,

    /// Attributes in declaration order.
    pub attributes: Vec<Attribute>,
}

impl GenerationRequest {
    /// Request a standalone tool.
    pub fn tool(name: impl Into<String>) -> Self {
        Self {
            kind: GeneratorKind::Tool,
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// Request a resource tool set.
    pub fn resource(name: impl Into<String>) -> Self {
        Self {
            kind: GeneratorKind::Resource,
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// Set the attributes.
    pub fn with_attributes(mut self, attributes: Vec<Attribute>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Parse and set attributes from `name:type` arguments.
    pub fn with_attribute_args<S: AsRef<str>>(self, args: &[S]) -> Result<Self> {
        Ok(self.with_attributes(Attribute::parse_all(args)?))
    }
}

/// Files rendered for a request, not yet written.
#[derive(Debug, Clone)]
pub struct GenerationPlan {
    pub files: Vec<PlannedFile>,

    /// Descriptor rendered into each file, in the same order as `files`.
    pub descriptors: Vec<ToolDescriptor>,

    /// Non-fatal notes about the request.
    pub warnings: Vec<String>,
}

/// What a generate or destroy run did.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub actions: Vec<FileAction>,
    pub warnings: Vec<String>,
}

/// Generator for tool files.
pub struct ToolGenerator {
    config: ScaffoldConfig,

    /// Consulted for resource attributes when none are given.
    schema_source: Option<Box<dyn SchemaSource + Send + Sync>>,
}

impl ToolGenerator {
    /// Create a new generator.
    pub fn new(config: ScaffoldConfig) -> Self {
        Self {
            config,
            schema_source: None,
        }
    }

    /// Use a schema source for resources generated without attributes.
    pub fn with_schema_source(
        mut self,
        source: impl SchemaSource + Send + Sync + 'static,
    ) -> Self {
        self.schema_source = Some(Box::new(source));
        self
    }

    pub fn config(&self) -> &ScaffoldConfig {
        &self.config
    }

    /// Render every file for a request without touching the filesystem.
    pub fn plan(&self, request: &GenerationRequest) -> Result<GenerationPlan> {
        match request.kind {
            GeneratorKind::Tool => self.plan_tool(request),
            GeneratorKind::Resource => self.plan_resource(request),
        }
    }

    fn plan_tool(&self, request: &GenerationRequest) -> Result<GenerationPlan> {
        let names = ToolNames::new(&request.name)?;
        Attribute::check_columns(&request.attributes, &[])?;
        let path = self
            .config
            .tools_dir
            .join(format!("{}.{TOOL_FILE_EXTENSION}", names.file_path));
        let descriptor = template::single_tool(&names, &request.attributes);

        Ok(GenerationPlan {
            files: vec![Self::render_file(path, &descriptor)?],
            descriptors: vec![descriptor],
            warnings: Vec::new(),
        })
    }

    fn plan_resource(&self, request: &GenerationRequest) -> Result<GenerationPlan> {
        let names = ResourceNames::new(&request.name)?;
        let mut warnings = Vec::new();

        let attributes = if request.attributes.is_empty() {
            self.introspect(&names, &mut warnings)
        } else {
            request.attributes.clone()
        };
        Attribute::check_columns(&attributes, &[template::ID_PROPERTY])?;

        let dir = self.config.tools_dir.join(&names.plural_path);
        let descriptors: Vec<_> = ResourceTemplate::ALL
            .iter()
            .map(|template| template.build(&names, &attributes))
            .collect();
        let files = ResourceTemplate::ALL
            .iter()
            .zip(&descriptors)
            .map(|(template, descriptor)| {
                Self::render_file(dir.join(template.file_name()), descriptor)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(GenerationPlan {
            files,
            descriptors,
            warnings,
        })
    }

    fn introspect(&self, names: &ResourceNames, warnings: &mut Vec<String>) -> Vec<Attribute> {
        let found = self
            .schema_source
            .as_ref()
            .and_then(|source| source.attributes_for(names));

        match found {
            Some(attributes) => {
                debug!(
                    "Using {} attributes from table {}",
                    attributes.len(),
                    names.table_name()
                );
                attributes
            }
            None => {
                if self.schema_source.is_some() {
                    warnings.push(format!("No table {} found in schema", names.table_name()));
                }
                warnings.push(
                    "No attributes given: create and update tools have no attribute properties"
                        .to_string(),
                );
                Vec::new()
            }
        }
    }

    fn render_file(path: PathBuf, descriptor: &ToolDescriptor) -> Result<PlannedFile> {
        match template::render(descriptor) {
            Ok(contents) => Ok(PlannedFile { path, contents }),
            Err(source) => Err(ToolError::Render { path, source }),
        }
    }

    fn store(&self) -> ToolFileStore {
        ToolFileStore::new(&self.config.project_root)
            .with_conflict_policy(self.config.on_conflict)
            .pretend(self.config.pretend)
    }

    /// Refuse a plan whose tools are already declared by other files on disk.
    ///
    /// Files the plan would overwrite are not counted. Existing files that
    /// fail to load are left for the autoloader to report.
    async fn check_existing_tools(&self, plan: &GenerationPlan) -> Result<()> {
        let planned_paths: HashSet<PathBuf> = plan
            .files
            .iter()
            .map(|file| self.config.project_root.join(&file.path))
            .collect();

        for path in ToolAutoloader::new(self.config.tools_root()).discover()? {
            if planned_paths.contains(&path) {
                continue;
            }
            let existing = match ToolAutoloader::load_file(&path).await {
                Ok(existing) => existing,
                Err(err) => {
                    warn!("Ignoring unreadable tool file while generating: {err}");
                    continue;
                }
            };

            let clash = plan.files.iter().zip(&plan.descriptors).find(|(_, planned)| {
                planned.tool_name == existing.tool_name
                    || planned.class_name == existing.class_name
            });
            if let Some((file, planned)) = clash {
                let name = if planned.tool_name == existing.tool_name {
                    existing.tool_name
                } else {
                    existing.class_name
                };
                return Err(ToolError::DuplicateTool {
                    name,
                    first: path,
                    second: self.config.project_root.join(&file.path),
                });
            }
        }

        Ok(())
    }

    /// Render and write every file for a request.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationReport> {
        let plan = self.plan(request)?;
        self.check_existing_tools(&plan).await?;
        let actions = self.store().write_all(&plan.files).await?;

        info!("Generated {} tool files for {}", actions.len(), request.name);
        Ok(GenerationReport {
            actions,
            warnings: plan.warnings,
        })
    }

    /// Remove every file the matching generate run would write.
    pub async fn destroy(&self, request: &GenerationRequest) -> Result<GenerationReport> {
        let plan = self.plan(&GenerationRequest {
            kind: request.kind,
            name: request.name.clone(),
            attributes: Vec::new(),
        })?;
        let store = self.store();

        let mut actions = Vec::with_capacity(plan.files.len());
        for file in &plan.files {
            actions.push(store.remove(&file.path).await?);
        }

        if request.kind == GeneratorKind::Resource {
            let names = ResourceNames::new(&request.name)?;
            store
                .remove_empty_dir(&self.config.tools_dir.join(&names.plural_path))
                .await;
        }

        info!("Destroyed tool files for {}", request.name);
        Ok(GenerationReport {
            actions,
            warnings: Vec::new(),
        })
    }
}
