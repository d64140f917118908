use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use mcpgen_tool_gen::{
    FileAction, FileStatus, GenerationReport, GenerationRequest, GeneratorKind, InputSchema,
    OnConflict, ScaffoldConfig, SchemaFile, ToolAutoloader, ToolGenerator, ToolRegistry,
};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mcpgen", version, about = "Scaffold MCP tool definitions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project root that generated paths are relative to.
    #[arg(long, global = true, env = "MCPGEN_ROOT", default_value = ".")]
    root: PathBuf,

    /// Configuration file (defaults to <root>/mcpgen.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Overwrite files that already exist.
    #[arg(long, global = true, conflicts_with = "skip")]
    force: bool,

    /// Keep files that already exist.
    #[arg(long, global = true)]
    skip: bool,

    /// Report what would happen without writing anything.
    #[arg(long, global = true)]
    pretend: bool,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a single tool.
    Tool {
        /// Tool name, e.g. `weather_lookup` or `admin/WeatherLookup`.
        name: String,

        /// Attributes as `name:type`.
        #[arg(value_name = "ATTR")]
        attributes: Vec<String>,
    },

    /// Generate index, show, create, update and delete tools for a resource.
    Resource {
        /// Singular resource name, e.g. `post`.
        name: String,

        /// Attributes as `name:type`.
        #[arg(value_name = "ATTR")]
        attributes: Vec<String>,

        /// Read attributes from the schema file when none are given.
        #[arg(long)]
        from_schema: bool,
    },

    /// Remove the files a generate command would write.
    Destroy {
        #[arg(value_enum)]
        kind: KindArg,

        name: String,
    },

    /// Load every tool file and list the registry.
    List {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Tool,
    Resource,
}

impl From<KindArg> for GeneratorKind {
    fn from(v: KindArg) -> Self {
        match v {
            KindArg::Tool => GeneratorKind::Tool,
            KindArg::Resource => GeneratorKind::Resource,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = load_config(&cli).await?;

    match cli.command {
        Commands::Tool { name, attributes } => {
            let request =
                GenerationRequest::tool(name).with_attribute_args(attributes.as_slice())?;
            let report = ToolGenerator::new(config).generate(&request).await?;
            print_report(&report);
        }
        Commands::Resource {
            name,
            attributes,
            from_schema,
        } => {
            let request =
                GenerationRequest::resource(name).with_attribute_args(attributes.as_slice())?;
            let mut generator = ToolGenerator::new(config.clone());
            if from_schema {
                let schema_path = config.schema_file();
                let schema = SchemaFile::load(&schema_path)
                    .await
                    .with_context(|| format!("reading schema {}", schema_path.display()))?;
                generator = generator.with_schema_source(schema);
            }
            let report = generator.generate(&request).await?;
            print_report(&report);
        }
        Commands::Destroy { kind, name } => {
            let request = GenerationRequest {
                kind: kind.into(),
                name,
                attributes: Vec::new(),
            };
            let report = ToolGenerator::new(config).destroy(&request).await?;
            print_report(&report);
        }
        Commands::List { json } => {
            let mut registry = ToolRegistry::new();
            ToolAutoloader::new(config.tools_root())
                .load_into(&mut registry)
                .await
                .context("loading tools")?;
            if json {
                print_registry_json(&registry)?;
            } else {
                print_registry(&registry);
            }
        }
    }

    Ok(())
}

async fn load_config(cli: &Cli) -> Result<ScaffoldConfig> {
    let mut config = match &cli.config {
        Some(path) => ScaffoldConfig::load(path, &cli.root)
            .await
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ScaffoldConfig::discover(&cli.root).await?,
    };

    if cli.force {
        config.on_conflict = OnConflict::Overwrite;
    } else if cli.skip {
        config.on_conflict = OnConflict::Skip;
    }
    config.pretend = cli.pretend;

    tracing::debug!(
        "Using project root {} with tools in {}",
        config.project_root.display(),
        config.tools_dir.display()
    );

    Ok(config)
}

fn print_report(report: &GenerationReport) {
    for action in &report.actions {
        print_action(action);
    }
    for warning in &report.warnings {
        eprintln!("{} {warning}", "warning:".yellow());
    }
}

fn print_action(action: &FileAction) {
    let label = format!("{:>12}", action.status.label());
    let label = match action.status {
        FileStatus::Create | FileStatus::Force => label.green().to_string(),
        FileStatus::Skip | FileStatus::Missing => label.yellow().to_string(),
        FileStatus::Identical => label.blue().to_string(),
        FileStatus::Remove => label.red().to_string(),
    };
    println!("{label}  {}", action.path.display());
}

fn describe_schema(schema: &InputSchema) -> String {
    if schema.is_empty_property() {
        return "EmptyProperty".to_string();
    }
    schema
        .properties()
        .iter()
        .map(|p| format!("{}:{}", p.name, p.kind.to_json_type()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_registry(registry: &ToolRegistry) {
    if registry.is_empty() {
        println!("No tools found.");
        return;
    }

    for tool in registry.list() {
        println!(
            "{}  {}  ({})",
            tool.descriptor.tool_name.bold(),
            tool.descriptor.class_name,
            describe_schema(&tool.descriptor.input_schema)
        );
    }
}

fn print_registry_json(registry: &ToolRegistry) -> Result<()> {
    let tools: Vec<_> = registry
        .list()
        .map(|tool| {
            serde_json::json!({
                "name": tool.descriptor.tool_name,
                "class_name": tool.descriptor.class_name,
                "description": tool.descriptor.description,
                "inputSchema": tool.descriptor.input_schema.to_json_schema(),
                "source": tool.source.display().to_string(),
            })
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&tools)?);
    Ok(())
}
