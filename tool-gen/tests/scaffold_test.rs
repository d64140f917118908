//! Integration tests for generating tool files and loading them back.

use std::path::Path;

use mcpgen_tool_gen::{
    Attribute, FieldKind, FileStatus, GenerationRequest, OnConflict, ScaffoldConfig,
    ToolAutoloader, ToolDescriptor, ToolError, ToolGenerator, ToolRegistry,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn post_request() -> GenerationRequest {
    GenerationRequest::resource("post")
        .with_attribute_args(&["title:string", "views:integer", "published:boolean"])
        .unwrap()
}

fn read_descriptor(path: &Path) -> ToolDescriptor {
    let content = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[tokio::test]
async fn test_resource_generates_five_files() {
    let temp_dir = TempDir::new().unwrap();
    let generator = ToolGenerator::new(ScaffoldConfig::new(temp_dir.path()));

    let report = generator.generate(&post_request()).await.unwrap();
    assert_eq!(report.actions.len(), 5);
    assert!(report.actions.iter().all(|a| a.status == FileStatus::Create));

    let dir = temp_dir.path().join("app/tools/posts");
    let mut entries: Vec<_> = std::fs::read_dir(&dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    entries.sort();
    assert_eq!(
        entries,
        vec![
            "create_tool.json",
            "delete_tool.json",
            "index_tool.json",
            "show_tool.json",
            "update_tool.json",
        ]
    );

    let expected = vec![
        ("title".to_string(), FieldKind::String),
        ("views".to_string(), FieldKind::Integer),
        ("published".to_string(), FieldKind::Boolean),
    ];

    let create = read_descriptor(&dir.join("create_tool.json"));
    let create_fields: Vec<_> = create
        .input_schema
        .properties()
        .iter()
        .map(|p| (p.name.clone(), p.kind))
        .collect();
    assert_eq!(create_fields, expected);

    let update = read_descriptor(&dir.join("update_tool.json"));
    let update_fields: Vec<_> = update
        .input_schema
        .properties()
        .iter()
        .filter(|p| p.name != "id")
        .map(|p| (p.name.clone(), p.kind))
        .collect();
    assert_eq!(update_fields, expected);

    let index = read_descriptor(&dir.join("index_tool.json"));
    assert!(index.input_schema.is_empty_property());
}

#[tokio::test]
async fn test_single_tool_without_attributes() {
    let temp_dir = TempDir::new().unwrap();
    let generator = ToolGenerator::new(ScaffoldConfig::new(temp_dir.path()));

    generator
        .generate(&GenerationRequest::tool("weather_lookup"))
        .await
        .unwrap();

    let path = temp_dir.path().join("app/tools/weather_lookup.json");
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"EmptyProperty\""));

    let descriptor = read_descriptor(&path);
    assert_eq!(descriptor.class_name, "WeatherLookup");
    assert!(descriptor.input_schema.is_empty_property());
}

#[tokio::test]
async fn test_invalid_resource_name_leaves_no_output() {
    let temp_dir = TempDir::new().unwrap();
    let generator = ToolGenerator::new(ScaffoldConfig::new(temp_dir.path()));

    let request = GenerationRequest::resource("2cool")
        .with_attributes(vec![Attribute::new("title", "string")]);
    let result = generator.generate(&request).await;

    assert!(matches!(result, Err(ToolError::InvalidIdentifier { .. })));
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_write_failure_keeps_earlier_files() {
    let temp_dir = TempDir::new().unwrap();
    let generator = ToolGenerator::new(ScaffoldConfig::new(temp_dir.path()));

    // A directory where the fourth file should go makes that write fail.
    let blocker = temp_dir.path().join("app/tools/posts/update_tool.json");
    std::fs::create_dir_all(blocker.join("occupied")).unwrap();

    let err = generator.generate(&post_request()).await.unwrap_err();
    assert!(err.to_string().contains("update_tool.json"), "{err}");

    let dir = temp_dir.path().join("app/tools/posts");
    assert!(dir.join("show_tool.json").is_file());
    assert!(dir.join("index_tool.json").is_file());
    assert!(dir.join("create_tool.json").is_file());
    assert!(!dir.join("delete_tool.json").exists());
}

#[tokio::test]
async fn test_rerun_reports_identical_and_skip() {
    let temp_dir = TempDir::new().unwrap();
    let generator = ToolGenerator::new(ScaffoldConfig::new(temp_dir.path()));
    generator.generate(&post_request()).await.unwrap();

    let report = generator.generate(&post_request()).await.unwrap();
    assert!(report.actions.iter().all(|a| a.status == FileStatus::Identical));

    let skipping = ToolGenerator::new(
        ScaffoldConfig::new(temp_dir.path()).with_conflict_policy(OnConflict::Skip),
    );
    let request = GenerationRequest::resource("post")
        .with_attribute_args(&["title:string"])
        .unwrap();
    let report = skipping.generate(&request).await.unwrap();

    let statuses: Vec<_> = report.actions.iter().map(|a| a.status).collect();
    assert_eq!(
        statuses,
        vec![
            FileStatus::Identical,
            FileStatus::Identical,
            FileStatus::Skip,
            FileStatus::Skip,
            FileStatus::Identical,
        ]
    );
}

#[tokio::test]
async fn test_autoload_twice_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let config = ScaffoldConfig::new(temp_dir.path());
    let generator = ToolGenerator::new(config.clone());
    generator.generate(&post_request()).await.unwrap();
    generator
        .generate(&GenerationRequest::tool("ping"))
        .await
        .unwrap();

    let autoloader = ToolAutoloader::new(config.tools_root());
    let mut registry = ToolRegistry::new();

    let first = autoloader.load_into(&mut registry).await.unwrap();
    assert_eq!(first.added, 6);
    let names_after_first: Vec<_> = registry
        .list()
        .map(|t| t.descriptor.tool_name.clone())
        .collect();

    let second = autoloader.load_into(&mut registry).await.unwrap();
    assert_eq!(second.unchanged, 6);
    assert_eq!(second.added, 0);
    let names_after_second: Vec<_> = registry
        .list()
        .map(|t| t.descriptor.tool_name.clone())
        .collect();

    assert_eq!(names_after_first, names_after_second);
    assert!(registry.get_by_class("Posts::CreateTool").is_some());
    assert!(registry.contains("list_posts"));
}

#[tokio::test]
async fn test_autoload_rejects_conflicting_files() {
    let temp_dir = TempDir::new().unwrap();
    let config = ScaffoldConfig::new(temp_dir.path());
    ToolGenerator::new(config.clone())
        .generate(&GenerationRequest::tool("ping"))
        .await
        .unwrap();

    let original = config.tools_root().join("ping.json");
    std::fs::create_dir_all(config.tools_root().join("copies")).unwrap();
    std::fs::copy(&original, config.tools_root().join("copies/ping.json")).unwrap();

    let mut registry = ToolRegistry::new();
    let result = ToolAutoloader::new(config.tools_root())
        .load_into(&mut registry)
        .await;
    assert!(matches!(result, Err(ToolError::DuplicateTool { .. })));
}
