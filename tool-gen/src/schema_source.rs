//! Model introspection.
//!
//! When a resource is generated without explicit attributes, its fields can
//! come from a `SchemaSource`. `SchemaFile` reads them from a Rails
//! `db/schema.rb` dump.

use std::collections::HashMap;
use std::path::Path;

use tokio::fs;
use tracing::debug;

use crate::error::{Result, StorageError, ToolError};
use crate::naming::ResourceNames;
use crate::spec::Attribute;

/// Columns maintained by the framework that tools should not set.
const MANAGED_COLUMNS: &[&str] = &["id", "created_at", "updated_at"];

/// Provides the declared fields of a resource.
pub trait SchemaSource {
    /// Fields of the resource in declaration order, or `None` if the
    /// resource is unknown.
    fn attributes_for(&self, resource: &ResourceNames) -> Option<Vec<Attribute>>;
}

/// Table definitions parsed from a schema dump.
#[derive(Debug, Clone, Default)]
pub struct SchemaFile {
    tables: HashMap<String, Vec<Attribute>>,
}

impl SchemaFile {
    /// Read and parse a schema file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| StorageError::ReadFile(format!("{}: {e}", path.display())))?;
        let schema = Self::parse(&content)?;
        debug!("Parsed {} tables from {}", schema.tables.len(), path.display());
        Ok(schema)
    }

    /// Parse schema text.
    pub fn parse(content: &str) -> Result<Self> {
        let table_re = regex_lite::Regex::new(r#"^\s*create_table\s+"([^"]+)""#)
            .map_err(|e| ToolError::Schema(e.to_string()))?;
        let column_re = regex_lite::Regex::new(r#"^\s*t\.(\w+)\s+"([^"]+)""#)
            .map_err(|e| ToolError::Schema(e.to_string()))?;
        let end_re =
            regex_lite::Regex::new(r"^\s*end\b").map_err(|e| ToolError::Schema(e.to_string()))?;

        let mut tables = HashMap::new();
        let mut current: Option<(String, Vec<Attribute>)> = None;

        for (line_no, line) in content.lines().enumerate() {
            if let Some(caps) = table_re.captures(line) {
                if let Some((table, _)) = &current {
                    return Err(ToolError::Schema(format!(
                        "line {}: table {table} is not closed",
                        line_no + 1
                    )));
                }
                current = Some((caps[1].to_string(), Vec::new()));
            } else if let Some((_, columns)) = current.as_mut() {
                if let Some(caps) = column_re.captures(line) {
                    let (declared_type, name) = (&caps[1], &caps[2]);
                    if declared_type != "index" && !MANAGED_COLUMNS.contains(&name) {
                        columns.push(Attribute::new(name, declared_type));
                    }
                } else if end_re.is_match(line) {
                    if let Some((table, columns)) = current.take() {
                        tables.insert(table, columns);
                    }
                }
            }
        }

        if let Some((table, _)) = current {
            return Err(ToolError::Schema(format!("table {table} is not closed")));
        }

        Ok(Self { tables })
    }

    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }
}

impl SchemaSource for SchemaFile {
    fn attributes_for(&self, resource: &ResourceNames) -> Option<Vec<Attribute>> {
        self.tables.get(resource.table_name()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SCHEMA: &str = r#"
ActiveRecord::Schema[7.1].define(version: 2024_05_01_000000) do
  create_table "posts", force: :cascade do |t|
    t.string "title"
    t.integer "views", default: 0
    t.boolean "published", default: false
    t.datetime "created_at", null: false
    t.datetime "updated_at", null: false
    t.index ["title"], name: "index_posts_on_title"
  end

  create_table "admin_users", force: :cascade do |t|
    t.string "email", null: false
  end
end
"#;

    #[test]
    fn test_parse_tables() {
        let schema = SchemaFile::parse(SCHEMA).unwrap();

        let posts = schema
            .attributes_for(&ResourceNames::new("post").unwrap())
            .unwrap();
        assert_eq!(
            posts,
            vec![
                Attribute::new("title", "string"),
                Attribute::new("views", "integer"),
                Attribute::new("published", "boolean"),
            ]
        );

        let users = schema
            .attributes_for(&ResourceNames::new("admin/user").unwrap())
            .unwrap();
        assert_eq!(users, vec![Attribute::new("email", "string")]);
    }

    #[test]
    fn test_unknown_table() {
        let schema = SchemaFile::parse(SCHEMA).unwrap();
        assert!(
            schema
                .attributes_for(&ResourceNames::new("comment").unwrap())
                .is_none()
        );
    }

    #[test]
    fn test_unclosed_table() {
        let result = SchemaFile::parse("create_table \"posts\" do |t|\n  t.string \"title\"\n");
        assert!(matches!(result, Err(ToolError::Schema(_))));
    }
}
