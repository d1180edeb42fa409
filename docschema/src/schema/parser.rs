use crate::error::Result;
use super::naming::CollectionNaming;
use super::types::{ExtraFields, FieldDefinition, SchemaDefinition};
use serde::Deserialize;
use std::path::Path;

/// Top-level layout of a schema declaration file
#[derive(Debug, Deserialize)]
struct SchemaFile {
    #[serde(default)]
    collections: Vec<SchemaDeclaration>,
}

#[derive(Debug, Deserialize)]
struct SchemaDeclaration {
    type_name: String,
    /// Explicit collection name; falls back to the naming table
    #[serde(default)]
    collection: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    extra: ExtraFields,
    #[serde(default)]
    fields: Vec<FieldDefinition>,
}

/// Parse a schema declaration YAML file into schema definitions, in file order
pub fn parse_schema(path: &Path) -> Result<Vec<SchemaDefinition>> {
    let content = std::fs::read_to_string(path)?;
    parse_schema_str(&content)
}

/// Parse schema declaration YAML using the standard naming table
pub fn parse_schema_str(content: &str) -> Result<Vec<SchemaDefinition>> {
    parse_schema_str_with(content, &CollectionNaming::standard())
}

pub fn parse_schema_str_with(
    content: &str,
    naming: &CollectionNaming,
) -> Result<Vec<SchemaDefinition>> {
    let file: SchemaFile = serde_yaml::from_str(content)?;

    let schemas = file
        .collections
        .into_iter()
        .map(|decl| {
            let mut schema = SchemaDefinition::with_naming(decl.type_name, naming).extra(decl.extra);
            if let Some(collection) = decl.collection {
                schema = schema.collection(collection);
            }
            schema.description = decl.description;
            schema.fields = decl.fields;
            schema
        })
        .collect();

    Ok(schemas)
}
