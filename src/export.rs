// Author: Dustin Pilgrim
// License: MIT

use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;

use crate::MangoError;
use crate::ast::{Document, SchemaMap};
use crate::manifest::ManifestEntry;
use crate::parser;
use crate::project::{Component, Project};

#[derive(Serialize)]
struct ProjectExport<'a> {
    tree: &'a [ManifestEntry],
    components: &'a IndexMap<String, Component>,
    warnings: Vec<String>,
}

fn to_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String, MangoError> {
    serde_json::to_string_pretty(value).map_err(|e| MangoError::ExportError {
        message: format!("Failed to serialize to JSON: {}", e),
        hint: None,
        code: Some(500),
    })
}

/// Export a parsed document to pretty-printed JSON.
///
/// Sections become objects in file order; values map directly
/// (`Int`/`Float` to numbers, `Null` to `null`).
pub fn document_to_json(doc: &Document) -> Result<String, MangoError> {
    to_pretty(doc)
}

/// Export a parsed schema to pretty-printed JSON.
///
/// Field declarations carry `name`, `type`, `modifiers` and `shape`;
/// permissions are either a role list or the raw conditional text.
pub fn schema_to_json(schema: &SchemaMap) -> Result<String, MangoError> {
    to_pretty(schema)
}

/// Export a whole project: the manifest as `tree` and every component
/// under its location.
///
/// # Examples
/// ```no_run
/// use mangolo::{Project, export};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let project = Project::load(".")?;
/// println!("{}", export::project_to_json(&project)?);
/// # Ok(())
/// # }
/// ```
pub fn project_to_json(project: &Project) -> Result<String, MangoError> {
    to_pretty(&ProjectExport {
        tree: &project.manifest,
        components: &project.components,
        warnings: project.warnings.iter().map(ToString::to_string).collect(),
    })
}

/// Read, parse and export a document-dialect file in one call.
pub fn export_document_file<P: AsRef<Path>>(path: P) -> Result<String, MangoError> {
    document_to_json(&parser::parse_document_file(path)?)
}

/// Read, parse and export a schema-dialect file in one call.
pub fn export_schema_file<P: AsRef<Path>>(path: P) -> Result<String, MangoError> {
    schema_to_json(&parser::parse_schema_file(path)?)
}
