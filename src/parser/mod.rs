// Author: Dustin Pilgrim
// License: MIT

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::MangoError;
use crate::ast::{
    Document, FieldDeclaration, FieldShape, IndexDefinition, Modifier, Permission, SchemaMap,
    SchemaSection, ValidationRule, Value, GLOBAL_SECTION,
};
use crate::error::Warning;
use crate::lexer::coerce;

mod document;
mod fields;
mod schema;
mod value;

pub use document::DocumentParser;
pub use schema::SchemaParser;
pub use value::{parse_array, parse_literal, parse_object};

/// `[name]` on a line of its own. Names may not contain brackets, quotes or commas,
/// so a bare array literal is never mistaken for a header.
static SECTION_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\[\s*([^\[\]"',]+?)\s*\]$"#).expect("valid section header regex")
});

pub(crate) fn section_header(text: &str) -> Option<&str> {
    SECTION_HEADER
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Parse document-dialect text. `file_path` is only used for error reporting.
pub fn parse_document(input: &str, file_path: Option<&str>) -> Result<Document, MangoError> {
    DocumentParser::new(file_path).parse(input)
}

/// Read a whole document-dialect file and parse it.
pub fn parse_document_file<P: AsRef<Path>>(path: P) -> Result<Document, MangoError> {
    let path_str = path.as_ref().to_string_lossy().to_string();
    let content = read_source(path.as_ref())?;
    parse_document(&content, Some(&path_str))
}

/// Parse schema-dialect text, discarding warnings (they are still logged).
pub fn parse_schema(input: &str, file_path: Option<&str>) -> Result<SchemaMap, MangoError> {
    SchemaParser::new(file_path).parse(input)
}

/// Parse schema-dialect text and hand back the structural warnings as well.
pub fn parse_schema_with_warnings(
    input: &str,
    file_path: Option<&str>,
) -> Result<(SchemaMap, Vec<Warning>), MangoError> {
    let mut parser = SchemaParser::new(file_path);
    let schema = parser.parse(input)?;
    Ok((schema, parser.into_warnings()))
}

/// Read a whole schema-dialect file and parse it.
pub fn parse_schema_file<P: AsRef<Path>>(path: P) -> Result<SchemaMap, MangoError> {
    parse_schema_file_with_warnings(path).map(|(schema, _)| schema)
}

pub fn parse_schema_file_with_warnings<P: AsRef<Path>>(
    path: P,
) -> Result<(SchemaMap, Vec<Warning>), MangoError> {
    let path_str = path.as_ref().to_string_lossy().to_string();
    let content = read_source(path.as_ref())?;
    parse_schema_with_warnings(&content, Some(&path_str))
}

pub(crate) fn read_source(path: &Path) -> Result<String, MangoError> {
    fs::read_to_string(path).map_err(|e| MangoError::FileError {
        message: format!("Failed to read file: {}", e),
        path: path.to_string_lossy().to_string(),
        hint: Some("Check that the file exists and is readable".into()),
        code: Some(301),
    })
}
