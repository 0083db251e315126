// Author: Dustin Pilgrim
// License: MIT

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;

use crate::MangoError;
use crate::ast::{Document, SchemaMap};
use crate::error::Warning;
use crate::manifest::{self, ManifestEntry, MANIFEST_FILE};
use crate::parser;

/// Parsed content of one component file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ComponentData {
    Document(Document),
    Schema(SchemaMap),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Component {
    #[serde(rename = "type")]
    pub declared_type: String,
    pub data: ComponentData,
}

impl Component {
    pub fn as_document(&self) -> Option<&Document> {
        match &self.data {
            ComponentData::Document(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_schema(&self) -> Option<&SchemaMap> {
        match &self.data {
            ComponentData::Schema(schema) => Some(schema),
            _ => None,
        }
    }
}

/// A loaded project: the manifest plus every component it names, keyed by location.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub manifest: Vec<ManifestEntry>,
    pub components: IndexMap<String, Component>,
    pub warnings: Vec<Warning>,
}

impl Project {
    /// Load the project rooted at `dir`.
    ///
    /// Every manifest entry is loaded in order. Any missing file or parse
    /// failure aborts the whole load; unsupported file types and malformed
    /// manifest lines only add warnings.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self, MangoError> {
        let root = expand_home(dir.as_ref())?;

        if !root.is_dir() {
            return Err(MangoError::FileError {
                message: "Project directory does not exist".into(),
                path: root.to_string_lossy().to_string(),
                hint: Some("Pass an existing directory with --project".into()),
                code: Some(302),
            });
        }

        let manifest_path = root.join(MANIFEST_FILE);
        if !manifest_path.is_file() {
            return Err(MangoError::FileError {
                message: format!("{} not found in project directory", MANIFEST_FILE),
                path: manifest_path.to_string_lossy().to_string(),
                hint: Some(format!("Create a {} listing '<location> <type>' per line", MANIFEST_FILE)),
                code: Some(303),
            });
        }

        tracing::info!(path = %manifest_path.display(), "reading project structure");
        let manifest = manifest::parse_file(&manifest_path)?;
        let mut warnings = manifest.warnings;
        let mut components = IndexMap::new();

        for entry in &manifest.entries {
            tracing::info!(
                priority = entry.priority,
                declared_type = %entry.declared_type,
                location = %entry.location,
                "processing component"
            );
            let path = root.join(&entry.location);

            let data = match path.extension().and_then(|ext| ext.to_str()) {
                Some("mango") => ComponentData::Document(parser::parse_document_file(&path)?),
                Some("slice") => {
                    let (schema, schema_warnings) = parser::parse_schema_file_with_warnings(&path)?;
                    warnings.extend(schema_warnings);
                    ComponentData::Schema(schema)
                }
                _ => {
                    let message = format!("unsupported file type for '{}'", entry.location);
                    tracing::warn!(location = %entry.location, "{}", message);
                    warnings.push(Warning::new(message, None).in_file(Some(&entry.location)));
                    continue;
                }
            };

            components.insert(
                entry.location.clone(),
                Component { declared_type: entry.declared_type.clone(), data },
            );
        }

        tracing::debug!(components = components.len(), warnings = warnings.len(), "project loaded");

        Ok(Self {
            root,
            manifest: manifest.entries,
            components,
            warnings,
        })
    }

    pub fn component(&self, location: &str) -> Option<&Component> {
        self.components.get(location)
    }

    /// Components in manifest order.
    pub fn documents(&self) -> impl Iterator<Item = (&str, &Document)> {
        self.components
            .iter()
            .filter_map(|(loc, c)| c.as_document().map(|doc| (loc.as_str(), doc)))
    }

    pub fn schemas(&self) -> impl Iterator<Item = (&str, &SchemaMap)> {
        self.components
            .iter()
            .filter_map(|(loc, c)| c.as_schema().map(|schema| (loc.as_str(), schema)))
    }
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_home(path: &Path) -> Result<PathBuf, MangoError> {
    let raw = path.to_string_lossy();
    match raw.strip_prefix("~/") {
        Some(rest) => {
            let home = dirs::home_dir().ok_or_else(|| MangoError::FileError {
                message: "Could not determine home directory for ~ expansion".into(),
                path: raw.to_string(),
                hint: Some("Set HOME or use an absolute path".into()),
                code: Some(300),
            })?;
            Ok(home.join(rest))
        }
        None => Ok(path.to_path_buf()),
    }
}
