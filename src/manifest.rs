// Author: Dustin Pilgrim
// License: MIT

use std::path::Path;

use serde::Serialize;

use crate::MangoError;
use crate::error::Warning;
use crate::lexer::{strip_comment, CommentStyle};
use crate::parser::read_source;

/// File name of the manifest at the root of every project.
pub const MANIFEST_FILE: &str = "mangolo.tree";

/// One accepted manifest line: `<location> <declared_type>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    /// 1-based position among accepted entries.
    pub priority: usize,
    pub location: String,
    pub declared_type: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    pub entries: Vec<ManifestEntry>,
    pub warnings: Vec<Warning>,
}

/// Parse manifest text. Malformed lines are skipped with a warning; this never fails.
pub fn parse(input: &str) -> Manifest {
    parse_inner(input, None)
}

/// Read and parse a manifest file.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Manifest, MangoError> {
    let path = path.as_ref();
    let content = read_source(path)?;
    let path_str = path.to_string_lossy();
    Ok(parse_inner(&content, Some(&path_str)))
}

fn parse_inner(input: &str, file_path: Option<&str>) -> Manifest {
    let mut manifest = Manifest::default();

    for (idx, raw) in input.lines().enumerate() {
        let line = strip_comment(raw, CommentStyle::FirstHash).trim();
        if line.is_empty() {
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let [location, declared_type] = tokens.as_slice() else {
            let message = format!(
                "invalid manifest entry '{}': expected '<location> <type>', found {} token(s)",
                line,
                tokens.len()
            );
            tracing::warn!(line = idx + 1, file = file_path.unwrap_or("<input>"), "{}", message);
            manifest.warnings.push(Warning::new(message, Some(idx + 1)).in_file(file_path));
            continue;
        };

        manifest.entries.push(ManifestEntry {
            priority: manifest.entries.len() + 1,
            location: location.to_string(),
            declared_type: declared_type.to_string(),
        });
    }

    manifest
}
