// Author: Dustin Pilgrim
// License: MIT

//! Typed access to parsed documents.
//!
//! Paths are dotted: `section.key`, optionally followed by more segments that
//! descend into inline objects (`server.limits.max`). A path with a single
//! segment addresses the `global` section.

use indexmap::IndexMap;

use crate::ast::{Document, Value, GLOBAL_SECTION};
use crate::MangoError;

mod access;
mod conversion;
mod validation;

/// Split a dotted path into `(section, key, rest)`.
fn split_path(path: &str) -> (&str, &str, Vec<&str>) {
    let mut segments = path.split('.').map(str::trim);
    match (segments.next(), segments.next()) {
        (Some(key), None) => (GLOBAL_SECTION, key, Vec::new()),
        (Some(section), Some(key)) => (section, key, segments.collect()),
        _ => (GLOBAL_SECTION, "", Vec::new()),
    }
}

/// The segment as written, then its snake_case and kebab-case spellings.
fn key_variants(segment: &str) -> Vec<String> {
    let mut out = vec![segment.to_string()];
    for variant in [segment.replace('-', "_"), segment.replace('_', "-")] {
        if !out.contains(&variant) {
            out.push(variant);
        }
    }
    out
}

/// Look a key up in a map, accepting `snake_case`/`kebab-case` spellings.
fn lookup<'m, V>(map: &'m IndexMap<String, V>, segment: &str) -> Option<&'m V> {
    key_variants(segment).iter().find_map(|k| map.get(k.as_str()))
}

fn not_found(path: &str) -> MangoError {
    MangoError::TypeError {
        message: format!("Path '{}' not found in document", path),
        hint: Some("Check the section name and key; a path without a dot looks in [global]".into()),
        code: Some(304),
    }
}

#[cfg(test)]
mod tests;
