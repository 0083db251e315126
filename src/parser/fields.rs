use once_cell::sync::Lazy;
use regex::Regex;

use super::*;
use crate::lexer::{coerce, column_of, find_top_level, matching_close, split_top_level, split_whitespace_top_level, LogicalLine};

/// `name(params)`, where params is everything up to the final `)`.
static CALL_FORM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^([A-Za-z_][A-Za-z0-9_]*)\((.*)\)$").expect("valid call-form regex")
});

/// Parse the `[object]` section: one `name: type modifiers...` declaration per line.
pub(super) fn parse_object_section(lines: &[LogicalLine]) -> Result<Vec<FieldDeclaration>, MangoError> {
    lines.iter().map(parse_field).collect()
}

fn parse_field(line: &LogicalLine) -> Result<FieldDeclaration, MangoError> {
    let text = line.text.as_str();

    let Some(colon) = text.find(':') else {
        return Err(MangoError::parse(
            "invalid field definition, missing colon",
            line.line,
            line.column,
            210,
        )
        .with_hint("Fields are declared as 'name: type modifiers...'"));
    };

    let name = text[..colon].trim();
    if name.is_empty() {
        return Err(MangoError::parse("missing field name before ':'", line.line, line.column, 211));
    }

    let after = &text[colon + 1..];
    let type_def = after.trim();
    let type_start = colon + 1 + (after.len() - after.trim_start().len());
    let type_column = line.column + column_of(text, type_start) - 1;
    let mut tokens = split_whitespace_top_level(type_def).into_iter();

    let Some(field_type) = tokens.next() else {
        return Err(MangoError::parse(
            format!("missing type for field '{}'", name),
            line.line,
            line.column + column_of(text, colon) - 1,
            212,
        ));
    };

    let mut rest: Vec<&str> = tokens.collect();
    let shape = classify(field_type, &mut rest)
        .map_err(|detail| MangoError::parse(
            format!("invalid type for field '{}': {}", name, detail),
            line.line,
            type_column,
            213,
        ))?;

    Ok(FieldDeclaration {
        name: name.to_string(),
        field_type: field_type.to_string(),
        modifiers: rest.into_iter().map(parse_modifier).collect(),
        shape,
        line: line.line,
    })
}

/// `required` -> flag, `min(0)` -> call with raw params.
pub(super) fn parse_modifier(token: &str) -> Modifier {
    match CALL_FORM.captures(token) {
        Some(caps) => Modifier::Call {
            name: caps[1].to_string(),
            params: caps[2].to_string(),
        },
        None => Modifier::Flag(token.to_string()),
    }
}

/// Work out the shape of a type token.
///
/// `object` and `enum` may take their group from the following token
/// (`object {a: int}`, `enum ("a", "b")`); that token is then removed from
/// `rest` so it is not mistaken for a modifier. `array<..>` and
/// `relation<..>` likewise absorb any detached `(...)` option groups.
fn classify(field_type: &str, rest: &mut Vec<&str>) -> Result<FieldShape, String> {
    let base_end = field_type.find(['<', '(', '{']).unwrap_or(field_type.len());
    let base = &field_type[..base_end];
    let suffix = &field_type[base_end..];

    match base {
        "object" => {
            let group = match take_group(suffix, rest, '{') {
                Some(group) => group,
                None => return Ok(FieldShape::Object { fields: IndexMap::new() }),
            };
            let interior = group_interior(&group)?;
            let mut fields = IndexMap::new();
            for piece in split_top_level(interior, ',') {
                let piece = piece.trim();
                if piece.is_empty() {
                    continue;
                }
                let Some(colon) = find_top_level(piece, ':') else {
                    return Err(format!("nested field '{}' is missing ':'", piece));
                };
                fields.insert(piece[..colon].trim().to_string(), piece[colon + 1..].trim().to_string());
            }
            Ok(FieldShape::Object { fields })
        }
        "enum" => {
            let group = match take_group(suffix, rest, '(') {
                Some(group) => group,
                None => return Ok(FieldShape::Scalar),
            };
            let values = split_top_level(group_interior(&group)?, ',')
                .into_iter()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(coerce)
                .collect();
            Ok(FieldShape::Enum { values })
        }
        "array" | "relation" if suffix.starts_with('<') => {
            let close = matching_close(suffix, 0)
                .ok_or_else(|| format!("unterminated '<' in '{}'", field_type))?;
            let inner = suffix[1..close].trim().to_string();
            let mut options = parse_option_groups(&suffix[close + 1..])?;
            while rest.first().is_some_and(|t| t.starts_with('(')) {
                options.extend(parse_option_groups(rest.remove(0))?);
            }
            if base == "array" {
                Ok(FieldShape::Array { item_type: inner, options })
            } else {
                Ok(FieldShape::Relation { target: inner, options })
            }
        }
        _ => Ok(FieldShape::Scalar),
    }
}

/// The `open`-delimited group attached to the type token, or else a following
/// token that is such a group.
fn take_group(suffix: &str, rest: &mut Vec<&str>, open: char) -> Option<String> {
    if suffix.starts_with(open) {
        return Some(suffix.to_string());
    }
    if suffix.is_empty() && rest.first().is_some_and(|t| t.starts_with(open)) {
        return Some(rest.remove(0).to_string());
    }
    None
}

fn group_interior(group: &str) -> Result<&str, String> {
    match matching_close(group, 0) {
        Some(end) if group[end + 1..].trim().is_empty() => Ok(&group[1..end]),
        Some(end) => Err(format!("unexpected text '{}' after group", &group[end + 1..])),
        None => Err(format!("unterminated group '{}'", group)),
    }
}

/// Parse `(a(1), b)(c)` into `{a: 1, b: true, c: true}`.
fn parse_option_groups(text: &str) -> Result<IndexMap<String, Value>, String> {
    let mut options = IndexMap::new();
    let mut remaining = text.trim_start();

    while !remaining.is_empty() {
        if !remaining.starts_with('(') {
            return Err(format!("unexpected text '{}' after type", remaining));
        }
        let close = matching_close(remaining, 0)
            .ok_or_else(|| format!("unterminated group '{}'", remaining))?;

        for item in split_top_level(&remaining[1..close], ',') {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            match parse_modifier(item) {
                Modifier::Call { name, params } => {
                    options.insert(name, coerce(params.trim()));
                }
                Modifier::Flag(name) => {
                    options.insert(name, Value::Bool(true));
                }
            }
        }
        remaining = remaining[close + 1..].trim_start();
    }

    Ok(options)
}
