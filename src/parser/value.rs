use super::*;
use crate::lexer::{coerce, find_top_level, matching_close, scan_balance, split_top_level, strip_quotes, Balance, Brackets};

/// Parse any self-contained literal: an array, an inline object, or a scalar.
///
/// `line`/`column` locate the start of the literal and are used for errors.
pub fn parse_literal(text: &str, line: usize, column: usize) -> Result<Value, MangoError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Value::Null);
    }
    match text.as_bytes()[0] {
        b'[' => parse_array(text, line, column),
        b'{' => parse_object(text, line, column),
        _ => Ok(coerce(text)),
    }
}

/// Parse `[item, item, ...]`. Items may be scalars, nested arrays or inline objects.
pub fn parse_array(text: &str, line: usize, column: usize) -> Result<Value, MangoError> {
    let text = text.trim();
    let interior = enclosed(text, '[', ']')
        .map_err(|detail| array_error(detail, line, column))?;

    let mut items = Vec::new();
    for piece in split_top_level(interior, ',') {
        let item = piece.trim();
        if item.is_empty() {
            continue;
        }
        items.push(parse_literal(item, line, column)?);
    }
    Ok(Value::Array(items))
}

/// Parse `{key: value, ...}`. Keys lose their quotes; values are literals.
pub fn parse_object(text: &str, line: usize, column: usize) -> Result<Value, MangoError> {
    let text = text.trim();
    let interior = enclosed(text, '{', '}')
        .map_err(|detail| object_error(detail, line, column))?;

    let mut entries = IndexMap::new();
    for piece in split_top_level(interior, ',') {
        let entry = piece.trim();
        if entry.is_empty() {
            continue;
        }
        let Some(colon) = find_top_level(entry, ':') else {
            return Err(object_error(format!("expected 'key: value', found '{}'", entry), line, column));
        };
        let key = strip_quotes(entry[..colon].trim());
        if key.is_empty() {
            return Err(object_error(format!("missing key in '{}'", entry), line, column));
        }
        let value = parse_literal(&entry[colon + 1..], line, column)?;
        entries.insert(key.to_string(), value);
    }
    Ok(Value::Object(entries))
}

/// Check that `text` is exactly one balanced `open ... close` group and return its interior.
fn enclosed(text: &str, open: char, close: char) -> Result<&str, String> {
    if !text.starts_with(open) {
        return Err(format!("expected '{}'", open));
    }
    match scan_balance(text, Brackets::ALL) {
        Balance::Balanced => {}
        Balance::Open { .. } => return Err(format!("missing closing '{}'", close)),
        Balance::Broken { found, .. } => return Err(format!("unmatched '{}'", found)),
    }
    match matching_close(text, 0) {
        Some(end) if end + close.len_utf8() == text.len() => Ok(&text[1..end]),
        Some(end) => Err(format!("unexpected content '{}' after '{}'", text[end + 1..].trim(), close)),
        None => Err(format!("missing closing '{}'", close)),
    }
}

fn array_error(detail: impl std::fmt::Display, line: usize, column: usize) -> MangoError {
    MangoError::parse(format!("invalid array syntax: {}", detail), line, column, 201)
}

fn object_error(detail: impl std::fmt::Display, line: usize, column: usize) -> MangoError {
    MangoError::parse(format!("invalid object syntax: {}", detail), line, column, 202)
}
