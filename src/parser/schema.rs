use super::*;
use crate::error::Warning;
use crate::lexer::{
    column_of, matching_close, merge_balanced, preprocess, scan_balance, split_top_level,
    strip_quotes, Balance, Brackets, CommentStyle, LogicalLine,
};

const CURLY: Brackets = Brackets { square: false, curly: true, round: false };

/// Section-dispatching parser for the schema dialect.
///
/// Structural warnings (content kept verbatim, skipped lines) are collected
/// on the parser and logged as they happen.
pub struct SchemaParser<'a> {
    file_path: Option<&'a str>,
    warnings: Vec<Warning>,
}

impl<'a> SchemaParser<'a> {
    pub fn new(file_path: Option<&'a str>) -> Self {
        Self { file_path, warnings: Vec::new() }
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }

    pub fn parse(&mut self, input: &str) -> Result<SchemaMap, MangoError> {
        self.parse_inner(input).map_err(|e| e.with_file_path(self.file_path))
    }

    fn parse_inner(&mut self, input: &str) -> Result<SchemaMap, MangoError> {
        let lines = merge_balanced(preprocess(input, CommentStyle::Unquoted), Brackets::ALL)?;

        let mut sections: IndexMap<String, Vec<LogicalLine>> = IndexMap::new();
        let mut current: Option<String> = None;

        for line in lines {
            if let Some(name) = section_header(&line.text) {
                tracing::debug!(section = name, line = line.line, "entering section");
                sections.entry(name.to_string()).or_default();
                current = Some(name.to_string());
                continue;
            }
            match &current {
                Some(name) => sections.entry(name.clone()).or_default().push(line),
                None => {
                    return Err(MangoError::parse("content outside of section", line.line, line.column, 220)
                        .with_hint("Start the file with a section header such as '[object]'"));
                }
            }
        }

        let mut schema = SchemaMap::new();
        for (name, content) in sections {
            let section = self.parse_section(&name, &content)?;
            schema.insert(name, section);
        }
        Ok(schema)
    }

    fn parse_section(&mut self, name: &str, lines: &[LogicalLine]) -> Result<SchemaSection, MangoError> {
        Ok(match name {
            "object" => SchemaSection::Object(fields::parse_object_section(lines)?),
            "indexes" => SchemaSection::Indexes(parse_indexes_section(lines)?),
            "permissions" => SchemaSection::Permissions(parse_permissions_section(lines)?),
            "validations" => SchemaSection::Validations(self.parse_validations_section(lines)?),
            _ => SchemaSection::Generic(self.parse_generic_section(name, lines)),
        })
    }

    fn warn(&mut self, message: String, line: usize) {
        tracing::warn!(line, file = self.file_path.unwrap_or("<input>"), "{}", message);
        self.warnings.push(Warning::new(message, Some(line)).in_file(self.file_path));
    }

    fn parse_validations_section(&mut self, lines: &[LogicalLine]) -> Result<Vec<ValidationRule>, MangoError> {
        let mut rules = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            let line = &lines[i];
            i += 1;

            let Some(header) = line.text.strip_prefix("rule ") else {
                tracing::debug!(line = line.line, "skipping non-rule line in [validations]");
                continue;
            };

            let name = header.split('{').next().unwrap_or_default().trim();
            if name.is_empty() {
                return Err(MangoError::parse("validation rule without a name", line.line, line.column, 230));
            }

            let mut block = line.text.clone();
            let mut opened = block.contains('{');
            let mut depth = curly_depth(&block, line)?;

            while i < lines.len() && (!opened || depth > 0) {
                let next = &lines[i];
                if !opened && !next.text.starts_with('{') {
                    break;
                }
                block.push(' ');
                block.push_str(&next.text);
                opened = true;
                depth = curly_depth(&block, next)?;
                i += 1;
            }

            if !opened {
                return Err(MangoError::parse(
                    format!("validation rule '{}' has no '{{ ... }}' body", name),
                    line.line,
                    line.column,
                    231,
                ));
            }
            if depth > 0 {
                return Err(MangoError::parse(
                    format!("unterminated block for validation rule '{}'", name),
                    line.line,
                    line.column,
                    102,
                ));
            }

            rules.push(extract_rule(name, &block, line.line));
        }

        Ok(rules)
    }

    fn parse_generic_section(&mut self, section: &str, lines: &[LogicalLine]) -> IndexMap<String, Value> {
        let mut entries = IndexMap::new();

        for line in lines {
            let text = line.text.as_str();
            match text.find(':') {
                Some(colon) => {
                    let value_text = text[colon + 1..].trim();
                    let column = line.column + column_of(text, colon + 1) - 1;
                    // Bracketed text that is not a valid literal stays a plain string.
                    let value = parse_literal(value_text, line.line, column)
                        .unwrap_or_else(|_| coerce(value_text));
                    entries.insert(text[..colon].trim().to_string(), value);
                }
                None => {
                    self.warn(format!("line kept verbatim in section [{}]: '{}'", section, text), line.line);
                    entries.insert(format!("line_{}", line.line), Value::String(text.to_string()));
                }
            }
        }

        entries
    }
}

/// `name: value` split for the structured sections.
fn split_entry<'t>(line: &'t LogicalLine, what: &str, code: u32) -> Result<(&'t str, &'t str, usize), MangoError> {
    let text = line.text.as_str();
    let Some(colon) = text.find(':') else {
        return Err(MangoError::parse(
            format!("invalid {} definition, missing colon", what),
            line.line,
            line.column,
            code,
        ));
    };
    let after = &text[colon + 1..];
    let start = colon + 1 + (after.len() - after.trim_start().len());
    let column = line.column + column_of(text, start) - 1;
    Ok((text[..colon].trim(), after.trim(), column))
}

fn parse_indexes_section(lines: &[LogicalLine]) -> Result<IndexMap<String, IndexDefinition>, MangoError> {
    let mut indexes = IndexMap::new();

    for line in lines {
        let (name, definition, column) = split_entry(line, "index", 240)?;

        let interior = match matching_close(definition, 0) {
            Some(end) if definition.starts_with('{') && end + 1 == definition.len() => &definition[1..end],
            _ => {
                return Err(MangoError::parse(
                    format!("invalid index definition for '{}': expected object definition", name),
                    line.line,
                    column,
                    241,
                )
                .with_hint("Indexes are declared as 'name: {fields: [\"a\"], unique: true}'"));
            }
        };

        let mut index = IndexDefinition::new();
        for part in split_top_level(interior, ',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let Some(colon) = part.find(':') else {
                return Err(MangoError::parse(
                    format!("invalid index definition for '{}': expected 'key: value', found '{}'", name, part),
                    line.line,
                    column,
                    242,
                ));
            };
            let key = strip_quotes(part[..colon].trim());
            let value = part[colon + 1..].trim();
            index.insert(key.to_string(), index_value(value));
        }
        indexes.insert(name.to_string(), index);
    }

    Ok(indexes)
}

/// Index values stay textual: arrays become lists of quote-stripped strings,
/// everything else a quote-stripped string.
fn index_value(text: &str) -> Value {
    if text.starts_with('[') && text.ends_with(']') {
        Value::Array(string_list(&text[1..text.len() - 1]).into_iter().map(Value::String).collect())
    } else {
        Value::String(strip_quotes(text).to_string())
    }
}

fn string_list(interior: &str) -> Vec<String> {
    split_top_level(interior, ',')
        .into_iter()
        .map(|item| strip_quotes(item.trim()).to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn parse_permissions_section(lines: &[LogicalLine]) -> Result<IndexMap<String, Permission>, MangoError> {
    let mut permissions = IndexMap::new();

    for line in lines {
        let (operation, roles, column) = split_entry(line, "permission", 250)?;

        let permission = if roles.starts_with('[') && roles.ends_with(']') {
            Permission::Roles(string_list(&roles[1..roles.len() - 1]))
        } else if roles.starts_with('{') && roles.ends_with('}') {
            Permission::Conditional(roles.to_string())
        } else {
            return Err(MangoError::parse(
                format!("invalid permission definition for '{}': expected array or object for roles", operation),
                line.line,
                column,
                251,
            ));
        };
        permissions.insert(operation.to_string(), permission);
    }

    Ok(permissions)
}

fn curly_depth(block: &str, line: &LogicalLine) -> Result<usize, MangoError> {
    match scan_balance(block, CURLY) {
        Balance::Balanced => Ok(0),
        Balance::Open { depth, .. } => Ok(depth),
        Balance::Broken { found, .. } => Err(MangoError::parse(
            format!("unmatched closing '{}'", found),
            line.line,
            line.column,
            101,
        )),
    }
}

const RULE_KEYS: [&str; 3] = ["condition:", "validate:", "message:"];

/// Pull `condition`, `validate` and `message` out of a `rule name { ... }` block.
///
/// Each value runs from its key to the next sub-key that follows it, or to
/// the closing brace.
fn extract_rule(name: &str, block: &str, line: usize) -> ValidationRule {
    let body = match block.find('{') {
        Some(open) => match matching_close(block, open) {
            Some(close) => &block[open + 1..close],
            None => &block[open + 1..],
        },
        None => "",
    };

    let positions: Vec<Option<usize>> = RULE_KEYS.iter().map(|key| body.find(key)).collect();

    let slice = |idx: usize| -> Option<String> {
        let start = positions[idx]? + RULE_KEYS[idx].len();
        let end = positions
            .iter()
            .flatten()
            .copied()
            .filter(|&p| p >= start)
            .min()
            .unwrap_or(body.len());
        Some(body[start..end].trim().trim_end_matches(',').trim().to_string())
    };

    ValidationRule {
        name: name.to_string(),
        condition: slice(0),
        validate: slice(1),
        message: slice(2).map(|m| strip_quotes(&m).to_string()),
        line,
    }
}
