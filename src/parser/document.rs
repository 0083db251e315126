use super::*;
use crate::lexer::{column_of, preprocess, scan_balance, unescape, unquote, Balance, Brackets, CommentStyle, LogicalLine};

/// A value whose text spans several lines, waiting for its terminator.
#[derive(Debug)]
struct Pending {
    key: String,
    buffer: String,
    line: usize,
    column: usize,
}

#[derive(Debug)]
enum Mode {
    Standard,
    /// Inside `"""…"""`.
    MultilineDouble(Pending),
    /// Inside `'''…'''`.
    MultilineSingle(Pending),
    /// Inside a `[` that has not been closed yet.
    MultilineList(Pending),
}

/// Line-driven parser for the document dialect.
///
/// Each instance owns its state (current section, mode, accumulator), so
/// independent files can be parsed on separate threads.
pub struct DocumentParser<'a> {
    file_path: Option<&'a str>,
    document: Document,
    section: String,
    mode: Mode,
}

impl<'a> DocumentParser<'a> {
    pub fn new(file_path: Option<&'a str>) -> Self {
        Self {
            file_path,
            document: Document::new(),
            section: GLOBAL_SECTION.to_string(),
            mode: Mode::Standard,
        }
    }

    pub fn parse(mut self, input: &str) -> Result<Document, MangoError> {
        let lines = preprocess(input, CommentStyle::FirstHash);
        for line in &lines {
            self.feed(line).map_err(|e| e.with_file_path(self.file_path))?;
        }
        self.finish()
    }

    fn feed(&mut self, line: &LogicalLine) -> Result<(), MangoError> {
        match std::mem::replace(&mut self.mode, Mode::Standard) {
            Mode::Standard => self.standard(line),
            Mode::MultilineDouble(pending) => self.multiline_string(pending, line, '"'),
            Mode::MultilineSingle(pending) => self.multiline_string(pending, line, '\''),
            Mode::MultilineList(pending) => self.multiline_list(pending, line),
        }
    }

    fn standard(&mut self, line: &LogicalLine) -> Result<(), MangoError> {
        let text = line.text.as_str();

        if let Some(name) = section_header(text) {
            tracing::debug!(section = name, line = line.line, "entering section");
            self.section = name.to_string();
            self.document.section_mut(name);
            return Ok(());
        }

        let Some(eq) = text.find('=') else {
            return Err(MangoError::parse("invalid line format", line.line, 1, 203)
                .with_hint("Expected a '[section]' header or a 'key = value' assignment"));
        };

        let key = text[..eq].trim();
        if key.is_empty() {
            return Err(MangoError::parse("missing key before '='", line.line, line.column, 204));
        }

        let raw = &text[eq + 1..];
        let value_text = raw.trim();
        let value_start = eq + 1 + (raw.len() - raw.trim_start().len());
        let column = line.column + column_of(text, value_start) - 1;

        let value = if value_text.is_empty() {
            Value::String(String::new())
        } else if let Some(s) = unquote(value_text) {
            Value::String(s)
        } else if let Some(quote) = triple_quote(value_text) {
            let marker = &value_text[..3];
            if value_text.len() > 6 && value_text.ends_with(marker) {
                Value::String(value_text[3..value_text.len() - 3].to_string())
            } else {
                let mut buffer = String::new();
                append_piece(&mut buffer, &value_text[3..]);
                let pending = Pending { key: key.to_string(), buffer, line: line.line, column };
                self.mode = if quote == '"' {
                    Mode::MultilineDouble(pending)
                } else {
                    Mode::MultilineSingle(pending)
                };
                return Ok(());
            }
        } else if value_text.starts_with('[') {
            match scan_balance(value_text, Brackets::SQUARE) {
                Balance::Balanced => parse_array(value_text, line.line, column)?,
                Balance::Open { .. } => {
                    let mut buffer = value_text.to_string();
                    if !buffer.ends_with(',') {
                        buffer.push(',');
                    }
                    self.mode = Mode::MultilineList(Pending { key: key.to_string(), buffer, line: line.line, column });
                    return Ok(());
                }
                Balance::Broken { found, .. } => {
                    return Err(MangoError::parse(
                        format!("invalid array syntax: unmatched '{}'", found),
                        line.line,
                        column,
                        201,
                    ));
                }
            }
        } else {
            coerce(value_text)
        };

        self.assign(key.to_string(), value);
        Ok(())
    }

    fn multiline_string(&mut self, mut pending: Pending, line: &LogicalLine, quote: char) -> Result<(), MangoError> {
        let marker = if quote == '"' { "\"\"\"" } else { "'''" };
        let text = line.text.as_str();

        if let Some(body) = text.strip_suffix(marker) {
            append_piece(&mut pending.buffer, body.trim_end());
            let value = Value::String(unescape(&pending.buffer, quote));
            self.assign(pending.key, value);
        } else {
            append_piece(&mut pending.buffer, text);
            self.mode = if quote == '"' {
                Mode::MultilineDouble(pending)
            } else {
                Mode::MultilineSingle(pending)
            };
        }
        Ok(())
    }

    fn multiline_list(&mut self, mut pending: Pending, line: &LogicalLine) -> Result<(), MangoError> {
        pending.buffer.push_str(&line.text);

        if line.text.contains(']') {
            match scan_balance(&pending.buffer, Brackets::SQUARE) {
                Balance::Balanced => {
                    let value = parse_array(&pending.buffer, pending.line, pending.column)?;
                    self.assign(pending.key, value);
                    return Ok(());
                }
                Balance::Broken { found, .. } => {
                    return Err(MangoError::parse(
                        format!("invalid array syntax: unmatched '{}'", found),
                        line.line,
                        line.column,
                        201,
                    ));
                }
                Balance::Open { .. } => {}
            }
        }

        if !pending.buffer.ends_with(',') {
            pending.buffer.push(',');
        }
        self.mode = Mode::MultilineList(pending);
        Ok(())
    }

    fn assign(&mut self, key: String, value: Value) {
        self.document.section_mut(&self.section).insert(key, value);
    }

    fn finish(self) -> Result<Document, MangoError> {
        let (pending, what) = match self.mode {
            Mode::Standard => return Ok(self.document),
            Mode::MultilineDouble(p) => (p, "multi-line string opened with \"\"\""),
            Mode::MultilineSingle(p) => (p, "multi-line string opened with '''"),
            Mode::MultilineList(p) => (p, "array opened with '['"),
        };
        Err(MangoError::parse(
            "malformed document: missing closing bracket or quote",
            pending.line,
            pending.column,
            103,
        )
        .with_hint(format!("Unterminated {} for key '{}'", what, pending.key))
        .with_file_path(self.file_path))
    }
}

fn triple_quote(text: &str) -> Option<char> {
    if text.starts_with("\"\"\"") {
        Some('"')
    } else if text.starts_with("'''") {
        Some('\'')
    } else {
        None
    }
}

/// Newline-join, skipping empty pieces so that a bare opening or closing
/// marker line adds nothing.
fn append_piece(buffer: &mut String, piece: &str) {
    if piece.is_empty() {
        return;
    }
    if !buffer.is_empty() {
        buffer.push('\n');
    }
    buffer.push_str(piece);
}
