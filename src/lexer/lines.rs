use crate::error::MangoError;

use super::scanner::{scan_balance, Balance, Brackets};

/// A comment-free, trimmed, non-empty unit of input.
///
/// For the schema dialect one logical line may span several physical lines;
/// `line`/`column` point at where it starts and `end_line` at where it ends.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalLine {
    pub text: String,
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// Truncate at the first `#`, quoted or not (document dialect, manifests).
    FirstHash,
    /// Truncate at the first `#` outside quotes (schema dialect).
    Unquoted,
}

pub fn strip_comment(line: &str, style: CommentStyle) -> &str {
    let cut = match style {
        CommentStyle::FirstHash => line.find('#'),
        CommentStyle::Unquoted => {
            let mut quote: Option<char> = None;
            let mut escaped = false;
            line.char_indices()
                .find(|&(_, ch)| {
                    if escaped {
                        escaped = false;
                        return false;
                    }
                    match (ch, quote) {
                        ('\\', _) => escaped = true,
                        (c, Some(q)) if c == q => quote = None,
                        (_, Some(_)) => {}
                        ('"' | '\'', None) => quote = Some(ch),
                        ('#', None) => return true,
                        _ => {}
                    }
                    false
                })
                .map(|(idx, _)| idx)
        }
    };
    match cut {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// Strip comments, trim, drop blank lines, and number what is left (1-based).
pub fn preprocess(input: &str, style: CommentStyle) -> Vec<LogicalLine> {
    input
        .lines()
        .enumerate()
        .filter_map(|(idx, raw)| {
            let stripped = strip_comment(raw, style);
            let text = stripped.trim();
            if text.is_empty() {
                return None;
            }
            let indent = stripped.chars().take_while(|c| c.is_whitespace()).count();
            Some(LogicalLine {
                text: text.to_string(),
                line: idx + 1,
                column: indent + 1,
                end_line: idx + 1,
            })
        })
        .collect()
}

/// A merge run in progress: the joined text plus where each piece came from.
struct Run {
    merged: LogicalLine,
    // (char offset in merged text, line, column)
    segments: Vec<(usize, usize, usize)>,
}

impl Run {
    fn start(line: LogicalLine) -> Self {
        let segments = vec![(0, line.line, line.column)];
        Self { merged: line, segments }
    }

    fn push(&mut self, line: &LogicalLine) {
        self.merged.text.push(' ');
        self.segments.push((self.merged.text.chars().count(), line.line, line.column));
        self.merged.text.push_str(&line.text);
        self.merged.end_line = line.line;
    }

    /// Physical (line, column) of a char offset into the merged text.
    fn locate(&self, offset: usize) -> (usize, usize) {
        let (start, line, column) = self
            .segments
            .iter()
            .rev()
            .find(|(start, _, _)| *start <= offset)
            .copied()
            .unwrap_or((0, self.merged.line, self.merged.column));
        (line, column + offset - start)
    }
}

/// Join consecutive lines until every tracked bracket family balances.
///
/// Pieces are joined with a single space. A closer without an opener is an
/// error at that closer; a run still open at end of input is an error at the
/// line where the run started.
pub fn merge_balanced(lines: Vec<LogicalLine>, brackets: Brackets) -> Result<Vec<LogicalLine>, MangoError> {
    let mut out = Vec::with_capacity(lines.len());
    let mut run: Option<Run> = None;

    for line in lines {
        let current = match run.take() {
            Some(mut r) => {
                r.push(&line);
                r
            }
            None => Run::start(line),
        };

        match scan_balance(&current.merged.text, brackets) {
            Balance::Balanced => out.push(current.merged),
            Balance::Open { .. } => run = Some(current),
            Balance::Broken { offset, found } => {
                let (line, column) = current.locate(offset);
                return Err(MangoError::parse(
                    format!("unmatched closing '{}'", found),
                    line,
                    column,
                    101,
                )
                .with_hint("Remove the stray bracket or add its opening counterpart"));
            }
        }
    }

    if let Some(r) = run {
        let column = match scan_balance(&r.merged.text, brackets) {
            Balance::Open { offset, .. } => match r.locate(offset) {
                (line, column) if line == r.merged.line => column,
                _ => r.merged.column,
            },
            _ => r.merged.column,
        };
        return Err(MangoError::parse(
            "unterminated block: missing closing bracket, brace or parenthesis",
            r.merged.line,
            column,
            102,
        ));
    }

    Ok(out)
}
