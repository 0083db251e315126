/// Which bracket families a scan tracks. Quoted text never counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brackets {
    pub square: bool,
    pub curly: bool,
    pub round: bool,
}

impl Brackets {
    /// `[` / `]` only, as used by the document dialect.
    pub const SQUARE: Brackets = Brackets { square: true, curly: false, round: false };
    /// `[]`, `{}` and `()`, as used by the schema dialect.
    pub const ALL: Brackets = Brackets { square: true, curly: true, round: true };

    fn tracks(&self, ch: char) -> bool {
        match ch {
            '[' | ']' => self.square,
            '{' | '}' => self.curly,
            '(' | ')' => self.round,
            _ => false,
        }
    }
}

fn opener_of(closer: char) -> char {
    match closer {
        ']' => '[',
        '}' => '{',
        _ => '(',
    }
}

/// Result of scanning a run of text for bracket balance.
///
/// Offsets are character (not byte) offsets into the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Balance {
    Balanced,
    /// Openers remain. `offset` points at the outermost one still open.
    Open { depth: usize, offset: usize },
    /// A closer with no matching opener.
    Broken { offset: usize, found: char },
}

/// Scan `text`, honoring one level of `"`/`'` quoting and backslash escapes.
pub fn scan_balance(text: &str, brackets: Brackets) -> Balance {
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (offset, ch) in text.chars().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        if ch == '\\' {
            escaped = true;
            continue;
        }
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            continue;
        }

        match ch {
            '"' | '\'' => quote = Some(ch),
            '[' | '{' | '(' if brackets.tracks(ch) => stack.push((ch, offset)),
            ']' | '}' | ')' if brackets.tracks(ch) => match stack.pop() {
                Some((open, _)) if open == opener_of(ch) => {}
                _ => return Balance::Broken { offset, found: ch },
            },
            _ => {}
        }
    }

    match stack.first() {
        None => Balance::Balanced,
        Some(&(_, offset)) => Balance::Open { depth: stack.len(), offset },
    }
}

pub fn is_balanced(text: &str, brackets: Brackets) -> bool {
    scan_balance(text, brackets) == Balance::Balanced
}

/// Tracks quoting and nesting while walking a string byte by byte.
struct Nesting {
    quote: Option<char>,
    escaped: bool,
    depth: i32,
    angle: bool,
}

impl Nesting {
    fn new(angle: bool) -> Self {
        Self { quote: None, escaped: false, depth: 0, angle }
    }

    /// Feed one character. Returns true when it sits at top level, outside quotes.
    fn feed(&mut self, ch: char) -> bool {
        if self.escaped {
            self.escaped = false;
            return false;
        }
        if ch == '\\' {
            self.escaped = true;
            return false;
        }
        if let Some(q) = self.quote {
            if ch == q {
                self.quote = None;
            }
            return false;
        }
        match ch {
            '"' | '\'' => {
                self.quote = Some(ch);
                false
            }
            '[' | '{' | '(' => {
                self.depth += 1;
                false
            }
            '<' if self.angle => {
                self.depth += 1;
                false
            }
            ']' | '}' | ')' => {
                self.depth -= 1;
                false
            }
            '>' if self.angle => {
                self.depth -= 1;
                false
            }
            _ => self.depth == 0,
        }
    }
}

/// Split on `sep` wherever it appears outside quotes and outside `[]`, `{}` and `()`.
///
/// Pieces are returned untrimmed; a trailing separator yields a final empty piece.
pub fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut nesting = Nesting::new(false);
    let mut pieces = Vec::new();
    let mut start = 0;

    for (idx, ch) in text.char_indices() {
        if nesting.feed(ch) && ch == sep {
            pieces.push(&text[start..idx]);
            start = idx + ch.len_utf8();
        }
    }
    pieces.push(&text[start..]);
    pieces
}

/// Whitespace tokenizer for type definitions: never splits inside quotes or
/// any of `[]`, `{}`, `()` and `<>`.
pub fn split_whitespace_top_level(text: &str) -> Vec<&str> {
    let mut nesting = Nesting::new(true);
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (idx, ch) in text.char_indices() {
        let top = nesting.feed(ch);
        if top && ch.is_whitespace() {
            if let Some(s) = start.take() {
                tokens.push(&text[s..idx]);
            }
        } else if start.is_none() {
            start = Some(idx);
        }
    }
    if let Some(s) = start {
        tokens.push(&text[s..]);
    }
    tokens
}

/// Byte index of the first `target` outside quotes and brackets.
pub fn find_top_level(text: &str, target: char) -> Option<usize> {
    let mut nesting = Nesting::new(false);
    text.char_indices()
        .find(|&(_, ch)| nesting.feed(ch) && ch == target)
        .map(|(idx, _)| idx)
}

/// Byte index of the closer that matches the opener at byte `open`.
pub fn matching_close(text: &str, open: usize) -> Option<usize> {
    let opener = text[open..].chars().next()?;
    let closer = match opener {
        '[' => ']',
        '{' => '}',
        '(' => ')',
        '<' => '>',
        _ => return None,
    };
    let mut nesting = Nesting::new(opener == '<');
    for (idx, ch) in text[open..].char_indices() {
        nesting.feed(ch);
        if ch == closer && nesting.depth == 0 && nesting.quote.is_none() {
            return Some(open + idx);
        }
    }
    None
}

/// 1-based column of a byte index, counted in characters.
pub fn column_of(text: &str, byte_idx: usize) -> usize {
    text[..byte_idx.min(text.len())].chars().count() + 1
}
