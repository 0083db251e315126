use std::fmt;

/// The main error type for mangolo parsing and project loading.
#[derive(Debug, Clone, PartialEq)]
pub enum MangoError {
    /// Malformed grammar. Line and column are 1-based.
    ParseError {
        message: String,
        line: usize,
        column: usize,
        file_path: Option<String>,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// A file or directory that could not be found or read.
    FileError {
        message: String,
        path: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised by typed access when a value has the wrong shape or is missing.
    TypeError {
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    ExportError {
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },
}

impl MangoError {
    pub(crate) fn parse(message: impl Into<String>, line: usize, column: usize, code: u32) -> Self {
        MangoError::ParseError {
            message: message.into(),
            line,
            column,
            file_path: None,
            hint: None,
            code: Some(code),
        }
    }

    pub(crate) fn with_hint(mut self, text: impl Into<String>) -> Self {
        match &mut self {
            MangoError::ParseError { hint, .. }
            | MangoError::FileError { hint, .. }
            | MangoError::TypeError { hint, .. }
            | MangoError::ExportError { hint, .. } => *hint = Some(text.into()),
        }
        self
    }

    /// Attach the originating file to a parse error that does not carry one yet.
    pub fn with_file_path(mut self, path: Option<&str>) -> Self {
        if let (MangoError::ParseError { file_path, .. }, Some(p)) = (&mut self, path) {
            if file_path.is_none() {
                *file_path = Some(p.to_string());
            }
        }
        self
    }

    pub fn line(&self) -> Option<usize> {
        match self {
            MangoError::ParseError { line, .. } => Some(*line),
            _ => None,
        }
    }

    pub fn column(&self) -> Option<usize> {
        match self {
            MangoError::ParseError { column, .. } => Some(*column),
            _ => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            MangoError::ParseError { message, .. }
            | MangoError::FileError { message, .. }
            | MangoError::TypeError { message, .. }
            | MangoError::ExportError { message, .. } => message,
        }
    }

    pub fn code(&self) -> Option<u32> {
        match self {
            MangoError::ParseError { code, .. }
            | MangoError::FileError { code, .. }
            | MangoError::TypeError { code, .. }
            | MangoError::ExportError { code, .. } => *code,
        }
    }
}

fn suffix(hint: &Option<String>, code: &Option<u32>) -> String {
    format!(
        "{}{}",
        hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
        code.map_or(String::new(), |c| format!(" Code: {}", c))
    )
}

impl fmt::Display for MangoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MangoError::ParseError { message, line, column, file_path, hint, code } =>
                write!(f, "[MANGO] Parse Error at {}:{}: {}{}{}",
                    line, column, message,
                    file_path.as_ref().map_or(String::new(), |p| format!(" in {}", p)),
                    suffix(hint, code)
                ),
            MangoError::FileError { message, path, hint, code } =>
                write!(f, "[MANGO] File Error '{}': {}{}",
                    path, message,
                    suffix(hint, code)
                ),
            MangoError::TypeError { message, hint, code } =>
                write!(f, "[MANGO] Type Error: {}{}",
                    message,
                    suffix(hint, code)
                ),
            MangoError::ExportError { message, hint, code } =>
                write!(f, "[MANGO] Export Error: {}{}",
                    message,
                    suffix(hint, code)
                ),
        }
    }
}

impl std::error::Error for MangoError {}

/// A non-fatal problem. Parsing continues after one is recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub message: String,
    pub line: Option<usize>,
    pub file_path: Option<String>,
}

impl Warning {
    pub(crate) fn new(message: impl Into<String>, line: Option<usize>) -> Self {
        Self {
            message: message.into(),
            line,
            file_path: None,
        }
    }

    pub(crate) fn in_file(mut self, path: Option<&str>) -> Self {
        self.file_path = path.map(str::to_string);
        self
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[MANGO] Warning")?;
        if let Some(line) = self.line {
            write!(f, " at line {}", line)?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(path) = &self.file_path {
            write!(f, " in {}", path)?;
        }
        Ok(())
    }
}
