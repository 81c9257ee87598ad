//! Backend diagnostics.

use std::fmt;
use std::path::PathBuf;

/// One error reported by a transformation backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub file: Option<PathBuf>,
    /// 1-based line
    pub line: Option<u32>,
    /// 1-based column
    pub column: Option<u32>,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            file: None,
            line: None,
            column: None,
        }
    }

    pub fn at(mut self, file: impl Into<PathBuf>, line: u32, column: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self.column = Some(column);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.line, self.column) {
            (Some(file), Some(line), Some(column)) => {
                write!(f, "{}:{line}:{column}: {}", file.display(), self.message)
            }
            (Some(file), _, _) => write!(f, "{}: {}", file.display(), self.message),
            _ => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for Diagnostic {}

impl miette::Diagnostic for Diagnostic {}

/// First diagnostic plus a count of the rest.
pub(crate) fn summarize(diagnostics: &[Diagnostic]) -> String {
    match diagnostics {
        [] => "unknown backend error".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first} (and {} more errors)", rest.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_location_when_known() {
        let diag = Diagnostic::new("Unexpected token").at("/src/a.ts", 3, 7);
        assert_eq!(diag.to_string(), "/src/a.ts:3:7: Unexpected token");
    }

    #[test]
    fn summarizes_multiple() {
        let diags = vec![Diagnostic::new("first"), Diagnostic::new("second")];
        assert_eq!(summarize(&diags), "first (and 1 more errors)");
        assert_eq!(summarize(&[]), "unknown backend error");
    }
}
