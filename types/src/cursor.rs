//! Text cursor positions in `line.column` form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cursor position: 1-based line, 0-based column counted in chars.
///
/// Persisted as the string `"line.column"`, so the start of a document is `"1.0"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CursorIndex {
    line: usize,
    column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorParseError {
    #[error("cursor index must look like `line.column`, got {0:?}")]
    Malformed(String),
    #[error("cursor line numbers start at 1")]
    ZeroLine,
}

impl CursorIndex {
    pub const START: CursorIndex = CursorIndex { line: 1, column: 0 };

    /// Build an index; a zero line is bumped to 1.
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        let line = if line == 0 { 1 } else { line };
        Self { line, column }
    }

    #[must_use]
    pub const fn line(self) -> usize {
        self.line
    }

    #[must_use]
    pub const fn column(self) -> usize {
        self.column
    }
}

impl Default for CursorIndex {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for CursorIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.line, self.column)
    }
}

impl FromStr for CursorIndex {
    type Err = CursorParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let malformed = || CursorParseError::Malformed(raw.to_string());
        let (line, column) = raw.trim().split_once('.').ok_or_else(malformed)?;
        let line: usize = line.parse().map_err(|_| malformed())?;
        let column: usize = column.parse().map_err(|_| malformed())?;
        if line == 0 {
            return Err(CursorParseError::ZeroLine);
        }
        Ok(Self { line, column })
    }
}

impl TryFrom<String> for CursorIndex {
    type Error = CursorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CursorIndex> for String {
    fn from(value: CursorIndex) -> Self {
        value.to_string()
    }
}
