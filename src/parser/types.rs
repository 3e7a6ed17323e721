use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Byte range into a source snapshot. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Empty span at `offset`, used for insertions.
    pub fn point(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }
}

/// Resolved extent of one keyword block.
///
/// `start` is where the header match begins, `open` is the header's `{` and
/// `close` is the `}` that brings brace depth back to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpan {
    pub start: usize,
    pub open: usize,
    pub close: usize,
}

impl BlockSpan {
    pub fn span(&self) -> Span {
        Span::new(self.start, self.close)
    }
}

/// Zero-based line/character position. `character` counts Unicode scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

/// How the captured value is printed by the log statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayFormat {
    Uint,
    Hex,
    Bytes,
}

impl DisplayFormat {
    pub const ALL: [DisplayFormat; 3] = [DisplayFormat::Uint, DisplayFormat::Hex, DisplayFormat::Bytes];

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayFormat::Uint => "uint",
            DisplayFormat::Hex => "hex",
            DisplayFormat::Bytes => "bytes",
        }
    }

    /// Number of log lines a single trace emits in this format.
    pub fn log_line_count(&self) -> usize {
        match self {
            DisplayFormat::Bytes => 2,
            DisplayFormat::Uint | DisplayFormat::Hex => 1,
        }
    }
}

impl fmt::Display for DisplayFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uint" | "unsigned" | "d" => Ok(DisplayFormat::Uint),
            "hex" | "x" => Ok(DisplayFormat::Hex),
            "bytes" | "byte" => Ok(DisplayFormat::Bytes),
            other => Err(format!("unknown display format: {}", other)),
        }
    }
}
