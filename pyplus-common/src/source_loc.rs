//! Source location tracking for diagnostics and passthrough rendering
//!
//! Locations point into the original script. The translator never parses
//! text itself, but it does need spans to report where manual porting is
//! required and to recover the original text of skipped constructs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A location in a source file (line and column are 1-based, columns count bytes)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub filename: String,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    /// Create a location with filename
    pub fn new(filename: &str, line: u32, column: u32) -> Self {
        Self {
            filename: filename.to_string(),
            line,
            column,
        }
    }

    /// Create a dummy location for testing
    pub fn dummy() -> Self {
        Self::new("<unknown>", 0, 0)
    }

    /// Byte offset of this location within `source`, if it lies inside it
    fn offset_in(&self, source: &str) -> Option<usize> {
        if self.line == 0 || self.column == 0 {
            return None;
        }

        let mut offset = 0usize;
        for (index, line) in source.split_inclusive('\n').enumerate() {
            if index + 1 == self.line as usize {
                let column = self.column as usize - 1;
                return (column <= line.len()).then_some(offset + column);
            }
            offset += line.len();
        }
        None
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.filename, self.line, self.column)
    }
}

/// A span in a source file (from start to end location, end exclusive)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl SourceSpan {
    pub fn new(start: SourceLocation, end: SourceLocation) -> Self {
        Self { start, end }
    }

    /// Create a span from a single location
    pub fn from_location(location: SourceLocation) -> Self {
        Self {
            end: location.clone(),
            start: location,
        }
    }

    /// Create a dummy span for testing
    pub fn dummy() -> Self {
        Self::from_location(SourceLocation::dummy())
    }

    /// Slice the text covered by this span out of `source`.
    ///
    /// Returns `None` when the span does not lie inside the source or does
    /// not fall on character boundaries.
    pub fn extract<'a>(&self, source: &'a str) -> Option<&'a str> {
        let start = self.start.offset_in(source)?;
        let end = self.end.offset_in(source)?;
        if start > end {
            return None;
        }
        source.get(start..end)
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.filename != self.end.filename {
            write!(f, "{} to {}", self.start, self.end)
        } else if self.start.line == self.end.line {
            if self.start.column == self.end.column {
                write!(f, "{}:{}", self.start.filename, self.start.line)
            } else {
                write!(
                    f,
                    "{}:{}:{}-{}",
                    self.start.filename, self.start.line, self.start.column, self.end.column
                )
            }
        } else {
            write!(
                f,
                "{}:{}:{}-{}:{}",
                self.start.filename,
                self.start.line,
                self.start.column,
                self.end.line,
                self.end.column
            )
        }
    }
}
