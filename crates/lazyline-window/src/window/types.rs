//! Window types: LinePosition.

/// Where a text offset falls in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePosition {
    /// Absolute, 0-based line number.
    pub line_number: i64,
    /// Byte column within the line.
    pub column: usize,
}
