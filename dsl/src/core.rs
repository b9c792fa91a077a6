//! Controller limits and source positions shared by every stage.

/// Number of digital inputs (`I1` to `I8`).
pub const INPUTS: usize = 8;

/// Number of digital outputs (`O1` to `O8`).
pub const OUTPUTS: usize = 8;

/// Number of boolean memories (`B1` to `B32`).
pub const BOOLEANS: usize = 32;

/// Number of timers in each timer family (`TON1` to `TON32`, `TOF1` to `TOF32`).
pub const TIMERS: usize = 32;

/// Number of counters in each counter family (`CUP1` to `CUP8`, `CDN1` to `CDN8`).
pub const COUNTERS: usize = 8;

/// A range of bytes within one line of program text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SourceSpan {
    /// Byte offset of the first character (0-indexed).
    pub start: usize,
    /// Byte offset one past the last character (0-indexed).
    pub end: usize,
}

impl SourceSpan {
    pub fn range(start: usize, end: usize) -> Self {
        SourceSpan { start, end }
    }
}

impl From<std::ops::Range<usize>> for SourceSpan {
    fn from(range: std::ops::Range<usize>) -> Self {
        SourceSpan::range(range.start, range.end)
    }
}
