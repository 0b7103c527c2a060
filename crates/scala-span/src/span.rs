//! Half-open span types for source location tracking.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// A byte-based span representing a range in source text.
///
/// `ByteSpan` uses byte offsets (not character or line positions) for precise
/// and efficient source location tracking. Line/column rendering goes through
/// [`LineStarts`](crate::LineStarts).
///
/// # Invariants
///
/// - `start <= end` (enforced by constructors, but not at type level for Copy)
/// - Both `start` and `end` are valid byte offsets in the source text
/// - Spans are half-open intervals: `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ByteSpan {
    /// Starting byte offset in the source text (inclusive)
    pub start: usize,
    /// Ending byte offset in the source text (exclusive)
    pub end: usize,
}

impl ByteSpan {
    /// Creates a new `ByteSpan` with the given start and end offsets.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if `start > end`.
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "ByteSpan: start ({}) > end ({})", start, end);
        Self { start, end }
    }

    /// Creates an empty span at the given position.
    #[inline]
    pub const fn empty(pos: usize) -> Self {
        Self { start: pos, end: pos }
    }

    /// Returns the length of this span in bytes.
    #[inline]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if this span is empty (start == end).
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns true if this span contains the given byte offset.
    #[inline]
    pub const fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    /// Returns true if this span contains the given span entirely.
    #[inline]
    pub const fn contains_span(&self, other: ByteSpan) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns the smallest span covering both `self` and `other`.
    #[inline]
    pub fn cover(&self, other: ByteSpan) -> ByteSpan {
        ByteSpan::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Extracts the spanned text from the given source.
    #[inline]
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start.min(source.len())..self.end.min(source.len())]
    }
}

impl fmt::Display for ByteSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{})", self.start, self.end)
    }
}

impl From<ByteSpan> for Range<usize> {
    fn from(span: ByteSpan) -> Self {
        span.start..span.end
    }
}

/// A token-index span: `[start, end)` over the materialized token vector.
///
/// AST origins carry token spans rather than byte spans so that trivia
/// trimming and containment checks work on the same axis the parser moves
/// along. Both endpoints lie in `[0, token_count]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Index of the first token covered (inclusive)
    pub start: usize,
    /// Index one past the last token covered (exclusive)
    pub end: usize,
}

impl Span {
    /// Creates a new token span.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if `start > end`.
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "Span: start ({}) > end ({})", start, end);
        Self { start, end }
    }

    /// Creates an empty span at the given token index.
    #[inline]
    pub const fn empty(pos: usize) -> Self {
        Self { start: pos, end: pos }
    }

    /// Number of tokens covered.
    #[inline]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if no tokens are covered.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns true if this span contains the given span entirely.
    #[inline]
    pub const fn contains_span(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns the smallest span covering both `self` and `other`.
    #[inline]
    pub fn cover(&self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tokens[{}..{})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_span_basics() {
        let span = ByteSpan::new(0, 10);
        assert_eq!(span.len(), 10);
        assert!(!span.is_empty());
        assert!(span.contains(0));
        assert!(span.contains(9));
        assert!(!span.contains(10));

        let source = "hello world";
        assert_eq!(span.slice(source), "hello worl");
    }

    #[test]
    fn byte_span_cover_and_containment() {
        let a = ByteSpan::new(2, 5);
        let b = ByteSpan::new(4, 9);
        assert_eq!(a.cover(b), ByteSpan::new(2, 9));
        assert!(ByteSpan::new(0, 10).contains_span(a));
        assert!(!a.contains_span(b));
    }

    #[test]
    fn token_span_cover() {
        let a = Span::new(1, 3);
        let b = Span::new(2, 7);
        assert_eq!(a.cover(b), Span::new(1, 7));
        assert!(Span::empty(4).is_empty());
    }
}
