//! Shared input handle over a character buffer.

use crate::{ByteSpan, LineStarts};
use std::fmt;
use std::sync::Arc;

/// A handle over parse input: the full character buffer plus the slice the
/// parser actually works on.
///
/// Cloning is cheap (the buffer and line index are behind `Arc`), so every
/// AST origin can carry one. A slice of a larger buffer keeps `base` at the
/// slice's absolute start so parser-local offsets can be remapped to absolute
/// positions for diagnostics.
#[derive(Clone)]
pub struct Input {
    buffer: Arc<str>,
    lines: Arc<LineStarts>,
    base: usize,
    len: usize,
}

impl Input {
    /// Wrap a whole buffer as parse input.
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        let buffer: Arc<str> = text.into();
        let lines = Arc::new(LineStarts::new(&buffer));
        let len = buffer.len();
        Input { buffer, lines, base: 0, len }
    }

    /// A sub-slice of this input covering `span` (absolute offsets).
    ///
    /// The returned input shares the buffer and line index; its local offset
    /// 0 corresponds to absolute offset `span.start`.
    pub fn slice(&self, span: ByteSpan) -> Self {
        debug_assert!(span.end <= self.buffer.len());
        Input {
            buffer: Arc::clone(&self.buffer),
            lines: Arc::clone(&self.lines),
            base: span.start,
            len: span.len(),
        }
    }

    /// The text of the slice this input exposes.
    pub fn text(&self) -> &str {
        &self.buffer[self.base..self.base + self.len]
    }

    /// The full underlying buffer, regardless of slicing.
    pub fn full_text(&self) -> &str {
        &self.buffer
    }

    /// Remap a parser-local byte offset to an absolute buffer offset.
    pub fn absolute(&self, local: usize) -> usize {
        self.base + local.min(self.len)
    }

    /// Remap a parser-local byte span to absolute buffer offsets.
    pub fn absolute_span(&self, local: ByteSpan) -> ByteSpan {
        ByteSpan::new(self.absolute(local.start), self.absolute(local.end))
    }

    /// Line/column of a parser-local offset, 0-indexed, in the full buffer.
    pub fn line_col(&self, local: usize) -> (usize, usize) {
        self.lines.offset_to_line_col(self.absolute(local))
    }

    /// Column of a parser-local offset in the full buffer.
    pub fn column(&self, local: usize) -> usize {
        self.lines.column(self.absolute(local))
    }

    /// Length in bytes of the exposed slice.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the exposed slice is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Debug for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Input")
            .field("base", &self.base)
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Input {
    fn eq(&self, other: &Self) -> bool {
        // Same buffer identity and same window; content comparison is not
        // what origin equality means.
        Arc::ptr_eq(&self.buffer, &other.buffer)
            && self.base == other.base
            && self.len == other.len
    }
}

impl Eq for Input {}

impl From<&str> for Input {
    fn from(text: &str) -> Self {
        Input::new(text.to_owned())
    }
}

impl From<String> for Input {
    fn from(text: String) -> Self {
        Input::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_remaps_offsets() {
        let input = Input::new("val x = 1\nval y = 2\n");
        let sliced = input.slice(ByteSpan::new(10, 20));
        assert_eq!(sliced.text(), "val y = 2\n");
        assert_eq!(sliced.absolute(0), 10);
        assert_eq!(sliced.absolute_span(ByteSpan::new(4, 5)), ByteSpan::new(14, 15));
        assert_eq!(sliced.line_col(4), (1, 4));
    }

    #[test]
    fn whole_input_is_identity() {
        let input = Input::new("x");
        assert_eq!(input.absolute(0), 0);
        assert_eq!(input.text(), "x");
        assert_eq!(input.column(0), 0);
    }
}
