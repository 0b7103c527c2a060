//! Line index for byte-offset to line/column mapping.

use serde::{Deserialize, Serialize};

/// Cache of line start offsets for a source buffer.
///
/// Built once per input; `offset_to_line_col` is a binary search. Columns are
/// byte-based, which is what indentation comparison wants (indentation is
/// ASCII whitespace in practice).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineStarts {
    line_starts: Vec<usize>,
}

impl LineStarts {
    /// Scan `text` and record the byte offset of every line start.
    pub fn new(text: &str) -> Self {
        let mut ls = vec![0];
        let mut i = 0;
        let b = text.as_bytes();
        while i < b.len() {
            if b[i] == b'\n' {
                ls.push(i + 1);
            } else if b[i] == b'\r' {
                if i + 1 < b.len() && b[i + 1] == b'\n' {
                    ls.push(i + 2);
                    i += 1;
                } else {
                    ls.push(i + 1);
                }
            }
            i += 1;
        }
        Self { line_starts: ls }
    }

    /// Number of lines in the indexed buffer.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Map a byte offset to `(line, column)`, both 0-indexed.
    pub fn offset_to_line_col(&self, offset: usize) -> (usize, usize) {
        let line = self
            .line_starts
            .binary_search(&offset)
            .unwrap_or_else(|i| i.saturating_sub(1));
        (line, offset - self.line_starts[line])
    }

    /// The column of a byte offset; shorthand used for indentation depth.
    pub fn column(&self, offset: usize) -> usize {
        self.offset_to_line_col(offset).1
    }

    /// Byte offset at which the given 0-indexed line starts.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_offsets_across_lines() {
        let text = "ab\ncd\n\nef";
        let ls = LineStarts::new(text);
        assert_eq!(ls.line_count(), 4);
        assert_eq!(ls.offset_to_line_col(0), (0, 0));
        assert_eq!(ls.offset_to_line_col(1), (0, 1));
        assert_eq!(ls.offset_to_line_col(3), (1, 0));
        assert_eq!(ls.offset_to_line_col(6), (2, 0));
        assert_eq!(ls.offset_to_line_col(8), (3, 1));
    }

    #[test]
    fn handles_crlf() {
        let text = "ab\r\ncd";
        let ls = LineStarts::new(text);
        assert_eq!(ls.offset_to_line_col(4), (1, 0));
        assert_eq!(ls.column(5), 1);
    }
}
