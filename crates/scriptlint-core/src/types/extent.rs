//! Source extents shared by tokens, tree nodes, diagnostics, and corrections.
//!
//! Offsets are 0-based byte offsets into the script text and form a half-open
//! range `[start_offset, end_offset)`. Lines and columns are 1-based; columns
//! count bytes from the start of the line.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A region of script text together with its line/column coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ScriptExtent {
    pub start_offset: usize,
    pub end_offset: usize,
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
    pub text: String,
}

impl ScriptExtent {
    /// Build an extent for `[start, end)` of `source`, computing line/column
    /// coordinates by scanning the text.
    ///
    /// Offsets past the end of `source` are clamped.
    pub fn from_offsets(source: &str, start: usize, end: usize) -> Self {
        let start = start.min(source.len());
        let end = end.clamp(start, source.len());
        let (start_line, start_column) = line_column(source, start);
        let (end_line, end_column) = line_column(source, end);
        Self {
            start_offset: start,
            end_offset: end,
            start_line,
            start_column,
            end_line,
            end_column,
            text: source.get(start..end).unwrap_or_default().to_string(),
        }
    }

    /// Number of bytes covered.
    pub fn len(&self) -> usize {
        self.end_offset - self.start_offset
    }

    /// True when the extent covers no text.
    pub fn is_empty(&self) -> bool {
        self.start_offset == self.end_offset
    }

    /// True when `line` falls within `start_line..=end_line`.
    pub fn contains_line(&self, line: u32) -> bool {
        line >= self.start_line && line <= self.end_line
    }
}

impl fmt::Display for ScriptExtent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_column)
    }
}

/// Precomputed line starts for O(log n) offset → line/column lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            line_starts,
            len: text.len(),
        }
    }

    /// Number of lines; a trailing newline starts a final empty line.
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    /// 1-based line and column of `offset` (clamped to the text length).
    pub fn line_column(&self, offset: usize) -> (u32, u32) {
        let offset = offset.min(self.len);
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        (
            line_idx as u32 + 1,
            (offset - self.line_starts[line_idx]) as u32 + 1,
        )
    }

    /// Byte offset where 1-based `line` starts.
    pub fn line_start(&self, line: u32) -> Option<usize> {
        let idx = (line as usize).checked_sub(1)?;
        self.line_starts.get(idx).copied()
    }

    /// Byte range of `line` excluding its `\n` terminator (a preceding `\r`
    /// is included).
    pub fn line_range(&self, line: u32) -> Option<std::ops::Range<usize>> {
        let start = self.line_start(line)?;
        let end = self
            .line_start(line + 1)
            .map(|next| next - 1)
            .unwrap_or(self.len);
        Some(start..end)
    }

    /// Build an extent over `[start, end)` of `text`, which must be the text
    /// this index was built from.
    pub fn extent(&self, text: &str, start: usize, end: usize) -> ScriptExtent {
        let start = start.min(self.len);
        let end = end.clamp(start, self.len);
        let (start_line, start_column) = self.line_column(start);
        let (end_line, end_column) = self.line_column(end);
        ScriptExtent {
            start_offset: start,
            end_offset: end,
            start_line,
            start_column,
            end_line,
            end_column,
            text: text.get(start..end).unwrap_or_default().to_string(),
        }
    }
}

/// 1-based line and column of a byte offset.
pub fn line_column(source: &str, offset: usize) -> (u32, u32) {
    let offset = offset.min(source.len());
    let before = &source.as_bytes()[..offset];
    let line = before.iter().filter(|&&b| b == b'\n').count() as u32 + 1;
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map(|p| p + 1)
        .unwrap_or(0);
    (line, (offset - line_start) as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_column_tracks_newlines() {
        let src = "ab\ncd\n\nef";
        assert_eq!(line_column(src, 0), (1, 1));
        assert_eq!(line_column(src, 1), (1, 2));
        assert_eq!(line_column(src, 3), (2, 1));
        assert_eq!(line_column(src, 6), (3, 1));
        assert_eq!(line_column(src, 7), (4, 1));
        assert_eq!(line_column(src, 100), (4, 3));
    }

    #[test]
    fn test_line_index_agrees_with_scan() {
        let src = "ab\r\ncd\n\nef";
        let index = LineIndex::new(src);
        assert_eq!(index.line_count(), 4);
        for offset in 0..=src.len() {
            assert_eq!(index.line_column(offset), line_column(src, offset));
        }
        assert_eq!(index.line_range(1), Some(0..3));
        assert_eq!(index.line_range(3), Some(7..7));
        assert_eq!(index.line_range(4), Some(8..10));
        assert_eq!(index.line_range(5), None);
        assert_eq!(index.extent(src, 4, 6), ScriptExtent::from_offsets(src, 4, 6));
    }

    #[test]
    fn test_from_offsets_clamps_and_captures_text() {
        let src = "foo\nbar";
        let ext = ScriptExtent::from_offsets(src, 4, 99);
        assert_eq!(ext.text, "bar");
        assert_eq!(ext.start_line, 2);
        assert_eq!(ext.end_column, 4);
        assert!(ext.contains_line(2));
        assert!(!ext.contains_line(1));
    }
}
