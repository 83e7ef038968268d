//! Mutable text buffer that re-parses after every edit batch.

use std::path::{Path, PathBuf};

use scriptlint_core::edits::ScriptEdit;
use scriptlint_core::errors::EditError;

use crate::parser::{ParsedScript, ScriptParser};

/// One script under edit. Owned by a single format or fix call.
///
/// The text, tokens, and tree are replaced together after each batch, so an
/// observer never sees a tree that disagrees with the text.
pub struct ScriptFormatBuffer<'p> {
    parser: &'p dyn ScriptParser,
    script: ParsedScript,
    path: Option<PathBuf>,
}

impl<'p> ScriptFormatBuffer<'p> {
    pub fn new(parser: &'p dyn ScriptParser, text: &str, path: Option<&Path>) -> Self {
        Self {
            parser,
            script: parser.parse(text),
            path: path.map(Path::to_path_buf),
        }
    }

    pub fn text(&self) -> &str {
        self.script.text()
    }

    pub fn script(&self) -> &ParsedScript {
        &self.script
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Apply one batch of edits and re-parse.
    ///
    /// Returns `Ok(false)` without touching the buffer when `edits` is empty.
    /// The batch is validated as a whole before any text changes: on `Err`
    /// the buffer is unchanged.
    pub fn apply_edits(&mut self, edits: &[ScriptEdit]) -> Result<bool, EditError> {
        if edits.is_empty() {
            return Ok(false);
        }

        // Reversed first so equal edits keep caller order after the stable sort.
        let mut ordered: Vec<&ScriptEdit> = edits.iter().rev().collect();
        ordered.sort_by(|a, b| a.cmp_application(b));

        let text = self.script.text();
        for edit in &ordered {
            check_bounds(text, edit)?;
        }
        for pair in ordered.windows(2) {
            let (later, earlier) = (pair[0], pair[1]);
            if earlier.end > later.start {
                tracing::error!(
                    earlier = %earlier,
                    later = %later,
                    "overlapping edits in one batch"
                );
                return Err(EditError::Overlap {
                    earlier_start: earlier.start,
                    earlier_end: earlier.end,
                    later_start: later.start,
                    later_end: later.end,
                });
            }
        }

        let mut updated = text.to_string();
        for edit in &ordered {
            updated.replace_range(edit.start..edit.end, &edit.replacement);
        }
        tracing::trace!(edits = edits.len(), "applied edit batch");
        self.script = self.parser.parse(&updated);
        Ok(true)
    }
}

fn check_bounds(text: &str, edit: &ScriptEdit) -> Result<(), EditError> {
    if edit.end > text.len() {
        return Err(EditError::OutOfBounds {
            start: edit.start,
            end: edit.end,
            len: text.len(),
        });
    }
    for offset in [edit.start, edit.end] {
        if !text.is_char_boundary(offset) {
            return Err(EditError::NotCharBoundary { offset });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::StandardParser;

    fn buffer(text: &str) -> ScriptFormatBuffer<'static> {
        ScriptFormatBuffer::new(&StandardParser, text, None)
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let mut buf = buffer("foo");
        assert_eq!(buf.apply_edits(&[]), Ok(false));
        assert_eq!(buf.text(), "foo");
    }

    #[test]
    fn test_batch_applies_back_to_front() {
        let mut buf = buffer("aaa bbb ccc");
        let edits = [
            ScriptEdit::replace(0, 3, "x"),
            ScriptEdit::replace(8, 11, "zzzz"),
            ScriptEdit::delete(3, 4),
        ];
        assert_eq!(buf.apply_edits(&edits), Ok(true));
        assert_eq!(buf.text(), "xbbb zzzz");
    }

    #[test]
    fn test_insertions_keep_caller_order() {
        let mut buf = buffer("ab");
        let edits = [
            ScriptEdit::insert(1, "1"),
            ScriptEdit::insert(1, "2"),
            ScriptEdit::replace(1, 2, "B"),
        ];
        buf.apply_edits(&edits).unwrap();
        assert_eq!(buf.text(), "a12B");
    }

    #[test]
    fn test_overlap_leaves_buffer_untouched() {
        let mut buf = buffer("abcdef");
        let err = buf
            .apply_edits(&[ScriptEdit::delete(0, 4), ScriptEdit::delete(3, 5)])
            .unwrap_err();
        assert!(matches!(err, EditError::Overlap { earlier_end: 4, later_start: 3, .. }));
        assert_eq!(buf.text(), "abcdef");
    }

    #[test]
    fn test_bounds_and_char_boundaries() {
        let mut buf = buffer("é");
        assert_eq!(
            buf.apply_edits(&[ScriptEdit::insert(9, "x")]),
            Err(EditError::OutOfBounds { start: 9, end: 9, len: 2 })
        );
        assert_eq!(
            buf.apply_edits(&[ScriptEdit::insert(1, "x")]),
            Err(EditError::NotCharBoundary { offset: 1 })
        );
    }

    #[test]
    fn test_reparse_after_edit() {
        let mut buf = buffer("foo");
        assert!(buf.script().tree().nodes().len() == 2);
        buf.apply_edits(&[ScriptEdit::insert(3, "\nbar")]).unwrap();
        assert_eq!(buf.script().text(), "foo\nbar");
        assert_eq!(buf.script().tree().nodes().len(), 3);
    }
}
