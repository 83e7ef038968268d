//! Errors raised while applying text edits.

use super::error_code::{self, ScriptLintErrorCode};

/// Edit application failures. These indicate a defect in the editor or rule
/// that produced the edits, not a data condition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error(
        "overlapping edits: [{earlier_start}, {earlier_end}) runs into [{later_start}, {later_end})"
    )]
    Overlap {
        earlier_start: usize,
        earlier_end: usize,
        later_start: usize,
        later_end: usize,
    },

    #[error("edit [{start}, {end}) is outside the script (length {len})")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("edit offset {offset} is not on a character boundary")]
    NotCharBoundary { offset: usize },
}

impl ScriptLintErrorCode for EditError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Overlap { .. } => error_code::EDIT_OVERLAP,
            Self::OutOfBounds { .. } => error_code::EDIT_OUT_OF_BOUNDS,
            Self::NotCharBoundary { .. } => error_code::EDIT_NOT_CHAR_BOUNDARY,
        }
    }
}
