//! Text edits: the unit both the formatter and fix mode apply.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Replace the half-open byte range `[start, end)` with `replacement`.
/// `start == end` is a pure insertion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScriptEdit {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

impl ScriptEdit {
    /// # Panics
    /// If `end < start`.
    pub fn new(start: usize, end: usize, replacement: impl Into<String>) -> Self {
        assert!(end >= start, "edit end {end} precedes start {start}");
        Self {
            start,
            end,
            replacement: replacement.into(),
        }
    }

    pub fn replace(start: usize, end: usize, replacement: impl Into<String>) -> Self {
        Self::new(start, end, replacement)
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::new(at, at, text)
    }

    pub fn delete(start: usize, end: usize) -> Self {
        Self::new(start, end, String::new())
    }

    pub fn is_insertion(&self) -> bool {
        self.start == self.end
    }

    /// Number of bytes removed.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.is_insertion() && self.replacement.is_empty()
    }

    /// Order for back-to-front application: descending start, then
    /// descending end so an insertion at `p` lands before a replacement
    /// starting at `p`.
    pub fn cmp_application(&self, other: &Self) -> Ordering {
        other
            .start
            .cmp(&self.start)
            .then_with(|| other.end.cmp(&self.end))
    }

    /// True when `self` and `other` cannot be applied in one batch. Touching
    /// ranges are compatible.
    pub fn overlaps(&self, other: &Self) -> bool {
        let (left, right) = if self.start <= other.start {
            (self, other)
        } else {
            (other, self)
        };
        if left.start == right.start {
            // Two non-empty ranges from the same offset always collide.
            return !left.is_insertion() && !right.is_insertion();
        }
        left.end > right.start
    }
}

impl fmt::Display for ScriptEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}) -> {:?}", self.start, self.end, self.replacement)
    }
}
