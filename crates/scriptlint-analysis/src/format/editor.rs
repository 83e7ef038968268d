//! The editor contract.

use std::path::Path;

use scriptlint_core::edits::ScriptEdit;

use crate::parser::ParsedScript;

/// A stateless pass over a parsed script producing non-overlapping edits.
pub trait ScriptEditor: Send + Sync {
    /// Registry name, e.g. `PlaceOpenBrace`.
    fn name(&self) -> &'static str;

    fn edits(&self, script: &ParsedScript, path: Option<&Path>) -> Vec<ScriptEdit>;
}
