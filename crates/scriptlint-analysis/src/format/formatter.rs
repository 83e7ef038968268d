//! Ordered editor pipeline.

use std::path::Path;
use std::sync::Arc;

use scriptlint_core::config::FormatterConfig;
use scriptlint_core::errors::{AnalysisError, AnalysisResult, ConfigError, EditError};
use serde::Serialize;

use super::builder::ScriptFormatterBuilder;
use super::editor::ScriptEditor;
use crate::edits::ScriptFormatBuffer;
use crate::parser::ScriptParser;

/// What one editor did during a format call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorPass {
    pub editor: &'static str,
    pub edits_applied: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatOutput {
    pub text: String,
    pub changed: bool,
    pub passes: Vec<EditorPass>,
}

/// Runs editors in a fixed order; each sees the re-parsed output of the
/// ones before it.
pub struct ScriptFormatter {
    editors: Vec<Box<dyn ScriptEditor>>,
    parser: Arc<dyn ScriptParser>,
}

impl ScriptFormatter {
    pub fn builder() -> ScriptFormatterBuilder {
        ScriptFormatterBuilder::new()
    }

    /// Formatter with the default editors for `config`.
    pub fn new(config: FormatterConfig) -> Result<Self, ConfigError> {
        ScriptFormatterBuilder::new().with_config(config).build()
    }

    pub(crate) fn from_parts(
        editors: Vec<Box<dyn ScriptEditor>>,
        parser: Arc<dyn ScriptParser>,
    ) -> Self {
        Self { editors, parser }
    }

    pub fn editor_names(&self) -> Vec<&'static str> {
        self.editors.iter().map(|e| e.name()).collect()
    }

    pub fn format(&self, text: &str) -> Result<FormatOutput, EditError> {
        self.format_with_path(text, None)
    }

    /// Format `text`, giving editors the script's path.
    ///
    /// An overlapping batch from any editor aborts the whole call.
    pub fn format_with_path(
        &self,
        text: &str,
        path: Option<&Path>,
    ) -> Result<FormatOutput, EditError> {
        let mut buffer = ScriptFormatBuffer::new(self.parser.as_ref(), text, path);
        let mut passes = Vec::with_capacity(self.editors.len());
        for editor in &self.editors {
            let edits = editor.edits(buffer.script(), buffer.path());
            if let Err(e) = buffer.apply_edits(&edits) {
                tracing::error!(editor = editor.name(), error = %e, "editor produced conflicting edits");
                return Err(e);
            }
            passes.push(EditorPass {
                editor: editor.name(),
                edits_applied: edits.len(),
            });
        }
        let formatted = buffer.text().to_string();
        Ok(FormatOutput {
            changed: formatted != text,
            text: formatted,
            passes,
        })
    }

    /// Read and format a file. The file is not written back.
    pub fn format_path(&self, path: &Path) -> AnalysisResult<FormatOutput> {
        let text = std::fs::read_to_string(path).map_err(|source| AnalysisError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.format_with_path(&text, Some(path))?)
    }
}
