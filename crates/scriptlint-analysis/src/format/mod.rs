//! Formatting: ordered editors applied through a re-parsing buffer.

pub mod builder;
pub mod editor;
pub mod editors;
pub mod formatter;

pub use builder::{EditorFactory, EditorServices, ScriptFormatterBuilder, DEFAULT_EDITOR_ORDER};
pub use editor::ScriptEditor;
pub use formatter::{EditorPass, FormatOutput, ScriptFormatter};
