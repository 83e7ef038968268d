//! Edit application over a parsed script.

pub mod buffer;

pub use buffer::ScriptFormatBuffer;
pub use scriptlint_core::edits::ScriptEdit;
