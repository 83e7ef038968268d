//! # scriptlint-analysis
//!
//! The analysis engine: parser, rule executors, suppression, edit buffer,
//! formatter, built-in rules, command metadata, and the analyzer that ties
//! them together.

pub mod analyzer;
pub mod edits;
pub mod engine;
pub mod format;
pub mod metadata;
pub mod parser;
pub mod rules;
pub mod suppression;

pub use analyzer::{AnalysisOutput, FixOutput, ScriptAnalyzer, ScriptAnalyzerBuilder};
pub use edits::{ScriptEdit, ScriptFormatBuffer};
pub use engine::{create_executor, ExecutionPolicy, RuleExecutionError, RuleExecutor};
pub use format::{FormatOutput, ScriptEditor, ScriptFormatter, ScriptFormatterBuilder};
pub use metadata::{CachedCommandStore, CommandMetadata, CommandMetadataStore, InMemoryCommandStore};
pub use parser::{parse, ParsedScript, ScriptParser, StandardParser};
pub use rules::{BuiltinRuleProvider, RuleContext, RuleProvider, ScriptRule};
pub use suppression::{CommentPragmaParser, SuppressionApplier, SuppressionOutcome};
