//! # scriptlint-core
//!
//! Foundation crate for the scriptlint analysis engine.
//! Defines the shared vocabulary (extents, diagnostics, rule metadata,
//! suppression records), errors, config, tracing setup, and the segmented
//! LRU cache. Every other crate in the workspace depends on this.

pub mod cache;
pub mod config;
pub mod diagnostics;
pub mod edits;
pub mod errors;
pub mod rules;
pub mod suppression;
pub mod tracing;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use cache::SegmentedLruCache;
pub use config::ScriptLintConfig;
pub use diagnostics::{Correction, DiagnosticSeverity, ScriptDiagnostic, SuppressedDiagnostic};
pub use edits::ScriptEdit;
pub use errors::error_code::ScriptLintErrorCode;
pub use rules::{RuleInfo, RuleSource};
pub use suppression::RuleSuppression;
pub use types::collections::{FxHashMap, FxHashSet};
pub use types::extent::{LineIndex, ScriptExtent};
