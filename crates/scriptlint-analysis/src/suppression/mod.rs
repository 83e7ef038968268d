//! Suppression engine: comment pragmas → per-rule line ranges → filtered
//! diagnostics.

pub mod applier;
pub mod pragma;

pub use applier::{SuppressionApplier, SuppressionOutcome};
pub use pragma::{CommentPragmaParser, SuppressionTable};
