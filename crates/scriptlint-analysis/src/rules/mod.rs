//! Rule contract, provider registry, and the built-in rules.

pub mod avoid_aliases;
pub mod duplicate_functions;
pub mod formatting;
pub mod registry;
pub mod semicolons;
pub mod traits;

pub use registry::{BuiltinRuleProvider, RuleDescriptor, RuleProvider, RuleServices, BUILTIN_RULES};
pub use traits::{RuleContext, ScriptRule};
