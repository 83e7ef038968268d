//! Rule identity and static capability metadata.

use std::fmt;

use serde::Serialize;

use crate::diagnostics::DiagnosticSeverity;

/// Where a rule comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RuleSource {
    /// Compiled into the engine's registration table.
    Builtin,
    /// Supplied by an embedding application through its own provider.
    Managed,
}

/// Identity and metadata of one rule. Constructed once as a constant and
/// shared by every analysis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RuleInfo {
    pub name: &'static str,
    pub namespace: &'static str,
    pub description: &'static str,
    pub severity: DiagnosticSeverity,
    /// Safe to run concurrently with other threadsafe rules.
    pub threadsafe: bool,
    /// Applying the rule's corrections twice yields the same text as once.
    pub idempotent: bool,
    pub source: RuleSource,
}

impl RuleInfo {
    /// Namespace used by every built-in rule.
    pub const BUILTIN_NAMESPACE: &'static str = "PS";

    /// A built-in rule, threadsafe and idempotent unless overridden.
    pub const fn builtin(name: &'static str, severity: DiagnosticSeverity) -> Self {
        Self {
            name,
            namespace: Self::BUILTIN_NAMESPACE,
            description: "",
            severity,
            threadsafe: true,
            idempotent: true,
            source: RuleSource::Builtin,
        }
    }

    /// A rule supplied outside the built-in table.
    pub const fn managed(
        namespace: &'static str,
        name: &'static str,
        severity: DiagnosticSeverity,
    ) -> Self {
        Self {
            name,
            namespace,
            description: "",
            severity,
            threadsafe: true,
            idempotent: true,
            source: RuleSource::Managed,
        }
    }

    pub const fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub const fn not_threadsafe(mut self) -> Self {
        self.threadsafe = false;
        self
    }

    pub const fn not_idempotent(mut self) -> Self {
        self.idempotent = false;
        self
    }

    /// `namespace/name`.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }

    /// Namespace glued onto the name, e.g. `PSAvoidUsingCmdletAliases`.
    pub fn prefixed_name(&self) -> String {
        format!("{}{}", self.namespace, self.name)
    }

    /// Case-insensitive match against the short, full, or prefixed name.
    pub fn matches_name(&self, candidate: &str) -> bool {
        candidate.eq_ignore_ascii_case(self.name)
            || candidate.eq_ignore_ascii_case(&self.full_name())
            || candidate.eq_ignore_ascii_case(&self.prefixed_name())
    }
}

impl fmt::Display for RuleInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: RuleInfo = RuleInfo::builtin("AvoidThing", DiagnosticSeverity::Warning)
        .with_description("Avoid the thing")
        .not_threadsafe();

    #[test]
    fn test_full_name_and_matching() {
        assert_eq!(SAMPLE.full_name(), "PS/AvoidThing");
        assert!(SAMPLE.matches_name("avoidthing"));
        assert!(SAMPLE.matches_name("ps/AVOIDTHING"));
        assert!(SAMPLE.matches_name("PSAvoidThing"));
        assert!(!SAMPLE.matches_name("Other"));
    }

    #[test]
    fn test_const_builder_flags() {
        assert!(!SAMPLE.threadsafe);
        assert!(SAMPLE.idempotent);
        assert_eq!(SAMPLE.source, RuleSource::Builtin);
    }
}
