//! Analyzer end to end: rule set assembly, suppression, filtering, files,
//! and fix mode.

use std::sync::Arc;

use scriptlint_analysis::metadata::{CommandMetadata, InMemoryCommandStore};
use scriptlint_analysis::rules::{BuiltinRuleProvider, RuleContext, RuleProvider, ScriptRule};
use scriptlint_analysis::ScriptAnalyzer;
use scriptlint_core::config::ScriptLintConfig;
use scriptlint_core::diagnostics::{Correction, DiagnosticSeverity, ScriptDiagnostic};
use scriptlint_core::errors::{AnalysisError, ConfigError, RuleError};
use scriptlint_core::rules::RuleInfo;

// ---- Helpers ----

fn config(toml: &str) -> ScriptLintConfig {
    ScriptLintConfig::from_toml(toml).unwrap()
}

fn default_analyzer() -> ScriptAnalyzer {
    ScriptAnalyzer::builder().build().unwrap()
}

fn rule_names(diagnostics: &[ScriptDiagnostic]) -> Vec<&str> {
    diagnostics
        .iter()
        .map(|d| d.rule_name.as_deref().unwrap_or("<parse>"))
        .collect()
}

/// Flags every occurrence of `from` whose text differs from `to`, offering
/// `to` as the replacement.
struct ReplaceRule {
    info: RuleInfo,
    from: &'static str,
    to: &'static str,
    ignore_case: bool,
}

impl ReplaceRule {
    fn new(info: RuleInfo, from: &'static str, to: &'static str) -> Self {
        Self {
            info,
            from,
            to,
            ignore_case: false,
        }
    }

    fn ignoring_case(mut self) -> Self {
        self.ignore_case = true;
        self
    }
}

impl ScriptRule for ReplaceRule {
    fn info(&self) -> &RuleInfo {
        &self.info
    }

    fn analyze(&self, ctx: &RuleContext<'_>) -> Result<Vec<ScriptDiagnostic>, RuleError> {
        let text = ctx.script.text();
        let mut diagnostics = Vec::new();
        for start in 0..text.len() {
            let Some(slice) = text.get(start..start + self.from.len()) else {
                continue;
            };
            let hit = if self.ignore_case {
                slice.eq_ignore_ascii_case(self.from)
            } else {
                slice == self.from
            };
            if hit && slice != self.to {
                let extent = ctx.script.extent(start, start + self.from.len());
                diagnostics.push(
                    ctx.diagnostic(&self.info, format!("replace {slice}"), extent.clone())
                        .with_correction(Correction::new(extent, self.to)),
                );
            }
        }
        Ok(diagnostics)
    }
}

/// Always offers to insert `#` at the start of the script.
struct PrefixRule(RuleInfo);

impl ScriptRule for PrefixRule {
    fn info(&self) -> &RuleInfo {
        &self.0
    }

    fn analyze(&self, ctx: &RuleContext<'_>) -> Result<Vec<ScriptDiagnostic>, RuleError> {
        let extent = ctx.script.extent(0, 0);
        Ok(vec![ctx
            .diagnostic(&self.0, "prefix", extent.clone())
            .with_correction(Correction::new(extent, "#"))])
    }
}

struct FailRule(RuleInfo);

impl ScriptRule for FailRule {
    fn info(&self) -> &RuleInfo {
        &self.0
    }

    fn analyze(&self, _ctx: &RuleContext<'_>) -> Result<Vec<ScriptDiagnostic>, RuleError> {
        Err(RuleError::failed("boom"))
    }
}

struct TestProvider(Vec<Arc<dyn ScriptRule>>);

impl RuleProvider for TestProvider {
    fn name(&self) -> &str {
        "test"
    }

    fn rules(&self, _config: &ScriptLintConfig) -> Result<Vec<Arc<dyn ScriptRule>>, ConfigError> {
        Ok(self.0.clone())
    }
}

fn test_info(name: &'static str) -> RuleInfo {
    RuleInfo::managed("Test", name, DiagnosticSeverity::Warning)
}

fn custom_analyzer(rules: Vec<Arc<dyn ScriptRule>>, toml: &str) -> ScriptAnalyzer {
    ScriptAnalyzer::builder()
        .with_config(config(toml))
        .without_builtin_rules()
        .with_provider(TestProvider(rules))
        .build()
        .unwrap()
}

// ---- Rule set assembly ----

#[test]
fn test_default_rule_set() {
    let analyzer = default_analyzer();
    let mut names: Vec<&str> = analyzer.rules().map(|r| r.name).collect();
    names.sort_unstable();
    assert_eq!(
        names,
        vec![
            "AvoidDuplicateFunctionDefinitions",
            "AvoidSemicolonsAsLineTerminators",
            "AvoidTrailingWhitespace",
            "AvoidUsingCmdletAliases",
            "PlaceOpenBrace",
            "UseConsistentIndentation",
        ]
    );
    assert_eq!(analyzer.rule_count(), BuiltinRuleProvider::new().descriptors().len());
}

#[test]
fn test_include_exclude_and_disable() {
    let analyzer = ScriptAnalyzer::builder()
        .with_config(config(
            "[analyzer]\ninclude_rules = [\"PS/Avoid*\"]\nexclude_rules = [\"*Semicolon*\"]\n",
        ))
        .build()
        .unwrap();
    let mut names: Vec<&str> = analyzer.rules().map(|r| r.name).collect();
    names.sort_unstable();
    assert_eq!(
        names,
        vec![
            "AvoidDuplicateFunctionDefinitions",
            "AvoidTrailingWhitespace",
            "AvoidUsingCmdletAliases",
        ]
    );

    let analyzer = ScriptAnalyzer::builder()
        .with_config(config("[analyzer.rules.PSAvoidUsingCmdletAliases]\nenable = false\n"))
        .build()
        .unwrap();
    assert_eq!(analyzer.rule_count(), 5);
    assert!(analyzer.analyze_script("gci\n", None).is_empty());
}

#[test]
fn test_duplicate_registration_rejected() {
    let clash = ReplaceRule::new(
        RuleInfo::builtin("avoidusingcmdletaliases", DiagnosticSeverity::Warning),
        "a",
        "b",
    );
    let err = ScriptAnalyzer::builder()
        .with_provider(TestProvider(vec![Arc::new(clash)]))
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, ConfigError::DuplicateRule { .. }));
}

#[test]
fn test_invalid_pattern_rejected() {
    let mut cfg = ScriptLintConfig::default();
    cfg.analyzer.include_rules = vec!["[".to_string()];
    let err = ScriptAnalyzer::builder().with_config(cfg).build().err().unwrap();
    assert!(matches!(err, ConfigError::InvalidPattern { .. }));
}

// ---- Analysis ----

#[test]
fn test_builtin_rules_report_in_source_order() {
    let out = default_analyzer().analyze_script_full("gci\nfunction A {}\nfunction A {}\n", None);
    assert_eq!(
        rule_names(&out.diagnostics),
        vec!["AvoidUsingCmdletAliases", "AvoidDuplicateFunctionDefinitions"]
    );
    assert_eq!(out.diagnostics[0].corrections[0].replacement, "Get-ChildItem");
    assert_eq!(out.diagnostics[1].line(), 3);
    assert_eq!(out.diagnostics[1].message, "Function 'A' is already defined on line 2.");
    assert!(!out.has_rule_failures());
}

#[test]
fn test_injected_command_store_and_allowlist() {
    let store = InMemoryCommandStore::new()
        .with_command(CommandMetadata::new("Invoke-Thing").with_aliases(&["ith"]));
    let analyzer = ScriptAnalyzer::builder()
        .with_builtin_provider(BuiltinRuleProvider::new().with_command_store(Arc::new(store)))
        .build()
        .unwrap();
    let diagnostics = analyzer.analyze_script("ith\ngci\n", None);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].suppression_id.as_deref(), Some("ith"));

    let analyzer = ScriptAnalyzer::builder()
        .with_config(config("[analyzer.rules.AvoidUsingCmdletAliases]\nallowlist = [\"gci\"]\n"))
        .build()
        .unwrap();
    assert_eq!(analyzer.analyze_script("gci\nls\n", None).len(), 1);

    let err = ScriptAnalyzer::builder()
        .with_config(config("[analyzer.rules.AvoidUsingCmdletAliases]\nallowlist = 3\n"))
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, ConfigError::InvalidValue { .. }));
}

#[test]
fn test_pragma_suppression_is_reported_separately() {
    let out = default_analyzer().analyze_script_full(
        "# scriptlint-suppress AvoidUsingCmdletAliases -- legacy\ngci\ngci\n",
        None,
    );
    assert_eq!(out.diagnostics.len(), 1);
    assert_eq!(out.diagnostics[0].line(), 3);
    assert_eq!(out.suppressed.len(), 1);
    assert_eq!(out.suppressed[0].justification(), Some("legacy"));
    assert_eq!(out.suppressed[0].diagnostic.line(), 2);
}

#[test]
fn test_custom_suppression_marker() {
    let analyzer = ScriptAnalyzer::builder()
        .with_config(config("[analyzer]\nsuppression_marker = \"lint\"\n"))
        .build()
        .unwrap();
    assert!(analyzer
        .analyze_script("# lint-suppress PS/AvoidUsingCmdletAliases\ngci\n", None)
        .is_empty());
    assert_eq!(
        analyzer
            .analyze_script("# scriptlint-suppress AvoidUsingCmdletAliases\ngci\n", None)
            .len(),
        1
    );
}

#[test]
fn test_severity_filter_keeps_parse_errors() {
    let analyzer = ScriptAnalyzer::builder()
        .with_config(config("[analyzer]\nseverity = [\"Information\"]\n"))
        .build()
        .unwrap();
    let out = analyzer.analyze_script_full("gci  \nfoo }\n", None);
    assert_eq!(
        rule_names(&out.diagnostics),
        vec!["AvoidTrailingWhitespace", "<parse>"]
    );
    assert_eq!(out.diagnostics[1].severity, DiagnosticSeverity::ParseError);
    assert_eq!(out.parse_issues.len(), 1);
}

#[test]
fn test_deeply_nested_script_reports_parse_error() {
    let analyzer = default_analyzer();
    for opener in ["{", "("] {
        let out = analyzer.analyze_script_full(&opener.repeat(100_000), None);
        assert!(out
            .parse_issues
            .iter()
            .any(|issue| issue.message == "nesting too deep"));
        assert!(out
            .diagnostics
            .iter()
            .any(|d| d.severity == DiagnosticSeverity::ParseError && d.message == "nesting too deep"));
    }
}

#[test]
fn test_rule_failure_is_recorded_not_raised() {
    let analyzer = custom_analyzer(
        vec![
            Arc::new(FailRule(test_info("Fail"))),
            Arc::new(ReplaceRule::new(test_info("Foo"), "foo", "bar")),
        ],
        "",
    );
    let out = analyzer.analyze_script_full("foo\n", None);
    assert_eq!(rule_names(&out.diagnostics), vec!["Foo"]);
    assert!(out.has_rule_failures());
    assert_eq!(out.errors.len(), 1);
    assert_eq!(out.errors[0].rule_name, "Test/Fail");
}

#[test]
fn test_parallel_and_sequential_agree() {
    let src = "gci | ? { $_ };\nfunction A {}\nfunction A {}\nif ($x)\n{\n  foo  \n}\n";
    let sequential = ScriptAnalyzer::builder()
        .with_config(config("[analyzer]\nparallel = false\n"))
        .build()
        .unwrap();
    let parallel = ScriptAnalyzer::builder()
        .with_config(config("[analyzer]\nparallel = true\nthreads = 3\n"))
        .build()
        .unwrap();
    let expected = sequential.analyze_script(src, None);
    assert!(!expected.is_empty());
    for _ in 0..5 {
        assert_eq!(parallel.analyze_script(src, None), expected);
    }
}

#[test]
fn test_json_report() {
    let out = default_analyzer().analyze_script_full("gci\n", None);
    let json = out.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(
        value["diagnostics"][0]["rule_name"],
        serde_json::json!("AvoidUsingCmdletAliases")
    );
    assert!(value.get("errors").is_none());
}

// ---- Files ----

#[test]
fn test_analyze_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("script.ps1");
    std::fs::write(&path, "gci\n").unwrap();

    let analyzer = default_analyzer();
    let diagnostics = analyzer.analyze_path(&path).unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].script_path.as_deref(), Some(path.as_path()));

    let err = analyzer.analyze_path(&dir.path().join("missing.ps1")).unwrap_err();
    assert!(matches!(err, AnalysisError::Io { .. }));
}

// ---- Fix mode ----

#[test]
fn test_fix_applies_builtin_corrections() {
    let out = default_analyzer().fix("gci;\n", None).unwrap();
    assert_eq!(out.text, "Get-ChildItem\n");
    assert_eq!(out.applied, 2);
    assert_eq!(out.passes, 1);
}

#[test]
fn test_fix_defers_conflicting_corrections() {
    let analyzer = custom_analyzer(
        vec![
            Arc::new(ReplaceRule::new(test_info("Head"), "hel", "HEL")),
            Arc::new(ReplaceRule::new(test_info("Tail"), "llo", "LLO").ignoring_case()),
        ],
        "",
    );
    let out = analyzer.fix("hello world\n", None).unwrap();
    assert_eq!(out.text, "HELLO world\n");
    assert_eq!(out.applied, 2);
    assert_eq!(out.passes, 2);
}

#[test]
fn test_fix_applies_non_idempotent_rules_once() {
    let analyzer = custom_analyzer(
        vec![Arc::new(PrefixRule(test_info("Prefix").not_idempotent()))],
        "",
    );
    let out = analyzer.fix("foo\n", None).unwrap();
    assert_eq!(out.text, "#foo\n");
    assert_eq!(out.applied, 1);
    assert_eq!(out.passes, 1);
}

#[test]
fn test_fix_stops_at_pass_limit() {
    let analyzer = custom_analyzer(
        vec![Arc::new(PrefixRule(test_info("Prefix")))],
        "[analyzer]\nmax_fix_passes = 3\n",
    );
    let out = analyzer.fix("foo\n", None).unwrap();
    assert_eq!(out.text, "###foo\n");
    assert_eq!(out.passes, 3);
}

#[test]
fn test_fix_leaves_clean_script_alone() {
    let out = default_analyzer().fix("Get-ChildItem\n", None).unwrap();
    assert_eq!(out.text, "Get-ChildItem\n");
    assert_eq!(out.applied, 0);
    assert_eq!(out.passes, 0);
}
