//! Formatter pipeline: batch application, idempotence, editor assembly.

use std::path::Path;
use std::sync::Arc;

use proptest::prelude::*;
use scriptlint_analysis::edits::{ScriptEdit, ScriptFormatBuffer};
use scriptlint_analysis::format::{EditorPass, EditorServices, ScriptEditor, ScriptFormatter};
use scriptlint_analysis::parser::{ParsedScript, StandardParser};
use scriptlint_core::config::FormatterConfig;
use scriptlint_core::errors::{AnalysisError, ConfigError, EditError};

// ---- Helpers ----

fn format(src: &str) -> String {
    ScriptFormatter::new(FormatterConfig::default())
        .unwrap()
        .format(src)
        .unwrap()
        .text
}

/// Prepends a banner line taken from a shared service.
struct Banner(String);

struct BannerEditor {
    banner: Arc<Banner>,
}

impl BannerEditor {
    const NAME: &'static str = "Banner";
}

impl ScriptEditor for BannerEditor {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn edits(&self, script: &ParsedScript, _path: Option<&Path>) -> Vec<ScriptEdit> {
        if script.text().starts_with(&self.banner.0) {
            return Vec::new();
        }
        vec![ScriptEdit::insert(0, format!("{}\n", self.banner.0))]
    }
}

fn banner_editor(
    _config: &FormatterConfig,
    services: &EditorServices,
) -> Result<Box<dyn ScriptEditor>, ConfigError> {
    let banner = services.require::<Banner>(BannerEditor::NAME)?;
    Ok(Box::new(BannerEditor { banner }))
}

// ---- Edit batches ----

proptest! {
    #[test]
    fn prop_overlapping_batch_is_rejected_and_touching_batch_applies(
        text in "[a-z ]{10,40}",
        picks in proptest::collection::btree_set(0usize..=40, 3),
    ) {
        let offsets: Vec<usize> = picks.into_iter().map(|o| o.min(text.len())).collect();
        prop_assume!(offsets[0] < offsets[1] && offsets[1] < offsets[2]);
        let (a, b, c) = (offsets[0], offsets[1], offsets[2]);

        let mut buffer = ScriptFormatBuffer::new(&StandardParser, &text, None);
        let overlapping = [ScriptEdit::replace(a, c, "X"), ScriptEdit::replace(b, text.len(), "Y")];
        let is_overlap = matches!(buffer.apply_edits(&overlapping), Err(EditError::Overlap { .. }));
        prop_assert!(is_overlap);
        prop_assert_eq!(buffer.text(), text.as_str());

        let touching = [ScriptEdit::replace(a, b, "X"), ScriptEdit::replace(b, c, "Y")];
        prop_assert!(buffer.apply_edits(&touching).unwrap());
        let expected = format!("{}XY{}", &text[..a], &text[c..]);
        prop_assert_eq!(buffer.text(), expected.as_str());
    }
}

#[test]
fn test_out_of_bounds_batch_leaves_buffer_unchanged() {
    let mut buffer = ScriptFormatBuffer::new(&StandardParser, "foo", None);
    let edits = [ScriptEdit::insert(0, "a"), ScriptEdit::delete(2, 9)];
    assert!(matches!(
        buffer.apply_edits(&edits),
        Err(EditError::OutOfBounds { len: 3, .. })
    ));
    assert_eq!(buffer.text(), "foo");
}

// ---- Pipeline ----

#[test]
fn test_default_pipeline() {
    let formatter = ScriptFormatter::new(FormatterConfig::default()).unwrap();
    let out = formatter
        .format("function Get-A\n{\nif ($x)\n{\nfoo   \n}\n}\n")
        .unwrap();
    assert_eq!(out.text, "function Get-A {\n    if ($x) {\n        foo\n    }\n}\n");
    assert!(out.changed);
    assert_eq!(
        out.passes,
        vec![
            EditorPass {
                editor: "PlaceOpenBrace",
                edits_applied: 2
            },
            EditorPass {
                editor: "UseConsistentIndentation",
                edits_applied: 3
            },
            EditorPass {
                editor: "AvoidTrailingWhitespace",
                edits_applied: 1
            },
        ]
    );
}

#[test]
fn test_clean_script_is_unchanged() {
    let src = "try {\n    Get-Item |\n        Remove-Item\n}\ncatch {\n    $_\n}\n";
    let out = ScriptFormatter::new(FormatterConfig::default())
        .unwrap()
        .format(src)
        .unwrap();
    assert!(!out.changed);
    assert_eq!(out.text, src);
    assert!(out.passes.iter().all(|p| p.edits_applied == 0));
}

#[test]
fn test_format_is_idempotent_on_samples() {
    let samples = [
        "function Get-A\n{\nif ($x)\n{\nfoo   \n}\n}\n",
        "  Get-Item |\nRemove-Item  \n\t$a = 1\t\n",
        "if ($x) {\n$s = @\"\n  keep  \n\"@\n  }\n",
        "foreach ($i in $list)\n  {\n      # note  \n  bar -Path .\n  }\n",
    ];
    for src in samples {
        let once = format(src);
        assert_eq!(format(&once), once, "not idempotent for {src:?}");
    }
}

const LINES: &[&str] = &[
    "foo",
    "bar -Path .",
    "Get-Item |",
    "if ($x) {",
    "}",
    "# note",
    "$a = 1",
];

proptest! {
    #[test]
    fn prop_format_is_idempotent(
        lines in proptest::collection::vec(
            (0..LINES.len(), "[ \t]{0,3}", "[ \t]{0,3}"),
            0..12,
        )
    ) {
        let src: String = lines
            .iter()
            .map(|(i, lead, trail)| format!("{lead}{}{trail}\n", LINES[*i]))
            .collect();
        let once = format(&src);
        prop_assert_eq!(format(&once), once);
    }
}

// ---- Assembly ----

#[test]
fn test_custom_editor_requires_its_service() {
    let err = ScriptFormatter::builder()
        .register_editor(BannerEditor::NAME, banner_editor)
        .with_editors(["Banner"])
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, ConfigError::MissingService { ref editor, .. } if editor == "Banner"));

    let formatter = ScriptFormatter::builder()
        .register_editor(BannerEditor::NAME, banner_editor)
        .with_service(Arc::new(Banner("# generated".to_string())))
        .with_editors(["banner", "AvoidTrailingWhitespace"])
        .build()
        .unwrap();
    assert_eq!(formatter.editor_names(), vec!["Banner", "AvoidTrailingWhitespace"]);
    assert_eq!(formatter.format("foo  \n").unwrap().text, "# generated\nfoo\n");
    assert!(!formatter.format("# generated\nfoo\n").unwrap().changed);
}

#[test]
fn test_new_line_brace_style() {
    let config = FormatterConfig {
        open_brace_on_same_line: false,
        ..Default::default()
    };
    let out = ScriptFormatter::new(config).unwrap().format("if ($x) {\nfoo\n}\n").unwrap();
    assert_eq!(out.text, "if ($x)\n{\n    foo\n}\n");
}

#[test]
fn test_invalid_config_rejected() {
    let config = FormatterConfig {
        indent_size: 0,
        ..Default::default()
    };
    assert!(matches!(
        ScriptFormatter::new(config),
        Err(ConfigError::InvalidValue { .. })
    ));
}

// ---- Files ----

#[test]
fn test_format_path_reads_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("script.ps1");
    std::fs::write(&path, "foo  \n").unwrap();

    let formatter = ScriptFormatter::new(FormatterConfig::default()).unwrap();
    let out = formatter.format_path(&path).unwrap();
    assert_eq!(out.text, "foo\n");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "foo  \n");

    let missing = dir.path().join("missing.ps1");
    assert!(matches!(
        formatter.format_path(&missing),
        Err(AnalysisError::Io { .. })
    ));
}
