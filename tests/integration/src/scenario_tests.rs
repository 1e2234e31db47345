//! End-to-end scenarios
//!
//! Each scenario lays out a tree with an `eclint.toml`, loads it the way a
//! caller would, and runs check and format batches against the fixture
//! checks.

use std::rc::Rc;

use eclint_core::{
    FailureCause, LintConfig, LintLogger, LogLevel, MemorySink, TracingSink, Verdict, logging,
    run_batch,
};
use eclint_fs::NormalizedPath;
use eclint_test_utils::{FixtureChecks, TestTree};
use pretty_assertions::assert_eq;

// =============================================================================
// Test Infrastructure
// =============================================================================

const TRIM_TXT: &str = r#"
[[sections]]
pattern = "*.txt"
properties = { trim_trailing_whitespace = "true" }
"#;

enum Run {
    Check,
    Format,
}

/// Load `eclint.toml` from the tree and run one batch.
fn run(tree: &TestTree, mode: Run) -> (Verdict, MemorySink) {
    let config = LintConfig::load(&tree.root().join("eclint.toml")).unwrap();
    let resolver = config.resolver(tree.root().clone()).unwrap();
    let request = match mode {
        Run::Check => config.check_request(tree.root().clone()),
        Run::Format => config.format_request(tree.root().clone()),
    };
    let sink = MemorySink::new();
    let logger = Rc::new(LintLogger::new(LogLevel::Info, sink.clone()));

    let verdict = run_batch(&request, &resolver, &[&FixtureChecks::standard()], logger).unwrap();
    (verdict, sink)
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn scenario_check_then_format_then_format_again() {
    let tree = TestTree::new();
    tree.write("eclint.toml", TRIM_TXT);
    tree.write("a.txt", "line \nclean\n");
    tree.write("b.txt", "clean\n");

    let (check, sink) = run(&tree, Run::Check);
    assert!(!check.success);
    assert_eq!(check.cause, Some(FailureCause::Violations));
    assert_eq!(check.findings, 1);
    assert_eq!(check.files_with_findings, 1);
    assert_eq!(
        sink.messages_at(LogLevel::Error),
        vec![
            "a.txt@1,5: Delete 1 trailing whitespace characters [trim-trailing-whitespace]",
            "Run 'eclint format' to fix them automatically",
        ]
    );
    tree.assert_content("a.txt", "line \nclean\n");

    let (format, _) = run(&tree, Run::Format);
    assert!(format.success);
    assert_eq!(format.files_with_findings, 1);
    tree.assert_content("a.txt", "line\nclean\n");
    tree.assert_file_missing("a.txt.bak");

    let (again, _) = run(&tree, Run::Format);
    assert_eq!(again.files_with_findings, 0);
    assert_eq!(again.summary, "Processed 2 files, formatted 0 files");

    let (recheck, _) = run(&tree, Run::Check);
    assert!(recheck.success);
    assert_eq!(recheck.findings, 0);
}

#[test]
fn scenario_backup_and_custom_suffix() {
    let tree = TestTree::new();
    tree.write(
        "eclint.toml",
        &format!("backup = true\nbackup_suffix = \".orig\"\n{}", TRIM_TXT),
    );
    tree.write("docs/a.txt", "x \t\n");

    let (verdict, _) = run(&tree, Run::Format);

    assert!(verdict.success);
    tree.assert_content("docs/a.txt", "x\n");
    tree.assert_content("docs/a.txt.orig", "x \t\n");
}

#[test]
fn scenario_check_entries_and_excludes() {
    let tree = TestTree::new();
    tree.write(
        "eclint.toml",
        &format!(
            r#"excludes = ["vendor/**"]
{}
[[sections]]
pattern = "*.md"
properties = {{ indent_style = "space" }}

[[checks]]
id = "trim-trailing-whitespace"
excludes = ["generated/**"]
"#,
            TRIM_TXT
        ),
    );
    tree.write("src/a.txt", "a \n");
    tree.write("generated/b.txt", "b \n");
    tree.write("vendor/c.txt", "c \n");
    tree.write("README.md", "\tindented\n");

    let (verdict, sink) = run(&tree, Run::Check);

    assert_eq!(verdict.files_scanned, 4);
    assert_eq!(verdict.findings, 2);
    assert_eq!(
        sink.messages_at(LogLevel::Error),
        vec![
            "README.md@1,1: Indent with spaces instead of tabs [indent-style]",
            "src/a.txt@1,2: Delete 1 trailing whitespace characters [trim-trailing-whitespace]",
            "Run 'eclint format' to fix them automatically",
        ]
    );
}

#[test]
fn scenario_format_warns_about_unfixable_findings() {
    let tree = TestTree::new();
    tree.write(
        "eclint.toml",
        "[[sections]]\npattern = \"*.md\"\nproperties = { indent_style = \"space\" }\n",
    );
    tree.write("README.md", "\tindented\n");

    let (verdict, sink) = run(&tree, Run::Format);

    assert!(verdict.success);
    assert_eq!(verdict.files_with_findings, 0);
    assert_eq!(
        sink.messages_at(LogLevel::Warn),
        vec!["README.md@1,1: Indent with spaces instead of tabs [indent-style] cannot be fixed automatically"]
    );
    tree.assert_content("README.md", "\tindented\n");
}

#[test]
fn scenario_json_config_without_matching_properties() {
    let tree = TestTree::new();
    tree.write(
        "eclint.json",
        r#"{ "fail_on_no_matching_properties": false, "sections": [] }"#,
    );
    tree.write("a.txt", "a \n");

    let config = LintConfig::load(&tree.root().join("eclint.json")).unwrap();
    let resolver = config.resolver(tree.root().clone()).unwrap();
    let sink = MemorySink::new();
    let logger = Rc::new(LintLogger::new(LogLevel::Info, sink.clone()));

    let verdict = run_batch(
        &config.check_request(tree.root().clone()),
        &resolver,
        &[&FixtureChecks::standard()],
        logger,
    )
    .unwrap();

    assert!(verdict.success);
    assert_eq!(verdict.files_matched, 0);
    assert_eq!(sink.messages_at(LogLevel::Warn).len(), 1);
}

#[test]
fn scenario_tracing_sink() {
    let _ = logging::init();
    let tree = TestTree::new();
    tree.write("eclint.toml", TRIM_TXT);
    tree.write("a.txt", "a\n");

    let config = LintConfig::load(&NormalizedPath::new(tree.path("eclint.toml"))).unwrap();
    let resolver = config.resolver(tree.root().clone()).unwrap();
    let verdict = run_batch(
        &config.check_request(tree.root().clone()),
        &resolver,
        &[&FixtureChecks::standard()],
        Rc::new(LintLogger::new(LogLevel::Debug, TracingSink)),
    )
    .unwrap();

    assert!(verdict.success);
}
