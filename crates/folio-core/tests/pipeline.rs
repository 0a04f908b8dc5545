//! End-to-end tests for the documentation pipeline.
//!
//! A small scripted backend stands in for a real interpreter session: it
//! remembers what earlier submissions bound and fails on unknown names, so
//! these tests can check ordering and state sharing across cells.

use std::collections::HashSet;
use std::fs;

use folio_core::{
    BackendError, Cell, DryRunBackend, Error, ExecutionBackend, Notebook, Output, Processor,
    ProcessorConfig,
};
use tempfile::TempDir;

// =============================================================================
// Test Helpers
// =============================================================================

/// Interprets a tiny line-oriented subset of Rust.
///
/// - `let x = ...` and `fn`/`struct`/`enum`/`trait` items bind their name
/// - `show_doc(x)` and `show_doc!(x)` display `x`, failing when `x` was
///   never bound
/// - `println!("...")` prints the literal in bold to stdout
#[derive(Default)]
struct ScriptedBackend {
    bound: HashSet<String>,
    submitted: Vec<String>,
    fail_on: Option<String>,
}

impl ScriptedBackend {
    fn failing_on(source: &str) -> Self {
        Self {
            fail_on: Some(source.to_string()),
            ..Default::default()
        }
    }
}

impl ExecutionBackend for ScriptedBackend {
    fn submit(&mut self, source: &str) -> Result<Vec<Output>, BackendError> {
        self.submitted.push(source.to_string());
        if self.fail_on.as_deref() == Some(source) {
            return Err(BackendError::new("worker crashed"));
        }

        let mut stdout = String::new();
        let mut outputs = Vec::new();
        for line in source.lines().map(str::trim) {
            if let Some(rest) = line.strip_prefix("let ") {
                let name: String = rest
                    .chars()
                    .take_while(|c| c.is_alphanumeric() || *c == '_')
                    .collect();
                self.bound.insert(name);
            } else if let Some(rest) = item_name(line) {
                let name: String = rest
                    .chars()
                    .take_while(|c| c.is_alphanumeric() || *c == '_')
                    .collect();
                self.bound.insert(name);
            } else if let Some(rest) = line
                .strip_prefix("show_doc(")
                .or_else(|| line.strip_prefix("show_doc!("))
            {
                let name = rest.trim_end_matches([')', ';']);
                if !self.bound.contains(name) {
                    return Err(BackendError::new(format!(
                        "cannot find value `{name}` in this scope"
                    )));
                }
                outputs.push(Output::markdown(&format!("**{name}**")));
            } else if let Some(rest) = line.strip_prefix("println!(\"") {
                let text = rest.trim_end_matches("\");");
                stdout.push_str(&format!("\x1b[1m{text}\x1b[0m\n"));
            }
        }
        if !stdout.is_empty() {
            outputs.insert(0, Output::stdout(&stdout));
        }
        Ok(outputs)
    }
}

/// The text after an item keyword, if `line` starts an item definition.
fn item_name(line: &str) -> Option<&str> {
    let line = line.strip_prefix("pub ").unwrap_or(line);
    ["fn ", "struct ", "enum ", "trait "]
        .iter()
        .find_map(|keyword| line.strip_prefix(keyword))
}

fn geometry_notebook() -> Notebook {
    Notebook::new(vec![
        Cell::markdown("# Geometry\n> Shapes and their areas"),
        Cell::code("//| export\npub fn area(r: f64) -> f64 { r * r }\nfn _helper() {}"),
        Cell::markdown("## Internals -"),
        Cell::code(
            "use std::fmt; //| hide_line\nprintln!(\"hi\");\nprintln!(\"DEBUG noise\");",
        ),
        Cell::code("let scratch = 1;"),
        Cell::code("%%bash\nls"),
    ])
}

fn processor_filtering(words: &[&str]) -> Processor {
    let config = ProcessorConfig {
        filter_words: words.iter().map(|w| w.to_string()).collect(),
        ..Default::default()
    };
    Processor::new(config).expect("valid config")
}

fn sources(nb: &Notebook) -> Vec<Option<&str>> {
    nb.cells.iter().map(|c| c.source.as_deref()).collect()
}

// =============================================================================
// Full document
// =============================================================================

#[test]
fn test_full_document() {
    let mut nb = geometry_notebook();
    let mut backend = ScriptedBackend::default();

    let report = processor_filtering(&["DEBUG"])
        .process(&mut nb, &mut backend)
        .expect("processing succeeds");

    assert_eq!(
        sources(&nb),
        vec![
            Some("---\ntitle: Geometry\ndescription: \"Shapes and their areas\"\n---\n"),
            Some(folio_core::AUTOGENERATED_WARNING),
            None,
            None,
            Some("//| echo: false\nshow_doc!(area)"),
            None,
            Some("println!(\"hi\");\nprintln!(\"DEBUG noise\");"),
            Some("let scratch = 1;"),
            Some("ls"),
        ]
    );

    assert!(nb.cells[0].is_raw());
    assert!(nb.cells[1].is_markdown());
    assert!(report.front_matter_inserted);
    assert!(report.warning_inserted);
    assert_eq!(report.stubs_inserted, 1);
    assert!(report.warnings.is_empty());
    assert_eq!(report.executed, vec![3, 4, 6]);

    // Hidden cells keep what they printed.
    assert_eq!(nb.cells[3].execution_count, Some(1));
    assert_eq!(
        nb.cells[4].outputs.as_deref(),
        Some(&[Output::markdown("**area**")][..])
    );
    assert_eq!(
        nb.cells[6].outputs.as_deref(),
        Some(&[Output::stdout("hi\n")][..])
    );
    assert_eq!(nb.cells[7].execution_count, None);
    assert_eq!(nb.cells[8].language(), Some("bash"));

    assert_eq!(backend.submitted[0], "use folio::show_doc;");
    assert_eq!(backend.submitted.len(), 4);
}

#[test]
fn test_processing_twice_changes_nothing_further() {
    let processor = processor_filtering(&["DEBUG"]);
    let mut once = geometry_notebook();
    processor.process(&mut once, DryRunBackend::new()).unwrap();

    let mut twice = once.clone();
    let report = processor.process(&mut twice, DryRunBackend::new()).unwrap();

    assert_eq!(sources(&twice), sources(&once));
    assert_eq!(
        twice.cells.iter().map(|c| c.kind).collect::<Vec<_>>(),
        once.cells.iter().map(|c| c.kind).collect::<Vec<_>>()
    );
    assert_eq!(
        twice.cells.iter().map(|c| &c.metadata).collect::<Vec<_>>(),
        once.cells.iter().map(|c| &c.metadata).collect::<Vec<_>>()
    );
    assert!(!report.front_matter_inserted);
    assert!(!report.warning_inserted);
    assert_eq!(report.stubs_inserted, 0);
}

// =============================================================================
// Execution
// =============================================================================

#[test]
fn test_bindings_are_visible_to_later_cells() {
    let mut nb = Notebook::new(vec![
        Cell::code("//| export\nlet a = 1;"),
        Cell::code("show_doc(a)"),
    ]);
    let mut backend = ScriptedBackend::default();

    let report = Processor::new(ProcessorConfig::default())
        .unwrap()
        .process(&mut nb, &mut backend)
        .unwrap();

    // The warning lands at position 1 and shifts both cells.
    assert_eq!(report.executed, vec![0, 2]);
    assert_eq!(
        backend.submitted,
        vec!["use folio::show_doc;", "//| export\nlet a = 1;", "show_doc(a)"]
    );
    assert_eq!(
        nb.cells[2].outputs.as_deref(),
        Some(&[Output::markdown("**a**")][..])
    );
}

#[test]
fn test_stubs_for_types_and_traits_run() {
    let mut nb = Notebook::new(vec![Cell::code(
        "//| export\n\
         pub struct Point { pub x: i32 }\n\
         pub enum Shape { Square }\n\
         pub trait Draw {}",
    )]);
    let mut backend = ScriptedBackend::default();

    let report = Processor::new(ProcessorConfig::default())
        .unwrap()
        .process(&mut nb, &mut backend)
        .unwrap();

    assert_eq!(report.stubs_inserted, 3);
    assert_eq!(
        backend.submitted[2..],
        ["show_doc!(Point)", "show_doc!(Shape)", "show_doc!(Draw)"]
    );
    assert_eq!(
        nb.cells[3].outputs.as_deref(),
        Some(&[Output::markdown("**Shape**")][..])
    );
}

#[test]
fn test_failure_aborts_with_cell_position() {
    let mut nb = Notebook::new(vec![
        Cell::code("show_doc(a)"),
        Cell::code("//| export\nlet a = 1;"),
    ]);
    let mut backend = ScriptedBackend::default();

    let err = Processor::new(ProcessorConfig::default())
        .unwrap()
        .process(&mut nb, &mut backend)
        .unwrap_err();

    match err {
        Error::Execution { cell, message } => {
            assert_eq!(cell, 0);
            assert!(message.contains("cannot find value `a`"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(backend.submitted.len(), 2);
}

#[test]
fn test_bootstrap_failure() {
    let mut nb = Notebook::new(vec![Cell::code("use std::fmt;")]);
    let backend = ScriptedBackend::failing_on("use folio::show_doc;");

    let err = Processor::new(ProcessorConfig::default())
        .unwrap()
        .process(&mut nb, backend)
        .unwrap_err();

    assert!(matches!(err, Error::Bootstrap(_)));
    assert_eq!(nb.cells[0].execution_count, None);
}

#[test]
fn test_unparseable_cell_is_reported_and_skipped() {
    let mut nb = Notebook::new(vec![
        Cell::markdown("notes"),
        Cell::code("let broken = ;"),
        Cell::code("use std::fmt;"),
    ]);

    let report = Processor::new(ProcessorConfig::default())
        .unwrap()
        .process(&mut nb, DryRunBackend::new())
        .unwrap();

    assert_eq!(report.executed, vec![3]);
    assert_eq!(report.warnings.len(), 1);
    assert!(matches!(report.warnings[0], Error::Parse { cell: 2, .. }));
    assert_eq!(nb.cells[2].text(), "let broken = ;");
}

// =============================================================================
// Edge cases
// =============================================================================

#[test]
fn test_cells_without_source_are_left_alone() {
    let mut cleared = Cell::code("//| hide\nsetup();")
        .with_outputs(vec![Output::stdout("\x1b[31mDEBUG\x1b[0m\n")]);
    cleared.clear_source();
    let cells = vec![Cell::markdown(""), Cell::code(""), cleared];
    let mut nb = Notebook::new(cells.clone());

    processor_filtering(&["DEBUG"])
        .process(&mut nb, DryRunBackend::new())
        .unwrap();

    assert_eq!(nb.len(), 4);
    assert_eq!(nb.cells[0], cells[0]);
    assert_eq!(&nb.cells[2..], &cells[1..]);
}

#[test]
fn test_invalid_filter_is_rejected_up_front() {
    let config = ProcessorConfig {
        filter_words: vec!["(".to_string()],
        ..Default::default()
    };
    assert!(matches!(
        Processor::new(config),
        Err(Error::Configuration(_))
    ));
}

#[test]
fn test_empty_notebook() {
    let mut nb = Notebook::default();
    let report = Processor::new(ProcessorConfig::default())
        .unwrap()
        .process(&mut nb, DryRunBackend::new())
        .unwrap();

    assert_eq!(nb.len(), 1);
    assert!(report.executed.is_empty());
    assert!(report.warning_inserted);
}

// =============================================================================
// Files
// =============================================================================

#[test]
fn test_process_file_round_trip() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("shapes.ipynb");
    fs::write(
        &input,
        r##"{
  "cells": [
    {"cell_type": "markdown", "metadata": {}, "source": ["# Shapes\n", "> Basic shapes"]},
    {"cell_type": "code", "metadata": {}, "execution_count": null, "outputs": [],
     "source": ["//| export\n", "pub struct Square;"]}
  ],
  "metadata": {"kernelspec": {"name": "rust"}},
  "nbformat": 4,
  "nbformat_minor": 5
}"##,
    )
    .unwrap();

    let mut nb = Notebook::read_from_file(&input).unwrap();
    Processor::new(ProcessorConfig::default())
        .unwrap()
        .process(&mut nb, DryRunBackend::new())
        .unwrap();
    let output = temp.path().join("shapes.processed.ipynb");
    nb.write_to_file(&output).unwrap();

    let reread = Notebook::read_from_file(&output).unwrap();
    assert_eq!(reread, nb);
    assert_eq!(reread.metadata["kernelspec"]["name"], "rust");
    assert!(
        reread
            .cells
            .iter()
            .any(|c| c.source.as_deref() == Some("//| echo: false\nshow_doc!(Square)"))
    );
}
