//! Parse-tree analysis of code cells.
//!
//! Decides which cells carry imports, exportable definitions, or show-doc
//! invocations. A cell that fails to parse is reported once as
//! [`Error::Parse`] and then treated as having no statements.

mod parser;
mod tree;

pub use parser::parse_source;
pub use tree::{DefinitionKind, ParseTree, Statement};

use rustc_hash::FxHashSet;

use crate::error::{Error, Result};
use crate::notebook::{Cell, Notebook};
use crate::transform::blank_magic_lines;

/// Parses cells against a fixed show-doc function name.
#[derive(Debug, Clone)]
pub struct Analyzer {
    show_doc_name: String,
}

impl Analyzer {
    pub fn new(show_doc_name: impl Into<String>) -> Self {
        Self {
            show_doc_name: show_doc_name.into(),
        }
    }

    pub fn show_doc_name(&self) -> &str {
        &self.show_doc_name
    }

    /// Parse the cell at `index`.
    ///
    /// Non-code cells, cells without source, and cells tagged with another
    /// language yield an empty tree. Magic lines and session commands
    /// (`:dep ...`) are not Rust and are ignored.
    pub fn parse_cell(&self, index: usize, cell: &Cell) -> Result<ParseTree> {
        if !cell.is_code() || !cell.has_source() || cell.language().is_some() {
            return Ok(ParseTree::default());
        }
        let source = blank_magic_lines(cell.text());
        parse_source(&source, &self.show_doc_name).map_err(|e| {
            let start = e.span().start();
            Error::Parse {
                cell: index,
                line: start.line,
                column: start.column + 1,
                message: e.to_string(),
            }
        })
    }

    /// Parse the cell at `index`, recovering from a parse failure.
    ///
    /// The failure is pushed onto `warnings` and an empty tree is returned.
    pub fn parse_or_recover(
        &self,
        index: usize,
        cell: &Cell,
        warnings: &mut Vec<Error>,
    ) -> ParseTree {
        match self.parse_cell(index, cell) {
            Ok(tree) => tree,
            Err(err) => {
                tracing::warn!("{}", err);
                warnings.push(err);
                ParseTree::default()
            }
        }
    }

    /// Every identifier already passed to a show-doc call anywhere in the notebook.
    ///
    /// Cells that fail to parse contribute nothing.
    pub fn shown_names(&self, notebook: &Notebook) -> FxHashSet<String> {
        notebook
            .cells
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| self.parse_cell(i, cell).ok())
            .flat_map(|tree| {
                tree.show_doc_targets()
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

/// Public definition names of `tree` that are not in `exclude`, in source order.
///
/// Names starting with `_` are private and never returned.
pub fn definition_names(tree: &ParseTree, exclude: &FxHashSet<String>) -> Vec<String> {
    tree.definitions()
        .map(|(name, _)| name)
        .filter(|name| !name.starts_with('_') && !exclude.contains(*name))
        .map(str::to_string)
        .collect()
}

/// Identifiers passed to show-doc calls across `trees`, in order.
pub fn show_doc_targets<'a>(trees: impl IntoIterator<Item = &'a ParseTree>) -> Vec<String> {
    trees
        .into_iter()
        .flat_map(ParseTree::show_doc_targets)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_names_skip_private_and_excluded() {
        let tree = parse_source(
            "pub fn foo() {}\nfn _bar() {}\nstruct Baz;\nfn shown() {}",
            "show_doc",
        )
        .unwrap();
        let exclude: FxHashSet<String> = ["shown".to_string()].into_iter().collect();

        assert_eq!(definition_names(&tree, &exclude), vec!["foo", "Baz"]);
    }

    #[test]
    fn test_show_doc_targets_across_trees() {
        let a = parse_source("show_doc(foo)", "show_doc").unwrap();
        let b = parse_source("let x = 1;\nshow_doc(Bar);", "show_doc").unwrap();
        assert_eq!(show_doc_targets([&a, &b]), vec!["foo", "Bar"]);
    }

    #[test]
    fn test_custom_show_doc_name() {
        let analyzer = Analyzer::new("doc");
        let tree = analyzer
            .parse_cell(0, &Cell::code("doc(foo);\nshow_doc(bar);"))
            .unwrap();
        assert_eq!(tree.show_doc_targets().collect::<Vec<_>>(), vec!["foo"]);
    }

    #[test]
    fn test_parse_error_carries_cell_position() {
        let analyzer = Analyzer::new("show_doc");
        let err = analyzer.parse_cell(4, &Cell::code("let = ;")).unwrap_err();
        match err {
            Error::Parse { cell, line, .. } => {
                assert_eq!(cell, 4);
                assert_eq!(line, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_recover_records_warning() {
        let analyzer = Analyzer::new("show_doc");
        let mut warnings = Vec::new();
        let tree = analyzer.parse_or_recover(2, &Cell::code("fn ("), &mut warnings);
        assert!(tree.is_empty());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].is_recoverable());
    }

    #[test]
    fn test_magic_lines_are_ignored() {
        let analyzer = Analyzer::new("show_doc");
        let tree = analyzer
            .parse_cell(0, &Cell::code("%time\nuse std::fmt;"))
            .unwrap();
        assert!(tree.has_import());
    }

    #[test]
    fn test_session_commands_are_ignored() {
        let analyzer = Analyzer::new("show_doc");
        let cell = Cell::code(":dep serde = \"1\"\n  :timing\nuse serde::Serialize;");
        let tree = analyzer.parse_cell(0, &cell).unwrap();
        assert!(tree.has_import());
        assert!(crate::execute::should_execute(&cell, &tree));

        let rooted = analyzer
            .parse_cell(0, &Cell::code("::std::mem::drop(1);\nlet x\n    : u32 = 1;"))
            .unwrap();
        assert_eq!(rooted.len(), 2);
    }

    #[test]
    fn test_other_language_cells_parse_empty() {
        let analyzer = Analyzer::new("show_doc");
        let mut cell = Cell::code("%%bash\nls -la");
        cell.set_language("bash");
        assert!(analyzer.parse_cell(0, &cell).unwrap().is_empty());
    }

    #[test]
    fn test_non_code_cells_parse_empty() {
        let analyzer = Analyzer::new("show_doc");
        let tree = analyzer
            .parse_cell(0, &Cell::markdown("use std::fmt;"))
            .unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_shown_names_skips_unparseable_cells() {
        let analyzer = Analyzer::new("show_doc");
        let nb = Notebook::new(vec![
            Cell::code("show_doc(foo)"),
            Cell::code("show_doc(bar"),
            Cell::markdown("show_doc(baz)"),
        ]);
        let shown = analyzer.shown_names(&nb);
        assert_eq!(shown.len(), 1);
        assert!(shown.contains("foo"));
    }
}
