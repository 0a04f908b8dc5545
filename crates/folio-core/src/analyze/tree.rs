//! Classified top-level statements of a code cell.

/// Kind of definition a statement introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    Function,
    Struct,
    Enum,
    Trait,
    Union,
}

/// A top-level statement, reduced to what the pipeline cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `use ...;` or `extern crate ...;`
    Import,
    /// A named item other cells may document.
    Definition { name: String, kind: DefinitionKind },
    /// A call to the show-doc function. `target` is its first argument when
    /// that argument is a plain identifier.
    ShowDoc { target: Option<String> },
    /// Anything else (`let`, `impl`, other expressions, ...).
    Other,
}

/// Statements of one cell, in source order.
///
/// Derived from the cell's current source and never stored on the cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseTree {
    statements: Vec<Statement>,
}

impl ParseTree {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn has_import(&self) -> bool {
        self.statements.contains(&Statement::Import)
    }

    pub fn has_show_doc(&self) -> bool {
        self.statements
            .iter()
            .any(|s| matches!(s, Statement::ShowDoc { .. }))
    }

    /// Definitions in source order.
    pub fn definitions(&self) -> impl Iterator<Item = (&str, DefinitionKind)> {
        self.statements.iter().filter_map(|s| match s {
            Statement::Definition { name, kind } => Some((name.as_str(), *kind)),
            _ => None,
        })
    }

    /// Identifiers passed to show-doc invocations.
    pub fn show_doc_targets(&self) -> impl Iterator<Item = &str> {
        self.statements.iter().filter_map(|s| match s {
            Statement::ShowDoc { target } => target.as_deref(),
            _ => None,
        })
    }
}
