//! Notebook cells.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lines;
use super::output::Output;
use crate::directive::Directives;

/// Kind of cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    /// Executable Rust code.
    Code,
    /// Prose.
    Markdown,
    /// Passed through to the renderer untouched.
    Raw,
}

/// One unit of notebook content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(rename = "cell_type")]
    pub kind: CellKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub metadata: Map<String, Value>,

    /// Cell text. `None` once a stage removed the content; the slot stays.
    #[serde(
        default,
        with = "lines::source",
        skip_serializing_if = "Option::is_none"
    )]
    pub source: Option<String>,

    /// Outputs of a previous run (code cells only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Vec<Output>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_count: Option<u32>,
}

impl Cell {
    fn new(kind: CellKind, source: impl Into<String>) -> Self {
        Self {
            kind,
            id: None,
            metadata: Map::new(),
            source: Some(source.into()),
            outputs: (kind == CellKind::Code).then(Vec::new),
            execution_count: None,
        }
    }

    /// Create a code cell.
    pub fn code(source: impl Into<String>) -> Self {
        Self::new(CellKind::Code, source)
    }

    /// Create a markdown cell.
    pub fn markdown(source: impl Into<String>) -> Self {
        Self::new(CellKind::Markdown, source)
    }

    /// Create a raw cell.
    pub fn raw(source: impl Into<String>) -> Self {
        Self::new(CellKind::Raw, source)
    }

    /// Attach outputs (builder style).
    pub fn with_outputs(mut self, outputs: Vec<Output>) -> Self {
        self.outputs = Some(outputs);
        self
    }

    pub fn is_code(&self) -> bool {
        self.kind == CellKind::Code
    }

    pub fn is_markdown(&self) -> bool {
        self.kind == CellKind::Markdown
    }

    pub fn is_raw(&self) -> bool {
        self.kind == CellKind::Raw
    }

    /// Current source, or `""` when the content was removed.
    pub fn text(&self) -> &str {
        self.source.as_deref().unwrap_or("")
    }

    /// Whether the cell has non-empty source.
    pub fn has_source(&self) -> bool {
        !self.text().is_empty()
    }

    /// Remove the cell's content while keeping its slot in the notebook.
    pub fn clear_source(&mut self) {
        self.source = None;
    }

    /// Directives declared by the cell's current source.
    ///
    /// Only code cells declare directives.
    pub fn directives(&self) -> Directives {
        if self.is_code() {
            Directives::parse(self.text())
        } else {
            Directives::default()
        }
    }

    /// Execution language recorded in the metadata.
    pub fn language(&self) -> Option<&str> {
        self.metadata.get("language").and_then(Value::as_str)
    }

    pub fn set_language(&mut self, language: &str) {
        self.metadata
            .insert("language".to_string(), Value::from(language));
    }
}
