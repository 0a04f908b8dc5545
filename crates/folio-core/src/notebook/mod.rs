//! In-memory notebook model.
//!
//! Shaped like nbformat v4 so a `.ipynb` file deserializes straight into it.
//! Stages never reorder cells: they edit a cell in place, remove its content,
//! or insert new cells.

mod cell;
pub mod lines;
mod output;

pub use cell::{Cell, CellKind};
pub use output::{Output, StreamName};

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// An ordered sequence of cells plus notebook-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    pub cells: Vec<Cell>,

    #[serde(default)]
    pub metadata: Map<String, Value>,

    #[serde(default = "default_nbformat")]
    pub nbformat: u32,

    #[serde(default = "default_nbformat_minor")]
    pub nbformat_minor: u32,
}

fn default_nbformat() -> u32 {
    4
}

fn default_nbformat_minor() -> u32 {
    5
}

impl Notebook {
    /// Create a notebook from cells.
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            metadata: Map::new(),
            nbformat: default_nbformat(),
            nbformat_minor: default_nbformat_minor(),
        }
    }

    /// Parse a notebook from `.ipynb` JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty `.ipynb` JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a notebook from a file.
    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Write the notebook to a file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path.as_ref(), self.to_json()?)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Default for Notebook {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_minimal_ipynb() {
        let json = r##"{
            "cells": [
                {"cell_type": "markdown", "metadata": {}, "source": "# Intro"},
                {"cell_type": "code", "metadata": {}, "execution_count": 1,
                 "source": ["println!(\"hi\");"],
                 "outputs": [{"output_type": "stream", "name": "stdout", "text": "hi\n"}]}
            ],
            "metadata": {},
            "nbformat": 4,
            "nbformat_minor": 5
        }"##;

        let nb = Notebook::from_json(json).unwrap();
        assert_eq!(nb.len(), 2);
        assert!(nb.cells[0].is_markdown());
        assert_eq!(
            nb.cells[1].outputs.as_deref(),
            Some(&[Output::stdout("hi\n")][..])
        );
    }

    #[test]
    fn test_file_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nb.ipynb");

        let nb = Notebook::new(vec![
            Cell::markdown("# Title\n> Summary"),
            Cell::code("let a = 1;").with_outputs(vec![Output::stderr("warning\n")]),
        ]);
        nb.write_to_file(&path).unwrap();

        assert_eq!(Notebook::read_from_file(&path).unwrap(), nb);
    }
}
