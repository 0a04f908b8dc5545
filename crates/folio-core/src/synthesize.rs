//! Cells generated from the notebook itself.
//!
//! Each function inserts new cells at computed positions and never reorders
//! existing ones. Every insertion first checks whether its output is already
//! present, so processing a notebook twice inserts nothing new.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analyze::{Analyzer, definition_names};
use crate::notebook::{Cell, Notebook};

/// Default text of the autogeneration warning.
pub const AUTOGENERATED_WARNING: &str =
    "<!-- WARNING: THIS FILE WAS AUTOGENERATED! DO NOT EDIT! -->";

static TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^#[ \t]+([^\r\n]+?)[ \t]*(?:\r?\n>[ \t]+([^\r\n]+?)[ \t]*)?\r?$")
        .expect("title pattern is valid")
});

static FRONT_MATTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^---.*\S.*---").expect("front matter pattern is valid"));

/// Insert `warning` as a markdown cell right after the first cell.
///
/// Returns the position of the new cell, or `None` when a cell already
/// carries the warning.
pub fn insert_warning(notebook: &mut Notebook, warning: &str) -> Option<usize> {
    if notebook.cells.iter().any(|cell| cell.text().contains(warning)) {
        return None;
    }
    let at = notebook.len().min(1);
    notebook.cells.insert(at, Cell::markdown(warning));
    Some(at)
}

/// Title and optional description taken from a level-1 heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: String,
    pub description: Option<String>,
}

impl FrontMatter {
    /// Render as a `---` delimited block.
    pub fn render(&self) -> String {
        let mut block = format!("---\ntitle: {}\n", self.title);
        if let Some(description) = &self.description {
            block.push_str(&format!(
                "description: \"{}\"\n",
                description.replace('"', "\\\"")
            ));
        }
        block.push_str("---\n");
        block
    }
}

/// Whether a raw cell already holds a front matter block.
pub fn has_front_matter(notebook: &Notebook) -> bool {
    notebook
        .cells
        .iter()
        .any(|cell| cell.is_raw() && FRONT_MATTER.is_match(cell.text()))
}

/// Move the first level-1 heading (and its `>` description line) into a
/// front matter cell at position 0.
///
/// The heading cell's source is cleared. Does nothing when front matter
/// already exists or no markdown cell has a level-1 heading.
pub fn add_front_matter(notebook: &mut Notebook) -> Option<FrontMatter> {
    if has_front_matter(notebook) {
        return None;
    }

    let (index, front_matter) = notebook.cells.iter().enumerate().find_map(|(i, cell)| {
        if !cell.is_markdown() {
            return None;
        }
        let caps = TITLE.captures(cell.text())?;
        Some((
            i,
            FrontMatter {
                title: caps[1].to_string(),
                description: caps.get(2).map(|m| m.as_str().to_string()),
            },
        ))
    })?;

    notebook.cells[index].clear_source();
    notebook.cells.insert(0, Cell::raw(front_matter.render()));
    Some(front_matter)
}

/// Source of a generated show-doc cell for `name`.
///
/// The macro form works for every kind of definition; a call would reject
/// type and trait names.
pub fn show_doc_stub(show_doc_name: &str, name: &str) -> String {
    format!("{show_doc_name}!({name})")
}

/// Insert a show-doc cell after each exported cell for every public
/// definition nobody documented yet.
///
/// Already-documented names are collected once, before any insertion, so
/// generated cells never feed back into the set. Exported cells are visited
/// last to first, which keeps the insert positions of earlier cells valid.
/// Returns the number of cells inserted.
pub fn add_show_docs(notebook: &mut Notebook, analyzer: &Analyzer) -> usize {
    let shown = analyzer.shown_names(notebook);
    let exports: Vec<usize> = notebook
        .cells
        .iter()
        .enumerate()
        .filter(|(_, cell)| cell.directives().is_export())
        .map(|(i, _)| i)
        .collect();

    let mut inserted = 0;
    for &index in exports.iter().rev() {
        let tree = match analyzer.parse_cell(index, &notebook.cells[index]) {
            Ok(tree) => tree,
            Err(err) => {
                tracing::debug!("no doc stubs for unparseable cell: {}", err);
                continue;
            }
        };

        for (offset, name) in definition_names(&tree, &shown).iter().enumerate() {
            let stub = Cell::code(show_doc_stub(analyzer.show_doc_name(), name));
            notebook.cells.insert(index + 1 + offset, stub);
            inserted += 1;
        }
    }
    inserted
}
