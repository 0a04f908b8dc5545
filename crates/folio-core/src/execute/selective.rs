//! Selects and runs the cells needed for documentation output.

use crate::analyze::{Analyzer, ParseTree};
use crate::error::{Error, Result};
use crate::notebook::{Cell, Notebook};

use super::backend::ExecutionBackend;
use super::context::ExecutionContext;

/// Whether `cell` must run so the rendered page has its documentation.
///
/// True for code cells with at least one parsed statement that are exported,
/// import something, or call the show-doc function.
pub fn should_execute(cell: &Cell, tree: &ParseTree) -> bool {
    if !cell.is_code() || tree.is_empty() {
        return false;
    }
    cell.directives().is_export() || tree.has_import() || tree.has_show_doc()
}

/// Runs the qualifying cells of a notebook through one [`ExecutionContext`],
/// in document order.
pub struct SelectiveExecutor<'a> {
    analyzer: &'a Analyzer,
}

impl<'a> SelectiveExecutor<'a> {
    pub fn new(analyzer: &'a Analyzer) -> Self {
        Self { analyzer }
    }

    /// Indices of the cells that would run, without running anything.
    pub fn plan(&self, notebook: &Notebook, warnings: &mut Vec<Error>) -> Vec<usize> {
        notebook
            .cells
            .iter()
            .enumerate()
            .filter(|(i, cell)| {
                let tree = self.analyzer.parse_or_recover(*i, cell, warnings);
                should_execute(cell, &tree)
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Run every qualifying cell and store its outputs on the cell.
    ///
    /// Unparseable cells are skipped and recorded in `warnings`. The first
    /// backend failure aborts the run, since later cells may depend on what
    /// the failed cell would have bound.
    pub fn run<B: ExecutionBackend>(
        &self,
        notebook: &mut Notebook,
        context: &mut ExecutionContext<B>,
        warnings: &mut Vec<Error>,
    ) -> Result<Vec<usize>> {
        let plan = self.plan(notebook, warnings);

        for &index in &plan {
            let cell = &mut notebook.cells[index];
            tracing::debug!("executing cell {}", index);

            let outputs = context.run(cell.text()).map_err(|e| Error::Execution {
                cell: index,
                message: e.message,
            })?;
            cell.outputs = Some(outputs);
            cell.execution_count = Some(context.execution_count());
        }

        tracing::debug!("executed {} of {} cells", plan.len(), notebook.len());
        Ok(plan)
    }
}
