//! The ordered documentation pipeline.
//!
//! ```text
//! Notebook
//!     │
//!     ├── tag_language ─► front_matter ─► show_doc_stubs
//!     ├── execute
//!     ├── strip_ansi ─► hide_line ─► filter_stream
//!     ├── remove_dashed_heading ─► echo_show_doc ─► hide ─► clean_magics
//!     └── warning
//! ```
//!
//! Stages run one after another over the whole notebook. Cells are never
//! reordered; a stage edits cells in place, removes content, or inserts
//! cells. Execution happens before any content is hidden, so exported cells
//! still run, and before output cleanup, so fresh outputs get cleaned too.

use crate::analyze::Analyzer;
use crate::config::ProcessorConfig;
use crate::error::{Error, Result};
use crate::execute::{ExecutionBackend, ExecutionContext, SelectiveExecutor};
use crate::notebook::{Cell, Notebook};
use crate::synthesize::{add_front_matter, add_show_docs, insert_warning};
use crate::transform::{
    EchoAnnotator, LanguageTagger, StreamFilter, clean_magics, hide, hide_line,
    remove_dashed_heading, strip_ansi,
};

/// Directive whose arguments add stream filter words for one cell.
pub const FILTER_STREAM: &str = "filter_stream";

/// A pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    TagLanguage,
    FrontMatter,
    ShowDocStubs,
    Execute,
    StripAnsi,
    HideLine,
    FilterStream,
    RemoveDashedHeading,
    EchoShowDoc,
    Hide,
    CleanMagics,
    Warning,
}

/// Stages in the order they run.
pub const STAGES: &[Stage] = &[
    Stage::TagLanguage,
    Stage::FrontMatter,
    Stage::ShowDocStubs,
    Stage::Execute,
    Stage::StripAnsi,
    Stage::HideLine,
    Stage::FilterStream,
    Stage::RemoveDashedHeading,
    Stage::EchoShowDoc,
    Stage::Hide,
    Stage::CleanMagics,
    Stage::Warning,
];

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::TagLanguage => "tag_language",
            Stage::FrontMatter => "front_matter",
            Stage::ShowDocStubs => "show_doc_stubs",
            Stage::Execute => "execute",
            Stage::StripAnsi => "strip_ansi",
            Stage::HideLine => "hide_line",
            Stage::FilterStream => "filter_stream",
            Stage::RemoveDashedHeading => "remove_dashed_heading",
            Stage::EchoShowDoc => "echo_show_doc",
            Stage::Hide => "hide",
            Stage::CleanMagics => "clean_magics",
            Stage::Warning => "warning",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// What one pipeline run did.
///
/// Cell positions refer to the notebook as it is after the run.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Cells that could not be parsed. Each was treated as having no statements.
    pub warnings: Vec<Error>,
    /// Cells submitted to the execution context, in order.
    pub executed: Vec<usize>,
    /// Show-doc cells generated for undocumented exports.
    pub stubs_inserted: usize,
    /// Whether a front matter cell was generated.
    pub front_matter_inserted: bool,
    /// Whether the autogeneration warning was inserted.
    pub warning_inserted: bool,
}

impl BuildReport {
    /// Account for a cell inserted at `at` after positions were recorded.
    fn cell_inserted_at(&mut self, at: usize) {
        for index in &mut self.executed {
            if *index >= at {
                *index += 1;
            }
        }
        for warning in &mut self.warnings {
            if let Error::Parse { cell, .. } = warning
                && *cell >= at
            {
                *cell += 1;
            }
        }
    }
}

/// Runs the pipeline over notebooks with one fixed configuration.
pub struct Processor {
    config: ProcessorConfig,
    analyzer: Analyzer,
    tagger: LanguageTagger,
    echo: EchoAnnotator,
}

impl Processor {
    /// Build a processor, rejecting invalid configuration up front.
    pub fn new(config: ProcessorConfig) -> Result<Self> {
        config.validate()?;
        StreamFilter::new(&config.filter_words)?;
        Ok(Self {
            analyzer: Analyzer::new(config.show_doc_name.clone()),
            tagger: LanguageTagger::new(&config.languages)?,
            echo: EchoAnnotator::new(&config.show_doc_name)?,
            config,
        })
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// Run every stage over `notebook`, executing against `backend`.
    ///
    /// The backend becomes the document's execution context and is dropped
    /// when the run ends. Invalid `filter_stream` directives are reported
    /// before the notebook is touched. A backend failure aborts the run.
    pub fn process<B: ExecutionBackend>(
        &self,
        notebook: &mut Notebook,
        backend: B,
    ) -> Result<BuildReport> {
        self.check_stream_filters(notebook)?;

        let mut context = ExecutionContext::new(backend, &self.config.bootstrap_import)?;
        let mut report = BuildReport::default();

        for &stage in STAGES {
            tracing::debug!("stage {}", stage);
            self.run_stage(stage, notebook, &mut context, &mut report)?;
        }

        tracing::info!(
            "processed {} cells: {} executed, {} doc stubs, {} parse warnings",
            notebook.len(),
            report.executed.len(),
            report.stubs_inserted,
            report.warnings.len()
        );
        Ok(report)
    }

    /// Indices of the cells `process` would execute, without executing anything.
    ///
    /// Positions refer to `notebook` as given, before any insertion.
    pub fn plan(&self, notebook: &Notebook) -> (Vec<usize>, Vec<Error>) {
        let mut warnings = Vec::new();
        let plan = SelectiveExecutor::new(&self.analyzer).plan(notebook, &mut warnings);
        (plan, warnings)
    }

    fn run_stage<B: ExecutionBackend>(
        &self,
        stage: Stage,
        notebook: &mut Notebook,
        context: &mut ExecutionContext<B>,
        report: &mut BuildReport,
    ) -> Result<()> {
        match stage {
            Stage::TagLanguage => for_each_cell(notebook, |cell| self.tagger.apply(cell)),
            Stage::FrontMatter => {
                report.front_matter_inserted = add_front_matter(notebook).is_some();
            }
            Stage::ShowDocStubs => {
                report.stubs_inserted = add_show_docs(notebook, &self.analyzer);
            }
            Stage::Execute => {
                report.executed = SelectiveExecutor::new(&self.analyzer).run(
                    notebook,
                    context,
                    &mut report.warnings,
                )?;
            }
            Stage::StripAnsi => for_each_cell(notebook, strip_ansi),
            Stage::HideLine => for_each_cell(notebook, hide_line),
            Stage::FilterStream => {
                for cell in &mut notebook.cells {
                    self.stream_filter(cell)?.apply(cell);
                }
            }
            Stage::RemoveDashedHeading => for_each_cell(notebook, remove_dashed_heading),
            Stage::EchoShowDoc => for_each_cell(notebook, |cell| self.echo.apply(cell)),
            Stage::Hide => for_each_cell(notebook, hide),
            Stage::CleanMagics => for_each_cell(notebook, clean_magics),
            Stage::Warning => {
                if let Some(at) = insert_warning(notebook, &self.config.warning) {
                    report.cell_inserted_at(at);
                    report.warning_inserted = true;
                }
            }
        }
        Ok(())
    }

    /// Global filter words plus the cell's own `filter_stream` arguments.
    fn stream_filter(&self, cell: &Cell) -> Result<StreamFilter> {
        let mut words = self.config.filter_words.clone();
        if let Some(args) = cell.directives().args(FILTER_STREAM) {
            words.extend(args.iter().cloned());
        }
        StreamFilter::new(&words)
    }

    fn check_stream_filters(&self, notebook: &Notebook) -> Result<()> {
        for (i, cell) in notebook.cells.iter().enumerate() {
            if let Err(e) = self.stream_filter(cell) {
                let detail = match e {
                    Error::Configuration(message) => message,
                    other => other.to_string(),
                };
                return Err(Error::Configuration(format!("cell {i}: {detail}")));
            }
        }
        Ok(())
    }
}

fn for_each_cell(notebook: &mut Notebook, mut rule: impl FnMut(&mut Cell)) {
    for cell in &mut notebook.cells {
        rule(cell);
    }
}
