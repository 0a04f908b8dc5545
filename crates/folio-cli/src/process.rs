//! Process command implementation for Folio CLI.
//!
//! Reads a notebook, runs the documentation pipeline over it, and writes the
//! result next to the input.

use std::path::{Path, PathBuf};
use std::time::Instant;

use folio_core::{BuildReport, DryRunBackend, Notebook, Processor, ProcessorConfig, WorkerBackend};

use crate::colors;

/// Flags of the `process` command.
pub struct Options {
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub filter: Vec<String>,
    pub worker: Option<String>,
    pub dry_run: bool,
}

/// Process one notebook.
pub fn execute(input: &Path, options: Options) -> anyhow::Result<()> {
    let start = Instant::now();

    if !input.exists() {
        anyhow::bail!("Notebook not found: {}", input.display());
    }

    let mut config = match &options.config {
        Some(path) => ProcessorConfig::from_file(path)?,
        None => ProcessorConfig::default(),
    };
    config.filter_words.extend(options.filter);
    if options.worker.is_some() {
        config.worker_command = options.worker;
    }

    // Reject bad configuration before touching the notebook
    let processor = Processor::new(config)?;
    let mut notebook = Notebook::read_from_file(input)?;

    println!(
        "{}Processing{} {} ({} cells)",
        colors::BOLD,
        colors::RESET,
        input.display(),
        notebook.len()
    );

    let report = if options.dry_run {
        let mut backend = DryRunBackend::new();
        let report = processor.process(&mut notebook, &mut backend)?;
        print_dry_run(&report, backend.submitted());
        report
    } else {
        let backend = WorkerBackend::spawn(processor.config().worker_command.as_deref())?;
        processor.process(&mut notebook, backend)?
    };

    let output = options
        .output
        .unwrap_or_else(|| input.with_extension("processed.ipynb"));
    notebook.write_to_file(&output)?;

    print_summary(&report);
    println!(
        "{}Wrote{} {} in {:.2}s",
        colors::GREEN,
        colors::RESET,
        output.display(),
        start.elapsed().as_secs_f64()
    );

    Ok(())
}

/// List the cells that would have run, with the first line of each.
fn print_dry_run(report: &BuildReport, submitted: &[String]) {
    println!("\n{}Would execute:{}", colors::BOLD, colors::RESET);
    if report.executed.is_empty() {
        println!("  {}(nothing){}", colors::DIM, colors::RESET);
        return;
    }

    // Cell sources come last, after the bootstrap import
    let sources = &submitted[submitted.len().saturating_sub(report.executed.len())..];
    for (index, source) in report.executed.iter().zip(sources) {
        let first = source
            .lines()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("");
        println!(
            "  {}cell {:>3}{}  {}",
            colors::CYAN,
            index,
            colors::RESET,
            first
        );
    }
}

fn print_summary(report: &BuildReport) {
    println!();
    println!(
        "{} cells executed, {} doc stubs added{}",
        report.executed.len(),
        report.stubs_inserted,
        if report.front_matter_inserted {
            ", front matter added"
        } else {
            ""
        }
    );

    for warning in &report.warnings {
        println!("{}warning:{} {}", colors::YELLOW, colors::RESET, warning);
    }
}
