//! Folio CLI - literate notebook documentation processor.

mod colors;
mod process;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Turn literate Rust notebooks into documentation pages")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a notebook into its documentation form
    Process {
        /// Path to the notebook (.ipynb file)
        input: PathBuf,

        /// Output path (default: <input>.processed.ipynb)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Drop stream output lines matching this pattern (repeatable)
        #[arg(long = "filter", value_name = "WORD")]
        filter: Vec<String>,

        /// Worker command to execute cells with
        #[arg(long)]
        worker: Option<String>,

        /// Record which cells would run instead of running them
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // Helper to format folio-core errors with recovery hints
    let format_error = |err: anyhow::Error| -> anyhow::Error {
        if let Some(folio_err) = err.downcast_ref::<folio_core::Error>() {
            anyhow::anyhow!("{}", folio_err.with_hint())
        } else {
            err
        }
    };

    match cli.command {
        Commands::Process {
            input,
            output,
            config,
            filter,
            worker,
            dry_run,
        } => {
            let options = process::Options {
                output,
                config,
                filter,
                worker,
                dry_run,
            };
            process::execute(&input, options).map_err(format_error)?;
        }
    }

    Ok(())
}
