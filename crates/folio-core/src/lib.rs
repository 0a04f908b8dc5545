//! Core engine for Folio, a literate notebook documentation processor.
//!
//! This crate provides:
//! - The notebook document model (nbformat-compatible JSON)
//! - `//|` cell directives
//! - Text-pattern transforms over cell sources and outputs
//! - Parse-tree analysis of Rust code cells
//! - Selective execution against a stateful backend
//! - Synthesis of front matter, show-doc stubs and the autogeneration warning
//! - The ordered pipeline tying these together

pub mod analyze;
pub mod config;
pub mod directive;
pub mod error;
pub mod execute;
pub mod notebook;
pub mod pipeline;
pub mod synthesize;
pub mod transform;

pub use analyze::{Analyzer, DefinitionKind, ParseTree, Statement, parse_source};
pub use config::ProcessorConfig;
pub use directive::{Directives, EXPORT_FAMILY, HIDE_FAMILY, MARKER};
pub use error::{Error, Result};
pub use execute::{
    BackendError, DryRunBackend, ExecutionBackend, ExecutionContext, SelectiveExecutor,
    WorkerBackend, serve, should_execute,
};
pub use notebook::{Cell, CellKind, Notebook, Output, StreamName};
pub use pipeline::{BuildReport, Processor, STAGES, Stage};
pub use synthesize::{AUTOGENERATED_WARNING, FrontMatter, show_doc_stub};
