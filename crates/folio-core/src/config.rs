//! Processor configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analyze::parse_source;
use crate::error::{Error, Result};
use crate::synthesize::AUTOGENERATED_WARNING;
use crate::transform::DEFAULT_LANGUAGES;

/// Configuration for the documentation pipeline.
///
/// Every field has a default, so a config file only lists what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Languages a `%%<lang>` magic may switch a cell to.
    pub languages: Vec<String>,

    /// Function whose calls render documentation for a symbol.
    pub show_doc_name: String,

    /// Submitted once to every new execution context, before any cell.
    pub bootstrap_import: String,

    /// Text of the cell inserted after the first cell.
    pub warning: String,

    /// Stream output lines matching any of these patterns are dropped from
    /// every cell.
    pub filter_words: Vec<String>,

    /// Worker command used when `FOLIO_WORKER_PATH` is not set.
    pub worker_command: Option<String>,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            languages: DEFAULT_LANGUAGES.iter().map(|s| s.to_string()).collect(),
            show_doc_name: "show_doc".to_string(),
            bootstrap_import: "use folio::show_doc;".to_string(),
            warning: AUTOGENERATED_WARNING.to_string(),
            filter_words: Vec::new(),
            worker_command: None,
        }
    }
}

impl ProcessorConfig {
    /// Load a JSON config file. Missing fields keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            Error::Configuration(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        Ok(config)
    }

    /// Check the fields that cannot be checked by compiling a pattern.
    pub fn validate(&self) -> Result<()> {
        if syn::parse_str::<syn::Ident>(&self.show_doc_name).is_err() {
            return Err(Error::Configuration(format!(
                "show_doc_name `{}` is not a Rust identifier",
                self.show_doc_name
            )));
        }
        if let Err(e) = parse_source(&self.bootstrap_import, &self.show_doc_name) {
            return Err(Error::Configuration(format!(
                "bootstrap_import does not parse: {e}"
            )));
        }
        if self.warning.trim().is_empty() {
            return Err(Error::Configuration("warning must not be empty".to_string()));
        }
        Ok(())
    }
}
