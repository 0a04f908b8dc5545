//! Code cell outputs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lines;

/// Stream a stream output was written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamName {
    Stdout,
    Stderr,
}

/// A single output record of a code cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "output_type", rename_all = "snake_case")]
pub enum Output {
    /// Standard output/error text.
    Stream {
        name: StreamName,
        #[serde(with = "lines::text")]
        text: Vec<String>,
    },

    /// Value of the cell's trailing expression.
    ExecuteResult {
        #[serde(default)]
        execution_count: Option<u32>,
        #[serde(default)]
        data: Map<String, Value>,
        #[serde(default)]
        metadata: Map<String, Value>,
    },

    /// Rich display data.
    DisplayData {
        #[serde(default)]
        data: Map<String, Value>,
        #[serde(default)]
        metadata: Map<String, Value>,
    },

    /// Error raised while running the cell.
    Error {
        ename: String,
        evalue: String,
        #[serde(default)]
        traceback: Vec<String>,
    },
}

impl Output {
    /// Stream output on stdout.
    pub fn stdout(text: &str) -> Self {
        Output::Stream {
            name: StreamName::Stdout,
            text: lines::split_lines(text),
        }
    }

    /// Stream output on stderr.
    pub fn stderr(text: &str) -> Self {
        Output::Stream {
            name: StreamName::Stderr,
            text: lines::split_lines(text),
        }
    }

    /// Display data with a single `text/markdown` representation.
    pub fn markdown(text: &str) -> Self {
        let mut data = Map::new();
        data.insert(
            "text/markdown".to_string(),
            Value::from(lines::split_lines(text)),
        );
        Output::DisplayData {
            data,
            metadata: Map::new(),
        }
    }

    /// Whether this is a stream output.
    pub fn is_stream(&self) -> bool {
        matches!(self, Output::Stream { .. })
    }
}
