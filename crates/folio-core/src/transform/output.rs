//! Rules that rewrite a code cell's outputs.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::notebook::{Cell, Output, StreamName};

static ANSI_ESCAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\x1B(?:[@-Z\\-_]|\[[0-?]*[ -/]*[@-~])").expect("ANSI pattern is valid")
});

/// Remove terminal escape sequences from stdout stream text.
///
/// stderr and non-stream outputs are left untouched.
pub fn strip_ansi(cell: &mut Cell) {
    if !cell.has_source() {
        return;
    }
    for output in cell.outputs.iter_mut().flatten() {
        if let Output::Stream {
            name: StreamName::Stdout,
            text,
        } = output
        {
            for line in text.iter_mut() {
                if ANSI_ESCAPE.is_match(line) {
                    *line = ANSI_ESCAPE.replace_all(line, "").into_owned();
                }
            }
        }
    }
}

/// Drops stream output lines that match any of a set of words.
///
/// Words are regular expressions joined into one alternation. An empty set
/// builds no pattern at all and filters nothing.
#[derive(Debug, Clone, Default)]
pub struct StreamFilter {
    pattern: Option<Regex>,
}

impl StreamFilter {
    pub fn new<S: AsRef<str>>(words: &[S]) -> Result<Self> {
        if words.is_empty() {
            return Ok(Self::default());
        }
        let alternation = words
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&alternation).map_err(|e| {
            Error::Configuration(format!("invalid stream filter `{alternation}`: {e}"))
        })?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_none()
    }

    pub fn apply(&self, cell: &mut Cell) {
        let Some(pattern) = &self.pattern else {
            return;
        };
        if !cell.has_source() {
            return;
        }
        for output in cell.outputs.iter_mut().flatten() {
            if let Output::Stream { text, .. } = output {
                text.retain(|line| !pattern.is_match(line));
            }
        }
    }
}

/// Remove stream output lines of `cell` containing any of `words`.
pub fn filter_stream<S: AsRef<str>>(cell: &mut Cell, words: &[S]) -> Result<()> {
    StreamFilter::new(words)?.apply(cell);
    Ok(())
}
