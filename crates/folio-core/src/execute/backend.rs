//! Execution backends.

use crate::notebook::Output;

/// Failure reported by a backend, carrying its diagnostic text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct BackendError {
    pub message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<crate::error::Error> for BackendError {
    fn from(err: crate::error::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// A sequential executor that keeps state across submissions.
///
/// Everything bound by one submitted source must be visible to the next one,
/// for as long as the backend lives.
pub trait ExecutionBackend {
    /// Run `source` to completion and return what it printed or displayed.
    fn submit(&mut self, source: &str) -> Result<Vec<Output>, BackendError>;
}

impl<B: ExecutionBackend + ?Sized> ExecutionBackend for Box<B> {
    fn submit(&mut self, source: &str) -> Result<Vec<Output>, BackendError> {
        (**self).submit(source)
    }
}

impl<B: ExecutionBackend + ?Sized> ExecutionBackend for &mut B {
    fn submit(&mut self, source: &str) -> Result<Vec<Output>, BackendError> {
        (**self).submit(source)
    }
}

/// Records every submission without running anything.
#[derive(Debug, Clone, Default)]
pub struct DryRunBackend {
    submitted: Vec<String>,
}

impl DryRunBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sources submitted so far, in order.
    pub fn submitted(&self) -> &[String] {
        &self.submitted
    }
}

impl ExecutionBackend for DryRunBackend {
    fn submit(&mut self, source: &str) -> Result<Vec<Output>, BackendError> {
        tracing::debug!("dry run: {} bytes", source.len());
        self.submitted.push(source.to_string());
        Ok(Vec::new())
    }
}
