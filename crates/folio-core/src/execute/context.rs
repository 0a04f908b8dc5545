//! The execution context shared by one document run.

use crate::error::{Error, Result};
use crate::notebook::Output;

use super::backend::{BackendError, ExecutionBackend};

/// One continuous program assembled from the cells of a single document.
///
/// Owns its backend exclusively. It is created once per document, seeded
/// with the bootstrap import, and dropped when the document is done, so no
/// binding leaks from one document into another.
pub struct ExecutionContext<B: ExecutionBackend> {
    backend: B,
    execution_count: u32,
}

impl<B: ExecutionBackend> ExecutionContext<B> {
    /// Start a context by submitting `bootstrap` to `backend`.
    pub fn new(mut backend: B, bootstrap: &str) -> Result<Self> {
        if !bootstrap.trim().is_empty() {
            backend
                .submit(bootstrap)
                .map_err(|e| Error::Bootstrap(e.message))?;
        }
        Ok(Self {
            backend,
            execution_count: 0,
        })
    }

    /// Submit one cell's source. Blocks until the backend is done with it.
    pub fn run(&mut self, source: &str) -> std::result::Result<Vec<Output>, BackendError> {
        let outputs = self.backend.submit(source)?;
        self.execution_count += 1;
        Ok(outputs)
    }

    /// Number of cells run so far, not counting the bootstrap import.
    pub fn execution_count(&self) -> u32 {
        self.execution_count
    }

    /// End the context and hand back the backend.
    pub fn into_backend(self) -> B {
        self.backend
    }
}
