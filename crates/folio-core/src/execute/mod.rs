//! Selective, order-preserving execution of notebook cells.
//!
//! Only cells that matter for the rendered documentation run: exported
//! cells, cells with imports, and cells calling the show-doc function. They
//! run in document order against one [`ExecutionContext`], so the scattered
//! subset behaves like one continuous program.
//!
//! # Architecture
//!
//! ```text
//! Notebook
//!     │
//!     └── SelectiveExecutor (Analyzer decides which cells qualify)
//!             │
//!             └── ExecutionContext (one per document, bootstrap import first)
//!                     │
//!                     └── ExecutionBackend
//!                             ├── WorkerBackend (child process, length-prefixed JSON IPC)
//!                             └── DryRunBackend (records submissions)
//! ```
//!
//! # Module Structure
//!
//! - `backend` - Backend trait and the dry-run backend
//! - `context` - Per-document execution context
//! - `protocol` - Worker IPC messages
//! - `selective` - Cell selection and ordered execution
//! - `serve` - Worker-side command loop
//! - `worker` - Worker process backend

mod backend;
mod context;
pub mod protocol;
mod selective;
mod serve;
mod worker;

pub use backend::{BackendError, DryRunBackend, ExecutionBackend};
pub use context::ExecutionContext;
pub use protocol::{WorkerCommand, WorkerResponse, read_message, write_message};
pub use selective::{SelectiveExecutor, should_execute};
pub use serve::serve;
pub use worker::{WORKER_PATH_ENV, WorkerBackend};
