//! Worker process backend.
//!
//! Runs cells in a separate process that keeps one interpreter session alive
//! for its whole lifetime, so bindings carry over from cell to cell.

use std::ffi::OsStr;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use crate::error::{Error, Result};
use crate::notebook::Output;

use super::backend::{BackendError, ExecutionBackend};
use super::protocol::{WorkerCommand, WorkerResponse, read_message, write_message};

/// Environment variable naming the worker binary.
pub const WORKER_PATH_ENV: &str = "FOLIO_WORKER_PATH";

const WORKER_NAME: &str = if cfg!(windows) {
    "folio-worker.exe"
} else {
    "folio-worker"
};

/// Handle to a worker process.
pub struct WorkerBackend {
    /// The child process.
    child: Child,
    /// Buffered stdin writer.
    stdin: BufWriter<ChildStdin>,
    /// Buffered stdout reader.
    stdout: BufReader<ChildStdout>,
    /// Whether the worker has been shut down.
    closed: bool,
}

impl WorkerBackend {
    /// Spawn a worker process.
    ///
    /// The program is taken, in order, from:
    /// 1. `FOLIO_WORKER_PATH` environment variable
    /// 2. `command` (program followed by whitespace-separated arguments)
    /// 3. `folio-worker` on the system PATH
    pub fn spawn(command: Option<&str>) -> Result<Self> {
        let (program, args) = Self::resolve_command(command)?;
        Self::spawn_program(&program, &args)
    }

    /// Spawn `program` with `args` directly, skipping the lookup.
    pub fn spawn_program<S: AsRef<OsStr>>(program: &Path, args: &[S]) -> Result<Self> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| {
                Error::Ipc(format!(
                    "Failed to spawn worker process '{}': {}",
                    program.display(),
                    e
                ))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::Ipc("Failed to get worker stdin".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Ipc("Failed to get worker stdout".to_string()))?;

        let mut worker = Self {
            child,
            stdin: BufWriter::new(stdin),
            stdout: BufReader::new(stdout),
            closed: false,
        };

        worker.send_command(&WorkerCommand::Ping)?;
        match worker.recv_response()? {
            WorkerResponse::Pong => {
                tracing::debug!("worker {} ready (pid {})", program.display(), worker.pid());
                Ok(worker)
            }
            other => Err(Error::Ipc(format!(
                "Unexpected response from worker: {:?}",
                other
            ))),
        }
    }

    fn resolve_command(command: Option<&str>) -> Result<(PathBuf, Vec<String>)> {
        if let Ok(path) = std::env::var(WORKER_PATH_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Ok((path, Vec::new()));
            }
            tracing::warn!(
                "{} points to missing file {}",
                WORKER_PATH_ENV,
                path.display()
            );
        }

        if let Some(command) = command {
            let mut parts = command.split_whitespace();
            if let Some(program) = parts.next() {
                let program = which::which(program).unwrap_or_else(|_| PathBuf::from(program));
                return Ok((program, parts.map(str::to_string).collect()));
            }
        }

        which::which(WORKER_NAME).map(|path| (path, Vec::new())).map_err(|_| {
            Error::Ipc(format!(
                "Could not find {}. Set {} or pass a worker command.",
                WORKER_NAME, WORKER_PATH_ENV
            ))
        })
    }

    /// Send a command to the worker.
    pub fn send_command(&mut self, cmd: &WorkerCommand) -> Result<()> {
        if self.closed {
            return Err(Error::Ipc("Worker has been shut down".to_string()));
        }
        write_message(&mut self.stdin, cmd)
    }

    /// Receive a response from the worker.
    pub fn recv_response(&mut self) -> Result<WorkerResponse> {
        if self.closed {
            return Err(Error::Ipc("Worker has been shut down".to_string()));
        }
        read_message(&mut self.stdout)
    }

    /// Get the process ID of the worker.
    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    /// Ask the worker to exit, killing it if it does not acknowledge.
    ///
    /// Returns whether the worker acknowledged. Calling it again is a no-op
    /// that returns `false`.
    pub fn shutdown(&mut self) -> bool {
        if self.closed {
            return false;
        }
        let acknowledged = self.send_command(&WorkerCommand::Shutdown).is_ok()
            && matches!(self.recv_response(), Ok(WorkerResponse::ShuttingDown));
        self.closed = true;

        if !acknowledged && let Err(e) = self.child.kill() {
            tracing::warn!("Failed to kill worker: {}", e);
        }
        // Reap the child
        let _ = self.child.wait();
        acknowledged
    }
}

impl ExecutionBackend for WorkerBackend {
    fn submit(&mut self, source: &str) -> std::result::Result<Vec<Output>, BackendError> {
        self.send_command(&WorkerCommand::Execute {
            source: source.to_string(),
        })?;

        match self.recv_response()? {
            WorkerResponse::Output { outputs } => Ok(outputs),
            WorkerResponse::Error { message } => Err(BackendError::new(message)),
            other => Err(BackendError::new(format!(
                "Unexpected response when executing: {:?}",
                other
            ))),
        }
    }
}

impl Drop for WorkerBackend {
    fn drop(&mut self) {
        self.shutdown();
    }
}
