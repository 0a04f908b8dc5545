//! Worker side of the IPC protocol.
//!
//! A worker binary wraps its interpreter session in an [`ExecutionBackend`]
//! and hands it to [`serve`] together with its stdin and stdout.

use std::io::{Read, Write};

use crate::error::Result;

use super::backend::ExecutionBackend;
use super::protocol::{WorkerCommand, WorkerResponse, read_message, write_message};

/// Answer commands from the parent until it asks for shutdown.
///
/// Execution failures are reported to the parent as
/// [`WorkerResponse::Error`] and the loop keeps going. Only a broken stream
/// ends the loop with an error.
pub fn serve<R, W, B>(reader: &mut R, writer: &mut W, session: &mut B) -> Result<()>
where
    R: Read,
    W: Write,
    B: ExecutionBackend + ?Sized,
{
    loop {
        let response = match read_message(reader)? {
            WorkerCommand::Ping => WorkerResponse::Pong,
            WorkerCommand::Execute { source } => match session.submit(&source) {
                Ok(outputs) => WorkerResponse::Output { outputs },
                Err(e) => WorkerResponse::Error { message: e.message },
            },
            WorkerCommand::Shutdown => {
                write_message(writer, &WorkerResponse::ShuttingDown)?;
                return Ok(());
            }
        };
        write_message(writer, &response)?;
    }
}
