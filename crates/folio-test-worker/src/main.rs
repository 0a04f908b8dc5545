//! Folio test worker - speaks the worker protocol over stdin/stdout.
//!
//! Usage: `folio-test-worker [--reply-pong] [--on-shutdown <marker>]`
//!
//! - `--reply-pong` answers every command except shutdown with `Pong`
//! - `--on-shutdown <marker>` creates `marker` once shutdown was acknowledged

mod session;

use std::fs;
use std::io::{self, BufReader, BufWriter, Read, Write};

use folio_core::execute::{WorkerCommand, WorkerResponse, read_message, write_message};

use session::LineSession;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let mut reader = BufReader::new(io::stdin().lock());
    let mut writer = BufWriter::new(io::stdout().lock());

    if args.iter().any(|arg| arg == "--reply-pong") {
        reply_pong(&mut reader, &mut writer)?;
    } else {
        folio_core::serve(&mut reader, &mut writer, &mut LineSession::default())?;
    }

    if let Some(marker) = args
        .iter()
        .position(|arg| arg == "--on-shutdown")
        .and_then(|i| args.get(i + 1))
    {
        fs::write(marker, "shutdown\n")?;
    }

    Ok(())
}

/// Handshake normally, then answer every execution with `Pong`.
fn reply_pong<R: Read, W: Write>(reader: &mut R, writer: &mut W) -> anyhow::Result<()> {
    loop {
        let command: WorkerCommand = read_message(reader)?;
        if command == WorkerCommand::Shutdown {
            write_message(writer, &WorkerResponse::ShuttingDown)?;
            return Ok(());
        }
        write_message(writer, &WorkerResponse::Pong)?;
    }
}
