//! JSON output for one-shot commands
//!
//! - Output: single JSON object on one line of stdout
//! - Logs go to stderr, never stdout

use std::io::{self, Write};

use serde::Serialize;

use super::errors::CliResult;

/// Write one JSON value as a line to `out`
pub fn write_json_to<W: Write, T: Serialize>(out: &mut W, value: &T) -> CliResult<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    out.flush()?;

    Ok(())
}

/// Write one JSON value as a line to stdout
pub fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_json_to(&mut lock, value)
}
