//! Wizard step implementations.
//!
//! Each step is a self-contained piece of the setup flow. Steps share
//! state only through the [`Session`](crate::session::Session) passed in
//! explicitly, and run `idf.py` through [`Idf`](crate::idf::Idf) instead
//! of changing the process working directory.

pub mod border_router;
pub mod cli_device;
pub mod dataset;
pub mod join;
pub mod prereqs;
pub mod rcp;
pub mod setup;
pub mod web_gui;

use anyhow::Result;
use std::io::{BufRead, Write};

/// Print a message and wait for the operator to press Enter.
pub fn pause(message: &str) -> Result<()> {
    print!("{message}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(())
}

/// Collect pasted lines from stdin until an empty line (or EOF).
pub fn read_pasted_block() -> Result<Vec<String>> {
    let mut lines = Vec::new();
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            break;
        }
        lines.push(line);
    }
    Ok(lines)
}
