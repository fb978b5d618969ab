//! Output formats for evaluated sweep rows.
pub mod json;
pub mod text;

use std::io::{self, Write};

use clap::ValueEnum;

use crate::sweep::Row;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    #[default]
    Text,
    Json,
}

pub fn emit<W: Write>(rows: &[Row], format: Format, out: &mut W) -> io::Result<()> {
    match format {
        Format::Text => text::emit(rows, out),
        Format::Json => json::emit(rows, out),
    }
}

/// Writes a program listing, one numbered instruction per line.
pub fn listing<W: Write>(lines: &[String], out: &mut W) -> io::Result<()> {
    for (idx, line) in lines.iter().enumerate() {
        writeln!(out, "{idx:4}  {line}")?;
    }
    Ok(())
}
