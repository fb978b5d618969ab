//! Rows as a pretty-printed JSON array.

use std::io::{self, Write};

use crate::sweep::Row;

pub fn emit<W: Write>(rows: &[Row], out: &mut W) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, rows)?;
    writeln!(out)
}
