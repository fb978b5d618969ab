//! Human-readable rows: `x = 0, y = 1    result :   3`.

use std::io::{self, Write};

use crate::sweep::Row;

pub fn emit<W: Write>(rows: &[Row], out: &mut W) -> io::Result<()> {
    for row in rows {
        let bindings: Vec<String> = row
            .bindings
            .iter()
            .map(|b| format!("{} = {}", b.name, b.value))
            .collect();
        if !bindings.is_empty() {
            write!(out, "{}    ", bindings.join(", "))?;
        }
        writeln!(out, "result :   {}", row.result)?;
    }
    Ok(())
}
