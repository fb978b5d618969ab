pub mod cli;
pub mod error;
pub mod logger;
pub mod model;
pub mod processor;
pub mod sweep;
pub mod writer;

pub use error::{ErrorKind, LexError, ParseError};
pub use processor::FunctionParser;

use std::io::Write;

use anyhow::{Context, anyhow};
use clap::Parser;

use crate::sweep::{Range, SweepConfig};

pub fn run() -> anyhow::Result<()> {
    let args = cli::Cli::parse();
    logger::init(args.verbose);

    // 1. ── Configure ──────────────────────────────────────────────────
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Reading {}", path.display()))?;
            sweep::load_config(&json)
                .with_context(|| format!("Parsing sweep file {}", path.display()))?
        }
        None => SweepConfig::default(),
    };

    for assignment in &args.consts {
        let (name, value) = sweep::split_assignment(assignment)?;
        let value: f64 = value
            .parse()
            .with_context(|| format!("Invalid constant '{assignment}'"))?;
        config.constants.insert(name.to_string(), value);
    }
    for assignment in &args.vars {
        let (name, range) = sweep::split_assignment(assignment)?;
        let range: Range = range.parse()?;
        config.variables.insert(name.to_string(), range);
    }

    let formula = args
        .formula
        .or(config.formula)
        .ok_or_else(|| anyhow!("no formula given on the command line or in the sweep file"))?;

    // 2. ── Compile ────────────────────────────────────────────────────
    let mut parser = sweep::compile(&formula, &config.constants)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.listing {
        writer::listing(&parser.listing(), &mut out).with_context(|| "Writing listing")?;
    }

    // 3. ── Evaluate & write ───────────────────────────────────────────
    let rows = sweep::evaluate(&mut parser, &config.variables)?;
    writer::emit(&rows, args.format, &mut out).with_context(|| "Writing results")?;
    out.flush()?;

    Ok(())
}
