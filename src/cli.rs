use clap::Parser;
use std::path::PathBuf;

use crate::writer::Format;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Formula to evaluate, e.g. `1+sin(x)*cos(y)`
    pub formula: Option<String>,

    /// JSON sweep file with formula, constants and variable ranges
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Variable range as name=start:stop:step
    #[arg(long = "var", value_name = "NAME=START:STOP:STEP")]
    pub vars: Vec<String>,

    /// Constant as name=value
    #[arg(long = "const", value_name = "NAME=VALUE")]
    pub consts: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Print the compiled program before evaluating
    #[arg(short, long)]
    pub listing: bool,

    /// More log output (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
