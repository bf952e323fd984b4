use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "xlat",
    version,
    about = "Synthesize bridge methods for an erased class hierarchy"
)]
pub struct CliArgs {
    /// JSON hierarchy document (`{ "options": {...}, "types": [...] }`).
    pub input: PathBuf,

    /// Output format for synthesized bridges and diagnostics.
    #[arg(long, value_enum, ignore_case = true, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Only report these classes (repeatable).
    #[arg(long = "class", value_name = "NAME")]
    pub classes: Vec<String>,

    /// Worker threads for synthesis (defaults to one per core).
    #[arg(short = 'j', long)]
    pub jobs: Option<usize>,

    /// Disable colored text output.
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Pretty-print JSON output.
    #[arg(long)]
    pub pretty: bool,

    /// Erasure bound for unbounded type variables; overrides the document.
    #[arg(long = "root-type", value_name = "NAME")]
    pub root_type: Option<String>,

    /// Do not report concrete classes with unimplemented methods.
    #[arg(long = "no-check-missing")]
    pub no_check_missing: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
