#![allow(clippy::print_stderr)]

use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;

use xlat_cli::args::{CliArgs, OutputFormat};
use xlat_cli::driver::{self, EXIT_SUCCESS};
use xlat_cli::reporter::Reporter;
use xlat_cli::tracing_config::init_tracing;

fn main() -> Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let report = driver::run(&args)?;

    match args.format {
        OutputFormat::Json => {
            let json = if args.pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            println!("{json}");
        }
        OutputFormat::Text => {
            let color = !args.no_color && std::io::stdout().is_terminal();
            let reporter = Reporter::new(color);
            if !report.classes.is_empty() {
                print!("{}", reporter.render_bridges(&report.classes));
            }
            if !report.diagnostics.is_empty() {
                eprint!("{}", reporter.render(&report.diagnostics));
            }
        }
    }

    let code = report.exit_code();
    if code != EXIT_SUCCESS {
        std::process::exit(code);
    }
    Ok(())
}
