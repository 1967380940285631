use std::io::IsTerminal;

use clap::Parser;
use hexcalc::{HexcalcCli, repl};
use miette::Report;

fn main() -> Result<(), Report> {
    // Enable debug logging to stderr via the HEXCALC_LOG environment variable, if present
    env_logger::Builder::from_env("HEXCALC_LOG").format_timestamp(None).init();

    if !std::io::stdout().is_terminal() {
        yansi::disable();
    }

    let cli = HexcalcCli::parse();
    repl::run(&cli)
}
