use std::path::PathBuf;

use clap::Parser;
use hexcalc_core::{CalcError, CalculatorOptions};

/// Name of the line-history file looked up in the home directory.
pub const DEFAULT_HISTORY_FILE: &str = ".hexcalc_history";

/// A handy hex calculator and register contents visualiser for assembly programmers
#[derive(Debug, Parser)]
#[command(name = "hexcalc", version, about)]
pub struct HexcalcCli {
    /// Register specs file to load at start-up; further files can be loaded with the 'R' command
    #[arg(value_parser)]
    pub specs_file: Option<PathBuf>,

    /// Load and save the input history from FILE [default: ~/.hexcalc_history]
    #[arg(short = 'i', long = "history", value_name = "FILE", value_parser)]
    pub history_file: Option<PathBuf>,

    /// Initial accumulator width in hex digits; 0 selects variable width
    #[arg(
        short = 'w',
        long = "width",
        default_value_t = u32::from(CalculatorOptions::DEFAULT_WIDTH)
    )]
    pub width: u32,

    /// Initial number of undo steps
    #[arg(short = 'u', long = "undo-capacity", value_name = "SIZE")]
    pub undo_capacity: Option<u32>,
}

impl HexcalcCli {
    /// Returns the calculator configuration selected on the command line.
    pub fn options(&self) -> Result<CalculatorOptions, CalcError> {
        let options = CalculatorOptions::default().with_width(self.width)?;
        match self.undo_capacity {
            Some(capacity) => options.with_undo_capacity(capacity),
            None => Ok(options),
        }
    }

    /// Returns the line-history file, falling back to `~/.hexcalc_history`.
    ///
    /// Returns `None` if no file was given and the home directory is unknown.
    pub fn history_path(&self) -> Option<PathBuf> {
        self.history_file.clone().or_else(|| {
            std::env::var_os("HOME").map(|home| PathBuf::from(home).join(DEFAULT_HISTORY_FILE))
        })
    }
}

#[cfg(test)]
mod tests {
    use hexcalc_core::{HistoryError, assert_matches};

    use super::*;

    #[test]
    fn defaults() {
        let cli = HexcalcCli::try_parse_from(["hexcalc"]).unwrap();
        assert_eq!(cli.specs_file, None);
        assert_eq!(cli.options().unwrap(), CalculatorOptions::default());
    }

    #[test]
    fn all_arguments() {
        let cli = HexcalcCli::try_parse_from([
            "hexcalc", "-i", "/tmp/hist", "--width", "4", "-u", "3", "regs.txt",
        ])
        .unwrap();
        assert_eq!(cli.specs_file, Some(PathBuf::from("regs.txt")));
        assert_eq!(cli.history_path(), Some(PathBuf::from("/tmp/hist")));

        let options = cli.options().unwrap();
        assert_eq!(options.width(), 4);
        assert_eq!(options.history_ring_size(), 5);
    }

    #[test]
    fn invalid_options() {
        let cli = HexcalcCli::try_parse_from(["hexcalc", "-w", "17"]).unwrap();
        assert_matches!(cli.options(), Err(CalcError::UnsupportedWidth(17)));

        let cli = HexcalcCli::try_parse_from(["hexcalc", "-u", "0"]).unwrap();
        assert_matches!(
            cli.options(),
            Err(CalcError::History(HistoryError::HistorySizeTooSmall(0)))
        );

        assert!(HexcalcCli::try_parse_from(["hexcalc", "-w", "four"]).is_err());
    }
}
