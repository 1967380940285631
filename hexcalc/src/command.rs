// Allow unused assignments - required by miette::Diagnostic derive macro
#![allow(unused_assignments)]

use std::path::PathBuf;

use hexcalc_core::{CalcError, Literal};
use miette::Diagnostic;

// COMMAND ERROR
// ================================================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Diagnostic)]
pub enum CommandError {
    #[error("argument(s) must be positive integer(s)")]
    NotPositiveInteger,
    #[error("highlighting command expects 1 or 2 arguments")]
    MissingHighlightLimits,
    #[error("replacement command expects an argument")]
    #[diagnostic(help("type 'h =' for the accepted value formats"))]
    MissingReplacement,
    #[error("load command expects an argument")]
    MissingLayoutPath,
    #[error(transparent)]
    #[diagnostic(transparent)]
    Literal(#[from] CalcError),
}

// COMMAND
// ================================================================================================

/// One line of user input.
///
/// A line whose first token is a single character other than a hex digit is a command, and the
/// tokens following it are its arguments; any other line sets the accumulator to the value of
/// its first token. Arguments beyond those a command takes are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Set the accumulator.
    Assign(Literal),
    /// `q`
    Quit,
    /// `h [CMD]`
    Help(Option<String>),
    /// `v`
    Version,
    /// `p`
    Print,
    /// `I`
    ToggleIndices,
    /// `l N [M]`
    Highlight(u32, u32),
    /// `L [N [M]]`; no limits turn permanent highlighting off.
    PermanentHighlight(Option<(u32, u32)>),
    /// `w [N]`
    Width(Option<u32>),
    /// `i [N [M]]`; no limits invert every bit, or the permanently highlighted ones.
    Invert(Option<(u32, u32)>),
    /// `= VALUE`
    Replace(Literal),
    /// `u`
    Undo,
    /// `r`
    Redo,
    /// `U [N]`
    UndoCapacity(Option<u32>),
    /// `H`
    PrintHistory,
    /// `s [REG]`
    Decode(Option<String>),
    /// `S`
    RepeatDecode,
    /// `R FILE`
    LoadLayout(PathBuf),
}

impl Command {
    /// Parses a line of input, returning `None` for blank lines.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let mut tokens = line.split_whitespace();
        let Some(first) = tokens.next() else {
            return Ok(None);
        };

        let mut chars = first.chars();
        let name = match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_ascii_hexdigit() => c,
            _ => return Ok(Some(Self::Assign(Literal::parse(first)?))),
        };
        let args: Vec<&str> = tokens.collect();

        let command = match name {
            'q' => Self::Quit,
            'h' => Self::Help(args.first().map(|arg| arg.to_string())),
            'v' => Self::Version,
            'p' => Self::Print,
            'I' => Self::ToggleIndices,
            'l' => {
                let (lo, hi) = limits(&args)?.ok_or(CommandError::MissingHighlightLimits)?;
                Self::Highlight(lo, hi)
            },
            'L' => Self::PermanentHighlight(limits(&args)?),
            'w' => Self::Width(args.first().map(|arg| number(arg)).transpose()?),
            'i' => Self::Invert(limits(&args)?),
            '=' => {
                let value = args.first().ok_or(CommandError::MissingReplacement)?;
                Self::Replace(Literal::parse(value)?)
            },
            'u' => Self::Undo,
            'r' => Self::Redo,
            'U' => Self::UndoCapacity(args.first().map(|arg| number(arg)).transpose()?),
            'H' => Self::PrintHistory,
            's' => Self::Decode(args.first().map(|arg| arg.to_string())),
            'S' => Self::RepeatDecode,
            'R' => {
                let path = args.first().ok_or(CommandError::MissingLayoutPath)?;
                Self::LoadLayout(PathBuf::from(path))
            },
            _ => return Err(CalcError::BadHexString(first.to_string()).into()),
        };
        Ok(Some(command))
    }
}

/// Parses one or two bit indices; a single index stands for a one-bit range.
fn limits(args: &[&str]) -> Result<Option<(u32, u32)>, CommandError> {
    match args {
        [] => Ok(None),
        [bit] => {
            let bit = number(bit)?;
            Ok(Some((bit, bit)))
        },
        [lo, hi, ..] => Ok(Some((number(lo)?, number(hi)?))),
    }
}

fn number(arg: &str) -> Result<u32, CommandError> {
    if arg.is_empty() || !arg.bytes().all(|c| c.is_ascii_digit()) {
        return Err(CommandError::NotPositiveInteger);
    }
    arg.parse().map_err(|_| CommandError::NotPositiveInteger)
}

// TESTS
// ================================================================================================
