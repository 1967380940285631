// Allow unused assignments - required by miette::Diagnostic derive macro
#![allow(unused_assignments)]

use miette::Diagnostic;

use crate::{MAX_NUMBER_OF_BITS, MAX_WIDTH};

// HISTORY ERROR
// ================================================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Diagnostic)]
pub enum HistoryError {
    #[error("no more undo history")]
    EmptyUndoHistory,
    #[error("no more redo history")]
    EmptyRedoHistory,
    #[error("history size too small: requested {0}, but at least 1 step must be kept")]
    HistorySizeTooSmall(u32),
    #[error("history size too large: requested {requested}, but at most {max} steps can be kept")]
    HistorySizeTooLarge { requested: u32, max: u32 },
}

// CALCULATOR ERROR
// ================================================================================================

/// Errors returned by the operations of a [crate::Calculator].
///
/// Every operation which fails with one of these errors leaves the accumulator, the undo history
/// and any loaded register layout exactly as they were before the call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Diagnostic)]
pub enum CalcError {
    #[error("binary string is empty")]
    EmptyBinString,
    #[error("decimal string is empty")]
    EmptyDecString,
    #[error("hexadecimal string is empty")]
    EmptyHexString,
    #[error("binary string '{0}' contains illegal characters")]
    #[diagnostic(help("binary digits are 0 and 1"))]
    BadBinString(String),
    #[error("hexadecimal string '{0}' contains illegal characters")]
    #[diagnostic(help("prefix binary values with 'b and decimal values with 'd"))]
    BadHexString(String),
    #[error("decimal string '{0}' contains illegal characters")]
    BadDecString(String),
    #[error("highlighting limits {lo}..{hi} are out of range for {bits} bits")]
    BadHighlightLimits { lo: u32, hi: u32, bits: u32 },
    #[error("value too large for current accumulator width ({width} hex digits)")]
    ValueTooLargeForWidth { width: u8 },
    #[error("value too large for width of highlighted bit field ({bits} bits)")]
    ValueTooLargeForHighlight { bits: u32 },
    #[error(
        "width {0} is not supported; the accumulator holds up to {max} hex digits ({bits} bits)",
        max = MAX_WIDTH,
        bits = MAX_NUMBER_OF_BITS
    )]
    UnsupportedWidth(u32),
    #[error("inversion limits {lo}..{hi} are out of range for {bits} bits")]
    BadInversionLimits { lo: u32, hi: u32, bits: u32 },
    #[error("no permanently highlighted bits")]
    #[diagnostic(help("turn on permanent highlighting with the 'L' command first"))]
    NoHighlight,
    #[error(transparent)]
    #[diagnostic(transparent)]
    History(#[from] HistoryError),
    #[error("unknown register name '{0}'")]
    UnknownRegister(String),
    #[error(
        "width of register '{register}' ({register_bits} bits) mismatches current accumulator \
         width ({accumulator_bits} bits)"
    )]
    IncompatibleWidth {
        register: String,
        register_bits: u32,
        accumulator_bits: u32,
    },
}
