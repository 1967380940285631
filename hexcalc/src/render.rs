//! Terminal rendering of calculator reports.
//!
//! Colours are applied with [yansi] and disappear when colouring is disabled globally.

use hexcalc_core::{Checkpoint, RegisterReport, ValueReport};
use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme, Report};
use yansi::Paint;

/// Width of one hex digit column in the accumulator printout: a separator and four bits.
const COLUMN_WIDTH: usize = 5;

/// Line width at which source-annotated errors are wrapped.
const ERROR_WIDTH: usize = 160;

// ACCUMULATOR
// ================================================================================================

/// Renders the accumulator with its index ladder and, if a highlight resolved, the highlighted
/// bits.
pub fn value(report: &ValueReport) -> String {
    let mut hex = String::new();
    let mut bin = String::new();
    let mut ruler = String::new();
    let mut tens = String::new();
    let mut ones = String::new();

    for (digit, (bits, indices)) in
        report.hex.chars().zip(report.bin.as_bytes().chunks(4).zip(report.nibbles.iter()))
    {
        hex.push_str("    ");
        hex.push(digit);
        bin.push(' ');
        bin.extend(bits.iter().map(|&bit| bit as char));
        ruler.push_str("+----");
        tens.push_str(&format!(" {}  {}", indices.hi / 10, indices.lo / 10));
        ones.push_str(&format!(" {}  {}", indices.hi % 10, indices.lo % 10));
    }
    ruler.push('+');

    // columns of the highlighted bits within the printout lines
    let span = report.highlight.as_ref().map(|highlight| {
        let column = |bit: u32| {
            let digit = (report.nibbles.len() - 1) - (bit / 4) as usize;
            digit * COLUMN_WIDTH + 1 + (3 - (bit % 4) as usize)
        };
        (column(highlight.range.hi()), column(highlight.range.lo()))
    });
    let mark = |line: &str| match span {
        Some((start, end)) => format!(
            "{}{}{}",
            &line[..start],
            line[start..=end].bold().magenta(),
            &line[end + 1..]
        ),
        None => line.to_string(),
    };

    let mut lines = vec![
        format!("{} {}", "decimal:".yellow(), report.dec.green()),
        format!("{}{hex}", "    hex:".yellow()),
        format!("{}{}", "    bin:".yellow(), mark(&bin)),
    ];
    if report.show_indices {
        lines.push(format!("         {}", mark(&ruler)));
        lines.push(format!("{}{}", "indices:".yellow(), mark(&tens)));
        lines.push(format!("         {}", mark(&ones)));
    }

    if let Some(highlight) = &report.highlight {
        lines.push(format!("highlighted bin: {}", group_nibbles(&highlight.bin).bold().cyan()));
        lines.push(format!("highlighted hex: {}", highlight.hex.as_str().bold().cyan()));
        lines.push(format!("highlighted dec: {}", highlight.dec.bold().cyan()));
    }
    lines.join("\n")
}

/// Separates groups of four bits, counting from the least-significant end.
fn group_nibbles(bits: &str) -> String {
    let head = bits.len() % 4;
    let mut groups = Vec::with_capacity(bits.len() / 4 + 1);
    if head != 0 {
        groups.push(&bits[..head]);
    }
    groups.extend(
        bits.as_bytes()[head..].chunks(4).filter_map(|chunk| std::str::from_utf8(chunk).ok()),
    );
    groups.join(" ")
}

pub fn width(width: u8) -> String {
    match width {
        0 => "variable".to_string(),
        width => width.to_string(),
    }
}

// UNDO HISTORY
// ================================================================================================

pub fn history(checkpoints: &[Checkpoint<'_>]) -> String {
    if checkpoints.is_empty() {
        return "no undo history".to_string();
    }
    let mut out = String::from("undo history:");
    for checkpoint in checkpoints {
        let marker = if checkpoint.is_current { "-> " } else { "   " };
        out.push_str(&format!("\n{marker}{}", checkpoint.state));
    }
    out
}

// REGISTERS
// ================================================================================================

pub fn register_names<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = String::from("available register definitions:");
    for name in names {
        out.push_str("\n    ");
        out.push_str(name);
    }
    out
}

/// Renders a decoded register as an aligned table of its fields.
pub fn register(report: &RegisterReport) -> String {
    let name_width = report
        .fields
        .iter()
        .map(|field| field.name.len())
        .chain([report.register.len()])
        .max()
        .unwrap_or_default();
    let bin_width =
        report.fields.iter().map(|field| field.bin.len()).chain([3]).max().unwrap_or(3);
    let hex_width = bin_width.div_ceil(4).max(3);
    let index_width = decimal_digits(report.bits.saturating_sub(1));
    let multi_bit = report.fields.iter().any(|field| field.hi != field.lo);
    let indices_width = 3 + index_width + if multi_bit { 2 + index_width } else { 0 };

    let mut out = format!(
        "{:>name_width$}{:indices_width$}   {}   {}   {}\n{}",
        report.register,
        "",
        format!("{:<bin_width$}", "bin").bold().magenta(),
        format!("{:<hex_width$}", "hex").bold().cyan(),
        "dec".bold().green(),
        "-".repeat(name_width + indices_width + bin_width + hex_width + 12),
    );

    for field in report.fields.iter() {
        let indices = if field.hi == field.lo {
            format!(" [{:>index_width$}]", field.hi)
        } else {
            format!(" [{:>index_width$}..{:>index_width$}]", field.hi, field.lo)
        };
        out.push_str(&format!(
            "\n{:>name_width$}{indices:<indices_width$} = {}   {}   {}",
            field.name,
            format!("{:<bin_width$}", field.bin).bold().magenta(),
            format!("{:<hex_width$}", field.hex).bold().cyan(),
            field.dec.bold().green(),
        ));
    }
    out
}

fn decimal_digits(value: u32) -> usize {
    value.checked_ilog10().unwrap_or(0) as usize + 1
}

// ERRORS
// ================================================================================================

/// Renders an error; diagnostics pointing into a source file are shown with a source snippet.
pub fn error(report: &Report) -> String {
    let diagnostic: &dyn Diagnostic = &**report;
    if diagnostic.labels().is_some() {
        let theme = if yansi::is_enabled() {
            GraphicalTheme::unicode()
        } else {
            GraphicalTheme::unicode_nocolor()
        };
        let mut out = String::new();
        let handler = GraphicalReportHandler::new_themed(theme).with_width(ERROR_WIDTH);
        if handler.render_report(&mut out, diagnostic).is_ok() {
            return out.trim_end().to_string();
        }
    }

    let mut out = format!("{} {report}", "error:".bold().red());
    if let Some(help) = diagnostic.help() {
        out.push_str(&format!("\n  help: {help}"));
    }
    out
}

// TESTS
// ================================================================================================
