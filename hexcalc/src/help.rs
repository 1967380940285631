//! Help, version and welcome texts.

use yansi::Paint;

fn cmd(name: &str) -> String {
    name.bold().blue().to_string()
}

fn arg(name: &str) -> String {
    name.underline().green().to_string()
}

fn title(name: &str) -> String {
    name.bold().cyan().to_string()
}

/// Returns the list of available commands.
pub fn main_help() -> String {
    let (from, to, index) = (arg("FROM"), arg("TO"), arg("INDEX"));
    [
        title("Output commands"),
        format!("  {} Print accumulator.                   {} Toggle indices.", cmd("p"), cmd("I")),
        String::new(),
        title("Modification commands"),
        format!(
            "  {} {} Set accumulator's width.       {} {index}   Flip bit.",
            cmd("w"),
            arg("WIDTH"),
            cmd("i")
        ),
        format!(
            "  {} Print current width.                 {} {from} {to} Flip bit range.",
            cmd("w"),
            cmd("i")
        ),
        format!("                                         {}         Flip all bits.", cmd("i")),
        String::new(),
        title("Highlighting commands"),
        format!(
            "  {} {index}   Highlight bit permanently.   {} {index}   Highlight bit once.",
            cmd("L"),
            cmd("l")
        ),
        format!(
            "  {} {from} {to} Highlight bit range perm.    \
             {} {from} {to} Highlight bit range once.",
            cmd("L"),
            cmd("l")
        ),
        format!("  {}         Turn off perm. highlighting.", cmd("L")),
        format!(
            "  {} {{ {} | {}{} | {}{} }} Set value of perm. highlighted bits.",
            cmd("="),
            arg("HEX_No"),
            cmd("'b"),
            arg("BIN_No"),
            cmd("'d"),
            arg("DEC_No")
        ),
        String::new(),
        title("History commands"),
        format!(
            "  {} Undo.            {} Redo.             {} Print undo history.",
            cmd("u"),
            cmd("r"),
            cmd("H")
        ),
        format!(
            "  {} {} Set undo history capacity.      {} Print current history capacity.",
            cmd("U"),
            arg("SIZE"),
            cmd("U")
        ),
        String::new(),
        title("Register information commands"),
        format!(
            "  {} {} Print register info.        {} Repeat last \"{} {}\" command.",
            cmd("s"),
            arg("REGISTER"),
            cmd("S"),
            cmd("s"),
            arg("REGISTER")
        ),
        format!("  {}          Print available registers.", cmd("s")),
        format!(
            "  {} {}     Load register specs from file {}.",
            cmd("R"),
            arg("FILE"),
            arg("FILE")
        ),
        String::new(),
        title("Common commands"),
        format!(
            "  {} Quit.                          {}         Print this text.",
            cmd("q"),
            cmd("h")
        ),
        format!(
            "  {} Print version info.            {} {} Print detailed help on {}.",
            cmd("v"),
            cmd("h"),
            arg("COMMAND"),
            arg("COMMAND")
        ),
    ]
    .join("\n")
}

/// Returns the detailed help on command `name`, if there is any.
pub fn command_help(name: &str) -> Option<String> {
    let (from, to, index) = (arg("FROM"), arg("TO"), arg("INDEX"));
    let text = match name {
        "p" => format!("{}  Print the current value of the accumulator.", cmd("p")),
        "I" => format!("{}  Toggle showing indices.", cmd("I")),
        "w" => format!(
            "{w} {width}  Set the accumulator's width to {width} hexadecimal digits.\n\
             \x20        If {width} is 0, the accumulator has variable width, i.e. its width\n\
             \x20        follows the stored value.\n\
             {w}        Print current accumulator width.",
            w = cmd("w"),
            width = arg("WIDTH"),
        ),
        "i" => format!(
            "{i} {index}    Flip bit with index {index}.\n\
             {i} {from} {to}  Flip bits {from}..{to} (or {to}..{from}).\n\
             {i}          Flip all bits.\n\
             \x20           If permanent highlighting is on, flip only highlighted bits.",
            i = cmd("i"),
        ),
        "u" => format!(
            "{}  Undo the last operation that changed the accumulator's permanent state.",
            cmd("u")
        ),
        "r" => format!("{}  Undo the last undo operation (redo).", cmd("r")),
        "H" => format!("{}  Print the current undo history.", cmd("H")),
        "U" => format!(
            "{u} {size}  Set the undo history capacity to {size}.\n\
             \x20        (Deletes current history!)\n\
             {u}       Print the current undo history capacity.",
            u = cmd("U"),
            size = arg("SIZE"),
        ),
        "l" => format!(
            "{l} {index}    Print accumulator and highlight the bit with index {index}.\n\
             {l} {from} {to}  Print accumulator and highlight bits {from}..{to} (or {to}..{from}).",
            l = cmd("l"),
        ),
        "L" => format!(
            "{l} {index}    Turn on permanent highlighting of bit with index {index}.\n\
             {l} {from} {to}  Turn on permanent highlighting of bits {from}..{to}\n\
             \x20           (or {to}..{from}).\n\
             {l}          Turn off permanent highlighting.",
            l = cmd("L"),
        ),
        "=" => format!(
            "{} {{ {hex} | {}{bin} | {}{dec} }}\n\
             \x20   Set value of permanently highlighted bits to {hex}, {bin} or {dec}.\n\
             \x20   Values too large for the number of highlighted bits are rejected.",
            cmd("="),
            cmd("'b"),
            cmd("'d"),
            hex = arg("HEX_NUMBER"),
            bin = arg("BIN_NUMBER"),
            dec = arg("DEC_NUMBER"),
        ),
        "S" => format!(
            "{}  Repeat the last call of the {} command (same register).",
            cmd("S"),
            cmd("s")
        ),
        "s" => format!(
            "{s} {reg}  Print the value of the individual fields of register {reg}\n\
             \x20          if that register had the same contents as the accumulator.\n\
             {s}           Print list of available register definitions.",
            s = cmd("s"),
            reg = arg("REGISTER"),
        ),
        "R" => format!(
            "{r} {file}  Load register specs from file {file}.\n\
             \x20      {file} is a plain text file specifying any number of registers and\n\
             \x20      the bit fields they are composed of. A register is specified as:\n\
             \x20          0 REGISTER_NAME\n\
             \x20          FIELD_WIDTH_IN_BITS FIELD_NAME\n\
             \x20          ...\n\
             \x20          FIELD_WIDTH_IN_BITS FIELD_NAME\n\
             \x20          0\n\
             \x20      Fields are listed from left to right, one per line. A line without\n\
             \x20      field name declares unused bits, which {s} does not list. The total\n\
             \x20      width must be divisible by 4 and must match the number of bits of\n\
             \x20      the accumulator when {s} is run. Example:\n\
             \x20          0 cause\n\
             \x20          11\n\
             \x20          16 addr\n\
             \x20          1 addr_valid\n\
             \x20          4 errcode\n\
             \x20          0\n\
             \x20      This defines a 32-bit register 'cause' whose bits 3..0 hold an error\n\
             \x20      code, bit 4 flags whether the failure involves an address, and bits\n\
             \x20      20..5 hold that address. Bits 31..21 are unused.",
            r = cmd("R"),
            s = cmd("s"),
            file = arg("FILE"),
        ),
        _ => return None,
    };
    Some(text)
}

pub fn version_text() -> String {
    format!(
        "{} v. {}\n\
         This program is free software: you can redistribute it and/or modify\n\
         it under the terms of the GPLv3+ <http://www.gnu.org/licenses>.\n\
         This program is distributed WITHOUT ANY WARRANTY.",
        "hexcalc".bold().blue(),
        env!("CARGO_PKG_VERSION"),
    )
}

pub fn intro() -> String {
    format!(
        "Think of this calculator as the direct interface to a single register\n\
         called the \"accumulator\".\n\
         \x20   You can directly set the value stored in the accumulator by typing\n\
         that value and hitting Enter. Values can be entered as hexadecimal,\n\
         binary or decimal numbers. For example, to set the accumulator to 47,\n\
         enter \"{}\" (hex), \"{}\" (bin) or \"{}\" (dec).\n\
         \x20   To print the current value of the accumulator, type \"{}\".\n\
         \x20   Type \"{}\" to print a list of available commands.",
        cmd("2f"),
        cmd("'b101111"),
        cmd("'d47"),
        cmd("p"),
        cmd("h"),
    )
}
