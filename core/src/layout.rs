// Allow unused assignments - required by miette::Diagnostic derive macro
#![allow(unused_assignments)]

//! Register layouts: named registers split into named bit fields.
//!
//! A layout file is plain text. Blank lines and lines starting with `#` are ignored, and a token
//! starting with `#` comments out the rest of its line. A register is declared as follows:
//!
//! ```text
//! 0 cause
//! 11
//! 16 addr
//! 1 addr_valid
//! 4 errcode
//! 0
//! ```
//!
//! `0 NAME` opens a register, every following `WIDTH [NAME]` line appends a field of `WIDTH` bits
//! (fields are listed from the most-significant end), and a lone `0` closes the register. Fields
//! without a name are unused bits: they count towards the register width but are not decoded.
//! The total width of a register must be divisible by 4. A comment directly after the width,
//! as in `11 # reserved`, leaves the field unnamed.

use std::{collections::BTreeMap, fs, path::Path};

use miette::{Diagnostic, NamedSource, SourceSpan};

use crate::{AccumulatorState, CalcError, codec};

/// The widest field a layout may declare.
pub const MAX_FIELD_WIDTH: u32 = 64;

// ERRORS
// ================================================================================================

/// The ways a layout description can be malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("expected a positive number, but read '{0}'")]
    ExpectedNumber(String),
    #[error("expected register name")]
    ExpectedRegisterName,
    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),
    #[error("total width of register {register} ({width}) is not divisible by 4")]
    WidthNotDivisible { register: String, width: u32 },
    #[error("expected new register declaration starting with 0")]
    FieldBeforeDeclaration,
    #[error("register '{0}' is already defined")]
    DuplicateRegister(String),
    #[error("unexpected end of file; definition of register '{0}' is incomplete")]
    IncompleteRegister(String),
    #[error("field width {0} exceeds {max} bits", max = MAX_FIELD_WIDTH)]
    FieldTooWide(String),
}

#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{path}:{line}: {kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub path: String,
    /// 1-based number of the offending line.
    pub line: usize,
    #[source_code]
    source_code: NamedSource<String>,
    #[label("here")]
    span: SourceSpan,
}

#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum LayoutError {
    #[error("cannot read file '{path}'")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),
}

impl LayoutError {
    /// Returns the parse error kind, if this is a parse error.
    pub fn kind(&self) -> Option<&ParseErrorKind> {
        match self {
            Self::Parse(err) => Some(&err.kind),
            Self::Unreadable { .. } => None,
        }
    }
}

// LAYOUT TYPES
// ================================================================================================

/// A contiguous run of bits within a register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    width: u32,
    name: Option<String>,
}

impl Field {
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the field name, or `None` for unused bits.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// A named register and its fields, most-significant first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Register {
    name: String,
    fields: Vec<Field>,
    total_width: u32,
}

impl Register {
    fn new(name: String) -> Self {
        Self { name, fields: Vec::new(), total_width: 0 }
    }

    fn push_field(&mut self, width: u32, name: Option<String>) {
        self.total_width += width;
        self.fields.push(Field { width, name });
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns the sum of all field widths in bits.
    pub fn total_width(&self) -> u32 {
        self.total_width
    }
}

/// A collection of register definitions, keyed by register name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterLayout {
    registers: BTreeMap<String, Register>,
}

// DECODING
// ================================================================================================

/// The value of one named field of a decoded register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedField {
    pub name: String,
    /// Index of the most-significant bit of the field within the register.
    pub hi: u32,
    /// Index of the least-significant bit of the field within the register.
    pub lo: u32,
    pub bin: String,
    pub hex: String,
    pub dec: u64,
}

/// An accumulator value split into the named fields of a register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterReport {
    pub register: String,
    /// Width of the register (and of the accumulator) in bits.
    pub bits: u32,
    pub fields: Vec<DecodedField>,
}

impl RegisterLayout {
    // CONSTRUCTORS
    // --------------------------------------------------------------------------------------------

    /// Reads and parses the layout file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LayoutError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| LayoutError::Unreadable {
            path: path.display().to_string(),
            source,
        })?;
        let layout = Self::parse(&path.display().to_string(), &source)?;
        log::debug!("loaded {} register(s) from '{}'", layout.len(), path.display());
        Ok(layout)
    }

    /// Parses a layout description; `path` is only used to label errors.
    pub fn parse(path: &str, source: &str) -> Result<Self, LayoutError> {
        Parser::new(path, source).parse()
    }

    // ACCESSORS
    // --------------------------------------------------------------------------------------------

    pub fn len(&self) -> usize {
        self.registers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registers.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Register> {
        self.registers.get(name)
    }

    /// Returns the register names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.registers.keys().map(String::as_str)
    }

    /// Splits the accumulator into the named fields of register `name`.
    pub fn decode(
        &self,
        name: &str,
        state: &AccumulatorState,
    ) -> Result<RegisterReport, CalcError> {
        let register =
            self.get(name).ok_or_else(|| CalcError::UnknownRegister(name.to_string()))?;
        let bits = state.number_of_bits();
        if register.total_width != bits {
            return Err(CalcError::IncompatibleWidth {
                register: name.to_string(),
                register_bits: register.total_width,
                accumulator_bits: bits,
            });
        }

        let value_bits = state.bits();
        let mut offset = 0;
        let mut fields = Vec::with_capacity(register.fields.len());
        for field in register.fields.iter() {
            let start = offset as usize;
            offset += field.width;
            let Some(field_name) = field.name() else { continue };

            let bin = value_bits[start..offset as usize].to_string();
            let dec = codec::bits_to_value(&bin);
            fields.push(DecodedField {
                name: field_name.to_string(),
                hi: bits - start as u32 - 1,
                lo: bits - offset,
                hex: codec::value_to_hex(dec),
                dec,
                bin,
            });
        }

        Ok(RegisterReport { register: name.to_string(), bits, fields })
    }
}

// PARSER
// ================================================================================================

struct Token<'a> {
    text: &'a str,
    offset: usize,
}

/// A parse error kind together with the byte range it refers to.
struct Located {
    kind: ParseErrorKind,
    offset: usize,
    len: usize,
}

impl Located {
    fn at(kind: ParseErrorKind, token: &Token<'_>) -> Self {
        Self { kind, offset: token.offset, len: token.text.len() }
    }

    fn unexpected(token: &Token<'_>) -> Self {
        Self::at(ParseErrorKind::UnexpectedToken(token.text.into()), token)
    }
}

/// A register whose closing line has not been read yet.
struct OpenRegister {
    register: Register,
    line: usize,
    offset: usize,
}

struct Parser<'a> {
    path: &'a str,
    source: &'a str,
    registers: BTreeMap<String, Register>,
    open: Option<OpenRegister>,
}

impl<'a> Parser<'a> {
    fn new(path: &'a str, source: &'a str) -> Self {
        Self {
            path,
            source,
            registers: BTreeMap::new(),
            open: None,
        }
    }

    fn parse(mut self) -> Result<RegisterLayout, LayoutError> {
        let source = self.source;
        let mut line_start = 0;
        for (i, line) in source.split_inclusive('\n').enumerate() {
            let tokens = tokenize(line, line_start);
            if !tokens.is_empty() {
                self.parse_line(i + 1, &tokens).map_err(|err| self.error(err, i + 1))?;
            }
            line_start += line.len();
        }

        if let Some(open) = self.open.take() {
            let len = open.register.name.len();
            let kind = ParseErrorKind::IncompleteRegister(open.register.name);
            return Err(self.error(Located { kind, offset: open.offset, len }, open.line));
        }
        Ok(RegisterLayout { registers: self.registers })
    }

    fn parse_line(&mut self, line: usize, tokens: &[Token<'_>]) -> Result<(), Located> {
        let first = &tokens[0];
        if !first.text.bytes().all(|c| c.is_ascii_digit()) {
            return Err(Located::at(ParseErrorKind::ExpectedNumber(first.text.into()), first));
        }
        let width = first.text.parse::<u32>().unwrap_or(u32::MAX);

        match (width, self.open.take()) {
            // close the open register
            (0, Some(OpenRegister { register, .. })) => {
                if let Some(extra) = tokens.get(1) {
                    return Err(Located::unexpected(extra));
                }
                if register.total_width % 4 != 0 {
                    let kind = ParseErrorKind::WidthNotDivisible {
                        width: register.total_width,
                        register: register.name,
                    };
                    return Err(Located::at(kind, first));
                }
                self.registers.insert(register.name.clone(), register);
            },
            // open a new register
            (0, None) => {
                let Some(name) = tokens.get(1) else {
                    return Err(Located::at(ParseErrorKind::ExpectedRegisterName, first));
                };
                if let Some(extra) = tokens.get(2) {
                    return Err(Located::unexpected(extra));
                }
                if self.registers.contains_key(name.text) {
                    let kind = ParseErrorKind::DuplicateRegister(name.text.into());
                    return Err(Located::at(kind, name));
                }
                self.open = Some(OpenRegister {
                    register: Register::new(name.text.to_string()),
                    line,
                    offset: name.offset,
                });
            },
            // append a field
            (width, Some(mut open)) => {
                if width > MAX_FIELD_WIDTH {
                    return Err(Located::at(ParseErrorKind::FieldTooWide(first.text.into()), first));
                }
                if let Some(extra) = tokens.get(2) {
                    return Err(Located::unexpected(extra));
                }
                open.register.push_field(width, tokens.get(1).map(|name| name.text.to_string()));
                self.open = Some(open);
            },
            (_, None) => return Err(Located::at(ParseErrorKind::FieldBeforeDeclaration, first)),
        }
        Ok(())
    }

    fn error(&self, located: Located, line: usize) -> LayoutError {
        LayoutError::Parse(ParseError {
            kind: located.kind,
            path: self.path.to_string(),
            line,
            source_code: NamedSource::new(self.path, self.source.to_string()),
            span: SourceSpan::from((located.offset, located.len)),
        })
    }
}

/// Splits a line into whitespace-separated tokens, dropping everything from the first token
/// that starts with `#`.
fn tokenize(line: &str, line_start: usize) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = line;
    loop {
        let trimmed = rest.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            break;
        }
        let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
        let offset = line_start + (line.len() - trimmed.len());
        tokens.push(Token { text: &trimmed[..end], offset });
        rest = &trimmed[end..];
    }
    tokens
}

// TESTS
// ================================================================================================
