//! Stateless conversions between binary-digit strings, hexadecimal-digit strings and unsigned
//! integers.
//!
//! The conversion helpers in this module do not validate their input beyond the conversion
//! alphabet: callers are expected to reject malformed literals first, which is what
//! [Literal::parse] is for.

use core::fmt;

use crate::{CalcError, MAX_NUMBER_OF_BITS, MAX_WIDTH};

// CONSTANTS
// ================================================================================================

/// Lowercase hexadecimal alphabet, indexed by nibble value.
pub const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Binary expansion of every nibble value, most-significant bit first.
const NIBBLE_BITS: [&str; 16] = [
    "0000", "0001", "0010", "0011", "0100", "0101", "0110", "0111", "1000", "1001", "1010",
    "1011", "1100", "1101", "1110", "1111",
];

const POW2: [u64; 64] = {
    let mut table = [0u64; 64];
    let mut i = 0;
    while i < 64 {
        table[i] = 1 << i;
        i += 1;
    }
    table
};

// POWERS OF TWO
// ================================================================================================

/// Returns `2^exp`.
///
/// Exponents up to 63 are served from a lookup table; larger exponents are computed by doubling,
/// which wraps to zero once the result no longer fits into 64 bits.
pub fn pow2(exp: u32) -> u64 {
    match POW2.get(exp as usize) {
        Some(value) => *value,
        None => pow2(exp - 1).wrapping_mul(2),
    }
}

/// Returns the largest value representable with `bits` bits.
pub fn max_value_for_bits(bits: u32) -> u64 {
    if bits >= 64 { u64::MAX } else { pow2(bits) - 1 }
}

// DIGIT CONVERSIONS
// ================================================================================================

/// Returns the value of a lowercase hex digit.
///
/// `digit` must be one of `0-9a-f`; other bytes produce meaningless results.
#[inline]
pub fn hex_digit_value(digit: u8) -> u8 {
    if digit > b'9' {
        digit.wrapping_sub(b'a' - 10)
    } else {
        digit.wrapping_sub(b'0')
    }
}

/// Returns the lowercase hex digit for a nibble value in `0..16`.
#[inline]
pub fn hex_digit(nibble: u8) -> u8 {
    HEX_DIGITS[(nibble & 0xf) as usize]
}

/// Returns the four binary digits of a lowercase hex digit, most-significant first.
#[inline]
pub fn hex_digit_bits(digit: u8) -> &'static str {
    NIBBLE_BITS[(hex_digit_value(digit) & 0xf) as usize]
}

// STRING CONVERSIONS
// ================================================================================================

/// Converts a string of binary digits into a lowercase hex string.
///
/// Digits are grouped into nibbles from the least-significant end, so the most-significant
/// nibble may be built from fewer than four digits. An empty input yields `"0"`.
pub fn bits_to_hex(bits: &str) -> String {
    let bits = bits.as_bytes();
    if bits.is_empty() {
        return String::from("0");
    }

    let mut hex = Vec::with_capacity(bits.len().div_ceil(4));
    for chunk in bits.rchunks(4) {
        let nibble = chunk.iter().fold(0u8, |acc, bit| (acc << 1) | (bit - b'0'));
        hex.push(hex_digit(nibble));
    }
    hex.iter().rev().map(|&digit| digit as char).collect()
}

/// Converts a lowercase hex string into its binary expansion, four digits per hex digit.
pub fn hex_to_bits(hex: &str) -> String {
    hex.bytes().map(hex_digit_bits).collect()
}

/// Converts a lowercase hex string of at most 16 digits into an unsigned integer.
///
/// Longer inputs keep only their least-significant 64 bits.
pub fn hex_to_value(hex: &str) -> u64 {
    hex.bytes()
        .fold(0u64, |acc, digit| (acc << 4) | u64::from(hex_digit_value(digit)))
}

/// Converts a binary-digit string into an unsigned integer, keeping only the least-significant
/// 64 bits of longer inputs.
pub fn bits_to_value(bits: &str) -> u64 {
    bits.bytes().fold(0u64, |acc, bit| (acc << 1) | u64::from(bit - b'0'))
}

/// Converts an unsigned integer into a lowercase hex string without leading zeros.
pub fn value_to_hex(value: u64) -> String {
    format!("{value:x}")
}

/// Converts a string of decimal digits into a lowercase hex string.
///
/// Returns `None` if the value does not fit into 64 bits.
pub fn dec_string_to_hex(dec: &str) -> Option<String> {
    dec_string_to_value(dec).map(value_to_hex)
}

/// Converts a string of decimal digits into an unsigned integer.
///
/// Returns `None` if the value does not fit into 64 bits.
pub fn dec_string_to_value(dec: &str) -> Option<u64> {
    dec.bytes().try_fold(0u64, |acc, digit| {
        acc.checked_mul(10)?.checked_add(u64::from(digit.wrapping_sub(b'0')))
    })
}

/// Returns the number of significant bits in a binary-digit string, i.e. its length once
/// leading zeros are stripped.
pub fn significant_bits(bits: &str) -> usize {
    bits.trim_start_matches('0').len()
}

// LITERALS
// ================================================================================================

/// The radix a [Literal] was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Radix {
    Hex,
    Dec,
    Bin,
}

/// A validated numeric literal as typed by the user.
///
/// Literals are written as plain hex digits (`2f`), or with a radix prefix for decimal (`'d47`)
/// and binary (`'b101111`) values. Hex digits are normalized to lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    radix: Radix,
    digits: String,
}

impl Literal {
    /// Parses and validates a literal token.
    pub fn parse(token: &str) -> Result<Self, CalcError> {
        if let Some(rest) = token.strip_prefix('\'') {
            let mut chars = rest.chars();
            let radix = match chars.next() {
                Some('d') => Radix::Dec,
                Some('b') => Radix::Bin,
                _ => return Err(CalcError::BadHexString(token.to_string())),
            };
            return Self::new(radix, chars.as_str());
        }
        Self::new(Radix::Hex, token)
    }

    /// Validates `digits` as a literal in the given radix.
    pub fn new(radix: Radix, digits: &str) -> Result<Self, CalcError> {
        match radix {
            Radix::Hex => {
                if digits.is_empty() {
                    return Err(CalcError::EmptyHexString);
                }
                if !digits.bytes().all(|c| c.is_ascii_hexdigit()) {
                    return Err(CalcError::BadHexString(digits.to_string()));
                }
                Ok(Self { radix, digits: digits.to_ascii_lowercase() })
            },
            Radix::Dec => {
                if digits.is_empty() {
                    return Err(CalcError::EmptyDecString);
                }
                if !digits.bytes().all(|c| c.is_ascii_digit()) {
                    return Err(CalcError::BadDecString(digits.to_string()));
                }
                Ok(Self { radix, digits: digits.to_string() })
            },
            Radix::Bin => {
                if digits.is_empty() {
                    return Err(CalcError::EmptyBinString);
                }
                if !digits.bytes().all(|c| c == b'0' || c == b'1') {
                    return Err(CalcError::BadBinString(digits.to_string()));
                }
                Ok(Self { radix, digits: digits.to_string() })
            },
        }
    }

    pub fn radix(&self) -> Radix {
        self.radix
    }

    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// Returns the binary expansion of this literal.
    ///
    /// Returns `None` for decimal literals which do not fit into 64 bits.
    pub fn to_bits(&self) -> Option<String> {
        match self.radix {
            Radix::Hex => Some(hex_to_bits(&self.digits)),
            Radix::Bin => Some(self.digits.clone()),
            Radix::Dec => dec_string_to_hex(&self.digits).map(|hex| hex_to_bits(&hex)),
        }
    }

    /// Returns the hex digits this literal assigns to the accumulator, keeping only the
    /// least-significant [MAX_WIDTH] digits of over-long hex and binary literals.
    ///
    /// Returns `None` for decimal literals which do not fit into 64 bits.
    pub(crate) fn to_accumulator_hex(&self) -> Option<String> {
        match self.radix {
            Radix::Hex => Some(keep_low_digits(&self.digits, MAX_WIDTH as usize).to_string()),
            Radix::Bin => {
                let bits = keep_low_digits(&self.digits, MAX_NUMBER_OF_BITS as usize);
                Some(value_to_hex(bits_to_value(bits)))
            },
            Radix::Dec => dec_string_to_hex(&self.digits),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.radix {
            Radix::Hex => f.write_str(&self.digits),
            Radix::Dec => write!(f, "'d{}", self.digits),
            Radix::Bin => write!(f, "'b{}", self.digits),
        }
    }
}

fn keep_low_digits(digits: &str, max: usize) -> &str {
    &digits[digits.len().saturating_sub(max)..]
}

// TESTS
// ================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_matches;

    #[test]
    fn pow2_table_and_doubling() {
        assert_eq!(pow2(0), 1);
        assert_eq!(pow2(13), 8192);
        assert_eq!(pow2(63), 9223372036854775808);
        assert_eq!(pow2(64), 0);
        assert_eq!(max_value_for_bits(4), 15);
        assert_eq!(max_value_for_bits(64), u64::MAX);
    }

    #[test]
    fn bits_to_hex_groups_from_the_right() {
        assert_eq!(bits_to_hex("101"), "5");
        assert_eq!(bits_to_hex("101111"), "2f");
        assert_eq!(bits_to_hex("00001111"), "0f");
        assert_eq!(bits_to_hex(""), "0");
    }

    #[test]
    fn hex_conversions() {
        assert_eq!(hex_to_bits("a5"), "10100101");
        assert_eq!(hex_to_value("ff"), 255);
        assert_eq!(hex_to_value("ffffffffffffffff"), u64::MAX);
        assert_eq!(value_to_hex(47), "2f");
        assert_eq!(dec_string_to_hex("47").as_deref(), Some("2f"));
        assert_eq!(dec_string_to_hex("18446744073709551616"), None);
    }

    #[test]
    fn literal_parsing() {
        let lit = Literal::parse("2F").unwrap();
        assert_eq!(lit.radix(), Radix::Hex);
        assert_eq!(lit.digits(), "2f");

        let lit = Literal::parse("'d47").unwrap();
        assert_eq!(lit.radix(), Radix::Dec);
        assert_eq!(lit.to_bits().as_deref(), Some("00101111"));

        let lit = Literal::parse("'b101111").unwrap();
        assert_eq!(lit.to_accumulator_hex().as_deref(), Some("2f"));
        assert_eq!(lit.to_string(), "'b101111");
        assert_eq!(Literal::parse("'d47").unwrap().to_string(), "'d47");
        assert_eq!(Literal::parse("2F").unwrap().to_string(), "2f");
    }

    #[test]
    fn literal_errors() {
        assert_matches!(Literal::parse(""), Err(CalcError::EmptyHexString));
        assert_matches!(Literal::parse("'d"), Err(CalcError::EmptyDecString));
        assert_matches!(Literal::parse("'b"), Err(CalcError::EmptyBinString));
        assert_matches!(Literal::parse("'x12"), Err(CalcError::BadHexString(_)));
        assert_matches!(Literal::parse("'"), Err(CalcError::BadHexString(_)));
        assert_matches!(Literal::parse("12g"), Err(CalcError::BadHexString(_)));
        assert_matches!(Literal::parse("'d12a"), Err(CalcError::BadDecString(_)));
        assert_matches!(Literal::parse("'b102"), Err(CalcError::BadBinString(_)));
    }

    #[test]
    fn over_long_literals_keep_low_digits() {
        let lit = Literal::parse("123456789abcdef01").unwrap();
        assert_eq!(lit.to_accumulator_hex().as_deref(), Some("23456789abcdef01"));

        let bits = format!("1{}", "0".repeat(64));
        let lit = Literal::new(Radix::Bin, &bits).unwrap();
        assert_eq!(lit.to_accumulator_hex().as_deref(), Some("0"));
    }
}
