//! Bit-level mutations of the accumulator.
//!
//! Bits are numbered from the least-significant bit of the whole accumulator (bit 0) upward,
//! while digits are stored most-significant first, so bit `b` of an accumulator with `n` bits
//! lives in digit `(n - 1 - b) / 4`.

use crate::{
    AccumulatorState, BitRange, CalcError, Calculator, Literal, Radix,
    codec::{self, hex_digit, hex_digit_value},
};

// BIT ADDRESSING
// ================================================================================================

/// Returns the digit index holding `bit` and the mask selecting it within that digit.
#[inline]
fn nibble_position(number_of_bits: u32, bit: u32) -> (usize, u8) {
    let index = ((number_of_bits - 1 - bit) / 4) as usize;
    let mask = codec::pow2(bit % 4) as u8;
    (index, mask)
}

impl AccumulatorState {
    /// Flips every bit in `range`.
    ///
    /// `range` must lie within the current number of bits. A variable-width accumulator is
    /// re-normalized afterwards.
    pub fn invert_bits(&mut self, range: BitRange) -> &mut Self {
        let number_of_bits = self.number_of_bits();
        for bit in range.bits() {
            let (index, mask) = nibble_position(number_of_bits, bit);
            let nibble = hex_digit_value(self.digits()[index]) ^ mask;
            self.replace_nibble(index, hex_digit(nibble));
        }
        if self.width() == 0 {
            self.normalize();
        }
        self
    }

    /// Writes the binary digits `bits` (most-significant first) into `range`, starting at the
    /// least-significant bit of the range.
    ///
    /// If `bits` is shorter than the range, the remaining high-order bits of the range are
    /// cleared; extra high-order digits in `bits` are ignored. Bits outside `range` are left
    /// untouched. A variable-width accumulator is re-normalized afterwards.
    pub fn write_bits(&mut self, range: BitRange, bits: &str) -> &mut Self {
        let number_of_bits = self.number_of_bits();
        let mut source = bits.bytes().rev().chain(core::iter::repeat(b'0'));
        for bit in range.bits() {
            let (index, mask) = nibble_position(number_of_bits, bit);
            let nibble = hex_digit_value(self.digits()[index]);
            let nibble = if source.next() == Some(b'1') { nibble | mask } else { nibble & !mask };
            self.replace_nibble(index, hex_digit(nibble));
        }
        if self.width() == 0 {
            self.normalize();
        }
        self
    }

    /// Returns the binary digits of `range`, most-significant first.
    pub fn read_bits(&self, range: BitRange) -> String {
        let bits = self.bits();
        let number_of_bits = self.number_of_bits();
        let start = (number_of_bits - 1 - range.hi()) as usize;
        let end = (number_of_bits - 1 - range.lo()) as usize;
        bits[start..=end].to_string()
    }
}

// CALCULATOR OPERATIONS
// ================================================================================================

impl Calculator {
    /// Flips the bits between `a` and `b` (inclusive, in any order).
    pub fn invert(&mut self, a: u32, b: u32) -> Result<(), CalcError> {
        let range = self.inversion_range(a, b)?;
        self.state.invert_bits(range);
        self.commit();
        Ok(())
    }

    /// Flips the permanently highlighted bits or, if highlighting is off, every bit.
    pub fn invert_all(&mut self) -> Result<(), CalcError> {
        match self.state.permanent_highlight() {
            Some(range) => self.invert(range.lo(), range.hi()),
            None => self.invert(0, self.state.number_of_bits() - 1),
        }
    }

    /// Overwrites the permanently highlighted bits with `literal`.
    ///
    /// Values shorter than the highlighted range are zero-extended; values which need more bits
    /// than the range holds are rejected.
    pub fn replace(&mut self, literal: &Literal) -> Result<(), CalcError> {
        let range = self.state.permanent_highlight().ok_or(CalcError::NoHighlight)?;
        let too_large = || CalcError::ValueTooLargeForHighlight { bits: range.width() };

        let bits = literal.to_bits().ok_or_else(too_large)?;
        let fits = match literal.radix() {
            Radix::Dec => codec::bits_to_value(&bits) <= codec::max_value_for_bits(range.width()),
            Radix::Hex | Radix::Bin => codec::significant_bits(&bits) <= range.width() as usize,
        };
        if !fits {
            return Err(too_large());
        }

        self.state.write_bits(range, &bits);
        self.commit();
        log::debug!("bits {}..{} set to {literal}", range.hi(), range.lo());
        Ok(())
    }

    /// Validates a bit range against the current accumulator, swapping reversed bounds.
    pub(crate) fn inversion_range(&self, a: u32, b: u32) -> Result<BitRange, CalcError> {
        let bits = self.state.number_of_bits();
        BitRange::checked(a, b, bits).ok_or(CalcError::BadInversionLimits {
            lo: a.min(b),
            hi: a.max(b),
            bits,
        })
    }
}

// TESTS
// ================================================================================================
