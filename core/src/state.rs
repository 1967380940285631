use core::fmt;

use smallvec::SmallVec;

use crate::{MAX_WIDTH, codec};

// BIT RANGE
// ================================================================================================

/// An inclusive range of bit indices, counted from the least-significant bit of the accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitRange {
    lo: u8,
    hi: u8,
}

impl BitRange {
    /// Builds a range from two bounds given in any order, returning `None` if either bound does
    /// not address one of `number_of_bits` bits.
    pub fn checked(a: u32, b: u32, number_of_bits: u32) -> Option<Self> {
        let (lo, hi) = if b < a { (b, a) } else { (a, b) };
        if hi >= number_of_bits {
            return None;
        }
        Some(Self { lo: lo as u8, hi: hi as u8 })
    }

    /// Returns the index of the least-significant bit in the range.
    pub fn lo(&self) -> u32 {
        u32::from(self.lo)
    }

    /// Returns the index of the most-significant bit in the range.
    pub fn hi(&self) -> u32 {
        u32::from(self.hi)
    }

    /// Returns the number of bits covered by the range.
    pub fn width(&self) -> u32 {
        self.hi() - self.lo() + 1
    }

    /// Iterates over the bit indices of the range, least-significant first.
    pub fn bits(&self) -> impl Iterator<Item = u32> {
        self.lo()..=self.hi()
    }
}

impl fmt::Display for BitRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.hi, self.lo)
    }
}

// ACCUMULATOR STATE
// ================================================================================================

/// The hex digits of the accumulator, most-significant first.
pub type Digits = SmallVec<[u8; MAX_WIDTH as usize]>;

/// A snapshot of the accumulator: its hex digits, its width, the index display toggle and the
/// permanent highlight.
///
/// A width of 0 means the accumulator has variable width: the digit sequence is kept at its
/// minimal length (at least one digit). Otherwise the digit sequence always has exactly `width`
/// digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccumulatorState {
    digits: Digits,
    width: u8,
    show_indices: bool,
    highlight: Option<BitRange>,
}

impl Default for AccumulatorState {
    fn default() -> Self {
        let mut digits = Digits::new();
        digits.push(b'0');
        Self {
            digits,
            width: 0,
            show_indices: true,
            highlight: None,
        }
    }
}

impl AccumulatorState {
    // ACCESSORS
    // --------------------------------------------------------------------------------------------

    /// Returns the hex digits of the accumulator as lowercase ASCII, most-significant first.
    pub fn digits(&self) -> &[u8] {
        &self.digits
    }

    /// Returns the hex digits of the accumulator as a string.
    pub fn hex(&self) -> String {
        self.digits.iter().map(|&digit| digit as char).collect()
    }

    /// Returns the binary expansion of the accumulator, most-significant bit first.
    pub fn bits(&self) -> String {
        self.digits.iter().map(|&digit| codec::hex_digit_bits(digit)).collect()
    }

    /// Returns the value of the accumulator.
    pub fn value(&self) -> u64 {
        self.digits
            .iter()
            .fold(0u64, |acc, &digit| (acc << 4) | u64::from(codec::hex_digit_value(digit)))
    }

    /// Returns the configured width in hex digits, 0 meaning variable width.
    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn number_of_bits(&self) -> u32 {
        self.digits.len() as u32 * 4
    }

    pub fn show_indices(&self) -> bool {
        self.show_indices
    }

    /// Returns the permanently highlighted bit range, if highlighting is on.
    pub fn permanent_highlight(&self) -> Option<BitRange> {
        self.highlight
    }

    // MUTATORS
    // --------------------------------------------------------------------------------------------

    /// Sets the digits of the accumulator and normalizes them to the current width.
    ///
    /// `hex` must consist of lowercase hex digits only and must not be longer than
    /// [MAX_WIDTH]; these are not checked. When the width is fixed and `hex` is longer, the
    /// most-significant digits are dropped.
    pub fn assign(&mut self, hex: &str) -> &mut Self {
        self.digits.clear();
        self.digits.extend(hex.bytes());
        self.normalize()
    }

    /// Changes the width and re-normalizes the digits, zero-extending or truncating on the left.
    ///
    /// `width` must not exceed [MAX_WIDTH]; this is not checked.
    pub fn set_width(&mut self, width: u8) -> &mut Self {
        self.width = width;
        self.normalize()
    }

    /// Turns permanent highlighting on for the bits between `a` and `b` (in any order).
    ///
    /// If either bound is out of range, highlighting is turned off instead.
    pub fn set_permanent_highlight(&mut self, a: u32, b: u32) -> &mut Self {
        self.highlight = BitRange::checked(a, b, self.number_of_bits());
        self
    }

    pub fn clear_permanent_highlight(&mut self) -> &mut Self {
        self.highlight = None;
        self
    }

    pub fn toggle_indices(&mut self) -> &mut Self {
        self.show_indices = !self.show_indices;
        self
    }

    /// Overwrites the hex digit at position `i` (counted from the most-significant digit).
    ///
    /// # Preconditions
    /// `i` must be smaller than the number of digits and `digit` must be a lowercase hex digit.
    /// Neither is checked beyond the bounds check of slice indexing.
    #[inline]
    pub fn replace_nibble(&mut self, i: usize, digit: u8) -> &mut Self {
        self.digits[i] = digit;
        self
    }

    /// Brings the digit sequence in line with the width and drops a permanent highlight which no
    /// longer fits.
    pub fn normalize(&mut self) -> &mut Self {
        self.adjust_to_width();
        if let Some(range) = self.highlight {
            self.set_permanent_highlight(range.lo(), range.hi());
        }
        self
    }

    fn adjust_to_width(&mut self) {
        let len = self.digits.len();
        let width = self.width as usize;
        if width == 0 {
            match self.digits.iter().position(|&digit| digit != b'0') {
                Some(first) => {
                    self.digits.drain(..first);
                },
                None => {
                    self.digits.clear();
                    self.digits.push(b'0');
                },
            }
        } else if width > len {
            self.digits.insert_many(0, core::iter::repeat_n(b'0', width - len));
        } else {
            self.digits.drain(..len - width);
        }
    }
}

impl fmt::Display for AccumulatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  wd({})", self.hex(), self.width)?;
        if self.show_indices {
            f.write_str("  idx")?;
        }
        if let Some(range) = self.highlight {
            write!(f, "  hl({range})")?;
        }
        Ok(())
    }
}

// TESTS
// ================================================================================================
