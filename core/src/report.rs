use crate::{AccumulatorState, BitRange, CalcError, Calculator, codec};

// VALUE REPORT
// ================================================================================================

/// Bit indices covered by one hex digit of the accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NibbleIndices {
    pub hi: u32,
    pub lo: u32,
}

/// The value of a highlighted bit range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightReport {
    pub range: BitRange,
    /// Binary digits of the range, most-significant first.
    pub bin: String,
    /// Hex digits of the range, zero-padded to a whole number of digits.
    pub hex: String,
    pub dec: u64,
}

/// Everything needed to print the accumulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueReport {
    pub hex: String,
    /// Binary digits of the accumulator, most-significant first.
    pub bin: String,
    pub dec: u64,
    pub width: u8,
    pub show_indices: bool,
    pub permanent_highlight: Option<BitRange>,
    /// Index ladder, one entry per hex digit, most-significant digit first.
    pub nibbles: Vec<NibbleIndices>,
    /// The resolved highlight: a one-shot range if one was requested, the permanent highlight
    /// otherwise.
    pub highlight: Option<HighlightReport>,
}

impl ValueReport {
    fn new(state: &AccumulatorState, highlight: Option<BitRange>) -> Self {
        let number_of_bits = state.number_of_bits();
        let nibbles = (0..state.digits().len() as u32)
            .map(|i| {
                let hi = number_of_bits - 4 * i - 1;
                NibbleIndices { hi, lo: hi - 3 }
            })
            .collect();

        let highlight = highlight.map(|range| {
            let bin = state.read_bits(range);
            HighlightReport {
                range,
                hex: codec::bits_to_hex(&bin),
                dec: codec::bits_to_value(&bin),
                bin,
            }
        });

        Self {
            hex: state.hex(),
            bin: state.bits(),
            dec: state.value(),
            width: state.width(),
            show_indices: state.show_indices(),
            permanent_highlight: state.permanent_highlight(),
            nibbles,
            highlight,
        }
    }
}

impl Calculator {
    /// Builds a report of the accumulator.
    ///
    /// A `one_shot` highlight range is used for this report only and takes precedence over the
    /// permanent highlight. Its bounds may be given in any order.
    pub fn report(&self, one_shot: Option<(u32, u32)>) -> Result<ValueReport, CalcError> {
        let highlight = match one_shot {
            Some((a, b)) => Some(self.inversion_range(a, b)?),
            None => self.state.permanent_highlight(),
        };
        Ok(ValueReport::new(&self.state, highlight))
    }
}
