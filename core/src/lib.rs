//! Accumulator engine of the hexcalc register calculator.
//!
//! A [Calculator] owns a single accumulator of up to [MAX_WIDTH] hex digits and a bounded
//! undo/redo [History] of its past states. Every successful operation commits a checkpoint;
//! every failed operation leaves the accumulator and the history untouched.

extern crate alloc;

/// This is an implementation of `std::assert_matches::assert_matches`
/// so it can be removed when that feature stabilizes upstream
#[macro_export]
macro_rules! assert_matches {
    ($left:expr, $(|)? $( $pattern:pat_param )|+ $( if $guard: expr )? $(,)?) => {
        match $left {
            $( $pattern )|+ $( if $guard )? => {}
            ref left_val => {
                panic!(r#"
assertion failed: `(left matches right)`
    left: `{:?}`,
    right: `{}`"#, left_val, stringify!($($pattern)|+ $(if $guard)?));
            }
        }
    };

    ($left:expr, $(|)? $( $pattern:pat_param )|+ $( if $guard: expr )?, $msg:literal $(,)?) => {
        match $left {
            $( $pattern )|+ $( if $guard )? => {}
            ref left_val => {
                panic!(concat!(r#"
assertion failed: `(left matches right)`
    left: `{:?}`,
    right: `{}`
"#, $msg), left_val, stringify!($($pattern)|+ $(if $guard)?));
            }
        }
    };
}

pub mod codec;
pub use codec::{Literal, Radix};

mod config;
pub use config::CalculatorOptions;

mod errors;
pub use errors::{CalcError, HistoryError};

pub mod history;
pub use history::{Checkpoint, History, HistoryIndex};

pub mod layout;
pub use layout::{
    DecodedField, Field, LayoutError, ParseError, ParseErrorKind, Register, RegisterLayout,
    RegisterReport,
};

mod ops;

mod report;
pub use report::{HighlightReport, NibbleIndices, ValueReport};

mod state;
pub use state::{AccumulatorState, BitRange, Digits};

// CONSTANTS
// ================================================================================================

/// The largest accumulator width in hex digits.
pub const MAX_WIDTH: u8 = 16;

/// The largest accumulator width in bits.
pub const MAX_NUMBER_OF_BITS: u32 = MAX_WIDTH as u32 * 4;

// CALCULATOR
// ================================================================================================

/// The live accumulator together with its undo history.
#[derive(Debug, Clone)]
pub struct Calculator {
    pub(crate) state: AccumulatorState,
    pub(crate) history: History,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new(CalculatorOptions::default())
    }
}

impl Calculator {
    // CONSTRUCTOR
    // --------------------------------------------------------------------------------------------

    /// Creates a calculator holding zero at the configured width, with a history seeded by that
    /// state.
    pub fn new(options: CalculatorOptions) -> Self {
        let mut state = AccumulatorState::default();
        state.set_width(options.width());
        let history = History::new(options.history_ring_size(), &state);
        Self { state, history }
    }

    // ACCESSORS
    // --------------------------------------------------------------------------------------------

    pub fn state(&self) -> &AccumulatorState {
        &self.state
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Returns the number of undo steps the history is configured for.
    pub fn history_capacity(&self) -> u32 {
        u32::from(self.history.capacity())
    }

    /// Returns the retained checkpoints, oldest first.
    pub fn checkpoints(&self) -> Vec<Checkpoint<'_>> {
        self.history.checkpoints()
    }

    // ACCUMULATOR OPERATIONS
    // --------------------------------------------------------------------------------------------

    /// Loads `literal` into the accumulator.
    ///
    /// Hex and binary literals wider than the accumulator lose their most-significant digits.
    /// Decimal literals must fit into the current width (64 bits for variable width).
    pub fn assign(&mut self, literal: &Literal) -> Result<(), CalcError> {
        let width = self.state.width();
        let too_large = || CalcError::ValueTooLargeForWidth {
            width: if width == 0 { MAX_WIDTH } else { width },
        };

        let hex = literal.to_accumulator_hex().ok_or_else(too_large)?;
        if literal.radix() == Radix::Dec && width != 0 && hex.len() > usize::from(width) {
            return Err(too_large());
        }

        self.state.assign(&hex);
        self.commit();
        log::debug!("accumulator set to {literal}");
        Ok(())
    }

    /// Changes the accumulator width in hex digits, 0 meaning variable width.
    ///
    /// Setting the current width again is a no-op and commits nothing.
    pub fn set_width(&mut self, width: u32) -> Result<(), CalcError> {
        if width > u32::from(MAX_WIDTH) {
            return Err(CalcError::UnsupportedWidth(width));
        }
        if width == u32::from(self.state.width()) {
            return Ok(());
        }
        self.state.set_width(width as u8);
        self.commit();
        Ok(())
    }

    pub fn toggle_indices(&mut self) {
        self.state.toggle_indices();
        self.commit();
    }

    /// Turns on permanent highlighting of the bits between `a` and `b` (in any order).
    pub fn set_permanent_highlight(&mut self, a: u32, b: u32) -> Result<(), CalcError> {
        let bits = self.state.number_of_bits();
        if BitRange::checked(a, b, bits).is_none() {
            return Err(CalcError::BadHighlightLimits { lo: a.min(b), hi: a.max(b), bits });
        }
        self.state.set_permanent_highlight(a, b);
        self.commit();
        Ok(())
    }

    pub fn clear_permanent_highlight(&mut self) {
        self.state.clear_permanent_highlight();
        self.commit();
    }

    // HISTORY OPERATIONS
    // --------------------------------------------------------------------------------------------

    /// Goes back to the previous checkpoint.
    pub fn undo(&mut self) -> Result<(), CalcError> {
        self.state = self.history.pop()?.clone();
        Ok(())
    }

    /// Re-applies the most recently undone checkpoint.
    pub fn redo(&mut self) -> Result<(), CalcError> {
        self.state = self.history.unpop()?.clone();
        Ok(())
    }

    /// Discards the undo history and makes room for `capacity` undo steps.
    pub fn resize_history(&mut self, capacity: u32) -> Result<(), CalcError> {
        self.history.resize(capacity, &self.state)?;
        Ok(())
    }

    // REGISTERS
    // --------------------------------------------------------------------------------------------

    /// Splits the accumulator into the fields of register `name` from `layout`.
    pub fn decode_register(
        &self,
        layout: &RegisterLayout,
        name: &str,
    ) -> Result<RegisterReport, CalcError> {
        layout.decode(name, &self.state)
    }

    /// Returns the names of the registers in `layout`, sorted.
    pub fn list_registers<'a>(&self, layout: &'a RegisterLayout) -> Vec<&'a str> {
        layout.names().collect()
    }

    // HELPERS
    // --------------------------------------------------------------------------------------------

    pub(crate) fn commit(&mut self) {
        self.history.push(&self.state);
    }
}

// TESTS
// ================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(token: &str) -> Literal {
        Literal::parse(token).unwrap()
    }

    #[test]
    fn starts_at_zero() {
        let calc = Calculator::default();
        assert_eq!(calc.state().hex(), "00000000");
        assert_eq!(calc.history_capacity(), 14);
        assert_eq!(calc.checkpoints().len(), 1);
    }

    #[test]
    fn assign_literals() {
        let mut calc = Calculator::default();
        calc.assign(&literal("2F")).unwrap();
        assert_eq!(calc.state().hex(), "0000002f");

        calc.assign(&literal("'d47")).unwrap();
        assert_eq!(calc.state().value(), 47);

        calc.assign(&literal("'b1111")).unwrap();
        assert_eq!(calc.state().hex(), "0000000f");

        calc.assign(&literal("123456789")).unwrap();
        assert_eq!(calc.state().hex(), "23456789");
    }

    #[test]
    fn decimal_must_fit_width() {
        let mut calc = Calculator::new(CalculatorOptions::default().with_width(2).unwrap());
        calc.assign(&literal("'d255")).unwrap();
        assert_matches!(
            calc.assign(&literal("'d256")),
            Err(CalcError::ValueTooLargeForWidth { width: 2 })
        );
        assert_eq!(calc.state().hex(), "ff");

        calc.set_width(0).unwrap();
        assert_matches!(
            calc.assign(&literal("'d18446744073709551616")),
            Err(CalcError::ValueTooLargeForWidth { width: 16 })
        );
    }

    #[test]
    fn set_width_same_value_commits_nothing() {
        let mut calc = Calculator::default();
        calc.set_width(8).unwrap();
        assert_eq!(calc.checkpoints().len(), 1);

        calc.set_width(4).unwrap();
        assert_eq!(calc.checkpoints().len(), 2);
        assert_matches!(calc.set_width(17), Err(CalcError::UnsupportedWidth(17)));
    }

    #[test]
    fn highlight_limits_are_checked() {
        let mut calc = Calculator::default();
        assert_matches!(
            calc.set_permanent_highlight(40, 2),
            Err(CalcError::BadHighlightLimits { lo: 2, hi: 40, bits: 32 })
        );
        assert_eq!(calc.state().permanent_highlight(), None);

        calc.set_permanent_highlight(31, 28).unwrap();
        assert_eq!(calc.state().permanent_highlight().map(|r| r.width()), Some(4));
        calc.clear_permanent_highlight();
        assert_eq!(calc.state().permanent_highlight(), None);
    }

    #[test]
    fn every_mutation_is_undoable() {
        let mut calc = Calculator::default();
        calc.assign(&literal("ff")).unwrap();
        calc.toggle_indices();
        calc.set_permanent_highlight(0, 3).unwrap();

        calc.undo().unwrap();
        assert_eq!(calc.state().permanent_highlight(), None);
        calc.undo().unwrap();
        assert!(calc.state().show_indices());
        calc.undo().unwrap();
        assert_eq!(calc.state().hex(), "00000000");
        assert_matches!(calc.undo(), Err(CalcError::History(HistoryError::EmptyUndoHistory)));

        calc.redo().unwrap();
        assert_eq!(calc.state().hex(), "000000ff");
    }

    #[test]
    fn failed_operations_do_not_commit() {
        let mut calc = Calculator::default();
        assert_matches!(
            calc.invert(0, 32),
            Err(CalcError::BadInversionLimits { lo: 0, hi: 32, bits: 32 })
        );
        assert_matches!(
            calc.assign(&literal("'d18446744073709551616")),
            Err(CalcError::ValueTooLargeForWidth { width: 8 })
        );
        assert_matches!(calc.set_width(20), Err(CalcError::UnsupportedWidth(20)));
        assert_eq!(calc.checkpoints().len(), 1);
        assert_eq!(calc.state().hex(), "00000000");
    }

    #[test]
    fn resize_history_keeps_current_state() {
        let mut calc = Calculator::default();
        calc.assign(&literal("1")).unwrap();
        calc.resize_history(3).unwrap();
        assert_eq!(calc.history_capacity(), 3);
        assert_eq!(calc.state().hex(), "00000001");
        assert_matches!(calc.undo(), Err(CalcError::History(HistoryError::EmptyUndoHistory)));
    }
}
