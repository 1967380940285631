use crate::{
    CalcError, HistoryError, MAX_WIDTH,
    history::{MAX_CAPACITY, MAX_RING_SIZE, MIN_RING_SIZE, RESERVED_SLOTS},
};

// CALCULATOR OPTIONS
// ================================================================================================

/// Start-up configuration of a [crate::Calculator].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalculatorOptions {
    width: u8,
    history_ring_size: u8,
}

impl Default for CalculatorOptions {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            history_ring_size: Self::DEFAULT_HISTORY_RING_SIZE,
        }
    }
}

impl CalculatorOptions {
    // CONSTANTS
    // --------------------------------------------------------------------------------------------

    /// Initial accumulator width in hex digits.
    pub const DEFAULT_WIDTH: u8 = 8;

    /// Initial number of slots in the undo history ring.
    pub const DEFAULT_HISTORY_RING_SIZE: u8 = 16;

    // CONSTRUCTOR
    // --------------------------------------------------------------------------------------------

    /// Creates a new instance of [CalculatorOptions] from the specified parameters.
    ///
    /// `width` is in hex digits, 0 meaning variable width. `history_ring_size` is the number of
    /// slots in the undo ring, two of which do not count towards the undo capacity.
    pub fn new(width: u32, history_ring_size: u32) -> Result<Self, CalcError> {
        if history_ring_size < u32::from(MIN_RING_SIZE) {
            return Err(HistoryError::HistorySizeTooSmall(
                history_ring_size.saturating_sub(u32::from(RESERVED_SLOTS)),
            )
            .into());
        }
        if history_ring_size > u32::from(MAX_RING_SIZE) {
            return Err(HistoryError::HistorySizeTooLarge {
                requested: history_ring_size - u32::from(RESERVED_SLOTS),
                max: u32::from(MAX_CAPACITY),
            }
            .into());
        }
        Self::default().with_width(width).map(|options| Self {
            history_ring_size: history_ring_size as u8,
            ..options
        })
    }

    /// Sets the initial accumulator width in hex digits.
    pub fn with_width(mut self, width: u32) -> Result<Self, CalcError> {
        if width > u32::from(MAX_WIDTH) {
            return Err(CalcError::UnsupportedWidth(width));
        }
        self.width = width as u8;
        Ok(self)
    }

    /// Sets the number of steps the undo history can go back.
    pub fn with_undo_capacity(self, capacity: u32) -> Result<Self, CalcError> {
        if capacity < 1 {
            return Err(HistoryError::HistorySizeTooSmall(capacity).into());
        }
        Self::new(u32::from(self.width), capacity.saturating_add(u32::from(RESERVED_SLOTS)))
    }

    // ACCESSORS
    // --------------------------------------------------------------------------------------------

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn history_ring_size(&self) -> u8 {
        self.history_ring_size
    }
}
