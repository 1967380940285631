//! Bounded undo/redo history of accumulator states.
//!
//! The history is a ring of [AccumulatorState] slots addressed through three cursors:
//!
//! - `bottom` points at the oldest retained checkpoint.
//! - `top` points at the slot following the live checkpoint, i.e. the next slot to write.
//! - `last_push` records `top` as it was right after the most recent push and marks how far a
//!   redo can go.
//!
//! When a push would make `top` run into `bottom`, the oldest checkpoint is dropped, so the ring
//! retains at most `ring_size - 1` checkpoints.

use crate::{AccumulatorState, HistoryError};

mod index;
pub use index::{HistoryIndex, MAX_RING_SIZE, MIN_RING_SIZE};

/// Number of ring slots which do not count towards the user-visible undo capacity.
pub const RESERVED_SLOTS: u8 = 2;

/// The largest undo capacity [History::resize] accepts.
pub const MAX_CAPACITY: u8 = MAX_RING_SIZE - RESERVED_SLOTS;

// CHECKPOINT
// ================================================================================================

/// A retained accumulator state, as listed by [History::checkpoints].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint<'a> {
    pub state: &'a AccumulatorState,
    /// Whether this is the checkpoint the accumulator currently holds, i.e. the one the next undo
    /// moves away from.
    pub is_current: bool,
}

// HISTORY
// ================================================================================================

#[derive(Debug, Clone)]
pub struct History {
    slots: Vec<AccumulatorState>,
    bottom: HistoryIndex,
    top: HistoryIndex,
    last_push: HistoryIndex,
    no_redo: bool,
}

impl History {
    // CONSTRUCTORS
    // --------------------------------------------------------------------------------------------

    /// Creates a history with `ring_size` slots, seeded with a single checkpoint of `seed`.
    ///
    /// # Panics
    /// Panics if `ring_size` is zero.
    pub fn new(ring_size: u8, seed: &AccumulatorState) -> Self {
        let start = HistoryIndex::new(0, ring_size);
        let mut history = Self {
            slots: vec![AccumulatorState::default(); ring_size as usize],
            bottom: start,
            top: start,
            last_push: start,
            no_redo: true,
        };
        history.push(seed);
        history
    }

    // ACCESSORS
    // --------------------------------------------------------------------------------------------

    /// Returns the number of slots in the ring.
    pub fn ring_size(&self) -> u8 {
        self.top.ring_size()
    }

    /// Returns the number of undo steps the history was configured for.
    pub fn capacity(&self) -> u8 {
        self.ring_size().saturating_sub(RESERVED_SLOTS)
    }

    /// Returns the number of checkpoints between the oldest retained one and the redo horizon.
    pub fn len(&self) -> usize {
        let ring = i16::from(self.ring_size());
        (i16::from(self.last_push.get()) - i16::from(self.bottom.get())).rem_euclid(ring) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bottom == self.last_push
    }

    /// Returns true if there is an undone checkpoint which [History::unpop] can restore.
    pub fn can_redo(&self) -> bool {
        !self.no_redo && self.top != self.last_push
    }

    /// Returns true if [History::pop] can move to an older checkpoint.
    pub fn can_undo(&self) -> bool {
        self.top.offset(-1) != self.bottom
    }

    /// Returns the retained checkpoints from the oldest up to the redo horizon.
    pub fn checkpoints(&self) -> Vec<Checkpoint<'_>> {
        let mut checkpoints = Vec::with_capacity(self.len());
        let mut i = self.bottom;
        while i != self.last_push {
            let slot = i.advance();
            checkpoints.push(Checkpoint {
                state: &self.slots[slot.as_usize()],
                is_current: i == self.top,
            });
        }
        checkpoints
    }

    // STATE TRANSITIONS
    // --------------------------------------------------------------------------------------------

    /// Commits `state` as a new checkpoint, discarding everything that could have been redone and,
    /// if the ring is full, the oldest checkpoint.
    pub fn push(&mut self, state: &AccumulatorState) {
        if self.top.offset(1) == self.bottom {
            self.bottom.advance();
        }
        self.slots[self.top.as_usize()] = state.clone();
        self.top.advance();
        self.last_push = self.top;
        self.no_redo = true;
        log::trace!("history push: bottom={} top={}", self.bottom, self.top);
    }

    /// Steps back one checkpoint and returns the state the accumulator goes back to.
    pub fn pop(&mut self) -> Result<&AccumulatorState, HistoryError> {
        if !self.can_undo() {
            return Err(HistoryError::EmptyUndoHistory);
        }
        self.top.retreat();
        self.no_redo = false;
        log::debug!("undo: bottom={} top={} horizon={}", self.bottom, self.top, self.last_push);
        Ok(self.live())
    }

    /// Re-applies the most recently undone checkpoint and returns it.
    pub fn unpop(&mut self) -> Result<&AccumulatorState, HistoryError> {
        if !self.can_redo() {
            return Err(HistoryError::EmptyRedoHistory);
        }
        self.top.advance();
        log::debug!("redo: bottom={} top={} horizon={}", self.bottom, self.top, self.last_push);
        Ok(self.live())
    }

    /// Replaces the history with an empty one able to undo `capacity` steps, seeded with a single
    /// checkpoint of `current`.
    ///
    /// All prior checkpoints are discarded. The ring gets two more slots than `capacity`.
    pub fn resize(
        &mut self,
        capacity: u32,
        current: &AccumulatorState,
    ) -> Result<(), HistoryError> {
        if capacity < 1 {
            return Err(HistoryError::HistorySizeTooSmall(capacity));
        }
        if capacity > u32::from(MAX_CAPACITY) {
            return Err(HistoryError::HistorySizeTooLarge {
                requested: capacity,
                max: u32::from(MAX_CAPACITY),
            });
        }
        *self = Self::new(capacity as u8 + RESERVED_SLOTS, current);
        log::debug!("undo history resized to {capacity} steps");
        Ok(())
    }

    fn live(&self) -> &AccumulatorState {
        &self.slots[self.top.offset(-1).as_usize()]
    }
}

// TESTS
// ================================================================================================
