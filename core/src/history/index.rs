use core::fmt;

/// The largest ring size a history can be configured with.
pub const MAX_RING_SIZE: u8 = u8::MAX;

/// The smallest ring size which still leaves room for one undo step.
pub const MIN_RING_SIZE: u8 = 3;

/// A position in a history ring of fixed size.
///
/// The ring size is carried by every index, so all arithmetic wraps modulo the size of the ring
/// the index was created for. Equality compares raw positions only.
#[derive(Clone, Copy)]
pub struct HistoryIndex {
    pos: u8,
    ring_size: u8,
}

impl HistoryIndex {
    /// Creates an index for a ring of `ring_size` slots from a signed offset, normalizing it into
    /// `0..ring_size`.
    ///
    /// # Panics
    /// Panics if `ring_size` is zero.
    pub fn new(offset: i16, ring_size: u8) -> Self {
        assert!(ring_size > 0, "history ring must have at least one slot");
        Self {
            pos: offset.rem_euclid(i16::from(ring_size)) as u8,
            ring_size,
        }
    }

    /// Returns the raw position of this index.
    #[inline]
    pub fn get(self) -> u8 {
        self.pos
    }

    #[inline]
    pub fn as_usize(self) -> usize {
        self.pos as usize
    }

    /// Returns the number of slots of the ring this index belongs to.
    #[inline]
    pub fn ring_size(self) -> u8 {
        self.ring_size
    }

    /// Returns this index moved by `n` positions, wrapping around the ring.
    pub fn offset(self, n: i16) -> Self {
        Self::new(i16::from(self.pos) + n, self.ring_size)
    }

    /// Moves this index one position forward and returns the position it held before.
    pub fn advance(&mut self) -> Self {
        let prior = *self;
        *self = self.offset(1);
        prior
    }

    /// Moves this index one position backward and returns the position it held before.
    pub fn retreat(&mut self) -> Self {
        let prior = *self;
        *self = self.offset(-1);
        prior
    }
}

impl PartialEq for HistoryIndex {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos
    }
}

impl Eq for HistoryIndex {}

impl fmt::Debug for HistoryIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HistoryIndex({}/{})", self.pos, self.ring_size)
    }
}

impl fmt::Display for HistoryIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pos)
    }
}
