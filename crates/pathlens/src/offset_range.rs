//
// offset_range.rs
//
// Half-open [start, end_exclusive) byte ranges over a single source text.
//

/// A half-open byte range within one source text.
///
/// Immutable value type; every operation returns a new range. Callers are
/// responsible for keeping bounds within the text they index into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetRange {
    pub start: usize,
    pub end_exclusive: usize,
}

impl OffsetRange {
    pub fn new(start: usize, end_exclusive: usize) -> Self {
        debug_assert!(start <= end_exclusive, "range bounds out of order");
        Self {
            start,
            end_exclusive,
        }
    }

    /// Range [0, len) at the origin.
    pub fn of_length(len: usize) -> Self {
        Self::new(0, len)
    }

    /// Zero-length range at `pos`.
    pub fn empty_at(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    pub fn len(&self) -> usize {
        self.end_exclusive - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end_exclusive
    }

    /// True iff `start <= pos < end_exclusive`.
    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end_exclusive
    }

    /// Shift both bounds by `amount`.
    pub fn delta(&self, amount: isize) -> Self {
        Self::new(
            self.start.saturating_add_signed(amount),
            self.end_exclusive.saturating_add_signed(amount),
        )
    }

    /// Extend (or shrink) only the end bound by `amount`.
    pub fn delta_end(&self, amount: isize) -> Self {
        Self::new(self.start, self.end_exclusive.saturating_add_signed(amount))
    }

    /// Smallest range covering both `self` and `other`.
    pub fn join(&self, other: Self) -> Self {
        Self::new(
            self.start.min(other.start),
            self.end_exclusive.max(other.end_exclusive),
        )
    }

    /// Map both bounds through `f`. The mapping must preserve bound order.
    pub fn map_bounds(&self, f: impl Fn(usize) -> usize) -> Self {
        Self::new(f(self.start), f(self.end_exclusive))
    }

    /// Wire form: `[start, endExclusive]`.
    pub fn to_pair(&self) -> [usize; 2] {
        [self.start, self.end_exclusive]
    }
}
