//! Structural version counters for fail-fast detection.
//!
//! The tracker is owned by the root list and reached by reference from every
//! window, cursor and spliter derived from it. The counters are diagnostics:
//! they catch most interference, not all of it. Code that shares a list
//! between threads still needs external synchronization.

use core::sync::atomic::{AtomicU64, Ordering};

use crate::error::Error;

/// The kind of structural change a mutation made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// Slots were appended past the previous end; existing slots kept their
    /// positions.
    Grow,
    /// Existing slots were permuted in place; the length is unchanged.
    Reorder,
    /// Slots were inserted before the end, or removed.
    Shift,
}

/// Which counter a traversal validates against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Watch {
    /// Every structural change.
    Structure,
    /// Only changes that move or remove existing slots ([`Change::Shift`]).
    Layout,
}

#[derive(Debug, Default)]
pub struct ModTracker {
    structure: AtomicU64,
    layout: AtomicU64,
}

impl ModTracker {
    pub const fn new() -> Self {
        Self {
            structure: AtomicU64::new(0),
            layout: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn current(&self, watch: Watch) -> u64 {
        match watch {
            Watch::Structure => self.structure.load(Ordering::Acquire),
            Watch::Layout => self.layout.load(Ordering::Acquire),
        }
    }

    pub fn structure(&self) -> u64 {
        self.current(Watch::Structure)
    }

    pub fn layout(&self) -> u64 {
        self.current(Watch::Layout)
    }

    pub fn record(&self, change: Change) {
        self.structure.fetch_add(1, Ordering::AcqRel);
        if change == Change::Shift {
            self.layout.fetch_add(1, Ordering::AcqRel);
        }
    }

    /// Fails with [`Error::ConcurrentModification`] unless the watched
    /// counter still equals `expected`.
    #[inline]
    pub fn ensure(&self, watch: Watch, expected: u64) -> Result<(), Error> {
        if self.current(watch) == expected {
            Ok(())
        } else {
            Err(Error::ConcurrentModification)
        }
    }

    /// Flags a write that collided with an operation already holding the
    /// buffer. Both counters move, so the holder notices as well.
    pub(crate) fn interfere(&self) -> Error {
        tracing::debug!("write collided with an in-progress operation");
        self.record(Change::Shift);
        Error::ConcurrentModification
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grow_leaves_layout() {
        let tracker = ModTracker::new();
        tracker.record(Change::Grow);
        tracker.record(Change::Reorder);
        assert_eq!(tracker.structure(), 2);
        assert_eq!(tracker.layout(), 0);
    }

    #[test]
    fn test_shift_moves_both() {
        let tracker = ModTracker::new();
        tracker.record(Change::Shift);
        assert_eq!(tracker.structure(), 1);
        assert_eq!(tracker.layout(), 1);
    }

    #[test]
    fn test_ensure() {
        let tracker = ModTracker::new();
        let seen = tracker.current(Watch::Layout);
        tracker.record(Change::Grow);
        assert_eq!(tracker.ensure(Watch::Layout, seen), Ok(()));
        assert_eq!(
            tracker.ensure(Watch::Structure, 0),
            Err(Error::ConcurrentModification)
        );
    }

    #[test]
    fn test_interference_moves_both() {
        let tracker = ModTracker::new();
        assert_eq!(tracker.interfere(), Error::ConcurrentModification);
        assert_eq!(tracker.structure(), 1);
        assert_eq!(tracker.layout(), 1);
    }
}
