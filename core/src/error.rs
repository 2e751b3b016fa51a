//! Error types for list operations.
//!
//! Every fault is raised synchronously at the point of detection. A search
//! that finds nothing is not an error: it returns `None`.

use thiserror::Error;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    /// An index or range outside the current bounds. Recoverable by retrying
    /// with a corrected index.
    Range,
    /// A capacity request the allocator cannot satisfy.
    Capacity,
    /// A structural change inconsistent with an earlier snapshot.
    Concurrency,
    /// A cursor used in a state that does not permit the operation.
    State,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("range {from}..{to} out of bounds for length {len}")]
    RangeOutOfBounds { from: usize, to: usize, len: usize },

    #[error("range start {from} is greater than range end {to}")]
    InvertedRange { from: usize, to: usize },

    #[error("capacity overflow: cannot hold {requested} elements")]
    CapacityOverflow { requested: usize },

    #[error("concurrent modification detected")]
    ConcurrentModification,

    #[error("no element left to visit")]
    NoSuchElement,

    #[error("cursor has no current element")]
    NoCurrentElement,
}

impl Error {
    pub fn kind(&self) -> FaultKind {
        match self {
            Error::IndexOutOfBounds { .. }
            | Error::RangeOutOfBounds { .. }
            | Error::InvertedRange { .. } => FaultKind::Range,
            Error::CapacityOverflow { .. } => FaultKind::Capacity,
            Error::ConcurrentModification => FaultKind::Concurrency,
            Error::NoSuchElement | Error::NoCurrentElement => FaultKind::State,
        }
    }

    /// Whether this error reports interference with a traversal or window.
    pub fn is_concurrent_modification(&self) -> bool {
        self.kind() == FaultKind::Concurrency
    }
}

/// Checks `index < len`.
pub(crate) fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(Error::IndexOutOfBounds { index, len })
    }
}

/// Checks `index <= len`, the bound for insertion points.
pub(crate) fn check_position(index: usize, len: usize) -> Result<()> {
    if index <= len {
        Ok(())
    } else {
        Err(Error::IndexOutOfBounds { index, len })
    }
}

/// Checks `from <= to <= len`.
pub(crate) fn check_range(from: usize, to: usize, len: usize) -> Result<()> {
    if from > to {
        Err(Error::InvertedRange { from, to })
    } else if to > len {
        Err(Error::RangeOutOfBounds { from, to, len })
    } else {
        Ok(())
    }
}
