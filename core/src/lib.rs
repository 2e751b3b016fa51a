//! Core of seqlist: a growable random-access list with aliasing windows,
//! fail-fast cursors and splittable cursors for parallel traversal.
//!
//! The root [`ArrayList`] owns the elements. [`SubList`] windows, [`Cursor`]s
//! and [`Spliter`]s borrow it and check a shared [`ModTracker`] before
//! touching the buffer, so that a traversal notices when the list was changed
//! underneath it. Detection is best effort; the list is not a concurrent
//! collection.
//!
//! Every list and window operation lives on the [`Sequence`] trait.
#![deny(unsafe_code)]

mod batch;
pub mod cursor;
pub mod error;
pub mod growth;
pub mod list;
mod persist;
pub mod sequence;
pub mod spliter;
pub mod sublist;
pub mod tracker;

pub use cursor::Cursor;
pub use error::{Error, FaultKind, Result};
pub use growth::{DEFAULT_CAPACITY, GrowthPolicy};
pub use list::ArrayList;
pub use sequence::{Matching, Membership, Sequence};
pub use spliter::{Characteristics, Spliter};
pub use sublist::SubList;
pub use tracker::{Change, ModTracker, Watch};
