//! seqlist - A growable list with aliasing windows and fail-fast traversal
//!
//! # Overview
//!
//! [`ArrayList`] is a random-access list backed by one contiguous buffer.
//! On top of plain indexed access it offers:
//!
//! - Windows ([`SubList`]) that view a range of the list without copying it
//! - Cursors ([`Cursor`]) that fail as soon as the list changes behind them
//! - Splittable cursors ([`Spliter`]) for divide-and-conquer traversal
//! - Bulk filtering, mapping and sorting in place
//!
//! # Quick Start
//!
//! ```
//! use seqlist::{ArrayList, Sequence};
//!
//! let list = ArrayList::new();
//! for i in 1..=10 {
//!     list.push(i).unwrap();
//! }
//!
//! // A window shares the list's storage
//! let window = list.sub_list(2, 5).unwrap();
//! assert_eq!(window.to_vec().unwrap(), vec![3, 4, 5]);
//! window.replace_all(|x| x * 100).unwrap();
//! assert_eq!(list.get(3).unwrap(), 400);
//!
//! // Appending to the list leaves the window usable
//! list.push(11).unwrap();
//! assert_eq!(window.size().unwrap(), 3);
//!
//! // Removing from the list invalidates it
//! list.remove(0).unwrap();
//! assert!(window.get(0).unwrap_err().is_concurrent_modification());
//! ```
//!
//! # Thread Safety
//!
//! Every operation takes `&self` and never blocks. Overlapping operations are
//! reported as [`Error::ConcurrentModification`] on a best-effort basis; the
//! list is not a concurrent collection. Read-only parallel traversal is
//! supported through [`ArrayList::par_for_each`] and [`Spliter`].

// Re-export the public API from seqlist_core
pub use seqlist_core::{
    ArrayList, Characteristics, Cursor, DEFAULT_CAPACITY, Error, FaultKind, GrowthPolicy,
    Matching, Membership, Result, Sequence, Spliter, SubList,
};

// Version tracking, for callers that validate their own snapshots
pub use seqlist_core::tracker::{self, Change, ModTracker, Watch};
