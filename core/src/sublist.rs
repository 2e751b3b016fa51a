//! Aliasing windows over a list.

use core::fmt;
use core::ops::Range;
use core::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crate::error::{Error, Result, check_range};
use crate::list::ArrayList;
use crate::sequence::{Backing, Sequence};
use crate::spliter::Spliter;
use crate::tracker::Watch;

/// A range-limited view that shares the root list's storage.
///
/// Reads and writes go straight to the root's buffer at `offset + index`, so
/// changes made through a window are visible through the root and every
/// overlapping window, and the other way around. Size changes made through a
/// window are propagated to all of its ancestors.
///
/// A window stays valid across appends at the root's end and across sorts.
/// Any other structural change that does not go through the window or one of
/// its descendants invalidates it: every later operation, reads included,
/// fails with [`Error::ConcurrentModification`].
///
/// ```
/// use seqlist_core::{ArrayList, Sequence};
///
/// let list: ArrayList<i32> = (1..=10).collect();
/// let window = list.sub_list(2, 5).unwrap();
/// assert_eq!(window.to_vec().unwrap(), vec![3, 4, 5]);
///
/// window.set(0, 30).unwrap();
/// assert_eq!(list.get(2).unwrap(), 30);
///
/// window.clear().unwrap();
/// assert_eq!(list.len(), 7);
/// ```
pub struct SubList<'a, T> {
    root: &'a ArrayList<T>,
    parent: Option<&'a SubList<'a, T>>,
    offset: usize,
    size: AtomicUsize,
    /// Layout version this window last synchronized with.
    observed: AtomicU64,
}

impl<'a, T> SubList<'a, T> {
    pub(crate) fn new(
        root: &'a ArrayList<T>,
        parent: Option<&'a SubList<'a, T>>,
        offset: usize,
        size: usize,
    ) -> Self {
        Self {
            root,
            parent,
            offset,
            size: AtomicUsize::new(size),
            observed: AtomicU64::new(root.tracker().layout()),
        }
    }

    /// Index of the window's first element in the root list.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The root list this window views.
    pub fn list(&self) -> &'a ArrayList<T> {
        self.root
    }

    /// Whether the window can still be used.
    pub fn is_valid(&self) -> bool {
        self.span().is_ok()
    }
}

impl<T> Backing<T> for SubList<'_, T> {
    fn root(&self) -> &ArrayList<T> {
        self.root
    }

    fn span(&self) -> Result<Range<usize>> {
        self.root
            .tracker()
            .ensure(Watch::Layout, self.observed.load(Ordering::Acquire))?;
        let end = self.offset + self.size.load(Ordering::Acquire);
        if end > self.root.len() {
            return Err(Error::ConcurrentModification);
        }
        Ok(self.offset..end)
    }

    fn visible_len(&self) -> usize {
        self.size.load(Ordering::Acquire)
    }

    fn watch(&self) -> Watch {
        Watch::Layout
    }

    fn resync(&self, delta: isize) {
        let version = self.root.tracker().layout();
        let mut current = Some(self);
        while let Some(window) = current {
            let size = window.size.load(Ordering::Acquire);
            window
                .size
                .store(size.saturating_add_signed(delta), Ordering::Release);
            window.observed.store(version, Ordering::Release);
            current = window.parent;
        }
    }
}

impl<T> Sequence<T> for SubList<'_, T> {
    fn sub_list(&self, from: usize, to: usize) -> Result<SubList<'_, T>> {
        let span = self.span()?;
        check_range(from, to, span.len())?;
        Ok(SubList::new(self.root, Some(self), span.start + from, to - from))
    }

    /// Like the root's, the cursor takes the window's size and version on
    /// first use, so changes made through the window before then are seen.
    fn spliter(&self) -> Result<Spliter<'_, T>> {
        self.span()?;
        Ok(Spliter::over_window(
            self.root,
            self.offset,
            &self.size,
            &self.observed,
        ))
    }
}

impl<T: fmt::Debug> fmt::Debug for SubList<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Ok(span) = self.span() else {
            return f.write_str("SubList { <invalid> }");
        };
        match self.root.peek() {
            Some(buffer) => match buffer.items.get(span) {
                Some(items) => f.debug_list().entries(items).finish(),
                None => f.write_str("SubList { <invalid> }"),
            },
            None => f.write_str("SubList { <locked> }"),
        }
    }
}

#[cfg(test)]
#[path = "sublist_test.rs"]
mod sublist_test;
