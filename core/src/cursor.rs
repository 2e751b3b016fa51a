//! Fail-fast bidirectional cursors.

use core::iter::FusedIterator;
use core::marker::PhantomData;

use crate::error::{Error, FaultKind, Result};
use crate::list::ArrayList;
use crate::sequence::Sequence;

/// A stateful cursor over a list or a window.
///
/// The cursor sits between two elements. It remembers the structural version
/// of its sequence when created and fails with
/// [`Error::ConcurrentModification`] once the sequence has been changed by
/// anything other than the cursor itself.
///
/// As an [`Iterator`] it yields `Result<T>` and stops after the first error.
///
/// ```
/// use seqlist_core::{ArrayList, Sequence};
///
/// let list: ArrayList<i32> = (1..=6).collect();
/// let mut cursor = list.cursor();
/// while cursor.has_next() {
///     if cursor.try_next().unwrap() % 3 == 0 {
///         cursor.remove().unwrap();
///     }
/// }
/// assert_eq!(list.to_vec().unwrap(), vec![1, 2, 4, 5]);
/// ```
pub struct Cursor<'a, T, S = ArrayList<T>> {
    seq: &'a S,
    position: usize,
    /// Index returned by the latest `try_next`/`try_previous`, cleared by
    /// `remove` and `add`.
    last: Option<usize>,
    expected: u64,
    fused: bool,
    _marker: PhantomData<fn() -> T>,
}

/// Range faults raised while the cursor believed its index valid mean the
/// sequence changed underneath it.
fn conflict(error: Error) -> Error {
    if error.kind() == FaultKind::Range {
        Error::ConcurrentModification
    } else {
        error
    }
}

impl<'a, T, S: Sequence<T>> Cursor<'a, T, S> {
    pub(crate) fn new(seq: &'a S, position: usize) -> Self {
        Self {
            seq,
            position,
            last: None,
            expected: seq.version(),
            fused: false,
            _marker: PhantomData,
        }
    }

    fn check(&self) -> Result<()> {
        self.seq
            .root()
            .tracker()
            .ensure(self.seq.watch(), self.expected)
    }

    pub fn has_next(&self) -> bool {
        self.position != self.seq.visible_len()
    }

    pub fn has_previous(&self) -> bool {
        self.position != 0
    }

    /// Index of the element `try_next` would return.
    pub fn next_index(&self) -> usize {
        self.position
    }

    /// Index of the element `try_previous` would return, if any.
    pub fn previous_index(&self) -> Option<usize> {
        self.position.checked_sub(1)
    }

    /// Returns the next element and advances.
    ///
    /// # Errors
    ///
    /// [`Error::NoSuchElement`] at the end, [`Error::ConcurrentModification`]
    /// if the sequence was changed behind the cursor.
    pub fn try_next(&mut self) -> Result<T>
    where
        T: Clone,
    {
        self.check()?;
        let span = self.seq.span()?;
        let index = self.position;
        if index >= span.len() {
            return Err(Error::NoSuchElement);
        }
        let item = self.seq.root().get_at(span.start + index).map_err(conflict)?;
        self.position = index + 1;
        self.last = Some(index);
        Ok(item)
    }

    /// Returns the previous element and moves back.
    pub fn try_previous(&mut self) -> Result<T>
    where
        T: Clone,
    {
        self.check()?;
        let span = self.seq.span()?;
        let index = self.position.checked_sub(1).ok_or(Error::NoSuchElement)?;
        if index >= span.len() {
            return Err(Error::ConcurrentModification);
        }
        let item = self.seq.root().get_at(span.start + index).map_err(conflict)?;
        self.position = index;
        self.last = Some(index);
        Ok(item)
    }

    /// Removes the element last returned by `try_next` or `try_previous`.
    ///
    /// # Errors
    ///
    /// [`Error::NoCurrentElement`] if there is no such element, or it was
    /// already removed, or `add` was called since.
    pub fn remove(&mut self) -> Result<T> {
        let last = self.last.ok_or(Error::NoCurrentElement)?;
        self.check()?;
        let removed = self.seq.remove(last).map_err(conflict)?;
        self.position = last;
        self.last = None;
        self.expected = self.seq.version();
        Ok(removed)
    }

    /// Overwrites the element last returned, returning the old value.
    pub fn set(&mut self, value: T) -> Result<T> {
        let last = self.last.ok_or(Error::NoCurrentElement)?;
        self.check()?;
        self.seq.set(last, value).map_err(conflict)
    }

    /// Inserts `value` before the cursor. A following `try_next` is
    /// unaffected; `try_previous` would return the new element.
    pub fn add(&mut self, value: T) -> Result<()> {
        self.check()?;
        self.seq.insert(self.position, value).map_err(conflict)?;
        self.position += 1;
        self.last = None;
        self.expected = self.seq.version();
        Ok(())
    }

    /// Visits the remaining elements in order, leaving the cursor at the end.
    pub fn for_each_remaining<F>(&mut self, mut action: F) -> Result<()>
    where
        F: FnMut(&T),
    {
        self.check()?;
        let span = self.seq.span()?;
        if self.position >= span.len() {
            return Ok(());
        }
        let from = span.start + self.position;
        let mut visited = 0;
        let outcome = self
            .seq
            .root()
            .for_each_range(from, span.end, self.seq.watch(), |item| {
                action(item);
                visited += 1;
            });
        if visited > 0 {
            self.position += visited;
            self.last = Some(self.position - 1);
        }
        outcome
    }
}

impl<T: Clone, S: Sequence<T>> Iterator for Cursor<'_, T, S> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.fused {
            return None;
        }
        if !self.has_next() {
            self.fused = true;
            return None;
        }
        let item = self.try_next();
        self.fused = item.is_err();
        Some(item)
    }
}

impl<T: Clone, S: Sequence<T>> FusedIterator for Cursor<'_, T, S> {}

#[cfg(test)]
#[path = "cursor_test.rs"]
mod cursor_test;
