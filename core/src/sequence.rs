//! The capability set shared by the root list and its windows.
//!
//! [`Sequence`] is implemented by [`ArrayList`] (owning) and [`SubList`]
//! (delegating with an offset). Both address the root's buffer by absolute
//! index ranges; a window only adds its offset, its version check and the
//! size bookkeeping along its parent chain.

use core::cmp::Ordering;
use core::hash::{BuildHasher, Hash, Hasher};
use core::ops::Range;
use std::collections::{BTreeSet, HashSet};

use crate::cursor::Cursor;
use crate::error::{Result, check_index, check_position, check_range};
use crate::list::ArrayList;
use crate::spliter::Spliter;
use crate::sublist::SubList;
use crate::tracker::Watch;

mod private {
    use super::*;

    /// Addressing plumbing behind [`Sequence`]. Sealed.
    pub trait Backing<T> {
        /// The list owning the buffer.
        fn root(&self) -> &ArrayList<T>;

        /// The visible range as absolute indices into the root's buffer,
        /// after checking that this view is still valid.
        fn span(&self) -> Result<Range<usize>>;

        /// The visible length, without validation.
        fn visible_len(&self) -> usize;

        /// Which version counter this view validates against.
        fn watch(&self) -> Watch;

        /// Records a size change made through this view.
        fn resync(&self, delta: isize);

        fn version(&self) -> u64 {
            self.root().tracker().current(self.watch())
        }
    }
}

pub(crate) use private::Backing;

/// Operations available on a list and on any window over it.
///
/// Indices are relative to the receiver: index 0 of a window is the first
/// element the window shows. All methods take `&self`; mutations through a
/// window are immediately visible through the root and every overlapping
/// window.
pub trait Sequence<T>: private::Backing<T> {
    /// Creates a window over `from..to` that shares this sequence's storage.
    ///
    /// # Errors
    ///
    /// Range errors when `from > to` or `to` exceeds the length.
    fn sub_list(&self, from: usize, to: usize) -> Result<SubList<'_, T>>;

    /// Creates a splittable cursor over the whole sequence.
    fn spliter(&self) -> Result<Spliter<'_, T>>;

    fn size(&self) -> Result<usize> {
        Ok(self.span()?.len())
    }

    fn get(&self, index: usize) -> Result<T>
    where
        T: Clone,
    {
        let span = self.span()?;
        check_index(index, span.len())?;
        self.root().get_at(span.start + index)
    }

    /// Replaces the element at `index`, returning the previous one.
    fn set(&self, index: usize, value: T) -> Result<T> {
        let span = self.span()?;
        check_index(index, span.len())?;
        self.root().set_at(span.start + index, value)
    }

    fn push(&self, value: T) -> Result<()> {
        let span = self.span()?;
        self.root().insert_at(span.end, value)?;
        self.resync(1);
        Ok(())
    }

    /// Inserts `value` before `index`, shifting later elements right.
    fn insert(&self, index: usize, value: T) -> Result<()> {
        let span = self.span()?;
        check_position(index, span.len())?;
        self.root().insert_at(span.start + index, value)?;
        self.resync(1);
        Ok(())
    }

    /// Removes the element at `index`, shifting later elements left.
    fn remove(&self, index: usize) -> Result<T> {
        let span = self.span()?;
        check_index(index, span.len())?;
        let removed = self.root().remove_at(span.start + index)?;
        self.resync(-1);
        Ok(removed)
    }

    fn remove_range(&self, from: usize, to: usize) -> Result<()> {
        let span = self.span()?;
        check_range(from, to, span.len())?;
        let removed = self
            .root()
            .remove_span(span.start + from, span.start + to)?;
        if removed > 0 {
            self.resync(-(removed as isize));
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let len = self.size()?;
        self.remove_range(0, len)
    }

    /// Appends every item, in order. Returns whether anything was added.
    fn add_all<I>(&self, items: I) -> Result<bool>
    where
        I: IntoIterator<Item = T>,
    {
        let items: Vec<T> = items.into_iter().collect();
        let len = self.size()?;
        self.insert_all(len, items)
    }

    /// Inserts every item before `index`, in order.
    fn insert_all<I>(&self, index: usize, items: I) -> Result<bool>
    where
        I: IntoIterator<Item = T>,
    {
        let items: Vec<T> = items.into_iter().collect();
        let span = self.span()?;
        check_position(index, span.len())?;
        let added = self.root().insert_all_at(span.start + index, items)?;
        if added > 0 {
            self.resync(added as isize);
        }
        Ok(added > 0)
    }

    /// Position of the first element equal to `value`.
    fn index_of(&self, value: &T) -> Result<Option<usize>>
    where
        T: PartialEq,
    {
        let span = self.span()?;
        let found = self.root().index_of_range(value, span.start, span.end)?;
        Ok(found.map(|i| i - span.start))
    }

    /// Position of the last element equal to `value`.
    fn last_index_of(&self, value: &T) -> Result<Option<usize>>
    where
        T: PartialEq,
    {
        let span = self.span()?;
        let found = self
            .root()
            .last_index_of_range(value, span.start, span.end)?;
        Ok(found.map(|i| i - span.start))
    }

    fn contains(&self, value: &T) -> Result<bool>
    where
        T: PartialEq,
    {
        Ok(self.index_of(value)?.is_some())
    }

    /// Removes the first element equal to `value`, if any.
    fn remove_item(&self, value: &T) -> Result<bool>
    where
        T: PartialEq,
    {
        match self.index_of(value)? {
            Some(index) => {
                self.remove(index)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Removes every element matching `filter`.
    ///
    /// The filter may read the list but must not modify it; a modification
    /// attempt fails inside the filter and makes this call fail with
    /// [`Error::ConcurrentModification`](crate::Error::ConcurrentModification),
    /// leaving the list untouched.
    fn remove_if<F>(&self, filter: F) -> Result<bool>
    where
        F: FnMut(&T) -> bool,
    {
        let span = self.span()?;
        let removed = self.root().remove_if_range(filter, span.start, span.end)?;
        if removed > 0 {
            self.resync(-(removed as isize));
        }
        Ok(removed > 0)
    }

    /// Removes every element `other` contains.
    ///
    /// If the membership test panics, elements not yet examined are kept and
    /// the list stays well formed while the panic unwinds. Reads of this list
    /// from the membership test are refused with
    /// [`Error::ConcurrentModification`](crate::Error::ConcurrentModification)
    /// but do not count as a change; an attempted modification makes the call
    /// fail once the pass is over.
    fn remove_all<M>(&self, other: &M) -> Result<bool>
    where
        M: Membership<T> + ?Sized,
    {
        let span = self.span()?;
        let removed = self
            .root()
            .batch_remove_range(other, false, span.start, span.end)?;
        if removed > 0 {
            self.resync(-(removed as isize));
        }
        Ok(removed > 0)
    }

    /// Keeps only the elements `other` contains.
    fn retain_all<M>(&self, other: &M) -> Result<bool>
    where
        M: Membership<T> + ?Sized,
    {
        let span = self.span()?;
        let removed = self
            .root()
            .batch_remove_range(other, true, span.start, span.end)?;
        if removed > 0 {
            self.resync(-(removed as isize));
        }
        Ok(removed > 0)
    }

    /// Replaces each element with `operator` applied to it, in index order.
    fn replace_all<F>(&self, operator: F) -> Result<()>
    where
        F: FnMut(&T) -> T,
    {
        let span = self.span()?;
        self.root().replace_range(operator, span.start, span.end)
    }

    /// Stable in-place sort.
    ///
    /// The list is held exclusively while sorting, so reads from the
    /// comparator are refused without affecting the sort or any window. If
    /// the comparator tries to modify the list, the sort still completes and
    /// then fails with
    /// [`Error::ConcurrentModification`](crate::Error::ConcurrentModification).
    fn sort_by<F>(&self, compare: F) -> Result<()>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let span = self.span()?;
        self.root().sort_range(compare, span.start, span.end)
    }

    fn sort(&self) -> Result<()>
    where
        T: Ord,
    {
        self.sort_by(T::cmp)
    }

    fn for_each<F>(&self, action: F) -> Result<()>
    where
        F: FnMut(&T),
    {
        let span = self.span()?;
        self.root()
            .for_each_range(span.start, span.end, self.watch(), action)
    }

    /// Exact-length snapshot of the visible elements.
    fn to_vec(&self) -> Result<Vec<T>>
    where
        T: Clone,
    {
        let span = self.span()?;
        self.root().clone_range(span.start, span.end)
    }

    /// Copies the elements into `buffer` if it has at least `size()` slots,
    /// setting the slot right after the data to `None`. A buffer that is too
    /// small is dropped and a fresh one returned.
    fn to_array_in(&self, buffer: Vec<Option<T>>) -> Result<Vec<Option<T>>>
    where
        T: Clone,
    {
        let span = self.span()?;
        self.root().copy_range_into(buffer, span.start, span.end)
    }

    /// Element-wise equality of the visible ranges.
    fn content_eq<S>(&self, other: &S) -> Result<bool>
    where
        S: Sequence<T> + ?Sized,
        T: PartialEq,
    {
        let mine = self.span()?;
        let theirs = other.span()?;
        if mine.len() != theirs.len() {
            return Ok(false);
        }
        let left = self.root().read()?;
        let right = other.root().read()?;
        match (left.items.get(mine), right.items.get(theirs)) {
            (Some(a), Some(b)) => Ok(a == b),
            _ => Err(crate::Error::ConcurrentModification),
        }
    }

    /// Feeds the visible elements to `state`, hashing like a slice of the
    /// same contents.
    fn content_hash<H>(&self, state: &mut H) -> Result<()>
    where
        H: Hasher,
        T: Hash,
    {
        let span = self.span()?;
        let buffer = self.root().read()?;
        let items = buffer
            .items
            .get(span)
            .ok_or(crate::Error::ConcurrentModification)?;
        items.hash(state);
        Ok(())
    }

    /// A fail-fast cursor positioned before the first element.
    fn cursor(&self) -> Cursor<'_, T, Self>
    where
        Self: Sized,
    {
        Cursor::new(self, 0)
    }

    /// A fail-fast cursor positioned before `index`.
    fn cursor_at(&self, index: usize) -> Result<Cursor<'_, T, Self>>
    where
        Self: Sized,
    {
        let span = self.span()?;
        check_position(index, span.len())?;
        Ok(Cursor::new(self, index))
    }
}

// --- The root list ---

impl<T> Backing<T> for ArrayList<T> {
    fn root(&self) -> &ArrayList<T> {
        self
    }

    fn span(&self) -> Result<Range<usize>> {
        Ok(0..self.len())
    }

    fn visible_len(&self) -> usize {
        self.len()
    }

    fn watch(&self) -> Watch {
        Watch::Structure
    }

    fn resync(&self, _delta: isize) {}
}

impl<T> Sequence<T> for ArrayList<T> {
    fn sub_list(&self, from: usize, to: usize) -> Result<SubList<'_, T>> {
        check_range(from, to, self.len())?;
        Ok(SubList::new(self, None, from, to - from))
    }

    /// The cursor binds to the list's length lazily, on first use.
    fn spliter(&self) -> Result<Spliter<'_, T>> {
        Ok(Spliter::new(self))
    }
}

// --- Membership ---

/// Containment test used by [`Sequence::remove_all`] and
/// [`Sequence::retain_all`].
pub trait Membership<T: ?Sized> {
    fn contains(&self, item: &T) -> bool;
}

impl<T: PartialEq> Membership<T> for [T] {
    fn contains(&self, item: &T) -> bool {
        <[T]>::contains(self, item)
    }
}

impl<T: PartialEq, const N: usize> Membership<T> for [T; N] {
    fn contains(&self, item: &T) -> bool {
        self.as_slice().contains(item)
    }
}

impl<T: PartialEq> Membership<T> for Vec<T> {
    fn contains(&self, item: &T) -> bool {
        self.as_slice().contains(item)
    }
}

impl<T: Eq + Hash, S: BuildHasher> Membership<T> for HashSet<T, S> {
    fn contains(&self, item: &T) -> bool {
        HashSet::contains(self, item)
    }
}

impl<T: Ord> Membership<T> for BTreeSet<T> {
    fn contains(&self, item: &T) -> bool {
        BTreeSet::contains(self, item)
    }
}

/// Adapts a predicate into a [`Membership`] test.
///
/// ```
/// use seqlist_core::{ArrayList, Matching, Sequence};
///
/// let list: ArrayList<i32> = (1..=6).collect();
/// list.retain_all(&Matching(|x: &i32| *x > 3)).unwrap();
/// assert_eq!(list.to_vec().unwrap(), vec![4, 5, 6]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Matching<F>(pub F);

impl<T, F> Membership<T> for Matching<F>
where
    F: Fn(&T) -> bool,
{
    fn contains(&self, item: &T) -> bool {
        (self.0)(item)
    }
}
