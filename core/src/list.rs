//! The root list: an owning, growable buffer.
//!
//! `ArrayList` owns its elements and the structural version tracker. Every
//! window, cursor and spliter derived from it borrows the list and reaches the
//! buffer through the bounds- and version-checked accessors defined here.
//!
//! All operations take `&self`. The buffer sits behind a lock that is only
//! ever acquired with non-blocking `try_*` calls: an acquisition that fails
//! means some other operation is in progress on the same list (a callback
//! reentering a batch algorithm, or another thread), and is reported as
//! [`Error::ConcurrentModification`]. A refused write is recorded as a
//! structural change so the operation holding the buffer fails too. A refused
//! read changes nothing.

use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{Error, Result, check_index, check_position, check_range};
use crate::growth::GrowthPolicy;
use crate::tracker::{Change, ModTracker, Watch};

pub(crate) struct Buffer<T> {
    pub(crate) items: Vec<T>,
    /// Set while the list is still in the shared empty state handed out by
    /// `new`. The first allocation clears it.
    pub(crate) deferred: bool,
}

impl<T> Buffer<T> {
    /// Makes room for `additional` more elements, following `policy`.
    pub(crate) fn reserve_for(&mut self, policy: &GrowthPolicy, additional: usize) -> Result<()> {
        let min = self
            .items
            .len()
            .checked_add(additional)
            .ok_or(Error::CapacityOverflow {
                requested: usize::MAX,
            })?;
        let current = self.items.capacity();
        if min <= current {
            return Ok(());
        }
        let target = policy.next_capacity(current, min, self.deferred, max_len::<T>())?;
        self.reallocate(target)
    }

    fn reallocate(&mut self, target: usize) -> Result<()> {
        tracing::trace!(
            from = self.items.capacity(),
            to = target,
            "reallocating list buffer"
        );
        self.items
            .try_reserve_exact(target - self.items.len())
            .map_err(|_| Error::CapacityOverflow { requested: target })?;
        self.deferred = false;
        Ok(())
    }
}

/// Largest element count a `Vec<T>` can address.
fn max_len<T>() -> usize {
    isize::MAX as usize / core::mem::size_of::<T>().max(1)
}

/// A resizable random-access list.
///
/// # Example
///
/// ```
/// use seqlist_core::{ArrayList, Sequence};
///
/// let list = ArrayList::new();
/// for i in 1..=5 {
///     list.push(i).unwrap();
/// }
/// list.remove_if(|x| x % 2 == 0).unwrap();
/// assert_eq!(list.to_vec().unwrap(), vec![1, 3, 5]);
/// ```
pub struct ArrayList<T> {
    buffer: RwLock<Buffer<T>>,
    // Mirrors of the buffer's length and capacity, updated while the buffer
    // is write-locked, so that reading them never fails.
    len: AtomicUsize,
    capacity: AtomicUsize,
    tracker: ModTracker,
    policy: GrowthPolicy,
}

impl<T> ArrayList<T> {
    /// Creates an empty list. Nothing is allocated until the first element
    /// arrives, which allocates the policy's default capacity.
    pub fn new() -> Self {
        Self::with_policy(GrowthPolicy::default())
    }

    pub fn with_policy(policy: GrowthPolicy) -> Self {
        Self::from_parts(Vec::new(), true, policy)
    }

    /// Creates an empty list able to hold `capacity` elements without
    /// reallocating.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityOverflow`] if the allocation cannot be made.
    /// No list is created in that case.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut items = Vec::new();
        items
            .try_reserve_exact(capacity)
            .map_err(|_| Error::CapacityOverflow {
                requested: capacity,
            })?;
        Ok(Self::from_parts(items, false, GrowthPolicy::default()))
    }

    fn from_parts(items: Vec<T>, deferred: bool, policy: GrowthPolicy) -> Self {
        Self {
            len: AtomicUsize::new(items.len()),
            capacity: AtomicUsize::new(items.capacity()),
            buffer: RwLock::new(Buffer { items, deferred }),
            tracker: ModTracker::new(),
            policy,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity.load(Ordering::Acquire)
    }

    pub fn policy(&self) -> &GrowthPolicy {
        &self.policy
    }

    /// The structural version counters shared with every derived view.
    pub fn tracker(&self) -> &ModTracker {
        &self.tracker
    }

    /// Grows the buffer so that at least `min` elements fit.
    ///
    /// A list still in the empty state from [`ArrayList::new`] ignores
    /// requests its default capacity would cover. Capacity changes are not
    /// structural: cursors and windows stay valid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityOverflow`] if the allocation cannot be made,
    /// or [`Error::ConcurrentModification`] if the buffer is busy.
    pub fn ensure_capacity(&self, min: usize) -> Result<()> {
        let mut buffer = self.write()?;
        let current = buffer.items.capacity();
        if self.policy.should_grow(current, min, buffer.deferred) {
            let target = self
                .policy
                .next_capacity(current, min, buffer.deferred, max_len::<T>())?;
            buffer.reallocate(target)?;
            self.publish(&buffer.items);
        }
        Ok(())
    }

    /// Shrinks the capacity to the current length, releasing the allocation
    /// entirely when the list is empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConcurrentModification`] if the buffer is busy.
    pub fn trim_to_size(&self) -> Result<()> {
        let mut buffer = self.write()?;
        let len = buffer.items.len();
        let capacity = buffer.items.capacity();
        if len < capacity {
            tracing::debug!(len, capacity, "trimming list buffer");
            if len == 0 {
                buffer.items = Vec::new();
            } else {
                buffer.items.shrink_to_fit();
            }
            buffer.deferred = false;
            self.publish(&buffer.items);
        }
        Ok(())
    }

    /// Copies the list into a new one whose capacity equals its length. The
    /// copy starts with fresh version counters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConcurrentModification`] if the buffer is busy.
    pub fn try_clone(&self) -> Result<Self>
    where
        T: Clone,
    {
        let buffer = self.read()?;
        let mut items = Vec::new();
        items
            .try_reserve_exact(buffer.items.len())
            .map_err(|_| Error::CapacityOverflow {
                requested: buffer.items.len(),
            })?;
        items.extend_from_slice(&buffer.items);
        Ok(Self::from_parts(items, false, self.policy))
    }

    pub fn into_vec(self) -> Vec<T> {
        self.buffer.into_inner().items
    }

    // --- Buffer access ---

    pub(crate) fn read(&self) -> Result<RwLockReadGuard<'_, Buffer<T>>> {
        self.peek().ok_or_else(|| {
            tracing::debug!("read refused while the buffer is being modified");
            Error::ConcurrentModification
        })
    }

    pub(crate) fn write(&self) -> Result<RwLockWriteGuard<'_, Buffer<T>>> {
        self.buffer
            .try_write()
            .ok_or_else(|| self.tracker.interfere())
    }

    pub(crate) fn peek(&self) -> Option<RwLockReadGuard<'_, Buffer<T>>> {
        self.buffer.try_read_recursive()
    }

    #[allow(clippy::ptr_arg)]
    pub(crate) fn publish(&self, items: &Vec<T>) {
        self.len.store(items.len(), Ordering::Release);
        self.capacity.store(items.capacity(), Ordering::Release);
    }

    // --- Absolute-index primitives shared by the list and its windows ---

    pub(crate) fn get_at(&self, index: usize) -> Result<T>
    where
        T: Clone,
    {
        let buffer = self.read()?;
        buffer
            .items
            .get(index)
            .cloned()
            .ok_or(Error::IndexOutOfBounds {
                index,
                len: buffer.items.len(),
            })
    }

    pub(crate) fn set_at(&self, index: usize, value: T) -> Result<T> {
        let mut buffer = self.write()?;
        let len = buffer.items.len();
        let slot = buffer
            .items
            .get_mut(index)
            .ok_or(Error::IndexOutOfBounds { index, len })?;
        Ok(core::mem::replace(slot, value))
    }

    pub(crate) fn insert_at(&self, index: usize, value: T) -> Result<()> {
        let mut buffer = self.write()?;
        let len = buffer.items.len();
        check_position(index, len)?;
        buffer.reserve_for(&self.policy, 1)?;
        buffer.items.insert(index, value);
        self.publish(&buffer.items);
        self.tracker.record(if index == len {
            Change::Grow
        } else {
            Change::Shift
        });
        Ok(())
    }

    pub(crate) fn insert_all_at(&self, index: usize, values: Vec<T>) -> Result<usize> {
        let mut buffer = self.write()?;
        let len = buffer.items.len();
        check_position(index, len)?;
        let count = values.len();
        if count == 0 {
            return Ok(0);
        }
        buffer.reserve_for(&self.policy, count)?;
        if index == len {
            buffer.items.extend(values);
        } else {
            buffer.items.splice(index..index, values);
        }
        self.publish(&buffer.items);
        self.tracker.record(if index == len {
            Change::Grow
        } else {
            Change::Shift
        });
        Ok(count)
    }

    pub(crate) fn remove_at(&self, index: usize) -> Result<T> {
        let mut buffer = self.write()?;
        check_index(index, buffer.items.len())?;
        let removed = buffer.items.remove(index);
        self.publish(&buffer.items);
        self.tracker.record(Change::Shift);
        Ok(removed)
    }

    /// Removes `from..to`, closing the gap in one move. Returns the number of
    /// removed elements.
    pub(crate) fn remove_span(&self, from: usize, to: usize) -> Result<usize> {
        let mut buffer = self.write()?;
        check_range(from, to, buffer.items.len())?;
        if from == to {
            return Ok(0);
        }
        buffer.items.drain(from..to);
        self.publish(&buffer.items);
        self.tracker.record(Change::Shift);
        Ok(to - from)
    }

    pub(crate) fn index_of_range(&self, value: &T, from: usize, to: usize) -> Result<Option<usize>>
    where
        T: PartialEq,
    {
        let buffer = self.read()?;
        let items = buffer
            .items
            .get(from..to)
            .ok_or(Error::ConcurrentModification)?;
        Ok(items.iter().position(|item| item == value).map(|i| from + i))
    }

    pub(crate) fn last_index_of_range(
        &self,
        value: &T,
        from: usize,
        to: usize,
    ) -> Result<Option<usize>>
    where
        T: PartialEq,
    {
        let buffer = self.read()?;
        let items = buffer
            .items
            .get(from..to)
            .ok_or(Error::ConcurrentModification)?;
        Ok(items.iter().rposition(|item| item == value).map(|i| from + i))
    }

    /// Visits `from..to` in order, stopping early once the watched counter
    /// moves and reporting that afterwards.
    pub(crate) fn for_each_range<F>(&self, from: usize, to: usize, watch: Watch, mut action: F) -> Result<()>
    where
        F: FnMut(&T),
    {
        let expected = self.tracker.current(watch);
        let buffer = self.read()?;
        let items = buffer
            .items
            .get(from..to)
            .ok_or(Error::ConcurrentModification)?;
        for item in items {
            if self.tracker.current(watch) != expected {
                break;
            }
            action(item);
        }
        drop(buffer);
        self.tracker.ensure(watch, expected)
    }

    pub(crate) fn clone_range(&self, from: usize, to: usize) -> Result<Vec<T>>
    where
        T: Clone,
    {
        let buffer = self.read()?;
        buffer
            .items
            .get(from..to)
            .map(<[T]>::to_vec)
            .ok_or(Error::ConcurrentModification)
    }

    /// Copies `from..to` into `out` when it has room, marking the slot after
    /// the data with `None`; otherwise returns a freshly allocated vector.
    pub(crate) fn copy_range_into(
        &self,
        mut out: Vec<Option<T>>,
        from: usize,
        to: usize,
    ) -> Result<Vec<Option<T>>>
    where
        T: Clone,
    {
        let buffer = self.read()?;
        let items = buffer
            .items
            .get(from..to)
            .ok_or(Error::ConcurrentModification)?;
        if out.len() < items.len() {
            return Ok(items.iter().cloned().map(Some).collect());
        }
        for (slot, item) in out.iter_mut().zip(items) {
            *slot = Some(item.clone());
        }
        if let Some(marker) = out.get_mut(items.len()) {
            *marker = None;
        }
        Ok(out)
    }
}

impl<T> Default for ArrayList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for ArrayList<T> {
    /// Takes over the vector's elements in exactly sized storage.
    fn from(mut items: Vec<T>) -> Self {
        if items.is_empty() {
            items = Vec::new();
        } else {
            items.shrink_to_fit();
        }
        Self::from_parts(items, false, GrowthPolicy::default())
    }
}

impl<T> FromIterator<T> for ArrayList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<T>>())
    }
}

impl<T> Extend<T> for ArrayList<T> {
    /// Appends every item. Exclusive access means no lock is contended.
    ///
    /// # Panics
    ///
    /// Panics if the capacity overflows, like [`Vec::push`].
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let buffer = self.buffer.get_mut();
        let before = buffer.items.len();
        for item in iter {
            // On failure Vec's own growth takes over and reports the overflow
            let _ = buffer.reserve_for(&self.policy, 1);
            buffer.items.push(item);
        }
        if buffer.items.len() > before {
            self.len.store(buffer.items.len(), Ordering::Release);
            self.capacity.store(buffer.items.capacity(), Ordering::Release);
            self.tracker.record(Change::Grow);
        }
    }
}

impl<T> IntoIterator for ArrayList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for ArrayList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.peek() {
            Some(buffer) => f.debug_list().entries(buffer.items.iter()).finish(),
            None => f.write_str("ArrayList { <locked> }"),
        }
    }
}

#[cfg(test)]
#[path = "list_test.rs"]
mod list_test;
