//! Predicate- and membership-driven bulk mutation.
//!
//! These run over an absolute range of the root buffer and are shared by the
//! list and its windows. Removal compacts survivors toward the front in one
//! pass and drops the rejected tail in one move.

use core::cmp::Ordering;

use seqlist_bit_set::BitSet;

use crate::error::{Error, Result};
use crate::list::ArrayList;
use crate::sequence::Membership;
use crate::tracker::{Change, Watch};

/// Removes the rejected elements of a partially compacted range when it goes
/// out of scope, including while a membership test unwinds.
///
/// Layout of `items` while compacting:
/// `[.. write)` survivors, `[write .. read)` rejected, `[read .. end)` not yet
/// examined. Dropping removes `write..read`, so unexamined elements are kept.
struct Compactor<'a, T> {
    list: &'a ArrayList<T>,
    items: &'a mut Vec<T>,
    read: usize,
    write: usize,
    end: usize,
}

impl<T> Compactor<'_, T> {
    fn keep_current(&mut self) {
        self.items.swap(self.write, self.read);
        self.write += 1;
        self.read += 1;
    }

    fn reject_current(&mut self) {
        self.read += 1;
    }

    fn is_done(&self) -> bool {
        self.read == self.end
    }
}

impl<T> Drop for Compactor<'_, T> {
    fn drop(&mut self) {
        if self.write == self.read {
            return;
        }
        if !self.is_done() {
            tracing::debug!(
                examined = self.read,
                kept = self.write,
                "compaction interrupted; keeping unexamined elements"
            );
        }
        self.items.drain(self.write..self.read);
        self.list.publish(self.items);
        self.list.tracker().record(Change::Shift);
    }
}

impl<T> ArrayList<T> {
    /// Removes every element of `from..to` matching `filter`. Returns the
    /// number of removed elements.
    ///
    /// The filter runs under a shared lock, so it may read the list; any
    /// attempt to modify it is reported and nothing is removed.
    pub(crate) fn remove_if_range<F>(&self, mut filter: F, from: usize, to: usize) -> Result<usize>
    where
        F: FnMut(&T) -> bool,
    {
        let expected = self.tracker().structure();

        // Scan for the first match, then mark the rest relative to it.
        let (first, marks) = {
            let buffer = self.read()?;
            let items = buffer
                .items
                .get(from..to)
                .ok_or(Error::ConcurrentModification)?;
            let Some(first) = items.iter().position(&mut filter) else {
                drop(buffer);
                self.tracker().ensure(Watch::Structure, expected)?;
                return Ok(0);
            };
            let mut marks = BitSet::new(items.len() - first);
            marks.insert(0);
            for (offset, item) in items[first + 1..].iter().enumerate() {
                if filter(item) {
                    marks.insert(offset + 1);
                }
            }
            (from + first, marks)
        };

        let mut buffer = self.write()?;
        self.tracker().ensure(Watch::Structure, expected)?;
        if buffer.items.len() < to {
            return Err(Error::ConcurrentModification);
        }

        let removed = marks.count_ones();
        tracing::trace!(from, to, removed, "removing matched elements");
        let items = &mut buffer.items;
        let mut write = first;
        for read in first..to {
            if !marks.contains(read - first) {
                items.swap(write, read);
                write += 1;
            }
        }
        items.drain(write..to);
        self.publish(items);
        self.tracker().record(Change::Shift);
        Ok(removed)
    }

    /// Removes the elements of `from..to` whose membership in `other` equals
    /// `!complement`: with `complement == false` members are removed, with
    /// `true` non-members are. Returns the number of removed elements.
    ///
    /// The list is write-locked while `other` is consulted, so reads from the
    /// membership test are refused. A membership test that tries to modify
    /// this list still finishes the pass, then the call fails.
    pub(crate) fn batch_remove_range<M>(
        &self,
        other: &M,
        complement: bool,
        from: usize,
        to: usize,
    ) -> Result<usize>
    where
        M: Membership<T> + ?Sized,
    {
        let mut buffer = self.write()?;
        if from > to || to > buffer.items.len() {
            return Err(Error::ConcurrentModification);
        }
        let expected = self.tracker().structure();

        let mut compactor = Compactor {
            list: self,
            items: &mut buffer.items,
            read: from,
            write: from,
            end: to,
        };
        while !compactor.is_done() {
            if other.contains(&compactor.items[compactor.read]) == complement {
                compactor.keep_current();
            } else {
                compactor.reject_current();
            }
        }
        let removed = compactor.read - compactor.write;
        drop(compactor);

        if removed > 0 {
            tracing::trace!(from, to, removed, complement, "batch removal");
        }
        // The compactor's own record is the only change we expect.
        let own = u64::from(removed > 0);
        self.tracker().ensure(Watch::Structure, expected + own)?;
        Ok(removed)
    }

    /// Replaces each element of `from..to` with `operator` applied to it.
    ///
    /// Each element is read under a shared lock, so the operator may read the
    /// list. Replacement is not structural.
    pub(crate) fn replace_range<F>(&self, mut operator: F, from: usize, to: usize) -> Result<()>
    where
        F: FnMut(&T) -> T,
    {
        let expected = self.tracker().structure();
        for index in from..to {
            let value = {
                let buffer = self.read()?;
                let item = buffer
                    .items
                    .get(index)
                    .ok_or(Error::ConcurrentModification)?;
                operator(item)
            };
            self.tracker().ensure(Watch::Structure, expected)?;
            let mut buffer = self.write()?;
            let slot = buffer
                .items
                .get_mut(index)
                .ok_or(Error::ConcurrentModification)?;
            *slot = value;
        }
        Ok(())
    }

    /// Stable sort of `from..to`. Counts as a reordering even when nothing
    /// moved.
    pub(crate) fn sort_range<F>(&self, compare: F, from: usize, to: usize) -> Result<()>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let mut buffer = self.write()?;
        let expected = self.tracker().structure();
        buffer
            .items
            .get_mut(from..to)
            .ok_or(Error::ConcurrentModification)?
            .sort_by(compare);
        drop(buffer);
        self.tracker().ensure(Watch::Structure, expected)?;
        self.tracker().record(Change::Reorder);
        Ok(())
    }
}

#[cfg(test)]
#[path = "batch_test.rs"]
mod batch_test;
