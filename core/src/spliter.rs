//! Splittable cursors for divide-and-conquer traversal.

use core::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use bitflags::bitflags;

use crate::error::{Error, Result};
use crate::list::ArrayList;
use crate::tracker::Watch;

bitflags! {
    /// Properties a [`Spliter`] guarantees about the elements it covers.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    pub struct Characteristics: u8 {
        /// Elements are visited in index order.
        const ORDERED = 1 << 0;
        /// `estimate_size` is exact before any traversal or split.
        const SIZED = 1 << 1;
        /// Every cursor returned by `try_split` is `SIZED` as well.
        const SUBSIZED = 1 << 2;
    }
}

/// A cursor over a half-open index range that can be split in two.
///
/// A spliter binds lazily: its end index and the version it validates against
/// are taken on first real use (`try_split`, `try_advance`,
/// `for_each_remaining` or `estimate_size`), so the list or window it came
/// from may still be changed after the spliter is created. Halves produced by
/// `try_split` cover disjoint ranges, share the bound version and may be sent
/// to other threads.
pub struct Spliter<'a, T> {
    root: &'a ArrayList<T>,
    origin: Origin<'a>,
    index: usize,
    /// One past the last index; `None` until bound.
    fence: Option<usize>,
    expected: u64,
    watch: Watch,
}

/// Where an unbound spliter takes its range and version from.
#[derive(Clone, Copy)]
enum Origin<'a> {
    List,
    Window {
        size: &'a AtomicUsize,
        observed: &'a AtomicU64,
    },
}

impl<'a, T> Spliter<'a, T> {
    pub(crate) fn new(root: &'a ArrayList<T>) -> Self {
        Self {
            root,
            origin: Origin::List,
            index: 0,
            fence: None,
            expected: 0,
            watch: Watch::Structure,
        }
    }

    pub(crate) fn over_window(
        root: &'a ArrayList<T>,
        offset: usize,
        size: &'a AtomicUsize,
        observed: &'a AtomicU64,
    ) -> Self {
        Self {
            root,
            origin: Origin::Window { size, observed },
            index: offset,
            fence: None,
            expected: 0,
            watch: Watch::Layout,
        }
    }

    fn fence(&mut self) -> usize {
        if let Some(fence) = self.fence {
            return fence;
        }
        let fence = match self.origin {
            Origin::List => {
                self.expected = self.root.tracker().current(self.watch);
                self.root.len()
            }
            Origin::Window { size, observed } => {
                self.expected = observed.load(Ordering::Acquire);
                self.index + size.load(Ordering::Acquire)
            }
        };
        self.fence = Some(fence);
        fence
    }

    /// Splits off the first half of the remaining range, keeping the second.
    /// Returns `None` when fewer than two elements remain.
    pub fn try_split(&mut self) -> Option<Spliter<'a, T>> {
        let hi = self.fence();
        let lo = self.index;
        let mid = lo + (hi.saturating_sub(lo)) / 2;
        if lo >= mid {
            return None;
        }
        self.index = mid;
        Some(Spliter {
            root: self.root,
            origin: self.origin,
            index: lo,
            fence: Some(mid),
            expected: self.expected,
            watch: self.watch,
        })
    }

    /// Passes the next element to `action`. Returns `false` once the range is
    /// exhausted.
    ///
    /// # Errors
    ///
    /// [`Error::ConcurrentModification`] if the list was structurally changed
    /// since the spliter was bound.
    pub fn try_advance<F>(&mut self, action: F) -> Result<bool>
    where
        F: FnOnce(&T),
    {
        let hi = self.fence();
        let index = self.index;
        if index >= hi {
            return Ok(false);
        }
        self.index = index + 1;
        let buffer = self.root.read()?;
        let item = buffer
            .items
            .get(index)
            .ok_or(Error::ConcurrentModification)?;
        action(item);
        drop(buffer);
        self.root.tracker().ensure(self.watch, self.expected)?;
        Ok(true)
    }

    /// Visits every remaining element in order. The version is checked once,
    /// after the last element.
    pub fn for_each_remaining<F>(&mut self, mut action: F) -> Result<()>
    where
        F: FnMut(&T),
    {
        let hi = self.fence();
        let lo = self.index;
        self.index = hi.max(lo);
        if lo < hi {
            let buffer = self.root.read()?;
            let items = buffer
                .items
                .get(lo..hi)
                .ok_or(Error::ConcurrentModification)?;
            items.iter().for_each(&mut action);
        }
        self.root.tracker().ensure(self.watch, self.expected)
    }

    /// Number of elements not yet visited. Binds the spliter.
    pub fn estimate_size(&mut self) -> usize {
        self.fence().saturating_sub(self.index)
    }

    pub fn characteristics(&self) -> Characteristics {
        Characteristics::ORDERED | Characteristics::SIZED | Characteristics::SUBSIZED
    }

    /// Visits every remaining element on the rayon thread pool, splitting
    /// until each worker has a share. Order across halves is unspecified.
    pub fn par_for_each<F>(mut self, action: F) -> Result<()>
    where
        T: Send + Sync,
        F: Fn(&T) + Sync,
    {
        self.fence();
        let splits = rayon::current_num_threads();
        drive(self, &action, splits)
    }
}

fn drive<T, F>(mut spliter: Spliter<'_, T>, action: &F, splits: usize) -> Result<()>
where
    T: Send + Sync,
    F: Fn(&T) + Sync,
{
    if splits > 0 {
        if let Some(prefix) = spliter.try_split() {
            let (left, right) = rayon::join(
                || drive(prefix, action, splits / 2),
                || drive(spliter, action, splits / 2),
            );
            return left.and(right);
        }
    }
    spliter.for_each_remaining(action)
}

impl<T: Send + Sync> ArrayList<T> {
    /// Visits every element on the rayon thread pool.
    ///
    /// # Errors
    ///
    /// [`Error::ConcurrentModification`] if the list is structurally changed
    /// during the traversal.
    pub fn par_for_each<F>(&self, action: F) -> Result<()>
    where
        F: Fn(&T) + Sync,
    {
        Spliter::new(self).par_for_each(action)
    }
}

#[cfg(test)]
#[path = "spliter_test.rs"]
mod spliter_test;
