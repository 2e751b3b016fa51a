//! Capacity growth rules.

use crate::error::{Error, Result};

/// Capacity of the first allocation made by a list created with
/// [`ArrayList::new`](crate::ArrayList::new).
pub const DEFAULT_CAPACITY: usize = 10;

/// Computes new buffer capacities when a list runs out of room.
///
/// Capacities grow by half of the current capacity (about 1.5x), or straight
/// to the requested minimum when that is larger. A list that has never
/// allocated since `new` jumps to the default capacity on its first growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthPolicy {
    default_capacity: usize,
}

impl GrowthPolicy {
    pub const fn new() -> Self {
        Self {
            default_capacity: DEFAULT_CAPACITY,
        }
    }

    pub const fn with_default_capacity(default_capacity: usize) -> Self {
        Self { default_capacity }
    }

    pub fn default_capacity(&self) -> usize {
        self.default_capacity
    }

    /// Whether an explicit request for `min` slots should reallocate.
    ///
    /// A deferred list (still in the empty state handed out by `new`) ignores
    /// requests the default capacity would satisfy anyway; the first push
    /// allocates it.
    pub fn should_grow(&self, current: usize, min: usize, deferred: bool) -> bool {
        min > current && !(deferred && min <= self.default_capacity)
    }

    /// Capacity to allocate so that at least `min` elements fit.
    ///
    /// `limit` is the largest element count the allocator can address for
    /// the element type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityOverflow`] when `min` exceeds `limit`.
    pub fn next_capacity(
        &self,
        current: usize,
        min: usize,
        deferred: bool,
        limit: usize,
    ) -> Result<usize> {
        if min > limit {
            return Err(Error::CapacityOverflow { requested: min });
        }
        if deferred && current == 0 {
            return Ok(self.default_capacity.max(min).min(limit));
        }
        let preferred = current.saturating_add(current / 2);
        Ok(preferred.max(min).min(limit))
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: usize = isize::MAX as usize;

    #[test]
    fn test_grows_by_half() {
        let policy = GrowthPolicy::new();
        assert_eq!(policy.next_capacity(10, 11, false, LIMIT), Ok(15));
        assert_eq!(policy.next_capacity(15, 16, false, LIMIT), Ok(22));
        assert_eq!(policy.next_capacity(22, 23, false, LIMIT), Ok(33));
    }

    #[test]
    fn test_minimum_wins_over_half() {
        let policy = GrowthPolicy::new();
        assert_eq!(policy.next_capacity(10, 100, false, LIMIT), Ok(100));
        // 0 + 0 / 2 is still 0, so an explicitly empty list grows one at a time
        assert_eq!(policy.next_capacity(0, 1, false, LIMIT), Ok(1));
        assert_eq!(policy.next_capacity(1, 2, false, LIMIT), Ok(2));
        assert_eq!(policy.next_capacity(2, 3, false, LIMIT), Ok(3));
        assert_eq!(policy.next_capacity(3, 4, false, LIMIT), Ok(4));
        assert_eq!(policy.next_capacity(4, 5, false, LIMIT), Ok(6));
    }

    #[test]
    fn test_deferred_jumps_to_default() {
        let policy = GrowthPolicy::new();
        assert_eq!(policy.next_capacity(0, 1, true, LIMIT), Ok(DEFAULT_CAPACITY));
        assert_eq!(policy.next_capacity(0, 25, true, LIMIT), Ok(25));

        let policy = GrowthPolicy::with_default_capacity(4);
        assert_eq!(policy.next_capacity(0, 1, true, LIMIT), Ok(4));
    }

    #[test]
    fn test_should_grow() {
        let policy = GrowthPolicy::new();
        assert!(!policy.should_grow(10, 10, false));
        assert!(policy.should_grow(10, 11, false));
        // Deferred lists skip requests the default capacity covers
        assert!(!policy.should_grow(0, 5, true));
        assert!(!policy.should_grow(0, DEFAULT_CAPACITY, true));
        assert!(policy.should_grow(0, DEFAULT_CAPACITY + 1, true));
        assert!(policy.should_grow(0, 5, false));
    }

    #[test]
    fn test_limit() {
        let policy = GrowthPolicy::new();
        assert_eq!(policy.next_capacity(80, 81, false, 100), Ok(100));
        assert_eq!(
            policy.next_capacity(80, 101, false, 100),
            Err(Error::CapacityOverflow { requested: 101 })
        );
        // Growth saturates instead of wrapping
        assert_eq!(
            policy.next_capacity(usize::MAX - 1, usize::MAX, false, usize::MAX),
            Ok(usize::MAX)
        );
    }
}
