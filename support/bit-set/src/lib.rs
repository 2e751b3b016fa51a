//! BitSet: a fixed-length set of bits optimized for short runs.
//!
//! BitSet provides a compact marking structure that:
//! - Is exactly 32 bytes (4 words on 64-bit targets)
//! - Stores up to 128 bits inline without heap allocation
//! - Spills to the heap seamlessly for longer runs
//! - Uses one bit per slot, so marking `n` candidates costs `n / 8` bytes
//!
//! The length is fixed at construction. Every index passed to [`BitSet::insert`]
//! or [`BitSet::contains`] must be below that length. Bits are only ever set:
//! a set marks candidates once and is dropped.

#![deny(unsafe_code)]

use smallvec::SmallVec;

const WORD_BITS: usize = u64::BITS as usize;

/// Number of bits that fit without touching the heap.
pub const INLINE_BITS: usize = 2 * WORD_BITS;

pub struct BitSet {
    words: SmallVec<[u64; 2]>,
    len: usize,
}

#[cfg(target_pointer_width = "64")]
static_assertions::assert_eq_size!(BitSet, [usize; 4]);

impl BitSet {
    /// Creates a set of `len` bits, all clear.
    pub fn new(len: usize) -> Self {
        Self {
            words: SmallVec::from_elem(0, words_for(len)),
            len,
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the bits live in the inline buffer.
    pub fn is_inline(&self) -> bool {
        !self.words.spilled()
    }

    /// Sets bit `index`, returning `true` if it was previously clear.
    #[inline(always)]
    pub fn insert(&mut self, index: usize) -> bool {
        let (word, mask) = self.locate(index);
        let was_clear = self.words[word] & mask == 0;
        self.words[word] |= mask;
        was_clear
    }

    #[inline(always)]
    pub fn contains(&self, index: usize) -> bool {
        let (word, mask) = self.locate(index);
        self.words[word] & mask != 0
    }

    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Iterates over the indices of set bits in ascending order.
    pub fn ones(&self) -> Ones<'_> {
        Ones {
            words: &self.words,
            word: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }

    #[inline(always)]
    fn locate(&self, index: usize) -> (usize, u64) {
        assert!(
            index < self.len,
            "bit index {index} out of range for length {}",
            self.len
        );
        (index / WORD_BITS, 1u64 << (index % WORD_BITS))
    }
}

#[inline(always)]
fn words_for(len: usize) -> usize {
    len.div_ceil(WORD_BITS)
}

impl Clone for BitSet {
    fn clone(&self) -> Self {
        Self {
            words: self.words.clone(),
            len: self.len,
        }
    }
}

impl core::fmt::Debug for BitSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.ones()).finish()
    }
}

/// Iterator over set bits, see [`BitSet::ones`].
pub struct Ones<'a> {
    words: &'a [u64],
    word: usize,
    current: u64,
}

impl Iterator for Ones<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while self.current == 0 {
            self.word += 1;
            self.current = *self.words.get(self.word)?;
        }
        let bit = self.current.trailing_zeros() as usize;
        // Clear the lowest set bit.
        self.current &= self.current - 1;
        Some(self.word * WORD_BITS + bit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_clear() {
        let bits = BitSet::new(70);
        assert_eq!(bits.len(), 70);
        assert_eq!(bits.count_ones(), 0);
        assert!((0..70).all(|i| !bits.contains(i)));
    }

    #[test]
    fn test_insert() {
        let mut bits = BitSet::new(10);
        assert!(bits.insert(3));
        assert!(!bits.insert(3));
        assert!(bits.contains(3));
        assert!(!bits.contains(4));
        assert_eq!(bits.count_ones(), 1);
    }

    #[test]
    fn test_word_boundaries() {
        let mut bits = BitSet::new(129);
        for i in [0, 63, 64, 127, 128] {
            bits.insert(i);
        }
        assert_eq!(bits.count_ones(), 5);
        assert_eq!(bits.ones().collect::<Vec<_>>(), vec![0, 63, 64, 127, 128]);
    }

    #[test]
    fn test_inline_capacity() {
        // Exactly INLINE_BITS bits stay inline
        let bits = BitSet::new(INLINE_BITS);
        assert!(bits.is_inline());

        // One more bit spills to the heap
        let bits = BitSet::new(INLINE_BITS + 1);
        assert!(!bits.is_inline());
    }

    #[test]
    fn test_empty() {
        let bits = BitSet::new(0);
        assert!(bits.is_empty());
        assert_eq!(bits.ones().count(), 0);
    }

    #[test]
    fn test_count_ones_spans_words() {
        let mut bits = BitSet::new(300);
        for i in (0..300).step_by(7) {
            bits.insert(i);
        }
        assert_eq!(bits.count_ones(), 43);
        assert_eq!(bits.len(), 300);
    }

    #[test]
    fn test_clone_heap() {
        let mut bits = BitSet::new(1000);
        bits.insert(999);
        let cloned = bits.clone();
        assert!(cloned.contains(999));
        assert_eq!(cloned.count_ones(), 1);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_panics() {
        let mut bits = BitSet::new(5);
        bits.insert(5);
    }
}
