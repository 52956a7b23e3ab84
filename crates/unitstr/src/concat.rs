//! Lazy three-way concatenation.
//!
//! [`Concat3`] presents three code-unit sources as one logical sequence
//! without materializing it. Its only consumer is the classifying
//! constructor: a replacement splices (before, new, after) through here and
//! re-classifies, so no intermediate buffer is ever allocated.

/// A random-access source of UTF-16 code units.
///
/// Abstraction over where units come from (byte slices widen on read);
/// random access keeps multi-pass classification cheap for every backing
/// store.
pub(crate) trait Source16 {
    fn len(&self) -> usize;

    /// Unit at `index`; `index < len()` is the caller's obligation.
    fn get(&self, index: usize) -> u16;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Largest unit in the source, 0 when empty. Full scan by default.
    fn max_unit(&self) -> u16 {
        let mut max = 0;
        for i in 0..self.len() {
            max = max.max(self.get(i));
        }
        max
    }

    /// Sequential traversal, widened to `u16`. Named to stay clear of the
    /// slice inherent `iter`; sources with cheaper-than-random stepping
    /// override this.
    fn iter_units(&self) -> impl ExactSizeIterator<Item = u16> + '_ {
        (0..self.len()).map(|i| self.get(i))
    }
}

impl Source16 for &[u8] {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn get(&self, index: usize) -> u16 {
        u16::from(self[index])
    }
}

impl Source16 for &[u16] {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn get(&self, index: usize) -> u16 {
        self[index]
    }

    fn max_unit(&self) -> u16 {
        (**self).iter().copied().max().unwrap_or(0)
    }
}

/// Position within a [`Concat3`]: which segment, and where inside it.
///
/// The derived `Ord` is exactly the required ordering — segment first
/// (variant order), inner index second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum SegmentIndex {
    First(usize),
    Mid(usize),
    Last(usize),
}

/// Three sources viewed as one logical sequence: segment 0, then 1, then 2.
#[derive(Debug)]
pub(crate) struct Concat3<A, B, C> {
    first: A,
    mid: B,
    last: C,
}

impl<A: Source16, B: Source16, C: Source16> Concat3<A, B, C> {
    pub(crate) fn new(first: A, mid: B, last: C) -> Self {
        Self { first, mid, last }
    }

    /// Index of the first unit, skipping empty leading segments.
    pub(crate) fn start_index(&self) -> SegmentIndex {
        if !self.first.is_empty() {
            SegmentIndex::First(0)
        } else if !self.mid.is_empty() {
            SegmentIndex::Mid(0)
        } else {
            SegmentIndex::Last(0)
        }
    }

    /// One past the last unit; always lands in the final segment.
    pub(crate) fn end_index(&self) -> SegmentIndex {
        SegmentIndex::Last(self.last.len())
    }

    pub(crate) fn index_after(&self, index: SegmentIndex) -> SegmentIndex {
        match index {
            SegmentIndex::First(i) => {
                let next = i + 1;
                if next != self.first.len() {
                    SegmentIndex::First(next)
                } else if !self.mid.is_empty() {
                    SegmentIndex::Mid(0)
                } else {
                    SegmentIndex::Last(0)
                }
            }
            SegmentIndex::Mid(i) => {
                let next = i + 1;
                if next != self.mid.len() {
                    SegmentIndex::Mid(next)
                } else {
                    SegmentIndex::Last(0)
                }
            }
            SegmentIndex::Last(i) => SegmentIndex::Last(i + 1),
        }
    }

    pub(crate) fn get_at(&self, index: SegmentIndex) -> u16 {
        match index {
            SegmentIndex::First(i) => self.first.get(i),
            SegmentIndex::Mid(i) => self.mid.get(i),
            SegmentIndex::Last(i) => self.last.get(i),
        }
    }
}

impl<A: Source16, B: Source16, C: Source16> Source16 for Concat3<A, B, C> {
    fn len(&self) -> usize {
        self.first.len() + self.mid.len() + self.last.len()
    }

    fn get(&self, index: usize) -> u16 {
        if index < self.first.len() {
            return self.first.get(index);
        }
        let index = index - self.first.len();
        if index < self.mid.len() {
            return self.mid.get(index);
        }
        self.last.get(index - self.mid.len())
    }

    fn max_unit(&self) -> u16 {
        self.first
            .max_unit()
            .max(self.mid.max_unit())
            .max(self.last.max_unit())
    }

    /// Segment-cursor traversal: one step per unit, no re-locating the
    /// segment on every access.
    fn iter_units(&self) -> impl ExactSizeIterator<Item = u16> + '_ {
        Concat3Iter {
            cat: self,
            index: self.start_index(),
            remaining: self.len(),
        }
    }
}

struct Concat3Iter<'a, A, B, C> {
    cat: &'a Concat3<A, B, C>,
    index: SegmentIndex,
    remaining: usize,
}

impl<A: Source16, B: Source16, C: Source16> Iterator for Concat3Iter<'_, A, B, C> {
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        debug_assert!((self.remaining == 0) == (self.index == self.cat.end_index()));
        if self.remaining == 0 {
            return None;
        }
        let unit = self.cat.get_at(self.index);
        self.index = self.cat.index_after(self.index);
        self.remaining -= 1;
        Some(unit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<A: Source16, B: Source16, C: Source16> ExactSizeIterator for Concat3Iter<'_, A, B, C> {}
