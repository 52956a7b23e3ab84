//! Bit-packed inline storage: short sequences live entirely inside the
//! value, no heap allocation.
//!
//! The payload is a 120-bit packed integer held as two 64-bit words, with a
//! 4-bit length nibble above it. Units are stored little-endian within the
//! payload: unit `i` occupies bits `[i * BITS, (i + 1) * BITS)`. That gives a
//! capacity of 15 8-bit units or 7 16-bit units.

// Packed-word arithmetic truncates on purpose throughout.
#![allow(clippy::cast_possible_truncation)]

use core::{fmt, marker::PhantomData};

use crate::{concat::Source16, unit::CodeUnit};

/// Number of payload bits in the packed word pair.
const PAYLOAD_BITS: u32 = 120;
const PAYLOAD_MASK: u128 = (1 << PAYLOAD_BITS) - 1;
/// The length nibble sits directly above the payload.
const COUNT_SHIFT: u32 = PAYLOAD_BITS;

/// Fixed-capacity packed buffer of code units.
pub(crate) struct Inline<U: CodeUnit> {
    lo: u64,
    hi: u64,
    _units: PhantomData<U>,
}

// Manual impls: a derive would bound on `U`, which is only a width marker.
impl<U: CodeUnit> Clone for Inline<U> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<U: CodeUnit> Copy for Inline<U> {}
impl<U: CodeUnit> PartialEq for Inline<U> {
    fn eq(&self, other: &Self) -> bool {
        self.lo == other.lo && self.hi == other.hi
    }
}
impl<U: CodeUnit> Eq for Inline<U> {}

impl<U: CodeUnit> Inline<U> {
    pub(crate) const CAPACITY: usize = (PAYLOAD_BITS / U::BITS) as usize;

    pub(crate) fn empty() -> Self {
        Self {
            lo: 0,
            hi: 0,
            _units: PhantomData,
        }
    }

    /// Builds an inline buffer from a random-access source, or `None` when
    /// the source is longer than [`Self::CAPACITY`] or holds a unit that does
    /// not fit this width. This is the classifier's only recoverable failure.
    pub(crate) fn try_from_source<S: Source16 + ?Sized>(src: &S) -> Option<Self> {
        if src.len() > Self::CAPACITY {
            return None;
        }
        let mut out = Self::empty();
        for i in 0..src.len() {
            out.push(U::from_u16(src.get(i))?);
        }
        Some(out)
    }

    #[inline]
    fn bits(&self) -> u128 {
        u128::from(self.lo) | u128::from(self.hi) << 64
    }

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    fn set_bits(&mut self, bits: u128) {
        self.lo = bits as u64;
        self.hi = (bits >> 64) as u64;
    }

    #[inline]
    fn payload(&self) -> u128 {
        self.bits() & PAYLOAD_MASK
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        ((self.bits() >> COUNT_SHIFT) & 0xF) as usize
    }

    fn set_len(&mut self, len: usize) {
        debug_assert!(len <= Self::CAPACITY);
        self.set_bits(self.payload() | (len as u128) << COUNT_SHIFT);
    }

    /// Unit at `index`. `index < len()` is the caller's obligation; reads
    /// past the length yield unspecified (zero) units in release builds.
    #[inline]
    pub(crate) fn get(&self, index: usize) -> U {
        debug_assert!(index < self.len());
        U::from_bits_truncated(self.payload() >> (index as u32 * U::BITS))
    }

    /// Clear-then-OR the unit at `index`.
    pub(crate) fn set(&mut self, index: usize, unit: U) {
        debug_assert!(index < self.len());
        let shift = index as u32 * U::BITS;
        let lane_mask = (u128::from(u16::MAX) >> (16 - U::BITS)) << shift;
        let bits = (self.bits() & !lane_mask) | u128::from(unit.into_u16()) << shift;
        self.set_bits(bits);
        debug_assert!(self.get(index) == unit);
    }

    /// Appends one unit. Traps when the buffer is full.
    pub(crate) fn push(&mut self, unit: U) {
        let old_len = self.len();
        assert!(old_len < Self::CAPACITY, "inline buffer capacity exceeded");
        self.set_len(old_len + 1);
        self.set(old_len, unit);
    }

    #[inline]
    fn lanes(&self) -> (u64, u64) {
        let payload = self.payload();
        (payload as u64, (payload >> 64) as u64)
    }

    /// Constant-time: ORs the two payload words and tests the high-bit mask
    /// of every lane. Vacant lanes read as zero and cannot fail the test.
    pub(crate) fn is_ascii(&self) -> bool {
        let (lo, hi) = self.lanes();
        (lo | hi) & U::ASCII_LANE_MASK == 0
    }

    pub(crate) fn is_latin1(&self) -> bool {
        let (lo, hi) = self.lanes();
        (lo | hi) & U::LATIN1_LANE_MASK == 0
    }

    pub(crate) fn iter(&self) -> InlineIter<U> {
        InlineIter {
            bits: self.payload(),
            remaining: self.len(),
            _units: PhantomData,
        }
    }

    /// Iterator starting at `offset`, used when resuming a bulk copy.
    pub(crate) fn iter_from(&self, offset: usize) -> InlineIter<U> {
        debug_assert!(offset <= self.len());
        InlineIter {
            bits: self.payload() >> (offset as u32 * U::BITS),
            remaining: self.len() - offset,
            _units: PhantomData,
        }
    }
}

impl<U: CodeUnit> Source16 for Inline<U> {
    fn len(&self) -> usize {
        self.len()
    }

    fn get(&self, index: usize) -> u16 {
        self.get(index).into_u16()
    }
}

impl<U: CodeUnit> fmt::Debug for Inline<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Shift-and-truncate iterator over a packed payload.
#[derive(Clone, Copy)]
pub(crate) struct InlineIter<U: CodeUnit> {
    bits: u128,
    remaining: usize,
    _units: PhantomData<U>,
}

impl<U: CodeUnit> Iterator for InlineIter<U> {
    type Item = U;

    #[inline]
    fn next(&mut self) -> Option<U> {
        if self.remaining == 0 {
            return None;
        }
        let unit = U::from_bits_truncated(self.bits);
        self.bits >>= U::BITS;
        self.remaining -= 1;
        Some(unit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<U: CodeUnit> ExactSizeIterator for InlineIter<U> {}
