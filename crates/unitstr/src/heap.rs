//! Heap-allocated, reference-counted, growable code-unit buffers.
//!
//! A buffer is shared as `Arc<HeapBuffer<U>>`; `Arc::get_mut` succeeding is
//! the one and only license for in-place mutation (copy-on-write
//! discipline). Everything reachable through a shared handle is immutable.

use alloc::{sync::Arc, vec::Vec};
use core::{fmt, ops::Range};

use crate::unit::CodeUnit;

/// Growable buffer of 8-bit (Latin-1) or 16-bit units with cached
/// classification flags.
///
/// The flags are a three-state cache: `Some(_)` must agree with the actual
/// content, `None` means "not computed". Mutations either maintain them
/// precisely or degrade them to `None`; they are never left stale.
pub(crate) struct HeapBuffer<U: CodeUnit> {
    units: Vec<U>,
    is_ascii: Option<bool>,
    is_latin1: Option<bool>,
}

impl<U: CodeUnit> HeapBuffer<U> {
    /// Allocates `max(min_capacity, source length)` and copies `units` in,
    /// computing the flags not supplied by the caller.
    pub(crate) fn copying<I>(units: I, min_capacity: usize, is_ascii: Option<bool>) -> Arc<Self>
    where
        I: IntoIterator<Item = U>,
        I::IntoIter: ExactSizeIterator,
    {
        let source = units.into_iter();
        let mut buf = Vec::with_capacity(min_capacity.max(source.len()));
        let mut max = 0u16;
        for unit in source {
            max = max.max(unit.into_u16());
            buf.push(unit);
        }
        if let Some(known) = is_ascii {
            debug_assert_eq!(known, max <= 0x7F);
        }
        Arc::new(Self {
            units: buf,
            is_ascii: is_ascii.or(Some(max <= 0x7F)),
            is_latin1: Some(max <= 0xFF),
        })
    }

    #[inline]
    pub(crate) fn units(&self) -> &[U] {
        &self.units
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.units.len()
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.units.capacity()
    }

    #[inline]
    pub(crate) fn spare_capacity(&self) -> usize {
        self.units.capacity() - self.units.len()
    }

    #[inline]
    pub(crate) fn is_ascii(&self) -> Option<bool> {
        self.is_ascii
    }

    #[inline]
    pub(crate) fn is_latin1(&self) -> Option<bool> {
        self.is_latin1
    }

    /// Appends one unit into already-reserved room. The caller reserves
    /// first; growing here would move the buffer behind a shared `Arc`'s
    /// recorded capacity decisions.
    pub(crate) fn push_within_capacity(&mut self, unit: U) {
        debug_assert!(self.spare_capacity() > 0);
        self.units.push(unit);
        self.note_appended(unit.into_u16());
    }

    /// Bulk variant of [`Self::push_within_capacity`].
    pub(crate) fn extend_within_capacity(&mut self, units: &[U]) {
        debug_assert!(units.len() <= self.spare_capacity());
        let mut max = 0u16;
        for &unit in units {
            max = max.max(unit.into_u16());
        }
        self.units.extend_from_slice(units);
        self.note_appended(max);
    }

    /// Appending can only narrow the cached flags, so an AND keeps them
    /// precise without rescanning.
    fn note_appended(&mut self, max_appended: u16) {
        self.is_ascii = self.is_ascii.map(|a| a && max_appended <= 0x7F);
        self.is_latin1 = self.is_latin1.map(|l| l && max_appended <= 0xFF);
    }

    /// Replaces `range` with `new_units`, sliding the tail, if the result
    /// fits the existing allocation. Returns `false` (and leaves the buffer
    /// untouched) when it would have to grow; the caller then falls back to
    /// full reconstruction.
    ///
    /// Width checking is the caller's job: every element yielded by
    /// `new_units` must already fit `U`.
    pub(crate) fn try_replace<I>(&mut self, range: Range<usize>, new_units: I) -> bool
    where
        I: ExactSizeIterator<Item = U>,
    {
        debug_assert!(range.start <= range.end && range.end <= self.units.len());
        let new_len = self.units.len() - range.len() + new_units.len();
        if new_len > self.units.capacity() {
            return false;
        }
        // Capacity was checked above, so the splice cannot reallocate.
        self.units.splice(range, new_units);
        // Removal can turn a non-ASCII buffer ASCII; degrade to "unknown"
        // instead of rescanning.
        self.is_ascii = None;
        self.is_latin1 = None;
        true
    }
}

impl fmt::Debug for HeapBuffer<u8> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeapBuffer")
            .field("units", &bstr::BStr::new(&self.units))
            .field("is_ascii", &self.is_ascii)
            .finish()
    }
}

impl fmt::Debug for HeapBuffer<u16> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeapBuffer")
            .field("units", &self.units)
            .field("is_ascii", &self.is_ascii)
            .field("is_latin1", &self.is_latin1)
            .finish()
    }
}
