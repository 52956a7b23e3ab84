//! Read-side iteration over every backing strategy.
//!
//! The cursor is a per-variant enum: contiguous storage iterates by slice,
//! inline storage shifts units out of the packed words, and a bridged handle
//! without a fast path falls back to per-unit calls.

use core::slice;

use crate::{
    bridge::NativeString,
    inline::InlineIter,
    repr::Repr,
    string::UnitString,
};

/// Iterator over a [`UnitString`]'s code units, widened to `u16` regardless
/// of the internal width.
pub struct Units<'a> {
    cursor: Cursor<'a>,
}

enum Cursor<'a> {
    Deep8(slice::Iter<'a, u8>),
    Deep16(slice::Iter<'a, u16>),
    Inline8(InlineIter<u8>),
    Inline16(InlineIter<u16>),
    Native {
        handle: &'a dyn NativeString,
        index: usize,
        len: usize,
    },
}

impl<'a> Units<'a> {
    pub(crate) fn new(s: &'a UnitString) -> Self {
        Self::with_offset(s, 0)
    }

    /// Iterator resuming at code-unit `offset`; used after a bulk copy
    /// consumed a prefix.
    pub(crate) fn with_offset(s: &'a UnitString, offset: usize) -> Self {
        debug_assert!(offset <= s.len());
        let cursor = match &s.repr {
            Repr::Inline8(x) => Cursor::Inline8(x.iter_from(offset)),
            Repr::Inline16(x) => Cursor::Inline16(x.iter_from(offset)),
            // SAFETY: the borrow contract is held by whoever constructed the
            // unowned variant.
            Repr::Unowned8(x) => Cursor::Deep8(unsafe { x.as_slice() }[offset..].iter()),
            Repr::Unowned16(x) => Cursor::Deep16(unsafe { x.as_slice() }[offset..].iter()),
            Repr::Latin1(x) => Cursor::Deep8(x.units()[offset..].iter()),
            Repr::Utf16(x) => Cursor::Deep16(x.units()[offset..].iter()),
            Repr::Native(x) => match x.fast_units() {
                Some(units) => Cursor::Deep16(units[offset..].iter()),
                None => Cursor::Native {
                    handle: &**x,
                    index: offset,
                    len: x.len(),
                },
            },
        };
        Self { cursor }
    }
}

impl Iterator for Units<'_> {
    type Item = u16;

    #[inline]
    fn next(&mut self) -> Option<u16> {
        match &mut self.cursor {
            Cursor::Deep8(it) => it.next().copied().map(u16::from),
            Cursor::Deep16(it) => it.next().copied(),
            Cursor::Inline8(it) => it.next().map(u16::from),
            Cursor::Inline16(it) => it.next(),
            Cursor::Native { handle, index, len } => {
                if *index == *len {
                    return None;
                }
                let unit = handle.unit_at(*index);
                *index += 1;
                Some(unit)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match &self.cursor {
            Cursor::Deep8(it) => it.len(),
            Cursor::Deep16(it) => it.len(),
            Cursor::Inline8(it) => it.len(),
            Cursor::Inline16(it) => it.len(),
            Cursor::Native { index, len, .. } => len - index,
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Units<'_> {}
