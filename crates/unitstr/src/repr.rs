//! The tagged union of backing strategies and the narrowest-fit
//! classification policy.

use alloc::sync::Arc;
use core::fmt;

use crate::{
    bridge::NativeString,
    concat::Source16,
    heap::HeapBuffer,
    inline::Inline,
    unowned::Unowned,
};

/// One of six backing strategies (borrowed views are width-split), exactly
/// one active at a time.
///
/// `Clone` bumps reference counts and copies descriptors by value; it never
/// deep-copies borrowed memory.
#[derive(Clone)]
pub(crate) enum Repr {
    Inline8(Inline<u8>),
    Inline16(Inline<u16>),
    Unowned8(Unowned<u8>),
    Unowned16(Unowned<u16>),
    Latin1(Arc<HeapBuffer<u8>>),
    Utf16(Arc<HeapBuffer<u16>>),
    Native(Arc<dyn NativeString>),
}

// The inline payload is two 64-bit words plus a length nibble; the enum adds
// a tag word on top. Pin the whole-value footprint so a variant change can't
// silently grow it.
#[cfg(target_pointer_width = "64")]
const _: () = assert!(core::mem::size_of::<Repr>() <= 24);

impl Default for Repr {
    /// Empty 8-bit inline value; allocation-free.
    fn default() -> Self {
        Repr::Inline8(Inline::empty())
    }
}

impl Repr {
    /// Picks the narrowest representation that fits `src`: inline 8-bit,
    /// then inline 16-bit, then Latin-1, widening to UTF-16 only when some
    /// unit exceeds 0xFF.
    pub(crate) fn classify<S: Source16>(src: &S, min_capacity: usize) -> Repr {
        if let Some(x) = Inline::<u8>::try_from_source(src) {
            return Repr::Inline8(x);
        }
        if let Some(x) = Inline::<u16>::try_from_source(src) {
            return Repr::Inline16(x);
        }
        let max = src.max_unit();
        if max <= 0xFF {
            Repr::Latin1(HeapBuffer::copying(
                src.iter_units().map(truncate_to_u8),
                min_capacity,
                Some(max <= 0x7F),
            ))
        } else {
            Repr::Utf16(HeapBuffer::copying(
                src.iter_units(),
                min_capacity,
                Some(false),
            ))
        }
    }

    /// Classifies an 8-bit source: inline when short, else a Latin-1 buffer.
    pub(crate) fn from_latin1(units: &[u8], min_capacity: usize, is_ascii: Option<bool>) -> Repr {
        if let Some(x) = Inline::<u8>::try_from_source(&units) {
            return Repr::Inline8(x);
        }
        Repr::Latin1(HeapBuffer::copying(
            units.iter().copied(),
            min_capacity,
            is_ascii,
        ))
    }

    /// Borrow-preserving construction from externally owned 8-bit units:
    /// inline when short, a borrow descriptor when representable, a copy
    /// only as a last resort.
    pub(crate) fn from_borrowed_latin1(
        units: &[u8],
        is_ascii: Option<bool>,
        is_nul_terminated: bool,
    ) -> Repr {
        if let Some(x) = Inline::<u8>::try_from_source(&units) {
            return Repr::Inline8(x);
        }
        if let Some(x) = Unowned::from_slice(units, is_ascii, is_nul_terminated) {
            return Repr::Unowned8(x);
        }
        Repr::Latin1(HeapBuffer::copying(units.iter().copied(), 0, is_ascii))
    }

    /// Borrow-preserving construction from externally owned 16-bit units.
    pub(crate) fn from_borrowed_utf16(
        units: &[u16],
        is_ascii: Option<bool>,
        is_nul_terminated: bool,
    ) -> Repr {
        if let Some(x) = Inline::<u8>::try_from_source(&units) {
            return Repr::Inline8(x);
        }
        if let Some(x) = Inline::<u16>::try_from_source(&units) {
            return Repr::Inline16(x);
        }
        if let Some(x) = Unowned::from_slice(units, is_ascii, is_nul_terminated) {
            return Repr::Unowned16(x);
        }
        // Over-long source (count field overflow): fall back to copying at
        // the narrowest width that fits.
        if is_ascii == Some(true) || !units.iter().any(|&u| u > 0xFF) {
            Repr::Latin1(HeapBuffer::copying(
                units.iter().copied().map(truncate_to_u8),
                0,
                is_ascii,
            ))
        } else {
            Repr::Utf16(HeapBuffer::copying(units.iter().copied(), 0, Some(false)))
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            Repr::Inline8(x) => x.len(),
            Repr::Inline16(x) => x.len(),
            Repr::Unowned8(x) => x.len(),
            Repr::Unowned16(x) => x.len(),
            Repr::Latin1(x) => x.len(),
            Repr::Utf16(x) => x.len(),
            Repr::Native(x) => x.len(),
        }
    }

    /// Units the value can hold before reallocating. Borrowed and bridged
    /// variants have no spare room by definition.
    pub(crate) fn capacity(&self) -> usize {
        match self {
            Repr::Inline8(_) => Inline::<u8>::CAPACITY,
            Repr::Inline16(_) => Inline::<u16>::CAPACITY,
            Repr::Unowned8(x) => x.len(),
            Repr::Unowned16(x) => x.len(),
            Repr::Latin1(x) => x.capacity(),
            Repr::Utf16(x) => x.capacity(),
            Repr::Native(x) => x.len(),
        }
    }

    /// Unit at `index`, widened to 16 bits. `index < len()` is the caller's
    /// obligation.
    pub(crate) fn get(&self, index: usize) -> u16 {
        match self {
            Repr::Inline8(x) => u16::from(x.get(index)),
            Repr::Inline16(x) => x.get(index),
            // SAFETY: the borrow contract is held by whoever constructed the
            // unowned variant (see `UnitString::from_borrowed_latin1`).
            Repr::Unowned8(x) => u16::from(unsafe { x.as_slice() }[index]),
            Repr::Unowned16(x) => (unsafe { x.as_slice() })[index],
            Repr::Latin1(x) => u16::from(x.units()[index]),
            Repr::Utf16(x) => x.units()[index],
            Repr::Native(x) => x.unit_at(index),
        }
    }

    /// Zero-copy view of 8-bit units, when this variant has one.
    pub(crate) fn existing_latin1(&self) -> Option<&[u8]> {
        match self {
            Repr::Latin1(x) => Some(x.units()),
            // SAFETY: borrow contract held by the constructor's caller.
            Repr::Unowned8(x) => Some(unsafe { x.as_slice() }),
            _ => None,
        }
    }

    /// Zero-copy view of 16-bit units, when this variant has one. For the
    /// bridged variant this is the foreign object's best-effort fast path.
    pub(crate) fn existing_utf16(&self) -> Option<&[u16]> {
        match self {
            Repr::Utf16(x) => Some(x.units()),
            // SAFETY: borrow contract held by the constructor's caller.
            Repr::Unowned16(x) => Some(unsafe { x.as_slice() }),
            Repr::Native(x) => x.fast_units(),
            _ => None,
        }
    }

    /// Cached or constant-time ASCII test; `None` when unknown (bridged
    /// handles, invalidated caches).
    pub(crate) fn is_ascii(&self) -> Option<bool> {
        match self {
            Repr::Inline8(x) => Some(x.is_ascii()),
            Repr::Inline16(x) => Some(x.is_ascii()),
            Repr::Unowned8(x) => x.is_ascii,
            Repr::Unowned16(x) => x.is_ascii,
            Repr::Latin1(x) => x.is_ascii(),
            Repr::Utf16(x) => x.is_ascii(),
            Repr::Native(_) => None,
        }
    }

    /// Cached or constant-time Latin-1 test; `None` when unknown. 8-bit
    /// variants are Latin-1 by construction.
    pub(crate) fn is_latin1(&self) -> Option<bool> {
        match self {
            Repr::Inline8(_) | Repr::Unowned8(_) | Repr::Latin1(_) => Some(true),
            Repr::Inline16(x) => Some(x.is_latin1()),
            Repr::Utf16(x) => x.is_latin1(),
            // A 16-bit borrow caches no Latin-1 flag, but ASCII implies it.
            Repr::Unowned16(x) => match x.is_ascii {
                Some(true) => Some(true),
                _ => None,
            },
            Repr::Native(_) => None,
        }
    }

    pub(crate) fn kind(&self) -> ReprKind {
        match self {
            Repr::Inline8(_) => ReprKind::Inline8,
            Repr::Inline16(_) => ReprKind::Inline16,
            Repr::Unowned8(_) => ReprKind::Unowned8,
            Repr::Unowned16(_) => ReprKind::Unowned16,
            Repr::Latin1(_) => ReprKind::Latin1,
            Repr::Utf16(_) => ReprKind::Utf16,
            Repr::Native(_) => ReprKind::Native,
        }
    }
}

/// Discriminant-only view of [`Repr`], for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReprKind {
    Inline8,
    Inline16,
    Unowned8,
    Unowned16,
    Latin1,
    Utf16,
    Native,
}

impl fmt::Debug for Repr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Repr::Inline8(x) => f.debug_tuple("Inline8").field(x).finish(),
            Repr::Inline16(x) => f.debug_tuple("Inline16").field(x).finish(),
            Repr::Unowned8(x) => f.debug_tuple("Unowned8").field(x).finish(),
            Repr::Unowned16(x) => f.debug_tuple("Unowned16").field(x).finish(),
            Repr::Latin1(x) => f.debug_tuple("Latin1").field(x).finish(),
            Repr::Utf16(x) => f.debug_tuple("Utf16").field(x).finish(),
            Repr::Native(x) => f.debug_tuple("Native").field(&x.len()).finish(),
        }
    }
}

/// Narrowing after a width check; the check is the caller's.
#[allow(clippy::cast_possible_truncation)]
fn truncate_to_u8(u: u16) -> u8 {
    debug_assert!(u <= 0xFF);
    u as u8
}
