//! The public value type and its mutation policy.
//!
//! Reads never observe the backing strategy: iteration, indexing and bulk
//! copy-out produce the same unit sequence for every representation.
//! Mutations evaluate the current variant and either mutate in place (value
//! inline storage, or a uniquely referenced heap buffer with room) or
//! rebuild through the lazy three-way splice and re-classify, which is what
//! guarantees width-narrowing opportunities are never missed.
//!
//! Capacity policy: before an append, growth is reserved up front —
//! `max(needed, 2 * len)` — so repeated single-unit appends cost amortized
//! O(1). When the incoming units are known to contain one above 0xFF, the
//! reallocation widens to 16-bit storage in the same move instead of
//! copying twice.

use alloc::{string::String, sync::Arc};
use core::{fmt, hash, ops::Range};

use crate::{
    bridge::NativeString,
    concat::{Concat3, Source16},
    error::DecodeUtf16Error,
    heap::HeapBuffer,
    inline::Inline,
    iter::Units,
    repr::Repr,
};

#[cfg(any(test, feature = "fuzzing"))]
use crate::repr::ReprKind;

/// A sequence of UTF-16 code units stored in the cheapest of six backing
/// strategies: packed inline (8- or 16-bit), borrowed external memory,
/// shared Latin-1 or UTF-16 heap buffers, or a bridged foreign string.
///
/// The representation is an optimization, never observable through reads.
/// Code units are opaque numbers here: no normalization, collation or
/// grapheme logic.
///
/// # Examples
///
/// ```
/// use unitstr::UnitString;
///
/// let mut s = UnitString::from("abc");
/// assert_eq!(s.len(), 3);
/// assert_eq!(s.is_ascii(), Some(true));
///
/// s.push(0x2603); // ☃ forces a 16-bit representation
/// assert_eq!(s.units().last(), Some(0x2603));
/// ```
#[derive(Clone, Default)]
pub struct UnitString {
    pub(crate) repr: Repr,
}

impl UnitString {
    /// Creates an empty value (inline, no allocation).
    #[must_use]
    pub fn new() -> Self {
        Self {
            repr: Repr::Inline8(Inline::empty()),
        }
    }

    /// Classifies `units` into the narrowest fitting representation.
    #[must_use]
    pub fn from_utf16_units(units: &[u16]) -> Self {
        Self {
            repr: Repr::classify(&units, 0),
        }
    }

    /// Classifies 8-bit `units`: inline when short, else a Latin-1 buffer.
    #[must_use]
    pub fn from_latin1_units(units: &[u8]) -> Self {
        Self {
            repr: Repr::from_latin1(units, 0, None),
        }
    }

    /// Wraps a foreign string handle; reads go through the capability
    /// contract, using its zero-copy view when one exists.
    #[must_use]
    pub fn from_native(handle: Arc<dyn NativeString>) -> Self {
        Self {
            repr: Repr::Native(handle),
        }
    }

    /// Borrow-preserving construction from externally owned 8-bit units.
    /// Short sources are copied inline; otherwise the value only records
    /// the pointer and length.
    ///
    /// # Safety
    ///
    /// The memory behind `units` must remain live and unchanged for as long
    /// as the returned value *or any clone of it* exists. The engine does
    /// not check this at runtime.
    #[must_use]
    pub unsafe fn from_borrowed_latin1(
        units: &[u8],
        is_ascii: Option<bool>,
        is_nul_terminated: bool,
    ) -> Self {
        Self {
            repr: Repr::from_borrowed_latin1(units, is_ascii, is_nul_terminated),
        }
    }

    /// Borrow-preserving construction from externally owned 16-bit units.
    ///
    /// # Safety
    ///
    /// Same contract as [`Self::from_borrowed_latin1`].
    #[must_use]
    pub unsafe fn from_borrowed_utf16(
        units: &[u16],
        is_ascii: Option<bool>,
        is_nul_terminated: bool,
    ) -> Self {
        Self {
            repr: Repr::from_borrowed_utf16(units, is_ascii, is_nul_terminated),
        }
    }

    /// Number of code units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.repr.len()
    }

    /// `true` when [`Self::len`] is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Units the value can hold before its next reallocation. Borrowed and
    /// bridged representations report their length: they have no spare room
    /// and any growth reallocates.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.repr.capacity()
    }

    /// Code unit at `index`, widened to 16 bits.
    ///
    /// # Panics
    ///
    /// Panics when `index >= len()`.
    #[must_use]
    pub fn get(&self, index: usize) -> u16 {
        assert!(index < self.len(), "code unit index out of range");
        self.repr.get(index)
    }

    /// Whether every unit is at most 0x7F. `None` when the backing store
    /// has no cached answer (bridged handles, a buffer whose cache was
    /// invalidated by an in-place replacement).
    #[must_use]
    pub fn is_ascii(&self) -> Option<bool> {
        self.repr.is_ascii()
    }

    /// Whether every unit is at most 0xFF. `None` when the backing store
    /// has no cached answer.
    #[must_use]
    pub fn is_latin1(&self) -> Option<bool> {
        self.repr.is_latin1()
    }

    /// Iterates the code units, widened to `u16`.
    #[must_use]
    pub fn units(&self) -> Units<'_> {
        Units::new(self)
    }

    /// Zero-copy view of the 8-bit units, when the current representation
    /// has one (Latin-1 buffer or borrowed 8-bit memory).
    #[must_use]
    pub fn as_latin1(&self) -> Option<&[u8]> {
        self.repr.existing_latin1()
    }

    /// Zero-copy view of the 16-bit units, when the current representation
    /// has one (UTF-16 buffer, borrowed 16-bit memory, or a bridged handle
    /// exposing its fast path).
    #[must_use]
    pub fn as_utf16(&self) -> Option<&[u16]> {
        self.repr.existing_utf16()
    }

    /// Bulk-copies up to `dst.len()` units into `dst`, contiguously where
    /// the representation allows, per unit otherwise. Returns an iterator
    /// resuming after the copied prefix and the number of units copied.
    pub fn copy_into<'a>(&'a self, dst: &mut [u16]) -> (Units<'a>, usize) {
        let n = self.len().min(dst.len());
        if let Some(units) = self.repr.existing_utf16() {
            dst[..n].copy_from_slice(&units[..n]);
        } else if let Some(units) = self.repr.existing_latin1() {
            for (d, &s) in dst[..n].iter_mut().zip(&units[..n]) {
                *d = u16::from(s);
            }
        } else {
            // Inline or slow bridged access.
            for (d, s) in dst[..n].iter_mut().zip(self.units()) {
                *d = s;
            }
        }
        (Units::with_offset(self, n), n)
    }

    /// Ensures at least `min_capacity` units of room, reallocating into a
    /// uniquely held buffer when the current storage is too small or
    /// shared. Borrowed and bridged values with enough reported capacity
    /// are left alone; their first growing write reallocates.
    pub fn reserve(&mut self, min_capacity: usize) {
        if self.capacity() < min_capacity || self.dynamic_storage_unique() == Some(false) {
            self.allocate_capacity(min_capacity, false);
        }
    }

    /// Appends one code unit. A unit above 0xFF promotes 8-bit
    /// representations to 16-bit storage.
    pub fn push(&mut self, unit: u16) {
        self.reserve_for_append(1, Some(unit > 0xFF));
        match &mut self.repr {
            Repr::Inline8(x) if unit <= 0xFF => {
                x.push(truncate_to_u8(unit));
                return;
            }
            Repr::Inline16(x) => {
                x.push(unit);
                return;
            }
            Repr::Latin1(x) if unit <= 0xFF => {
                if let Some(buf) = Arc::get_mut(x) {
                    buf.push_within_capacity(truncate_to_u8(unit));
                    return;
                }
            }
            Repr::Utf16(x) => {
                if let Some(buf) = Arc::get_mut(x) {
                    buf.push_within_capacity(unit);
                    return;
                }
            }
            _ => {}
        }
        // Width mismatch or a reference that appeared since reservation:
        // rebuild (prefix + unit + nothing) and re-classify.
        let end = self.len();
        self.replace_slow(end..end, &[unit]);
    }

    /// Appends every unit of `units`, bulk-copying into reserved room per
    /// variant and falling back to unit-at-a-time appends across width
    /// boundaries.
    pub fn extend_from_slice(&mut self, units: &[u16]) {
        // Exact widening pre-scan: slices are cheap to inspect, and knowing
        // up front avoids allocating a Latin-1 buffer just to throw it away.
        let any_wide = units.iter().any(|&u| u > 0xFF);
        self.reserve_for_append(units.len(), Some(any_wide));

        let mut consumed = 0;
        match &mut self.repr {
            Repr::Inline8(x) => {
                while consumed < units.len()
                    && x.len() < Inline::<u8>::CAPACITY
                    && units[consumed] <= 0xFF
                {
                    x.push(truncate_to_u8(units[consumed]));
                    consumed += 1;
                }
            }
            Repr::Inline16(x) => {
                while consumed < units.len() && x.len() < Inline::<u16>::CAPACITY {
                    x.push(units[consumed]);
                    consumed += 1;
                }
            }
            Repr::Latin1(x) => {
                if let Some(buf) = Arc::get_mut(x) {
                    while consumed < units.len()
                        && units[consumed] <= 0xFF
                        && buf.spare_capacity() > 0
                    {
                        buf.push_within_capacity(truncate_to_u8(units[consumed]));
                        consumed += 1;
                    }
                }
            }
            Repr::Utf16(x) => {
                if let Some(buf) = Arc::get_mut(x) {
                    let n = buf.spare_capacity().min(units.len());
                    buf.extend_within_capacity(&units[..n]);
                    consumed = n;
                }
            }
            _ => {}
        }
        // Whatever could not be written in place (width promotion mid-way,
        // exhausted inline room) goes through the single-unit path.
        while consumed < units.len() {
            self.push(units[consumed]);
            consumed += 1;
        }
    }

    /// Replaces the half-open code-unit range `target` with `new_units`.
    ///
    /// Tries an in-place tail slide on a uniquely held heap buffer; when
    /// that is not possible (shared, borrowed, inline, bridged, width
    /// mismatch or insufficient room) the value is rebuilt from the lazy
    /// splice of (before, new, after) and re-classified, so removing the
    /// last wide unit narrows the representation again.
    ///
    /// # Panics
    ///
    /// Panics when `target` is out of bounds.
    pub fn replace_range(&mut self, target: Range<usize>, new_units: &[u16]) {
        assert!(
            target.start <= target.end && target.end <= self.len(),
            "replace range out of bounds"
        );
        match &mut self.repr {
            Repr::Latin1(x) => {
                if !new_units.iter().any(|&u| u > 0xFF) {
                    if let Some(buf) = Arc::get_mut(x) {
                        let narrowed = new_units.iter().map(|&u| truncate_to_u8(u));
                        if buf.try_replace(target.clone(), narrowed) {
                            return;
                        }
                    }
                }
            }
            Repr::Utf16(x) => {
                if let Some(buf) = Arc::get_mut(x) {
                    if buf.try_replace(target.clone(), new_units.iter().copied()) {
                        return;
                    }
                }
            }
            _ => {}
        }
        self.replace_slow(target, new_units);
    }

    /// Converts to the widest (UTF-16 heap) representation in place.
    /// Content is unchanged; only the backing strategy moves.
    pub fn make_utf16(&mut self) {
        if !matches!(self.repr, Repr::Utf16(_)) {
            self.allocate_capacity(self.len(), true);
        }
    }

    /// `Some(true)`: uniquely held dynamic buffer, writable in place.
    /// `Some(false)`: shared dynamic buffer, any mutation must copy.
    /// `None`: no dynamic storage (inline mutates by value; borrowed and
    /// bridged variants never mutate in place).
    fn dynamic_storage_unique(&self) -> Option<bool> {
        match &self.repr {
            Repr::Latin1(x) => Some(Arc::strong_count(x) == 1 && Arc::weak_count(x) == 0),
            Repr::Utf16(x) => Some(Arc::strong_count(x) == 1 && Arc::weak_count(x) == 0),
            _ => None,
        }
    }

    /// Reserves room for `growth` more units ahead of an append.
    /// `incoming_wide` is the caller's best effort: `Some(true)` forces the
    /// reallocation to widen immediately instead of copying into Latin-1
    /// storage first and promoting one unit later; `None` (opaque
    /// iterators) defers widening to the per-element path.
    fn reserve_for_append(&mut self, growth: usize, incoming_wide: Option<bool>) {
        if growth == 0 {
            return;
        }
        let min_capacity = self.len() + growth;
        let roomy = self.capacity() >= min_capacity && self.dynamic_storage_unique() != Some(false);
        let wide = incoming_wide == Some(true);
        let force_utf16 = match &self.repr {
            // A wide unit won't fit 8-bit lanes: widen in the same move
            // instead of copying narrow first and again one unit later.
            Repr::Latin1(_) | Repr::Unowned8(_) => wide,
            // A roomy 8-bit inline buffer widens through the rebuild path,
            // which re-classifies and keeps short sequences inline.
            Repr::Inline8(_) => wide && !roomy,
            _ => false,
        };
        if roomy && !force_utf16 {
            return;
        }
        self.allocate_capacity(min_capacity.max(2 * self.len()), force_utf16);
    }

    /// Copies into a fresh uniquely-held heap buffer with at least
    /// `min_capacity` units of room, preserving 8-bit width when allowed.
    fn allocate_capacity(&mut self, min_capacity: usize, forcing_utf16: bool) {
        let is_ascii = self.repr.is_ascii();
        let repr = if let Some(units) = self.repr.existing_utf16() {
            Repr::Utf16(HeapBuffer::copying(
                units.iter().copied(),
                min_capacity,
                is_ascii,
            ))
        } else if let Some(units) = self.repr.existing_latin1() {
            if forcing_utf16 {
                Repr::Utf16(HeapBuffer::copying(
                    units.iter().map(|&u| u16::from(u)),
                    min_capacity,
                    is_ascii,
                ))
            } else {
                Repr::Latin1(HeapBuffer::copying(
                    units.iter().copied(),
                    min_capacity,
                    is_ascii,
                ))
            }
        } else if let (Repr::Inline8(x), false) = (&self.repr, forcing_utf16) {
            // All-narrow inline content stays 8-bit in its new buffer.
            Repr::Latin1(HeapBuffer::copying(x.iter(), min_capacity, is_ascii))
        } else {
            // 16-bit inline content or a slow bridged handle: copy unit by
            // unit into wide storage.
            Repr::Utf16(HeapBuffer::copying(
                self.units().collect::<alloc::vec::Vec<u16>>(),
                min_capacity,
                is_ascii,
            ))
        };
        self.repr = repr;
    }

    /// Full reconstruction: splice (before, new, after) lazily and
    /// re-classify into the narrowest representation that fits. Appending
    /// at the end requests doubled capacity for amortization.
    fn replace_slow(&mut self, target: Range<usize>, new_units: &[u16]) {
        let min_capacity = if target.end == self.len() && !new_units.is_empty() {
            self.len() * 2
        } else {
            self.len()
        };
        let repr = if let Some(units) = self.repr.existing_latin1() {
            Repr::classify(
                &Concat3::new(&units[..target.start], new_units, &units[target.end..]),
                min_capacity,
            )
        } else if let Some(units) = self.repr.existing_utf16() {
            Repr::classify(
                &Concat3::new(&units[..target.start], new_units, &units[target.end..]),
                min_capacity,
            )
        } else {
            Repr::classify(
                &Concat3::new(
                    self.slice(0..target.start),
                    new_units,
                    self.slice(target.end..self.len()),
                ),
                min_capacity,
            )
        };
        self.repr = repr;
    }

    fn slice(&self, range: Range<usize>) -> UnitSlice<'_> {
        UnitSlice { value: self, range }
    }

    /// Active backing strategy, exposed so harnesses can steer and check
    /// representation transitions.
    #[cfg(any(test, feature = "fuzzing"))]
    #[must_use]
    pub fn repr_kind(&self) -> ReprKind {
        self.repr.kind()
    }
}

/// A window of a [`UnitString`], used as a splice segment when the backing
/// store exposes no contiguous slice.
struct UnitSlice<'a> {
    value: &'a UnitString,
    range: Range<usize>,
}

impl Source16 for UnitSlice<'_> {
    fn len(&self) -> usize {
        self.range.len()
    }

    fn get(&self, index: usize) -> u16 {
        self.value.repr.get(self.range.start + index)
    }
}

/// Narrowing after a width check; the check is the caller's.
#[allow(clippy::cast_possible_truncation)]
fn truncate_to_u8(unit: u16) -> u8 {
    debug_assert!(unit <= 0xFF);
    unit as u8
}

impl Extend<u16> for UnitString {
    fn extend<T: IntoIterator<Item = u16>>(&mut self, iter: T) {
        let iter = iter.into_iter();
        // `size_hint` is an underestimate; under-reserving just means the
        // per-element path grows again (doubling keeps it amortized O(1)).
        self.reserve_for_append(iter.size_hint().0, None);
        for unit in iter {
            self.push(unit);
        }
    }
}

impl FromIterator<u16> for UnitString {
    fn from_iter<T: IntoIterator<Item = u16>>(iter: T) -> Self {
        let mut s = Self::new();
        s.extend(iter);
        s
    }
}

impl From<&str> for UnitString {
    /// Encodes the scalars of `s` as UTF-16 code units and classifies.
    fn from(s: &str) -> Self {
        s.encode_utf16().collect()
    }
}

impl TryFrom<&UnitString> for String {
    type Error = DecodeUtf16Error;

    /// Decodes the UTF-16 units into UTF-8 text; fails on an unpaired
    /// surrogate.
    fn try_from(s: &UnitString) -> Result<Self, DecodeUtf16Error> {
        let mut out = String::with_capacity(s.len());
        let mut index = 0;
        for decoded in char::decode_utf16(s.units()) {
            match decoded {
                Ok(c) => {
                    index += c.len_utf16();
                    out.push(c);
                }
                Err(_) => return Err(DecodeUtf16Error::UnpairedSurrogate { index }),
            }
        }
        Ok(out)
    }
}

impl PartialEq for UnitString {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.units().eq(other.units())
    }
}

impl Eq for UnitString {}

impl PartialOrd for UnitString {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UnitString {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.units().cmp(other.units())
    }
}

impl hash::Hash for UnitString {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for unit in self.units() {
            state.write_u16(unit);
        }
    }
}

impl fmt::Debug for UnitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.repr, f)
    }
}

impl fmt::Display for UnitString {
    /// Lossy UTF-8 rendering: unpaired surrogates become U+FFFD.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write as _;
        for decoded in char::decode_utf16(self.units()) {
            f.write_char(decoded.unwrap_or(char::REPLACEMENT_CHARACTER))?;
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for UnitString {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let text = String::try_from(self).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for UnitString {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <alloc::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        Ok(UnitString::from(&*text))
    }
}
