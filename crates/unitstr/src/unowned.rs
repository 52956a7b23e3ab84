//! Borrowed (non-owning) views into externally managed code-unit memory.

use core::{fmt, ptr::NonNull, slice};

use crate::unit::CodeUnit;

/// A pointer + length view of code units the engine does not own, with
/// cached classification flags supplied by the producer.
///
/// The view carries no lifetime: the referenced memory must outlive every
/// value holding a copy of this descriptor. That contract belongs to whoever
/// constructed it (see [`crate::UnitString::from_borrowed_latin1`]); the
/// engine never verifies it at runtime.
pub(crate) struct Unowned<U: CodeUnit> {
    start: NonNull<U>,
    count: u32,
    pub(crate) is_ascii: Option<bool>,
    pub(crate) is_nul_terminated: bool,
}

impl<U: CodeUnit> Clone for Unowned<U> {
    fn clone(&self) -> Self {
        *self
    }
}
// Copying duplicates the descriptor, never the referenced units.
impl<U: CodeUnit> Copy for Unowned<U> {}

impl<U: CodeUnit> Unowned<U> {
    /// Wraps `units`, or `None` when its length does not fit the 32-bit
    /// count field.
    pub(crate) fn from_slice(
        units: &[U],
        is_ascii: Option<bool>,
        is_nul_terminated: bool,
    ) -> Option<Self> {
        let count = u32::try_from(units.len()).ok()?;
        // Slice pointers are never null, including for empty slices.
        let start = NonNull::new(units.as_ptr().cast_mut())?;
        Some(Self {
            start,
            count,
            is_ascii,
            is_nul_terminated,
        })
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.count as usize
    }

    /// Reconstitutes the borrowed slice.
    ///
    /// # Safety
    ///
    /// The memory this descriptor was created over must still be live and
    /// unchanged, and must remain so for the caller-chosen lifetime `'a`.
    #[inline]
    pub(crate) unsafe fn as_slice<'a>(&self) -> &'a [U] {
        // SAFETY: upheld by the caller per the type-level contract.
        unsafe { slice::from_raw_parts(self.start.as_ptr(), self.len()) }
    }
}

impl<U: CodeUnit> fmt::Debug for Unowned<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unowned")
            .field("start", &self.start)
            .field("count", &self.count)
            .field("is_ascii", &self.is_ascii)
            .field("is_nul_terminated", &self.is_nul_terminated)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Unowned;

    #[test]
    fn wraps_and_reads_back() {
        let data: &[u16] = &[1, 2, 3];
        let view = Unowned::from_slice(data, None, false).unwrap();
        assert_eq!(view.len(), 3);
        // SAFETY: `data` outlives `view`.
        assert_eq!(unsafe { view.as_slice() }, data);
    }

    #[test]
    fn descriptor_copy_aliases_the_same_memory() {
        let data: &[u8] = b"abc";
        let a = Unowned::from_slice(data, Some(true), true).unwrap();
        let b = a;
        // SAFETY: `data` outlives both copies.
        assert_eq!(unsafe { a.as_slice() }.as_ptr(), unsafe {
            b.as_slice().as_ptr()
        });
    }
}
