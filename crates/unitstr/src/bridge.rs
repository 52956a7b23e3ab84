//! Capability contract for foreign native string objects.
//!
//! The engine never reimplements platform string bridging; it only consumes
//! this read-only interface. A handle that cannot expose a contiguous view
//! is still usable — reads degrade to per-unit access.

/// Read access to a foreign string object, in UTF-16 code units.
pub trait NativeString {
    /// Number of UTF-16 code units.
    fn len(&self) -> usize;

    /// `true` when [`Self::len`] is zero.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Code unit at `index`. `index < len()` is the caller's obligation.
    fn unit_at(&self, index: usize) -> u16;

    /// Best-effort zero-copy view of the units. Implementations that cannot
    /// provide one cheaply return `None`; they must not materialize a buffer
    /// to satisfy this call.
    fn fast_units(&self) -> Option<&[u16]> {
        None
    }
}

// Sized so it can be coerced behind `Arc<dyn NativeString>`.
impl NativeString for alloc::vec::Vec<u16> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn unit_at(&self, index: usize) -> u16 {
        self[index]
    }

    fn fast_units(&self) -> Option<&[u16]> {
        Some(self)
    }
}
