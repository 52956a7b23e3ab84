//! Code-unit width abstraction shared by the packed and heap buffers.
//!
//! A code unit is a fixed-width storage atom of encoded text: 8-bit Latin-1
//! or a 16-bit UTF-16 unit. The storage engine treats units as opaque
//! numbers; interpretation (pairing surrogates, grapheme boundaries, ...) is
//! a layer above.

use core::fmt::Debug;

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
}

/// A fixed-width code unit. Implemented for `u8` and `u16` only.
pub trait CodeUnit: sealed::Sealed + Copy + Eq + Ord + Debug + 'static {
    /// Width of one unit in bits.
    const BITS: u32;

    /// Per-lane mask selecting the bits that are set when a unit in a packed
    /// 64-bit word exceeds 0x7F.
    const ASCII_LANE_MASK: u64;

    /// Per-lane mask selecting the bits that are set when a unit in a packed
    /// 64-bit word exceeds 0xFF. Zero for 8-bit units, which are Latin-1 by
    /// construction.
    const LATIN1_LANE_MASK: u64;

    /// Widening conversion; lossless for both unit widths.
    fn into_u16(self) -> u16;

    /// Narrowing conversion; `None` when `u` does not fit this width.
    fn from_u16(u: u16) -> Option<Self>;

    /// Truncating extraction of the low bits of a packed word pair.
    fn from_bits_truncated(bits: u128) -> Self;
}

impl CodeUnit for u8 {
    const BITS: u32 = 8;
    const ASCII_LANE_MASK: u64 = 0x8080_8080_8080_8080;
    const LATIN1_LANE_MASK: u64 = 0;

    #[inline]
    fn into_u16(self) -> u16 {
        u16::from(self)
    }

    #[inline]
    fn from_u16(u: u16) -> Option<Self> {
        u8::try_from(u).ok()
    }

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    fn from_bits_truncated(bits: u128) -> Self {
        bits as u8
    }
}

impl CodeUnit for u16 {
    const BITS: u32 = 16;
    const ASCII_LANE_MASK: u64 = 0xFF80_FF80_FF80_FF80;
    const LATIN1_LANE_MASK: u64 = 0xFF00_FF00_FF00_FF00;

    #[inline]
    fn into_u16(self) -> u16 {
        self
    }

    #[inline]
    fn from_u16(u: u16) -> Option<Self> {
        Some(u)
    }

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    fn from_bits_truncated(bits: u128) -> Self {
        bits as u16
    }
}
