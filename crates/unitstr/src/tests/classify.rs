//! Narrowest-fit classification and borrow-preserving construction.

use alloc::{sync::Arc, vec::Vec};

use rstest::*;

use crate::{NativeString, UnitString, repr::ReprKind};

#[rstest]
// 15 or fewer narrow units pack inline at 8-bit width.
#[case(&[0x61, 0x62, 0x63], ReprKind::Inline8)]
#[case(&[0xE9; 15], ReprKind::Inline8)]
// A wide unit forces 16-bit lanes; 7 or fewer still fit inline.
#[case(&[0x2603], ReprKind::Inline16)]
#[case(&[0x100; 7], ReprKind::Inline16)]
// Too long for either inline width, all narrow: Latin-1 heap buffer.
#[case(&[0x61; 16], ReprKind::Latin1)]
#[case(&[0xFF; 100], ReprKind::Latin1)]
// Too long for inline 16-bit with a wide unit: UTF-16 heap buffer.
#[case(&[0x2603; 8], ReprKind::Utf16)]
fn narrowest_fit(#[case] units: &[u16], #[case] expected: ReprKind) {
    let s = UnitString::from_utf16_units(units);
    assert_eq!(s.repr_kind(), expected);
    assert_eq!(s.len(), units.len());
    assert_eq!(s.units().collect::<Vec<u16>>(), units);
}

#[test]
fn empty_is_inline_and_allocation_free() {
    let s = UnitString::new();
    assert_eq!(s.repr_kind(), ReprKind::Inline8);
    assert!(s.is_empty());
    assert_eq!(s.is_ascii(), Some(true));
    assert_eq!(s.units().next(), None);
}

#[test]
fn from_str_encodes_scalars() {
    let s = UnitString::from("héllo");
    assert_eq!(s.repr_kind(), ReprKind::Inline8);
    assert_eq!(
        s.units().collect::<Vec<u16>>(),
        [0x68, 0xE9, 0x6C, 0x6C, 0x6F]
    );
    assert_eq!(s.is_ascii(), Some(false));

    // A non-BMP scalar becomes a surrogate pair of units.
    let snow = UnitString::from("a𝄞");
    assert_eq!(snow.len(), 3);
    assert_eq!(snow.get(1), 0xD834);
    assert_eq!(snow.get(2), 0xDD1E);
}

#[test]
fn latin1_construction_skips_the_wide_check() {
    let short = UnitString::from_latin1_units(b"abc");
    assert_eq!(short.repr_kind(), ReprKind::Inline8);

    let long = UnitString::from_latin1_units(&[0xA0; 40]);
    assert_eq!(long.repr_kind(), ReprKind::Latin1);
    assert_eq!(long.is_ascii(), Some(false));
    assert_eq!(long.get(39), 0xA0);
}

#[test]
fn borrowed_latin1_preserves_the_borrow() {
    let data: Vec<u8> = (0..64).map(|i| 0x40 + i).collect();
    // SAFETY: `data` outlives `s` and is never mutated.
    let s = unsafe { UnitString::from_borrowed_latin1(&data, Some(true), false) };
    assert_eq!(s.repr_kind(), ReprKind::Unowned8);
    assert_eq!(s.len(), 64);
    assert_eq!(s.capacity(), 64);
    // Zero-copy: the view aliases the caller's memory.
    assert_eq!(s.as_latin1().unwrap().as_ptr(), data.as_ptr());
}

#[test]
fn borrowed_short_sources_copy_inline() {
    let data = *b"tiny";
    // SAFETY: trivially outlives `s`; inline copy drops the borrow anyway.
    let s = unsafe { UnitString::from_borrowed_latin1(&data, None, false) };
    assert_eq!(s.repr_kind(), ReprKind::Inline8);
    assert_eq!(s.units().collect::<Vec<u16>>(), [0x74, 0x69, 0x6E, 0x79]);
}

#[test]
fn borrowed_utf16_preserves_the_borrow() {
    let data: Vec<u16> = (0x2600..0x2640).collect();
    // SAFETY: `data` outlives `s` and is never mutated.
    let s = unsafe { UnitString::from_borrowed_utf16(&data, Some(false), false) };
    assert_eq!(s.repr_kind(), ReprKind::Unowned16);
    assert_eq!(s.as_utf16().unwrap().as_ptr(), data.as_ptr());
    assert_eq!(s.get(1), 0x2601);
}

/// Handle with no contiguous view; reads must go unit by unit.
struct Opaque(Vec<u16>);

impl NativeString for Opaque {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn unit_at(&self, index: usize) -> u16 {
        self.0[index]
    }
}

#[test]
fn bridged_slow_path_reads_per_unit() {
    let s = UnitString::from_native(Arc::new(Opaque((10..20).collect())));
    assert_eq!(s.repr_kind(), ReprKind::Native);
    assert_eq!(s.len(), 10);
    assert_eq!(s.get(3), 13);
    assert_eq!(s.as_utf16(), None);
    assert_eq!(s.is_ascii(), None);
    assert_eq!(s.units().collect::<Vec<u16>>(), (10..20).collect::<Vec<u16>>());
}

#[test]
fn bridged_fast_path_exposes_units() {
    let units = alloc::vec![0x41u16, 0x42, 0x2603];
    let s = UnitString::from_native(Arc::new(units));
    assert_eq!(s.repr_kind(), ReprKind::Native);
    assert_eq!(s.as_utf16().unwrap(), [0x41, 0x42, 0x2603]);
}
