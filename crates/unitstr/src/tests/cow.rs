//! Copy-on-write discipline: clones share until one side writes.

use alloc::vec::Vec;

use crate::{UnitString, repr::ReprKind};

#[test]
fn clones_share_the_heap_buffer() {
    let a = UnitString::from_utf16_units(&[0x61; 32]);
    let b = a.clone();
    assert_eq!(
        a.as_latin1().unwrap().as_ptr(),
        b.as_latin1().unwrap().as_ptr()
    );
}

#[test]
fn writing_through_one_clone_leaves_the_other_alone() {
    let mut a = UnitString::from_utf16_units(&[0x61; 32]);
    let b = a.clone();

    a.push(0x62);

    assert_eq!(a.len(), 33);
    assert_eq!(b.len(), 32);
    assert_eq!(b.units().collect::<Vec<u16>>(), [0x61; 32]);
    // The writer moved to its own buffer; the clone still owns the old one.
    assert_ne!(
        a.as_latin1().unwrap().as_ptr(),
        b.as_latin1().unwrap().as_ptr()
    );
}

#[test]
fn replace_through_a_shared_buffer_rebuilds() {
    let mut units: Vec<u16> = (0x30..0x40).collect();
    units.push(0x2603);
    let mut a = UnitString::from_utf16_units(&units);
    assert_eq!(a.repr_kind(), ReprKind::Utf16);
    let b = a.clone();

    // Overwriting the only wide unit through a shared buffer cannot mutate
    // in place; the rebuild re-classifies and narrows.
    a.replace_range(16..17, &[0x40]);

    assert_eq!(a.repr_kind(), ReprKind::Latin1);
    assert_eq!(a.is_ascii(), Some(true));
    assert_eq!(b.get(16), 0x2603);
    assert_eq!(b.repr_kind(), ReprKind::Utf16);
}

#[test]
fn unique_buffers_mutate_in_place() {
    let mut s = UnitString::new();
    s.reserve(64);
    assert_eq!(s.repr_kind(), ReprKind::Latin1);
    let ptr = s.as_latin1().unwrap().as_ptr();

    for _ in 0..64 {
        s.push(0x61);
    }
    assert_eq!(s.len(), 64);
    assert_eq!(s.as_latin1().unwrap().as_ptr(), ptr);
}

#[test]
fn inline_clones_are_trivially_independent() {
    let mut a = UnitString::from("abc");
    let b = a.clone();
    a.push(0x64);
    assert_eq!(a.len(), 4);
    assert_eq!(b.len(), 3);
}

#[test]
fn reserve_unshares_before_handing_out_capacity() {
    let mut a = UnitString::from_utf16_units(&[0x61; 32]);
    let b = a.clone();

    a.reserve(33);

    // `a` now holds a unique buffer; appending through it must not be
    // visible to `b`.
    assert_ne!(
        a.as_latin1().unwrap().as_ptr(),
        b.as_latin1().unwrap().as_ptr()
    );
    a.push(0x7A);
    assert_eq!(b.len(), 32);
}
