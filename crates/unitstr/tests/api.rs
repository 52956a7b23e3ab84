//! Exercises the public surface the way an embedder would, without reaching
//! into representation internals.

use std::sync::Arc;

use unitstr::{NativeString, UnitString};

#[test]
fn build_edit_and_read_back() {
    let mut s = UnitString::from("hello");
    s.extend_from_slice(&[0x20, 0x77, 0x6F, 0x72, 0x6C, 0x64]);
    s.replace_range(0..1, &[0x48]);
    assert_eq!(String::try_from(&s).unwrap(), "Hello world");
    assert_eq!(s.is_ascii(), Some(true));
}

#[test]
fn clones_are_value_semantic() {
    let mut a: UnitString = "shared content that is long enough to be heap allocated"
        .encode_utf16()
        .collect();
    let b = a.clone();
    a.replace_range(0..6, "Shared".encode_utf16().collect::<Vec<u16>>().as_slice());
    assert_ne!(a, b);
    assert!(String::try_from(&b).unwrap().starts_with("shared"));
}

#[test]
fn mixed_width_content_promotes_and_narrows() {
    let mut s = UnitString::from("plain ascii text, long enough for a buffer");
    let len = s.len();
    s.push(0x2603);
    assert!(s.as_utf16().is_some());

    // Dropping the only wide unit through a shared handle narrows again.
    let shared = s.clone();
    s.replace_range(len..len + 1, &[]);
    assert!(s.as_latin1().is_some());
    assert_eq!(shared.len(), len + 1);
}

struct Utf16Blob(Vec<u16>);

impl NativeString for Utf16Blob {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn unit_at(&self, index: usize) -> u16 {
        self.0[index]
    }

    fn fast_units(&self) -> Option<&[u16]> {
        Some(&self.0)
    }
}

#[test]
fn bridged_handles_read_like_any_other_value() {
    let text: Vec<u16> = "bridged".encode_utf16().collect();
    let s = UnitString::from_native(Arc::new(Utf16Blob(text.clone())));
    assert_eq!(s.len(), 7);
    assert_eq!(s.units().collect::<Vec<u16>>(), text);
    assert_eq!(s.as_utf16().unwrap(), text.as_slice());
    assert_eq!(String::try_from(&s).unwrap(), "bridged");
}

#[test]
fn bulk_copy_out() {
    let s = UnitString::from("copy me out");
    let mut buf = [0u16; 4];
    let (rest, copied) = s.copy_into(&mut buf);
    assert_eq!(copied, 4);
    assert_eq!(buf, [0x63, 0x6F, 0x70, 0x79]);
    assert_eq!(rest.count(), s.len() - 4);
}

#[test]
fn collections_can_key_on_values() {
    use std::collections::HashSet;

    let mut set = HashSet::new();
    set.insert(UnitString::from("a"));
    set.insert(UnitString::from("b"));
    set.insert(UnitString::from("a"));
    assert_eq!(set.len(), 2);
}
