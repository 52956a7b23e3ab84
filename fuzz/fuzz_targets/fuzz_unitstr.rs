#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use unitstr::{ReprKind, UnitString};

/// One mutation step. Indices and ranges are raw and get clamped against the
/// current length, so every decoded sequence is runnable.
#[derive(Debug, Arbitrary)]
enum Op {
    Push(u16),
    Extend(Vec<u16>),
    Replace { start: usize, end: usize, units: Vec<u16> },
    Reserve(u16),
    Snapshot,
    DropSnapshot,
}

fn run(ops: Vec<Op>) {
    let mut s = UnitString::new();
    let mut model: Vec<u16> = Vec::new();
    // Held clones keep buffers shared, steering mutations down the
    // copy-on-write rebuild paths.
    let mut snapshots: Vec<(UnitString, Vec<u16>)> = Vec::new();

    for op in ops {
        match op {
            Op::Push(unit) => {
                s.push(unit);
                model.push(unit);
            }
            Op::Extend(units) => {
                s.extend_from_slice(&units);
                model.extend_from_slice(&units);
            }
            Op::Replace { start, end, units } => {
                let start = start.min(model.len());
                let end = end.min(model.len()).max(start);
                s.replace_range(start..end, &units);
                model.splice(start..end, units.iter().copied());
            }
            Op::Reserve(capacity) => {
                s.reserve(usize::from(capacity));
                assert!(s.capacity() >= usize::from(capacity));
            }
            Op::Snapshot => {
                if snapshots.len() < 8 {
                    snapshots.push((s.clone(), model.clone()));
                }
            }
            Op::DropSnapshot => {
                snapshots.pop();
            }
        }

        assert_eq!(s.len(), model.len());
        assert!(s.units().eq(model.iter().copied()));
        if let Some(flag) = s.is_ascii() {
            assert_eq!(flag, model.iter().all(|&u| u <= 0x7F));
        }
        if let Some(flag) = s.is_latin1() {
            assert_eq!(flag, model.iter().all(|&u| u <= 0xFF));
        }
        match s.repr_kind() {
            ReprKind::Inline8 => assert!(s.len() <= 15),
            ReprKind::Inline16 => assert!(s.len() <= 7),
            ReprKind::Latin1 => assert!(model.iter().all(|&u| u <= 0xFF)),
            _ => {}
        }
    }

    // No mutation of `s` may have leaked into a snapshot.
    for (frozen, frozen_model) in snapshots {
        assert!(frozen.units().eq(frozen_model.iter().copied()));
    }
}

fuzz_target!(|ops: Vec<Op>| run(ops));
