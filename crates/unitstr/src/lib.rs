//! Code-unit storage engine for UTF-16 text, with small-string inlining,
//! borrow-preserving views, copy-on-write heap buffers and a foreign-string
//! bridge behind one value type, [`UnitString`].

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod bridge;
mod concat;
mod error;
mod heap;
mod inline;
mod iter;
mod repr;
mod string;
mod unit;
mod unowned;

#[cfg(test)]
mod tests;

pub use bridge::NativeString;
pub use error::DecodeUtf16Error;
pub use iter::Units;
#[cfg(any(test, feature = "fuzzing"))]
pub use repr::ReprKind;
pub use string::UnitString;
