use thiserror::Error;

/// Error converting a [`crate::UnitString`] into UTF-8 text.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DecodeUtf16Error {
    /// A UTF-16 surrogate half without its pair, at the given code-unit
    /// offset.
    #[error("unpaired surrogate at code unit {index}")]
    UnpairedSurrogate {
        /// Code-unit offset of the lone surrogate.
        index: usize,
    },
}
