// In: src/error.rs

//! This module defines the single, unified error type for the entire bitmap-codecs library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.
//!
//! Every error is local to a single call. There is no partial-success mode: a caller
//! that receives an `Err` must discard the whole result.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    // =========================================================================
    // === Codec Errors
    // =========================================================================
    #[error("Invalid word size: {0} (WAH requires a word size between 2 and 2^32 - 1)")]
    InvalidWordSize(usize),

    #[error("Input must contain at least one bit")]
    EmptyInput,

    #[error("Malformed compressed input: {0}")]
    MalformedInput(String),

    #[error("Unknown codec: '{0}' (expected 'wah' or 'bbc')")]
    UnknownCodec(String),

    // =========================================================================
    // === BitVector Errors
    // =========================================================================
    #[error("Index {index} out of range for BitVector of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Unsupported slice step: {0} (only positive steps are implemented)")]
    UnsupportedStep(isize),

    #[error("Invalid bit character: {0:?}")]
    InvalidBitCharacter(char),

    // =========================================================================
    // === Container / External Error Wrappers
    // =========================================================================
    #[error("Artifact serialization/deserialization failed: {0}")]
    FrameFormatError(String),

    /// An error originating from the underlying I/O subsystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library, typically during config parsing.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

/// A specialized `Result` type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
