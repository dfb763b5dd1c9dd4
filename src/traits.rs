//! This module defines the shared contract both bitmap codecs implement, so callers
//! can dispatch by name without knowing which codec they hold.

use crate::error::CodecError;
use crate::types::{BitVector, CodecKind};

/// The output of a compression call.
///
/// Neither stream records how many bits of its last unit carry data, so that
/// count travels alongside the bits and must be persisted with them: the
/// meaningful bits of the final WAH word (header included), or of the final
/// input byte for BBC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompressedResult {
    Wah {
        bits: BitVector,
        /// Number of meaningful bits (header included) in the last word.
        final_length: usize,
    },
    Bbc {
        bits: BitVector,
        /// Number of input bits (1..=8) in the last encoded byte.
        final_length: usize,
    },
}

impl CompressedResult {
    pub fn bits(&self) -> &BitVector {
        match self {
            Self::Wah { bits, .. } | Self::Bbc { bits, .. } => bits,
        }
    }

    pub fn into_bits(self) -> BitVector {
        match self {
            Self::Wah { bits, .. } | Self::Bbc { bits, .. } => bits,
        }
    }

    pub fn final_length(&self) -> usize {
        match self {
            Self::Wah { final_length, .. } | Self::Bbc { final_length, .. } => *final_length,
        }
    }

    pub fn kind(&self) -> CodecKind {
        match self {
            Self::Wah { .. } => CodecKind::Wah,
            Self::Bbc { .. } => CodecKind::Bbc,
        }
    }
}

/// A lossless bitmap codec.
///
/// `word_size` is only meaningful to word-aligned codecs. `final_length` is the
/// value carried by `CompressedResult`; when it is `None` the last unit is
/// assumed to be full.
pub trait BitmapCodec: Send + Sync {
    fn kind(&self) -> CodecKind;

    fn compress(
        &self,
        bits: &BitVector,
        word_size: Option<usize>,
    ) -> Result<CompressedResult, CodecError>;

    fn decompress(
        &self,
        compressed: &BitVector,
        word_size: Option<usize>,
        final_length: Option<usize>,
    ) -> Result<BitVector, CodecError>;
}
