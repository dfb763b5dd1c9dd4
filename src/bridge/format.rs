// In: src/bridge/format.rs

//! Defines all on-disk structures and constants for the compressed bitmap artifact.
//! This is the single source of truth for the container layout written by
//! `stateless_api::compress_bitmap`.

use serde::{Deserialize, Serialize};

use crate::types::CodecKind;

/// The magic number to identify a compressed bitmap artifact.
pub const ARTIFACT_MAGIC: &[u8; 4] = b"BMCX";
/// The current version of the artifact format.
pub const ARTIFACT_FORMAT_VERSION: u16 = 1;

/// Size of the fixed header:
/// magic(4) + ver(2) + codec(1) + word_size(4) + final_len(4) + bit_len(8) + comp_bits(8)
pub const HEADER_SIZE: usize = 31;

/// The public-facing struct for compression analysis results, returned by
/// `analyze_bitmap`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CompressionStats {
    pub codec: CodecKind,
    /// `None` for codecs that do not use a word size.
    pub word_size: Option<usize>,
    /// Meaningful bits in the last WAH word, or in the last input byte for BBC.
    pub final_length: usize,
    pub header_size: usize,
    pub data_size: usize,
    pub total_size: usize,
    pub original_bits: usize,
    pub compressed_bits: usize,
    /// `original_bits / compressed_bits`; `0.0` when nothing was compressed.
    pub ratio: f64,
}
