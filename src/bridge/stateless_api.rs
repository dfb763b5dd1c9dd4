// In: src/bridge/stateless_api.rs

use crate::bridge::artifact::CompressedBitmap;
use crate::bridge::format::CompressionStats;
use crate::config::{CodecConfig, EmptyInputPolicy};
use crate::error::CodecError;
use crate::kernels;
use crate::types::BitVector;

/// Compresses a bitmap into a self-describing artifact.
pub fn compress_bitmap(bits: &BitVector, config: &CodecConfig) -> Result<Vec<u8>, CodecError> {
    let result = kernels::dispatch_compress(bits, config)?;
    CompressedBitmap::from_result(result, config.word_size, bits.len()).to_bytes()
}

/// Restores the exact bitmap stored in an artifact written by `compress_bitmap`.
///
/// The decoded length must equal the original length recorded in the header.
pub fn decompress_bitmap(bytes: &[u8]) -> Result<BitVector, CodecError> {
    let artifact = CompressedBitmap::from_bytes(bytes)?;
    let original_bits = artifact.original_bits;

    // An artifact only holds an empty payload if the writer allowed empty input.
    let config = CodecConfig {
        codec: artifact.codec,
        word_size: artifact.word_size,
        empty_input: if artifact.compressed.is_empty() {
            EmptyInputPolicy::Allow
        } else {
            EmptyInputPolicy::Reject
        },
    };
    let decoded = kernels::dispatch_decompress(&artifact.into_result(), &config)?;

    if decoded.len() != original_bits {
        return Err(CodecError::MalformedInput(format!(
            "decoded {} bits but the header records {}",
            decoded.len(),
            original_bits
        )));
    }
    Ok(decoded)
}

/// Analyzes an artifact without decompressing it.
pub fn analyze_bitmap(bytes: &[u8]) -> Result<CompressionStats, CodecError> {
    let info = CompressedBitmap::peek_info(bytes)?;
    let uses_word_size = info.codec.uses_word_size();

    Ok(CompressionStats {
        codec: info.codec,
        word_size: uses_word_size.then_some(info.word_size),
        final_length: info.final_length,
        header_size: info.header_size,
        data_size: info.data_size,
        total_size: bytes.len(),
        original_bits: info.original_bits,
        compressed_bits: info.compressed_bits,
        ratio: if info.compressed_bits == 0 {
            0.0
        } else {
            info.original_bits as f64 / info.compressed_bits as f64
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::types::CodecKind;

    #[test]
    fn test_analyze_bitmap_after_compression() {
        // 1. Arrange: a sparse bitmap with one long gap.
        let mut bits = BitVector::zeros(4000);
        bits.set(3999, true).unwrap();

        // 2. Act: compress with BBC and analyze.
        let bytes = compress_bitmap(&bits, &CodecConfig::for_codec(CodecKind::Bbc)).unwrap();
        let stats = analyze_bitmap(&bytes).unwrap();

        // 3. Assert: the gap collapsed into a single three-byte atom.
        assert_eq!(stats.codec, CodecKind::Bbc);
        assert_eq!(stats.word_size, None);
        assert_eq!(stats.final_length, 8);
        assert_eq!(stats.total_size, bytes.len());
        assert_eq!(stats.header_size + stats.data_size, stats.total_size);
        assert_eq!(stats.original_bits, 4000);
        assert_eq!(stats.compressed_bits, 24);
        assert!(stats.ratio > 100.0);
    }
}
