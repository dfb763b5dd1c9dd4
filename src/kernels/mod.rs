//! This module serves as the public API and dispatcher for the two bitmap codecs.
//!
//! It declares the kernel sub-modules and provides a single `dispatch_compress` /
//! `dispatch_decompress` pair so that drivers can select a codec by name without
//! matching on it themselves.

use crate::config::{CodecConfig, EmptyInputPolicy};
use crate::error::CodecError;
use crate::traits::{BitmapCodec, CompressedResult};
use crate::types::{BitVector, CodecKind};

//==================================================================================
// 1. Module Declarations
//==================================================================================

/// Word-aligned: fixed-size run and literal words.
pub mod wah;

/// Byte-aligned: variable-length atoms of gaps, offset bytes and literals.
pub mod bbc;

pub use bbc::Bbc;
pub use wah::Wah;

//==================================================================================
// 2. Public API (Unified Dispatchers)
//==================================================================================

/// Returns the codec implementation for `kind`.
pub fn codec_for(kind: CodecKind, empty_input: EmptyInputPolicy) -> Box<dyn BitmapCodec> {
    match kind {
        CodecKind::Wah => Box::new(Wah::new(empty_input)),
        CodecKind::Bbc => Box::new(Bbc::new(empty_input)),
    }
}

/// The single, unified dispatcher for all compress operations.
pub fn dispatch_compress(
    bits: &BitVector,
    config: &CodecConfig,
) -> Result<CompressedResult, CodecError> {
    config.validate()?;
    codec_for(config.codec, config.empty_input).compress(bits, Some(config.word_size))
}

/// The single, unified dispatcher for all decompress operations.
pub fn dispatch_decompress(
    compressed: &CompressedResult,
    config: &CodecConfig,
) -> Result<BitVector, CodecError> {
    if compressed.kind() != config.codec {
        return Err(CodecError::MalformedInput(format!(
            "{} stream handed to the {} codec",
            compressed.kind(),
            config.codec
        )));
    }
    config.validate()?;
    codec_for(config.codec, config.empty_input).decompress(
        compressed.bits(),
        Some(config.word_size),
        Some(compressed.final_length()),
    )
}

//==================================================================================
// 3. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_by_name_roundtrip() {
        let original: BitVector = "0000000000000000000000010000000011110000".parse().unwrap();

        for name in ["wah", "bbc"] {
            let config = CodecConfig {
                word_size: 16,
                ..CodecConfig::for_codec(name.parse().unwrap())
            };
            let compressed = dispatch_compress(&original, &config).unwrap();
            assert_eq!(compressed.kind(), config.codec);
            let restored = dispatch_decompress(&compressed, &config).unwrap();
            assert_eq!(restored, original, "codec {}", name);
        }
    }

    #[test]
    fn test_dispatch_roundtrip_unaligned_lengths() {
        for input in ["101", "0000000001", "1111111111111"] {
            let original: BitVector = input.parse().unwrap();
            for kind in [CodecKind::Wah, CodecKind::Bbc] {
                let config = CodecConfig::for_codec(kind);
                let compressed = dispatch_compress(&original, &config).unwrap();
                let restored = dispatch_decompress(&compressed, &config).unwrap();
                assert_eq!(restored, original, "{} on {}", kind, input);
            }
        }
    }

    #[test]
    fn test_dispatch_rejects_mismatched_codec() {
        let original: BitVector = "11110000".parse().unwrap();
        let compressed = dispatch_compress(&original, &CodecConfig::for_codec(CodecKind::Bbc)).unwrap();
        let result = dispatch_decompress(&compressed, &CodecConfig::for_codec(CodecKind::Wah));
        assert!(matches!(result, Err(CodecError::MalformedInput(_))));
    }

    #[test]
    fn test_dispatch_validates_word_size() {
        let config = CodecConfig {
            word_size: 1,
            ..CodecConfig::default()
        };
        let result = dispatch_compress(&"1".parse().unwrap(), &config);
        assert!(matches!(result, Err(CodecError::InvalidWordSize(1))));
    }

    #[test]
    fn test_codec_for_reports_kind() {
        for kind in [CodecKind::Wah, CodecKind::Bbc] {
            assert_eq!(codec_for(kind, EmptyInputPolicy::Reject).kind(), kind);
        }
    }
}
