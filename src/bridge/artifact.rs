//! Defines the self-describing on-disk format for a single compressed bitmap.
//! This module is the single source of truth for serialization, deserialization,
//! and metadata peeking of the artifact.

use std::io::{Cursor, Read, Write};

use crate::bridge::format::{ARTIFACT_FORMAT_VERSION, ARTIFACT_MAGIC, HEADER_SIZE};
use crate::error::CodecError;
use crate::traits::CompressedResult;
use crate::types::{BitVector, CodecKind};

//==================================================================================
// Public Structs
//==================================================================================

/// The metadata held in an artifact's fixed header.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct HeaderInfo {
    pub format_version: u16,
    pub codec: CodecKind,
    /// Zero for codecs without a word size.
    pub word_size: usize,
    /// Meaningful bits in the last WAH word, or in the last input byte for BBC.
    pub final_length: usize,
    /// Bit length of the uncompressed input.
    pub original_bits: usize,
    /// Bit length of the compressed payload, before byte padding.
    pub compressed_bits: usize,
    pub header_size: usize,
    /// Payload size in bytes.
    pub data_size: usize,
}

/// A compressed bitmap together with everything needed to restore it exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedBitmap {
    pub codec: CodecKind,
    pub word_size: usize,
    pub final_length: usize,
    pub original_bits: usize,
    pub compressed: BitVector,
}

//==================================================================================
// Core Implementation
//==================================================================================

impl CompressedBitmap {
    /// Wraps a codec result. `word_size` is recorded only for codecs that use it.
    pub fn from_result(result: CompressedResult, word_size: usize, original_bits: usize) -> Self {
        match result {
            CompressedResult::Wah { bits, final_length } => Self {
                codec: CodecKind::Wah,
                word_size,
                final_length,
                original_bits,
                compressed: bits,
            },
            CompressedResult::Bbc { bits, final_length } => Self {
                codec: CodecKind::Bbc,
                word_size: 0,
                final_length,
                original_bits,
                compressed: bits,
            },
        }
    }

    /// Unwraps back into the codec-level result.
    pub fn into_result(self) -> CompressedResult {
        match self.codec {
            CodecKind::Wah => CompressedResult::Wah {
                bits: self.compressed,
                final_length: self.final_length,
            },
            CodecKind::Bbc => CompressedResult::Bbc {
                bits: self.compressed,
                final_length: self.final_length,
            },
        }
    }

    /// Serializes into the canonical byte layout described in `bridge::format`.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let payload = self.compressed.to_bytes();
        let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());

        buf.write_all(ARTIFACT_MAGIC)?;
        buf.write_all(&ARTIFACT_FORMAT_VERSION.to_le_bytes())?;
        buf.write_all(&[self.codec.to_id()])?;
        buf.write_all(&to_u32(self.word_size, "word size")?.to_le_bytes())?;
        buf.write_all(&to_u32(self.final_length, "final length")?.to_le_bytes())?;
        buf.write_all(&(self.original_bits as u64).to_le_bytes())?;
        buf.write_all(&(self.compressed.len() as u64).to_le_bytes())?;
        buf.write_all(&payload)?;

        Ok(buf)
    }

    /// Deserializes a full artifact, payload included.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let info = Self::peek_info(bytes)?;

        let payload = &bytes[info.header_size..info.header_size + info.data_size];
        let mut compressed = BitVector::from_bytes(payload);
        // Drop the zero padding of the final payload byte.
        compressed >>= compressed.len() - info.compressed_bits;

        Ok(Self {
            codec: info.codec,
            word_size: info.word_size,
            final_length: info.final_length,
            original_bits: info.original_bits,
            compressed,
        })
    }

    /// Parses and validates the fixed header without touching the payload.
    pub fn peek_info(bytes: &[u8]) -> Result<HeaderInfo, CodecError> {
        if bytes.len() < HEADER_SIZE {
            return Err(CodecError::FrameFormatError(format!(
                "Artifact is too small to be valid. Minimum size: {}, got: {}",
                HEADER_SIZE,
                bytes.len()
            )));
        }

        let mut cursor = Cursor::new(bytes);
        let map_err = |e: std::io::Error| CodecError::FrameFormatError(e.to_string());

        let mut magic_buf = [0u8; 4];
        cursor.read_exact(&mut magic_buf).map_err(map_err)?;
        if magic_buf != *ARTIFACT_MAGIC {
            return Err(CodecError::FrameFormatError(
                "Invalid artifact magic number".into(),
            ));
        }

        let mut u16_buf = [0u8; 2];
        cursor.read_exact(&mut u16_buf).map_err(map_err)?;
        let version = u16::from_le_bytes(u16_buf);
        if version != ARTIFACT_FORMAT_VERSION {
            return Err(CodecError::FrameFormatError(format!(
                "Unsupported artifact version: expected {}, got {}",
                ARTIFACT_FORMAT_VERSION, version
            )));
        }

        let mut u8_buf = [0u8; 1];
        cursor.read_exact(&mut u8_buf).map_err(map_err)?;
        let codec = CodecKind::from_id(u8_buf[0])?;

        let mut u32_buf = [0u8; 4];
        cursor.read_exact(&mut u32_buf).map_err(map_err)?;
        let word_size = u32::from_le_bytes(u32_buf) as usize;
        cursor.read_exact(&mut u32_buf).map_err(map_err)?;
        let final_length = u32::from_le_bytes(u32_buf) as usize;

        let mut u64_buf = [0u8; 8];
        cursor.read_exact(&mut u64_buf).map_err(map_err)?;
        let original_bits = to_usize(u64::from_le_bytes(u64_buf))?;
        cursor.read_exact(&mut u64_buf).map_err(map_err)?;
        let compressed_bits = to_usize(u64::from_le_bytes(u64_buf))?;

        let header_size = cursor.position() as usize;
        let data_size = compressed_bits.div_ceil(8);

        // SECURITY: the declared payload must be exactly what follows the header.
        if header_size.saturating_add(data_size) != bytes.len() {
            return Err(CodecError::FrameFormatError(format!(
                "Declared payload of {} bytes does not match the {} bytes present",
                data_size,
                bytes.len() - header_size
            )));
        }

        Ok(HeaderInfo {
            format_version: version,
            codec,
            word_size,
            final_length,
            original_bits,
            compressed_bits,
            header_size,
            data_size,
        })
    }
}

fn to_u32(value: usize, what: &str) -> Result<u32, CodecError> {
    u32::try_from(value).map_err(|_| {
        CodecError::FrameFormatError(format!("{} {} does not fit the header", what, value))
    })
}

fn to_usize(value: u64) -> Result<usize, CodecError> {
    usize::try_from(value).map_err(|_| {
        CodecError::FrameFormatError(format!("bit length {} exceeds addressable memory", value))
    })
}

//==================================================================================
// Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CompressedBitmap {
        CompressedBitmap {
            codec: CodecKind::Wah,
            word_size: 8,
            final_length: 3,
            original_bits: 9,
            compressed: "1000000101100000".parse().unwrap(),
        }
    }

    #[test]
    fn test_artifact_roundtrip() {
        let artifact = sample();
        let bytes = artifact.to_bytes().unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE + 2);
        assert_eq!(&bytes[..4], ARTIFACT_MAGIC);
        assert_eq!(CompressedBitmap::from_bytes(&bytes).unwrap(), artifact);
    }

    #[test]
    fn test_payload_padding_is_dropped() {
        let artifact = CompressedBitmap {
            compressed: "10110".parse().unwrap(),
            ..sample()
        };
        let bytes = artifact.to_bytes().unwrap();
        let info = CompressedBitmap::peek_info(&bytes).unwrap();
        assert_eq!(info.compressed_bits, 5);
        assert_eq!(info.data_size, 1);
        assert_eq!(
            CompressedBitmap::from_bytes(&bytes).unwrap().compressed.to_string(),
            "10110"
        );
    }

    #[test]
    fn test_rejects_bad_headers() {
        let bytes = sample().to_bytes().unwrap();

        assert!(CompressedBitmap::peek_info(&bytes[..10]).is_err());

        let mut bad_magic = bytes.clone();
        bad_magic[0] = b'X';
        assert!(matches!(
            CompressedBitmap::peek_info(&bad_magic),
            Err(CodecError::FrameFormatError(msg)) if msg.contains("magic")
        ));

        let mut bad_version = bytes.clone();
        bad_version[4] = 9;
        assert!(CompressedBitmap::peek_info(&bad_version).is_err());

        let mut bad_codec = bytes.clone();
        bad_codec[6] = 5;
        assert!(CompressedBitmap::peek_info(&bad_codec).is_err());

        let mut truncated = bytes.clone();
        truncated.pop();
        assert!(CompressedBitmap::peek_info(&truncated).is_err());

        let mut trailing = bytes;
        trailing.push(0);
        assert!(CompressedBitmap::peek_info(&trailing).is_err());
    }
}
