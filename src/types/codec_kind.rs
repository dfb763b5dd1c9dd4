//! This module defines the canonical, type-safe name of each bitmap codec.

use crate::error::CodecError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies one of the two bitmap codecs.
///
/// This enum replaces string-based codec names at every boundary (config, CLI,
/// artifact header) so an unknown name is rejected once, up front.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CodecKind {
    /// Word-Aligned Hybrid.
    #[default]
    Wah,
    /// Byte-aligned Bitmap Code.
    Bbc,
}

impl CodecKind {
    /// The single-byte identifier stored in an artifact header.
    pub fn to_id(self) -> u8 {
        match self {
            Self::Wah => 0,
            Self::Bbc => 1,
        }
    }

    /// Converts an artifact header identifier back into a `CodecKind`.
    pub fn from_id(id: u8) -> Result<Self, CodecError> {
        match id {
            0 => Ok(Self::Wah),
            1 => Ok(Self::Bbc),
            other => Err(CodecError::FrameFormatError(format!(
                "Unknown codec id in header: {}",
                other
            ))),
        }
    }

    /// Returns `true` if the codec's output depends on a word size.
    pub fn uses_word_size(self) -> bool {
        matches!(self, Self::Wah)
    }
}

impl FromStr for CodecKind {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wah" => Ok(Self::Wah),
            "bbc" => Ok(Self::Bbc),
            _ => Err(CodecError::UnknownCodec(s.to_string())),
        }
    }
}

/// Provides the canonical upper-case name for a `CodecKind`.
impl fmt::Display for CodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wah => f.write_str("WAH"),
            Self::Bbc => f.write_str("BBC"),
        }
    }
}
