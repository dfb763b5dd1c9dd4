// In: src/config.rs

//! The single source of truth for all bitmap codec configuration.
//!
//! This module defines the unified `CodecConfig` struct, which is designed to be
//! created once at the application boundary (e.g., from CLI flags or a JSON
//! document) and then passed down by reference to the stateless API.

use serde::{Deserialize, Serialize};

use crate::error::CodecError;
use crate::kernels::wah;
use crate::types::CodecKind;

/// The WAH word size used when none is given.
pub const DEFAULT_WORD_SIZE: usize = 8;

//==================================================================================
// I. Core Configuration Enums & Structs
//==================================================================================

/// Defines how codecs treat a zero-length input.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EmptyInputPolicy {
    /// **Default:** compressing or decompressing zero bits fails with `EmptyInput`.
    #[default]
    Reject,

    /// Empty input is passed through: the result is an empty `BitVector`
    /// (and, for WAH, a final word length equal to the word size).
    Allow,
}

/// The single, unified configuration for a compression operation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct CodecConfig {
    /// Which codec to use.
    #[serde(default)]
    pub codec: CodecKind,

    /// The WAH word size in bits. Ignored by BBC.
    #[serde(default = "default_word_size")]
    pub word_size: usize,

    /// Whether zero-length input is an error or a pass-through.
    #[serde(default)]
    pub empty_input: EmptyInputPolicy,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            codec: CodecKind::default(),
            word_size: default_word_size(),
            empty_input: EmptyInputPolicy::default(),
        }
    }
}

impl CodecConfig {
    /// Convenience constructor for a given codec with all other settings at default.
    pub fn for_codec(codec: CodecKind) -> Self {
        Self {
            codec,
            ..Self::default()
        }
    }

    /// Parses and validates a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self, CodecError> {
        let config: CodecConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks settings that serde cannot express: a WAH word size must lie in
    /// `[2, u32::MAX]`.
    pub fn validate(&self) -> Result<(), CodecError> {
        if self.codec.uses_word_size() {
            wah::check_word_size(self.word_size)?;
        }
        Ok(())
    }
}

/// Helper for `serde` to provide a default for `word_size`.
fn default_word_size() -> usize {
    DEFAULT_WORD_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CodecConfig::default();
        assert_eq!(config.codec, CodecKind::Wah);
        assert_eq!(config.word_size, 8);
        assert_eq!(config.empty_input, EmptyInputPolicy::Reject);
    }

    #[test]
    fn test_from_json_fills_missing_fields() {
        let config = CodecConfig::from_json_str(r#"{"codec": "bbc"}"#).unwrap();
        assert_eq!(config.codec, CodecKind::Bbc);
        assert_eq!(config.word_size, DEFAULT_WORD_SIZE);

        let config =
            CodecConfig::from_json_str(r#"{"word_size": 32, "empty_input": "allow"}"#).unwrap();
        assert_eq!(config.word_size, 32);
        assert_eq!(config.empty_input, EmptyInputPolicy::Allow);
    }

    #[test]
    fn test_validate_rejects_small_wah_word() {
        let result = CodecConfig::from_json_str(r#"{"codec": "wah", "word_size": 1}"#);
        assert!(matches!(result, Err(CodecError::InvalidWordSize(1))));

        let too_wide = format!(r#"{{"codec": "wah", "word_size": {}}}"#, u64::from(u32::MAX) + 1);
        assert!(matches!(
            CodecConfig::from_json_str(&too_wide),
            Err(CodecError::InvalidWordSize(_))
        ));

        // BBC ignores the word size entirely.
        let config = CodecConfig::from_json_str(r#"{"codec": "bbc", "word_size": 0}"#).unwrap();
        assert_eq!(config.codec, CodecKind::Bbc);
    }

    #[test]
    fn test_unknown_codec_name_is_a_json_error() {
        let result = CodecConfig::from_json_str(r#"{"codec": "lz4"}"#);
        assert!(matches!(result, Err(CodecError::SerdeJson(_))));
    }
}
