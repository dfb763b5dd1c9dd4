//! This module defines the core, strongly-typed values shared by both codecs.
//!
//! It includes the `BitVector` value type that every kernel consumes and produces,
//! and the canonical `CodecKind` enum which replaces string-based codec names.

pub mod bit_vector;
pub mod codec_kind;

// Re-export the main types for easier access.
pub use bit_vector::BitVector;
pub use codec_kind::CodecKind;
