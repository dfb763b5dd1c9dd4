// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` is the storage-facing API of the library. The kernels produce a
// bare bitstream plus, for WAH, a final word length that the stream cannot
// describe on its own. The bridge packs both into one self-describing artifact.
//
// Data Flow (Compression):
//
//   1. [Stateless API (compress_bitmap)]    -> Receives `&BitVector` + `&CodecConfig`
//         |
//         `-> calls `kernels::dispatch_compress` -> `CompressedResult`
//
//   2. [Artifact (CompressedBitmap)]        -> Adds codec, word size, final length,
//                                              original bit length; returns `Vec<u8>`
//
// Data Flow (Decompression):
//
//   1. [Artifact (CompressedBitmap)]        -> Receives `&[u8]`, validates the header
//
//   2. [Stateless API (decompress_bitmap)]  -> Rebuilds the config from the header,
//                                              calls `kernels::dispatch_decompress`,
//                                              trims byte padding to the original length
//
// ====================================================================================
pub mod artifact;
pub mod format;
pub mod stateless_api;

// --- Low-Level Stateless API ---
pub use stateless_api::{analyze_bitmap, compress_bitmap, decompress_bitmap};

// --- Format Constants and Structs ---
pub use artifact::{CompressedBitmap, HeaderInfo};
pub use format::CompressionStats;
