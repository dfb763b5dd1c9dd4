//! This file is the root of the `bitmap_codecs` Rust crate.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of our library (`kernels`, `types`, etc.)
//!     so the Rust compiler knows they exist.
//! 2.  Re-exporting the handful of items most callers need.
//!
//! The two codecs are pure, synchronous functions over an owned `BitVector`. No
//! state is shared between calls, so independent columns can be compressed on
//! separate threads without coordination.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod bridge;
pub mod config;
pub mod error;
pub mod kernels;
pub mod traits;
pub mod types;

//==================================================================================
// 2. Re-exports
//==================================================================================
pub use config::{CodecConfig, EmptyInputPolicy};
pub use error::{CodecError, Result};
pub use kernels::{Bbc, Wah};
pub use traits::{BitmapCodec, CompressedResult};
pub use types::{BitVector, CodecKind};
