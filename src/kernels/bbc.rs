//! This module contains the pure, stateless kernels for a modified Byte-aligned
//! Bitmap Code (BBC).
//!
//! The stream is a sequence of atoms. Each atom starts with a header byte:
//!
//! ```text
//!   bit  0 1 2 | 3     | 4 5 6 7
//!        gap   | dirty | special
//! ```
//!
//! * `gap` counts whole zero bytes preceding the atom's content. The value 7 means
//!   the real count follows in one extension byte (7..=127) or, when that byte's
//!   leading bit is set, in two bytes holding a 15-bit count (high 7 bits first).
//! * With `dirty` set, the atom stands for one byte with a single set bit and
//!   `special` is that bit's position counted from the left.
//! * Otherwise `special` is the number of literal bytes (0..=15) copied after the
//!   header and any gap extension.
//!
//! Differences from the patented BBC: a 3-bit gap field and a 4-bit special field,
//! an explicit dirty flag instead of a split header, a most-significant-first
//! two-byte gap, and offset bytes are allowed anywhere inside a literal run.
//!
//! Input that does not end on a byte boundary is zero-padded to one before
//! encoding, so decoding returns a whole number of bytes.

use crate::config::EmptyInputPolicy;
use crate::error::CodecError;
use crate::traits::{BitmapCodec, CompressedResult};
use crate::types::{BitVector, CodecKind};

pub const BITS_PER_BYTE: usize = 8;

/// Largest gap the 3-bit header field holds on its own; also the marker for
/// "count continues in extension bytes".
const HEADER_GAP_MAX: usize = 0b111;
/// Largest gap a single extension byte can carry.
const ONE_BYTE_GAP_MAX: usize = 0x7F;
/// Largest gap one atom can encode (15 bits across two extension bytes).
pub const MAX_GAP_BYTES: usize = (1 << 15) - 1;
/// Largest number of literal bytes one atom can carry.
pub const MAX_LITERAL_BYTES: usize = 0b1111;

const DIRTY_FLAG: u8 = 0b0001_0000;
const TWO_BYTE_GAP_FLAG: u8 = 0b1000_0000;

//==================================================================================
// 1. Atom Helpers
//==================================================================================

/// Returns the position, counted from the left, of the only set bit in `byte`, or
/// `None` if `byte` is not an offset byte.
pub fn dirty_bit_pos(byte: u8) -> Option<u8> {
    (byte.count_ones() == 1).then(|| byte.leading_zeros() as u8)
}

/// The number of input bits (1..=8) held by the last byte of a `len`-bit input.
pub fn final_byte_length(len: usize) -> usize {
    match len % BITS_PER_BYTE {
        0 => BITS_PER_BYTE,
        partial => partial,
    }
}

/// Counts the whole zero bytes at the start of `bytes`, capped at `MAX_GAP_BYTES`.
fn gap_length(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .take(MAX_GAP_BYTES)
        .take_while(|&&b| b == 0)
        .count()
}

/// Counts the non-zero bytes at the start of `bytes`, capped at `MAX_LITERAL_BYTES`.
fn literal_length(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .take(MAX_LITERAL_BYTES)
        .take_while(|&&b| b != 0)
        .count()
}

/// Appends one atom to `out`.
///
/// `special` is the dirty bit position when `is_dirty`, otherwise the literal count,
/// which must equal `literals.len()`.
fn write_atom(out: &mut Vec<u8>, gaps: usize, is_dirty: bool, special: u8, literals: &[u8]) {
    debug_assert!(gaps <= MAX_GAP_BYTES);
    debug_assert!(special as usize <= MAX_LITERAL_BYTES);
    debug_assert!(is_dirty || special as usize == literals.len());

    let header_gap = gaps.min(HEADER_GAP_MAX) as u8;
    let dirty = if is_dirty { DIRTY_FLAG } else { 0 };
    out.push((header_gap << 5) | dirty | special);

    if gaps >= HEADER_GAP_MAX {
        if gaps <= ONE_BYTE_GAP_MAX {
            out.push(gaps as u8);
        } else {
            out.push(TWO_BYTE_GAP_FLAG | (gaps >> 8) as u8);
            out.push((gaps & 0xFF) as u8);
        }
    }

    if !is_dirty {
        out.extend_from_slice(literals);
    }
}

/// A cursor over whole bytes of a compressed stream.
struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn is_exhausted(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn take(&mut self, count: usize, what: &str) -> Result<&'a [u8], CodecError> {
        let end = self.pos + count;
        let slice = self.bytes.get(self.pos..end).ok_or_else(|| {
            CodecError::MalformedInput(format!(
                "expected {} byte(s) of {} at byte {}, only {} remain",
                count,
                what,
                self.pos,
                self.bytes.len() - self.pos
            ))
        })?;
        self.pos = end;
        Ok(slice)
    }

    fn read_u8(&mut self, what: &str) -> Result<u8, CodecError> {
        Ok(self.take(1, what)?[0])
    }
}

//==================================================================================
// 2. Public API
//==================================================================================

/// Compresses `bits` into a stream of BBC atoms.
pub fn compress(bits: &BitVector) -> Result<BitVector, CodecError> {
    if bits.is_empty() {
        return Err(CodecError::EmptyInput);
    }

    log::info!(
        "Compressing {} bits ({} set) with BBC",
        bits.len(),
        bits.count_ones()
    );
    log::trace!("Bits: {}", bits);

    let trailing = bits.len() % BITS_PER_BYTE;
    if trailing != 0 {
        log::debug!(
            "Padding final partial byte with {} zero bits",
            BITS_PER_BYTE - trailing
        );
    }
    // `to_bytes` zero-pads the final partial byte.
    let input = bits.to_bytes();

    let mut result = Vec::with_capacity(input.len() + 1);
    let mut pos = 0;
    let mut atom_count = 0usize;

    while pos < input.len() {
        let gaps = gap_length(&input[pos..]);
        pos += gaps;

        // An offset byte directly followed by more non-zero content is kept inside
        // the literal run instead of getting its own atom.
        let offset_as_literal = input.get(pos + 1).is_some_and(|&b| b != 0);
        let dirty_bit = input
            .get(pos)
            .and_then(|&b| dirty_bit_pos(b))
            .filter(|_| !offset_as_literal);

        if let Some(bit) = dirty_bit {
            write_atom(&mut result, gaps, true, bit, &[]);
            pos += 1;
            log::debug!("Atom: gap {} + offset byte (bit @ {})", gaps, bit);
        } else {
            let count = literal_length(&input[pos..]);
            write_atom(&mut result, gaps, false, count as u8, &input[pos..pos + count]);
            pos += count;
            log::debug!("Atom: gap {} + {} literal byte(s)", gaps, count);
        }
        atom_count += 1;
    }

    let compressed = BitVector::from_bytes(&result);
    log::info!("Atom count: {}", atom_count);
    log::info!(
        "Compressed bit count: {} (ratio {:.3})",
        compressed.len(),
        bits.len() as f64 / compressed.len() as f64
    );
    Ok(compressed)
}

/// Decompresses a stream produced by `compress`.
///
/// The result is always a whole number of bytes; callers that compressed a
/// non-byte-aligned input must truncate to the original length themselves.
pub fn decompress(compressed: &BitVector) -> Result<BitVector, CodecError> {
    if compressed.is_empty() {
        return Err(CodecError::EmptyInput);
    }

    log::info!("Decompressing {} bits with BBC", compressed.len());

    let packed = compressed.to_bytes();
    let whole_bytes = compressed.len() / BITS_PER_BYTE;
    let mut reader = ByteReader {
        bytes: &packed[..whole_bytes],
        pos: 0,
    };
    let mut result = Vec::new();

    while !reader.is_exhausted() {
        let header = reader.read_u8("header")?;
        let mut gaps = (header >> 5) as usize;
        let is_dirty = header & DIRTY_FLAG != 0;
        let special = header & 0x0F;

        if gaps == HEADER_GAP_MAX {
            let first = reader.read_u8("gap extension")?;
            gaps = if first & TWO_BYTE_GAP_FLAG == 0 {
                first as usize
            } else {
                let low = reader.read_u8("gap extension")?;
                (((first & !TWO_BYTE_GAP_FLAG) as usize) << 8) | low as usize
            };
        }
        result.resize(result.len() + gaps, 0);

        if is_dirty {
            if special as usize >= BITS_PER_BYTE {
                return Err(CodecError::MalformedInput(format!(
                    "offset bit position {} is not inside a byte",
                    special
                )));
            }
            result.push(0x80 >> special);
            log::debug!("Atom: gap {} + offset byte (bit @ {})", gaps, special);
        } else {
            result.extend_from_slice(reader.take(special as usize, "literals")?);
            log::debug!("Atom: gap {} + {} literal byte(s)", gaps, special);
        }
    }

    if compressed.len() % BITS_PER_BYTE != 0 {
        return Err(CodecError::MalformedInput(format!(
            "{} trailing bit(s) cannot hold an atom header",
            compressed.len() % BITS_PER_BYTE
        )));
    }

    log::info!("Decompressed bit count: {}", result.len() * BITS_PER_BYTE);
    Ok(BitVector::from_bytes(&result))
}

//==================================================================================
// 3. Codec Interface
//==================================================================================

/// The BBC codec behind the shared `BitmapCodec` interface. Word sizes are
/// ignored. The result's `final_length` records how many bits of the last input
/// byte are real, so decoding through this interface drops the byte padding.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bbc {
    empty_input: EmptyInputPolicy,
}

impl Bbc {
    pub fn new(empty_input: EmptyInputPolicy) -> Self {
        Self { empty_input }
    }
}

impl BitmapCodec for Bbc {
    fn kind(&self) -> CodecKind {
        CodecKind::Bbc
    }

    fn compress(
        &self,
        bits: &BitVector,
        _word_size: Option<usize>,
    ) -> Result<CompressedResult, CodecError> {
        if bits.is_empty() && self.empty_input == EmptyInputPolicy::Allow {
            return Ok(CompressedResult::Bbc {
                bits: BitVector::new(),
                final_length: BITS_PER_BYTE,
            });
        }
        Ok(CompressedResult::Bbc {
            bits: compress(bits)?,
            final_length: final_byte_length(bits.len()),
        })
    }

    fn decompress(
        &self,
        compressed: &BitVector,
        _word_size: Option<usize>,
        final_length: Option<usize>,
    ) -> Result<BitVector, CodecError> {
        let final_length = final_length.unwrap_or(BITS_PER_BYTE);
        if final_length == 0 || final_length > BITS_PER_BYTE {
            return Err(CodecError::MalformedInput(format!(
                "final byte length {} outside [1, {}]",
                final_length, BITS_PER_BYTE
            )));
        }
        if compressed.is_empty() && self.empty_input == EmptyInputPolicy::Allow {
            return Ok(BitVector::new());
        }

        let mut decoded = decompress(compressed)?;
        if decoded.is_empty() {
            return Err(CodecError::MalformedInput(
                "stream decodes to zero bytes but declares a final byte".into(),
            ));
        }
        decoded >>= BITS_PER_BYTE - final_length;
        Ok(decoded)
    }
}
