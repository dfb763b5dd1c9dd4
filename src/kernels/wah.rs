//! This module contains the pure, stateless kernels for Word-Aligned Hybrid (WAH)
//! bitmap compression.
//!
//! The input is cut into sections of `word_size - 1` bits. Each output word is
//! `word_size` bits wide and is one of:
//!
//! * a **run word** `1 | fill | count`: `count` consecutive sections made only of
//!   `fill` bits, with `count` stored in the remaining `word_size - 2` bits;
//! * a **literal word** `0 | payload`: one section stored verbatim. A section cut
//!   short by the end of the input is right-padded with zeros.
//!
//! Padding in the last literal is not recoverable from the stream, so `compress`
//! also returns the number of meaningful bits in the final word. `decompress`
//! needs that value to drop the padding.

use bitvec::prelude::*;

use crate::config::{EmptyInputPolicy, DEFAULT_WORD_SIZE};
use crate::error::CodecError;
use crate::traits::{BitmapCodec, CompressedResult};
use crate::types::{BitVector, CodecKind};

/// The smallest word that still has room for a header bit and a payload bit.
pub const MIN_WORD_SIZE: usize = 2;
/// The largest word an artifact header can record.
pub const MAX_WORD_SIZE: usize = u32::MAX as usize;

//==================================================================================
// 1. Word Helpers
//==================================================================================

/// The largest run count a word of this section size can hold: `2^(section-1) - 1`.
fn max_run_sections(section_size: usize) -> u64 {
    let count_bits = section_size - 1;
    if count_bits >= u64::BITS as usize {
        u64::MAX
    } else {
        (1u64 << count_bits) - 1
    }
}

/// The number of whole, single-valued sections at the start of `bits`, capped at
/// what one run word can encode.
fn run_sections(bits: &BitSlice<u8, Msb0>, section_size: usize) -> u64 {
    let Some(first) = bits.first().map(|bit| *bit) else {
        return 0;
    };
    let run_bits = if first {
        bits.leading_ones()
    } else {
        bits.leading_zeros()
    };

    ((run_bits / section_size) as u64).min(max_run_sections(section_size))
}

pub(crate) fn check_word_size(word_size: usize) -> Result<(), CodecError> {
    if !(MIN_WORD_SIZE..=MAX_WORD_SIZE).contains(&word_size) {
        return Err(CodecError::InvalidWordSize(word_size));
    }
    Ok(())
}

//==================================================================================
// 2. Public API
//==================================================================================

/// Compresses `bits` into WAH words of `word_size` bits.
///
/// Returns the compressed stream together with the number of meaningful bits in its
/// last word (`word_size` unless the stream ends on a short literal).
pub fn compress(bits: &BitVector, word_size: usize) -> Result<(BitVector, usize), CodecError> {
    check_word_size(word_size)?;
    if bits.is_empty() {
        return Err(CodecError::EmptyInput);
    }

    log::info!(
        "Compressing {} bits ({} set) with WAH (word size: {})",
        bits.len(),
        bits.count_ones(),
        word_size
    );
    log::trace!("Bits: {}", bits);

    let section_size = word_size - 1;
    let input = bits.as_bitslice();
    let mut result = BitVector::with_capacity(bits.len());
    let mut final_length = word_size;
    let mut pos = 0;
    let mut run_count = 0usize;
    let mut literal_count = 0usize;

    while pos < input.len() {
        let remaining = &input[pos..];
        let sections = run_sections(remaining, section_size);

        if sections == 0 {
            let take = section_size.min(remaining.len());
            result.push(false);
            result.extend_from_bitslice(&remaining[..take]);
            result <<= section_size - take;

            final_length = 1 + take;
            pos += take;
            literal_count += 1;
            log::debug!("Literal word of {} bits", take);
        } else {
            let fill = remaining[0];
            result.push(true);
            result.push(fill);
            result.push_uint(sections, section_size - 1);

            final_length = word_size;
            pos += sections as usize * section_size;
            run_count += 1;
            log::debug!("Run word: {} sections of {}", sections, fill as u8);
        }
    }

    log::info!("Run count: {}", run_count);
    log::info!("Literal count: {}", literal_count);
    log::info!(
        "Compressed bit count: {} (ratio {:.3})",
        result.len(),
        bits.len() as f64 / result.len() as f64
    );

    Ok((result, final_length))
}

/// Decompresses a WAH stream produced by `compress` with the same `word_size`.
///
/// `final_length` is the value `compress` returned. It must lie in `[1, word_size]`.
pub fn decompress(
    compressed: &BitVector,
    final_length: usize,
    word_size: usize,
) -> Result<BitVector, CodecError> {
    check_word_size(word_size)?;
    if compressed.is_empty() {
        return Err(CodecError::EmptyInput);
    }
    if final_length == 0 || final_length > word_size {
        return Err(CodecError::MalformedInput(format!(
            "final word length {} outside [1, {}]",
            final_length, word_size
        )));
    }
    if compressed.len() % word_size != 0 {
        return Err(CodecError::MalformedInput(format!(
            "stream length {} is not a multiple of the word size {}",
            compressed.len(),
            word_size
        )));
    }

    log::info!(
        "Decompressing {} bits with WAH (word size: {})",
        compressed.len(),
        word_size
    );

    let section_size = word_size - 1;
    let input = compressed.as_bitslice();
    let word_count = compressed.len() / word_size;
    let mut result = BitVector::with_capacity(word_count * section_size);

    for (index, word) in input.chunks_exact(word_size).enumerate() {
        let start = index * word_size;

        if word[0] {
            let fill = word[1];
            let sections = compressed.read_uint(start + 2, section_size - 1)?;
            let run_bits = usize::try_from(sections)
                .ok()
                .and_then(|s| s.checked_mul(section_size))
                .ok_or_else(|| {
                    CodecError::MalformedInput(format!(
                        "run of {} sections overflows at word {}",
                        sections, index
                    ))
                })?;
            result.append(&BitVector::repeat(fill, run_bits));
        } else {
            let payload_len = if index + 1 == word_count {
                final_length - 1
            } else {
                section_size
            };
            result.extend_from_bitslice(&word[1..1 + payload_len]);
        }
    }

    log::info!("Decompressed bit count: {}", result.len());
    Ok(result)
}

//==================================================================================
// 3. Codec Interface
//==================================================================================

/// The WAH codec behind the shared `BitmapCodec` interface.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wah {
    empty_input: EmptyInputPolicy,
}

impl Wah {
    pub fn new(empty_input: EmptyInputPolicy) -> Self {
        Self { empty_input }
    }
}

impl BitmapCodec for Wah {
    fn kind(&self) -> CodecKind {
        CodecKind::Wah
    }

    fn compress(
        &self,
        bits: &BitVector,
        word_size: Option<usize>,
    ) -> Result<CompressedResult, CodecError> {
        let word_size = word_size.unwrap_or(DEFAULT_WORD_SIZE);
        if bits.is_empty() && self.empty_input == EmptyInputPolicy::Allow {
            check_word_size(word_size)?;
            return Ok(CompressedResult::Wah {
                bits: BitVector::new(),
                final_length: word_size,
            });
        }

        let (bits, final_length) = compress(bits, word_size)?;
        Ok(CompressedResult::Wah { bits, final_length })
    }

    fn decompress(
        &self,
        compressed: &BitVector,
        word_size: Option<usize>,
        final_length: Option<usize>,
    ) -> Result<BitVector, CodecError> {
        let word_size = word_size.unwrap_or(DEFAULT_WORD_SIZE);
        if compressed.is_empty() && self.empty_input == EmptyInputPolicy::Allow {
            check_word_size(word_size)?;
            return Ok(BitVector::new());
        }

        decompress(compressed, final_length.unwrap_or(word_size), word_size)
    }
}
