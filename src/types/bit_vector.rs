// In: src/types/bit_vector.rs

//! Defines `BitVector`, the ordered, arbitrary-length bit sequence that both the
//! WAH and BBC kernels consume and produce.
//!
//! Bit 0 is the leftmost (most significant) bit. Storage is a `BitVec<u8, Msb0>`,
//! so the in-memory byte layout matches the left-to-right order the codecs write,
//! and `to_bytes` is a straight copy of the backing store.
//!
//! The type behaves as a value: every operation either mutates a uniquely owned
//! instance in place or returns a new, independent `BitVector`.

use std::fmt;
use std::ops::{Add, AddAssign, Not, Shl, ShlAssign, Shr, ShrAssign};
use std::str::FromStr;

use bitvec::prelude::*;
use num_traits::{PrimInt, Unsigned, Zero};

use crate::error::CodecError;

/// The widest integer field `push_uint` / `read_uint` carry as a value.
const MAX_FIELD_BITS: usize = u64::BITS as usize;

#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct BitVector {
    bits: BitVec<u8, Msb0>,
}

//==================================================================================
// 1. Construction
//==================================================================================

impl BitVector {
    /// Creates an empty `BitVector`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty `BitVector` with room for `capacity` bits.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: BitVec::with_capacity(capacity),
        }
    }

    /// Creates a `BitVector` of `len` copies of `bit`.
    pub fn repeat(bit: bool, len: usize) -> Self {
        Self {
            bits: BitVec::repeat(bit, len),
        }
    }

    /// Creates a `BitVector` of `len` zero bits.
    pub fn zeros(len: usize) -> Self {
        Self::repeat(false, len)
    }

    /// Builds a `BitVector` of exactly `len` bits from the low `len` bits of `value`.
    ///
    /// Higher bits of `value` are discarded silently. If `len` is wider than `T`,
    /// the result is zero-extended on the left.
    pub fn from_uint<T>(value: T, len: usize) -> Self
    where
        T: PrimInt + Unsigned,
    {
        let type_bits = T::zero().count_zeros() as usize;
        let mut bits = BitVec::with_capacity(len);
        for i in 0..len {
            let shift = len - 1 - i;
            let bit = shift < type_bits && (value >> shift) & T::one() == T::one();
            bits.push(bit);
        }
        Self { bits }
    }

    /// Builds a `BitVector` from any sequence of number-like values. Zero-like values
    /// become `0`, everything else becomes `1`.
    pub fn from_truthy<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Zero,
    {
        values.into_iter().map(|v| !v.is_zero()).collect()
    }

    /// Interprets `bytes` as a big-endian bit stream (the MSB of `bytes[0]` is bit 0).
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bits: BitVec::from_slice(bytes),
        }
    }

    /// Packs the bits into bytes, MSB first. A trailing partial byte is padded
    /// with zeros on the right.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut packed = self.bits.clone();
        packed.set_uninitialized(false);
        packed.into_vec()
    }
}

impl FromIterator<bool> for BitVector {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}

impl FromStr for BitVector {
    type Err = CodecError;

    /// Parses a string of `'0'` and `'1'` characters.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bits = BitVec::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '0' => bits.push(false),
                '1' => bits.push(true),
                other => return Err(CodecError::InvalidBitCharacter(other)),
            }
        }
        Ok(Self { bits })
    }
}

//==================================================================================
// 2. Queries & Element Access
//==================================================================================

impl BitVector {
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Returns the bit at `index`, counting from the left.
    pub fn get(&self, index: usize) -> Result<bool, CodecError> {
        self.bits
            .get(index)
            .map(|bit| *bit)
            .ok_or(CodecError::IndexOutOfRange {
                index,
                len: self.len(),
            })
    }

    /// Sets the bit at `index`, counting from the left.
    pub fn set(&mut self, index: usize, value: bool) -> Result<(), CodecError> {
        let len = self.len();
        if index >= len {
            return Err(CodecError::IndexOutOfRange { index, len });
        }
        self.bits.set(index, value);
        Ok(())
    }

    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().by_vals()
    }

    /// Counts the leading bits equal to `flag`, or to bit 0 when `flag` is `None`.
    ///
    /// Returns 0 for an empty vector or when bit 0 differs from `flag`.
    pub fn leading_run_length(&self, flag: Option<bool>) -> usize {
        let Some(first) = self.bits.first().map(|bit| *bit) else {
            return 0;
        };
        let flag = flag.unwrap_or(first);
        if first != flag {
            return 0;
        }
        if flag {
            self.bits.leading_ones()
        } else {
            self.bits.leading_zeros()
        }
    }

    pub(crate) fn as_bitslice(&self) -> &BitSlice<u8, Msb0> {
        self.bits.as_bitslice()
    }
}

//==================================================================================
// 3. Slicing
//==================================================================================

impl BitVector {
    /// Python-style slicing with explicit clamping.
    ///
    /// Missing bounds default to `0`, `len` and `1`. Negative `start`/`stop` count
    /// from the end, then both are clamped to `[0, len]`. Out-of-range bounds
    /// produce an empty vector instead of an error. A step of zero or less fails
    /// with `UnsupportedStep`.
    pub fn slice(
        &self,
        start: Option<isize>,
        stop: Option<isize>,
        step: Option<isize>,
    ) -> Result<BitVector, CodecError> {
        let step = match step {
            None => 1,
            Some(s) if s <= 0 => return Err(CodecError::UnsupportedStep(s)),
            Some(s) => s as usize,
        };

        let start = start.map_or(0, |i| self.clamp_index(i));
        let stop = stop.map_or(self.len(), |i| self.clamp_index(i));

        if start >= stop {
            return Ok(BitVector::new());
        }
        if step == 1 {
            return Ok(self.range(start, stop));
        }

        Ok(self.bits[start..stop].iter().by_vals().step_by(step).collect())
    }

    /// Copies the bits in `[start, end)`. Both bounds are clamped to `[0, len]`.
    pub fn range(&self, start: usize, end: usize) -> BitVector {
        let end = end.min(self.len());
        let start = start.min(end);
        Self {
            bits: self.bits[start..end].to_bitvec(),
        }
    }

    fn clamp_index(&self, i: isize) -> usize {
        let len = self.len() as isize;
        let absolute = if i < 0 { len + i } else { i };
        absolute.clamp(0, len) as usize
    }
}

//==================================================================================
// 4. Builders used by the kernels
//==================================================================================

impl BitVector {
    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Appends `other` in place.
    pub fn append(&mut self, other: &BitVector) {
        self.bits.extend_from_bitslice(&other.bits);
    }

    pub(crate) fn extend_from_bitslice(&mut self, bits: &BitSlice<u8, Msb0>) {
        self.bits.extend_from_bitslice(bits);
    }

    /// Appends the low `width` bits of `value`, most significant first. Widths above
    /// 64 are left-padded with zeros.
    pub fn push_uint(&mut self, value: u64, width: usize) {
        let padding = width.saturating_sub(MAX_FIELD_BITS);
        self.bits.resize(self.bits.len() + padding, false);
        for shift in (0..width - padding).rev() {
            self.bits.push((value >> shift) & 1 == 1);
        }
    }

    /// Reads `width` bits starting at `start` as an unsigned integer, most significant
    /// first.
    ///
    /// Fails with `MalformedInput` if the field runs past the end of the vector or its
    /// value does not fit in a `u64`.
    pub fn read_uint(&self, start: usize, width: usize) -> Result<u64, CodecError> {
        let end = start
            .checked_add(width)
            .filter(|&end| end <= self.len())
            .ok_or_else(|| {
                CodecError::MalformedInput(format!(
                    "field of {} bits at offset {} exceeds stream length {}",
                    width,
                    start,
                    self.len()
                ))
            })?;

        let field = &self.bits[start..end];
        let significant = field.len() - field.leading_zeros();
        if significant > MAX_FIELD_BITS {
            return Err(CodecError::MalformedInput(format!(
                "field at offset {} does not fit in 64 bits",
                start
            )));
        }

        Ok(field
            .iter()
            .by_vals()
            .fold(0u64, |acc, bit| (acc << 1) | bit as u64))
    }
}

//==================================================================================
// 5. Operators
//==================================================================================

impl Add<&BitVector> for &BitVector {
    type Output = BitVector;

    fn add(self, rhs: &BitVector) -> BitVector {
        let mut out = BitVector::with_capacity(self.len() + rhs.len());
        out.append(self);
        out.append(rhs);
        out
    }
}

impl Add for BitVector {
    type Output = BitVector;

    fn add(mut self, rhs: BitVector) -> BitVector {
        self.append(&rhs);
        self
    }
}

impl AddAssign<&BitVector> for BitVector {
    fn add_assign(&mut self, rhs: &BitVector) {
        self.append(rhs);
    }
}

impl AddAssign for BitVector {
    fn add_assign(&mut self, rhs: BitVector) {
        self.append(&rhs);
    }
}

/// Appends `count` zero bits on the right.
impl Shl<usize> for BitVector {
    type Output = BitVector;

    fn shl(mut self, count: usize) -> BitVector {
        self <<= count;
        self
    }
}

impl ShlAssign<usize> for BitVector {
    fn shl_assign(&mut self, count: usize) {
        let new_len = self.len() + count;
        self.bits.resize(new_len, false);
    }
}

/// Drops the rightmost `count` bits. The length floors at zero.
impl Shr<usize> for BitVector {
    type Output = BitVector;

    fn shr(mut self, count: usize) -> BitVector {
        self >>= count;
        self
    }
}

impl ShrAssign<usize> for BitVector {
    fn shr_assign(&mut self, count: usize) {
        let new_len = self.len().saturating_sub(count);
        self.bits.truncate(new_len);
    }
}

impl Not for BitVector {
    type Output = BitVector;

    fn not(self) -> BitVector {
        Self { bits: !self.bits }
    }
}

impl Not for &BitVector {
    type Output = BitVector;

    fn not(self) -> BitVector {
        !self.clone()
    }
}

//==================================================================================
// 6. Formatting
//==================================================================================

impl fmt::Display for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitVector({}; \"{}\")", self.len(), self)
    }
}

//==================================================================================
// 7. Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn bv(s: &str) -> BitVector {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(bv("0110").to_string(), "0110");
        assert_eq!(bv("").len(), 0);
        assert!(matches!(
            "01x".parse::<BitVector>(),
            Err(CodecError::InvalidBitCharacter('x'))
        ));
    }

    #[test]
    fn test_from_uint_truncates_to_low_bits() {
        assert_eq!(BitVector::from_uint(0b1011u8, 4), bv("1011"));
        assert_eq!(BitVector::from_uint(0b1011u8, 2), bv("11"));
        assert_eq!(BitVector::from_uint(0b1u8, 10), bv("0000000001"));
        assert_eq!(BitVector::from_uint(u64::MAX, 0), BitVector::new());
    }

    #[test]
    fn test_from_truthy() {
        assert_eq!(BitVector::from_truthy(vec![0, 3, 0, -1]), bv("0101"));
        assert_eq!(BitVector::from_truthy([0.0f32, 1.5]), bv("01"));
        let from_bools: BitVector = [true, false, true].into_iter().collect();
        assert_eq!(from_bools, bv("101"));
    }

    #[test]
    fn test_bytes_roundtrip_and_padding() {
        let bits = BitVector::from_bytes(&[0b1010_0000, 0xFF]);
        assert_eq!(bits.to_string(), "1010000011111111");
        assert_eq!(bv("101").to_bytes(), vec![0b1010_0000]);
        assert_eq!(bv("111111111").to_bytes(), vec![0xFF, 0x80]);
    }

    #[test]
    fn test_get_and_set_bounds() {
        let mut bits = bv("010");
        assert!(bits.get(1).unwrap());
        assert!(!bits.get(2).unwrap());
        assert!(matches!(
            bits.get(3),
            Err(CodecError::IndexOutOfRange { index: 3, len: 3 })
        ));

        bits.set(0, true).unwrap();
        bits.set(1, false).unwrap();
        assert_eq!(bits, bv("100"));
        assert!(bits.set(3, true).is_err());
    }

    #[test]
    fn test_slice_defaults_and_noop() {
        let bits = bv("1100101");
        assert_eq!(bits.slice(None, None, None).unwrap(), bits);
        assert_eq!(bits.slice(Some(0), Some(7), Some(1)).unwrap(), bits);
        assert_eq!(bits.slice(Some(2), None, None).unwrap(), bv("00101"));
        assert_eq!(bits.slice(None, Some(3), None).unwrap(), bv("110"));
    }

    #[test]
    fn test_slice_negative_and_out_of_bounds() {
        let bits = bv("1100101");
        assert_eq!(bits.slice(Some(-3), None, None).unwrap(), bv("101"));
        assert_eq!(bits.slice(None, Some(-5), None).unwrap(), bv("11"));
        assert_eq!(bits.slice(Some(-100), Some(2), None).unwrap(), bv("11"));
        assert_eq!(bits.slice(Some(10), Some(20), None).unwrap(), BitVector::new());
        assert_eq!(bits.slice(Some(5), Some(2), None).unwrap(), BitVector::new());
    }

    #[test]
    fn test_slice_with_step() {
        let bits = bv("1010101");
        assert_eq!(bits.slice(None, None, Some(2)).unwrap(), bv("1111"));
        assert_eq!(bits.slice(Some(1), None, Some(2)).unwrap(), bv("000"));
        assert_eq!(bits.slice(Some(0), Some(6), Some(4)).unwrap(), bv("11"));
        assert!(matches!(
            bits.slice(None, None, Some(0)),
            Err(CodecError::UnsupportedStep(0))
        ));
        assert!(matches!(
            bits.slice(None, None, Some(-1)),
            Err(CodecError::UnsupportedStep(-1))
        ));
    }

    #[test]
    fn test_concatenation() {
        let a = bv("101");
        let b = bv("0011");
        assert_eq!(&a + &b, bv("1010011"));

        let mut c = a.clone();
        c += &b;
        assert_eq!(c, bv("1010011"));
        assert_eq!(a.clone() + BitVector::new(), a);
    }

    #[test]
    fn test_shifts_and_invert() {
        assert_eq!(bv("101") << 2, bv("10100"));
        assert_eq!(bv("10110") >> 2, bv("101"));
        assert_eq!(bv("10") >> 5, BitVector::new());
        assert_eq!(!bv("10110"), bv("01001"));
        assert_eq!(!&BitVector::new(), BitVector::new());
    }

    #[test]
    fn test_equality_requires_same_length() {
        assert_ne!(bv("0"), bv("00"));
        assert_ne!(bv("01"), bv("10"));
        assert_eq!(bv("0101"), BitVector::from_uint(5u8, 4));
    }

    #[test]
    fn test_count_ones() {
        assert_eq!(BitVector::new().count_ones(), 0);
        assert_eq!(bv("0110100").count_ones(), 3);
        assert_eq!(BitVector::repeat(true, 70).count_ones(), 70);
    }

    #[test]
    fn test_leading_run_length() {
        assert_eq!(BitVector::new().leading_run_length(None), 0);
        assert_eq!(bv("0001").leading_run_length(None), 3);
        assert_eq!(bv("1110").leading_run_length(None), 3);
        assert_eq!(bv("1111").leading_run_length(Some(true)), 4);
        assert_eq!(bv("0111").leading_run_length(Some(true)), 0);
        assert_eq!(bv("0000").leading_run_length(Some(false)), 4);
    }

    #[test]
    fn test_push_and_read_uint() {
        let mut bits = BitVector::new();
        bits.push_uint(0b101, 3);
        bits.push_uint(0xFF, 4);
        bits.push_uint(1, 70);
        assert_eq!(bits.len(), 77);
        assert_eq!(bits.read_uint(0, 3).unwrap(), 0b101);
        assert_eq!(bits.read_uint(3, 4).unwrap(), 0b1111);
        assert_eq!(bits.read_uint(7, 70).unwrap(), 1);
        assert_eq!(bits.read_uint(7, 0).unwrap(), 0);
        assert!(matches!(
            bits.read_uint(70, 8),
            Err(CodecError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_read_uint_rejects_oversized_value() {
        let bits = BitVector::repeat(true, 65);
        assert!(matches!(
            bits.read_uint(0, 65),
            Err(CodecError::MalformedInput(_))
        ));
    }
}
