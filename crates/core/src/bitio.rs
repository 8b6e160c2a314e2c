//! Bit-level I/O: owned bit strings and the MSB-first packer/unpacker.
//!
//! Codes and code streams are carried as [`BitString`]s. [`pack`] groups a
//! bit string into bytes, most significant bit first, and zero-fills the tail
//! of the last byte; the number of filler bits travels with the bytes in a
//! [`PackedBitstream`] because it cannot be recovered from them.
//!
//! # Padding Rules
//! - BitWriter: pads the final partial byte with trailing zeros and records
//!   `padding = (8 - len % 8) % 8`
//! - BitReader: stops exactly `padding` bits before the end of the buffer
//!
//! # Example
//! ```
//! use huffpack_core::bitio::{pack, unpack, BitString};
//!
//! let bits: BitString = "10111".parse().unwrap();
//! let packed = pack(&bits);
//! assert_eq!(packed.bytes(), &[0b1011_1000]);
//! assert_eq!(packed.padding(), 3);
//!
//! let restored = unpack(packed.bytes(), packed.padding() as usize).unwrap();
//! assert_eq!(restored, bits);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// An owned sequence of bits.
///
/// Renders as a string of `0`/`1` characters and parses from the same.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BitString {
    bits: Vec<bool>,
}

impl BitString {
    pub fn new() -> Self {
        Self { bits: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    pub fn pop(&mut self) -> Option<bool> {
        self.bits.pop()
    }

    /// Append every bit of `other`.
    pub fn extend_from(&mut self, other: &BitString) {
        self.bits.extend_from_slice(&other.bits);
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    /// True if `prefix` is a (not necessarily proper) prefix of `self`.
    pub fn starts_with(&self, prefix: &BitString) -> bool {
        self.bits.starts_with(&prefix.bits)
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for BitString {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(Error::InvalidInput(format!(
                    "bit string contains non-binary character {other:?}"
                ))),
            })
            .collect()
    }
}

impl From<Vec<bool>> for BitString {
    fn from(bits: Vec<bool>) -> Self {
        Self { bits }
    }
}

impl FromIterator<bool> for BitString {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for BitString {
    type Item = bool;
    type IntoIter = std::vec::IntoIter<bool>;

    fn into_iter(self) -> Self::IntoIter {
        self.bits.into_iter()
    }
}

impl<'a> IntoIterator for &'a BitString {
    type Item = bool;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, bool>>;

    fn into_iter(self) -> Self::IntoIter {
        self.bits.iter().copied()
    }
}

/// Byte-aligned buffer plus the count of zero filler bits at its end.
///
/// # Invariants
/// - `padding` is in `[0, 7]`
/// - `padding` is 0 when `bytes` is empty
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackedBitstream {
    bytes: Vec<u8>,
    padding: u8,
}

impl PackedBitstream {
    /// Pair packed bytes with their padding count.
    ///
    /// # Errors
    /// `Error::InvalidPadding` if `padding > 7` or exceeds the bits in `bytes`.
    pub fn new(bytes: Vec<u8>, padding: usize) -> Result<Self> {
        check_padding(bytes.len() * 8, padding)?;
        Ok(Self {
            bytes,
            padding: padding as u8,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn padding(&self) -> u8 {
        self.padding
    }

    /// Number of meaningful bits (excluding padding).
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 - self.padding as usize
    }

    /// Iterate the meaningful bits without materializing them.
    pub fn reader(&self) -> BitReader<'_> {
        BitReader {
            data: &self.bytes,
            bit_position: 0,
            bit_limit: self.bit_len(),
        }
    }
}

fn check_padding(available: usize, padding: usize) -> Result<()> {
    if padding > 7 || padding > available {
        return Err(Error::InvalidPadding { padding, available });
    }
    Ok(())
}

/// Writes bits MSB-first into a byte buffer.
///
/// # Invariants
/// - `bit_count` is always < 8
#[derive(Debug, Clone)]
pub struct BitWriter {
    /// Completed bytes
    bytes: Vec<u8>,
    /// Accumulator for the current partial byte (MSB-aligned)
    bit_buffer: u8,
    /// Number of bits in bit_buffer (0-7)
    bit_count: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a writer expecting roughly `bits` bits of output.
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bits.div_ceil(8)),
            bit_buffer: 0,
            bit_count: 0,
        }
    }

    pub fn write_bit(&mut self, bit: bool) {
        if bit {
            self.bit_buffer |= 0x80 >> self.bit_count;
        }
        self.bit_count += 1;

        if self.bit_count == 8 {
            self.bytes.push(self.bit_buffer);
            self.bit_buffer = 0;
            self.bit_count = 0;
        }
    }

    /// Append every bit of `code` in order.
    pub fn write_code(&mut self, code: &BitString) {
        for bit in code {
            self.write_bit(bit);
        }
    }

    /// Total number of bits written (including partial byte).
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 + self.bit_count as usize
    }

    /// Flush the partial byte (zero-filled) and return the packed result.
    pub fn finish(mut self) -> PackedBitstream {
        let padding = (8 - self.bit_count) % 8;
        if self.bit_count > 0 {
            self.bytes.push(self.bit_buffer);
        }
        PackedBitstream {
            bytes: self.bytes,
            padding,
        }
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads bits MSB-first from a byte buffer, stopping before the padding.
///
/// # Invariants
/// - `bit_position <= bit_limit <= data.len() * 8`
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    /// Current bit position (0 = MSB of first byte)
    bit_position: usize,
    /// Position of the first padding bit
    bit_limit: usize,
}

impl<'a> BitReader<'a> {
    /// Create a reader that yields all bits of `data` except the last `padding`.
    ///
    /// # Errors
    /// `Error::InvalidPadding` if `padding > 7` or exceeds the bits in `data`.
    pub fn new(data: &'a [u8], padding: usize) -> Result<Self> {
        let available = data.len() * 8;
        check_padding(available, padding)?;
        Ok(Self {
            data,
            bit_position: 0,
            bit_limit: available - padding,
        })
    }

    pub fn bits_remaining(&self) -> usize {
        self.bit_limit - self.bit_position
    }

    pub fn position(&self) -> usize {
        self.bit_position
    }

    pub fn is_empty(&self) -> bool {
        self.bit_position >= self.bit_limit
    }
}

impl Iterator for BitReader<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        if self.is_empty() {
            return None;
        }
        let byte = self.data[self.bit_position / 8];
        let bit = byte & (0x80 >> (self.bit_position % 8)) != 0;
        self.bit_position += 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bits_remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BitReader<'_> {}

/// Pack a bit string into bytes, MSB first, zero-filling the last byte.
///
/// `padding` is `(8 - len % 8) % 8`, so 0 for byte-aligned and empty input.
pub fn pack(bits: &BitString) -> PackedBitstream {
    let mut writer = BitWriter::with_capacity(bits.len());
    writer.write_code(bits);
    writer.finish()
}

/// Expand bytes to bits, MSB first, dropping the final `padding` bits.
///
/// # Errors
/// `Error::InvalidPadding` if `padding > 7` or exceeds `bytes.len() * 8`.
pub fn unpack(bytes: &[u8], padding: usize) -> Result<BitString> {
    Ok(BitReader::new(bytes, padding)?.collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(s: &str) -> BitString {
        s.parse().unwrap()
    }

    #[test]
    fn test_pack_single_byte() {
        let packed = pack(&bits("10110011"));
        assert_eq!(packed.bytes(), &[0b10110011]);
        assert_eq!(packed.padding(), 0);
    }

    #[test]
    fn test_pack_partial_bits() {
        let packed = pack(&bits("10111"));
        assert_eq!(packed.bytes(), &[0b10111000]);
        assert_eq!(packed.padding(), 3);
        assert_eq!(packed.bit_len(), 5);
    }

    #[test]
    fn test_padding() {
        let packed = pack(&bits("1"));
        assert_eq!(packed.bytes(), &[0b10000000]);
        assert_eq!(packed.padding(), 7);
    }

    #[test]
    fn test_multi_byte() {
        let packed = pack(&bits("1010101111110000"));
        assert_eq!(packed.bytes(), &[0b10101011, 0b11110000]);
        assert_eq!(packed.padding(), 0);
    }

    #[test]
    fn test_empty_stream() {
        let packed = pack(&BitString::new());
        assert!(packed.bytes().is_empty());
        assert_eq!(packed.padding(), 0);
        assert!(unpack(&[], 0).unwrap().is_empty());
    }

    #[test]
    fn test_unpack_strips_exactly_padding() {
        let restored = unpack(&[0b10111000], 3).unwrap();
        assert_eq!(restored.to_string(), "10111");

        let untouched = unpack(&[0b10111000], 0).unwrap();
        assert_eq!(untouched.to_string(), "10111000");
    }

    #[test]
    fn test_unpack_rejects_bad_padding() {
        assert!(matches!(
            unpack(&[0xFF], 8),
            Err(Error::InvalidPadding { padding: 8, available: 8 })
        ));
        assert!(matches!(
            unpack(&[], 1),
            Err(Error::InvalidPadding { padding: 1, available: 0 })
        ));
    }

    #[test]
    fn test_packed_bitstream_validation() {
        assert!(PackedBitstream::new(vec![0], 7).is_ok());
        assert!(PackedBitstream::new(vec![0], 8).is_err());
        assert!(PackedBitstream::new(Vec::new(), 3).is_err());
    }

    #[test]
    fn test_reader_bits_remaining() {
        let data = [0xFF, 0xF0];
        let packed = PackedBitstream::new(data.to_vec(), 4).unwrap();
        let mut reader = packed.reader();

        assert_eq!(reader.bits_remaining(), 12);
        for _ in 0..5 {
            assert_eq!(reader.next(), Some(true));
        }
        assert_eq!(reader.position(), 5);
        assert_eq!(reader.len(), 7);
        assert_eq!(reader.by_ref().count(), 7);
        assert!(reader.is_empty());
        assert_eq!(reader.next(), None);
    }

    #[test]
    fn test_bit_string_parse_and_display() {
        let b = bits("0110");
        assert_eq!(b.len(), 4);
        assert_eq!(b.to_string(), "0110");
        assert!(b.starts_with(&bits("01")));
        assert!(!b.starts_with(&bits("1")));
        assert!("01x".parse::<BitString>().is_err());
    }

    #[test]
    fn test_writer_tracks_length() {
        let mut writer = BitWriter::new();
        writer.write_code(&bits("101"));
        writer.write_bit(true);
        assert_eq!(writer.bit_len(), 4);

        let packed = writer.finish();
        assert_eq!(packed.bytes(), &[0b10110000]);
        assert_eq!(packed.padding(), 4);
    }
}
