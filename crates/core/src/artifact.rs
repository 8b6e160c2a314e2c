//! Persisted form of the packed bitstream.
//!
//! The padding count cannot be recovered from the packed bytes, so the
//! on-disk artifact carries it in a small fixed header.
//!
//! # Layout
//!
//! ```text
//! +------------------+
//! | Magic (4 bytes)  |  0x48 0x55 0x46 0x42 ("HUFB")
//! +------------------+
//! | padding (1)      |  u8 filler bits at the end of the payload (0-7)
//! +------------------+
//! | payload_len (4)  |  u32 little-endian, packed byte count
//! +------------------+
//! | payload          |  packed code bits, MSB first
//! | (variable)       |
//! +------------------+
//! ```
//!
//! The payload is exactly `ceil(code_bits / 8)` bytes. There is no checksum.

use crate::bitio::PackedBitstream;
use crate::error::{Error, FramingError, Result};

/// Magic number for bitstream artifacts: "HUFB"
pub const MAGIC: [u8; 4] = [0x48, 0x55, 0x46, 0x42];

/// Size of the bitstream header in bytes
pub const HEADER_SIZE: usize = 9;

/// Serialize a packed bitstream into its persisted form.
///
/// # Errors
/// `Error::InvalidInput` if the payload does not fit a `u32` length.
pub fn serialize_bitstream(bitstream: &PackedBitstream) -> Result<Vec<u8>> {
    let payload = bitstream.bytes();
    let payload_len = u32::try_from(payload.len()).map_err(|_| {
        Error::InvalidInput(format!(
            "packed payload of {} bytes exceeds the u32 length field",
            payload.len()
        ))
    })?;

    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    out.extend_from_slice(&MAGIC);
    out.push(bitstream.padding());
    out.extend_from_slice(&payload_len.to_le_bytes());
    out.extend_from_slice(payload);

    Ok(out)
}

/// Parse a persisted bitstream.
///
/// # Errors
/// - `FramingError::TooShort` if the buffer is smaller than the header
/// - `FramingError::InvalidMagic` if the magic number doesn't match
/// - `FramingError::PayloadLengthMismatch` if the payload size disagrees
///   with the header
/// - `Error::InvalidPadding` if the padding byte is out of range
pub fn parse_bitstream(bytes: &[u8]) -> Result<PackedBitstream> {
    let (header, payload) = match bytes.split_first_chunk::<HEADER_SIZE>() {
        Some(split) => split,
        None => {
            return Err(FramingError::TooShort {
                required: HEADER_SIZE,
                actual: bytes.len(),
            }
            .into())
        }
    };

    let [m0, m1, m2, m3, padding, l0, l1, l2, l3] = *header;
    let magic = [m0, m1, m2, m3];
    if magic != MAGIC {
        return Err(FramingError::InvalidMagic {
            expected: MAGIC,
            actual: magic,
        }
        .into());
    }

    let payload_len = u32::from_le_bytes([l0, l1, l2, l3]) as usize;
    if payload.len() != payload_len {
        return Err(FramingError::PayloadLengthMismatch {
            expected: payload_len,
            actual: payload.len(),
        }
        .into());
    }

    PackedBitstream::new(payload.to_vec(), padding as usize)
}
