//! Bit-level I/O for variable-length codewords.
//!
//! `BitWriter` packs codewords into bytes and `BitReader` unpacks them,
//! both MSB-first, so a codeword written across a byte boundary reads
//! back in the same order. Neither side records how many bits are
//! meaningful: the final byte is zero-padded on write, and a reader will
//! happily serve those padding bits, so callers carry their own element
//! counts (the codecs prefix every sequence with one).
//!
//! # Example
//! ```
//! use bitpress_core::bitio::{BitWriter, BitReader};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b0110, 4).unwrap();
//! writer.write_bits(0b1, 1).unwrap();
//!
//! let bytes = writer.finish();
//! assert_eq!(bytes, vec![0b0110_1000]);
//!
//! let mut reader = BitReader::new(&bytes);
//! assert_eq!(reader.read_bits(4).unwrap(), 0b0110);
//! assert!(reader.read_bit().unwrap());
//! ```

use crate::error::{BitIoError, Result};

/// Packs bits MSB-first into a growing byte buffer.
///
/// Bits accumulate in `pending` until a full byte forms, which is then
/// appended to the output. `finish()` zero-pads whatever is left.
///
/// # Invariants
/// - `pending_bits` is always < 8 (a full byte is flushed immediately)
/// - the unused low bits of `pending` are zero
#[derive(Debug, Clone)]
pub struct BitWriter {
    /// Flushed whole bytes
    out: Vec<u8>,
    /// Partial byte in progress, MSB-aligned
    pending: u8,
    /// How many high bits of `pending` are in use (0-7)
    pending_bits: u8,
}

impl BitWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self {
            out: Vec::new(),
            pending: 0,
            pending_bits: 0,
        }
    }

    /// Append the low `length` bits of `value`, MSB-first.
    ///
    /// Writing value=0b101 with length=3 emits the bits 1, 0, 1 in that
    /// order. Anything above the low `length` bits of `value` is ignored.
    ///
    /// # Errors
    /// Returns `BitIoError::InvalidLength` if `length` is 0 or exceeds 64.
    pub fn write_bits(&mut self, value: u64, length: usize) -> Result<()> {
        if length == 0 || length > 64 {
            return Err(BitIoError::InvalidLength { length }.into());
        }

        // Left-align the payload so the bits to emit are always at the top
        let mut aligned = value << (64 - length);
        let mut remaining = length;

        while remaining > 0 {
            let free = 8 - usize::from(self.pending_bits);
            let take = remaining.min(free);

            let chunk = (aligned >> (64 - take)) as u8;
            self.pending |= chunk << (free - take);
            self.pending_bits += take as u8;
            aligned <<= take;
            remaining -= take;

            if self.pending_bits == 8 {
                self.out.push(self.pending);
                self.pending = 0;
                self.pending_bits = 0;
            }
        }

        Ok(())
    }

    /// Consume the writer and return the packed bytes.
    ///
    /// A trailing partial byte is completed with zero bits. Nothing
    /// written yields an empty vector.
    pub fn finish(mut self) -> Vec<u8> {
        // The unused low bits of `pending` are already zero
        if self.pending_bits > 0 {
            self.out.push(self.pending);
        }
        self.out
    }

    /// Whole bytes flushed so far (excludes any partial byte).
    pub fn byte_len(&self) -> usize {
        self.out.len()
    }

    /// Total bits written so far, padding not included.
    pub fn bit_len(&self) -> usize {
        self.out.len() * 8 + usize::from(self.pending_bits)
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Unpacks bits MSB-first from a byte slice.
///
/// The reader cannot tell padding from payload; it serves every bit of
/// the slice and leaves framing to the caller.
///
/// # Invariants
/// - `cursor` never exceeds `bytes.len() * 8`
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    /// Backing buffer
    bytes: &'a [u8],
    /// Next unread bit, counted from the MSB of byte 0
    cursor: usize,
}

impl<'a> BitReader<'a> {
    /// Create a reader over the given bytes.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, cursor: 0 }
    }

    /// Read `length` bits as the low bits of a u64, MSB-first.
    ///
    /// Reading 3 bits from 0b10110000 yields 0b101.
    ///
    /// # Errors
    /// - `BitIoError::InvalidLength` if `length` is 0 or exceeds 64
    /// - `BitIoError::EndOfStream` if fewer than `length` bits remain
    pub fn read_bits(&mut self, length: usize) -> Result<u64> {
        if length == 0 || length > 64 {
            return Err(BitIoError::InvalidLength { length }.into());
        }

        let available = self.bits_remaining();
        if length > available {
            return Err(BitIoError::EndOfStream {
                requested: length,
                available,
            }
            .into());
        }

        let mut value = 0u64;
        let mut remaining = length;

        while remaining > 0 {
            let byte = self.bytes[self.cursor / 8];
            let used = self.cursor % 8;
            let take = remaining.min(8 - used);

            // Shift out the consumed bits, then keep the top `take` of the rest
            let chunk = (byte << used) >> (8 - take);
            value = (value << take) | u64::from(chunk);

            self.cursor += take;
            remaining -= take;
        }

        Ok(value)
    }

    /// Read one bit as a bool (a set bit reads as true).
    ///
    /// # Errors
    /// Returns `BitIoError::EndOfStream` at the end of the buffer.
    pub fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read_bits(1)? == 1)
    }

    /// Bits left between the cursor and the end of the slice.
    pub fn bits_remaining(&self) -> usize {
        self.bytes.len() * 8 - self.cursor
    }

    /// Bits consumed so far.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// True once every bit has been consumed.
    pub fn is_empty(&self) -> bool {
        self.bits_remaining() == 0
    }
}
