//! Codebook table serialization and parsing.
//!
//! A trained codec persists as its `(symbol, frequency)` entries in
//! first-seen order. That order is the only tie-break state tree
//! construction uses, so a parsed table rebuilds a bit-identical codebook.
//!
//! # Table Format
//!
//! ```text
//! +------------------+
//! | Magic (4 bytes)  |  0x48 0x43 0x42 0x4B ("HCBK")
//! +------------------+
//! | layout (1)       |  format version + literal width, see below
//! +------------------+
//! | entry_count (4)  |  u32 little-endian
//! +------------------+
//! | crc32 (4)        |  u32 checksum of the entries region
//! +------------------+
//! | entries          |  entry_count x 17 bytes
//! | (variable)       |
//! +------------------+
//! ```
//!
//! The layout byte follows the bit diagram `VVVVWWW?`: `V` is the format
//! version and `W` is log2 of the symbol literal width in bits, so a table
//! trained over one symbol domain cannot silently parse as another.
//!
//! Each entry is a kind byte (0 = known symbol, 1 = escape), the symbol's
//! raw literal as u64 little-endian (zero for escape), and its frequency
//! as u64 little-endian.
//!
//! # Checksum Coverage
//!
//! The CRC32 covers the entries region only, so header problems report as
//! the specific header error rather than a checksum mismatch.

use std::hash::Hash;

use crate::diagram::BitDiagram;
use crate::error::{PersistError, Result};
use crate::symbols::{Coded, Literal, Symbols};

/// Magic number for codebook tables: "HCBK" (Huffman CodeBooK)
pub const MAGIC: [u8; 4] = [0x48, 0x43, 0x42, 0x4B];

/// Size of the table header in bytes
pub const HEADER_SIZE: usize = 13;

/// Size of one serialized entry in bytes
pub const ENTRY_SIZE: usize = 17;

/// Table format version
const VERSION: u8 = 1;

/// Bit layout of the header's layout byte
const LAYOUT: &str = "VVVVWWW?";

/// Entry kind for a known symbol
const KIND_KNOWN: u8 = 0;

/// Entry kind for the escape slot
const KIND_ESCAPE: u8 = 1;

/// Serialize a frequency table into bytes.
///
/// Entries are written in the table's first-seen order so that parsing
/// rebuilds the same tie-break order.
pub fn serialize_symbols<S>(symbols: &Symbols<S>) -> Result<Vec<u8>>
where
    S: Literal + Eq + Hash + Clone,
{
    let mut payload = Vec::with_capacity(symbols.len() * ENTRY_SIZE);
    for (slot, frequency) in symbols.iter() {
        match slot {
            Coded::Known(symbol) => {
                payload.push(KIND_KNOWN);
                payload.extend_from_slice(&symbol.to_raw().to_le_bytes());
            }
            Coded::Escape => {
                payload.push(KIND_ESCAPE);
                payload.extend_from_slice(&0u64.to_le_bytes());
            }
        }
        payload.extend_from_slice(&frequency.to_le_bytes());
    }

    let mut bytes = Vec::with_capacity(HEADER_SIZE + payload.len());
    bytes.extend_from_slice(&MAGIC);
    bytes.push(layout_byte::<S>()?);
    bytes.extend_from_slice(&(symbols.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&compute_crc(&payload).to_le_bytes());
    bytes.extend_from_slice(&payload);

    Ok(bytes)
}

/// Parse a frequency table from bytes.
///
/// Duplicate entries for the same symbol merge by summing frequencies.
///
/// # Errors
/// - `PersistError::HeaderTooShort` if the buffer cannot hold a header
/// - `PersistError::InvalidMagic` if the magic number doesn't match
/// - `PersistError::UnsupportedVersion` for an unknown format version
/// - `PersistError::WidthMismatch` if the table was trained over a
///   different symbol domain than `S`
/// - `PersistError::LengthMismatch` if the buffer disagrees with the
///   entry count
/// - `PersistError::Crc` if the entries region fails its checksum
/// - `PersistError::UnknownEntryKind` / `PersistError::InvalidLiteral`
///   for undecodable entries
pub fn parse_symbols<S>(bytes: &[u8]) -> Result<Symbols<S>>
where
    S: Literal + Eq + Hash + Clone,
{
    if bytes.len() < HEADER_SIZE {
        return Err(PersistError::HeaderTooShort {
            required: HEADER_SIZE,
            actual: bytes.len(),
        }
        .into());
    }

    let magic: [u8; 4] = bytes[0..4].try_into().unwrap();
    if magic != MAGIC {
        return Err(PersistError::InvalidMagic {
            expected: MAGIC,
            actual: magic,
        }
        .into());
    }

    let diagram = BitDiagram::parse(LAYOUT)?;
    let layout = u64::from(bytes[4]);

    let version = diagram.field('V')?.extract_int(layout) as u8;
    if version != VERSION {
        return Err(PersistError::UnsupportedVersion { version }.into());
    }

    let stored_width = 1usize << diagram.field('W')?.extract_int(layout);
    if stored_width != S::BIT_WIDTH {
        return Err(PersistError::WidthMismatch {
            stored: stored_width,
            expected: S::BIT_WIDTH,
        }
        .into());
    }

    let count = u32::from_le_bytes(bytes[5..9].try_into().unwrap()) as usize;
    let expected = HEADER_SIZE + count * ENTRY_SIZE;
    if bytes.len() != expected {
        return Err(PersistError::LengthMismatch {
            expected,
            actual: bytes.len(),
        }
        .into());
    }

    let stored_crc = u32::from_le_bytes(bytes[9..13].try_into().unwrap());
    let payload = &bytes[HEADER_SIZE..];
    let actual_crc = compute_crc(payload);
    if stored_crc != actual_crc {
        return Err(PersistError::Crc {
            expected: stored_crc,
            actual: actual_crc,
        }
        .into());
    }

    let mut symbols = Symbols::new();
    for entry in payload.chunks_exact(ENTRY_SIZE) {
        let kind = entry[0];
        let raw = u64::from_le_bytes(entry[1..9].try_into().unwrap());
        let frequency = u64::from_le_bytes(entry[9..17].try_into().unwrap());

        match kind {
            KIND_KNOWN => {
                let symbol = S::from_raw(raw).ok_or(PersistError::InvalidLiteral { raw })?;
                symbols.add(Coded::Known(symbol), frequency);
            }
            KIND_ESCAPE => symbols.add(Coded::Escape, frequency),
            _ => return Err(PersistError::UnknownEntryKind { kind }.into()),
        }
    }

    Ok(symbols)
}

/// Pack the format version and literal width into the layout byte.
fn layout_byte<S: Literal>() -> Result<u8> {
    let diagram = BitDiagram::parse(LAYOUT)?;
    let mut layout = diagram.field('V')?.set(0, u64::from(VERSION));
    layout = diagram
        .field('W')?
        .set(layout, u64::from(S::BIT_WIDTH.trailing_zeros()));
    Ok(layout as u8)
}

/// CRC32 over the entry block, header excluded.
fn compute_crc(payload: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(payload);
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codebook::Codebook;
    use crate::error::Error;

    fn char_table() -> Symbols<char> {
        let mut symbols = Symbols::new();
        for ch in "hello world".chars() {
            symbols.tally(ch);
        }
        symbols.reserve_escape();
        symbols
    }

    /// Recompute the payload checksum after a deliberate payload edit.
    fn patch_crc(bytes: &mut [u8]) {
        let crc = compute_crc(&bytes[HEADER_SIZE..]);
        bytes[9..13].copy_from_slice(&crc.to_le_bytes());
    }

    #[test]
    fn test_round_trip_char() {
        let symbols = char_table();
        let bytes = serialize_symbols(&symbols).unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE + symbols.len() * ENTRY_SIZE);

        let parsed: Symbols<char> = parse_symbols(&bytes).unwrap();
        let original: Vec<_> = symbols.iter().cloned().collect();
        let reloaded: Vec<_> = parsed.iter().cloned().collect();
        assert_eq!(original, reloaded);

        // Same entries in the same order build the same codebook
        let first = Codebook::from_symbols(&symbols).unwrap();
        let second = Codebook::from_symbols(&parsed).unwrap();
        for ch in "hello world".chars() {
            assert_eq!(first.code(&ch), second.code(&ch));
        }
        assert_eq!(first.escape_code(), second.escape_code());
    }

    #[test]
    fn test_round_trip_u16() {
        let mut symbols: Symbols<u16> = Symbols::new();
        for value in [7u16, 42, 42, 300, 7, 7] {
            symbols.tally(value);
        }

        let bytes = serialize_symbols(&symbols).unwrap();
        let parsed: Symbols<u16> = parse_symbols(&bytes).unwrap();

        assert_eq!(parsed.frequency(&Coded::Known(7)), 3);
        assert_eq!(parsed.frequency(&Coded::Known(42)), 2);
        assert_eq!(parsed.frequency(&Coded::Known(300)), 1);
        assert!(!parsed.has_escape());
    }

    #[test]
    fn test_header_too_short() {
        let bytes = serialize_symbols(&char_table()).unwrap();
        let result: Result<Symbols<char>> = parse_symbols(&bytes[..5]);
        assert!(matches!(
            result,
            Err(Error::Persist(PersistError::HeaderTooShort { .. }))
        ));
    }

    #[test]
    fn test_wrong_magic_rejected() {
        let mut bytes = serialize_symbols(&char_table()).unwrap();
        bytes[0] = 0xFF;

        let result: Result<Symbols<char>> = parse_symbols(&bytes);
        assert!(matches!(
            result,
            Err(Error::Persist(PersistError::InvalidMagic { .. }))
        ));
    }

    #[test]
    fn test_unsupported_version() {
        let mut bytes = serialize_symbols(&char_table()).unwrap();
        // Version 2 in the high nibble, char width (log2 32 = 5) unchanged
        bytes[4] = 0b0010_1010;

        let result: Result<Symbols<char>> = parse_symbols(&bytes);
        assert!(matches!(
            result,
            Err(Error::Persist(PersistError::UnsupportedVersion { version: 2 }))
        ));
    }

    #[test]
    fn test_width_mismatch() {
        let mut symbols: Symbols<u16> = Symbols::new();
        symbols.tally(7);
        let bytes = serialize_symbols(&symbols).unwrap();

        let result: Result<Symbols<u32>> = parse_symbols(&bytes);
        assert!(matches!(
            result,
            Err(Error::Persist(PersistError::WidthMismatch {
                stored: 16,
                expected: 32
            }))
        ));
    }

    #[test]
    fn test_truncated_entries() {
        let mut bytes = serialize_symbols(&char_table()).unwrap();
        bytes.pop();

        let result: Result<Symbols<char>> = parse_symbols(&bytes);
        assert!(matches!(
            result,
            Err(Error::Persist(PersistError::LengthMismatch { .. }))
        ));
    }

    #[test]
    fn test_crc_detects_tamper() {
        let mut bytes = serialize_symbols(&char_table()).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;

        let result: Result<Symbols<char>> = parse_symbols(&bytes);
        assert!(matches!(
            result,
            Err(Error::Persist(PersistError::Crc { .. }))
        ));
    }

    #[test]
    fn test_unknown_entry_kind() {
        let mut bytes = serialize_symbols(&char_table()).unwrap();
        bytes[HEADER_SIZE] = 7;
        patch_crc(&mut bytes);

        let result: Result<Symbols<char>> = parse_symbols(&bytes);
        assert!(matches!(
            result,
            Err(Error::Persist(PersistError::UnknownEntryKind { kind: 7 }))
        ));
    }

    #[test]
    fn test_invalid_literal() {
        let mut bytes = serialize_symbols(&char_table()).unwrap();
        // 0xD800 is a surrogate, not a scalar value
        bytes[HEADER_SIZE + 1..HEADER_SIZE + 9].copy_from_slice(&0xD800u64.to_le_bytes());
        patch_crc(&mut bytes);

        let result: Result<Symbols<char>> = parse_symbols(&bytes);
        assert!(matches!(
            result,
            Err(Error::Persist(PersistError::InvalidLiteral { raw: 0xD800 }))
        ));
    }

    #[test]
    fn test_duplicate_entries_merge() {
        let mut symbols: Symbols<char> = Symbols::new();
        symbols.add(Coded::Known('a'), 3);
        let mut bytes = serialize_symbols(&symbols).unwrap();

        // Append a second entry for 'a' and bump the count to 2
        let entry = bytes[HEADER_SIZE..HEADER_SIZE + ENTRY_SIZE].to_vec();
        bytes.extend_from_slice(&entry);
        bytes[5..9].copy_from_slice(&2u32.to_le_bytes());
        patch_crc(&mut bytes);

        let parsed: Symbols<char> = parse_symbols(&bytes).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.frequency(&Coded::Known('a')), 6);
    }
}
