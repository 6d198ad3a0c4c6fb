//! Symbol-sequence codecs over a shared Huffman core.
//!
//! Three codecs cover the common shapes:
//! - [`CharacterCodec`]: one Unicode character at a time
//! - [`StringCodec`]: length-prefixed character sequences
//! - [`ListCodec`]: length-prefixed sequences of any [`Literal`] type
//!
//! All three share the same wire rules: a u32 element-count prefix, then
//! one codeword per element with no padding between elements, escaped
//! elements followed by their raw fixed-width literal. The buffer is
//! padded to a byte boundary only at its very end.
//!
//! [`Literal`]: crate::symbols::Literal

mod character;
mod list;
mod string;

pub use character::CharacterCodec;
pub use list::ListCodec;
pub use string::StringCodec;

use std::hash::Hash;

use crate::bitio::{BitReader, BitWriter};
use crate::codebook::{Code, Codebook};
use crate::error::{BitIoError, Error, HuffmanError, Result};
use crate::symbols::Symbols;

/// Width of the element-count prefix for strings and lists
pub(crate) const COUNT_BITS: usize = 32;

/// Training knobs shared by all codecs.
#[derive(Debug, Clone)]
pub struct TrainOptions {
    /// Cap on codeword length; None accepts whatever the tree produces
    pub max_code_length: Option<u32>,
    /// Symbols seen fewer times than this train as escapes instead
    pub min_occurrences: u64,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            max_code_length: None,
            min_occurrences: 1,
        }
    }
}

/// Shared training path: reserve the escape slot, apply the occurrence
/// floor, then build the codebook, capped or not.
///
/// The empty check runs before the escape is reserved, so an empty corpus
/// reports as such instead of training an escape-only alphabet.
pub(crate) fn train_codebook<S>(
    symbols: &mut Symbols<S>,
    options: &TrainOptions,
) -> Result<Codebook<S>>
where
    S: Eq + Hash + Clone,
{
    if symbols.is_empty() {
        return Err(HuffmanError::EmptyAlphabet.into());
    }

    symbols.reserve_escape();
    if options.min_occurrences > 1 {
        symbols.retain_min_count(options.min_occurrences);
    }

    match options.max_code_length {
        Some(max_bits) => Codebook::with_max_bits(symbols, max_bits),
        None => Codebook::from_symbols(symbols),
    }
}

/// Write one codeword.
pub(crate) fn write_code(writer: &mut BitWriter, code: Code) -> Result<()> {
    writer.write_bits(code.bits(), usize::from(code.length()))
}

/// Write the element-count prefix.
///
/// # Errors
/// Returns `HuffmanError::SequenceTooLong` if `count` exceeds u32.
pub(crate) fn write_count(writer: &mut BitWriter, count: usize) -> Result<()> {
    let prefix = u32::try_from(count).map_err(|_| HuffmanError::SequenceTooLong { count })?;
    writer.write_bits(u64::from(prefix), COUNT_BITS)
}

/// Read the element-count prefix.
///
/// Every element costs at least one bit, so a count exceeding the bits
/// left in the stream is corrupt.
pub(crate) fn read_count(reader: &mut BitReader<'_>) -> Result<usize> {
    let count = read_literal(reader, COUNT_BITS)? as usize;
    if count > reader.bits_remaining() {
        return Err(HuffmanError::CorruptStream {
            bit_position: reader.position(),
        }
        .into());
    }
    Ok(count)
}

/// Read a raw fixed-width value, reporting truncation as corruption.
pub(crate) fn read_literal(reader: &mut BitReader<'_>, width: usize) -> Result<u64> {
    reader.read_bits(width).map_err(|error| match error {
        Error::BitIo(BitIoError::EndOfStream { .. }) => {
            Error::Huffman(HuffmanError::CorruptStream {
                bit_position: reader.position(),
            })
        }
        other => other,
    })
}
