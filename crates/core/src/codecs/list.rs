//! Length-prefixed codec for sequences of any literal type.

use std::hash::Hash;

use crate::bitio::{BitReader, BitWriter};
use crate::codebook::{Codebook, Encoded};
use crate::error::{HuffmanError, Result};
use crate::symbols::{Coded, Literal, Symbols};

use super::{read_count, read_literal, train_codebook, write_code, write_count, TrainOptions};

/// Encodes slices of `T` with the same framing as the string codec: a u32
/// element count, then one codeword per element.
///
/// The [`Literal`] impl of `T` supplies the raw projection used for escape
/// literals, so out-of-vocabulary elements round-trip in `T::BIT_WIDTH`
/// bits each.
#[derive(Debug, Clone)]
pub struct ListCodec<T> {
    symbols: Symbols<T>,
    codebook: Codebook<T>,
}

impl<T: Literal + Eq + Hash + Clone> ListCodec<T> {
    /// Train on a corpus with default options.
    pub fn train(corpus: &[T]) -> Result<Self> {
        Self::train_with(corpus, &TrainOptions::default())
    }

    /// Train on a corpus.
    ///
    /// # Errors
    /// Returns `HuffmanError::EmptyAlphabet` for an empty corpus.
    pub fn train_with(corpus: &[T], options: &TrainOptions) -> Result<Self> {
        let mut symbols = Symbols::new();
        for item in corpus {
            symbols.tally(item.clone());
        }

        let codebook = train_codebook(&mut symbols, options)?;
        Ok(Self { symbols, codebook })
    }

    /// Rebuild a codec from a frequency table, typically a parsed one.
    ///
    /// # Errors
    /// Returns `HuffmanError::EmptyAlphabet` if the table is empty.
    pub fn from_symbols(symbols: Symbols<T>) -> Result<Self> {
        let codebook = Codebook::from_symbols(&symbols)?;
        Ok(Self { symbols, codebook })
    }

    /// Encode a slice of elements onto the writer.
    ///
    /// # Errors
    /// Returns `HuffmanError::SequenceTooLong` if the slice has more
    /// elements than the u32 count prefix can carry.
    pub fn encode(&self, items: &[T], writer: &mut BitWriter) -> Result<()> {
        write_count(writer, items.len())?;
        for item in items {
            match self.codebook.encode(item)? {
                Encoded::Known(code) => write_code(writer, code)?,
                Encoded::Escaped(code) => {
                    write_code(writer, code)?;
                    writer.write_bits(item.to_raw(), T::BIT_WIDTH)?;
                }
            }
        }
        Ok(())
    }

    /// Decode one encoded sequence from the reader.
    ///
    /// # Errors
    /// Returns `HuffmanError::CorruptStream` if the stream truncates
    /// before the promised element count is read, or an escape literal
    /// is not a valid `T`.
    pub fn decode(&self, reader: &mut BitReader<'_>) -> Result<Vec<T>> {
        let count = read_count(reader)?;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            match self.codebook.decode_symbol(reader)? {
                Coded::Known(item) => items.push(item.clone()),
                Coded::Escape => {
                    let raw = read_literal(reader, T::BIT_WIDTH)?;
                    let item = T::from_raw(raw).ok_or(HuffmanError::CorruptStream {
                        bit_position: reader.position(),
                    })?;
                    items.push(item);
                }
            }
        }
        Ok(items)
    }

    /// The frequency table this codec encodes with.
    pub fn symbols(&self) -> &Symbols<T> {
        &self.symbols
    }

    /// The trained codeword table.
    pub fn codebook(&self) -> &Codebook<T> {
        &self.codebook
    }
}
