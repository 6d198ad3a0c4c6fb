//! Single-character codec.

use crate::bitio::{BitReader, BitWriter};
use crate::codebook::{Codebook, Encoded};
use crate::error::{HuffmanError, Result};
use crate::symbols::{Coded, Literal, Symbols};

use super::{read_literal, train_codebook, write_code, TrainOptions};

/// Encodes and decodes one character at a time against a trained codebook.
///
/// Characters absent from the trained alphabet travel escaped: the escape
/// codeword followed by the character's scalar value in 32 bits.
#[derive(Debug, Clone)]
pub struct CharacterCodec {
    symbols: Symbols<char>,
    codebook: Codebook<char>,
}

impl CharacterCodec {
    /// Train on a corpus with default options.
    pub fn train(corpus: &str) -> Result<Self> {
        Self::train_with(corpus, &TrainOptions::default())
    }

    /// Train on a corpus.
    ///
    /// An escape slot is always reserved, so any character encodes after
    /// training, in vocabulary or not.
    ///
    /// # Errors
    /// Returns `HuffmanError::EmptyAlphabet` for an empty corpus.
    pub fn train_with(corpus: &str, options: &TrainOptions) -> Result<Self> {
        let mut symbols = Symbols::new();
        for ch in corpus.chars() {
            symbols.tally(ch);
        }

        let codebook = train_codebook(&mut symbols, options)?;
        Ok(Self { symbols, codebook })
    }

    /// Rebuild a codec from a frequency table, typically a parsed one.
    ///
    /// The table is used as-is: no escape is reserved and no filtering is
    /// applied, so a persisted table rebuilds exactly the codec that
    /// serialized it.
    ///
    /// # Errors
    /// Returns `HuffmanError::EmptyAlphabet` if the table is empty.
    pub fn from_symbols(symbols: Symbols<char>) -> Result<Self> {
        let codebook = Codebook::from_symbols(&symbols)?;
        Ok(Self { symbols, codebook })
    }

    /// Encode one character onto the writer.
    ///
    /// # Errors
    /// Returns `HuffmanError::UntrainedCodec` for an out-of-vocabulary
    /// character when the codebook has no escape code.
    pub fn encode(&self, ch: char, writer: &mut BitWriter) -> Result<()> {
        match self.codebook.encode(&ch)? {
            Encoded::Known(code) => write_code(writer, code),
            Encoded::Escaped(code) => {
                write_code(writer, code)?;
                writer.write_bits(ch.to_raw(), char::BIT_WIDTH)
            }
        }
    }

    /// Decode one character from the reader.
    ///
    /// # Errors
    /// Returns `HuffmanError::CorruptStream` if the stream truncates
    /// mid-codeword or mid-literal, or an escape literal is not a valid
    /// scalar value.
    pub fn decode(&self, reader: &mut BitReader<'_>) -> Result<char> {
        match self.codebook.decode_symbol(reader)? {
            Coded::Known(ch) => Ok(*ch),
            Coded::Escape => {
                let raw = read_literal(reader, char::BIT_WIDTH)?;
                char::from_raw(raw).ok_or_else(|| {
                    HuffmanError::CorruptStream {
                        bit_position: reader.position(),
                    }
                    .into()
                })
            }
        }
    }

    /// The frequency table this codec encodes with.
    pub fn symbols(&self) -> &Symbols<char> {
        &self.symbols
    }

    /// The trained codeword table.
    pub fn codebook(&self) -> &Codebook<char> {
        &self.codebook
    }
}
