//! Length-prefixed string codec.

use crate::bitio::{BitReader, BitWriter};
use crate::error::Result;

use super::{read_count, write_count, CharacterCodec, TrainOptions};

/// Encodes whole strings as a u32 character count followed by one
/// character codeword per character.
///
/// The count prefix means no terminator symbol has to be reserved in the
/// alphabet, and the decoder knows exactly where a string ends even though
/// the final byte carries padding bits.
#[derive(Debug, Clone)]
pub struct StringCodec {
    characters: CharacterCodec,
}

impl StringCodec {
    /// Train on a corpus with default options.
    pub fn train(corpus: &str) -> Result<Self> {
        Self::train_with(corpus, &TrainOptions::default())
    }

    /// Train on a corpus.
    ///
    /// # Errors
    /// Returns `HuffmanError::EmptyAlphabet` for an empty corpus.
    pub fn train_with(corpus: &str, options: &TrainOptions) -> Result<Self> {
        Ok(Self {
            characters: CharacterCodec::train_with(corpus, options)?,
        })
    }

    /// Wrap an already trained character codec.
    pub fn from_characters(characters: CharacterCodec) -> Self {
        Self { characters }
    }

    /// Encode `text` onto the writer.
    ///
    /// # Errors
    /// Returns `HuffmanError::SequenceTooLong` if `text` has more
    /// characters than the u32 count prefix can carry.
    pub fn encode(&self, text: &str, writer: &mut BitWriter) -> Result<()> {
        write_count(writer, text.chars().count())?;
        for ch in text.chars() {
            self.characters.encode(ch, writer)?;
        }
        Ok(())
    }

    /// Decode one string from the reader.
    ///
    /// # Errors
    /// Returns `HuffmanError::CorruptStream` if the stream truncates
    /// before the promised character count is read.
    pub fn decode(&self, reader: &mut BitReader<'_>) -> Result<String> {
        let count = read_count(reader)?;
        let mut text = String::with_capacity(count);
        for _ in 0..count {
            text.push(self.characters.decode(reader)?);
        }
        Ok(text)
    }

    /// The character codec handling individual characters.
    pub fn characters(&self) -> &CharacterCodec {
        &self.characters
    }
}
