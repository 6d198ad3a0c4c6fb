//! Codeword tables mapping symbols to Huffman codes.
//!
//! A [`Codebook`] owns the tree it was built from: encoding looks codes up
//! by symbol, decoding walks the tree. The table is prefix-free by
//! construction, and immutable once built, so one codebook can serve any
//! number of concurrent encode and decode operations.
//!
//! When the training table reserved an escape entry, the escape holds a
//! real codeword like any other symbol. Encoding an out-of-vocabulary
//! symbol yields [`Encoded::Escaped`], and the caller writes the symbol's
//! raw fixed-width literal immediately after the escape codeword.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use crate::bitio::BitReader;
use crate::error::{HuffmanError, Result};
use crate::symbols::{Coded, Symbols};
use crate::tree::HuffmanTree;

/// A Huffman codeword: up to 64 bits plus their length, written MSB-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code {
    bits: u64,
    length: u8,
}

impl Code {
    pub(crate) fn new(bits: u64, length: u8) -> Self {
        Self { bits, length }
    }

    /// Return the codeword bits, right-aligned.
    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// Return the codeword length in bits.
    pub fn length(&self) -> u8 {
        self.length
    }
}

impl fmt::Display for Code {
    /// Formats the codeword as its exact bit string, e.g. "010".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0>1$b}", self.bits, usize::from(self.length))
    }
}

/// The encoder's verdict for one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoded {
    /// The symbol has its own codeword
    Known(Code),
    /// The symbol is out of vocabulary: write this escape codeword, then
    /// the symbol's raw fixed-width literal
    Escaped(Code),
}

/// A prefix-free codeword table over symbols of type `S`.
///
/// # Invariants
/// - no codeword is a bit-prefix of another
/// - the escape code, when present, is fixed at build time
#[derive(Debug, Clone)]
pub struct Codebook<S> {
    tree: HuffmanTree<Coded<S>>,
    known: HashMap<S, Code>,
    escape: Option<Code>,
}

impl<S: Eq + Hash + Clone> Codebook<S> {
    /// Build a codebook from a frequency table.
    ///
    /// The table's insertion order fixes all frequency tie-breaks, so the
    /// same table always builds the same codebook.
    ///
    /// # Errors
    /// Returns `HuffmanError::EmptyAlphabet` if the table is empty.
    pub fn from_symbols(symbols: &Symbols<S>) -> Result<Self> {
        let tree = HuffmanTree::from_frequencies(
            symbols.iter().map(|(symbol, count)| (symbol.clone(), *count)),
        )?;

        let mut known = HashMap::new();
        let mut escape = None;
        for (slot, code) in tree.codes()? {
            match slot {
                Coded::Known(symbol) => {
                    known.insert(symbol, code);
                }
                Coded::Escape => escape = Some(code),
            }
        }

        Ok(Self { tree, known, escape })
    }

    /// Build a codebook whose longest codeword does not exceed `max_bits`.
    ///
    /// Brute force: build a tree, and while it is too tall, drop the least
    /// frequent symbol from `symbols` (folding its count into the escape
    /// entry) and rebuild. Dropped symbols travel escaped from then on.
    ///
    /// `symbols` is modified in place, so persisting it afterward captures
    /// the exact table this codebook was built from.
    ///
    /// # Errors
    /// - `HuffmanError::MaxBitsOutOfRange` if `max_bits` is 0 or over 64
    /// - `HuffmanError::MissingEscape` if `symbols` has no escape entry
    /// - `HuffmanError::EmptyAlphabet` if `symbols` is empty
    pub fn with_max_bits(symbols: &mut Symbols<S>, max_bits: u32) -> Result<Self> {
        if max_bits == 0 || max_bits > 64 {
            return Err(HuffmanError::MaxBitsOutOfRange { max_bits }.into());
        }
        if !symbols.has_escape() {
            return Err(HuffmanError::MissingEscape.into());
        }

        loop {
            let codebook = Self::from_symbols(symbols)?;
            if codebook.max_code_length() <= max_bits
                || symbols.drop_least_frequent().is_none()
            {
                return Ok(codebook);
            }
        }
    }

    /// Look up the codeword for a known symbol.
    pub fn code(&self, symbol: &S) -> Option<Code> {
        self.known.get(symbol).copied()
    }

    /// Return the escape codeword, if one was reserved during training.
    pub fn escape_code(&self) -> Option<Code> {
        self.escape
    }

    /// Resolve the codeword for `symbol`.
    ///
    /// A known symbol yields its own codeword. An unknown symbol yields
    /// the escape codeword, and the caller must write the symbol's raw
    /// literal immediately after it.
    ///
    /// # Errors
    /// Returns `HuffmanError::UntrainedCodec` for an unknown symbol when
    /// no escape code was reserved.
    pub fn encode(&self, symbol: &S) -> Result<Encoded> {
        if let Some(code) = self.known.get(symbol) {
            return Ok(Encoded::Known(*code));
        }
        match self.escape {
            Some(code) => Ok(Encoded::Escaped(code)),
            None => Err(HuffmanError::UntrainedCodec.into()),
        }
    }

    /// Decode one symbol slot by walking the tree.
    ///
    /// Returns [`Coded::Escape`] when the escape codeword was read; the
    /// caller then reads the raw literal that follows.
    ///
    /// # Errors
    /// Returns `HuffmanError::CorruptStream` if the stream is exhausted
    /// mid-walk.
    pub fn decode_symbol(&self, reader: &mut BitReader<'_>) -> Result<&Coded<S>> {
        self.tree.decode_symbol(reader)
    }

    /// Return the number of codewords, escape included.
    pub fn len(&self) -> usize {
        self.known.len() + usize::from(self.escape.is_some())
    }

    /// Check whether the codebook assigns no codewords.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the longest codeword length in bits.
    pub fn max_code_length(&self) -> u32 {
        self.tree.height()
    }

    /// Iterate known symbols and their codewords in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&S, Code)> {
        self.known.iter().map(|(symbol, code)| (symbol, *code))
    }
}

impl<S: Eq + Hash + Clone + fmt::Debug> fmt::Display for Codebook<S> {
    /// Formats the code table one row per symbol, shortest codes first.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rows: Vec<(String, Code)> = self
            .known
            .iter()
            .map(|(symbol, code)| (format!("{symbol:?}"), *code))
            .collect();
        if let Some(code) = self.escape {
            rows.push(("<escape>".to_string(), code));
        }
        rows.sort_by_key(|(_, code)| (code.length(), code.bits()));

        for (symbol, code) in rows {
            writeln!(f, "{symbol} -> {code} ({} bits)", code.length())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitio::BitWriter;
    use crate::error::Error;

    fn table(frequencies: &[(char, u64)]) -> Symbols<char> {
        let mut symbols = Symbols::new();
        for &(symbol, count) in frequencies {
            symbols.add(Coded::Known(symbol), count);
        }
        symbols
    }

    #[test]
    fn test_skewed_table() {
        let symbols = table(&[('a', 5), ('b', 2), ('c', 1), ('d', 1)]);
        let codebook = Codebook::from_symbols(&symbols).unwrap();

        let a = codebook.code(&'a').unwrap();
        assert_eq!((a.bits(), a.length()), (0b1, 1));
        let b = codebook.code(&'b').unwrap();
        assert_eq!((b.bits(), b.length()), (0b00, 2));
        let c = codebook.code(&'c').unwrap();
        assert_eq!((c.bits(), c.length()), (0b010, 3));
        let d = codebook.code(&'d').unwrap();
        assert_eq!((d.bits(), d.length()), (0b011, 3));

        assert_eq!(codebook.len(), 4);
        assert_eq!(codebook.max_code_length(), 3);
        assert_eq!(codebook.escape_code(), None);
    }

    #[test]
    fn test_order_of_magnitude_table() {
        let symbols = table(&[('a', 1), ('b', 10), ('c', 1000), ('d', 100)]);
        let codebook = Codebook::from_symbols(&symbols).unwrap();

        assert_eq!(codebook.code(&'a').unwrap().to_string(), "000");
        assert_eq!(codebook.code(&'b').unwrap().to_string(), "001");
        assert_eq!(codebook.code(&'d').unwrap().to_string(), "01");
        assert_eq!(codebook.code(&'c').unwrap().to_string(), "1");
    }

    #[test]
    fn test_word_frequency_table() {
        let mut symbols = Symbols::new();
        for (word, count) in [("stxq", 803), ("sshtp", 1366), ("i", 7088), ("zvgupm", 7486)] {
            symbols.add(Coded::Known(word.to_string()), count);
        }
        let codebook = Codebook::from_symbols(&symbols).unwrap();

        assert_eq!(codebook.code(&"stxq".to_string()).unwrap().to_string(), "100");
        assert_eq!(codebook.code(&"sshtp".to_string()).unwrap().to_string(), "101");
        assert_eq!(codebook.code(&"i".to_string()).unwrap().to_string(), "11");
        assert_eq!(codebook.code(&"zvgupm".to_string()).unwrap().to_string(), "0");
    }

    #[test]
    fn test_escape_assigns_real_code() {
        let mut symbols = table(&[('a', 5), ('b', 2)]);
        symbols.reserve_escape();
        let codebook = Codebook::from_symbols(&symbols).unwrap();

        let escape = codebook.escape_code().unwrap();
        assert!(escape.length() > 0);
        assert_eq!(codebook.len(), 3);

        // Unknown symbols resolve to the escape codeword
        match codebook.encode(&'z').unwrap() {
            Encoded::Escaped(code) => assert_eq!(code, escape),
            Encoded::Known(_) => panic!("'z' must escape"),
        }

        // The escape decodes as its own slot
        let mut writer = BitWriter::new();
        writer
            .write_bits(escape.bits(), usize::from(escape.length()))
            .unwrap();
        let bytes = writer.finish();
        let mut reader = BitReader::new(&bytes);
        assert!(codebook.decode_symbol(&mut reader).unwrap().is_escape());
    }

    #[test]
    fn test_unknown_without_escape_fails() {
        let symbols = table(&[('a', 5), ('b', 2)]);
        let codebook = Codebook::from_symbols(&symbols).unwrap();

        assert!(matches!(
            codebook.encode(&'z'),
            Err(Error::Huffman(HuffmanError::UntrainedCodec))
        ));
    }

    #[test]
    fn test_with_max_bits_requires_escape() {
        let mut symbols = table(&[('a', 5), ('b', 2)]);
        assert!(matches!(
            Codebook::with_max_bits(&mut symbols, 8),
            Err(Error::Huffman(HuffmanError::MissingEscape))
        ));
    }

    #[test]
    fn test_max_bits_out_of_range() {
        let mut symbols = table(&[('a', 5)]);
        symbols.reserve_escape();

        assert!(matches!(
            Codebook::with_max_bits(&mut symbols, 0),
            Err(Error::Huffman(HuffmanError::MaxBitsOutOfRange { max_bits: 0 }))
        ));
        assert!(matches!(
            Codebook::with_max_bits(&mut symbols, 65),
            Err(Error::Huffman(HuffmanError::MaxBitsOutOfRange { max_bits: 65 }))
        ));
    }

    #[test]
    fn test_with_max_bits_caps_length() {
        // Fibonacci-like frequencies force a maximally skewed tree
        let mut symbols = table(&[
            ('a', 1),
            ('b', 1),
            ('c', 2),
            ('d', 3),
            ('e', 5),
            ('f', 8),
            ('g', 13),
            ('h', 21),
        ]);
        symbols.reserve_escape();

        let uncapped = Codebook::from_symbols(&symbols).unwrap();
        assert!(uncapped.max_code_length() > 4);

        let capped = Codebook::with_max_bits(&mut symbols, 4).unwrap();
        assert!(capped.max_code_length() <= 4);

        // 'a' was the least frequent and lost its codeword
        assert_eq!(capped.code(&'a'), None);
        assert!(matches!(capped.encode(&'a').unwrap(), Encoded::Escaped(_)));

        // Its count folded into the escape entry of the caller's table
        assert_eq!(symbols.frequency(&Coded::Escape), 2);
        assert_eq!(symbols.frequency(&Coded::Known('a')), 0);
    }

    #[test]
    fn test_prefix_free() {
        let mut symbols = table(&[
            ('e', 120),
            ('t', 90),
            ('a', 80),
            ('o', 75),
            ('n', 70),
            ('s', 60),
            ('r', 55),
            ('x', 3),
            ('q', 1),
        ]);
        symbols.reserve_escape();
        let codebook = Codebook::from_symbols(&symbols).unwrap();

        let mut codes: Vec<Code> = codebook.iter().map(|(_, code)| code).collect();
        if let Some(escape) = codebook.escape_code() {
            codes.push(escape);
        }

        for (i, shorter) in codes.iter().enumerate() {
            for (j, longer) in codes.iter().enumerate() {
                if i == j || shorter.length() > longer.length() {
                    continue;
                }
                let prefix = longer.bits() >> (longer.length() - shorter.length());
                assert!(
                    shorter.length() != longer.length() || shorter.bits() != longer.bits(),
                    "duplicate code"
                );
                if shorter.length() < longer.length() {
                    assert_ne!(prefix, shorter.bits(), "{shorter} prefixes {longer}");
                }
            }
        }
    }

    #[test]
    fn test_single_symbol_codebook() {
        let symbols = table(&[('x', 9)]);
        let codebook = Codebook::from_symbols(&symbols).unwrap();

        let code = codebook.code(&'x').unwrap();
        assert_eq!((code.bits(), code.length()), (0, 1));
        assert_eq!(codebook.max_code_length(), 1);
    }

    #[test]
    fn test_display_lists_codes() {
        let mut symbols = table(&[('a', 5), ('b', 2)]);
        symbols.reserve_escape();
        let codebook = Codebook::from_symbols(&symbols).unwrap();

        let listing = codebook.to_string();
        assert!(listing.contains("-> "));
        assert!(listing.contains("<escape>"));
        assert_eq!(listing.lines().count(), 3);
    }

    #[test]
    fn test_retraining_assigns_same_codes() {
        let frequencies = [('m', 3), ('n', 3), ('o', 7), ('p', 1)];
        let first = Codebook::from_symbols(&table(&frequencies)).unwrap();
        let second = Codebook::from_symbols(&table(&frequencies)).unwrap();

        for (symbol, _) in &frequencies {
            assert_eq!(first.code(symbol), second.code(symbol));
        }
    }
}
