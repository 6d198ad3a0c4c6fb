//! Error types for the bitpress compression subsystem.
//!
//! Fallible operations return these instead of panicking.
//! Every failure here is local and non-retryable: bad construction input,
//! a malformed bit stream, or a corrupted persisted table.

use thiserror::Error;

/// Top-level error type for all operations in the subsystem.
///
/// One variant per failure domain:
/// - Diagram: bit-field pattern parsing and field access
/// - Bit I/O: bit-level reads and writes over byte buffers
/// - Huffman: codec training or encode/decode failures
/// - Persist: symbol-table serialization/parsing
/// - I/O: filesystem access when loading or saving tables
#[derive(Debug, Error)]
pub enum Error {
    /// Bit diagram parsing or field access failed
    #[error("bit diagram error: {0}")]
    Diagram(#[from] DiagramError),

    /// Bit-level read or write failed
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Huffman training or encode/decode error
    #[error("huffman codec error: {0}")]
    Huffman(#[from] HuffmanError),

    /// Persisted symbol table error
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),

    /// Underlying filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bit-field diagram errors.
#[derive(Debug, Error)]
pub enum DiagramError {
    /// Pattern cannot be parsed into a valid field layout
    #[error("invalid pattern {pattern:?}: {reason}")]
    InvalidPattern {
        pattern: String,
        reason: &'static str,
    },

    /// No field with this letter exists in the diagram
    #[error("no field {letter:?} in pattern {pattern:?}")]
    UnknownField { letter: char, pattern: String },

    /// Boolean extraction requires a 1-bit field
    #[error("field {letter:?} is {width} bits wide, expected exactly 1")]
    WrongWidth { letter: char, width: u32 },
}

/// Errors from the bit reader and writer.
#[derive(Debug, Error)]
pub enum BitIoError {
    /// Bit length must be 1..=64
    #[error("invalid bit length {length}: must be between 1 and 64")]
    InvalidLength { length: usize },

    /// Attempted to read past the end of the stream
    #[error("end of stream: requested {requested} bits, {available} available")]
    EndOfStream { requested: usize, available: usize },
}

/// Huffman training and codec errors.
#[derive(Debug, Error)]
pub enum HuffmanError {
    /// No symbols with non-zero frequency (cannot build a codebook)
    #[error("empty alphabet: cannot build a codebook")]
    EmptyAlphabet,

    /// Symbol has no codeword and the alphabet reserved no escape
    #[error("symbol not in trained alphabet and no escape code reserved")]
    UntrainedCodec,

    /// Operation requires an escape entry in the training table
    #[error("training table reserved no escape entry")]
    MissingEscape,

    /// Codeword does not fit in 64 bits
    #[error("code length {length} exceeds 64 bits")]
    CodeTooLong { length: u32 },

    /// Code-length cap must be 1..=64
    #[error("maximum code length {max_bits} out of range 1..=64")]
    MaxBitsOutOfRange { max_bits: u32 },

    /// Stream ended mid-codeword or decoded an impossible value
    #[error("corrupt stream at bit {bit_position}")]
    CorruptStream { bit_position: usize },

    /// Sequence does not fit the u32 count prefix
    #[error("sequence of {count} elements exceeds the u32 count prefix")]
    SequenceTooLong { count: usize },
}

/// Persisted symbol table errors.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Table is too short to contain a valid header
    #[error("table too short: need at least {required} bytes, got {actual}")]
    HeaderTooShort { required: usize, actual: usize },

    /// Header does not begin with the expected magic
    #[error("invalid magic number: expected {expected:?}, got {actual:?}")]
    InvalidMagic { expected: [u8; 4], actual: [u8; 4] },

    /// Table was written by an unknown format version
    #[error("unsupported table version {version}")]
    UnsupportedVersion { version: u8 },

    /// Table stores literals of a different width than the target type
    #[error("literal width mismatch: table has {stored}-bit symbols, expected {expected}")]
    WidthMismatch { stored: usize, expected: usize },

    /// Total length doesn't match the header's entry count
    #[error("length mismatch: header says {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Checksum over the entry block does not match
    #[error("CRC mismatch: expected {expected:#010x}, got {actual:#010x}")]
    Crc { expected: u32, actual: u32 },

    /// Entry kind byte is neither known nor escape
    #[error("unknown entry kind {kind}")]
    UnknownEntryKind { kind: u8 },

    /// Stored raw bits do not form a valid symbol
    #[error("raw value {raw:#x} is not a valid symbol literal")]
    InvalidLiteral { raw: u64 },
}

/// Crate-wide Result alias.
pub type Result<T> = std::result::Result<T, Error>;
