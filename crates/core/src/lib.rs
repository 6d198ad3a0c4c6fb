//! bitpress-core: Bit-level compression primitives with Huffman entropy coding
//!
//! This library provides the building blocks for compact binary encodings:
//! - Declares named bit fields over packed integers via textual diagrams
//! - Trains optimal prefix codes from symbol frequency tables
//! - Streams codewords through byte-spanning bit cursors
//! - Persists trained tables for deterministic codec rebuilds
//!
//! # Architecture
//!
//! The system is designed around clear module boundaries:
//! - `diagram`: Named bit fields parsed from layout strings
//! - `bitio`: Low-level bit reading/writing
//! - `symbols`: Insertion-ordered frequency tables and the escape slot
//! - `tree`: Huffman tree construction and traversal
//! - `codebook`: Prefix-free codeword tables
//! - `codecs`: Character, string, and list codecs
//! - `persist`: Trained-table serialization
//! - `stats`: Observable codec behavior
//!
//! # Design Principles
//!
//! - **No panics**: All errors are structured and recoverable
//! - **Deterministic**: Insertion-ordered tie-breaks make training reproducible
//! - **Bit-exact**: MSB-first layouts are part of the wire contract
//! - **Single-use cursors**: Readers and writers bind to exactly one stream

pub mod bitio;
pub mod codebook;
pub mod codecs;
pub mod diagram;
pub mod error;
pub mod persist;
pub mod stats;
pub mod symbols;
pub mod tree;

// Re-export commonly used types
pub use error::{Error, Result};
