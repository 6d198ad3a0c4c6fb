//! Statistics collection and reporting for encode runs.
//!
//! This module provides observable insights into codec behavior:
//! - Compression ratio (encoded bytes vs. input bytes)
//! - Bits per symbol
//! - Escape rate (how often the trained alphabet missed)
//! - Codebook shape (alphabet size, longest code)
//!
//! Counters are plain fields with no synchronization. Keep one instance
//! per run, or one per worker and merge at the end.

use std::time::{Duration, Instant};

/// Counters for one encode run.
///
/// Fields are public and updated explicitly at each stage.
#[derive(Debug, Clone)]
pub struct CompressionStats {
    // === Wall clock ===
    /// When the run began
    pub started: Instant,

    /// Set once `complete()` is called
    pub finished: Option<Instant>,

    // === Volume ===
    /// Symbols pushed through the encoder
    pub symbols_in: u64,

    /// Input size in bytes before encoding
    pub bytes_in: u64,

    /// Encoded output size in bytes
    pub bytes_out: u64,

    /// Symbols that had no codeword and traveled escaped
    pub escaped_symbols: u64,

    // === Codebook ===
    /// Number of codewords in the trained codebook, escape included
    pub alphabet_len: usize,

    /// Longest codeword length in bits
    pub max_code_length: u32,
}

impl CompressionStats {
    /// Fresh counters; the clock starts immediately.
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            finished: None,
            symbols_in: 0,
            bytes_in: 0,
            bytes_out: 0,
            escaped_symbols: 0,
            alphabet_len: 0,
            max_code_length: 0,
        }
    }

    /// Stop the clock.
    pub fn complete(&mut self) {
        self.finished = Some(Instant::now());
    }

    /// Wall time from construction to `complete()`, or to now while running.
    pub fn duration(&self) -> Duration {
        match self.finished {
            Some(at) => at.duration_since(self.started),
            None => self.started.elapsed(),
        }
    }

    /// Ratio of encoded bytes to input bytes (0.0 when nothing went in).
    pub fn compression_ratio(&self) -> f64 {
        if self.bytes_in == 0 {
            return 0.0;
        }
        self.bytes_out as f64 / self.bytes_in as f64
    }

    /// Average encoded cost of one symbol in bits.
    pub fn bits_per_symbol(&self) -> f64 {
        if self.symbols_in == 0 {
            return 0.0;
        }
        (self.bytes_out * 8) as f64 / self.symbols_in as f64
    }

    /// Share of symbols that traveled escaped.
    pub fn escape_rate(&self) -> f64 {
        if self.symbols_in == 0 {
            return 0.0;
        }
        self.escaped_symbols as f64 / self.symbols_in as f64
    }

    /// Input bytes processed per second of wall time.
    pub fn throughput_bps(&self) -> f64 {
        let secs = self.duration().as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.bytes_in as f64 / secs
    }

    /// Print the sectioned summary shown after each demo stage.
    pub fn print_summary(&self) {
        println!("\n=== Compression Summary ===");
        println!("Symbols: {}", self.symbols_in);
        println!("Input:  {} bytes", self.bytes_in);
        println!("Output: {} bytes", self.bytes_out);
        println!("Ratio: {:.1}% of input", self.compression_ratio() * 100.0);
        println!("Bits per symbol: {:.2}", self.bits_per_symbol());
        println!(
            "Escaped: {} ({:.2}%)",
            self.escaped_symbols,
            self.escape_rate() * 100.0
        );
        println!();

        println!("=== Codebook ===");
        println!("Alphabet size: {}", self.alphabet_len);
        println!("Longest code: {} bits", self.max_code_length);
        println!();

        println!("=== Throughput ===");
        println!("Elapsed: {} ms", self.duration().as_millis());
        println!("Rate: {:.2} MB/s", self.throughput_bps() / 1_000_000.0);
        println!();
    }

    /// Export stats as key=value lines (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "elapsed_ms={}\n\
             symbols_in={}\n\
             bytes_in={}\n\
             bytes_out={}\n\
             ratio={:.4}\n\
             bits_per_symbol={:.4}\n\
             escaped_symbols={}\n\
             escape_rate={:.4}\n\
             alphabet_len={}\n\
             max_code_length={}\n",
            self.duration().as_millis(),
            self.symbols_in,
            self.bytes_in,
            self.bytes_out,
            self.compression_ratio(),
            self.bits_per_symbol(),
            self.escaped_symbols,
            self.escape_rate(),
            self.alphabet_len,
            self.max_code_length,
        )
    }
}

impl Default for CompressionStats {
    fn default() -> Self {
        Self::new()
    }
}
