//! Configuration for the bitpress demo application.
//!
//! Command-line parsing plus default generation. A bare `bitpress` run
//! must work: anything not given on the command line gets a default,
//! and randomized defaults come from the seeded rng so that passing the
//! printed seed back in replays the exact run.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;

/// Complete configuration for a demo run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Seed for corpus generation and randomized defaults
    pub seed: u64,

    // === Text stage ===
    /// Training corpus size in characters
    pub corpus_chars: usize,

    /// Probe text size in characters
    pub probe_chars: usize,

    /// Inject one out-of-vocabulary character roughly every N characters
    /// (0 disables injection)
    pub rare_every: usize,

    // === Training ===
    /// Cap on codeword length (None = uncapped)
    pub max_code_length: Option<u32>,

    /// Minimum occurrences for a symbol to earn its own codeword
    pub min_occurrences: u64,

    // === List stage ===
    /// Number of u16 values to push through the list codec
    pub value_count: usize,

    // === Reporting ===
    /// Whether to print the trained code table
    pub show_codebook: bool,

    /// Where to write the serialized codebook table, if anywhere
    pub table_out: Option<PathBuf>,

    /// Whether to print resolved configuration
    pub print_config: bool,

    /// Whether to print per-stage stats summaries
    pub print_stats: bool,
}

impl Config {
    /// Build a Config from raw command-line arguments.
    ///
    /// If no --seed is provided, a time-based seed is generated and printed
    /// so the run can be reproduced.
    pub fn from_args(args: &[String]) -> Result<Self, String> {
        let mut seed: Option<u64> = None;
        let mut corpus_chars: Option<usize> = None;
        let mut probe_chars: Option<usize> = None;
        let mut rare_every: Option<usize> = None;
        let mut max_code_length: Option<u32> = None;
        let mut uncapped = false;
        let mut min_occurrences: Option<u64> = None;
        let mut value_count: Option<usize> = None;
        let mut show_codebook = false;
        let mut table_out: Option<PathBuf> = None;
        let mut print_config = false;
        let mut print_stats = true;

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--seed" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--seed needs a number".to_string());
                    }
                    seed = Some(args[i].parse().map_err(|_| "seed must be a number")?);
                }
                "--corpus-chars" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--corpus-chars needs a number".to_string());
                    }
                    corpus_chars =
                        Some(args[i].parse().map_err(|_| "corpus-chars must be a number")?);
                }
                "--probe-chars" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--probe-chars needs a number".to_string());
                    }
                    probe_chars =
                        Some(args[i].parse().map_err(|_| "probe-chars must be a number")?);
                }
                "--rare-every" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--rare-every needs a number".to_string());
                    }
                    rare_every = Some(args[i].parse().map_err(|_| "rare-every must be a number")?);
                }
                "--max-bits" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--max-bits needs a number".to_string());
                    }
                    max_code_length =
                        Some(args[i].parse().map_err(|_| "max-bits must be a number")?);
                }
                "--no-cap" => {
                    uncapped = true;
                }
                "--min-count" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--min-count needs a number".to_string());
                    }
                    min_occurrences =
                        Some(args[i].parse().map_err(|_| "min-count must be a number")?);
                }
                "--values" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--values needs a number".to_string());
                    }
                    value_count = Some(args[i].parse().map_err(|_| "values must be a number")?);
                }
                "--show-codebook" => {
                    show_codebook = true;
                }
                "--table-out" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--table-out needs a path".to_string());
                    }
                    table_out = Some(PathBuf::from(&args[i]));
                }
                "--print-config" => {
                    print_config = true;
                }
                "--no-stats" => {
                    print_stats = false;
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                _ => {
                    return Err(format!("unrecognized argument: {}", args[i]));
                }
            }
            i += 1;
        }

        // Seed: explicit flag, otherwise the wall clock
        let seed = match seed {
            Some(s) => s,
            None => {
                use std::time::{SystemTime, UNIX_EPOCH};
                let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap();
                now.as_millis() as u64
            }
        };

        // Remaining defaults come from the seeded rng
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let config = Config {
            seed,
            corpus_chars: corpus_chars.unwrap_or(32768),
            probe_chars: probe_chars.unwrap_or(4096),
            rare_every: rare_every.unwrap_or_else(|| rng.gen_range(128..=512)),
            max_code_length: if uncapped {
                None
            } else {
                Some(max_code_length.unwrap_or(16))
            },
            min_occurrences: min_occurrences.unwrap_or(1),
            value_count: value_count.unwrap_or(8192),
            show_codebook,
            table_out,
            print_config,
            print_stats,
        };

        Ok(config)
    }

    /// Show every effective setting, derived defaults included.
    pub fn print(&self) {
        println!("=== Configuration ===");
        println!("Seed: {}", self.seed);
        println!();
        println!("Corpus: {} chars", self.corpus_chars);
        println!("Probe: {} chars", self.probe_chars);
        println!("Rare injection: every ~{} chars", self.rare_every);
        println!();
        match self.max_code_length {
            Some(bits) => println!("Code length cap: {} bits", bits),
            None => println!("Code length cap: none"),
        }
        println!("Min occurrences: {}", self.min_occurrences);
        println!("List values: {}", self.value_count);
        if let Some(path) = &self.table_out {
            println!("Table output: {}", path.display());
        }
        println!();
    }
}

fn print_help() {
    println!("bitpress: Huffman compression demo over generated text and values");
    println!();
    println!("USAGE:");
    println!("    bitpress [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --seed <N>           Random seed for determinism");
    println!();
    println!("    --corpus-chars <N>   Training corpus size (default: 32768)");
    println!("    --probe-chars <N>    Probe text size (default: 4096)");
    println!("    --rare-every <N>     Inject a rare char every ~N (default 128-512, 0 = off)");
    println!();
    println!("    --max-bits <N>       Cap codeword length (default: 16)");
    println!("    --no-cap             Disable the codeword length cap");
    println!("    --min-count <N>      Occurrences required for a codeword (default: 1)");
    println!();
    println!("    --values <N>         List stage value count (default: 8192)");
    println!();
    println!("    --show-codebook      Print the trained code table");
    println!("    --table-out <PATH>   Write the serialized codebook table");
    println!("    --print-config       Print resolved configuration");
    println!("    --no-stats           Don't print stats summaries");
    println!("    --help, -h           Print this help");
    println!();
    println!("EXAMPLES:");
    println!("    bitpress                         # Run with random defaults");
    println!("    bitpress --seed 42               # Deterministic run");
    println!("    bitpress --no-cap --min-count 2  # Uncapped codes, drop singletons");
    println!("    bitpress --table-out book.hcbk   # Persist the trained table");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config, String> {
        let owned: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        Config::from_args(&owned)
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["--seed", "42"]).unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.corpus_chars, 32768);
        assert_eq!(config.max_code_length, Some(16));
        assert_eq!(config.min_occurrences, 1);
        assert!(config.print_stats);
        assert!(!config.show_codebook);
    }

    #[test]
    fn test_seeded_defaults_are_deterministic() {
        let first = parse(&["--seed", "7"]).unwrap();
        let second = parse(&["--seed", "7"]).unwrap();
        assert_eq!(first.rare_every, second.rare_every);
    }

    #[test]
    fn test_explicit_values() {
        let config = parse(&[
            "--seed",
            "1",
            "--corpus-chars",
            "100",
            "--max-bits",
            "8",
            "--min-count",
            "3",
            "--table-out",
            "table.hcbk",
        ])
        .unwrap();

        assert_eq!(config.corpus_chars, 100);
        assert_eq!(config.max_code_length, Some(8));
        assert_eq!(config.min_occurrences, 3);
        assert_eq!(config.table_out, Some(PathBuf::from("table.hcbk")));
    }

    #[test]
    fn test_no_cap_overrides_max_bits() {
        let config = parse(&["--seed", "1", "--max-bits", "8", "--no-cap"]).unwrap();
        assert_eq!(config.max_code_length, None);
    }

    #[test]
    fn test_missing_value_rejected() {
        assert!(parse(&["--seed"]).is_err());
        assert!(parse(&["--corpus-chars"]).is_err());
    }

    #[test]
    fn test_unknown_argument_rejected() {
        let result = parse(&["--bogus"]);
        assert!(result.unwrap_err().contains("unrecognized argument"));
    }
}
