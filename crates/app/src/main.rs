//! bitpress demo binary.
//!
//! Trains Huffman codecs over generated corpora, round-trips probe data
//! through the bit stream, and exercises codebook persistence. Run with
//! --help for options.

mod config;
mod input_gen;

use bitpress_core::bitio::{BitReader, BitWriter};
use bitpress_core::codecs::{CharacterCodec, ListCodec, StringCodec, TrainOptions};
use bitpress_core::persist::{parse_symbols, serialize_symbols};
use bitpress_core::stats::CompressionStats;
use bitpress_core::Result;

use config::Config;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("error: {message}");
            eprintln!("Run with --help for usage.");
            std::process::exit(2);
        }
    };

    if config.print_config {
        config.print();
    }

    if let Err(error) = run(&config) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(config: &Config) -> Result<()> {
    run_text_stage(config)?;
    run_list_stage(config)?;
    Ok(())
}

/// Train a string codec on generated text, then round-trip a probe that
/// contains characters the training corpus never saw.
fn run_text_stage(config: &Config) -> Result<()> {
    println!("=== Text Stage ===");
    println!(
        "Training on {} chars (seed {})",
        config.corpus_chars, config.seed
    );

    let corpus = input_gen::generate_text(config.seed, config.corpus_chars);
    let options = TrainOptions {
        max_code_length: config.max_code_length,
        min_occurrences: config.min_occurrences,
    };
    let codec = StringCodec::train_with(&corpus, &options)?;

    if config.show_codebook {
        println!();
        println!("{}", codec.characters().codebook());
    }

    let probe = input_gen::generate_probe_text(
        config.seed.wrapping_add(1),
        config.probe_chars,
        config.rare_every,
    );

    let mut stats = CompressionStats::new();

    let mut writer = BitWriter::new();
    codec.encode(&probe, &mut writer)?;
    let encoded = writer.finish();

    let mut reader = BitReader::new(&encoded);
    let decoded = codec.decode(&mut reader)?;
    stats.complete();

    if decoded != probe {
        eprintln!("round trip FAILED: decoded text differs from probe");
        std::process::exit(1);
    }
    println!("Round trip: OK ({} chars)", probe.chars().count());

    // Rebuild the codec from its serialized table and re-encode the probe.
    // The reloaded codebook must produce bit-identical output.
    let table = serialize_symbols(codec.characters().symbols())?;
    let reloaded = parse_symbols::<char>(&table)?;
    let rebuilt = StringCodec::from_characters(CharacterCodec::from_symbols(reloaded)?);

    let mut writer = BitWriter::new();
    rebuilt.encode(&probe, &mut writer)?;
    if writer.finish() != encoded {
        eprintln!("reload check FAILED: re-encoded bytes differ");
        std::process::exit(1);
    }
    println!("Reload check: OK ({} byte table)", table.len());

    if let Some(path) = &config.table_out {
        std::fs::write(path, &table)?;
        println!("Wrote codebook table to {}", path.display());
    }

    let codebook = codec.characters().codebook();
    stats.symbols_in = probe.chars().count() as u64;
    stats.bytes_in = probe.len() as u64;
    stats.bytes_out = encoded.len() as u64;
    stats.escaped_symbols = probe
        .chars()
        .filter(|ch| codebook.code(ch).is_none())
        .count() as u64;
    stats.alphabet_len = codebook.len();
    stats.max_code_length = codebook.max_code_length();

    if config.print_stats {
        stats.print_summary();
    }

    Ok(())
}

/// Train a list codec on the first half of a value stream, then round-trip
/// the whole stream (the second half carries values training never saw).
fn run_list_stage(config: &Config) -> Result<()> {
    println!();
    println!("=== List Stage ===");

    let values = input_gen::generate_values(config.seed.wrapping_add(2), config.value_count);
    if values.len() < 2 {
        println!("Skipping: need at least 2 values");
        return Ok(());
    }
    println!("Training on {} of {} values", values.len() / 2, values.len());

    let options = TrainOptions {
        max_code_length: config.max_code_length,
        min_occurrences: config.min_occurrences,
    };
    let codec = ListCodec::<u16>::train_with(&values[..values.len() / 2], &options)?;

    let mut stats = CompressionStats::new();

    let mut writer = BitWriter::new();
    codec.encode(&values, &mut writer)?;
    let encoded = writer.finish();

    let mut reader = BitReader::new(&encoded);
    let decoded = codec.decode(&mut reader)?;
    stats.complete();

    if decoded != values {
        eprintln!("round trip FAILED: decoded values differ");
        std::process::exit(1);
    }
    println!("Round trip: OK ({} values)", values.len());

    let codebook = codec.codebook();
    stats.symbols_in = values.len() as u64;
    stats.bytes_in = (values.len() * std::mem::size_of::<u16>()) as u64;
    stats.bytes_out = encoded.len() as u64;
    stats.escaped_symbols = values
        .iter()
        .filter(|value| codebook.code(value).is_none())
        .count() as u64;
    stats.alphabet_len = codebook.len();
    stats.max_code_length = codebook.max_code_length();

    if config.print_stats {
        stats.print_summary();
    }

    Ok(())
}
