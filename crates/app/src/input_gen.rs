//! Deterministic input generation for the demo stages.
//!
//! Produces skewed character and value distributions so the entropy coder
//! has uneven frequencies to exploit, plus an injection knob for characters
//! the training corpus never saw.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Training alphabet with weights loosely following English letter frequency.
const COMMON: &[(char, u32)] = &[
    (' ', 18),
    ('e', 10),
    ('t', 7),
    ('a', 6),
    ('o', 6),
    ('i', 5),
    ('n', 5),
    ('s', 5),
    ('h', 4),
    ('r', 4),
    ('d', 3),
    ('l', 3),
    ('u', 2),
    ('c', 2),
    ('m', 2),
    ('f', 1),
    ('w', 1),
    ('g', 1),
    ('y', 1),
    ('p', 1),
    ('b', 1),
    ('.', 1),
];

/// Characters deliberately absent from the training distribution.
const RARE: &[char] = &['¶', 'ß', 'ç', '€', 'λ'];

/// Hot values that dominate the generated value stream.
const HOT_VALUES: &[u16] = &[7, 42, 300, 1000];

/// Generate `target_chars` characters drawn from the weighted alphabet.
pub fn generate_text(seed: u64, target_chars: usize) -> String {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut text = String::with_capacity(target_chars);

    for _ in 0..target_chars {
        text.push(pick_weighted(&mut rng));
    }

    text
}

/// Generate probe text from the same distribution, injecting one
/// out-of-vocabulary character roughly every `rare_every` positions
/// (0 disables injection).
pub fn generate_probe_text(seed: u64, target_chars: usize, rare_every: usize) -> String {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut text = String::with_capacity(target_chars);

    for _ in 0..target_chars {
        if rare_every > 0 && rng.gen_range(0..rare_every) == 0 {
            let idx = rng.gen_range(0..RARE.len());
            text.push(RARE[idx]);
        } else {
            text.push(pick_weighted(&mut rng));
        }
    }

    text
}

/// Generate a value stream where a few hot values carry ~90% of the mass.
pub fn generate_values(seed: u64, count: usize) -> Vec<u16> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut values = Vec::with_capacity(count);

    for _ in 0..count {
        if rng.gen_range(0..10) < 9 {
            let idx = rng.gen_range(0..HOT_VALUES.len());
            values.push(HOT_VALUES[idx]);
        } else {
            values.push(rng.gen());
        }
    }

    values
}

fn pick_weighted(rng: &mut ChaCha8Rng) -> char {
    let total: u32 = COMMON.iter().map(|(_, weight)| weight).sum();
    let mut roll = rng.gen_range(0..total);

    for (ch, weight) in COMMON {
        if roll < *weight {
            return *ch;
        }
        roll -= weight;
    }

    COMMON[0].0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_exact_length() {
        let text = generate_text(42, 1000);
        assert_eq!(text.chars().count(), 1000);
    }

    #[test]
    fn test_deterministic_generation() {
        let first = generate_text(42, 2048);
        let second = generate_text(42, 2048);
        assert_eq!(first, second);

        let values_a = generate_values(42, 512);
        let values_b = generate_values(42, 512);
        assert_eq!(values_a, values_b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let first = generate_text(1, 2048);
        let second = generate_text(2, 2048);
        assert_ne!(first, second);
    }

    #[test]
    fn test_text_stays_in_alphabet() {
        let text = generate_text(7, 4096);
        for ch in text.chars() {
            assert!(COMMON.iter().any(|(common, _)| *common == ch));
        }
    }

    #[test]
    fn test_probe_injects_rare_characters() {
        let probe = generate_probe_text(42, 4096, 16);
        let rare_count = probe.chars().filter(|ch| RARE.contains(ch)).count();
        assert!(rare_count > 0);

        let clean = generate_probe_text(42, 4096, 0);
        assert!(clean.chars().all(|ch| !RARE.contains(&ch)));
    }

    #[test]
    fn test_values_dominated_by_hot_set() {
        let values = generate_values(42, 4096);
        let hot = values
            .iter()
            .filter(|value| HOT_VALUES.contains(value))
            .count();
        assert!(hot > values.len() / 2);
    }
}
