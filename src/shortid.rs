//! Short identifier generation for shareable template links.
//!
//! Identifiers are 12 characters drawn from a 56-character alphabet that
//! excludes visually ambiguous glyphs (`0`, `O`, `I`, `l`, `o`, `1`), giving
//! roughly 69 bits of entropy per identifier. No uniqueness check happens
//! here; callers retry on a unique-constraint violation at the store layer.

use rand::rngs::OsRng;
use rand::Rng;

/// User-friendly alphabet: no `0`, `O`, `I`, `l`, `o`, `1`.
pub const ALPHABET: &[u8; 56] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnpqrstuvwxyz";

/// Fixed output length. Example outputs: `K9mPqR3j7nHw`, `b4f77b236k9x`.
pub const LENGTH: usize = 12;

/// Generate a fresh short identifier from the OS random source.
pub fn generate() -> String {
    let mut rng = OsRng;
    (0..LENGTH)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn alphabet_excludes_ambiguous_glyphs() {
        for forbidden in [b'0', b'O', b'I', b'l', b'o', b'1'] {
            assert!(!ALPHABET.contains(&forbidden), "alphabet contains {}", forbidden as char);
        }
        assert_eq!(ALPHABET.len(), 56);
        // No duplicate characters either
        let unique: HashSet<u8> = ALPHABET.iter().copied().collect();
        assert_eq!(unique.len(), 56);
    }

    #[test]
    fn generates_fixed_length_over_alphabet() {
        let id = generate();
        assert_eq!(id.len(), LENGTH);
        assert!(id.bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn ten_thousand_draws_are_distinct() {
        let mut seen = HashSet::with_capacity(10_000);
        for _ in 0..10_000 {
            let id = generate();
            assert_eq!(id.len(), LENGTH);
            assert!(id.bytes().all(|b| ALPHABET.contains(&b)));
            assert!(seen.insert(id), "short id collision within 10k draws");
        }
    }
}
