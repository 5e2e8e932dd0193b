//! Deterministic string synthesis from integer keys.
//!
//! The synthesizer reseeds a private 64-bit Mersenne Twister with the key on
//! every call, so a key renders to the same string regardless of call order.
//! Two columns that agree on a key and a [`KeyFormat`] therefore agree on
//! the string, which is how string foreign keys match their primary keys.
//!
//! Key columns additionally end every string with the key's own digits in
//! base `ALPHABET.len()`, so distinct keys never collide.

use crate::distributions::sample_range;
use crate::random::RandomSource;
use relgen_core::keys::min_string_length;
use relgen_core::schema::DEFAULT_STRING_LENGTH;
use relgen_core::Algorithm;
use std::collections::HashMap;

pub use relgen_core::keys::{MIN_VARIABLE_LENGTH, STRING_ALPHABET as ALPHABET};

/// Length parameters shared by a key column and the columns referencing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyFormat {
    length: u16,
    var_length: bool,
    /// Trailing characters spelling the key; 0 for non-key columns
    key_digits: u16,
}

impl KeyFormat {
    /// Variable length only applies above [`MIN_VARIABLE_LENGTH`].
    pub fn new(length: u16, var_length: bool) -> Self {
        Self {
            length,
            var_length: var_length && length > MIN_VARIABLE_LENGTH,
            key_digits: 0,
        }
    }

    /// Reserve enough trailing digits to spell every key in `[1, max_key]`.
    /// `None` when the shortest string is too short to hold them.
    pub fn with_key_capacity(mut self, max_key: u64) -> Option<Self> {
        let base = ALPHABET.len() as u64;
        let mut digits = 1u16;
        let mut capacity = base;
        while capacity < max_key {
            capacity = capacity.saturating_mul(base);
            digits += 1;
        }
        if digits > min_string_length(self.length, self.var_length) {
            return None;
        }
        self.key_digits = digits;
        Some(self)
    }

    pub fn length(&self) -> u16 {
        self.length
    }

    pub fn is_variable(&self) -> bool {
        self.var_length
    }

    pub fn key_digits(&self) -> u16 {
        self.key_digits
    }
}

impl Default for KeyFormat {
    fn default() -> Self {
        Self::new(DEFAULT_STRING_LENGTH, false)
    }
}

/// Renders integer keys to strings, optionally memoizing them.
#[derive(Debug, Clone)]
pub struct StringSynthesizer {
    format: KeyFormat,
    source: RandomSource,
    memo: Option<HashMap<u64, String>>,
}

impl StringSynthesizer {
    pub fn new(format: KeyFormat, memoize: bool) -> Self {
        Self {
            format,
            source: RandomSource::new(Algorithm::Mt19937_64, 0),
            memo: memoize.then(HashMap::new),
        }
    }

    pub fn format(&self) -> KeyFormat {
        self.format
    }

    pub fn is_memoized(&self) -> bool {
        self.memo.is_some()
    }

    /// The string for `key`.
    pub fn render(&mut self, key: u64) -> String {
        if let Some(hit) = self.memo.as_ref().and_then(|memo| memo.get(&key)) {
            return hit.clone();
        }

        let value = self.synthesize(key);
        if let Some(memo) = self.memo.as_mut() {
            memo.insert(key, value.clone());
        }
        value
    }

    fn synthesize(&mut self, key: u64) -> String {
        self.source.seed(key);

        let length = if self.format.var_length {
            sample_range(
                &mut self.source,
                u64::from(MIN_VARIABLE_LENGTH),
                u64::from(self.format.length),
            )
        } else {
            u64::from(self.format.length)
        };

        let base = ALPHABET.len() as u64;
        let mut bytes: Vec<u8> = (0..length)
            .map(|_| ALPHABET[sample_range(&mut self.source, 0, base - 1) as usize])
            .collect();

        // Keys start at 1.
        let mut rest = key.saturating_sub(1);
        let digits = usize::from(self.format.key_digits).min(bytes.len());
        for byte in bytes.iter_mut().rev().take(digits) {
            *byte = ALPHABET[(rest % base) as usize];
            rest /= base;
        }

        bytes.into_iter().map(char::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_same_key_same_string() {
        let mut pk = StringSynthesizer::new(KeyFormat::new(12, false), false);
        let mut fk = StringSynthesizer::new(KeyFormat::new(12, false), true);

        let forward: Vec<String> = (1..=50).map(|k| pk.render(k)).collect();
        let backward: Vec<String> = (1..=50).rev().map(|k| fk.render(k)).collect();
        let backward: Vec<String> = backward.into_iter().rev().collect();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_fixed_length_and_alphabet() {
        let mut synth = StringSynthesizer::new(KeyFormat::new(25, false), false);
        for key in 0..200 {
            let s = synth.render(key);
            assert_eq!(s.len(), 25);
            assert!(s.bytes().all(|b| ALPHABET.contains(&b)), "{s}");
        }
    }

    #[test]
    fn test_variable_length_range() {
        let mut synth = StringSynthesizer::new(KeyFormat::new(15, true), false);
        let lengths: Vec<usize> = (0..300).map(|k| synth.render(k).len()).collect();
        assert!(lengths.iter().all(|l| (6..=15).contains(l)));
        assert!(lengths.iter().any(|&l| l != 15));
    }

    #[test]
    fn test_short_strings_never_vary() {
        let format = KeyFormat::new(6, true);
        assert!(!format.is_variable());
        let mut synth = StringSynthesizer::new(format, false);
        assert!((0..50).all(|k| synth.render(k).len() == 6));
    }

    #[test]
    fn test_distinct_keys_differ() {
        let mut synth = StringSynthesizer::new(KeyFormat::default(), false);
        assert_ne!(synth.render(1), synth.render(2));
    }

    #[test]
    fn test_key_capacity() {
        let base = ALPHABET.len() as u64;
        assert_eq!(KeyFormat::new(1, false).with_key_capacity(base).unwrap().key_digits(), 1);
        assert!(KeyFormat::new(1, false).with_key_capacity(base + 1).is_none());
        assert_eq!(KeyFormat::new(3, false).with_key_capacity(base + 1).unwrap().key_digits(), 2);
        // Variable strings may be as short as six characters.
        assert!(KeyFormat::new(20, true).with_key_capacity(u64::MAX).is_none());
        assert_eq!(KeyFormat::new(20, false).with_key_capacity(u64::MAX).unwrap().key_digits(), 11);
        assert_eq!(KeyFormat::default().key_digits(), 0);
    }

    #[test]
    fn test_key_strings_never_collide() {
        let base = ALPHABET.len() as u64;
        let format = KeyFormat::new(2, false).with_key_capacity(base * base).unwrap();
        let mut synth = StringSynthesizer::new(format, false);
        let rendered: HashSet<String> = (1..=base * base).map(|k| synth.render(k)).collect();
        assert_eq!(rendered.len() as u64, base * base);

        let format = KeyFormat::new(12, true).with_key_capacity(5000).unwrap();
        let mut synth = StringSynthesizer::new(format, false);
        let rendered: HashSet<String> = (1..=5000).map(|k| synth.render(k)).collect();
        assert_eq!(rendered.len(), 5000);
        assert!(rendered.iter().all(|s| (6..=12).contains(&s.len())));
    }

    #[test]
    fn test_memo_returns_cached_value() {
        let mut synth = StringSynthesizer::new(KeyFormat::default(), true);
        assert!(synth.is_memoized());
        let first = synth.render(99);
        assert_eq!(synth.render(99), first);
    }
}
