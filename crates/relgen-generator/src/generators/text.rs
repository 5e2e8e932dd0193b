//! STRING column strategy: an integer key rendered through the synthesizer.

use super::numeric::KeyColumn;
use crate::distributions::DistributionError;
use crate::random::RandomSource;
use crate::strings::{KeyFormat, StringSynthesizer};

/// Whether a non-key string column with this cardinality keeps a memo.
///
/// Columns that repeat values heavily (below 0.7) or draw from an absolute
/// domain (above 1) see the same keys again; near-unique columns do not.
pub fn memo_warranted(cardinality: f64) -> bool {
    !(0.7..=1.0).contains(&cardinality)
}

#[derive(Debug, Clone)]
pub struct TextColumn {
    keys: KeyColumn,
    synthesizer: StringSynthesizer,
}

impl TextColumn {
    pub fn new(keys: KeyColumn, format: KeyFormat, memoize: bool) -> Self {
        Self {
            keys,
            synthesizer: StringSynthesizer::new(format, memoize),
        }
    }

    pub fn next_text(&mut self, source: &mut RandomSource) -> Result<String, DistributionError> {
        let key = self.keys.next_key(source)?;
        Ok(self.synthesizer.render(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relgen_core::{Algorithm, Skewness};

    #[test]
    fn test_memo_policy() {
        assert!(memo_warranted(0.5));
        assert!(!memo_warranted(0.7));
        assert!(!memo_warranted(1.0));
        assert!(memo_warranted(50.0));
    }

    #[test]
    fn test_primary_and_foreign_strings_match() {
        let format = KeyFormat::new(16, true);
        let mut source = RandomSource::new(Algorithm::Mt19937_64, 42);

        let mut pk = TextColumn::new(KeyColumn::unique(), format, false);
        let parents: Vec<String> = (0..40).map(|_| pk.next_text(&mut source).unwrap()).collect();

        let mut fk = TextColumn::new(
            KeyColumn::referencing(40, Skewness::High).unwrap(),
            format,
            true,
        );
        for _ in 0..200 {
            let child = fk.next_text(&mut source).unwrap();
            assert!(parents.contains(&child), "{child} has no parent");
        }
    }
}
