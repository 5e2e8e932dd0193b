//! Integer-keyed and real-valued column strategies.

use crate::distributions::{
    Distribution, DistributionError, KeyDistribution, Sequential, UniformReal,
};
use crate::random::RandomSource;
use relgen_core::Skewness;

/// Produces the integer key of every row for INT and STRING columns.
///
/// Fractional cardinalities first walk the whole domain sequentially so
/// every value appears at least once, then fall back to random draws over
/// the same domain.
#[derive(Debug, Clone)]
pub struct KeyColumn {
    warm_up: Option<(Sequential, u64)>,
    distribution: KeyDistribution,
}

impl KeyColumn {
    /// `1, 2, 3, ...`: PK, FK_UNIQUE and cardinality 1.
    pub fn unique() -> Self {
        Self {
            warm_up: None,
            distribution: KeyDistribution::Sequential(Sequential::from_one()),
        }
    }

    /// Draws over `[1, parent_rows]`, concentrated by `skew`.
    pub fn referencing(parent_rows: u64, skew: Skewness) -> Result<Self, DistributionError> {
        Ok(Self {
            warm_up: None,
            distribution: KeyDistribution::skewed(parent_rows, skew)?,
        })
    }

    /// Strategy for a cardinality target over a table of `rows` rows.
    pub fn for_cardinality(
        cardinality: f64,
        rows: u64,
        skew: Skewness,
    ) -> Result<Self, DistributionError> {
        if !cardinality.is_finite() || cardinality <= 0.0 {
            return Err(DistributionError::InvalidParameter(format!(
                "cardinality must be positive, got {cardinality}"
            )));
        }

        if cardinality == 1.0 {
            return Ok(Self::unique());
        }

        if cardinality < 1.0 {
            let domain = ((rows as f64 * cardinality).floor() as u64).max(1);
            return Ok(Self {
                warm_up: Some((Sequential::from_one(), domain)),
                distribution: KeyDistribution::skewed(domain, skew)?,
            });
        }

        Self::referencing(cardinality as u64, skew)
    }

    pub fn next_key(&mut self, source: &mut RandomSource) -> Result<u64, DistributionError> {
        if let Some((sequence, remaining)) = self.warm_up.as_mut() {
            if *remaining > 0 {
                *remaining -= 1;
                return sequence.next(source);
            }
            self.warm_up = None;
        }
        self.distribution.next(source)
    }

    /// Largest key this column can produce.
    pub fn max_key(&self) -> u64 {
        self.distribution.max()
    }
}

/// REAL column: uniform over `[real_min, real_max)`.
#[derive(Debug, Clone)]
pub struct RealColumn {
    distribution: UniformReal,
}

impl RealColumn {
    pub fn new(min: f64, max: f64) -> Result<Self, DistributionError> {
        Ok(Self {
            distribution: UniformReal::new(min, max)?,
        })
    }

    pub fn next_real(&mut self, source: &mut RandomSource) -> Result<f64, DistributionError> {
        self.distribution.next(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relgen_core::Algorithm;
    use std::collections::HashSet;

    fn source() -> RandomSource {
        RandomSource::new(Algorithm::Mt19937_64, 42)
    }

    fn draw(column: &mut KeyColumn, n: usize) -> Vec<u64> {
        let mut source = source();
        (0..n).map(|_| column.next_key(&mut source).unwrap()).collect()
    }

    #[test]
    fn test_unique_is_strictly_increasing() {
        let keys = draw(&mut KeyColumn::unique(), 1000);
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(keys[0], 1);
    }

    #[test]
    fn test_cardinality_one_is_unique() {
        let mut column = KeyColumn::for_cardinality(1.0, 500, Skewness::High).unwrap();
        let keys = draw(&mut column, 500);
        assert_eq!(keys, (1..=500).collect::<Vec<_>>());
    }

    #[test]
    fn test_fractional_cardinality_covers_domain_first() {
        let mut column = KeyColumn::for_cardinality(0.25, 100, Skewness::No).unwrap();
        let keys = draw(&mut column, 100);

        assert_eq!(&keys[..25], (1..=25).collect::<Vec<_>>().as_slice());
        assert!(keys[25..].iter().all(|k| (1..=25).contains(k)));
        let distinct: HashSet<u64> = keys.iter().copied().collect();
        assert_eq!(distinct.len(), 25);
    }

    #[test]
    fn test_tiny_fraction_keeps_one_value() {
        let mut column = KeyColumn::for_cardinality(0.001, 10, Skewness::No).unwrap();
        assert_eq!(draw(&mut column, 5), vec![1; 5]);
    }

    #[test]
    fn test_absolute_cardinality() {
        let mut column = KeyColumn::for_cardinality(7.0, 1000, Skewness::Medium).unwrap();
        assert_eq!(column.max_key(), 7);
        assert!(draw(&mut column, 1000).iter().all(|k| (1..=7).contains(k)));
    }

    #[test]
    fn test_referencing_single_row_parent() {
        let mut column = KeyColumn::referencing(1, Skewness::Extreme).unwrap();
        assert_eq!(draw(&mut column, 20), vec![1; 20]);
    }

    #[test]
    fn test_invalid_cardinality() {
        assert!(KeyColumn::for_cardinality(0.0, 10, Skewness::No).is_err());
        assert!(KeyColumn::for_cardinality(f64::NAN, 10, Skewness::No).is_err());
    }

    #[test]
    fn test_real_column_bounds() {
        let mut source = source();
        let mut column = RealColumn::new(10.0, 20.0).unwrap();
        for _ in 0..1000 {
            let v = column.next_real(&mut source).unwrap();
            assert!((10.0..20.0).contains(&v));
        }
    }
}
