use super::uniform::sample_range;
use super::{Distribution, DistributionError};
use crate::random::RandomSource;

/// Draws `amount` strictly increasing, distinct integers from `[min, max]`
/// without materializing the domain.
///
/// Each draw splits what is left of the domain into `num_left` equal
/// segments and picks a gap within the first one, so the remaining draws
/// always fit below `max`.
#[derive(Debug, Clone)]
pub struct SetSampler {
    amount: u64,
    min: u64,
    max: u64,
    next_floor: u64,
    num_left: u64,
}

impl SetSampler {
    pub fn new(amount: u64, min: u64, max: u64) -> Result<Self, DistributionError> {
        if min > max {
            return Err(DistributionError::InvalidRange { min, max });
        }
        let domain = u128::from(max) - u128::from(min) + 1;
        if u128::from(amount) > domain {
            return Err(DistributionError::DomainTooSmall { amount, min, max });
        }
        Ok(Self {
            amount,
            min,
            max,
            next_floor: min,
            num_left: amount,
        })
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn remaining(&self) -> u64 {
        self.num_left
    }

    /// Every value of the sequence, from a fresh start.
    pub fn collect_all(&mut self, source: &mut RandomSource) -> Result<Vec<u64>, DistributionError> {
        self.reset();
        let capacity = usize::try_from(self.amount).unwrap_or(0);
        let mut values = Vec::with_capacity(capacity);
        while self.num_left > 0 {
            values.push(self.next(source)?);
        }
        Ok(values)
    }
}

impl Distribution for SetSampler {
    type Output = u64;

    fn reset(&mut self) {
        self.next_floor = self.min;
        self.num_left = self.amount;
    }

    fn next(&mut self, source: &mut RandomSource) -> Result<u64, DistributionError> {
        if self.num_left == 0 {
            return Err(DistributionError::Exhausted {
                amount: self.amount,
            });
        }

        let span = u128::from(self.max) - u128::from(self.next_floor) + 1;
        // span >= num_left, so the segment holds at least one value.
        let last_gap = (span / u128::from(self.num_left) - 1) as u64;
        let value = self.next_floor + sample_range(source, 0, last_gap);

        self.next_floor = value.saturating_add(1);
        self.num_left -= 1;
        Ok(value)
    }

    fn min(&self) -> u64 {
        self.min
    }

    fn max(&self) -> u64 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relgen_core::Algorithm;

    #[test]
    fn test_strictly_increasing_within_bounds() {
        let mut source = RandomSource::new(Algorithm::Mt19937_64, 42);
        for (amount, min, max) in [(10, 1, 10), (100, 1, 400), (7, 50, 1_000_000), (1, 3, 3)] {
            let mut sampler = SetSampler::new(amount, min, max).unwrap();
            let values = sampler.collect_all(&mut source).unwrap();
            assert_eq!(values.len() as u64, amount);
            assert!(values.windows(2).all(|w| w[0] < w[1]), "{values:?}");
            assert!(values.iter().all(|v| (min..=max).contains(v)));
        }
    }

    #[test]
    fn test_full_domain_is_identity() {
        let mut source = RandomSource::new(Algorithm::MinstdRand, 1);
        let mut sampler = SetSampler::new(20, 1, 20).unwrap();
        let values = sampler.collect_all(&mut source).unwrap();
        assert_eq!(values, (1..=20).collect::<Vec<_>>());
    }

    #[test]
    fn test_exhaustion() {
        let mut source = RandomSource::new(Algorithm::Mt19937_64, 42);
        let mut sampler = SetSampler::new(2, 1, 100).unwrap();
        sampler.next(&mut source).unwrap();
        sampler.next(&mut source).unwrap();
        assert_eq!(sampler.remaining(), 0);
        assert_eq!(
            sampler.next(&mut source),
            Err(DistributionError::Exhausted { amount: 2 })
        );
    }

    #[test]
    fn test_oversized_request_fails() {
        assert_eq!(
            SetSampler::new(11, 1, 10).unwrap_err(),
            DistributionError::DomainTooSmall {
                amount: 11,
                min: 1,
                max: 10
            }
        );
        assert!(SetSampler::new(1, 10, 1).is_err());
        assert!(SetSampler::new(u64::MAX, 0, u64::MAX).is_ok());
    }

    #[test]
    fn test_replay_is_identical() {
        let mut first = RandomSource::new(Algorithm::Mt19937_64, 77);
        let mut second = RandomSource::new(Algorithm::Mt19937_64, 77);
        let a = SetSampler::new(50, 1, 900).unwrap().collect_all(&mut first).unwrap();
        let b = SetSampler::new(50, 1, 900).unwrap().collect_all(&mut second).unwrap();
        assert_eq!(a, b);
    }
}
