use super::{Distribution, DistributionError};
use crate::random::RandomSource;

/// `start, start + step, start + 2·step, ...`
#[derive(Debug, Clone)]
pub struct Sequential {
    start: u64,
    step: u64,
    next: Option<u64>,
    last: u64,
}

impl Sequential {
    pub fn new(start: u64, step: u64) -> Self {
        Self {
            start,
            step,
            next: Some(start),
            last: start,
        }
    }

    /// `1, 2, 3, ...`
    pub fn from_one() -> Self {
        Self::new(1, 1)
    }
}

impl Distribution for Sequential {
    type Output = u64;

    fn reset(&mut self) {
        self.next = Some(self.start);
        self.last = self.start;
    }

    fn next(&mut self, _source: &mut RandomSource) -> Result<u64, DistributionError> {
        let value = self
            .next
            .ok_or(DistributionError::Overflow { last: self.last })?;
        self.last = value;
        self.next = value.checked_add(self.step);
        Ok(value)
    }

    fn min(&self) -> u64 {
        self.start
    }

    fn max(&self) -> u64 {
        u64::MAX
    }
}
