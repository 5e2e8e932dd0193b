//! Bounded uniform sampling.
//!
//! Integer draws rescale the engine's native range onto the requested one,
//! rejecting the biased tail; ranges wider than the engine are assembled
//! from several draws. Real draws build a 53-bit canonical fraction from as
//! many engine outputs as the engine's width requires.

use super::{Distribution, DistributionError};
use crate::random::RandomSource;

/// Uniform integer in `[low, high]`. Requires `low <= high`.
pub fn sample_range(source: &mut RandomSource, low: u64, high: u64) -> u64 {
    let engine_min = source.min();
    let engine_range = source.max() - engine_min;
    let range = high - low;

    let offset = if engine_range > range {
        let buckets = range + 1;
        let scaling = engine_range / buckets;
        let past = buckets * scaling;
        loop {
            let r = source.next_value() - engine_min;
            if r < past {
                break r / scaling;
            }
        }
    } else if engine_range < range {
        let engine_span = engine_range + 1;
        loop {
            let high_part = engine_span * sample_range(source, 0, range / engine_span);
            let r = high_part.wrapping_add(source.next_value() - engine_min);
            if r <= range && r >= high_part {
                break r;
            }
        }
    } else {
        source.next_value() - engine_min
    };

    low + offset
}

/// Uniform real in `[0, 1)` with 53 bits of precision.
pub fn sample_canonical(source: &mut RandomSource) -> f64 {
    let engine_min = source.min();
    let radix = (source.max() - engine_min) as f64 + 1.0;
    let draws = ((f64::from(f64::MANTISSA_DIGITS) / radix.log2()).ceil() as u32).max(1);

    let mut sum = 0.0;
    let mut factor = 1.0;
    for _ in 0..draws {
        sum += (source.next_value() - engine_min) as f64 * factor;
        factor *= radix;
    }

    let fraction = sum / factor;
    if fraction >= 1.0 {
        1.0 - f64::EPSILON / 2.0
    } else {
        fraction
    }
}

/// Uniform integer distribution over a closed interval.
#[derive(Debug, Clone)]
pub struct UniformInt {
    low: u64,
    high: u64,
}

impl UniformInt {
    pub fn new(low: u64, high: u64) -> Result<Self, DistributionError> {
        if low > high {
            return Err(DistributionError::InvalidRange {
                min: low,
                max: high,
            });
        }
        Ok(Self { low, high })
    }
}

impl Distribution for UniformInt {
    type Output = u64;

    fn reset(&mut self) {}

    fn next(&mut self, source: &mut RandomSource) -> Result<u64, DistributionError> {
        Ok(sample_range(source, self.low, self.high))
    }

    fn min(&self) -> u64 {
        self.low
    }

    fn max(&self) -> u64 {
        self.high
    }
}

/// Uniform real distribution over `[low, high)`.
#[derive(Debug, Clone)]
pub struct UniformReal {
    low: f64,
    high: f64,
}

impl UniformReal {
    pub fn new(low: f64, high: f64) -> Result<Self, DistributionError> {
        if !low.is_finite() || !high.is_finite() || low > high {
            return Err(DistributionError::InvalidParameter(format!(
                "real bounds [{low}, {high}]"
            )));
        }
        Ok(Self { low, high })
    }
}

impl Distribution for UniformReal {
    type Output = f64;

    fn reset(&mut self) {}

    fn next(&mut self, source: &mut RandomSource) -> Result<f64, DistributionError> {
        Ok(sample_canonical(source) * (self.high - self.low) + self.low)
    }

    fn min(&self) -> f64 {
        self.low
    }

    fn max(&self) -> f64 {
        self.high
    }
}
