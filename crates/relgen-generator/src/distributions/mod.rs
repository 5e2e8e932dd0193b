//! Distribution library.
//!
//! Every distribution draws from a caller-supplied [`RandomSource`], so
//! several distributions can share one stream and the draw order alone
//! decides the output.

mod sequential;
mod set;
pub(crate) mod uniform;
mod zipf;

pub use sequential::Sequential;
pub use set::SetSampler;
pub use uniform::{sample_canonical, sample_range, UniformInt, UniformReal};
pub use zipf::Zipf;

use crate::random::RandomSource;
use relgen_core::Skewness;

/// Errors raised while building or drawing from a distribution.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DistributionError {
    #[error("invalid range [{min}, {max}]")]
    InvalidRange { min: u64, max: u64 },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("cannot draw {amount} distinct values from [{min}, {max}]")]
    DomainTooSmall { amount: u64, min: u64, max: u64 },

    #[error("distinct sampler exhausted after {amount} values")]
    Exhausted { amount: u64 },

    #[error("sequence overflowed after {last}")]
    Overflow { last: u64 },
}

/// Common contract of every distribution.
pub trait Distribution {
    type Output;

    /// Return to the initial state; the next draw restarts the sequence
    /// (for stateful distributions) given the same source state.
    fn reset(&mut self);

    fn next(&mut self, source: &mut RandomSource) -> Result<Self::Output, DistributionError>;

    fn min(&self) -> Self::Output;

    fn max(&self) -> Self::Output;
}

/// Integer distributions used for key and cardinality-driven columns.
#[derive(Debug, Clone)]
pub enum KeyDistribution {
    Sequential(Sequential),
    Uniform(UniformInt),
    Zipf(Zipf),
    Set(SetSampler),
}

impl KeyDistribution {
    /// Uniform or Zipfian over `[1, n]`, depending on `skew`.
    pub fn skewed(n: u64, skew: Skewness) -> Result<Self, DistributionError> {
        match skew.exponent() {
            Some(s) => Ok(Self::Zipf(Zipf::new(n, s, 0.0)?)),
            None => Ok(Self::Uniform(UniformInt::new(1, n)?)),
        }
    }
}

impl Distribution for KeyDistribution {
    type Output = u64;

    fn reset(&mut self) {
        match self {
            Self::Sequential(d) => d.reset(),
            Self::Uniform(d) => d.reset(),
            Self::Zipf(d) => d.reset(),
            Self::Set(d) => d.reset(),
        }
    }

    fn next(&mut self, source: &mut RandomSource) -> Result<u64, DistributionError> {
        match self {
            Self::Sequential(d) => d.next(source),
            Self::Uniform(d) => d.next(source),
            Self::Zipf(d) => d.next(source),
            Self::Set(d) => d.next(source),
        }
    }

    fn min(&self) -> u64 {
        match self {
            Self::Sequential(d) => d.min(),
            Self::Uniform(d) => d.min(),
            Self::Zipf(d) => d.min(),
            Self::Set(d) => d.min(),
        }
    }

    fn max(&self) -> u64 {
        match self {
            Self::Sequential(d) => d.max(),
            Self::Uniform(d) => d.max(),
            Self::Zipf(d) => d.max(),
            Self::Set(d) => d.max(),
        }
    }
}
