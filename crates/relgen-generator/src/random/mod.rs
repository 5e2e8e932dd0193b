//! Seedable pseudo-random bit sources.
//!
//! [`RandomSource`] wraps one of the supported engines behind a single
//! `seed`/`next_value`/`discard`/`min`/`max` contract. Distributions take
//! the source by `&mut` on every draw; nothing in the engine holds on to a
//! source between calls.

mod lcg;
mod mersenne;
mod swc;

pub use lcg::MinStd;
pub use mersenne::{Mt19937, Mt19937_64};
pub use swc::SubtractWithCarry;

use crate::distributions::uniform::sample_range;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use relgen_core::Algorithm;

/// Raw engine contract: integers uniformly distributed over `[min, max]`.
pub trait BitGenerator {
    fn seed(&mut self, seed: u64);

    fn next_value(&mut self) -> u64;

    fn discard(&mut self, n: u64) {
        for _ in 0..n {
            self.next_value();
        }
    }

    fn min(&self) -> u64;

    fn max(&self) -> u64;
}

#[derive(Clone)]
enum Engine {
    MinStd(MinStd),
    Mt19937(Box<Mt19937>),
    Mt19937_64(Box<Mt19937_64>),
    SubtractWithCarry(SubtractWithCarry),
    Std(Box<StdRng>),
}

impl Engine {
    fn new(algorithm: Algorithm, seed: u64) -> Self {
        match algorithm {
            Algorithm::Default | Algorithm::MinstdRand0 => Engine::MinStd(MinStd::rand0(seed)),
            Algorithm::MinstdRand => Engine::MinStd(MinStd::rand(seed)),
            Algorithm::Mt19937 => Engine::Mt19937(Box::new(Mt19937::new(seed))),
            Algorithm::Mt19937_64 => Engine::Mt19937_64(Box::new(Mt19937_64::new(seed))),
            Algorithm::Ranlux24Base => {
                Engine::SubtractWithCarry(SubtractWithCarry::ranlux24_base(seed))
            }
            Algorithm::Ranlux48Base => {
                Engine::SubtractWithCarry(SubtractWithCarry::ranlux48_base(seed))
            }
            Algorithm::StdRng => Engine::Std(Box::new(StdRng::seed_from_u64(seed))),
        }
    }
}

/// A seeded engine selected by [`Algorithm`].
#[derive(Clone)]
pub struct RandomSource {
    algorithm: Algorithm,
    engine: Engine,
}

impl std::fmt::Debug for RandomSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomSource")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

impl RandomSource {
    pub fn new(algorithm: Algorithm, seed: u64) -> Self {
        Self {
            algorithm,
            engine: Engine::new(algorithm, seed),
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Restart the stream from `seed`.
    pub fn seed(&mut self, seed: u64) {
        match &mut self.engine {
            Engine::MinStd(e) => e.seed(seed),
            Engine::Mt19937(e) => e.seed(seed),
            Engine::Mt19937_64(e) => e.seed(seed),
            Engine::SubtractWithCarry(e) => e.seed(seed),
            Engine::Std(e) => **e = StdRng::seed_from_u64(seed),
        }
    }

    pub fn next_value(&mut self) -> u64 {
        match &mut self.engine {
            Engine::MinStd(e) => e.next_value(),
            Engine::Mt19937(e) => e.next_value(),
            Engine::Mt19937_64(e) => e.next_value(),
            Engine::SubtractWithCarry(e) => e.next_value(),
            Engine::Std(e) => e.next_u64(),
        }
    }

    /// Advance the stream by `n` values.
    pub fn discard(&mut self, n: u64) {
        for _ in 0..n {
            self.next_value();
        }
    }

    pub fn min(&self) -> u64 {
        match &self.engine {
            Engine::MinStd(e) => e.min(),
            Engine::Mt19937(e) => e.min(),
            Engine::Mt19937_64(e) => e.min(),
            Engine::SubtractWithCarry(e) => e.min(),
            Engine::Std(_) => 0,
        }
    }

    pub fn max(&self) -> u64 {
        match &self.engine {
            Engine::MinStd(e) => e.max(),
            Engine::Mt19937(e) => e.max(),
            Engine::Mt19937_64(e) => e.max(),
            Engine::SubtractWithCarry(e) => e.max(),
            Engine::Std(_) => u64::MAX,
        }
    }
}

/// Lets a source drive any `rand` API; every engine is widened to 64 bits.
impl RngCore for RandomSource {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        sample_range(self, 0, u64::MAX)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
