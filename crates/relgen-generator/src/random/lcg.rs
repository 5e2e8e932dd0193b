//! Multiplicative linear congruential engines.

use super::BitGenerator;

/// Modulus shared by both minimal standard engines.
const MODULUS: u64 = 2_147_483_647;

/// Minimal standard LCG: `x' = a·x mod (2^31 - 1)`.
#[derive(Debug, Clone)]
pub struct MinStd {
    multiplier: u64,
    state: u64,
}

impl MinStd {
    pub const DEFAULT_SEED: u64 = 1;

    /// The original 1988 multiplier (`minstd_rand0`).
    pub fn rand0(seed: u64) -> Self {
        Self::with_multiplier(16_807, seed)
    }

    /// The revised 1993 multiplier (`minstd_rand`).
    pub fn rand(seed: u64) -> Self {
        Self::with_multiplier(48_271, seed)
    }

    fn with_multiplier(multiplier: u64, seed: u64) -> Self {
        let mut engine = Self {
            multiplier,
            state: 1,
        };
        engine.seed(seed);
        engine
    }
}

impl BitGenerator for MinStd {
    fn seed(&mut self, seed: u64) {
        // The increment is zero, so a zero state would be a fixed point.
        self.state = match seed % MODULUS {
            0 => 1,
            s => s,
        };
    }

    fn next_value(&mut self) -> u64 {
        self.state = self.multiplier * self.state % MODULUS;
        self.state
    }

    fn min(&self) -> u64 {
        1
    }

    fn max(&self) -> u64 {
        MODULUS - 1
    }
}
