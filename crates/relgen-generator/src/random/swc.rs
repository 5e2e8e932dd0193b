//! Subtract-with-carry (lagged Fibonacci) engines.

use super::BitGenerator;

/// Seed used when a zero seed is given.
const FALLBACK_SEED: u64 = 19_780_503;

/// Subtract-with-carry engine with word size `w`, short lag `s` and long lag `r`.
#[derive(Debug, Clone)]
pub struct SubtractWithCarry {
    word_size: u32,
    short_lag: usize,
    state: Vec<u64>,
    carry: u64,
    position: usize,
}

impl SubtractWithCarry {
    pub const DEFAULT_SEED: u64 = FALLBACK_SEED;

    /// 24-bit words, lags (10, 24).
    pub fn ranlux24_base(seed: u64) -> Self {
        Self::new(24, 10, 24, seed)
    }

    /// 48-bit words, lags (5, 12).
    pub fn ranlux48_base(seed: u64) -> Self {
        Self::new(48, 5, 12, seed)
    }

    fn new(word_size: u32, short_lag: usize, long_lag: usize, seed: u64) -> Self {
        let mut engine = Self {
            word_size,
            short_lag,
            state: vec![0; long_lag],
            carry: 0,
            position: 0,
        };
        engine.seed(seed);
        engine
    }

    fn modulus(&self) -> u64 {
        1u64 << self.word_size
    }
}

impl BitGenerator for SubtractWithCarry {
    fn seed(&mut self, seed: u64) {
        // State words are filled from a multiplicative LCG (a = 40014, m = 2147483563).
        const LCG_A: u64 = 40_014;
        const LCG_M: u64 = 2_147_483_563;

        let seed = if seed == 0 { FALLBACK_SEED } else { seed };
        let mut lcg = match seed % LCG_M {
            0 => 1,
            s => s,
        };
        let chunks = self.word_size.div_ceil(32);
        let modulus = self.modulus();

        for word in self.state.iter_mut() {
            let mut sum = 0u64;
            for chunk in 0..chunks {
                lcg = LCG_A * lcg % LCG_M;
                sum = sum.wrapping_add((lcg & 0xffff_ffff) << (32 * chunk));
            }
            *word = sum % modulus;
        }

        self.carry = u64::from(self.state[self.state.len() - 1] == 0);
        self.position = 0;
    }

    fn next_value(&mut self) -> u64 {
        let long_lag = self.state.len();
        let short = (self.position + long_lag - self.short_lag) % long_lag;

        let a = self.state[short];
        let b = self.state[self.position];
        let value = if a >= b + self.carry {
            let v = a - b - self.carry;
            self.carry = 0;
            v
        } else {
            let v = self.modulus() - b - self.carry + a;
            self.carry = 1;
            v
        };

        self.state[self.position] = value;
        self.position = (self.position + 1) % long_lag;
        value
    }

    fn min(&self) -> u64 {
        0
    }

    fn max(&self) -> u64 {
        self.modulus() - 1
    }
}
