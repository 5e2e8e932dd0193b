//! Mersenne Twister engines (32- and 64-bit).

use super::BitGenerator;

const N32: usize = 624;
const M32: usize = 397;
const MATRIX_A32: u32 = 0x9908_b0df;
const UPPER_MASK32: u32 = 0x8000_0000;
const LOWER_MASK32: u32 = 0x7fff_ffff;

/// 32-bit Mersenne Twister (MT19937).
#[derive(Clone)]
pub struct Mt19937 {
    state: Box<[u32; N32]>,
    index: usize,
}

impl Mt19937 {
    pub const DEFAULT_SEED: u64 = 5489;

    pub fn new(seed: u64) -> Self {
        let mut engine = Self {
            state: Box::new([0; N32]),
            index: N32,
        };
        engine.seed(seed);
        engine
    }

    fn twist(&mut self) {
        for k in 0..N32 {
            let y = (self.state[k] & UPPER_MASK32) | (self.state[(k + 1) % N32] & LOWER_MASK32);
            let mag = if y & 1 == 1 { MATRIX_A32 } else { 0 };
            self.state[k] = self.state[(k + M32) % N32] ^ (y >> 1) ^ mag;
        }
        self.index = 0;
    }
}

impl BitGenerator for Mt19937 {
    fn seed(&mut self, seed: u64) {
        self.state[0] = seed as u32;
        for i in 1..N32 {
            let prev = self.state[i - 1];
            self.state[i] = 1_812_433_253u32
                .wrapping_mul(prev ^ (prev >> 30))
                .wrapping_add(i as u32);
        }
        self.index = N32;
    }

    fn next_value(&mut self) -> u64 {
        if self.index >= N32 {
            self.twist();
        }
        let mut y = self.state[self.index];
        self.index += 1;

        y ^= y >> 11;
        y ^= (y << 7) & 0x9d2c_5680;
        y ^= (y << 15) & 0xefc6_0000;
        y ^= y >> 18;
        u64::from(y)
    }

    fn min(&self) -> u64 {
        0
    }

    fn max(&self) -> u64 {
        u64::from(u32::MAX)
    }
}

const N64: usize = 312;
const M64: usize = 156;
const MATRIX_A64: u64 = 0xB502_6F5A_A966_19E9;
const UPPER_MASK64: u64 = 0xFFFF_FFFF_8000_0000;
const LOWER_MASK64: u64 = 0x7FFF_FFFF;

/// 64-bit Mersenne Twister (MT19937-64).
#[derive(Clone)]
pub struct Mt19937_64 {
    state: Box<[u64; N64]>,
    index: usize,
}

impl Mt19937_64 {
    pub const DEFAULT_SEED: u64 = 5489;

    pub fn new(seed: u64) -> Self {
        let mut engine = Self {
            state: Box::new([0; N64]),
            index: N64,
        };
        engine.seed(seed);
        engine
    }

    fn twist(&mut self) {
        for k in 0..N64 {
            let y = (self.state[k] & UPPER_MASK64) | (self.state[(k + 1) % N64] & LOWER_MASK64);
            let mag = if y & 1 == 1 { MATRIX_A64 } else { 0 };
            self.state[k] = self.state[(k + M64) % N64] ^ (y >> 1) ^ mag;
        }
        self.index = 0;
    }
}

impl BitGenerator for Mt19937_64 {
    fn seed(&mut self, seed: u64) {
        self.state[0] = seed;
        for i in 1..N64 {
            let prev = self.state[i - 1];
            self.state[i] = 6_364_136_223_846_793_005u64
                .wrapping_mul(prev ^ (prev >> 62))
                .wrapping_add(i as u64);
        }
        self.index = N64;
    }

    fn next_value(&mut self) -> u64 {
        if self.index >= N64 {
            self.twist();
        }
        let mut x = self.state[self.index];
        self.index += 1;

        x ^= (x >> 29) & 0x5555_5555_5555_5555;
        x ^= (x << 17) & 0x71D6_7FFF_EDA6_0000;
        x ^= (x << 37) & 0xFFF7_EEE0_0000_0000;
        x ^= x >> 43;
        x
    }

    fn min(&self) -> u64 {
        0
    }

    fn max(&self) -> u64 {
        u64::MAX
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mt19937_reference_value() {
        let mut engine = Mt19937::new(Mt19937::DEFAULT_SEED);
        engine.discard(9999);
        assert_eq!(engine.next_value(), 4_123_659_995);
    }

    #[test]
    fn test_mt19937_64_reference_value() {
        let mut engine = Mt19937_64::new(Mt19937_64::DEFAULT_SEED);
        engine.discard(9999);
        assert_eq!(engine.next_value(), 9_981_545_732_273_789_042);
    }

    #[test]
    fn test_reseed_restarts_stream() {
        let mut engine = Mt19937_64::new(17);
        let first: Vec<u64> = (0..5).map(|_| engine.next_value()).collect();
        engine.seed(17);
        let again: Vec<u64> = (0..5).map(|_| engine.next_value()).collect();
        assert_eq!(first, again);
    }
}
