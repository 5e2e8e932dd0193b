//! Zipfian distribution by rejection-inversion.
//!
//! Draws `k` in `[1, n]` with probability proportional to `(k + q)^-s`
//! (W. Hörmann and G. Derflinger, "Rejection-inversion to generate variates
//! from monotone discrete distributions", 1996). Expected iterations per
//! draw are bounded for every valid `(n, s, q)`.

use super::uniform::sample_canonical;
use super::{Distribution, DistributionError};
use crate::random::RandomSource;

/// Below this `|1 - s|` the closed forms switch to series expansions.
const EPSILON: f64 = 2e-5;

/// `(exp(x) - 1) / x`
fn expxm1bx(x: f64) -> f64 {
    if x.abs() > EPSILON {
        x.exp_m1() / x
    } else {
        1.0 + x / 2.0 * (1.0 + x / 3.0 * (1.0 + x / 4.0))
    }
}

/// `log(1 + x) / x`
fn log1pxbx(x: f64) -> f64 {
    if x.abs() > EPSILON {
        x.ln_1p() / x
    } else {
        1.0 - x * (1.0 / 2.0 - x * (1.0 / 3.0 - x * (1.0 / 4.0)))
    }
}

#[derive(Debug, Clone)]
pub struct Zipf {
    n: u64,
    s: f64,
    q: f64,
    one_minus_s: f64,
    near_pole: bool,
    inv_one_minus_s: f64,
    h_x1: f64,
    h_n: f64,
    cut: f64,
}

impl Zipf {
    /// Zipf over `[1, n]` with exponent `s` and deformation `q`.
    pub fn new(n: u64, s: f64, q: f64) -> Result<Self, DistributionError> {
        if n == 0 {
            return Err(DistributionError::InvalidRange { min: 1, max: 0 });
        }
        if q <= -0.5 || !q.is_finite() {
            return Err(DistributionError::InvalidParameter(format!(
                "zipf deformation q must be greater than -0.5, got {q}"
            )));
        }
        if !s.is_finite() || s <= 0.0 {
            return Err(DistributionError::InvalidParameter(format!(
                "zipf exponent s must be positive, got {s}"
            )));
        }

        let one_minus_s = 1.0 - s;
        let near_pole = one_minus_s.abs() < EPSILON;
        let mut zipf = Self {
            n,
            s,
            q,
            one_minus_s,
            near_pole,
            inv_one_minus_s: if near_pole { 0.0 } else { 1.0 / one_minus_s },
            h_x1: 0.0,
            h_n: 0.0,
            cut: 0.0,
        };
        zipf.h_x1 = zipf.big_h(1.5) - zipf.h(1.0);
        zipf.h_n = zipf.big_h(n as f64 + 0.5);
        zipf.cut = 1.0 - zipf.big_h_inv(zipf.h_x1);
        Ok(zipf)
    }

    pub fn exponent(&self) -> f64 {
        self.s
    }

    pub fn deformation(&self) -> f64 {
        self.q
    }

    /// Hat function `(x + q)^-s`.
    fn h(&self, x: f64) -> f64 {
        (x + self.q).powf(-self.s)
    }

    /// Integral of the hat function.
    fn big_h(&self, x: f64) -> f64 {
        if !self.near_pole {
            return (x + self.q).powf(self.one_minus_s) / self.one_minus_s;
        }
        let log_xpq = (x + self.q).ln();
        log_xpq * expxm1bx(self.one_minus_s * log_xpq)
    }

    fn big_h_inv(&self, y: f64) -> f64 {
        if !self.near_pole {
            return (y * self.one_minus_s).powf(self.inv_one_minus_s) - self.q;
        }
        (y * log1pxbx(self.one_minus_s * y)).exp() - self.q
    }
}

impl Distribution for Zipf {
    type Output = u64;

    fn reset(&mut self) {}

    fn next(&mut self, source: &mut RandomSource) -> Result<u64, DistributionError> {
        loop {
            let u = self.h_x1 + sample_canonical(source) * (self.h_n - self.h_x1);
            let x = self.big_h_inv(u);
            let k = x.round().clamp(1.0, self.n as f64);
            if k - x <= self.cut || u >= self.big_h(k + 0.5) - self.h(k) {
                return Ok((k as u64).clamp(1, self.n));
            }
        }
    }

    fn min(&self) -> u64 {
        1
    }

    fn max(&self) -> u64 {
        self.n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relgen_core::Algorithm;

    fn histogram(n: u64, s: f64, draws: usize) -> Vec<usize> {
        let mut source = RandomSource::new(Algorithm::Mt19937_64, 2024);
        let mut zipf = Zipf::new(n, s, 0.0).unwrap();
        let mut counts = vec![0usize; n as usize + 1];
        for _ in 0..draws {
            let k = zipf.next(&mut source).unwrap();
            assert!((1..=n).contains(&k));
            counts[k as usize] += 1;
        }
        counts
    }

    #[test]
    fn test_head_outweighs_tail() {
        for s in [0.5, 0.9, 1.0, 1.2, 1.5] {
            let counts = histogram(50, s, 20_000);
            assert!(counts[1] > counts[50], "s = {s}: {counts:?}");
        }
    }

    #[test]
    fn test_converges_to_power_law() {
        let n = 10u64;
        let s = 1.2;
        let draws = 200_000;
        let counts = histogram(n, s, draws);

        let norm: f64 = (1..=n).map(|k| (k as f64).powf(-s)).sum();
        for k in 1..=n {
            let expected = (k as f64).powf(-s) / norm;
            let observed = counts[k as usize] as f64 / draws as f64;
            assert!(
                (observed - expected).abs() < 0.01,
                "k = {k}: observed {observed}, expected {expected}"
            );
        }
    }

    #[test]
    fn test_single_value_domain() {
        let counts = histogram(1, 1.5, 100);
        assert_eq!(counts[1], 100);
    }

    #[test]
    fn test_parameter_validation() {
        assert!(Zipf::new(10, 1.0, -0.5).is_err());
        assert!(Zipf::new(10, 1.0, -0.49).is_ok());
        assert!(Zipf::new(0, 1.0, 0.0).is_err());
        assert!(Zipf::new(10, 0.0, 0.0).is_err());
    }
}
