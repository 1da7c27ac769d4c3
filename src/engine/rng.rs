//! Injected randomness.
//!
//! The engine never reaches for a global RNG. Everything random goes through
//! [`RandomSource`] so games are reproducible from a seed, and tests can
//! substitute a scripted [`SequenceSource`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{EngineError, Result};

/// Uniform integer and unit-interval draws.
///
/// Implementations must be unbiased; `Board::random_empty_coordinates`
/// relies on it for uniform sampling without replacement.
pub trait RandomSource {
    /// Uniform integer in `min..=max`. Fails if `min > max`.
    fn uniform_int(&mut self, min: usize, max: usize) -> Result<usize>;

    /// Uniform float in `[0, 1)`.
    fn uniform_unit(&mut self) -> f64;
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    #[inline]
    fn uniform_int(&mut self, min: usize, max: usize) -> Result<usize> { (**self).uniform_int(min, max) }

    #[inline]
    fn uniform_unit(&mut self) -> f64 { (**self).uniform_unit() }
}

/// Adapts any [`rand::Rng`] to [`RandomSource`].
///
/// ```
/// use slide_2048::engine::{RandomSource, RngSource};
/// let mut src = RngSource::seeded(42);
/// let v = src.uniform_int(1, 6).unwrap();
/// assert!((1..=6).contains(&v));
/// ```
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl RngSource<StdRng> {
    /// Deterministic source from a 64-bit seed.
    pub fn seeded(seed: u64) -> Self { RngSource(StdRng::seed_from_u64(seed)) }

    /// Source seeded from OS entropy.
    pub fn from_entropy() -> Self { RngSource(StdRng::from_entropy()) }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn uniform_int(&mut self, min: usize, max: usize) -> Result<usize> {
        if min > max {
            return Err(EngineError::InvalidRange { min, max });
        }
        Ok(self.0.gen_range(min..=max))
    }

    #[inline]
    fn uniform_unit(&mut self) -> f64 { self.0.gen::<f64>() }
}

/// Scripted source that replays fixed sequences, cycling when exhausted.
///
/// Integer draws map the scripted value into the requested range with
/// `min + v % (max - min + 1)`, so a script of zeros always picks the first
/// candidate. An empty script behaves like a script of zeros.
#[derive(Debug, Clone, Default)]
pub struct SequenceSource {
    ints: Vec<usize>,
    units: Vec<f64>,
    next_int: usize,
    next_unit: usize,
}

impl SequenceSource {
    pub fn new(ints: Vec<usize>, units: Vec<f64>) -> Self {
        SequenceSource { ints, units, next_int: 0, next_unit: 0 }
    }

    /// Number of integer draws served so far.
    pub fn int_draws(&self) -> usize { self.next_int }

    /// Number of unit draws served so far.
    pub fn unit_draws(&self) -> usize { self.next_unit }
}

impl RandomSource for SequenceSource {
    fn uniform_int(&mut self, min: usize, max: usize) -> Result<usize> {
        if min > max {
            return Err(EngineError::InvalidRange { min, max });
        }
        let raw = if self.ints.is_empty() { 0 } else { self.ints[self.next_int % self.ints.len()] };
        self.next_int += 1;
        let span = max - min;
        Ok(if span == usize::MAX { raw } else { min + raw % (span + 1) })
    }

    fn uniform_unit(&mut self) -> f64 {
        let raw = if self.units.is_empty() { 0.0 } else { self.units[self.next_unit % self.units.len()] };
        self.next_unit += 1;
        raw.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverted_range_is_rejected() {
        let mut src = RngSource::seeded(1);
        assert!(matches!(src.uniform_int(5, 4), Err(EngineError::InvalidRange { min: 5, max: 4 })));
        let mut seq = SequenceSource::default();
        assert!(seq.uniform_int(3, 0).is_err());
    }

    #[test]
    fn rng_source_stays_in_bounds() {
        let mut src = RngSource::seeded(7);
        for _ in 0..1000 {
            let v = src.uniform_int(2, 5).unwrap();
            assert!((2..=5).contains(&v));
            let u = src.uniform_unit();
            assert!((0.0..1.0).contains(&u));
        }
        assert_eq!(src.uniform_int(3, 3).unwrap(), 3);
    }

    #[test]
    fn sequence_source_cycles_and_wraps() {
        let mut seq = SequenceSource::new(vec![0, 7], vec![0.5, 1.5]);
        assert_eq!(seq.uniform_int(0, 3).unwrap(), 0);
        assert_eq!(seq.uniform_int(0, 3).unwrap(), 3);
        assert_eq!(seq.uniform_int(10, 11).unwrap(), 10);
        assert_eq!(seq.int_draws(), 3);
        assert_eq!(seq.uniform_unit(), 0.5);
        assert!(seq.uniform_unit() < 1.0);
        assert_eq!(seq.uniform_unit(), 0.5);
    }
}
