use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use crate::error::{EngineError, Result};

/// Probability that a randomized piece starts as a 4 instead of a 2.
pub const DEFAULT_FOUR_PROBABILITY: f64 = 0.1;

/// A tile on the board. Its value is always a power of two >= 2.
///
/// The value changes only through [`Piece::upgrade`], which the board calls
/// when another piece merges into this one. `Piece` is not
/// `Copy`: moving a piece between cells transfers it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    value: u64,
}

impl Piece {
    /// Largest representable value. Pieces at this value no longer merge.
    pub const MAX_VALUE: u64 = 1 << 63;

    /// Build a piece with an explicit value.
    ///
    /// ```
    /// use slide_2048::engine::Piece;
    /// assert_eq!(Piece::new(8).unwrap().value(), 8);
    /// assert!(Piece::new(6).is_err());
    /// assert!(Piece::new(1).is_err());
    /// ```
    pub fn new(value: u64) -> Result<Piece> {
        if value < 2 || !value.is_power_of_two() {
            return Err(EngineError::InvalidPieceValue(value));
        }
        Ok(Piece { value })
    }

    /// Spawn value known to be valid (2 or 4); skips validation.
    #[inline]
    pub(crate) fn spawned(value: u64) -> Piece {
        debug_assert!(value >= 2 && value.is_power_of_two());
        Piece { value }
    }

    #[inline]
    pub fn value(&self) -> u64 { self.value }

    /// `log2(value)`, the tile's rank (2 -> 1, 4 -> 2, ...).
    #[inline]
    pub fn rank(&self) -> u32 { self.value.trailing_zeros() }

    /// Double the value in place. Only the board's merge step calls this,
    /// and never on a piece at [`Piece::MAX_VALUE`].
    #[inline]
    pub(crate) fn upgrade(&mut self) {
        debug_assert!(self.value < Self::MAX_VALUE, "piece value overflow");
        self.value <<= 1;
    }
}

/// Constructs pieces, either with a given value or with the weighted 2/4 draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieceFactory {
    four_probability: f64,
}

impl Default for PieceFactory {
    fn default() -> Self { PieceFactory { four_probability: DEFAULT_FOUR_PROBABILITY } }
}

impl PieceFactory {
    /// Factory with a custom spawn probability for 4s. Must lie in `[0, 1]`.
    pub fn with_four_probability(four_probability: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&four_probability) {
            return Err(EngineError::InvalidConfig(format!(
                "four_probability must be within [0, 1], got {four_probability}"
            )));
        }
        Ok(PieceFactory { four_probability })
    }

    #[inline]
    pub fn four_probability(&self) -> f64 { self.four_probability }

    /// Create a piece. With `value = None` a single unit draw decides between
    /// 2 (`1 - four_probability`) and 4.
    pub fn create<R: RandomSource + ?Sized>(&self, value: Option<u64>, rng: &mut R) -> Result<Piece> {
        match value {
            Some(v) => Piece::new(v),
            None => Ok(self.random_piece(rng)),
        }
    }

    fn random_piece<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Piece {
        let value = if rng.uniform_unit() < 1.0 - self.four_probability { 2 } else { 4 };
        Piece { value }
    }
}
