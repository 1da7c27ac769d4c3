use serde::{Deserialize, Serialize};

use crate::engine::Board;

/// Weights of the static evaluation's linear combination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicWeights {
    pub empty: f64,
    pub smoothness: f64,
    pub monotonicity: f64,
    pub corner: f64,
    pub max_value: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self { empty: 350.0, smoothness: 3.0, monotonicity: 10.0, corner: 300.0, max_value: 1.0 }
    }
}

/// Static value of a board, no lookahead. O(size²).
#[inline]
pub fn evaluate(board: &Board, w: &HeuristicWeights) -> f64 {
    w.empty * board.count_empty() as f64
        + w.smoothness * smoothness(board)
        + w.monotonicity * monotonicity(board)
        + w.corner * corner_bonus(board)
        + w.max_value * board.max_value() as f64
}

/// `log2(value)` with empty cells (0) mapped to 0.
#[inline]
fn log2_value(value: u64) -> f64 {
    if value == 0 { 0.0 } else { value.trailing_zeros() as f64 }
}

/// Minus the rank gap between every piece and its right and down neighbours.
fn smoothness(board: &Board) -> f64 {
    let n = board.size();
    let mut score = 0.0;
    for r in 0..n {
        for c in 0..n {
            let v = board.value_at(r, c);
            if v == 0 {
                continue;
            }
            let rank = log2_value(v);
            if c + 1 < n {
                let right = board.value_at(r, c + 1);
                if right != 0 {
                    score -= (rank - log2_value(right)).abs();
                }
            }
            if r + 1 < n {
                let down = board.value_at(r + 1, c);
                if down != 0 {
                    score -= (rank - log2_value(down)).abs();
                }
            }
        }
    }
    score
}

/// Sum over rows and columns of the larger of the rising and falling step totals.
///
/// Only directly adjacent occupied cells are compared.
fn monotonicity(board: &Board) -> f64 {
    let n = board.size();
    let mut total = 0.0;
    for line in 0..n {
        total += line_monotonicity((0..n).map(|i| board.value_at(line, i)));
        total += line_monotonicity((0..n).map(|i| board.value_at(i, line)));
    }
    total
}

fn line_monotonicity(values: impl Iterator<Item = u64>) -> f64 {
    let mut rising = 0.0;
    let mut falling = 0.0;
    let mut prev = 0u64;
    for v in values {
        if prev != 0 && v != 0 {
            let (a, b) = (log2_value(prev), log2_value(v));
            if b > a { rising += b - a } else { falling += a - b }
        }
        prev = v;
    }
    f64::max(rising, falling)
}

/// `1.0` when a corner holds a piece equal to the board's maximum.
fn corner_bonus(board: &Board) -> f64 {
    let max = board.max_value();
    if max == 0 {
        return 0.0;
    }
    let last = board.size() - 1;
    let corners = [(0, 0), (0, last), (last, 0), (last, last)];
    if corners.iter().any(|&(r, c)| board.value_at(r, c) == max) { 1.0 } else { 0.0 }
}
