//! Expectimax move recommendation (single-threaded and parallel).
//!
//! This module provides two agents with the same surface:
//! - [`Expectimax`]: single-threaded search.
//! - [`ExpectimaxParallel`]: rayon-based search. It dispatches the root
//!   directions and wide chance nodes onto the pool.
//!
//! The search alternates max nodes (the player picks a direction) and chance
//! nodes (a 2 or 4 lands on a uniformly chosen empty cell). Both node kinds
//! spend one unit of the shared depth budget. Leaves are scored by a weighted
//! static heuristic. Every node works on its own clone of the board; the board
//! passed in by the caller is only borrowed immutably.
//!
//! Quick start
//! ```
//! use slide_2048::engine::{Board, Direction};
//! use slide_2048::expectimax::{Expectimax, ExpectimaxConfig, ExpectimaxParallel};
//!
//! let board = Board::from_rows(vec![
//!     vec![2, 2, 0, 0],
//!     vec![0, 0, 0, 0],
//!     vec![0, 0, 0, 0],
//!     vec![0, 0, 0, 4],
//! ]).unwrap();
//! let cfg = ExpectimaxConfig { depth: 2, ..Default::default() };
//! let mut ex = Expectimax::with_config(cfg.clone());
//! let m = ex.recommend_next_move(&board);
//! let mut ex_par = ExpectimaxParallel::with_config(cfg);
//! assert!(m.is_some());
//! assert_eq!(m, ex_par.recommend_next_move(&board));
//! ```

use serde::{Deserialize, Serialize};

use crate::engine::{Board, Coordinate, Direction, Piece};
use crate::error::{EngineError, Result};

mod heuristic;
mod search_par;
mod search_seq;

pub use heuristic::{evaluate as heuristic_value, HeuristicWeights};
pub use search_par::ExpectimaxParallel;
pub use search_seq::Expectimax;

/// Spawn outcomes assumed at chance nodes: `(value, probability)`.
const SPAWN_OUTCOMES: [(u64, f64); 2] = [(2, 0.9), (4, 0.1)];

/// Configurable knobs for the agents.
///
/// - `depth`: shared budget; max->chance and chance->max each spend one unit.
/// - `target_value`: a board holding this value is a leaf.
/// - `weights`: heuristic weights for leaf evaluation.
/// - `cache_enabled`: memoise chance nodes on `(board, remaining depth)`.
/// - `par_thresholds`: used only by [`ExpectimaxParallel`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpectimaxConfig {
    pub depth: u32,
    pub target_value: u64,
    pub weights: HeuristicWeights,
    pub cache_enabled: bool,
    pub par_thresholds: ParThresholds,
}

impl Default for ExpectimaxConfig {
    fn default() -> Self {
        Self {
            depth: 4,
            target_value: 2048,
            weights: HeuristicWeights::default(),
            cache_enabled: true,
            par_thresholds: ParThresholds::default(),
        }
    }
}

impl ExpectimaxConfig {
    pub fn validate(&self) -> Result<()> {
        if self.depth == 0 {
            return Err(EngineError::InvalidConfig("search depth must be at least 1".into()));
        }
        if self.target_value < 4 || !self.target_value.is_power_of_two() {
            return Err(EngineError::InvalidConfig(format!(
                "target value {} is not a power of two >= 4",
                self.target_value
            )));
        }
        Ok(())
    }
}

/// When the parallel agent fans chance nodes out onto the rayon pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParThresholds {
    /// Minimum remaining depth for a parallel chance node.
    pub par_depth: u32,
    /// Minimum number of empty cells for a parallel chance node.
    pub par_slots: usize,
}

impl Default for ParThresholds {
    fn default() -> Self { Self { par_depth: 3, par_slots: 4 } }
}

/// Per-branch expected value at the root.
///
/// - `ev` is the expected value for taking `dir` from the current board.
/// - `legal` is false when the move is a no-op for the current board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchEval {
    pub dir: Direction,
    pub ev: f64,
    pub legal: bool,
}

/// Basic search stats.
///
/// `nodes` covers the last evaluation; `peak_nodes` is the largest `nodes`
/// seen since the last reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub peak_nodes: u64,
}

impl SearchStats {
    fn record(&mut self, nodes: u64) {
        self.nodes = nodes;
        self.peak_nodes = self.peak_nodes.max(nodes);
    }
}

/// Anything that can suggest the next direction for a board.
pub trait MoveRecommender {
    /// The best direction, or `None` when no direction changes the board.
    fn recommend_next_move(&mut self, board: &Board) -> Option<Direction>;
}

#[derive(Debug, Clone, Copy)]
enum Node {
    Max,
    Chance,
}

fn illegal_branches() -> [BranchEval; 4] {
    Direction::ALL.map(|dir| BranchEval { dir, ev: 0.0, legal: false })
}

/// The legal branch with the strictly greatest EV; the earlier direction wins ties.
fn best_branch(branches: &[BranchEval; 4]) -> Option<Direction> {
    let mut best: Option<&BranchEval> = None;
    for branch in branches.iter().filter(|b| b.legal) {
        if best.map_or(true, |b| branch.ev > b.ev) {
            best = Some(branch);
        }
    }
    best.map(|b| b.dir)
}

#[inline]
fn is_leaf(board: &Board, depth: u32, cfg: &ExpectimaxConfig) -> bool {
    depth == 0 || !board.has_valid_moves() || board.max_value() >= cfg.target_value
}

/// A clone of `board` with `value` dropped onto an empty cell.
#[inline]
fn with_spawn(board: &Board, slot: Coordinate, value: u64) -> Board {
    let mut child = board.clone();
    child.spawn(slot, Piece::spawned(value));
    child
}

/// Clones of `board` shifted in each direction; `None` for no-op directions.
fn successors(board: &Board) -> [Option<Board>; 4] {
    Direction::ALL.map(|dir| {
        let mut child = board.clone();
        child.shift(dir).then_some(child)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(dir: Direction, ev: f64, legal: bool) -> BranchEval { BranchEval { dir, ev, legal } }

    #[test]
    fn best_branch_skips_illegal_and_keeps_first_tie() {
        let branches = [
            eval(Direction::Up, 99.0, false),
            eval(Direction::Down, 5.0, true),
            eval(Direction::Left, 5.0, true),
            eval(Direction::Right, 1.0, true),
        ];
        assert_eq!(best_branch(&branches), Some(Direction::Down));
        assert_eq!(best_branch(&illegal_branches()), None);
    }

    #[test]
    fn config_validation() {
        assert!(ExpectimaxConfig::default().validate().is_ok());
        assert!(ExpectimaxConfig { depth: 0, ..Default::default() }.validate().is_err());
        assert!(ExpectimaxConfig { target_value: 100, ..Default::default() }.validate().is_err());
    }

    #[test]
    fn config_fills_missing_fields_from_defaults() {
        let cfg: ExpectimaxConfig = serde_json::from_str(r#"{ "depth": 2, "weights": { "corner": 0.0 } }"#).unwrap();
        assert_eq!(cfg.depth, 2);
        assert_eq!(cfg.weights.corner, 0.0);
        assert_eq!(cfg.weights.empty, 350.0);
        assert!(cfg.cache_enabled);
    }
}
