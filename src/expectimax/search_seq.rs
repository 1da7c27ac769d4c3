use std::collections::HashMap;

use tracing::{debug, trace};

use crate::engine::{Board, Direction};

use super::heuristic::evaluate;
use super::{
    best_branch, illegal_branches, is_leaf, successors, with_spawn, BranchEval, ExpectimaxConfig, MoveRecommender,
    Node, SearchStats, SPAWN_OUTCOMES,
};

/// Chance-node memo keyed on the board and its exact remaining depth.
type TranspositionTable = HashMap<(Board, u32), f64>;

/// Single-threaded Expectimax search.
#[derive(Debug, Clone)]
pub struct Expectimax {
    cfg: ExpectimaxConfig,
    stats: SearchStats,
}

impl Expectimax {
    pub fn new() -> Self { Self::with_config(ExpectimaxConfig::default()) }

    pub fn with_config(cfg: ExpectimaxConfig) -> Self { Self { cfg, stats: SearchStats::default() } }

    #[inline]
    pub fn config(&self) -> &ExpectimaxConfig { &self.cfg }

    /// Recommend a direction for `board`.
    ///
    /// Returns `None` only when no direction changes the board.
    ///
    /// Example
    /// ```
    /// use slide_2048::engine::{Board, Direction};
    /// use slide_2048::expectimax::{Expectimax, ExpectimaxConfig};
    /// let board = Board::from_rows(vec![vec![2, 4], vec![4, 2]]).unwrap();
    /// let mut ex = Expectimax::with_config(ExpectimaxConfig { depth: 2, ..Default::default() });
    /// assert_eq!(ex.recommend_next_move(&board), None);
    /// ```
    pub fn recommend_next_move(&mut self, board: &Board) -> Option<Direction> {
        let branches = self.branch_evals(board);
        let best = best_branch(&branches);
        debug!(direction = ?best, nodes = self.stats.nodes, depth = self.cfg.depth, "expectimax recommendation");
        best
    }

    /// Compute EV for each direction (no normalization).
    ///
    /// Returns a fixed array in order: `[Up, Down, Left, Right]` and marks
    /// illegal moves as `legal=false`.
    pub fn branch_evals(&mut self, board: &Board) -> [BranchEval; 4] {
        let mut cache = TranspositionTable::new();
        let mut nodes = 0u64;
        let mut out = illegal_branches();
        for (slot, child) in out.iter_mut().zip(successors(board)) {
            if let Some(child) = child {
                slot.ev = self.expectimax(&child, Node::Chance, self.root_child_depth(), &mut cache, &mut nodes);
                slot.legal = true;
                trace!(direction = %slot.dir, ev = slot.ev, "root branch");
            }
        }
        self.stats.record(nodes);
        out
    }

    /// EV of the best legal branch, `None` on a stuck board.
    pub fn state_value(&mut self, board: &Board) -> Option<f64> {
        self.branch_evals(board)
            .iter()
            .filter(|b| b.legal)
            .map(|b| b.ev)
            .reduce(f64::max)
    }

    /// Statistics collected from the last call to [`Self::recommend_next_move`],
    /// [`Self::branch_evals`] or [`Self::state_value`].
    #[inline]
    pub fn last_stats(&self) -> SearchStats { self.stats }

    /// Reset accumulated stats to zero.
    #[inline]
    pub fn reset_stats(&mut self) { self.stats = SearchStats::default(); }

    #[inline]
    fn root_child_depth(&self) -> u32 { self.cfg.depth.saturating_sub(1) }

    fn expectimax(
        &self,
        board: &Board,
        node: Node,
        depth: u32,
        cache: &mut TranspositionTable,
        nodes: &mut u64,
    ) -> f64 {
        *nodes += 1;
        if is_leaf(board, depth, &self.cfg) {
            return evaluate(board, &self.cfg.weights);
        }
        match node {
            Node::Max => self.evaluate_max(board, depth, cache, nodes),
            Node::Chance => self.evaluate_chance(board, depth, cache, nodes),
        }
    }

    fn evaluate_max(&self, board: &Board, depth: u32, cache: &mut TranspositionTable, nodes: &mut u64) -> f64 {
        let mut best: Option<f64> = None;
        for child in successors(board).into_iter().flatten() {
            let score = self.expectimax(&child, Node::Chance, depth - 1, cache, nodes);
            best = Some(best.map_or(score, |b| b.max(score)));
        }
        // Nothing moved: treat this branch as a leaf.
        best.unwrap_or_else(|| evaluate(board, &self.cfg.weights))
    }

    fn evaluate_chance(&self, board: &Board, depth: u32, cache: &mut TranspositionTable, nodes: &mut u64) -> f64 {
        let slots = board.empty_coordinates();
        if slots.is_empty() {
            return evaluate(board, &self.cfg.weights);
        }
        if self.cfg.cache_enabled {
            if let Some(&score) = cache.get(&(board.clone(), depth)) {
                return score;
            }
        }
        let mut sum = 0.0;
        for &slot in &slots {
            let mut slot_score = 0.0;
            for (value, prob) in SPAWN_OUTCOMES {
                let child = with_spawn(board, slot, value);
                slot_score += prob * self.expectimax(&child, Node::Max, depth - 1, cache, nodes);
            }
            sum += slot_score;
        }
        let score = sum / slots.len() as f64;
        if self.cfg.cache_enabled {
            cache.insert((board.clone(), depth), score);
        }
        score
    }
}

impl Default for Expectimax {
    fn default() -> Self { Self::new() }
}

impl MoveRecommender for Expectimax {
    fn recommend_next_move(&mut self, board: &Board) -> Option<Direction> { Expectimax::recommend_next_move(self, board) }
}
