use std::sync::atomic::{AtomicU64, Ordering};

use ahash::RandomState as AHasher;
use dashmap::DashMap;
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::engine::{Board, Coordinate, Direction};

use super::heuristic::evaluate;
use super::{
    best_branch, illegal_branches, is_leaf, successors, with_spawn, BranchEval, ExpectimaxConfig, MoveRecommender,
    Node, ParThresholds, SearchStats, SPAWN_OUTCOMES,
};

type TranspositionTable = DashMap<(Board, u32), f64, AHasher>;

/// Parallel Expectimax using rayon and a shared `DashMap` transposition table.
///
/// Produces the same values as [`super::Expectimax`]: chance nodes collect
/// their slot scores in order and sum them sequentially, so the reduction is
/// identical whichever thread computed each slot.
#[derive(Debug, Clone)]
pub struct ExpectimaxParallel {
    cfg: ExpectimaxConfig,
    stats: SearchStats,
}

impl ExpectimaxParallel {
    pub fn new() -> Self { Self::with_config(ExpectimaxConfig::default()) }

    pub fn with_config(cfg: ExpectimaxConfig) -> Self { Self { cfg, stats: SearchStats::default() } }

    #[inline]
    pub fn config(&self) -> &ExpectimaxConfig { &self.cfg }

    /// Recommend a direction using parallel expectimax.
    ///
    /// This is a convenience wrapper around `branch_evals` that just picks the best move.
    pub fn recommend_next_move(&mut self, board: &Board) -> Option<Direction> {
        let branches = self.branch_evals(board);
        let best = best_branch(&branches);
        debug!(direction = ?best, nodes = self.stats.nodes, depth = self.cfg.depth, "parallel expectimax recommendation");
        best
    }

    /// Recommendation plus all root branch evaluations from a single search.
    pub fn recommend_with_branches(&mut self, board: &Board) -> (Option<Direction>, [BranchEval; 4]) {
        let branches = self.branch_evals(board);
        (best_branch(&branches), branches)
    }

    /// Compute EV for each direction in parallel.
    ///
    /// Returns a fixed array in order: `[Up, Down, Left, Right]` and marks
    /// illegal moves as `legal=false`.
    pub fn branch_evals(&mut self, board: &Board) -> [BranchEval; 4] {
        let cache: TranspositionTable = DashMap::with_hasher(AHasher::new());
        let nodes = AtomicU64::new(0);
        let depth = self.cfg.depth.saturating_sub(1);
        let evs: Vec<Option<f64>> = successors(board)
            .into_par_iter()
            .map(|child| child.map(|c| self.expectimax(&c, Node::Chance, depth, &cache, &nodes)))
            .collect();
        let mut out = illegal_branches();
        for (slot, ev) in out.iter_mut().zip(evs) {
            if let Some(ev) = ev {
                slot.ev = ev;
                slot.legal = true;
                trace!(direction = %slot.dir, ev, "root branch");
            }
        }
        self.stats.record(nodes.into_inner());
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

    #[inline]
    pub fn last_stats(&self) -> SearchStats { self.stats }

    #[inline]
    pub fn reset_stats(&mut self) { self.stats = SearchStats::default(); }

    fn expectimax(&self, board: &Board, node: Node, depth: u32, cache: &TranspositionTable, nodes: &AtomicU64) -> f64 {
        nodes.fetch_add(1, Ordering::Relaxed);
        if is_leaf(board, depth, &self.cfg) {
            return evaluate(board, &self.cfg.weights);
        }
        match node {
            Node::Max => self.evaluate_max(board, depth, cache, nodes),
            Node::Chance => self.evaluate_chance(board, depth, cache, nodes),
        }
    }

    fn evaluate_max(&self, board: &Board, depth: u32, cache: &TranspositionTable, nodes: &AtomicU64) -> f64 {
        successors(board)
            .into_iter()
            .flatten()
            .map(|child| self.expectimax(&child, Node::Chance, depth - 1, cache, nodes))
            .reduce(f64::max)
            .unwrap_or_else(|| evaluate(board, &self.cfg.weights))
    }

    fn evaluate_chance(&self, board: &Board, depth: u32, cache: &TranspositionTable, nodes: &AtomicU64) -> f64 {
        let slots = board.empty_coordinates();
        if slots.is_empty() {
            return evaluate(board, &self.cfg.weights);
        }
        if self.cfg.cache_enabled {
            if let Some(score) = cache.get(&(board.clone(), depth)) {
                return *score;
            }
        }
        let ParThresholds { par_depth, par_slots } = self.cfg.par_thresholds;
        let slot_scores: Vec<f64> = if depth >= par_depth && slots.len() >= par_slots {
            slots.par_iter().map(|&slot| self.slot_score(board, slot, depth, cache, nodes)).collect()
        } else {
            slots.iter().map(|&slot| self.slot_score(board, slot, depth, cache, nodes)).collect()
        };
        let sum = slot_scores.iter().fold(0.0, |acc, s| acc + s);
        let score = sum / slots.len() as f64;
        if self.cfg.cache_enabled {
            cache.insert((board.clone(), depth), score);
        }
        score
    }

    fn slot_score(
        &self,
        board: &Board,
        slot: Coordinate,
        depth: u32,
        cache: &TranspositionTable,
        nodes: &AtomicU64,
    ) -> f64 {
        SPAWN_OUTCOMES.iter().fold(0.0, |acc, &(value, prob)| {
            let child = with_spawn(board, slot, value);
            acc + prob * self.expectimax(&child, Node::Max, depth - 1, cache, nodes)
        })
    }
}

impl Default for ExpectimaxParallel {
    fn default() -> Self { Self::new() }
}

impl MoveRecommender for ExpectimaxParallel {
    fn recommend_next_move(&mut self, board: &Board) -> Option<Direction> {
        ExpectimaxParallel::recommend_next_move(self, board)
    }
}
