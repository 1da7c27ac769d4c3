//! Reference controller: seeding, turn sequencing, scoring and win/loss.

use serde::Serialize;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::engine::{Board, Coordinate, Direction, PieceFactory, RandomSource};
use crate::error::Result;
use crate::expectimax::MoveRecommender;
use crate::render::{BoardSnapshot, Outcome, Renderer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub fn outcome(self) -> Option<Outcome> {
        match self {
            GameStatus::InProgress => None,
            GameStatus::Won => Some(Outcome::Won),
            GameStatus::Lost => Some(Outcome::Lost),
        }
    }

    #[inline]
    pub fn is_over(self) -> bool { self != GameStatus::InProgress }
}

/// What a single [`Game::step`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub moved: bool,
    /// Score gained from merges.
    pub points: u64,
    /// Cells that received a new piece.
    pub spawned: Vec<Coordinate>,
    pub status: GameStatus,
}

/// A game session owning the live board.
///
/// Agents only ever see `&Board` through [`Game::board`] and search on
/// their own clones.
pub struct Game<R: RandomSource> {
    config: GameConfig,
    board: Board,
    factory: PieceFactory,
    rng: R,
    score: u64,
    moves: u64,
    status: GameStatus,
    renderers: Vec<Box<dyn Renderer>>,
    reported: bool,
}

impl<R: RandomSource> Game<R> {
    /// Start a game: validate `config` and spawn the initial pieces.
    pub fn new(config: GameConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let board = Board::new(config.size)?;
        let factory = config.piece_factory()?;
        let mut game = Game {
            config,
            board,
            factory,
            rng,
            score: 0,
            moves: 0,
            status: GameStatus::InProgress,
            renderers: Vec::new(),
            reported: false,
        };
        game.spawn_pieces(game.config.initial_pieces)?;
        game.refresh_status();
        Ok(game)
    }

    /// Attach an observer. It immediately receives the current snapshot.
    pub fn add_renderer(&mut self, renderer: Box<dyn Renderer>) -> Result<()> {
        self.renderers.push(renderer);
        if let Some(r) = self.renderers.last_mut() {
            r.render(&BoardSnapshot::capture(&self.board, self.score, self.moves))?;
        }
        self.report_outcome()
    }

    #[inline]
    pub fn board(&self) -> &Board { &self.board }

    #[inline]
    pub fn config(&self) -> &GameConfig { &self.config }

    #[inline]
    pub fn score(&self) -> u64 { self.score }

    #[inline]
    pub fn moves(&self) -> u64 { self.moves }

    #[inline]
    pub fn status(&self) -> GameStatus { self.status }

    pub fn snapshot(&self) -> BoardSnapshot { BoardSnapshot::capture(&self.board, self.score, self.moves) }

    /// Shift the live board and, if anything moved, spawn new pieces.
    ///
    /// A finished game ignores further steps.
    pub fn step(&mut self, direction: Direction) -> Result<StepOutcome> {
        if self.status.is_over() {
            return Ok(StepOutcome { moved: false, points: 0, spawned: Vec::new(), status: self.status });
        }
        let shifted = self.board.slide(direction);
        if !shifted.moved {
            return Ok(StepOutcome { moved: false, points: 0, spawned: Vec::new(), status: self.status });
        }
        self.score += shifted.points;
        self.moves += 1;
        let spawned = self.spawn_pieces(self.config.spawns_per_move)?;
        self.refresh_status();
        debug!(%direction, points = shifted.points, merges = shifted.merges, spawned = spawned.len(), "step");
        if let Some(outcome) = self.status.outcome() {
            info!(?outcome, score = self.score, moves = self.moves, max_tile = self.board.max_value(), "game finished");
        }
        self.notify()?;
        Ok(StepOutcome { moved: true, points: shifted.points, spawned, status: self.status })
    }

    /// Let `agent` play until the game ends, it has no move, or `max_moves` is hit.
    pub fn autoplay(&mut self, agent: &mut dyn MoveRecommender, max_moves: Option<u64>) -> Result<GameStatus> {
        while !self.status.is_over() && max_moves.map_or(true, |limit| self.moves < limit) {
            let Some(direction) = agent.recommend_next_move(&self.board) else {
                break;
            };
            self.step(direction)?;
        }
        Ok(self.status)
    }

    fn spawn_pieces(&mut self, count: usize) -> Result<Vec<Coordinate>> {
        let slots = self.board.random_empty_coordinates(count, &mut self.rng)?;
        for &slot in &slots {
            let piece = self.factory.create(None, &mut self.rng)?;
            self.board.place(piece, slot)?;
        }
        Ok(slots)
    }

    fn refresh_status(&mut self) {
        self.status = if self.board.max_value() >= self.config.target_value {
            GameStatus::Won
        } else if !self.board.has_valid_moves() {
            GameStatus::Lost
        } else {
            GameStatus::InProgress
        };
    }

    fn notify(&mut self) -> Result<()> {
        let snapshot = self.snapshot();
        for r in &mut self.renderers {
            r.render(&snapshot)?;
        }
        self.report_outcome()
    }

    fn report_outcome(&mut self) -> Result<()> {
        let Some(outcome) = self.status.outcome() else {
            return Ok(());
        };
        if self.reported || self.renderers.is_empty() {
            return Ok(());
        }
        self.reported = true;
        let snapshot = self.snapshot();
        for r in &mut self.renderers {
            r.finish(outcome, &snapshot)?;
        }
        Ok(())
    }
}
