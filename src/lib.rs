//! slide-2048: a sliding-tile merge puzzle engine + Expectimax move recommender
//!
//! This crate provides:
//! - A square `Board` of any size with the shift/merge engine, occupancy
//!   queries and deep cloning (`engine` module)
//! - Injected randomness (`RandomSource`) and a 2/4 `PieceFactory`
//! - An Expectimax agent (`expectimax` module) with single-threaded and
//!   parallel variants
//! - A reference `Game` controller with renderers and JSON configuration
//!
//! Quick start:
//! ```
//! use slide_2048::engine::{Board, Direction, PieceFactory, RngSource};
//!
//! // Deterministic board initialization with a seeded source
//! let mut rng = RngSource::seeded(42);
//! let factory = PieceFactory::default();
//! let mut board = Board::new(4).unwrap();
//! for slot in board.random_empty_coordinates(2, &mut rng).unwrap() {
//!     board.place(factory.create(None, &mut rng).unwrap(), slot).unwrap();
//! }
//! assert_eq!(board.count_empty(), 14);
//! let _moved = board.shift(Direction::Left);
//! assert!(board.count_empty() >= 14);
//! ```
//!
//! Full loop (simplest possible)
//! ```
//! use slide_2048::config::GameConfig;
//! use slide_2048::engine::RngSource;
//! use slide_2048::expectimax::Expectimax;
//! use slide_2048::game::Game;
//!
//! // 1) Small search so the doctest stays fast
//! let mut cfg = GameConfig::default();
//! cfg.search.depth = 2;
//! let mut policy = Expectimax::with_config(cfg.agent_config());
//!
//! // 2) Seeded game with two random pieces
//! let mut game = Game::new(cfg, RngSource::seeded(123)).unwrap();
//!
//! // 3) A handful of agent-driven moves
//! game.autoplay(&mut policy, Some(4)).unwrap();
//!
//! // 4) Inspect final state
//! assert_eq!(game.moves(), 4);
//! assert!(game.board().max_value() >= 2);
//! ```
//!
pub mod config;
pub mod engine;
pub mod error;
pub mod expectimax;
pub mod game;
pub mod render;

pub use error::{EngineError, Result};
