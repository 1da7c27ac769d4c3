//! Board, pieces and the shift/merge engine.
//!
//! ```
//! use slide_2048::engine::{Board, Coordinate, Direction, PieceFactory, RngSource};
//!
//! let mut rng = RngSource::seeded(42);
//! let factory = PieceFactory::default();
//! let mut board = Board::new(4).unwrap();
//! for coord in board.random_empty_coordinates(2, &mut rng).unwrap() {
//!     let piece = factory.create(None, &mut rng).unwrap();
//!     board.place(piece, coord).unwrap();
//! }
//! assert_eq!(board.count_empty(), 14);
//! let _moved = board.shift(Direction::Left);
//! assert!(board.is_valid_coordinate(Coordinate::new(3, 3)));
//! ```

mod coord;
mod piece;
mod rng;
mod state;

pub use coord::{Coordinate, Direction};
pub use piece::{Piece, PieceFactory, DEFAULT_FOUR_PROBABILITY};
pub use rng::{RandomSource, RngSource, SequenceSource};
pub use state::{Board, ShiftOutcome};
pub(crate) use state::fmt_grid;
