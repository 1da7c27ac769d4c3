use std::io;

use thiserror::Error;

/// Errors raised by the engine, the agents and config loading.
///
/// Every variant except `Io`/`Json` is a caller contract violation.
/// Degenerate game states (a full board, no legal move) are never errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("coordinate ({row}, {col}) is outside a {size}x{size} board")]
    OutOfBounds { row: usize, col: usize, size: usize },
    #[error("board size must be at least 1, got {0}")]
    InvalidSize(usize),
    #[error("inverted random range: min {min} > max {max}")]
    InvalidRange { min: usize, max: usize },
    #[error("piece value {0} is not a power of two >= 2")]
    InvalidPieceValue(u64),
    #[error("cell ({row}, {col}) is already occupied")]
    Occupied { row: usize, col: usize },
    #[error("rows do not form a square grid")]
    RaggedGrid,
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
