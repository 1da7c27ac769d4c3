//! Game configuration.
//!
//! Every field has a default, so a JSON file only needs the keys it changes:
//!
//! ```
//! use slide_2048::config::GameConfig;
//! let cfg = GameConfig::from_json_str(r#"{ "size": 5, "search": { "depth": 3 } }"#).unwrap();
//! assert_eq!(cfg.size, 5);
//! assert_eq!(cfg.target_value, 2048);
//! assert_eq!(cfg.search.depth, 3);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::{PieceFactory, DEFAULT_FOUR_PROBABILITY};
use crate::error::{EngineError, Result};
use crate::expectimax::ExpectimaxConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Grid dimension.
    pub size: usize,
    /// Reaching a piece of this value wins the game.
    pub target_value: u64,
    /// Random pieces placed before the first move.
    pub initial_pieces: usize,
    /// Random pieces placed after every successful shift.
    pub spawns_per_move: usize,
    /// Probability that a random piece is a 4.
    pub four_probability: f64,
    /// Agent settings. Its `target_value` is overridden by the game's.
    pub search: ExpectimaxConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: 4,
            target_value: 2048,
            initial_pieces: 2,
            spawns_per_move: 1,
            four_probability: DEFAULT_FOUR_PROBABILITY,
            search: ExpectimaxConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(EngineError::InvalidConfig("size must be at least 1".into()));
        }
        if self.target_value < 4 || !self.target_value.is_power_of_two() {
            return Err(EngineError::InvalidConfig(format!(
                "target value {} is not a power of two >= 4",
                self.target_value
            )));
        }
        self.piece_factory()?;
        self.agent_config().validate()
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: GameConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn piece_factory(&self) -> Result<PieceFactory> { PieceFactory::with_four_probability(self.four_probability) }

    /// Search settings aligned with this game's target.
    pub fn agent_config(&self) -> ExpectimaxConfig {
        ExpectimaxConfig { target_value: self.target_value, ..self.search.clone() }
    }
}
