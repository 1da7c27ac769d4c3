//! Observers of a running game.

use std::fmt;
use std::io::Write;

use serde::Serialize;

use crate::engine::{fmt_grid, Board};
use crate::error::Result;

/// Terminal status, reported once per game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Won,
    Lost,
}

/// Plain-data view of a game for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    pub size: usize,
    /// Row-major cells, `None` for empty.
    pub cells: Vec<Vec<Option<u64>>>,
    pub score: u64,
    pub moves: u64,
}

impl BoardSnapshot {
    pub fn capture(board: &Board, score: u64, moves: u64) -> Self {
        let cells = board
            .to_rows()
            .into_iter()
            .map(|row| row.into_iter().map(|v| (v != 0).then_some(v)).collect())
            .collect();
        BoardSnapshot { size: board.size(), cells, score, moves }
    }

    /// Highest value on the snapshot, `0` when empty.
    pub fn max_value(&self) -> u64 { self.cells.iter().flatten().flatten().copied().max().unwrap_or(0) }
}

impl fmt::Display for BoardSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "score: {}  moves: {}", self.score, self.moves)?;
        let rows: Vec<Vec<u64>> =
            self.cells.iter().map(|row| row.iter().map(|v| v.unwrap_or(0)).collect()).collect();
        fmt_grid(f, &rows)
    }
}

/// Receives board snapshots and the final outcome of a game.
pub trait Renderer {
    fn render(&mut self, snapshot: &BoardSnapshot) -> Result<()>;

    fn finish(&mut self, outcome: Outcome, snapshot: &BoardSnapshot) -> Result<()>;
}

/// Prints the padded grid to a writer.
#[derive(Debug)]
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self { TextRenderer { out } }

    pub fn into_inner(self) -> W { self.out }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, snapshot: &BoardSnapshot) -> Result<()> {
        write!(self.out, "{snapshot}")?;
        Ok(())
    }

    fn finish(&mut self, outcome: Outcome, snapshot: &BoardSnapshot) -> Result<()> {
        let verdict = match outcome {
            Outcome::Won => "You win!",
            Outcome::Lost => "Game over.",
        };
        writeln!(self.out, "{verdict} score: {} max tile: {}", snapshot.score, snapshot.max_value())?;
        self.out.flush()?;
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum JsonEvent<'a> {
    Snapshot {
        #[serde(flatten)]
        snapshot: &'a BoardSnapshot,
    },
    Finished {
        outcome: Outcome,
        #[serde(flatten)]
        snapshot: &'a BoardSnapshot,
    },
}

/// Writes one JSON object per event, newline separated.
#[derive(Debug)]
pub struct JsonLinesRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesRenderer<W> {
    pub fn new(out: W) -> Self { JsonLinesRenderer { out } }

    pub fn into_inner(self) -> W { self.out }

    fn emit(&mut self, event: &JsonEvent<'_>) -> Result<()> {
        serde_json::to_writer(&mut self.out, event)?;
        writeln!(self.out)?;
        Ok(())
    }
}

impl<W: Write> Renderer for JsonLinesRenderer<W> {
    fn render(&mut self, snapshot: &BoardSnapshot) -> Result<()> { self.emit(&JsonEvent::Snapshot { snapshot }) }

    fn finish(&mut self, outcome: Outcome, snapshot: &BoardSnapshot) -> Result<()> {
        self.emit(&JsonEvent::Finished { outcome, snapshot })?;
        self.out.flush()?;
        Ok(())
    }
}
