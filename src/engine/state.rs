use std::fmt;

use super::coord::{Coordinate, Direction};
use super::piece::Piece;
use super::rng::RandomSource;
use crate::error::{EngineError, Result};

/// Result of a scored shift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShiftOutcome {
    /// Whether any piece moved or merged.
    pub moved: bool,
    /// Number of merges performed.
    pub merges: u32,
    /// Sum of the values created by merges.
    pub points: u64,
}

/// Square grid of optional pieces, stored row-major.
///
/// `Clone` is a deep copy: pieces are cloned along with the grid, so merges
/// on a clone never reach the original.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<Option<Piece>>,
}

impl Board {
    /// An empty `size`x`size` board.
    pub fn new(size: usize) -> Result<Board> {
        if size == 0 {
            return Err(EngineError::InvalidSize(size));
        }
        Ok(Board { size, cells: vec![None; size * size] })
    }

    /// Build a board from row-major values, `0` meaning empty.
    ///
    /// ```
    /// use slide_2048::engine::{Board, Direction};
    /// let mut b = Board::from_rows(vec![
    ///     vec![2, 2, 0, 0],
    ///     vec![0, 0, 0, 0],
    ///     vec![0, 0, 0, 0],
    ///     vec![0, 0, 0, 0],
    /// ]).unwrap();
    /// assert!(b.shift(Direction::Left));
    /// assert_eq!(b.to_rows()[0], vec![4, 0, 0, 0]);
    /// ```
    pub fn from_rows(rows: Vec<Vec<u64>>) -> Result<Board> {
        let size = rows.len();
        let mut board = Board::new(size)?;
        if rows.iter().any(|row| row.len() != size) {
            return Err(EngineError::RaggedGrid);
        }
        for (r, row) in rows.into_iter().enumerate() {
            for (c, value) in row.into_iter().enumerate() {
                if value != 0 {
                    board.cells[r * size + c] = Some(Piece::new(value)?);
                }
            }
        }
        Ok(board)
    }

    /// Row-major values, `0` for empty cells.
    pub fn to_rows(&self) -> Vec<Vec<u64>> {
        self.cells
            .chunks(self.size)
            .map(|row| row.iter().map(|cell| cell.as_ref().map_or(0, Piece::value)).collect())
            .collect()
    }

    #[inline]
    pub fn size(&self) -> usize { self.size }

    #[inline]
    pub fn is_valid_coordinate(&self, coord: Coordinate) -> bool {
        coord.row < self.size && coord.col < self.size
    }

    /// The piece at `coord`, if any.
    pub fn piece_at(&self, coord: Coordinate) -> Result<Option<&Piece>> {
        let idx = self.checked_index(coord)?;
        Ok(self.cells[idx].as_ref())
    }

    /// All empty cells in row-major order.
    pub fn empty_coordinates(&self) -> Vec<Coordinate> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(idx, _)| self.coord_of(idx))
            .collect()
    }

    #[inline]
    pub fn count_empty(&self) -> usize { self.cells.iter().filter(|cell| cell.is_none()).count() }

    /// Occupied cells with their pieces, row-major.
    pub fn occupied(&self) -> impl Iterator<Item = (Coordinate, &Piece)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(idx, cell)| cell.as_ref().map(|p| (self.coord_of(idx), p)))
    }

    /// Sample `min(count, empty)` distinct empty cells without replacement.
    ///
    /// Each draw picks uniformly from the remaining candidates, which are kept
    /// in row-major order so a scripted source is reproducible.
    pub fn random_empty_coordinates<R: RandomSource + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<Coordinate>> {
        let mut candidates = self.empty_coordinates();
        let take = count.min(candidates.len());
        let mut picked = Vec::with_capacity(take);
        for _ in 0..take {
            let i = rng.uniform_int(0, candidates.len() - 1)?;
            picked.push(candidates.remove(i));
        }
        Ok(picked)
    }

    /// Put `piece` into an empty cell.
    pub fn place(&mut self, piece: Piece, coord: Coordinate) -> Result<()> {
        let idx = self.checked_index(coord)?;
        if self.cells[idx].is_some() {
            return Err(EngineError::Occupied { row: coord.row, col: coord.col });
        }
        self.cells[idx] = Some(piece);
        Ok(())
    }

    /// Drop a piece onto a cell known to be empty and in bounds.
    #[inline]
    pub(crate) fn spawn(&mut self, coord: Coordinate, piece: Piece) {
        let idx = self.index(coord);
        debug_assert!(self.cells[idx].is_none());
        self.cells[idx] = Some(piece);
    }

    /// Clear a cell, handing back whatever was there.
    pub fn remove(&mut self, coord: Coordinate) -> Result<Option<Piece>> {
        let idx = self.checked_index(coord)?;
        Ok(self.cells[idx].take())
    }

    /// Read `from`, clear it, write the piece to `to`.
    ///
    /// Returns `Ok(false)` when `from` is empty. Moving onto another piece is
    /// refused with `Occupied`; the source is left untouched in that case.
    pub fn move_piece(&mut self, from: Coordinate, to: Coordinate) -> Result<bool> {
        let src = self.checked_index(from)?;
        let dst = self.checked_index(to)?;
        if self.cells[src].is_none() {
            return Ok(false);
        }
        if src == dst {
            return Ok(true);
        }
        if self.cells[dst].is_some() {
            return Err(EngineError::Occupied { row: to.row, col: to.col });
        }
        self.cells[dst] = self.cells[src].take();
        Ok(true)
    }

    /// The highest-valued piece, first found in row-major order on ties.
    pub fn max_value_piece(&self) -> Option<&Piece> {
        self.cells.iter().flatten().fold(None, |best: Option<&Piece>, p| match best {
            Some(b) if b.value() >= p.value() => Some(b),
            _ => Some(p),
        })
    }

    /// Value of [`Board::max_value_piece`], `0` on an empty board.
    #[inline]
    pub fn max_value(&self) -> u64 { self.max_value_piece().map_or(0, Piece::value) }

    /// True if any cell is empty or two axis-adjacent pieces are equal and mergeable.
    pub fn has_valid_moves(&self) -> bool {
        let n = self.size;
        for r in 0..n {
            for c in 0..n {
                let v = self.value_at(r, c);
                if v == 0 {
                    return true;
                }
                if v == Piece::MAX_VALUE {
                    continue;
                }
                if c + 1 < n && self.value_at(r, c + 1) == v {
                    return true;
                }
                if r + 1 < n && self.value_at(r + 1, c) == v {
                    return true;
                }
            }
        }
        false
    }

    /// Slide/merge every piece toward `dir`. Returns whether anything changed.
    #[inline]
    pub fn shift(&mut self, dir: Direction) -> bool { self.slide(dir).moved }

    /// [`Board::shift`] with merge bookkeeping.
    ///
    /// Sources are visited in `dir.access_order`, nearest the target edge
    /// first. A piece walks toward the edge until it leaves the board or hits
    /// another piece; an equal piece absorbs it, anything else stops it in the
    /// last empty cell. A piece produced by a merge is marked and will not
    /// absorb again during the same call, so a second shift in the same
    /// direction can still join it with an equal neighbour. Pieces at
    /// [`Piece::MAX_VALUE`] never merge.
    pub fn slide(&mut self, dir: Direction) -> ShiftOutcome {
        let mut outcome = ShiftOutcome::default();
        let mut merged = vec![false; self.cells.len()];
        for source in dir.access_order(self.size) {
            let src = self.index(source);
            let value = match &self.cells[src] {
                Some(p) => p.value(),
                None => continue,
            };
            let Some((dst, merge)) = self.destination(source, dir, value, &merged) else {
                continue;
            };
            let piece = self.cells[src].take();
            if merge {
                if let Some(target) = self.cells[dst].as_mut() {
                    target.upgrade();
                    outcome.points += target.value();
                }
                merged[dst] = true;
                outcome.merges += 1;
            } else {
                self.cells[dst] = piece;
            }
            outcome.moved = true;
        }
        outcome
    }

    fn destination(&self, source: Coordinate, dir: Direction, value: u64, merged: &[bool]) -> Option<(usize, bool)> {
        let mut found = None;
        let mut cursor = source;
        while let Some(next) = cursor.step(dir).filter(|c| self.is_valid_coordinate(*c)) {
            let at = self.index(next);
            match &self.cells[at] {
                None => found = Some((at, false)),
                Some(p) => {
                    if p.value() == value && value < Piece::MAX_VALUE && !merged[at] {
                        found = Some((at, true));
                    }
                    break;
                }
            }
            cursor = next;
        }
        found
    }

    /// Value at `(row, col)`, `0` when empty. Callers guarantee bounds.
    #[inline]
    pub(crate) fn value_at(&self, row: usize, col: usize) -> u64 {
        self.cells[row * self.size + col].as_ref().map_or(0, Piece::value)
    }

    #[inline]
    fn index(&self, coord: Coordinate) -> usize { coord.row * self.size + coord.col }

    #[inline]
    fn coord_of(&self, idx: usize) -> Coordinate { Coordinate::new(idx / self.size, idx % self.size) }

    fn checked_index(&self, coord: Coordinate) -> Result<usize> {
        if !self.is_valid_coordinate(coord) {
            return Err(EngineError::OutOfBounds { row: coord.row, col: coord.col, size: self.size });
        }
        Ok(self.index(coord))
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board").field("size", &self.size).field("rows", &self.to_rows()).finish()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { fmt_grid(f, &self.to_rows()) }
}

/// Padded grid printer shared by `Board` and render snapshots. `0` prints blank.
pub(crate) fn fmt_grid(f: &mut fmt::Formatter<'_>, rows: &[Vec<u64>]) -> fmt::Result {
    let divider = "-".repeat(rows.len() * 8);
    writeln!(f)?;
    for (r, row) in rows.iter().enumerate() {
        if r > 0 {
            writeln!(f, "{divider}")?;
        }
        let cells: Vec<String> = row.iter().map(|&v| format_val(v)).collect();
        writeln!(f, "{}", cells.join("|"))?;
    }
    Ok(())
}

fn format_val(val: u64) -> String {
    match val {
        0 => " ".repeat(7),
        v => format!("{:^7}", v),
    }
}
