use std::fmt;

use serde::{Deserialize, Serialize};

/// A direction to slide/merge pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions in the fixed order used for search and tie-breaking.
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Position of this direction inside [`Direction::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    /// Coordinates of a `size`x`size` grid in the order a shift must visit them.
    ///
    /// The sweep starts at the edge pieces travel toward and moves away from it,
    /// so a cell that has received its final piece is never visited again as a
    /// source later in the same pass.
    ///
    /// ```
    /// use slide_2048::engine::{Coordinate, Direction};
    /// let order: Vec<_> = Direction::Down.access_order(2).collect();
    /// assert_eq!(order[0], Coordinate::new(1, 0));
    /// assert_eq!(order[3], Coordinate::new(0, 1));
    /// ```
    pub fn access_order(self, size: usize) -> impl Iterator<Item = Coordinate> {
        (0..size).flat_map(move |outer| (0..size).map(move |inner| self.sweep(outer, inner, size)))
    }

    #[inline]
    fn sweep(self, outer: usize, inner: usize, size: usize) -> Coordinate {
        match self {
            Direction::Up => Coordinate::new(outer, inner),
            Direction::Down => Coordinate::new(size - 1 - outer, inner),
            Direction::Left => Coordinate::new(inner, outer),
            Direction::Right => Coordinate::new(inner, size - 1 - outer),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
        };
        f.write_str(name)
    }
}

/// `(row, col)` address of a cell. Row 0 is the top edge, column 0 the left edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub row: usize,
    pub col: usize,
}

impl Coordinate {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self { Coordinate { row, col } }

    /// The neighbouring coordinate one step toward `dir`.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant;
    /// the upper bound is the board's business.
    #[inline]
    pub fn step(self, dir: Direction) -> Option<Coordinate> {
        let Coordinate { row, col } = self;
        match dir {
            Direction::Up => row.checked_sub(1).map(|r| Coordinate::new(r, col)),
            Direction::Down => row.checked_add(1).map(|r| Coordinate::new(r, col)),
            Direction::Left => col.checked_sub(1).map(|c| Coordinate::new(row, c)),
            Direction::Right => col.checked_add(1).map(|c| Coordinate::new(row, c)),
        }
    }
}

impl From<(usize, usize)> for Coordinate {
    fn from((row, col): (usize, usize)) -> Self { Coordinate::new(row, col) }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
