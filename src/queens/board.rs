#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The mutable N×N occupancy grid the search works on.
//!
//! A `Board` is owned by exactly one search at a time. Queens are placed one
//! per row, top to bottom, and removed again in reverse order when the search
//! backtracks. `place` and `unplace` never validate anything: checking that a
//! square is safe is the caller's job (see [`Board::is_safe`] and the
//! strategies in [`crate::queens::safety`]).

use crate::queens::error::QueensError;
use bit_vec::BitVec;
use std::fmt::Display;

/// The side length of a board, guaranteed to lie in `1..=BoardSize::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BoardSize(usize);

impl BoardSize {
    /// The largest accepted side length. `MAX * MAX` cells fit in a `usize`
    /// even on 32-bit targets.
    pub const MAX: usize = 65_535;

    /// Creates a size, rejecting zero and anything above [`BoardSize::MAX`].
    ///
    /// # Errors
    ///
    /// Returns [`QueensError::InvalidInput`] if `n` is zero and
    /// [`QueensError::TooLarge`] if `n` exceeds [`BoardSize::MAX`].
    pub fn new(n: usize) -> Result<Self, QueensError> {
        if n == 0 {
            return Err(QueensError::InvalidInput { n: 0 });
        }
        if n > Self::MAX {
            return Err(QueensError::TooLarge {
                n: u64::try_from(n).unwrap_or(u64::MAX),
                max: Self::MAX,
            });
        }
        Ok(Self(n))
    }

    /// The side length as a plain `usize`.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl TryFrom<i64> for BoardSize {
    type Error = QueensError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        let Ok(wide) = u64::try_from(value) else {
            return Err(QueensError::InvalidInput { n: value });
        };
        match usize::try_from(wide) {
            Ok(0) => Err(QueensError::InvalidInput { n: value }),
            Ok(n) if n <= Self::MAX => Ok(Self(n)),
            _ => Err(QueensError::TooLarge {
                n: wide,
                max: Self::MAX,
            }),
        }
    }
}

impl From<BoardSize> for usize {
    fn from(size: BoardSize) -> Self {
        size.0
    }
}

impl Display for BoardSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Row-major queen occupancy for an N×N board.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: BoardSize,
    cells: BitVec,
}

impl Board {
    /// An empty board of the given size.
    #[must_use]
    pub fn new(size: BoardSize) -> Self {
        let n = size.get();
        Self {
            size,
            cells: BitVec::from_elem(n * n, false),
        }
    }

    /// The side length as a validated [`BoardSize`].
    #[must_use]
    pub const fn size(&self) -> BoardSize {
        self.size
    }

    /// The side length as a plain `usize`.
    #[must_use]
    pub const fn n(&self) -> usize {
        self.size.get()
    }

    const fn idx(&self, row: usize, col: usize) -> usize {
        row * self.size.get() + col
    }

    /// Whether a queen stands on `(row, col)`.
    #[must_use]
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        self.cells.get(self.idx(row, col)).unwrap_or(false)
    }

    /// Checks whether a queen at `(row, col)` would be attacked by any queen
    /// already placed in rows `0..row`.
    ///
    /// Only the column above and the two upward diagonals are scanned, so the
    /// cost is O(N). Rows at or below `row` are assumed empty.
    #[must_use]
    pub fn is_safe(&self, row: usize, col: usize) -> bool {
        let n = self.n();

        if (0..row).any(|i| self.is_occupied(i, col)) {
            return false;
        }

        let upper_left = (1..=row.min(col)).any(|k| self.is_occupied(row - k, col - k));
        if upper_left {
            return false;
        }

        let upper_right = (1..=row.min(n - 1 - col)).any(|k| self.is_occupied(row - k, col + k));
        !upper_right
    }

    /// Puts a queen on `(row, col)` without any validation.
    pub fn place(&mut self, row: usize, col: usize) {
        let idx = self.idx(row, col);
        self.cells.set(idx, true);
    }

    /// Removes the queen from `(row, col)`.
    pub fn unplace(&mut self, row: usize, col: usize) {
        let idx = self.idx(row, col);
        self.cells.set(idx, false);
    }

    /// Number of queens currently on the board.
    #[must_use]
    pub fn queen_count(&self) -> usize {
        self.cells.iter().filter(|&b| b).count()
    }

    /// Iterates over the occupancy of every row, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = Vec<bool>> + '_ {
        (0..self.n()).map(move |row| (0..self.n()).map(|col| self.is_occupied(row, col)).collect())
    }
}
