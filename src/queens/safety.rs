#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Strategies for answering "is this square attacked?" during the search.
//!
//! The search places queens one row at a time, so a safety check only ever
//! needs to look at rows above the one being filled. Two strategies are
//! provided:
//!
//! - `ScanCheck`: walks the column and both upward diagonals on the board
//!   itself. O(N) per query, keeps no state of its own.
//! - `MaskCheck`: maintains three bitsets (columns, `row - col` diagonals and
//!   `row + col` anti-diagonals) updated on every place/unplace. O(1) per query.
//!
//! Both strategies see exactly the same sequence of `on_place`/`on_unplace`
//! calls as the board, and both must agree on every query, so the search
//! enumerates solutions in the same order whichever one is used.

use crate::queens::board::{Board, BoardSize};
use bit_vec::BitVec;
use clap::ValueEnum;
use std::fmt::{Debug, Display};

/// Trait implemented by every safety strategy.
pub trait SafetyCheck: Debug + Clone {
    /// Creates the strategy for an empty board of the given size.
    fn new(size: BoardSize) -> Self;

    /// Whether a queen at `(row, col)` is attacked by a queen in rows `0..row`.
    fn is_safe(&self, board: &Board, row: usize, col: usize) -> bool;

    /// Called right after a queen is placed on `(row, col)`.
    fn on_place(&mut self, row: usize, col: usize);

    /// Called right after the queen on `(row, col)` is removed.
    fn on_unplace(&mut self, row: usize, col: usize);
}

/// Scans the board directly. Stateless.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanCheck;

impl SafetyCheck for ScanCheck {
    fn new(_size: BoardSize) -> Self {
        Self
    }

    fn is_safe(&self, board: &Board, row: usize, col: usize) -> bool {
        board.is_safe(row, col)
    }

    fn on_place(&mut self, _row: usize, _col: usize) {}

    fn on_unplace(&mut self, _row: usize, _col: usize) {}
}

/// Tracks attacked columns and diagonals in bitsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskCheck {
    n: usize,
    columns: BitVec,
    diagonals: BitVec,
    anti_diagonals: BitVec,
}

impl MaskCheck {
    /// `row - col` shifted into `0..2n-1`.
    const fn diagonal(&self, row: usize, col: usize) -> usize {
        row + self.n - 1 - col
    }

    const fn anti_diagonal(row: usize, col: usize) -> usize {
        row + col
    }

    fn set(&mut self, row: usize, col: usize, value: bool) {
        let d = self.diagonal(row, col);
        self.columns.set(col, value);
        self.diagonals.set(d, value);
        self.anti_diagonals.set(Self::anti_diagonal(row, col), value);
    }
}

impl SafetyCheck for MaskCheck {
    fn new(size: BoardSize) -> Self {
        let n = size.get();
        Self {
            n,
            columns: BitVec::from_elem(n, false),
            diagonals: BitVec::from_elem(2 * n - 1, false),
            anti_diagonals: BitVec::from_elem(2 * n - 1, false),
        }
    }

    fn is_safe(&self, _board: &Board, row: usize, col: usize) -> bool {
        !(self.columns[col]
            || self.diagonals[self.diagonal(row, col)]
            || self.anti_diagonals[Self::anti_diagonal(row, col)])
    }

    fn on_place(&mut self, row: usize, col: usize) {
        self.set(row, col, true);
    }

    fn on_unplace(&mut self, row: usize, col: usize) {
        self.set(row, col, false);
    }
}

/// Runtime-selected safety strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SafetyCheckImpls {
    /// See [`ScanCheck`].
    Scan(ScanCheck),
    /// See [`MaskCheck`].
    Mask(MaskCheck),
}

impl SafetyCheck for SafetyCheckImpls {
    /// Defaults to the scanning strategy; use [`SafetyCheckType::to_impl`] to
    /// pick one explicitly.
    fn new(size: BoardSize) -> Self {
        Self::Scan(ScanCheck::new(size))
    }

    fn is_safe(&self, board: &Board, row: usize, col: usize) -> bool {
        match self {
            Self::Scan(c) => c.is_safe(board, row, col),
            Self::Mask(c) => c.is_safe(board, row, col),
        }
    }

    fn on_place(&mut self, row: usize, col: usize) {
        match self {
            Self::Scan(c) => c.on_place(row, col),
            Self::Mask(c) => c.on_place(row, col),
        }
    }

    fn on_unplace(&mut self, row: usize, col: usize) {
        match self {
            Self::Scan(c) => c.on_unplace(row, col),
            Self::Mask(c) => c.on_unplace(row, col),
        }
    }
}

/// Safety strategy names accepted on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Hash, Default, ValueEnum)]
pub enum SafetyCheckType {
    /// Scan the column and diagonals on the board.
    #[default]
    Scan,
    /// Keep column and diagonal bitsets.
    Mask,
}

impl Display for SafetyCheckType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scan => write!(f, "scan"),
            Self::Mask => write!(f, "mask"),
        }
    }
}

impl SafetyCheckType {
    /// Converts the `SafetyCheckType` to a concrete `SafetyCheckImpls`.
    #[must_use]
    pub fn to_impl(self, size: BoardSize) -> SafetyCheckImpls {
        match self {
            Self::Scan => SafetyCheckImpls::Scan(ScanCheck::new(size)),
            Self::Mask => SafetyCheckImpls::Mask(MaskCheck::new(size)),
        }
    }
}
