#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Immutable solution snapshots and their text rendering.

use crate::queens::board::{Board, BoardSize};
use itertools::Itertools;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use std::fmt::Display;
use std::ops::Index;

/// Column storage for one solution. Boards up to 16 wide stay inline.
pub type Columns = SmallVec<[usize; 16]>;

/// One complete placement: `columns[row]` is the column of the queen in `row`.
///
/// A solution is a deep copy taken when the search fills the last row; it is
/// unaffected by anything the search does to its board afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Solution {
    columns: Columns,
}

impl Solution {
    /// Wraps per-row columns without checking them; see [`Solution::verify`].
    #[must_use]
    pub const fn new(columns: Columns) -> Self {
        Self { columns }
    }

    /// Snapshots a board holding exactly one queen in every row.
    ///
    /// Returns `None` if some row is empty or holds more than one queen.
    #[must_use]
    pub fn from_board(board: &Board) -> Option<Self> {
        let n = board.n();
        let mut columns = Columns::with_capacity(n);
        for row in 0..n {
            let (col,) = (0..n)
                .filter(|&c| board.is_occupied(row, c))
                .collect_tuple()?;
            columns.push(col);
        }
        Some(Self { columns })
    }

    /// Side length of the board this solution belongs to.
    #[must_use]
    pub fn n(&self) -> usize {
        self.columns.len()
    }

    /// The queen's column for each row, top to bottom.
    #[must_use]
    pub fn columns(&self) -> &[usize] {
        &self.columns
    }

    /// `(row, col)` of every queen, in row order.
    pub fn positions(&self) -> impl Iterator<Item = (usize, usize)> + Clone + '_ {
        self.columns.iter().copied().enumerate()
    }

    /// Whether this solution puts a queen on `(row, col)`.
    #[must_use]
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        self.columns.get(row) == Some(&col)
    }

    /// Rebuilds a full board from this solution.
    ///
    /// Returns `None` for the empty solution, which has no board.
    #[must_use]
    pub fn to_board(&self) -> Option<Board> {
        let size = BoardSize::new(self.n()).ok()?;
        let mut board = Board::new(size);
        for (row, col) in self.positions() {
            board.place(row, col);
        }
        Some(board)
    }

    /// Checks that no two queens share a column or a diagonal and every
    /// column index is on the board.
    #[must_use]
    pub fn verify(&self) -> bool {
        let n = self.n();
        self.columns.iter().all(|&c| c < n)
            && self
                .positions()
                .tuple_combinations()
                .all(|((r1, c1), (r2, c2))| c1 != c2 && c1.abs_diff(c2) != r1.abs_diff(r2))
    }
}

/// Renders a solution as N lines of N space-separated tokens, `Q` for a queen
/// and `.` for an empty square. Every line ends with a newline.
#[must_use]
pub fn render(solution: &Solution) -> String {
    let n = solution.n();
    let mut out = String::with_capacity(n * 2 * n);
    for &queen in &solution.columns {
        let line = (0..n).map(|col| if col == queen { 'Q' } else { '.' }).join(" ");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

impl Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", render(self))
    }
}

/// All solutions of one search, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SolutionSet(Vec<Solution>);

impl SolutionSet {
    /// Wraps solutions already in discovery order.
    #[must_use]
    pub const fn new(solutions: Vec<Solution>) -> Self {
        Self(solutions)
    }

    /// Number of solutions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the board has no solution, or the search stopped before one.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The first solution discovered.
    #[must_use]
    pub fn first(&self) -> Option<&Solution> {
        self.0.first()
    }

    /// The solution at `index` in discovery order.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Solution> {
        self.0.get(index)
    }

    /// Iterates in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &Solution> {
        self.0.iter()
    }

    /// Whether any placement appears more than once.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        let mut seen = FxHashSet::default();
        !self.0.iter().all(|s| seen.insert(s))
    }

    /// Whether every solution passes [`Solution::verify`].
    #[must_use]
    pub fn verify(&self) -> bool {
        self.0.iter().all(Solution::verify)
    }
}

impl Index<usize> for SolutionSet {
    type Output = Solution;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl From<Vec<Solution>> for SolutionSet {
    fn from(solutions: Vec<Solution>) -> Self {
        Self::new(solutions)
    }
}

impl From<SolutionSet> for Vec<Solution> {
    fn from(set: SolutionSet) -> Self {
        set.0
    }
}

impl FromIterator<Solution> for SolutionSet {
    fn from_iter<T: IntoIterator<Item = Solution>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for SolutionSet {
    type Item = Solution;
    type IntoIter = std::vec::IntoIter<Solution>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a SolutionSet {
    type Item = &'a Solution;
    type IntoIter = std::slice::Iter<'a, Solution>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
