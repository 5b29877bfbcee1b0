#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The backtracking search that enumerates every N-Queens solution.
//!
//! The search places one queen per row, top to bottom, trying columns left to
//! right. When the last row is filled the current placement is copied out as a
//! [`Solution`] and the search carries on backtracking: the goal is every
//! solution, not the first one.
//!
//! Instead of recursing, [`Search`] keeps an explicit stack of frames, one per
//! filled row, holding the column the row's queen sits in, plus the next
//! column to try for every row. This makes it a plain [`Iterator`]: each call
//! to `next` resumes exactly where the previous one yielded, so solutions can
//! be consumed lazily, counted without being stored, or collected into a
//! [`SolutionSet`]. The enumeration order is the same as the classic
//! recursive formulation, i.e. lexicographic in the per-row columns.
//!
//! A single [`Board`] is mutated in place. Every `place` is matched by exactly
//! one `unplace` once its subtree has been exhausted, so a completed search
//! leaves the board empty again and no queen from an abandoned branch leaks
//! into a sibling branch.
//!
//! Memory is O(N) for the live search plus O(S·N) for S collected solutions.
//! Solution counts explode with N (see [`crate::queens::limits`]); use
//! [`count`] or the iterator directly rather than [`solve`] for large boards.

use crate::queens::board::{Board, BoardSize};
use crate::queens::error::QueensError;
use crate::queens::limits::{Outcome, SearchLimits};
use crate::queens::safety::{MaskCheck, SafetyCheck, SafetyCheckImpls, SafetyCheckType, ScanCheck};
use crate::queens::solution::{Columns, Solution, SolutionSet};
use crate::queens::stats::SearchStats;
use std::iter::FusedIterator;
use std::time::{Duration, Instant};

/// A resumable depth-first enumeration of all solutions for one board size.
#[derive(Debug, Clone)]
pub struct Search<C: SafetyCheck = ScanCheck> {
    board: Board,
    check: C,
    /// Column of the queen in each filled row; its length is the current row.
    columns: Columns,
    /// Next column to try for each row. Zero means the row has not been
    /// entered since it was last exhausted.
    next_col: Vec<usize>,
    limits: SearchLimits,
    started: Option<Instant>,
    stats: SearchStats,
    outcome: Outcome,
}

impl<C: SafetyCheck> Search<C> {
    /// An unbounded search using `C`'s default state for this board size.
    #[must_use]
    pub fn new(size: BoardSize) -> Self {
        Self::with_check(size, C::new(size), SearchLimits::default())
    }

    /// A search bounded by `limits`.
    #[must_use]
    pub fn with_limits(size: BoardSize, limits: SearchLimits) -> Self {
        Self::with_check(size, C::new(size), limits)
    }

    /// A search using an already constructed safety strategy.
    ///
    /// `check` must describe an empty board of the given size.
    #[must_use]
    pub fn with_check(size: BoardSize, check: C, limits: SearchLimits) -> Self {
        let n = size.get();
        Self {
            board: Board::new(size),
            check,
            columns: Columns::with_capacity(n),
            next_col: vec![0; n + 1],
            limits,
            started: None,
            stats: SearchStats::default(),
            outcome: Outcome::Running,
        }
    }

    /// Counters accumulated so far.
    #[must_use]
    pub const fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Why the search stopped, or [`Outcome::Running`] if it has not.
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// The live board. Empty again once the search is complete.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Time since the first call to `next`.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.map_or(Duration::ZERO, |s| s.elapsed())
    }

    fn place(&mut self, row: usize, col: usize) {
        self.board.place(row, col);
        self.check.on_place(row, col);
        self.columns.push(col);
        self.stats.placements += 1;
    }

    /// Removes the queen from the deepest filled row.
    fn backtrack(&mut self) {
        if let Some(col) = self.columns.pop() {
            let row = self.columns.len();
            self.board.unplace(row, col);
            self.check.on_unplace(row, col);
            self.stats.backtracks += 1;
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        self.outcome = outcome;
        log::debug!(
            "{}-queens search {outcome} after {} solutions, {} nodes",
            self.board.n(),
            self.stats.solutions,
            self.stats.nodes
        );
    }
}

impl<C: SafetyCheck> Iterator for Search<C> {
    type Item = Solution;

    fn next(&mut self) -> Option<Self::Item> {
        if self.outcome != Outcome::Running {
            return None;
        }
        let started = *self.started.get_or_insert_with(Instant::now);
        let n = self.board.n();

        loop {
            let row = self.columns.len();

            if row == n {
                if let Some(stop) = self.limits.before_yield(started, self.stats.solutions) {
                    self.finish(stop);
                    return None;
                }
                let solution = Solution::new(self.columns.clone());
                self.stats.solutions += 1;
                self.backtrack();
                return Some(solution);
            }

            if self.next_col[row] == 0 {
                self.stats.nodes += 1;
                if let Some(stop) = self.limits.interrupted(started) {
                    self.finish(stop);
                    return None;
                }
            }

            let mut col = self.next_col[row];
            while col < n {
                self.stats.safety_checks += 1;
                if self.check.is_safe(&self.board, row, col) {
                    break;
                }
                col += 1;
            }

            if col < n {
                self.next_col[row] = col + 1;
                self.place(row, col);
            } else {
                self.next_col[row] = 0;
                if row == 0 {
                    self.finish(Outcome::Complete);
                    return None;
                }
                self.backtrack();
            }
        }
    }
}

impl<C: SafetyCheck> FusedIterator for Search<C> {}

/// Everything a bounded, strategy-selected search produced.
#[derive(Debug, Clone)]
pub struct SearchReport {
    /// The solutions produced, in discovery order.
    pub solutions: SolutionSet,
    /// Counters for the whole run.
    pub stats: SearchStats,
    /// Why the search stopped.
    pub outcome: Outcome,
    /// Wall-clock time spent searching.
    pub elapsed: Duration,
}

/// Enumerates every solution for an `n`×`n` board, in discovery order.
///
/// The whole set is materialized before returning; for large `n` prefer
/// [`count`] or iterating a [`Search`].
///
/// # Errors
///
/// [`QueensError::InvalidInput`] if `n < 1`, and [`QueensError::TooLarge`]
/// if `n` exceeds [`BoardSize::MAX`].
pub fn solve(n: i64) -> Result<SolutionSet, QueensError> {
    let size = BoardSize::try_from(n)?;
    Ok(Search::<ScanCheck>::new(size).collect())
}

/// Runs a search with an explicit strategy and limits, collecting the
/// solutions together with statistics and the reason the search stopped.
#[must_use]
pub fn solve_with(size: BoardSize, check: SafetyCheckType, limits: SearchLimits) -> SearchReport {
    log::debug!("searching {size}-queens using {check} checks");
    let mut search = Search::<SafetyCheckImpls>::with_check(size, check.to_impl(size), limits);
    let solutions: SolutionSet = search.by_ref().collect();

    if search.outcome().is_stopped_early() {
        log::info!(
            "{size}-queens search {} with {} solutions",
            search.outcome(),
            solutions.len()
        );
    }

    SearchReport {
        solutions,
        stats: search.stats(),
        outcome: search.outcome(),
        elapsed: search.elapsed(),
    }
}

/// Counts the solutions for an `n`×`n` board without storing them.
///
/// # Errors
///
/// [`QueensError::InvalidInput`] if `n < 1`, [`QueensError::TooLarge`] if
/// `n` exceeds [`BoardSize::MAX`].
pub fn count(n: i64) -> Result<usize, QueensError> {
    let size = BoardSize::try_from(n)?;
    Ok(Search::<MaskCheck>::new(size).count())
}

/// Whether at least one solution exists, stopping at the first one found.
///
/// # Errors
///
/// [`QueensError::InvalidInput`] if `n < 1`, [`QueensError::TooLarge`] if
/// `n` exceeds [`BoardSize::MAX`].
pub fn has_solution(n: i64) -> Result<bool, QueensError> {
    let size = BoardSize::try_from(n)?;
    Ok(Search::<MaskCheck>::new(size).next().is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    fn size(n: usize) -> BoardSize {
        BoardSize::new(n).unwrap()
    }

    #[test]
    fn test_small_boundary_counts() {
        assert_eq!(solve(1).unwrap().len(), 1);
        assert_eq!(solve(2).unwrap().len(), 0);
        assert_eq!(solve(3).unwrap().len(), 0);
    }

    #[test]
    fn test_known_counts() {
        for (n, expected) in [(4, 2), (5, 10), (6, 4), (7, 40), (8, 92)] {
            assert_eq!(solve(n).unwrap().len(), expected, "n = {n}");
        }
    }

    #[test]
    fn test_invalid_sizes() {
        assert_eq!(solve(0), Err(QueensError::InvalidInput { n: 0 }));
        assert_eq!(solve(-1), Err(QueensError::InvalidInput { n: -1 }));
        assert!(count(0).is_err());
        assert!(has_solution(-3).is_err());
    }

    #[test]
    fn test_oversized_boards_rejected_without_allocating() {
        let too_large = QueensError::TooLarge {
            n: 5_000_000_000,
            max: BoardSize::MAX,
        };
        assert_eq!(solve(5_000_000_000), Err(too_large));
        assert_eq!(count(5_000_000_000), Err(too_large));
        assert_eq!(has_solution(5_000_000_000), Err(too_large));
        assert!(solve(i64::MAX).is_err());
    }

    #[test]
    fn test_four_discovery_order() {
        let solutions = solve(4).unwrap();
        assert_eq!(solutions[0].columns(), &[1, 3, 0, 2]);
        assert_eq!(solutions[1].columns(), &[2, 0, 3, 1]);
    }

    #[test]
    fn test_eight_first_solution() {
        let first = Search::<ScanCheck>::new(size(8)).next().unwrap();
        assert_eq!(first.columns(), &[0, 4, 7, 5, 2, 6, 1, 3]);
    }

    #[test]
    fn test_discovery_order_is_lexicographic() {
        let solutions = solve(6).unwrap().into_iter().collect_vec();
        assert!(solutions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_all_solutions_valid_and_unique() {
        for n in 1..=8 {
            let solutions = solve(n).unwrap();
            assert!(solutions.verify(), "n = {n}");
            assert!(!solutions.has_duplicates(), "n = {n}");
            assert!(solutions.iter().all(|s| s.n() == usize::try_from(n).unwrap()));
        }
    }

    #[test]
    fn test_mask_matches_scan_order() {
        for n in 1..=8 {
            let scan = Search::<ScanCheck>::new(size(n)).collect_vec();
            let mask = Search::<MaskCheck>::new(size(n)).collect_vec();
            assert_eq!(scan, mask, "n = {n}");
        }
    }

    #[test]
    fn test_count_and_has_solution() {
        assert_eq!(count(8), Ok(92));
        assert_eq!(count(10), Ok(724));
        assert_eq!(has_solution(1), Ok(true));
        assert_eq!(has_solution(2), Ok(false));
        assert_eq!(has_solution(3), Ok(false));
        assert_eq!(has_solution(4), Ok(true));
    }

    #[test]
    fn test_board_restored_after_complete_search() {
        let mut search = Search::<ScanCheck>::new(size(6));
        assert_eq!(search.by_ref().count(), 4);
        assert_eq!(search.outcome(), Outcome::Complete);
        assert_eq!(search.board().queen_count(), 0);
        let stats = search.stats();
        assert_eq!(stats.placements, stats.backtracks);
        assert_eq!(stats.solutions, 4);
    }

    #[test]
    fn test_exhausted_search_stays_exhausted() {
        let mut search = Search::<MaskCheck>::new(size(1));
        assert!(search.next().is_some());
        assert!(search.next().is_none());
        assert!(search.next().is_none());
    }

    #[test]
    fn test_solution_limit() {
        let limits = SearchLimits::none().with_max_solutions(5);
        let report = solve_with(size(8), SafetyCheckType::Mask, limits);
        assert_eq!(report.outcome, Outcome::SolutionLimit);
        assert_eq!(report.solutions.len(), 5);

        let full = solve(8).unwrap();
        for (i, s) in report.solutions.iter().enumerate() {
            assert_eq!(s, &full[i]);
        }
    }

    #[test]
    fn test_limit_above_total_completes() {
        let limits = SearchLimits::none().with_max_solutions(1000);
        let report = solve_with(size(6), SafetyCheckType::Scan, limits);
        assert_eq!(report.outcome, Outcome::Complete);
        assert_eq!(report.solutions.len(), 4);
    }

    #[test]
    fn test_limit_equal_to_total_completes() {
        let limits = SearchLimits::none().with_max_solutions(4);
        let report = solve_with(size(6), SafetyCheckType::Scan, limits);
        assert_eq!(report.outcome, Outcome::Complete);
        assert_eq!(report.solutions.len(), 4);

        let limits = SearchLimits::none().with_max_solutions(2);
        let report = solve_with(size(4), SafetyCheckType::Mask, limits);
        assert_eq!(report.outcome, Outcome::Complete);
        assert_eq!(report.stats.solutions, 2);
    }

    #[test]
    fn test_limit_below_total_stops_before_next_solution() {
        let limits = SearchLimits::none().with_max_solutions(3);
        let mut search = Search::<ScanCheck>::with_limits(size(6), limits);
        assert_eq!(search.by_ref().count(), 3);
        assert_eq!(search.outcome(), Outcome::SolutionLimit);
    }

    #[test]
    fn test_cancelled_before_start() {
        let flag = Arc::new(AtomicBool::new(true));
        let limits = SearchLimits::none().with_cancel(flag);
        let report = solve_with(size(8), SafetyCheckType::Scan, limits);
        assert_eq!(report.outcome, Outcome::Cancelled);
        assert!(report.solutions.is_empty());
    }

    #[test]
    fn test_zero_timeout() {
        let limits = SearchLimits::none().with_timeout(Duration::ZERO);
        let report = solve_with(size(10), SafetyCheckType::Mask, limits);
        assert_eq!(report.outcome, Outcome::TimedOut);
        assert!(report.solutions.is_empty());
    }

    #[test]
    fn test_report_stats() {
        let report = solve_with(size(4), SafetyCheckType::Scan, SearchLimits::none());
        assert_eq!(report.outcome, Outcome::Complete);
        assert_eq!(report.stats.solutions, 2);
        assert!(report.stats.safety_checks >= report.stats.placements);
        assert!(report.stats.nodes > 0);
    }
}
