//! Counters collected while searching.

/// Work done by one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Partial boards examined, one per row descent (including the root).
    pub nodes: usize,
    /// Safety queries issued.
    pub safety_checks: usize,
    /// Queens placed.
    pub placements: usize,
    /// Queens removed while backtracking.
    pub backtracks: usize,
    /// Complete placements found.
    pub solutions: usize,
}
