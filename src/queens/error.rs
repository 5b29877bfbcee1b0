//! Errors raised by the N-Queens core.

use thiserror::Error;

/// Failures reported by the search engine.
///
/// The search itself is total for every valid board size, so the only way to
/// fail is to ask for a board that cannot exist or cannot be allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueensError {
    /// The requested board size was below 1.
    #[error("board size must be at least 1, got {n}")]
    InvalidInput {
        /// The rejected size.
        n: i64,
    },
    /// The requested board size exceeds [`BoardSize::MAX`].
    ///
    /// [`BoardSize::MAX`]: crate::queens::board::BoardSize::MAX
    #[error("board size must be at most {max}, got {n}")]
    TooLarge {
        /// The rejected size.
        n: u64,
        /// The largest size accepted.
        max: usize,
    },
}
