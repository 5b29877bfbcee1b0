#![deny(missing_docs)]
//! This crate enumerates solutions to the N-Queens puzzle by backtracking.

/// The `queens` module holds the board, the search engine and solution rendering.
pub mod queens;
