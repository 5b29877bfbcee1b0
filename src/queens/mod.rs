#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Exhaustive N-Queens enumeration.
//!
//! [`search::solve`] returns every placement of N non-attacking queens on an
//! N×N board, in a fixed discovery order; [`solution::render`] turns one
//! placement into a text grid.

pub mod board;
pub mod error;
pub mod limits;
pub mod safety;
pub mod search;
pub mod solution;
pub mod stats;

pub use board::{Board, BoardSize};
pub use error::QueensError;
pub use limits::{Outcome, SearchLimits};
pub use safety::{SafetyCheck, SafetyCheckType};
pub use search::{Search, SearchReport, count, has_solution, solve, solve_with};
pub use solution::{Solution, SolutionSet, render};
pub use stats::SearchStats;
