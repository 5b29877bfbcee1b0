//! The command-line shell around the N-Queens core.

pub(crate) mod cli;
