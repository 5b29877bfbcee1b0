#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Optional bounds on how much work a search may do.
//!
//! Solution counts grow super-exponentially with the board size (92 for N = 8,
//! 14 200 for N = 12, over two million for N = 17), so an interactive caller
//! usually wants a way out. None of these limits is active by default; a search
//! with `SearchLimits::default()` always runs to completion.
//!
//! Cancellation and the timeout are checked each time the search descends into
//! a new row. All limits, including the solution cap, are checked again before
//! a solution is yielded, so a search whose cap equals the true total still
//! finishes as complete.

use std::fmt::Display;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Caller-chosen bounds for a search.
#[derive(Debug, Clone, Default)]
pub struct SearchLimits {
    /// Stop after this many solutions have been produced.
    pub max_solutions: Option<usize>,
    /// Stop once this much time has passed since the search started.
    pub timeout: Option<Duration>,
    /// Stop as soon as this flag is set, e.g. from another thread.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl SearchLimits {
    /// No limits at all.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Caps the number of solutions produced.
    #[must_use]
    pub fn with_max_solutions(mut self, max: usize) -> Self {
        self.max_solutions = Some(max);
        self
    }

    /// Stops the search once `timeout` has elapsed.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Stops the search as soon as `flag` is set.
    #[must_use]
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Whether any bound is set.
    #[must_use]
    pub const fn is_bounded(&self) -> bool {
        self.max_solutions.is_some() || self.timeout.is_some() || self.cancel.is_some()
    }

    /// Returns the reason to abandon the search right now, if any: the
    /// cancellation flag is raised or the timeout has elapsed.
    #[must_use]
    pub fn interrupted(&self, started: Instant) -> Option<Outcome> {
        if self
            .cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
        {
            return Some(Outcome::Cancelled);
        }
        if self
            .timeout
            .is_some_and(|timeout| started.elapsed() >= timeout)
        {
            return Some(Outcome::TimedOut);
        }
        None
    }

    /// Returns the reason not to yield another solution, given how many have
    /// already been produced. Only meaningful once a further solution exists.
    #[must_use]
    pub fn before_yield(&self, started: Instant, solutions: usize) -> Option<Outcome> {
        if let Some(stop) = self.interrupted(started) {
            return Some(stop);
        }
        if self.max_solutions.is_some_and(|max| solutions >= max) {
            return Some(Outcome::SolutionLimit);
        }
        None
    }
}

/// Why a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Outcome {
    /// Still running, or never started.
    #[default]
    Running,
    /// Every placement was examined.
    Complete,
    /// `max_solutions` had been produced and a further solution was found.
    SolutionLimit,
    /// `timeout` elapsed.
    TimedOut,
    /// The cancellation flag was raised.
    Cancelled,
}

impl Outcome {
    /// Whether the search examined the whole space.
    #[must_use]
    pub const fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Whether a limit cut the search short.
    #[must_use]
    pub const fn is_stopped_early(self) -> bool {
        matches!(self, Self::SolutionLimit | Self::TimedOut | Self::Cancelled)
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Complete => write!(f, "complete"),
            Self::SolutionLimit => write!(f, "stopped at solution limit"),
            Self::TimedOut => write!(f, "timed out"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}
