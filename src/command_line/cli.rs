#![allow(clippy::cast_precision_loss)]

use clap::{Args, Parser, Subcommand};
use queens_solver::queens::{
    BoardSize, Outcome, QueensError, SafetyCheckType, Search, SearchLimits, SearchStats,
    SolutionSet, render, solve_with,
};
use queens_solver::queens::safety::SafetyCheckImpls;
use std::io::{BufRead, Write};
use std::time::Duration;
use thiserror::Error;
use tikv_jemalloc_ctl::{epoch, stats};

/// Smallest board the shell is willing to solve. The core accepts any size
/// from 1, but boards below 4 have nothing interesting to show.
pub(crate) const MIN_BOARD: i64 = 4;

/// Defines the command-line interface for the queens application.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(
    name = "queens",
    version,
    about = "Enumerates every solution of the N-Queens puzzle",
    args_conflicts_with_subcommands = true
)]
pub(crate) struct Cli {
    /// An optional board size. If provided without a subcommand, it's treated
    /// as `solve --n <N>`. With neither, the interactive prompt starts.
    #[arg(allow_negative_numbers = true)]
    pub n: Option<i64>,

    /// Specifies the subcommand to execute (e.g. `solve`, `count`, `interactive`).
    #[clap(subcommand)]
    pub command: Option<Commands>,

    /// Common options applicable to all commands.
    #[command(flatten)]
    pub common: CommonOptions,
}

/// Enumerates the available subcommands.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Solve a board and print the solutions.
    Solve {
        /// Board size.
        #[arg(short, long, allow_negative_numbers = true)]
        n: i64,

        /// Print every solution, not only the first one.
        #[arg(short, long, default_value_t = false)]
        all: bool,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Count the solutions of a board without storing them.
    Count {
        /// Board size.
        #[arg(short, long, allow_negative_numbers = true)]
        n: i64,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Prompt for a board size, solve it, and offer to show every solution.
    Interactive {
        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

impl Cli {
    /// The common options that apply to whichever command was chosen.
    pub(crate) fn common_options(&self) -> &CommonOptions {
        match &self.command {
            Some(
                Commands::Solve { common, .. }
                | Commands::Count { common, .. }
                | Commands::Interactive { common },
            ) => common,
            Some(Commands::Completions { .. }) | None => &self.common,
        }
    }
}

/// Defines common command-line options shared across different subcommands.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct CommonOptions {
    /// Enable debug logging.
    #[arg(short, long, default_value_t = false)]
    pub(crate) debug: bool,

    /// Check every solution for attacks and duplicates before printing it.
    #[arg(short, long, default_value_t = false)]
    pub(crate) verify: bool,

    /// Print search statistics after solving.
    #[arg(short, long, default_value_t = false)]
    pub(crate) stats: bool,

    /// How attacked squares are detected.
    #[arg(long, default_value_t = SafetyCheckType::Scan)]
    pub(crate) check: SafetyCheckType,

    /// Stop after this many solutions.
    #[arg(long)]
    pub(crate) max_solutions: Option<usize>,

    /// Stop after this many milliseconds.
    #[arg(long)]
    pub(crate) timeout_ms: Option<u64>,
}

impl CommonOptions {
    pub(crate) fn limits(&self) -> SearchLimits {
        SearchLimits {
            max_solutions: self.max_solutions,
            timeout: self.timeout_ms.map(Duration::from_millis),
            cancel: None,
        }
    }
}

/// Errors reported at the shell boundary.
#[derive(Debug, Error)]
pub(crate) enum ShellError {
    #[error(transparent)]
    Queens(#[from] QueensError),
    #[error("board size must be at least {min}, got {0}", min = MIN_BOARD)]
    BelowMinimum(i64),
    #[error("solution failed verification")]
    VerificationFailed,
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Applies the shell's `n >= 4` rule on top of the core's `n >= 1`.
pub(crate) fn validate_size(n: i64) -> Result<BoardSize, ShellError> {
    let size = BoardSize::try_from(n)?;
    if n < MIN_BOARD {
        return Err(ShellError::BelowMinimum(n));
    }
    Ok(size)
}

/// Solves a board and prints the count, the first solution and, if
/// `show_all` is set, every other solution.
pub(crate) fn run_solve<W: Write>(
    out: &mut W,
    n: i64,
    show_all: bool,
    common: &CommonOptions,
) -> Result<(), ShellError> {
    let size = validate_size(n)?;
    let report = solve_with(size, common.check, common.limits());

    print_summary(out, size, &report.solutions, report.outcome)?;
    if show_all {
        print_rest(out, &report.solutions)?;
    }
    if common.verify {
        verify_solutions(out, &report.solutions)?;
    }
    if common.stats {
        print_stats(out, report.elapsed, &report.stats)?;
    }
    Ok(())
}

/// Counts the solutions of a board lazily and prints the total.
pub(crate) fn run_count<W: Write>(
    out: &mut W,
    n: i64,
    common: &CommonOptions,
) -> Result<(), ShellError> {
    let size = validate_size(n)?;
    let mut search =
        Search::<SafetyCheckImpls>::with_check(size, common.check.to_impl(size), common.limits());

    let total = if common.verify {
        let mut total = 0;
        for solution in search.by_ref() {
            if !solution.verify() {
                return Err(ShellError::VerificationFailed);
            }
            total += 1;
        }
        total
    } else {
        search.by_ref().count()
    };

    writeln!(out, "Found {total} solution(s)")?;
    print_partial_note(out, search.outcome())?;
    if common.stats {
        print_stats(out, search.elapsed(), &search.stats())?;
    }
    Ok(())
}

/// Runs the interactive prompt: read a board size, solve it, print the first
/// solution and ask whether to print the rest.
///
/// Invalid, too-small or too-large sizes are reported and asked for again. End of input
/// at either prompt ends the session quietly.
pub(crate) fn run_interactive<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    common: &CommonOptions,
) -> Result<(), ShellError> {
    let size = loop {
        let Some(line) = prompt(input, out, "Enter board size (e.g., 4 for 4x4): ")? else {
            return Ok(());
        };
        let Ok(n) = line.trim().parse::<i64>() else {
            writeln!(out, "Invalid input!")?;
            continue;
        };
        match validate_size(n) {
            Ok(size) => break size,
            Err(
                ShellError::BelowMinimum(_)
                | ShellError::Queens(QueensError::InvalidInput { .. }),
            ) => {
                writeln!(out, "Please enter a number >= {MIN_BOARD}")?;
            }
            Err(ShellError::Queens(e @ QueensError::TooLarge { .. })) => {
                writeln!(out, "{e}")?;
            }
            Err(e) => return Err(e),
        }
    };

    let report = solve_with(size, common.check, common.limits());
    print_summary(out, size, &report.solutions, report.outcome)?;

    if report.solutions.len() > 1 {
        let answer = prompt(input, out, "Show all solutions? (y/n): ")?;
        if answer.is_some_and(|a| a.trim().eq_ignore_ascii_case("y")) {
            print_rest(out, &report.solutions)?;
        }
    }

    if common.verify {
        verify_solutions(out, &report.solutions)?;
    }
    if common.stats {
        print_stats(out, report.elapsed, &report.stats)?;
    }
    Ok(())
}

/// Writes `message`, then reads one line. `None` at end of input.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    message: &str,
) -> Result<Option<String>, ShellError> {
    write!(out, "{message}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// Prints the heading, the solution count and the first solution.
pub(crate) fn print_summary<W: Write>(
    out: &mut W,
    size: BoardSize,
    solutions: &SolutionSet,
    outcome: Outcome,
) -> Result<(), ShellError> {
    writeln!(out, "\n=== Solving {size}-Queens Problem ===")?;
    writeln!(out, "\nFound {} solution(s)", solutions.len())?;
    print_partial_note(out, outcome)?;

    if let Some(first) = solutions.first() {
        writeln!(out, "\nFirst solution:")?;
        write!(out, "{}", render(first))?;
        writeln!(out)?;
    }
    Ok(())
}

/// Prints every solution after the first, labelled from 2.
pub(crate) fn print_rest<W: Write>(out: &mut W, solutions: &SolutionSet) -> Result<(), ShellError> {
    for (i, solution) in solutions.iter().enumerate().skip(1) {
        writeln!(out, "Solution {}:", i + 1)?;
        write!(out, "{}", render(solution))?;
        writeln!(out)?;
    }
    Ok(())
}

fn print_partial_note<W: Write>(out: &mut W, outcome: Outcome) -> Result<(), ShellError> {
    if outcome.is_stopped_early() {
        writeln!(out, "Search {outcome}; the count above is partial")?;
    }
    Ok(())
}

/// Checks every solution for attacks and the set for duplicates.
///
/// Prints the result; a failure is returned as an error.
pub(crate) fn verify_solutions<W: Write>(
    out: &mut W,
    solutions: &SolutionSet,
) -> Result<(), ShellError> {
    let ok = solutions.verify() && !solutions.has_duplicates();
    writeln!(out, "Verified: {ok:?}")?;
    if ok {
        Ok(())
    } else {
        Err(ShellError::VerificationFailed)
    }
}

/// Allocated and resident memory in MiB, as reported by jemalloc.
fn memory_usage() -> Option<(f64, f64)> {
    epoch::advance().ok()?;
    let allocated = stats::allocated::read().ok()?;
    let resident = stats::resident::read().ok()?;
    Some((
        allocated as f64 / (1024.0 * 1024.0),
        resident as f64 / (1024.0 * 1024.0),
    ))
}

/// Helper function to print a single statistic line in a formatted table row.
fn stat_line<W: Write>(out: &mut W, label: &str, value: impl std::fmt::Display) -> std::io::Result<()> {
    writeln!(out, "|  {label:<28} {value:>18}  |")
}

/// Helper function to print a statistic line that includes a rate (value/second).
fn stat_line_with_rate<W: Write>(
    out: &mut W,
    label: &str,
    value: usize,
    elapsed: f64,
) -> std::io::Result<()> {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    writeln!(out, "|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |")
}

/// Prints a summary of search statistics.
pub(crate) fn print_stats<W: Write>(
    out: &mut W,
    elapsed: Duration,
    s: &SearchStats,
) -> Result<(), ShellError> {
    let elapsed_secs = elapsed.as_secs_f64();

    writeln!(out, "\n========================[ Search Statistics ]========================")?;
    stat_line_with_rate(out, "Nodes", s.nodes, elapsed_secs)?;
    stat_line_with_rate(out, "Safety checks", s.safety_checks, elapsed_secs)?;
    stat_line_with_rate(out, "Placements", s.placements, elapsed_secs)?;
    stat_line_with_rate(out, "Backtracks", s.backtracks, elapsed_secs)?;
    stat_line_with_rate(out, "Solutions", s.solutions, elapsed_secs)?;
    if let Some((allocated, resident)) = memory_usage() {
        stat_line(out, "Memory usage (MiB)", format!("{allocated:.2}"))?;
        stat_line(out, "Resident memory (MiB)", format!("{resident:.2}"))?;
    }
    stat_line(out, "CPU time (s)", format!("{elapsed_secs:.3}"))?;
    writeln!(out, "=====================================================================")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Cursor;

    fn run_session(input: &str, common: &CommonOptions) -> String {
        let mut input = Cursor::new(input.as_bytes().to_vec());
        let mut out = Vec::new();
        run_interactive(&mut input, &mut out, common).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_solve() {
        let cli = Cli::try_parse_from(["queens", "solve", "--n", "8", "--all", "--check", "mask"])
            .unwrap();
        match cli.command {
            Some(Commands::Solve { n, all, common }) => {
                assert_eq!(n, 8);
                assert!(all);
                assert_eq!(common.check, SafetyCheckType::Mask);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_bare_size() {
        let cli = Cli::try_parse_from(["queens", "6", "--max-solutions", "2"]).unwrap();
        assert_eq!(cli.n, Some(6));
        assert!(cli.command.is_none());
        assert_eq!(cli.common_options().max_solutions, Some(2));
    }

    #[test]
    fn test_validate_size() {
        assert!(matches!(validate_size(4), Ok(s) if s.get() == 4));
        assert!(matches!(validate_size(3), Err(ShellError::BelowMinimum(3))));
        assert!(matches!(
            validate_size(0),
            Err(ShellError::Queens(QueensError::InvalidInput { n: 0 }))
        ));
    }

    #[test]
    fn test_interactive_show_all() {
        let text = run_session("4\ny\n", &CommonOptions::default());
        assert!(text.starts_with("Enter board size (e.g., 4 for 4x4): "));
        assert!(text.contains("=== Solving 4-Queens Problem ==="));
        assert!(text.contains("Found 2 solution(s)"));
        assert!(text.contains("First solution:\n. Q . .\n. . . Q\nQ . . .\n. . Q .\n\n"));
        assert!(text.contains("Show all solutions? (y/n): "));
        assert!(text.contains("Solution 2:\n. . Q .\nQ . . .\n. . . Q\n. Q . .\n"));
        assert!(!text.contains("Solution 3:"));
    }

    #[test]
    fn test_interactive_reprompts_and_declines() {
        let text = run_session("abc\n3\n-2\n6\nn\n", &CommonOptions::default());
        assert!(text.contains("Invalid input!"));
        assert_eq!(text.matches("Please enter a number >= 4").count(), 2);
        assert!(text.contains("Found 4 solution(s)"));
        assert!(!text.contains("Solution 2:"));
    }

    #[test]
    fn test_shell_error_messages() {
        assert_eq!(
            ShellError::BelowMinimum(3).to_string(),
            "board size must be at least 4, got 3"
        );
        assert_eq!(
            ShellError::from(QueensError::InvalidInput { n: -2 }).to_string(),
            "board size must be at least 1, got -2"
        );
        assert_eq!(
            validate_size(5_000_000_000).unwrap_err().to_string(),
            format!("board size must be at most {}, got 5000000000", BoardSize::MAX)
        );
    }

    #[test]
    fn test_interactive_reprompts_on_oversized_board() {
        let text = run_session("5000000000
4
n
", &CommonOptions::default());
        assert!(text.contains(&format!("board size must be at most {}", BoardSize::MAX)));
        assert!(!text.contains("Please enter a number >= 4"));
        assert!(text.contains("Found 2 solution(s)"));
    }

    #[test]
    fn test_interactive_eof() {
        let text = run_session("", &CommonOptions::default());
        assert_eq!(text, "Enter board size (e.g., 4 for 4x4): ");
    }

    #[test]
    fn test_interactive_verify_and_stats() {
        let common = CommonOptions {
            verify: true,
            stats: true,
            ..CommonOptions::default()
        };
        let text = run_session("5\nY\n", &common);
        assert!(text.contains("Found 10 solution(s)"));
        assert!(text.contains("Solution 10:"));
        assert!(text.contains("Verified: true"));
        assert!(text.contains("Search Statistics"));
    }

    #[test]
    fn test_run_solve_rejects_small_board() {
        let mut out = Vec::new();
        let err = run_solve(&mut out, 3, false, &CommonOptions::default()).unwrap_err();
        assert!(matches!(err, ShellError::BelowMinimum(3)));
        assert!(out.is_empty());
    }

    #[test]
    fn test_run_solve_all_with_limit() {
        let common = CommonOptions {
            max_solutions: Some(3),
            check: SafetyCheckType::Mask,
            ..CommonOptions::default()
        };
        let mut out = Vec::new();
        run_solve(&mut out, 8, true, &common).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Found 3 solution(s)"));
        assert!(text.contains("stopped at solution limit"));
        assert!(text.contains("Solution 3:"));
        assert!(!text.contains("Solution 4:"));
    }

    #[test]
    fn test_run_solve_limit_equal_to_total_is_not_partial() {
        let common = CommonOptions {
            max_solutions: Some(4),
            ..CommonOptions::default()
        };
        let mut out = Vec::new();
        run_solve(&mut out, 6, true, &common).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Found 4 solution(s)"));
        assert!(!text.contains("partial"));
        assert!(text.contains("Solution 4:"));
    }

    #[test]
    fn test_run_count() {
        let common = CommonOptions {
            verify: true,
            ..CommonOptions::default()
        };
        let mut out = Vec::new();
        run_count(&mut out, 8, &common).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Found 92 solution(s)\n");
    }
}
