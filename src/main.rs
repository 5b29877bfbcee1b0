//! # queens
//!
//! `queens` enumerates every placement of N non-attacking queens on an N×N
//! board by depth-first backtracking, and prints them as text grids.
//!
//! ## Usage
//!
//! ```sh
//! queens [OPTIONS] [N]
//! queens <SUBCOMMAND> [OPTIONS]
//! ```
//!
//! With no arguments the interactive prompt starts: it asks for a board size,
//! prints how many solutions exist and the first one, then offers to print the
//! rest. Given only `N`, the board is solved non-interactively.
//!
//! ### Subcommands
//!
//! 1.  **`solve`**: Solve a board.
//!     ```sh
//!     queens solve --n 8 [--all] [OPTIONS]
//!     ```
//!
//! 2.  **`count`**: Count the solutions without storing them.
//!     ```sh
//!     queens count --n 12 [OPTIONS]
//!     ```
//!
//! 3.  **`interactive`**: The prompt-driven session described above.
//!
//! 4.  **`completions`**: Print a shell completion script.
//!     ```sh
//!     queens completions bash > queens.bash
//!     ```
//!
//! ### Common Options
//!
//! -   `-d, --debug`: Enable debug logging (`RUST_LOG` still takes precedence).
//! -   `-v, --verify`: Check every solution for attacks and duplicates.
//! -   `-s, --stats`: Print search statistics and memory usage.
//! -   `--check <scan|mask>`: Safety-check strategy (default: `scan`).
//! -   `--max-solutions <K>`: Stop after K solutions.
//! -   `--timeout-ms <T>`: Stop after T milliseconds.
//!
//! Boards smaller than 4 are rejected by the shell. Solution counts grow very
//! quickly (92 for N = 8, 14 200 for N = 12, 2 279 184 for N = 15), so prefer
//! `count` or the limits above for large boards.

use crate::command_line::cli::{Cli, Commands, run_count, run_interactive, run_solve};
use clap::{CommandFactory, Parser};
use log::LevelFilter;
use std::io;

mod command_line;

/// Global allocator using `tikv-jemallocator` for potentially better performance
/// and memory usage tracking.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() {
    let cli = Cli::parse();

    let level = if cli.common_options().debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = match cli.command {
        Some(Commands::Solve { n, all, common }) => run_solve(&mut out, n, all, &common),
        Some(Commands::Count { n, common }) => run_count(&mut out, n, &common),
        Some(Commands::Interactive { common }) => {
            run_interactive(&mut io::stdin().lock(), &mut out, &common)
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut out);
            Ok(())
        }
        None => match cli.n {
            Some(n) => run_solve(&mut out, n, false, &cli.common),
            None => run_interactive(&mut io::stdin().lock(), &mut out, &cli.common),
        },
    };

    if let Err(e) = result {
        log::debug!("exiting on error: {e:?}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
