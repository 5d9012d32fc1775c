//! CLI entry point for the sliding-puzzle solver.
//!
//! Usage:
//!   slide-solver solve <puzzle.json> [options]
//!   slide-solver solve --stdin [options]
//!   slide-solver solve --initial 1,2,3,4,5,0,7,8,6 [options]
//!   slide-solver replay --initial <board> --path <moves>
//!
//! Options:
//!   --goal <board>          Goal board as a flat string (default: solved board)
//!   --heuristic <kind>      manhattan | doubled-manhattan | misplaced-tiles | linear-conflict
//!   --timeout <seconds>     Maximum search time
//!   --max-expansions <n>    Maximum nodes to expand
//!   --parity-check          Reject unreachable goals without searching
//!   -v, --verbose           Log search progress to stderr (-vv for every expansion)

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use log::{LevelFilter, Log, Metadata, Record};
use serde::{Deserialize, Serialize};

use slide_solver::{
    Board, HeuristicKind, MovePath, Replay, SearchStats, SolveError, Solver, SolverConfig,
};

#[derive(Parser)]
#[command(name = "slide-solver")]
#[command(about = "A* solver for N×N sliding-tile puzzles")]
#[command(version)]
struct Cli {
    /// Log search progress to stderr; repeat for per-expansion detail
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Heuristic names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum HeuristicArg {
    Manhattan,
    DoubledManhattan,
    MisplacedTiles,
    LinearConflict,
}

impl From<HeuristicArg> for HeuristicKind {
    fn from(arg: HeuristicArg) -> Self {
        match arg {
            HeuristicArg::Manhattan => HeuristicKind::Manhattan,
            HeuristicArg::DoubledManhattan => HeuristicKind::DoubledManhattan,
            HeuristicArg::MisplacedTiles => HeuristicKind::MisplacedTiles,
            HeuristicArg::LinearConflict => HeuristicKind::LinearConflict,
        }
    }
}

/// Writes `log` records to stderr, keeping stdout for the JSON report.
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Find the shortest blank-move path to the goal
    Solve {
        /// Path to puzzle JSON file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read puzzle from stdin instead of file
        #[arg(long)]
        stdin: bool,

        /// Initial board as comma-joined row-major values
        #[arg(long, conflicts_with_all = ["file", "stdin"])]
        initial: Option<String>,

        /// Goal board as comma-joined row-major values
        #[arg(long)]
        goal: Option<String>,

        /// Heuristic used to order the search
        #[arg(long, value_enum, default_value_t = HeuristicArg::Manhattan)]
        heuristic: HeuristicArg,

        /// Maximum search time in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Maximum number of node expansions
        #[arg(long)]
        max_expansions: Option<usize>,

        /// Report unreachable goals without searching
        #[arg(long)]
        parity_check: bool,
    },

    /// Print every board along a move path
    Replay {
        /// Initial board as comma-joined row-major values
        #[arg(long)]
        initial: String,

        /// Blank moves, e.g. "DLUR"
        #[arg(long)]
        path: String,
    },
}

/// Puzzle file format
#[derive(Debug, Deserialize)]
struct PuzzleInput {
    initial: Board,
    #[serde(default)]
    goal: Option<Board>,
}

/// Output format for a solve
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    solved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    heuristic: Option<HeuristicKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<MovePath>,
    #[serde(skip_serializing_if = "Option::is_none")]
    moves: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<SearchStats>,
}

fn main() {
    let cli = Cli::parse();

    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level_for(cli.verbose));
    }

    match cli.command {
        Commands::Solve {
            file,
            stdin,
            initial,
            goal,
            heuristic,
            timeout,
            max_expansions,
            parity_check,
        } => {
            let (initial, file_goal) = match read_puzzle(file, stdin, initial) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };

            let goal = match goal.map(|g| g.parse::<Board>()).transpose() {
                Ok(Some(g)) => g,
                Ok(None) => match file_goal.map_or_else(|| Board::solved(initial.size()), Ok) {
                    Ok(g) => g,
                    Err(e) => {
                        eprintln!("Error building goal board: {}", e);
                        std::process::exit(1);
                    }
                },
                Err(e) => {
                    eprintln!("Error parsing goal board: {}", e);
                    std::process::exit(1);
                }
            };

            let config = SolverConfig {
                heuristic: heuristic.into(),
                max_expansions,
                timeout: timeout.map(Duration::from_secs),
                parity_check,
            };

            let result = Solver::with_config(initial, goal, config)
                .and_then(|mut s| s.run().map(|solution| (s.config().heuristic, solution)));
            let solved = result.is_ok();
            let output = match result {
                Ok((heuristic, solution)) => SolveOutput {
                    solved: true,
                    heuristic: Some(heuristic),
                    reason: None,
                    message: None,
                    moves: Some(solution.path.len()),
                    path: Some(solution.path),
                    stats: Some(solution.stats),
                },
                Err(e) => format_error(&e),
            };

            match serde_json::to_string_pretty(&output) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error writing output: {}", e);
                    std::process::exit(1);
                }
            }

            // Exit with appropriate code
            std::process::exit(if solved { 0 } else { 1 });
        }

        Commands::Replay { initial, path } => {
            let board: Board = match initial.parse() {
                Ok(b) => b,
                Err(e) => {
                    eprintln!("Error parsing initial board: {}", e);
                    std::process::exit(1);
                }
            };
            let path: MovePath = match path.parse() {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Error parsing path: {}", e);
                    std::process::exit(1);
                }
            };

            println!("Initial:\n{}", board);
            for step in Replay::new(&board, &path) {
                match step {
                    Ok((mv, next)) => {
                        println!("{} (tile slides {:?})\n{}", mv, mv.tile_displacement(), next)
                    }
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        std::process::exit(1);
                    }
                }
            }
        }
    }
}

/// Read the initial board, and optionally a goal, from the chosen source.
fn read_puzzle(
    file: Option<PathBuf>,
    stdin: bool,
    initial: Option<String>,
) -> Result<(Board, Option<Board>), String> {
    if let Some(flat) = initial {
        let board = flat
            .parse::<Board>()
            .map_err(|e| format!("parsing initial board: {}", e))?;
        return Ok((board, None));
    }

    let json_content = if stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("reading stdin: {}", e))?;
        buffer
    } else if let Some(path) = file {
        fs::read_to_string(&path).map_err(|e| format!("reading {:?}: {}", path, e))?
    } else {
        return Err("must provide a file path, --stdin or --initial".to_string());
    };

    let puzzle: PuzzleInput =
        serde_json::from_str(&json_content).map_err(|e| format!("parsing puzzle JSON: {}", e))?;
    Ok((puzzle.initial, puzzle.goal))
}

fn format_error(error: &SolveError) -> SolveOutput {
    SolveOutput {
        solved: false,
        heuristic: None,
        reason: Some(error.reason().to_string()),
        message: Some(error.to_string()),
        path: None,
        moves: None,
        stats: None,
    }
}
