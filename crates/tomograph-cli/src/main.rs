// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use clap::Parser;
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    process::ExitCode,
    time::Duration,
};
use tomograph_model::{
    instance::ProblemInstance,
    loading::{InstanceLoader, LoaderError},
};
use tomograph_search::{
    mode::SolveMode,
    result::{SolverOutcome, SolverResult},
};
use tomograph_solver::solver::SolverBuilder;
use tracing::{error, info};

/// Exit code for malformed or invalid input.
const EXIT_INVALID_INPUT: u8 = 2;
/// Exit code for a search that was stopped before it reached an answer.
const EXIT_ABORTED: u8 = 1;

#[derive(Parser, Debug)]
#[command(name = "tomograph")]
#[command(version)]
#[command(about = "Reconstruct binary matrices from their row and column sums")]
#[command(long_about = "\
Reconstruct binary matrices from their row and column sums

The input holds two lines of whitespace-separated non-negative integers:
the row sums (one per row, top to bottom) followed by the column sums (one
per column, left to right). Blank lines and text after '#' are ignored.

  2 2 2
  2 2 2

Every matrix is printed as one line per row with cells written as '1 ' or
'0 '. With --all, matrices are separated by a blank line.")]
struct Cli {
    /// Input file; reads standard input when omitted
    input: Option<PathBuf>,

    /// Print every solution instead of the first one
    #[arg(long)]
    all: bool,

    /// Worker threads for the search (0 uses every available core)
    #[arg(long, default_value_t = 1, value_name = "N")]
    threads: usize,

    /// Stop the search after this many seconds
    #[arg(long, value_name = "SECS", value_parser = parse_seconds)]
    time_limit: Option<Duration>,

    /// Stop after this many solutions (only meaningful with --all)
    #[arg(long, value_name = "N")]
    solution_limit: Option<u64>,

    /// Search even when row and column totals differ
    #[arg(long)]
    no_sum_check: bool,

    /// Print search statistics to standard error
    #[arg(long)]
    stats: bool,

    /// Log filter used when RUST_LOG is not set (e.g. "info", "tomograph_search=debug")
    #[arg(long, default_value = "warn", value_name = "LEVEL")]
    log_level: String,
}

fn parse_seconds(s: &str) -> Result<Duration, String> {
    let secs: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a number of seconds", s))?;
    Duration::try_from_secs_f64(secs).map_err(|e| format!("'{}' is not a valid duration: {}", s, e))
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();
}

fn read_instance<R: BufRead>(rdr: R) -> Result<ProblemInstance, LoaderError> {
    InstanceLoader::new().from_bufread(rdr)
}

fn load(input: Option<&PathBuf>) -> Result<ProblemInstance, LoaderError> {
    match input {
        Some(path) => InstanceLoader::new().from_path(path),
        None => read_instance(io::stdin().lock()),
    }
}

/// Writes the solutions of `outcome` in the text format, or the
/// unsatisfiable message.
fn write_outcome<W: Write>(out: &mut W, outcome: &SolverOutcome) -> io::Result<()> {
    match outcome.result() {
        SolverResult::Satisfiable(solutions) => {
            for (i, solution) in solutions.iter().enumerate() {
                if i > 0 {
                    writeln!(out)?;
                }
                write!(out, "{}", solution)?;
            }
        }
        SolverResult::Unsatisfiable => writeln!(out, "No solution was found!")?,
        SolverResult::Unknown => {}
    }
    Ok(())
}

fn run(cli: &Cli) -> ExitCode {
    let instance = match load(cli.input.as_ref()) {
        Ok(instance) => instance,
        Err(err) => {
            error!(%err, "failed to read instance");
            eprintln!("Invalid input: {}", err);
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
    };
    info!(%instance, "instance loaded");

    let mode = if cli.all {
        SolveMode::AllSolutions
    } else {
        SolveMode::FirstSolution
    };

    let mut builder = SolverBuilder::new()
        .with_mode(mode)
        .with_threads(cli.threads)
        .with_sum_check(!cli.no_sum_check)
        .with_progress_log(Duration::from_secs(1));
    if let Some(limit) = cli.time_limit {
        builder = builder.with_time_limit(limit);
    }
    if let Some(limit) = cli.solution_limit {
        builder = builder.with_solution_limit(limit);
    }

    let outcome = builder.build().solve(&instance);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(err) = write_outcome(&mut out, &outcome).and_then(|_| out.flush()) {
        error!(%err, "failed to write solutions");
        return ExitCode::FAILURE;
    }

    if cli.stats {
        eprintln!("Termination: {}", outcome.termination_reason());
        eprint!("{}", outcome.statistics());
    }

    if matches!(outcome.result(), SolverResult::Unknown) {
        eprintln!("Search stopped before an answer was found: {}", outcome.termination_reason());
        return ExitCode::from(EXIT_ABORTED);
    }

    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    run(&cli)
}
