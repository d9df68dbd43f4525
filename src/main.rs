//! Command-line entry point for the Parker 5×5 solver.
//!
//! Parses arguments, builds a [`fivewords::Config`], runs the pipeline,
//! and prints the `-v` metrics report exactly where the original tool
//! did: on stdout, independent of `RUST_LOG`-controlled diagnostic
//! logging.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use fivewords::{pool, Config, Metrics};

/// Finds every set of five five-letter words that together use 25 of
/// the alphabet's 26 letters.
///
/// This program computes sets of words that share no letters in
/// common. The puzzle was originally posed by Matt Parker
/// (https://www.youtube.com/watch?v=_-AfhLQfb6w), and this solver uses
/// a bitset depth-first search over frequency-ordered letter buckets,
/// fed by a parallel mmap reader.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Enable the timing/metrics report on standard output.
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Number of worker threads to use, clamped to [1, 64]. Defaults to
    /// a value derived from the host's available parallelism.
    #[arg(short = 't', long = "threads")]
    threads: Option<usize>,

    /// Path to the dictionary to search.
    #[arg(short = 'f', long = "file", default_value = fivewords::DEFAULT_DICTIONARY)]
    file: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    let workers = pool::clamp_worker_count(args.threads.unwrap_or_else(pool::default_worker_count));

    let config = Config {
        dictionary: args.file,
        workers,
        verbose: args.verbose,
    };

    match fivewords::run(&config) {
        Ok(report) => {
            if let Some(metrics) = report.metrics {
                print_metrics(&metrics);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn print_metrics(metrics: &Metrics) {
    println!("Number of threads = {:8}", metrics.workers);
    println!("Number of readers = {:8}", metrics.readers);
    println!("Num Unique Words  = {:8}", metrics.unique_words);
    println!();
    println!("NUM SOLUTIONS = {}", metrics.num_solutions);
    println!();
    println!("TIMES TAKEN :");
    println!("{:<20} = {:.6}s", "Total", metrics.total.as_secs_f64());
    println!();
    println!("{:<20} = {:.6}s", "File Load", metrics.file_load.as_secs_f64());
    println!("{:<20} = {:.6}s", "Main Algorithm", metrics.solve.as_secs_f64());
    println!("{:<20} = {:.6}s", "Emit Results", metrics.emit.as_secs_f64());
}
