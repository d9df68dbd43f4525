//! The Parker 5×5 solver: given a dictionary of English words, find
//! every unordered set of five five-letter words whose 25 letters are
//! pairwise distinct.
//!
//! The pipeline is mmap → parallel reader → word integrator →
//! frequency partitioner → bitset depth-first solver → emitter, all
//! described module-by-module below. [`run`] drives the whole thing
//! end to end from a [`Config`].

pub mod context;
pub mod emit;
pub mod error;
pub mod hashmap;
pub mod integrator;
pub mod mask;
pub mod mmap;
pub mod partition;
pub mod pool;
pub mod reader;
pub mod solver;

use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

pub use error::{PipelineError, Result};

/// The default dictionary path used when `-f` is not given.
pub const DEFAULT_DICTIONARY: &str = "words_alpha.txt";

/// The fixed output path the solutions are always written to.
pub const SOLUTIONS_FILENAME: &str = "solutions.txt";

/// The single configuration value threaded into the pipeline, built by
/// the CLI layer. Mirrors the role the teacher's `Args` struct plays:
/// one value, parsed once, passed by reference into everything else.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the dictionary to read.
    pub dictionary: PathBuf,
    /// Number of worker threads to use. Callers should clamp this with
    /// [`pool::clamp_worker_count`] before constructing a `Config`.
    pub workers: usize,
    /// Whether to print the metrics/timing report to stdout.
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            dictionary: PathBuf::from(DEFAULT_DICTIONARY),
            workers: pool::default_worker_count(),
            verbose: false,
        }
    }
}

/// Timing and sizing metrics gathered while running the pipeline, for
/// the `-v` report. Kept separate from `log`'s diagnostic output: this
/// is the user-facing summary the original tool always printed under
/// `-v`, regardless of `RUST_LOG`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Metrics {
    pub file_load: Duration,
    pub solve: Duration,
    pub emit: Duration,
    pub total: Duration,
    pub unique_words: usize,
    pub num_solutions: usize,
    pub workers: usize,
    pub readers: usize,
}

/// Outcome of running the full pipeline: how many solutions were
/// found, and (if requested) the timing breakdown.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub num_solutions: usize,
    pub metrics: Option<Metrics>,
}

/// Runs the full pipeline described in the module docs against
/// `config.dictionary`, writing `solutions.txt` in the current
/// directory.
///
/// Returns [`PipelineError::Io`] if the dictionary cannot be opened or
/// mapped, and [`PipelineError::OutputWrite`] if the solutions file
/// cannot be written — in the latter case the solver's work is not
/// lost, only left unwritten, matching the original's behavior of
/// reporting the failure without aborting what was already computed.
pub fn run(config: &Config) -> Result<RunReport> {
    run_into(config, Path::new(SOLUTIONS_FILENAME))
}

/// Like [`run`], but writes to an explicit output path. Split out so
/// integration tests can point the emitter at a scratch file instead
/// of the process's current directory.
pub fn run_into(config: &Config, output_path: &Path) -> Result<RunReport> {
    let total_start = Instant::now();

    let load_start = Instant::now();
    let mapping = mmap::Mapping::open(&config.dictionary)?;
    let data = mapping.as_slice();
    let file_load = load_start.elapsed();

    let workers = pool::clamp_worker_count(config.workers.max(1));
    let readers = pool::reader_count(data.len(), workers);

    let solve_start = Instant::now();
    let shared = pool::run(data, workers);
    let solve = solve_start.elapsed();

    let solve_data = shared.solve.get().expect("pool::run always populates solve data before returning");
    let unique_words = solve_data.arena.len();
    let num_solutions = solve_data.solution_count.load(Ordering::Relaxed) as usize;

    let emit_start = Instant::now();
    let bytes = pool::solution_bytes(&shared);
    emit::write_solutions(output_path, &bytes)?;
    let emit = emit_start.elapsed();

    let total = total_start.elapsed();

    let metrics = config.verbose.then_some(Metrics {
        file_load,
        solve,
        emit,
        total,
        unique_words,
        num_solutions,
        workers,
        readers,
    });

    Ok(RunReport { num_solutions, metrics })
}
