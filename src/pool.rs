//! The worker pool / coordinator: the two-phase thread pool that turns
//! reader threads into solvers, and the top-level pipeline that wires
//! mmap → readers → integrator → partitioner → solver together.
//!
//! The original amortizes thread-creation cost (expensive on some
//! virtual hosts) by only creating the worker threads that exist
//! purely to solve once a reader thread finishes reading, reusing
//! reader threads as solvers in the meantime. This implementation
//! creates the full pool up front instead — the solver-only threads
//! simply busy-wait on `go_solve` from the moment they're spawned,
//! which the original's own design notes call out as an equivalent
//! variation ("this must not change the set of results"); see
//! DESIGN.md. The `finish_order` counter is kept and updated for
//! parity with the shared-state model in the specification, even
//! though nothing branches on which reader finishes first.

use std::hint;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;

use crate::context::{self, SharedState, SolveData, MAX_READERS, MAX_THREADS};
use crate::integrator;
use crate::partition;
use crate::reader;
use crate::solver;

/// Picks a default worker count from the host's available parallelism,
/// clamped the way the original tool clamps it: single-core hosts get
/// one worker, and the benefit of more than ~20 workers is assumed to
/// flatten out.
pub fn default_worker_count() -> usize {
    let ncpus = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);

    let n = if ncpus < 2 {
        1
    } else if ncpus < 5 {
        ncpus
    } else if ncpus < 9 {
        ncpus - 1
    } else if ncpus - 2 > 20 {
        20
    } else {
        ncpus - 2
    };

    n.clamp(1, MAX_THREADS)
}

/// Clamps a user-requested worker count into `[1, MAX_THREADS]`.
pub fn clamp_worker_count(requested: usize) -> usize {
    requested.clamp(1, MAX_THREADS)
}

/// Picks how many of the `num_workers` threads spend their first phase
/// reading the dictionary, rather than waiting to solve: proportional
/// to the file size, capped at `MAX_READERS` (virtual hosts stop
/// scaling well past that) and never more than `num_workers`.
pub fn reader_count(file_len: usize, num_workers: usize) -> usize {
    let by_size = (file_len / (8 * context::READ_CHUNK)).max(1);
    by_size.min(MAX_READERS).min(num_workers).max(1)
}

/// Runs the full pipeline over `data` using `num_workers` worker
/// threads, returning the fully populated [`SharedState`] once every
/// solver has finished.
pub fn run(data: &[u8], num_workers: usize) -> Arc<SharedState> {
    let num_readers = reader_count(data.len(), num_workers);
    let max_words = context::max_candidate_words(data.len());
    let shared = Arc::new(SharedState::new(max_words, num_readers, num_workers));

    log::debug!(
        "starting pipeline: {} workers, {} readers, {} candidate word slots",
        num_workers,
        num_readers,
        max_words
    );

    thread::scope(|scope| {
        // Reader threads for indices 1..num_readers; each becomes a
        // solver once its chunk loop runs dry.
        for reader_index in 1..num_readers {
            let shared = Arc::clone(&shared);
            scope.spawn(move || {
                reader::run(data, reader_index, &shared.reader);
                if shared.pool.finish_order.fetch_add(1, Ordering::AcqRel) == 0 {
                    log::debug!("reader {reader_index} was the first to finish reading");
                }
                busy_wait_and_solve(&shared);
            });
        }

        // Threads that exist purely to solve: spawned up front (see
        // the module doc comment for why this departs from the
        // original's lazy creation without changing the result).
        for _ in num_readers..num_workers {
            let shared = Arc::clone(&shared);
            scope.spawn(move || busy_wait_and_solve(&shared));
        }

        // The coordinator only claims chunks itself when there are few
        // enough readers that it's worth it (1 or 2); past that, it
        // stays free to run the integrator while the dedicated reader
        // threads above do all the reading, and simply counts itself
        // as an already-finished reader.
        if num_readers <= 2 {
            reader::run(data, 0, &shared.reader);
        } else {
            shared.reader.readers_done.fetch_add(1, Ordering::AcqRel);
        }
        shared.pool.finish_order.fetch_add(1, Ordering::AcqRel);

        // The coordinator runs the integrator itself, concurrently with
        // any reader threads still finishing their chunk loop.
        let hash_capacity = context::next_prime((3 * max_words.max(16)).max(97));
        let integrated = integrator::integrate(&shared.reader, hash_capacity);
        log::debug!(
            "integrated {} unique words from {} candidates",
            integrated.unique_keys.len(),
            shared.reader.word_count.load(Ordering::Relaxed)
        );

        build_solve_data(&shared, integrated);

        shared.pool.go_solve.store(true, Ordering::Release);
        log::debug!("coordinator signaled go_solve; entering solve loop");

        solve_work(&shared);

        while (shared.pool.solvers_done.load(Ordering::Acquire) as usize) < num_workers - 1 {
            hint::spin_loop();
        }
    });

    log::debug!(
        "pipeline complete: {} solutions",
        shared
            .solve
            .get()
            .map(|s| s.solution_count.load(Ordering::Relaxed))
            .unwrap_or(0)
    );

    shared
}

/// A thread whose entire role is to solve: busy-waits on `go_solve`,
/// then runs the solve loop, then reports itself done. Also the
/// continuation a reader thread runs once it is done reading.
fn busy_wait_and_solve(shared: &SharedState) {
    while !shared.pool.go_solve.load(Ordering::Acquire) {
        hint::spin_loop();
    }
    solve_work(shared);
    shared.pool.solvers_done.fetch_add(1, Ordering::AcqRel);
}

/// One worker's two-phase claim loop: first over bucket 0 (never
/// skipped), then over bucket 1 (always skipped). This encodes the
/// "skip at most one bucket" rule at the top level instead of inside
/// `search`.
fn solve_work(shared: &SharedState) {
    let solve = shared
        .solve
        .get()
        .expect("solve data is built before go_solve is ever observed true");
    let reader = &shared.reader;

    let bucket0 = &solve.buckets[0];
    loop {
        let pos = bucket0.cursor.fetch_add(1, Ordering::Relaxed) as usize;
        if pos >= bucket0.length {
            break;
        }
        let key = bucket0.keys(&solve.arena)[pos];
        solver::search_from(solve, reader, 1, key, false);
    }

    let bucket1 = &solve.buckets[1];
    loop {
        let pos = bucket1.cursor.fetch_add(1, Ordering::Relaxed) as usize;
        if pos >= bucket1.length {
            break;
        }
        let key = bucket1.keys(&solve.arena)[pos];
        solver::search_from(solve, reader, 2, key, true);
    }
}

fn build_solve_data(shared: &SharedState, integrated: integrator::Integrated) {
    let partitioned = partition::partition(integrated.unique_keys, integrated.global_freq);
    log::debug!(
        "partitioned into buckets; min_search_depth = {}",
        partitioned.min_search_depth
    );

    let solutions = (0..context::MAX_SOLUTIONS * context::SOLUTION_RECORD_LEN)
        .map(|_| std::sync::atomic::AtomicU8::new(0))
        .collect();

    let solve = SolveData {
        hash: integrated.hash,
        arena: partitioned.arena,
        buckets: partitioned.buckets,
        min_search_depth: partitioned.min_search_depth,
        solutions,
        solution_count: Default::default(),
    };

    shared
        .solve
        .set(solve)
        .unwrap_or_else(|_| unreachable!("solve data is only ever built once, by the coordinator"));
}

/// Reads back the emitted solution bytes, for the emitter.
pub fn solution_bytes(shared: &SharedState) -> Vec<u8> {
    let solve = shared.solve.get().expect("solve data is always built before this is called");
    let count = solve.solution_count.load(Ordering::Relaxed) as usize;
    let record_len = solve.record_len();
    solve.solutions[..count * record_len]
        .iter()
        .map(|b| b.load(Ordering::Relaxed))
        .collect()
}
