//! The single computation context shared by every worker thread.
//!
//! The original program keeps frequency buckets, the hash table, and the
//! staging arrays as process-wide globals. Here they are collected into
//! one [`SharedState`], built once by the coordinator and handed to every
//! worker thread behind an `Arc`. The parts that are mutated concurrently
//! during the read phase are plain atomics; the parts only ever written
//! once, by the coordinator, after every reader has quiesced (the hash
//! map, the partitioned key arena, the buckets) are published through a
//! [`OnceLock`] so that no worker can observe them half-built.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, AtomicUsize};
use std::sync::OnceLock;

use crate::hashmap::WordHashMap;
use crate::mask::{Mask, LETTER_COUNT, WORD_LEN};
use crate::partition::Bucket;

/// Bytes claimed per chunk during the read phase.
pub const READ_CHUNK: usize = 10 * 1024;

/// Readers beyond this count stop paying off; matches the original's
/// observation that virtual machines don't scale well past ~14 readers.
pub const MAX_READERS: usize = 14;

/// Hard ceiling on worker threads, mirroring the `-t` clamp.
pub const MAX_THREADS: usize = 64;

/// Maximum number of solutions the preallocated output buffer can hold.
/// Generous even for the full `words_alpha.txt` dictionary, whose true
/// solution count is in the hundreds.
pub const MAX_SOLUTIONS: usize = 8192;

/// 5 words + 4 tabs + '\n'.
pub const SOLUTION_RECORD_LEN: usize = WORD_LEN * 5 + 4 + 1;

/// State mutated concurrently by reader threads and drained by the
/// integrator. Lives for the whole process.
pub struct ReaderState {
    /// Packed 5-byte word text, indexed by position.
    pub words_text: Vec<AtomicU8>,
    /// `staging[pos]` is the accepted word's mask, or 0 if not yet
    /// published by its reader.
    pub staging: Vec<AtomicU32>,
    /// Next position to hand out to an accepting reader.
    pub word_count: AtomicU32,
    /// Next byte offset to hand out as a chunk start.
    pub file_pos: AtomicUsize,
    /// Number of readers that have exited their chunk loop.
    pub readers_done: AtomicU32,
    /// Per-reader letter frequency counters, `reader_freq[r * 26 + c]`.
    pub reader_freq: Vec<AtomicU32>,
    pub num_readers: usize,
}

impl ReaderState {
    fn new(max_words: usize, num_readers: usize) -> Self {
        ReaderState {
            words_text: (0..max_words * WORD_LEN).map(|_| AtomicU8::new(0)).collect(),
            staging: (0..max_words).map(|_| AtomicU32::new(0)).collect(),
            word_count: AtomicU32::new(0),
            file_pos: AtomicUsize::new(0),
            readers_done: AtomicU32::new(0),
            reader_freq: (0..num_readers * LETTER_COUNT).map(|_| AtomicU32::new(0)).collect(),
            num_readers,
        }
    }

    /// Reads back the five letters written at `pos`. Only valid once the
    /// reader that claimed `pos` has returned (enforced by the caller
    /// waiting on `readers_done`/`word_count`).
    pub fn word_at(&self, pos: u32) -> [u8; WORD_LEN] {
        let base = pos as usize * WORD_LEN;
        let mut out = [0u8; WORD_LEN];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.words_text[base + i].load(std::sync::atomic::Ordering::Relaxed);
        }
        out
    }
}

/// State that governs the two-phase worker pool (readers become solvers).
pub struct PoolState {
    /// Set once by the coordinator after setup is complete; every worker
    /// busy-waits on this before entering its solve loop.
    pub go_solve: AtomicBool,
    /// Used by the first reader thread to finish its share to decide it
    /// is responsible for spawning the solver-only threads.
    pub finish_order: AtomicU32,
    /// Number of worker threads that have finished solving.
    pub solvers_done: AtomicU32,
    pub num_workers: usize,
}

/// Everything built once, after integration and partitioning, and never
/// mutated again except through the atomic solution-slot counters.
pub struct SolveData {
    pub hash: WordHashMap,
    pub arena: Vec<Mask>,
    pub buckets: [Bucket; LETTER_COUNT],
    pub min_search_depth: i32,
    pub solutions: Vec<AtomicU8>,
    pub solution_count: AtomicU32,
}

impl SolveData {
    pub fn record_len(&self) -> usize {
        SOLUTION_RECORD_LEN
    }
}

/// The full context shared by every worker thread, assembled once by the
/// coordinator at startup.
pub struct SharedState {
    pub reader: ReaderState,
    pub pool: PoolState,
    pub solve: OnceLock<SolveData>,
}

impl SharedState {
    pub fn new(max_words: usize, num_readers: usize, num_workers: usize) -> Self {
        SharedState {
            reader: ReaderState::new(max_words, num_readers),
            pool: PoolState {
                go_solve: AtomicBool::new(false),
                finish_order: AtomicU32::new(0),
                solvers_done: AtomicU32::new(0),
                num_workers,
            },
            solve: OnceLock::new(),
        }
    }
}

/// Upper bound on the number of five-letter candidate tokens a file of
/// `file_len` bytes could possibly contain (each token needs at least
/// five letters and one separator byte).
pub fn max_candidate_words(file_len: usize) -> usize {
    (file_len / (WORD_LEN + 1)) + 1
}

/// Smallest prime `>= n`, used to size the open-addressed hash map so
/// that the multiplicative hash spreads keys evenly.
pub fn next_prime(n: usize) -> usize {
    fn is_prime(n: usize) -> bool {
        if n < 2 {
            return false;
        }
        if n % 2 == 0 {
            return n == 2;
        }
        let mut d = 3;
        while d * d <= n {
            if n % d == 0 {
                return false;
            }
            d += 2;
        }
        true
    }

    let mut candidate = n.max(2);
    while !is_prime(candidate) {
        candidate += 1;
    }
    candidate
}
