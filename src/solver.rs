//! The depth-first search over letter buckets, and solution emission.
//!
//! This is the busiest code in the whole pipeline, so the loops are kept
//! small and the only allocation is the fixed-size `solution` array on
//! the stack.

use std::sync::atomic::Ordering;

use crate::context::{ReaderState, SolveData};
use crate::mask::{Mask, SET_SIZE};
use crate::partition::Bucket;

/// Depth-first search for 5-tuples of pairwise-disjoint keys.
///
/// `depth` is 1-based (matching the 1..=5 solution slots); `bucket_idx`
/// is the next bucket eligible to contribute a word; `used_mask` is the
/// union of letters already chosen; `skipped` is whether a bucket has
/// already been passed over without contributing a word.
#[allow(clippy::too_many_arguments)]
fn search(
    solve: &SolveData,
    reader: &ReaderState,
    depth: usize,
    bucket_idx: usize,
    solution: &mut [Mask; SET_SIZE],
    used_mask: Mask,
    skipped: bool,
) {
    if depth == SET_SIZE {
        emit_solution(solve, reader, solution);
        return;
    }

    // The frontier enforces that enough buckets remain after the one we
    // pick to complete the tuple: min_search_depth was computed so that
    // bucket (min_search_depth + depth) is the last usable one at this
    // depth.
    let frontier = solve.min_search_depth + depth as i32;
    let last = if frontier < 0 {
        return;
    } else {
        (frontier as usize).min(solve.buckets.len())
    };

    let mut skipped = skipped;
    for idx in bucket_idx..last {
        let bucket: &Bucket = &solve.buckets[idx];
        if bucket.mask & used_mask != 0 {
            continue;
        }

        for &key in bucket.keys_for(&solve.arena, used_mask) {
            if key & used_mask != 0 {
                continue;
            }
            solution[depth] = key;
            search(solve, reader, depth + 1, idx + 1, solution, used_mask | key, skipped);
        }

        if skipped {
            return;
        }
        skipped = true;
    }
}

fn emit_solution(solve: &SolveData, reader: &ReaderState, solution: &[Mask; SET_SIZE]) {
    let slot = solve.solution_count.fetch_add(1, Ordering::Relaxed) as usize;
    assert!(
        slot < crate::context::MAX_SOLUTIONS,
        "solution buffer capacity exceeded"
    );

    let record_len = solve.record_len();
    let base = slot * record_len;
    let mut offset = base;
    for (i, &key) in solution.iter().enumerate() {
        let pos = solve
            .hash
            .lookup(key)
            .expect("every search key was inserted by the integrator");
        let word = reader.word_at(pos);
        for &b in &word {
            solve.solutions[offset].store(b, Ordering::Relaxed);
            offset += 1;
        }
        let sep = if i + 1 < solution.len() { b'\t' } else { b'\n' };
        solve.solutions[offset].store(sep, Ordering::Relaxed);
        offset += 1;
    }
}

/// Enumerates every solution reachable starting with the given
/// (bucket-0-index, depth-1, already-used) seed. Used directly by unit
/// tests that want to drive the search without the worker pool.
pub fn search_from(
    solve: &SolveData,
    reader: &ReaderState,
    starting_bucket: usize,
    seed_key: Mask,
    skipped: bool,
) {
    let mut solution = [0 as Mask; SET_SIZE];
    solution[0] = seed_key;
    search(solve, reader, 1, starting_bucket, &mut solution, seed_key, skipped);
}
