//! The frequency partitioner: turns the flat array of unique word masks
//! into 26 letter buckets, ordered so the rarest letters are explored
//! first by the solver.

use std::sync::atomic::AtomicU32;

use crate::mask::{letter_bit, Mask, LETTER_COUNT};

/// The collection of unique word masks assigned to one letter.
///
/// `keys` live in a single shared arena (see [`partition`]); a bucket
/// only remembers its `start`/`length` window into that arena, which is
/// the safe-Rust equivalent of the original's raw pointer-into-array
/// scheme.
pub struct Bucket {
    /// The single-bit mask of this bucket's letter.
    pub mask: Mask,
    /// The single-bit mask of the rarest letter overall; identical
    /// across every bucket.
    pub tier_mask: Mask,
    /// Offset into the shared arena where this bucket's keys start.
    pub start: usize,
    /// Number of keys belonging to this bucket.
    pub length: usize,
    /// Keys at `[0, tier_offset)` (relative to `start`) contain
    /// `tier_mask`; keys at `[tier_offset, length)` do not.
    pub tier_offset: usize,
    /// Number of dictionary words containing this bucket's letter,
    /// as observed before partitioning. Retained for diagnostics only.
    pub frequency: u32,
    /// Claimed by workers during solving via `fetch_add`.
    pub cursor: AtomicU32,
}

impl Bucket {
    /// This bucket's keys, with the tier containing `tier_mask` first.
    pub fn keys<'a>(&self, arena: &'a [Mask]) -> &'a [Mask] {
        &arena[self.start..self.start + self.length]
    }

    /// The slice of keys a solver should scan given the letters already
    /// used in the current partial solution: once the rare letter is
    /// already spoken for, keys that also contain it are redundant to
    /// revisit, so scanning starts past the first tier.
    pub fn keys_for<'a>(&self, arena: &'a [Mask], used_mask: Mask) -> &'a [Mask] {
        let keys = self.keys(arena);
        if used_mask & self.tier_mask != 0 {
            &keys[self.tier_offset..]
        } else {
            keys
        }
    }
}

fn letter_freq_in(keys: &[Mask]) -> [u32; LETTER_COUNT] {
    let mut freq = [0u32; LETTER_COUNT];
    for &key in keys {
        let mut remaining = key;
        while remaining != 0 {
            let bit = remaining.trailing_zeros() as usize;
            freq[bit] += 1;
            remaining &= remaining - 1;
        }
    }
    freq
}

/// Result of [`partition`]: the (possibly reordered in place) arena of
/// unique keys, the 26 buckets referencing windows into it, and the
/// solver's search frontier.
pub struct Partitioned {
    pub arena: Vec<Mask>,
    pub buckets: [Bucket; LETTER_COUNT],
    pub min_search_depth: i32,
}

/// Partitions `arena` (the unique word masks produced by the integrator)
/// into 26 frequency-ordered letter buckets, further split into tiers.
///
/// `global_freq[c]` must hold the number of accepted dictionary words
/// (including duplicates/anagrams) containing letter `c`.
pub fn partition(mut arena: Vec<Mask>, global_freq: [u32; LETTER_COUNT]) -> Partitioned {
    log::debug!("partitioning {} unique words into {LETTER_COUNT} buckets", arena.len());

    // Ascending by frequency, with 0 ("unused letter") pushed to the end.
    let mut order: Vec<u8> = (0..LETTER_COUNT as u8).collect();
    order.sort_by(|&a, &b| by_frequency_lo(global_freq[a as usize], global_freq[b as usize]));

    let tier_mask = letter_bit(b'a' + order[LETTER_COUNT - 1]);

    let mut starts = Vec::with_capacity(LETTER_COUNT);
    let mut lengths = Vec::with_capacity(LETTER_COUNT);
    let mut frequencies = vec![0u32; LETTER_COUNT];
    let mut take = 0usize;
    let mut min_search_depth = 0i32;

    for i in 0..LETTER_COUNT {
        if i == 6 {
            // The rarest six letters' words are already peeled off;
            // re-rank the rest by descending frequency among what's left,
            // which proves more selective for the solver's pruning.
            let residual = letter_freq_in(&arena[take..]);
            order[6..].sort_by(|&a, &b| residual[b as usize].cmp(&residual[a as usize]));
            log::debug!("rescanned residual frequencies after 6 buckets, {} words left", arena.len() - take);
        }

        let letter = order[i];
        let mask = letter_bit(b'a' + letter);
        let start = take;

        let mut j = take;
        for k in take..arena.len() {
            if arena[k] & mask != 0 {
                arena.swap(j, k);
                j += 1;
            }
        }
        take = j;

        let length = take - start;
        if length > 0 {
            min_search_depth = i as i32 - 3;
        }
        log::trace!("bucket {i} (letter {}) holds {length} keys", (b'a' + letter) as char);

        starts.push(start);
        lengths.push(length);
        frequencies[letter as usize] = global_freq[letter as usize];
    }

    let mut buckets: Vec<Bucket> = (0..LETTER_COUNT)
        .map(|i| {
            let letter = order[i];
            Bucket {
                mask: letter_bit(b'a' + letter),
                tier_mask,
                start: starts[i],
                length: lengths[i],
                tier_offset: 0,
                frequency: frequencies[letter as usize],
                cursor: AtomicU32::new(0),
            }
        })
        .collect();

    // Second pass: within each bucket, keys containing `tier_mask` first.
    for bucket in buckets.iter_mut() {
        let slice = &mut arena[bucket.start..bucket.start + bucket.length];
        let mut j = 0;
        for k in 0..slice.len() {
            if slice[k] & tier_mask != 0 {
                slice.swap(j, k);
                j += 1;
            }
        }
        bucket.tier_offset = j;
    }

    let buckets: [Bucket; LETTER_COUNT] = buckets
        .try_into()
        .unwrap_or_else(|_| unreachable!("exactly LETTER_COUNT buckets were built"));

    log::debug!(
        "partitioning done: min_search_depth = {min_search_depth}, {} non-empty buckets",
        buckets.iter().filter(|b| b.length > 0).count()
    );

    Partitioned {
        arena,
        buckets,
        min_search_depth,
    }
}

/// Ascending by frequency, with zero ("unused letter") treated as
/// infinitely large so unused letters sort last.
fn by_frequency_lo(a: u32, b: u32) -> std::cmp::Ordering {
    match (a == 0, b == 0) {
        (true, true) => std::cmp::Ordering::Equal,
        (true, false) => std::cmp::Ordering::Greater,
        (false, true) => std::cmp::Ordering::Less,
        (false, false) => a.cmp(&b),
    }
}
