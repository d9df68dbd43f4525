//! Drains the reader staging area into the word hash map and the final
//! array of unique word masks (anagrams collapsed to one representative).
//!
//! Runs single-threaded on the coordinator, concurrently with the reader
//! threads that are still publishing into `staging`.

use std::hint;
use std::sync::atomic::Ordering;

use crate::context::ReaderState;
use crate::hashmap::WordHashMap;
use crate::mask::{Mask, LETTER_COUNT};

/// Output of draining the staging area: the deduplicated key array and
/// the reduced 26-letter frequency vector.
pub struct Integrated {
    pub hash: WordHashMap,
    pub unique_keys: Vec<Mask>,
    pub global_freq: [u32; LETTER_COUNT],
}

/// Walks `state.staging` from position 0, inserting every published mask
/// into a fresh hash map and appending genuinely new ones to the unique
/// key array. Spins on a not-yet-published slot rather than assuming
/// publish order matches position order. Returns once every reader has
/// signaled done and every published position has been drained.
pub fn integrate(state: &ReaderState, hash_capacity: usize) -> Integrated {
    let mut hash = WordHashMap::with_capacity(hash_capacity);
    let mut unique_keys = Vec::new();
    let mut pos: usize = 0;
    let mut spins: u64 = 0;

    loop {
        let word_count = state.word_count.load(Ordering::Acquire) as usize;
        if pos >= word_count {
            // Nothing left to drain right now. Only stop for good once
            // every reader is done — a reader may still be about to
            // reserve (and publish) another position.
            if state.readers_done.load(Ordering::Acquire) as usize >= state.num_readers
                && pos >= state.word_count.load(Ordering::Acquire) as usize
            {
                break;
            }
            spins += 1;
            hint::spin_loop();
            continue;
        }

        let key = state.staging[pos].load(Ordering::Acquire);
        if key == 0 {
            // Reserved but not yet published; don't advance, the reader
            // that owns this position hasn't finished its store yet.
            spins += 1;
            hint::spin_loop();
            continue;
        }

        match hash.insert(key, pos as u32) {
            Ok(true) => unique_keys.push(key),
            Ok(false) => {} // anagram of an already-seen word; discard
            Err(msg) => panic!("{msg}"),
        }
        pos += 1;
    }

    log::debug!("integrator spun {spins} times draining {pos} staged words");

    let mut global_freq = [0u32; LETTER_COUNT];
    for r in 0..state.num_readers {
        for c in 0..LETTER_COUNT {
            global_freq[c] += state.reader_freq[r * LETTER_COUNT + c].load(Ordering::Relaxed);
        }
    }

    Integrated {
        hash,
        unique_keys,
        global_freq,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SharedState;
    use crate::mask::letter_bit;

    fn mask_of(word: &str) -> Mask {
        word.bytes().fold(0, |m, b| m | letter_bit(b))
    }

    #[test]
    fn dedups_anagrams_to_a_single_key() {
        let shared = SharedState::new(8, 1, 1);
        let state = &shared.reader;

        for (pos, word) in ["abcde", "abcde", "edcba"].iter().enumerate() {
            let mask = mask_of(word);
            for (i, &b) in word.as_bytes().iter().enumerate() {
                state.words_text[pos * 5 + i].store(b, Ordering::Relaxed);
            }
            state.word_count.fetch_add(1, Ordering::Relaxed);
            state.staging[pos].store(mask, Ordering::Release);
        }
        state.readers_done.fetch_add(1, Ordering::Release);

        let integrated = integrate(state, 97);
        assert_eq!(integrated.unique_keys.len(), 1);
        assert_eq!(integrated.unique_keys[0], mask_of("abcde"));
    }

    #[test]
    fn distinct_words_all_survive() {
        let shared = SharedState::new(8, 1, 1);
        let state = &shared.reader;

        for (pos, word) in ["abcde", "fghij"].iter().enumerate() {
            let mask = mask_of(word);
            state.word_count.fetch_add(1, Ordering::Relaxed);
            state.staging[pos].store(mask, Ordering::Release);
        }
        state.readers_done.fetch_add(1, Ordering::Release);

        let integrated = integrate(state, 97);
        assert_eq!(integrated.unique_keys.len(), 2);
    }

    #[test]
    fn global_frequency_sums_across_readers() {
        let shared = SharedState::new(8, 2, 2);
        let state = &shared.reader;

        state.reader_freq[0].fetch_add(3, Ordering::Relaxed); // reader 0, letter 'a'
        state.reader_freq[LETTER_COUNT].fetch_add(2, Ordering::Relaxed); // reader 1, letter 'a'
        state.readers_done.fetch_add(2, Ordering::Release);

        let integrated = integrate(state, 17);
        assert_eq!(integrated.global_freq[0], 5);
    }
}
