//! The parallel dictionary scanner.
//!
//! Every reader thread is handed the whole memory-mapped dictionary and
//! claims fixed-size byte chunks from one shared atomic cursor
//! (`state.file_pos`); there is no static partitioning of the file among
//! readers. Each claimed chunk extracts five-letter tokens with five
//! distinct letters and publishes `(mask, position)` pairs into the
//! shared staging area for the integrator to drain.

use std::sync::atomic::Ordering;

use crate::context::{ReaderState, READ_CHUNK};
use crate::mask::{word_mask, LETTER_COUNT, WORD_LEN};

/// Runs one reader's chunk-claiming loop over the whole of `data`,
/// publishing accepted words into `state` until the shared cursor runs
/// past `data.len()`.
pub fn run(data: &[u8], reader_index: usize, state: &ReaderState) {
    let end = data.len();
    loop {
        let claimed = state.file_pos.fetch_add(READ_CHUNK, Ordering::Relaxed);
        if claimed > end {
            break;
        }
        log::trace!("reader {reader_index} claimed chunk at offset {claimed}");

        // Extend by one byte so a word split across the boundary is
        // still visible to the earlier reader, who scans past the
        // newline that ends it.
        let chunk_end = (claimed + READ_CHUNK + 1).min(end);

        let scan_start = if claimed > 0 {
            skip_to_first_newline(data, claimed, chunk_end)
        } else {
            claimed
        };

        find_words(data, scan_start, chunk_end, reader_index, state);
    }

    state.readers_done.fetch_add(1, Ordering::AcqRel);
    log::debug!("reader {reader_index} finished its chunk loop");
}

/// Returns the first byte offset after the first `'\n'` in
/// `data[start..end)`, or `end` if none is found. Used by every reader
/// except the one starting at file offset 0, so a word that was already
/// fully visible to the previous reader's one-byte overlap is never
/// double-counted.
fn skip_to_first_newline(data: &[u8], start: usize, end: usize) -> usize {
    let mut s = start;
    while s < end && data[s] != b'\n' {
        s += 1;
    }
    (s + 1).min(end)
}

/// Scans `data[start..end)` for accepted five-letter tokens, publishing
/// each one into `state`.
fn find_words(data: &[u8], start: usize, end: usize, reader_index: usize, state: &ReaderState) {
    let freq_base = reader_index * LETTER_COUNT;
    let mut i = start;

    while i < end {
        let word_start = i;
        let mut ok = true;
        for _ in 0..WORD_LEN {
            if i >= end || !data[i].is_ascii_lowercase() {
                ok = false;
                break;
            }
            i += 1;
        }

        if !ok {
            // Only the byte that failed the check is consumed, exactly
            // as the original's per-character `continue` resumes one
            // byte past it; a run of 5 lowercase letters may still
            // start later on the same line.
            i += 1;
            continue;
        }

        // A sixth letter immediately following disqualifies the
        // token; it must terminate on a non-letter byte (or EOF).
        let terminated = i >= end || !data[i].is_ascii_lowercase();
        if terminated {
            let bytes: [u8; WORD_LEN] = data[word_start..word_start + WORD_LEN]
                .try_into()
                .expect("exactly WORD_LEN bytes");
            let mask = word_mask(&bytes);
            if mask.count_ones() == WORD_LEN as u32 {
                publish(&bytes, mask, freq_base, state);
            }
        }

        // A full 5-letter run was read, whether accepted, rejected for
        // repeated letters, or extended by a sixth letter; skip to the
        // next line exactly as the original does.
        while i < end && data[i] != b'\n' {
            i += 1;
        }
        i += 1;
    }
}

fn publish(bytes: &[u8; WORD_LEN], mask: u32, freq_base: usize, state: &ReaderState) {
    let pos = state.word_count.fetch_add(1, Ordering::Relaxed);
    let text_base = pos as usize * WORD_LEN;
    for (i, &b) in bytes.iter().enumerate() {
        state.words_text[text_base + i].store(b, Ordering::Relaxed);
    }
    for &b in bytes {
        let letter = (b - b'a') as usize;
        state.reader_freq[freq_base + letter].fetch_add(1, Ordering::Relaxed);
    }
    // Published last, with Release ordering: the integrator's Acquire
    // load of a non-zero mask happens-after the word text and frequency
    // counters above become visible to it.
    state.staging[pos as usize].store(mask, Ordering::Release);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_state(max_words: usize) -> ReaderState {
        crate::context::SharedState::new(max_words, 1, 1).reader
    }

    #[test]
    fn accepts_five_distinct_letter_words() {
        let data = b"abcde\nfghij\n";
        let state = new_state(8);
        run(data, 0, &state);
        assert_eq!(state.word_count.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn rejects_six_letter_tokens() {
        let data = b"abcdef\nklmno\n";
        let state = new_state(8);
        run(data, 0, &state);
        assert_eq!(state.word_count.load(Ordering::Relaxed), 1);
        assert_eq!(state.word_at(0), *b"klmno");
    }

    #[test]
    fn rejects_repeated_letter_words() {
        let data = b"aabbc\nklmno\n";
        let state = new_state(8);
        run(data, 0, &state);
        assert_eq!(state.word_count.load(Ordering::Relaxed), 1);
        assert_eq!(state.word_at(0), *b"klmno");
    }

    #[test]
    fn rejects_uppercase_tokens() {
        let data = b"ABCDE\nklmno\n";
        let state = new_state(8);
        run(data, 0, &state);
        assert_eq!(state.word_count.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn accepts_trailing_word_without_newline() {
        let data = b"klmno";
        let state = new_state(8);
        run(data, 0, &state);
        assert_eq!(state.word_count.load(Ordering::Relaxed), 1);
        assert_eq!(state.word_at(0), *b"klmno");
    }

    #[test]
    fn skip_to_first_newline_lands_just_past_the_newline() {
        let data = b"lmno\nklmno\n";
        assert_eq!(skip_to_first_newline(data, 2, data.len()), 5);
    }

    #[test]
    fn skip_to_first_newline_without_a_newline_reaches_end() {
        let data = b"lmnoklmno";
        assert_eq!(skip_to_first_newline(data, 2, data.len()), data.len());
    }

    #[test]
    fn a_chunk_boundary_inside_a_word_is_handled_by_the_earlier_chunk_only() {
        // "klmno" starts right where an earlier chunk's one-byte overlap
        // would have ended; a later chunk must skip past it rather than
        // re-accepting the tail of the same word.
        let data = b"abcde\nklmno\n";
        let state = new_state(8);
        // Earlier chunk sees the whole word plus one overlap byte.
        find_words(data, 0, 7, 0, &state);
        // Later chunk starts mid-word and must skip to the next newline.
        let scan_start = skip_to_first_newline(data, 7, data.len());
        find_words(data, scan_start, data.len(), 0, &state);
        assert_eq!(state.word_count.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn a_leading_non_letter_byte_does_not_drop_the_rest_of_the_line() {
        // A single junk byte before a valid word must not cause the
        // whole line to be discarded; only the junk byte itself is
        // skipped before scanning resumes.
        let data = b" abcde\nfghij\n";
        let state = new_state(8);
        run(data, 0, &state);
        assert_eq!(state.word_count.load(Ordering::Relaxed), 2);
        assert_eq!(state.word_at(0), *b"abcde");
        assert_eq!(state.word_at(1), *b"fghij");
    }

    #[test]
    fn junk_mid_line_still_recovers_a_trailing_valid_word() {
        let data = b"ab abcde\nklmno\n";
        let state = new_state(8);
        run(data, 0, &state);
        assert_eq!(state.word_count.load(Ordering::Relaxed), 2);
        assert_eq!(state.word_at(0), *b"abcde");
        assert_eq!(state.word_at(1), *b"klmno");
    }

    #[test]
    fn per_reader_frequency_is_accumulated() {
        let data = b"abcde\n";
        let state = new_state(8);
        run(data, 0, &state);
        for letter in 0..5usize {
            assert_eq!(state.reader_freq[letter].load(Ordering::Relaxed), 1);
        }
        assert_eq!(state.reader_freq[5].load(Ordering::Relaxed), 0);
    }
}
