//! A small open-addressed map from word mask to the word's position.
//!
//! Used only to recover a word's letters when emitting a solution. Empty
//! slots are `key == 0`, which is safe because a real word mask always has
//! popcount 5 and can never be zero.

use crate::mask::Mask;

/// Default load factor target used by [`WordHashMap::new`]: about a third
/// full even for a saturated real-world dictionary.
pub const DEFAULT_CAPACITY: usize = 39_009;

#[derive(Clone, Copy, Default)]
struct Slot {
    key: Mask,
    pos: u32,
}

/// Open-addressed, linear-probed map from `Mask` to its word's position.
pub struct WordHashMap {
    slots: Vec<Slot>,
}

impl WordHashMap {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Builds a map with exactly `capacity` slots. Callers size this to
    /// roughly 3x the expected number of unique word masks so the linear
    /// probe stays short; see [`crate::context::next_prime`].
    pub fn with_capacity(capacity: usize) -> Self {
        WordHashMap {
            slots: vec![Slot::default(); capacity.max(1)],
        }
    }

    fn home(&self, key: Mask) -> usize {
        (((key as u64) << 26) % self.slots.len() as u64) as usize
    }

    /// Inserts `key -> pos` if `key` is not already present.
    ///
    /// Returns `true` if this was a new key (inserted), `false` if `key`
    /// was already present (the existing entry, and its `pos`, are left
    /// untouched — first insertion wins).
    pub fn insert(&mut self, key: Mask, pos: u32) -> Result<bool, &'static str> {
        debug_assert_ne!(key, 0);

        let mut idx = self.home(key);
        for _ in 0..self.slots.len() {
            let slot = &mut self.slots[idx];
            if slot.key == key {
                return Ok(false);
            }
            if slot.key == 0 {
                slot.key = key;
                slot.pos = pos;
                return Ok(true);
            }
            idx += 1;
            if idx == self.slots.len() {
                idx = 0;
            }
        }
        Err("word hash map is full")
    }

    /// Looks up the position recorded for `key`, if any.
    pub fn lookup(&self, key: Mask) -> Option<u32> {
        let mut idx = self.home(key);
        for _ in 0..self.slots.len() {
            let slot = &self.slots[idx];
            if slot.key == 0 {
                return None;
            }
            if slot.key == key {
                return Some(slot.pos);
            }
            idx += 1;
            if idx == self.slots.len() {
                idx = 0;
            }
        }
        None
    }
}

impl Default for WordHashMap {
    fn default() -> Self {
        Self::new()
    }
}
