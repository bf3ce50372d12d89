/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Counting bloom filter over the identifier hashes of an element's
//! ancestors.

use fxhash::FxHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

// Only the low 24 bits of a hash are consumed by the two probes.
pub const BLOOM_HASH_MASK: u32 = 0x00ffffff;
const KEY_SIZE: usize = 12;

const ARRAY_SIZE: usize = 1 << KEY_SIZE;
const KEY_MASK: u32 = (1 << KEY_SIZE) - 1;

/// A counting Bloom filter with 8-bit counters and two hash functions,
/// derived from the low and high halves of a 24-bit hash.
///
/// With 2^12 slots, a few hundred ancestor identifiers give false positive
/// rates on the order of 0.25-4%. False negatives are impossible as long as
/// every `remove_hash` is paired with an earlier `insert_hash` of the same
/// value: a counter that saturates at 0xff is never decremented again, so
/// it can only err towards "maybe present".
pub struct BloomFilter {
    counters: Box<[u8; ARRAY_SIZE]>,
}

impl Clone for BloomFilter {
    #[inline]
    fn clone(&self) -> BloomFilter {
        BloomFilter {
            counters: self.counters.clone(),
        }
    }
}

impl fmt::Debug for BloomFilter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let occupied = self.counters.iter().filter(|c| **c != 0).count();
        write!(f, "BloomFilter {{ occupied slots: {} }}", occupied)
    }
}

impl Default for BloomFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl BloomFilter {
    /// Creates a new, empty bloom filter.
    #[inline]
    pub fn new() -> BloomFilter {
        BloomFilter {
            counters: Box::new([0; ARRAY_SIZE]),
        }
    }

    #[inline]
    fn first_slot(&self, hash: u32) -> &u8 {
        &self.counters[hash1(hash) as usize]
    }

    #[inline]
    fn first_mut_slot(&mut self, hash: u32) -> &mut u8 {
        &mut self.counters[hash1(hash) as usize]
    }

    #[inline]
    fn second_slot(&self, hash: u32) -> &u8 {
        &self.counters[hash2(hash) as usize]
    }

    #[inline]
    fn second_mut_slot(&mut self, hash: u32) -> &mut u8 {
        &mut self.counters[hash2(hash) as usize]
    }

    #[inline]
    pub fn clear(&mut self) {
        self.counters.iter_mut().for_each(|c| *c = 0);
    }

    /// Whether no counter is set. Only used to verify stack discipline.
    pub fn is_zeroed(&self) -> bool {
        self.counters.iter().all(|c| *c == 0)
    }

    #[inline]
    pub fn insert_hash(&mut self, hash: u32) {
        let slot1 = self.first_mut_slot(hash);
        if !full(slot1) {
            *slot1 += 1
        }
        let slot2 = self.second_mut_slot(hash);
        if !full(slot2) {
            *slot2 += 1
        }
    }

    /// Inserts an item into the bloom filter.
    #[inline]
    pub fn insert<T: Hash>(&mut self, elem: &T) {
        self.insert_hash(hash(elem))
    }

    #[inline]
    pub fn remove_hash(&mut self, hash: u32) {
        let slot1 = self.first_mut_slot(hash);
        debug_assert!(*slot1 != 0, "removing a hash that was never inserted");
        if !full(slot1) && *slot1 != 0 {
            *slot1 -= 1
        }
        let slot2 = self.second_mut_slot(hash);
        debug_assert!(*slot2 != 0, "removing a hash that was never inserted");
        if !full(slot2) && *slot2 != 0 {
            *slot2 -= 1
        }
    }

    /// Removes an item from the bloom filter.
    #[inline]
    pub fn remove<T: Hash>(&mut self, elem: &T) {
        self.remove_hash(hash(elem))
    }

    #[inline]
    pub fn might_contain_hash(&self, hash: u32) -> bool {
        *self.first_slot(hash) != 0 && *self.second_slot(hash) != 0
    }

    /// Check whether the filter might contain an item. This can return
    /// true even if the item is not in the filter, but never returns false
    /// for an item that is.
    #[inline]
    pub fn might_contain<T: Hash>(&self, elem: &T) -> bool {
        self.might_contain_hash(hash(elem))
    }
}

#[inline]
fn full(slot: &u8) -> bool {
    *slot == 0xff
}

fn hash<T: Hash>(elem: &T) -> u32 {
    let mut hasher = FxHasher::default();
    elem.hash(&mut hasher);
    let hash: u64 = hasher.finish();
    (hash >> 32) as u32 ^ (hash as u32)
}

#[inline]
fn hash1(hash: u32) -> u32 {
    hash & KEY_MASK
}

#[inline]
fn hash2(hash: u32) -> u32 {
    (hash >> KEY_SIZE) & KEY_MASK
}
