/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! A simple LRU cache.

#![deny(missing_docs)]

use arraydeque::{ArrayDeque, Saturating};

/// A LRU cache used to store a set of at most `N` elements at the same time.
///
/// The most-recently-used entry is at index zero.
pub struct LRUCache<T, const N: usize> {
    entries: ArrayDeque<T, N, Saturating>,
}

/// A iterator over the items of the LRU cache.
pub type LRUCacheIterator<'a, T> = arraydeque::Iter<'a, T>;

impl<T, const N: usize> Default for LRUCache<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> LRUCache<T, N> {
    /// Create a new LRU cache with `N` elements at most.
    pub fn new() -> Self {
        LRUCache {
            entries: ArrayDeque::new(),
        }
    }

    /// Returns the number of elements in the cache.
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    /// Touch a given entry, putting it first in the list.
    pub fn touch(&mut self, pos: usize) {
        if pos == 0 {
            return;
        }
        if let Some(entry) = self.entries.remove(pos) {
            // Cannot fail: an entry was just removed.
            let _ = self.entries.push_front(entry);
        }
    }

    /// Returns the front entry in the list (most recently used).
    pub fn front(&self) -> Option<&T> {
        self.entries.get(0)
    }

    /// Iterate over the contents of this cache, from more to less recently
    /// used.
    pub fn iter(&self) -> LRUCacheIterator<T> {
        self.entries.iter()
    }

    /// Finds the first entry matching `predicate`, and makes it the most
    /// recently used one.
    pub fn lookup<F>(&mut self, predicate: F) -> Option<&T>
    where
        F: FnMut(&T) -> bool,
    {
        let pos = self.entries.iter().position(predicate)?;
        self.touch(pos);
        self.front()
    }

    /// Insert a given key in the cache, evicting the least recently used
    /// entry if it is full.
    pub fn insert(&mut self, key: T) {
        if self.entries.len() == self.entries.capacity() {
            self.entries.pop_back();
        }
        let _ = self.entries.push_front(key);
        debug_assert!(self.entries.len() <= self.entries.capacity());
    }

    /// Evict all elements from the cache.
    pub fn evict_all(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::LRUCache;

    #[test]
    fn evicts_least_recently_used() {
        let mut cache = LRUCache::<u32, 3>::new();
        cache.insert(1);
        cache.insert(2);
        cache.insert(3);
        assert_eq!(cache.lookup(|&x| x == 1), Some(&1));
        cache.insert(4);
        let contents: Vec<_> = cache.iter().cloned().collect();
        assert_eq!(contents, vec![4, 1, 3]);
    }

    #[test]
    fn evict_all_empties() {
        let mut cache = LRUCache::<u32, 2>::new();
        cache.insert(7);
        cache.evict_all();
        assert_eq!(cache.num_entries(), 0);
        assert!(cache.front().is_none());
    }
}
