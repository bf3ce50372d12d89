/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The style bloom filter is used as an optimization when matching deep
//! descendant selectors.

#![deny(missing_docs)]

use crate::dom::TElement;
use log::{debug, warn};
use precomputed_hash::PrecomputedHash;
use selectors::bloom::{BloomFilter, BLOOM_HASH_MASK};
use smallvec::SmallVec;

/// A struct that allows us to fast-reject deep descendant selectors avoiding
/// selector-matching.
///
/// This is implemented using a counting bloom filter, and it's a standard
/// optimization. See Gecko's `AncestorFilter`, and Blink's and WebKit's
/// `SelectorFilter`.
///
/// The filter holds the hashes of exactly the elements on the stack, which
/// during a depth-first traversal is the chain of ancestors of the element
/// being styled. When an element is styled out of that order, the stack is
/// brought back in line by popping to a common ancestor and pushing the
/// missing parents, or rebuilt from the root if that fails. A filter that
/// cannot be shown to describe the element's ancestors is never handed out
/// (see `filter_for`), so matching falls back to the unfiltered path.
pub struct StyleBloom<E: TElement> {
    /// The bloom filter. Boxed since it is a few kilobytes.
    filter: Box<BloomFilter>,

    /// The stack of elements that this bloom filter contains, along with the
    /// number of hashes pushed for each element.
    elements: SmallVec<[PushedElement<E>; 16]>,

    /// Stack of hashes that have been pushed onto this filter.
    pushed_hashes: SmallVec<[u32; 64]>,

    /// How many times the stack had to be rebuilt from the root.
    rebuilds: usize,
}

/// The very rough benchmarks in the selectors crate show clear()
/// costing about 25 times more than remove_hash(). We use this to implement
/// clear() more efficiently when only a small number of hashes have been
/// pushed.
///
/// One subtly to note is that remove_hash() will not touch the value
/// if the filter overflowed. However, overflow can only occur if we
/// get 255 collisions on the same hash value, and 25 < 255.
const MEMSET_CLEAR_THRESHOLD: usize = 25;

struct PushedElement<E: TElement> {
    /// The element that was pushed.
    element: E,

    /// The number of hashes pushed for the element.
    num_hashes: usize,
}

/// Calls `f` with the hash of every identifier of `element` a selector can
/// require of an ancestor: local name, namespace, id and classes.
pub fn each_relevant_element_hash<E, F>(element: E, mut f: F)
where
    E: TElement,
    F: FnMut(u32),
{
    f(element.local_name().precomputed_hash() & BLOOM_HASH_MASK);
    f(element.namespace().precomputed_hash() & BLOOM_HASH_MASK);

    if let Some(id) = element.id() {
        f(id.precomputed_hash() & BLOOM_HASH_MASK);
    }

    element.each_class(|class| f(class.precomputed_hash() & BLOOM_HASH_MASK));
}

impl<E: TElement> Default for StyleBloom<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: TElement> StyleBloom<E> {
    /// Create an empty `StyleBloom`.
    pub fn new() -> Self {
        StyleBloom {
            filter: Box::new(BloomFilter::new()),
            elements: Default::default(),
            pushed_hashes: Default::default(),
            rebuilds: 0,
        }
    }

    /// Return the bloom filter used properly by the `selectors` crate.
    pub fn filter(&self) -> &BloomFilter {
        &self.filter
    }

    /// Returns the filter if it holds exactly the ancestors of `element`,
    /// which is at depth `element_depth`.
    pub fn filter_for(&self, element: E, element_depth: usize) -> Option<&BloomFilter> {
        if self.elements.len() != element_depth || self.current_parent() != element.parent_element() {
            return None;
        }
        Some(&self.filter)
    }

    /// Push an element to the bloom filter, knowing that it's a child of the
    /// last element parent.
    ///
    /// If it is not, the filter is rebuilt for the element first.
    pub fn push(&mut self, element: E) {
        if self.current_parent() != element.parent_element() {
            warn!(
                "{:?} pushed out of order onto the ancestor filter, rebuilding",
                element
            );
            self.rebuild(element);
        }
        self.push_internal(element);
    }

    /// Same as `push`, but without checking the parent, in order to use it
    /// from `rebuild`.
    fn push_internal(&mut self, element: E) {
        let mut count = 0;
        let filter = &mut self.filter;
        let pushed_hashes = &mut self.pushed_hashes;
        each_relevant_element_hash(element, |hash| {
            count += 1;
            filter.insert_hash(hash);
            pushed_hashes.push(hash);
        });
        self.elements.push(PushedElement {
            element,
            num_hashes: count,
        });
    }

    /// Pop the last element in the bloom filter and return it.
    #[inline]
    pub fn pop(&mut self) -> Option<E> {
        let PushedElement {
            element,
            num_hashes,
        } = self.elements.pop()?;

        // Verify that the pushed hashes match the ones we'd get from the element.
        let mut expected_hashes = vec![];
        if cfg!(debug_assertions) {
            each_relevant_element_hash(element, |hash| expected_hashes.push(hash));
        }

        for _ in 0..num_hashes {
            let hash = match self.pushed_hashes.pop() {
                Some(hash) => hash,
                None => break,
            };
            debug_assert_eq!(expected_hashes.pop(), Some(hash));
            self.filter.remove_hash(hash);
        }

        Some(element)
    }

    /// Returns true if the bloom filter is empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the DOM depth of elements that can be correctly
    /// matched against the bloom filter (that is, the number of
    /// elements in our list).
    pub fn matching_depth(&self) -> usize {
        self.elements.len()
    }

    /// How many times the filter was rebuilt from the root.
    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }

    /// Clears the bloom filter.
    pub fn clear(&mut self) {
        self.elements.clear();

        if self.pushed_hashes.len() > MEMSET_CLEAR_THRESHOLD {
            self.filter.clear();
            self.pushed_hashes.clear();
        } else {
            for hash in self.pushed_hashes.drain(..) {
                self.filter.remove_hash(hash);
            }
            debug_assert!(self.filter.is_zeroed());
        }
    }

    /// Rebuilds the bloom filter up to the parent of the given element.
    pub fn rebuild(&mut self, mut element: E) {
        self.clear();
        self.rebuilds += 1;

        let mut parents_to_insert = SmallVec::<[E; 16]>::new();
        while let Some(parent) = element.parent_element() {
            parents_to_insert.push(parent);
            element = parent;
        }

        for parent in parents_to_insert.drain(..).rev() {
            self.push_internal(parent);
        }
    }

    /// Get the element that represents the chain of things inserted
    /// into the filter right now.  That chain is the given element
    /// (if any) and its ancestors.
    #[inline]
    pub fn current_parent(&self) -> Option<E> {
        self.elements.last().map(|el| el.element)
    }

    /// Insert the parents of an element in the bloom filter, trying to recover
    /// the filter if the last element inserted doesn't match.
    ///
    /// Gets the element depth in the dom, to make it efficient.
    pub fn insert_parents_recovering(&mut self, element: E, element_depth: usize) {
        // Easy case, we're in a different restyle, or we're empty.
        if self.elements.is_empty() {
            if element.parent_element().is_some() {
                self.rebuild(element);
            }
            return;
        }

        let parent = match element.parent_element() {
            Some(parent) => parent,
            None => {
                // Yay, another easy case.
                self.clear();
                return;
            },
        };

        if self.current_parent() == Some(parent) {
            // Ta da, cache hit, we're all done.
            return;
        }

        if element_depth == 0 {
            self.clear();
            return;
        }

        // Now the fun begins: We have the depth of the dom and the depth of the
        // last element inserted in the filter, let's try to find a common
        // parent.
        //
        // The current depth, that is, the depth of the last element inserted in
        // the bloom filter, is the number of elements _minus one_, that is: if
        // there's one element, it must be the root -> depth zero.
        let mut current_depth = self.elements.len() - 1;

        // If the filter represents an element too deep in the dom, we need to
        // pop ancestors.
        while current_depth > element_depth - 1 {
            self.pop();
            current_depth -= 1;
        }

        // Now let's try to find a common parent in the bloom filter chain,
        // starting with the parent.
        let mut common_parent = parent;
        let mut common_parent_depth = element_depth - 1;

        // Let's collect the parents we are going to need to insert once we've
        // found the common one.
        let mut parents_to_insert = SmallVec::<[E; 16]>::new();

        // If the bloom filter still doesn't have enough elements, the common
        // parent is up in the dom.
        while common_parent_depth > current_depth {
            parents_to_insert.push(common_parent);
            common_parent = match common_parent.parent_element() {
                Some(parent) => parent,
                None => return self.recover_by_rebuilding(element),
            };
            common_parent_depth -= 1;
        }

        // Happy case: The parents match, we only need to push the ancestors
        // we've collected and we'll never enter in this loop.
        //
        // Not-so-happy case: Parent's don't match, so we need to keep going up
        // until we find a common ancestor.
        while self.current_parent() != Some(common_parent) {
            parents_to_insert.push(common_parent);
            self.pop();
            common_parent = match common_parent.parent_element() {
                Some(parent) => parent,
                // Not in the same tree as what we were styling before.
                None => return self.recover_by_rebuilding(element),
            };
        }

        // Now the parents match, so insert the stack of elements we have been
        // collecting so far.
        for parent in parents_to_insert.drain(..).rev() {
            self.push_internal(parent);
        }

        if self.elements.len() != element_depth {
            self.recover_by_rebuilding(element);
        }
    }

    fn recover_by_rebuilding(&mut self, element: E) {
        debug!("No common ancestor with the ancestor filter for {:?}", element);
        self.rebuild(element);
    }
}
