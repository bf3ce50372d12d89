/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Hash collections keyed by atoms.
//!
//! Atoms carry a precomputed hash, so the cheap Fx hasher is enough for
//! every map in the style system.

pub use std::collections::{HashMap, HashSet};

/// Appropriate reexports of hash_map types
pub mod map {
    pub use std::collections::hash_map::{Entry, Iter};
}

/// Hash map that uses the Fx hasher
pub type FxHashMap<K, V> = HashMap<K, V, fxhash::FxBuildHasher>;
/// Hash set that uses the Fx hasher
pub type FxHashSet<T> = HashSet<T, fxhash::FxBuildHasher>;
