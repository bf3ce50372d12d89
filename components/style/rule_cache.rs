/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The matched-properties cache.
//!
//! Elements that matched exactly the same declaration blocks, in the same
//! cascade order, compute the same non-inherited values unless those
//! values depend on inherited ones. When the parents' inherited values are
//! equal too, the whole style is the same.

use crate::applicable_declarations::{ApplicableDeclarationBlock, CascadeLevel};
use crate::cache::LRUCache;
use crate::properties::{ComputedValueFlags, InheritedStyle, PropertyDeclarationBlock};
use crate::properties::{ResetStyle, StyleBuilder};
use servo_arc::Arc;
use smallvec::SmallVec;

const RULE_CACHE_SIZE: usize = 31;

/// The outcome of consulting the cache for one cascade.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RuleCacheOutcome {
    /// The cache was not consulted.
    Disabled,
    Miss,
    /// Both property structs were reused.
    Hit,
    /// Only the non-inherited struct was reused.
    ResetHit,
}

/// The identity of a match list.
#[derive(Clone)]
struct RuleCacheKey {
    hash: u64,
    blocks: SmallVec<[(Arc<PropertyDeclarationBlock>, CascadeLevel); 8]>,
}

impl RuleCacheKey {
    fn new(declarations: &[ApplicableDeclarationBlock]) -> Self {
        let mut hash = 0u64;
        let mut blocks = SmallVec::with_capacity(declarations.len());
        for block in declarations {
            let address = &*block.source as *const PropertyDeclarationBlock as usize as u64;
            hash = hash.rotate_left(5) ^ address ^ (block.level() as u64);
            blocks.push((block.source.clone(), block.level()));
        }
        RuleCacheKey { hash, blocks }
    }

    fn matches(&self, declarations: &[ApplicableDeclarationBlock]) -> bool {
        self.blocks.len() == declarations.len() &&
            self.blocks
                .iter()
                .zip(declarations)
                .all(|((source, level), block)| {
                    *level == block.level() && Arc::ptr_eq(source, &block.source)
                })
    }
}

pub struct RuleCacheEntry {
    key: RuleCacheKey,
    /// `None` for styles computed without a parent.
    parent_inherited: Option<Arc<InheritedStyle>>,
    pub inherited: Arc<InheritedStyle>,
    pub reset: Arc<ResetStyle>,
    pub flags: ComputedValueFlags,
}

impl RuleCacheEntry {
    /// Whether a style whose parent has `parent_inherited` would get the
    /// same inherited values.
    pub fn same_parent_inherited(&self, parent_inherited: Option<&Arc<InheritedStyle>>) -> bool {
        match (self.parent_inherited.as_ref(), parent_inherited) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b) || **a == **b,
            _ => false,
        }
    }
}

#[derive(Default)]
pub struct RuleCache {
    entries: LRUCache<RuleCacheEntry, RULE_CACHE_SIZE>,
}

impl RuleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a freshly cascaded style may be stored. Only styles whose
    /// non-inherited values depend on nothing but the declarations are.
    pub fn is_cacheable(builder: &StyleBuilder) -> bool {
        !builder
            .flags
            .intersects(ComputedValueFlags::RESET_DEPENDS_ON_INHERITED) &&
            builder.inherited().effective_zoom == 1.
    }

    pub fn find(&mut self, declarations: &[ApplicableDeclarationBlock]) -> Option<&RuleCacheEntry> {
        if declarations.is_empty() {
            return None;
        }
        let key = RuleCacheKey::new(declarations);
        self.entries
            .lookup(|entry| entry.key.hash == key.hash && entry.key.matches(declarations))
    }

    pub fn insert(
        &mut self,
        declarations: &[ApplicableDeclarationBlock],
        parent_inherited: Option<&Arc<InheritedStyle>>,
        builder: &StyleBuilder,
    ) {
        if declarations.is_empty() || !Self::is_cacheable(builder) {
            return;
        }
        self.entries.insert(RuleCacheEntry {
            key: RuleCacheKey::new(declarations),
            parent_inherited: parent_inherited.cloned(),
            inherited: builder.inherited_arc().clone(),
            reset: builder.reset_arc().clone(),
            flags: builder.flags,
        });
    }

    pub fn clear(&mut self) {
        self.entries.evict_all();
    }
}
