/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Applicable declarations management.

use crate::properties::{Importance, PropertyDeclaration, PropertyDeclarationBlock};
use crate::stylesheets::Origin;
use servo_arc::Arc;
use smallvec::SmallVec;

/// List of applicable declarations. This is a transient structure that
/// shuttles declarations between selector matching and the cascade, and
/// therefore we want to avoid heap-allocation where possible.
pub type ApplicableDeclarationList = SmallVec<[ApplicableDeclarationBlock; 16]>;

/// The group a matched block was collected in. Groups are ordered by
/// increasing priority for normal declarations.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum CascadeLevel {
    UANormal,
    UserNormal,
    AuthorNormal,
    /// Declarations from the element's `style` attribute.
    StyleAttributeNormal,
}

impl CascadeLevel {
    pub fn origin(self) -> Origin {
        match self {
            CascadeLevel::UANormal => Origin::UserAgent,
            CascadeLevel::UserNormal => Origin::User,
            CascadeLevel::AuthorNormal | CascadeLevel::StyleAttributeNormal => Origin::Author,
        }
    }

    pub fn for_origin(origin: Origin) -> Self {
        match origin {
            Origin::UserAgent => CascadeLevel::UANormal,
            Origin::User => CascadeLevel::UserNormal,
            Origin::Author => CascadeLevel::AuthorNormal,
        }
    }
}

/// Stores the source order of a block and the cascade level it belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct ApplicableDeclarationBits {
    source_order: u32,
    cascade_level: CascadeLevel,
}

impl ApplicableDeclarationBits {
    fn new(source_order: u32, cascade_level: CascadeLevel) -> Self {
        Self {
            source_order,
            cascade_level,
        }
    }

    fn source_order(&self) -> u32 {
        self.source_order
    }

    fn level(&self) -> CascadeLevel {
        self.cascade_level
    }
}

/// A property declaration block together with its precedence among rules
/// of equal specificity so that we can sort them.
#[derive(Clone, Debug)]
pub struct ApplicableDeclarationBlock {
    /// The declarations of the matched rule, or the style attribute.
    pub source: Arc<PropertyDeclarationBlock>,
    /// The bits containing the source order and cascade level.
    bits: ApplicableDeclarationBits,
    /// The specificity of the selector this block is represented by.
    pub specificity: u32,
}

impl ApplicableDeclarationBlock {
    /// Constructs an applicable declaration block from a given property
    /// declaration block, e.g. a style attribute.
    #[inline]
    pub fn from_declarations(declarations: Arc<PropertyDeclarationBlock>, level: CascadeLevel) -> Self {
        ApplicableDeclarationBlock {
            source: declarations,
            bits: ApplicableDeclarationBits::new(0, level),
            specificity: 0,
        }
    }

    /// Constructs an applicable declaration block from the given components
    #[inline]
    pub fn new(
        source: Arc<PropertyDeclarationBlock>,
        order: u32,
        level: CascadeLevel,
        specificity: u32,
    ) -> Self {
        ApplicableDeclarationBlock {
            source,
            bits: ApplicableDeclarationBits::new(order, level),
            specificity,
        }
    }

    /// Returns the source order of the block.
    #[inline]
    pub fn source_order(&self) -> u32 {
        self.bits.source_order()
    }

    /// Returns the cascade level of the block.
    #[inline]
    pub fn level(&self) -> CascadeLevel {
        self.bits.level()
    }

    /// The key rules of one origin are stably sorted by.
    #[inline]
    pub fn sort_key(&self) -> (u32, u32) {
        (self.specificity, self.source_order())
    }
}

/// Iterates the declarations of a sorted match list from lowest to highest
/// priority: normal declarations group by group, then important author
/// (style attribute last), user and user-agent declarations.
pub fn declarations_in_priority_order<'a>(
    list: &'a [ApplicableDeclarationBlock],
) -> impl Iterator<Item = &'a PropertyDeclaration> + 'a {
    let normal = list
        .iter()
        .flat_map(|block| block.source.declarations_with_importance(Importance::Normal));
    let important = [Origin::Author, Origin::User, Origin::UserAgent]
        .into_iter()
        .flat_map(move |origin| {
            list.iter()
                .filter(move |block| block.level().origin() == origin)
                .flat_map(|block| block.source.declarations_with_importance(Importance::Important))
        });
    normal.chain(important)
}
