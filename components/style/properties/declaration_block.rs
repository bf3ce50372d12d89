/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! A property declaration block.

#![deny(missing_docs)]

use super::{LonghandId, LonghandIdSet, PropertyDeclaration};
use std::fmt;
use std::iter::Zip;
use std::slice::Iter;

/// A declaration [importance][importance].
///
/// [importance]: https://drafts.csswg.org/css-cascade/#importance
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Importance {
    /// Indicates a declaration without `!important`.
    Normal,

    /// Indicates a declaration with `!important`.
    Important,
}

impl Importance {
    /// Return whether this is an important declaration.
    pub fn important(self) -> bool {
        match self {
            Importance::Normal => false,
            Importance::Important => true,
        }
    }
}

/// Overridden declarations are skipped.
#[derive(Clone, Default)]
pub struct PropertyDeclarationBlock {
    /// The group of declarations, along with their importance.
    ///
    /// Only deduplicated declarations appear here.
    declarations: Vec<PropertyDeclaration>,

    /// The importance of each declaration in `declarations`.
    declarations_importance: Vec<Importance>,

    /// The set of properties that are present in the block.
    longhands: LonghandIdSet,
}

impl fmt::Debug for PropertyDeclarationBlock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.declaration_importance_iter()).finish()
    }
}

/// Iterator over `(PropertyDeclaration, Importance)` pairs.
pub struct DeclarationImportanceIterator<'a> {
    iter: Zip<Iter<'a, PropertyDeclaration>, Iter<'a, Importance>>,
}

impl<'a> Iterator for DeclarationImportanceIterator<'a> {
    type Item = (&'a PropertyDeclaration, Importance);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(decl, &importance)| (decl, importance))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl PropertyDeclarationBlock {
    /// Returns the number of declarations in the block.
    #[inline]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Whether the block has no declarations at all. Empty blocks are never
    /// collected by matching.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Create an empty block
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a block with a single declaration
    pub fn with_one(declaration: PropertyDeclaration, importance: Importance) -> Self {
        let mut block = Self::new();
        block.push(declaration, importance);
        block
    }

    /// The declarations in this block
    #[inline]
    pub fn declarations(&self) -> &[PropertyDeclaration] {
        &self.declarations
    }

    /// Iterate over `(PropertyDeclaration, Importance)` pairs
    #[inline]
    pub fn declaration_importance_iter(&self) -> DeclarationImportanceIterator {
        DeclarationImportanceIterator {
            iter: self.declarations.iter().zip(self.declarations_importance.iter()),
        }
    }

    /// Iterate over the declarations with the given importance, in block
    /// order.
    #[inline]
    pub fn declarations_with_importance(
        &self,
        importance: Importance,
    ) -> impl Iterator<Item = &PropertyDeclaration> {
        self.declaration_importance_iter()
            .filter(move |&(_, i)| i == importance)
            .map(|(declaration, _)| declaration)
    }

    /// Returns whether this block contains any declaration with `!important`.
    #[inline]
    pub fn any_important(&self) -> bool {
        self.declarations_importance.iter().any(|i| i.important())
    }

    /// Returns whether this block contains any declaration without `!important`.
    #[inline]
    pub fn any_normal(&self) -> bool {
        self.declarations_importance.iter().any(|i| !i.important())
    }

    /// Returns a `LonghandIdSet` representing the properties that are changed in
    /// this block.
    #[inline]
    pub fn longhands(&self) -> &LonghandIdSet {
        &self.longhands
    }

    /// Returns whether this block contains a declaration of a given property id.
    #[inline]
    pub fn contains(&self, id: LonghandId) -> bool {
        self.longhands.contains(id)
    }

    /// Get a declaration for a given property.
    pub fn get(&self, id: LonghandId) -> Option<(&PropertyDeclaration, Importance)> {
        if !self.contains(id) {
            return None;
        }
        self.declaration_importance_iter()
            .find(|(declaration, _)| declaration.id == id)
    }

    /// Adds or overrides the declaration for a given property in this block.
    ///
    /// Returns whether the declaration has changed.
    pub fn push(&mut self, declaration: PropertyDeclaration, importance: Importance) -> bool {
        let id = declaration.id;
        if self.longhands.contains(id) {
            let mut index_to_remove = None;
            for (i, slot) in self.declarations.iter().enumerate() {
                if slot.id != id {
                    continue;
                }

                // A normal declaration never overrides an important one.
                if self.declarations_importance[i].important() && !importance.important() {
                    return false;
                }

                index_to_remove = Some(i);
                break;
            }

            if let Some(index) = index_to_remove {
                self.declarations.remove(index);
                self.declarations_importance.remove(index);
            }
        }

        self.longhands.insert(id);
        self.declarations.push(declaration);
        self.declarations_importance.push(importance);
        true
    }

    /// Builder-style `push`.
    pub fn with(mut self, declaration: PropertyDeclaration, importance: Importance) -> Self {
        self.push(declaration, importance);
        self
    }
}
