/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! A [`@page`][page] rule.
//!
//! [page]: https://drafts.csswg.org/css2/page.html#page-box

use crate::properties::PropertyDeclarationBlock;
use bitflags::bitflags;
use selectors::Atom;
use servo_arc::Arc;
use smallvec::SmallVec;

bitflags! {
    /// The page pseudo-classes a page matches, or a selector requires.
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
    pub struct PagePseudoClassFlags: u8 {
        const FIRST = 1 << 0;
        const LEFT = 1 << 1;
        const RIGHT = 1 << 2;
        const BLANK = 1 << 3;
    }
}

impl PagePseudoClassFlags {
    /// Maps a pseudo-class name, without the colon.
    pub fn from_pseudo_class_name(name: &str) -> Option<Self> {
        Some(match &*name.to_ascii_lowercase() {
            "first" => PagePseudoClassFlags::FIRST,
            "left" => PagePseudoClassFlags::LEFT,
            "right" => PagePseudoClassFlags::RIGHT,
            "blank" => PagePseudoClassFlags::BLANK,
            _ => return None,
        })
    }
}

/// One selector of a `@page` rule, e.g. `toc:first`.
///
/// Pseudo-class names are kept as written; unknown ones are rejected when
/// the rule is indexed.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PageSelector {
    pub name: Option<Atom>,
    pub pseudo_classes: SmallVec<[Atom; 1]>,
}

impl PageSelector {
    pub fn new(name: Option<&str>, pseudo_classes: &[&str]) -> Self {
        PageSelector {
            name: name.map(Atom::from),
            pseudo_classes: pseudo_classes.iter().map(|&p| Atom::from(p)).collect(),
        }
    }

    /// Resolves the pseudo-class names, returning the first unknown one on
    /// failure.
    pub fn flags(&self) -> Result<PagePseudoClassFlags, &Atom> {
        let mut flags = PagePseudoClassFlags::empty();
        for pseudo_class in self.pseudo_classes.iter() {
            flags |= PagePseudoClassFlags::from_pseudo_class_name(pseudo_class).ok_or(pseudo_class)?;
        }
        Ok(flags)
    }

    /// <https://drafts.csswg.org/css-page-3/#cascading-and-page-context>
    ///
    /// A page name counts like an id, `:first` and `:blank` like classes,
    /// and `:left` and `:right` like type selectors.
    pub fn specificity(&self) -> u32 {
        let mut specificity = 0;
        if self.name.is_some() {
            specificity += 1 << 20;
        }
        for pseudo_class in self.pseudo_classes.iter() {
            match PagePseudoClassFlags::from_pseudo_class_name(pseudo_class) {
                Some(PagePseudoClassFlags::FIRST) | Some(PagePseudoClassFlags::BLANK) => {
                    specificity += 1 << 10
                },
                Some(_) => specificity += 1,
                None => {},
            }
        }
        specificity
    }

    /// Whether a page with the given name and pseudo-classes matches.
    pub fn matches(&self, required: PagePseudoClassFlags, name: Option<&Atom>, page: PagePseudoClassFlags) -> bool {
        let name_matches = match self.name {
            None => true,
            Some(ref own) => name == Some(own),
        };
        name_matches && page.contains(required)
    }
}

/// A `@page` rule. An empty selector list matches every page.
#[derive(Clone, Debug)]
pub struct PageRule {
    pub selectors: Vec<PageSelector>,
    pub block: Arc<PropertyDeclarationBlock>,
}

impl PageRule {
    pub fn new(selectors: Vec<PageSelector>, block: PropertyDeclarationBlock) -> Self {
        PageRule {
            selectors,
            block: Arc::new(block),
        }
    }
}
