/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Types and traits used to access the DOM from style calculation.

#![deny(missing_docs)]

use crate::context::VisitedLinkOracle;
use crate::data::ElementData;
use crate::properties::{ComputedValues, LinkState, PropertyDeclarationBlock};
use atomic_refcell::{AtomicRef, AtomicRefMut};
use selectors::matching::ElementSelectorFlags;
use selectors::{Atom, Element};
use servo_arc::Arc;
use std::hash::Hash;

/// The element trait, the main abstraction the style crate acts over.
///
/// Implementations are cheap handles (an arena index plus a document
/// reference, say), compared by identity.
pub trait TElement: Element + Copy + Eq + Hash {
    /// Get this element's first element child.
    fn first_element_child(&self) -> Option<Self>;

    /// Get this element's last element child.
    fn last_element_child(&self) -> Option<Self>;

    /// The number of ancestors of this element. The root has depth zero.
    fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = *self;
        while let Some(parent) = current.parent_element() {
            depth += 1;
            current = parent;
        }
        depth
    }

    /// Get this element's style attribute.
    fn style_attribute(&self) -> Option<&Arc<PropertyDeclarationBlock>>;

    /// Immutably borrows the ElementData.
    fn borrow_data(&self) -> Option<AtomicRef<ElementData>>;

    /// Mutably borrows the ElementData.
    fn mutate_data(&self) -> Option<AtomicRefMut<ElementData>>;

    /// The selector flags recorded on this element while matching it and
    /// its children.
    fn selector_flags(&self) -> ElementSelectorFlags;

    /// Whether this element is a form control, whose `type` and `readonly`
    /// attributes take part in style sharing decisions.
    fn is_form_control(&self) -> bool {
        false
    }

    /// The URL this link points to, for the visited-link lookup.
    fn link_href(&self) -> Option<&str> {
        if !self.is_link() {
            return None;
        }
        self.attr(&Atom::from("href"))
    }

    /// Whether this element is a link, and if so whether `visited_links`
    /// knows its target.
    fn link_state(&self, visited_links: &dyn VisitedLinkOracle) -> LinkState {
        if !self.is_link() {
            return LinkState::NotALink;
        }
        match self.link_href() {
            Some(url) if visited_links.is_visited(url) => LinkState::Visited,
            _ => LinkState::Unvisited,
        }
    }

    /// The link whose history decides this element's visited variant: the
    /// element itself or its nearest link ancestor.
    fn relevant_link(&self) -> Option<Self> {
        let mut current = Some(*self);
        while let Some(element) = current {
            if element.is_link() {
                return Some(element);
            }
            current = element.parent_element();
        }
        None
    }

    /// The element's primary style, if it has been styled.
    fn primary_style(&self) -> Option<Arc<ComputedValues>> {
        let data = self.borrow_data()?;
        data.styles.primary.clone()
    }

    /// Whether the element has been styled.
    fn has_data(&self) -> bool {
        self.borrow_data().map_or(false, |data| data.has_styles())
    }
}
