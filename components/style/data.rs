/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Per-node data used in style calculation.

#![deny(missing_docs)]

use crate::properties::ComputedValues;
use selectors::parser::EAGER_PSEUDO_COUNT;
use selectors::PseudoElement;
use servo_arc::Arc;
use std::fmt;

/// A set of styles for a given element's eager pseudo-elements, indexed by
/// `PseudoElement::eager_index`.
#[derive(Clone, Default)]
pub struct EagerPseudoStyles([Option<Arc<ComputedValues>>; EAGER_PSEUDO_COUNT]);

impl EagerPseudoStyles {
    /// Returns whether there are any pseudo styles.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|style| style.is_none())
    }

    /// Gets the style for the eager pseudo-element `pseudo`, if any.
    pub fn get(&self, pseudo: &PseudoElement) -> Option<&Arc<ComputedValues>> {
        let index = pseudo.eager_index()?;
        self.0[index].as_ref()
    }

    /// Sets the style for the eager pseudo-element `pseudo`. Lazy
    /// pseudo-elements are never stored.
    pub fn set(&mut self, pseudo: &PseudoElement, style: Arc<ComputedValues>) {
        if let Some(index) = pseudo.eager_index() {
            self.0[index] = Some(style);
        }
    }

    /// Clears the style for the eager pseudo-element `pseudo`.
    pub fn take(&mut self, pseudo: &PseudoElement) -> Option<Arc<ComputedValues>> {
        let index = pseudo.eager_index()?;
        self.0[index].take()
    }

    /// Iterates the stored styles with their pseudo-element.
    pub fn iter(&self) -> impl Iterator<Item = (PseudoElement, &Arc<ComputedValues>)> {
        self.0.iter().enumerate().filter_map(|(index, style)| {
            let style = style.as_ref()?;
            Some((PseudoElement::from_eager_index(index), style))
        })
    }
}

// Print which pseudos are set, not their styles.
impl fmt::Debug for EagerPseudoStyles {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|(pseudo, _)| pseudo))
            .finish()
    }
}

/// The styles associated with a node, including the styles for any
/// pseudo-elements.
#[derive(Clone, Debug, Default)]
pub struct ElementStyles {
    /// The element's style.
    pub primary: Option<Arc<ComputedValues>>,
    /// A list of the styles for the element's eagerly-cascaded
    /// pseudo-elements.
    pub pseudos: EagerPseudoStyles,
}

impl ElementStyles {
    /// Returns the primary style.
    pub fn get_primary(&self) -> Option<&Arc<ComputedValues>> {
        self.primary.as_ref()
    }

    /// Whether this element `display` value is `none`.
    pub fn is_display_none(&self) -> bool {
        self.primary.as_ref().map_or(false, |style| style.is_display_none())
    }
}

/// Style system data associated with an Element.
///
/// Embedders keep one per element, usually behind an `AtomicRefCell`, and
/// hand it out through `TElement::borrow_data`/`mutate_data`.
#[derive(Debug, Default)]
pub struct ElementData {
    /// The styles for the element and its pseudo-elements.
    pub styles: ElementStyles,
}

impl ElementData {
    /// Returns true if this element has styles.
    #[inline]
    pub fn has_styles(&self) -> bool {
        self.styles.primary.is_some()
    }

    /// Drops any computed style, e.g. after the stylesheets changed.
    pub fn clear_styles(&mut self) {
        self.styles = ElementStyles::default();
    }
}
