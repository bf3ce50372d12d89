/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The element interface the selector matcher consumes.

use crate::attr::CaseSensitivity;
use crate::element_state::ElementState;
use crate::matching::ElementSelectorFlags;
use crate::Atom;
use std::fmt::Debug;

/// Opaque identity of an element, stable for the lifetime of the tree.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct OpaqueElement(usize);

impl OpaqueElement {
    /// Wraps an embedder-defined identity, e.g. an arena index.
    pub fn new(id: usize) -> Self {
        OpaqueElement(id)
    }

    pub fn id(&self) -> usize {
        self.0
    }
}

pub trait Element: Sized + Clone + Debug {
    fn opaque(&self) -> OpaqueElement;

    fn parent_element(&self) -> Option<Self>;

    /// Skips non-element nodes.
    fn prev_sibling_element(&self) -> Option<Self>;

    /// Skips non-element nodes.
    fn next_sibling_element(&self) -> Option<Self>;

    fn is_html_element_in_html_document(&self) -> bool;

    fn local_name(&self) -> &Atom;

    /// Empty string means no namespace.
    fn namespace(&self) -> &Atom;

    fn id(&self) -> Option<&Atom>;

    fn has_class(&self, name: &Atom, case_sensitivity: CaseSensitivity) -> bool;

    fn each_class<F>(&self, callback: F)
    where
        F: FnMut(&Atom);

    /// Looks up an attribute in the null namespace.
    fn attr(&self, local_name: &Atom) -> Option<&str>;

    fn state(&self) -> ElementState;

    /// Whether this element is a hyperlink (`:link` / `:visited` target).
    fn is_link(&self) -> bool;

    /// Whether the element has no element children and no non-empty text.
    fn is_empty(&self) -> bool;

    fn is_root(&self) -> bool;

    /// The custom pseudo-element id (`-webkit-slider-thumb` style) this
    /// element exposes inside its host, if any.
    fn custom_pseudo_element(&self) -> Option<&Atom> {
        None
    }

    /// The element a custom pseudo-element's originating compound is
    /// matched against.
    fn pseudo_element_originating_element(&self) -> Option<Self> {
        self.parent_element()
    }

    /// The element's language, looked up through its ancestors.
    fn lang(&self) -> Option<Atom> {
        let lang = Atom::from("lang");
        let mut current = Some(self.clone());
        while let Some(element) = current {
            if let Some(value) = element.attr(&lang) {
                return Some(Atom::from(value));
            }
            current = element.parent_element();
        }
        None
    }

    /// Records the selector flags raised while matching this element.
    /// Implementations store `flags.for_self()` on this element and
    /// `flags.for_parent()` on its parent, if any.
    fn apply_selector_flags(&self, flags: ElementSelectorFlags);
}
