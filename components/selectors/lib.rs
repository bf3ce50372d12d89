/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Selector data model, the counting bloom filter used for ancestor
//! rejection, and the combinator-walking matcher.

pub mod attr;
pub mod bloom;
pub mod builder;
pub mod context;
pub mod element_state;
pub mod matching;
pub mod nth;
pub mod parser;
mod tree;

/// Interned string used for tag names, namespaces, ids, classes and
/// attribute names.
pub type Atom = string_cache::DefaultAtom;

pub use crate::builder::SelectorBuilder;
pub use crate::context::{MatchingContext, QuirksMode, StyleRelations, VisitedHandlingMode};
pub use crate::element_state::ElementState;
pub use crate::matching::{matches_complex_selector, matches_selector, matches_selector_list};
pub use crate::matching::{ElementSelectorFlags, SelectorMatchingResult};
pub use crate::nth::{AnPlusB, AnPlusBError};
pub use crate::parser::{AncestorHashes, Combinator, Component, NonTSPseudoClass, PseudoElement};
pub use crate::parser::{Selector, SelectorError, SelectorList, Specificity};
pub use crate::tree::{Element, OpaqueElement};
