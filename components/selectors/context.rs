/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! State threaded through one selector-matching run.

use crate::attr::CaseSensitivity;
use crate::bloom::BloomFilter;
use crate::parser::PseudoElement;
use crate::tree::OpaqueElement;
use bitflags::bitflags;

/// The document's compatibility mode.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum QuirksMode {
    Quirks,
    LimitedQuirks,
    NoQuirks,
}

impl QuirksMode {
    #[inline]
    pub fn classes_and_ids_case_sensitivity(self) -> CaseSensitivity {
        match self {
            QuirksMode::NoQuirks | QuirksMode::LimitedQuirks => CaseSensitivity::CaseSensitive,
            QuirksMode::Quirks => CaseSensitivity::AsciiCaseInsensitive,
        }
    }
}

/// How `:link` and `:visited` are evaluated.
///
/// The primary style of every element is computed with all links treated
/// as unvisited. Visited links and the elements inside them then get a
/// second pass with `RelevantLinkVisited`, in which the relevant link (the
/// element's nearest link ancestor-or-self) matches `:visited` and not
/// `:link`. Which links are visited is decided by the caller's history
/// capability, never by matching.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VisitedHandlingMode {
    AllLinksUnvisited,
    RelevantLinkVisited,
}

bitflags! {
    /// What the matched selectors depended on. Accumulated on the
    /// matching context and stored with the resolved style, where
    /// invalidation and the style sharing cache consult it.
    #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
    pub struct StyleRelations: u16 {
        const AFFECTED_BY_HOVER = 1 << 0;
        const AFFECTED_BY_ACTIVE = 1 << 1;
        const AFFECTED_BY_FOCUS = 1 << 2;
        const AFFECTED_BY_DRAG = 1 << 3;
        /// Any other element state pseudo-class.
        const AFFECTED_BY_STATE = 1 << 4;
        const AFFECTED_BY_ID_SELECTOR = 1 << 5;
        const AFFECTED_BY_NON_COMMON_ATTRIBUTE = 1 << 6;
        /// A sibling combinator was crossed.
        const AFFECTED_BY_SIBLINGS = 1 << 7;
        /// A positional pseudo-class was evaluated against the element.
        const AFFECTED_BY_CHILD_INDEX = 1 << 8;
        const AFFECTED_BY_EMPTY = 1 << 9;
        const AFFECTED_BY_LINK = 1 << 10;
    }
}

/// Data associated with the matching process for one element.
pub struct MatchingContext<'a> {
    /// The ancestor filter, if it is known to describe the subject's
    /// ancestors exactly.
    pub bloom_filter: Option<&'a BloomFilter>,
    /// The pseudo-element being resolved, if any.
    pub pseudo_element: Option<&'a PseudoElement>,
    pub visited_handling: VisitedHandlingMode,
    /// The link that matches `:visited` when `visited_handling` is
    /// `RelevantLinkVisited`.
    pub relevant_link: Option<OpaqueElement>,
    pub quirks_mode: QuirksMode,
    /// Accumulated over every selector matched with this context.
    pub relations: StyleRelations,
    classes_and_ids_case_sensitivity: CaseSensitivity,
}

impl<'a> MatchingContext<'a> {
    pub fn new(
        bloom_filter: Option<&'a BloomFilter>,
        pseudo_element: Option<&'a PseudoElement>,
        visited_handling: VisitedHandlingMode,
        quirks_mode: QuirksMode,
    ) -> Self {
        MatchingContext {
            bloom_filter,
            pseudo_element,
            visited_handling,
            relevant_link: None,
            quirks_mode,
            relations: StyleRelations::empty(),
            classes_and_ids_case_sensitivity: quirks_mode.classes_and_ids_case_sensitivity(),
        }
    }

    #[inline]
    pub fn classes_and_ids_case_sensitivity(&self) -> CaseSensitivity {
        self.classes_and_ids_case_sensitivity
    }

    /// Runs `f` with a different target pseudo-element.
    pub fn with_pseudo_element<F, R>(&mut self, pseudo: Option<&'a PseudoElement>, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        let old = std::mem::replace(&mut self.pseudo_element, pseudo);
        let result = f(self);
        self.pseudo_element = old;
        result
    }
}
