/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Code related to the style sharing cache, an optimization that allows similar
//! nodes to share style without having to run selector matching twice.
//!
//! Candidates are found the way WebKit's `StyleResolver` finds them: among
//! the element's preceding siblings, then among the children of preceding
//! siblings of its ancestors ("cousins") whose ancestor chains mirror the
//! element's own. Every probe is bounded by the budgets in
//! `StyleSystemOptions`; running out of budget is an ordinary miss.
//!
//! A hit hands out the candidate's styles unchanged. That is only sound
//! when independently resolving both elements would give the same result,
//! which the checks here establish from the inputs matching looks at: the
//! element's name, classes, state and link state, the rules it could be
//! singled out by (ids, attributes, sibling positions), and its parent's
//! style.

use crate::context::SharedStyleContext;
use crate::data::ElementStyles;
use crate::dom::TElement;
use crate::properties::LinkState;
use log::debug;
use selectors::Atom;
use smallvec::SmallVec;
use std::marker::PhantomData;

mod checks;

/// An element under test: the element being styled, or one of its
/// ancestors while looking for cousins, with the facts the checks need
/// computed at most once.
pub struct StyleSharingTarget<E: TElement> {
    element: E,
    class_list: Option<SmallVec<[Atom; 5]>>,
    link_state: Option<LinkState>,
    lang: Option<Option<Atom>>,
}

impl<E: TElement> StyleSharingTarget<E> {
    /// Trivially construct a new StyleSharingTarget to test against the cache.
    pub fn new(element: E) -> Self {
        Self {
            element,
            class_list: None,
            link_state: None,
            lang: None,
        }
    }

    fn class_list(&mut self) -> &SmallVec<[Atom; 5]> {
        let element = self.element;
        self.class_list
            .get_or_insert_with(|| checks::class_list(element))
    }

    fn link_state(&mut self, shared: &SharedStyleContext) -> LinkState {
        let element = self.element;
        *self
            .link_state
            .get_or_insert_with(|| element.link_state(shared.visited_links))
    }

    fn lang(&mut self) -> &Option<Atom> {
        let element = self.element;
        self.lang.get_or_insert_with(|| element.lang())
    }
}

/// A cache miss result.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CacheMiss {
    /// The candidate has not been styled.
    NotStyled,
    /// The parents' styles differ.
    Parent,
    /// The local name of the element and the candidate don't match.
    LocalName,
    /// The namespace of the element and the candidate don't match.
    Namespace,
    /// The element and the candidate are links in different history
    /// states, or only one of them is a link.
    Link,
    /// The element and the candidate are in a different state.
    State,
    /// One of the elements has an id some rule tests.
    IdAttr,
    /// The candidate has a style attribute.
    StyleAttr,
    /// The element and the candidate class names didn't match.
    Class,
    /// The elements expose different custom pseudo-elements.
    CustomPseudo,
    /// The elements are in different languages.
    Lang,
    /// The form control attributes differ.
    FormControl,
    /// The candidate's style depends on its position or contents.
    UniqueStyle,
    /// The element and the candidate match different rules among those that
    /// depend on siblings.
    SiblingRules,
    /// The element and the candidate match different rules among those that
    /// test attributes.
    AttributeRules,
}

/// The per-traversal style sharing state.
///
/// The candidates themselves live in the tree; the cache only keeps count
/// of how much probing it did.
pub struct StyleSharingCache<E: TElement> {
    candidates_probed: usize,
    _marker: PhantomData<E>,
}

impl<E: TElement> Default for StyleSharingCache<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: TElement> StyleSharingCache<E> {
    /// Create a new style sharing cache.
    pub fn new() -> Self {
        StyleSharingCache {
            candidates_probed: 0,
            _marker: PhantomData,
        }
    }

    /// How many candidates were fully tested so far.
    pub fn candidates_probed(&self) -> usize {
        self.candidates_probed
    }

    /// Attempts to find an already-styled element whose styles `element`
    /// can use as its own.
    pub fn share_style_if_possible(
        &mut self,
        shared: &SharedStyleContext,
        element: E,
    ) -> Option<ElementStyles> {
        if shared.options.disable_style_sharing_cache {
            debug!("{:?} Cannot share style: style sharing cache disabled", element);
            return None;
        }

        let parent = match element.parent_element() {
            Some(parent) => parent,
            None => {
                debug!("{:?} Cannot share style: element has no parent", element);
                return None;
            },
        };

        if !parent.has_data() {
            debug!("{:?} Cannot share style: parent is unstyled", element);
            return None;
        }

        if element.style_attribute().is_some() {
            debug!("{:?} Cannot share style: element has style attribute", element);
            return None;
        }

        if !checks::id_allows_sharing(element, shared) {
            debug!("{:?} Cannot share style: element has id used by rules", element);
            return None;
        }

        if checks::has_positional_children(parent) {
            debug!("{:?} Cannot share style: siblings match positional rules", element);
            return None;
        }

        let mut target = StyleSharingTarget::new(element);
        let budget = shared.options.style_sharing_sibling_budget;

        let mut sibling = element.prev_sibling_element();
        let mut probes = 0;
        while let Some(candidate) = sibling {
            if probes == budget {
                break;
            }
            probes += 1;
            if let Some(styles) = self.try_candidate(&mut target, candidate, shared) {
                return Some(styles);
            }
            sibling = candidate.prev_sibling_element();
        }

        if let Some(styles) = self.share_with_cousin(&mut target, parent, shared) {
            return Some(styles);
        }

        debug!("{:?} Cannot share style: no candidate", element);
        None
    }

    /// Looks for candidates among cousins: for each ancestor in turn
    /// (parent first), every preceding sibling equivalent to it is
    /// descended, following the element's own ancestor chain, down to the
    /// candidates' level.
    fn share_with_cousin(
        &mut self,
        target: &mut StyleSharingTarget<E>,
        parent: E,
        shared: &SharedStyleContext,
    ) -> Option<ElementStyles> {
        let depth = shared.options.style_sharing_cousin_depth;
        let budget = shared.options.style_sharing_sibling_budget;

        let mut chain = SmallVec::<[StyleSharingTarget<E>; 8]>::new();
        let mut ancestor = Some(parent);
        while let Some(current) = ancestor {
            if chain.len() == depth {
                break;
            }
            chain.push(StyleSharingTarget::new(current));
            ancestor = current.parent_element();
        }

        for level in 0..chain.len() {
            let (below, rest) = chain.split_at_mut(level);
            let ancestor = &mut rest[0];

            let mut uncle = ancestor.element.prev_sibling_element();
            let mut probes = 0;
            while let Some(candidate_ancestor) = uncle {
                if probes == budget {
                    break;
                }
                probes += 1;
                match checks::equivalent_for_descendants(ancestor, candidate_ancestor, shared) {
                    Ok(()) => {
                        let found =
                            self.search_cousins(target, candidate_ancestor, below, shared);
                        if found.is_some() {
                            return found;
                        }
                    },
                    Err(miss) => {
                        debug!("Cousin subtree {:?} skipped: {:?}", candidate_ancestor, miss);
                    },
                }
                uncle = candidate_ancestor.prev_sibling_element();
            }
        }
        None
    }

    /// `below` holds the element's ancestors under the level of
    /// `cousin_parent`, nearest to the element first.
    fn search_cousins(
        &mut self,
        target: &mut StyleSharingTarget<E>,
        cousin_parent: E,
        below: &mut [StyleSharingTarget<E>],
        shared: &SharedStyleContext,
    ) -> Option<ElementStyles> {
        let budget = shared.options.style_sharing_sibling_budget;
        let mut child = cousin_parent.last_element_child();
        let mut probes = 0;
        while let Some(candidate) = child {
            if probes == budget {
                break;
            }
            probes += 1;
            match below.split_last_mut() {
                None => {
                    if let Some(styles) = self.try_candidate(target, candidate, shared) {
                        return Some(styles);
                    }
                },
                Some((expected, rest)) => {
                    if checks::equivalent_for_descendants(expected, candidate, shared).is_ok() {
                        let found = self.search_cousins(target, candidate, rest, shared);
                        if found.is_some() {
                            return found;
                        }
                    }
                },
            }
            child = candidate.prev_sibling_element();
        }
        None
    }

    fn try_candidate(
        &mut self,
        target: &mut StyleSharingTarget<E>,
        candidate: E,
        shared: &SharedStyleContext,
    ) -> Option<ElementStyles> {
        self.candidates_probed += 1;
        match Self::test_candidate(target, candidate, shared) {
            Ok(styles) => {
                debug!("Sharing style between {:?} and {:?}", target.element, candidate);
                Some(styles)
            },
            Err(miss) => {
                debug!("Cache miss on {:?}: {:?}", candidate, miss);
                None
            },
        }
    }

    fn test_candidate(
        target: &mut StyleSharingTarget<E>,
        candidate: E,
        shared: &SharedStyleContext,
    ) -> Result<ElementStyles, CacheMiss> {
        macro_rules! miss {
            ($miss: ident) => {
                return Err(CacheMiss::$miss)
            };
        }

        let element = target.element;
        if candidate == element {
            miss!(NotStyled)
        }

        let styles = match candidate.borrow_data() {
            Some(data) if data.has_styles() => data.styles.clone(),
            _ => miss!(NotStyled),
        };

        if !checks::parents_allow_sharing(element, candidate) {
            miss!(Parent)
        }

        checks::equivalent_for_descendants(target, candidate, shared)?;
        checks::same_local_inputs(target, candidate)?;

        match styles.get_primary() {
            Some(style) if checks::style_is_shareable(style) => {},
            _ => miss!(UniqueStyle),
        }

        if !shared.stylist.match_same_sibling_affecting_rules(element, candidate) {
            miss!(SiblingRules)
        }

        if !shared.stylist.match_same_uncommon_attribute_rules(element, candidate) {
            miss!(AttributeRules)
        }

        Ok(styles)
    }
}
