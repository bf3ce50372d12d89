/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The combinator walker and the simple-selector predicates.

use crate::attr::CaseSensitivity;
use crate::bloom::BloomFilter;
use crate::context::{MatchingContext, StyleRelations, VisitedHandlingMode};
use crate::nth::AnPlusB;
use crate::parser::{AncestorHashes, Combinator, Component, LocalName, NonTSPseudoClass};
use crate::parser::{PseudoElement, Selector, SelectorIter, SelectorList};
use crate::tree::Element;
use bitflags::bitflags;

bitflags! {
    /// Set on elements while matching, to tell invalidation and the style
    /// sharing cache that the styles of an element or its children depend
    /// on sibling positions or emptiness.
    #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
    pub struct ElementSelectorFlags: u8 {
        /// When a child is added or removed from the parent, all the
        /// children must be restyled, because they may match :nth-last-*
        /// or :last-*.
        const HAS_SLOW_SELECTOR = 1 << 0;

        /// When a child is added or removed from the parent, any later
        /// siblings must be restyled, because they may match :nth-* or a
        /// sibling combinator.
        const HAS_SLOW_SELECTOR_LATER_SIBLINGS = 1 << 1;

        /// When a child is added or removed, the first and last element
        /// children must be restyled, because they may match :first-child,
        /// :last-child, or :only-child.
        const HAS_EDGE_CHILD_SELECTOR = 1 << 2;

        /// The element has a rule that may match :empty.
        const HAS_EMPTY_SELECTOR = 1 << 3;
    }
}

impl ElementSelectorFlags {
    /// Returns the subset of flags that apply to the element itself.
    pub fn for_self(self) -> ElementSelectorFlags {
        self & ElementSelectorFlags::HAS_EMPTY_SELECTOR
    }

    /// Returns the subset of flags that apply to the parent.
    pub fn for_parent(self) -> ElementSelectorFlags {
        self & (ElementSelectorFlags::HAS_SLOW_SELECTOR |
            ElementSelectorFlags::HAS_SLOW_SELECTOR_LATER_SIBLINGS |
            ElementSelectorFlags::HAS_EDGE_CHILD_SELECTOR)
    }
}

/// A result of selector matching, used internally by the combinator
/// walker to cut off backtracking early.
///
/// Consider the selector `d1 d2 > d3 + d4 ~ e` matched right to left. If
/// the compound of some candidate fails, only that candidate is out
/// (`NotMatchedLocally`) and the nearest retrying combinator moves on to
/// the next sibling or ancestor. If a sibling walk runs out of siblings,
/// no other sibling of the same element can help
/// (`NotMatchedAllSiblings`), but a different ancestor still might. If
/// an ancestor walk runs out of ancestors, nothing further up or to the
/// left can ever match (`NotMatchedGlobally`) and every pending walk is
/// abandoned.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SelectorMatchingResult {
    Matched,
    NotMatchedLocally,
    NotMatchedAllSiblings,
    NotMatchedGlobally,
}

/// Whether the ancestor hashes of a selector are all possibly present in
/// the bloom filter. A false return proves the selector cannot match.
#[inline]
pub fn selector_may_match(hashes: &AncestorHashes, bf: &BloomFilter) -> bool {
    hashes.as_slice().iter().all(|hash| bf.might_contain_hash(*hash))
}

pub fn matches_selector_list<E>(
    selector_list: &SelectorList,
    element: &E,
    context: &mut MatchingContext,
) -> bool
where
    E: Element,
{
    selector_list
        .iter()
        .any(|selector| matches_selector(selector, None, element, context))
}

/// Matches a selector against an element, fast-rejecting with the
/// ancestor hashes when a bloom filter is available.
#[inline]
pub fn matches_selector<E>(
    selector: &Selector,
    hashes: Option<&AncestorHashes>,
    element: &E,
    context: &mut MatchingContext,
) -> bool
where
    E: Element,
{
    if let (Some(hashes), Some(bf)) = (hashes, context.bloom_filter) {
        if !selector_may_match(hashes, bf) {
            return false;
        }
    }

    matches_complex_selector(selector.iter(), element, context) == SelectorMatchingResult::Matched
}

/// Walks the compound at the head of `selector_iter` and then the
/// combinators to its left.
pub fn matches_complex_selector<E>(
    mut selector_iter: SelectorIter,
    element: &E,
    context: &mut MatchingContext,
) -> SelectorMatchingResult
where
    E: Element,
{
    let matches_all_simple_selectors =
        selector_iter.all(|simple| matches_simple_selector(simple, element, context));

    let combinator = selector_iter.next_sequence();
    if combinator.map_or(false, |c| c.is_sibling()) {
        element.apply_selector_flags(ElementSelectorFlags::HAS_SLOW_SELECTOR_LATER_SIBLINGS);
    }

    if !matches_all_simple_selectors {
        return SelectorMatchingResult::NotMatchedLocally;
    }

    let combinator = match combinator {
        None => return SelectorMatchingResult::Matched,
        Some(c) => c,
    };

    let candidate_not_found = match combinator {
        Combinator::NextSibling | Combinator::LaterSibling => {
            context.relations |= StyleRelations::AFFECTED_BY_SIBLINGS;
            SelectorMatchingResult::NotMatchedAllSiblings
        },
        Combinator::Child | Combinator::Descendant | Combinator::PseudoElement => {
            SelectorMatchingResult::NotMatchedGlobally
        },
    };

    let mut next_element = next_element_for_combinator(element, combinator);

    loop {
        let element = match next_element {
            None => return candidate_not_found,
            Some(next_element) => next_element,
        };
        let result = matches_complex_selector(selector_iter.clone(), &element, context);

        match (result, combinator) {
            // Return the status immediately.
            (SelectorMatchingResult::Matched, _) |
            (SelectorMatchingResult::NotMatchedGlobally, _) |
            (_, Combinator::NextSibling) |
            (_, Combinator::PseudoElement) => return result,

            // The parent failed; another ancestor might still satisfy an
            // enclosing descendant combinator.
            (_, Combinator::Child) => return SelectorMatchingResult::NotMatchedAllSiblings,

            // No sibling can help, but an ancestor further out still might.
            (SelectorMatchingResult::NotMatchedAllSiblings, Combinator::LaterSibling) => {
                return result
            },

            // Descendant after a local or sibling failure, or LaterSibling
            // after a local failure: try the next candidate.
            _ => {},
        }

        next_element = next_element_for_combinator(&element, combinator);
    }
}

#[inline]
fn next_element_for_combinator<E>(element: &E, combinator: Combinator) -> Option<E>
where
    E: Element,
{
    match combinator {
        Combinator::NextSibling | Combinator::LaterSibling => element.prev_sibling_element(),
        Combinator::Child | Combinator::Descendant => element.parent_element(),
        Combinator::PseudoElement => {
            if element.custom_pseudo_element().is_some() {
                element.pseudo_element_originating_element()
            } else {
                Some(element.clone())
            }
        },
    }
}

/// Determines whether the given element matches the given single
/// selector.
#[inline]
fn matches_simple_selector<E>(
    selector: &Component,
    element: &E,
    context: &mut MatchingContext,
) -> bool
where
    E: Element,
{
    macro_rules! relation_if {
        ($ex:expr, $flag:ident) => {
            if $ex {
                context.relations |= StyleRelations::$flag;
                true
            } else {
                false
            }
        };
    }

    match *selector {
        Component::Combinator(_) => unreachable!(),
        Component::PseudoElement(ref pseudo) => matches_pseudo_element(pseudo, element, context),
        Component::LocalName(LocalName {
            ref name,
            ref lower_name,
        }) => {
            let name = if element.is_html_element_in_html_document() {
                lower_name
            } else {
                name
            };
            element.local_name() == name
        },
        Component::ExplicitUniversalType | Component::ExplicitAnyNamespace => true,
        Component::ExplicitNoNamespace => element.namespace().is_empty(),
        Component::Namespace(ref url) => element.namespace() == url,
        Component::ID(ref id) => {
            let case_sensitivity = context.classes_and_ids_case_sensitivity();
            relation_if!(
                element.id().map_or(false, |own| case_sensitivity.eq_atom(own, id)),
                AFFECTED_BY_ID_SELECTOR
            )
        },
        Component::Class(ref class) => {
            element.has_class(class, context.classes_and_ids_case_sensitivity())
        },
        Component::AttributeExists {
            ref local_name,
            ref local_name_lower,
        } => {
            let name = if element.is_html_element_in_html_document() {
                local_name_lower
            } else {
                local_name
            };
            relation_if!(element.attr(name).is_some(), AFFECTED_BY_NON_COMMON_ATTRIBUTE)
        },
        Component::Attribute {
            ref local_name,
            ref local_name_lower,
            operator,
            ref value,
            case_sensitivity,
        } => {
            let is_html = element.is_html_element_in_html_document();
            let name = if is_html { local_name_lower } else { local_name };
            let case_sensitivity = case_sensitivity.to_unconditional(is_html);
            relation_if!(
                element
                    .attr(name)
                    .map_or(false, |v| operator.eval_str(v, &**value, case_sensitivity)),
                AFFECTED_BY_NON_COMMON_ATTRIBUTE
            )
        },
        Component::NonTSPseudoClass(ref pc) => matches_non_ts_pseudo_class(pc, element, context),
        Component::Root => element.is_root(),
        Component::Empty => {
            element.apply_selector_flags(ElementSelectorFlags::HAS_EMPTY_SELECTOR);
            context.relations |= StyleRelations::AFFECTED_BY_EMPTY;
            element.is_empty()
        },
        Component::FirstChild => matches_first_child(element, context),
        Component::LastChild => matches_last_child(element, context),
        Component::OnlyChild => {
            matches_first_child(element, context) && matches_last_child(element, context)
        },
        Component::NthChild(an_plus_b) => {
            matches_generic_nth_child(element, context, an_plus_b, false, false)
        },
        Component::NthLastChild(an_plus_b) => {
            matches_generic_nth_child(element, context, an_plus_b, false, true)
        },
        Component::NthOfType(an_plus_b) => {
            matches_generic_nth_child(element, context, an_plus_b, true, false)
        },
        Component::NthLastOfType(an_plus_b) => {
            matches_generic_nth_child(element, context, an_plus_b, true, true)
        },
        Component::FirstOfType => {
            matches_generic_nth_child(element, context, AnPlusB::FIRST, true, false)
        },
        Component::LastOfType => {
            matches_generic_nth_child(element, context, AnPlusB::FIRST, true, true)
        },
        Component::OnlyOfType => {
            matches_generic_nth_child(element, context, AnPlusB::FIRST, true, false) &&
                matches_generic_nth_child(element, context, AnPlusB::FIRST, true, true)
        },
        Component::Negation(ref negated) => !negated.iter().any(|selector| {
            matches_complex_selector(selector.iter(), element, context) ==
                SelectorMatchingResult::Matched
        }),
    }
}

fn matches_pseudo_element<E>(pseudo: &PseudoElement, element: &E, context: &MatchingContext) -> bool
where
    E: Element,
{
    match *pseudo {
        PseudoElement::Custom(ref name) => element.custom_pseudo_element() == Some(name),
        _ => context.pseudo_element == Some(pseudo),
    }
}

fn matches_non_ts_pseudo_class<E>(
    pseudo_class: &NonTSPseudoClass,
    element: &E,
    context: &mut MatchingContext,
) -> bool
where
    E: Element,
{
    match *pseudo_class {
        NonTSPseudoClass::Link => {
            context.relations |= StyleRelations::AFFECTED_BY_LINK;
            element.is_link() && !is_relevant_visited_link(element, context)
        },
        NonTSPseudoClass::Visited => {
            context.relations |= StyleRelations::AFFECTED_BY_LINK;
            element.is_link() && is_relevant_visited_link(element, context)
        },
        NonTSPseudoClass::AnyLink => element.is_link(),
        NonTSPseudoClass::Lang(ref lang) => match element.lang() {
            Some(element_lang) => {
                let case = CaseSensitivity::AsciiCaseInsensitive;
                let own = element_lang.as_bytes();
                let wanted = lang.as_bytes();
                case.eq(own, wanted) ||
                    (own.len() > wanted.len() &&
                        case.eq(&own[..wanted.len()], wanted) &&
                        own[wanted.len()] == b'-')
            },
            None => false,
        },
        _ => {
            let flag = pseudo_class.state_flag();
            context.relations |= match *pseudo_class {
                NonTSPseudoClass::Hover => StyleRelations::AFFECTED_BY_HOVER,
                NonTSPseudoClass::Active => StyleRelations::AFFECTED_BY_ACTIVE,
                NonTSPseudoClass::Focus => StyleRelations::AFFECTED_BY_FOCUS,
                NonTSPseudoClass::Drag => StyleRelations::AFFECTED_BY_DRAG,
                _ => StyleRelations::AFFECTED_BY_STATE,
            };
            element.state().contains(flag)
        },
    }
}

/// `:visited` only ever matches the link whose visited variant is being
/// resolved. Every other link is treated as unvisited.
#[inline]
fn is_relevant_visited_link<E: Element>(element: &E, context: &MatchingContext) -> bool {
    context.visited_handling == VisitedHandlingMode::RelevantLinkVisited &&
        context.relevant_link == Some(element.opaque())
}

#[inline]
fn matches_generic_nth_child<E>(
    element: &E,
    context: &mut MatchingContext,
    an_plus_b: AnPlusB,
    is_of_type: bool,
    is_from_end: bool,
) -> bool
where
    E: Element,
{
    element.apply_selector_flags(if is_from_end {
        ElementSelectorFlags::HAS_SLOW_SELECTOR
    } else {
        ElementSelectorFlags::HAS_SLOW_SELECTOR_LATER_SIBLINGS
    });
    context.relations |= StyleRelations::AFFECTED_BY_CHILD_INDEX;

    let mut index: i32 = 1;
    let mut next_sibling = if is_from_end {
        element.next_sibling_element()
    } else {
        element.prev_sibling_element()
    };

    while let Some(sibling) = next_sibling {
        if !is_of_type ||
            (element.local_name() == sibling.local_name() &&
                element.namespace() == sibling.namespace())
        {
            index = index.saturating_add(1);
        }
        next_sibling = if is_from_end {
            sibling.next_sibling_element()
        } else {
            sibling.prev_sibling_element()
        };
    }

    an_plus_b.matches_index(index)
}

#[inline]
fn matches_first_child<E: Element>(element: &E, context: &mut MatchingContext) -> bool {
    element.apply_selector_flags(ElementSelectorFlags::HAS_EDGE_CHILD_SELECTOR);
    context.relations |= StyleRelations::AFFECTED_BY_CHILD_INDEX;
    element.prev_sibling_element().is_none()
}

#[inline]
fn matches_last_child<E: Element>(element: &E, context: &mut MatchingContext) -> bool {
    element.apply_selector_flags(ElementSelectorFlags::HAS_EDGE_CHILD_SELECTOR);
    context.relations |= StyleRelations::AFFECTED_BY_CHILD_INDEX;
    element.next_sibling_element().is_none()
}
