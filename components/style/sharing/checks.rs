/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Different checks done during the style sharing process in order to determine
//! quickly whether it's worth to share style, and whether two different elements
//! can indeed share the same style.

use super::{CacheMiss, StyleSharingTarget};
use crate::context::SharedStyleContext;
use crate::dom::TElement;
use crate::properties::{ComputedValueFlags, ComputedValues};
use selectors::matching::ElementSelectorFlags;
use selectors::Atom;
use smallvec::SmallVec;

/// The sorted class list of an element.
pub fn class_list<E>(element: E) -> SmallVec<[Atom; 5]>
where
    E: TElement,
{
    let mut classes = SmallVec::<[Atom; 5]>::new();
    element.each_class(|class| classes.push(class.clone()));
    classes.sort_unstable();
    classes.dedup();
    classes
}

/// Whether the children of `parent` may match rules that depend on their
/// position.
pub fn has_positional_children<E>(parent: E) -> bool
where
    E: TElement,
{
    parent.selector_flags().intersects(
        ElementSelectorFlags::HAS_SLOW_SELECTOR |
            ElementSelectorFlags::HAS_SLOW_SELECTOR_LATER_SIBLINGS |
            ElementSelectorFlags::HAS_EDGE_CHILD_SELECTOR,
    )
}

/// Whether no rule can single out `element` through its id.
pub fn id_allows_sharing<E>(element: E, shared: &SharedStyleContext) -> bool
where
    E: TElement,
{
    match element.id() {
        None => true,
        Some(id) => !shared
            .stylist
            .rule_features()
            .id_is_used(id, shared.stylist.quirks_mode()),
    }
}

/// Whether two computed styles are interchangeable as parent styles. The
/// visited variants count: children inherit from them.
pub fn same_computed_values(a: &ComputedValues, b: &ComputedValues) -> bool {
    std::ptr::eq(a, b) || a.eq_resolved(b)
}

/// Whether the parents of two elements have interchangeable styles.
pub fn parents_allow_sharing<E>(a: E, b: E) -> bool
where
    E: TElement,
{
    let (a_parent, b_parent) = match (a.parent_element(), b.parent_element()) {
        (Some(a), Some(b)) => (a, b),
        _ => return false,
    };
    if a_parent == b_parent {
        return true;
    }
    match (a_parent.primary_style(), b_parent.primary_style()) {
        (Some(a_style), Some(b_style)) => same_computed_values(&a_style, &b_style),
        _ => false,
    }
}

/// A style computed with positional or emptiness-dependent rules belongs to
/// its element alone.
pub fn style_is_shareable(style: &ComputedValues) -> bool {
    !style.flags.contains(ComputedValueFlags::IS_UNIQUE)
}

/// The comparison ancestors of a cousin pair and the pair itself go
/// through: no selector that looks at `a` from below can tell it apart
/// from `b`.
pub fn equivalent_for_descendants<E>(
    a: &mut StyleSharingTarget<E>,
    b: E,
    shared: &SharedStyleContext,
) -> Result<(), CacheMiss>
where
    E: TElement,
{
    let element = a.element;
    if element.local_name() != b.local_name() {
        return Err(CacheMiss::LocalName);
    }
    if element.namespace() != b.namespace() {
        return Err(CacheMiss::Namespace);
    }
    if element.state() != b.state() {
        return Err(CacheMiss::State);
    }
    if a.link_state(shared) != b.link_state(shared.visited_links) {
        return Err(CacheMiss::Link);
    }
    if !id_allows_sharing(element, shared) || !id_allows_sharing(b, shared) {
        return Err(CacheMiss::IdAttr);
    }
    if *a.class_list() != class_list(b) {
        return Err(CacheMiss::Class);
    }
    Ok(())
}

/// Checks the element-local inputs of matching that
/// `equivalent_for_descendants` leaves out.
pub fn same_local_inputs<E>(target: &mut StyleSharingTarget<E>, candidate: E) -> Result<(), CacheMiss>
where
    E: TElement,
{
    let element = target.element;
    if candidate.style_attribute().is_some() {
        return Err(CacheMiss::StyleAttr);
    }
    if element.custom_pseudo_element() != candidate.custom_pseudo_element() {
        return Err(CacheMiss::CustomPseudo);
    }
    if *target.lang() != candidate.lang() {
        return Err(CacheMiss::Lang);
    }
    if element.is_form_control() != candidate.is_form_control() {
        return Err(CacheMiss::FormControl);
    }
    if element.is_form_control() {
        for name in ["type", "readonly"] {
            let name = Atom::from(name);
            if element.attr(&name) != candidate.attr(&name) {
                return Err(CacheMiss::FormControl);
            }
        }
    }
    Ok(())
}
