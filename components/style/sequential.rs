/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Implements sequential traversal over the DOM tree.

#![deny(missing_docs)]

use crate::context::{SharedStyleContext, StyleContext, ThreadLocalStyleContext};
use crate::data::ElementStyles;
use crate::dom::TElement;
use crate::matching::{note_pending_images, MatchMethods};
use log::{debug, warn};
use smallvec::SmallVec;
use std::time::Instant;

enum WorkItem<E: TElement> {
    /// Style the element, at the given depth, then its children.
    Style(E, usize),
    /// All the children of the element on top of the ancestor filter are
    /// done.
    PopAncestor,
}

fn store_styles<E: TElement>(element: E, styles: ElementStyles) {
    match element.mutate_data() {
        Some(mut data) => data.styles = styles,
        None => warn!("{:?} has no room for style data", element),
    }
}

/// Styles one element as part of a traversal: shares a style from a
/// previously styled element if possible, resolves it otherwise.
fn recalc_style_at<E: TElement>(context: &mut StyleContext<E>, element: E, depth: usize) {
    let statistics = &mut context.thread_local.statistics;
    statistics.elements_traversed += 1;
    if !element.has_data() {
        statistics.elements_styled += 1;
    }

    context.thread_local.bloom_filter.insert_parents_recovering(element, depth);

    let shared_styles = context
        .thread_local
        .sharing_cache
        .share_style_if_possible(context.shared, element);
    let styles = match shared_styles {
        Some(styles) => {
            context.thread_local.statistics.styles_shared += 1;
            if let Some(primary) = styles.get_primary() {
                note_pending_images(element, primary, context.thread_local);
            }
            styles
        },
        None => element.resolve_styles(context, depth),
    };
    store_styles(element, styles);
}

/// Styles `root` and all its descendants, depth first, in document order.
///
/// The caches in `thread_local` may be reused by later traversals with the
/// same `Stylist`; statistics accumulate across them.
pub fn traverse_dom<E>(
    root: E,
    shared: &SharedStyleContext,
    thread_local: &mut ThreadLocalStyleContext<E>,
) where
    E: TElement,
{
    let start_time = Instant::now();
    let rebuilds_before = thread_local.bloom_filter.rebuilds();
    let mut context = StyleContext {
        shared,
        thread_local,
    };

    let mut stack = vec![WorkItem::Style(root, root.depth())];
    while let Some(item) = stack.pop() {
        match item {
            WorkItem::Style(element, depth) => {
                recalc_style_at(&mut context, element, depth);

                context.thread_local.bloom_filter.push(element);
                stack.push(WorkItem::PopAncestor);

                // Pushed last to first so that the first child is styled
                // first.
                let mut child = element.last_element_child();
                while let Some(kid) = child {
                    stack.push(WorkItem::Style(kid, depth + 1));
                    child = kid.prev_sibling_element();
                }
            },
            WorkItem::PopAncestor => {
                context.thread_local.bloom_filter.pop();
            },
        }
    }

    let statistics = &mut context.thread_local.statistics;
    statistics.bloom_rebuilds +=
        (context.thread_local.bloom_filter.rebuilds() - rebuilds_before) as u32;
    statistics.finish(&shared.options, start_time);
    debug!(
        "Traversal of {:?} done: {} elements, {} shared",
        root, statistics.elements_traversed, statistics.styles_shared
    );
}

/// Resolves the styles of a single element outside of a traversal, e.g.
/// for `getComputedStyle`. Unstyled ancestors are styled first, since
/// the element inherits from them.
///
/// The results are stored on every element styled on the way.
pub fn resolve_style<E>(
    element: E,
    shared: &SharedStyleContext,
    thread_local: &mut ThreadLocalStyleContext<E>,
) -> ElementStyles
where
    E: TElement,
{
    let mut unstyled_ancestors = SmallVec::<[E; 16]>::new();
    let mut current = element.parent_element();
    while let Some(ancestor) = current {
        if ancestor.has_data() {
            break;
        }
        unstyled_ancestors.push(ancestor);
        current = ancestor.parent_element();
    }

    let mut context = StyleContext {
        shared,
        thread_local,
    };
    context.thread_local.bloom_filter.clear();

    for ancestor in unstyled_ancestors.drain(..).rev() {
        let depth = ancestor.depth();
        context.thread_local.bloom_filter.insert_parents_recovering(ancestor, depth);
        let styles = ancestor.resolve_styles(&mut context, depth);
        store_styles(ancestor, styles);
    }

    let depth = element.depth();
    context.thread_local.bloom_filter.insert_parents_recovering(element, depth);
    let styles = element.resolve_styles(&mut context, depth);
    store_styles(element, styles.clone());
    styles
}
