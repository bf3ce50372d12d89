/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! High-level interface to CSS selector matching.

#![deny(missing_docs)]

use crate::applicable_declarations::{ApplicableDeclarationBlock, ApplicableDeclarationList};
use crate::context::{StyleContext, ThreadLocalStyleContext};
use crate::data::{EagerPseudoStyles, ElementStyles};
use crate::dom::TElement;
use crate::properties::computed_values::PseudoPresence;
use crate::properties::{cascade, ComputedValueFlags, ComputedValues, LinkState};
use crate::rule_cache::RuleCacheOutcome;
use crate::style_adjuster::StyleAdjuster;
use crate::values::image::PendingImageRequest;
use log::{debug, warn};
use selectors::parser::EAGER_PSEUDO_COUNT;
use selectors::{MatchingContext, PseudoElement, StyleRelations, VisitedHandlingMode};
use servo_arc::Arc;

/// What matching an element against the stylist produced.
pub struct MatchingResults {
    /// The matched declaration blocks, in cascade order.
    pub declarations: ApplicableDeclarationList,
    /// What the matched selectors depended on.
    pub relations: StyleRelations,
    /// The eager pseudo-elements some rule matched.
    pub pseudo_presence: PseudoPresence,
}

/// Relations that tie a style to the element's position or contents.
const UNIQUE_STYLE_RELATIONS: StyleRelations =
    StyleRelations::AFFECTED_BY_CHILD_INDEX.union(StyleRelations::AFFECTED_BY_EMPTY);

/// Reports the images `style` is waiting for, on behalf of `element`.
pub fn note_pending_images<E>(
    element: E,
    style: &ComputedValues,
    thread_local: &mut ThreadLocalStyleContext<E>,
) where
    E: TElement,
{
    for (property, image) in style.pending_images() {
        thread_local.pending_images.push(PendingImageRequest {
            element: element.opaque(),
            property,
            image: image.clone(),
        });
    }
}

/// The methods that resolve the style of an element: matching, cascading
/// and adjusting.
///
/// `depth` is always the element's depth in the tree, used to validate the
/// ancestor filter in the thread-local context.
pub trait MatchMethods: TElement {
    /// Matches the element, or one of its pseudo-elements, against every
    /// indexed rule.
    ///
    /// The ancestor filter is used only if it holds exactly this element's
    /// ancestors; otherwise matching falls back to the unfiltered path.
    fn match_rules(
        &self,
        context: &mut StyleContext<Self>,
        depth: usize,
        pseudo: Option<&PseudoElement>,
        visited_handling: VisitedHandlingMode,
    ) -> MatchingResults {
        let shared = context.shared;
        let bloom_filter = if shared.options.disable_ancestor_filter {
            None
        } else {
            let filter = context.thread_local.bloom_filter.filter_for(*self, depth);
            if filter.is_none() {
                warn!("{:?} is out of step with the ancestor filter, matching without it", self);
            }
            filter
        };

        let mut matching_context = MatchingContext::new(
            bloom_filter,
            pseudo,
            visited_handling,
            shared.stylist.quirks_mode(),
        );
        if visited_handling == VisitedHandlingMode::RelevantLinkVisited {
            matching_context.relevant_link = self.relevant_link().map(|link| link.opaque());
        }

        let mut declarations = ApplicableDeclarationList::new();
        let mut pseudo_presence = PseudoPresence::default();
        shared.stylist.push_applicable_declarations(
            *self,
            self.style_attribute(),
            &mut declarations,
            &mut matching_context,
            &mut pseudo_presence,
        );

        MatchingResults {
            declarations,
            relations: matching_context.relations,
            pseudo_presence,
        }
    }

    /// Cascades and adjusts a style from matched declarations.
    fn cascade_with_rules(
        &self,
        context: &mut StyleContext<Self>,
        declarations: &[ApplicableDeclarationBlock],
        parent_style: Option<&ComputedValues>,
        root_style: Option<&ComputedValues>,
        pseudo: Option<&PseudoElement>,
    ) -> ComputedValues {
        let shared = context.shared;
        let rule_cache = if shared.options.disable_matched_properties_cache {
            None
        } else {
            Some(&mut context.thread_local.rule_cache)
        };

        let (mut builder, outcome) = cascade(declarations, parent_style, root_style, rule_cache);
        match outcome {
            RuleCacheOutcome::Hit | RuleCacheOutcome::ResetHit => {
                context.thread_local.statistics.rule_cache_hits += 1;
            },
            RuleCacheOutcome::Miss | RuleCacheOutcome::Disabled => {},
        }

        let element = if pseudo.is_some() { None } else { Some(*self) };
        StyleAdjuster::new(&mut builder).adjust(element, shared.stylist.quirks_mode());
        builder.build()
    }

    /// The style of the root of this element's tree, for `rem` units.
    /// `None` for the root itself.
    fn root_element_style(&self) -> Option<Arc<ComputedValues>> {
        let mut root = self.parent_element()?;
        while let Some(parent) = root.parent_element() {
            root = parent;
        }
        root.primary_style()
    }

    /// Computes the primary style of the element, from its parent's style.
    ///
    /// A visited link, and every element inside one up to the next link,
    /// also gets a visited variant: a second matching pass in which only
    /// the nearest link matches `:visited`, cascaded from the parent's
    /// visited variant. The variant hangs off the primary style; the
    /// primary style itself never sees `:visited`.
    fn resolve_primary_style(&self, context: &mut StyleContext<Self>, depth: usize) -> Arc<ComputedValues> {
        let parent_style = self.parent_element().and_then(|parent| parent.primary_style());
        let root_style = self.root_element_style();
        context.thread_local.statistics.elements_matched += 1;

        let link_state = self.link_state(context.shared.visited_links);
        let inside_visited_link = match link_state {
            LinkState::Visited => true,
            LinkState::Unvisited => false,
            LinkState::NotALink => parent_style
                .as_ref()
                .map_or(false, |parent| parent.visited_style().is_some()),
        };
        let visited_style = if inside_visited_link {
            debug!("{:?}: resolving visited style", self);
            let visited_parent_style = parent_style
                .as_ref()
                .map(|parent| parent.visited_style().unwrap_or(parent).clone());
            let results =
                self.match_rules(context, depth, None, VisitedHandlingMode::RelevantLinkVisited);
            let mut style = self.cascade_with_rules(
                context,
                &results.declarations,
                visited_parent_style.as_deref(),
                root_style.as_deref(),
                None,
            );
            style.relations = results.relations;
            style.link_state = link_state;
            Some(Arc::new(style))
        } else {
            None
        };

        let results = self.match_rules(context, depth, None, VisitedHandlingMode::AllLinksUnvisited);
        let mut style = self.cascade_with_rules(
            context,
            &results.declarations,
            parent_style.as_deref(),
            root_style.as_deref(),
            None,
        );
        style.relations = results.relations;
        if results.relations.intersects(UNIQUE_STYLE_RELATIONS) {
            style.flags |= ComputedValueFlags::IS_UNIQUE;
        }
        style.link_state = link_state;
        style.set_pseudo_presence(results.pseudo_presence);
        style.set_visited_style(visited_style);

        let style = Arc::new(style);
        note_pending_images(*self, &style, context.thread_local);
        style
    }

    /// Computes the style of one of the element's pseudo-elements, or
    /// `None` if no rule targets it.
    ///
    /// Works for lazy pseudo-elements such as `::selection` as well as the
    /// eager ones `resolve_styles` computes.
    fn resolve_pseudo_style(
        &self,
        context: &mut StyleContext<Self>,
        depth: usize,
        pseudo: &PseudoElement,
        primary_style: &Arc<ComputedValues>,
    ) -> Option<Arc<ComputedValues>> {
        let results = self.match_rules(context, depth, Some(pseudo), VisitedHandlingMode::AllLinksUnvisited);
        if results.declarations.is_empty() {
            return None;
        }

        let root_style = self
            .root_element_style()
            .unwrap_or_else(|| primary_style.clone());
        let mut style = self.cascade_with_rules(
            context,
            &results.declarations,
            Some(primary_style),
            Some(&root_style),
            Some(pseudo),
        );
        style.relations = results.relations;

        let style = Arc::new(style);
        note_pending_images(*self, &style, context.thread_local);
        Some(style)
    }

    /// Computes the primary style and every eager pseudo-element style
    /// some rule asked for.
    fn resolve_styles(&self, context: &mut StyleContext<Self>, depth: usize) -> ElementStyles {
        let primary = self.resolve_primary_style(context, depth);

        let mut pseudos = EagerPseudoStyles::default();
        // Display: none elements generate no boxes, pseudo-elements included.
        if !primary.is_display_none() && !primary.pseudo_presence().is_empty() {
            for index in 0..EAGER_PSEUDO_COUNT {
                let pseudo = PseudoElement::from_eager_index(index);
                if !primary.has_pseudo_style(&pseudo) {
                    continue;
                }
                if let Some(style) = self.resolve_pseudo_style(context, depth, &pseudo, &primary) {
                    pseudos.set(&pseudo, style);
                }
            }
        }

        ElementStyles {
            primary: Some(primary),
            pseudos,
        }
    }
}

impl<E: TElement> MatchMethods for E {}
