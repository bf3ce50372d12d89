/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Selector matching.

#![deny(missing_docs)]

use crate::applicable_declarations::{ApplicableDeclarationBlock, ApplicableDeclarationList};
use crate::applicable_declarations::CascadeLevel;
use crate::context::StyleSystemOptions;
use crate::dom::TElement;
use crate::error_reporting::{ContextualError, ParseErrorReporter, SourceLocation};
use crate::media_queries::Device;
use crate::properties::computed_values::PseudoPresence;
use crate::properties::longhands::LONGHANDS;
use crate::properties::{cascade, ComputedValues, DeclaredValue, PropertyDeclarationBlock};
use crate::properties::StyleBuilder;
use crate::rule_features::RuleFeatureSet;
use crate::selector_map::{SelectorMap, SelectorMapEntry};
use crate::stylesheets::{user_agent, CssRule, Origin, PagePseudoClassFlags, PageRule, PerOrigin};
use crate::stylesheets::{StyleRule, Stylesheet};
use log::debug;
use selectors::matching::matches_selector;
use selectors::parser::{AncestorHashes, SelectorIter, MAX_ANCESTOR_HASHES};
use selectors::{Atom, MatchingContext, PseudoElement, QuirksMode, Selector, VisitedHandlingMode};
use servo_arc::Arc;

/// This structure holds all the selectors and device characteristics
/// for a given document. The selectors are converted into `Rule`s and
/// introduced in a `SelectorMap` per stylesheet origin.
///
/// A `Stylist` is read-only while elements are styled; changing the
/// stylesheets or the device means calling `rebuild` again, which
/// invalidates every style computed so far.
pub struct Stylist {
    /// Device that the stylist is currently evaluating against.
    device: Box<dyn Device>,

    /// Document compatibility mode. In quirks mode the quirks-mode
    /// stylesheet is applied, and ids and classes match case-insensitively.
    quirks_mode: QuirksMode,

    /// The maximum number of ancestor hashes precomputed per rule.
    max_ancestor_hashes: usize,

    /// If true, the device has changed, and the stylist needs to be updated.
    is_device_dirty: bool,

    /// The indexed rules of each origin.
    cascade_data: PerOrigin<CascadeData>,

    /// What the indexed rules look at, for the style sharing cache.
    rule_features: RuleFeatureSet,

    /// A monotonically increasing counter to represent the order on which a
    /// style rule appears in a stylesheet, needed to sort them by source order.
    rules_source_order: u32,

    /// The total number of selectors.
    num_selectors: usize,

    /// The total number of declarations.
    num_declarations: usize,

    /// The total number of times the stylist has been rebuilt.
    num_rebuilds: usize,
}

/// The rules of one origin.
#[derive(Debug, Default)]
struct CascadeData {
    /// Style rules, pseudo-element rules included.
    element_map: SelectorMap<Rule>,
    /// `@page` rules, one entry per page selector.
    page_rules: Vec<PageRuleEntry>,
}

impl CascadeData {
    fn clear(&mut self) {
        self.element_map.clear();
        self.page_rules.clear();
    }
}

/// A page selector of an indexed `@page` rule.
#[derive(Debug)]
struct PageRuleEntry {
    name: Option<Atom>,
    required: PagePseudoClassFlags,
    specificity: u32,
    source_order: u32,
    block: Arc<PropertyDeclarationBlock>,
}

impl PageRuleEntry {
    fn matches(&self, name: Option<&Atom>, page: PagePseudoClassFlags) -> bool {
        let name_matches = match self.name {
            None => true,
            Some(ref own) => name == Some(own),
        };
        name_matches && page.contains(self.required)
    }
}

impl Stylist {
    /// Construct a new `Stylist`, using a given `Device`. No rules are
    /// indexed until `rebuild` is called.
    #[inline]
    pub fn new(device: Box<dyn Device>, quirks_mode: QuirksMode) -> Self {
        Self::new_with_options(device, quirks_mode, &StyleSystemOptions::default())
    }

    /// Like `new`, taking the indexing parameters from `options`.
    pub fn new_with_options(
        device: Box<dyn Device>,
        quirks_mode: QuirksMode,
        options: &StyleSystemOptions,
    ) -> Self {
        Stylist {
            device,
            quirks_mode,
            max_ancestor_hashes: options.ancestor_hash_count(),
            is_device_dirty: true,
            cascade_data: PerOrigin::default(),
            rule_features: RuleFeatureSet::new(),
            rules_source_order: 0,
            num_selectors: 0,
            num_declarations: 0,
            num_rebuilds: 0,
        }
    }

    /// Returns the number of selectors.
    pub fn num_selectors(&self) -> usize {
        self.num_selectors
    }

    /// Returns the number of declarations.
    pub fn num_declarations(&self) -> usize {
        self.num_declarations
    }

    /// Returns the number of times the stylist has been rebuilt.
    pub fn num_rebuilds(&self) -> usize {
        self.num_rebuilds
    }

    /// The document's quirks mode.
    #[inline]
    pub fn quirks_mode(&self) -> QuirksMode {
        self.quirks_mode
    }

    /// The device rules are indexed for.
    pub fn device(&self) -> &dyn Device {
        &*self.device
    }

    /// What the indexed rules depend on.
    #[inline]
    pub fn rule_features(&self) -> &RuleFeatureSet {
        &self.rule_features
    }

    /// How many ancestor hashes are precomputed per rule.
    pub fn max_ancestor_hashes(&self) -> usize {
        self.max_ancestor_hashes
    }

    /// Sets how many ancestor hashes are precomputed per rule, up to
    /// `MAX_ANCESTOR_HASHES`. Takes effect on the next rebuild.
    pub fn set_max_ancestor_hashes(&mut self, max: usize) {
        let max = max.min(MAX_ANCESTOR_HASHES);
        if max != self.max_ancestor_hashes {
            self.max_ancestor_hashes = max;
            self.is_device_dirty = true;
        }
    }

    /// Changes the device. Takes effect on the next rebuild.
    pub fn set_device(&mut self, device: Box<dyn Device>) {
        self.device = device;
        self.is_device_dirty = true;
    }

    /// Changes the quirks mode. Takes effect on the next rebuild.
    pub fn set_quirks_mode(&mut self, quirks_mode: QuirksMode) {
        if quirks_mode != self.quirks_mode {
            self.quirks_mode = quirks_mode;
            self.is_device_dirty = true;
        }
    }

    /// Return whether the device is dirty, that is, whether the media type,
    /// the quirks mode or the indexing parameters changed since the last
    /// rebuild.
    #[inline]
    pub fn is_device_dirty(&self) -> bool {
        self.is_device_dirty
    }

    /// Reindexes every rule: the default stylesheets first (plus the
    /// quirks-mode one when in quirks mode), then `doc_stylesheets` in
    /// order.
    ///
    /// Rejected selectors and unsupported values are reported to `reporter`
    /// and skipped; the rest of their rule is still indexed.
    pub fn rebuild(&mut self, doc_stylesheets: &[Arc<Stylesheet>], reporter: &dyn ParseErrorReporter) {
        self.num_rebuilds += 1;

        for (data, _) in self.cascade_data.iter_origins_mut() {
            data.clear();
        }
        self.rule_features.clear();
        self.rules_source_order = 0;
        self.num_selectors = 0;
        self.num_declarations = 0;

        let ua_stylesheets = user_agent::stylesheets();
        for stylesheet in ua_stylesheets.user_or_user_agent_stylesheets.iter() {
            self.add_stylesheet(stylesheet, reporter);
        }

        if self.quirks_mode == QuirksMode::Quirks {
            self.add_stylesheet(&ua_stylesheets.quirks_mode_stylesheet, reporter);
        }

        for stylesheet in doc_stylesheets {
            self.add_stylesheet(stylesheet, reporter);
        }

        debug!(
            "Stylist rebuilt: {} selectors, {} declarations",
            self.num_selectors, self.num_declarations
        );
        self.is_device_dirty = false;
    }

    fn add_stylesheet(&mut self, stylesheet: &Stylesheet, reporter: &dyn ParseErrorReporter) {
        // Gather first so that indexing can borrow `self` mutably.
        let mut rules = vec![];
        stylesheet.effective_rules(&*self.device, |index, rule| rules.push((index, rule.clone())));

        for (rule_index, rule) in rules {
            let location = SourceLocation {
                url: stylesheet.url.clone(),
                rule_index,
            };
            match rule {
                CssRule::Style(ref style_rule) => {
                    self.add_style_rule(style_rule, stylesheet.origin, &location, reporter)
                },
                CssRule::Page(ref page_rule) => {
                    self.add_page_rule(page_rule, stylesheet.origin, &location, reporter)
                },
                // Already flattened by `effective_rules`.
                CssRule::Media(..) => {},
            }
        }
    }

    fn add_style_rule(
        &mut self,
        style_rule: &StyleRule,
        origin: Origin,
        location: &SourceLocation,
        reporter: &dyn ParseErrorReporter,
    ) {
        self.num_declarations += style_rule.block.len();
        report_unsupported_values(&style_rule.block, location, reporter);

        let quirks_mode = self.quirks_mode;
        for (index, selector) in style_rule.selectors.iter().enumerate() {
            if let Err(error) = selector.validate() {
                reporter.report_error(location, ContextualError::InvalidSelector(index, &error));
                continue;
            }

            self.num_selectors += 1;
            let rule = Rule::new(
                selector.clone(),
                style_rule.block.clone(),
                self.rules_source_order,
                quirks_mode,
                self.max_ancestor_hashes,
            );
            self.rule_features.note_rule(&rule, quirks_mode);
            self.cascade_data
                .borrow_mut_for_origin(origin)
                .element_map
                .insert(rule, quirks_mode);
        }
        self.rules_source_order += 1;
    }

    fn add_page_rule(
        &mut self,
        page_rule: &PageRule,
        origin: Origin,
        location: &SourceLocation,
        reporter: &dyn ParseErrorReporter,
    ) {
        self.num_declarations += page_rule.block.len();
        report_unsupported_values(&page_rule.block, location, reporter);

        let source_order = self.rules_source_order;
        self.rules_source_order += 1;
        let page_rules = &mut self.cascade_data.borrow_mut_for_origin(origin).page_rules;

        if page_rule.selectors.is_empty() {
            page_rules.push(PageRuleEntry {
                name: None,
                required: PagePseudoClassFlags::empty(),
                specificity: 0,
                source_order,
                block: page_rule.block.clone(),
            });
            return;
        }

        for selector in page_rule.selectors.iter() {
            let required = match selector.flags() {
                Ok(flags) => flags,
                Err(unknown) => {
                    reporter.report_error(location, ContextualError::UnsupportedPageSelector(unknown));
                    continue;
                },
            };
            page_rules.push(PageRuleEntry {
                name: selector.name.clone(),
                required,
                specificity: selector.specificity(),
                source_order,
                block: page_rule.block.clone(),
            });
        }
    }

    /// Returns the applicable CSS declarations for the given element.
    ///
    /// This corresponds to `ElementRuleCollector` in WebKit.
    ///
    /// The matched blocks are appended in cascade order: user-agent, user
    /// and author rules, each group sorted by specificity and then source
    /// order, then the style attribute. Important declarations are pulled
    /// out of the same blocks by the cascade. What the matched selectors
    /// depended on is accumulated in `context.relations`.
    ///
    /// When no pseudo-element is targeted, the eager pseudo-elements some
    /// rule would match are recorded in `pseudo_presence`.
    pub fn push_applicable_declarations<E>(
        &self,
        element: E,
        style_attribute: Option<&Arc<PropertyDeclarationBlock>>,
        applicable_declarations: &mut ApplicableDeclarationList,
        context: &mut MatchingContext,
        pseudo_presence: &mut PseudoPresence,
    ) where
        E: TElement,
    {
        debug_assert!(!self.is_device_dirty);

        debug!(
            "Matching {:?}, pseudo: {:?}",
            element,
            context.pseudo_element
        );

        // Step 1: Normal user-agent rules.
        self.cascade_data.user_agent.element_map.get_all_matching_rules(
            element,
            applicable_declarations,
            context,
            pseudo_presence,
            CascadeLevel::UANormal,
        );
        debug!("UA normal: {:?}", context.relations);

        // Step 2: User normal rules.
        self.cascade_data.user.element_map.get_all_matching_rules(
            element,
            applicable_declarations,
            context,
            pseudo_presence,
            CascadeLevel::UserNormal,
        );
        debug!("user normal: {:?}", context.relations);

        // Step 3: Author normal rules.
        self.cascade_data.author.element_map.get_all_matching_rules(
            element,
            applicable_declarations,
            context,
            pseudo_presence,
            CascadeLevel::AuthorNormal,
        );
        debug!("author normal: {:?}", context.relations);

        // Step 4: Style attributes. They never apply to pseudo-elements.
        if context.pseudo_element.is_none() {
            if let Some(sa) = style_attribute {
                if !sa.is_empty() {
                    applicable_declarations.push(ApplicableDeclarationBlock::from_declarations(
                        sa.clone(),
                        CascadeLevel::StyleAttributeNormal,
                    ));
                }
            }
        }

        debug!(
            "push_applicable_declarations: {} blocks, {:?}",
            applicable_declarations.len(),
            context.relations
        );
    }

    /// Whether `element` and `candidate` match exactly the same rules among
    /// those that depend on sibling positions or document structure.
    pub fn match_same_sibling_affecting_rules<E>(&self, element: E, candidate: E) -> bool
    where
        E: TElement,
    {
        self.match_same_rules(self.rule_features.sibling_rules(), element, candidate)
    }

    /// Whether `element` and `candidate` match exactly the same rules among
    /// those that test attributes.
    pub fn match_same_uncommon_attribute_rules<E>(&self, element: E, candidate: E) -> bool
    where
        E: TElement,
    {
        self.match_same_rules(self.rule_features.uncommon_attribute_rules(), element, candidate)
    }

    fn match_same_rules<E>(&self, map: &SelectorMap<Rule>, element: E, candidate: E) -> bool
    where
        E: TElement,
    {
        // Both elements have the same local name and classes and ids no
        // rule uses, so looking up through either finds the same rules.
        map.lookup(element, self.quirks_mode, |rule| {
            self.rule_matches(rule, element) == self.rule_matches(rule, candidate)
        })
    }

    fn rule_matches<E>(&self, rule: &Rule, element: E) -> bool
    where
        E: TElement,
    {
        let pseudo = rule.selector.pseudo_element().filter(|pseudo| !pseudo.is_custom());
        let mut context = MatchingContext::new(
            None,
            pseudo,
            VisitedHandlingMode::AllLinksUnvisited,
            self.quirks_mode,
        );
        matches_selector(&rule.selector, None, &element, &mut context)
    }

    /// Computes the style of a page box from the `@page` rules.
    ///
    /// `page` holds the pseudo-classes the page matches; `parent_style` is
    /// usually the root element's style.
    pub fn style_for_page(
        &self,
        name: Option<&Atom>,
        page: PagePseudoClassFlags,
        parent_style: Option<&ComputedValues>,
    ) -> ComputedValues {
        let mut declarations = ApplicableDeclarationList::new();
        for (data, origin) in self.cascade_data.iter_origins() {
            let start = declarations.len();
            for rule in data.page_rules.iter().filter(|rule| rule.matches(name, page)) {
                declarations.push(ApplicableDeclarationBlock::new(
                    rule.block.clone(),
                    rule.source_order,
                    CascadeLevel::for_origin(origin),
                    rule.specificity,
                ));
            }
            declarations[start..].sort_by_key(|block| block.sort_key());
        }

        let (builder, _) = cascade(&declarations, parent_style, None, None);
        builder.build()
    }

    /// The rules indexed for `origin`, for diagnostics.
    pub fn rule_count_for_origin(&self, origin: Origin) -> usize {
        self.cascade_data.borrow_for_origin(origin).element_map.len()
    }
}

/// Reports declarations whose values their property rejects. They stay in
/// the block and are skipped by the cascade.
fn report_unsupported_values(
    block: &PropertyDeclarationBlock,
    location: &SourceLocation,
    reporter: &dyn ParseErrorReporter,
) {
    let mut scratch = StyleBuilder::new(None, None);
    for declaration in block.declarations() {
        if let DeclaredValue::Value(ref value) = declaration.value {
            let handler = &LONGHANDS[declaration.id as usize];
            if (handler.cascade_value)(value, &mut scratch).is_err() {
                reporter.report_error(
                    location,
                    ContextualError::UnsupportedPropertyValue(declaration.id, value),
                );
            }
        }
    }
}

/// A rule, that wraps a style rule, but represents a single selector of the
/// rule.
#[derive(Clone, Debug)]
pub struct Rule {
    /// The selector this struct represents. We store this and the
    /// ancestor hashes inline, to avoid pointer-chasing when gathering
    /// applicable declarations.
    pub selector: Selector,
    /// The ancestor hashes used to reject the rule with the bloom filter.
    pub hashes: AncestorHashes,
    /// The source order this style rule appears in.
    pub source_order: u32,
    /// The declarations of the style rule.
    pub block: Arc<PropertyDeclarationBlock>,
}

impl SelectorMapEntry for Rule {
    fn selector(&self) -> SelectorIter {
        self.selector.iter()
    }
}

impl Rule {
    /// Creates a new Rule.
    pub fn new(
        selector: Selector,
        block: Arc<PropertyDeclarationBlock>,
        source_order: u32,
        quirks_mode: QuirksMode,
        max_ancestor_hashes: usize,
    ) -> Self {
        Rule {
            hashes: AncestorHashes::new(&selector, quirks_mode, max_ancestor_hashes),
            selector,
            source_order,
            block,
        }
    }

    /// Returns the specificity of the rule.
    #[inline]
    pub fn specificity(&self) -> u32 {
        self.selector.specificity()
    }

    /// The pseudo-element this rule styles, if any.
    pub fn pseudo_element(&self) -> Option<&PseudoElement> {
        self.selector.pseudo_element()
    }

    /// Turns this rule into an `ApplicableDeclarationBlock` for the given
    /// cascade level.
    pub fn to_applicable_declaration_block(&self, level: CascadeLevel) -> ApplicableDeclarationBlock {
        ApplicableDeclarationBlock::new(
            self.block.clone(),
            self.source_order,
            level,
            self.specificity(),
        )
    }
}
