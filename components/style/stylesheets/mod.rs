/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Style sheets and their CSS rules.
//!
//! Sheets arrive already parsed; this module only models them. Rules are
//! immutable and shared through `servo_arc::Arc`, so rebuilding a
//! `Stylist` never copies declaration blocks.

pub mod origin;
mod page_rule;
pub mod user_agent;

use crate::media_queries::{Device, MediaList};
use crate::properties::PropertyDeclarationBlock;
use selectors::{Atom, Selector, SelectorList};
use servo_arc::Arc;

pub use self::origin::{Origin, PerOrigin};
pub use self::page_rule::{PagePseudoClassFlags, PageRule, PageSelector};

/// A CSS rule.
#[derive(Clone, Debug)]
pub enum CssRule {
    Style(Arc<StyleRule>),
    Media(Arc<MediaRule>),
    Page(Arc<PageRule>),
}

/// A style rule, with selectors and declarations.
#[derive(Debug)]
pub struct StyleRule {
    /// The list of selectors in this rule. Selectors that fail validation
    /// are skipped when the rule is indexed.
    pub selectors: SelectorList,
    /// The declaration block with the properties it contains.
    pub block: Arc<PropertyDeclarationBlock>,
}

impl StyleRule {
    pub fn new(selectors: Vec<Selector>, block: PropertyDeclarationBlock) -> Self {
        StyleRule {
            selectors: SelectorList::from_vec(selectors),
            block: Arc::new(block),
        }
    }
}

/// An [`@media`][media] rule.
///
/// [media]: https://drafts.csswg.org/css-conditional/#at-ruledef-media
#[derive(Debug)]
pub struct MediaRule {
    pub media_queries: MediaList,
    pub rules: Vec<CssRule>,
}

/// A parsed style sheet.
#[derive(Debug)]
pub struct Stylesheet {
    /// List of rules in the order they were found (important for
    /// cascading order)
    pub rules: Vec<CssRule>,
    /// The media the whole sheet applies to.
    pub media: MediaList,
    pub origin: Origin,
    /// Where the sheet came from, for error reports.
    pub url: Atom,
    /// A disabled sheet contributes no rules.
    pub disabled: bool,
}

impl Stylesheet {
    pub fn new(origin: Origin, rules: Vec<CssRule>) -> Self {
        Stylesheet {
            rules,
            media: MediaList::default(),
            origin,
            url: Atom::from(""),
            disabled: false,
        }
    }

    pub fn with_media(mut self, media: MediaList) -> Self {
        self.media = media;
        self
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Atom::from(url);
        self
    }

    /// Whether this sheet applies on `device` at all.
    pub fn is_effective_for_device(&self, device: &dyn Device) -> bool {
        !self.disabled && self.media.evaluate(device)
    }

    /// Calls `f` with the index of the top-level rule each effective rule
    /// belongs to, descending into `@media` rules whose queries match.
    /// `@media` rules themselves are not reported.
    pub fn effective_rules<F>(&self, device: &dyn Device, mut f: F)
    where
        F: FnMut(usize, &CssRule),
    {
        if !self.is_effective_for_device(device) {
            return;
        }
        for (index, rule) in self.rules.iter().enumerate() {
            effective_rules(rule, device, &mut |rule| f(index, rule));
        }
    }
}

fn effective_rules(rule: &CssRule, device: &dyn Device, f: &mut dyn FnMut(&CssRule)) {
    match *rule {
        CssRule::Media(ref media_rule) => {
            if media_rule.media_queries.evaluate(device) {
                for nested in media_rule.rules.iter() {
                    effective_rules(nested, device, f);
                }
            }
        },
        CssRule::Style(..) | CssRule::Page(..) => f(rule),
    }
}
