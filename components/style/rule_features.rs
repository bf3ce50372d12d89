/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! What the indexed rules look at, as far as the style sharing cache is
//! concerned.

use crate::hash::HashSet;
use crate::selector_map::SelectorMap;
use crate::stylist::Rule;
use selectors::parser::SelectorVisitor;
use selectors::{Atom, Combinator, Component, NonTSPseudoClass, QuirksMode, Selector};

/// Facts gathered from every rule a `Stylist` indexed.
///
/// Two elements that agree on everything the sharing checks compare can
/// only be told apart by rules that test ids, attributes, or the position
/// of an element among its siblings. Ids are handled by refusing to share
/// elements whose id any rule mentions; the other two kinds of rules are
/// kept here so they can be matched against both elements.
#[derive(Debug, Default)]
pub struct RuleFeatureSet {
    /// Every id some selector tests.
    ids_in_rules: HashSet<Atom>,
    /// Every attribute name some selector tests, lowercased.
    attrs_in_rules: HashSet<Atom>,
    /// Rules that cross sibling combinators or test positional or
    /// structural pseudo-classes.
    sibling_rules: SelectorMap<Rule>,
    /// Rules that test attributes or `:lang()`.
    uncommon_attribute_rules: SelectorMap<Rule>,
}

/// Collects which of the features above a selector uses.
#[derive(Default)]
struct FeatureCollector {
    depends_on_siblings: bool,
    depends_on_attributes: bool,
}

impl SelectorVisitor for FeatureCollector {
    fn visit_simple_selector(&mut self, component: &Component) -> bool {
        match *component {
            Component::AttributeExists { .. } |
            Component::Attribute { .. } |
            Component::NonTSPseudoClass(NonTSPseudoClass::Lang(..)) => {
                self.depends_on_attributes = true;
            },
            Component::Root | Component::Empty => self.depends_on_siblings = true,
            ref other if other.is_positional() => self.depends_on_siblings = true,
            _ => {},
        }
        true
    }

    fn visit_combinator(&mut self, combinator: Combinator) -> bool {
        if combinator.is_sibling() {
            self.depends_on_siblings = true;
        }
        true
    }
}

impl RuleFeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.ids_in_rules.clear();
        self.attrs_in_rules.clear();
        self.sibling_rules.clear();
        self.uncommon_attribute_rules.clear();
    }

    /// Notes the features `rule` uses.
    pub fn note_rule(&mut self, rule: &Rule, quirks_mode: QuirksMode) {
        let mut collector = FeatureCollector::default();
        rule.selector.visit(&mut collector);
        note_names(&rule.selector, &mut self.ids_in_rules, &mut self.attrs_in_rules, quirks_mode);

        if collector.depends_on_siblings {
            self.sibling_rules.insert(rule.clone(), quirks_mode);
        }
        if collector.depends_on_attributes {
            self.uncommon_attribute_rules.insert(rule.clone(), quirks_mode);
        }
    }

    /// Whether some rule tests the id `id`.
    pub fn id_is_used(&self, id: &Atom, quirks_mode: QuirksMode) -> bool {
        if quirks_mode == QuirksMode::Quirks {
            return self.ids_in_rules.contains(&id.to_ascii_lowercase());
        }
        self.ids_in_rules.contains(id)
    }

    /// Whether some rule tests the attribute `name`.
    pub fn attr_is_used(&self, name: &Atom) -> bool {
        self.attrs_in_rules.contains(&name.to_ascii_lowercase())
    }

    pub fn sibling_rules(&self) -> &SelectorMap<Rule> {
        &self.sibling_rules
    }

    pub fn uncommon_attribute_rules(&self) -> &SelectorMap<Rule> {
        &self.uncommon_attribute_rules
    }
}

fn note_names(
    selector: &Selector,
    ids: &mut HashSet<Atom>,
    attrs: &mut HashSet<Atom>,
    quirks_mode: QuirksMode,
) {
    for component in selector.iter_raw_parse_order() {
        match *component {
            Component::ID(ref id) => {
                let id = if quirks_mode == QuirksMode::Quirks {
                    id.to_ascii_lowercase()
                } else {
                    id.clone()
                };
                ids.insert(id);
            },
            Component::AttributeExists {
                ref local_name_lower,
                ..
            } |
            Component::Attribute {
                ref local_name_lower,
                ..
            } => {
                attrs.insert(local_name_lower.clone());
            },
            Component::Negation(ref list) => {
                for nested in list.iter() {
                    note_names(nested, ids, attrs, quirks_mode);
                }
            },
            _ => {},
        }
    }
}
