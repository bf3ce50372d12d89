/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Incremental construction of selectors by the stylesheet parser.
//!
//! Simple selectors and combinators are pushed left to right, the way
//! they appear in the source. `build()` computes specificity and runs the
//! same validation the rule index applies, so a selector the builder
//! accepts is always indexable.

use crate::attr::{AttrSelectorOperator, ParsedCaseSensitivity};
use crate::nth::AnPlusB;
use crate::parser::{Combinator, Component, LocalName, NonTSPseudoClass, PseudoElement};
use crate::parser::{Selector, SelectorError};
use crate::Atom;
use log::debug;

/// Which `:nth-*` pseudo-class an argument belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NthType {
    Child,
    LastChild,
    OfType,
    LastOfType,
}

#[derive(Debug)]
pub struct SelectorBuilder {
    components: Vec<Component>,
    compound_is_empty: bool,
    error: Option<SelectorError>,
}

impl Default for SelectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectorBuilder {
    pub fn new() -> Self {
        SelectorBuilder {
            components: Vec::new(),
            compound_is_empty: true,
            error: None,
        }
    }

    /// Pushes a simple selector onto the current compound.
    pub fn push_simple_selector(&mut self, component: Component) {
        debug_assert!(!component.is_combinator());
        if let Component::PseudoElement(..) = component {
            if self.compound_is_empty {
                self.components.push(Component::ExplicitUniversalType);
            }
            self.components.push(Component::Combinator(Combinator::PseudoElement));
        }
        self.components.push(component);
        self.compound_is_empty = false;
    }

    /// Ends the current compound.
    pub fn push_combinator(&mut self, combinator: Combinator) {
        self.components.push(Component::Combinator(combinator));
        self.compound_is_empty = true;
    }

    /// Pushes an `:nth-*` pseudo-class whose argument is still text. An
    /// argument that does not parse makes `build()` fail.
    pub fn push_nth(&mut self, ty: NthType, argument: &str) {
        match AnPlusB::parse(argument) {
            Ok(an_plus_b) => self.push_simple_selector(nth_component(ty, an_plus_b)),
            Err(e) => {
                debug!("Unparseable :nth argument {:?}: {}", argument, e);
                if self.error.is_none() {
                    self.error = Some(SelectorError::InvalidNthArgument(e));
                }
            },
        }
    }

    pub fn build(self) -> Result<Selector, SelectorError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let selector = Selector::from_components(self.components);
        selector.validate()?;
        Ok(selector)
    }

    fn with(mut self, component: Component) -> Self {
        self.push_simple_selector(component);
        self
    }

    fn then(mut self, combinator: Combinator) -> Self {
        self.push_combinator(combinator);
        self
    }

    pub fn universal(self) -> Self {
        self.with(Component::ExplicitUniversalType)
    }

    pub fn namespace(self, url: &str) -> Self {
        self.with(Component::Namespace(Atom::from(url)))
    }

    pub fn local_name(self, name: &str) -> Self {
        self.with(Component::LocalName(LocalName::new(name)))
    }

    pub fn id(self, id: &str) -> Self {
        self.with(Component::ID(Atom::from(id)))
    }

    pub fn class(self, class: &str) -> Self {
        self.with(Component::Class(Atom::from(class)))
    }

    pub fn attr_exists(self, name: &str) -> Self {
        self.with(Component::AttributeExists {
            local_name: Atom::from(name),
            local_name_lower: Atom::from(name.to_ascii_lowercase()),
        })
    }

    /// An attribute value test with the default case-sensitivity for
    /// `name`.
    pub fn attr(self, name: &str, operator: AttrSelectorOperator, value: &str) -> Self {
        let case_sensitivity = ParsedCaseSensitivity::for_attribute(&name.to_ascii_lowercase());
        self.attr_with_case(name, operator, value, case_sensitivity)
    }

    pub fn attr_with_case(
        self,
        name: &str,
        operator: AttrSelectorOperator,
        value: &str,
        case_sensitivity: ParsedCaseSensitivity,
    ) -> Self {
        self.with(Component::Attribute {
            local_name: Atom::from(name),
            local_name_lower: Atom::from(name.to_ascii_lowercase()),
            operator,
            value: Atom::from(value),
            case_sensitivity,
        })
    }

    pub fn pseudo_class(self, pseudo_class: NonTSPseudoClass) -> Self {
        self.with(Component::NonTSPseudoClass(pseudo_class))
    }

    pub fn pseudo_element(self, pseudo: PseudoElement) -> Self {
        self.with(Component::PseudoElement(pseudo))
    }

    pub fn negation(self, selectors: Vec<Selector>) -> Self {
        self.with(Component::Negation(selectors.into_boxed_slice()))
    }

    pub fn root(self) -> Self {
        self.with(Component::Root)
    }

    pub fn empty(self) -> Self {
        self.with(Component::Empty)
    }

    pub fn first_child(self) -> Self {
        self.with(Component::FirstChild)
    }

    pub fn last_child(self) -> Self {
        self.with(Component::LastChild)
    }

    pub fn only_child(self) -> Self {
        self.with(Component::OnlyChild)
    }

    pub fn first_of_type(self) -> Self {
        self.with(Component::FirstOfType)
    }

    pub fn last_of_type(self) -> Self {
        self.with(Component::LastOfType)
    }

    pub fn only_of_type(self) -> Self {
        self.with(Component::OnlyOfType)
    }

    pub fn nth(self, ty: NthType, a: i32, b: i32) -> Self {
        self.with(nth_component(ty, AnPlusB::new(a, b)))
    }

    pub fn nth_str(mut self, ty: NthType, argument: &str) -> Self {
        self.push_nth(ty, argument);
        self
    }

    pub fn descendant(self) -> Self {
        self.then(Combinator::Descendant)
    }

    pub fn child(self) -> Self {
        self.then(Combinator::Child)
    }

    pub fn next_sibling(self) -> Self {
        self.then(Combinator::NextSibling)
    }

    pub fn later_sibling(self) -> Self {
        self.then(Combinator::LaterSibling)
    }
}

fn nth_component(ty: NthType, an_plus_b: AnPlusB) -> Component {
    match ty {
        NthType::Child => Component::NthChild(an_plus_b),
        NthType::LastChild => Component::NthLastChild(an_plus_b),
        NthType::OfType => Component::NthOfType(an_plus_b),
        NthType::LastOfType => Component::NthLastOfType(an_plus_b),
    }
}
