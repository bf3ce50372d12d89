/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The selector data model handed over by the stylesheet parser:
//! simple selectors, combinators, specificity, and the structural
//! validation every selector passes before it is indexed.

use crate::attr::{AttrSelectorOperator, ParsedCaseSensitivity};
use crate::bloom::BLOOM_HASH_MASK;
use crate::context::QuirksMode;
use crate::element_state::ElementState;
use crate::nth::{AnPlusB, AnPlusBError};
use crate::Atom;
use precomputed_hash::PrecomputedHash;
use smallvec::SmallVec;
use std::error::Error;
use std::fmt;
use std::iter::Rev;
use std::ops::Add;
use std::slice;

/// A type selector. `lower_name` is used for HTML elements in HTML
/// documents.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct LocalName {
    pub name: Atom,
    pub lower_name: Atom,
}

impl LocalName {
    pub fn new(name: &str) -> Self {
        LocalName {
            name: Atom::from(name),
            lower_name: Atom::from(name.to_ascii_lowercase()),
        }
    }
}

/// Pseudo-classes other than the tree-structural ones.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum NonTSPseudoClass {
    Hover,
    Active,
    Focus,
    Drag,
    Link,
    Visited,
    AnyLink,
    Target,
    Checked,
    Indeterminate,
    Enabled,
    Disabled,
    Required,
    Optional,
    ReadOnly,
    ReadWrite,
    Default,
    Valid,
    Invalid,
    Lang(Atom),
}

impl NonTSPseudoClass {
    /// The element state bit this pseudo-class tests, if it is a pure
    /// state test.
    pub fn state_flag(&self) -> ElementState {
        match *self {
            NonTSPseudoClass::Hover => ElementState::HOVER,
            NonTSPseudoClass::Active => ElementState::ACTIVE,
            NonTSPseudoClass::Focus => ElementState::FOCUS,
            NonTSPseudoClass::Drag => ElementState::DRAG,
            NonTSPseudoClass::Target => ElementState::TARGET,
            NonTSPseudoClass::Checked => ElementState::CHECKED,
            NonTSPseudoClass::Indeterminate => ElementState::INDETERMINATE,
            NonTSPseudoClass::Enabled => ElementState::ENABLED,
            NonTSPseudoClass::Disabled => ElementState::DISABLED,
            NonTSPseudoClass::Required => ElementState::REQUIRED,
            NonTSPseudoClass::Optional => ElementState::OPTIONAL,
            NonTSPseudoClass::ReadOnly => ElementState::READ_ONLY,
            NonTSPseudoClass::ReadWrite => ElementState::READ_WRITE,
            NonTSPseudoClass::Default => ElementState::DEFAULT,
            NonTSPseudoClass::Valid => ElementState::VALID,
            NonTSPseudoClass::Invalid => ElementState::INVALID,
            NonTSPseudoClass::Link |
            NonTSPseudoClass::Visited |
            NonTSPseudoClass::AnyLink |
            NonTSPseudoClass::Lang(..) => ElementState::empty(),
        }
    }
}

/// The number of pseudo-elements whose styles are resolved together with
/// the originating element.
pub const EAGER_PSEUDO_COUNT: usize = 4;

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum PseudoElement {
    Before,
    After,
    FirstLine,
    FirstLetter,
    Selection,
    /// A `::-webkit-*` style pseudo-element exposed by a shadow element.
    Custom(Atom),
}

impl PseudoElement {
    pub fn is_custom(&self) -> bool {
        matches!(*self, PseudoElement::Custom(..))
    }

    /// Index into per-element eager pseudo-element storage.
    pub fn eager_index(&self) -> Option<usize> {
        Some(match *self {
            PseudoElement::Before => 0,
            PseudoElement::After => 1,
            PseudoElement::FirstLine => 2,
            PseudoElement::FirstLetter => 3,
            PseudoElement::Selection | PseudoElement::Custom(..) => return None,
        })
    }

    pub fn from_eager_index(index: usize) -> PseudoElement {
        match index {
            0 => PseudoElement::Before,
            1 => PseudoElement::After,
            2 => PseudoElement::FirstLine,
            _ => PseudoElement::FirstLetter,
        }
    }
}

impl fmt::Display for PseudoElement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            PseudoElement::Before => f.write_str("::before"),
            PseudoElement::After => f.write_str("::after"),
            PseudoElement::FirstLine => f.write_str("::first-line"),
            PseudoElement::FirstLetter => f.write_str("::first-letter"),
            PseudoElement::Selection => f.write_str("::selection"),
            PseudoElement::Custom(ref name) => write!(f, "::{}", name),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Combinator {
    Child,        //  >
    Descendant,   // space
    NextSibling,  // +
    LaterSibling, // ~
    /// Separates a pseudo-element from its originating compound. Only
    /// pseudo-classes may follow the pseudo-element itself.
    PseudoElement,
}

impl Combinator {
    /// Returns true if this combinator is a child or descendant combinator.
    pub fn is_ancestor(&self) -> bool {
        matches!(*self, Combinator::Child | Combinator::Descendant)
    }

    /// Returns true if this combinator is a next- or later-sibling combinator.
    pub fn is_sibling(&self) -> bool {
        matches!(*self, Combinator::NextSibling | Combinator::LaterSibling)
    }
}

/// A simple selector or a combinator. Both live in one sequence, stored
/// left to right in source order and matched right to left.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Component {
    Combinator(Combinator),

    ExplicitUniversalType,
    ExplicitAnyNamespace,
    ExplicitNoNamespace,
    Namespace(Atom),
    LocalName(LocalName),

    ID(Atom),
    Class(Atom),

    AttributeExists {
        local_name: Atom,
        local_name_lower: Atom,
    },
    Attribute {
        local_name: Atom,
        local_name_lower: Atom,
        operator: AttrSelectorOperator,
        value: Atom,
        case_sensitivity: ParsedCaseSensitivity,
    },

    /// Matches iff none of the wrapped selectors match.
    Negation(Box<[Selector]>),

    Root,
    Empty,
    FirstChild,
    LastChild,
    OnlyChild,
    FirstOfType,
    LastOfType,
    OnlyOfType,
    NthChild(AnPlusB),
    NthLastChild(AnPlusB),
    NthOfType(AnPlusB),
    NthLastOfType(AnPlusB),

    NonTSPseudoClass(NonTSPseudoClass),
    PseudoElement(PseudoElement),
}

impl Component {
    pub fn is_combinator(&self) -> bool {
        matches!(*self, Component::Combinator(_))
    }

    /// Whether this simple selector depends on the element's position
    /// among its siblings.
    pub fn is_positional(&self) -> bool {
        matches!(
            *self,
            Component::FirstChild |
                Component::LastChild |
                Component::OnlyChild |
                Component::FirstOfType |
                Component::LastOfType |
                Component::OnlyOfType |
                Component::NthChild(..) |
                Component::NthLastChild(..) |
                Component::NthOfType(..) |
                Component::NthLastOfType(..)
        )
    }

    /// The hash the ancestor bloom filter knows this simple selector by,
    /// if any.
    pub fn ancestor_hash(&self, quirks_mode: QuirksMode) -> Option<u32> {
        let case_insensitive = quirks_mode == QuirksMode::Quirks;
        match *self {
            Component::LocalName(LocalName {
                ref name,
                ref lower_name,
            }) => {
                // Only hash names that are the same in both forms, otherwise
                // the element side may have inserted either spelling.
                if name == lower_name {
                    Some(name.precomputed_hash())
                } else {
                    None
                }
            },
            Component::ID(ref id) | Component::Class(ref id) if !case_insensitive => {
                Some(id.precomputed_hash())
            },
            _ => None,
        }
    }
}

const MAX_10BIT: u32 = (1u32 << 10) - 1;

/// The (id, class-like, element) weight of a selector.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Specificity {
    pub id_selectors: u32,
    pub class_like_selectors: u32,
    pub element_selectors: u32,
}

impl Add for Specificity {
    type Output = Specificity;

    fn add(self, rhs: Specificity) -> Specificity {
        Specificity {
            id_selectors: self.id_selectors + rhs.id_selectors,
            class_like_selectors: self.class_like_selectors + rhs.class_like_selectors,
            element_selectors: self.element_selectors + rhs.element_selectors,
        }
    }
}

impl From<u32> for Specificity {
    fn from(value: u32) -> Specificity {
        debug_assert!(value <= MAX_10BIT << 20 | MAX_10BIT << 10 | MAX_10BIT);
        Specificity {
            id_selectors: value >> 20,
            class_like_selectors: (value >> 10) & MAX_10BIT,
            element_selectors: value & MAX_10BIT,
        }
    }
}

impl From<Specificity> for u32 {
    fn from(specificity: Specificity) -> u32 {
        specificity.id_selectors.min(MAX_10BIT) << 20 |
            specificity.class_like_selectors.min(MAX_10BIT) << 10 |
            specificity.element_selectors.min(MAX_10BIT)
    }
}

fn simple_selector_specificity(simple_selector: &Component, specificity: &mut Specificity) {
    match *simple_selector {
        Component::Combinator(..) => {},
        Component::LocalName(..) | Component::PseudoElement(..) => {
            specificity.element_selectors += 1
        },
        Component::ID(..) => specificity.id_selectors += 1,
        Component::Class(..) |
        Component::AttributeExists { .. } |
        Component::Attribute { .. } |
        Component::Root |
        Component::Empty |
        Component::FirstChild |
        Component::LastChild |
        Component::OnlyChild |
        Component::FirstOfType |
        Component::LastOfType |
        Component::OnlyOfType |
        Component::NthChild(..) |
        Component::NthLastChild(..) |
        Component::NthOfType(..) |
        Component::NthLastOfType(..) |
        Component::NonTSPseudoClass(..) => specificity.class_like_selectors += 1,
        Component::ExplicitUniversalType |
        Component::ExplicitAnyNamespace |
        Component::ExplicitNoNamespace |
        Component::Namespace(..) => {},
        Component::Negation(ref list) => {
            // The most specific argument counts.
            let max = list
                .iter()
                .map(|s| s.specificity)
                .max()
                .unwrap_or_default();
            *specificity = *specificity + max;
        },
    }
}

fn compute_specificity(components: &[Component]) -> Specificity {
    let mut specificity = Specificity::default();
    for component in components {
        simple_selector_specificity(component, &mut specificity);
    }
    specificity
}

/// A selector whose structure does not satisfy the matcher's
/// requirements. Such selectors never reach the rule index.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SelectorError {
    EmptySelector,
    /// A combinator with no compound on one side.
    DanglingCombinator,
    /// A pseudo-element component not introduced by the pseudo-element
    /// combinator, or a pseudo-element combinator not followed by one.
    MisplacedPseudoElement,
    /// Something other than a pseudo-class follows a pseudo-element.
    NonPseudoClassAfterPseudoElement,
    NestedNegation,
    PseudoElementInNegation,
    EmptyNegation,
    InvalidNthArgument(AnPlusBError),
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SelectorError::EmptySelector => f.write_str("empty selector"),
            SelectorError::DanglingCombinator => f.write_str("combinator without a compound selector"),
            SelectorError::MisplacedPseudoElement => f.write_str("misplaced pseudo-element"),
            SelectorError::NonPseudoClassAfterPseudoElement => {
                f.write_str("only pseudo-classes may follow a pseudo-element")
            },
            SelectorError::NestedNegation => f.write_str(":not() may not contain :not()"),
            SelectorError::PseudoElementInNegation => f.write_str(":not() may not contain a pseudo-element"),
            SelectorError::EmptyNegation => f.write_str("empty :not()"),
            SelectorError::InvalidNthArgument(ref e) => e.fmt(f),
        }
    }
}

impl Error for SelectorError {}

/// Visits the simple selectors and combinators of a selector, including
/// those nested in negations.
pub trait SelectorVisitor {
    /// Returning false stops the walk.
    fn visit_simple_selector(&mut self, _component: &Component) -> bool {
        true
    }

    fn visit_combinator(&mut self, _combinator: Combinator) -> bool {
        true
    }
}

/// A complex selector with its precomputed specificity.
///
/// Components are stored left-to-right (in source order), but the
/// canonical iteration order is right-to-left (matching order). The
/// iterators abstract over these details.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct Selector {
    components: Box<[Component]>,
    specificity: Specificity,
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Selector")
            .field("components", &self.components)
            .field("specificity", &self.specificity)
            .finish()
    }
}

impl Selector {
    /// Creates a selector from a left-to-right sequence of components
    /// without validating it; see `validate`.
    pub fn from_components(components: Vec<Component>) -> Self {
        let specificity = compute_specificity(&components);
        Selector {
            components: components.into_boxed_slice(),
            specificity,
        }
    }

    /// The packed specificity, ordered like the (id, class, element)
    /// triple.
    pub fn specificity(&self) -> u32 {
        self.specificity.into()
    }

    pub fn specificity_triple(&self) -> Specificity {
        self.specificity
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Returns an iterator over the rightmost compound selector. When a
    /// combinator is reached, the iterator returns None, and
    /// `next_sequence()` may be called to continue to the next compound.
    pub fn iter(&self) -> SelectorIter {
        SelectorIter {
            iter: self.iter_raw_match_order(),
            next_combinator: None,
        }
    }

    /// Returns an iterator over all components, right to left.
    pub fn iter_raw_match_order(&self) -> Rev<slice::Iter<Component>> {
        self.components.iter().rev()
    }

    /// Returns an iterator over all components, left to right.
    pub fn iter_raw_parse_order(&self) -> slice::Iter<Component> {
        self.components.iter()
    }

    /// Returns an iterator over the simple selectors that must match
    /// ancestors of the subject. Sibling compounds and the subject
    /// compound are skipped.
    pub fn iter_ancestors(&self) -> AncestorIter {
        AncestorIter::new(self.iter())
    }

    /// The pseudo-element of the rightmost compound, if any.
    pub fn pseudo_element(&self) -> Option<&PseudoElement> {
        self.iter().find_map(|component| match *component {
            Component::PseudoElement(ref pseudo) => Some(pseudo),
            _ => None,
        })
    }

    /// Whether this selector is just `*`.
    pub fn is_universal(&self) -> bool {
        self.components
            .iter()
            .all(|c| matches!(*c, Component::ExplicitUniversalType | Component::ExplicitAnyNamespace))
    }

    /// Walks every component, descending into negations.
    pub fn visit<V: SelectorVisitor>(&self, visitor: &mut V) -> bool {
        for component in self.components.iter() {
            match *component {
                Component::Combinator(combinator) => {
                    if !visitor.visit_combinator(combinator) {
                        return false;
                    }
                    continue;
                },
                Component::Negation(ref list) => {
                    for nested in list.iter() {
                        if !nested.visit(visitor) {
                            return false;
                        }
                    }
                },
                _ => {},
            }
            if !visitor.visit_simple_selector(component) {
                return false;
            }
        }
        true
    }

    /// Checks the structural rules the matcher relies on.
    pub fn validate(&self) -> Result<(), SelectorError> {
        self.validate_internal(false)
    }

    fn validate_internal(&self, in_negation: bool) -> Result<(), SelectorError> {
        if self.components.is_empty() {
            return Err(SelectorError::EmptySelector);
        }

        let mut previous_was_combinator = true;
        let mut after_pseudo_element = false;
        let mut expect_pseudo_element = false;
        for component in self.components.iter() {
            if expect_pseudo_element {
                if !matches!(*component, Component::PseudoElement(..)) {
                    return Err(SelectorError::MisplacedPseudoElement);
                }
                expect_pseudo_element = false;
                after_pseudo_element = true;
                previous_was_combinator = false;
                continue;
            }

            match *component {
                Component::Combinator(combinator) => {
                    if previous_was_combinator {
                        return Err(SelectorError::DanglingCombinator);
                    }
                    if after_pseudo_element {
                        return Err(SelectorError::NonPseudoClassAfterPseudoElement);
                    }
                    if combinator == Combinator::PseudoElement {
                        if in_negation {
                            return Err(SelectorError::PseudoElementInNegation);
                        }
                        expect_pseudo_element = true;
                    }
                    previous_was_combinator = true;
                    continue;
                },
                Component::PseudoElement(..) => {
                    return Err(if in_negation {
                        SelectorError::PseudoElementInNegation
                    } else {
                        SelectorError::MisplacedPseudoElement
                    });
                },
                Component::Negation(ref list) => {
                    if in_negation {
                        return Err(SelectorError::NestedNegation);
                    }
                    if list.is_empty() {
                        return Err(SelectorError::EmptyNegation);
                    }
                    for nested in list.iter() {
                        nested.validate_internal(true)?;
                    }
                },
                Component::NonTSPseudoClass(..) => {},
                _ if after_pseudo_element => {
                    return Err(SelectorError::NonPseudoClassAfterPseudoElement);
                },
                _ => {},
            }
            previous_was_combinator = false;
        }

        if previous_was_combinator {
            return Err(if expect_pseudo_element {
                SelectorError::MisplacedPseudoElement
            } else {
                SelectorError::DanglingCombinator
            });
        }
        Ok(())
    }
}

/// The default number of ancestor hashes kept per rule.
pub const DEFAULT_ANCESTOR_HASHES: usize = 4;

/// The largest number of ancestor hashes a rule may carry.
pub const MAX_ANCESTOR_HASHES: usize = 8;

/// Hashes of the tag names, ids and classes a selector requires of the
/// subject's ancestors, used to reject it against the ancestor bloom
/// filter before running the matcher. Only compounds reached through
/// child or descendant combinators contribute, so every hash here belongs
/// to a strict ancestor of any element the selector matches.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AncestorHashes {
    hashes: SmallVec<[u32; DEFAULT_ANCESTOR_HASHES]>,
}

impl AncestorHashes {
    /// Collects at most `max` hashes, clamped to `MAX_ANCESTOR_HASHES`.
    pub fn new(selector: &Selector, quirks_mode: QuirksMode, max: usize) -> Self {
        let max = max.min(MAX_ANCESTOR_HASHES);
        let mut hashes = SmallVec::new();
        for component in selector.iter_ancestors() {
            if hashes.len() >= max {
                break;
            }
            if let Some(hash) = component.ancestor_hash(quirks_mode) {
                hashes.push(hash & BLOOM_HASH_MASK);
            }
        }
        AncestorHashes { hashes }
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.hashes
    }
}

/// A comma-separated list of selectors sharing one declaration block.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SelectorList(pub SmallVec<[Selector; 1]>);

impl SelectorList {
    pub fn from_vec(selectors: Vec<Selector>) -> Self {
        SelectorList(SmallVec::from_vec(selectors))
    }

    pub fn iter(&self) -> slice::Iter<Selector> {
        self.0.iter()
    }
}

#[derive(Clone, Debug)]
pub struct SelectorIter<'a> {
    iter: Rev<slice::Iter<'a, Component>>,
    next_combinator: Option<Combinator>,
}

impl<'a> SelectorIter<'a> {
    /// Prepares this iterator to point to the next sequence to the left,
    /// returning the combinator if the sequence was found.
    pub fn next_sequence(&mut self) -> Option<Combinator> {
        self.next_combinator.take()
    }
}

impl<'a> Iterator for SelectorIter<'a> {
    type Item = &'a Component;
    fn next(&mut self) -> Option<Self::Item> {
        debug_assert!(self.next_combinator.is_none(), "Should call next_sequence!");
        match self.iter.next() {
            None => None,
            Some(&Component::Combinator(c)) => {
                self.next_combinator = Some(c);
                None
            },
            Some(x) => Some(x),
        }
    }
}

/// An iterator over all simple selectors belonging to ancestors.
pub struct AncestorIter<'a>(SelectorIter<'a>);

impl<'a> AncestorIter<'a> {
    /// Creates an AncestorIter. The passed-in iterator is assumed to point
    /// to the beginning of the subject compound, which is skipped.
    fn new(inner: SelectorIter<'a>) -> Self {
        let mut result = AncestorIter(inner);
        result.skip_until_ancestor();
        result
    }

    /// Skips a compound and all following compounds until an ancestor
    /// combinator is reached.
    fn skip_until_ancestor(&mut self) {
        loop {
            while self.0.next().is_some() {}
            if self.0.next_sequence().map_or(true, |x| x.is_ancestor()) {
                break;
            }
        }
    }
}

impl<'a> Iterator for AncestorIter<'a> {
    type Item = &'a Component;
    fn next(&mut self) -> Option<Self::Item> {
        let next = self.0.next();
        if next.is_some() {
            return next;
        }

        if let Some(combinator) = self.0.next_sequence() {
            if !combinator.is_ancestor() {
                self.skip_until_ancestor();
            }
        }

        self.0.next()
    }
}
