/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! A data structure to efficiently index structs containing selectors by
//! id, class, custom pseudo-element and local name.

use crate::applicable_declarations::{ApplicableDeclarationList, CascadeLevel};
use crate::dom::TElement;
use crate::hash::map as hash_map;
use crate::hash::HashMap;
use crate::properties::computed_values::PseudoPresence;
use crate::stylist::Rule;
use log::trace;
use precomputed_hash::PrecomputedHash;
use selectors::matching::matches_selector;
use selectors::parser::{LocalName, SelectorIter};
use selectors::{Atom, Combinator, Component, MatchingContext, PseudoElement, QuirksMode};
use smallvec::SmallVec;
use std::hash::{BuildHasherDefault, Hash, Hasher};

/// A hasher implementation that doesn't hash anything, because it expects
/// its input to be a suitable u32 hash.
#[derive(Default)]
pub struct PrecomputedHasher {
    hash: Option<u32>,
}

/// A simple alias for a hashmap using PrecomputedHasher.
pub type PrecomputedHashMap<K, V> = HashMap<K, V, BuildHasherDefault<PrecomputedHasher>>;

impl Hasher for PrecomputedHasher {
    #[inline]
    fn write(&mut self, _: &[u8]) {
        unreachable!("Called into PrecomputedHasher with something that isn't a u32")
    }

    #[inline]
    fn write_u32(&mut self, i: u32) {
        debug_assert!(self.hash.is_none());
        self.hash = Some(i);
    }

    #[inline]
    fn finish(&self) -> u64 {
        debug_assert!(self.hash.is_some(), "PrecomputedHasher wasn't fed?");
        self.hash.unwrap_or(0) as u64
    }
}

/// A trait to abstract over a given selector map entry.
pub trait SelectorMapEntry: Sized + Clone {
    /// Gets the selector we should use to index in the selector map.
    fn selector(&self) -> SelectorIter;
}

/// Map element data to selector-providing objects for which the last
/// simple selector starts with them.
///
/// e.g.,
/// "p > img" would go into the set of selectors corresponding to the
/// element "img"
/// "a .foo .bar.baz" would go into the set of selectors corresponding to
/// the class "bar"
///
/// Because we match selectors right-to-left (i.e., moving up the tree
/// from an element), we need to compare the last simple selector in the
/// selector with the element.
///
/// So, if an element has ID "id1" and classes "foo" and "bar", then all
/// the rules it matches will have their last simple selector starting
/// either with "#id1" or with ".foo" or with ".bar".
///
/// Hence, the union of the rules keyed on each of element's classes, ID,
/// element name, etc. will contain the Selectors that actually match that
/// element.
///
/// Each bucket keeps its entries in insertion order, which for rules is
/// source order.
#[derive(Debug)]
pub struct SelectorMap<T> {
    /// A hash from an ID to rules which contain that ID selector.
    pub id_hash: MaybeCaseInsensitiveHashMap<Atom, SmallVec<[T; 1]>>,
    /// A hash from a class name to rules which contain that class selector.
    pub class_hash: MaybeCaseInsensitiveHashMap<Atom, SmallVec<[T; 1]>>,
    /// A hash from a custom pseudo-element id to the rules that target it.
    pub custom_pseudo_hash: PrecomputedHashMap<Atom, SmallVec<[T; 1]>>,
    /// A hash from local name to rules which contain that local name
    /// selector.
    pub local_name_hash: PrecomputedHashMap<Atom, SmallVec<[T; 1]>>,
    /// Rules that don't have ID, class, custom pseudo-element or element
    /// selectors.
    pub other: SmallVec<[T; 1]>,
    /// The number of entries in this map.
    pub count: usize,
}

impl<T> Default for SelectorMap<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SelectorMap<T> {
    /// Trivially constructs an empty `SelectorMap`.
    pub fn new() -> Self {
        SelectorMap {
            id_hash: MaybeCaseInsensitiveHashMap::new(),
            class_hash: MaybeCaseInsensitiveHashMap::new(),
            custom_pseudo_hash: HashMap::default(),
            local_name_hash: HashMap::default(),
            other: SmallVec::new(),
            count: 0,
        }
    }

    /// Clears the hashmap retaining storage.
    pub fn clear(&mut self) {
        self.id_hash.clear();
        self.class_hash.clear();
        self.custom_pseudo_hash.clear();
        self.local_name_hash.clear();
        self.other.clear();
        self.count = 0;
    }

    /// Returns whether there are any entries in the map.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.count
    }
}

impl SelectorMap<Rule> {
    /// Append to `matching_rules_list` all Rules in `self` that match
    /// element.
    ///
    /// Extract matching rules as per element's ID, classes, tag name, etc..
    /// Sort the Rules at the end to maintain cascading order.
    ///
    /// When `context` targets no pseudo-element, rules for eager
    /// pseudo-elements are probed as well, and the ones that would match
    /// are recorded in `pseudo_presence` instead of being collected.
    pub fn get_all_matching_rules<E>(
        &self,
        element: E,
        matching_rules_list: &mut ApplicableDeclarationList,
        context: &mut MatchingContext,
        pseudo_presence: &mut PseudoPresence,
        cascade_level: CascadeLevel,
    ) where
        E: TElement,
    {
        if self.is_empty() {
            return;
        }

        // At the end, we're going to sort the rules that we added, so
        // remember where we began.
        let init_len = matching_rules_list.len();
        let quirks_mode = context.quirks_mode;
        self.lookup(element, quirks_mode, |rule| {
            Self::get_matching_rule(
                element,
                rule,
                matching_rules_list,
                context,
                pseudo_presence,
                cascade_level,
            );
            true
        });

        // Sort only the rules we just added.
        matching_rules_list[init_len..].sort_by_key(|block| block.sort_key());
    }

    fn get_matching_rule<E>(
        element: E,
        rule: &Rule,
        matching_rules: &mut ApplicableDeclarationList,
        context: &mut MatchingContext,
        pseudo_presence: &mut PseudoPresence,
        cascade_level: CascadeLevel,
    ) where
        E: TElement,
    {
        if rule.block.is_empty() {
            return;
        }

        let rule_pseudo = rule.selector.pseudo_element().filter(|pseudo| !pseudo.is_custom());
        match (context.pseudo_element, rule_pseudo) {
            (None, None) => {},
            (None, Some(pseudo)) => {
                if pseudo.eager_index().is_some() && !pseudo_presence.contains(pseudo) {
                    if probe_pseudo_rule(element, rule, pseudo, context) {
                        pseudo_presence.insert(pseudo);
                    }
                }
                return;
            },
            (Some(target), Some(pseudo)) if target == pseudo => {},
            (Some(_), _) => return,
        }

        if matches_selector(&rule.selector, Some(&rule.hashes), &element, context) {
            trace!("{:?} matched rule #{}", element, rule.source_order);
            matching_rules.push(rule.to_applicable_declaration_block(cascade_level));
        }
    }
}

/// Matches a pseudo-element rule against its originating element without
/// collecting it.
fn probe_pseudo_rule<E>(element: E, rule: &Rule, pseudo: &PseudoElement, context: &mut MatchingContext) -> bool
where
    E: TElement,
{
    let mut probe = MatchingContext::new(
        context.bloom_filter,
        Some(pseudo),
        context.visited_handling,
        context.quirks_mode,
    );
    probe.relevant_link = context.relevant_link;
    let matched = matches_selector(&rule.selector, Some(&rule.hashes), &element, &mut probe);
    context.relations |= probe.relations;
    matched
}

impl<T: SelectorMapEntry> SelectorMap<T> {
    /// Inserts into the correct hash, trying id, class, custom
    /// pseudo-element and localname.
    pub fn insert(&mut self, entry: T, quirks_mode: QuirksMode) {
        self.count += 1;

        let vector = match find_bucket(entry.selector()) {
            Bucket::ID(id) => self.id_hash.entry(id.clone(), quirks_mode).or_insert_with(SmallVec::new),
            Bucket::Class(class) => self
                .class_hash
                .entry(class.clone(), quirks_mode)
                .or_insert_with(SmallVec::new),
            Bucket::CustomPseudo(name) => self
                .custom_pseudo_hash
                .entry(name.clone())
                .or_insert_with(SmallVec::new),
            Bucket::LocalName(LocalName { name, lower_name }) => {
                // If the local name in the selector isn't lowercase, insert
                // it into the rule hash twice. This means that, during
                // lookup, we can always find the rules based on the local
                // name of the element, regardless of whether it's an html
                // element in an html document (in which case we match
                // against lower_name) or not (in which case we match
                // against name).
                //
                // In the case of a non-html-element-in-html-document with a
                // lowercase localname and a non-lowercase selector, the
                // rulehash lookup may produce superfluous selectors, but the
                // subsequent selector matching work will filter them out.
                if name != lower_name {
                    self.local_name_hash
                        .entry(lower_name.clone())
                        .or_insert_with(SmallVec::new)
                        .push(entry.clone());
                }
                self.local_name_hash.entry(name.clone()).or_insert_with(SmallVec::new)
            },
            Bucket::Universal => &mut self.other,
        };

        vector.push(entry)
    }

    /// Looks up entries by id, class, custom pseudo-element, local name,
    /// and other (in order).
    ///
    /// Each entry is passed to the callback, which returns true to continue
    /// iterating entries, or false to terminate the lookup.
    ///
    /// Returns false if the callback ever returns false.
    #[inline]
    pub fn lookup<'a, E, F>(&'a self, element: E, quirks_mode: QuirksMode, mut f: F) -> bool
    where
        E: TElement,
        F: FnMut(&'a T) -> bool,
    {
        // Id.
        if let Some(id) = element.id() {
            if let Some(v) = self.id_hash.get(id, quirks_mode) {
                for entry in v.iter() {
                    if !f(entry) {
                        return false;
                    }
                }
            }
        }

        // Class.
        let mut done = false;
        element.each_class(|class| {
            if !done {
                if let Some(v) = self.class_hash.get(class, quirks_mode) {
                    for entry in v.iter() {
                        if !f(entry) {
                            done = true;
                            return;
                        }
                    }
                }
            }
        });
        if done {
            return false;
        }

        // Custom pseudo-element.
        if let Some(name) = element.custom_pseudo_element() {
            if let Some(v) = self.custom_pseudo_hash.get(name) {
                for entry in v.iter() {
                    if !f(entry) {
                        return false;
                    }
                }
            }
        }

        // Local name.
        if let Some(v) = self.local_name_hash.get(element.local_name()) {
            for entry in v.iter() {
                if !f(entry) {
                    return false;
                }
            }
        }

        // Other.
        for entry in self.other.iter() {
            if !f(entry) {
                return false;
            }
        }

        true
    }
}

enum Bucket<'a> {
    ID(&'a Atom),
    Class(&'a Atom),
    CustomPseudo(&'a Atom),
    LocalName(&'a LocalName),
    Universal,
}

fn specific_bucket_for(component: &Component) -> Bucket {
    match *component {
        Component::ID(ref id) => Bucket::ID(id),
        Component::Class(ref class) => Bucket::Class(class),
        Component::PseudoElement(PseudoElement::Custom(ref name)) => Bucket::CustomPseudo(name),
        Component::LocalName(ref selector) => Bucket::LocalName(selector),
        _ => Bucket::Universal,
    }
}

/// Searches a compound selector from left to right, and returns the
/// appropriate bucket for it.
#[inline(always)]
fn find_bucket(mut iter: SelectorIter) -> Bucket {
    let mut current_bucket = Bucket::Universal;

    loop {
        // We basically want to find the most specific bucket,
        // where:
        //
        //   id > class > custom pseudo-element > local name > universal.
        //
        for ss in &mut iter {
            let new_bucket = specific_bucket_for(ss);
            match new_bucket {
                Bucket::ID(..) => return new_bucket,
                // The subject of a custom pseudo-element rule is the
                // element exposing it, not the originating element, so the
                // compound to its left must not pick the bucket.
                Bucket::CustomPseudo(..) => return new_bucket,
                Bucket::Class(..) => {
                    current_bucket = new_bucket;
                },
                Bucket::LocalName(..) => {
                    if matches!(current_bucket, Bucket::Universal) {
                        current_bucket = new_bucket;
                    }
                },
                Bucket::Universal => {},
            }
        }

        // Effectively, pseudo-elements are ignored, given only state
        // pseudo-classes may appear before them.
        if iter.next_sequence() != Some(Combinator::PseudoElement) {
            break;
        }
    }

    current_bucket
}

/// Wrapper for PrecomputedHashMap that does ASCII-case-insensitive lookup
/// in quirks mode.
#[derive(Debug)]
pub struct MaybeCaseInsensitiveHashMap<K: PrecomputedHash + Hash + Eq, V>(PrecomputedHashMap<K, V>);

impl<V> MaybeCaseInsensitiveHashMap<Atom, V> {
    /// Empty map
    pub fn new() -> Self {
        MaybeCaseInsensitiveHashMap(PrecomputedHashMap::default())
    }

    /// HashMap::entry
    pub fn entry(&mut self, mut key: Atom, quirks_mode: QuirksMode) -> hash_map::Entry<Atom, V> {
        if quirks_mode == QuirksMode::Quirks {
            key = key.to_ascii_lowercase()
        }
        self.0.entry(key)
    }

    /// HashMap::iter
    pub fn iter(&self) -> hash_map::Iter<Atom, V> {
        self.0.iter()
    }

    /// HashMap::clear
    pub fn clear(&mut self) {
        self.0.clear()
    }

    /// HashMap::get
    pub fn get(&self, key: &Atom, quirks_mode: QuirksMode) -> Option<&V> {
        if quirks_mode == QuirksMode::Quirks {
            self.0.get(&key.to_ascii_lowercase())
        } else {
            self.0.get(key)
        }
    }
}

impl<V> Default for MaybeCaseInsensitiveHashMap<Atom, V> {
    fn default() -> Self {
        Self::new()
    }
}
