/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The context within which style is calculated.

use crate::bloom::StyleBloom;
use crate::dom::TElement;
use crate::hash::FxHashSet;
use crate::rule_cache::RuleCache;
use crate::sharing::StyleSharingCache;
use crate::stylist::Stylist;
use crate::values::image::{ImageLoader, PendingImageRequest};
use log::info;
use selectors::parser::DEFAULT_ANCESTOR_HASHES;
pub use selectors::parser::MAX_ANCESTOR_HASHES;
use serde::Deserialize;
use std::env;
use std::fmt;
use std::time::Instant;

/// A global options structure for the style system. We use this instead of
/// opts to abstract across Gecko and Servo.
///
/// Every field has a default, so a partial JSON or TOML object is a valid
/// configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct StyleSystemOptions {
    /// Whether the style sharing cache is disabled.
    pub disable_style_sharing_cache: bool,
    /// Whether matching ignores the ancestor bloom filter.
    pub disable_ancestor_filter: bool,
    /// Whether the matched-properties cache is disabled.
    pub disable_matched_properties_cache: bool,
    /// Whether we should dump statistics about the style system.
    pub dump_style_statistics: bool,
    /// How many earlier siblings the sharing cache probes at each level.
    pub style_sharing_sibling_budget: usize,
    /// How many levels of cousins the sharing cache climbs.
    pub style_sharing_cousin_depth: usize,
    /// How many ancestor hashes each rule carries for the bloom filter.
    /// Read by `Stylist::new_with_options`.
    pub max_ancestor_hashes: usize,
}

fn get_env_bool(name: &str) -> bool {
    match env::var(name) {
        Ok(s) => !s.is_empty(),
        Err(_) => false,
    }
}

impl Default for StyleSystemOptions {
    fn default() -> Self {
        StyleSystemOptions {
            disable_style_sharing_cache: get_env_bool("DISABLE_STYLE_SHARING_CACHE"),
            disable_ancestor_filter: false,
            disable_matched_properties_cache: false,
            dump_style_statistics: get_env_bool("DUMP_STYLE_STATISTICS"),
            style_sharing_sibling_budget: 10,
            style_sharing_cousin_depth: 10,
            max_ancestor_hashes: DEFAULT_ANCESTOR_HASHES,
        }
    }
}

impl StyleSystemOptions {
    /// The number of ancestor hashes to precompute, clamped to what the
    /// filter supports.
    pub fn ancestor_hash_count(&self) -> usize {
        self.max_ancestor_hashes.min(MAX_ANCESTOR_HASHES)
    }
}

/// Whether links have been visited, as the embedder's history knows it.
///
/// This is the only way the style system learns about history; matching
/// itself treats every link as unvisited.
pub trait VisitedLinkOracle {
    /// Whether the link to `url` has been visited.
    fn is_visited(&self, url: &str) -> bool;
}

/// A history with nothing in it.
pub struct NoVisitedLinks;

impl VisitedLinkOracle for NoVisitedLinks {
    fn is_visited(&self, _: &str) -> bool {
        false
    }
}

/// A history backed by a set of URLs.
#[derive(Debug, Default)]
pub struct VisitedLinkSet {
    urls: FxHashSet<String>,
}

impl VisitedLinkSet {
    /// An empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `url` as visited.
    pub fn insert(&mut self, url: &str) {
        self.urls.insert(url.to_owned());
    }
}

impl VisitedLinkOracle for VisitedLinkSet {
    fn is_visited(&self, url: &str) -> bool {
        self.urls.contains(url)
    }
}

/// A shared style context.
///
/// There's exactly one of these during a given restyle traversal, and
/// nothing mutates it while elements are styled.
pub struct SharedStyleContext<'a> {
    /// The CSS selector stylist.
    pub stylist: &'a Stylist,

    /// Configuration options.
    pub options: StyleSystemOptions,

    /// Which links have been visited.
    pub visited_links: &'a dyn VisitedLinkOracle,
}

impl<'a> SharedStyleContext<'a> {
    /// A context with the default options and an empty history.
    pub fn new(stylist: &'a Stylist) -> Self {
        SharedStyleContext {
            stylist,
            options: StyleSystemOptions::default(),
            visited_links: &NoVisitedLinks,
        }
    }

    /// Replaces the options.
    pub fn with_options(mut self, options: StyleSystemOptions) -> Self {
        self.options = options;
        self
    }

    /// Replaces the history.
    pub fn with_visited_links(mut self, visited_links: &'a dyn VisitedLinkOracle) -> Self {
        self.visited_links = visited_links;
        self
    }
}

/// Statistics gathered during the traversal. Statistics of separate
/// traversals combine through the `AddAssign` implementation below.
#[derive(Default)]
pub struct TraversalStatistics {
    /// The total number of elements traversed.
    pub elements_traversed: u32,
    /// The number of elements where has_styles() went from false to true.
    pub elements_styled: u32,
    /// The number of elements for which we performed selector matching.
    pub elements_matched: u32,
    /// The number of cache hits from the StyleSharingCache.
    pub styles_shared: u32,
    /// The number of cascades answered by the matched-properties cache.
    pub rule_cache_hits: u32,
    /// The number of times the ancestor filter was rebuilt from the root.
    pub bloom_rebuilds: u32,
    /// Time spent in the traversal, in milliseconds.
    pub traversal_time_ms: f64,
}

impl std::ops::AddAssign for TraversalStatistics {
    fn add_assign(&mut self, other: Self) {
        self.elements_traversed += other.elements_traversed;
        self.elements_styled += other.elements_styled;
        self.elements_matched += other.elements_matched;
        self.styles_shared += other.styles_shared;
        self.rule_cache_hits += other.rule_cache_hits;
        self.bloom_rebuilds += other.bloom_rebuilds;
    }
}

/// Format the statistics in a way that the performance test harness
/// understands.
impl fmt::Display for TraversalStatistics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "[PERF] perf block start")?;
        writeln!(f, "[PERF],elements_traversed,{}", self.elements_traversed)?;
        writeln!(f, "[PERF],elements_styled,{}", self.elements_styled)?;
        writeln!(f, "[PERF],elements_matched,{}", self.elements_matched)?;
        writeln!(f, "[PERF],styles_shared,{}", self.styles_shared)?;
        writeln!(f, "[PERF],rule_cache_hits,{}", self.rule_cache_hits)?;
        writeln!(f, "[PERF],bloom_rebuilds,{}", self.bloom_rebuilds)?;
        writeln!(f, "[PERF],traversal_time_ms,{}", self.traversal_time_ms)?;
        writeln!(f, "[PERF] perf block end")
    }
}

impl TraversalStatistics {
    /// Records the traversal time and logs the statistics if asked to.
    pub fn finish(&mut self, options: &StyleSystemOptions, start: Instant) {
        self.traversal_time_ms = start.elapsed().as_secs_f64() * 1000.0;
        if options.dump_style_statistics {
            info!("{}", self);
        }
    }
}

/// A thread-local style context.
///
/// This context contains the caches and the ancestor filter a traversal
/// mutates as it goes. Its caches are only valid for one `Stylist`
/// generation.
pub struct ThreadLocalStyleContext<E: TElement> {
    /// The bloom filter used to fast-reject selector-matching.
    pub bloom_filter: StyleBloom<E>,
    /// A cache to share style among siblings.
    pub sharing_cache: StyleSharingCache<E>,
    /// The matched-properties cache.
    pub rule_cache: RuleCache,
    /// Statistics about the traversal.
    pub statistics: TraversalStatistics,
    /// Images the finished styles are waiting for.
    pub pending_images: Vec<PendingImageRequest>,
}

impl<E: TElement> Default for ThreadLocalStyleContext<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: TElement> ThreadLocalStyleContext<E> {
    /// Creates a new `ThreadLocalStyleContext`
    pub fn new() -> Self {
        ThreadLocalStyleContext {
            bloom_filter: StyleBloom::new(),
            sharing_cache: StyleSharingCache::new(),
            rule_cache: RuleCache::new(),
            statistics: TraversalStatistics::default(),
            pending_images: vec![],
        }
    }

    /// Hands every pending image to `loader`.
    pub fn flush_pending_images(&mut self, loader: &mut dyn ImageLoader) {
        for request in self.pending_images.drain(..) {
            loader.load_pending_image(request.element, request.property, &request.image);
        }
    }
}

/// A `StyleContext` is just a simple container for a immutable reference to a
/// shared style context, and a mutable reference to a local one.
pub struct StyleContext<'a, E: TElement> {
    /// The shared style context reference.
    pub shared: &'a SharedStyleContext<'a>,
    /// The thread-local style context (mutable) reference.
    pub thread_local: &'a mut ThreadLocalStyleContext<E>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_have_defaults() {
        let options: StyleSystemOptions =
            serde_json::from_str(r#"{ "style_sharing_sibling_budget": 3 }"#).unwrap();
        assert_eq!(options.style_sharing_sibling_budget, 3);
        assert_eq!(options.style_sharing_cousin_depth, 10);
        assert!(!options.disable_ancestor_filter);
        assert_eq!(options.ancestor_hash_count(), DEFAULT_ANCESTOR_HASHES);
    }

    #[test]
    fn ancestor_hash_count_is_clamped() {
        let options: StyleSystemOptions =
            serde_json::from_str(r#"{ "max_ancestor_hashes": 32 }"#).unwrap();
        assert_eq!(options.ancestor_hash_count(), MAX_ANCESTOR_HASHES);
    }

    #[test]
    fn statistics_display() {
        let stats = TraversalStatistics {
            elements_traversed: 3,
            styles_shared: 1,
            ..Default::default()
        };
        let text = stats.to_string();
        assert!(text.contains("[PERF],elements_traversed,3"));
        assert!(text.contains("[PERF],styles_shared,1"));
    }
}
