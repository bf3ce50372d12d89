/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Calculate [specified][specified] and [computed values][computed] from a
//! tree of DOM nodes and a set of stylesheets.
//!
//! [computed]: https://drafts.csswg.org/css-cascade/#computed
//! [specified]: https://drafts.csswg.org/css-cascade/#specified
//!
//! In particular, this crate contains the definitions of supported
//! properties, the code to parse them into specified values and calculate
//! the computed values based on the specified values, as well as the code
//! to serialize both specified and computed values.
//!
//! The main entry point is [`traverse_dom`][traverse_dom], which styles a
//! subtree given a [`Stylist`][stylist] built from the document's
//! stylesheets.
//!
//! [traverse_dom]: sequential/fn.traverse_dom.html
//! [stylist]: stylist/struct.Stylist.html

#![deny(unsafe_code)]

pub mod applicable_declarations;
pub mod bloom;
pub mod cache;
pub mod context;
pub mod data;
pub mod dom;
pub mod error_reporting;
pub mod hash;
pub mod matching;
pub mod media_queries;
pub mod properties;
pub mod rule_cache;
pub mod rule_features;
pub mod selector_map;
pub mod sequential;
pub mod sharing;
pub mod style_adjuster;
pub mod stylesheets;
pub mod stylist;
pub mod values;

pub use selectors::{Atom, PseudoElement, QuirksMode};
pub use servo_arc::Arc;
