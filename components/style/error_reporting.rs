/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Types used to report rules the style system rejects.

#![deny(missing_docs)]

use crate::properties::LonghandId;
use crate::values::specified::SpecifiedValue;
use selectors::{Atom, SelectorError};
use std::fmt;

/// Where in the stylesheet collection a rejected rule came from.
#[derive(Clone, Debug)]
pub struct SourceLocation {
    /// The stylesheet's URL, or an empty atom for inline sheets.
    pub url: Atom,
    /// Index of the top-level rule within its stylesheet.
    pub rule_index: usize,
}

/// An error the style system detected while indexing or cascading.
#[derive(Debug)]
pub enum ContextualError<'a> {
    /// One selector of a rule's selector list failed validation. The other
    /// selectors of the list are still indexed.
    InvalidSelector(usize, &'a SelectorError),
    /// A declaration carried a value its property does not accept.
    UnsupportedPropertyValue(LonghandId, &'a SpecifiedValue),
    /// A page rule named a pseudo-class other than `:first`, `:left`,
    /// `:right` or `:blank`.
    UnsupportedPageSelector(&'a str),
}

impl<'a> fmt::Display for ContextualError<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ContextualError::InvalidSelector(index, err) => {
                write!(f, "Ignoring selector #{}: {}", index, err)
            },
            ContextualError::UnsupportedPropertyValue(id, value) => {
                write!(f, "Unsupported value for '{}': {:?}", id.name(), value)
            },
            ContextualError::UnsupportedPageSelector(name) => {
                write!(f, "Unsupported page pseudo-class ':{}'", name)
            },
        }
    }
}

/// A generic trait for an error reporter.
pub trait ParseErrorReporter: Sync + Send {
    /// Called when the style engine detects an error.
    fn report_error(&self, location: &SourceLocation, error: ContextualError);
}

/// An error reporter that uses [the `log` crate](https://github.com/rust-lang/log)
/// at `info` level.
///
/// This logging is silent by default, and can be enabled with a
/// `RUST_LOG=style=info` environment variable.
pub struct RustLogReporter;

impl ParseErrorReporter for RustLogReporter {
    fn report_error(&self, location: &SourceLocation, error: ContextualError) {
        if log::log_enabled!(log::Level::Info) {
            log::info!(
                "Url:\t{}\nrule {}: {}",
                &*location.url,
                location.rule_index,
                error
            )
        }
    }
}

/// Error reporter which silently forgets errors
pub struct NullReporter;

impl ParseErrorReporter for NullReporter {
    fn report_error(&self, _: &SourceLocation, _: ContextualError) {
        // do nothing
    }
}
