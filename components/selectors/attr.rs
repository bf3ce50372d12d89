/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Attribute selector operators and the case-sensitivity rules that apply
//! to attribute values.

use std::fmt;

/// The operator of an attribute selector with a value, e.g. `[foo^=bar]`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum AttrSelectorOperator {
    /// `[attr=value]`
    Equal,
    /// `[attr~=value]`
    Includes,
    /// `[attr|=value]`
    DashMatch,
    /// `[attr^=value]`
    Prefix,
    /// `[attr*=value]`
    Substring,
    /// `[attr$=value]`
    Suffix,
}

impl fmt::Display for AttrSelectorOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            AttrSelectorOperator::Equal => "=",
            AttrSelectorOperator::Includes => "~=",
            AttrSelectorOperator::DashMatch => "|=",
            AttrSelectorOperator::Prefix => "^=",
            AttrSelectorOperator::Substring => "*=",
            AttrSelectorOperator::Suffix => "$=",
        })
    }
}

/// The characters the `~=` operator splits on.
pub static SELECTOR_WHITESPACE: &[char] = &[' ', '\t', '\n', '\r', '\x0C'];

impl AttrSelectorOperator {
    /// Evaluates the operator against an element's attribute value.
    pub fn eval_str(
        self,
        element_attr_value: &str,
        attr_selector_value: &str,
        case_sensitivity: CaseSensitivity,
    ) -> bool {
        let e = element_attr_value.as_bytes();
        let s = attr_selector_value.as_bytes();
        let case = case_sensitivity;
        match self {
            AttrSelectorOperator::Equal => case.eq(e, s),
            AttrSelectorOperator::Prefix => {
                !s.is_empty() && e.len() >= s.len() && case.eq(&e[..s.len()], s)
            },
            AttrSelectorOperator::Suffix => {
                !s.is_empty() && e.len() >= s.len() && case.eq(&e[(e.len() - s.len())..], s)
            },
            AttrSelectorOperator::Substring => {
                !s.is_empty() && case.contains(element_attr_value, attr_selector_value)
            },
            AttrSelectorOperator::Includes => {
                // A value that is empty or contains whitespace can never be
                // one of the whitespace-separated tokens.
                !s.is_empty() &&
                    !attr_selector_value.contains(SELECTOR_WHITESPACE) &&
                    element_attr_value
                        .split(SELECTOR_WHITESPACE)
                        .any(|part| case.eq(part.as_bytes(), s))
            },
            AttrSelectorOperator::DashMatch => {
                case.eq(e, s) ||
                    (e.get(..s.len()).map_or(false, |prefix| case.eq(prefix, s)) &&
                        e.get(s.len()) == Some(&b'-'))
            },
        }
    }
}

/// How an attribute value is compared, as decided when the selector was
/// built.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ParsedCaseSensitivity {
    /// Always compare exactly.
    CaseSensitive,
    /// The `i` flag was given.
    AsciiCaseInsensitive,
    /// The attribute is one whose values HTML treats case-insensitively.
    AsciiCaseInsensitiveIfInHtmlElementInHtmlDocument,
}

impl ParsedCaseSensitivity {
    /// Resolves the policy for one element.
    pub fn to_unconditional(self, is_html_element_in_html_document: bool) -> CaseSensitivity {
        match self {
            ParsedCaseSensitivity::AsciiCaseInsensitiveIfInHtmlElementInHtmlDocument
                if is_html_element_in_html_document =>
            {
                CaseSensitivity::AsciiCaseInsensitive
            },
            ParsedCaseSensitivity::AsciiCaseInsensitiveIfInHtmlElementInHtmlDocument => {
                CaseSensitivity::CaseSensitive
            },
            ParsedCaseSensitivity::CaseSensitive => CaseSensitivity::CaseSensitive,
            ParsedCaseSensitivity::AsciiCaseInsensitive => CaseSensitivity::AsciiCaseInsensitive,
        }
    }

    /// The default policy for an attribute selector on `local_name`.
    pub fn for_attribute(local_name: &str) -> Self {
        if attr_value_is_case_insensitive_in_html(local_name) {
            ParsedCaseSensitivity::AsciiCaseInsensitiveIfInHtmlElementInHtmlDocument
        } else {
            ParsedCaseSensitivity::CaseSensitive
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CaseSensitivity {
    CaseSensitive,
    AsciiCaseInsensitive,
}

impl CaseSensitivity {
    pub fn eq(self, a: &[u8], b: &[u8]) -> bool {
        match self {
            CaseSensitivity::CaseSensitive => a == b,
            CaseSensitivity::AsciiCaseInsensitive => a.eq_ignore_ascii_case(b),
        }
    }

    pub fn eq_atom(self, a: &crate::Atom, b: &crate::Atom) -> bool {
        match self {
            CaseSensitivity::CaseSensitive => a == b,
            CaseSensitivity::AsciiCaseInsensitive => a.eq_ignore_ascii_case(b),
        }
    }

    pub fn contains(self, haystack: &str, needle: &str) -> bool {
        match self {
            CaseSensitivity::CaseSensitive => haystack.contains(needle),
            CaseSensitivity::AsciiCaseInsensitive => {
                let (n_first_byte, n_rest) = match needle.as_bytes().split_first() {
                    Some((&first, rest)) => (first, rest),
                    None => return true,
                };
                haystack.bytes().enumerate().any(|(i, byte)| {
                    if !byte.eq_ignore_ascii_case(&n_first_byte) {
                        return false;
                    }
                    let after_this_byte = &haystack.as_bytes()[i + 1..];
                    match after_this_byte.get(..n_rest.len()) {
                        None => false,
                        Some(haystack_slice) => haystack_slice.eq_ignore_ascii_case(n_rest),
                    }
                })
            },
        }
    }
}

/// HTML attributes whose values are matched ASCII case-insensitively on
/// HTML elements in HTML documents.
static CASE_INSENSITIVE_HTML_ATTRIBUTES: phf::Set<&'static str> = phf::phf_set! {
    "accept", "accept-charset", "align", "alink", "axis", "bgcolor", "charset",
    "checked", "clear", "codetype", "color", "compact", "declare", "defer", "dir",
    "direction", "disabled", "enctype", "face", "frame", "hreflang", "http-equiv",
    "lang", "language", "link", "media", "method", "multiple", "nohref", "noresize",
    "noshade", "nowrap", "readonly", "rel", "rev", "rules", "scope", "scrolling",
    "selected", "shape", "target", "text", "type", "valign", "valuetype", "vlink",
};

pub fn attr_value_is_case_insensitive_in_html(local_name: &str) -> bool {
    CASE_INSENSITIVE_HTML_ATTRIBUTES.contains(local_name)
}
