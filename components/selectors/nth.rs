/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The `an+b` micro-syntax of the `:nth-*` pseudo-classes.

use std::error::Error;
use std::fmt;

/// A parsed `an+b` argument.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct AnPlusB {
    pub a: i32,
    pub b: i32,
}

/// The argument of an `:nth-*` pseudo-class could not be parsed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AnPlusBError(pub String);

impl fmt::Display for AnPlusBError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid an+b argument {:?}", self.0)
    }
}

impl Error for AnPlusBError {}

impl AnPlusB {
    pub const fn new(a: i32, b: i32) -> Self {
        AnPlusB { a, b }
    }

    /// `:first-child` and friends.
    pub const FIRST: AnPlusB = AnPlusB::new(0, 1);

    /// Parses `odd`, `even`, `b`, `an`, `an+b` and `an-b`, with optional
    /// whitespace around the sign of `b`.
    pub fn parse(input: &str) -> Result<Self, AnPlusBError> {
        let err = || AnPlusBError(input.to_owned());
        let s = input.trim().to_ascii_lowercase();
        match &*s {
            "odd" => return Ok(AnPlusB::new(2, 1)),
            "even" => return Ok(AnPlusB::new(2, 0)),
            _ => {},
        }

        let n_pos = match s.find('n') {
            Some(pos) => pos,
            None => return parse_signed_integer(&s).map(|b| AnPlusB::new(0, b)).ok_or_else(err),
        };

        let a = match &s[..n_pos] {
            "" | "+" => 1,
            "-" => -1,
            a => parse_signed_integer(a).ok_or_else(err)?,
        };

        let rest = s[n_pos + 1..].trim_start();
        if rest.is_empty() {
            return Ok(AnPlusB::new(a, 0));
        }
        let (sign, digits) = match rest.as_bytes()[0] {
            b'+' => (1, rest[1..].trim_start()),
            b'-' => (-1, rest[1..].trim_start()),
            _ => return Err(err()),
        };
        if digits.is_empty() || !digits.bytes().all(|c| c.is_ascii_digit()) {
            return Err(err());
        }
        let b: i32 = digits.parse().map_err(|_| err())?;
        Ok(AnPlusB::new(a, sign * b))
    }

    /// Whether a one-based `index` is `a*n + b` for some `n >= 0`.
    pub fn matches_index(&self, index: i32) -> bool {
        let a = self.a as i64;
        let b = self.b as i64;
        let index = index as i64;
        if a == 0 {
            return index == b;
        }
        let diff = index - b;
        diff % a == 0 && diff / a >= 0
    }
}

fn parse_signed_integer(s: &str) -> Option<i32> {
    let digits = s.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
