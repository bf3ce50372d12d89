/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Supported CSS properties and the cascade.
//!
//! Every property is a longhand. Its behaviour lives in a row of the
//! static table in `longhands`, indexed by `LonghandId`.

pub mod cascade;
pub mod computed_values;
pub mod declaration_block;
pub mod longhands;

pub use self::cascade::{cascade, CascadeMode};
pub use self::computed_values::{ComputedValueFlags, ComputedValues, InheritedStyle, LinkState};
pub use self::computed_values::{ResetStyle, StyleBuilder};
pub use self::declaration_block::{Importance, PropertyDeclarationBlock};

use crate::values::specified::SpecifiedValue;
use std::fmt;

/// The number of longhands the engine knows about.
pub const LONGHAND_COUNT: usize = 35;

/// A longhand property.
///
/// Declaration order is the cascade's application order: the primary
/// properties come first, in dependency order, and `line-height` closes
/// them so that it resolves against the final font size.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(u8)]
pub enum LonghandId {
    Zoom = 0,
    Direction,
    WritingMode,
    FontFamily,
    FontStyle,
    FontWeight,
    FontSize,
    Color,
    LineHeight,

    Display,
    Position,
    Float,
    Clear,
    ZIndex,
    OverflowX,
    OverflowY,
    Width,
    Height,
    MarginTop,
    MarginRight,
    MarginBottom,
    MarginLeft,
    PaddingTop,
    PaddingRight,
    PaddingBottom,
    PaddingLeft,
    BackgroundColor,
    BackgroundImage,
    ListStyleImage,
    Opacity,
    Visibility,
    TextAlign,
    WhiteSpace,
    TextDecorationLine,
    VerticalAlign,
}

impl LonghandId {
    #[inline]
    fn handler(self) -> &'static longhands::LonghandHandler {
        &longhands::LONGHANDS[self as usize]
    }

    /// The property name, as written in stylesheets.
    pub fn name(self) -> &'static str {
        self.handler().name
    }

    /// Finds a property by name, ASCII case-insensitively.
    pub fn from_name(name: &str) -> Option<LonghandId> {
        longhands::LONGHANDS
            .iter()
            .find(|handler| handler.name.eq_ignore_ascii_case(name))
            .map(|handler| handler.id)
    }

    /// Whether the property inherits by default.
    pub fn inherited(self) -> bool {
        self.handler().inherited
    }

    /// Whether the property is applied in the first cascade pass.
    pub fn is_primary(self) -> bool {
        self.handler().primary
    }
}

impl fmt::Display for LonghandId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of longhands.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LonghandIdSet(u64);

impl LonghandIdSet {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn insert(&mut self, id: LonghandId) {
        self.0 |= 1 << (id as u64);
    }

    #[inline]
    pub fn contains(&self, id: LonghandId) -> bool {
        self.0 & (1 << (id as u64)) != 0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// A CSS-wide keyword.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CSSWideKeyword {
    Initial,
    Inherit,
    /// `inherit` for inherited properties, `initial` for the rest.
    Unset,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DeclaredValue {
    Value(SpecifiedValue),
    CSSWideKeyword(CSSWideKeyword),
}

/// One `property: value` pair.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyDeclaration {
    pub id: LonghandId,
    pub value: DeclaredValue,
}

impl PropertyDeclaration {
    pub fn new(id: LonghandId, value: SpecifiedValue) -> Self {
        PropertyDeclaration {
            id,
            value: DeclaredValue::Value(value),
        }
    }

    pub fn css_wide_keyword(id: LonghandId, keyword: CSSWideKeyword) -> Self {
        PropertyDeclaration {
            id,
            value: DeclaredValue::CSSWideKeyword(keyword),
        }
    }
}
