/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Specified values, as they appear in declaration blocks.

use crate::values::RGBA;
use app_units::Au;
use selectors::Atom;

/// Pixels per inch, as fixed by CSS.
const PX_PER_IN: f32 = 96.;

/// The ratio of the x-height to the font size, used when no font metrics
/// are available.
const EX_PER_EM: f32 = 0.5;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum LengthUnit {
    Px,
    Pt,
    Pc,
    In,
    Cm,
    Mm,
    Em,
    Ex,
    Rem,
}

/// A `<length>` with its unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Length {
    pub value: f32,
    pub unit: LengthUnit,
}

/// What font-relative lengths resolve against.
#[derive(Clone, Copy, Debug)]
pub struct FontBase {
    /// The font size `em` and `ex` are relative to.
    pub font_size: Au,
    /// The root element's font size.
    pub root_font_size: Au,
}

impl Length {
    pub fn new(value: f32, unit: LengthUnit) -> Self {
        Length { value, unit }
    }

    pub fn px(value: f32) -> Self {
        Length::new(value, LengthUnit::Px)
    }

    pub fn em(value: f32) -> Self {
        Length::new(value, LengthUnit::Em)
    }

    pub fn is_font_relative(&self) -> bool {
        matches!(self.unit, LengthUnit::Em | LengthUnit::Ex | LengthUnit::Rem)
    }

    /// The length in CSS pixels, if it is absolute.
    fn absolute_px(&self) -> Option<f32> {
        let factor = match self.unit {
            LengthUnit::Px => 1.,
            LengthUnit::Pt => PX_PER_IN / 72.,
            LengthUnit::Pc => PX_PER_IN / 6.,
            LengthUnit::In => PX_PER_IN,
            LengthUnit::Cm => PX_PER_IN / 2.54,
            LengthUnit::Mm => PX_PER_IN / 25.4,
            LengthUnit::Em | LengthUnit::Ex | LengthUnit::Rem => return None,
        };
        Some(self.value * factor)
    }

    /// Computes the length. Absolute lengths are scaled by `zoom`;
    /// font-relative ones are not, since the font sizes they resolve
    /// against are already zoomed.
    pub fn to_computed_value(&self, base: FontBase, zoom: f32) -> Au {
        if let Some(px) = self.absolute_px() {
            return Au::from_f32_px(px * zoom);
        }
        let reference = match self.unit {
            LengthUnit::Rem => base.root_font_size,
            _ => base.font_size,
        };
        let scale = match self.unit {
            LengthUnit::Ex => self.value * EX_PER_EM,
            _ => self.value,
        };
        reference.scale_by(scale)
    }
}

/// The value of a declaration, before computation.
///
/// Property handlers accept the shapes that make sense for them and
/// reject the rest; a rejected declaration is dropped and reported.
#[derive(Clone, Debug, PartialEq)]
pub enum SpecifiedValue {
    /// A keyword such as `block`, `auto`, `red` or `currentcolor`.
    Keyword(Atom),
    /// Whitespace or comma separated keywords: `text-decoration-line`
    /// values and `font-family` lists.
    KeywordList(Box<[Atom]>),
    Length(Length),
    /// A percentage, as a fraction (`50%` is `0.5`).
    Percentage(f32),
    Number(f32),
    Integer(i32),
    Color(RGBA),
    Url(Atom),
}

impl SpecifiedValue {
    pub fn keyword(keyword: &str) -> Self {
        SpecifiedValue::Keyword(Atom::from(keyword))
    }

    pub fn as_keyword(&self) -> Option<&str> {
        match *self {
            SpecifiedValue::Keyword(ref atom) => Some(&**atom),
            _ => None,
        }
    }

    pub fn is_font_relative(&self) -> bool {
        match *self {
            SpecifiedValue::Length(ref length) => length.is_font_relative(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> FontBase {
        FontBase {
            font_size: Au::from_px(20),
            root_font_size: Au::from_px(10),
        }
    }

    #[test]
    fn absolute_lengths_scale_with_zoom() {
        assert_eq!(Length::px(10.).to_computed_value(base(), 1.), Au::from_px(10));
        assert_eq!(Length::px(10.).to_computed_value(base(), 2.), Au::from_px(20));
        assert_eq!(Length::new(1., LengthUnit::In).to_computed_value(base(), 1.), Au::from_px(96));
        assert_eq!(Length::new(6., LengthUnit::Pt).to_computed_value(base(), 1.), Au::from_px(8));
    }

    #[test]
    fn font_relative_lengths() {
        assert_eq!(Length::em(1.5).to_computed_value(base(), 3.), Au::from_px(30));
        assert_eq!(Length::new(2., LengthUnit::Ex).to_computed_value(base(), 1.), Au::from_px(20));
        assert_eq!(Length::new(2., LengthUnit::Rem).to_computed_value(base(), 1.), Au::from_px(20));
    }
}
