/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Computed values.

use app_units::Au;
use bitflags::bitflags;

pub use crate::values::image::Image;
pub use crate::values::RGBA;

define_css_keyword_enum! { Display:
    "inline" => Inline,
    "block" => Block,
    "list-item" => ListItem,
    "inline-block" => InlineBlock,
    "table" => Table,
    "inline-table" => InlineTable,
    "table-row-group" => TableRowGroup,
    "table-header-group" => TableHeaderGroup,
    "table-footer-group" => TableFooterGroup,
    "table-row" => TableRow,
    "table-column-group" => TableColumnGroup,
    "table-column" => TableColumn,
    "table-cell" => TableCell,
    "table-caption" => TableCaption,
    "flex" => Flex,
    "inline-flex" => InlineFlex,
    "none" => None,
}

impl Display {
    /// The block-level display an element gets when it is floated,
    /// absolutely positioned, or the root.
    pub fn equivalent_block_display(&self, is_root_element: bool) -> Display {
        match *self {
            Display::InlineTable => Display::Table,
            Display::InlineFlex => Display::Flex,
            Display::ListItem if is_root_element => Display::Block,
            Display::Block | Display::Table | Display::Flex | Display::ListItem | Display::None => *self,
            _ => Display::Block,
        }
    }

    pub fn is_table_row_or_group(&self) -> bool {
        matches!(
            *self,
            Display::TableRow |
                Display::TableRowGroup |
                Display::TableHeaderGroup |
                Display::TableFooterGroup
        )
    }

    /// Whether boxes with this display are laid out as atomic inlines.
    pub fn is_atomic_inline_level(&self) -> bool {
        matches!(*self, Display::InlineBlock | Display::InlineTable | Display::InlineFlex)
    }
}

define_css_keyword_enum! { Position:
    "static" => Static,
    "relative" => Relative,
    "absolute" => Absolute,
    "fixed" => Fixed,
    "sticky" => Sticky,
}

impl Position {
    pub fn is_absolutely_positioned(&self) -> bool {
        matches!(*self, Position::Absolute | Position::Fixed)
    }
}

define_css_keyword_enum! { Float:
    "none" => None,
    "left" => Left,
    "right" => Right,
}

define_css_keyword_enum! { Clear:
    "none" => None,
    "left" => Left,
    "right" => Right,
    "both" => Both,
}

define_css_keyword_enum! { Overflow:
    "visible" => Visible,
    "hidden" => Hidden,
    "scroll" => Scroll,
    "auto" => Auto,
}

define_css_keyword_enum! { Visibility:
    "visible" => Visible,
    "hidden" => Hidden,
    "collapse" => Collapse,
}

define_css_keyword_enum! { TextAlign:
    "start" => Start,
    "end" => End,
    "left" => Left,
    "right" => Right,
    "center" => Center,
    "justify" => Justify,
}

define_css_keyword_enum! { WhiteSpace:
    "normal" => Normal,
    "pre" => Pre,
    "nowrap" => Nowrap,
    "pre-wrap" => PreWrap,
    "pre-line" => PreLine,
}

define_css_keyword_enum! { Direction:
    "ltr" => Ltr,
    "rtl" => Rtl,
}

define_css_keyword_enum! { WritingMode:
    "horizontal-tb" => HorizontalTb,
    "vertical-rl" => VerticalRl,
    "vertical-lr" => VerticalLr,
}

define_css_keyword_enum! { FontStyle:
    "normal" => Normal,
    "italic" => Italic,
    "oblique" => Oblique,
}

define_css_keyword_enum! { VerticalAlign:
    "baseline" => Baseline,
    "sub" => Sub,
    "super" => Super,
    "top" => Top,
    "text-top" => TextTop,
    "middle" => Middle,
    "bottom" => Bottom,
    "text-bottom" => TextBottom,
}

bitflags! {
    #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
    pub struct TextDecorationLine: u8 {
        const UNDERLINE = 1 << 0;
        const OVERLINE = 1 << 1;
        const LINE_THROUGH = 1 << 2;
        const BLINK = 1 << 3;
    }
}

impl TextDecorationLine {
    pub fn from_ident(ident: &str) -> Option<Self> {
        const KEYWORDS: [(&str, TextDecorationLine); 5] = [
            ("none", TextDecorationLine::empty()),
            ("underline", TextDecorationLine::UNDERLINE),
            ("overline", TextDecorationLine::OVERLINE),
            ("line-through", TextDecorationLine::LINE_THROUGH),
            ("blink", TextDecorationLine::BLINK),
        ];
        KEYWORDS
            .iter()
            .find(|&&(name, _)| ident.eq_ignore_ascii_case(name))
            .map(|&(_, line)| line)
    }
}

/// `z-index`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ZIndex {
    Auto,
    Integer(i32),
}

impl ZIndex {
    pub fn is_auto(&self) -> bool {
        matches!(*self, ZIndex::Auto)
    }
}

/// A length or a percentage, resolved by layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LengthPercentage {
    Length(Au),
    /// A fraction of the containing block's size.
    Percentage(f32),
}

impl LengthPercentage {
    pub fn zero() -> Self {
        LengthPercentage::Length(Au::from_px(0))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LengthPercentageOrAuto {
    Auto,
    Length(Au),
    Percentage(f32),
}

impl LengthPercentageOrAuto {
    pub fn zero() -> Self {
        LengthPercentageOrAuto::Length(Au::from_px(0))
    }
}

/// `line-height`. Percentages and font-relative lengths are resolved
/// against the element's font size at computed-value time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LineHeight {
    Normal,
    Number(f32),
    Length(Au),
}
