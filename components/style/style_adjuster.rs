/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! A struct to encapsulate all the style fixups a computed style needs in order
//! for it to adhere to the CSS spec.

use crate::dom::TElement;
use crate::properties::{ComputedValueFlags, StyleBuilder};
use crate::values::computed::{Display, Float, LengthPercentageOrAuto, Overflow, Position};
use crate::values::computed::{TextAlign, WhiteSpace, ZIndex};
use selectors::QuirksMode;

/// An unsized struct that implements all the adjustment methods.
pub struct StyleAdjuster<'a, 'b: 'a> {
    style: &'a mut StyleBuilder<'b>,
}

fn has_local_name<E: TElement>(element: Option<E>, name: &str) -> bool {
    element.map_or(false, |e| &**e.local_name() == name)
}

impl<'a, 'b: 'a> StyleAdjuster<'a, 'b> {
    /// Trivially constructs a new StyleAdjuster.
    pub fn new(style: &'a mut StyleBuilder<'b>) -> Self {
        StyleAdjuster { style }
    }

    fn floated(&self) -> bool {
        self.style.reset().float != Float::None
    }

    fn out_of_flow_positioned(&self) -> bool {
        self.style.reset().position.is_absolutely_positioned()
    }

    fn parent_is_flex_container(&self) -> bool {
        matches!(self.style.parent_reset().display, Display::Flex | Display::InlineFlex)
    }

    fn set_display(&mut self, display: Display) {
        if self.style.reset().display != display {
            self.style.mutate_reset().display = display;
        }
    }

    fn set_position(&mut self, position: Position) {
        if self.style.reset().position != position {
            self.style.mutate_reset().position = position;
        }
    }

    fn set_float(&mut self, float: Float) {
        if self.style.reset().float != float {
            self.style.mutate_reset().float = float;
        }
    }

    /// Later adjustments overwrite `display`; keep what the cascade
    /// produced.
    fn record_original_display(&mut self) {
        let display = self.style.reset().display;
        if self.style.reset().original_display != display {
            self.style.mutate_reset().original_display = display;
        }
    }

    /// In quirks mode, `td` and `table` keep their table display types
    /// whatever the page says, and a `td` never floats.
    fn adjust_for_quirky_tables<E: TElement>(&mut self, element: Option<E>, quirks_mode: QuirksMode) {
        if quirks_mode != QuirksMode::Quirks {
            return;
        }
        if has_local_name(element, "td") {
            self.set_display(Display::TableCell);
            self.set_float(Float::None);
        } else if has_local_name(element, "table") {
            let display = match self.style.reset().display {
                Display::Inline | Display::InlineBlock | Display::InlineTable | Display::InlineFlex => {
                    Display::InlineTable
                },
                _ => Display::Table,
            };
            self.set_display(display);
        }
    }

    /// A `nowrap` table cell with a fixed width wraps after all.
    fn adjust_for_table_cell_white_space<E: TElement>(&mut self, element: Option<E>) {
        if !has_local_name(element, "td") && !has_local_name(element, "th") {
            return;
        }
        if self.style.inherited().white_space == WhiteSpace::Nowrap &&
            matches!(self.style.reset().width, LengthPercentageOrAuto::Length(..))
        {
            self.style.mutate_inherited().white_space = WhiteSpace::Normal;
        }
    }

    /// Frames never honor positioning or `display`; ruby text neither
    /// floats nor is positioned; legends are always blocks.
    fn adjust_for_replaced_html_elements<E: TElement>(&mut self, element: Option<E>) {
        if has_local_name(element, "frame") || has_local_name(element, "frameset") {
            self.set_position(Position::Static);
            self.set_display(Display::Block);
        }

        if has_local_name(element, "rt") {
            self.set_position(Position::Static);
            self.set_float(Float::None);
        }

        if has_local_name(element, "legend") {
            self.set_display(Display::Block);
        }
    }

    /// Table headers are centered unless the page aligns them.
    fn adjust_for_table_header_text_align<E: TElement>(&mut self, element: Option<E>) {
        if has_local_name(element, "th") && self.style.inherited().text_align == TextAlign::Start {
            self.style.mutate_inherited().text_align = TextAlign::Center;
        }
    }

    /// Apply the blockification rules based on the table in CSS 2.2 section 9.7.
    /// https://drafts.csswg.org/css2/visuren.html#dis-pos-flo
    fn blockify_if_necessary<E: TElement>(&mut self, element: Option<E>, quirks_mode: QuirksMode) {
        let is_root_element = element.map_or(false, |e| e.is_root());
        if !self.floated() && !self.out_of_flow_positioned() && !is_root_element {
            return;
        }

        let display = self.style.reset().display;
        let blockified_display = if display == Display::ListItem &&
            self.floated() &&
            quirks_mode == QuirksMode::Quirks
        {
            Display::Block
        } else {
            display.equivalent_block_display(is_root_element)
        };
        if display != blockified_display {
            self.set_display(blockified_display);
            self.style.flags |= ComputedValueFlags::IS_BLOCKIFIED;
        }
    }

    /// https://drafts.csswg.org/css-writing-modes-3/#block-flow:
    ///
    ///    If a box has a different writing-mode value than its containing
    ///    block:
    ///
    ///        - If the box has a specified display of inline, its display
    ///          computes to inline-block. [CSS21]
    ///
    /// Pseudo-element styles are left alone.
    fn adjust_for_writing_mode<E: TElement>(&mut self, element: Option<E>) {
        if element.is_none() || self.style.reset().display != Display::Inline {
            return;
        }
        if self.style.inherited().writing_mode != self.style.parent_inherited().writing_mode {
            self.set_display(Display::InlineBlock);
        }
    }

    /// Table rows and row groups ignore `position: relative` and `sticky`.
    fn adjust_for_table_row_position(&mut self) {
        if self.style.reset().display.is_table_row_or_group() &&
            matches!(self.style.reset().position, Position::Relative | Position::Sticky)
        {
            self.set_position(Position::Static);
        }
    }

    /// `writing-mode` does not apply to table rows, columns and their
    /// groups, nor to cells.
    fn adjust_for_table_writing_mode(&mut self) {
        let applies = match self.style.reset().display {
            Display::TableColumn | Display::TableColumnGroup | Display::TableCell => true,
            ref display => display.is_table_row_or_group(),
        };
        let parent_writing_mode = self.style.parent_inherited().writing_mode;
        if applies && self.style.inherited().writing_mode != parent_writing_mode {
            self.style.mutate_inherited().writing_mode = parent_writing_mode;
        }
    }

    /// Flex items are blockified and never float.
    fn adjust_for_flex_item(&mut self) {
        if !self.parent_is_flex_container() {
            return;
        }
        self.set_float(Float::None);
        let display = self.style.reset().display;
        let blockified_display = display.equivalent_block_display(false);
        if display != blockified_display {
            self.set_display(blockified_display);
            self.style.flags |= ComputedValueFlags::IS_BLOCKIFIED;
        }
    }

    /// `z-index` only applies to positioned elements and flex items. An
    /// `auto` value becomes `0` on the root and on elements that form a
    /// stacking context.
    fn adjust_for_z_index<E: TElement>(&mut self, element: Option<E>) {
        if self.style.reset().position == Position::Static &&
            !self.parent_is_flex_container() &&
            !self.style.reset().z_index.is_auto()
        {
            self.style.mutate_reset().z_index = ZIndex::Auto;
        }

        if !self.style.reset().z_index.is_auto() {
            return;
        }
        let is_root_element = element.map_or(false, |e| e.is_root());
        if is_root_element ||
            self.style.reset().opacity < 1. ||
            self.style.reset().position == Position::Sticky
        {
            self.style.mutate_reset().z_index = ZIndex::Integer(0);
        }
    }

    /// Text areas always scroll their overflow.
    fn adjust_for_textarea_overflow<E: TElement>(&mut self, element: Option<E>) {
        if !has_local_name(element, "textarea") {
            return;
        }
        if self.style.reset().overflow_x == Overflow::Visible {
            self.style.mutate_reset().overflow_x = Overflow::Auto;
        }
        if self.style.reset().overflow_y == Overflow::Visible {
            self.style.mutate_reset().overflow_y = Overflow::Auto;
        }
    }

    /// Decorations propagate to in-flow descendants, but not into atomic
    /// inlines, tables, floats or out-of-flow boxes.
    fn adjust_for_text_decorations_in_effect(&mut self) {
        let own = self.style.reset().text_decoration_line;
        let display = self.style.reset().display;
        let starts_new_context = display.is_atomic_inline_level() ||
            display == Display::Table ||
            self.floated() ||
            self.out_of_flow_positioned();

        let in_effect = if starts_new_context {
            own
        } else {
            self.style.parent_inherited().text_decorations_in_effect | own
        };
        if self.style.inherited().text_decorations_in_effect != in_effect {
            self.style.mutate_inherited().text_decorations_in_effect = in_effect;
        }
    }

    /// CSS3 overflow-x and overflow-y require some fixup as well in some
    /// cases.
    ///
    /// overflow: visible is meaningful only when used in both dimensions.
    fn adjust_for_overflow(&mut self) {
        let original_overflow_x = self.style.reset().overflow_x;
        let original_overflow_y = self.style.reset().overflow_y;

        let mut overflow_x = original_overflow_x;
        let mut overflow_y = original_overflow_y;

        if overflow_x == overflow_y {
            return;
        }

        // If 'visible' is specified but doesn't match the other dimension,
        // it turns into 'auto'.
        if overflow_x == Overflow::Visible {
            overflow_x = Overflow::Auto;
        }

        if overflow_y == Overflow::Visible {
            overflow_y = Overflow::Auto;
        }

        if overflow_x != original_overflow_x || overflow_y != original_overflow_y {
            let reset = self.style.mutate_reset();
            reset.overflow_x = overflow_x;
            reset.overflow_y = overflow_y;
        }
    }

    /// Tables, row groups and rows clip but never scroll.
    fn adjust_for_table_overflow(&mut self) {
        let is_table_box = matches!(
            self.style.reset().display,
            Display::Table | Display::InlineTable | Display::TableRowGroup | Display::TableRow
        );
        if !is_table_box {
            return;
        }
        let fix = |overflow: Overflow| match overflow {
            Overflow::Visible | Overflow::Hidden => overflow,
            Overflow::Scroll | Overflow::Auto => Overflow::Visible,
        };
        let overflow_x = fix(self.style.reset().overflow_x);
        let overflow_y = fix(self.style.reset().overflow_y);
        if overflow_x != self.style.reset().overflow_x || overflow_y != self.style.reset().overflow_y {
            let reset = self.style.mutate_reset();
            reset.overflow_x = overflow_x;
            reset.overflow_y = overflow_y;
        }
    }

    /// Adjusts the style to account for various fixups that don't fit naturally
    /// into the cascade.
    ///
    /// `element` is the element the style is for, or `None` for
    /// pseudo-element styles. Only the just-computed values, the parent's
    /// values the builder was created with, and the element's kind are
    /// consulted.
    pub fn adjust<E: TElement>(&mut self, element: Option<E>, quirks_mode: QuirksMode) {
        self.record_original_display();

        if self.style.reset().display != Display::None {
            self.adjust_for_quirky_tables(element, quirks_mode);
            self.adjust_for_table_cell_white_space(element);
            self.adjust_for_replaced_html_elements(element);
            self.adjust_for_table_header_text_align(element);
            self.blockify_if_necessary(element, quirks_mode);
            self.adjust_for_writing_mode(element);
            self.adjust_for_table_row_position();
            self.adjust_for_table_writing_mode();
            self.adjust_for_flex_item();
        }

        self.adjust_for_z_index(element);
        self.adjust_for_textarea_overflow(element);
        self.adjust_for_text_decorations_in_effect();
        self.adjust_for_overflow();
        self.adjust_for_table_overflow();
    }
}
