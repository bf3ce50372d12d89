/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Resolved styles and the builder the cascade fills in.

use super::LonghandId;
use crate::values::computed::*;
use crate::values::image::PendingImage;
use crate::values::specified::FontBase;
use app_units::Au;
use bitflags::bitflags;
use selectors::{Atom, PseudoElement, StyleRelations};
use servo_arc::Arc;
use std::sync::OnceLock;

/// The initial `font-size` (`medium`), in CSS pixels.
pub const MEDIUM_FONT_SIZE_PX: i32 = 16;

/// Properties that inherit by default, plus values derived from them.
#[derive(Clone, Debug, PartialEq)]
pub struct InheritedStyle {
    pub color: RGBA,
    pub direction: Direction,
    pub writing_mode: WritingMode,
    pub font_family: Box<[Atom]>,
    pub font_style: FontStyle,
    pub font_weight: u16,
    /// The font size before zoom. Relative font sizes resolve against it.
    pub specified_font_size: Au,
    /// `specified_font_size` scaled by `effective_zoom`.
    pub font_size: Au,
    pub line_height: LineHeight,
    /// The product of `zoom` over this element and its ancestors.
    pub effective_zoom: f32,
    pub text_align: TextAlign,
    pub white_space: WhiteSpace,
    pub visibility: Visibility,
    pub list_style_image: Image,
    /// Decorations propagated from ancestors, combined with this element's
    /// own `text-decoration-line` by the adjuster.
    pub text_decorations_in_effect: TextDecorationLine,
}

impl InheritedStyle {
    pub fn initial() -> &'static InheritedStyle {
        static INITIAL: OnceLock<InheritedStyle> = OnceLock::new();
        INITIAL.get_or_init(|| InheritedStyle {
            color: RGBA::black(),
            direction: Direction::Ltr,
            writing_mode: WritingMode::HorizontalTb,
            font_family: vec![Atom::from("serif")].into_boxed_slice(),
            font_style: FontStyle::Normal,
            font_weight: 400,
            specified_font_size: Au::from_px(MEDIUM_FONT_SIZE_PX),
            font_size: Au::from_px(MEDIUM_FONT_SIZE_PX),
            line_height: LineHeight::Normal,
            effective_zoom: 1.,
            text_align: TextAlign::Start,
            white_space: WhiteSpace::Normal,
            visibility: Visibility::Visible,
            list_style_image: Image::None,
            text_decorations_in_effect: TextDecorationLine::empty(),
        })
    }
}

/// Properties that do not inherit by default.
#[derive(Clone, Debug, PartialEq)]
pub struct ResetStyle {
    pub zoom: f32,
    pub display: Display,
    /// `display` as the cascade computed it, before adjustment.
    pub original_display: Display,
    pub position: Position,
    pub float: Float,
    pub clear: Clear,
    pub z_index: ZIndex,
    pub overflow_x: Overflow,
    pub overflow_y: Overflow,
    pub width: LengthPercentageOrAuto,
    pub height: LengthPercentageOrAuto,
    pub margin_top: LengthPercentageOrAuto,
    pub margin_right: LengthPercentageOrAuto,
    pub margin_bottom: LengthPercentageOrAuto,
    pub margin_left: LengthPercentageOrAuto,
    pub padding_top: LengthPercentage,
    pub padding_right: LengthPercentage,
    pub padding_bottom: LengthPercentage,
    pub padding_left: LengthPercentage,
    pub background_color: RGBA,
    pub background_image: Image,
    pub opacity: f32,
    pub text_decoration_line: TextDecorationLine,
    pub vertical_align: VerticalAlign,
}

impl ResetStyle {
    pub fn initial() -> &'static ResetStyle {
        static INITIAL: OnceLock<ResetStyle> = OnceLock::new();
        INITIAL.get_or_init(|| ResetStyle {
            zoom: 1.,
            display: Display::Inline,
            original_display: Display::Inline,
            position: Position::Static,
            float: Float::None,
            clear: Clear::None,
            z_index: ZIndex::Auto,
            overflow_x: Overflow::Visible,
            overflow_y: Overflow::Visible,
            width: LengthPercentageOrAuto::Auto,
            height: LengthPercentageOrAuto::Auto,
            margin_top: LengthPercentageOrAuto::zero(),
            margin_right: LengthPercentageOrAuto::zero(),
            margin_bottom: LengthPercentageOrAuto::zero(),
            margin_left: LengthPercentageOrAuto::zero(),
            padding_top: LengthPercentage::zero(),
            padding_right: LengthPercentage::zero(),
            padding_bottom: LengthPercentage::zero(),
            padding_left: LengthPercentage::zero(),
            background_color: RGBA::transparent(),
            background_image: Image::None,
            opacity: 1.,
            text_decoration_line: TextDecorationLine::empty(),
            vertical_align: VerticalAlign::Baseline,
        })
    }
}

bitflags! {
    /// Facts about how a style was computed.
    #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
    pub struct ComputedValueFlags: u16 {
        /// A non-inherited property was set to `inherit`.
        const HAS_EXPLICITLY_INHERITED_PROPERTIES = 1 << 0;
        /// A non-inherited property used `em`, `ex` or `rem`.
        const USES_FONT_RELATIVE_RESET_VALUES = 1 << 1;
        /// A non-inherited color resolved `currentcolor`.
        const USES_CURRENTCOLOR_IN_RESET = 1 << 2;
        /// The style depends on the element's position among its siblings
        /// or on its contents, and must never be shared.
        const IS_UNIQUE = 1 << 3;
        /// `display` was changed by the adjuster.
        const IS_BLOCKIFIED = 1 << 4;
    }
}

impl ComputedValueFlags {
    /// Flags that make the non-inherited values depend on inherited ones,
    /// and so keep a style out of the matched-properties cache.
    pub const RESET_DEPENDS_ON_INHERITED: ComputedValueFlags =
        ComputedValueFlags::HAS_EXPLICITLY_INHERITED_PROPERTIES
            .union(ComputedValueFlags::USES_FONT_RELATIVE_RESET_VALUES)
            .union(ComputedValueFlags::USES_CURRENTCOLOR_IN_RESET);
}

/// The history state of a link, as reported by the embedder.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum LinkState {
    NotALink,
    Unvisited,
    Visited,
}

/// A bit per eager pseudo-element, set when a rule for it matched the
/// originating element.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct PseudoPresence(u8);

impl PseudoPresence {
    pub fn insert(&mut self, pseudo: &PseudoElement) {
        if let Some(index) = pseudo.eager_index() {
            self.0 |= 1 << index;
        }
    }

    pub fn contains(&self, pseudo: &PseudoElement) -> bool {
        pseudo.eager_index().map_or(false, |index| self.0 & (1 << index) != 0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// The resolved style of an element or pseudo-element.
///
/// Immutable once built. Elements and the caches hold it through
/// `servo_arc::Arc`; the two property structs are shared separately, so
/// styles that only differ in non-inherited values share their inherited
/// struct.
#[derive(Clone, Debug)]
pub struct ComputedValues {
    inherited: Arc<InheritedStyle>,
    reset: Arc<ResetStyle>,
    pub flags: ComputedValueFlags,
    /// What the selectors that matched depended on.
    pub relations: StyleRelations,
    pseudo_presence: PseudoPresence,
    pub link_state: LinkState,
    /// The style to use when the link this element is, or is inside, has
    /// been visited.
    visited_style: Option<Arc<ComputedValues>>,
}

impl ComputedValues {
    /// The style of an element with no matching rules and no parent.
    pub fn initial_values() -> ComputedValues {
        StyleBuilder::new(None, None).build()
    }

    #[inline]
    pub fn get_inherited(&self) -> &InheritedStyle {
        &self.inherited
    }

    #[inline]
    pub fn get_reset(&self) -> &ResetStyle {
        &self.reset
    }

    pub fn inherited_arc(&self) -> &Arc<InheritedStyle> {
        &self.inherited
    }

    pub fn reset_arc(&self) -> &Arc<ResetStyle> {
        &self.reset
    }

    pub fn display(&self) -> Display {
        self.reset.display
    }

    pub fn color(&self) -> RGBA {
        self.inherited.color
    }

    pub fn font_size(&self) -> Au {
        self.inherited.font_size
    }

    pub fn is_display_none(&self) -> bool {
        self.reset.display == Display::None
    }

    pub fn has_pseudo_style(&self, pseudo: &PseudoElement) -> bool {
        self.pseudo_presence.contains(pseudo)
    }

    pub fn pseudo_presence(&self) -> PseudoPresence {
        self.pseudo_presence
    }

    pub fn set_pseudo_presence(&mut self, presence: PseudoPresence) {
        self.pseudo_presence = presence;
    }

    pub fn visited_style(&self) -> Option<&Arc<ComputedValues>> {
        self.visited_style.as_ref()
    }

    pub fn set_visited_style(&mut self, style: Option<Arc<ComputedValues>>) {
        self.visited_style = style;
    }

    /// Whether both styles have identical property values, regardless of
    /// how they were computed.
    pub fn eq_properties(&self, other: &ComputedValues) -> bool {
        (Arc::ptr_eq(&self.inherited, &other.inherited) || *self.inherited == *other.inherited) &&
            (Arc::ptr_eq(&self.reset, &other.reset) || *self.reset == *other.reset)
    }

    /// Like `eq_properties`, but also compares the visited variants and the
    /// pseudo-element presence bits.
    pub fn eq_resolved(&self, other: &ComputedValues) -> bool {
        if !self.eq_properties(other) || self.pseudo_presence != other.pseudo_presence {
            return false;
        }
        match (&self.visited_style, &other.visited_style) {
            (None, None) => true,
            (Some(a), Some(b)) => a.eq_properties(b),
            _ => false,
        }
    }

    /// The image-valued properties still waiting for a load.
    pub fn pending_images(&self) -> impl Iterator<Item = (LonghandId, &PendingImage)> {
        let background = self
            .reset
            .background_image
            .pending()
            .map(|image| (LonghandId::BackgroundImage, image));
        let list = self
            .inherited
            .list_style_image
            .pending()
            .map(|image| (LonghandId::ListStyleImage, image));
        background.into_iter().chain(list)
    }
}

/// A style being computed.
///
/// Both property structs start out shared: the inherited one with the
/// parent, the reset one with the initial values. The first write to
/// either clones it.
pub struct StyleBuilder<'a> {
    parent_style: Option<&'a ComputedValues>,
    /// The root element's style, for `rem`. `None` while styling the root.
    root_style: Option<&'a ComputedValues>,
    inherited: Arc<InheritedStyle>,
    reset: Arc<ResetStyle>,
    pub flags: ComputedValueFlags,
}

impl<'a> StyleBuilder<'a> {
    pub fn new(
        parent_style: Option<&'a ComputedValues>,
        root_style: Option<&'a ComputedValues>,
    ) -> Self {
        let inherited = match parent_style {
            Some(parent) => parent.inherited.clone(),
            None => Arc::new(InheritedStyle::initial().clone()),
        };
        StyleBuilder {
            parent_style,
            root_style,
            inherited,
            reset: Arc::new(ResetStyle::initial().clone()),
            flags: ComputedValueFlags::empty(),
        }
    }

    pub fn parent_inherited(&self) -> &InheritedStyle {
        match self.parent_style {
            Some(parent) => &parent.inherited,
            None => InheritedStyle::initial(),
        }
    }

    pub fn parent_reset(&self) -> &ResetStyle {
        match self.parent_style {
            Some(parent) => &parent.reset,
            None => ResetStyle::initial(),
        }
    }

    #[inline]
    pub fn inherited(&self) -> &InheritedStyle {
        &self.inherited
    }

    #[inline]
    pub fn reset(&self) -> &ResetStyle {
        &self.reset
    }

    #[inline]
    pub fn mutate_inherited(&mut self) -> &mut InheritedStyle {
        Arc::make_mut(&mut self.inherited)
    }

    #[inline]
    pub fn mutate_reset(&mut self) -> &mut ResetStyle {
        Arc::make_mut(&mut self.reset)
    }

    /// Replaces the non-inherited struct with one computed earlier for the
    /// same declarations.
    pub fn reuse_reset(&mut self, reset: Arc<ResetStyle>) {
        self.reset = reset;
    }

    /// Replaces the inherited struct wholesale.
    pub fn reuse_inherited(&mut self, inherited: Arc<InheritedStyle>) {
        self.inherited = inherited;
    }

    pub fn inherited_arc(&self) -> &Arc<InheritedStyle> {
        &self.inherited
    }

    pub fn reset_arc(&self) -> &Arc<ResetStyle> {
        &self.reset
    }

    /// The base for lengths on this element.
    pub fn font_base(&self) -> FontBase {
        FontBase {
            font_size: self.inherited.font_size,
            root_font_size: match self.root_style {
                Some(root) => root.inherited.font_size,
                None => self.inherited.font_size,
            },
        }
    }

    /// The base for `font-size` itself: the parent's unzoomed size, and the
    /// root's unzoomed size (or `medium` on the root).
    pub fn font_size_base(&self) -> FontBase {
        FontBase {
            font_size: self.parent_inherited().specified_font_size,
            root_font_size: match self.root_style {
                Some(root) => root.inherited.specified_font_size,
                None => Au::from_px(MEDIUM_FONT_SIZE_PX),
            },
        }
    }

    /// Derives the effective zoom from the parent's and this element's
    /// `zoom`.
    pub fn fixup_effective_zoom(&mut self) {
        let effective_zoom = self.parent_inherited().effective_zoom * self.reset.zoom;
        if effective_zoom != self.inherited.effective_zoom {
            self.mutate_inherited().effective_zoom = effective_zoom;
        }
    }

    /// Recomputes the used font size from the unzoomed one once the
    /// effective zoom is known.
    pub fn fixup_font_size(&mut self) {
        let zoomed = self
            .inherited
            .specified_font_size
            .scale_by(self.inherited.effective_zoom);
        if zoomed != self.inherited.font_size {
            self.mutate_inherited().font_size = zoomed;
        }
    }

    pub fn build(self) -> ComputedValues {
        ComputedValues {
            inherited: self.inherited,
            reset: self.reset,
            flags: self.flags,
            relations: StyleRelations::empty(),
            pseudo_presence: PseudoPresence::default(),
            link_state: LinkState::NotALink,
            visited_style: None,
        }
    }
}
