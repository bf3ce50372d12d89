/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The property table: how each longhand inherits, resets and computes.

use super::computed_values::{ComputedValueFlags, InheritedStyle, ResetStyle, StyleBuilder};
use super::computed_values::MEDIUM_FONT_SIZE_PX;
use super::{LonghandId, LONGHAND_COUNT};
use crate::values::computed::*;
use crate::values::image::PendingImage;
use crate::values::specified::SpecifiedValue;
use app_units::Au;

/// One row of the property table.
pub struct LonghandHandler {
    pub id: LonghandId,
    pub name: &'static str,
    pub inherited: bool,
    /// Applied in the first cascade pass.
    pub primary: bool,
    pub cascade_inherit: fn(&mut StyleBuilder),
    pub cascade_initial: fn(&mut StyleBuilder),
    /// Computes and stores a specified value. Values the property does
    /// not accept are rejected before anything is written.
    pub cascade_value: fn(&SpecifiedValue, &mut StyleBuilder) -> Result<(), ()>,
}

macro_rules! longhand {
    (@inherit inherited $builder: ident . $field: ident) => {{
        let value = $builder.parent_inherited().$field.clone();
        $builder.mutate_inherited().$field = value;
    }};
    (@inherit reset $builder: ident . $field: ident) => {{
        let value = $builder.parent_reset().$field.clone();
        $builder.mutate_reset().$field = value;
    }};
    (@initial inherited $builder: ident . $field: ident) => {{
        $builder.mutate_inherited().$field = InheritedStyle::initial().$field.clone();
    }};
    (@initial reset $builder: ident . $field: ident) => {{
        $builder.mutate_reset().$field = ResetStyle::initial().$field.clone();
    }};
    ($module: ident, $kind: ident . $field: ident, |$value: ident, $b: ident| $body: block) => {
        pub mod $module {
            use super::*;

            pub fn cascade_inherit(builder: &mut StyleBuilder) {
                longhand!(@inherit $kind builder.$field)
            }

            pub fn cascade_initial(builder: &mut StyleBuilder) {
                longhand!(@initial $kind builder.$field)
            }

            #[allow(unused_variables)]
            pub fn cascade_value($value: &SpecifiedValue, $b: &mut StyleBuilder) -> Result<(), ()> {
                $body
                Ok(())
            }
        }
    };
}

/// A longhand whose value is a single keyword of `$ty`.
macro_rules! keyword_longhand {
    ($module: ident, $kind: ident . $field: ident, $ty: ident) => {
        longhand!($module, $kind.$field, |value, builder| {
            let keyword = keyword(value, $ty::from_ident)?;
            set!($kind builder.$field = keyword);
        });
    };
}

macro_rules! set {
    (inherited $builder: ident . $field: ident = $value: expr) => {
        $builder.mutate_inherited().$field = $value
    };
    (reset $builder: ident . $field: ident = $value: expr) => {
        $builder.mutate_reset().$field = $value
    };
}

fn keyword<T>(value: &SpecifiedValue, parse: fn(&str) -> Option<T>) -> Result<T, ()> {
    value.as_keyword().and_then(parse).ok_or(())
}

fn is_keyword(value: &SpecifiedValue, expected: &str) -> bool {
    value
        .as_keyword()
        .map_or(false, |keyword| keyword.eq_ignore_ascii_case(expected))
}

fn length_percentage_or_auto(
    value: &SpecifiedValue,
    builder: &StyleBuilder,
    allow_negative: bool,
) -> Result<LengthPercentageOrAuto, ()> {
    Ok(match *value {
        _ if is_keyword(value, "auto") => LengthPercentageOrAuto::Auto,
        SpecifiedValue::Length(ref length) => {
            if !allow_negative && length.value < 0. {
                return Err(());
            }
            let computed =
                length.to_computed_value(builder.font_base(), builder.inherited().effective_zoom);
            LengthPercentageOrAuto::Length(computed)
        },
        SpecifiedValue::Percentage(p) if allow_negative || p >= 0. => {
            LengthPercentageOrAuto::Percentage(p)
        },
        // Unitless zero.
        SpecifiedValue::Number(n) if n == 0. => LengthPercentageOrAuto::zero(),
        SpecifiedValue::Integer(0) => LengthPercentageOrAuto::zero(),
        _ => return Err(()),
    })
}

fn non_negative_length_percentage(
    value: &SpecifiedValue,
    builder: &StyleBuilder,
) -> Result<LengthPercentage, ()> {
    match length_percentage_or_auto(value, builder, false)? {
        LengthPercentageOrAuto::Auto => Err(()),
        LengthPercentageOrAuto::Length(au) => Ok(LengthPercentage::Length(au)),
        LengthPercentageOrAuto::Percentage(p) => Ok(LengthPercentage::Percentage(p)),
    }
}

/// Resolves a color value. `currentcolor` is `None`: its meaning depends
/// on the property.
fn color(value: &SpecifiedValue) -> Result<Option<RGBA>, ()> {
    match *value {
        SpecifiedValue::Color(rgba) => Ok(Some(rgba)),
        SpecifiedValue::Keyword(ref keyword) if (**keyword).eq_ignore_ascii_case("currentcolor") => {
            Ok(None)
        },
        SpecifiedValue::Keyword(ref keyword) => RGBA::from_name(keyword).map(Some).ok_or(()),
        _ => Err(()),
    }
}

fn image(value: &SpecifiedValue) -> Result<Image, ()> {
    match *value {
        SpecifiedValue::Url(ref url) => Ok(Image::Pending(PendingImage { url: url.clone() })),
        _ if is_keyword(value, "none") => Ok(Image::None),
        _ => Err(()),
    }
}

/// Scale factors of the absolute-size keywords, relative to `medium`.
fn font_size_keyword_factor(keyword: &str) -> Option<f32> {
    const KEYWORDS: [(&str, f32); 7] = [
        ("xx-small", 3. / 5.),
        ("x-small", 3. / 4.),
        ("small", 8. / 9.),
        ("medium", 1.),
        ("large", 6. / 5.),
        ("x-large", 3. / 2.),
        ("xx-large", 2.),
    ];
    KEYWORDS
        .iter()
        .find(|&&(name, _)| keyword.eq_ignore_ascii_case(name))
        .map(|&(_, factor)| factor)
}

/// The ratio between adjacent sizes for `larger` and `smaller`.
const FONT_SIZE_STEP: f32 = 1.2;

fn bolder(weight: u16) -> u16 {
    match weight {
        0..=349 => 400,
        350..=549 => 700,
        _ => 900,
    }
}

fn lighter(weight: u16) -> u16 {
    match weight {
        0..=549 => 100,
        550..=749 => 400,
        _ => 700,
    }
}

longhand!(zoom, reset.zoom, |value, builder| {
    let zoom = match *value {
        _ if is_keyword(value, "normal") => 1.,
        SpecifiedValue::Number(n) if n > 0. => n,
        SpecifiedValue::Integer(n) if n > 0 => n as f32,
        SpecifiedValue::Percentage(p) if p > 0. => p,
        _ => return Err(()),
    };
    set!(reset builder.zoom = zoom);
});

keyword_longhand!(direction, inherited.direction, Direction);
keyword_longhand!(writing_mode, inherited.writing_mode, WritingMode);

longhand!(font_family, inherited.font_family, |value, builder| {
    let family = match *value {
        SpecifiedValue::Keyword(ref name) => vec![name.clone()].into_boxed_slice(),
        SpecifiedValue::KeywordList(ref names) if !names.is_empty() => names.clone(),
        _ => return Err(()),
    };
    set!(inherited builder.font_family = family);
});

keyword_longhand!(font_style, inherited.font_style, FontStyle);

longhand!(font_weight, inherited.font_weight, |value, builder| {
    let parent = builder.parent_inherited().font_weight;
    let weight = match *value {
        SpecifiedValue::Integer(w) if (1..=1000).contains(&w) => w as u16,
        SpecifiedValue::Number(w) if (1. ..=1000.).contains(&w) => w as u16,
        _ if is_keyword(value, "normal") => 400,
        _ if is_keyword(value, "bold") => 700,
        _ if is_keyword(value, "bolder") => bolder(parent),
        _ if is_keyword(value, "lighter") => lighter(parent),
        _ => return Err(()),
    };
    set!(inherited builder.font_weight = weight);
});

// Writes the unzoomed size; the cascade scales it once the effective zoom
// is known.
longhand!(font_size, inherited.specified_font_size, |value, builder| {
    let base = builder.font_size_base();
    let size = match *value {
        SpecifiedValue::Length(ref length) if length.value >= 0. => {
            length.to_computed_value(base, 1.)
        },
        SpecifiedValue::Percentage(p) if p >= 0. => base.font_size.scale_by(p),
        SpecifiedValue::Keyword(ref keyword) => {
            if (**keyword).eq_ignore_ascii_case("larger") {
                base.font_size.scale_by(FONT_SIZE_STEP)
            } else if (**keyword).eq_ignore_ascii_case("smaller") {
                base.font_size.scale_by(1. / FONT_SIZE_STEP)
            } else {
                let factor = font_size_keyword_factor(keyword).ok_or(())?;
                Au::from_px(MEDIUM_FONT_SIZE_PX).scale_by(factor)
            }
        },
        _ => return Err(()),
    };
    set!(inherited builder.specified_font_size = size);
});

longhand!(color, inherited.color, |value, builder| {
    let rgba = match color(value)? {
        Some(rgba) => rgba,
        // `currentcolor` on `color` itself is `inherit`.
        None => builder.parent_inherited().color,
    };
    set!(inherited builder.color = rgba);
});

longhand!(line_height, inherited.line_height, |value, builder| {
    let line_height = match *value {
        _ if is_keyword(value, "normal") => LineHeight::Normal,
        SpecifiedValue::Number(n) if n >= 0. => LineHeight::Number(n),
        SpecifiedValue::Integer(n) if n >= 0 => LineHeight::Number(n as f32),
        SpecifiedValue::Length(ref length) if length.value >= 0. => LineHeight::Length(
            length.to_computed_value(builder.font_base(), builder.inherited().effective_zoom),
        ),
        SpecifiedValue::Percentage(p) if p >= 0. => {
            LineHeight::Length(builder.inherited().font_size.scale_by(p))
        },
        _ => return Err(()),
    };
    set!(inherited builder.line_height = line_height);
});

keyword_longhand!(display, reset.display, Display);
keyword_longhand!(position, reset.position, Position);
keyword_longhand!(float, reset.float, Float);
keyword_longhand!(clear, reset.clear, Clear);

longhand!(z_index, reset.z_index, |value, builder| {
    let z_index = match *value {
        _ if is_keyword(value, "auto") => ZIndex::Auto,
        SpecifiedValue::Integer(i) => ZIndex::Integer(i),
        SpecifiedValue::Number(n) if n.fract() == 0. => ZIndex::Integer(n as i32),
        _ => return Err(()),
    };
    set!(reset builder.z_index = z_index);
});

keyword_longhand!(overflow_x, reset.overflow_x, Overflow);
keyword_longhand!(overflow_y, reset.overflow_y, Overflow);

macro_rules! size_longhand {
    ($module: ident, $field: ident, allow_negative = $allow_negative: expr) => {
        longhand!($module, reset.$field, |value, builder| {
            let computed = length_percentage_or_auto(value, builder, $allow_negative)?;
            set!(reset builder.$field = computed);
        });
    };
}

size_longhand!(width, width, allow_negative = false);
size_longhand!(height, height, allow_negative = false);
size_longhand!(margin_top, margin_top, allow_negative = true);
size_longhand!(margin_right, margin_right, allow_negative = true);
size_longhand!(margin_bottom, margin_bottom, allow_negative = true);
size_longhand!(margin_left, margin_left, allow_negative = true);

macro_rules! padding_longhand {
    ($module: ident) => {
        longhand!($module, reset.$module, |value, builder| {
            let computed = non_negative_length_percentage(value, builder)?;
            set!(reset builder.$module = computed);
        });
    };
}

padding_longhand!(padding_top);
padding_longhand!(padding_right);
padding_longhand!(padding_bottom);
padding_longhand!(padding_left);

longhand!(background_color, reset.background_color, |value, builder| {
    let rgba = match color(value)? {
        Some(rgba) => rgba,
        None => {
            builder.flags |= ComputedValueFlags::USES_CURRENTCOLOR_IN_RESET;
            builder.inherited().color
        },
    };
    set!(reset builder.background_color = rgba);
});

longhand!(background_image, reset.background_image, |value, builder| {
    let image = image(value)?;
    set!(reset builder.background_image = image);
});

longhand!(list_style_image, inherited.list_style_image, |value, builder| {
    let image = image(value)?;
    set!(inherited builder.list_style_image = image);
});

longhand!(opacity, reset.opacity, |value, builder| {
    let opacity = match *value {
        SpecifiedValue::Number(n) => n,
        SpecifiedValue::Integer(n) => n as f32,
        SpecifiedValue::Percentage(p) => p,
        _ => return Err(()),
    };
    set!(reset builder.opacity = opacity.max(0.).min(1.));
});

keyword_longhand!(visibility, inherited.visibility, Visibility);
keyword_longhand!(text_align, inherited.text_align, TextAlign);
keyword_longhand!(white_space, inherited.white_space, WhiteSpace);

longhand!(text_decoration_line, reset.text_decoration_line, |value, builder| {
    let line = match *value {
        SpecifiedValue::Keyword(ref keyword) => TextDecorationLine::from_ident(keyword).ok_or(())?,
        SpecifiedValue::KeywordList(ref keywords) if !keywords.is_empty() => {
            let mut line = TextDecorationLine::empty();
            for keyword in keywords.iter() {
                let bits = TextDecorationLine::from_ident(keyword).ok_or(())?;
                // `none` only stands alone.
                if bits.is_empty() {
                    return Err(());
                }
                line |= bits;
            }
            line
        },
        _ => return Err(()),
    };
    set!(reset builder.text_decoration_line = line);
});

keyword_longhand!(vertical_align, reset.vertical_align, VerticalAlign);

macro_rules! handler {
    ($id: ident, $name: expr, $module: ident, inherited = $inherited: expr, primary = $primary: expr) => {
        LonghandHandler {
            id: LonghandId::$id,
            name: $name,
            inherited: $inherited,
            primary: $primary,
            cascade_inherit: $module::cascade_inherit,
            cascade_initial: $module::cascade_initial,
            cascade_value: $module::cascade_value,
        }
    };
}

/// Indexed by `LonghandId`.
pub static LONGHANDS: [LonghandHandler; LONGHAND_COUNT] = [
    handler!(Zoom, "zoom", zoom, inherited = false, primary = true),
    handler!(Direction, "direction", direction, inherited = true, primary = true),
    handler!(WritingMode, "writing-mode", writing_mode, inherited = true, primary = true),
    handler!(FontFamily, "font-family", font_family, inherited = true, primary = true),
    handler!(FontStyle, "font-style", font_style, inherited = true, primary = true),
    handler!(FontWeight, "font-weight", font_weight, inherited = true, primary = true),
    handler!(FontSize, "font-size", font_size, inherited = true, primary = true),
    handler!(Color, "color", color, inherited = true, primary = true),
    handler!(LineHeight, "line-height", line_height, inherited = true, primary = true),
    handler!(Display, "display", display, inherited = false, primary = false),
    handler!(Position, "position", position, inherited = false, primary = false),
    handler!(Float, "float", float, inherited = false, primary = false),
    handler!(Clear, "clear", clear, inherited = false, primary = false),
    handler!(ZIndex, "z-index", z_index, inherited = false, primary = false),
    handler!(OverflowX, "overflow-x", overflow_x, inherited = false, primary = false),
    handler!(OverflowY, "overflow-y", overflow_y, inherited = false, primary = false),
    handler!(Width, "width", width, inherited = false, primary = false),
    handler!(Height, "height", height, inherited = false, primary = false),
    handler!(MarginTop, "margin-top", margin_top, inherited = false, primary = false),
    handler!(MarginRight, "margin-right", margin_right, inherited = false, primary = false),
    handler!(MarginBottom, "margin-bottom", margin_bottom, inherited = false, primary = false),
    handler!(MarginLeft, "margin-left", margin_left, inherited = false, primary = false),
    handler!(PaddingTop, "padding-top", padding_top, inherited = false, primary = false),
    handler!(PaddingRight, "padding-right", padding_right, inherited = false, primary = false),
    handler!(PaddingBottom, "padding-bottom", padding_bottom, inherited = false, primary = false),
    handler!(PaddingLeft, "padding-left", padding_left, inherited = false, primary = false),
    handler!(BackgroundColor, "background-color", background_color, inherited = false, primary = false),
    handler!(BackgroundImage, "background-image", background_image, inherited = false, primary = false),
    handler!(ListStyleImage, "list-style-image", list_style_image, inherited = true, primary = false),
    handler!(Opacity, "opacity", opacity, inherited = false, primary = false),
    handler!(Visibility, "visibility", visibility, inherited = true, primary = false),
    handler!(TextAlign, "text-align", text_align, inherited = true, primary = false),
    handler!(WhiteSpace, "white-space", white_space, inherited = true, primary = false),
    handler!(TextDecorationLine, "text-decoration-line", text_decoration_line, inherited = false, primary = false),
    handler!(VerticalAlign, "vertical-align", vertical_align, inherited = false, primary = false),
];
