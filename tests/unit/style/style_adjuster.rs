/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use crate::helpers::*;
use selectors::{QuirksMode, SelectorBuilder};
use style::context::StyleSystemOptions;
use style::properties::{ComputedValueFlags, LonghandId};
use style::stylesheets::Origin;
use style::values::computed::{Display, Float, Overflow, TextAlign, TextDecorationLine, ZIndex};
use style::values::specified::SpecifiedValue;

fn tag(name: &str) -> SelectorBuilder {
    SelectorBuilder::new().local_name(name)
}

fn class(name: &str) -> SelectorBuilder {
    SelectorBuilder::new().class(name)
}

#[test]
fn floats_and_absolutely_positioned_boxes_are_blockified() {
    let stylist = author_stylist(vec![
        rule(class("float"), &[keyword(LonghandId::Float, "left")]),
        rule(class("abs"), &[keyword(LonghandId::Position, "absolute")]),
        rule(class("inline-table"), &[
            keyword(LonghandId::Position, "fixed"),
            keyword(LonghandId::Display, "inline-table"),
        ]),
    ]);
    let mut page = Page::new();
    let body = page.body;
    let floated = page.add(body, "span", Some("float"));
    let absolute = page.add(body, "span", Some("abs"));
    let table = page.add(body, "span", Some("inline-table"));
    let plain = page.add(body, "span", None);

    style_document(&page.doc, &stylist, StyleSystemOptions::default());

    let floated = primary_style(&page.doc, floated);
    assert_eq!(floated.display(), Display::Block);
    assert_eq!(floated.get_reset().original_display, Display::Inline);
    assert!(floated.flags.contains(ComputedValueFlags::IS_BLOCKIFIED));

    assert_eq!(primary_style(&page.doc, absolute).display(), Display::Block);
    assert_eq!(primary_style(&page.doc, table).display(), Display::Table);

    let plain = primary_style(&page.doc, plain);
    assert_eq!(plain.display(), Display::Inline);
    assert!(!plain.flags.contains(ComputedValueFlags::IS_BLOCKIFIED));
}

#[test]
fn the_root_is_blockified() {
    let stylist = author_stylist(vec![rule(tag("html"), &[keyword(LonghandId::Display, "list-item")])]);
    let page = Page::new();

    style_document(&page.doc, &stylist, StyleSystemOptions::default());
    let root = primary_style(&page.doc, page.html);
    assert_eq!(root.display(), Display::Block);
    assert_eq!(root.get_reset().z_index, ZIndex::Integer(0));
}

#[test]
fn flex_items_are_blockified_and_never_float() {
    let stylist = author_stylist(vec![
        rule(class("flex"), &[keyword(LonghandId::Display, "flex")]),
        rule(class("item"), &[keyword(LonghandId::Float, "right")]),
    ]);
    let mut page = Page::new();
    let body = page.body;
    let container = page.add(body, "div", Some("flex"));
    let item = page.add(container, "span", Some("item"));
    let table = page.add(container, "span", None);
    page.doc
        .set_style_attribute(table, block(&[keyword(LonghandId::Display, "inline-table")]));

    style_document(&page.doc, &stylist, StyleSystemOptions::default());
    let item = primary_style(&page.doc, item);
    assert_eq!(item.display(), Display::Block);
    assert_eq!(item.get_reset().float, Float::None);
    assert_eq!(primary_style(&page.doc, table).display(), Display::Table);
}

#[test]
fn z_index_needs_positioning_or_a_stacking_context() {
    let stylist = author_stylist(vec![
        rule(class("static"), &[(LonghandId::ZIndex, SpecifiedValue::Integer(3))]),
        rule(class("relative"), &[
            keyword(LonghandId::Position, "relative"),
            (LonghandId::ZIndex, SpecifiedValue::Integer(3)),
        ]),
        rule(class("faded"), &[(LonghandId::Opacity, SpecifiedValue::Number(0.5))]),
    ]);
    let mut page = Page::new();
    let body = page.body;
    let fixed = page.add(body, "div", Some("static"));
    let relative = page.add(body, "div", Some("relative"));
    let faded = page.add(body, "div", Some("faded"));

    style_document(&page.doc, &stylist, StyleSystemOptions::default());
    assert_eq!(primary_style(&page.doc, fixed).get_reset().z_index, ZIndex::Auto);
    assert_eq!(primary_style(&page.doc, relative).get_reset().z_index, ZIndex::Integer(3));
    assert_eq!(primary_style(&page.doc, faded).get_reset().z_index, ZIndex::Integer(0));
    assert_eq!(primary_style(&page.doc, body).get_reset().z_index, ZIndex::Auto);
}

#[test]
fn table_headers_are_centered_unless_aligned() {
    let stylist = author_stylist(vec![rule(class("left"), &[keyword(LonghandId::TextAlign, "left")])]);
    let mut page = Page::new();
    let body = page.body;
    let table = page.add(body, "table", None);
    let row = page.add(table, "tr", None);
    let header = page.add(row, "th", None);
    let aligned = page.add(row, "th", Some("left"));
    let cell = page.add(row, "td", None);

    style_document(&page.doc, &stylist, StyleSystemOptions::default());
    assert_eq!(primary_style(&page.doc, header).get_inherited().text_align, TextAlign::Center);
    assert_eq!(primary_style(&page.doc, aligned).get_inherited().text_align, TextAlign::Left);
    assert_eq!(primary_style(&page.doc, cell).get_inherited().text_align, TextAlign::Start);
}

#[test]
fn visible_overflow_is_auto_when_the_other_axis_is_not() {
    let stylist = author_stylist(vec![
        rule(class("x"), &[keyword(LonghandId::OverflowX, "hidden")]),
        rule(class("both"), &[
            keyword(LonghandId::OverflowX, "hidden"),
            keyword(LonghandId::OverflowY, "hidden"),
        ]),
    ]);
    let mut page = Page::new();
    let body = page.body;
    let x = page.add(body, "div", Some("x"));
    let both = page.add(body, "div", Some("both"));

    style_document(&page.doc, &stylist, StyleSystemOptions::default());
    let x = primary_style(&page.doc, x);
    assert_eq!(x.get_reset().overflow_x, Overflow::Hidden);
    assert_eq!(x.get_reset().overflow_y, Overflow::Auto);
    let both = primary_style(&page.doc, both);
    assert_eq!(both.get_reset().overflow_y, Overflow::Hidden);
}

#[test]
fn text_decorations_reach_in_flow_descendants_only() {
    let stylist = author_stylist(vec![
        rule(class("float"), &[keyword(LonghandId::Float, "left")]),
        rule(class("over"), &[keyword(LonghandId::TextDecorationLine, "overline")]),
    ]);
    let mut page = Page::new();
    let body = page.body;
    let underlined = page.add(body, "u", None);
    let inner = page.add(underlined, "span", Some("over"));
    let floated = page.add(underlined, "span", Some("float"));

    style_document(&page.doc, &stylist, StyleSystemOptions::default());
    assert_eq!(
        primary_style(&page.doc, underlined).get_inherited().text_decorations_in_effect,
        TextDecorationLine::UNDERLINE
    );
    assert_eq!(
        primary_style(&page.doc, inner).get_inherited().text_decorations_in_effect,
        TextDecorationLine::UNDERLINE | TextDecorationLine::OVERLINE
    );
    assert_eq!(
        primary_style(&page.doc, floated).get_inherited().text_decorations_in_effect,
        TextDecorationLine::empty()
    );
}

#[test]
fn quirky_table_cells_never_float() {
    let author = sheet(Origin::Author, vec![rule(tag("td"), &[
        keyword(LonghandId::Float, "left"),
        keyword(LonghandId::Display, "inline"),
    ])]);
    let build = |quirks_mode| {
        let stylist = stylist_with_quirks(&[author.clone()], quirks_mode);
        let mut page = Page::new();
        let body = page.body;
        let table = page.add(body, "table", None);
        let row = page.add(table, "tr", None);
        let cell = page.add(row, "td", None);
        style_document(&page.doc, &stylist, StyleSystemOptions::default());
        primary_style(&page.doc, cell)
    };

    let quirky = build(QuirksMode::Quirks);
    assert_eq!(quirky.display(), Display::TableCell);
    assert_eq!(quirky.get_reset().float, Float::None);

    let standard = build(QuirksMode::NoQuirks);
    assert_eq!(standard.display(), Display::Block);
    assert_eq!(standard.get_reset().float, Float::Left);
}
