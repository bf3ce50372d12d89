/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use crate::helpers::*;
use selectors::{QuirksMode, SelectorBuilder};
use style::context::StyleSystemOptions;
use style::properties::{CSSWideKeyword, Importance, LonghandId, PropertyDeclaration};
use style::properties::PropertyDeclarationBlock;
use style::stylesheets::Origin;
use style::values::computed::Display;
use style::values::specified::SpecifiedValue;
use style::values::RGBA;

fn p() -> SelectorBuilder {
    SelectorBuilder::new().local_name("p")
}

#[test]
fn id_beats_class_whatever_the_order() {
    let stylist = author_stylist(vec![
        rule(SelectorBuilder::new().id("x"), &[color(RED)]),
        rule(SelectorBuilder::new().class("c"), &[color(BLUE)]),
    ]);
    let mut page = Page::new();
    let body = page.body;
    let div = page.add(body, "div", Some("c"));
    page.doc.set_attribute(div, "id", "x");

    style_document(&page.doc, &stylist, StyleSystemOptions::default());
    assert_eq!(primary_style(&page.doc, div).color(), RED);
}

#[test]
fn one_id_beats_five_classes() {
    let stylist = author_stylist(vec![
        rule(SelectorBuilder::new().id("x"), &[color(RED)]),
        rule(
            SelectorBuilder::new()
                .class("a")
                .class("b")
                .class("c")
                .class("d")
                .class("e"),
            &[color(BLUE)],
        ),
    ]);
    let mut page = Page::new();
    let body = page.body;
    let div = page.add(body, "div", Some("a b c d e"));
    page.doc.set_attribute(div, "id", "x");

    style_document(&page.doc, &stylist, StyleSystemOptions::default());
    assert_eq!(primary_style(&page.doc, div).color(), RED);
}

#[test]
fn later_rule_wins_at_equal_specificity() {
    let stylist = author_stylist(vec![rule(p(), &[color(RED)]), rule(p(), &[color(BLUE)])]);
    let mut page = Page::new();
    let body = page.body;
    let para = page.add(body, "p", None);

    style_document(&page.doc, &stylist, StyleSystemOptions::default());
    assert_eq!(primary_style(&page.doc, para).color(), BLUE);
}

#[test]
fn author_beats_user_beats_user_agent() {
    let user = sheet(
        Origin::User,
        vec![rule(p(), &[color(GREEN), keyword(LonghandId::Display, "inline")])],
    );
    let author = sheet(Origin::Author, vec![rule(p(), &[color(BLUE)])]);
    let stylist = stylist_with_quirks(&[user, author], QuirksMode::NoQuirks);
    let mut page = Page::new();
    let body = page.body;
    let para = page.add(body, "p", None);

    style_document(&page.doc, &stylist, StyleSystemOptions::default());
    let style = primary_style(&page.doc, para);
    assert_eq!(style.color(), BLUE);
    // The user-agent sheet says `p { display: block }`.
    assert_eq!(style.display(), Display::Inline);
}

#[test]
fn important_user_declaration_beats_author() {
    let user = sheet(Origin::User, vec![important_rule(p(), &[color(GREEN)])]);
    let author = sheet(
        Origin::Author,
        vec![rule(SelectorBuilder::new().local_name("p").id("x"), &[color(BLUE)])],
    );
    let stylist = stylist_with_quirks(&[user, author], QuirksMode::NoQuirks);
    let mut page = Page::new();
    let body = page.body;
    let para = page.add(body, "p", None);
    page.doc.set_attribute(para, "id", "x");

    style_document(&page.doc, &stylist, StyleSystemOptions::default());
    assert_eq!(primary_style(&page.doc, para).color(), GREEN);
}

#[test]
fn style_attribute_beats_rules_but_not_important_ones() {
    let stylist = author_stylist(vec![
        rule(SelectorBuilder::new().id("x"), &[color(RED)]),
        important_rule(p(), &[keyword(LonghandId::Display, "inline")]),
    ]);
    let mut page = Page::new();
    let body = page.body;
    let para = page.add(body, "p", None);
    page.doc.set_attribute(para, "id", "x");
    page.doc
        .set_style_attribute(para, block(&[color(GREEN), keyword(LonghandId::Display, "none")]));

    style_document(&page.doc, &stylist, StyleSystemOptions::default());
    let style = primary_style(&page.doc, para);
    assert_eq!(style.color(), GREEN);
    assert_eq!(style.display(), Display::Inline);
}

#[test]
fn empty_rule_changes_nothing() {
    let colored = rule(p(), &[color(RED)]);
    let with_empty = author_stylist(vec![
        colored.clone(),
        rule_with_block(p(), PropertyDeclarationBlock::new()),
    ]);
    let without_empty = author_stylist(vec![colored]);

    let build = || {
        let mut page = Page::new();
        let body = page.body;
        let para = page.add(body, "p", None);
        (page, para)
    };
    let (first, first_para) = build();
    let (second, second_para) = build();
    style_document(&first.doc, &with_empty, StyleSystemOptions::default());
    style_document(&second.doc, &without_empty, StyleSystemOptions::default());

    let with = primary_style(&first.doc, first_para);
    let without = primary_style(&second.doc, second_para);
    assert_eq!(with.color(), RED);
    assert!(with.eq_properties(&without));
}

#[test]
fn colors_inherit_and_explicit_inherit_works_on_reset_properties() {
    let stylist = author_stylist(vec![
        rule(
            SelectorBuilder::new().local_name("div"),
            &[color(RED), (LonghandId::BackgroundColor, SpecifiedValue::Color(BLUE))],
        ),
        rule_with_block(
            SelectorBuilder::new().local_name("span"),
            PropertyDeclarationBlock::new().with(
                PropertyDeclaration::css_wide_keyword(
                    LonghandId::BackgroundColor,
                    CSSWideKeyword::Inherit,
                ),
                Importance::Normal,
            ),
        ),
    ]);
    let mut page = Page::new();
    let body = page.body;
    let div = page.add(body, "div", None);
    let span = page.add(div, "span", None);
    let em = page.add(div, "em", None);

    style_document(&page.doc, &stylist, StyleSystemOptions::default());
    let span_style = primary_style(&page.doc, span);
    assert_eq!(span_style.color(), RED);
    assert_eq!(span_style.get_reset().background_color, BLUE);

    let em_style = primary_style(&page.doc, em);
    assert_eq!(em_style.color(), RED);
    assert_eq!(em_style.get_reset().background_color, RGBA::transparent());
}
