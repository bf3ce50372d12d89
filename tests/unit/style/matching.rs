/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use crate::helpers::*;
use selectors::attr::AttrSelectorOperator;
use selectors::{Atom, ElementSelectorFlags, ElementState, NonTSPseudoClass, PseudoElement, SelectorBuilder};
use style::context::{SharedStyleContext, StyleContext, StyleSystemOptions, ThreadLocalStyleContext};
use style::dom::TElement;
use style::matching::MatchMethods;
use style::properties::LonghandId;
use style::values::computed::{Display, FontStyle, TextDecorationLine};
use style::values::specified::SpecifiedValue;
use style::values::RGBA;

const LINK_BLUE: RGBA = RGBA::opaque(0, 0, 238);

#[test]
fn eager_pseudo_elements_are_resolved_with_the_element() {
    let stylist = author_stylist(vec![
        rule(
            SelectorBuilder::new()
                .local_name("p")
                .pseudo_element(PseudoElement::Before),
            &[color(RED)],
        ),
        rule(SelectorBuilder::new().class("hidden"), &[keyword(LonghandId::Display, "none")]),
    ]);
    let mut page = Page::new();
    let body = page.body;
    let shown = page.add(body, "p", None);
    let hidden = page.add(body, "p", Some("hidden"));
    let other = page.add(body, "div", None);

    style_document(&page.doc, &stylist, StyleSystemOptions::default());

    let shown = page.doc.element(shown).expect("element");
    let data = shown.borrow_data().expect("data");
    let primary = data.styles.get_primary().expect("primary");
    assert!(primary.has_pseudo_style(&PseudoElement::Before));
    assert!(!primary.has_pseudo_style(&PseudoElement::After));
    let before = data.styles.pseudos.get(&PseudoElement::Before).expect("::before");
    assert_eq!(before.color(), RED);
    assert!(data.styles.pseudos.get(&PseudoElement::After).is_none());
    drop(data);

    let hidden = page.doc.element(hidden).expect("element");
    let data = hidden.borrow_data().expect("data");
    assert!(data.styles.is_display_none());
    assert!(data.styles.pseudos.is_empty());
    drop(data);

    let other = page.doc.element(other).expect("element");
    assert!(other.borrow_data().expect("data").styles.pseudos.is_empty());
}

#[test]
fn lazy_pseudo_elements_are_resolved_on_demand() {
    let stylist = author_stylist(vec![
        rule(SelectorBuilder::new().local_name("p"), &[color(GREEN)]),
        rule(
            SelectorBuilder::new()
                .local_name("p")
                .pseudo_element(PseudoElement::Selection),
            &[(LonghandId::BackgroundColor, SpecifiedValue::Color(BLUE))],
        ),
    ]);
    let mut page = Page::new();
    let body = page.body;
    let para = page.add(body, "p", None);
    let div = page.add(body, "div", None);

    let shared = SharedStyleContext::new(&stylist);
    let mut thread_local = ThreadLocalStyleContext::new();
    let root = page.doc.root_element().expect("root");
    style::sequential::traverse_dom(root, &shared, &mut thread_local);

    let para = page.doc.element(para).expect("element");
    let primary = para.primary_style().expect("styled");
    assert!(para.borrow_data().expect("data").styles.pseudos.is_empty());

    let mut context = StyleContext {
        shared: &shared,
        thread_local: &mut thread_local,
    };
    let selection = para
        .resolve_pseudo_style(&mut context, para.depth(), &PseudoElement::Selection, &primary)
        .expect("::selection style");
    assert_eq!(selection.get_reset().background_color, BLUE);
    // Inherited from the originating element.
    assert_eq!(selection.color(), GREEN);

    let div = page.doc.element(div).expect("element");
    let div_primary = div.primary_style().expect("styled");
    assert!(div
        .resolve_pseudo_style(&mut context, div.depth(), &PseudoElement::Selection, &div_primary)
        .is_none());
}

#[test]
fn lang_matches_prefixes_and_inherits_down_the_tree() {
    let stylist = author_stylist(vec![rule(
        SelectorBuilder::new().pseudo_class(NonTSPseudoClass::Lang(Atom::from("en"))),
        &[color(RED)],
    )]);
    let mut page = Page::new();
    let body = page.body;
    let english = page.add(body, "div", None);
    page.doc.set_attribute(english, "lang", "en-GB");
    let nested = page.add(english, "span", None);
    let french = page.add(body, "div", None);
    page.doc.set_attribute(french, "lang", "fr");
    let english_in_name_only = page.add(body, "div", None);
    page.doc.set_attribute(english_in_name_only, "lang", "eng");

    style_document(&page.doc, &stylist, StyleSystemOptions::default());
    assert_eq!(primary_style(&page.doc, english).color(), RED);
    assert_eq!(primary_style(&page.doc, nested).color(), RED);
    assert_ne!(primary_style(&page.doc, french).color(), RED);
    assert_ne!(primary_style(&page.doc, english_in_name_only).color(), RED);
}

#[test]
fn attribute_selectors() {
    let tagged = |operator, value: &str| {
        SelectorBuilder::new()
            .local_name("a")
            .attr("href", operator, value)
    };
    let stylist = author_stylist(vec![
        rule(SelectorBuilder::new().attr_exists("title"), &[keyword(LonghandId::FontStyle, "italic")]),
        rule(tagged(AttrSelectorOperator::Prefix, "https:"), &[color(GREEN)]),
        rule(tagged(AttrSelectorOperator::Suffix, ".pdf"), &[color(RED)]),
        rule(
            SelectorBuilder::new().attr("rel", AttrSelectorOperator::Includes, "nofollow"),
            &[keyword(LonghandId::TextDecorationLine, "line-through")],
        ),
        rule(
            SelectorBuilder::new().attr("hreflang", AttrSelectorOperator::DashMatch, "en"),
            &[keyword(LonghandId::FontWeight, "bold")],
        ),
        rule(
            SelectorBuilder::new().attr("href", AttrSelectorOperator::Substring, "/docs/"),
            &[keyword(LonghandId::Display, "block")],
        ),
    ]);
    let mut page = Page::new();
    let body = page.body;
    let secure = page.add(body, "a", None);
    page.doc.set_attribute(secure, "href", "https://example.org/docs/guide.pdf");
    page.doc.set_attribute(secure, "rel", "external nofollow");
    page.doc.set_attribute(secure, "hreflang", "en-US");
    let plain = page.add(body, "a", None);
    page.doc.set_attribute(plain, "href", "http://example.org/");
    page.doc.set_attribute(plain, "title", "");
    page.doc.set_attribute(plain, "rel", "nofollowing");
    page.doc.set_attribute(plain, "hreflang", "english");

    style_document(&page.doc, &stylist, StyleSystemOptions::default());

    let secure = primary_style(&page.doc, secure);
    assert_eq!(secure.color(), RED);
    assert_eq!(
        secure.get_reset().text_decoration_line,
        TextDecorationLine::LINE_THROUGH
    );
    assert_eq!(secure.get_inherited().font_weight, 700);
    assert_eq!(secure.display(), Display::Block);
    assert_eq!(secure.get_inherited().font_style, FontStyle::Normal);

    let plain = primary_style(&page.doc, plain);
    assert_eq!(plain.color(), LINK_BLUE);
    assert_eq!(plain.get_inherited().font_style, FontStyle::Italic);
    assert_eq!(plain.get_inherited().font_weight, 400);
    assert_eq!(plain.display(), Display::Inline);
}

#[test]
fn state_pseudo_classes_follow_element_state() {
    let stylist = author_stylist(vec![
        rule(
            SelectorBuilder::new().local_name("button").pseudo_class(NonTSPseudoClass::Hover),
            &[color(RED)],
        ),
        rule(
            SelectorBuilder::new()
                .pseudo_class(NonTSPseudoClass::Focus)
                .descendant()
                .local_name("span"),
            &[color(BLUE)],
        ),
    ]);
    let mut page = Page::new();
    let body = page.body;
    let hovered = page.add(body, "button", None);
    page.doc.set_state(hovered, ElementState::HOVER);
    let idle = page.add(body, "button", None);
    let focused = page.add(body, "div", None);
    page.doc.set_state(focused, ElementState::FOCUS);
    let inside = page.add(focused, "span", None);

    style_document(&page.doc, &stylist, StyleSystemOptions::default());
    let hovered = primary_style(&page.doc, hovered);
    assert_eq!(hovered.color(), RED);
    assert!(hovered
        .relations
        .contains(selectors::StyleRelations::AFFECTED_BY_HOVER));
    assert_ne!(primary_style(&page.doc, idle).color(), RED);
    assert_eq!(primary_style(&page.doc, inside).color(), BLUE);
}

#[test]
fn positional_selector_flags_are_recorded_on_the_parent() {
    let stylist = author_stylist(vec![rule(
        SelectorBuilder::new().local_name("li").first_child(),
        &[color(RED)],
    )]);
    let mut page = Page::new();
    let body = page.body;
    let list = page.add(body, "ul", None);
    let first = page.add(list, "li", None);
    let second = page.add(list, "li", None);

    style_document(&page.doc, &stylist, options_without_sharing());
    assert_eq!(primary_style(&page.doc, first).color(), RED);
    assert_ne!(primary_style(&page.doc, second).color(), RED);

    let flags = |node| page.doc.element(node).expect("element").selector_flags();
    assert!(flags(list).contains(ElementSelectorFlags::HAS_EDGE_CHILD_SELECTOR));
    assert!(!flags(body).contains(ElementSelectorFlags::HAS_EDGE_CHILD_SELECTOR));
    assert!(!flags(first).contains(ElementSelectorFlags::HAS_EDGE_CHILD_SELECTOR));
}

#[test]
fn negated_selectors() {
    let stylist = author_stylist(vec![rule(
        SelectorBuilder::new()
            .local_name("p")
            .negation(vec![SelectorBuilder::new().class("intro").build().expect("valid")]),
        &[color(GREEN)],
    )]);
    let mut page = Page::new();
    let body = page.body;
    let intro = page.add(body, "p", Some("intro"));
    let plain = page.add(body, "p", Some("body-text"));

    style_document(&page.doc, &stylist, StyleSystemOptions::default());
    assert_ne!(primary_style(&page.doc, intro).color(), GREEN);
    assert_eq!(primary_style(&page.doc, plain).color(), GREEN);
}

#[test]
fn child_then_descendant_backtracks_past_the_nearest_match() {
    // <a><b><x><b><c>: the inner <b> is not a child of <a>.
    let stylist = author_stylist(vec![rule(
        SelectorBuilder::new()
            .local_name("a")
            .child()
            .local_name("b")
            .descendant()
            .local_name("c"),
        &[color(BLUE)],
    )]);
    let mut page = Page::new();
    let body = page.body;
    let a = page.add(body, "a", None);
    let outer = page.add(a, "b", None);
    let x = page.add(outer, "x", None);
    let inner = page.add(x, "b", None);
    let matched = page.add(inner, "c", None);
    let elsewhere = page.add(body, "b", None);
    let unmatched = page.add(elsewhere, "c", None);

    style_document(&page.doc, &stylist, StyleSystemOptions::default());
    assert_eq!(primary_style(&page.doc, matched).color(), BLUE);
    assert_ne!(primary_style(&page.doc, unmatched).color(), BLUE);
}

#[test]
fn later_sibling_combinator_skips_unrelated_siblings() {
    let stylist = author_stylist(vec![rule(
        SelectorBuilder::new().local_name("h1").later_sibling().local_name("p"),
        &[color(GREEN)],
    )]);
    let mut page = Page::new();
    let body = page.body;
    let before = page.add(body, "p", None);
    page.add(body, "h1", None);
    page.add(body, "div", None);
    page.add(body, "span", None);
    let after = page.add(body, "p", None);

    style_document(&page.doc, &stylist, StyleSystemOptions::default());
    assert_ne!(primary_style(&page.doc, before).color(), GREEN);
    assert_eq!(primary_style(&page.doc, after).color(), GREEN);
}
