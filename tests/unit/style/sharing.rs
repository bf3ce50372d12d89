/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use crate::helpers::*;
use dom::NodeId;
use selectors::attr::AttrSelectorOperator;
use selectors::{ElementState, NonTSPseudoClass, SelectorBuilder};
use servo_arc::Arc;
use style::context::StyleSystemOptions;
use style::dom::TElement;
use style::properties::LonghandId;
use style::stylist::Stylist;
use style::values::RGBA;

const BLACK: RGBA = RGBA::black();

fn sharing_options() -> StyleSystemOptions {
    StyleSystemOptions {
        disable_style_sharing_cache: false,
        ..StyleSystemOptions::default()
    }
}

fn list_of(page: &mut Page, count: usize, class: Option<&str>) -> Vec<NodeId> {
    let body = page.body;
    let list = page.add(body, "ul", None);
    (0..count).map(|_| page.add(list, "li", class)).collect()
}

fn item_stylist() -> Stylist {
    author_stylist(vec![
        rule(SelectorBuilder::new().local_name("li"), &[color(GREEN)]),
        rule(SelectorBuilder::new().class("special"), &[color(RED)]),
    ])
}

fn same_style(page: &Page, a: NodeId, b: NodeId) -> bool {
    Arc::ptr_eq(&primary_style(&page.doc, a), &primary_style(&page.doc, b))
}

#[test]
fn identical_siblings_share() {
    init_logger();
    let stylist = item_stylist();
    let mut page = Page::new();
    let items = list_of(&mut page, 5, None);

    let thread_local = style_document(&page.doc, &stylist, sharing_options());
    assert_eq!(thread_local.statistics.styles_shared, 4);
    for item in &items[1..] {
        assert!(same_style(&page, items[0], *item));
    }
    assert_eq!(primary_style(&page.doc, items[4]).color(), GREEN);
}

#[test]
fn different_classes_do_not_share() {
    let stylist = item_stylist();
    let mut page = Page::new();
    let items = list_of(&mut page, 2, None);
    page.doc.set_attribute(items[1], "class", "special");

    let thread_local = style_document(&page.doc, &stylist, sharing_options());
    assert_eq!(thread_local.statistics.styles_shared, 0);
    assert_eq!(primary_style(&page.doc, items[0]).color(), GREEN);
    assert_eq!(primary_style(&page.doc, items[1]).color(), RED);
}

#[test]
fn positional_rules_prevent_sharing() {
    let stylist = author_stylist(vec![rule(
        SelectorBuilder::new().local_name("li").last_child(),
        &[color(RED)],
    )]);
    let mut page = Page::new();
    let items = list_of(&mut page, 3, None);

    let thread_local = style_document(&page.doc, &stylist, sharing_options());
    assert_eq!(thread_local.statistics.styles_shared, 0);
    assert_eq!(primary_style(&page.doc, items[1]).color(), BLACK);
    assert_eq!(primary_style(&page.doc, items[2]).color(), RED);
}

#[test]
fn ids_that_rules_use_prevent_sharing() {
    let stylist = author_stylist(vec![rule(SelectorBuilder::new().id("chosen"), &[color(RED)])]);
    let mut page = Page::new();
    let items = list_of(&mut page, 3, None);
    page.doc.set_attribute(items[1], "id", "chosen");
    page.doc.set_attribute(items[2], "id", "unused");

    let thread_local = style_document(&page.doc, &stylist, sharing_options());
    assert_eq!(primary_style(&page.doc, items[1]).color(), RED);
    assert_eq!(primary_style(&page.doc, items[2]).color(), BLACK);
    // An id no rule mentions doesn't stand in the way.
    assert!(same_style(&page, items[0], items[2]));
    assert_eq!(thread_local.statistics.styles_shared, 1);
}

#[test]
fn attribute_rules_and_state_prevent_sharing() {
    let stylist = author_stylist(vec![
        rule(
            SelectorBuilder::new().attr("data-kind", AttrSelectorOperator::Equal, "warning"),
            &[color(RED)],
        ),
        rule(
            SelectorBuilder::new()
                .local_name("li")
                .pseudo_class(NonTSPseudoClass::Hover),
            &[color(BLUE)],
        ),
    ]);
    let mut page = Page::new();
    let items = list_of(&mut page, 4, None);
    page.doc.set_attribute(items[1], "data-kind", "warning");
    page.doc.set_state(items[2], ElementState::HOVER);

    style_document(&page.doc, &stylist, sharing_options());
    assert_eq!(primary_style(&page.doc, items[0]).color(), BLACK);
    assert_eq!(primary_style(&page.doc, items[1]).color(), RED);
    assert_eq!(primary_style(&page.doc, items[2]).color(), BLUE);
    assert!(same_style(&page, items[0], items[3]));
}

#[test]
fn style_attributes_prevent_sharing() {
    let stylist = item_stylist();
    let mut page = Page::new();
    let items = list_of(&mut page, 3, None);
    page.doc.set_style_attribute(items[0], block(&[color(BLUE)]));
    page.doc.set_style_attribute(items[1], block(&[color(BLUE)]));

    let thread_local = style_document(&page.doc, &stylist, sharing_options());
    assert_eq!(primary_style(&page.doc, items[1]).color(), BLUE);
    assert_eq!(primary_style(&page.doc, items[2]).color(), GREEN);
    assert_eq!(thread_local.statistics.styles_shared, 0);
}

#[test]
fn cousins_share() {
    let stylist = author_stylist(vec![
        rule(SelectorBuilder::new().class("box"), &[px(LonghandId::PaddingLeft, 4.)]),
        rule(
            SelectorBuilder::new().class("box").child().local_name("p"),
            &[color(PURPLE)],
        ),
    ]);
    let mut page = Page::new();
    let body = page.body;
    let first_box = page.add(body, "div", Some("box"));
    let first = page.add(first_box, "p", None);
    let second_box = page.add(body, "div", Some("box"));
    let second = page.add(second_box, "p", None);

    let thread_local = style_document(&page.doc, &stylist, sharing_options());
    // The second box from its sibling, its paragraph from its cousin.
    assert_eq!(thread_local.statistics.styles_shared, 2);
    assert!(same_style(&page, first, second));
    assert_eq!(primary_style(&page.doc, second).color(), PURPLE);
}

#[test]
fn cousins_under_different_parents_do_not_share() {
    let stylist = author_stylist(vec![rule(
        SelectorBuilder::new().class("warm").child().local_name("p"),
        &[color(RED)],
    )]);
    let mut page = Page::new();
    let body = page.body;
    let first_box = page.add(body, "div", Some("warm"));
    let first = page.add(first_box, "p", None);
    let second_box = page.add(body, "div", Some("cold"));
    let second = page.add(second_box, "p", None);

    style_document(&page.doc, &stylist, sharing_options());
    assert_eq!(primary_style(&page.doc, first).color(), RED);
    assert_eq!(primary_style(&page.doc, second).color(), BLACK);
}

#[test]
fn a_zero_budget_shares_nothing() {
    let stylist = item_stylist();
    let mut page = Page::new();
    list_of(&mut page, 5, None);

    let thread_local = style_document(
        &page.doc,
        &stylist,
        StyleSystemOptions {
            style_sharing_sibling_budget: 0,
            ..sharing_options()
        },
    );
    assert_eq!(thread_local.statistics.styles_shared, 0);
    assert_eq!(thread_local.sharing_cache.candidates_probed(), 0);
}

#[test]
fn sharing_never_changes_the_result() {
    let stylist = author_stylist(vec![
        rule(SelectorBuilder::new().local_name("li"), &[color(GREEN)]),
        rule(SelectorBuilder::new().class("special"), &[color(RED)]),
        rule(SelectorBuilder::new().id("chosen"), &[color(BLUE)]),
        rule(SelectorBuilder::new().local_name("li").first_child(), &[
            keyword(LonghandId::FontWeight, "bold"),
        ]),
        rule(
            SelectorBuilder::new().local_name("li").next_sibling().class("special"),
            &[keyword(LonghandId::TextDecorationLine, "underline")],
        ),
        rule(SelectorBuilder::new().attr_exists("title"), &[keyword(LonghandId::FontStyle, "italic")]),
        rule(SelectorBuilder::new().local_name("span").empty(), &[px(LonghandId::MarginTop, 3.)]),
    ]);
    let build = || {
        let mut page = Page::new();
        let body = page.body;
        for section in 0..3 {
            let list = page.add(body, "ul", None);
            for index in 0..6 {
                let class = if index % 3 == 2 { Some("special") } else { None };
                let item = page.add(list, "li", class);
                if index == 4 && section == 1 {
                    page.doc.set_attribute(item, "id", "chosen");
                }
                if index == 1 {
                    page.doc.set_attribute(item, "title", "hint");
                }
                let span = page.add(item, "span", None);
                if index % 2 == 0 {
                    page.doc.append_text(span, "text");
                }
            }
        }
        page
    };

    let shared = build();
    let unshared = build();
    let shared_context = style_document(&shared.doc, &stylist, sharing_options());
    style_document(&unshared.doc, &stylist, options_without_sharing());
    assert!(shared_context.statistics.styles_shared > 0);

    for (a, b) in shared.doc.elements().zip(unshared.doc.elements()) {
        let a_style = a.primary_style().expect("styled");
        let b_style = b.primary_style().expect("styled");
        assert!(a_style.eq_properties(&b_style), "{:?} differs from {:?}", a, b);
    }
}
