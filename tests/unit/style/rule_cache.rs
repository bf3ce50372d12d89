/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use crate::helpers::*;
use selectors::SelectorBuilder;
use servo_arc::Arc;
use style::context::StyleSystemOptions;
use style::properties::LonghandId;
use style::values::computed::LengthPercentage;
use style::values::specified::{Length, SpecifiedValue};

fn boxes_page(count: usize) -> (Page, Vec<dom::NodeId>) {
    let mut page = Page::new();
    let body = page.body;
    let boxes = (0..count).map(|_| page.add(body, "div", Some("box"))).collect();
    (page, boxes)
}

fn box_stylist() -> style::stylist::Stylist {
    author_stylist(vec![rule(
        SelectorBuilder::new().class("box"),
        &[px(LonghandId::PaddingLeft, 10.), color(GREEN)],
    )])
}

#[test]
fn siblings_with_the_same_rules_hit_the_cache() {
    let stylist = box_stylist();
    let (page, boxes) = boxes_page(3);

    let thread_local = style_document(&page.doc, &stylist, options_without_sharing());
    assert_eq!(thread_local.statistics.styles_shared, 0);
    assert!(thread_local.statistics.rule_cache_hits >= 2);

    let first = primary_style(&page.doc, boxes[0]);
    let last = primary_style(&page.doc, boxes[2]);
    assert!(!Arc::ptr_eq(&first, &last));
    assert_eq!(first.get_reset(), last.get_reset());
    assert_eq!(
        last.get_reset().padding_left,
        LengthPercentage::Length(app_units::Au::from_f32_px(10.))
    );
}

#[test]
fn a_disabled_cache_gives_the_same_styles() {
    let stylist = box_stylist();
    let (cached, cached_boxes) = boxes_page(3);
    let (uncached, uncached_boxes) = boxes_page(3);

    style_document(&cached.doc, &stylist, options_without_sharing());
    let thread_local = style_document(
        &uncached.doc,
        &stylist,
        StyleSystemOptions {
            disable_matched_properties_cache: true,
            ..options_without_sharing()
        },
    );
    assert_eq!(thread_local.statistics.rule_cache_hits, 0);

    for (a, b) in cached_boxes.iter().zip(uncached_boxes.iter()) {
        let a = primary_style(&cached.doc, *a);
        let b = primary_style(&uncached.doc, *b);
        assert!(a.eq_properties(&b));
    }
}

#[test]
fn different_parents_reuse_only_the_reset_values() {
    let stylist = author_stylist(vec![
        rule(SelectorBuilder::new().class("warm"), &[color(RED)]),
        rule(SelectorBuilder::new().class("cold"), &[color(BLUE)]),
        rule(SelectorBuilder::new().local_name("span"), &[px(LonghandId::MarginLeft, 5.)]),
    ]);
    let mut page = Page::new();
    let body = page.body;
    let warm = page.add(body, "div", Some("warm"));
    let warm_span = page.add(warm, "span", None);
    let cold = page.add(body, "div", Some("cold"));
    let cold_span = page.add(cold, "span", None);

    let thread_local = style_document(&page.doc, &stylist, options_without_sharing());
    assert!(thread_local.statistics.rule_cache_hits >= 1);

    let warm_style = primary_style(&page.doc, warm_span);
    let cold_style = primary_style(&page.doc, cold_span);
    assert_eq!(warm_style.color(), RED);
    assert_eq!(cold_style.color(), BLUE);
    assert!(Arc::ptr_eq(warm_style.reset_arc(), cold_style.reset_arc()));
}

#[test]
fn font_relative_reset_values_are_not_cached() {
    let stylist = author_stylist(vec![
        rule(SelectorBuilder::new().class("small"), &[px(LonghandId::FontSize, 10.)]),
        rule(SelectorBuilder::new().class("large"), &[px(LonghandId::FontSize, 20.)]),
        rule(SelectorBuilder::new().local_name("span"), &[(
            LonghandId::MarginLeft,
            SpecifiedValue::Length(Length::em(1.)),
        )]),
    ]);
    let mut page = Page::new();
    let body = page.body;
    let small = page.add(body, "div", Some("small"));
    let small_span = page.add(small, "span", None);
    let large = page.add(body, "div", Some("large"));
    let large_span = page.add(large, "span", None);

    style_document(&page.doc, &stylist, options_without_sharing());
    let small_margin = primary_style(&page.doc, small_span).get_reset().margin_left;
    let large_margin = primary_style(&page.doc, large_span).get_reset().margin_left;
    assert_ne!(small_margin, large_margin);
}
