/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use crate::helpers::*;
use dom::{Document, ElementRef, NodeId};
use selectors::builder::NthType;
use selectors::{AncestorHashes, Element, MatchingContext, QuirksMode, SelectorBuilder};
use selectors::{matches_selector, VisitedHandlingMode};
use servo_arc::Arc;
use style::bloom::StyleBloom;
use style::context::{SharedStyleContext, StyleSystemOptions, ThreadLocalStyleContext};
use style::dom::TElement;
use style::error_reporting::NullReporter;
use style::media_queries::MediaTypeDevice;
use style::properties::LonghandId;
use style::sequential::resolve_style;
use style::stylesheets::{CssRule, Origin};
use style::stylist::Stylist;

fn list_rules() -> Vec<CssRule> {
    vec![
        rule(SelectorBuilder::new().local_name("li"), &[color(BLUE)]),
        rule(
            SelectorBuilder::new().local_name("li").nth(NthType::Child, 2, 1),
            &[color(RED)],
        ),
        rule(
            SelectorBuilder::new()
                .class("menu")
                .descendant()
                .local_name("li")
                .child()
                .local_name("a"),
            &[keyword(LonghandId::Display, "block")],
        ),
    ]
}

fn list_stylist() -> Stylist {
    author_stylist(list_rules())
}

/// `<ul class=menu>` with `count` items, text between them, and a link in
/// each item.
fn list_page(count: usize) -> (Page, Vec<NodeId>) {
    let mut page = Page::new();
    let body = page.body;
    let list = page.add(body, "ul", Some("menu"));
    let mut items = vec![];
    for index in 0..count {
        page.doc.append_text(list, "\n  ");
        let item = page.add(list, "li", None);
        let link = page.add(item, "a", None);
        page.doc.set_attribute(link, "href", &format!("#item{}", index));
        items.push(item);
    }
    (page, items)
}

#[test]
fn nth_child_ignores_text_nodes() {
    init_logger();
    let stylist = list_stylist();
    let (page, items) = list_page(4);

    style_document(&page.doc, &stylist, StyleSystemOptions::default());
    let colors: Vec<_> = items
        .iter()
        .map(|item| primary_style(&page.doc, *item).color())
        .collect();
    assert_eq!(colors, vec![RED, BLUE, RED, BLUE]);
}

#[test]
fn traversal_counts_every_element_without_rebuilding_the_filter() {
    let stylist = list_stylist();
    let (page, _) = list_page(3);

    let thread_local = style_document(&page.doc, &stylist, StyleSystemOptions::default());
    let statistics = &thread_local.statistics;
    // html, body, ul, three li and three a.
    assert_eq!(statistics.elements_traversed, 9);
    assert_eq!(statistics.elements_styled, 9);
    assert_eq!(statistics.bloom_rebuilds, 0);
    assert!(statistics.elements_matched + statistics.styles_shared >= 9);
    assert!(thread_local.bloom_filter.is_empty());
    assert!(page.doc.elements().all(|element| element.has_data()));
}

#[test]
fn restyling_gives_the_same_styles() {
    let stylist = list_stylist();
    let (page, _) = list_page(5);

    style_document(&page.doc, &stylist, StyleSystemOptions::default());
    let first: Vec<_> = page
        .doc
        .elements()
        .map(|element| element.primary_style().expect("styled"))
        .collect();

    page.doc.clear_styles();
    assert!(page.doc.elements().all(|element| !element.has_data()));
    style_document(&page.doc, &stylist, StyleSystemOptions::default());
    for (element, before) in page.doc.elements().zip(first.iter()) {
        let after = element.primary_style().expect("styled");
        assert!(after.eq_properties(before), "{:?} changed", element);
    }
}

#[test]
fn resolve_style_matches_the_traversal() {
    let stylist = list_stylist();
    let (traversed, traversed_items) = list_page(3);
    style_document(&traversed.doc, &stylist, StyleSystemOptions::default());

    let (resolved, resolved_items) = list_page(3);
    let shared = SharedStyleContext::new(&stylist);
    let mut thread_local = ThreadLocalStyleContext::new();
    let last_item = resolved.doc.element(resolved_items[2]).expect("element");
    let link = last_item.first_element_child().expect("link");

    // Deepest first: every unstyled ancestor gets styled on the way.
    let styles = resolve_style(link, &shared, &mut thread_local);
    assert!(last_item.has_data());
    assert!(resolved.doc.root_element().expect("root").has_data());
    assert!(!resolved.doc.element(resolved_items[0]).expect("element").has_data());

    let expected = traversed
        .doc
        .element(traversed_items[2])
        .and_then(|item| item.first_element_child())
        .and_then(|link| link.primary_style())
        .expect("styled");
    let primary = styles.get_primary().expect("primary style");
    assert!(primary.eq_properties(&expected));
    assert!(Arc::ptr_eq(primary, &link.primary_style().expect("stored")));

    // Then an earlier sibling, out of document order.
    let first = resolved.doc.element(resolved_items[0]).expect("element");
    let styles = resolve_style(first, &shared, &mut thread_local);
    assert_eq!(styles.get_primary().expect("primary style").color(), RED);
    assert_eq!(primary_style(&resolved.doc, resolved_items[2]).color(), RED);
}

fn deepest_link(doc: &Document) -> ElementRef {
    doc.elements()
        .filter(|element| &**element.local_name() == "a")
        .last()
        .expect("a link")
}

#[test]
fn the_ancestor_filter_never_rejects_a_match() {
    let (page, _) = list_page(2);
    let link = deepest_link(&page.doc);

    let mut ancestors = vec![];
    let mut current = link.parent_element();
    while let Some(ancestor) = current {
        ancestors.push(ancestor);
        current = ancestor.parent_element();
    }
    let mut bloom = StyleBloom::new();
    for ancestor in ancestors.iter().rev() {
        bloom.push(*ancestor);
    }
    let filter = bloom.filter_for(link, link.depth()).expect("filter fits");

    let selectors = vec![
        SelectorBuilder::new().class("menu").descendant().local_name("a"),
        SelectorBuilder::new().local_name("ul").child().local_name("li").child().local_name("a"),
        SelectorBuilder::new().local_name("html").descendant().universal(),
        SelectorBuilder::new().class("absent").descendant().local_name("a"),
        SelectorBuilder::new().local_name("ol").descendant().local_name("a"),
        SelectorBuilder::new()
            .local_name("li")
            .later_sibling()
            .local_name("li")
            .descendant()
            .local_name("a"),
    ];
    for builder in selectors {
        let selector = builder.build().expect("valid selector");
        let hashes = AncestorHashes::new(&selector, QuirksMode::NoQuirks, 4);

        let mut unfiltered = MatchingContext::new(
            None,
            None,
            VisitedHandlingMode::AllLinksUnvisited,
            QuirksMode::NoQuirks,
        );
        let expected = matches_selector(&selector, Some(&hashes), &link, &mut unfiltered);

        let mut filtered = MatchingContext::new(
            Some(filter),
            None,
            VisitedHandlingMode::AllLinksUnvisited,
            QuirksMode::NoQuirks,
        );
        let actual = matches_selector(&selector, Some(&hashes), &link, &mut filtered);
        assert_eq!(actual, expected, "{:?}", selector);

        if expected {
            assert!(hashes.as_slice().iter().all(|hash| filter.might_contain_hash(*hash)));
        }
    }
}

#[test]
fn a_filter_for_another_parent_is_not_handed_out() {
    let (page, items) = list_page(2);
    let first_item = page.doc.element(items[0]).expect("element");
    let second_link = deepest_link(&page.doc);

    let mut bloom = StyleBloom::new();
    let mut chain = vec![first_item];
    let mut current = first_item.parent_element();
    while let Some(ancestor) = current {
        chain.push(ancestor);
        current = ancestor.parent_element();
    }
    for element in chain.iter().rev() {
        bloom.push(*element);
    }
    // Same depth, wrong parent.
    assert!(bloom.filter_for(second_link, second_link.depth()).is_none());

    bloom.insert_parents_recovering(second_link, second_link.depth());
    assert!(bloom.filter_for(second_link, second_link.depth()).is_some());
}

#[test]
fn disabling_the_filter_changes_nothing() {
    let stylist = list_stylist();
    let (filtered, _) = list_page(4);
    let (unfiltered, _) = list_page(4);

    style_document(&filtered.doc, &stylist, StyleSystemOptions::default());
    style_document(
        &unfiltered.doc,
        &stylist,
        StyleSystemOptions {
            disable_ancestor_filter: true,
            ..StyleSystemOptions::default()
        },
    );
    for (a, b) in filtered.doc.elements().zip(unfiltered.doc.elements()) {
        let a = a.primary_style().expect("styled");
        let b = b.primary_style().expect("styled");
        assert!(a.eq_properties(&b));
    }
    let link = deepest_link(&filtered.doc);
    assert_eq!(
        link.primary_style().expect("styled").display(),
        style::values::computed::Display::Block
    );
}

#[test]
fn a_lower_ancestor_hash_cap_still_filters_soundly() {
    let options = StyleSystemOptions {
        max_ancestor_hashes: 1,
        ..StyleSystemOptions::default()
    };
    let mut stylist = Stylist::new_with_options(
        Box::new(MediaTypeDevice::default()),
        QuirksMode::NoQuirks,
        &options,
    );
    assert_eq!(stylist.max_ancestor_hashes(), 1);
    stylist.rebuild(&[sheet(Origin::Author, list_rules())], &NullReporter);

    let (filtered, _) = list_page(4);
    let (unfiltered, _) = list_page(4);
    style_document(&filtered.doc, &stylist, options.clone());
    style_document(
        &unfiltered.doc,
        &list_stylist(),
        StyleSystemOptions {
            disable_ancestor_filter: true,
            ..StyleSystemOptions::default()
        },
    );
    for (a, b) in filtered.doc.elements().zip(unfiltered.doc.elements()) {
        let a = a.primary_style().expect("styled");
        let b = b.primary_style().expect("styled");
        assert!(a.eq_properties(&b));
    }
    assert_eq!(
        deepest_link(&filtered.doc).primary_style().expect("styled").display(),
        style::values::computed::Display::Block
    );
}
