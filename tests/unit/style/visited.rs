/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use crate::helpers::*;
use selectors::{Atom, Element, NonTSPseudoClass, OpaqueElement, SelectorBuilder};
use style::context::{SharedStyleContext, VisitedLinkSet};
use style::properties::{LinkState, LonghandId};
use style::values::image::{ImageLoader, PendingImage};
use style::values::specified::SpecifiedValue;
use style::values::RGBA;

const UNVISITED_BLUE: RGBA = RGBA::opaque(0, 0, 238);

fn visited_rule() -> style::stylesheets::CssRule {
    rule(
        SelectorBuilder::new()
            .local_name("a")
            .pseudo_class(NonTSPseudoClass::Visited),
        &[color(PURPLE)],
    )
}

#[test]
fn only_the_visited_link_gets_a_visited_style() {
    init_logger();
    let stylist = author_stylist(vec![visited_rule()]);
    let mut page = Page::new();
    let body = page.body;
    let seen = page.add(body, "a", None);
    page.doc.set_attribute(seen, "href", "https://example.org/seen");
    let label = page.add(seen, "span", None);
    let unseen = page.add(body, "a", None);
    page.doc.set_attribute(unseen, "href", "https://example.org/unseen");

    let mut history = VisitedLinkSet::new();
    history.insert("https://example.org/seen");
    let shared = SharedStyleContext::new(&stylist).with_visited_links(&history);
    style_document_with(&page.doc, &shared);

    let seen_style = primary_style(&page.doc, seen);
    assert_eq!(seen_style.color(), UNVISITED_BLUE);
    assert_eq!(seen_style.link_state, LinkState::Visited);
    let visited = seen_style.visited_style().expect("visited style");
    assert_eq!(visited.color(), PURPLE);

    let unseen_style = primary_style(&page.doc, unseen);
    assert_eq!(unseen_style.color(), UNVISITED_BLUE);
    assert_eq!(unseen_style.link_state, LinkState::Unvisited);
    assert!(unseen_style.visited_style().is_none());

    // Inside the link, each variant inherits from the matching variant.
    let label_style = primary_style(&page.doc, label);
    assert_eq!(label_style.color(), UNVISITED_BLUE);
    assert_eq!(label_style.link_state, LinkState::NotALink);
    let label_visited = label_style.visited_style().expect("visited style");
    assert_eq!(label_visited.color(), PURPLE);
}

#[test]
fn descendants_of_a_visited_link_match_visited_rules() {
    let stylist = author_stylist(vec![rule(
        SelectorBuilder::new()
            .local_name("a")
            .pseudo_class(NonTSPseudoClass::Visited)
            .descendant()
            .local_name("span"),
        &[color(GREEN)],
    )]);
    let mut page = Page::new();
    let body = page.body;
    let seen = page.add(body, "a", None);
    page.doc.set_attribute(seen, "href", "/seen");
    let wrapper = page.add(seen, "em", None);
    let label = page.add(wrapper, "span", None);
    let nested = page.add(seen, "a", None);
    page.doc.set_attribute(nested, "href", "/nested");
    let nested_label = page.add(nested, "span", None);
    let unseen = page.add(body, "a", None);
    page.doc.set_attribute(unseen, "href", "/unseen");
    let unseen_label = page.add(unseen, "span", None);

    let mut history = VisitedLinkSet::new();
    history.insert("/seen");
    let shared = SharedStyleContext::new(&stylist).with_visited_links(&history);
    style_document_with(&page.doc, &shared);

    let label_style = primary_style(&page.doc, label);
    assert_ne!(label_style.color(), GREEN);
    assert_eq!(label_style.visited_style().expect("visited style").color(), GREEN);

    // The nested link is the relevant link for its own subtree, and it is
    // unvisited.
    assert!(primary_style(&page.doc, nested).visited_style().is_none());
    let nested_label_style = primary_style(&page.doc, nested_label);
    assert_ne!(nested_label_style.color(), GREEN);
    assert!(nested_label_style.visited_style().is_none());

    let unseen_label_style = primary_style(&page.doc, unseen_label);
    assert_ne!(unseen_label_style.color(), GREEN);
    assert!(unseen_label_style.visited_style().is_none());
}

#[test]
fn without_history_no_link_is_visited() {
    let stylist = author_stylist(vec![visited_rule()]);
    let mut page = Page::new();
    let body = page.body;
    let link = page.add(body, "a", None);
    page.doc.set_attribute(link, "href", "https://example.org/");

    style_document(&page.doc, &stylist, Default::default());
    let style = primary_style(&page.doc, link);
    assert_eq!(style.color(), UNVISITED_BLUE);
    assert!(style.visited_style().is_none());
}

#[test]
fn visited_links_do_not_share_with_unvisited_ones() {
    let stylist = author_stylist(vec![visited_rule()]);
    let mut page = Page::new();
    let body = page.body;
    let first = page.add(body, "a", None);
    page.doc.set_attribute(first, "href", "/one");
    let second = page.add(body, "a", None);
    page.doc.set_attribute(second, "href", "/two");
    let third = page.add(body, "a", None);
    page.doc.set_attribute(third, "href", "/three");

    let mut history = VisitedLinkSet::new();
    history.insert("/two");
    let shared = SharedStyleContext::new(&stylist).with_visited_links(&history);
    let thread_local = style_document_with(&page.doc, &shared);

    assert!(primary_style(&page.doc, first).visited_style().is_none());
    assert!(primary_style(&page.doc, second).visited_style().is_some());
    assert!(primary_style(&page.doc, third).visited_style().is_none());
    if !shared.options.disable_style_sharing_cache {
        // Only the third link can find a candidate: the first.
        assert_eq!(thread_local.statistics.styles_shared, 1);
    }
}

#[derive(Default)]
struct CollectingLoader {
    requests: Vec<(OpaqueElement, LonghandId, Atom)>,
}

impl ImageLoader for CollectingLoader {
    fn load_pending_image(&mut self, element: OpaqueElement, property: LonghandId, image: &PendingImage) {
        self.requests.push((element, property, image.url.clone()));
    }
}

#[test]
fn images_are_handed_to_the_loader_after_styling() {
    let stylist = author_stylist(vec![
        rule(
            SelectorBuilder::new().class("hero"),
            &[(LonghandId::BackgroundImage, SpecifiedValue::Url(Atom::from("hero.png")))],
        ),
        rule(
            SelectorBuilder::new().local_name("ul"),
            &[(LonghandId::ListStyleImage, SpecifiedValue::Url(Atom::from("dot.png")))],
        ),
    ]);
    let mut page = Page::new();
    let body = page.body;
    let hero = page.add(body, "div", Some("hero"));
    let list = page.add(body, "ul", None);
    let item = page.add(list, "li", None);

    let mut thread_local = style_document(&page.doc, &stylist, options_without_sharing());
    let mut loader = CollectingLoader::default();
    thread_local.flush_pending_images(&mut loader);
    assert!(thread_local.pending_images.is_empty());

    let opaque = |node| page.doc.element(node).expect("element").opaque();
    assert!(loader
        .requests
        .contains(&(opaque(hero), LonghandId::BackgroundImage, Atom::from("hero.png"))));
    assert!(loader
        .requests
        .contains(&(opaque(list), LonghandId::ListStyleImage, Atom::from("dot.png"))));
    // `list-style-image` inherits, so the item waits for the image too.
    assert!(loader
        .requests
        .contains(&(opaque(item), LonghandId::ListStyleImage, Atom::from("dot.png"))));
}
