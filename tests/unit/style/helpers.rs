/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Shared fixtures: rule construction and styling whole documents.

use dom::{Document, ElementRef, NodeId};
use selectors::{QuirksMode, SelectorBuilder};
use servo_arc::Arc;
use style::context::{SharedStyleContext, StyleSystemOptions, ThreadLocalStyleContext};
use style::dom::TElement;
use style::error_reporting::NullReporter;
use style::media_queries::MediaTypeDevice;
use style::properties::{ComputedValues, Importance, LonghandId, PropertyDeclaration};
use style::properties::PropertyDeclarationBlock;
use style::sequential::traverse_dom;
use style::stylesheets::{CssRule, Origin, StyleRule, Stylesheet};
use style::stylist::Stylist;
use style::values::specified::{Length, SpecifiedValue};
use style::values::RGBA;

pub const RED: RGBA = RGBA::opaque(255, 0, 0);
pub const GREEN: RGBA = RGBA::opaque(0, 128, 0);
pub const BLUE: RGBA = RGBA::opaque(0, 0, 255);
pub const PURPLE: RGBA = RGBA::opaque(128, 0, 128);

pub type Declaration = (LonghandId, SpecifiedValue);

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn color(rgba: RGBA) -> Declaration {
    (LonghandId::Color, SpecifiedValue::Color(rgba))
}

pub fn keyword(id: LonghandId, value: &str) -> Declaration {
    (id, SpecifiedValue::keyword(value))
}

pub fn px(id: LonghandId, value: f32) -> Declaration {
    (id, SpecifiedValue::Length(Length::px(value)))
}

pub fn block_with(declarations: &[Declaration], importance: Importance) -> PropertyDeclarationBlock {
    let mut block = PropertyDeclarationBlock::new();
    for (id, value) in declarations {
        block.push(PropertyDeclaration::new(*id, value.clone()), importance);
    }
    block
}

pub fn block(declarations: &[Declaration]) -> PropertyDeclarationBlock {
    block_with(declarations, Importance::Normal)
}

pub fn rule(selector: SelectorBuilder, declarations: &[Declaration]) -> CssRule {
    rule_with_block(selector, block(declarations))
}

pub fn important_rule(selector: SelectorBuilder, declarations: &[Declaration]) -> CssRule {
    rule_with_block(selector, block_with(declarations, Importance::Important))
}

pub fn rule_with_block(selector: SelectorBuilder, block: PropertyDeclarationBlock) -> CssRule {
    let selector = selector.build().expect("test selectors are valid");
    CssRule::Style(Arc::new(StyleRule::new(vec![selector], block)))
}

pub fn sheet(origin: Origin, rules: Vec<CssRule>) -> Arc<Stylesheet> {
    Arc::new(Stylesheet::new(origin, rules))
}

pub fn stylist_with_quirks(sheets: &[Arc<Stylesheet>], quirks_mode: QuirksMode) -> Stylist {
    let mut stylist = Stylist::new(Box::new(MediaTypeDevice::default()), quirks_mode);
    stylist.rebuild(sheets, &NullReporter);
    stylist
}

/// A no-quirks stylist with the default sheets and `rules` as the author
/// sheet.
pub fn author_stylist(rules: Vec<CssRule>) -> Stylist {
    stylist_with_quirks(&[sheet(Origin::Author, rules)], QuirksMode::NoQuirks)
}

/// An HTML document with `<html><body></body></html>`.
pub struct Page {
    pub doc: Document,
    pub html: NodeId,
    pub body: NodeId,
}

impl Page {
    pub fn new() -> Self {
        let mut doc = Document::new();
        let document = doc.document_node();
        let html = doc.append_element(document, "html");
        let body = doc.append_element(html, "body");
        Page { doc, html, body }
    }

    /// Appends `<name class="...">` to `parent`.
    pub fn add(&mut self, parent: NodeId, name: &str, class: Option<&str>) -> NodeId {
        let element = self.doc.append_element(parent, name);
        if let Some(class) = class {
            self.doc.set_attribute(element, "class", class);
        }
        element
    }
}

pub fn options_without_sharing() -> StyleSystemOptions {
    StyleSystemOptions {
        disable_style_sharing_cache: true,
        ..StyleSystemOptions::default()
    }
}

/// Styles the whole document; returns the thread-local context for its
/// statistics and pending images.
pub fn style_document_with<'a>(
    doc: &'a Document,
    shared: &SharedStyleContext,
) -> ThreadLocalStyleContext<ElementRef<'a>> {
    let mut thread_local = ThreadLocalStyleContext::new();
    let root = doc.root_element().expect("document has a root element");
    traverse_dom(root, shared, &mut thread_local);
    thread_local
}

pub fn style_document<'a>(
    doc: &'a Document,
    stylist: &Stylist,
    options: StyleSystemOptions,
) -> ThreadLocalStyleContext<ElementRef<'a>> {
    let shared = SharedStyleContext::new(stylist).with_options(options);
    style_document_with(doc, &shared)
}

pub fn primary_style(doc: &Document, node: NodeId) -> Arc<ComputedValues> {
    doc.element(node)
        .and_then(|element| element.primary_style())
        .expect("element was styled")
}
