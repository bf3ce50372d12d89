/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use crate::{Document, ElementNode, NodeData, NodeId};
use atomic_refcell::{AtomicRef, AtomicRefMut};
use selectors::attr::CaseSensitivity;
use selectors::matching::ElementSelectorFlags;
use selectors::{Atom, Element, ElementState, OpaqueElement};
use servo_arc::Arc;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::Ordering;
use style::data::ElementData;
use style::dom::TElement;
use style::properties::PropertyDeclarationBlock;

/// A handle to an element of a `Document`.
#[derive(Clone, Copy)]
pub struct ElementRef<'a> {
    document: &'a Document,
    node: NodeId,
    element: &'a ElementNode,
}

impl<'a> ElementRef<'a> {
    pub(crate) fn new(document: &'a Document, node: NodeId) -> Option<Self> {
        match document.nodes.get(node.0)?.data {
            NodeData::Element(ref element) => Some(ElementRef {
                document,
                node,
                element,
            }),
            _ => None,
        }
    }

    /// The node this element is.
    pub fn node_id(&self) -> NodeId {
        self.node
    }

    pub(crate) fn node(&self) -> &'a ElementNode {
        self.element
    }

    fn element_at(&self, node: Option<NodeId>) -> Option<Self> {
        ElementRef::new(self.document, node?)
    }

    fn insert_selector_flags(&self, flags: ElementSelectorFlags) {
        self.element
            .selector_flags
            .fetch_or(flags.bits(), Ordering::Relaxed);
    }
}

impl PartialEq for ElementRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node && std::ptr::eq(self.document, other.document)
    }
}

impl Eq for ElementRef<'_> {}

impl Hash for ElementRef<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node.hash(state)
    }
}

impl fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<{}", self.element.local_name)?;
        if let Some(ref id) = self.element.id {
            write!(f, " id={}", id)?;
        }
        write!(f, "> ({})", self.node.0)
    }
}

impl<'a> Element for ElementRef<'a> {
    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new(self.node.0)
    }

    fn parent_element(&self) -> Option<Self> {
        self.element_at(self.document.nodes[self.node.0].parent)
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        let mut node = self.document.nodes[self.node.0].prev_sibling;
        while let Some(sibling) = node {
            if let Some(element) = ElementRef::new(self.document, sibling) {
                return Some(element);
            }
            node = self.document.nodes[sibling.0].prev_sibling;
        }
        None
    }

    fn next_sibling_element(&self) -> Option<Self> {
        let mut node = self.document.nodes[self.node.0].next_sibling;
        while let Some(sibling) = node {
            if let Some(element) = ElementRef::new(self.document, sibling) {
                return Some(element);
            }
            node = self.document.nodes[sibling.0].next_sibling;
        }
        None
    }

    fn is_html_element_in_html_document(&self) -> bool {
        self.document.is_html && self.element.is_html_element()
    }

    fn local_name(&self) -> &Atom {
        &self.element.local_name
    }

    fn namespace(&self) -> &Atom {
        &self.element.namespace
    }

    fn id(&self) -> Option<&Atom> {
        self.element.id.as_ref()
    }

    fn has_class(&self, name: &Atom, case_sensitivity: CaseSensitivity) -> bool {
        self.element
            .classes
            .iter()
            .any(|class| case_sensitivity.eq(class.as_bytes(), name.as_bytes()))
    }

    fn each_class<F>(&self, mut callback: F)
    where
        F: FnMut(&Atom),
    {
        for class in self.element.classes.iter() {
            callback(class)
        }
    }

    fn attr(&self, local_name: &Atom) -> Option<&str> {
        self.element
            .attrs
            .iter()
            .find(|(name, _)| name == local_name)
            .map(|(_, value)| &**value)
    }

    fn state(&self) -> ElementState {
        self.element.state
    }

    // https://html.spec.whatwg.org/multipage/#selector-link
    fn is_link(&self) -> bool {
        if !self.element.is_html_element() {
            return false;
        }
        match &*self.element.local_name {
            "a" | "area" | "link" => self.attr(&Atom::from("href")).is_some(),
            _ => false,
        }
    }

    fn is_empty(&self) -> bool {
        let mut child = self.document.nodes[self.node.0].first_child;
        while let Some(node) = child {
            let node = &self.document.nodes[node.0];
            match node.data {
                NodeData::Element(..) => return false,
                NodeData::Text(ref text) if !text.is_empty() => return false,
                _ => {},
            }
            child = node.next_sibling;
        }
        true
    }

    fn is_root(&self) -> bool {
        match self.document.nodes[self.node.0].parent {
            Some(parent) => matches!(self.document.nodes[parent.0].data, NodeData::Document),
            None => false,
        }
    }

    fn custom_pseudo_element(&self) -> Option<&Atom> {
        self.element.custom_pseudo_element.as_ref()
    }

    fn apply_selector_flags(&self, flags: ElementSelectorFlags) {
        // Handle flags that apply to the element.
        let self_flags = flags.for_self();
        if !self_flags.is_empty() {
            self.insert_selector_flags(self_flags);
        }

        // Handle flags that apply to the parent.
        let parent_flags = flags.for_parent();
        if !parent_flags.is_empty() {
            if let Some(parent) = self.parent_element() {
                parent.insert_selector_flags(parent_flags);
            }
        }
    }
}

impl<'a> TElement for ElementRef<'a> {
    fn first_element_child(&self) -> Option<Self> {
        let mut child = self.document.nodes[self.node.0].first_child;
        while let Some(node) = child {
            if let Some(element) = ElementRef::new(self.document, node) {
                return Some(element);
            }
            child = self.document.nodes[node.0].next_sibling;
        }
        None
    }

    fn last_element_child(&self) -> Option<Self> {
        let mut child = self.document.nodes[self.node.0].last_child;
        while let Some(node) = child {
            if let Some(element) = ElementRef::new(self.document, node) {
                return Some(element);
            }
            child = self.document.nodes[node.0].prev_sibling;
        }
        None
    }

    fn style_attribute(&self) -> Option<&Arc<PropertyDeclarationBlock>> {
        self.element.style_attribute.as_ref()
    }

    fn borrow_data(&self) -> Option<AtomicRef<ElementData>> {
        Some(self.element.style_data.borrow())
    }

    fn mutate_data(&self) -> Option<AtomicRefMut<ElementData>> {
        Some(self.element.style_data.borrow_mut())
    }

    fn selector_flags(&self) -> ElementSelectorFlags {
        ElementSelectorFlags::from_bits_truncate(self.element.selector_flags.load(Ordering::Relaxed))
    }

    fn is_form_control(&self) -> bool {
        self.element.is_form_control
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_names_are_lowercased() {
        let mut doc = Document::new();
        let html = doc.create_element("HTML");
        let root = doc.document_node();
        doc.append_child(root, html);
        doc.set_attribute(html, "LANG", "en");

        let element = doc.root_element().unwrap();
        assert_eq!(&**element.local_name(), "html");
        assert_eq!(element.attr(&Atom::from("lang")), Some("en"));
        assert!(element.is_root());
        assert!(element.is_html_element_in_html_document());
    }

    #[test]
    fn xml_names_keep_their_case() {
        let mut doc = Document::new_xml();
        let root = doc.document_node();
        let svg = doc.create_element_ns("http://www.w3.org/2000/svg", "foreignObject");
        doc.append_child(root, svg);
        let element = doc.element(svg).unwrap();
        assert_eq!(&**element.local_name(), "foreignObject");
        assert!(!element.is_html_element_in_html_document());
    }

    #[test]
    fn sibling_navigation_skips_text() {
        let mut doc = Document::new();
        let root = doc.document_node();
        let body = doc.append_element(root, "body");
        let first = doc.append_element(body, "p");
        doc.append_text(body, "between");
        let second = doc.append_element(body, "p");

        let first = doc.element(first).unwrap();
        let second = doc.element(second).unwrap();
        let body = doc.element(body).unwrap();
        assert_eq!(first.next_sibling_element(), Some(second));
        assert_eq!(second.prev_sibling_element(), Some(first));
        assert_eq!(body.first_element_child(), Some(first));
        assert_eq!(body.last_element_child(), Some(second));
        assert!(!body.is_empty());
        assert!(first.is_empty());
        assert_eq!(second.depth(), 1);
    }

    #[test]
    fn classes_and_ids_come_from_attributes() {
        let mut doc = Document::new();
        let root = doc.document_node();
        let div = doc.append_element(root, "div");
        doc.set_attribute(div, "class", "  a\tB ");
        doc.set_attribute(div, "id", "main");

        let div = doc.element(div).unwrap();
        assert!(div.has_class(&Atom::from("a"), CaseSensitivity::CaseSensitive));
        assert!(!div.has_class(&Atom::from("b"), CaseSensitivity::CaseSensitive));
        assert!(div.has_class(&Atom::from("b"), CaseSensitivity::AsciiCaseInsensitive));
        assert_eq!(div.id(), Some(&Atom::from("main")));
    }

    #[test]
    fn links_need_an_href() {
        let mut doc = Document::new();
        let root = doc.document_node();
        let body = doc.append_element(root, "body");
        let anchor = doc.append_element(body, "a");
        let link = doc.append_element(body, "a");
        doc.set_attribute(link, "href", "https://example.org/");

        assert!(!doc.element(anchor).unwrap().is_link());
        let link = doc.element(link).unwrap();
        assert!(link.is_link());
        assert_eq!(link.link_href(), Some("https://example.org/"));
    }

    #[test]
    fn selector_flags_are_split_between_element_and_parent() {
        let mut doc = Document::new();
        let root = doc.document_node();
        let html = doc.append_element(root, "html");
        let list = doc.append_element(html, "ul");
        let item = doc.append_element(list, "li");

        let item = doc.element(item).unwrap();
        item.apply_selector_flags(
            ElementSelectorFlags::HAS_EDGE_CHILD_SELECTOR | ElementSelectorFlags::HAS_EMPTY_SELECTOR,
        );
        let list = doc.element(list).unwrap();
        assert_eq!(list.selector_flags(), ElementSelectorFlags::HAS_EDGE_CHILD_SELECTOR);
        assert_eq!(item.selector_flags(), ElementSelectorFlags::HAS_EMPTY_SELECTOR);
        assert!(doc.element(html).unwrap().selector_flags().is_empty());

        // The root has no parent to take the positional flags.
        let html = doc.element(html).unwrap();
        html.apply_selector_flags(ElementSelectorFlags::HAS_SLOW_SELECTOR);
        assert!(html.selector_flags().is_empty());
    }

    #[test]
    fn appending_an_ancestor_is_refused() {
        let mut doc = Document::new();
        let root = doc.document_node();
        let outer = doc.append_element(root, "div");
        let inner = doc.append_element(outer, "div");
        doc.append_child(inner, outer);
        assert_eq!(doc.element(inner).unwrap().parent_element(), doc.element(outer));
        assert!(doc.element(outer).unwrap().is_root());
    }
}
