/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! A minimal document tree for the style system to act on.
//!
//! Nodes live in an arena owned by the `Document` and are named by
//! `NodeId`. The tree is built through `&mut Document`; once built, it is
//! styled through `ElementRef` handles, which implement the `TElement`
//! trait. Each element carries its own `ElementData` and selector flags,
//! so a shared `&Document` is all the traversal needs.

#![deny(unsafe_code)]

mod element;

pub use crate::element::ElementRef;

use atomic_refcell::AtomicRefCell;
use log::warn;
use selectors::{Atom, ElementState};
use servo_arc::Arc;
use smallvec::SmallVec;
use std::sync::atomic::AtomicU8;
use style::data::ElementData;
use style::properties::PropertyDeclarationBlock;

/// The HTML namespace.
pub const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// The index of a node in its document's arena.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeId(usize);

impl NodeId {
    /// The position of the node in the arena.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// The per-element part of a node.
pub struct ElementNode {
    local_name: Atom,
    namespace: Atom,
    id: Option<Atom>,
    classes: SmallVec<[Atom; 4]>,
    attrs: Vec<(Atom, String)>,
    state: ElementState,
    style_attribute: Option<Arc<PropertyDeclarationBlock>>,
    custom_pseudo_element: Option<Atom>,
    is_form_control: bool,
    selector_flags: AtomicU8,
    style_data: AtomicRefCell<ElementData>,
}

impl ElementNode {
    fn new(namespace: Atom, local_name: Atom) -> Self {
        ElementNode {
            local_name,
            namespace,
            id: None,
            classes: SmallVec::new(),
            attrs: vec![],
            state: ElementState::empty(),
            style_attribute: None,
            custom_pseudo_element: None,
            is_form_control: false,
            selector_flags: AtomicU8::new(0),
            style_data: AtomicRefCell::new(ElementData::default()),
        }
    }

    fn is_html_element(&self) -> bool {
        &*self.namespace == HTML_NAMESPACE
    }
}

enum NodeData {
    Document,
    Element(ElementNode),
    Text(String),
}

struct Node {
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
    data: NodeData,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Node {
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            data,
        }
    }
}

/// A document: the arena of its nodes, rooted at a document node.
pub struct Document {
    nodes: Vec<Node>,
    is_html: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// A new, empty HTML document.
    pub fn new() -> Self {
        Document {
            nodes: vec![Node::new(NodeData::Document)],
            is_html: true,
        }
    }

    /// A new, empty document that is not HTML: names are not lowercased
    /// and selectors match them case-sensitively.
    pub fn new_xml() -> Self {
        Document {
            is_html: false,
            ..Self::new()
        }
    }

    /// Whether this is an HTML document.
    pub fn is_html(&self) -> bool {
        self.is_html
    }

    /// The document node, parent of the root element.
    pub fn document_node(&self) -> NodeId {
        NodeId(0)
    }

    fn push_node(&mut self, data: NodeData) -> NodeId {
        self.nodes.push(Node::new(data));
        NodeId(self.nodes.len() - 1)
    }

    /// Creates a detached element in the HTML namespace.
    pub fn create_element(&mut self, local_name: &str) -> NodeId {
        self.create_element_ns(HTML_NAMESPACE, local_name)
    }

    /// Creates a detached element. HTML elements of HTML documents get
    /// their name lowercased.
    pub fn create_element_ns(&mut self, namespace: &str, local_name: &str) -> NodeId {
        let local_name = if self.is_html && namespace == HTML_NAMESPACE {
            Atom::from(local_name.to_ascii_lowercase())
        } else {
            Atom::from(local_name)
        };
        self.push_node(NodeData::Element(ElementNode::new(Atom::from(namespace), local_name)))
    }

    /// Creates a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push_node(NodeData::Text(text.to_owned()))
    }

    /// Creates an element and appends it to `parent`.
    pub fn append_element(&mut self, parent: NodeId, local_name: &str) -> NodeId {
        let element = self.create_element(local_name);
        self.append_child(parent, element);
        element
    }

    /// Creates a text node and appends it to `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let node = self.create_text(text);
        self.append_child(parent, node);
        node
    }

    /// Moves `child` to the end of `parent`'s children.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.is_inclusive_ancestor(child, parent) ||
            matches!(self.nodes[parent.0].data, NodeData::Text(..))
        {
            warn!("Cannot append {:?} to {:?}", child, parent);
            return;
        }
        self.detach(child);

        let previous_last = self.nodes[parent.0].last_child;
        {
            let node = &mut self.nodes[child.0];
            node.parent = Some(parent);
            node.prev_sibling = previous_last;
        }
        match previous_last {
            Some(last) => self.nodes[last.0].next_sibling = Some(child),
            None => self.nodes[parent.0].first_child = Some(child),
        }
        self.nodes[parent.0].last_child = Some(child);
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            node = match self.nodes[node.0].parent {
                Some(parent) => parent,
                None => return false,
            };
        }
    }

    /// Removes `node` from its parent, if it has one. Its subtree comes
    /// along.
    pub fn detach(&mut self, node: NodeId) {
        let (parent, prev, next) = {
            let node = &mut self.nodes[node.0];
            let links = (node.parent, node.prev_sibling, node.next_sibling);
            node.parent = None;
            node.prev_sibling = None;
            node.next_sibling = None;
            links
        };
        let parent = match parent {
            Some(parent) => parent,
            None => return,
        };
        match prev {
            Some(prev) => self.nodes[prev.0].next_sibling = next,
            None => self.nodes[parent.0].first_child = next,
        }
        match next {
            Some(next) => self.nodes[next.0].prev_sibling = prev,
            None => self.nodes[parent.0].last_child = prev,
        }
    }

    fn element_node_mut(&mut self, node: NodeId) -> Option<&mut ElementNode> {
        match self.nodes[node.0].data {
            NodeData::Element(ref mut element) => Some(element),
            _ => {
                warn!("{:?} is not an element", node);
                None
            },
        }
    }

    /// Sets an attribute in the null namespace. `id` and `class` also
    /// update the element's id and class list.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let is_html_document = self.is_html;
        let element = match self.element_node_mut(node) {
            Some(element) => element,
            None => return,
        };
        let name = if is_html_document && element.is_html_element() {
            Atom::from(name.to_ascii_lowercase())
        } else {
            Atom::from(name)
        };

        match &*name {
            "id" => element.id = Some(Atom::from(value)),
            "class" => {
                element.classes = value.split_ascii_whitespace().map(Atom::from).collect();
            },
            _ => {},
        }

        match element.attrs.iter_mut().find(|(attr, _)| *attr == name) {
            Some(attr) => attr.1 = value.to_owned(),
            None => element.attrs.push((name, value.to_owned())),
        }
    }

    /// Sets the declarations of the element's `style` attribute, which
    /// arrive already parsed.
    pub fn set_style_attribute(&mut self, node: NodeId, block: PropertyDeclarationBlock) {
        if let Some(element) = self.element_node_mut(node) {
            element.style_attribute = Some(Arc::new(block));
        }
    }

    /// Replaces the element's dynamic state.
    pub fn set_state(&mut self, node: NodeId, state: ElementState) {
        if let Some(element) = self.element_node_mut(node) {
            element.state = state;
        }
    }

    /// Exposes the element as the custom pseudo-element `name` of its
    /// host.
    pub fn set_custom_pseudo_element(&mut self, node: NodeId, name: &str) {
        if let Some(element) = self.element_node_mut(node) {
            element.custom_pseudo_element = Some(Atom::from(name));
        }
    }

    /// Marks the element as a form control.
    pub fn set_form_control(&mut self, node: NodeId, is_form_control: bool) {
        if let Some(element) = self.element_node_mut(node) {
            element.is_form_control = is_form_control;
        }
    }

    /// A handle to the element `node`, or `None` if it isn't one.
    pub fn element(&self, node: NodeId) -> Option<ElementRef> {
        ElementRef::new(self, node)
    }

    /// The root element: the document node's element child.
    pub fn root_element(&self) -> Option<ElementRef> {
        let mut child = self.nodes[0].first_child;
        while let Some(node) = child {
            if let Some(element) = self.element(node) {
                return Some(element);
            }
            child = self.nodes[node.0].next_sibling;
        }
        None
    }

    /// Every element of the document, in creation order.
    pub fn elements(&self) -> impl Iterator<Item = ElementRef> + '_ {
        (0..self.nodes.len()).filter_map(move |index| self.element(NodeId(index)))
    }

    /// Drops the styles of every element.
    pub fn clear_styles(&self) {
        for element in self.elements() {
            element.node().style_data.borrow_mut().clear_styles();
        }
    }
}
