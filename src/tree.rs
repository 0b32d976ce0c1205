//! In-memory document tree.
//!
//! `DocTree` is an element arena with ordered children, enough of the DOM
//! for the reflow engine to run outside a browser: tests build pages with it
//! and the preview CLI loads JSON fixtures into it. Only elements are
//! modelled; an element may carry a text label for display.
//!
//! The arena root is the document itself. It is not an element: top-level
//! elements report no parent, as `parentElement` does for `<html>`.

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dom::Dom;
use crate::error::DomError;
use crate::selector::{ElementAdapter, SelectorList};

/// Handle to a node in a [`DocTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Serialized element description used by fixtures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Tag name.
    pub tag: String,
    /// `id` attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// `class` attribute, space separated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// Any other attributes.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    /// Display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Child elements in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,
}

#[derive(Debug, Clone)]
struct NodeData {
    tag: String,
    attrs: Vec<(String, String)>,
    text: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl NodeData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            text: None,
            parent: None,
            children: Vec::new(),
        }
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn set_attr(&mut self, name: &str, value: String) {
        match self.attrs.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attrs.push((name.to_owned(), value)),
        }
    }

    fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_whitespace()
    }
}

/// Arena-backed element tree.
#[derive(Debug, Clone)]
pub struct DocTree {
    nodes: Vec<NodeData>,
}

impl DocTree {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: vec![NodeData::new("#document")] }
    }

    /// Build a document whose top-level element is described by `spec`.
    #[must_use]
    pub fn from_spec(spec: &NodeSpec) -> Self {
        let mut tree = Self::new();
        let root = tree.root();
        tree.build(root, spec);
        tree
    }

    /// Parse a JSON fixture (a single [`NodeSpec`]) into a document.
    ///
    /// # Errors
    ///
    /// Returns the deserialization error for malformed fixtures.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let spec: NodeSpec = serde_json::from_str(json)?;
        Ok(Self::from_spec(&spec))
    }

    fn build(&mut self, parent: NodeId, spec: &NodeSpec) -> NodeId {
        let id = self.create_element(&spec.tag);
        if let Some(value) = &spec.id {
            self.set_attribute(id, "id", value);
        }
        if let Some(value) = &spec.class {
            self.set_attribute(id, "class", value);
        }
        for (name, value) in &spec.attrs {
            self.set_attribute(id, name, value);
        }
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.text.clone_from(&spec.text);
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.push(id);
        }
        for child in &spec.children {
            self.build(id, child);
        }
        id
    }

    /// The document node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData::new(tag));
        id
    }

    /// Set an attribute, replacing any previous value.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(data) = self.nodes.get_mut(node.0) {
            data.set_attr(&name.to_ascii_lowercase(), value.to_owned());
        }
    }

    /// Set the display label of an element.
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(data) = self.nodes.get_mut(node.0) {
            data.text = Some(text.to_owned());
        }
    }

    /// Lowercase tag name, empty for unknown handles.
    #[must_use]
    pub fn tag(&self, node: NodeId) -> &str {
        self.nodes.get(node.0).map_or("", |data| data.tag.as_str())
    }

    /// Display label, if any.
    #[must_use]
    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node.0).and_then(|data| data.text.as_deref())
    }

    /// Attribute value by name.
    #[must_use]
    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes.get(node.0).and_then(|data| data.attr(name))
    }

    /// Class tokens in attribute order.
    #[must_use]
    pub fn classes(&self, node: NodeId) -> Vec<&str> {
        self.nodes
            .get(node.0)
            .map(|data| data.classes().collect())
            .unwrap_or_default()
    }

    /// Parent element; `None` for top-level and detached elements.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.raw_parent(node).filter(|&parent| parent != self.root())
    }

    /// Whether the element's class list contains `class`.
    #[must_use]
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes
            .get(node.0)
            .is_some_and(|data| data.classes().any(|token| token == class))
    }

    /// Raw child list, including top-level elements under the root.
    #[must_use]
    pub fn child_ids(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|data| data.children.as_slice())
            .unwrap_or_default()
    }

    /// First element with the given `id` attribute.
    #[must_use]
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .find(|&node| self.get_attribute(node, "id") == Some(id))
    }

    /// Elements under `node` in document (pre-)order, excluding `node`.
    #[must_use]
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.child_ids(node).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.child_ids(next).iter().rev().copied());
        }
        out
    }

    /// Attach `child` under `parent` at the end, detaching it first.
    ///
    /// # Errors
    ///
    /// Returns [`DomError`] for unknown handles or when `parent` lies inside
    /// `child`'s subtree.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.insert_at(parent, child, usize::MAX)
    }

    /// Move `child` to position `index` of `parent`'s raw child list.
    /// Indices past the end append.
    fn insert_at(&mut self, parent: NodeId, child: NodeId, index: usize) -> Result<(), DomError> {
        self.check(parent)?;
        self.check(child)?;
        if child == self.root() || self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::Cycle);
        }
        self.detach(child);
        let Some(data) = self.nodes.get_mut(parent.0) else {
            return Err(DomError::UnknownNode(parent.to_string()));
        };
        let index = index.min(data.children.len());
        data.children.insert(index, child);
        if let Some(data) = self.nodes.get_mut(child.0) {
            data.parent = Some(parent);
        }
        Ok(())
    }

    fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get(node.0).and_then(|data| data.parent) else {
            return;
        };
        if let Some(data) = self.nodes.get_mut(parent.0) {
            data.children.retain(|&child| child != node);
        }
        if let Some(data) = self.nodes.get_mut(node.0) {
            data.parent = None;
        }
    }

    fn check(&self, node: NodeId) -> Result<(), DomError> {
        if node.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(DomError::UnknownNode(node.to_string()))
        }
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(next) = current {
            if next == ancestor {
                return true;
            }
            current = self.nodes.get(next.0).and_then(|data| data.parent);
        }
        false
    }

    fn raw_parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|data| data.parent)
    }

    /// Indented outline of the document, one element per line:
    /// `tag#id.class.class "text"`.
    #[must_use]
    pub fn outline(&self) -> String {
        let mut out = String::new();
        for &child in self.child_ids(self.root()) {
            self.write_outline(&mut out, child, 0);
        }
        out
    }

    /// Short CSS-like label: `tag#id.class.class`.
    #[must_use]
    pub fn label(&self, node: NodeId) -> String {
        let mut out = self.tag(node).to_owned();
        if let Some(id) = self.get_attribute(node, "id") {
            out.push('#');
            out.push_str(id);
        }
        for class in self.classes(node) {
            out.push('.');
            out.push_str(class);
        }
        out
    }

    fn write_outline(&self, out: &mut String, node: NodeId, depth: usize) {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&self.label(node));
        if let Some(text) = self.text(node) {
            out.push(' ');
            out.push_str(&format!("{text:?}"));
        }
        out.push('\n');
        for &child in self.child_ids(node) {
            self.write_outline(out, child, depth + 1);
        }
    }
}

impl Default for DocTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementAdapter for DocTree {
    type Handle = NodeId;

    fn parent(&self, element: NodeId) -> Option<NodeId> {
        DocTree::parent(self, element)
    }

    fn previous_sibling(&self, element: NodeId) -> Option<NodeId> {
        let parent = self.raw_parent(element)?;
        let siblings = self.child_ids(parent);
        let index = siblings.iter().position(|&child| child == element)?;
        index.checked_sub(1).and_then(|prev| siblings.get(prev).copied())
    }

    fn tag_name(&self, element: NodeId) -> &str {
        self.tag(element)
    }

    fn has_class(&self, element: NodeId, class: &str) -> bool {
        DocTree::has_class(self, element, class)
    }

    fn attr(&self, element: NodeId, name: &str) -> Option<&str> {
        self.get_attribute(element, name)
    }
}

impl Dom for DocTree {
    type Node = NodeId;

    fn elements_with_attribute(&self, name: &str) -> Vec<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .filter(|&node| self.get_attribute(node, name).is_some())
            .collect()
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.get_attribute(*node, name).map(str::to_owned)
    }

    fn query_selector(&self, selector: &str) -> Option<NodeId> {
        let list = match SelectorList::parse(selector) {
            Ok(list) => list,
            Err(err) => {
                tracing::debug!(selector, error = %err, "unparseable selector");
                return None;
            }
        };
        self.descendants(self.root())
            .into_iter()
            .find(|&node| list.matches(self, node))
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        DocTree::parent(self, *node)
    }

    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.child_ids(*node).to_vec()
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        DocTree::has_class(self, *node, class)
    }

    fn add_class(&mut self, node: &NodeId, class: &str) -> Result<(), DomError> {
        let Some(data) = self.nodes.get_mut(node.0) else {
            return Err(DomError::UnknownNode(node.to_string()));
        };
        if data.classes().any(|token| token == class) {
            return Ok(());
        }
        let mut tokens: Vec<&str> = data.classes().collect();
        tokens.push(class);
        let joined = tokens.join(" ");
        data.set_attr("class", joined);
        Ok(())
    }

    fn remove_class(&mut self, node: &NodeId, class: &str) -> Result<(), DomError> {
        let Some(data) = self.nodes.get_mut(node.0) else {
            return Err(DomError::UnknownNode(node.to_string()));
        };
        if data.attr("class").is_none() {
            return Ok(());
        }
        let joined = data
            .classes()
            .filter(|&token| token != class)
            .collect::<Vec<_>>()
            .join(" ");
        data.set_attr("class", joined);
        Ok(())
    }

    fn append(&mut self, parent: &NodeId, node: &NodeId) -> Result<(), DomError> {
        self.insert_at(*parent, *node, usize::MAX)
    }

    fn prepend(&mut self, parent: &NodeId, node: &NodeId) -> Result<(), DomError> {
        self.insert_at(*parent, *node, 0)
    }

    fn insert_before(&mut self, reference: &NodeId, node: &NodeId) -> Result<(), DomError> {
        if reference == node {
            return Ok(());
        }
        self.check(*reference)?;
        let parent = self.raw_parent(*reference).ok_or(DomError::Detached)?;
        self.check(*node)?;
        if self.is_inclusive_ancestor(*node, parent) {
            return Err(DomError::Cycle);
        }
        self.detach(*node);
        let index = self
            .child_ids(parent)
            .iter()
            .position(|child| child == reference)
            .ok_or(DomError::Detached)?;
        self.insert_at(parent, *node, index)
    }
}
