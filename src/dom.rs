//! DOM access seam for the reflow engine.
//!
//! The engine never talks to a concrete document. It holds `Dom::Node`
//! handles for each managed element, its origin and its target, and asks the
//! backend for positions only when it needs "where is this right now".
//! [`crate::tree::DocTree`] implements the trait in memory; the `browser`
//! feature adds a `web-sys` backend.

use std::fmt::Debug;

use crate::error::DomError;

/// Element-level view of a document.
///
/// `children` returns element children only, matching `Element.children`;
/// every index the engine records or looks up is relative to that list.
pub trait Dom {
    /// Handle to an element. Cheap to clone, compared by identity.
    type Node: Clone + PartialEq + Debug;

    /// All elements carrying `name`, in document order.
    fn elements_with_attribute(&self, name: &str) -> Vec<Self::Node>;

    /// Attribute value, if present.
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// First element in document order matching `selector`.
    fn query_selector(&self, selector: &str) -> Option<Self::Node>;

    /// Parent element, if attached.
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Element children of `node`, in order.
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Whether `node` carries `class` in its class list.
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    /// Add `class` to the class list. No-op when already present.
    ///
    /// # Errors
    ///
    /// Returns [`DomError`] if the backend rejects the change.
    fn add_class(&mut self, node: &Self::Node, class: &str) -> Result<(), DomError>;

    /// Remove `class` from the class list. No-op when absent.
    ///
    /// # Errors
    ///
    /// Returns [`DomError`] if the backend rejects the change.
    fn remove_class(&mut self, node: &Self::Node, class: &str) -> Result<(), DomError>;

    /// Move `node` to the end of `parent`'s children.
    ///
    /// # Errors
    ///
    /// Returns [`DomError`] if the move is invalid or rejected.
    fn append(&mut self, parent: &Self::Node, node: &Self::Node) -> Result<(), DomError>;

    /// Move `node` to the start of `parent`'s children.
    ///
    /// # Errors
    ///
    /// Returns [`DomError`] if the move is invalid or rejected.
    fn prepend(&mut self, parent: &Self::Node, node: &Self::Node) -> Result<(), DomError>;

    /// Move `node` immediately before `reference`, under `reference`'s parent.
    ///
    /// # Errors
    ///
    /// Returns [`DomError`] if `reference` is detached or the move is rejected.
    fn insert_before(&mut self, reference: &Self::Node, node: &Self::Node) -> Result<(), DomError>;

    /// Position of `node` among its parent's element children.
    fn index_in_parent(&self, node: &Self::Node) -> Option<usize> {
        let parent = self.parent(node)?;
        self.children(&parent).iter().position(|child| child == node)
    }
}
