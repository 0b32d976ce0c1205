//! Reflow engine core: directive state and the move executor.
//!
//! Backend-agnostic; the browser wrapper in `web` and the preview CLI both
//! drive an [`EngineCore`] through its viewport inputs.

use crate::config::AdaptConfig;
use crate::directive::{self, Directive, Order};
use crate::dom::Dom;
use crate::error::DomError;
use crate::order;
use crate::query::{self, BreakpointGroup};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Where a managed element currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Under its original parent (no marker class).
    AtOrigin,
    /// Inside its target container (marker class present).
    AtTarget,
}

/// One element moved by a handler pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Index into [`EngineCore::directives`].
    pub directive: usize,
    /// Placement after the move.
    pub placement: Placement,
}

/// Reflow engine state over any [`Dom`] backend.
///
/// Holds the sorted directives and their breakpoint groups. Viewport changes
/// come in through [`EngineCore::handle`] (one group, browser change event),
/// [`EngineCore::sync`] (every group, initial pass) or
/// [`EngineCore::resize`] (only groups whose match state flips).
pub struct EngineCore<D: Dom> {
    dom: D,
    config: AdaptConfig,
    directives: Vec<Directive<D::Node>>,
    groups: Vec<BreakpointGroup>,
}

impl<D: Dom> EngineCore<D> {
    /// Parse directives from `dom`, sort them and group them by breakpoint.
    /// Nothing moves until the first handler call.
    pub fn new(dom: D, config: AdaptConfig) -> Self {
        let mut directives = directive::collect(&dom, &config);
        order::sort(&mut directives, config.mode);
        let groups = query::group(&directives, config.mode);
        tracing::info!(
            mode = %config.mode,
            directives = directives.len(),
            groups = groups.len(),
            "dynamic adapt initialized"
        );
        Self { dom, config, directives, groups }
    }

    // --- Viewport inputs ---

    /// Run the change handler for one group.
    ///
    /// When `matches`, every member moves to its target; otherwise members
    /// carrying the marker move back. Either way the group's pass order is
    /// reversed afterwards. Unknown group indices do nothing.
    pub fn handle(&mut self, group: usize, matches: bool) -> Vec<Transition> {
        let Some(entry) = self.groups.get_mut(group) else {
            return Vec::new();
        };
        entry.set_matched(matches);
        let members = entry.members().to_vec();

        let mut transitions = Vec::new();
        for index in members {
            let result = if matches {
                self.move_to(index).map(|()| true)
            } else {
                self.move_back(index)
            };
            match result {
                Ok(true) => transitions.push(Transition {
                    directive: index,
                    placement: if matches { Placement::AtTarget } else { Placement::AtOrigin },
                }),
                Ok(false) => {}
                Err(err) => {
                    tracing::warn!(directive = index, error = %err, "move failed; element left in place");
                }
            }
        }

        if let Some(entry) = self.groups.get_mut(group) {
            entry.reverse();
        }
        transitions
    }

    /// Initial pass: evaluate every group at `width` and run its handler.
    pub fn sync(&mut self, width: u32) -> Vec<Transition> {
        let mut transitions = Vec::new();
        for group in 0..self.groups.len() {
            let matches = self.query_matches(group, width);
            transitions.extend(self.handle(group, matches));
        }
        transitions
    }

    /// Viewport change to `width`: run the handler of each group whose match
    /// state differs from the last one seen. Groups never handled before are
    /// treated as changed.
    pub fn resize(&mut self, width: u32) -> Vec<Transition> {
        let mut transitions = Vec::new();
        for group in 0..self.groups.len() {
            let matches = self.query_matches(group, width);
            let previous = self.groups.get(group).and_then(BreakpointGroup::matched);
            if previous != Some(matches) {
                tracing::debug!(group, matches, width, "breakpoint crossed");
                transitions.extend(self.handle(group, matches));
            }
        }
        transitions
    }

    /// Move every element of a matched group back to its origin.
    pub fn restore(&mut self) -> Vec<Transition> {
        let mut transitions = Vec::new();
        for group in 0..self.groups.len() {
            if self.groups.get(group).and_then(BreakpointGroup::matched) == Some(true) {
                transitions.extend(self.handle(group, false));
            }
        }
        transitions
    }

    fn query_matches(&self, group: usize, width: u32) -> bool {
        self.groups
            .get(group)
            .is_some_and(|entry| entry.query().matches(width))
    }

    // --- Move executor ---

    /// AT_ORIGIN → AT_TARGET. Records the current index among the element's
    /// siblings, tags it, then inserts it into the target per its order.
    ///
    /// An element already carrying the marker keeps its recorded index. If the
    /// insertion fails, a marker added by this call is taken off again.
    fn move_to(&mut self, index: usize) -> Result<(), DomError> {
        let Some(directive) = self.directives.get_mut(index) else {
            return Ok(());
        };
        let element = directive.element.clone();
        let target = directive.target.clone();
        let order = directive.order;
        let marker = &self.config.marker_class;

        let relocated = self.dom.has_class(&element, marker);
        if !relocated {
            directive.original_index = self.dom.index_in_parent(&element);
            self.dom.add_class(&element, marker)?;
        }

        if let Err(err) = Self::insert(&mut self.dom, &target, &element, order) {
            if !relocated {
                if let Err(undo) = self.dom.remove_class(&element, marker) {
                    tracing::warn!(directive = index, error = %undo, "failed to clear marker");
                }
            }
            return Err(err);
        }
        tracing::debug!(directive = index, ?element, %order, "moved to target");
        Ok(())
    }

    fn insert(dom: &mut D, target: &D::Node, element: &D::Node, order: Order) -> Result<(), DomError> {
        let children = dom.children(target);
        match order {
            Order::First => dom.prepend(target, element),
            Order::Index(position) => match children.get(position) {
                Some(anchor) => dom.insert_before(anchor, element),
                None => dom.append(target, element),
            },
            Order::Last => dom.append(target, element),
        }
    }

    /// AT_TARGET → AT_ORIGIN. Returns `false` without touching the DOM when
    /// the element is not marked as relocated.
    fn move_back(&mut self, index: usize) -> Result<bool, DomError> {
        let Some(directive) = self.directives.get(index) else {
            return Ok(false);
        };
        let element = directive.element.clone();
        let origin = directive.origin.clone();
        let original_index = directive.original_index;

        if !self.dom.has_class(&element, &self.config.marker_class) {
            return Ok(false);
        }
        self.dom.remove_class(&element, &self.config.marker_class)?;

        let anchor = original_index.and_then(|position| self.dom.children(&origin).get(position).cloned());
        match anchor {
            Some(anchor) => self.dom.insert_before(&anchor, &element)?,
            None => self.dom.append(&origin, &element)?,
        }
        tracing::debug!(directive = index, ?element, ?original_index, "moved back");
        Ok(true)
    }

    // --- Queries ---

    /// Current placement of a directive's element, judged by the marker class.
    #[must_use]
    pub fn placement(&self, index: usize) -> Option<Placement> {
        let directive = self.directives.get(index)?;
        Some(if self.dom.has_class(&directive.element, &self.config.marker_class) {
            Placement::AtTarget
        } else {
            Placement::AtOrigin
        })
    }

    /// Directives in sorted order.
    #[must_use]
    pub fn directives(&self) -> &[Directive<D::Node>] {
        &self.directives
    }

    /// Breakpoint groups, one per distinct breakpoint.
    #[must_use]
    pub fn groups(&self) -> &[BreakpointGroup] {
        &self.groups
    }

    #[must_use]
    pub fn config(&self) -> &AdaptConfig {
        &self.config
    }

    /// The underlying document.
    #[must_use]
    pub fn dom(&self) -> &D {
        &self.dom
    }

    /// Mutable access to the document, e.g. to edit siblings between passes.
    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    /// Give back the document.
    #[must_use]
    pub fn into_dom(self) -> D {
        self.dom
    }
}
