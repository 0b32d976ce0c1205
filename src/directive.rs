//! Placement directives: what to move, where, at which breakpoint.
//!
//! Elements opt in with `data-da="selector[, breakpoint][, order]"`. Each
//! field is trimmed. The selector is resolved once against the document; an
//! element whose target does not resolve is left unmanaged. Missing fields
//! take their defaults (`767`, `last`).

#[cfg(test)]
#[path = "directive_test.rs"]
mod directive_test;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::AdaptConfig;
use crate::consts::{FIELD_SEPARATOR, ORDER_FIRST, ORDER_LAST};
use crate::dom::Dom;

/// Where a relocated element lands among the target's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    /// Before every existing child.
    First,
    /// After every existing child.
    #[default]
    Last,
    /// Before the child currently at this index; appended when out of range.
    Index(usize),
}

impl Order {
    /// Resolve an order token. An absent field means [`Order::Last`].
    ///
    /// A present but empty field (`".menu, 767,"`) reads as index `0`, the
    /// same as a numeric `0`. Tokens that are neither `first`, `last` nor a
    /// non-negative integer are kept as [`Order::Last`] and logged.
    #[must_use]
    pub fn parse(token: Option<&str>) -> Self {
        let Some(token) = token else {
            return Self::Last;
        };
        match token {
            "" => Self::Index(0),
            ORDER_FIRST => Self::First,
            ORDER_LAST => Self::Last,
            _ => match token.parse::<usize>() {
                Ok(index) => Self::Index(index),
                Err(_) => {
                    tracing::warn!(token, "unrecognized order token; using `last`");
                    Self::Last
                }
            },
        }
    }

    /// `first`/`last` rank used by the sort: first < index < last.
    pub(crate) fn rank(self) -> u8 {
        match self {
            Self::First => 0,
            Self::Index(_) => 1,
            Self::Last => 2,
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => f.write_str(ORDER_FIRST),
            Self::Last => f.write_str(ORDER_LAST),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// The three fields of a placement attribute, defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementSpec {
    /// Target container selector.
    pub selector: String,
    /// Breakpoint in CSS pixels.
    pub breakpoint: u32,
    /// Position inside the target.
    pub order: Order,
}

impl PlacementSpec {
    /// Split and trim an attribute value. Fields past the third are ignored.
    ///
    /// An empty breakpoint field takes `default_breakpoint`; a non-integer one
    /// does too, with a warning.
    #[must_use]
    pub fn parse(value: &str, default_breakpoint: u32) -> Self {
        let mut fields = value.split(FIELD_SEPARATOR).map(str::trim);
        let selector = fields.next().unwrap_or_default().to_owned();
        let breakpoint = match fields.next().filter(|field| !field.is_empty()) {
            None => default_breakpoint,
            Some(field) => match field.parse::<u32>() {
                Ok(breakpoint) => breakpoint,
                Err(_) => {
                    tracing::warn!(breakpoint = field, default_breakpoint, "invalid breakpoint; using default");
                    default_breakpoint
                }
            },
        };
        let order = Order::parse(fields.next());
        Self { selector, breakpoint, order }
    }
}

/// A parsed placement rule bound to one element.
#[derive(Debug, Clone, PartialEq)]
pub struct Directive<N> {
    /// The element being relocated.
    pub element: N,
    /// Parent at parse time; restorations go back here.
    pub origin: N,
    /// Resolved destination container.
    pub target: N,
    /// Selector text the target was resolved from.
    pub selector: String,
    /// Breakpoint in CSS pixels.
    pub breakpoint: u32,
    /// Position inside the target.
    pub order: Order,
    /// Index among the origin's children captured on the last move-out.
    /// Only meaningful while the element carries the marker class.
    pub original_index: Option<usize>,
}

/// Scan `dom` for placement attributes and build a directive per element
/// whose target resolves. Result is in document order, unsorted.
pub fn collect<D: Dom>(dom: &D, config: &AdaptConfig) -> Vec<Directive<D::Node>> {
    let mut directives = Vec::new();
    for element in dom.elements_with_attribute(&config.attribute) {
        let Some(value) = dom.attribute(&element, &config.attribute) else {
            continue;
        };
        let spec = PlacementSpec::parse(&value, config.default_breakpoint);
        if spec.selector.is_empty() {
            tracing::debug!(?element, "placement attribute without selector");
            continue;
        }
        let Some(target) = dom.query_selector(&spec.selector) else {
            tracing::debug!(?element, selector = %spec.selector, "target not found; skipping");
            continue;
        };
        let Some(origin) = dom.parent(&element) else {
            tracing::debug!(?element, "element has no parent; skipping");
            continue;
        };
        directives.push(Directive {
            element,
            origin,
            target,
            selector: spec.selector,
            breakpoint: spec.breakpoint,
            order: spec.order,
            original_index: None,
        });
    }
    directives
}
