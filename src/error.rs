//! Error types for the reflow engine and its DOM backends.

use thiserror::Error;

/// A DOM backend refused a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The node handle does not refer to a live element.
    #[error("unknown node {0}")]
    UnknownNode(String),
    /// The reference node for an insertion has no parent.
    #[error("reference node has no parent")]
    Detached,
    /// The insertion would make a node its own ancestor.
    #[error("cannot insert a node into its own subtree")]
    Cycle,
    /// The browser rejected the operation.
    #[error("browser DOM error: {0}")]
    Browser(String),
}

/// Failures surfaced while constructing an engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdaptError {
    /// Mode string was neither `min` nor `max`.
    #[error("invalid mode `{0}`; expected `min` or `max`")]
    InvalidMode(String),
    /// No global `window` object (not running in a browser).
    #[error("no window available")]
    NoWindow,
    /// The window has no document.
    #[error("no document available")]
    NoDocument,
    /// `matchMedia` failed or returned nothing for a query.
    #[error("matchMedia rejected `{query}`: {message}")]
    MediaQuery { query: String, message: String },
    /// Change listener could not be attached.
    #[error("failed to watch `{query}`: {message}")]
    Listener { query: String, message: String },
    /// A DOM operation failed during setup.
    #[error(transparent)]
    Dom(#[from] DomError),
}
