//! Dynamic adapt: breakpoint-driven element relocation for landing pages.
//!
//! Elements opt in with a `data-da="selector[, breakpoint][, order]"`
//! attribute. While the viewport satisfies the breakpoint's media condition
//! the element lives inside the target container; when it stops, the element
//! returns to the exact position it came from. The engine is compiled to
//! WebAssembly for the page (feature `browser`) and runs natively over an
//! in-memory tree for tests and the preview CLI.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Testable [`engine::EngineCore`]: move executor and change handlers |
//! | [`directive`] | Placement attribute parsing and [`directive::Directive`] |
//! | [`order`] | Mode-aware directive sort |
//! | [`query`] | Breakpoint groups and media queries |
//! | [`dom`] | The [`dom::Dom`] backend trait |
//! | [`tree`] | In-memory [`tree::DocTree`] backend and JSON fixtures |
//! | [`selector`] | Selector engine used by [`tree::DocTree`] |
//! | [`config`] | [`config::AdaptConfig`] and [`config::Mode`] |
//! | [`error`] | Error types |
//! | [`consts`] | Markup names and defaults |
//! | `web` | `web-sys` backend and `useDynamicAdapt` entry point (feature `browser`) |

pub mod config;
pub mod consts;
pub mod directive;
pub mod dom;
pub mod engine;
pub mod error;
pub mod order;
pub mod query;
pub mod selector;
pub mod tree;
#[cfg(feature = "browser")]
pub mod web;

pub use config::{AdaptConfig, Mode};
pub use directive::{Directive, Order};
pub use dom::Dom;
pub use engine::{EngineCore, Placement, Transition};
pub use error::{AdaptError, DomError};
pub use tree::{DocTree, NodeId, NodeSpec};
