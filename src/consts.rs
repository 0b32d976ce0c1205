//! Shared defaults for the reflow engine.

// ── Markup contract ─────────────────────────────────────────────

/// Attribute an element carries to opt into relocation.
pub const PLACEMENT_ATTR: &str = "data-da";

/// Class present on an element while it sits in its target container.
pub const MARKER_CLASS: &str = "_dynamic_adapt_";

/// Field separator inside the placement attribute value.
pub const FIELD_SEPARATOR: char = ',';

// ── Breakpoints ─────────────────────────────────────────────────

/// Breakpoint in CSS pixels used when a directive omits one.
pub const DEFAULT_BREAKPOINT: u32 = 767;

/// Order token that places an element before the target's children.
pub const ORDER_FIRST: &str = "first";

/// Order token that places an element after the target's children.
pub const ORDER_LAST: &str = "last";
