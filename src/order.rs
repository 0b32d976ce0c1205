//! Directive ordering.
//!
//! The sorted list fixes the order in which a group moves its elements in,
//! and (reversed after every pass) the order in which it moves them back.
//!
//! `Min` mode sorts ascending by breakpoint, then `first` before indices
//! before `last`. `Max` mode compares everything as equal, so the stable sort
//! keeps document order.

#[cfg(test)]
#[path = "order_test.rs"]
mod order_test;

use std::cmp::Ordering;

use crate::config::Mode;
use crate::directive::Directive;

/// Mode-aware comparison of two directives.
#[must_use]
pub fn compare<N>(a: &Directive<N>, b: &Directive<N>, mode: Mode) -> Ordering {
    match mode {
        Mode::Max => Ordering::Equal,
        Mode::Min => a
            .breakpoint
            .cmp(&b.breakpoint)
            .then_with(|| a.order.rank().cmp(&b.order.rank())),
    }
}

/// Stable in-place sort by [`compare`].
pub fn sort<N>(directives: &mut [Directive<N>], mode: Mode) {
    directives.sort_by(|a, b| compare(a, b, mode));
}
