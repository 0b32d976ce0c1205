//! Breakpoint groups and their media queries.
//!
//! Every distinct breakpoint gets exactly one [`BreakpointGroup`] holding one
//! query and the directives that share the breakpoint. Groups are derived
//! from the sorted directive list at construction and never rebuilt.

#[cfg(test)]
#[path = "query_test.rs"]
mod query_test;

use std::fmt;

use crate::config::Mode;
use crate::directive::Directive;

/// A `(min-width: Npx)` / `(max-width: Npx)` media condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MediaQuery {
    pub mode: Mode,
    pub breakpoint: u32,
}

impl MediaQuery {
    #[must_use]
    pub fn new(mode: Mode, breakpoint: u32) -> Self {
        Self { mode, breakpoint }
    }

    /// Evaluate against a viewport width in CSS pixels. Both bounds are inclusive.
    #[must_use]
    pub fn matches(&self, width: u32) -> bool {
        match self.mode {
            Mode::Min => width >= self.breakpoint,
            Mode::Max => width <= self.breakpoint,
        }
    }
}

impl fmt::Display for MediaQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}: {}px)", self.mode.feature(), self.breakpoint)
    }
}

/// Directives sharing one breakpoint, watched by one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakpointGroup {
    query: MediaQuery,
    members: Vec<usize>,
    matched: Option<bool>,
}

impl BreakpointGroup {
    /// The group's media query.
    #[must_use]
    pub fn query(&self) -> MediaQuery {
        self.query
    }

    /// Indices into the engine's directive list, in current pass order.
    #[must_use]
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Match state seen by the last handler call, `None` before the first.
    #[must_use]
    pub fn matched(&self) -> Option<bool> {
        self.matched
    }

    pub(crate) fn set_matched(&mut self, matches: bool) {
        self.matched = Some(matches);
    }

    /// Flip pass order so the next pass visits members last-in first-out.
    pub(crate) fn reverse(&mut self) {
        self.members.reverse();
    }
}

/// Build one group per distinct breakpoint, in first-encounter order.
/// Member order follows `directives`.
#[must_use]
pub fn group<N>(directives: &[Directive<N>], mode: Mode) -> Vec<BreakpointGroup> {
    let mut groups: Vec<BreakpointGroup> = Vec::new();
    for (index, directive) in directives.iter().enumerate() {
        match groups
            .iter_mut()
            .find(|group| group.query.breakpoint == directive.breakpoint)
        {
            Some(group) => group.members.push(index),
            None => groups.push(BreakpointGroup {
                query: MediaQuery::new(mode, directive.breakpoint),
                members: vec![index],
                matched: None,
            }),
        }
    }
    groups
}
