//! Engine configuration: comparison mode and markup names.
//!
//! `Mode` is the single construction parameter the markup contract exposes.
//! The remaining fields default to the names used in page markup and only
//! change when a host page renames its attribute or marker class.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_BREAKPOINT, MARKER_CLASS, PLACEMENT_ATTR};
use crate::error::AdaptError;

/// Whether a breakpoint is a lower or an upper bound on viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// `(min-width: Npx)`: the condition holds at or above the breakpoint.
    Min,
    /// `(max-width: Npx)`: the condition holds at or below the breakpoint.
    #[default]
    Max,
}

impl Mode {
    /// The media feature name for this mode.
    #[must_use]
    pub fn feature(self) -> &'static str {
        match self {
            Self::Min => "min-width",
            Self::Max => "max-width",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Min => f.write_str("min"),
            Self::Max => f.write_str("max"),
        }
    }
}

impl FromStr for Mode {
    type Err = AdaptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            _ => Err(AdaptError::InvalidMode(s.to_owned())),
        }
    }
}

/// Reflow engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptConfig {
    /// Comparison mode shared by every breakpoint.
    pub mode: Mode,
    /// Name of the placement attribute scanned at construction.
    pub attribute: String,
    /// Class toggled on relocated elements.
    pub marker_class: String,
    /// Breakpoint applied when a directive omits one.
    pub default_breakpoint: u32,
}

impl AdaptConfig {
    /// Default configuration with the given mode.
    #[must_use]
    pub fn with_mode(mode: Mode) -> Self {
        Self { mode, ..Self::default() }
    }
}

impl Default for AdaptConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            attribute: PLACEMENT_ATTR.to_owned(),
            marker_class: MARKER_CLASS.to_owned(),
            default_breakpoint: DEFAULT_BREAKPOINT,
        }
    }
}
