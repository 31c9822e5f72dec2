//! Style classes and the per-model overlay that assigns them.
//!
//! A model's overlay is rewritten around every transition: it is reset,
//! the traversed edge is marked `previous`, and once the state has changed
//! the new state(s) are marked `active`.

mod sheet;
mod tracker;

pub use sheet::{Attributes, StyleSheet};
pub use tracker::StyleTracker;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Named visual treatment of a node or edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleClass {
    #[default]
    Default,
    Active,
    Previous,
    Parallel,
    Inactive,
}

impl StyleClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Active => "active",
            Self::Previous => "previous",
            Self::Parallel => "parallel",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for StyleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
