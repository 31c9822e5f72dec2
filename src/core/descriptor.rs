//! Flattened state and transition descriptors.

use serde::{Deserialize, Serialize};

/// A state with its qualified name, as produced by flattening the hierarchy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateDescriptor {
    /// Globally unique name: ancestor names joined with the separator.
    pub qualified_name: String,
    /// Name relative to the parent scope.
    pub name: String,
    pub label: Option<String>,
    pub tags: Vec<String>,
    pub on_enter: Vec<String>,
    pub on_exit: Vec<String>,
    pub timeout: Option<f64>,
    pub on_timeout: Vec<String>,
    pub is_parallel: bool,
    pub parent: Option<String>,
    /// Qualified names of the direct children, in declaration order.
    pub children: Vec<String>,
    /// Qualified name of the default child, if one is declared.
    pub initial: Option<String>,
}

impl StateDescriptor {
    /// Label override, or the unqualified name.
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    pub fn is_composite(&self) -> bool {
        !self.children.is_empty()
    }
}

/// A transition between qualified states.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionDescriptor {
    pub trigger: String,
    pub source: String,
    /// `None` for internal transitions.
    pub dest: Option<String>,
    pub conditions: Vec<String>,
    pub unless: Vec<String>,
    pub label: Option<String>,
    /// Generated `to_<state>` transition rather than an authored one.
    pub is_auto: bool,
    /// Synthetic default-child entry of a composite state.
    pub is_anchor: bool,
}

impl TransitionDescriptor {
    /// A synthetic entry edge from a composite's anchor to its default child.
    pub fn anchor(source: impl Into<String>, dest: impl Into<String>) -> Self {
        Self {
            trigger: String::new(),
            source: source.into(),
            dest: Some(dest.into()),
            conditions: Vec::new(),
            unless: Vec::new(),
            label: None,
            is_auto: false,
            is_anchor: true,
        }
    }

    pub fn is_internal(&self) -> bool {
        self.dest.is_none()
    }

    /// Where the edge ends when drawn; internal transitions loop on their source.
    pub fn target(&self) -> &str {
        self.dest.as_deref().unwrap_or(&self.source)
    }

    pub fn has_conditions(&self) -> bool {
        !self.conditions.is_empty() || !self.unless.is_empty()
    }
}
