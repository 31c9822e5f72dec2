//! Observed models and their current state.
//!
//! The graph layer never runs a machine. It observes models that some engine
//! drives and reads their current state, which may be a single state name or
//! a nested list of names when the machine has parallel regions.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Current state of an observed model.
///
/// # Example
///
/// ```rust
/// use stategraph::core::ActiveState;
///
/// let state = ActiveState::from(vec![
///     ActiveState::from("P_1_a"),
///     ActiveState::from(vec!["P_2_x", "P_2_y"]),
/// ]);
///
/// assert_eq!(state.flatten(), vec!["P_1_a", "P_2_x", "P_2_y"]);
/// assert!(state.contains("P_2_y"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActiveState {
    Single(String),
    Many(Vec<ActiveState>),
}

impl ActiveState {
    /// All leaf names in declaration order, however deeply they are nested.
    pub fn flatten(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut stack = vec![self];
        while let Some(item) = stack.pop() {
            match item {
                Self::Single(name) => names.push(name.as_str()),
                Self::Many(items) => stack.extend(items.iter().rev()),
            }
        }
        names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.flatten().contains(&name)
    }
}

impl From<&str> for ActiveState {
    fn from(name: &str) -> Self {
        Self::Single(name.to_string())
    }
}

impl From<String> for ActiveState {
    fn from(name: String) -> Self {
        Self::Single(name)
    }
}

impl<T: Into<ActiveState>> From<Vec<T>> for ActiveState {
    fn from(items: Vec<T>) -> Self {
        Self::Many(items.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for ActiveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.flatten().join(", "))
    }
}

/// Identity of a registered model.
///
/// Graphs are tracked per registration, never per model value: two models
/// that compare equal still receive distinct ids and distinct overlays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(Uuid);

impl ModelId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ModelId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A model whose state is driven by a machine and shown in a diagram.
///
/// # Example
///
/// ```rust
/// use stategraph::core::{ActiveState, ObservedModel};
///
/// struct Door {
///     state: String,
/// }
///
/// impl ObservedModel for Door {
///     fn current_state(&self) -> Option<ActiveState> {
///         Some(ActiveState::from(self.state.as_str()))
///     }
/// }
///
/// let door = Door { state: "closed".to_string() };
/// assert_eq!(door.current_state(), Some(ActiveState::from("closed")));
/// assert!(!door.provides("get_graph"));
/// ```
pub trait ObservedModel {
    /// The model's current state, or `None` when it does not expose one.
    fn current_state(&self) -> Option<ActiveState>;

    /// Whether the model already exposes a capability under `name`.
    ///
    /// Registration refuses to bind graph retrieval over an existing
    /// capability. Default implementation returns `false`.
    fn provides(&self, name: &str) -> bool {
        let _ = name;
        false
    }
}
