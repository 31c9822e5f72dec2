//! Diagram configuration.
//!
//! A [`DiagramConfig`] carries every knob a [`GraphMachine`] reads: the
//! title, which details end up in labels, the render engine, the hierarchy
//! separator and the visual attribute tables. It can be built fluently with
//! [`DiagramConfigBuilder`] or loaded from JSON; missing fields keep their
//! defaults.
//!
//! [`GraphMachine`]: crate::machine::GraphMachine

mod builder;

pub use builder::DiagramConfigBuilder;

use crate::graph::DisplayOptions;
use crate::machine::DiagramError;
use crate::render::Engine;
use crate::style::{Attributes, StyleSheet};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "State Machine";
pub const DEFAULT_SEPARATOR: &str = "_";
pub const DEFAULT_BINDING_NAME: &str = "get_graph";

fn attributes(pairs: &[(&str, &str)]) -> Attributes {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// Settings shared by every graph a machine produces.
///
/// # Example
///
/// ```rust
/// use stategraph::config::DiagramConfig;
///
/// let config = DiagramConfig::from_json(r#"{"title": "Traffic", "show_conditions": true}"#).unwrap();
///
/// assert_eq!(config.title, "Traffic");
/// assert!(config.display_options().show_conditions);
/// assert_eq!(config.separator, "_");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    pub title: String,
    pub show_conditions: bool,
    pub show_state_attributes: bool,
    pub show_auto_transitions: bool,
    pub engine: Engine,
    /// Joins parent and child names into qualified state names.
    pub separator: String,
    /// Capability a model must not already provide to be registered.
    pub binding_name: String,
    pub machine_attributes: Attributes,
    /// Merged over `machine_attributes` for machines with nested states.
    pub hierarchical_attributes: Attributes,
    pub style_sheet: StyleSheet,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            show_conditions: false,
            show_state_attributes: false,
            show_auto_transitions: false,
            engine: Engine::default(),
            separator: DEFAULT_SEPARATOR.to_string(),
            binding_name: DEFAULT_BINDING_NAME.to_string(),
            machine_attributes: attributes(&[
                ("directed", "true"),
                ("strict", "false"),
                ("rankdir", "LR"),
            ]),
            hierarchical_attributes: attributes(&[
                ("rankdir", "TB"),
                ("rank", "source"),
                ("nodesep", "1.5"),
                ("compound", "true"),
            ]),
            style_sheet: StyleSheet::default(),
        }
    }
}

impl DiagramConfig {
    pub fn builder() -> DiagramConfigBuilder {
        DiagramConfigBuilder::new()
    }

    pub fn from_json(json: &str) -> Result<Self, DiagramError> {
        serde_json::from_str(json).map_err(|err| DiagramError::InvalidConfig(err.to_string()))
    }

    pub fn to_json(&self) -> Result<String, DiagramError> {
        serde_json::to_string_pretty(self).map_err(|err| DiagramError::InvalidConfig(err.to_string()))
    }

    pub fn display_options(&self) -> DisplayOptions {
        DisplayOptions {
            show_conditions: self.show_conditions,
            show_state_attributes: self.show_state_attributes,
            show_auto_transitions: self.show_auto_transitions,
        }
    }

    /// Graph-level attributes for a flat or hierarchical machine.
    pub fn graph_attributes(&self, hierarchical: bool) -> Attributes {
        let mut merged = self.machine_attributes.clone();
        if hierarchical {
            merged.extend(
                self.hierarchical_attributes
                    .iter()
                    .map(|(key, value)| (key.clone(), value.clone())),
            );
        }
        merged
    }
}
