//! Per-model style overlay.

use crate::style::StyleClass;
use indexmap::IndexMap;

/// Style overrides of one observed model.
///
/// Unset nodes and edges keep their baseline class. Every registered model
/// owns its own tracker, so marking a node in one overlay never shows up in
/// another.
///
/// # Example
///
/// ```rust
/// use stategraph::style::{StyleClass, StyleTracker};
///
/// let mut styles = StyleTracker::new();
/// styles.set_previous_transition("A", Some("B"));
/// styles.set_node_style("B", StyleClass::Active);
///
/// assert_eq!(styles.node_style("A"), Some(StyleClass::Previous));
/// assert_eq!(styles.node_style("B"), Some(StyleClass::Active));
/// assert_eq!(styles.edge_style("A", "B"), Some(StyleClass::Previous));
///
/// styles.reset_styling();
/// assert!(styles.is_empty());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleTracker {
    nodes: IndexMap<String, StyleClass>,
    edges: IndexMap<(String, String), StyleClass>,
}

impl StyleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every override; safe to call repeatedly.
    pub fn reset_styling(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    /// Record how the model reached its new state.
    ///
    /// The edge and both of its endpoints are marked `previous`. An internal
    /// transition (`dest: None`) marks the source's self-loop.
    pub fn set_previous_transition(&mut self, source: &str, dest: Option<&str>) {
        let dest = dest.unwrap_or(source);
        self.set_edge_style(source, dest, StyleClass::Previous);
        self.set_node_style(source, StyleClass::Previous);
        self.set_node_style(dest, StyleClass::Previous);
    }

    pub fn set_node_style(&mut self, state: &str, class: StyleClass) {
        self.nodes.insert(state.to_string(), class);
    }

    pub fn set_edge_style(&mut self, source: &str, dest: &str, class: StyleClass) {
        self.edges
            .insert((source.to_string(), dest.to_string()), class);
    }

    pub fn node_style(&self, state: &str) -> Option<StyleClass> {
        self.nodes.get(state).copied()
    }

    pub fn edge_style(&self, source: &str, dest: &str) -> Option<StyleClass> {
        self.edges
            .get(&(source.to_string(), dest.to_string()))
            .copied()
    }

    /// Override of `state`, falling back to the default class.
    pub fn node_class(&self, state: &str) -> StyleClass {
        self.node_style(state).unwrap_or_default()
    }

    pub fn node_overrides(&self) -> impl Iterator<Item = (&str, StyleClass)> {
        self.nodes.iter().map(|(name, class)| (name.as_str(), *class))
    }

    pub fn edge_overrides(&self) -> impl Iterator<Item = (&str, &str, StyleClass)> {
        self.edges
            .iter()
            .map(|((source, dest), class)| (source.as_str(), dest.as_str(), *class))
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}
