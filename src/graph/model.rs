//! Backend-agnostic graph of states and transitions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// What a node stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A leaf state.
    State,
    /// A state with children, drawn as a container.
    Composite,
    /// The synthetic start point of a composite's default-entry edge.
    Anchor,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub name: String,
    pub label: String,
    pub kind: NodeKind,
    pub parent: Option<String>,
    pub is_parallel: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub trigger: String,
    pub source: String,
    pub dest: Option<String>,
    pub label: String,
    pub is_auto: bool,
    pub is_anchor: bool,
}

impl GraphEdge {
    pub fn is_internal(&self) -> bool {
        self.dest.is_none()
    }

    /// Drawn end of the edge; internal transitions loop on their source.
    pub fn target(&self) -> &str {
        self.dest.as_deref().unwrap_or(&self.source)
    }

    pub fn touches(&self, name: &str) -> bool {
        self.source == name || self.dest.as_deref() == Some(name)
    }
}

/// Nodes keyed by qualified name plus an ordered edge list.
///
/// Edges are never merged: several transitions between the same pair of
/// states stay distinct entries, in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphModel {
    nodes: IndexMap<String, GraphNode>,
    edges: Vec<GraphEdge>,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node unless one with the same name exists.
    /// Returns whether the node was inserted.
    pub fn add_node(&mut self, node: GraphNode) -> bool {
        if self.nodes.contains_key(&node.name) {
            return false;
        }
        self.nodes.insert(node.name.clone(), node);
        true
    }

    pub fn add_edge(&mut self, edge: GraphEdge) {
        self.edges.push(edge);
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node(&self, name: &str) -> Option<&GraphNode> {
        self.nodes.get(name)
    }

    pub fn contains_node(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges_between<'a>(
        &'a self,
        source: &'a str,
        dest: &'a str,
    ) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.edges
            .iter()
            .filter(move |edge| edge.source == source && edge.target() == dest)
    }

    pub fn children<'a>(&'a self, parent: &'a str) -> impl Iterator<Item = &'a GraphNode> + 'a {
        self.nodes
            .values()
            .filter(move |node| node.parent.as_deref() == Some(parent))
    }

    /// Parent chain of a node, nearest first.
    pub fn ancestors(&self, name: &str) -> Vec<&str> {
        let mut ancestors = Vec::new();
        let mut current = self.nodes.get(name).and_then(|node| node.parent.as_deref());
        while let Some(parent) = current {
            ancestors.push(parent);
            current = self.nodes.get(parent).and_then(|node| node.parent.as_deref());
        }
        ancestors
    }

    /// Whether any node is nested inside another.
    pub fn is_hierarchical(&self) -> bool {
        self.nodes.values().any(|node| node.parent.is_some())
    }
}
