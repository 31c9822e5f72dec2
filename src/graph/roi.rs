//! Region-of-interest reduction of a graph model.
//!
//! The region around the active states is their induced neighbourhood:
//! edges starting or ending at an active state (or at a composite that
//! contains one), the nodes at the other end of those edges, and the
//! default-entry anchors of active composites. Nothing is followed
//! transitively.

use crate::graph::model::{GraphModel, NodeKind};
use indexmap::IndexSet;

/// Reduce `graph` to the region around `active`.
///
/// The input graph is never modified; a fresh model is returned. Unknown
/// active names are skipped.
///
/// # Example
///
/// ```rust
/// use stategraph::core::{MachineMarkup, TransitionMarkup};
/// use stategraph::graph::{region_of_interest, Flattener, GraphModelBuilder};
///
/// let mut markup = MachineMarkup::default();
/// markup.auto_transitions = false;
/// for name in ["A", "B", "C", "F"] {
///     markup.add_state(name);
/// }
/// markup.add_transition(TransitionMarkup::new("to_state_A", "B", "A"));
/// markup.add_transition(TransitionMarkup::new("to_state_C", "B", "C"));
/// markup.add_transition(TransitionMarkup::new("to_state_F", "B", "F"));
///
/// let graph = GraphModelBuilder::default().build(&Flattener::new("_").flatten(&markup));
/// let region = region_of_interest(&graph, &["B"]);
///
/// assert_eq!(region.edge_count(), 3);
/// assert_eq!(region.node_count(), 4);
/// assert_eq!(graph.edge_count(), 3);
/// ```
pub fn region_of_interest<S: AsRef<str>>(graph: &GraphModel, active: &[S]) -> GraphModel {
    let mut focus: IndexSet<&str> = IndexSet::new();
    for name in active.iter().map(AsRef::as_ref) {
        if !graph.contains_node(name) {
            tracing::warn!(state = %name, "Active state is not part of the graph");
            continue;
        }
        focus.insert(name);
        focus.extend(graph.ancestors(name));
    }

    let mut keep_nodes: IndexSet<&str> = focus.clone();
    let mut region = GraphModel::new();
    let mut kept_edges = Vec::new();

    for edge in graph.edges() {
        let relevant = if edge.is_anchor {
            graph
                .node(&edge.source)
                .and_then(|anchor| anchor.parent.as_deref())
                .is_some_and(|owner| focus.contains(owner))
                || edge.dest.as_deref().is_some_and(|dest| focus.contains(dest))
        } else {
            focus.iter().any(|name| edge.touches(name))
        };
        if relevant {
            keep_nodes.insert(edge.source.as_str());
            keep_nodes.insert(edge.target());
            kept_edges.push(edge.clone());
        }
    }

    let structural: Vec<&str> = keep_nodes
        .iter()
        .flat_map(|name| graph.ancestors(name))
        .collect();
    keep_nodes.extend(structural);

    for node in graph.nodes() {
        if keep_nodes.contains(node.name.as_str()) {
            region.add_node(node.clone());
        }
    }
    for edge in kept_edges {
        region.add_edge(edge);
    }

    tracing::debug!(
        focus = focus.len(),
        nodes = region.node_count(),
        edges = region.edge_count(),
        "Computed region of interest"
    );
    region
}

/// Names of the non-anchor nodes in a region, in graph order.
pub fn state_names(graph: &GraphModel) -> Vec<&str> {
    graph
        .nodes()
        .filter(|node| node.kind != NodeKind::Anchor)
        .map(|node| node.name.as_str())
        .collect()
}
