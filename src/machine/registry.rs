//! Per-model graph and style storage.

use crate::core::{ActiveState, ModelId};
use crate::graph::GraphModel;
use crate::style::{StyleClass, StyleTracker};
use indexmap::IndexMap;

/// Graph state owned by one registered model.
#[derive(Clone, Debug, PartialEq)]
pub struct RegistryEntry {
    graph: GraphModel,
    styles: StyleTracker,
    active: Option<ActiveState>,
}

impl RegistryEntry {
    fn new(graph: GraphModel, active: Option<ActiveState>) -> Self {
        let mut entry = Self {
            graph,
            styles: StyleTracker::new(),
            active,
        };
        entry.mark_active();
        entry
    }

    pub fn graph(&self) -> &GraphModel {
        &self.graph
    }

    pub fn styles(&self) -> &StyleTracker {
        &self.styles
    }

    /// Last state reported for the model.
    pub fn active(&self) -> Option<&ActiveState> {
        self.active.as_ref()
    }

    pub(crate) fn styles_mut(&mut self) -> &mut StyleTracker {
        &mut self.styles
    }

    /// Record a new current state and mark every active leaf.
    pub(crate) fn set_active(&mut self, active: Option<ActiveState>) {
        self.active = active;
        self.mark_active();
    }

    /// Swap in a freshly built graph with a clean overlay.
    pub(crate) fn rebuild(&mut self, graph: GraphModel) {
        self.graph = graph;
        self.styles.reset_styling();
        self.mark_active();
    }

    fn mark_active(&mut self) {
        if let Some(active) = &self.active {
            for state in active.flatten() {
                self.styles.set_node_style(state, StyleClass::Active);
            }
        }
    }
}

/// Maps model identities to their own graph and style overlay.
///
/// Entries are keyed by [`ModelId`], never by model contents, so two
/// structurally equal models are tracked independently.
#[derive(Clone, Debug, Default)]
pub struct GraphRegistry {
    entries: IndexMap<ModelId, RegistryEntry>,
}

impl GraphRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a graph for `id`, marking `active` right away.
    pub fn register(&mut self, id: ModelId, graph: GraphModel, active: Option<ActiveState>) {
        self.entries.insert(id, RegistryEntry::new(graph, active));
    }

    pub fn contains(&self, id: ModelId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn entry(&self, id: ModelId) -> Option<&RegistryEntry> {
        self.entries.get(&id)
    }

    pub(crate) fn entry_mut(&mut self, id: ModelId) -> Option<&mut RegistryEntry> {
        self.entries.get_mut(&id)
    }

    /// Registered ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = ModelId> + '_ {
        self.entries.keys().copied()
    }

    pub fn entries(&self) -> impl Iterator<Item = (ModelId, &RegistryEntry)> {
        self.entries.iter().map(|(id, entry)| (*id, entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Give every entry its own copy of `graph`.
    pub fn rebuild_all(&mut self, graph: &GraphModel) {
        for entry in self.entries.values_mut() {
            entry.rebuild(graph.clone());
        }
    }
}
