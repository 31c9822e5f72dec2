//! Graph machine facade.
//!
//! A [`GraphMachine`] owns the markup of one state machine and hands out
//! diagrams for every model registered with it. Each model gets its own
//! graph and style overlay; transitions driven through the machine update
//! that overlay so diagrams show where the model came from and where it is.
//!
//! # Example
//!
//! ```rust
//! use stategraph::config::DiagramConfig;
//! use stategraph::core::{ActiveState, MachineMarkup, ObservedModel, TransitionMarkup};
//! use stategraph::machine::{GraphMachine, GraphRequest};
//! use stategraph::style::StyleClass;
//!
//! struct Walker;
//!
//! impl ObservedModel for Walker {
//!     fn current_state(&self) -> Option<ActiveState> {
//!         Some(ActiveState::from("A"))
//!     }
//! }
//!
//! let mut markup = MachineMarkup::default();
//! for name in ["A", "B"] {
//!     markup.add_state(name);
//! }
//! markup.add_transition(TransitionMarkup::new("walk", "A", "B"));
//!
//! let mut machine = GraphMachine::new(markup, DiagramConfig::default());
//! let id = machine.add_model(&Walker).unwrap();
//!
//! machine
//!     .execute_transition(id, "A", Some("B"), |_| Some(ActiveState::from("B")))
//!     .unwrap();
//!
//! let diagram = machine.get_graph(id, &GraphRequest::new()).unwrap();
//! assert_eq!(diagram.edge_count(), 1);
//! assert_eq!(machine.styles(id).unwrap().node_class("B"), StyleClass::Active);
//! assert!(diagram.draw().contains("A -> B"));
//! ```

mod error;
mod registry;

pub use error::DiagramError;
pub use registry::{GraphRegistry, RegistryEntry};

use crate::checkpoint::{MachineSnapshot, ModelSnapshot};
use crate::config::DiagramConfig;
use crate::core::{
    ActiveState, MachineMarkup, ModelId, ObservedModel, StateMarkup, TransitionDescriptor,
    TransitionMarkup,
};
use crate::graph::{
    region_of_interest, FlatMachine, Flattener, GraphModel, GraphModelBuilder, MarkupIssue,
};
use crate::render::{Diagram, RenderBackend};
use crate::style::{Attributes, StyleSheet, StyleTracker};
use std::borrow::Cow;
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Options of a single graph query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphRequest {
    /// Overrides the configured title.
    pub title: Option<String>,
    /// Rebuild the model's graph from the current markup first.
    pub force_new: bool,
    /// Reduce the graph to the region around the current state.
    pub show_roi: bool,
}

impl GraphRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn force_new(mut self, force_new: bool) -> Self {
        self.force_new = force_new;
        self
    }

    pub fn roi(mut self, show_roi: bool) -> Self {
        self.show_roi = show_roi;
        self
    }
}

/// Diagram support for one state machine and the models it drives.
#[derive(Debug)]
pub struct GraphMachine {
    markup: MachineMarkup,
    config: DiagramConfig,
    backend: Arc<dyn RenderBackend>,
    sheet: Arc<StyleSheet>,
    flat: FlatMachine,
    graph: GraphModel,
    attributes: Attributes,
    registry: GraphRegistry,
}

impl GraphMachine {
    /// Create a machine; the render backend is resolved once, here.
    pub fn new(markup: MachineMarkup, config: DiagramConfig) -> Self {
        let backend = config.engine.resolve();
        tracing::debug!(engine = backend.name(), "Selected render backend");

        let sheet = Arc::new(config.style_sheet.clone());
        let mut machine = Self {
            markup,
            config,
            backend,
            sheet,
            flat: FlatMachine::default(),
            graph: GraphModel::new(),
            attributes: Attributes::new(),
            registry: GraphRegistry::new(),
        };
        machine.refresh();
        machine
    }

    pub fn markup(&self) -> &MachineMarkup {
        &self.markup
    }

    pub fn config(&self) -> &DiagramConfig {
        &self.config
    }

    pub fn backend(&self) -> &dyn RenderBackend {
        self.backend.as_ref()
    }

    /// Flattened view of the current markup.
    pub fn flat(&self) -> &FlatMachine {
        &self.flat
    }

    /// Markup problems skipped while building graphs.
    pub fn issues(&self) -> &[MarkupIssue] {
        &self.flat.issues
    }

    pub fn registry(&self) -> &GraphRegistry {
        &self.registry
    }

    pub fn models(&self) -> impl Iterator<Item = ModelId> + '_ {
        self.registry.ids()
    }

    /// Register a model and build its graph.
    ///
    /// Fails with [`DiagramError::ModelBindingConflict`] when the model
    /// already provides the configured binding name; nothing is registered
    /// in that case.
    pub fn add_model(&mut self, model: &dyn ObservedModel) -> Result<ModelId, DiagramError> {
        if model.provides(&self.config.binding_name) {
            return Err(DiagramError::ModelBindingConflict {
                name: self.config.binding_name.clone(),
            });
        }

        let id = ModelId::new();
        let active = model.current_state();
        if active.is_none() {
            tracing::info!(
                model = %id,
                reason = %DiagramError::StyleTrackingUnavailable(id),
                "Skipping initial active styling"
            );
        }
        self.registry.register(id, self.graph.clone(), active);
        Ok(id)
    }

    /// Register several models; stops at the first conflict.
    pub fn add_models<'a, I>(&mut self, models: I) -> Result<Vec<ModelId>, DiagramError>
    where
        I: IntoIterator<Item = &'a dyn ObservedModel>,
    {
        models.into_iter().map(|model| self.add_model(model)).collect()
    }

    /// Drawable graph of a registered model.
    pub fn get_graph(&mut self, id: ModelId, request: &GraphRequest) -> Result<Diagram, DiagramError> {
        if request.force_new {
            let graph = self.graph.clone();
            self.registry
                .entry_mut(id)
                .ok_or(DiagramError::UnknownModel(id))?
                .rebuild(graph);
            tracing::debug!(model = %id, "Rebuilt model graph");
        }

        let entry = self.registry.entry(id).ok_or(DiagramError::UnknownModel(id))?;
        let graph = if request.show_roi {
            match entry.active() {
                Some(active) => Cow::Owned(region_of_interest(entry.graph(), &active.flatten())),
                None => {
                    tracing::info!(
                        model = %id,
                        reason = %DiagramError::StyleTrackingUnavailable(id),
                        "No current state to focus on, returning the full graph"
                    );
                    Cow::Borrowed(entry.graph())
                }
            }
        } else {
            Cow::Borrowed(entry.graph())
        };

        let title = request.title.as_deref().unwrap_or(&self.config.title);
        Ok(self.draw(&graph, title, Some(entry.styles())))
    }

    /// Graph of the first registered model.
    ///
    /// Without any registered model the unstyled machine graph is returned.
    pub fn get_combined_graph(&mut self, request: &GraphRequest) -> Result<Diagram, DiagramError> {
        tracing::info!("Returning the graph of the first registered model as the combined graph");
        let first = self.registry.ids().next();
        match first {
            Some(id) => self.get_graph(id, request),
            None => {
                let title = request.title.as_deref().unwrap_or(&self.config.title);
                Ok(self.draw(&self.graph, title, None))
            }
        }
    }

    fn draw(&self, graph: &GraphModel, title: &str, styles: Option<&StyleTracker>) -> Diagram {
        let mut drawing = self.backend.generate(graph, title, &self.attributes);
        if let Some(styles) = styles {
            for (state, class) in styles.node_overrides() {
                self.backend.set_node_style(&mut drawing, state, class);
            }
            for (source, dest, class) in styles.edge_overrides() {
                self.backend.set_edge_style(&mut drawing, source, dest, class);
            }
        }
        Diagram::new(
            drawing,
            Arc::clone(&self.backend),
            Arc::clone(&self.sheet),
            self.flat.issues.clone(),
        )
    }

    pub fn add_state(&mut self, state: impl Into<StateMarkup>) {
        self.markup.add_state(state);
        self.rebuild_all();
    }

    pub fn add_states<I, S>(&mut self, states: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<StateMarkup>,
    {
        for state in states {
            self.markup.add_state(state);
        }
        self.rebuild_all();
    }

    pub fn add_transition(&mut self, transition: TransitionMarkup) {
        self.markup.add_transition(transition);
        self.rebuild_all();
    }

    pub fn add_transitions(&mut self, transitions: impl IntoIterator<Item = TransitionMarkup>) {
        for transition in transitions {
            self.markup.add_transition(transition);
        }
        self.rebuild_all();
    }

    /// Reset the model's overlay and mark the edge being traversed.
    ///
    /// Runs before the state changes, so queries made while it changes see
    /// the previous transition but no active state yet.
    pub fn before_state_change(
        &mut self,
        id: ModelId,
        source: &str,
        dest: Option<&str>,
    ) -> Result<(), DiagramError> {
        let styles = self
            .registry
            .entry_mut(id)
            .ok_or(DiagramError::UnknownModel(id))?
            .styles_mut();
        styles.reset_styling();
        styles.set_previous_transition(source, dest);
        Ok(())
    }

    /// Record the model's new state and mark it active.
    pub fn after_state_change(
        &mut self,
        id: ModelId,
        active: Option<ActiveState>,
    ) -> Result<(), DiagramError> {
        if active.is_none() {
            tracing::info!(
                model = %id,
                reason = %DiagramError::StyleTrackingUnavailable(id),
                "Skipping active styling"
            );
        }
        self.registry
            .entry_mut(id)
            .ok_or(DiagramError::UnknownModel(id))?
            .set_active(active);
        Ok(())
    }

    /// Run `change` between the before and after hooks.
    ///
    /// `change` performs the actual state change and returns the model's
    /// new state. It may query graphs through the machine it receives.
    pub fn execute_transition<F>(
        &mut self,
        id: ModelId,
        source: &str,
        dest: Option<&str>,
        change: F,
    ) -> Result<(), DiagramError>
    where
        F: FnOnce(&mut Self) -> Option<ActiveState>,
    {
        self.before_state_change(id, source, dest)?;
        let active = change(self);
        self.after_state_change(id, active)
    }

    /// Transitions fired by `trigger` while in `state`.
    ///
    /// Transitions declared on the state come first, then those of its
    /// ancestors, nearest first.
    pub fn transitions_from(&self, state: &str, trigger: &str) -> Vec<&TransitionDescriptor> {
        let mut scope = Some(state);
        let mut found = Vec::new();
        while let Some(name) = scope {
            found.extend(
                self.flat
                    .transitions
                    .iter()
                    .filter(|t| !t.is_anchor && t.trigger == trigger && t.source == name),
            );
            scope = self.flat.state(name).and_then(|s| s.parent.as_deref());
        }
        found
    }

    /// Every markup issue, accumulated.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<MarkupIssue>> {
        self.flat.validation()
    }

    pub fn styles(&self, id: ModelId) -> Result<&StyleTracker, DiagramError> {
        self.registry
            .entry(id)
            .map(RegistryEntry::styles)
            .ok_or(DiagramError::UnknownModel(id))
    }

    /// Last state reported for a model.
    pub fn active_state(&self, id: ModelId) -> Result<&ActiveState, DiagramError> {
        self.registry
            .entry(id)
            .ok_or(DiagramError::UnknownModel(id))?
            .active()
            .ok_or(DiagramError::StyleTrackingUnavailable(id))
    }

    pub fn snapshot(&self) -> MachineSnapshot {
        let models = self
            .registry
            .entries()
            .map(|(id, entry)| ModelSnapshot {
                id,
                state: entry.active().cloned(),
            })
            .collect();
        MachineSnapshot::new(self.markup.clone(), self.config.clone(), models)
    }

    /// Recreate a machine from a snapshot, rebuilding every graph.
    pub fn restore(snapshot: MachineSnapshot) -> Result<Self, DiagramError> {
        snapshot.check()?;
        let mut machine = Self::new(snapshot.markup, snapshot.config);
        for model in snapshot.models {
            machine
                .registry
                .register(model.id, machine.graph.clone(), model.state);
        }
        Ok(machine)
    }

    fn refresh(&mut self) {
        self.flat = Flattener::new(&self.config.separator).flatten(&self.markup);
        self.graph = GraphModelBuilder::new(self.config.display_options()).build(&self.flat);
        self.attributes = self
            .config
            .graph_attributes(self.markup.has_nested_states());
    }

    fn rebuild_all(&mut self) {
        self.refresh();
        self.registry.rebuild_all(&self.graph);
        tracing::debug!(
            models = self.registry.len(),
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            "Rebuilt all model graphs"
        );
    }
}
