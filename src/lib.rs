//! Stategraph: diagrams for hierarchical state machines
//!
//! Stategraph turns the markup of a (possibly nested) state machine into a
//! graph model and keeps per-model styling in sync as models change state.
//! The graph pipeline is pure: markup is flattened, turned into a labelled
//! graph and optionally reduced to the region around the current state.
//! Only the style overlay of each registered model is mutable.
//!
//! # Core Concepts
//!
//! - **Markup**: Serializable description of states and transitions
//! - **Graph model**: Nodes and edges built from flattened markup
//! - **Style tracking**: Per-model `active`/`previous` overlay
//! - **Backends**: DOT and Mermaid output for the styled graph
//!
//! # Example
//!
//! ```rust
//! use stategraph::config::DiagramConfig;
//! use stategraph::core::{ActiveState, MachineMarkup, ObservedModel};
//! use stategraph::machine::{GraphMachine, GraphRequest};
//! use stategraph::transitions;
//!
//! struct Runner {
//!     state: &'static str,
//! }
//!
//! impl ObservedModel for Runner {
//!     fn current_state(&self) -> Option<ActiveState> {
//!         Some(ActiveState::from(self.state))
//!     }
//! }
//!
//! let mut markup = MachineMarkup::default();
//! for name in ["A", "B", "C", "D"] {
//!     markup.add_state(name);
//! }
//! markup.transitions = transitions! {
//!     walk: "A" => "B",
//!     run: "B" => "C",
//!     sprint: "C" => "D",
//!     sprint: "C" => "B",
//! };
//!
//! let mut machine = GraphMachine::new(markup, DiagramConfig::default());
//! let runner = machine.add_model(&Runner { state: "A" }).unwrap();
//!
//! let diagram = machine.get_graph(runner, &GraphRequest::new()).unwrap();
//! assert_eq!(diagram.node_count(), 4);
//! assert_eq!(diagram.edge_count(), 4);
//! ```

pub mod builder;
pub mod checkpoint;
pub mod config;
pub mod core;
pub mod graph;
pub mod machine;
pub mod render;
pub mod style;

// Re-export commonly used types
pub use crate::config::DiagramConfig;
pub use crate::core::{ActiveState, MachineMarkup, ModelId, ObservedModel, StateMarkup, TransitionMarkup};
pub use crate::machine::{DiagramError, GraphMachine, GraphRequest};
pub use crate::render::Diagram;
pub use crate::style::StyleClass;
