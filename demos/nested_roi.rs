//! Nested Machine with Region of Interest
//!
//! This example builds a machine with a composite state and shows how the
//! region of interest keeps only the neighbourhood of the current state.
//!
//! Key concepts:
//! - Composite states rendered as clusters
//! - Default-entry anchors
//! - Full graph versus region of interest
//!
//! Run with: cargo run --example nested_roi

use stategraph::config::DiagramConfig;
use stategraph::core::{ActiveState, MachineMarkup, ObservedModel, StateMarkup, TransitionMarkup};
use stategraph::machine::{GraphMachine, GraphRequest};

struct Player {
    state: &'static str,
}

impl ObservedModel for Player {
    fn current_state(&self) -> Option<ActiveState> {
        Some(ActiveState::from(self.state))
    }
}

fn main() {
    println!("=== Nested Machine with Region of Interest ===\n");

    let markup = MachineMarkup {
        states: vec![
            StateMarkup::new("idle"),
            StateMarkup::new("playing")
                .with_children(["loading", "running", "paused"])
                .with_initial("loading")
                .with_transitions(vec![
                    TransitionMarkup::new("ready", "loading", "running"),
                    TransitionMarkup::new("pause", "running", "paused"),
                    TransitionMarkup::new("resume", "paused", "running"),
                ]),
            StateMarkup::new("done"),
        ],
        transitions: vec![
            TransitionMarkup::new("start", "idle", "playing"),
            TransitionMarkup::new("finish", "playing", "done"),
            TransitionMarkup::new("reset", "done", "idle"),
        ],
        auto_transitions: false,
        ..MachineMarkup::default()
    };

    let mut machine = GraphMachine::new(markup, DiagramConfig::default());
    let id = machine.add_model(&Player { state: "playing_paused" }).unwrap();

    let full = machine.get_graph(id, &GraphRequest::new()).unwrap();
    println!(
        "Full graph: {} nodes, {} edges",
        full.node_count(),
        full.edge_count()
    );
    println!("{full}");

    let request = GraphRequest::new().title("Around playing_paused").roi(true);
    let region = machine.get_graph(id, &request).unwrap();
    println!(
        "Region of interest: {} nodes, {} edges",
        region.node_count(),
        region.edge_count()
    );
    println!("{region}");

    println!("=== Example Complete ===");
}
