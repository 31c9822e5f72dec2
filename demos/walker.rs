//! Walker Diagram
//!
//! This example drives a flat state machine through a few transitions and
//! prints the diagram after each step.
//!
//! Key concepts:
//! - Building markup with the fluent builders
//! - Registering a model and tracking its state
//! - Active and previous styling in the rendered graph
//!
//! Run with: cargo run --example walker

use stategraph::builder::{guarded_transition, MarkupBuilder, TransitionBuilder};
use stategraph::config::DiagramConfig;
use stategraph::core::{ActiveState, ObservedModel};
use stategraph::machine::{GraphMachine, GraphRequest};

struct Walker {
    state: &'static str,
}

impl ObservedModel for Walker {
    fn current_state(&self) -> Option<ActiveState> {
        Some(ActiveState::from(self.state))
    }
}

fn main() {
    println!("=== Walker Diagram ===\n");

    let markup = MarkupBuilder::new()
        .name("walker")
        .states(["standing", "walking", "running"])
        .initial("standing")
        .transition(TransitionBuilder::new().trigger("walk").from("standing").to("walking"))
        .unwrap()
        .add_transition(guarded_transition("run", "walking", "running", ["is_rested"]))
        .transition(
            TransitionBuilder::new()
                .trigger("stop")
                .from("walking")
                .from("running")
                .to("standing"),
        )
        .unwrap()
        .auto_transitions(false)
        .build()
        .unwrap();

    let config = DiagramConfig::builder()
        .title("Walker")
        .show_conditions(true)
        .build();
    let mut machine = GraphMachine::new(markup, config);

    let mut walker = Walker { state: "standing" };
    let id = machine.add_model(&walker).unwrap();

    for (source, dest) in [("standing", "walking"), ("walking", "running")] {
        machine
            .execute_transition(id, source, Some(dest), |_| {
                walker.state = dest;
                walker.current_state()
            })
            .unwrap();

        let diagram = machine.get_graph(id, &GraphRequest::new()).unwrap();
        println!("After {source} -> {dest}:");
        println!("{diagram}");
    }

    println!("=== Example Complete ===");
}
