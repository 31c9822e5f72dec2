//! Turns flattened descriptors into a labelled graph model.

use crate::core::{StateDescriptor, TransitionDescriptor};
use crate::graph::flatten::{FlatMachine, ANCHOR_SUFFIX};
use crate::graph::model::{GraphEdge, GraphModel, GraphNode, NodeKind};

/// Which optional details end up in labels and edges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DisplayOptions {
    pub show_conditions: bool,
    pub show_state_attributes: bool,
    pub show_auto_transitions: bool,
}

/// Pure conversion from a [`FlatMachine`] to a [`GraphModel`].
///
/// # Example
///
/// ```rust
/// use stategraph::core::{MachineMarkup, TransitionMarkup};
/// use stategraph::graph::{DisplayOptions, Flattener, GraphModelBuilder};
///
/// let mut markup = MachineMarkup::default();
/// markup.auto_transitions = false;
/// markup.add_state("A");
/// markup.add_state("B");
/// markup.add_transition(TransitionMarkup::new("go", "A", "B").with_conditions(["ready"]));
///
/// let flat = Flattener::new("_").flatten(&markup);
/// let options = DisplayOptions { show_conditions: true, ..DisplayOptions::default() };
/// let graph = GraphModelBuilder::new(options).build(&flat);
///
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edges()[0].label, "go [ready]");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct GraphModelBuilder {
    options: DisplayOptions,
}

impl GraphModelBuilder {
    pub fn new(options: DisplayOptions) -> Self {
        Self { options }
    }

    pub fn build(&self, flat: &FlatMachine) -> GraphModel {
        let mut graph = GraphModel::new();

        for state in &flat.states {
            graph.add_node(GraphNode {
                name: state.qualified_name.clone(),
                label: self.state_label(state),
                kind: if state.is_composite() {
                    NodeKind::Composite
                } else {
                    NodeKind::State
                },
                parent: state.parent.clone(),
                is_parallel: state.is_parallel,
            });
        }

        for transition in &flat.transitions {
            if transition.is_auto && !self.options.show_auto_transitions {
                continue;
            }
            if transition.is_anchor {
                let owner = transition
                    .source
                    .strip_suffix(ANCHOR_SUFFIX)
                    .map(str::to_string);
                graph.add_node(GraphNode {
                    name: transition.source.clone(),
                    label: String::new(),
                    kind: NodeKind::Anchor,
                    parent: owner,
                    is_parallel: false,
                });
            }
            graph.add_edge(GraphEdge {
                trigger: transition.trigger.clone(),
                source: transition.source.clone(),
                dest: transition.dest.clone(),
                label: self.transition_label(transition),
                is_auto: transition.is_auto,
                is_anchor: transition.is_anchor,
            });
        }

        graph
    }

    /// Display label of a state, one line per attribute group.
    pub fn state_label(&self, state: &StateDescriptor) -> String {
        let mut lines = vec![state.display_name().to_string()];
        if !self.options.show_state_attributes {
            return lines.remove(0);
        }

        if !state.tags.is_empty() {
            lines[0] = format!("{} [{}]", lines[0], state.tags.join(", "));
        }
        for (heading, hooks) in [("enter", &state.on_enter), ("exit", &state.on_exit)] {
            if !hooks.is_empty() {
                lines.push(format!("- {heading}:"));
                lines.extend(hooks.iter().map(|hook| format!("  + {hook}")));
            }
        }
        if let Some(timeout) = state.timeout {
            lines.push(format!(
                "- timeout({timeout}s) -> ({})",
                state.on_timeout.join(", ")
            ));
        }
        lines.join("\n")
    }

    pub fn transition_label(&self, transition: &TransitionDescriptor) -> String {
        let mut label = transition
            .label
            .clone()
            .unwrap_or_else(|| transition.trigger.clone());
        if transition.is_internal() {
            label.push_str(" [internal]");
        }
        if self.options.show_conditions && transition.has_conditions() {
            let terms: Vec<String> = transition
                .conditions
                .iter()
                .cloned()
                .chain(transition.unless.iter().map(|name| format!("!{name}")))
                .collect();
            label = format!("{label} [{}]", terms.join(" & "));
        }
        label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MachineMarkup, StateMarkup, TransitionMarkup};
    use crate::graph::flatten::Flattener;

    fn flat(markup: &MachineMarkup) -> FlatMachine {
        Flattener::new("_").flatten(markup)
    }

    fn walk_run_sprint() -> MachineMarkup {
        MachineMarkup {
            states: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            transitions: vec![
                TransitionMarkup::new("walk", "A", "B"),
                TransitionMarkup::new("run", "B", "C"),
                TransitionMarkup::new("sprint", "C", "D").with_conditions(["is_fast"]),
                TransitionMarkup::new("sprint", "C", "B"),
            ],
            auto_transitions: false,
            ..MachineMarkup::default()
        }
    }

    #[test]
    fn every_state_and_transition_is_drawn() {
        let graph = GraphModelBuilder::default().build(&flat(&walk_run_sprint()));

        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 4);
        let labels: Vec<&str> = graph.edges().iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["walk", "run", "sprint", "sprint"]);
    }

    #[test]
    fn conditions_render_as_expression() {
        let options = DisplayOptions {
            show_conditions: true,
            ..DisplayOptions::default()
        };
        let markup = MachineMarkup {
            states: vec!["A".into(), "B".into()],
            transitions: vec![TransitionMarkup::new("go", "A", "B")
                .with_conditions(["ready", "armed"])
                .with_unless(["locked"])],
            auto_transitions: false,
            ..MachineMarkup::default()
        };
        let graph = GraphModelBuilder::new(options).build(&flat(&markup));

        assert_eq!(graph.edges()[0].label, "go [ready & armed & !locked]");
    }

    #[test]
    fn conditions_hidden_by_default() {
        let graph = GraphModelBuilder::default().build(&flat(&walk_run_sprint()));
        assert_eq!(graph.edges()[2].label, "sprint");
    }

    #[test]
    fn internal_transitions_are_marked() {
        let markup = MachineMarkup {
            states: vec!["A".into(), "B".into()],
            transitions: vec![
                TransitionMarkup::new("go", "A", "B"),
                TransitionMarkup::internal("fail", "A").with_conditions(["failed"]),
                TransitionMarkup::new("fail", "A", "B").with_unless(["failed"]),
            ],
            auto_transitions: false,
            ..MachineMarkup::default()
        };
        let options = DisplayOptions {
            show_conditions: true,
            ..DisplayOptions::default()
        };
        let graph = GraphModelBuilder::new(options).build(&flat(&markup));

        assert_eq!(graph.node_count(), 2);
        let internal: Vec<&GraphEdge> = graph
            .edges()
            .iter()
            .filter(|edge| edge.label.contains("[internal]"))
            .collect();
        assert_eq!(internal.len(), 1);
        assert_eq!(internal[0].label, "fail [internal] [failed]");
        assert_eq!(internal[0].dest, None);
    }

    #[test]
    fn label_override_wins_over_trigger() {
        let markup = MachineMarkup {
            states: vec!["A".into(), "B".into()],
            transitions: vec![TransitionMarkup::new("go", "A", "B").with_label("Go!")],
            auto_transitions: false,
            ..MachineMarkup::default()
        };
        let graph = GraphModelBuilder::default().build(&flat(&markup));
        assert_eq!(graph.edges()[0].label, "Go!");
    }

    #[test]
    fn state_attributes_extend_labels() {
        let markup = MachineMarkup {
            states: vec![StateMarkup::new("A")
                .with_tags(["new", "polling"])
                .with_on_enter(["say_hello"])
                .with_on_exit(["say_goodbye"])
                .with_timeout(5.0, ["do_something"])],
            auto_transitions: false,
            ..MachineMarkup::default()
        };
        let options = DisplayOptions {
            show_state_attributes: true,
            ..DisplayOptions::default()
        };
        let graph = GraphModelBuilder::new(options).build(&flat(&markup));

        assert_eq!(
            graph.node("A").unwrap().label,
            "A [new, polling]\n- enter:\n  + say_hello\n- exit:\n  + say_goodbye\n- timeout(5s) -> (do_something)"
        );

        let plain = GraphModelBuilder::default().build(&flat(&markup));
        assert_eq!(plain.node("A").unwrap().label, "A");
    }

    #[test]
    fn auto_transitions_only_when_enabled() {
        let markup = MachineMarkup {
            states: vec!["A".into(), "B".into(), "C".into()],
            ..MachineMarkup::default()
        };
        let hidden = GraphModelBuilder::default().build(&flat(&markup));
        assert_eq!(hidden.edge_count(), 0);

        let options = DisplayOptions {
            show_auto_transitions: true,
            ..DisplayOptions::default()
        };
        let shown = GraphModelBuilder::new(options).build(&flat(&markup));
        assert_eq!(shown.edge_count(), 9);
        assert_eq!(shown.edges()[0].label, "to_A");
        assert_eq!(shown.edges()[8].label, "to_C");
    }

    #[test]
    fn composites_and_anchors_become_nodes() {
        let markup = MachineMarkup {
            states: vec![StateMarkup::new("C")
                .with_children(["1", "2"])
                .with_initial("1")],
            auto_transitions: false,
            ..MachineMarkup::default()
        };
        let graph = GraphModelBuilder::default().build(&flat(&markup));

        assert_eq!(graph.node("C").unwrap().kind, NodeKind::Composite);
        let anchor = graph.node("C_anchor").unwrap();
        assert_eq!(anchor.kind, NodeKind::Anchor);
        assert_eq!(anchor.parent.as_deref(), Some("C"));
        assert_eq!(graph.edges()[0].label, "");
        assert!(graph.edges()[0].is_anchor);
    }

    #[test]
    fn wildcard_internal_transition_loops_on_every_state() {
        let markup = MachineMarkup {
            states: vec!["A".into(), "B".into(), "C".into()],
            transitions: vec![TransitionMarkup::internal("polled", "*")],
            auto_transitions: false,
            ..MachineMarkup::default()
        };
        let graph = GraphModelBuilder::default().build(&flat(&markup));

        assert_eq!(graph.edge_count(), 3);
        let loops: Vec<(&str, &str)> = graph
            .edges()
            .iter()
            .map(|edge| (edge.source.as_str(), edge.label.as_str()))
            .collect();
        assert_eq!(
            loops,
            vec![
                ("A", "polled [internal]"),
                ("B", "polled [internal]"),
                ("C", "polled [internal]"),
            ]
        );
        assert!(graph.edges().iter().all(|edge| edge.dest.is_none()));
    }

    #[test]
    fn declared_to_triggers_survive_hidden_autos() {
        let markup = MachineMarkup {
            states: vec!["A".into(), "end".into()],
            transitions: vec![TransitionMarkup::new("to_end", "A", "end")],
            ..MachineMarkup::default()
        };
        let graph = GraphModelBuilder::default().build(&flat(&markup));

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edges()[0].label, "to_end");
        assert!(!graph.edges()[0].is_auto);
    }

    #[test]
    fn anchor_collisions_leave_a_single_anchor_node() {
        let markup = MachineMarkup {
            states: vec![StateMarkup::new("C")
                .with_children(["anchor", "x"])
                .with_initial("x")],
            auto_transitions: false,
            ..MachineMarkup::default()
        };
        let graph = GraphModelBuilder::default().build(&flat(&markup));

        let names: Vec<(&str, NodeKind)> = graph
            .nodes()
            .map(|node| (node.name.as_str(), node.kind))
            .collect();
        assert_eq!(
            names,
            vec![
                ("C", NodeKind::Composite),
                ("C_x", NodeKind::State),
                ("C_anchor", NodeKind::Anchor),
            ]
        );
    }

    #[test]
    fn building_twice_yields_equal_models() {
        let flat = flat(&walk_run_sprint());
        let builder = GraphModelBuilder::default();
        assert_eq!(builder.build(&flat), builder.build(&flat));
    }
}
