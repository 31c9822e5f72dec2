//! End-to-end tests driving graph machines the way a state machine engine would.

use stategraph::builder::MarkupBuilder;
use stategraph::checkpoint::MachineSnapshot;
use stategraph::config::DiagramConfig;
use stategraph::core::{ActiveState, MachineMarkup, ObservedModel, StateMarkup, TransitionMarkup};
use stategraph::graph::MarkupIssue;
use stategraph::machine::{DiagramError, GraphMachine, GraphRequest};
use stategraph::render::{Diagram, Engine};
use stategraph::style::StyleClass;
use stategraph::transitions;
use std::collections::BTreeSet;

struct Model {
    state: Option<ActiveState>,
    bindings: Vec<&'static str>,
}

impl Model {
    fn at(state: &str) -> Self {
        Self {
            state: Some(ActiveState::from(state)),
            bindings: Vec::new(),
        }
    }
}

impl ObservedModel for Model {
    fn current_state(&self) -> Option<ActiveState> {
        self.state.clone()
    }

    fn provides(&self, name: &str) -> bool {
        self.bindings.contains(&name)
    }
}

/// States A..D with `walk`, `run` and two `sprint` transitions.
fn walker() -> MachineMarkup {
    MarkupBuilder::new()
        .states(["A", "B", "C", "D"])
        .initial("A")
        .transitions(transitions! {
            walk: "A" => "B",
            run: "B" => "C",
            sprint: "C" => "D",
            sprint: "C" => "B",
        })
        .build()
        .unwrap()
}

fn walker_with_guard() -> MachineMarkup {
    let mut markup = walker();
    markup.transitions[2] = TransitionMarkup::new("sprint", "C", "D").with_conditions(["is_fast"]);
    markup
}

fn full(machine: &mut GraphMachine, id: stategraph::ModelId) -> Diagram {
    machine.get_graph(id, &GraphRequest::new()).unwrap()
}

fn roi(machine: &mut GraphMachine, id: stategraph::ModelId) -> Diagram {
    machine.get_graph(id, &GraphRequest::new().roi(true)).unwrap()
}

fn node_names(diagram: &Diagram) -> BTreeSet<String> {
    diagram
        .drawing()
        .nodes
        .iter()
        .map(|node| node.name.clone())
        .collect()
}

fn edge_keys(diagram: &Diagram) -> Vec<(String, String, String)> {
    diagram
        .drawing()
        .edges
        .iter()
        .map(|edge| (edge.source.clone(), edge.dest.clone(), edge.label.clone()))
        .collect()
}

#[test]
fn flat_machine_has_every_state_and_transition() {
    let config = DiagramConfig::builder().show_conditions(true).build();
    let mut machine = GraphMachine::new(walker_with_guard(), config);
    let id = machine.add_model(&Model::at("A")).unwrap();

    let diagram = full(&mut machine, id);

    assert_eq!(diagram.node_count(), 4);
    assert_eq!(diagram.edge_count(), 4);
    let triggers = ["walk", "run", "sprint"];
    for edge in &diagram.drawing().edges {
        let trigger = edge.label.split(' ').next().unwrap();
        assert!(triggers.contains(&trigger), "unexpected label {}", edge.label);
    }
    assert!(diagram.draw().contains("label=\"sprint [is_fast]\""));
    assert!(diagram.is_complete());
}

#[test]
fn parallel_transitions_are_never_merged() {
    let markup = MachineMarkup {
        states: vec!["a".into(), "b".into()],
        transitions: transitions! {
            one: "a" => "b",
            two: "a" => "b",
            three: "a" => "b",
            four: "a" => "b",
        },
        ..MachineMarkup::default()
    };
    let mut machine = GraphMachine::new(markup, DiagramConfig::default());
    let id = machine.add_model(&Model::at("a")).unwrap();

    let diagram = full(&mut machine, id);
    let between = diagram
        .drawing()
        .edges
        .iter()
        .filter(|edge| edge.source == "a" && edge.dest == "b")
        .count();

    assert_eq!(between, 4);
    assert_eq!(diagram.draw().matches("a -> b").count(), 4);
}

#[test]
fn auto_transitions_are_hidden_by_default() {
    let markup = MarkupBuilder::new().states(["A", "B", "C"]).build().unwrap();

    let mut hidden = GraphMachine::new(markup.clone(), DiagramConfig::default());
    let id = hidden.add_model(&Model::at("A")).unwrap();
    assert_eq!(full(&mut hidden, id).edge_count(), 0);

    let config = DiagramConfig::builder().show_auto_transitions(true).build();
    let mut shown = GraphMachine::new(markup, config);
    let id = shown.add_model(&Model::at("A")).unwrap();
    let diagram = full(&mut shown, id);
    let edges = &diagram.drawing().edges;

    assert_eq!(edges.len(), 9);
    assert_eq!(edges.first().unwrap().label, "to_A");
    assert_eq!(edges.last().unwrap().label, "to_C");
    let generated: BTreeSet<&str> = edges.iter().map(|edge| edge.label.as_str()).collect();
    assert_eq!(generated, BTreeSet::from(["to_A", "to_B", "to_C"]));
}

#[test]
fn auto_transitions_sit_alongside_declared_ones() {
    let config = DiagramConfig::builder().show_auto_transitions(true).build();
    let mut machine = GraphMachine::new(walker(), config);
    let id = machine.add_model(&Model::at("A")).unwrap();

    let diagram = full(&mut machine, id);
    assert_eq!(diagram.edge_count(), 4 + 16);
}

#[test]
fn region_of_isolated_state_is_the_state_alone() {
    let markup = MarkupBuilder::new()
        .states(["A", "B", "C"])
        .transitions(transitions! { run: "B" => "C" })
        .build()
        .unwrap();
    let mut machine = GraphMachine::new(markup, DiagramConfig::default());
    let id = machine.add_model(&Model::at("A")).unwrap();

    let region = roi(&mut machine, id);
    assert_eq!(region.edge_count(), 0);
    assert_eq!(node_names(&region), BTreeSet::from(["A".to_string()]));

    let diagram = full(&mut machine, id);
    assert_eq!(diagram.node_count(), 3);
    assert_eq!(diagram.edge_count(), 1);
}

#[test]
fn region_holds_direct_neighbours_only() {
    let markup = MarkupBuilder::new()
        .states(["A", "B", "C", "D", "F"])
        .transitions(transitions! {
            left: "B" => "A",
            right: "B" => "C",
            far: "B" => "F",
            down: "C" => "D",
        })
        .build()
        .unwrap();
    let mut machine = GraphMachine::new(markup, DiagramConfig::default());
    let id = machine.add_model(&Model::at("B")).unwrap();

    let before = full(&mut machine, id);
    let region = roi(&mut machine, id);
    let after = full(&mut machine, id);

    assert_eq!(region.edge_count(), 3);
    assert_eq!(region.node_count(), 4);
    assert_eq!(
        node_names(&region),
        ["A", "B", "C", "F"].iter().map(|s| s.to_string()).collect::<BTreeSet<_>>()
    );
    assert_eq!(region.drawing().node("B").unwrap().class, StyleClass::Active);
    assert_eq!(after.drawing(), before.drawing());
}

#[test]
fn region_of_nested_state_keeps_containers_and_entry() {
    let markup = MachineMarkup {
        states: vec![
            StateMarkup::new("A"),
            StateMarkup::new("B"),
            StateMarkup::new("C")
                .with_children(["1", "2"])
                .with_initial("1")
                .with_transitions(transitions! { next: "1" => "2" }),
            StateMarkup::new("D"),
        ],
        transitions: transitions! {
            go: "A" => "C",
            back: "C" => "A",
            jump: "B" => "D",
        },
        ..MachineMarkup::default()
    };
    let mut machine = GraphMachine::new(markup, DiagramConfig::default());
    let nested = machine.add_model(&Model::at("C_1")).unwrap();
    let flat = machine.add_model(&Model::at("D")).unwrap();

    let region = roi(&mut machine, nested);
    assert_eq!(region.edge_count(), 4);
    assert_eq!(
        node_names(&region),
        ["A", "C", "C_1", "C_2", "C_anchor"]
            .iter()
            .map(|s| s.to_string())
            .collect::<BTreeSet<_>>()
    );

    let region = roi(&mut machine, flat);
    assert_eq!(region.edge_count(), 1);
    assert_eq!(region.node_count(), 2);

    let diagram = full(&mut machine, nested);
    assert_eq!(diagram.node_count(), 7);
    assert_eq!(diagram.edge_count(), 5);
    assert!(diagram.draw().contains("subgraph cluster_C {"));
    assert_eq!(diagram.drawing().attribute("rankdir"), Some("TB"));
}

#[test]
fn models_keep_separate_overlays() {
    let mut machine = GraphMachine::new(walker(), DiagramConfig::default());
    let first = machine.add_model(&Model::at("A")).unwrap();
    let second = machine.add_model(&Model::at("A")).unwrap();

    machine
        .execute_transition(first, "A", Some("B"), |_| Some(ActiveState::from("B")))
        .unwrap();

    let moved = full(&mut machine, first);
    let idle = full(&mut machine, second);

    assert_eq!(moved.drawing().node("B").unwrap().class, StyleClass::Active);
    assert_eq!(moved.drawing().node("A").unwrap().class, StyleClass::Previous);
    assert_eq!(idle.drawing().node("B").unwrap().class, StyleClass::Default);
    assert_eq!(idle.drawing().node("A").unwrap().class, StyleClass::Active);
    assert_eq!(machine.styles(second).unwrap().edge_style("A", "B"), None);
}

#[test]
fn parallel_regions_are_all_marked_active() {
    let markup = MachineMarkup {
        states: vec![
            StateMarkup::new("idle"),
            StateMarkup::new("P")
                .with_children(["x", "y"])
                .with_initial(vec!["x", "y"]),
        ],
        transitions: transitions! { split: "idle" => "P" },
        ..MachineMarkup::default()
    };
    let mut machine = GraphMachine::new(markup, DiagramConfig::default());
    let id = machine.add_model(&Model::at("idle")).unwrap();

    machine
        .execute_transition(id, "idle", Some("P"), |_| {
            Some(ActiveState::from(vec![ActiveState::from(vec!["P_x"]), ActiveState::from("P_y")]))
        })
        .unwrap();

    let styles = machine.styles(id).unwrap();
    assert_eq!(styles.node_class("P_x"), StyleClass::Active);
    assert_eq!(styles.node_class("P_y"), StyleClass::Active);
    assert_eq!(styles.node_class("idle"), StyleClass::Previous);
}

#[test]
fn internal_transitions_loop_on_their_source() {
    let mut markup = walker();
    markup.add_transition(TransitionMarkup::internal("fail", "B"));
    let mut machine = GraphMachine::new(markup, DiagramConfig::default());
    let id = machine.add_model(&Model::at("B")).unwrap();

    let diagram = full(&mut machine, id);
    let internal = diagram
        .drawing()
        .edges
        .iter()
        .find(|edge| edge.internal)
        .unwrap();

    assert_eq!(internal.label, "fail [internal]");
    assert_eq!(internal.source, "B");
    assert_eq!(internal.dest, "B");
    assert_eq!(diagram.node_count(), 4);
    assert!(diagram.draw().contains("B -> B [label=\"fail [internal]\""));
}

#[test]
fn additions_show_up_after_rebuild() {
    let mut machine = GraphMachine::new(walker(), DiagramConfig::default());
    let id = machine.add_model(&Model::at("A")).unwrap();
    let before = full(&mut machine, id);

    machine.add_state("E");
    machine.add_transition(TransitionMarkup::new("rest", "D", "E"));
    let after = machine
        .get_graph(id, &GraphRequest::new().force_new(true))
        .unwrap();

    let (old_nodes, new_nodes) = (node_names(&before), node_names(&after));
    assert!(old_nodes.is_subset(&new_nodes));
    assert_eq!(new_nodes.len(), old_nodes.len() + 1);

    let new_edges = edge_keys(&after);
    for edge in edge_keys(&before) {
        assert!(new_edges.contains(&edge));
    }
    let rest = ("D".to_string(), "E".to_string(), "rest".to_string());
    assert_eq!(new_edges.iter().filter(|edge| **edge == rest).count(), 1);
    assert_eq!(after.edge_count(), before.edge_count() + 1);
    assert_eq!(after.drawing().node("A").unwrap().class, StyleClass::Active);
}

#[test]
fn bound_models_cannot_be_registered() {
    let mut machine = GraphMachine::new(walker(), DiagramConfig::default());
    let bound = Model {
        state: Some(ActiveState::from("A")),
        bindings: vec!["get_graph"],
    };

    let error = machine.add_model(&bound).unwrap_err();
    assert!(matches!(error, DiagramError::ModelBindingConflict { .. }));
    assert!(error.to_string().contains("get_graph"));
    assert_eq!(machine.models().count(), 0);

    let config = DiagramConfig::builder().binding_name("diagram").build();
    let mut renamed = GraphMachine::new(walker(), config);
    assert!(renamed.add_model(&bound).is_ok());
}

#[test]
fn restored_machines_rebuild_their_graphs() {
    let mut machine = GraphMachine::new(walker(), DiagramConfig::default());
    let id = machine.add_model(&Model::at("A")).unwrap();
    machine
        .execute_transition(id, "A", Some("B"), |_| Some(ActiveState::from("B")))
        .unwrap();

    let json = machine.snapshot().to_json().unwrap();
    let snapshot = MachineSnapshot::from_json(&json).unwrap();
    let mut restored = GraphMachine::restore(snapshot).unwrap();

    let diagram = full(&mut restored, id);
    assert_eq!(diagram.edge_count(), 4);
    assert_eq!(diagram.drawing().node("B").unwrap().class, StyleClass::Active);
    assert_eq!(diagram.drawing().node("A").unwrap().class, StyleClass::Default);
}

#[test]
fn diagrams_write_their_source() {
    let mut machine = GraphMachine::new(walker(), DiagramConfig::default());
    let id = machine.add_model(&Model::at("A")).unwrap();
    let diagram = full(&mut machine, id);
    let dir = tempfile::tempdir().unwrap();

    let path = dir.path().join("walker.dot");
    diagram.write_to(&path).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), diagram.to_string());

    let missing = dir.path().join("missing").join("walker.dot");
    assert!(matches!(diagram.write_to(&missing), Err(DiagramError::Io { .. })));
}

#[cfg(feature = "mermaid")]
#[test]
fn mermaid_engine_renders_state_diagrams() {
    let config = DiagramConfig::builder()
        .engine(Engine::Mermaid)
        .title("Walker")
        .build();
    let mut machine = GraphMachine::new(walker(), config);
    let id = machine.add_model(&Model::at("A")).unwrap();

    let source = full(&mut machine, id).draw();
    assert!(source.contains("stateDiagram-v2"));
    assert!(source.contains("A --> B : walk"));
    assert!(source.contains("class A active"));
}

#[test]
fn markup_loads_from_json() {
    let markup = MachineMarkup::from_json(
        r#"{
            "name": "nested",
            "states": ["A", "B", {"name": "C", "states": ["1", "2"], "initial": "1"}],
            "transitions": [
                ["go", "A", "C"],
                {"trigger": "back", "source": "C", "dest": "A"},
                ["reset", "*", "A"]
            ]
        }"#,
    )
    .unwrap();
    let mut machine = GraphMachine::new(markup, DiagramConfig::default());
    let id = machine.add_model(&Model::at("A")).unwrap();

    let diagram = full(&mut machine, id);
    // A, B, C, C_1, C_2 and the anchor of C
    assert_eq!(diagram.node_count(), 6);
    // go, back, one reset per state and the entry into C
    assert_eq!(diagram.edge_count(), 2 + 5 + 1);
}

#[test]
fn markup_problems_are_reported_with_the_graph() {
    let markup = MachineMarkup {
        states: vec!["A".into(), "A".into(), "B_C".into()],
        transitions: transitions! { go: "A" => "Z" },
        ..MachineMarkup::default()
    };
    let mut machine = GraphMachine::new(markup, DiagramConfig::default());
    let id = machine.add_model(&Model {
        state: None,
        bindings: Vec::new(),
    })
    .unwrap();

    let diagram = full(&mut machine, id);
    assert_eq!(diagram.node_count(), 1);
    assert!(diagram.issues().contains(&MarkupIssue::DuplicateState("A".to_string())));
    assert!(diagram
        .issues()
        .iter()
        .any(|issue| matches!(issue, MarkupIssue::ReservedSeparator { .. })));
    assert!(diagram
        .issues()
        .iter()
        .any(|issue| matches!(issue, MarkupIssue::UnknownState { state, .. } if state == "Z")));
    assert!(machine.validate().is_failure());
}
