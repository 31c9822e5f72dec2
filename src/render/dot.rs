//! Graphviz DOT output.

use crate::graph::NodeKind;
use crate::render::{Drawing, DrawingNode, RenderBackend};
use crate::style::{Attributes, StyleClass, StyleSheet};
use std::fmt::Write;

/// DOT keywords that can never be used as bare identifiers.
const KEYWORDS: [&str; 6] = ["node", "edge", "graph", "digraph", "subgraph", "strict"];

/// Graph-level settings that select the header rather than a DOT attribute.
const HEADER_ATTRIBUTES: [&str; 2] = ["directed", "strict"];

/// Renders drawings as Graphviz DOT source.
///
/// Composite states become `cluster_` subgraphs holding a point-shaped
/// `<state>_anchor` node. Edges that start or end at a composite attach to
/// that anchor and are clipped to the cluster border with `ltail`/`lhead`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DotBackend;

impl RenderBackend for DotBackend {
    fn name(&self) -> &'static str {
        "dot"
    }

    fn draw(&self, drawing: &Drawing, sheet: &StyleSheet) -> String {
        let directed = drawing.attribute("directed") != Some("false");
        let mut out = String::new();

        let keyword = if directed { "digraph" } else { "graph" };
        if drawing.is_strict() {
            out.push_str("strict ");
        }
        let _ = writeln!(out, "{keyword} {{");

        let mut graph: Attributes = drawing
            .attributes
            .iter()
            .filter(|(key, _)| !HEADER_ATTRIBUTES.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        graph.insert("label".to_string(), drawing.title.clone());
        let _ = writeln!(out, "\tgraph {}", attribute_list(&graph));

        write_nodes(&mut out, drawing, sheet, None, 1);

        let connector = if directed { "->" } else { "--" };
        for edge in &drawing.edges {
            let mut attributes = Attributes::new();
            if !edge.label.is_empty() {
                attributes.insert("label".to_string(), edge.label.clone());
            }
            attributes.extend(styled(
                sheet.edge_attributes(StyleClass::Default),
                sheet.edge_attributes(edge.class),
            ));

            let source = endpoint(drawing, &edge.source, &edge.dest, "ltail", &mut attributes);
            let dest = endpoint(drawing, &edge.dest, &edge.source, "lhead", &mut attributes);
            let _ = writeln!(
                out,
                "\t{} {connector} {} {}",
                quote(&source),
                quote(&dest),
                attribute_list(&attributes)
            );
        }

        out.push_str("}\n");
        out
    }
}

fn write_nodes(
    out: &mut String,
    drawing: &Drawing,
    sheet: &StyleSheet,
    parent: Option<&str>,
    depth: usize,
) {
    let indent = "\t".repeat(depth);
    for node in drawing.children(parent) {
        match node.kind {
            // Drawn by the enclosing cluster.
            NodeKind::Anchor => {}
            NodeKind::State => {
                let mut attributes = Attributes::new();
                attributes.insert("label".to_string(), node.label.clone());
                attributes.extend(node_style(sheet, node));
                let _ = writeln!(out, "{indent}{} {}", quote(&node.name), attribute_list(&attributes));
            }
            NodeKind::Composite => {
                let _ = writeln!(out, "{indent}subgraph {} {{", quote(&cluster(&node.name)));

                let mut attributes = Attributes::new();
                attributes.insert("label".to_string(), node.label.clone());
                attributes.insert("rank".to_string(), "source".to_string());
                attributes.extend(styled(
                    sheet.graph_attributes(node.baseline),
                    sheet.graph_attributes(node.class),
                ));
                let _ = writeln!(out, "{indent}\tgraph {}", attribute_list(&attributes));
                let _ = writeln!(
                    out,
                    "{indent}\t{} [shape=point fillcolor=black width=0.1 label=\"\"]",
                    quote(&anchor(&node.name))
                );

                write_nodes(out, drawing, sheet, Some(&node.name), depth + 1);
                let _ = writeln!(out, "{indent}}}");
            }
        }
    }
}

/// Node attributes: the baseline class, then the override on top.
fn node_style(sheet: &StyleSheet, node: &DrawingNode) -> Attributes {
    styled(
        sheet.node_attributes(node.baseline),
        sheet.node_attributes(node.class),
    )
}

fn styled(base: Option<&Attributes>, overlay: Option<&Attributes>) -> Attributes {
    let mut merged = base.cloned().unwrap_or_default();
    if let Some(overlay) = overlay {
        merged.extend(overlay.iter().map(|(key, value)| (key.clone(), value.clone())));
    }
    merged
}

/// DOT node an edge end attaches to, recording cluster clipping if needed.
fn endpoint(
    drawing: &Drawing,
    name: &str,
    other: &str,
    clip: &str,
    attributes: &mut Attributes,
) -> String {
    let composite = drawing
        .node(name)
        .is_some_and(|node| node.kind == NodeKind::Composite);
    if !composite {
        return name.to_string();
    }
    // Clipping to a cluster that contains the other end is invalid.
    if name != other && !drawing.is_ancestor(name, other) {
        attributes.insert(clip.to_string(), cluster(name));
    }
    anchor(name)
}

fn cluster(name: &str) -> String {
    format!("cluster_{name}")
}

fn anchor(name: &str) -> String {
    format!("{name}{}", crate::graph::ANCHOR_SUFFIX)
}

fn attribute_list(attributes: &Attributes) -> String {
    let pairs: Vec<String> = attributes
        .iter()
        .map(|(key, value)| format!("{}={}", quote(key), quote(value)))
        .collect();
    format!("[{}]", pairs.join(" "))
}

fn quote(value: &str) -> String {
    if is_identifier(value) || is_numeral(value) {
        value.to_string()
    } else {
        let escaped = value
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\l");
        format!("\"{escaped}\"")
    }
}

fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    let starts_well = chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_');
    starts_well
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !KEYWORDS.contains(&value.to_ascii_lowercase().as_str())
}

fn is_numeral(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    !digits.is_empty()
        && digits.chars().any(|c| c.is_ascii_digit())
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.matches('.').count() <= 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MachineMarkup, StateMarkup, TransitionMarkup};
    use crate::graph::{DisplayOptions, Flattener, GraphModelBuilder};

    fn render(markup: &MachineMarkup, attributes: &[(&str, &str)]) -> (Drawing, String) {
        let flat = Flattener::new("_").flatten(markup);
        let model = GraphModelBuilder::new(DisplayOptions::default()).build(&flat);
        let attributes: Attributes = attributes
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        let drawing = DotBackend.generate(&model, "State Machine", &attributes);
        let source = DotBackend.draw(&drawing, &StyleSheet::default());
        (drawing, source)
    }

    fn flat_markup() -> MachineMarkup {
        MachineMarkup {
            states: vec!["A".into(), "B".into(), "C".into()],
            transitions: vec![
                TransitionMarkup::new("walk", "A", "B"),
                TransitionMarkup::internal("fail", "B"),
            ],
            auto_transitions: false,
            ..MachineMarkup::default()
        }
    }

    #[test]
    fn renders_header_and_title() {
        let (_, source) = render(&flat_markup(), &[("directed", "true"), ("rankdir", "LR")]);

        assert!(source.starts_with("digraph {\n"));
        assert!(source.contains("\tgraph [rankdir=LR label=\"State Machine\"]"));
        assert!(!source.contains("directed"));
        assert!(source.ends_with("}\n"));
    }

    #[test]
    fn strict_graphs_get_strict_header() {
        let (_, source) = render(&flat_markup(), &[("strict", "true")]);
        assert!(source.starts_with("strict digraph {"));
    }

    #[test]
    fn renders_states_and_transitions() {
        let (_, source) = render(&flat_markup(), &[]);

        assert!(source.contains("\tA [label=A style=\"rounded, filled\""));
        assert!(source.contains("\tA -> B [label=walk color=black]"));
        assert!(source.contains("\tB -> B [label=\"fail [internal]\" color=black]"));
    }

    #[test]
    fn styled_elements_merge_over_baseline() {
        let (mut drawing, _) = render(&flat_markup(), &[]);
        DotBackend.set_node_style(&mut drawing, "B", StyleClass::Active);
        DotBackend.set_edge_style(&mut drawing, "A", "B", StyleClass::Previous);
        let source = DotBackend.draw(&drawing, &StyleSheet::default());

        assert!(source.contains(
            "\tB [label=B style=\"rounded, filled\" shape=rectangle fillcolor=darksalmon color=red peripheries=2]"
        ));
        assert!(source.contains("\tA -> B [label=walk color=blue]"));
    }

    #[test]
    fn composites_become_clusters() {
        let markup = MachineMarkup {
            states: vec![
                StateMarkup::new("A"),
                StateMarkup::new("C")
                    .with_children(["1", "2"])
                    .with_initial("1"),
            ],
            transitions: vec![
                TransitionMarkup::new("enter", "A", "C"),
                TransitionMarkup::new("leave", "C", "A"),
            ],
            auto_transitions: false,
            ..MachineMarkup::default()
        };
        let (_, source) = render(&markup, &[("compound", "true")]);

        assert!(source.contains("\tsubgraph cluster_C {"));
        assert!(source.contains("\t\tC_anchor [shape=point"));
        assert!(source.contains("\t\tC_1 [label=1"));
        assert!(source.contains("\tC_anchor -> C_1 [color=black]"));
        assert!(source.contains("\tA -> C_anchor [label=enter color=black lhead=cluster_C]"));
        assert!(source.contains("\tC_anchor -> A [label=leave color=black ltail=cluster_C]"));
    }

    #[test]
    fn quotes_only_when_needed() {
        assert_eq!(quote("plain_name"), "plain_name");
        assert_eq!(quote("1.5"), "1.5");
        assert_eq!(quote("node"), "\"node\"");
        assert_eq!(quote("two words"), "\"two words\"");
        assert_eq!(quote("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(quote("a\nb"), "\"a\\lb\"");
        assert_eq!(quote(""), "\"\"");
        assert_eq!(quote("dir\\"), "\"dir\\\\\"");
        assert_eq!(quote("a\\b \"c\""), "\"a\\\\b \\\"c\\\"\"");
    }

    #[test]
    fn trailing_backslash_keeps_labels_terminated() {
        let markup = MachineMarkup {
            states: vec!["A".into(), "B".into()],
            transitions: vec![TransitionMarkup::new("go", "A", "B").with_label("dir\\")],
            auto_transitions: false,
            ..MachineMarkup::default()
        };
        let (_, source) = render(&markup, &[]);

        let line = source
            .lines()
            .find(|line| line.contains("A -> B"))
            .unwrap();
        assert_eq!(line, "\tA -> B [label=\"dir\\\\\" color=black]");
        let unescaped = line.replace("\\\\", "").replace("\\\"", "");
        assert_eq!(unescaped.matches('"').count() % 2, 0);
    }
}
