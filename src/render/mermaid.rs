//! Mermaid `stateDiagram-v2` output.

use crate::graph::NodeKind;
use crate::render::{Drawing, DrawingNode, RenderBackend};
use crate::style::{Attributes, StyleClass, StyleSheet};
use indexmap::IndexMap;
use std::fmt::Write;

/// Renders drawings as Mermaid state diagrams.
///
/// Mermaid has no way to style individual transitions, so edge classes are
/// ignored; node classes become `classDef` declarations.
#[derive(Clone, Copy, Debug, Default)]
pub struct MermaidBackend;

impl RenderBackend for MermaidBackend {
    fn name(&self) -> &'static str {
        "mermaid"
    }

    fn draw(&self, drawing: &Drawing, sheet: &StyleSheet) -> String {
        let mut out = String::new();
        if !drawing.title.is_empty() {
            let _ = writeln!(out, "---\ntitle: {}\n---", drawing.title);
        }
        out.push_str("stateDiagram-v2\n");
        if let Some(direction) = drawing.attribute("rankdir") {
            let _ = writeln!(out, "    direction {direction}");
        }

        write_states(&mut out, drawing, None, 1);

        for edge in drawing.edges.iter().filter(|edge| !edge.anchor) {
            let _ = write!(out, "    {} --> {}", identifier(&edge.source), identifier(&edge.dest));
            if !edge.label.is_empty() {
                let _ = write!(out, " : {}", single_line(&edge.label));
            }
            out.push('\n');
        }

        write_classes(&mut out, drawing, sheet);
        out
    }
}

fn write_states(out: &mut String, drawing: &Drawing, parent: Option<&str>, depth: usize) {
    let indent = "    ".repeat(depth);

    if let Some(parent) = parent {
        for edge in drawing.edges.iter().filter(|edge| edge.anchor) {
            let owned = drawing
                .node(&edge.source)
                .is_some_and(|anchor| anchor.parent.as_deref() == Some(parent));
            if owned {
                let _ = writeln!(out, "{indent}[*] --> {}", identifier(&edge.dest));
            }
        }
    }

    for node in drawing.children(parent) {
        match node.kind {
            NodeKind::Anchor => {}
            NodeKind::State => write_description(out, &indent, node),
            NodeKind::Composite => {
                let id = identifier(&node.name);
                if node.label != id {
                    let _ = writeln!(out, "{indent}state \"{}\" as {id}", escape(first_line(&node.label)));
                }
                let _ = writeln!(out, "{indent}state {id} {{");
                write_states(out, drawing, Some(&node.name), depth + 1);
                let _ = writeln!(out, "{indent}}}");
            }
        }
    }
}

/// Declare a leaf state; extra label lines become descriptions.
fn write_description(out: &mut String, indent: &str, node: &DrawingNode) {
    let id = identifier(&node.name);
    let mut lines = node.label.lines();
    let first = lines.next().unwrap_or_default();
    if first == id {
        let _ = writeln!(out, "{indent}{id}");
    } else {
        let _ = writeln!(out, "{indent}state \"{}\" as {id}", escape(first));
    }
    for line in lines {
        let _ = writeln!(out, "{indent}{id} : {}", line.trim());
    }
}

fn write_classes(out: &mut String, drawing: &Drawing, sheet: &StyleSheet) {
    let mut members: IndexMap<StyleClass, Vec<String>> = IndexMap::new();
    for node in &drawing.nodes {
        if node.kind == NodeKind::State && node.class != StyleClass::Default {
            members
                .entry(node.class)
                .or_default()
                .push(identifier(&node.name));
        }
    }

    for (class, names) in members {
        let Some(declaration) = sheet.node_attributes(class).map(class_def) else {
            continue;
        };
        if declaration.is_empty() {
            continue;
        }
        let _ = writeln!(out, "    classDef {class} {declaration}");
        let _ = writeln!(out, "    class {} {class}", names.join(","));
    }
}

/// Translate Graphviz-style attributes into Mermaid CSS properties.
fn class_def(attributes: &Attributes) -> String {
    let mut properties = Vec::new();
    for (key, value) in attributes {
        match key.as_str() {
            "fillcolor" => properties.push(format!("fill:{value}")),
            "color" => properties.push(format!("stroke:{value}")),
            "peripheries" => {
                if let Ok(width) = value.parse::<u32>() {
                    if width > 1 {
                        properties.push(format!("stroke-width:{width}px"));
                    }
                }
            }
            "style" if value.contains("dashed") => {
                properties.push("stroke-dasharray:5 5".to_string());
            }
            _ => {}
        }
    }
    properties.join(",")
}

fn identifier(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

fn first_line(label: &str) -> &str {
    label.lines().next().unwrap_or_default()
}

fn single_line(label: &str) -> String {
    label.lines().collect::<Vec<_>>().join(" ")
}

fn escape(text: &str) -> String {
    text.replace('"', "#quot;")
}
