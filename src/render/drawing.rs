//! Styled, backend-neutral drawing generated from a graph model.

use crate::graph::{GraphModel, MarkupIssue, NodeKind};
use crate::machine::DiagramError;
use crate::render::RenderBackend;
use crate::style::{Attributes, StyleClass, StyleSheet};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq)]
pub struct DrawingNode {
    pub name: String,
    pub label: String,
    pub kind: NodeKind,
    pub parent: Option<String>,
    /// Class used when no override applies (`parallel` inside parallel states).
    pub baseline: StyleClass,
    pub class: StyleClass,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawingEdge {
    pub source: String,
    /// Drawn end; equals `source` for internal transitions.
    pub dest: String,
    pub label: String,
    pub internal: bool,
    pub anchor: bool,
    pub class: StyleClass,
}

/// Everything a backend needs to emit a diagram.
#[derive(Clone, Debug, PartialEq)]
pub struct Drawing {
    pub title: String,
    pub attributes: Attributes,
    pub nodes: Vec<DrawingNode>,
    pub edges: Vec<DrawingEdge>,
}

impl Drawing {
    /// Unstyled drawing of `model`: every element carries its baseline class.
    pub fn from_model(model: &GraphModel, title: &str, attributes: &Attributes) -> Self {
        let nodes = model
            .nodes()
            .map(|node| {
                let in_parallel = node
                    .parent
                    .as_deref()
                    .and_then(|parent| model.node(parent))
                    .is_some_and(|parent| parent.is_parallel);
                let baseline = if in_parallel {
                    StyleClass::Parallel
                } else {
                    StyleClass::Default
                };
                DrawingNode {
                    name: node.name.clone(),
                    label: node.label.clone(),
                    kind: node.kind,
                    parent: node.parent.clone(),
                    baseline,
                    class: baseline,
                }
            })
            .collect();

        let edges = model
            .edges()
            .iter()
            .map(|edge| DrawingEdge {
                source: edge.source.clone(),
                dest: edge.target().to_string(),
                label: edge.label.clone(),
                internal: edge.is_internal(),
                anchor: edge.is_anchor,
                class: StyleClass::Default,
            })
            .collect();

        Self {
            title: title.to_string(),
            attributes: attributes.clone(),
            nodes,
            edges,
        }
    }

    pub fn node(&self, name: &str) -> Option<&DrawingNode> {
        self.nodes.iter().find(|node| node.name == name)
    }

    /// Set the class of a node; unknown names are ignored.
    pub fn set_node_class(&mut self, name: &str, class: StyleClass) {
        if let Some(node) = self.nodes.iter_mut().find(|node| node.name == name) {
            node.class = class;
        }
    }

    /// Set the class of every edge drawn from `source` to `dest`.
    pub fn set_edge_class(&mut self, source: &str, dest: &str, class: StyleClass) {
        self.edges
            .iter_mut()
            .filter(|edge| edge.source == source && edge.dest == dest)
            .for_each(|edge| edge.class = class);
    }

    pub fn children<'a>(&'a self, parent: Option<&'a str>) -> impl Iterator<Item = &'a DrawingNode> + 'a {
        self.nodes
            .iter()
            .filter(move |node| node.parent.as_deref() == parent)
    }

    /// Whether `ancestor` contains `name`, directly or further up.
    pub fn is_ancestor(&self, ancestor: &str, name: &str) -> bool {
        let mut current = self.node(name).and_then(|node| node.parent.as_deref());
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.node(parent).and_then(|node| node.parent.as_deref());
        }
        false
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn is_strict(&self) -> bool {
        self.attribute("strict") == Some("true")
    }
}

/// A drawable graph returned to callers.
///
/// The diagram owns a styled [`Drawing`] and the backend that renders it,
/// along with any markup issues hit while building the graph.
#[derive(Clone)]
pub struct Diagram {
    drawing: Drawing,
    backend: Arc<dyn RenderBackend>,
    sheet: Arc<StyleSheet>,
    issues: Vec<MarkupIssue>,
}

impl Diagram {
    pub fn new(
        drawing: Drawing,
        backend: Arc<dyn RenderBackend>,
        sheet: Arc<StyleSheet>,
        issues: Vec<MarkupIssue>,
    ) -> Self {
        Self {
            drawing,
            backend,
            sheet,
            issues,
        }
    }

    pub fn drawing(&self) -> &Drawing {
        &self.drawing
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn title(&self) -> &str {
        &self.drawing.title
    }

    pub fn node_count(&self) -> usize {
        self.drawing.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.drawing.edges.len()
    }

    /// Markup problems skipped while building this graph.
    pub fn issues(&self) -> &[MarkupIssue] {
        &self.issues
    }

    pub fn is_complete(&self) -> bool {
        self.issues.is_empty()
    }

    /// Render the diagram source.
    pub fn draw(&self) -> String {
        self.backend.draw(&self.drawing, &self.sheet)
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), DiagramError> {
        let path = path.as_ref();
        std::fs::write(path, self.draw()).map_err(|source| DiagramError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl fmt::Debug for Diagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagram")
            .field("backend", &self.backend.name())
            .field("drawing", &self.drawing)
            .field("issues", &self.issues)
            .finish()
    }
}

impl fmt::Display for Diagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.draw())
    }
}
