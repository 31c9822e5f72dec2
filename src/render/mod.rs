//! Rendering backends.
//!
//! A backend turns a [`GraphModel`] into a [`Drawing`], lets the registry
//! apply style classes to it and finally emits diagram source. The DOT
//! backend is always compiled in; the Mermaid backend sits behind the
//! `mermaid` feature.

mod dot;
mod drawing;
#[cfg(feature = "mermaid")]
mod mermaid;

pub use dot::DotBackend;
pub use drawing::{Diagram, Drawing, DrawingEdge, DrawingNode};
#[cfg(feature = "mermaid")]
pub use mermaid::MermaidBackend;

use crate::graph::GraphModel;
use crate::style::{Attributes, StyleClass, StyleSheet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A diagram output format.
///
/// Implementations must be shareable across threads since registries hand
/// the same backend to every diagram they produce.
pub trait RenderBackend: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    /// Whether this backend can be used in the current build.
    fn is_available(&self) -> bool {
        true
    }

    /// Build the unstyled drawing of `model`.
    fn generate(&self, model: &GraphModel, title: &str, attributes: &Attributes) -> Drawing {
        Drawing::from_model(model, title, attributes)
    }

    fn set_node_style(&self, drawing: &mut Drawing, state: &str, class: StyleClass) {
        drawing.set_node_class(state, class);
    }

    fn set_edge_style(&self, drawing: &mut Drawing, source: &str, dest: &str, class: StyleClass) {
        drawing.set_edge_class(source, dest, class);
    }

    /// Emit diagram source for a styled drawing.
    fn draw(&self, drawing: &Drawing, sheet: &StyleSheet) -> String;
}

/// Backend selection as it appears in configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    #[default]
    Dot,
    Mermaid,
}

impl Engine {
    /// The backend for this engine, if it was compiled in.
    pub fn backend(self) -> Option<Arc<dyn RenderBackend>> {
        match self {
            Engine::Dot => Some(Arc::new(DotBackend)),
            #[cfg(feature = "mermaid")]
            Engine::Mermaid => Some(Arc::new(MermaidBackend)),
            #[cfg(not(feature = "mermaid"))]
            Engine::Mermaid => None,
        }
    }

    /// Pick the configured backend, falling back to DOT when it is missing.
    pub fn resolve(self) -> Arc<dyn RenderBackend> {
        match self.backend().filter(|backend| backend.is_available()) {
            Some(backend) => backend,
            None => {
                tracing::warn!(engine = %self, "Render backend unavailable, falling back to dot");
                Arc::new(DotBackend)
            }
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Engine::Dot => f.write_str("dot"),
            Engine::Mermaid => f.write_str("mermaid"),
        }
    }
}
