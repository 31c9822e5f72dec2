//! Visual attributes attached to each style class.

use crate::style::StyleClass;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered attribute map, e.g. `color = "red"`.
pub type Attributes = IndexMap<String, String>;

fn attributes(pairs: &[(&str, &str)]) -> Attributes {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// Attributes per style class for nodes, edges and containers.
///
/// Attribute names follow Graphviz conventions; backends that speak a
/// different dialect translate them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSheet {
    pub node: IndexMap<StyleClass, Attributes>,
    pub edge: IndexMap<StyleClass, Attributes>,
    /// Attributes of composite states drawn as containers.
    pub graph: IndexMap<StyleClass, Attributes>,
}

impl StyleSheet {
    pub fn node_attributes(&self, class: StyleClass) -> Option<&Attributes> {
        self.node.get(&class)
    }

    pub fn edge_attributes(&self, class: StyleClass) -> Option<&Attributes> {
        self.edge.get(&class)
    }

    pub fn graph_attributes(&self, class: StyleClass) -> Option<&Attributes> {
        self.graph.get(&class)
    }
}

impl Default for StyleSheet {
    fn default() -> Self {
        let node = IndexMap::from([
            (
                StyleClass::Default,
                attributes(&[
                    ("style", "rounded, filled"),
                    ("shape", "rectangle"),
                    ("fillcolor", "white"),
                    ("color", "black"),
                    ("peripheries", "1"),
                ]),
            ),
            (
                StyleClass::Inactive,
                attributes(&[("fillcolor", "white"), ("color", "black"), ("peripheries", "1")]),
            ),
            (
                StyleClass::Parallel,
                attributes(&[
                    ("shape", "rectangle"),
                    ("color", "black"),
                    ("fillcolor", "white"),
                    ("style", "dashed, rounded, filled"),
                    ("peripheries", "1"),
                ]),
            ),
            (
                StyleClass::Active,
                attributes(&[("color", "red"), ("fillcolor", "darksalmon"), ("peripheries", "2")]),
            ),
            (
                StyleClass::Previous,
                attributes(&[("color", "blue"), ("fillcolor", "azure2"), ("peripheries", "1")]),
            ),
        ]);

        let edge = IndexMap::from([
            (StyleClass::Default, attributes(&[("color", "black")])),
            (StyleClass::Previous, attributes(&[("color", "blue")])),
        ]);

        let graph = IndexMap::from([
            (
                StyleClass::Default,
                attributes(&[("color", "black"), ("fillcolor", "white"), ("style", "solid")]),
            ),
            (
                StyleClass::Previous,
                attributes(&[("color", "blue"), ("fillcolor", "azure2"), ("style", "filled")]),
            ),
            (
                StyleClass::Active,
                attributes(&[("color", "red"), ("fillcolor", "darksalmon"), ("style", "filled")]),
            ),
            (
                StyleClass::Parallel,
                attributes(&[("color", "black"), ("fillcolor", "white"), ("style", "dotted")]),
            ),
        ]);

        Self { node, edge, graph }
    }
}
