//! Graph construction: flattening, model building and region reduction.
//!
//! The pipeline is pure: markup goes through the [`Flattener`], the
//! [`GraphModelBuilder`] turns the flat view into a labelled
//! [`GraphModel`], and [`region_of_interest`] derives reduced views without
//! touching the full model.

mod builder;
mod error;
mod flatten;
mod model;
mod roi;

pub use builder::{DisplayOptions, GraphModelBuilder};
pub use error::MarkupIssue;
pub use flatten::{FlatMachine, Flattener, ANCHOR_SUFFIX};
pub use model::{GraphEdge, GraphModel, GraphNode, NodeKind};
pub use roi::{region_of_interest, state_names};
