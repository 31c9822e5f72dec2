//! Core types shared by every stage of diagram construction.
//!
//! This module contains the inputs the graph layer reads:
//! - Machine markup (states, transitions, nesting) as authored
//! - Flattened descriptors with qualified names
//! - Observed models and their current, possibly parallel, state
//!
//! Nothing here executes a machine; these are plain values.

mod descriptor;
mod markup;
mod state;

pub use descriptor::{StateDescriptor, TransitionDescriptor};
pub use markup::{InitialState, MachineMarkup, StateMarkup, TransitionMarkup};
pub use state::{ActiveState, ModelId, ObservedModel};
