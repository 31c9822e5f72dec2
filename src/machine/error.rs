//! Errors raised by graph machines.

use crate::checkpoint::SnapshotError;
use crate::core::ModelId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while registering models or producing diagrams.
#[derive(Debug, Error)]
pub enum DiagramError {
    /// The model already exposes the capability the machine would bind
    #[error("Model already provides '{name}'; refusing to overwrite it")]
    ModelBindingConflict { name: String },

    #[error("Model {0} is not registered with this machine")]
    UnknownModel(ModelId),

    /// The model has no style overlay to update
    #[error("Model {0} has no style tracking")]
    StyleTrackingUnavailable(ModelId),

    #[error("Invalid machine markup: {0}")]
    InvalidMarkup(String),

    #[error("Invalid diagram configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to write diagram to {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}
