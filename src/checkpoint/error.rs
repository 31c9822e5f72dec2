//! Snapshot error types.

use crate::core::ModelId;
use thiserror::Error;

/// Errors returned while saving or restoring a [`MachineSnapshot`](super::MachineSnapshot).
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to decode snapshot: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Unsupported snapshot version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The same model id is listed twice, so registration order is ambiguous.
    #[error("Model {0} appears more than once in the snapshot")]
    DuplicateModel(ModelId),
}
