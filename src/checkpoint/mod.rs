//! Snapshots of graph machines.
//!
//! A snapshot keeps what cannot be derived: the markup, the configuration
//! and the last known state of every registered model. Graphs and style
//! overlays are never stored; they are rebuilt from markup on restore.

use crate::config::DiagramConfig;
use crate::core::{ActiveState, MachineMarkup, ModelId};
use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

pub mod error;

pub use error::SnapshotError;

/// Version identifier for snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Last known state of one registered model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelSnapshot {
    pub id: ModelId,
    #[serde(default)]
    pub state: Option<ActiveState>,
}

/// Serializable snapshot of a graph machine.
/// Does NOT include graph models or style overlays (rebuilt on restore).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MachineSnapshot {
    /// Snapshot format version
    pub version: u32,

    /// Unique snapshot identifier
    pub id: String,

    /// When the snapshot was taken
    pub timestamp: DateTime<Utc>,

    pub markup: MachineMarkup,

    pub config: DiagramConfig,

    /// Registered models in registration order
    pub models: Vec<ModelSnapshot>,
}

impl MachineSnapshot {
    pub fn new(markup: MachineMarkup, config: DiagramConfig, models: Vec<ModelSnapshot>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            markup,
            config,
            models,
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self)
            .map_err(SnapshotError::Encode)
    }

    /// Parse and check a snapshot.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)
            .map_err(SnapshotError::Decode)?;
        snapshot.check()?;
        Ok(snapshot)
    }

    /// Reject snapshots this version cannot restore.
    pub fn check(&self) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }

        let mut seen = IndexSet::new();
        for model in &self.models {
            if !seen.insert(model.id) {
                return Err(SnapshotError::DuplicateModel(model.id));
            }
        }
        Ok(())
    }
}
