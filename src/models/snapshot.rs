//! Input snapshot for one rostering run.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{Member, Shift};
use crate::error::SnapshotError;
use crate::validation::{validate_snapshot, ValidationResult};

/// Members and shifts of a single event, as loaded by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterSnapshot {
    /// Event the shifts belong to.
    #[serde(default)]
    pub event_id: String,
    /// Members in processing order.
    pub members: Vec<Member>,
    /// Shifts in processing order.
    pub shifts: Vec<Shift>,
}

impl RosterSnapshot {
    /// Creates a snapshot.
    pub fn new(event_id: impl Into<String>, members: Vec<Member>, shifts: Vec<Shift>) -> Self {
        Self {
            event_id: event_id.into(),
            members,
            shifts,
        }
    }

    /// Parses a snapshot from JSON.
    pub fn from_json_str(s: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Loads a snapshot from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Runs [`validate_snapshot`] over this snapshot.
    pub fn validate(&self) -> ValidationResult {
        validate_snapshot(&self.members, &self.shifts)
    }

    /// Serializes to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
