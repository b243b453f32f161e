//! Error types for the fallible surfaces of the crate.
//!
//! The optimizer itself never fails: broken constraints are reported as
//! violations in its outcome. Errors here cover loading inputs and
//! post-run edits.

use thiserror::Error;

/// Event configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Snapshot loading error.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejected manual swap.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SwapError {
    #[error("no assignment at index {0}")]
    UnknownAssignment(usize),

    #[error("both assignments belong to shift '{0}'")]
    SameShift(String),

    #[error("member '{member_id}' already occupies shift '{shift_id}'")]
    AlreadyAssigned { member_id: String, shift_id: String },

    #[error("member '{member_id}' would conflict with shift '{conflicting_shift_id}'")]
    Conflict {
        member_id: String,
        conflicting_shift_id: String,
    },

    #[error("unknown shift '{0}'")]
    UnknownShift(String),
}
