//! Shift model.
//!
//! A shift is a time-boxed work slot with a fixed capacity and an
//! ordered list of role quotas. Shifts are read-only during a run.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A role an occupant fills on a shift.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Generic crew role; the fallback when no quota is open.
    TeamMember,
    /// Supervisory role. Occupants are flagged as lead.
    ShiftLead,
    /// Escalation contact for the whole event.
    Executive,
}

impl Role {
    /// Whether this is the designated lead role.
    #[inline]
    pub fn is_lead(&self) -> bool {
        matches!(self, Role::ShiftLead)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::TeamMember => "TEAM_MEMBER",
            Role::ShiftLead => "SHIFT_LEAD",
            Role::Executive => "EXECUTIVE",
        };
        f.write_str(label)
    }
}

/// Minimum headcount for a role on a shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleQuota {
    /// Role to staff.
    pub role: Role,
    /// Required headcount.
    pub count: usize,
}

impl RoleQuota {
    /// Creates a new quota.
    pub fn new(role: Role, count: usize) -> Self {
        Self { role, count }
    }
}

/// Staffing class of a shift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftPriority {
    /// Must be staffed. Counts toward the participation floor.
    #[default]
    Core,
    /// Optional extra coverage.
    Buffer,
}

/// A shift to be staffed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shift {
    /// Unique shift identifier.
    pub id: String,
    /// Start instant.
    pub start: DateTime<Utc>,
    /// End instant.
    pub end: DateTime<Utc>,
    /// Maximum number of occupants.
    pub capacity: usize,
    /// Staffing class.
    #[serde(default)]
    pub priority: ShiftPriority,
    /// Author-assigned appeal rating (1-5). Informational only.
    #[serde(default = "default_desirability")]
    pub desirability: u8,
    /// Role quotas, scanned in listed order during role resolution.
    #[serde(default)]
    pub required_roles: Vec<RoleQuota>,
}

fn default_desirability() -> u8 {
    3
}

impl Shift {
    /// Creates a core shift with capacity 2 and no role quotas.
    pub fn new(id: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            start,
            end,
            capacity: 2,
            priority: ShiftPriority::Core,
            desirability: default_desirability(),
            required_roles: Vec::new(),
        }
    }

    /// Sets the capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the staffing class.
    pub fn with_priority(mut self, priority: ShiftPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the desirability rating.
    pub fn with_desirability(mut self, desirability: u8) -> Self {
        self.desirability = desirability;
        self
    }

    /// Appends a role quota.
    pub fn with_role(mut self, role: Role, count: usize) -> Self {
        self.required_roles.push(RoleQuota::new(role, count));
        self
    }

    /// Whether this is a must-staff shift.
    #[inline]
    pub fn is_core(&self) -> bool {
        self.priority == ShiftPriority::Core
    }

    /// Length of the shift.
    #[inline]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Sum of all role quotas.
    pub fn required_headcount(&self) -> usize {
        self.required_roles.iter().map(|q| q.count).sum()
    }
}
