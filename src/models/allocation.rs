//! Allocation state and assignment records.
//!
//! `AllocationState` is the only mutable entity of a run. It tracks three
//! parallel views of the committed assignments:
//!
//! - shift → ordered assignments
//! - member → occupied shift IDs
//! - shift → occupant count
//!
//! # Invariants
//! - The occupant count of a shift equals the length of its assignment list.
//! - A member appears at most once in any shift's assignment list.
//! - The state only grows: nothing is removed once committed.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Member, Role, Shift};

/// How an assignment came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentSource {
    /// Produced by the optimizer.
    Algorithm,
    /// Entered by an administrator.
    Manual,
    /// Result of exchanging two occupants after a run.
    Swap,
}

/// A member committed to a shift in a given role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Shift ID.
    pub shift_id: String,
    /// Occupant member ID.
    pub member_id: String,
    /// Role filled on the shift.
    pub role: Role,
    /// Whether the occupant leads the shift.
    pub is_lead: bool,
    /// Origin of the assignment.
    pub source: AssignmentSource,
}

impl Assignment {
    /// Creates an algorithm assignment. The lead flag follows the role.
    pub fn new(shift_id: impl Into<String>, member_id: impl Into<String>, role: Role) -> Self {
        Self {
            shift_id: shift_id.into(),
            member_id: member_id.into(),
            is_lead: role.is_lead(),
            role,
            source: AssignmentSource::Algorithm,
        }
    }

    /// Sets the source.
    pub fn with_source(mut self, source: AssignmentSource) -> Self {
        self.source = source;
        self
    }
}

/// Mutable allocation state owned by a single run.
#[derive(Debug, Clone, Default)]
pub struct AllocationState {
    assignments: HashMap<String, Vec<Assignment>>,
    member_shifts: HashMap<String, Vec<String>>,
    coverage: HashMap<String, usize>,
    /// Shift IDs in registration order, for flattening.
    shift_order: Vec<String>,
}

impl AllocationState {
    /// Creates an empty state with every member and shift registered.
    ///
    /// Registered members count toward the workload mean even while
    /// they hold no shifts.
    pub fn new(members: &[Member], shifts: &[Shift]) -> Self {
        let mut state = Self::default();
        for shift in shifts {
            state.register_shift(&shift.id);
        }
        for member in members {
            state.member_shifts.entry(member.id.clone()).or_default();
        }
        state
    }

    fn register_shift(&mut self, shift_id: &str) {
        if !self.assignments.contains_key(shift_id) {
            self.assignments.insert(shift_id.to_string(), Vec::new());
            self.coverage.insert(shift_id.to_string(), 0);
            self.shift_order.push(shift_id.to_string());
        }
    }

    /// Commits an assignment.
    ///
    /// Returns `false` and leaves the state untouched when the member
    /// already occupies the shift.
    pub fn commit(&mut self, assignment: Assignment) -> bool {
        if self.holds(&assignment.member_id, &assignment.shift_id) {
            return false;
        }
        self.register_shift(&assignment.shift_id);

        self.member_shifts
            .entry(assignment.member_id.clone())
            .or_default()
            .push(assignment.shift_id.clone());
        *self.coverage.entry(assignment.shift_id.clone()).or_insert(0) += 1;
        self.assignments
            .entry(assignment.shift_id.clone())
            .or_default()
            .push(assignment);
        true
    }

    /// Committed assignments for a shift, in commit order.
    pub fn assignments(&self, shift_id: &str) -> &[Assignment] {
        self.assignments
            .get(shift_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Shift IDs a member occupies, in commit order.
    pub fn member_shifts(&self, member_id: &str) -> &[String] {
        self.member_shifts
            .get(member_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Current occupant count of a shift.
    pub fn occupancy(&self, shift_id: &str) -> usize {
        self.coverage.get(shift_id).copied().unwrap_or(0)
    }

    /// Whether a member occupies a shift.
    pub fn holds(&self, member_id: &str, shift_id: &str) -> bool {
        self.assignments(shift_id)
            .iter()
            .any(|a| a.member_id == member_id)
    }

    /// Number of occupants of a shift filling a given role.
    pub fn role_count(&self, shift_id: &str, role: &Role) -> usize {
        self.assignments(shift_id)
            .iter()
            .filter(|a| &a.role == role)
            .count()
    }

    /// Mean number of committed shifts across all known members.
    ///
    /// Returns 0.0 when no member is known.
    pub fn mean_workload(&self) -> f64 {
        if self.member_shifts.is_empty() {
            return 0.0;
        }
        let total: usize = self.member_shifts.values().map(Vec::len).sum();
        total as f64 / self.member_shifts.len() as f64
    }

    /// Total committed assignments.
    pub fn total_assignments(&self) -> usize {
        self.coverage.values().sum()
    }

    /// Flattens into a list ordered by shift, then commit order.
    pub fn into_assignments(mut self) -> Vec<Assignment> {
        let mut flat = Vec::with_capacity(self.total_assignments());
        for shift_id in &self.shift_order {
            if let Some(list) = self.assignments.remove(shift_id) {
                flat.extend(list);
            }
        }
        flat
    }
}
