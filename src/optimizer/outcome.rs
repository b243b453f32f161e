//! Result of a roster run, plus post-run edits.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::constraints::windows_conflict;
use crate::error::SwapError;
use crate::models::{Assignment, AssignmentSource, Shift};
use crate::scoring::AssignmentScore;

/// Key of the score and explanation maps.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssignmentKey {
    /// Member ID.
    pub member_id: String,
    /// Shift ID.
    pub shift_id: String,
}

impl AssignmentKey {
    /// Creates a key.
    pub fn new(member_id: impl Into<String>, shift_id: impl Into<String>) -> Self {
        Self {
            member_id: member_id.into(),
            shift_id: shift_id.into(),
        }
    }
}

impl fmt::Display for AssignmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.member_id, self.shift_id)
    }
}

/// Everything a run produces.
///
/// The crate never persists this; the caller decides what to store.
#[derive(Debug, Clone, Default)]
pub struct RosterOutcome {
    /// Committed assignments, grouped by shift in input order.
    pub assignments: Vec<Assignment>,
    /// Factor scores recorded at commit time.
    pub scores: HashMap<AssignmentKey, AssignmentScore>,
    /// Human-readable reason for each assignment.
    pub explanations: HashMap<AssignmentKey, String>,
    /// Audit findings. Informational: the roster is returned regardless.
    pub violations: Vec<String>,
}

impl RosterOutcome {
    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    /// Whether the audit reported anything.
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Occupants of a shift.
    pub fn occupancy(&self, shift_id: &str) -> usize {
        self.assignments
            .iter()
            .filter(|a| a.shift_id == shift_id)
            .count()
    }

    /// Assignments of a shift, in commit order.
    pub fn assignments_for_shift(&self, shift_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.shift_id == shift_id)
            .collect()
    }

    /// Assignments held by a member.
    pub fn assignments_for_member(&self, member_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.member_id == member_id)
            .collect()
    }

    /// Recorded score for a pairing.
    pub fn score_for(&self, member_id: &str, shift_id: &str) -> Option<&AssignmentScore> {
        self.scores.get(&AssignmentKey::new(member_id, shift_id))
    }

    /// Recorded explanation for a pairing.
    pub fn explanation_for(&self, member_id: &str, shift_id: &str) -> Option<&String> {
        self.explanations.get(&AssignmentKey::new(member_id, shift_id))
    }

    /// Exchanges the occupants of two assignments.
    ///
    /// Both assignments keep their shift and role; only the members trade
    /// places. The swap is rejected if either member would end up twice on
    /// a shift or too close to one of their other shifts. On success both
    /// assignments are marked [`AssignmentSource::Swap`], their old scores
    /// are dropped, and the explanations record the exchange.
    ///
    /// The audit findings in `violations` are not recomputed.
    pub fn swap(&mut self, first: usize, second: usize, shifts: &[Shift]) -> Result<(), SwapError> {
        let a = self
            .assignments
            .get(first)
            .ok_or(SwapError::UnknownAssignment(first))?;
        let b = self
            .assignments
            .get(second)
            .ok_or(SwapError::UnknownAssignment(second))?;
        if a.shift_id == b.shift_id {
            return Err(SwapError::SameShift(a.shift_id.clone()));
        }

        let by_id: HashMap<&str, &Shift> = shifts.iter().map(|s| (s.id.as_str(), s)).collect();
        let shift_a = *by_id
            .get(a.shift_id.as_str())
            .ok_or_else(|| SwapError::UnknownShift(a.shift_id.clone()))?;
        let shift_b = *by_id
            .get(b.shift_id.as_str())
            .ok_or_else(|| SwapError::UnknownShift(b.shift_id.clone()))?;

        self.ensure_can_move(&a.member_id, &a.shift_id, shift_b, &by_id)?;
        self.ensure_can_move(&b.member_id, &b.shift_id, shift_a, &by_id)?;

        let (member_a, member_b) = (a.member_id.clone(), b.member_id.clone());
        let (shift_a, shift_b) = (shift_a.id.clone(), shift_b.id.clone());

        for key in [
            AssignmentKey::new(&member_a, &shift_a),
            AssignmentKey::new(&member_b, &shift_b),
        ] {
            self.scores.remove(&key);
            self.explanations.remove(&key);
        }

        self.assignments[first].member_id = member_b.clone();
        self.assignments[first].source = AssignmentSource::Swap;
        self.assignments[second].member_id = member_a.clone();
        self.assignments[second].source = AssignmentSource::Swap;

        self.explanations.insert(
            AssignmentKey::new(&member_b, &shift_a),
            format!("Swapped with {member_a} (previously on {shift_b})"),
        );
        self.explanations.insert(
            AssignmentKey::new(&member_a, &shift_b),
            format!("Swapped with {member_b} (previously on {shift_a})"),
        );

        tracing::info!(%member_a, %member_b, %shift_a, %shift_b, "assignments swapped");
        Ok(())
    }

    /// Checks that `member_id` can leave `leaving` and take `target`.
    fn ensure_can_move(
        &self,
        member_id: &str,
        leaving: &str,
        target: &Shift,
        by_id: &HashMap<&str, &Shift>,
    ) -> Result<(), SwapError> {
        let others = self
            .assignments
            .iter()
            .filter(|x| x.member_id == member_id && x.shift_id != leaving);

        for other in others {
            if other.shift_id == target.id {
                return Err(SwapError::AlreadyAssigned {
                    member_id: member_id.to_string(),
                    shift_id: target.id.clone(),
                });
            }
            if let Some(held) = by_id.get(other.shift_id.as_str()) {
                if windows_conflict(held, target) {
                    return Err(SwapError::Conflict {
                        member_id: member_id.to_string(),
                        conflicting_shift_id: held.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Serializable view with `memberId-shiftId` string keys.
    pub fn to_report(&self) -> RosterReport {
        RosterReport {
            assignments: self.assignments.clone(),
            scores: self
                .scores
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
            explanations: self
                .explanations
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            violations: self.violations.clone(),
        }
    }
}

/// JSON-friendly form of a [`RosterOutcome`].
///
/// Maps are ordered so the rendered output is stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterReport {
    /// Committed assignments.
    pub assignments: Vec<Assignment>,
    /// Scores keyed `memberId-shiftId`.
    pub scores: BTreeMap<String, AssignmentScore>,
    /// Explanations keyed `memberId-shiftId`.
    pub explanations: BTreeMap<String, String>,
    /// Audit findings.
    pub violations: Vec<String>,
}
