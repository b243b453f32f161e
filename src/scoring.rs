//! Desirability scoring of (member, shift) pairings.
//!
//! Each candidate pairing gets four factor scores, then a weighted
//! overall score. **Higher overall = better candidate.**
//!
//! | Factor | Range | Rewards |
//! |--------|-------|---------|
//! | Preference match | <= 100 | Stated ranks, negative past rank 6 |
//! | Experience balance | 0 or 50 | Filling a missing tier |
//! | Workload fairness | see below | Members near or under the mean |
//! | Core coverage | 50 or 100 | Must-staff shifts |
//!
//! Scores are read against the live allocation state, so the same pairing
//! scores differently as a run progresses.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::AlgorithmWeights;
use crate::models::{AllocationState, Member, Preference, Shift};

/// Points removed per preference rank below the first.
pub const PREFERENCE_STEP: f64 = 20.0;

/// Bonus for a candidate whose tier is not yet on the shift.
pub const EXPERIENCE_GAP_BONUS: f64 = 50.0;

/// Points per shift of distance from the mean workload.
pub const WORKLOAD_STEP: f64 = 20.0;

/// Core coverage score of a must-staff shift.
pub const CORE_SHIFT_SCORE: f64 = 100.0;

/// Core coverage score of a buffer shift.
pub const BUFFER_SHIFT_SCORE: f64 = 50.0;

/// Factor breakdown for one candidate pairing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssignmentScore {
    /// Stated-preference factor.
    pub preference_match: f64,
    /// Experience-mix factor.
    pub experience_balance: f64,
    /// Workload-fairness factor.
    pub workload_fairness: f64,
    /// Core-coverage factor.
    pub core_shift_coverage: f64,
    /// Weighted sum of the factors.
    pub overall: f64,
}

/// Preference factor: `100 - 20 * (priority - 1)`.
///
/// No stated preference scores 0. The formula is unclamped: ranks past 6
/// score below 0, so a low-ranked shift loses to an unlisted one.
pub fn preference_score(shift: &Shift, preferences: &[Preference]) -> f64 {
    match preferences.iter().find(|p| p.shift_id == shift.id) {
        Some(p) => 100.0 - (f64::from(p.priority) - 1.0) * PREFERENCE_STEP,
        None => 0.0,
    }
}

/// Experience factor: 50 if the candidate's tier is missing from the
/// shift's current occupants, otherwise 0.
pub fn experience_balance_score(
    member: &Member,
    shift: &Shift,
    state: &AllocationState,
    members: &HashMap<&str, &Member>,
) -> f64 {
    let represented = state
        .assignments(&shift.id)
        .iter()
        .filter_map(|a| members.get(a.member_id.as_str()))
        .any(|m| m.experience == member.experience);

    if represented {
        0.0
    } else {
        EXPERIENCE_GAP_BONUS
    }
}

/// Workload factor relative to the live mean shift count.
///
/// At or above the mean: `max(0, 100 - 20 * (count - mean))`.
/// Below the mean: `100 - 20 * (mean - count)`, unclamped, so members far
/// below the mean score under 0.
pub fn workload_fairness_score(member: &Member, state: &AllocationState) -> f64 {
    let count = state.member_shifts(&member.id).len() as f64;
    let mean = state.mean_workload();

    if count < mean {
        100.0 - (mean - count) * WORKLOAD_STEP
    } else {
        (100.0 - (count - mean) * WORKLOAD_STEP).max(0.0)
    }
}

/// Core coverage factor: 100 for core shifts, 50 for buffer shifts.
pub fn core_coverage_score(shift: &Shift) -> f64 {
    if shift.is_core() {
        CORE_SHIFT_SCORE
    } else {
        BUFFER_SHIFT_SCORE
    }
}

/// Scores a candidate pairing against the current state.
pub fn score_assignment(
    member: &Member,
    shift: &Shift,
    state: &AllocationState,
    preferences: &[Preference],
    members: &HashMap<&str, &Member>,
    weights: &AlgorithmWeights,
) -> AssignmentScore {
    let preference_match = preference_score(shift, preferences);
    let experience_balance = experience_balance_score(member, shift, state, members);
    let workload_fairness = workload_fairness_score(member, state);
    let core_shift_coverage = core_coverage_score(shift);

    let overall = preference_match * weights.preference_match
        + experience_balance * weights.experience_balance
        + workload_fairness * weights.workload_fairness
        + core_shift_coverage * weights.core_shift_coverage;

    AssignmentScore {
        preference_match,
        experience_balance,
        workload_fairness,
        core_shift_coverage,
        overall,
    }
}
