//! Hard-constraint checks.
//!
//! Pure functions over the allocation state. Each returns `None` when the
//! constraint holds and a [`Violation`] when it is broken. Nothing here
//! mutates state or depends on scoring.
//!
//! | Check | When evaluated |
//! |-------|----------------|
//! | Overlap | Before every commit |
//! | Capacity | Before every commit |
//! | Minimum participation | Post-run audit only |
//! | Group balance | Post-run audit only |

use chrono::Duration;
use std::collections::{HashMap, HashSet};

use crate::models::{AllocationState, Assignment, Member, Shift, Violation, ViolationKind};

/// Minimum gap required between two shifts of the same member.
pub const SHIFT_BUFFER_MINUTES: i64 = 15;

/// Allowed deviation of each group's share from 50%, in percentage points.
pub const BALANCE_TOLERANCE_PERCENT: usize = 10;

/// Whether two shifts are too close for one person to work both.
///
/// True when the windows intersect or the gap between them, in either
/// direction, is shorter than [`SHIFT_BUFFER_MINUTES`]. A gap of exactly
/// the buffer is allowed.
pub fn windows_conflict(a: &Shift, b: &Shift) -> bool {
    let buffer = Duration::minutes(SHIFT_BUFFER_MINUTES);
    // Neither shift ends a full buffer before the other starts.
    a.start < b.end + buffer && b.start < a.end + buffer
}

/// Checks that a member can take `candidate` without double-booking.
///
/// Committed shift IDs missing from `all_shifts` are ignored.
pub fn check_overlap(
    member_id: &str,
    candidate: &Shift,
    state: &AllocationState,
    all_shifts: &HashMap<&str, &Shift>,
) -> Option<Violation> {
    for existing_id in state.member_shifts(member_id) {
        let Some(existing) = all_shifts.get(existing_id.as_str()) else {
            continue;
        };
        if existing.id == candidate.id || windows_conflict(candidate, existing) {
            return Some(Violation::hard(
                ViolationKind::ShiftOverlap,
                format!(
                    "Shift {} overlaps with existing assignment {}",
                    candidate.id, existing.id
                ),
            ));
        }
    }
    None
}

/// Checks that a shift still has an open seat.
pub fn check_capacity(
    shift_id: &str,
    state: &AllocationState,
    capacity: usize,
) -> Option<Violation> {
    let current = state.occupancy(shift_id);
    if current >= capacity {
        return Some(Violation::hard(
            ViolationKind::ShiftCapacity,
            format!("Shift is at capacity ({current}/{capacity})"),
        ));
    }
    None
}

/// Checks that a member holds at least `minimum` core shifts.
pub fn check_minimum_shifts(
    member_id: &str,
    state: &AllocationState,
    core_shifts: &HashSet<String>,
    minimum: usize,
) -> Option<Violation> {
    let core_count = state
        .member_shifts(member_id)
        .iter()
        .filter(|id| core_shifts.contains(id.as_str()))
        .count();

    if core_count < minimum {
        return Some(Violation::hard(
            ViolationKind::MinimumShifts,
            format!("Member has {core_count} core shifts, minimum is {minimum}"),
        ));
    }
    None
}

/// Checks the two-group split among a shift's occupants.
///
/// Only applies when exactly two labels are present; each must then hold
/// a share within [`BALANCE_TOLERANCE_PERCENT`] points of 50%. Occupants
/// missing from `members` are not counted.
pub fn check_balance(
    shift_id: &str,
    assignments: &[Assignment],
    members: &HashMap<&str, &Member>,
) -> Option<Violation> {
    // Labels in first-seen order so messages are stable.
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for a in assignments {
        let Some(member) = members.get(a.member_id.as_str()) else {
            continue;
        };
        match counts.iter_mut().find(|(label, _)| *label == member.group) {
            Some((_, n)) => *n += 1,
            None => counts.push((member.group.as_str(), 1)),
        }
    }

    let total: usize = counts.iter().map(|(_, n)| n).sum();
    if total == 0 || counts.len() != 2 {
        return None;
    }

    // |n/total - 1/2| > tol/100  <=>  100 * |2n - total| > 2 * tol * total
    let out_of_band =
        |n: usize| 100 * (2 * n).abs_diff(total) > 2 * BALANCE_TOLERANCE_PERCENT * total;
    let (first, n1) = counts[0];
    let (second, n2) = counts[1];
    if out_of_band(n1) || out_of_band(n2) {
        tracing::debug!(shift_id, first, n1, second, n2, "group balance out of band");
        return Some(Violation::hard(
            ViolationKind::GroupBalance,
            format!("Group balance violated: {first}={n1}, {second}={n2}"),
        ));
    }
    None
}
