//! Three-phase greedy roster optimizer.
//!
//! # Algorithm
//!
//! 1. **Preference seeding.** Members in input order; each member's top
//!    ten preferences in ascending priority. A preference is committed
//!    when the overlap and capacity checks pass.
//! 2. **Greedy fill.** Shifts in input order. While a shift has open
//!    seats, score every member that passes the overlap check, commit the
//!    best, and re-score from scratch. Stops early when no member fits.
//! 3. **Audit.** Minimum participation per member and group balance per
//!    shift. Findings are reported, never corrected.
//!
//! Sorting is stable, so score ties resolve in member input order and
//! repeated runs on the same input produce the same roster.
//!
//! # Complexity
//! O(s * c * m * k) for phase 2, where s=shifts, c=capacity, m=members,
//! k=shifts per member (overlap scan).

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::{debug, info, warn};

use super::roles::resolve_role;
use super::{AssignmentKey, RosterOutcome};
use crate::config::{AlgorithmWeights, EventConfig};
use crate::constraints::{check_balance, check_capacity, check_minimum_shifts, check_overlap};
use crate::models::{AllocationState, Assignment, Member, RosterSnapshot, Shift};
use crate::scoring::{score_assignment, AssignmentScore};

/// Number of preferences per member considered during seeding.
pub const MAX_SEEDED_PREFERENCES: usize = 10;

/// Greedy roster optimizer.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use u_roster::config::EventConfig;
/// use u_roster::models::{ExperienceLevel, Member, Role, Shift};
/// use u_roster::optimizer::RosterOptimizer;
///
/// let start = Utc.with_ymd_and_hms(2026, 6, 26, 8, 0, 0).unwrap();
/// let end = Utc.with_ymd_and_hms(2026, 6, 26, 14, 0, 0).unwrap();
/// let shifts = vec![Shift::new("X", start, end).with_capacity(2).with_role(Role::TeamMember, 2)];
/// let members = vec![
///     Member::new("A", ExperienceLevel::Senior, "F").with_preference("X", 1),
///     Member::new("B", ExperienceLevel::Junior, "M"),
/// ];
///
/// let optimizer = RosterOptimizer::new(EventConfig::new().with_min_shifts(1));
/// let outcome = optimizer.run(&members, &shifts);
/// assert_eq!(outcome.occupancy("X"), 2);
/// assert!(!outcome.has_violations());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RosterOptimizer {
    config: EventConfig,
}

impl RosterOptimizer {
    /// Creates an optimizer for the given event configuration.
    pub fn new(config: EventConfig) -> Self {
        Self { config }
    }

    /// Event configuration in use.
    pub fn config(&self) -> &EventConfig {
        &self.config
    }

    /// Runs all three phases.
    ///
    /// Assumes referential integrity: preferences pointing at unknown
    /// shifts are skipped. See [`crate::validation::validate_snapshot`].
    pub fn run(&self, members: &[Member], shifts: &[Shift]) -> RosterOutcome {
        info!(
            members = members.len(),
            shifts = shifts.len(),
            min_shifts = self.config.min_shifts_per_person,
            "roster run start"
        );

        let mut run = Run::new(members, shifts, self.config.effective_weights());
        run.seed_preferences();
        run.greedy_fill();
        let violations = run.audit(&self.config);

        let outcome = RosterOutcome {
            assignments: run.state.into_assignments(),
            scores: run.scores,
            explanations: run.explanations,
            violations,
        };

        info!(
            assignments = outcome.assignments.len(),
            violations = outcome.violations.len(),
            "roster run end"
        );
        outcome
    }

    /// Runs on a loaded snapshot.
    pub fn run_snapshot(&self, snapshot: &RosterSnapshot) -> RosterOutcome {
        self.run(&snapshot.members, &snapshot.shifts)
    }
}

/// State of one run. Owned exclusively by [`RosterOptimizer::run`].
struct Run<'a> {
    members: &'a [Member],
    shifts: &'a [Shift],
    members_by_id: HashMap<&'a str, &'a Member>,
    shifts_by_id: HashMap<&'a str, &'a Shift>,
    weights: AlgorithmWeights,
    state: AllocationState,
    scores: HashMap<AssignmentKey, AssignmentScore>,
    explanations: HashMap<AssignmentKey, String>,
}

impl<'a> Run<'a> {
    fn new(members: &'a [Member], shifts: &'a [Shift], weights: AlgorithmWeights) -> Self {
        Self {
            members,
            shifts,
            members_by_id: members.iter().map(|m| (m.id.as_str(), m)).collect(),
            shifts_by_id: shifts.iter().map(|s| (s.id.as_str(), s)).collect(),
            weights,
            state: AllocationState::new(members, shifts),
            scores: HashMap::new(),
            explanations: HashMap::new(),
        }
    }

    /// Phase 1.
    fn seed_preferences(&mut self) {
        let members = self.members;
        let mut committed = 0usize;

        for member in members {
            for pref in member.top_preferences(MAX_SEEDED_PREFERENCES) {
                let Some(shift) = self.shifts_by_id.get(pref.shift_id.as_str()).copied() else {
                    debug!(
                        member = %member.id,
                        shift = %pref.shift_id,
                        "preference for unknown shift skipped"
                    );
                    continue;
                };

                if let Some(v) = check_overlap(&member.id, shift, &self.state, &self.shifts_by_id) {
                    debug!(
                        member = %member.id,
                        shift = %shift.id,
                        reason = %v,
                        "preference skipped"
                    );
                    continue;
                }
                if let Some(v) = check_capacity(&shift.id, &self.state, shift.capacity) {
                    debug!(
                        member = %member.id,
                        shift = %shift.id,
                        reason = %v,
                        "preference skipped"
                    );
                    continue;
                }

                if !self.commit(member, shift) {
                    continue;
                }
                // Scored against the state that already includes this commit.
                let score = self.score(member, shift);
                let key = AssignmentKey::new(&member.id, &shift.id);
                self.scores.insert(key.clone(), score);
                self.explanations.insert(
                    key,
                    format!("Assigned based on preference (priority {})", pref.priority),
                );
                committed += 1;
            }
        }

        info!(phase = "preference_seeding", committed, "phase complete");
    }

    /// Phase 2.
    fn greedy_fill(&mut self) {
        let shifts = self.shifts;
        let mut committed = 0usize;

        for shift in shifts {
            while check_capacity(&shift.id, &self.state, shift.capacity).is_none() {
                let Some((member, score)) = self.best_candidate(shift) else {
                    warn!(
                        shift = %shift.id,
                        occupancy = self.state.occupancy(&shift.id),
                        capacity = shift.capacity,
                        "no eligible member left, shift stays short-staffed"
                    );
                    break;
                };

                if !self.commit(member, shift) {
                    break;
                }
                let key = AssignmentKey::new(&member.id, &shift.id);
                self.scores.insert(key.clone(), score);
                self.explanations.insert(
                    key,
                    format!("Assigned based on algorithm score ({:.1})", score.overall),
                );
                committed += 1;
            }
        }

        info!(phase = "greedy_fill", committed, "phase complete");
    }

    /// Phase 3. Returns flat violation messages.
    fn audit(&self, config: &EventConfig) -> Vec<String> {
        let core_shifts = config.core_shift_ids(self.shifts);
        let mut violations = Vec::new();

        for member in self.members {
            if let Some(v) = check_minimum_shifts(
                &member.id,
                &self.state,
                &core_shifts,
                config.min_shifts_per_person,
            ) {
                violations.push(format!("{}: {}", member.display_name, v.message));
            }
        }

        for shift in self.shifts {
            let occupants = self.state.assignments(&shift.id);
            if let Some(v) = check_balance(&shift.id, occupants, &self.members_by_id) {
                violations.push(format!("Shift {}: {}", shift.id, v.message));
            }
        }

        info!(phase = "audit", violations = violations.len(), "phase complete");
        violations
    }

    /// Highest-scoring member that can take `shift`, ties to input order.
    fn best_candidate(&self, shift: &Shift) -> Option<(&'a Member, AssignmentScore)> {
        let members = self.members;
        let mut candidates: Vec<(&'a Member, AssignmentScore)> = members
            .iter()
            .filter(|m| !self.state.holds(&m.id, &shift.id))
            .filter(|m| check_overlap(&m.id, shift, &self.state, &self.shifts_by_id).is_none())
            .map(|m| (m, self.score(m, shift)))
            .collect();

        // Stable sort keeps input order among equal scores.
        candidates.sort_by(|a, b| {
            b.1.overall
                .partial_cmp(&a.1.overall)
                .unwrap_or(Ordering::Equal)
        });
        candidates.into_iter().next()
    }

    fn score(&self, member: &Member, shift: &Shift) -> AssignmentScore {
        score_assignment(
            member,
            shift,
            &self.state,
            &member.preferences,
            &self.members_by_id,
            &self.weights,
        )
    }

    /// Commits `member` to `shift`. Returns `false` if the state refused it.
    fn commit(&mut self, member: &Member, shift: &Shift) -> bool {
        let role = resolve_role(&shift.required_roles, self.state.assignments(&shift.id));
        let committed = self
            .state
            .commit(Assignment::new(&shift.id, &member.id, role.clone()));
        if committed {
            debug!(member = %member.id, shift = %shift.id, role = %role, "commit");
        } else {
            warn!(member = %member.id, shift = %shift.id, "duplicate commit refused");
        }
        committed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::windows_conflict;
    use crate::models::{ExperienceLevel, Role, ShiftPriority};
    use chrono::{DateTime, TimeZone, Utc};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, day, hour, 0, 0).unwrap()
    }

    fn shift(id: &str, day: u32, start: u32, end: u32) -> Shift {
        Shift::new(id, at(day, start), at(day, end))
    }

    fn member(id: &str, level: ExperienceLevel, group: &str) -> Member {
        Member::new(id, level, group).with_name(format!("Member {id}"))
    }

    #[test]
    fn test_end_to_end_scenario() {
        let members = vec![
            member("A", ExperienceLevel::Senior, "F").with_preference("X", 1),
            member("B", ExperienceLevel::Junior, "M"),
            member("C", ExperienceLevel::Senior, "M"),
        ];
        let shifts = vec![shift("X", 26, 8, 14).with_capacity(2).with_role(Role::TeamMember, 2)];

        let optimizer = RosterOptimizer::new(EventConfig::new().with_min_shifts(0));
        let outcome = optimizer.run(&members, &shifts);

        assert_eq!(outcome.occupancy("X"), 2);
        assert_eq!(outcome.assignments[0].member_id, "A");
        assert!(outcome
            .explanation_for("A", "X")
            .unwrap()
            .contains("priority 1"));

        // B fills the missing junior tier and outscores C
        assert_eq!(outcome.assignments[1].member_id, "B");
        assert!(outcome
            .explanation_for("B", "X")
            .unwrap()
            .starts_with("Assigned based on algorithm score"));
        assert!(outcome.assignments.iter().all(|a| a.role == Role::TeamMember));
        assert!(!outcome.violations.iter().any(|v| v.contains("capacity")));
        assert!(outcome.violations.is_empty());
    }

    #[test]
    fn test_starvation_leaves_shift_short() {
        let members = vec![member("A", ExperienceLevel::Junior, "F")];
        let shifts = vec![shift("X", 26, 8, 14).with_capacity(2)];

        let outcome = RosterOptimizer::default().run(&members, &shifts);
        assert_eq!(outcome.occupancy("X"), 1);
        assert_eq!(outcome.assignment_count(), 1);
    }

    #[test]
    fn test_priority_one_preference_is_honored() {
        let members = vec![
            member("A", ExperienceLevel::Junior, "F"),
            member("B", ExperienceLevel::Junior, "F")
                .with_preference("Y", 2)
                .with_preference("X", 1),
        ];
        let shifts = vec![
            shift("X", 26, 8, 12).with_capacity(1),
            shift("Y", 27, 8, 12).with_capacity(1),
        ];

        let outcome = RosterOptimizer::default().run(&members, &shifts);
        let x = outcome.assignments_for_shift("X");
        assert_eq!(x.len(), 1);
        assert_eq!(x[0].member_id, "B");
        assert_eq!(
            outcome.explanation_for("B", "X").map(String::as_str),
            Some("Assigned based on preference (priority 1)")
        );
    }

    #[test]
    fn test_seeding_skips_overlapping_preferences() {
        let members = vec![member("A", ExperienceLevel::Junior, "F")
            .with_preference("X", 1)
            .with_preference("Y", 2)];
        let shifts = vec![
            shift("X", 26, 8, 12).with_capacity(1),
            // starts 10 minutes after X ends
            Shift::new("Y", at(26, 12) + chrono::Duration::minutes(10), at(26, 16))
                .with_capacity(1),
        ];

        let outcome = RosterOptimizer::default().run(&members, &shifts);
        assert_eq!(outcome.assignments_for_member("A").len(), 1);
        assert_eq!(outcome.occupancy("Y"), 0);
    }

    #[test]
    fn test_seeding_respects_capacity_in_member_order() {
        let members = vec![
            member("A", ExperienceLevel::Junior, "F").with_preference("X", 3),
            member("B", ExperienceLevel::Junior, "M").with_preference("X", 1),
        ];
        let shifts = vec![shift("X", 26, 8, 12).with_capacity(1)];

        let outcome = RosterOptimizer::default().run(&members, &shifts);
        // Input order beats rank across members
        assert_eq!(outcome.assignments_for_shift("X")[0].member_id, "A");
        assert!(outcome.explanation_for("B", "X").is_none());
    }

    #[test]
    fn test_only_top_ten_preferences_seeded() {
        let mut a = member("A", ExperienceLevel::Junior, "F");
        let mut shifts = Vec::new();
        for i in 0..12u32 {
            let id = format!("S{i}");
            a = a.with_preference(id.clone(), i + 1);
            shifts.push(shift(&id, 1 + i, 8, 12).with_capacity(1));
        }
        // S10 and S11 can still be filled by phase 2, just not as seeded preferences
        let members = vec![a];

        let outcome = RosterOptimizer::default().run(&members, &shifts);
        let seeded = outcome
            .explanations
            .iter()
            .filter(|(k, v)| k.member_id == "A" && v.contains("preference"))
            .count();
        assert_eq!(seeded, 10);
    }

    #[test]
    fn test_lead_role_from_quota() {
        let members = vec![
            member("A", ExperienceLevel::Senior, "F").with_preference("X", 1),
            member("B", ExperienceLevel::Junior, "M"),
        ];
        let shifts = vec![shift("X", 26, 8, 14)
            .with_capacity(2)
            .with_role(Role::ShiftLead, 1)
            .with_role(Role::TeamMember, 1)];

        let outcome = RosterOptimizer::default().run(&members, &shifts);
        let x = outcome.assignments_for_shift("X");
        assert_eq!(x[0].role, Role::ShiftLead);
        assert!(x[0].is_lead);
        assert_eq!(x[1].role, Role::TeamMember);
        assert!(!x[1].is_lead);
    }

    #[test]
    fn test_minimum_participation_reported_once_per_member() {
        let members = vec![
            member("A", ExperienceLevel::Junior, "F")
                .with_preference("X", 1)
                .with_preference("Y", 1),
            member("B", ExperienceLevel::Junior, "F").with_preference("Z", 1),
        ];
        let shifts = vec![
            shift("X", 26, 8, 12).with_capacity(1),
            shift("Y", 27, 8, 12).with_capacity(1),
            shift("Z", 28, 8, 12).with_capacity(1),
        ];

        let outcome = RosterOptimizer::default().run(&members, &shifts);
        assert_eq!(outcome.assignments_for_member("A").len(), 2);
        let b_msgs: Vec<&String> = outcome
            .violations
            .iter()
            .filter(|v| v.starts_with("Member B:"))
            .collect();
        assert_eq!(b_msgs.len(), 1);
        assert_eq!(b_msgs[0], "Member B: Member has 1 core shifts, minimum is 2");
        assert!(!outcome.violations.iter().any(|v| v.starts_with("Member A:")));
    }

    #[test]
    fn test_buffer_shifts_do_not_count_toward_floor() {
        let members = vec![member("A", ExperienceLevel::Junior, "F")];
        let shifts = vec![
            shift("X", 26, 8, 12).with_priority(ShiftPriority::Buffer),
            shift("Y", 27, 8, 12).with_priority(ShiftPriority::Buffer),
        ];

        let outcome = RosterOptimizer::default().run(&members, &shifts);
        assert_eq!(outcome.assignment_count(), 2);
        assert_eq!(
            outcome.violations,
            vec!["Member A: Member has 0 core shifts, minimum is 2".to_string()]
        );
    }

    #[test]
    fn test_balance_violation_reported_with_shift_prefix() {
        let members = vec![
            member("A", ExperienceLevel::Junior, "F"),
            member("B", ExperienceLevel::Junior, "F"),
            member("C", ExperienceLevel::Junior, "M"),
        ];
        let shifts = vec![shift("X", 26, 8, 12).with_capacity(3)];

        let optimizer = RosterOptimizer::new(EventConfig::new().with_min_shifts(0));
        let outcome = optimizer.run(&members, &shifts);
        assert_eq!(outcome.occupancy("X"), 3);
        assert_eq!(
            outcome.violations,
            vec!["Shift X: Group balance violated: F=2, M=1".to_string()]
        );
    }

    #[test]
    fn test_tie_break_follows_member_order() {
        let members = vec![
            member("first", ExperienceLevel::Junior, "F"),
            member("second", ExperienceLevel::Junior, "F"),
        ];
        let shifts = vec![shift("X", 26, 8, 12).with_capacity(1)];

        let outcome = RosterOptimizer::default().run(&members, &shifts);
        assert_eq!(outcome.assignments[0].member_id, "first");
    }

    #[test]
    fn test_runs_are_deterministic() {
        let members: Vec<Member> = (0..6)
            .map(|i| {
                let level = ExperienceLevel::ALL[i % 3];
                let group = if i % 2 == 0 { "F" } else { "M" };
                member(&format!("m{i}"), level, group)
                    .with_preference(format!("s{}", i % 4), 1 + (i as u32 % 3))
            })
            .collect();
        let shifts: Vec<Shift> = (0..4u32)
            .map(|i| {
                shift(&format!("s{i}"), 20 + i / 2, 8 + (i % 2) * 6, 12 + (i % 2) * 6)
                    .with_capacity(3)
            })
            .collect();

        let optimizer = RosterOptimizer::default();
        let a = optimizer.run(&members, &shifts);
        let b = optimizer.run(&members, &shifts);
        assert_eq!(a.assignments, b.assignments);
        assert_eq!(a.violations, b.violations);
    }

    #[test]
    fn test_no_double_booking_or_overfill() {
        let members: Vec<Member> = (0..5)
            .map(|i| member(&format!("m{i}"), ExperienceLevel::ALL[i % 3], "F"))
            .collect();
        // Two overlapping shifts and one adjacent within the buffer
        let shifts = vec![
            shift("a", 26, 8, 12).with_capacity(3),
            shift("b", 26, 10, 14).with_capacity(3),
            shift("c", 26, 14, 18).with_capacity(3),
            shift("d", 27, 8, 12).with_capacity(10),
        ];
        let by_id: HashMap<&str, &Shift> = shifts.iter().map(|s| (s.id.as_str(), s)).collect();

        let outcome = RosterOptimizer::default().run(&members, &shifts);
        for s in &shifts {
            assert!(outcome.occupancy(&s.id) <= s.capacity);
        }
        for m in &members {
            let held = outcome.assignments_for_member(&m.id);
            for (i, x) in held.iter().enumerate() {
                for y in &held[i + 1..] {
                    assert!(!windows_conflict(
                        by_id[x.shift_id.as_str()],
                        by_id[y.shift_id.as_str()]
                    ));
                }
            }
        }
        assert_eq!(outcome.occupancy("d"), 5);
    }

    #[test]
    fn test_unknown_preference_is_skipped() {
        let members = vec![member("A", ExperienceLevel::Junior, "F").with_preference("ghost", 1)];
        let shifts = vec![shift("X", 26, 8, 12).with_capacity(1)];

        let outcome = RosterOptimizer::default().run(&members, &shifts);
        assert_eq!(outcome.assignment_count(), 1);
        assert!(outcome.explanation_for("A", "X").unwrap().contains("algorithm score"));
    }

    #[test]
    fn test_low_ranked_preference_loses_to_unlisted_member() {
        // Ten unknown shifts push X out of A's seeded preferences.
        let mut a = member("A", ExperienceLevel::Junior, "F");
        for rank in 1..=10u32 {
            a = a.with_preference(format!("ghost{rank}"), rank);
        }
        let members = vec![
            a.with_preference("X", 11),
            member("B", ExperienceLevel::Junior, "F"),
        ];
        let shifts = vec![shift("X", 26, 8, 12).with_capacity(1)];

        let outcome = RosterOptimizer::default().run(&members, &shifts);
        assert_eq!(outcome.assignments_for_shift("X")[0].member_id, "B");
        let b = outcome.score_for("B", "X").unwrap();
        assert!((b.preference_match - 0.0).abs() < 1e-10);
        // 12.5 + 15 + 5; A carries -35 from the rank-11 preference
        assert!((b.overall - 32.5).abs() < 1e-10);
    }

    #[test]
    fn test_refused_commit_is_not_recorded() {
        let members = vec![member("A", ExperienceLevel::Junior, "F")];
        let shifts = vec![shift("X", 26, 8, 12).with_capacity(2)];
        let mut run = Run::new(&members, &shifts, EventConfig::new().effective_weights());

        assert!(run.commit(&members[0], &shifts[0]));
        assert!(!run.commit(&members[0], &shifts[0]));
        assert_eq!(run.state.occupancy("X"), 1);
        assert_eq!(run.state.member_shifts("A").len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let outcome = RosterOptimizer::default().run(&[], &[]);
        assert_eq!(outcome.assignment_count(), 0);
        assert!(!outcome.has_violations());
    }

    #[test]
    fn test_every_assignment_has_score_and_explanation() {
        let members = vec![
            member("A", ExperienceLevel::Senior, "F").with_preference("X", 2),
            member("B", ExperienceLevel::Junior, "M"),
        ];
        let shifts = vec![shift("X", 26, 8, 12), shift("Y", 27, 8, 12)];

        let outcome = RosterOptimizer::default().run(&members, &shifts);
        for a in &outcome.assignments {
            assert!(outcome.score_for(&a.member_id, &a.shift_id).is_some());
            assert!(outcome.explanation_for(&a.member_id, &a.shift_id).is_some());
        }
    }
}
