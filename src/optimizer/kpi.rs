//! Roster quality metrics (KPIs).
//!
//! Computes coverage and fairness indicators from a finished roster and
//! its inputs.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Fill rate | Filled seats / total seats |
//! | Core fill rate | Same, restricted to core shifts |
//! | Short-staffed | Shifts below capacity |
//! | Unmet quotas | Role headcount still missing per shift |
//! | Staffed hours | Sum of shift lengths over all assignments |
//! | Preference hit rate | Assignments matching a stated preference |
//! | Workload spread | Min / max / mean shifts per member |
//! | Below floor | Members short of the core-shift minimum |

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use super::RosterOutcome;
use crate::config::EventConfig;
use crate::constraints::check_minimum_shifts;
use crate::models::{AllocationState, Member, Role, Shift};

/// Role headcount a shift is still missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmetQuota {
    /// Shift ID.
    pub shift_id: String,
    /// Under-staffed role.
    pub role: Role,
    /// Missing headcount.
    pub missing: usize,
}

/// Roster performance indicators.
#[derive(Debug, Clone, Serialize)]
pub struct RosterKpi {
    /// Sum of shift capacities.
    pub total_slots: usize,
    /// Committed assignments.
    pub filled_slots: usize,
    /// Fraction of seats filled (0.0..=1.0). 1.0 when there are no seats.
    pub fill_rate: f64,
    /// Fill rate over core shifts only.
    pub core_fill_rate: f64,
    /// Shifts below capacity, in input order.
    pub short_staffed: Vec<String>,
    /// Sum of all role quotas.
    pub required_headcount: usize,
    /// Role quotas not met.
    pub unmet_quotas: Vec<UnmetQuota>,
    /// Person-hours covered by the roster.
    pub staffed_hours: f64,
    /// Fraction of assignments on a shift the member asked for.
    pub preference_hit_rate: f64,
    /// Shifts held per member.
    pub workload_by_member: BTreeMap<String, usize>,
    /// Fewest shifts held by any member.
    pub min_workload: usize,
    /// Most shifts held by any member.
    pub max_workload: usize,
    /// Mean shifts per member.
    pub mean_workload: f64,
    /// Members below the participation floor.
    pub members_below_minimum: usize,
}

impl RosterKpi {
    /// Computes KPIs from an outcome and its inputs.
    ///
    /// # Arguments
    /// * `outcome` - Result of a run, possibly edited afterwards.
    /// * `members` - Input members (for preferences and the floor).
    /// * `shifts` - Input shifts (for capacity and quotas).
    /// * `config` - Event settings (core shifts, floor).
    pub fn calculate(
        outcome: &RosterOutcome,
        members: &[Member],
        shifts: &[Shift],
        config: &EventConfig,
    ) -> Self {
        let mut state = AllocationState::new(members, shifts);
        for a in &outcome.assignments {
            state.commit(a.clone());
        }
        let core_shifts = config.core_shift_ids(shifts);

        let mut total_slots = 0;
        let mut filled_slots = 0;
        let mut core_slots = 0;
        let mut core_filled = 0;
        let mut short_staffed = Vec::new();
        let mut required_headcount = 0;
        let mut unmet_quotas = Vec::new();
        let mut staffed_minutes = 0i64;

        for shift in shifts {
            let occupied = state.occupancy(&shift.id);
            total_slots += shift.capacity;
            filled_slots += occupied.min(shift.capacity);
            if core_shifts.contains(&shift.id) {
                core_slots += shift.capacity;
                core_filled += occupied.min(shift.capacity);
            }
            if occupied < shift.capacity {
                short_staffed.push(shift.id.clone());
            }
            staffed_minutes += shift.duration().num_minutes() * occupied as i64;
            required_headcount += shift.required_headcount();
            for quota in &shift.required_roles {
                let held = state.role_count(&shift.id, &quota.role);
                if held < quota.count {
                    unmet_quotas.push(UnmetQuota {
                        shift_id: shift.id.clone(),
                        role: quota.role.clone(),
                        missing: quota.count - held,
                    });
                }
            }
        }

        let by_id: HashMap<&str, &Member> = members.iter().map(|m| (m.id.as_str(), m)).collect();
        let hits = outcome
            .assignments
            .iter()
            .filter(|a| {
                by_id
                    .get(a.member_id.as_str())
                    .is_some_and(|m| m.priority_for(&a.shift_id).is_some())
            })
            .count();
        let preference_hit_rate = ratio(hits, outcome.assignments.len(), 0.0);

        let workload_by_member: BTreeMap<String, usize> = members
            .iter()
            .map(|m| (m.id.clone(), state.member_shifts(&m.id).len()))
            .collect();
        let min_workload = workload_by_member.values().copied().min().unwrap_or(0);
        let max_workload = workload_by_member.values().copied().max().unwrap_or(0);

        let members_below_minimum = members
            .iter()
            .filter(|m| {
                check_minimum_shifts(&m.id, &state, &core_shifts, config.min_shifts_per_person)
                    .is_some()
            })
            .count();

        Self {
            total_slots,
            filled_slots,
            fill_rate: ratio(filled_slots, total_slots, 1.0),
            core_fill_rate: ratio(core_filled, core_slots, 1.0),
            short_staffed,
            required_headcount,
            unmet_quotas,
            staffed_hours: staffed_minutes as f64 / 60.0,
            preference_hit_rate,
            workload_by_member,
            min_workload,
            max_workload,
            mean_workload: state.mean_workload(),
            members_below_minimum,
        }
    }

    /// Whether every seat is filled and every quota met.
    pub fn fully_staffed(&self) -> bool {
        self.short_staffed.is_empty() && self.unmet_quotas.is_empty()
    }
}

fn ratio(part: usize, whole: usize, empty: f64) -> f64 {
    if whole == 0 {
        empty
    } else {
        part as f64 / whole as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Assignment, ExperienceLevel, ShiftPriority};
    use chrono::{DateTime, TimeZone, Utc};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, day, hour, 0, 0).unwrap()
    }

    fn fixture() -> (Vec<Member>, Vec<Shift>) {
        let members = vec![
            Member::new("a", ExperienceLevel::Senior, "F").with_preference("core", 1),
            Member::new("b", ExperienceLevel::Junior, "M"),
            Member::new("c", ExperienceLevel::Junior, "M"),
        ];
        let shifts = vec![
            Shift::new("core", at(26, 8), at(26, 12))
                .with_capacity(2)
                .with_role(Role::ShiftLead, 1),
            Shift::new("buffer", at(27, 8), at(27, 12))
                .with_capacity(2)
                .with_priority(ShiftPriority::Buffer),
        ];
        (members, shifts)
    }

    #[test]
    fn test_kpi_basic() {
        let (members, shifts) = fixture();
        let outcome = RosterOutcome {
            assignments: vec![
                Assignment::new("core", "a", Role::TeamMember),
                Assignment::new("core", "b", Role::TeamMember),
                Assignment::new("buffer", "a", Role::TeamMember),
            ],
            ..Default::default()
        };

        let config = EventConfig::new().with_min_shifts(1);
        let kpi = RosterKpi::calculate(&outcome, &members, &shifts, &config);
        assert_eq!(kpi.total_slots, 4);
        assert_eq!(kpi.filled_slots, 3);
        assert!((kpi.fill_rate - 0.75).abs() < 1e-10);
        assert!((kpi.core_fill_rate - 1.0).abs() < 1e-10);
        assert_eq!(kpi.short_staffed, vec!["buffer".to_string()]);
        assert_eq!(kpi.required_headcount, 1);
        // three assignments of four hours
        assert!((kpi.staffed_hours - 12.0).abs() < 1e-10);
        assert_eq!(
            kpi.unmet_quotas,
            vec![UnmetQuota {
                shift_id: "core".into(),
                role: Role::ShiftLead,
                missing: 1,
            }]
        );
        // a on "core" is the only preference hit
        assert!((kpi.preference_hit_rate - 1.0 / 3.0).abs() < 1e-10);
        assert_eq!(kpi.workload_by_member["a"], 2);
        assert_eq!(kpi.min_workload, 0);
        assert_eq!(kpi.max_workload, 2);
        assert!((kpi.mean_workload - 1.0).abs() < 1e-10);
        // c holds nothing
        assert_eq!(kpi.members_below_minimum, 1);
        assert!(!kpi.fully_staffed());
    }

    #[test]
    fn test_kpi_empty() {
        let kpi = RosterKpi::calculate(&RosterOutcome::default(), &[], &[], &EventConfig::new());
        assert_eq!(kpi.total_slots, 0);
        assert_eq!(kpi.required_headcount, 0);
        assert!((kpi.staffed_hours - 0.0).abs() < 1e-10);
        assert!((kpi.fill_rate - 1.0).abs() < 1e-10);
        assert!((kpi.preference_hit_rate - 0.0).abs() < 1e-10);
        assert!((kpi.mean_workload - 0.0).abs() < 1e-10);
        assert!(kpi.fully_staffed());
    }

    #[test]
    fn test_kpi_after_run() {
        let (members, shifts) = fixture();
        let config = EventConfig::new().with_min_shifts(0);
        let outcome = crate::optimizer::RosterOptimizer::new(config.clone()).run(&members, &shifts);

        let kpi = RosterKpi::calculate(&outcome, &members, &shifts, &config);
        assert_eq!(kpi.filled_slots, 4);
        assert!(kpi.short_staffed.is_empty());
        assert!(kpi.unmet_quotas.is_empty());
        assert_eq!(kpi.members_below_minimum, 0);
    }
}
