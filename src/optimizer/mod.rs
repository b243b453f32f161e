//! Roster optimizer.
//!
//! Turns a member pool and a shift list into a roster in a single,
//! deterministic pass, then audits the result.
//!
//! # Phases
//!
//! | Phase | Drives on | Commits |
//! |-------|-----------|---------|
//! | Preference seeding | Stated preferences | Yes |
//! | Greedy fill | Weighted scores | Yes |
//! | Audit | Finished roster | No (report only) |
//!
//! # Post-run
//! - [`RosterKpi`]: coverage and fairness indicators
//! - [`RosterOutcome::swap`]: manual exchange of two occupants

mod engine;
mod kpi;
mod outcome;
pub mod roles;

pub use engine::{RosterOptimizer, MAX_SEEDED_PREFERENCES};
pub use kpi::{RosterKpi, UnmetQuota};
pub use outcome::{AssignmentKey, RosterOutcome, RosterReport};
pub use roles::resolve_role;
