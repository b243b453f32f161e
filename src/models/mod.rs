//! Rostering domain models.
//!
//! Provides the input types (members, shifts, preferences), the mutable
//! allocation state of a run, and violation records.
//!
//! # Domain Mappings
//!
//! | u-roster | Festival | Hospital | Retail |
//! |----------|----------|----------|--------|
//! | Member | Volunteer | Nurse | Clerk |
//! | Shift | Awareness shift | Ward shift | Store shift |
//! | Role | Team member / lead | Staff / charge nurse | Clerk / supervisor |
//! | Group label | Balance group | Team | Department |

mod allocation;
mod member;
mod shift;
mod snapshot;
mod violation;

pub use allocation::{AllocationState, Assignment, AssignmentSource};
pub use member::{ExperienceLevel, Member, Preference};
pub use shift::{Role, RoleQuota, Shift, ShiftPriority};
pub use snapshot::RosterSnapshot;
pub use violation::{Severity, Violation, ViolationKind};
