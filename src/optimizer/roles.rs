//! Role resolution for a new occupant.

use crate::models::{Assignment, Role, RoleQuota};

/// Role given when every quota is already met.
pub const FALLBACK_ROLE: Role = Role::TeamMember;

/// Picks the role for the next occupant of a shift.
///
/// Scans `quotas` in listed order and returns the first role whose
/// committed headcount among `occupants` is below its quota. Falls back
/// to [`FALLBACK_ROLE`] when none is open.
pub fn resolve_role(quotas: &[RoleQuota], occupants: &[Assignment]) -> Role {
    quotas
        .iter()
        .find(|q| occupants.iter().filter(|a| a.role == q.role).count() < q.count)
        .map(|q| q.role.clone())
        .unwrap_or(FALLBACK_ROLE)
}
