//! Input validation for roster snapshots.
//!
//! The optimizer assumes referential integrity and skips what it can't
//! resolve. Running these checks first surfaces those problems instead.
//! Detects:
//! - Duplicate member and shift IDs
//! - Empty or inverted shift windows
//! - Zero capacity, zero-headcount quotas, out-of-range desirability
//! - Preferences and prior shifts pointing at unknown shifts
//! - More than two group labels (the balance check assumes a binary split)

use crate::models::{Member, Shift};
use std::collections::HashSet;
use std::fmt;

/// Inclusive desirability range.
pub const DESIRABILITY_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A shift ends at or before its start.
    InvalidWindow,
    /// A shift can't hold anyone, or a quota asks for nobody.
    InvalidCapacity,
    /// Desirability outside [`DESIRABILITY_RANGE`].
    InvalidDesirability,
    /// A preference or prior shift references a shift that doesn't exist.
    UnknownShift,
    /// A preference with priority 0, or the same shift ranked twice.
    InvalidPreference,
    /// More than two distinct group labels.
    TooManyGroups,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates the members and shifts of a roster run.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_snapshot(members: &[Member], shifts: &[Shift]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut shift_ids = HashSet::new();
    for shift in shifts {
        if !shift_ids.insert(shift.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate shift ID: {}", shift.id),
            ));
        }
        if shift.end <= shift.start {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidWindow,
                format!("Shift '{}' ends at or before its start", shift.id),
            ));
        }
        if shift.capacity == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCapacity,
                format!("Shift '{}' has zero capacity", shift.id),
            ));
        }
        if !DESIRABILITY_RANGE.contains(&shift.desirability) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDesirability,
                format!(
                    "Shift '{}' has desirability {}, expected 1-5",
                    shift.id, shift.desirability
                ),
            ));
        }
        for quota in &shift.required_roles {
            if quota.count == 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidCapacity,
                    format!("Shift '{}' has a zero headcount quota for {}", shift.id, quota.role),
                ));
            }
        }
    }

    let mut member_ids = HashSet::new();
    let mut groups: Vec<&str> = Vec::new();
    for member in members {
        if !member_ids.insert(member.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate member ID: {}", member.id),
            ));
        }
        if !groups.contains(&member.group.as_str()) {
            groups.push(member.group.as_str());
        }

        let mut ranked = HashSet::new();
        for pref in &member.preferences {
            if !shift_ids.contains(pref.shift_id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownShift,
                    format!(
                        "Member '{}' prefers unknown shift '{}'",
                        member.id, pref.shift_id
                    ),
                ));
            }
            if pref.priority == 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidPreference,
                    format!(
                        "Member '{}' ranks shift '{}' with priority 0",
                        member.id, pref.shift_id
                    ),
                ));
            }
            if !ranked.insert(pref.shift_id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidPreference,
                    format!(
                        "Member '{}' ranks shift '{}' more than once",
                        member.id, pref.shift_id
                    ),
                ));
            }
        }

        for prior in &member.prior_shifts {
            if !shift_ids.contains(prior.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownShift,
                    format!(
                        "Member '{}' has prior assignment to unknown shift '{}'",
                        member.id, prior
                    ),
                ));
            }
        }
    }

    if groups.len() > 2 {
        errors.push(ValidationError::new(
            ValidationErrorKind::TooManyGroups,
            format!(
                "Expected at most 2 group labels, found {}: {}",
                groups.len(),
                groups.join(", ")
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExperienceLevel, Role};
    use chrono::{TimeZone, Utc};

    fn make_shift(id: &str) -> Shift {
        let t0 = Utc.with_ymd_and_hms(2026, 6, 26, 8, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2026, 6, 26, 12, 0, 0).unwrap();
        Shift::new(id, t0, t1)
    }

    fn make_member(id: &str, group: &str) -> Member {
        Member::new(id, ExperienceLevel::Junior, group)
    }

    fn kinds(result: ValidationResult) -> Vec<ValidationErrorKind> {
        result.unwrap_err().into_iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_valid_input() {
        let shifts = vec![make_shift("S1"), make_shift("S2").with_role(Role::ShiftLead, 1)];
        let members = vec![
            make_member("A", "F").with_preference("S1", 1).with_prior_shift("S2"),
            make_member("B", "M"),
        ];
        assert!(validate_snapshot(&members, &shifts).is_ok());
    }

    #[test]
    fn test_empty_input() {
        assert!(validate_snapshot(&[], &[]).is_ok());
    }

    #[test]
    fn test_duplicate_ids() {
        let shifts = vec![make_shift("S1"), make_shift("S1")];
        let members = vec![make_member("A", "F"), make_member("A", "F")];
        let errs = validate_snapshot(&members, &shifts).unwrap_err();
        assert_eq!(errs.len(), 2);
        assert!(errs.iter().all(|e| e.kind == ValidationErrorKind::DuplicateId));
        assert!(errs[0].message.contains("shift"));
        assert!(errs[1].message.contains("member"));
    }

    #[test]
    fn test_inverted_window() {
        let mut s = make_shift("S1");
        s.end = s.start;
        assert_eq!(
            kinds(validate_snapshot(&[], &[s])),
            vec![ValidationErrorKind::InvalidWindow]
        );
    }

    #[test]
    fn test_shift_ranges() {
        let shifts = vec![
            make_shift("S1").with_capacity(0),
            make_shift("S2").with_desirability(6),
            make_shift("S3").with_desirability(0),
            make_shift("S4").with_role(Role::Executive, 0),
        ];
        assert_eq!(
            kinds(validate_snapshot(&[], &shifts)),
            vec![
                ValidationErrorKind::InvalidCapacity,
                ValidationErrorKind::InvalidDesirability,
                ValidationErrorKind::InvalidDesirability,
                ValidationErrorKind::InvalidCapacity,
            ]
        );
    }

    #[test]
    fn test_bad_preferences() {
        let shifts = vec![make_shift("S1")];
        let members = vec![make_member("A", "F")
            .with_preference("S9", 1)
            .with_preference("S1", 0)
            .with_preference("S1", 2)];
        assert_eq!(
            kinds(validate_snapshot(&members, &shifts)),
            vec![
                ValidationErrorKind::UnknownShift,
                ValidationErrorKind::InvalidPreference,
                ValidationErrorKind::InvalidPreference,
            ]
        );
    }

    #[test]
    fn test_unknown_prior_shift() {
        let members = vec![make_member("A", "F").with_prior_shift("gone")];
        let errs = validate_snapshot(&members, &[make_shift("S1")]).unwrap_err();
        assert_eq!(errs[0].kind, ValidationErrorKind::UnknownShift);
        assert!(errs[0].to_string().contains("gone"));
    }

    #[test]
    fn test_too_many_groups() {
        let members = vec![
            make_member("A", "F"),
            make_member("B", "M"),
            make_member("C", "X"),
        ];
        let errs = validate_snapshot(&members, &[]).unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].kind, ValidationErrorKind::TooManyGroups);
        assert!(errs[0].message.ends_with("F, M, X"));
    }

    #[test]
    fn test_multiple_errors() {
        let shifts = vec![make_shift("S1").with_capacity(0), make_shift("S1")];
        let members = vec![make_member("A", "F").with_preference("S2", 1)];
        let errs = validate_snapshot(&members, &shifts).unwrap_err();
        assert_eq!(errs.len(), 3);
    }
}
