//! Constraint violation records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A constraint violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Which constraint was broken.
    pub kind: ViolationKind,
    /// Human-readable description.
    pub message: String,
    /// How binding the constraint is.
    pub severity: Severity,
}

/// Classification of constraint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    /// Member's shifts intersect or sit closer than the buffer.
    ShiftOverlap,
    /// Shift already holds as many occupants as it allows.
    ShiftCapacity,
    /// Member holds fewer core shifts than the floor.
    MinimumShifts,
    /// Group labels on a shift are outside the tolerated split.
    GroupBalance,
}

/// Violation severity.
///
/// Every check in this crate currently reports `Hard`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The constraint is genuinely broken.
    #[default]
    Hard,
    /// Undesirable but acceptable.
    Soft,
}

impl Violation {
    /// Creates a hard violation.
    pub fn hard(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            severity: Severity::Hard,
        }
    }

    /// Whether this violation is hard.
    pub fn is_hard(&self) -> bool {
        self.severity == Severity::Hard
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hard_factory() {
        let v = Violation::hard(ViolationKind::ShiftCapacity, "full");
        assert_eq!(v.kind, ViolationKind::ShiftCapacity);
        assert!(v.is_hard());
        assert_eq!(v.to_string(), "full");
    }
}
