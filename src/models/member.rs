//! Member (crew) model.
//!
//! A member is a person who can be rostered onto shifts. Members carry
//! an experience tier, a binary group label used by the balance
//! constraint, and a ranked list of shift preferences.

use serde::{Deserialize, Serialize};

/// Ordered experience tier.
///
/// `Junior < Intermediate < Senior`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExperienceLevel {
    /// New to the crew.
    Junior,
    /// Has worked previous events.
    Intermediate,
    /// Veteran; usually eligible to lead.
    Senior,
}

impl ExperienceLevel {
    /// All tiers in ascending order.
    pub const ALL: [ExperienceLevel; 3] = [
        ExperienceLevel::Junior,
        ExperienceLevel::Intermediate,
        ExperienceLevel::Senior,
    ];
}

/// A ranked shift preference.
///
/// Priority 1 is the most wanted shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preference {
    /// Preferred shift ID.
    pub shift_id: String,
    /// Rank (1 = most wanted).
    pub priority: u32,
}

impl Preference {
    /// Creates a new preference.
    pub fn new(shift_id: impl Into<String>, priority: u32) -> Self {
        Self {
            shift_id: shift_id.into(),
            priority,
        }
    }
}

/// A member that can be assigned to shifts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    /// Unique member identifier.
    pub id: String,
    /// Name shown in reports and violation messages.
    pub display_name: String,
    /// Experience tier.
    pub experience: ExperienceLevel,
    /// Binary group label for the balance constraint.
    pub group: String,
    /// Ranked shift preferences.
    #[serde(default)]
    pub preferences: Vec<Preference>,
    /// Shifts this member was committed to before the run.
    #[serde(default)]
    pub prior_shifts: Vec<String>,
}

impl Member {
    /// Creates a new member. The display name defaults to the ID.
    pub fn new(
        id: impl Into<String>,
        experience: ExperienceLevel,
        group: impl Into<String>,
    ) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            experience,
            group: group.into(),
            preferences: Vec::new(),
            prior_shifts: Vec::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    /// Adds a ranked preference.
    pub fn with_preference(mut self, shift_id: impl Into<String>, priority: u32) -> Self {
        self.preferences.push(Preference::new(shift_id, priority));
        self
    }

    /// Records a prior commitment.
    pub fn with_prior_shift(mut self, shift_id: impl Into<String>) -> Self {
        self.prior_shifts.push(shift_id.into());
        self
    }

    /// Stated priority for a shift, if any.
    ///
    /// When a shift is listed twice the first entry wins.
    pub fn priority_for(&self, shift_id: &str) -> Option<u32> {
        self.preferences
            .iter()
            .find(|p| p.shift_id == shift_id)
            .map(|p| p.priority)
    }

    /// The `limit` most wanted preferences, ascending by priority.
    ///
    /// Ties keep their input order.
    pub fn top_preferences(&self, limit: usize) -> Vec<&Preference> {
        let mut ranked: Vec<&Preference> = self.preferences.iter().collect();
        ranked.sort_by_key(|p| p.priority);
        ranked.truncate(limit);
        ranked
    }
}
