//! Shift rostering for event crews.
//!
//! Assigns members to time-boxed shifts in three deterministic phases:
//! preference seeding, greedy score-driven fill, and a constraint audit.
//! Persistence, auth and delivery are left to the caller; this crate
//! takes a snapshot in and hands a roster back.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Member`, `Shift`, `Role`, `Assignment`,
//!   `AllocationState`, `RosterSnapshot`
//! - **`constraints`**: Overlap, capacity, participation and balance checks
//! - **`scoring`**: Four-factor desirability scores
//! - **`optimizer`**: `RosterOptimizer`, outcome, swap and KPIs
//! - **`config`**: TOML-backed event settings and factor weights
//! - **`validation`**: Snapshot integrity checks
//! - **`error`**: Error types
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use u_roster::models::{ExperienceLevel, Member, Shift};
//! use u_roster::optimizer::RosterOptimizer;
//! use u_roster::validation::validate_snapshot;
//!
//! let day = Utc.with_ymd_and_hms(2026, 6, 26, 8, 0, 0).unwrap();
//! let shifts = vec![
//!     Shift::new("morning", day, day + Duration::hours(4)),
//!     Shift::new("evening", day + Duration::hours(6), day + Duration::hours(10)),
//! ];
//! let members = vec![
//!     Member::new("ana", ExperienceLevel::Senior, "F").with_preference("evening", 1),
//!     Member::new("ben", ExperienceLevel::Junior, "M"),
//! ];
//!
//! validate_snapshot(&members, &shifts).unwrap();
//! let outcome = RosterOptimizer::default().run(&members, &shifts);
//! assert_eq!(outcome.assignment_count(), 4);
//! ```

pub mod config;
pub mod constraints;
pub mod error;
pub mod models;
pub mod optimizer;
pub mod scoring;
pub mod validation;
