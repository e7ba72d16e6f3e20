//! Nutrition computation engine
//!
//! Pure functions over profiles and diary data: daily goal derivation,
//! per-100g portion scaling, diary aggregation, and the weekly calorie
//! series. Nothing in this module touches storage or the network; every
//! failure is a synchronous [`ValidationError`].

pub mod goals;
pub mod progress;
pub mod scaling;

use thiserror::Error;

pub use goals::{
    compute_goals, ActivityLevel, BmiCategory, Gender, GoalInput, Goals, HealthGoal,
    FIBER_GOAL_G, WATER_GOAL_ML,
};
pub use progress::{aggregate, build_weekly_series, percent_of, ProgressReport, WeeklyPoint};
pub use scaling::{scale_to_weight, validate_weight};

/// Invalid input to an engine operation.
///
/// Every malformed, missing, or out-of-range argument surfaces as this
/// one kind; callers recover by supplying corrected input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    Missing(&'static str),

    #[error("{0} must be a positive number")]
    NonPositive(&'static str),

    #[error("unknown {field} value: {value}")]
    UnknownValue { field: &'static str, value: String },
}
