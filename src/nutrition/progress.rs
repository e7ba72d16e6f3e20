//! Diary aggregation
//!
//! Daily totals, clamped goal-progress percentages, and the weekly
//! calorie series.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;

use crate::models::NutrientProfile;

use super::goals::Goals;

/// Percent of goal reached per tracked nutrient, clamped to 100
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalPercent {
    pub calories: u8,
    pub protein: u8,
    pub fiber: u8,
}

/// Whether the day's total went past each goal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalExceeded {
    pub calories: bool,
    pub protein: bool,
    pub fiber: bool,
}

/// Aggregated diary state for one day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressReport {
    pub totals: NutrientProfile,
    pub percent: GoalPercent,
    pub exceeded: GoalExceeded,
}

/// One day of the weekly calorie series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyPoint {
    /// ISO date: "2025-01-09"
    pub date: String,
    /// Weekday label for the chart axis
    pub label: &'static str,
    pub calories: f64,
}

/// Percent of goal reached, rounded then clamped to 100.
/// A zero or absent goal reports zero progress, never a division error.
pub fn percent_of(total: f64, goal: f64) -> u8 {
    if goal > 0.0 {
        (100.0 * total / goal).round().min(100.0) as u8
    } else {
        0
    }
}

/// Sum consumed nutrition across diary entries and compare against the
/// goals. Overshooting a goal clamps the percentage at 100 and sets the
/// `exceeded` flag instead.
pub fn aggregate<'a, I>(entries: I, goals: &Goals) -> ProgressReport
where
    I: IntoIterator<Item = &'a NutrientProfile>,
{
    let totals: NutrientProfile = entries.into_iter().cloned().sum();

    let calorie_goal = f64::from(goals.daily_calories);
    let protein_goal = f64::from(goals.protein_goal);
    let fiber_goal = f64::from(goals.fiber_goal);

    ProgressReport {
        percent: GoalPercent {
            calories: percent_of(totals.calories, calorie_goal),
            protein: percent_of(totals.protein, protein_goal),
            fiber: percent_of(totals.fiber, fiber_goal),
        },
        exceeded: GoalExceeded {
            calories: totals.calories > calorie_goal,
            protein: totals.protein > protein_goal,
            fiber: totals.fiber > fiber_goal,
        },
        totals,
    }
}

fn weekday_abbrev(date: &NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Build the seven-day calorie series ending at `today`, oldest first.
///
/// The caller supplies per-day totals keyed by ISO date; dates missing
/// from the map report zero calories.
pub fn build_weekly_series(
    calories_by_date: &BTreeMap<String, f64>,
    today: NaiveDate,
) -> Vec<WeeklyPoint> {
    (0i64..7)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            let key = date.format("%Y-%m-%d").to_string();
            WeeklyPoint {
                label: weekday_abbrev(&date),
                calories: calories_by_date.get(&key).copied().unwrap_or(0.0),
                date: key,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::goals::{
        compute_goals, ActivityLevel, Gender, GoalInput, HealthGoal,
    };

    fn test_goals() -> Goals {
        compute_goals(&GoalInput {
            age: 30,
            gender: Gender::Male,
            height_cm: 175.0,
            weight_kg: 70.0,
            activity_level: ActivityLevel::Moderate,
            health_goal: HealthGoal::Maintain,
        })
        .unwrap()
    }

    fn meal(calories: f64, protein: f64, fiber: f64) -> NutrientProfile {
        NutrientProfile {
            calories,
            protein,
            fiber,
            ..NutrientProfile::zero()
        }
    }

    #[test]
    fn test_empty_diary() {
        let entries: Vec<NutrientProfile> = Vec::new();
        let report = aggregate(entries.iter(), &test_goals());
        assert_eq!(report.totals, NutrientProfile::zero());
        assert_eq!(report.percent.calories, 0);
        assert_eq!(report.percent.protein, 0);
        assert_eq!(report.percent.fiber, 0);
        assert!(!report.exceeded.calories);
        assert!(!report.exceeded.protein);
        assert!(!report.exceeded.fiber);
    }

    #[test]
    fn test_partial_progress() {
        let entries = [meal(650.0, 41.0, 5.0), meal(663.0, 41.0, 7.5)];
        let report = aggregate(entries.iter(), &test_goals());
        assert_eq!(report.totals.calories, 1313.0);
        // 1313 / 2626 = 50%
        assert_eq!(report.percent.calories, 50);
        // 82 / 164 = 50%
        assert_eq!(report.percent.protein, 50);
        // 12.5 / 25 = 50%
        assert_eq!(report.percent.fiber, 50);
        assert!(!report.exceeded.calories);
    }

    #[test]
    fn test_percent_clamped_and_exceeded_flagged() {
        let entries = [meal(3000.0, 200.0, 30.0)];
        let report = aggregate(entries.iter(), &test_goals());
        assert_eq!(report.percent.calories, 100);
        assert_eq!(report.percent.protein, 100);
        assert_eq!(report.percent.fiber, 100);
        assert!(report.exceeded.calories);
        assert!(report.exceeded.protein);
        assert!(report.exceeded.fiber);
    }

    #[test]
    fn test_exact_goal_is_not_exceeded() {
        let entries = [meal(2626.0, 164.0, 25.0)];
        let report = aggregate(entries.iter(), &test_goals());
        assert_eq!(report.percent.calories, 100);
        assert!(!report.exceeded.calories);
        assert!(!report.exceeded.protein);
        assert!(!report.exceeded.fiber);
    }

    #[test]
    fn test_percent_of_zero_goal() {
        assert_eq!(percent_of(500.0, 0.0), 0);
    }

    #[test]
    fn test_weekly_series_shape() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
        let mut by_date = BTreeMap::new();
        by_date.insert("2025-01-09".to_string(), 1800.0);
        by_date.insert("2025-01-07".to_string(), 2100.0);
        // A stale date outside the window is ignored
        by_date.insert("2024-12-25".to_string(), 9000.0);

        let series = build_weekly_series(&by_date, today);
        assert_eq!(series.len(), 7);
        assert_eq!(series[0].date, "2025-01-03");
        assert_eq!(series[6].date, "2025-01-09");
        assert_eq!(series[6].calories, 1800.0);
        assert_eq!(series[4].calories, 2100.0);
        // Days with no logged entries report zero
        assert_eq!(series[0].calories, 0.0);
        assert_eq!(series[5].calories, 0.0);
    }

    #[test]
    fn test_weekly_series_labels() {
        // 2025-01-09 is a Thursday
        let today = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
        let series = build_weekly_series(&BTreeMap::new(), today);
        assert_eq!(series[0].label, "Fri");
        assert_eq!(series[6].label, "Thu");
    }
}
