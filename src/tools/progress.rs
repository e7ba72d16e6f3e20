//! Progress reporting MCP tools
//!
//! Daily goal progress and the weekly calorie series.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::db::Database;
use crate::models::{Day, DiaryEntry, Profile};
use crate::nutrition::{self, Goals, ProgressReport, WeeklyPoint};

use super::days::resolve_date;

/// Water progress for the day
#[derive(Debug, Serialize)]
pub struct WaterProgress {
    pub total_ml: f64,
    pub goal_ml: u32,
    pub percent: u8,
    pub exceeded: bool,
}

/// Response for daily_progress
#[derive(Debug, Serialize)]
pub struct DailyProgressResponse {
    pub date: String,
    #[serde(flatten)]
    pub report: ProgressReport,
    pub water: WaterProgress,
    pub goals: Goals,
}

/// Response for weekly_report
#[derive(Debug, Serialize)]
pub struct WeeklyReportResponse {
    pub start_date: String,
    pub end_date: String,
    pub series: Vec<WeeklyPoint>,
}

/// Aggregate one day's diary against the stored goals
pub fn daily_progress(db: &Database, date: Option<&str>) -> Result<DailyProgressResponse, String> {
    let date = resolve_date(date)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let profile = Profile::get(&conn)
        .map_err(|e| format!("Failed to get profile: {}", e))?
        .ok_or_else(|| "No profile set; call set_profile first".to_string())?;

    let goals = nutrition::compute_goals(&profile.goal_input()).map_err(|e| e.to_string())?;

    let day = Day::get_by_date(&conn, &date).map_err(|e| format!("Failed to get day: {}", e))?;

    let (entries, water_ml) = match &day {
        Some(day) => (
            DiaryEntry::get_for_day(&conn, day.id)
                .map_err(|e| format!("Failed to get entries: {}", e))?,
            day.water_ml,
        ),
        // A day with no record yet reports zero progress, not an error
        None => (Vec::new(), 0.0),
    };

    let report = nutrition::aggregate(entries.iter().map(|e| &e.nutrition), &goals);

    let water = WaterProgress {
        total_ml: water_ml,
        goal_ml: goals.water_goal,
        percent: nutrition::percent_of(water_ml, f64::from(goals.water_goal)),
        exceeded: water_ml > f64::from(goals.water_goal),
    };

    Ok(DailyProgressResponse {
        date,
        report,
        water,
        goals,
    })
}

/// Seven-day calorie series ending at `end_date` (default today)
pub fn weekly_report(db: &Database, end_date: Option<&str>) -> Result<WeeklyReportResponse, String> {
    let end_date = resolve_date(end_date)?;
    let today = NaiveDate::parse_from_str(&end_date, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD", end_date))?;
    let start = today - Duration::days(6);
    let start_date = start.format("%Y-%m-%d").to_string();

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let days = Day::list(&conn, Some(&start_date), Some(&end_date), 7, 0)
        .map_err(|e| format!("Failed to list days: {}", e))?;

    let calories_by_date: BTreeMap<String, f64> = days
        .into_iter()
        .map(|day| (day.date, day.cached_nutrition.calories))
        .collect();

    Ok(WeeklyReportResponse {
        series: nutrition::build_weekly_series(&calories_by_date, today),
        start_date,
        end_date,
    })
}
