//! Day and diary entry MCP tools
//!
//! Logging food, correcting portion weights, water intake, and day
//! views.

use chrono::NaiveDate;
use serde::Serialize;

use crate::db::Database;
use crate::models::{
    recalculate_day_totals, Day, DiaryEntry, DiaryEntryCreate, Food, NutrientProfile, Profile,
    WeightUpdate,
};
use crate::nutrition::{self, ValidationError, WATER_GOAL_ML};

use super::foods::check_non_negative;

/// Today's local calendar date as an ISO date string
pub(crate) fn today_local() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Resolve an optional date parameter, validating the format
pub(crate) fn resolve_date(date: Option<&str>) -> Result<String, String> {
    let date = match date {
        Some(date) => date.trim().to_string(),
        None => today_local(),
    };
    NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD", date))?;
    Ok(date)
}

/// Diary entry as presented to the caller
#[derive(Debug, Serialize)]
pub struct EntrySummary {
    pub id: i64,
    pub food_name: String,
    pub estimated_weight: f64,
    /// Whether the portion weight can still be corrected
    pub rescalable: bool,
    pub nutrition: NutrientProfile,
    pub logged_at: String,
}

impl From<DiaryEntry> for EntrySummary {
    fn from(entry: DiaryEntry) -> Self {
        Self {
            id: entry.id,
            food_name: entry.food_name,
            estimated_weight: entry.estimated_weight,
            rescalable: entry.standard_nutrition.is_some(),
            nutrition: entry.nutrition,
            logged_at: entry.logged_at,
        }
    }
}

/// Response for log_food
#[derive(Debug, Serialize)]
pub struct LogFoodResponse {
    pub entry: EntrySummary,
    pub date: String,
    pub day_totals: NutrientProfile,
}

/// Response for update_entry_weight
#[derive(Debug, Serialize)]
pub struct UpdateEntryWeightResponse {
    pub entry: EntrySummary,
    pub day_totals: NutrientProfile,
}

/// Day with entries for detailed view
#[derive(Debug, Serialize)]
pub struct DayDetail {
    pub id: i64,
    pub date: String,
    pub entries: Vec<EntrySummary>,
    pub nutrition_total: NutrientProfile,
    pub water_ml: f64,
}

/// Day summary for listing
#[derive(Debug, Serialize)]
pub struct DaySummary {
    pub id: i64,
    pub date: String,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    pub water_ml: f64,
    pub entry_count: usize,
}

/// Response for list_days
#[derive(Debug, Serialize)]
pub struct ListDaysResponse {
    pub days: Vec<DaySummary>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Response for log_water
#[derive(Debug, Serialize)]
pub struct LogWaterResponse {
    pub date: String,
    pub water_ml: f64,
    pub water_goal: u32,
    pub percent: u8,
    pub sufficient: bool,
}

/// Response for recalculate_day
#[derive(Debug, Serialize)]
pub struct RecalculateDayResponse {
    pub day_id: i64,
    pub date: String,
    pub nutrition: NutrientProfile,
}

// ============================================================================
// Diary Entry Tools
// ============================================================================

/// Log a food into the diary.
///
/// `nutrition` is interpreted per 100 g and scaled to `weight_grams`
/// (the baseline is retained for later corrections), unless `absolute`
/// is set, in which case the values are stored as the whole consumed
/// portion and the entry is not rescalable. With no nutrition given,
/// the per-100g values are resolved from the food catalog.
pub fn log_food(
    db: &Database,
    date: Option<&str>,
    food_name: &str,
    weight_grams: Option<f64>,
    nutrition: Option<NutrientProfile>,
    absolute: bool,
) -> Result<LogFoodResponse, String> {
    let food_name = food_name.trim();
    if food_name.is_empty() {
        return Err(ValidationError::Missing("food_name").to_string());
    }

    // Weight defaults to the 100 g reference portion when unknown
    let weight = weight_grams.unwrap_or(100.0);
    nutrition::validate_weight(weight).map_err(|e| e.to_string())?;

    if let Some(ref values) = nutrition {
        check_non_negative(values)?;
    }

    let date = resolve_date(date)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let (consumed, standard) = if absolute {
        // Direct detector estimate: stored as-is, no baseline to rescale from
        let values = nutrition
            .ok_or_else(|| "Absolute entries require nutrition values".to_string())?;
        (values.rounded_for_storage(), None)
    } else {
        let standard = match nutrition {
            Some(values) => values,
            None => Food::lookup(&conn, food_name)
                .map_err(|e| format!("Database error looking up food: {}", e))?
                .map(|food| food.nutrition)
                .ok_or_else(|| {
                    format!(
                        "'{}' is not in the food catalog; provide per-100g nutrition values",
                        food_name
                    )
                })?,
        };
        let consumed =
            nutrition::scale_to_weight(&standard, weight).map_err(|e| e.to_string())?;
        (consumed, Some(standard))
    };

    let day = Day::get_or_create(&conn, &date)
        .map_err(|e| format!("Failed to get/create day: {}", e))?;

    let entry = DiaryEntry::create(
        &conn,
        &DiaryEntryCreate {
            day_id: day.id,
            food_name: food_name.to_string(),
            estimated_weight: weight,
            nutrition: consumed,
            standard_nutrition: standard,
        },
    )
    .map_err(|e| format!("Failed to log food: {}", e))?;

    let day = Day::get_by_id(&conn, day.id)
        .map_err(|e| format!("Failed to reload day: {}", e))?
        .ok_or_else(|| "Day disappeared during logging".to_string())?;

    Ok(LogFoodResponse {
        entry: entry.into(),
        date: day.date,
        day_totals: day.cached_nutrition,
    })
}

/// Correct an entry's portion weight from its retained baseline
pub fn update_entry_weight(
    db: &Database,
    id: i64,
    weight_grams: f64,
) -> Result<Option<UpdateEntryWeightResponse>, String> {
    nutrition::validate_weight(weight_grams).map_err(|e| e.to_string())?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    match DiaryEntry::set_weight(&conn, id, weight_grams)
        .map_err(|e| format!("Failed to update entry: {}", e))?
    {
        WeightUpdate::Updated(entry) => {
            let day = Day::get_by_id(&conn, entry.day_id)
                .map_err(|e| format!("Failed to reload day: {}", e))?
                .ok_or_else(|| "Day not found for entry".to_string())?;
            Ok(Some(UpdateEntryWeightResponse {
                entry: entry.into(),
                day_totals: day.cached_nutrition,
            }))
        }
        WeightUpdate::NotFound => Ok(None),
        WeightUpdate::NotRescalable(entry) => Err(format!(
            "Entry {} ('{}') has no per-100g baseline and cannot be rescaled; \
             delete it and log the food again",
            entry.id, entry.food_name
        )),
    }
}

/// Delete a diary entry
pub fn delete_entry(db: &Database, id: i64) -> Result<bool, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    DiaryEntry::delete(&conn, id).map_err(|e| format!("Failed to delete entry: {}", e))
}

// ============================================================================
// Day Tools
// ============================================================================

/// Get a day with its entries and totals
pub fn get_day(db: &Database, date: Option<&str>) -> Result<Option<DayDetail>, String> {
    let date = resolve_date(date)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let day = Day::get_by_date(&conn, &date).map_err(|e| format!("Failed to get day: {}", e))?;

    match day {
        Some(day) => {
            let entries = DiaryEntry::get_for_day(&conn, day.id)
                .map_err(|e| format!("Failed to get entries: {}", e))?;

            Ok(Some(DayDetail {
                id: day.id,
                date: day.date,
                entries: entries.into_iter().map(EntrySummary::from).collect(),
                nutrition_total: day.cached_nutrition,
                water_ml: day.water_ml,
            }))
        }
        None => Ok(None),
    }
}

/// List days with optional date range
pub fn list_days(
    db: &Database,
    start_date: Option<&str>,
    end_date: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<ListDaysResponse, String> {
    let limit = limit.clamp(1, 200);
    let offset = offset.max(0);

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let days = Day::list(&conn, start_date, end_date, limit, offset)
        .map_err(|e| format!("Failed to list days: {}", e))?;

    let total = Day::count(&conn, start_date, end_date)
        .map_err(|e| format!("Failed to count days: {}", e))?;

    let mut summaries = Vec::new();
    for day in days {
        let entries = DiaryEntry::get_for_day(&conn, day.id)
            .map_err(|e| format!("Failed to get entries: {}", e))?;

        summaries.push(DaySummary {
            id: day.id,
            date: day.date,
            total_calories: day.cached_nutrition.calories,
            total_protein: day.cached_nutrition.protein,
            total_carbs: day.cached_nutrition.carbs,
            total_fat: day.cached_nutrition.fat,
            water_ml: day.water_ml,
            entry_count: entries.len(),
        });
    }

    Ok(ListDaysResponse {
        days: summaries,
        total,
        limit,
        offset,
    })
}

/// Log water intake for a day
pub fn log_water(
    db: &Database,
    date: Option<&str>,
    amount_ml: f64,
) -> Result<LogWaterResponse, String> {
    if !amount_ml.is_finite() || amount_ml <= 0.0 {
        return Err("amount_ml must be a positive number".to_string());
    }

    let date = resolve_date(date)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let day = Day::get_or_create(&conn, &date)
        .map_err(|e| format!("Failed to get/create day: {}", e))?;

    let total = Day::add_water(&conn, day.id, amount_ml)
        .map_err(|e| format!("Failed to log water: {}", e))?;

    let water_goal = Profile::get(&conn)
        .map_err(|e| format!("Failed to get profile: {}", e))?
        .map(|p| p.water_goal)
        .unwrap_or(WATER_GOAL_ML);

    Ok(LogWaterResponse {
        date,
        water_ml: total,
        water_goal,
        percent: nutrition::percent_of(total, f64::from(water_goal)),
        sufficient: total >= f64::from(water_goal),
    })
}

/// Force recalculate cached nutrition totals for a day
pub fn recalculate_day(db: &Database, date: &str) -> Result<RecalculateDayResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let day = Day::get_by_date(&conn, date)
        .map_err(|e| format!("Failed to get day: {}", e))?
        .ok_or_else(|| format!("Day not found: {}", date))?;

    let nutrition = recalculate_day_totals(&conn, day.id)
        .map_err(|e| format!("Failed to recalculate totals: {}", e))?;

    Ok(RecalculateDayResponse {
        day_id: day.id,
        date: day.date,
        nutrition,
    })
}
