//! Diary entry model
//!
//! A logged portion of food attached to a day. Entries store the
//! consumed (already scaled) nutrition; entries created from a per-100g
//! baseline also retain that baseline so the portion weight can be
//! corrected later. Entries without a baseline cannot be rescaled.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

use super::{Day, NutrientProfile};

/// A diary entry representing consumed food
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub id: i64,
    pub day_id: i64,
    pub food_name: String,
    /// Portion weight in grams
    pub estimated_weight: f64,
    /// Consumed nutrition, scaled to `estimated_weight`
    pub nutrition: NutrientProfile,
    /// Per-100g baseline; `None` for direct detector estimates
    pub standard_nutrition: Option<NutrientProfile>,
    /// ISO-8601 instant the food was logged
    pub logged_at: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a diary entry
#[derive(Debug, Clone)]
pub struct DiaryEntryCreate {
    pub day_id: i64,
    pub food_name: String,
    pub estimated_weight: f64,
    pub nutrition: NutrientProfile,
    pub standard_nutrition: Option<NutrientProfile>,
}

/// Outcome of a weight correction
#[derive(Debug, Clone)]
pub enum WeightUpdate {
    /// Nutrition re-derived from the retained baseline
    Updated(DiaryEntry),
    /// No entry with that id
    NotFound,
    /// The entry has no per-100g baseline and keeps its stored values
    NotRescalable(DiaryEntry),
}

impl DiaryEntry {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        // Baseline columns are written all-or-nothing; one probe is enough
        let std_calories: Option<f64> = row.get("std_calories")?;
        let standard_nutrition = match std_calories {
            Some(calories) => Some(NutrientProfile {
                calories,
                protein: row.get::<_, Option<f64>>("std_protein")?.unwrap_or(0.0),
                carbs: row.get::<_, Option<f64>>("std_carbs")?.unwrap_or(0.0),
                fat: row.get::<_, Option<f64>>("std_fat")?.unwrap_or(0.0),
                fiber: row.get::<_, Option<f64>>("std_fiber")?.unwrap_or(0.0),
                sugar: row.get::<_, Option<f64>>("std_sugar")?.unwrap_or(0.0),
            }),
            None => None,
        };

        Ok(Self {
            id: row.get("id")?,
            day_id: row.get("day_id")?,
            food_name: row.get("food_name")?,
            estimated_weight: row.get("estimated_weight")?,
            nutrition: NutrientProfile {
                calories: row.get("calories")?,
                protein: row.get("protein")?,
                carbs: row.get("carbs")?,
                fat: row.get("fat")?,
                fiber: row.get("fiber")?,
                sugar: row.get("sugar")?,
            },
            standard_nutrition,
            logged_at: row.get("logged_at")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Create a new diary entry and refresh the day's cached totals
    pub fn create(conn: &Connection, data: &DiaryEntryCreate) -> DbResult<Self> {
        let std = data.standard_nutrition.as_ref();

        conn.execute(
            r#"
            INSERT INTO diary_entries (
                day_id, food_name, estimated_weight,
                calories, protein, carbs, fat, fiber, sugar,
                std_calories, std_protein, std_carbs, std_fat, std_fiber, std_sugar
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            "#,
            params![
                data.day_id,
                data.food_name,
                data.estimated_weight,
                data.nutrition.calories,
                data.nutrition.protein,
                data.nutrition.carbs,
                data.nutrition.fat,
                data.nutrition.fiber,
                data.nutrition.sugar,
                std.map(|n| n.calories),
                std.map(|n| n.protein),
                std.map(|n| n.carbs),
                std.map(|n| n.fat),
                std.map(|n| n.fiber),
                std.map(|n| n.sugar),
            ],
        )?;

        let id = conn.last_insert_rowid();
        let entry = Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })?;

        // Recalculate day totals
        recalculate_day_totals(conn, data.day_id)?;

        Ok(entry)
    }

    /// Get a diary entry by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM diary_entries WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get all diary entries for a day, in insertion order
    pub fn get_for_day(conn: &Connection, day_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt =
            conn.prepare("SELECT * FROM diary_entries WHERE day_id = ?1 ORDER BY id")?;

        let entries = stmt
            .query_map([day_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Correct the portion weight of an entry.
    ///
    /// The consumed nutrition is re-derived from the retained per-100g
    /// baseline. Entries created from a direct detector estimate have no
    /// baseline; they are reported as [`WeightUpdate::NotRescalable`]
    /// and left untouched. The caller validates the weight.
    pub fn set_weight(conn: &Connection, id: i64, new_weight: f64) -> DbResult<WeightUpdate> {
        let entry = match Self::get_by_id(conn, id)? {
            Some(entry) => entry,
            None => return Ok(WeightUpdate::NotFound),
        };

        let standard = match entry.standard_nutrition.as_ref() {
            Some(standard) => standard,
            None => return Ok(WeightUpdate::NotRescalable(entry)),
        };

        let nutrition = standard.scale(new_weight / 100.0).rounded_for_storage();

        conn.execute(
            r#"
            UPDATE diary_entries SET
                estimated_weight = ?1,
                calories = ?2,
                protein = ?3,
                carbs = ?4,
                fat = ?5,
                fiber = ?6,
                sugar = ?7,
                updated_at = datetime('now')
            WHERE id = ?8
            "#,
            params![
                new_weight,
                nutrition.calories,
                nutrition.protein,
                nutrition.carbs,
                nutrition.fat,
                nutrition.fiber,
                nutrition.sugar,
                id,
            ],
        )?;

        // Recalculate day totals
        recalculate_day_totals(conn, entry.day_id)?;

        let updated = Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })?;
        Ok(WeightUpdate::Updated(updated))
    }

    /// Delete a diary entry
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        // Get day_id before delete for recalculation
        let entry = Self::get_by_id(conn, id)?;

        let rows = conn.execute("DELETE FROM diary_entries WHERE id = ?1", [id])?;

        // Recalculate day totals if delete succeeded
        if rows > 0 {
            if let Some(entry) = entry {
                recalculate_day_totals(conn, entry.day_id)?;
            }
        }

        Ok(rows > 0)
    }
}

/// Refresh one entry's consumed nutrition from its baseline.
/// Entries without a baseline keep their stored values.
fn refresh_entry_nutrition(conn: &Connection, entry: &DiaryEntry) -> DbResult<NutrientProfile> {
    let standard = match entry.standard_nutrition.as_ref() {
        Some(standard) => standard,
        None => return Ok(entry.nutrition.clone()),
    };

    let nutrition = standard
        .scale(entry.estimated_weight / 100.0)
        .rounded_for_storage();

    conn.execute(
        r#"
        UPDATE diary_entries SET
            calories = ?1,
            protein = ?2,
            carbs = ?3,
            fat = ?4,
            fiber = ?5,
            sugar = ?6,
            updated_at = datetime('now')
        WHERE id = ?7
        "#,
        params![
            nutrition.calories,
            nutrition.protein,
            nutrition.carbs,
            nutrition.fat,
            nutrition.fiber,
            nutrition.sugar,
            entry.id,
        ],
    )?;

    Ok(nutrition)
}

/// Recalculate and update cached nutrition totals for a day.
///
/// Re-derives each rescalable entry from its per-100g baseline, then
/// sums all entries into the day cache.
pub fn recalculate_day_totals(conn: &Connection, day_id: i64) -> DbResult<NutrientProfile> {
    let entries = DiaryEntry::get_for_day(conn, day_id)?;

    let mut total = NutrientProfile::zero();
    for entry in &entries {
        let nutrition = refresh_entry_nutrition(conn, entry)?;
        total = total + nutrition;
    }

    Day::update_cached_nutrition(conn, day_id, &total)?;

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn apple_per_100g() -> NutrientProfile {
        NutrientProfile {
            calories: 52.0,
            protein: 0.3,
            carbs: 14.0,
            fat: 0.2,
            fiber: 2.4,
            sugar: 10.4,
        }
    }

    fn log_apple(conn: &Connection, day_id: i64, weight: f64) -> DiaryEntry {
        let standard = apple_per_100g();
        let nutrition = standard.scale(weight / 100.0).rounded_for_storage();
        DiaryEntry::create(
            conn,
            &DiaryEntryCreate {
                day_id,
                food_name: "apple".to_string(),
                estimated_weight: weight,
                nutrition,
                standard_nutrition: Some(standard),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_create_updates_day_cache() {
        let conn = test_conn();
        let day = Day::get_or_create(&conn, "2025-01-09").unwrap();

        log_apple(&conn, day.id, 250.0);
        log_apple(&conn, day.id, 100.0);

        let day = Day::get_by_id(&conn, day.id).unwrap().unwrap();
        assert_eq!(day.cached_nutrition.calories, 182.0); // 130 + 52
        assert_eq!(day.cached_nutrition.carbs, 49.0); // 35 + 14
    }

    #[test]
    fn test_entries_keep_insertion_order_and_increasing_ids() {
        let conn = test_conn();
        let day = Day::get_or_create(&conn, "2025-01-09").unwrap();

        let first = log_apple(&conn, day.id, 80.0);
        let second = log_apple(&conn, day.id, 120.0);

        assert!(second.id > first.id);
        let entries = DiaryEntry::get_for_day(&conn, day.id).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, first.id);
        assert_eq!(entries[1].id, second.id);
    }

    #[test]
    fn test_set_weight_rescales_from_baseline() {
        let conn = test_conn();
        let day = Day::get_or_create(&conn, "2025-01-09").unwrap();
        let entry = log_apple(&conn, day.id, 250.0);

        let updated = match DiaryEntry::set_weight(&conn, entry.id, 150.0).unwrap() {
            WeightUpdate::Updated(entry) => entry,
            other => panic!("expected update, got {:?}", other),
        };
        assert_eq!(updated.estimated_weight, 150.0);
        assert_eq!(updated.nutrition.calories, 78.0); // 52 * 1.5
        assert_eq!(updated.nutrition.fiber, 3.6); // 2.4 * 1.5

        // Day cache follows the correction
        let day = Day::get_by_id(&conn, day.id).unwrap().unwrap();
        assert_eq!(day.cached_nutrition.calories, 78.0);
    }

    #[test]
    fn test_repeated_weight_edits_do_not_drift() {
        let conn = test_conn();
        let day = Day::get_or_create(&conn, "2025-01-09").unwrap();
        let entry = log_apple(&conn, day.id, 250.0);

        for weight in [37.0, 412.0, 99.0, 250.0] {
            DiaryEntry::set_weight(&conn, entry.id, weight).unwrap();
        }

        // Back at 250 g the values match the first derivation exactly
        let entry = DiaryEntry::get_by_id(&conn, entry.id).unwrap().unwrap();
        assert_eq!(entry.nutrition, apple_per_100g().scale(2.5).rounded_for_storage());
    }

    #[test]
    fn test_detector_entry_refuses_rescale() {
        let conn = test_conn();
        let day = Day::get_or_create(&conn, "2025-01-09").unwrap();

        let entry = DiaryEntry::create(
            &conn,
            &DiaryEntryCreate {
                day_id: day.id,
                food_name: "bento box".to_string(),
                estimated_weight: 320.0,
                nutrition: NutrientProfile {
                    calories: 540.0,
                    protein: 22.0,
                    ..NutrientProfile::zero()
                },
                standard_nutrition: None,
            },
        )
        .unwrap();

        match DiaryEntry::set_weight(&conn, entry.id, 400.0).unwrap() {
            WeightUpdate::NotRescalable(kept) => {
                assert_eq!(kept.estimated_weight, 320.0);
                assert_eq!(kept.nutrition.calories, 540.0);
            }
            other => panic!("expected NotRescalable, got {:?}", other),
        }
    }

    #[test]
    fn test_set_weight_missing_entry() {
        let conn = test_conn();
        assert!(matches!(
            DiaryEntry::set_weight(&conn, 9999, 100.0).unwrap(),
            WeightUpdate::NotFound
        ));
    }

    #[test]
    fn test_delete_refreshes_day_cache() {
        let conn = test_conn();
        let day = Day::get_or_create(&conn, "2025-01-09").unwrap();
        let entry = log_apple(&conn, day.id, 250.0);
        log_apple(&conn, day.id, 100.0);

        assert!(DiaryEntry::delete(&conn, entry.id).unwrap());
        assert!(!DiaryEntry::delete(&conn, entry.id).unwrap());

        let day = Day::get_by_id(&conn, day.id).unwrap().unwrap();
        assert_eq!(day.cached_nutrition.calories, 52.0);
    }
}
