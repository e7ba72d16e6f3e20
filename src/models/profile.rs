//! Profile model
//!
//! Single-row user profile with derived daily goals. The derived
//! columns are only ever written together with the base fields, so they
//! can never go stale independently.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use crate::nutrition::{ActivityLevel, Gender, Goals, GoalInput, HealthGoal, ValidationError};

/// User profile with cached goal fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity_level: ActivityLevel,
    pub health_goal: HealthGoal,

    /// Derived: basal metabolic rate, kcal/day
    pub bmr: u32,
    /// Derived: daily calorie target, kcal/day
    pub daily_calories: u32,
    /// Derived: daily protein target, g/day
    pub protein_goal: u32,
    /// Derived: daily fiber target, g/day
    pub fiber_goal: u32,
    /// Derived: daily water target, ml/day
    pub water_goal: u32,

    pub created_at: String,
    pub updated_at: String,
}

/// Base fields supplied by the profile form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDraft {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity_level: ActivityLevel,
    pub health_goal: HealthGoal,
}

impl ProfileDraft {
    pub fn goal_input(&self) -> GoalInput {
        GoalInput {
            age: self.age,
            gender: self.gender,
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            activity_level: self.activity_level,
            health_goal: self.health_goal,
        }
    }
}

/// Map an enum-parse failure on a stored column to a rusqlite error
fn column_parse<T>(idx: usize, parsed: Result<T, ValidationError>) -> rusqlite::Result<T> {
    parsed.map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

impl Profile {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let gender: String = row.get("gender")?;
        let activity_level: String = row.get("activity_level")?;
        let health_goal: String = row.get("health_goal")?;
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            age: row.get("age")?,
            gender: column_parse(0, Gender::parse(&gender))?,
            height_cm: row.get("height_cm")?,
            weight_kg: row.get("weight_kg")?,
            activity_level: column_parse(0, ActivityLevel::parse(&activity_level))?,
            health_goal: column_parse(0, HealthGoal::parse(&health_goal))?,
            bmr: row.get("bmr")?,
            daily_calories: row.get("daily_calories")?,
            protein_goal: row.get("protein_goal")?,
            fiber_goal: row.get("fiber_goal")?,
            water_goal: row.get("water_goal")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn goal_input(&self) -> GoalInput {
        GoalInput {
            age: self.age,
            gender: self.gender,
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            activity_level: self.activity_level,
            health_goal: self.health_goal,
        }
    }

    /// Get the profile (single row table)
    pub fn get(conn: &Connection) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM profile WHERE id = 1")?;

        let result = stmt.query_row([], Self::from_row);
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set or update the profile (upsert).
    ///
    /// Base fields and derived goal fields are written in one statement;
    /// the caller supplies goals freshly computed from this same draft.
    pub fn set(conn: &Connection, draft: &ProfileDraft, goals: &Goals) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO profile (
                id, name, age, gender, height_cm, weight_kg,
                activity_level, health_goal,
                bmr, daily_calories, protein_goal, fiber_goal, water_goal
            )
            VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                age = excluded.age,
                gender = excluded.gender,
                height_cm = excluded.height_cm,
                weight_kg = excluded.weight_kg,
                activity_level = excluded.activity_level,
                health_goal = excluded.health_goal,
                bmr = excluded.bmr,
                daily_calories = excluded.daily_calories,
                protein_goal = excluded.protein_goal,
                fiber_goal = excluded.fiber_goal,
                water_goal = excluded.water_goal,
                updated_at = datetime('now')
            "#,
            params![
                draft.name,
                draft.age,
                draft.gender.as_str(),
                draft.height_cm,
                draft.weight_kg,
                draft.activity_level.as_str(),
                draft.health_goal.as_str(),
                goals.bmr,
                goals.daily_calories,
                goals.protein_goal,
                goals.fiber_goal,
                goals.water_goal,
            ],
        )?;

        Self::get(conn)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }
}
