//! Food catalog model
//!
//! Per-100g reference nutrition, used when an analysis yields only a
//! food name. Seeded with staples by the initial migration and
//! extensible at runtime.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

use super::NutrientProfile;

/// A catalog food with per-100g nutrition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Food {
    pub id: i64,
    pub name: String,
    /// Nutrient amounts per 100 g
    pub nutrition: NutrientProfile,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a catalog food
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodCreate {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    #[serde(default)]
    pub fiber: f64,
    #[serde(default)]
    pub sugar: f64,
}

impl Food {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            nutrition: NutrientProfile {
                calories: row.get("calories")?,
                protein: row.get("protein")?,
                carbs: row.get("carbs")?,
                fat: row.get("fat")?,
                fiber: row.get("fiber")?,
                sugar: row.get("sugar")?,
            },
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Create a new catalog food
    pub fn create(conn: &Connection, data: &FoodCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO foods (name, calories, protein, carbs, fat, fiber, sugar)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                data.name,
                data.calories,
                data.protein,
                data.carbs,
                data.fat,
                data.fiber,
                data.sugar,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a catalog food by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM foods WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(food) => Ok(Some(food)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Find the catalog food matching a name.
    ///
    /// Tries an exact (case-insensitive) match first, then a substring
    /// match in either direction so "fried rice" still resolves to
    /// "rice". Shorter names win among substring matches.
    pub fn lookup(conn: &Connection, name: &str) -> DbResult<Option<Self>> {
        let needle = name.trim().replace(['_', '-'], " ").to_lowercase();
        if needle.is_empty() {
            return Ok(None);
        }

        let mut stmt = conn.prepare("SELECT * FROM foods WHERE name = ?1 COLLATE NOCASE")?;
        match stmt.query_row([&needle], Self::from_row) {
            Ok(food) => return Ok(Some(food)),
            Err(rusqlite::Error::QueryReturnedNoRows) => {}
            Err(e) => return Err(e.into()),
        }

        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM foods
            WHERE ?1 LIKE '%' || name || '%' OR name LIKE '%' || ?1 || '%'
            ORDER BY length(name) ASC
            LIMIT 1
            "#,
        )?;
        match stmt.query_row([&needle], Self::from_row) {
            Ok(food) => Ok(Some(food)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Search catalog foods by name fragment
    pub fn search(conn: &Connection, query: &str, limit: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM foods WHERE name LIKE '%' || ?1 || '%' ORDER BY name LIMIT ?2",
        )?;

        let foods = stmt
            .query_map(params![query, limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(foods)
    }

    /// List catalog foods with pagination
    pub fn list(conn: &Connection, limit: i64, offset: i64) -> DbResult<Vec<Self>> {
        let mut stmt =
            conn.prepare("SELECT * FROM foods ORDER BY name LIMIT ?1 OFFSET ?2")?;

        let foods = stmt
            .query_map(params![limit, offset], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(foods)
    }

    /// Count catalog foods
    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM foods", [], |row| row.get(0))?;
        Ok(count)
    }
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

    #[test]
    fn test_seeded_staples_present() {
        let conn = test_conn();
        let apple = Food::lookup(&conn, "apple").unwrap().unwrap();
        assert_eq!(apple.nutrition.calories, 52.0);
        assert_eq!(apple.nutrition.fiber, 2.4);
    }

    #[test]
    fn test_lookup_is_case_insensitive_and_fuzzy() {
        let conn = test_conn();
        assert_eq!(Food::lookup(&conn, "Apple").unwrap().unwrap().name, "apple");
        assert_eq!(
            Food::lookup(&conn, "fried rice").unwrap().unwrap().name,
            "rice"
        );
        assert_eq!(
            Food::lookup(&conn, "ice_cream").unwrap().unwrap().name,
            "ice cream"
        );
        assert!(Food::lookup(&conn, "durian").unwrap().is_none());
        assert!(Food::lookup(&conn, "  ").unwrap().is_none());
    }

    #[test]
    fn test_create_and_search() {
        let conn = test_conn();
        Food::create(
            &conn,
            &FoodCreate {
                name: "oatmeal".to_string(),
                calories: 68.0,
                protein: 2.4,
                carbs: 12.0,
                fat: 1.4,
                fiber: 1.7,
                sugar: 0.5,
            },
        )
        .unwrap();

        let found = Food::search(&conn, "oat", 10).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "oatmeal");
    }
}
