//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    // Create migrations table if it doesn't exist
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    // Get current version
    let current_version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    // Run migrations
    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- PROFILE
        -- Single-row user profile with derived goals.
        -- Derived columns (bmr..water_goal) are always
        -- rewritten together when the base fields change.
        -- ============================================
        CREATE TABLE profile (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            name TEXT NOT NULL,
            age INTEGER NOT NULL,
            gender TEXT NOT NULL CHECK(gender IN ('male', 'female')),
            height_cm REAL NOT NULL,
            weight_kg REAL NOT NULL,
            activity_level TEXT NOT NULL CHECK(activity_level IN ('sedentary', 'light', 'moderate', 'active', 'extra')),
            health_goal TEXT NOT NULL CHECK(health_goal IN ('lose', 'maintain', 'gain', 'muscle', 'health')),

            -- Derived goal fields (kcal/day, g/day, ml/day)
            bmr INTEGER NOT NULL,
            daily_calories INTEGER NOT NULL,
            protein_goal INTEGER NOT NULL,
            fiber_goal INTEGER NOT NULL DEFAULT 25,
            water_goal INTEGER NOT NULL DEFAULT 2000,

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- FOODS
        -- Per-100g reference catalog used when the
        -- detector returns only a food name
        -- ============================================
        CREATE TABLE foods (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE COLLATE NOCASE,

            -- Nutritional values (per 100 g)
            calories REAL NOT NULL DEFAULT 0,
            protein REAL NOT NULL DEFAULT 0,     -- grams
            carbs REAL NOT NULL DEFAULT 0,       -- grams
            fat REAL NOT NULL DEFAULT 0,         -- grams
            fiber REAL NOT NULL DEFAULT 0,       -- grams
            sugar REAL NOT NULL DEFAULT 0,       -- grams

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_foods_name ON foods(name);

        -- ============================================
        -- DAYS
        -- Daily aggregation container
        -- ============================================
        CREATE TABLE days (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL UNIQUE,           -- ISO date: "2025-01-09"

            -- Cached daily totals - recalculated when diary entries change
            cached_calories REAL NOT NULL DEFAULT 0,
            cached_protein REAL NOT NULL DEFAULT 0,
            cached_carbs REAL NOT NULL DEFAULT 0,
            cached_fat REAL NOT NULL DEFAULT 0,
            cached_fiber REAL NOT NULL DEFAULT 0,
            cached_sugar REAL NOT NULL DEFAULT 0,

            -- Water intake (milliliters)
            water_ml REAL NOT NULL DEFAULT 0,

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE UNIQUE INDEX idx_days_date ON days(date);

        -- ============================================
        -- DIARY ENTRIES
        -- What was actually consumed. nutrition columns
        -- hold the scaled (as-eaten) amounts; std_*
        -- columns hold the per-100g baseline when one
        -- exists, NULL for direct detector estimates
        -- ============================================
        CREATE TABLE diary_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            day_id INTEGER NOT NULL REFERENCES days(id) ON DELETE CASCADE,
            food_name TEXT NOT NULL,
            estimated_weight REAL NOT NULL DEFAULT 100.0,  -- grams

            -- Consumed nutrition (scaled to estimated_weight)
            calories REAL NOT NULL DEFAULT 0,
            protein REAL NOT NULL DEFAULT 0,
            carbs REAL NOT NULL DEFAULT 0,
            fat REAL NOT NULL DEFAULT 0,
            fiber REAL NOT NULL DEFAULT 0,
            sugar REAL NOT NULL DEFAULT 0,

            -- Per-100g baseline (all NULL when the entry is not rescalable)
            std_calories REAL,
            std_protein REAL,
            std_carbs REAL,
            std_fat REAL,
            std_fiber REAL,
            std_sugar REAL,

            logged_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now')),
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_diary_entries_day ON diary_entries(day_id);

        -- ============================================
        -- FOOD CATALOG SEED
        -- Staple per-100g values from the recognition
        -- service's reference table
        -- ============================================
        INSERT INTO foods (name, calories, protein, carbs, fat, fiber, sugar) VALUES
            ('apple',       52,  0.3, 14,   0.2, 2.4, 10.4),
            ('banana',      89,  1.1, 23,   0.3, 2.6, 12.2),
            ('orange',      47,  0.9, 12,   0.1, 2.4, 9.4),
            ('strawberry',  32,  0.7, 7.7,  0.3, 2,   4.9),
            ('grape',       62,  0.6, 16.8, 0.2, 0.9, 16.1),
            ('bread',       265, 9,   49,   3.2, 2.7, 0),
            ('rice',        130, 2.7, 28,   0.3, 0.4, 0),
            ('pasta',       131, 5,   25,   1.1, 1.8, 0),
            ('noodles',     138, 4.5, 25,   2.2, 1.2, 0),
            ('pizza',       266, 11,  33,   10,  0,   0),
            ('chicken',     165, 31,  0,    3.6, 0,   0),
            ('beef',        250, 26,  0,    15,  0,   0),
            ('pork',        242, 27,  0,    14,  0,   0),
            ('fish',        206, 22,  0,    12,  0,   0),
            ('broccoli',    34,  2.8, 7,    0.4, 2.6, 0),
            ('carrot',      41,  0.9, 10,   0.2, 2.8, 0),
            ('tomato',      18,  0.9, 3.9,  0.2, 1.2, 0),
            ('lettuce',     15,  1.4, 2.9,  0.2, 1.3, 0),
            ('milk',        42,  3.4, 5,    1,   0,   0),
            ('egg',         155, 13,  1.1,  11,  0,   0),
            ('cheese',      113, 7,   1,    9,   0,   0),
            ('yogurt',      59,  10,  3.6,  0.4, 0,   0),
            ('cake',        257, 4,   46,   6,   0,   35),
            ('cookie',      502, 5.9, 64,   25,  0,   39),
            ('ice cream',   207, 3.5, 24,   11,  0,   21),
            ('chocolate',   546, 4.9, 61,   31,  0,   48),
            ('nuts',        607, 15,  7,    54,  0,   0),
            ('salad',       20,  1.5, 4,    0.2, 2,   0);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}
