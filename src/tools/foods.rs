//! Food catalog MCP tools
//!
//! Maintain and query the per-100g reference catalog.

use serde::Serialize;

use crate::db::Database;
use crate::models::{Food, FoodCreate, NutrientProfile};

/// Response for list_foods
#[derive(Debug, Serialize)]
pub struct ListFoodsResponse {
    pub foods: Vec<Food>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Reject negative or non-finite nutrient values
pub(crate) fn check_non_negative(nutrition: &NutrientProfile) -> Result<(), String> {
    let fields = [
        ("calories", nutrition.calories),
        ("protein", nutrition.protein),
        ("carbs", nutrition.carbs),
        ("fat", nutrition.fat),
        ("fiber", nutrition.fiber),
        ("sugar", nutrition.sugar),
    ];
    for (name, value) in fields {
        if !value.is_finite() || value < 0.0 {
            return Err(format!("{} must be a non-negative number", name));
        }
    }
    Ok(())
}

/// Add a food to the catalog (values per 100 g)
pub fn add_food(db: &Database, data: FoodCreate) -> Result<Food, String> {
    if data.name.trim().is_empty() {
        return Err("Food name must not be empty".to_string());
    }
    check_non_negative(&NutrientProfile {
        calories: data.calories,
        protein: data.protein,
        carbs: data.carbs,
        fat: data.fat,
        fiber: data.fiber,
        sugar: data.sugar,
    })?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    Food::create(&conn, &data).map_err(|e| format!("Failed to add food: {}", e))
}

/// Find the catalog food matching a name (exact first, then fuzzy)
pub fn lookup_food(db: &Database, name: &str) -> Result<Option<Food>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    Food::lookup(&conn, name).map_err(|e| format!("Failed to look up food: {}", e))
}

/// List catalog foods with pagination
pub fn list_foods(db: &Database, limit: i64, offset: i64) -> Result<ListFoodsResponse, String> {
    let limit = limit.clamp(1, 200);
    let offset = offset.max(0);

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let foods = Food::list(&conn, limit, offset).map_err(|e| format!("Failed to list foods: {}", e))?;
    let total = Food::count(&conn).map_err(|e| format!("Failed to count foods: {}", e))?;

    Ok(ListFoodsResponse {
        foods,
        total,
        limit,
        offset,
    })
}
