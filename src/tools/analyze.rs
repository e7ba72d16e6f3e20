//! Photo analysis MCP tool
//!
//! Sends an image to the external recognition service and resolves
//! per-100g nutrition for the identified food. Never writes the diary;
//! the caller confirms weight and commits via log_food.

use std::path::Path;

use serde::Serialize;
use tracing::warn;

use crate::db::Database;
use crate::models::{Food, NutrientProfile};
use crate::recognition::RecognitionClient;

/// Response for analyze_photo
#[derive(Debug, Serialize)]
pub struct AnalyzePhotoResponse {
    pub food_name: String,
    pub confidence: f64,
    /// Portion weight estimated from the image, grams (when the
    /// service provides one)
    pub estimated_weight: Option<f64>,
    /// Per-100g nutrition when the food is known
    pub nutrition_per_100g: Option<NutrientProfile>,
    /// Where the nutrition came from: "recognition_service", "catalog",
    /// or "none"
    pub nutrition_source: &'static str,
}

/// Analyze a food photo from a local file path
pub async fn analyze_photo(
    db: &Database,
    client: &RecognitionClient,
    file_path: &str,
) -> Result<AnalyzePhotoResponse, String> {
    let image = std::fs::read(file_path)
        .map_err(|e| format!("Failed to read image '{}': {}", file_path, e))?;
    let file_name = Path::new(file_path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("photo.jpg");

    let recognized = client
        .analyze_image(image, file_name)
        .await
        .map_err(|e| e.to_string())?;

    // Prefer the service's own nutrition lookup; fall back to the local
    // catalog when it doesn't know the food or the request fails
    let (nutrition, source) = match client.lookup_nutrition(&recognized.food_name).await {
        Ok(Some(nutrition)) => (Some(nutrition), "recognition_service"),
        Ok(None) => lookup_catalog(db, &recognized.food_name)?,
        Err(e) => {
            warn!("nutrition lookup failed for '{}': {}", recognized.food_name, e);
            lookup_catalog(db, &recognized.food_name)?
        }
    };

    Ok(AnalyzePhotoResponse {
        food_name: recognized.food_name,
        confidence: recognized.confidence,
        estimated_weight: recognized.estimated_weight,
        nutrition_per_100g: nutrition,
        nutrition_source: source,
    })
}

fn lookup_catalog(
    db: &Database,
    food_name: &str,
) -> Result<(Option<NutrientProfile>, &'static str), String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let food =
        Food::lookup(&conn, food_name).map_err(|e| format!("Failed to look up food: {}", e))?;

    Ok(match food {
        Some(food) => (Some(food.nutrition), "catalog"),
        None => (None, "none"),
    })
}
