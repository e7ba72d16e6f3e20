//! NutriTrack MCP Server Implementation
//!
//! Implements the MCP server with all NutriTrack tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::db::Database;
use crate::models::{FoodCreate, NutrientProfile};
use crate::recognition::RecognitionClient;
use crate::tools::analyze;
use crate::tools::days;
use crate::tools::foods;
use crate::tools::profile;
use crate::tools::progress;
use crate::tools::status::StatusTracker;

/// NutriTrack MCP Service
#[derive(Clone)]
pub struct NutriTrackService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    recognizer: RecognitionClient,
    tool_router: ToolRouter<NutriTrackService>,
}

impl NutriTrackService {
    pub fn new(database_path: PathBuf, database: Database, recognizer: RecognitionClient) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(
                database_path,
                recognizer.base_url().to_string(),
            ))),
            database,
            recognizer,
            tool_router: Self::tool_router(),
        }
    }
}

// ============================================================================
// Profile Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetProfileParams {
    /// Display name
    pub name: String,
    /// Age in years
    pub age: u32,
    /// Gender: male or female
    pub gender: String,
    /// Height in centimeters
    pub height_cm: f64,
    /// Weight in kilograms
    pub weight_kg: f64,
    /// Activity level: sedentary, light, moderate, active, extra
    pub activity_level: String,
    /// Health goal: lose, maintain, gain, muscle, health
    pub health_goal: String,
}

// ============================================================================
// Food Catalog Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddFoodParams {
    /// Food name (catalog key)
    pub name: String,
    /// kcal per 100 g
    pub calories: f64,
    /// Grams of protein per 100 g
    pub protein: f64,
    /// Grams of carbohydrate per 100 g
    pub carbs: f64,
    /// Grams of fat per 100 g
    pub fat: f64,
    /// Grams of fiber per 100 g
    #[serde(default)]
    pub fiber: f64,
    /// Grams of sugar per 100 g
    #[serde(default)]
    pub sugar: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LookupFoodParams {
    /// Food name to resolve (exact match first, then fuzzy)
    pub name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListFoodsParams {
    /// Maximum results (default 50, max 200)
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    /// Offset for pagination (default 0)
    #[serde(default)]
    pub offset: i64,
}

fn default_list_limit() -> i64 {
    50
}

// ============================================================================
// Analysis Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AnalyzePhotoParams {
    /// Path to the food photo on the local filesystem
    pub file_path: String,
}

// ============================================================================
// Diary Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogFoodParams {
    /// Date in ISO format YYYY-MM-DD (defaults to today)
    pub date: Option<String>,
    /// Food name
    pub food_name: String,
    /// Portion weight in grams (defaults to 100)
    pub weight_grams: Option<f64>,
    /// kcal (per 100 g unless absolute is set)
    pub calories: Option<f64>,
    /// Grams of protein (per 100 g unless absolute is set)
    pub protein: Option<f64>,
    /// Grams of carbohydrate (per 100 g unless absolute is set)
    pub carbs: Option<f64>,
    /// Grams of fat (per 100 g unless absolute is set)
    pub fat: Option<f64>,
    /// Grams of fiber (per 100 g unless absolute is set)
    pub fiber: Option<f64>,
    /// Grams of sugar (per 100 g unless absolute is set)
    pub sugar: Option<f64>,
    /// The nutrition values are already the whole consumed portion
    /// (direct detector output). Such entries cannot be rescaled later.
    #[serde(default)]
    pub absolute: bool,
}

impl LogFoodParams {
    /// Collect the optional nutrient fields into one profile, if any
    /// was provided
    fn nutrition(&self) -> Option<NutrientProfile> {
        let provided = [
            self.calories,
            self.protein,
            self.carbs,
            self.fat,
            self.fiber,
            self.sugar,
        ]
        .iter()
        .any(Option::is_some);

        provided.then(|| NutrientProfile {
            calories: self.calories.unwrap_or(0.0),
            protein: self.protein.unwrap_or(0.0),
            carbs: self.carbs.unwrap_or(0.0),
            fat: self.fat.unwrap_or(0.0),
            fiber: self.fiber.unwrap_or(0.0),
            sugar: self.sugar.unwrap_or(0.0),
        })
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateEntryWeightParams {
    /// Diary entry ID
    pub id: i64,
    /// Corrected portion weight in grams
    pub weight_grams: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteEntryParams {
    /// Diary entry ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetDayParams {
    /// Date in ISO format YYYY-MM-DD (defaults to today)
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListDaysParams {
    /// Start date filter (ISO format, inclusive)
    pub start_date: Option<String>,
    /// End date filter (ISO format, inclusive)
    pub end_date: Option<String>,
    /// Maximum results (default 50, max 200)
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    /// Offset for pagination (default 0)
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogWaterParams {
    /// Date in ISO format YYYY-MM-DD (defaults to today)
    pub date: Option<String>,
    /// Water amount to add, in milliliters
    pub amount_ml: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecalculateDayParams {
    /// Date in ISO format: YYYY-MM-DD
    pub date: String,
}

// ============================================================================
// Progress Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DailyProgressParams {
    /// Date in ISO format YYYY-MM-DD (defaults to today)
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct WeeklyReportParams {
    /// Last day of the series in ISO format (defaults to today)
    pub end_date: Option<String>,
}

fn to_json_result<T: serde::Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[tool_router]
impl NutriTrackService {
    // --- Status ---

    #[tool(description = "Get the current status of the NutriTrack service including build info, database status, and process information")]
    async fn nutritrack_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        to_json_result(&status)
    }

    #[tool(description = "Get step-by-step instructions for logging food. Call this when starting a new food logging session or when unsure how to use the diary tools.")]
    fn logging_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::LOGGING_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(
            LOGGING_INSTRUCTIONS,
        )]))
    }

    // --- Profile ---

    #[tool(description = "Set or update the user profile. Recomputes BMR, daily calorie target, and macro goals from the base fields; all goal fields are rewritten together.")]
    fn set_profile(&self, Parameters(p): Parameters<SetProfileParams>) -> Result<CallToolResult, McpError> {
        let result = profile::set_profile(
            &self.database,
            &p.name,
            p.age,
            &p.gender,
            p.height_cm,
            p.weight_kg,
            &p.activity_level,
            &p.health_goal,
        )
        .map_err(|e| McpError::invalid_params(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Get the user profile with derived goals and BMI")]
    fn get_profile(&self) -> Result<CallToolResult, McpError> {
        let result = profile::get_profile(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(response) => to_json_result(&response),
            None => Ok(CallToolResult::success(vec![Content::text(
                r#"{"error": "No profile set", "hint": "call set_profile"}"#,
            )])),
        }
    }

    // --- Food Catalog ---

    #[tool(description = "Add a food to the per-100g reference catalog")]
    fn add_food(&self, Parameters(p): Parameters<AddFoodParams>) -> Result<CallToolResult, McpError> {
        let data = FoodCreate {
            name: p.name,
            calories: p.calories,
            protein: p.protein,
            carbs: p.carbs,
            fat: p.fat,
            fiber: p.fiber,
            sugar: p.sugar,
        };
        let result = foods::add_food(&self.database, data).map_err(|e| McpError::invalid_params(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Resolve a food name to its per-100g catalog nutrition (exact match first, then fuzzy)")]
    fn lookup_food(&self, Parameters(p): Parameters<LookupFoodParams>) -> Result<CallToolResult, McpError> {
        let result = foods::lookup_food(&self.database, &p.name).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(food) => to_json_result(&food),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "Food not found in catalog", "name": "{}"}}"#,
                p.name
            ))])),
        }
    }

    #[tool(description = "List catalog foods with pagination")]
    fn list_foods(&self, Parameters(p): Parameters<ListFoodsParams>) -> Result<CallToolResult, McpError> {
        let result = foods::list_foods(&self.database, p.limit, p.offset)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    // --- Photo Analysis ---

    #[tool(description = "Send a food photo to the recognition service. Returns the identified food with per-100g nutrition when known. Does NOT write the diary; confirm the portion weight with the user and call log_food.")]
    async fn analyze_photo(&self, Parameters(p): Parameters<AnalyzePhotoParams>) -> Result<CallToolResult, McpError> {
        let result = analyze::analyze_photo(&self.database, &self.recognizer, &p.file_path)
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    // --- Diary ---

    #[tool(description = "Log a food into the diary. Nutrition values are per 100 g and get scaled to weight_grams (baseline retained for later corrections); pass absolute=true when the values are already the whole portion. With no nutrition values the food catalog is consulted. Automatically creates the day if needed.")]
    fn log_food(&self, Parameters(p): Parameters<LogFoodParams>) -> Result<CallToolResult, McpError> {
        let nutrition = p.nutrition();
        let result = days::log_food(
            &self.database,
            p.date.as_deref(),
            &p.food_name,
            p.weight_grams,
            nutrition,
            p.absolute,
        )
        .map_err(|e| McpError::invalid_params(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Correct a diary entry's portion weight. Re-derives nutrition from the retained per-100g baseline; entries logged from direct detector estimates cannot be rescaled.")]
    fn update_entry_weight(&self, Parameters(p): Parameters<UpdateEntryWeightParams>) -> Result<CallToolResult, McpError> {
        let result = days::update_entry_weight(&self.database, p.id, p.weight_grams)
            .map_err(|e| McpError::invalid_params(e, None))?;
        match result {
            Some(response) => to_json_result(&response),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "Diary entry not found", "id": {}}}"#,
                p.id
            ))])),
        }
    }

    #[tool(description = "Delete a diary entry")]
    fn delete_entry(&self, Parameters(p): Parameters<DeleteEntryParams>) -> Result<CallToolResult, McpError> {
        let deleted = days::delete_entry(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&serde_json::json!({ "deleted": deleted, "id": p.id }))
    }

    #[tool(description = "Get a day with all diary entries, nutrient totals, and water intake")]
    fn get_day(&self, Parameters(p): Parameters<GetDayParams>) -> Result<CallToolResult, McpError> {
        let result = days::get_day(&self.database, p.date.as_deref())
            .map_err(|e| McpError::invalid_params(e, None))?;
        match result {
            Some(day) => to_json_result(&day),
            None => Ok(CallToolResult::success(vec![Content::text(
                r#"{"error": "No entries logged for that day"}"#,
            )])),
        }
    }

    #[tool(description = "List days with optional date range filter and pagination")]
    fn list_days(&self, Parameters(p): Parameters<ListDaysParams>) -> Result<CallToolResult, McpError> {
        let result = days::list_days(
            &self.database,
            p.start_date.as_deref(),
            p.end_date.as_deref(),
            p.limit,
            p.offset,
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Log water intake in milliliters for a day and report progress against the water goal")]
    fn log_water(&self, Parameters(p): Parameters<LogWaterParams>) -> Result<CallToolResult, McpError> {
        let result = days::log_water(&self.database, p.date.as_deref(), p.amount_ml)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Force recalculate cached nutrition totals for a day from its entries' per-100g baselines")]
    fn recalculate_day(&self, Parameters(p): Parameters<RecalculateDayParams>) -> Result<CallToolResult, McpError> {
        let result = days::recalculate_day(&self.database, &p.date)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    // --- Progress ---

    #[tool(description = "Aggregate a day's diary against the stored goals: totals, clamped percentages, exceeded flags, and water progress")]
    fn daily_progress(&self, Parameters(p): Parameters<DailyProgressParams>) -> Result<CallToolResult, McpError> {
        let result = progress::daily_progress(&self.database, p.date.as_deref())
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Seven-day calorie series ending at end_date (default today), oldest first. Days without entries report zero.")]
    fn weekly_report(&self, Parameters(p): Parameters<WeeklyReportParams>) -> Result<CallToolResult, McpError> {
        let result = progress::weekly_report(&self.database, p.end_date.as_deref())
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for NutriTrackService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nutritrack".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("NutriTrack".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "NutriTrack - food diary and nutrition goal tracking. \
                 IMPORTANT: Call logging_instructions before a food logging session. \
                 Profile: set_profile/get_profile (goals recompute on every save). \
                 Catalog: add_food/lookup_food/list_foods (per-100g values). \
                 Photos: analyze_photo (recognition only; commit with log_food). \
                 Diary: log_food/update_entry_weight/delete_entry, get_day/list_days, recalculate_day. \
                 Water: log_water. \
                 Progress: daily_progress (clamped percents + exceeded flags), weekly_report (7-day calories). \
                 Entries logged from direct detector estimates have no per-100g baseline and cannot be rescaled."
                    .into(),
            ),
        }
    }
}
