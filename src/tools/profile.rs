//! Profile MCP tools
//!
//! Set and read the user profile. Saving always recomputes the derived
//! goal fields from the base fields, so they can never be stale.

use serde::Serialize;

use crate::db::Database;
use crate::models::{Profile, ProfileDraft};
use crate::nutrition::{self, ActivityLevel, Gender, Goals, HealthGoal, ValidationError};

/// Profile with freshly derived goals (includes BMI for display)
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: Profile,
    pub goals: Goals,
}

/// Validate and save the profile, recomputing every goal field
#[allow(clippy::too_many_arguments)]
pub fn set_profile(
    db: &Database,
    name: &str,
    age: u32,
    gender: &str,
    height_cm: f64,
    weight_kg: f64,
    activity_level: &str,
    health_goal: &str,
) -> Result<ProfileResponse, String> {
    if name.trim().is_empty() {
        return Err(ValidationError::Missing("name").to_string());
    }

    let draft = ProfileDraft {
        name: name.trim().to_string(),
        age,
        gender: Gender::parse(gender).map_err(|e| e.to_string())?,
        height_cm,
        weight_kg,
        activity_level: ActivityLevel::parse(activity_level).map_err(|e| e.to_string())?,
        health_goal: HealthGoal::parse(health_goal).map_err(|e| e.to_string())?,
    };

    let goals = nutrition::compute_goals(&draft.goal_input()).map_err(|e| e.to_string())?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let profile = Profile::set(&conn, &draft, &goals)
        .map_err(|e| format!("Failed to save profile: {}", e))?;

    Ok(ProfileResponse { profile, goals })
}

/// Get the profile with its derived goals, or None when unset
pub fn get_profile(db: &Database) -> Result<Option<ProfileResponse>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let profile = Profile::get(&conn).map_err(|e| format!("Failed to get profile: {}", e))?;

    match profile {
        Some(profile) => {
            // Derivation is deterministic, so this matches the stored
            // columns and adds the display-only BMI fields
            let goals =
                nutrition::compute_goals(&profile.goal_input()).map_err(|e| e.to_string())?;
            Ok(Some(ProfileResponse { profile, goals }))
        }
        None => Ok(None),
    }
}
