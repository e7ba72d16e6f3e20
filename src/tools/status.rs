//! NutriTrack status tool
//!
//! Provides runtime status information about the NutriTrack service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Food logging instructions for AI assistants
pub const LOGGING_INSTRUCTIONS: &str = r#"
# NutriTrack Food Logging Instructions

This guide explains how to log food using the NutriTrack tools.

## Overview

A diary entry needs a food name, a portion weight in grams, and
nutrition values. Nutrition comes from one of three places:

1. **Per-100g baseline** - from `lookup_food`, `analyze_photo`, or
   typed in from a package label. The entry is scaled to the portion
   weight and stays editable later.
2. **Direct detector estimate** - the analyzer already returned the
   absolute amounts for the whole portion. The entry is stored as-is
   and its weight CANNOT be corrected afterwards.
3. **Catalog fallback** - call `log_food` with only a name and weight;
   the per-100g values are resolved from the food catalog.

## Typical Photo Workflow

1. `analyze_photo(file_path: "/path/to/meal.jpg")`
   - Returns the recognized food name, confidence, and per-100g
     nutrition when the service or catalog knows the food.
2. Ask the user to confirm the name and the actual weight eaten.
3. `log_food(food_name: "apple", weight_grams: 250, calories: 52,
   protein: 0.3, carbs: 14, fat: 0.2, fiber: 2.4, sugar: 10.4)`
   - Values are per 100 g; pass `absolute: true` instead when the
     analyzer already returned whole-portion amounts.
4. Wrong weight later? `update_entry_weight(id: 1, weight_grams: 180)`
   re-derives the nutrition from the stored per-100g baseline.

## Profile and Progress

- `set_profile` recomputes BMR, daily calories, and macro goals from
  age, gender, height, weight, activity level, and health goal. All
  goal fields update together on every save.
- `daily_progress` compares a day's totals against the stored goals;
  percentages clamp at 100 and `exceeded` flags report overshoot.
- `weekly_report` returns the last seven days of calories, oldest
  first. Days without entries report zero.
- `log_water(amount_ml: 350)` tracks water separately against the
  2000 ml goal.

## Notes

- Dates use ISO format: YYYY-MM-DD and default to today.
- Weight defaults to 100 g when omitted on the per-100g path.
- Valid activity levels: sedentary, light, moderate, active, extra.
- Valid health goals: lose, maintain, gain, muscle, health.
- Unknown enum values are rejected; nothing is silently defaulted.
"#;

/// Runtime status of the NutriTrack service
#[derive(Debug, Clone, Serialize)]
pub struct TrackerStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Recognition service address
    pub recognition_url: String,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    recognition_url: String,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(database_path: PathBuf, recognition_url: String) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
            recognition_url,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> TrackerStatus {
        let build_info = BuildInfo::current();

        // Get database size if it exists
        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        // Get process info
        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        TrackerStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            recognition_url: self.recognition_url.clone(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
