//! Utility to set the user profile in the database
//! Usage: cargo run --bin set_profile -- <name> <age> <gender> <height_cm> <weight_kg> <activity_level> <health_goal>

use std::path::PathBuf;

use nutritrack::models::{Profile, ProfileDraft};
use nutritrack::nutrition::{self, ActivityLevel, Gender, HealthGoal};

fn get_database_path() -> PathBuf {
    std::env::var("NUTRITRACK_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            std::fs::create_dir_all(&path).ok();
            path.push("nutritrack.db");
            path
        })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 8 {
        eprintln!(
            "Usage: {} <name> <age> <gender> <height_cm> <weight_kg> <activity_level> <health_goal>",
            args[0]
        );
        eprintln!("  gender: male | female");
        eprintln!("  activity_level: sedentary | light | moderate | active | extra");
        eprintln!("  health_goal: lose | maintain | gain | muscle | health");
        std::process::exit(2);
    }

    let draft = ProfileDraft {
        name: args[1].clone(),
        age: args[2].parse()?,
        gender: Gender::parse(&args[3])?,
        height_cm: args[4].parse()?,
        weight_kg: args[5].parse()?,
        activity_level: ActivityLevel::parse(&args[6])?,
        health_goal: HealthGoal::parse(&args[7])?,
    };

    let goals = nutrition::compute_goals(&draft.goal_input())?;

    let db_path = get_database_path();
    println!("Database path: {}", db_path.display());

    let database = nutritrack::db::Database::new(&db_path)?;

    // Run migrations
    database.with_conn(|conn| {
        nutritrack::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    // Set profile
    database.with_conn(|conn| {
        let profile = Profile::set(conn, &draft, &goals)?;
        println!("Profile set:");
        println!("  Name: {}", profile.name);
        println!("  Age: {} | Gender: {}", profile.age, profile.gender.as_str());
        println!(
            "  Height: {} cm | Weight: {} kg",
            profile.height_cm, profile.weight_kg
        );
        println!(
            "  Activity: {} | Goal: {}",
            profile.activity_level.as_str(),
            profile.health_goal.as_str()
        );
        println!("  BMR: {} kcal/day", profile.bmr);
        println!("  Daily calories: {} kcal", profile.daily_calories);
        println!("  Protein goal: {} g", profile.protein_goal);
        println!("  Fiber goal: {} g", profile.fiber_goal);
        println!("  Water goal: {} ml", profile.water_goal);
        println!("  BMI: {} ({:?})", goals.bmi, goals.bmi_category);
        println!("  Updated: {}", profile.updated_at);
        Ok(())
    })?;

    Ok(())
}
