//! Simple utility to recalculate cached day totals from entry baselines
//! Usage: cargo run --bin recalculate_days -- [date]

use std::path::PathBuf;

use nutritrack::models::{recalculate_day_totals, Day, DiaryEntry};

fn get_database_path() -> PathBuf {
    std::env::var("NUTRITRACK_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            path.push("nutritrack.db");
            path
        })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let date_filter = args.get(1).map(|s| s.as_str());

    let db_path = get_database_path();
    println!("Database: {}", db_path.display());

    let database = nutritrack::db::Database::new(&db_path)?;

    database.with_conn(|conn| {
        let days = match date_filter {
            Some(date) => match Day::get_by_date(conn, date)? {
                Some(day) => vec![day],
                None => {
                    println!("No data found for date: {}", date);
                    return Ok(());
                }
            },
            // No filter: walk everything
            None => Day::list(conn, None, None, i64::MAX, 0)?,
        };

        println!("Recalculating {} day(s)", days.len());

        for day in &days {
            let entries = DiaryEntry::get_for_day(conn, day.id)?;
            let old_calories = day.cached_nutrition.calories;

            let total = recalculate_day_totals(conn, day.id)?;

            println!(
                "{}: {} entries, calories {:.1} -> {:.1}",
                day.date,
                entries.len(),
                old_calories,
                total.calories
            );
        }

        Ok(())
    })?;

    Ok(())
}
