//! Daily goal derivation
//!
//! Harris-Benedict basal metabolic rate, activity-adjusted calorie
//! target, macro goals, and BMI classification.

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Daily fiber goal in grams, independent of the profile
pub const FIBER_GOAL_G: u32 = 25;

/// Daily water goal in milliliters, independent of the profile
pub const WATER_GOAL_ML: u32 = 2000;

/// Biological sex, selects the BMR formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    /// Parse from string. Unknown values are rejected, not defaulted.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(ValidationError::UnknownValue {
                field: "gender",
                value: s.to_string(),
            }),
        }
    }
}

/// Physical activity level, scales the BMR into a daily expenditure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    Extra,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::Extra => "extra",
        }
    }

    /// Parse from string. Unknown values are rejected, not defaulted.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.trim().to_lowercase().as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" => Ok(ActivityLevel::Light),
            "moderate" => Ok(ActivityLevel::Moderate),
            "active" => Ok(ActivityLevel::Active),
            "extra" => Ok(ActivityLevel::Extra),
            _ => Err(ValidationError::UnknownValue {
                field: "activity_level",
                value: s.to_string(),
            }),
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::Extra => 1.9,
        }
    }
}

/// What the user is working toward, shifts the calorie target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthGoal {
    Lose,
    Maintain,
    Gain,
    Muscle,
    Health,
}

impl HealthGoal {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthGoal::Lose => "lose",
            HealthGoal::Maintain => "maintain",
            HealthGoal::Gain => "gain",
            HealthGoal::Muscle => "muscle",
            HealthGoal::Health => "health",
        }
    }

    /// Parse from string. Unknown values are rejected, not defaulted.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.trim().to_lowercase().as_str() {
            "lose" => Ok(HealthGoal::Lose),
            "maintain" => Ok(HealthGoal::Maintain),
            "gain" => Ok(HealthGoal::Gain),
            "muscle" => Ok(HealthGoal::Muscle),
            "health" => Ok(HealthGoal::Health),
            _ => Err(ValidationError::UnknownValue {
                field: "health_goal",
                value: s.to_string(),
            }),
        }
    }

    /// Additive calorie adjustment in kcal/day
    pub fn calorie_adjustment(&self) -> f64 {
        match self {
            HealthGoal::Lose => -300.0,
            HealthGoal::Maintain => 0.0,
            HealthGoal::Gain => 300.0,
            HealthGoal::Muscle => 200.0,
            HealthGoal::Health => 0.0,
        }
    }
}

/// BMI band. Boundary values belong to the lower band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    MildlyObese,
    ModeratelyObese,
    SeverelyObese,
}

impl BmiCategory {
    pub fn classify(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 24.0 {
            BmiCategory::Normal
        } else if bmi < 27.0 {
            BmiCategory::Overweight
        } else if bmi < 30.0 {
            BmiCategory::MildlyObese
        } else if bmi < 35.0 {
            BmiCategory::ModeratelyObese
        } else {
            BmiCategory::SeverelyObese
        }
    }
}

/// Validated profile fields the goal derivation needs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalInput {
    pub age: u32,
    pub gender: Gender,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity_level: ActivityLevel,
    pub health_goal: HealthGoal,
}

/// Derived daily goals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goals {
    /// Basal metabolic rate in kcal/day
    pub bmr: u32,
    /// Daily calorie target in kcal/day
    pub daily_calories: u32,
    /// Daily protein target in g/day
    pub protein_goal: u32,
    /// Daily fiber target in g/day
    pub fiber_goal: u32,
    /// Daily water target in ml/day
    pub water_goal: u32,
    /// Body mass index, one decimal place
    pub bmi: f64,
    pub bmi_category: BmiCategory,
}

/// Derive daily goals from a profile.
///
/// Pure and deterministic. Fails with [`ValidationError`] when age,
/// height, or weight is not a positive finite number.
pub fn compute_goals(input: &GoalInput) -> Result<Goals, ValidationError> {
    if input.age == 0 {
        return Err(ValidationError::NonPositive("age"));
    }
    if !input.height_cm.is_finite() || input.height_cm <= 0.0 {
        return Err(ValidationError::NonPositive("height"));
    }
    if !input.weight_kg.is_finite() || input.weight_kg <= 0.0 {
        return Err(ValidationError::NonPositive("weight"));
    }

    let age = f64::from(input.age);
    let bmr = match input.gender {
        Gender::Male => {
            88.362 + 13.397 * input.weight_kg + 4.799 * input.height_cm - 5.677 * age
        }
        Gender::Female => {
            447.593 + 9.247 * input.weight_kg + 3.098 * input.height_cm - 4.330 * age
        }
    };

    let calories = bmr * input.activity_level.multiplier() + input.health_goal.calorie_adjustment();
    let daily_calories = calories.round().max(0.0) as u32;

    // 25% of calories from protein, 4 kcal per gram
    let protein_goal = (f64::from(daily_calories) * 0.25 / 4.0).round() as u32;

    let height_m = input.height_cm / 100.0;
    let bmi = (input.weight_kg / (height_m * height_m) * 10.0).round() / 10.0;

    Ok(Goals {
        bmr: bmr.round().max(0.0) as u32,
        daily_calories,
        protein_goal,
        fiber_goal: FIBER_GOAL_G,
        water_goal: WATER_GOAL_ML,
        bmi,
        bmi_category: BmiCategory::classify(bmi),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_profile() -> GoalInput {
        GoalInput {
            age: 30,
            gender: Gender::Male,
            height_cm: 175.0,
            weight_kg: 70.0,
            activity_level: ActivityLevel::Moderate,
            health_goal: HealthGoal::Maintain,
        }
    }

    #[test]
    fn test_reference_male_profile() {
        // bmr = 88.362 + 13.397*70 + 4.799*175 - 5.677*30 = 1694.297
        let goals = compute_goals(&reference_profile()).unwrap();
        assert_eq!(goals.bmr, 1694);
        assert_eq!(goals.daily_calories, 2626); // round(1694.297 * 1.55)
        assert_eq!(goals.protein_goal, 164); // round(2626 * 0.25 / 4)
        assert_eq!(goals.fiber_goal, 25);
        assert_eq!(goals.water_goal, 2000);
    }

    #[test]
    fn test_female_formula() {
        let goals = compute_goals(&GoalInput {
            age: 25,
            gender: Gender::Female,
            height_cm: 160.0,
            weight_kg: 55.0,
            activity_level: ActivityLevel::Sedentary,
            health_goal: HealthGoal::Maintain,
        })
        .unwrap();
        // bmr = 447.593 + 9.247*55 + 3.098*160 - 4.330*25 = 1344.328
        assert_eq!(goals.bmr, 1344);
        assert_eq!(goals.daily_calories, 1613); // round(1344.328 * 1.2)
    }

    #[test]
    fn test_goal_adjustments() {
        let base = compute_goals(&reference_profile()).unwrap();

        let mut input = reference_profile();
        input.health_goal = HealthGoal::Lose;
        assert_eq!(
            compute_goals(&input).unwrap().daily_calories,
            base.daily_calories - 300
        );

        input.health_goal = HealthGoal::Gain;
        assert_eq!(
            compute_goals(&input).unwrap().daily_calories,
            base.daily_calories + 300
        );

        input.health_goal = HealthGoal::Muscle;
        assert_eq!(
            compute_goals(&input).unwrap().daily_calories,
            base.daily_calories + 200
        );

        input.health_goal = HealthGoal::Health;
        assert_eq!(compute_goals(&input).unwrap().daily_calories, base.daily_calories);
    }

    #[test]
    fn test_deterministic() {
        let input = reference_profile();
        assert_eq!(compute_goals(&input).unwrap(), compute_goals(&input).unwrap());
    }

    #[test]
    fn test_unknown_activity_level_rejected() {
        assert!(matches!(
            ActivityLevel::parse("extreme"),
            Err(ValidationError::UnknownValue { field: "activity_level", .. })
        ));
    }

    #[test]
    fn test_unknown_gender_and_goal_rejected() {
        assert!(Gender::parse("other").is_err());
        assert!(HealthGoal::parse("bulk").is_err());
    }

    #[test]
    fn test_non_positive_inputs_rejected() {
        let mut input = reference_profile();
        input.age = 0;
        assert_eq!(compute_goals(&input), Err(ValidationError::NonPositive("age")));

        let mut input = reference_profile();
        input.height_cm = 0.0;
        assert_eq!(compute_goals(&input), Err(ValidationError::NonPositive("height")));

        let mut input = reference_profile();
        input.weight_kg = -70.0;
        assert_eq!(compute_goals(&input), Err(ValidationError::NonPositive("weight")));

        let mut input = reference_profile();
        input.weight_kg = f64::NAN;
        assert_eq!(compute_goals(&input), Err(ValidationError::NonPositive("weight")));
    }

    #[test]
    fn test_bmi_rounding_and_bands() {
        let goals = compute_goals(&reference_profile()).unwrap();
        // 70 / 1.75^2 = 22.857... -> 22.9
        assert_eq!(goals.bmi, 22.9);
        assert_eq!(goals.bmi_category, BmiCategory::Normal);
    }

    #[test]
    fn test_bmi_band_boundaries() {
        // Boundary values belong to the lower band
        assert_eq!(BmiCategory::classify(18.4), BmiCategory::Underweight);
        assert_eq!(BmiCategory::classify(18.5), BmiCategory::Normal);
        assert_eq!(BmiCategory::classify(23.9), BmiCategory::Normal);
        assert_eq!(BmiCategory::classify(24.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::classify(27.0), BmiCategory::MildlyObese);
        assert_eq!(BmiCategory::classify(30.0), BmiCategory::ModeratelyObese);
        assert_eq!(BmiCategory::classify(35.0), BmiCategory::SeverelyObese);
    }
}
