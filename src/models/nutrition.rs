//! Shared nutrient data structure
//!
//! Used across the food catalog, diary entries, and day totals. Values
//! are interpreted on a per-100g basis in the catalog and as absolute
//! consumed amounts in diary entries and day caches.

use serde::{Deserialize, Serialize};

/// Nutrient amounts: kcal for calories, grams for everything else.
///
/// Every field defaults to zero so partial records from older entry
/// shapes deserialize without error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutrientProfile {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    pub sugar: f64,
}

impl NutrientProfile {
    /// Create a new NutrientProfile with all zeros
    pub fn zero() -> Self {
        Self::default()
    }

    /// Scale nutrient values by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        Self {
            calories: self.calories * multiplier,
            protein: self.protein * multiplier,
            carbs: self.carbs * multiplier,
            fat: self.fat * multiplier,
            fiber: self.fiber * multiplier,
            sugar: self.sugar * multiplier,
        }
    }

    /// Add another profile to this one
    pub fn add(&self, other: &NutrientProfile) -> Self {
        Self {
            calories: self.calories + other.calories,
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fat: self.fat + other.fat,
            fiber: self.fiber + other.fiber,
            sugar: self.sugar + other.sugar,
        }
    }

    /// Rounding applied to persisted values: calories to the nearest
    /// kcal, gram-valued nutrients to one decimal.
    pub fn rounded_for_storage(&self) -> Self {
        Self {
            calories: self.calories.round(),
            protein: round1(self.protein),
            carbs: round1(self.carbs),
            fat: round1(self.fat),
            fiber: round1(self.fiber),
            sugar: round1(self.sugar),
        }
    }
}

/// Round to one decimal place
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl std::ops::Add for NutrientProfile {
    type Output = NutrientProfile;

    fn add(self, other: NutrientProfile) -> NutrientProfile {
        NutrientProfile::add(&self, &other)
    }
}

impl std::ops::Mul<f64> for NutrientProfile {
    type Output = NutrientProfile;

    fn mul(self, multiplier: f64) -> NutrientProfile {
        self.scale(multiplier)
    }
}

impl std::iter::Sum for NutrientProfile {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(NutrientProfile::zero(), |acc, n| acc + n)
    }
}
