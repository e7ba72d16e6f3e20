//! Portion scaling
//!
//! Converts a per-100g nutrient profile to an actual consumed weight.

use crate::models::NutrientProfile;

use super::ValidationError;

/// Check that a portion weight is usable: positive and finite grams.
pub fn validate_weight(weight_g: f64) -> Result<(), ValidationError> {
    if !weight_g.is_finite() || weight_g <= 0.0 {
        return Err(ValidationError::NonPositive("weight"));
    }
    Ok(())
}

/// Scale a per-100g profile to `actual_weight_g` grams of food.
///
/// The result carries storage rounding: whole kcal, one decimal for
/// gram-valued nutrients.
pub fn scale_to_weight(
    standard: &NutrientProfile,
    actual_weight_g: f64,
) -> Result<NutrientProfile, ValidationError> {
    validate_weight(actual_weight_g)?;
    Ok(standard.scale(actual_weight_g / 100.0).rounded_for_storage())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apple_per_100g() -> NutrientProfile {
        NutrientProfile {
            calories: 52.0,
            carbs: 14.0,
            fiber: 2.4,
            ..NutrientProfile::zero()
        }
    }

    #[test]
    fn test_scale_apple_to_250g() {
        let scaled = scale_to_weight(&apple_per_100g(), 250.0).unwrap();
        assert_eq!(scaled.calories, 130.0);
        assert_eq!(scaled.carbs, 35.0);
        assert_eq!(scaled.fiber, 6.0);
        assert_eq!(scaled.protein, 0.0);
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let std = apple_per_100g();
        assert!(scale_to_weight(&std, 0.0).is_err());
        assert!(scale_to_weight(&std, -5.0).is_err());
        assert!(scale_to_weight(&std, f64::NAN).is_err());
        assert!(scale_to_weight(&std, f64::INFINITY).is_err());
    }

    #[test]
    fn test_storage_rounding() {
        let std = NutrientProfile {
            calories: 52.4,
            protein: 0.33,
            ..NutrientProfile::zero()
        };
        let scaled = scale_to_weight(&std, 150.0).unwrap();
        assert_eq!(scaled.calories, 79.0); // 78.6 kcal -> whole kcal
        assert_eq!(scaled.protein, 0.5); // 0.495 g -> one decimal
    }

    #[test]
    fn test_rescale_from_baseline_never_compounds() {
        // Re-deriving from the same baseline matches rescaling the first
        // result directly, within one-decimal tolerance.
        let std = NutrientProfile {
            calories: 97.0,
            protein: 3.7,
            carbs: 11.3,
            fat: 4.1,
            fiber: 1.9,
            sugar: 2.3,
        };
        let first = scale_to_weight(&std, 130.0).unwrap();
        let second = scale_to_weight(&std, 220.0).unwrap();
        let direct = first.scale(220.0 / 130.0);
        assert!((second.calories - direct.calories).abs() <= 1.0);
        assert!((second.protein - direct.protein).abs() <= 0.1);
        assert!((second.carbs - direct.carbs).abs() <= 0.1);
        assert!((second.fat - direct.fat).abs() <= 0.1);
        assert!((second.fiber - direct.fiber).abs() <= 0.1);
        assert!((second.sugar - direct.sugar).abs() <= 0.1);
    }

    #[test]
    fn test_default_portion_is_identity() {
        let std = apple_per_100g();
        assert_eq!(scale_to_weight(&std, 100.0).unwrap(), std);
    }
}
