//! Calorie estimation from a fixed MET (metabolic equivalent) table.
//!
//! `calories = MET * weight_kg * hours`, rounded half away from zero.

use crate::error::{AppError, AppResult};
use crate::models::activity::{ActivityType, Intensity};

pub const DEFAULT_WEIGHT_KG: f64 = 70.0;

/// MET coefficients per activity, ordered light, moderate, vigorous,
/// very vigorous. Rows are non-decreasing left to right.
fn met_row(activity: ActivityType) -> [f64; 4] {
    match activity {
        ActivityType::Running => [6.0, 8.3, 11.0, 12.8],
        ActivityType::Walking => [2.5, 3.5, 4.3, 5.0],
        ActivityType::Cycling => [4.0, 6.8, 8.0, 10.0],
        ActivityType::Swimming => [4.5, 5.8, 8.3, 9.8],
        ActivityType::Gym => [3.5, 5.0, 6.0, 8.0],
        ActivityType::Yoga => [2.0, 2.5, 3.0, 4.0],
        ActivityType::Dancing => [3.0, 4.5, 5.5, 7.8],
        ActivityType::Sports => [4.0, 6.0, 8.0, 10.0],
        ActivityType::Hiking => [4.0, 5.3, 6.5, 7.8],
        ActivityType::Other => [2.5, 4.0, 6.0, 8.0],
    }
}

pub fn met(activity: ActivityType, intensity: Intensity) -> f64 {
    let row = met_row(activity);
    match intensity {
        Intensity::Light => row[0],
        Intensity::Moderate => row[1],
        Intensity::Vigorous => row[2],
        Intensity::VeryVigorous => row[3],
    }
}

/// Unrounded estimate in kcal.
pub fn estimate_calories_exact(
    activity: ActivityType,
    duration_minutes: f64,
    intensity: Intensity,
    weight_kg: f64,
) -> AppResult<f64> {
    if !duration_minutes.is_finite() || duration_minutes < 0.0 {
        return Err(AppError::InvalidArgument(format!(
            "Duration must be a non-negative number of minutes, got {duration_minutes}"
        )));
    }
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(AppError::InvalidArgument(format!(
            "Weight must be a positive number of kilograms, got {weight_kg}"
        )));
    }

    Ok(met(activity, intensity) * weight_kg * (duration_minutes / 60.0))
}

/// Estimated kcal burned, rounded to the nearest integer (halves round up).
pub fn estimate_calories(
    activity: ActivityType,
    duration_minutes: f64,
    intensity: Intensity,
    weight_kg: Option<f64>,
) -> AppResult<i64> {
    let kcal = estimate_calories_exact(
        activity,
        duration_minutes,
        intensity,
        weight_kg.unwrap_or(DEFAULT_WEIGHT_KG),
    )?;
    Ok(kcal.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Parses raw request strings the way the activity handler does.
    fn estimate_calories_from_str(
        activity: &str,
        duration_minutes: f64,
        intensity: &str,
        weight_kg: Option<f64>,
    ) -> AppResult<i64> {
        let activity: ActivityType = activity.parse()?;
        let intensity: Intensity = intensity.parse()?;
        estimate_calories(activity, duration_minutes, intensity, weight_kg)
    }

    #[test]
    fn test_running_thirty_minutes_moderate() {
        assert_eq!(met(ActivityType::Running, Intensity::Moderate), 8.3);
        // 8.3 * 70 * 0.5 = 290.5, halves round up.
        let kcal =
            estimate_calories(ActivityType::Running, 30.0, Intensity::Moderate, None).unwrap();
        assert_eq!(kcal, 291);
    }

    #[test]
    fn test_explicit_weight_overrides_default() {
        let kcal = estimate_calories(ActivityType::Walking, 60.0, Intensity::Moderate, Some(80.0))
            .unwrap();
        assert_eq!(kcal, 280);
    }

    #[test]
    fn test_doubling_duration_doubles_estimate() {
        for activity in ActivityType::ALL {
            for intensity in Intensity::ALL {
                let single = estimate_calories_exact(activity, 25.0, intensity, 70.0).unwrap();
                let double = estimate_calories_exact(activity, 50.0, intensity, 70.0).unwrap();
                assert!((double - 2.0 * single).abs() < 1e-9, "{activity}/{intensity}");

                let single = estimate_calories(activity, 25.0, intensity, None).unwrap();
                let double = estimate_calories(activity, 50.0, intensity, None).unwrap();
                assert!((double - 2 * single).abs() <= 1, "{activity}/{intensity}");
            }
        }
    }

    #[test]
    fn test_intensity_tiers_are_ordered_per_activity() {
        for activity in ActivityType::ALL {
            let kcal: Vec<i64> = Intensity::ALL
                .into_iter()
                .map(|i| estimate_calories(activity, 45.0, i, None).unwrap())
                .collect();
            assert!(
                kcal.windows(2).all(|w| w[0] <= w[1]),
                "{activity}: {kcal:?} is not ordered light <= moderate <= vigorous <= very_vigorous"
            );
        }
    }

    #[test]
    fn test_estimate_is_deterministic() {
        let a = estimate_calories(ActivityType::Swimming, 40.0, Intensity::Vigorous, Some(65.5));
        let b = estimate_calories(ActivityType::Swimming, 40.0, Intensity::Vigorous, Some(65.5));
        assert_eq!(a.unwrap(), b.unwrap());
    }

    #[test]
    fn test_zero_duration_burns_nothing() {
        let kcal = estimate_calories(ActivityType::Gym, 0.0, Intensity::Light, None).unwrap();
        assert_eq!(kcal, 0);
    }

    #[test]
    fn test_unknown_enum_values_fail_explicitly() {
        let err = estimate_calories_from_str("parkour", 30.0, "moderate", None).unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));

        let err = estimate_calories_from_str("running", 30.0, "insane", None).unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));

        assert_eq!(
            estimate_calories_from_str("other", 60.0, "moderate", None).unwrap(),
            280
        );
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        for (duration, weight) in [(-1.0, 70.0), (f64::NAN, 70.0), (30.0, 0.0), (30.0, -5.0)] {
            let err = estimate_calories_exact(ActivityType::Yoga, duration, Intensity::Light, weight)
                .unwrap_err();
            assert!(matches!(err, AppError::InvalidArgument(_)));
        }
    }
}
