use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::dates::normalize_date;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[sqlx(type_name = "activity_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Running,
    Walking,
    Cycling,
    Swimming,
    Gym,
    Yoga,
    Dancing,
    Sports,
    Hiking,
    Other,
}

impl ActivityType {
    pub const ALL: [ActivityType; 10] = [
        ActivityType::Running,
        ActivityType::Walking,
        ActivityType::Cycling,
        ActivityType::Swimming,
        ActivityType::Gym,
        ActivityType::Yoga,
        ActivityType::Dancing,
        ActivityType::Sports,
        ActivityType::Hiking,
        ActivityType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Running => "running",
            ActivityType::Walking => "walking",
            ActivityType::Cycling => "cycling",
            ActivityType::Swimming => "swimming",
            ActivityType::Gym => "gym",
            ActivityType::Yoga => "yoga",
            ActivityType::Dancing => "dancing",
            ActivityType::Sports => "sports",
            ActivityType::Hiking => "hiking",
            ActivityType::Other => "other",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == needle)
            .ok_or_else(|| AppError::InvalidArgument(format!("Unknown activity type: {s}")))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[sqlx(type_name = "activity_intensity", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Light,
    Moderate,
    Vigorous,
    VeryVigorous,
}

impl Intensity {
    pub const ALL: [Intensity; 4] = [
        Intensity::Light,
        Intensity::Moderate,
        Intensity::Vigorous,
        Intensity::VeryVigorous,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intensity::Light => "light",
            Intensity::Moderate => "moderate",
            Intensity::Vigorous => "vigorous",
            Intensity::VeryVigorous => "very_vigorous",
        }
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intensity {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|i| i.as_str() == needle)
            .ok_or_else(|| AppError::InvalidArgument(format!("Unknown intensity: {s}")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ActivityEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub activity_type: ActivityType,
    pub duration_minutes: i32,
    pub intensity: Intensity,
    pub calories_burned: i32,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/tracking/activity`. Fields are optional here so that a
/// missing field yields a validation error in the standard envelope.
#[derive(Debug, Deserialize)]
pub struct LogActivityRequest {
    pub date: Option<String>,
    pub activity_type: Option<String>,
    pub duration_minutes: Option<i32>,
    pub intensity: Option<String>,
    pub description: Option<String>,
}

/// A validated activity ready to be estimated and stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivity {
    pub date: NaiveDate,
    pub activity_type: ActivityType,
    pub duration_minutes: i32,
    pub intensity: Intensity,
    pub description: Option<String>,
}

impl LogActivityRequest {
    pub fn into_new_activity(self) -> AppResult<NewActivity> {
        let date = self
            .date
            .as_deref()
            .ok_or_else(|| AppError::Validation("Date is required".into()))
            .and_then(normalize_date)?;

        let activity_type: ActivityType = required(self.activity_type.as_deref(), "Activity type")?
            .parse()?;
        let intensity: Intensity = required(self.intensity.as_deref(), "Intensity")?.parse()?;

        let duration_minutes = self
            .duration_minutes
            .ok_or_else(|| AppError::Validation("Duration is required".into()))?;
        if !(1..=1440).contains(&duration_minutes) {
            return Err(AppError::Validation(
                "Duration must be between 1 and 1440 minutes".into(),
            ));
        }

        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(NewActivity {
            date,
            activity_type,
            duration_minutes,
            intensity,
            description,
        })
    }
}

fn required<'a>(value: Option<&'a str>, field: &str) -> AppResult<&'a str> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Validation(format!("{field} is required")))
}

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DailySummary {
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub total_activities: i64,
    pub total_duration: i64,
    pub total_calories_burned: i64,
    pub activities_performed: Vec<ActivityType>,
    pub calories_consumed: i64,
    pub calories_burned: i64,
    pub net_calories: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_type_parses_case_insensitively() {
        assert_eq!("Running".parse::<ActivityType>().unwrap(), ActivityType::Running);
        assert_eq!(" gym ".parse::<ActivityType>().unwrap(), ActivityType::Gym);
    }

    #[test]
    fn test_unknown_activity_type_is_rejected() {
        let err = "crossfit".parse::<ActivityType>().unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[test]
    fn test_intensity_wire_format_is_snake_case() {
        assert_eq!(
            serde_json::to_string(&Intensity::VeryVigorous).unwrap(),
            "\"very_vigorous\""
        );
        assert_eq!(
            "very_vigorous".parse::<Intensity>().unwrap(),
            Intensity::VeryVigorous
        );
        assert!("extreme".parse::<Intensity>().is_err());
    }
    fn request() -> LogActivityRequest {
        LogActivityRequest {
            date: Some("2024-01-01T08:00:00Z".into()),
            activity_type: Some("running".into()),
            duration_minutes: Some(30),
            intensity: Some("moderate".into()),
            description: Some("  ".into()),
        }
    }

    #[test]
    fn test_request_normalizes_into_new_activity() {
        let new = request().into_new_activity().unwrap();
        assert_eq!(new.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(new.activity_type, ActivityType::Running);
        assert_eq!(new.intensity, Intensity::Moderate);
        assert_eq!(new.description, None);
    }

    #[test]
    fn test_missing_fields_are_validation_errors() {
        let mut no_date = request();
        no_date.date = None;
        let mut no_type = request();
        no_type.activity_type = Some(String::new());
        let mut no_duration = request();
        no_duration.duration_minutes = None;
        let mut zero_duration = request();
        zero_duration.duration_minutes = Some(0);

        for req in [no_date, no_type, no_duration, zero_duration] {
            assert!(matches!(
                req.into_new_activity().unwrap_err(),
                AppError::Validation(_)
            ));
        }
    }

    #[test]
    fn test_unknown_type_in_request_is_invalid_argument() {
        let mut req = request();
        req.activity_type = Some("quidditch".into());
        assert!(matches!(
            req.into_new_activity().unwrap_err(),
            AppError::InvalidArgument(_)
        ));
    }
}
