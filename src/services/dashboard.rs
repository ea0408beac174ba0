//! Today's stats for the dashboard, built from rows fetched independently.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::activity::{ActivityEntry, DailySummary};
use crate::models::nutrition::NutritionLog;
use crate::models::tracking::{CalorieEntry, SleepEntry, WeightEntry};
use crate::services::aggregation::latest_calorie_entry;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TodayStats {
    pub calories_consumed: i64,
    pub calories_burned: i64,
    pub sleep_hours: Option<f64>,
    pub weight: Option<f64>,
    pub activities: Vec<ActivityEntry>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub date: NaiveDate,
    pub today: TodayStats,
    pub history: Option<Vec<DailySummary>>,
    pub weight_trend: Option<Vec<WeightEntry>>,
    pub sleep_trend: Option<Vec<SleepEntry>>,
    /// Sections whose data could not be loaded; the rest of the response is still valid.
    pub unavailable: Vec<&'static str>,
}

/// Rows for one day, each `None` when its fetch failed.
#[derive(Debug, Default)]
pub struct DayRows {
    pub activities: Option<Vec<ActivityEntry>>,
    pub calories: Option<Vec<CalorieEntry>>,
    pub nutrition: Option<Vec<NutritionLog>>,
    pub sleep: Option<Vec<SleepEntry>>,
    pub weights: Option<Vec<WeightEntry>>,
}

/// Latest sleep row for `date` by creation time, ties broken by id.
pub fn latest_sleep_for(rows: &[SleepEntry], date: NaiveDate) -> Option<&SleepEntry> {
    rows.iter()
        .filter(|s| s.date == date)
        .max_by_key(|s| (s.created_at, s.id))
}

/// Most recent weigh-in on or before `date`.
pub fn latest_weight_as_of(rows: &[WeightEntry], date: NaiveDate) -> Option<&WeightEntry> {
    rows.iter()
        .filter(|w| w.date <= date)
        .max_by_key(|w| (w.date, w.created_at, w.id))
}

pub fn today_stats(date: NaiveDate, rows: &DayRows) -> TodayStats {
    let activities: Vec<ActivityEntry> = rows
        .activities
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter(|a| a.date == date)
        .cloned()
        .collect();

    let calorie_entry = rows
        .calories
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter(|c| c.date == date)
        .fold(None, |latest, c| Some(latest_calorie_entry(latest, c)));

    let (calories_consumed, calories_burned) = match calorie_entry {
        Some(entry) => (
            i64::from(entry.calories_consumed),
            i64::from(entry.calories_burned),
        ),
        None => {
            let consumed = rows
                .nutrition
                .as_deref()
                .unwrap_or_default()
                .iter()
                .filter(|n| n.date == date)
                .map(|n| i64::from(n.calories))
                .sum();
            let burned = activities.iter().map(|a| i64::from(a.calories_burned)).sum();
            (consumed, burned)
        }
    };

    TodayStats {
        calories_consumed,
        calories_burned,
        sleep_hours: rows
            .sleep
            .as_deref()
            .and_then(|s| latest_sleep_for(s, date))
            .map(|s| s.duration_hours),
        weight: rows
            .weights
            .as_deref()
            .and_then(|w| latest_weight_as_of(w, date))
            .map(|w| w.weight),
        activities,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity::ActivityType;
    use crate::models::tracking::SleepQuality;
    use crate::services::aggregation::fixtures::*;
    use uuid::Uuid;

    fn weight(day: &str, kg: f64, created_min: i64) -> WeightEntry {
        WeightEntry {
            id: Uuid::new_v4(),
            user_id: user(),
            date: date(day),
            weight: kg,
            created_at: at(day, created_min),
        }
    }

    fn sleep(day: &str, hours: f64, created_min: i64) -> SleepEntry {
        SleepEntry {
            id: Uuid::new_v4(),
            user_id: user(),
            date: date(day),
            duration_hours: hours,
            quality: SleepQuality::Good,
            created_at: at(day, created_min),
        }
    }

    #[test]
    fn test_latest_same_day_entry_wins_regardless_of_position() {
        let rows = DayRows {
            sleep: Some(vec![
                sleep("2024-01-01", 8.0, 600),
                sleep("2024-01-01", 6.5, 30),
            ]),
            weights: Some(vec![
                weight("2024-01-01", 71.2, 900),
                weight("2024-01-01", 70.4, 60),
            ]),
            ..Default::default()
        };

        let stats = today_stats(date("2024-01-01"), &rows);
        assert_eq!(stats.sleep_hours, Some(8.0));
        assert_eq!(stats.weight, Some(71.2));
    }

    #[test]
    fn test_weight_falls_back_to_previous_days() {
        let rows = DayRows {
            weights: Some(vec![
                weight("2023-12-28", 72.0, 0),
                weight("2023-12-30", 71.5, 0),
                weight("2024-01-05", 70.0, 0),
            ]),
            ..Default::default()
        };
        let stats = today_stats(date("2024-01-01"), &rows);
        assert_eq!(stats.weight, Some(71.5));
        assert_eq!(stats.sleep_hours, None);
    }

    #[test]
    fn test_calories_prefer_logged_entry() {
        let rows = DayRows {
            activities: Some(vec![activity("2024-01-01", ActivityType::Running, 30, 291)]),
            calories: Some(vec![calories("2024-01-01", 2100, 450, 120)]),
            nutrition: Some(vec![meal("2024-01-01", 700)]),
            ..Default::default()
        };
        let stats = today_stats(date("2024-01-01"), &rows);
        assert_eq!(stats.calories_consumed, 2100);
        assert_eq!(stats.calories_burned, 450);
        assert_eq!(stats.activities.len(), 1);
    }

    #[test]
    fn test_calories_derived_from_meals_and_activities() {
        let rows = DayRows {
            activities: Some(vec![
                activity("2024-01-01", ActivityType::Running, 30, 291),
                activity("2024-01-01", ActivityType::Walking, 45, 153),
                activity("2023-12-31", ActivityType::Walking, 45, 153),
            ]),
            nutrition: Some(vec![meal("2024-01-01", 700), meal("2024-01-01", 550)]),
            ..Default::default()
        };
        let stats = today_stats(date("2024-01-01"), &rows);
        assert_eq!(stats.calories_consumed, 1250);
        assert_eq!(stats.calories_burned, 444);
        assert_eq!(stats.activities.len(), 2);
    }

    #[test]
    fn test_missing_sections_render_as_empty() {
        let stats = today_stats(date("2024-01-01"), &DayRows::default());
        assert_eq!(
            stats,
            TodayStats {
                calories_consumed: 0,
                calories_burned: 0,
                sleep_hours: None,
                weight: None,
                activities: vec![],
            }
        );
    }

    #[test]
    fn test_today_stats_wire_names() {
        let stats = today_stats(date("2024-01-01"), &DayRows::default());
        let json = serde_json::to_value(&stats).unwrap();
        for key in ["caloriesConsumed", "caloriesBurned", "sleepHours", "weight", "activities"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }
}
