//! Per-day roll-up of activity, calorie and nutrition rows.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::activity::{ActivityEntry, ActivityType, DailySummary};
use crate::models::nutrition::NutritionLog;
use crate::models::tracking::CalorieEntry;

#[derive(Default)]
struct DayBucket<'a> {
    activities: i64,
    duration: i64,
    activity_kcal: i64,
    /// Keyed by wire name so the list comes out alphabetical.
    performed: BTreeMap<&'static str, ActivityType>,
    nutrition_kcal: i64,
    calorie_entry: Option<&'a CalorieEntry>,
}

/// Picks the most recently created calorie row; equal timestamps fall back to
/// the larger id so the choice never depends on input order.
pub fn latest_calorie_entry<'a>(
    current: Option<&'a CalorieEntry>,
    candidate: &'a CalorieEntry,
) -> &'a CalorieEntry {
    match current {
        Some(cur) if (cur.created_at, cur.id) >= (candidate.created_at, candidate.id) => cur,
        _ => candidate,
    }
}

/// Groups rows by calendar day within `[start, end]` and returns one summary
/// per day that has at least one contributing row, most recent day first.
/// `activities_performed` is deduplicated and sorted by name.
///
/// `calories_consumed`/`calories_burned` come from the day's latest
/// [`CalorieEntry`] when there is one, otherwise from the nutrition and
/// activity sums. `total_calories_burned` is always the activity sum.
pub fn aggregate_daily(
    user_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
    activities: &[ActivityEntry],
    calories: &[CalorieEntry],
    nutrition: &[NutritionLog],
) -> Vec<DailySummary> {
    let in_range = |date: NaiveDate| date >= start && date <= end;
    let mut days: BTreeMap<NaiveDate, DayBucket<'_>> = BTreeMap::new();

    for a in activities.iter().filter(|a| in_range(a.date)) {
        let bucket = days.entry(a.date).or_default();
        bucket.activities += 1;
        bucket.duration += i64::from(a.duration_minutes);
        bucket.activity_kcal += i64::from(a.calories_burned);
        bucket.performed.insert(a.activity_type.as_str(), a.activity_type);
    }

    for c in calories.iter().filter(|c| in_range(c.date)) {
        let bucket = days.entry(c.date).or_default();
        bucket.calorie_entry = Some(latest_calorie_entry(bucket.calorie_entry, c));
    }

    for n in nutrition.iter().filter(|n| in_range(n.date)) {
        days.entry(n.date).or_default().nutrition_kcal += i64::from(n.calories);
    }

    days.into_iter()
        .rev()
        .map(|(date, bucket)| {
            let (consumed, burned) = match bucket.calorie_entry {
                Some(entry) => (
                    i64::from(entry.calories_consumed),
                    i64::from(entry.calories_burned),
                ),
                None => (bucket.nutrition_kcal, bucket.activity_kcal),
            };

            DailySummary {
                user_id,
                date,
                total_activities: bucket.activities,
                total_duration: bucket.duration,
                total_calories_burned: bucket.activity_kcal,
                activities_performed: bucket.performed.into_values().collect(),
                calories_consumed: consumed,
                calories_burned: burned,
                net_calories: consumed - burned,
            }
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    use crate::models::activity::{ActivityEntry, ActivityType, Intensity};
    use crate::models::nutrition::{Meal, NutritionLog};
    use crate::models::tracking::CalorieEntry;

    pub fn user() -> Uuid {
        Uuid::from_u128(0x42)
    }

    pub fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    pub fn at(s: &str, minutes: i64) -> DateTime<Utc> {
        let midnight = date(s).and_hms_opt(0, 0, 0).unwrap();
        Utc.from_utc_datetime(&midnight) + Duration::minutes(minutes)
    }

    pub fn activity(day: &str, kind: ActivityType, minutes: i32, kcal: i32) -> ActivityEntry {
        ActivityEntry {
            id: Uuid::new_v4(),
            user_id: user(),
            date: date(day),
            activity_type: kind,
            duration_minutes: minutes,
            intensity: Intensity::Moderate,
            calories_burned: kcal,
            description: None,
            created_at: at(day, 60),
        }
    }

    pub fn calories(day: &str, consumed: i32, burned: i32, created_min: i64) -> CalorieEntry {
        CalorieEntry {
            id: Uuid::new_v4(),
            user_id: user(),
            date: date(day),
            calories_consumed: consumed,
            calories_burned: burned,
            net_calories: consumed - burned,
            created_at: at(day, created_min),
            updated_at: at(day, created_min),
        }
    }

    pub fn meal(day: &str, kcal: i32) -> NutritionLog {
        NutritionLog {
            id: Uuid::new_v4(),
            user_id: user(),
            date: date(day),
            meal: Meal::Lunch,
            food_items: vec!["rice".into(), "beans".into()],
            calories: kcal,
            protein: 20.0,
            carbs: 80.0,
            fat: 10.0,
            fiber: 12.0,
            created_at: at(day, 720),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_two_activities_on_one_day() {
        let rows = vec![
            activity("2024-01-01", ActivityType::Running, 30, 291),
            activity("2024-01-01", ActivityType::Walking, 45, 153),
        ];

        let out = aggregate_daily(user(), date("2024-01-01"), date("2024-01-01"), &rows, &[], &[]);

        assert_eq!(out.len(), 1);
        let day = &out[0];
        assert_eq!(day.date, date("2024-01-01"));
        assert_eq!(day.total_activities, 2);
        assert_eq!(day.total_duration, 75);
        assert_eq!(day.total_calories_burned, 444);
        assert_eq!(
            day.activities_performed,
            vec![ActivityType::Running, ActivityType::Walking]
        );
        assert_eq!(day.calories_burned, 444);
        assert_eq!(day.net_calories, -444);
    }

    #[test]
    fn test_activities_performed_are_alphabetical() {
        let rows = vec![
            activity("2024-01-01", ActivityType::Walking, 20, 70),
            activity("2024-01-01", ActivityType::Cycling, 30, 200),
            activity("2024-01-01", ActivityType::Walking, 10, 35),
        ];

        let out = aggregate_daily(user(), date("2024-01-01"), date("2024-01-01"), &rows, &[], &[]);

        assert_eq!(
            out[0].activities_performed,
            vec![ActivityType::Cycling, ActivityType::Walking]
        );
    }

    #[test]
    fn test_empty_input_gives_empty_output() {
        let out = aggregate_daily(user(), date("2024-01-01"), date("2024-01-31"), &[], &[], &[]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_rows_outside_range_are_ignored() {
        let rows = vec![
            activity("2023-12-31", ActivityType::Cycling, 60, 400),
            activity("2024-02-01", ActivityType::Yoga, 30, 90),
        ];
        let cals = vec![calories("2024-02-01", 2000, 300, 10)];

        let out = aggregate_daily(user(), date("2024-01-01"), date("2024-01-31"), &rows, &cals, &[]);
        assert_eq!(out, Vec::new());
    }

    #[test]
    fn test_output_is_most_recent_first() {
        let rows = vec![
            activity("2024-01-02", ActivityType::Running, 20, 190),
            activity("2024-01-05", ActivityType::Running, 20, 190),
            activity("2024-01-03", ActivityType::Running, 20, 190),
        ];
        let out = aggregate_daily(user(), date("2024-01-01"), date("2024-01-07"), &rows, &[], &[]);
        let dates: Vec<_> = out.iter().map(|s| s.date).collect();
        assert_eq!(
            dates,
            vec![date("2024-01-05"), date("2024-01-03"), date("2024-01-02")]
        );
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let mut rows = vec![
            activity("2024-01-01", ActivityType::Running, 30, 291),
            activity("2024-01-02", ActivityType::Hiking, 90, 500),
            activity("2024-01-01", ActivityType::Walking, 45, 153),
            activity("2024-01-02", ActivityType::Gym, 40, 230),
        ];
        let mut cals = vec![
            calories("2024-01-02", 2100, 700, 5),
            calories("2024-01-02", 2300, 800, 30),
        ];
        let mut meals = vec![meal("2024-01-01", 650), meal("2024-01-01", 720)];

        let forward = aggregate_daily(user(), date("2024-01-01"), date("2024-01-02"), &rows, &cals, &meals);
        rows.reverse();
        cals.reverse();
        meals.reverse();
        let backward = aggregate_daily(user(), date("2024-01-01"), date("2024-01-02"), &rows, &cals, &meals);

        assert_eq!(forward, backward);
    }

    #[test]
    fn test_totals_match_raw_rows_in_range() {
        let rows = vec![
            activity("2023-12-31", ActivityType::Running, 15, 140),
            activity("2024-01-01", ActivityType::Running, 30, 291),
            activity("2024-01-03", ActivityType::Swimming, 40, 320),
            activity("2024-01-03", ActivityType::Dancing, 25, 130),
            activity("2024-01-09", ActivityType::Sports, 50, 410),
        ];
        let (start, end) = (date("2024-01-01"), date("2024-01-07"));

        let out = aggregate_daily(user(), start, end, &rows, &[], &[]);

        let in_range: Vec<_> = rows.iter().filter(|r| r.date >= start && r.date <= end).collect();
        let raw_duration: i64 = in_range.iter().map(|r| i64::from(r.duration_minutes)).sum();
        let raw_kcal: i64 = in_range.iter().map(|r| i64::from(r.calories_burned)).sum();

        assert_eq!(out.iter().map(|s| s.total_duration).sum::<i64>(), raw_duration);
        assert_eq!(out.iter().map(|s| s.total_calories_burned).sum::<i64>(), raw_kcal);
    }

    #[test]
    fn test_calorie_entry_overrides_derived_net() {
        let rows = vec![activity("2024-01-01", ActivityType::Running, 30, 291)];
        let cals = vec![
            calories("2024-01-01", 1800, 500, 10),
            calories("2024-01-01", 2200, 600, 90),
        ];
        let meals = vec![meal("2024-01-01", 900)];

        let out = aggregate_daily(user(), date("2024-01-01"), date("2024-01-01"), &rows, &cals, &meals);
        let day = &out[0];

        assert_eq!(day.calories_consumed, 2200);
        assert_eq!(day.calories_burned, 600);
        assert_eq!(day.net_calories, 1600);
        assert_eq!(day.total_calories_burned, 291);
    }

    #[test]
    fn test_nutrition_and_activity_fallback_for_net() {
        let rows = vec![activity("2024-01-01", ActivityType::Cycling, 60, 476)];
        let meals = vec![meal("2024-01-01", 650), meal("2024-01-01", 850)];

        let out = aggregate_daily(user(), date("2024-01-01"), date("2024-01-01"), &rows, &[], &meals);
        let day = &out[0];

        assert_eq!(day.calories_consumed, 1500);
        assert_eq!(day.calories_burned, 476);
        assert_eq!(day.net_calories, 1024);
    }

    #[test]
    fn test_day_with_only_calorie_entry_is_reported() {
        let cals = vec![calories("2024-01-04", 2000, 250, 0)];
        let out = aggregate_daily(user(), date("2024-01-01"), date("2024-01-07"), &[], &cals, &[]);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].total_activities, 0);
        assert!(out[0].activities_performed.is_empty());
        assert_eq!(out[0].net_calories, 1750);
    }
}
