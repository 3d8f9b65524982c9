//! Progress analytics over workout history (charts, breakdowns, calendar)

use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::workout::WorkoutRecord;

/// Days kept in the daily chart
const CHART_DAYS: usize = 14;
/// Exercises shown in the breakdown
const BREAKDOWN_TOP: usize = 5;
/// Length of the streak calendar
const CALENDAR_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    Week,
    #[default]
    Month,
    Quarter,
    All,
}

impl Period {
    fn days(&self) -> Option<i64> {
        match self {
            Period::Week => Some(7),
            Period::Month => Some(30),
            Period::Quarter => Some(90),
            Period::All => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Period::Week => "7 Days",
            Period::Month => "30 Days",
            Period::Quarter => "90 Days",
            Period::All => "All Time",
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "7d" => Ok(Period::Week),
            "30d" => Ok(Period::Month),
            "90d" => Ok(Period::Quarter),
            "all" => Ok(Period::All),
            other => Err(format!("unknown period '{}', expected 7d, 30d, 90d or all", other)),
        }
    }
}

/// Workouts inside `period`, oldest first
pub fn filter_period(history: &[WorkoutRecord], period: Period, today: NaiveDate) -> Vec<&WorkoutRecord> {
    let cutoff = period.days().map(|d| today - Duration::days(d));
    history
        .iter()
        .rev()
        .filter(|w| cutoff.is_none_or(|c| w.date >= c))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPoint {
    pub date: NaiveDate,
    pub xp: u32,
    pub workouts: usize,
    pub exercises: usize,
}

/// Per-day totals, oldest first, limited to the last 14 days with data
pub fn daily_chart(history: &[WorkoutRecord], period: Period, today: NaiveDate) -> Vec<DayPoint> {
    let mut points: Vec<DayPoint> = Vec::new();

    for workout in filter_period(history, period, today) {
        match points.iter_mut().find(|p| p.date == workout.date) {
            Some(point) => {
                point.xp = point.xp.saturating_add(workout.total_xp);
                point.workouts += 1;
                point.exercises += workout.exercises.len();
            }
            None => points.push(DayPoint {
                date: workout.date,
                xp: workout.total_xp,
                workouts: 1,
                exercises: workout.exercises.len(),
            }),
        }
    }

    let skip = points.len().saturating_sub(CHART_DAYS);
    points.split_off(skip)
}

/// Most logged exercises by name, descending
pub fn exercise_breakdown(history: &[WorkoutRecord], period: Period, today: NaiveDate) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();

    for exercise in filter_period(history, period, today).into_iter().flat_map(|w| &w.exercises) {
        match counts.iter_mut().find(|(name, _)| *name == exercise.exercise_name) {
            Some((_, count)) => *count += 1,
            None => counts.push((exercise.exercise_name.clone(), 1)),
        }
    }

    // Stable sort keeps first-seen order on ties
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(BREAKDOWN_TOP);
    counts
}

/// Whether a workout happened on each of the last 30 days, oldest first
pub fn streak_calendar(history: &[WorkoutRecord], today: NaiveDate) -> Vec<(NaiveDate, bool)> {
    (0..CALENDAR_DAYS)
        .rev()
        .map(|i| {
            let day = today - Duration::days(i);
            (day, history.iter().any(|w| w.date == day))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workout::LoggedExercise;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn record(day: u32, xp: u32, names: &[&str]) -> WorkoutRecord {
        WorkoutRecord {
            id: format!("w{}", day),
            date: date(day),
            start_time: None,
            end_time: None,
            exercises: names
                .iter()
                .map(|n| LoggedExercise {
                    exercise_id: n.to_lowercase(),
                    exercise_name: n.to_string(),
                    sets: 1,
                    reps: 1,
                    weight: 0.0,
                    xp_earned: 0,
                })
                .collect(),
            total_xp: xp,
        }
    }

    #[test]
    fn test_parse_period() {
        assert_eq!("7d".parse::<Period>().unwrap(), Period::Week);
        assert_eq!("all".parse::<Period>().unwrap(), Period::All);
        assert!("1y".parse::<Period>().is_err());
    }

    #[test]
    fn test_filter_period_oldest_first() {
        // History is stored newest first
        let history = vec![record(20, 10, &[]), record(15, 10, &[]), record(1, 10, &[])];
        let week: Vec<_> = filter_period(&history, Period::Week, date(21)).iter().map(|w| w.date).collect();
        assert_eq!(week, vec![date(15), date(20)]);
        assert_eq!(filter_period(&history, Period::All, date(21)).len(), 3);
    }

    #[test]
    fn test_daily_chart_groups_by_day() {
        let history = vec![
            record(3, 30, &["Squat"]),
            record(3, 20, &["Squat", "Deadlift"]),
            record(2, 10, &["Push-up"]),
        ];
        let chart = daily_chart(&history, Period::Month, date(5));
        assert_eq!(chart.len(), 2);
        assert_eq!(chart[0], DayPoint { date: date(2), xp: 10, workouts: 1, exercises: 1 });
        assert_eq!(chart[1], DayPoint { date: date(3), xp: 50, workouts: 2, exercises: 3 });
    }

    #[test]
    fn test_daily_chart_keeps_last_14_days() {
        let history: Vec<_> = (1..=20).rev().map(|d| record(d, d, &[])).collect();
        let chart = daily_chart(&history, Period::All, date(20));
        assert_eq!(chart.len(), 14);
        assert_eq!(chart[0].date, date(7));
        assert_eq!(chart[13].date, date(20));
    }

    #[test]
    fn test_exercise_breakdown() {
        let history = vec![
            record(3, 0, &["Squat", "Deadlift", "Squat"]),
            record(2, 0, &["Push-up", "Deadlift", "Squat"]),
        ];
        let breakdown = exercise_breakdown(&history, Period::All, date(3));
        assert_eq!(breakdown[0], ("Squat".to_string(), 3));
        assert_eq!(breakdown[1], ("Deadlift".to_string(), 2));
        assert_eq!(breakdown[2], ("Push-up".to_string(), 1));
    }

    #[test]
    fn test_streak_calendar() {
        let history = vec![record(30, 0, &[]), record(28, 0, &[])];
        let calendar = streak_calendar(&history, date(30));
        assert_eq!(calendar.len(), 30);
        assert_eq!(calendar[0].0, date(1));
        assert_eq!(calendar[29], (date(30), true));
        assert_eq!(calendar[28], (date(29), false));
        assert_eq!(calendar[27], (date(28), true));
    }
}
