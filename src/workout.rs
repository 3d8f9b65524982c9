//! Workout sessions and the bounded workout history

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::{Database, storage_keys};
use crate::error::{Error, Result};

/// Finished workouts kept in history
pub const HISTORY_LIMIT: usize = 50;

/// One exercise entry inside a workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedExercise {
    pub exercise_id: String,
    pub exercise_name: String,
    pub sets: u32,
    pub reps: u32,
    pub weight: f64,
    pub xp_earned: u32,
}

impl LoggedExercise {
    pub fn total_reps(&self) -> u32 {
        self.sets.saturating_mul(self.reps)
    }

    /// sets × reps × weight
    pub fn volume(&self) -> f64 {
        self.total_reps() as f64 * self.weight
    }
}

/// Workout in progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveWorkout {
    pub exercises: Vec<LoggedExercise>,
    pub start_time: DateTime<Utc>,
    pub total_xp: u32,
}

impl ActiveWorkout {
    fn new(start_time: DateTime<Utc>) -> Self {
        Self { exercises: Vec::new(), start_time, total_xp: 0 }
    }
}

/// Finalized workout stored in history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRecord {
    pub id: String,
    pub date: NaiveDate,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub exercises: Vec<LoggedExercise>,
    pub total_xp: u32,
}

impl WorkoutRecord {
    pub fn duration(&self) -> Option<Duration> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}

/// Outcome of finishing a workout
#[derive(Debug, Clone)]
pub struct FinishedWorkout {
    pub record: WorkoutRecord,
    /// Date of the newest workout before this one
    pub previous_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorkoutStats {
    pub total_workouts: usize,
    pub total_xp: u32,
    pub avg_workout_minutes: i64,
    pub favorite_exercise: Option<String>,
}

/// Streak after working out on `today`.
///
/// Consecutive days extend the streak, a second workout on the same day
/// keeps it, anything else starts over at 1.
pub fn next_streak(current: u32, last_workout: Option<NaiveDate>, today: NaiveDate) -> u32 {
    match last_workout {
        Some(last) if last == today => current,
        Some(last) if Some(last) == today.pred_opt() => current + 1,
        _ => 1,
    }
}

/// Active workout plus history, both mirrored to storage
pub struct WorkoutStore<'a> {
    db: &'a Database,
    active: Option<ActiveWorkout>,
    history: Vec<WorkoutRecord>,
}

impl<'a> WorkoutStore<'a> {
    pub fn load(db: &'a Database) -> Result<Self> {
        let history = db
            .load_json::<Vec<WorkoutRecord>>(storage_keys::WORKOUT_HISTORY)?
            .unwrap_or_default();
        let active = db.load_json::<ActiveWorkout>(storage_keys::ACTIVE_WORKOUT)?;
        Ok(Self { db, active, history })
    }

    pub fn active(&self) -> Option<&ActiveWorkout> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Newest first
    pub fn history(&self) -> &[WorkoutRecord] {
        &self.history
    }

    /// Begin a new workout, discarding any unfinished one
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.active = Some(ActiveWorkout::new(now));
        self.persist_active()
    }

    /// Append an exercise, starting a workout if none is running
    pub fn add_exercise(&mut self, exercise: LoggedExercise) -> Result<()> {
        let workout = self.active.get_or_insert_with(|| ActiveWorkout::new(Utc::now()));
        workout.total_xp = workout.total_xp.saturating_add(exercise.xp_earned);
        workout.exercises.push(exercise);
        self.persist_active()
    }

    /// Drop the exercise at `index`; out-of-range indexes are ignored
    pub fn remove_exercise(&mut self, index: usize) -> Result<Option<LoggedExercise>> {
        let workout = self.active.as_mut().ok_or(Error::NoActiveWorkout)?;
        if index >= workout.exercises.len() {
            return Ok(None);
        }

        let removed = workout.exercises.remove(index);
        workout.total_xp = workout.total_xp.saturating_sub(removed.xp_earned);
        self.persist_active()?;
        Ok(Some(removed))
    }

    pub fn cancel(&mut self) -> Result<()> {
        self.active = None;
        self.persist_active()
    }

    /// Move the active workout into history
    pub fn finish(&mut self, now: DateTime<Utc>) -> Result<FinishedWorkout> {
        let Some(workout) = self.active.take_if(|w| !w.exercises.is_empty()) else {
            return Err(Error::EmptyWorkout);
        };

        let previous_date = self.history.first().map(|w| w.date);
        let record = WorkoutRecord {
            id: now.timestamp_millis().to_string(),
            date: now.date_naive(),
            start_time: Some(workout.start_time),
            end_time: Some(now),
            exercises: workout.exercises,
            total_xp: workout.total_xp,
        };

        self.history.insert(0, record.clone());
        self.history.truncate(HISTORY_LIMIT);
        info!(
            "Finished workout {}: {} exercises, {} XP",
            record.id,
            record.exercises.len(),
            record.total_xp
        );

        self.db.save_json(storage_keys::WORKOUT_HISTORY, &self.history)?;
        self.persist_active()?;
        Ok(FinishedWorkout { record, previous_date })
    }

    pub fn stats(&self) -> WorkoutStats {
        if self.history.is_empty() {
            return WorkoutStats::default();
        }

        let total_workouts = self.history.len();
        let total_xp = self.history.iter().map(|w| w.total_xp).fold(0, u32::saturating_add);

        let total_ms: i64 = self
            .history
            .iter()
            .filter_map(|w| w.duration())
            .map(|d| d.num_milliseconds())
            .sum();
        let avg_minutes = total_ms as f64 / total_workouts as f64 / 60_000.0;

        // Counts in order of first appearance; later names win ties
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for exercise in self.history.iter().flat_map(|w| &w.exercises) {
            match counts.iter_mut().find(|(name, _)| *name == exercise.exercise_name) {
                Some((_, count)) => *count += 1,
                None => counts.push((exercise.exercise_name.as_str(), 1)),
            }
        }
        let favorite_exercise = counts
            .iter()
            .fold(None::<(&str, usize)>, |best, &(name, count)| match best {
                Some((_, best_count)) if best_count > count => best,
                _ => Some((name, count)),
            })
            .map(|(name, _)| name.to_string());

        WorkoutStats {
            total_workouts,
            total_xp,
            avg_workout_minutes: avg_minutes.round() as i64,
            favorite_exercise,
        }
    }

    fn persist_active(&self) -> Result<()> {
        match &self.active {
            Some(workout) => self.db.save_json(storage_keys::ACTIVE_WORKOUT, workout),
            None => self.db.remove_item(storage_keys::ACTIVE_WORKOUT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn exercise(id: &str, name: &str, xp: u32) -> LoggedExercise {
        LoggedExercise {
            exercise_id: id.to_string(),
            exercise_name: name.to_string(),
            sets: 3,
            reps: 10,
            weight: 50.0,
            xp_earned: xp,
        }
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn test_add_and_remove_exercise() {
        let db = Database::open_in_memory().unwrap();
        let mut store = WorkoutStore::load(&db).unwrap();
        store.start(at(1, 10)).unwrap();
        store.add_exercise(exercise("squat", "Squat", 40)).unwrap();
        store.add_exercise(exercise("deadlift", "Deadlift", 60)).unwrap();
        assert_eq!(store.active().unwrap().total_xp, 100);

        let removed = store.remove_exercise(0).unwrap().unwrap();
        assert_eq!(removed.exercise_id, "squat");
        assert_eq!(store.active().unwrap().total_xp, 60);

        assert!(store.remove_exercise(5).unwrap().is_none());
        assert_eq!(store.active().unwrap().exercises.len(), 1);
    }

    #[test]
    fn test_remove_without_workout() {
        let db = Database::open_in_memory().unwrap();
        let mut store = WorkoutStore::load(&db).unwrap();
        assert!(matches!(store.remove_exercise(0), Err(Error::NoActiveWorkout)));
    }

    #[test]
    fn test_totals_saturate() {
        let db = Database::open_in_memory().unwrap();
        let mut store = WorkoutStore::load(&db).unwrap();
        store.start(at(1, 10)).unwrap();
        store.add_exercise(exercise("squat", "Squat", u32::MAX)).unwrap();
        store.add_exercise(exercise("squat", "Squat", u32::MAX)).unwrap();
        assert_eq!(store.active().unwrap().total_xp, u32::MAX);

        let huge = LoggedExercise { sets: 100_000, reps: 100_000, ..exercise("pull-up", "Pull-up", 1) };
        assert_eq!(huge.total_reps(), u32::MAX);

        store.finish(at(1, 11)).unwrap();
        store.add_exercise(exercise("squat", "Squat", 10)).unwrap();
        store.finish(at(2, 11)).unwrap();
        assert_eq!(store.stats().total_xp, u32::MAX);
    }

    #[test]
    fn test_add_exercise_starts_workout() {
        let db = Database::open_in_memory().unwrap();
        let mut store = WorkoutStore::load(&db).unwrap();
        assert!(!store.is_active());
        store.add_exercise(exercise("squat", "Squat", 40)).unwrap();
        assert!(store.is_active());
    }

    #[test]
    fn test_active_workout_survives_reload() {
        let db = Database::open_in_memory().unwrap();
        let mut store = WorkoutStore::load(&db).unwrap();
        store.start(at(1, 10)).unwrap();
        store.add_exercise(exercise("squat", "Squat", 40)).unwrap();

        let reloaded = WorkoutStore::load(&db).unwrap();
        assert_eq!(reloaded.active().unwrap().exercises.len(), 1);
    }

    #[test]
    fn test_finish_empty_workout_fails() {
        let db = Database::open_in_memory().unwrap();
        let mut store = WorkoutStore::load(&db).unwrap();
        assert!(matches!(store.finish(at(1, 11)), Err(Error::EmptyWorkout)));

        store.start(at(1, 10)).unwrap();
        assert!(matches!(store.finish(at(1, 11)), Err(Error::EmptyWorkout)));
        assert!(store.is_active());
    }

    #[test]
    fn test_finish_moves_workout_to_history() {
        let db = Database::open_in_memory().unwrap();
        let mut store = WorkoutStore::load(&db).unwrap();
        store.start(at(1, 10)).unwrap();
        store.add_exercise(exercise("squat", "Squat", 40)).unwrap();

        let finished = store.finish(at(1, 11)).unwrap();
        assert_eq!(finished.record.date, date(1));
        assert_eq!(finished.record.total_xp, 40);
        assert_eq!(finished.previous_date, None);
        assert!(!store.is_active());

        let reloaded = WorkoutStore::load(&db).unwrap();
        assert_eq!(reloaded.history().len(), 1);
        assert!(reloaded.active().is_none());
    }

    #[test]
    fn test_cancel_discards_workout() {
        let db = Database::open_in_memory().unwrap();
        let mut store = WorkoutStore::load(&db).unwrap();
        store.add_exercise(exercise("squat", "Squat", 40)).unwrap();
        store.cancel().unwrap();
        assert!(!store.is_active());
        assert!(store.history().is_empty());
    }

    #[test]
    fn test_history_is_capped() {
        let db = Database::open_in_memory().unwrap();
        let mut store = WorkoutStore::load(&db).unwrap();

        for i in 0..60 {
            let start = at(1, 0) + Duration::minutes(i * 10);
            store.start(start).unwrap();
            store.add_exercise(exercise("squat", "Squat", i as u32)).unwrap();
            store.finish(start + Duration::minutes(5)).unwrap();
        }

        assert_eq!(store.history().len(), HISTORY_LIMIT);
        // Newest first
        assert_eq!(store.history()[0].total_xp, 59);
        assert_eq!(store.history()[HISTORY_LIMIT - 1].total_xp, 10);
    }

    #[test]
    fn test_stats() {
        let db = Database::open_in_memory().unwrap();
        let mut store = WorkoutStore::load(&db).unwrap();
        assert_eq!(store.stats(), WorkoutStats::default());

        store.start(at(1, 10)).unwrap();
        store.add_exercise(exercise("squat", "Squat", 40)).unwrap();
        store.add_exercise(exercise("deadlift", "Deadlift", 60)).unwrap();
        store.finish(at(1, 11)).unwrap();

        store.start(at(2, 10)).unwrap();
        store.add_exercise(exercise("squat", "Squat", 30)).unwrap();
        store.finish(at(2, 10) + Duration::minutes(30)).unwrap();

        let stats = store.stats();
        assert_eq!(stats.total_workouts, 2);
        assert_eq!(stats.total_xp, 130);
        assert_eq!(stats.avg_workout_minutes, 45);
        assert_eq!(stats.favorite_exercise.as_deref(), Some("Squat"));
    }

    #[test]
    fn test_next_streak() {
        assert_eq!(next_streak(0, None, date(5)), 1);
        assert_eq!(next_streak(3, Some(date(4)), date(5)), 4);
        assert_eq!(next_streak(3, Some(date(5)), date(5)), 3);
        assert_eq!(next_streak(3, Some(date(2)), date(5)), 1);
    }
}
