//! Per-body-part progression: XP split, levels and selection filter

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::db::{Database, storage_keys};
use crate::error::Result;
use crate::exercises::{BodyPart, Exercise, body_parts_for};

/// XP needed per body-part level
pub const XP_PER_LEVEL: u32 = 100;

/// Level for a body part with `xp` total: floor(xp / 100) + 1
pub fn body_part_level(xp: u32) -> u32 {
    xp / XP_PER_LEVEL + 1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyPartProgress {
    pub xp: u32,
    pub level: u32,
    pub workouts: u32,
    pub last_worked: Option<DateTime<Utc>>,
}

impl Default for BodyPartProgress {
    fn default() -> Self {
        Self { xp: 0, level: 1, workouts: 0, last_worked: None }
    }
}

/// XP credited by one logged exercise
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XpShare {
    pub parts: &'static [BodyPart],
    pub xp_each: u32,
}

/// Progress view of a single part
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartProgress {
    pub level: u32,
    pub current_xp: u32,
    pub required_xp: u32,
    pub percentage: f64,
    pub total_xp: u32,
    pub workout_count: u32,
    pub last_worked: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyPartStats {
    pub average_level: f64,
    pub max_level: u32,
    pub min_level: u32,
    pub total_xp: u32,
    pub most_developed: BodyPart,
    pub least_developed: BodyPart,
}

pub struct BodyPartStore<'a> {
    db: &'a Database,
    parts: BTreeMap<BodyPart, BodyPartProgress>,
    selected: Option<BodyPart>,
}

impl<'a> BodyPartStore<'a> {
    pub fn load(db: &'a Database) -> Result<Self> {
        let mut parts: BTreeMap<BodyPart, BodyPartProgress> = BodyPart::all()
            .iter()
            .map(|part| (*part, BodyPartProgress::default()))
            .collect();

        if let Some(saved) = db.load_json::<BTreeMap<BodyPart, BodyPartProgress>>(storage_keys::BODY_PART_DATA)? {
            parts.extend(saved);
        }

        Ok(Self { db, parts, selected: None })
    }

    pub fn get(&self, part: BodyPart) -> &BodyPartProgress {
        // Every part is seeded in load()
        &self.parts[&part]
    }

    pub fn levels(&self) -> impl Iterator<Item = (BodyPart, u32)> + '_ {
        self.parts.iter().map(|(part, p)| (*part, p.level))
    }

    /// Split `xp` evenly across the parts an exercise trains.
    ///
    /// Each part gets `xp / n` (integer division), so the credited total
    /// never exceeds `xp`. Unmapped exercises credit nothing.
    pub fn add_body_part_xp(&mut self, exercise_id: &str, xp: u32, now: DateTime<Utc>) -> Result<Option<XpShare>> {
        let parts = body_parts_for(exercise_id);
        if parts.is_empty() {
            debug!("No body parts mapped for {}", exercise_id);
            return Ok(None);
        }

        let xp_each = xp / parts.len() as u32;
        for part in parts {
            let progress = self.parts.entry(*part).or_default();
            progress.xp = progress.xp.saturating_add(xp_each);
            progress.level = progress.level.max(body_part_level(progress.xp));
            progress.workouts += 1;
            progress.last_worked = Some(now);
        }

        self.db.save_json(storage_keys::BODY_PART_DATA, &self.parts)?;
        Ok(Some(XpShare { parts, xp_each }))
    }

    pub fn selected(&self) -> Option<BodyPart> {
        self.selected
    }

    pub fn select(&mut self, part: BodyPart) {
        self.selected = Some(part);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Exercises relevant to the selected part, or all of them
    pub fn filtered_exercises<'e>(&self, exercises: &'e [Exercise]) -> Vec<&'e Exercise> {
        let Some(part) = self.selected else {
            return exercises.iter().collect();
        };
        let Some(category) = part.category() else {
            return exercises.iter().collect();
        };

        exercises
            .iter()
            .filter(|e| e.category == category || body_parts_for(e.id).contains(&part))
            .collect()
    }

    pub fn progress(&self, part: BodyPart) -> PartProgress {
        let p = self.get(part);
        let level_floor = p.level.saturating_sub(1).saturating_mul(XP_PER_LEVEL);
        let current_xp = p.xp.saturating_sub(level_floor);

        PartProgress {
            level: p.level,
            current_xp,
            required_xp: XP_PER_LEVEL,
            percentage: current_xp as f64 / XP_PER_LEVEL as f64 * 100.0,
            total_xp: p.xp,
            workout_count: p.workouts,
            last_worked: p.last_worked,
        }
    }

    pub fn stats(&self) -> BodyPartStats {
        let count = self.parts.len().max(1) as f64;
        let total_levels: u32 = self.parts.values().map(|p| p.level).sum();
        let max_level = self.parts.values().map(|p| p.level).max().unwrap_or(1);
        let min_level = self.parts.values().map(|p| p.level).min().unwrap_or(1);

        let first_at = |level: u32| {
            BodyPart::all()
                .iter()
                .copied()
                .find(|part| self.get(*part).level == level)
                .unwrap_or(BodyPart::Head)
        };

        BodyPartStats {
            average_level: (total_levels as f64 / count * 10.0).round() / 10.0,
            max_level,
            min_level,
            total_xp: self.parts.values().map(|p| p.xp).fold(0, u32::saturating_add),
            most_developed: first_at(max_level),
            least_developed: first_at(min_level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercises::get_available_exercises;

    #[test]
    fn test_level_formula() {
        assert_eq!(body_part_level(0), 1);
        assert_eq!(body_part_level(99), 1);
        assert_eq!(body_part_level(100), 2);
        assert_eq!(body_part_level(250), 3);
    }

    #[test]
    fn test_level_monotonic() {
        let mut last = 0;
        for xp in 0..2_000 {
            let level = body_part_level(xp);
            assert!(level >= last);
            last = level;
        }
    }

    #[test]
    fn test_fresh_store() {
        let db = Database::open_in_memory().unwrap();
        let store = BodyPartStore::load(&db).unwrap();
        assert_eq!(store.levels().count(), 15);
        assert!(store.levels().all(|(_, level)| level == 1));
    }

    #[test]
    fn test_xp_is_split_evenly() {
        let db = Database::open_in_memory().unwrap();
        let mut store = BodyPartStore::load(&db).unwrap();

        // deadlift trains 4 parts: 250 / 4 = 62 each
        let share = store.add_body_part_xp("deadlift", 250, Utc::now()).unwrap().unwrap();
        assert_eq!(share.xp_each, 62);
        assert!(share.xp_each * share.parts.len() as u32 <= 250);

        for part in [BodyPart::Back, BodyPart::LeftQuad, BodyPart::RightQuad, BodyPart::Glutes] {
            let p = store.get(part);
            assert_eq!(p.xp, 62);
            assert_eq!(p.workouts, 1);
            assert!(p.last_worked.is_some());
        }
        assert_eq!(store.get(BodyPart::Chest).xp, 0);
    }

    #[test]
    fn test_unmapped_exercise_is_noop() {
        let db = Database::open_in_memory().unwrap();
        let mut store = BodyPartStore::load(&db).unwrap();
        assert!(store.add_body_part_xp("burpee", 500, Utc::now()).unwrap().is_none());
        assert_eq!(store.stats().total_xp, 0);
    }

    #[test]
    fn test_part_xp_saturates() {
        let db = Database::open_in_memory().unwrap();
        let mut store = BodyPartStore::load(&db).unwrap();
        for _ in 0..4 {
            store.add_body_part_xp("squat", u32::MAX, Utc::now()).unwrap();
        }
        assert_eq!(store.get(BodyPart::Glutes).xp, u32::MAX);
        assert_eq!(store.get(BodyPart::Glutes).workouts, 4);
        assert_eq!(store.stats().total_xp, u32::MAX);
        assert_eq!(store.progress(BodyPart::Glutes).total_xp, u32::MAX);
    }

    #[test]
    fn test_levels_up_and_persists() {
        let db = Database::open_in_memory().unwrap();
        let mut store = BodyPartStore::load(&db).unwrap();
        store.add_body_part_xp("sit-up", 120, Utc::now()).unwrap();
        store.add_body_part_xp("sit-up", 100, Utc::now()).unwrap();

        let reloaded = BodyPartStore::load(&db).unwrap();
        let abs = reloaded.get(BodyPart::Abs);
        assert_eq!(abs.xp, 220);
        assert_eq!(abs.level, 3);
        assert_eq!(abs.workouts, 2);
    }

    #[test]
    fn test_progress() {
        let db = Database::open_in_memory().unwrap();
        let mut store = BodyPartStore::load(&db).unwrap();
        store.add_body_part_xp("sit-up", 150, Utc::now()).unwrap();

        let p = store.progress(BodyPart::Abs);
        assert_eq!(p.level, 2);
        assert_eq!(p.current_xp, 50);
        assert_eq!(p.required_xp, 100);
        assert_eq!(p.percentage, 50.0);
        assert_eq!(p.total_xp, 150);
    }

    #[test]
    fn test_stats() {
        let db = Database::open_in_memory().unwrap();
        let mut store = BodyPartStore::load(&db).unwrap();
        store.add_body_part_xp("sit-up", 300, Utc::now()).unwrap();

        let stats = store.stats();
        assert_eq!(stats.max_level, 4);
        assert_eq!(stats.min_level, 1);
        assert_eq!(stats.most_developed, BodyPart::Abs);
        assert_eq!(stats.least_developed, BodyPart::Head);
        // (14 * 1 + 4) / 15 = 1.2
        assert_eq!(stats.average_level, 1.2);
    }

    #[test]
    fn test_filtered_exercises() {
        let db = Database::open_in_memory().unwrap();
        let mut store = BodyPartStore::load(&db).unwrap();
        let all = get_available_exercises();
        assert_eq!(store.filtered_exercises(all).len(), all.len());

        store.select(BodyPart::LeftBicep);
        let ids: Vec<_> = store.filtered_exercises(all).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["pull-up"]);

        store.select(BodyPart::Glutes);
        let ids: Vec<_> = store.filtered_exercises(all).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["squat", "deadlift"]);

        store.select(BodyPart::Head);
        assert_eq!(store.filtered_exercises(all).len(), all.len());

        store.clear_selection();
        assert!(store.selected().is_none());
    }
}
