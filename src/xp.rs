//! XP math: per-exercise XP, levels, bonuses and workout scores

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::exercises::xp_multiplier;
use crate::workout::LoggedExercise;

/// Total XP needed to reach level `i` (index = level)
pub const LEVEL_THRESHOLDS: &[u32] = &[
    0, 100, 300, 600, 1000, 1500, 2100, 2800, 3600, 4500, 5500, 6600, 7800, 9100, 10500,
];

pub const MAX_LEVEL: u32 = (LEVEL_THRESHOLDS.len() - 1) as u32;

const BASE_XP: f64 = 10.0;
const MIN_XP: f64 = 5.0;

/// XP earned for one logged exercise
pub fn calculate_xp(sets: u32, reps: u32, weight: f64, exercise_id: &str, bonus_multiplier: f64) -> u32 {
    let weight_factor = weight * 0.5;
    let reps_factor = reps as f64 * 0.3;
    let sets_factor = sets as f64 * 5.0;

    let total = (BASE_XP + weight_factor + reps_factor + sets_factor)
        * xp_multiplier(exercise_id)
        * bonus_multiplier;

    total.round().max(MIN_XP) as u32
}

/// Level reached with `total_xp`, never below 1
pub fn level_from_xp(total_xp: u32) -> u32 {
    let level = LEVEL_THRESHOLDS
        .iter()
        .rposition(|&threshold| total_xp >= threshold)
        .unwrap_or(0) as u32;
    level.max(1)
}

/// Total XP at which `level` begins
pub fn xp_for_level(level: u32) -> u32 {
    if level <= 1 {
        return 0;
    }
    LEVEL_THRESHOLDS[level.min(MAX_LEVEL) as usize]
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelProgress {
    /// XP earned inside the current level
    pub current: u32,
    /// XP width of the current level (0 at max level)
    pub required: u32,
    pub percentage: f64,
}

pub fn progress_to_next_level(total_xp: u32, level: u32) -> LevelProgress {
    let floor = xp_for_level(level);
    let current = total_xp.saturating_sub(floor);

    if level >= MAX_LEVEL {
        return LevelProgress { current, required: 0, percentage: 100.0 };
    }

    let required = xp_for_level(level + 1) - floor;
    let percentage = (current as f64 / required as f64 * 100.0).min(100.0);
    LevelProgress { current, required, percentage }
}

/// Situations that boost a workout's XP
#[derive(Debug, Clone, Copy, Default)]
pub struct BonusConditions {
    pub streak: u32,
    pub first_workout_of_day: bool,
    pub personal_record: bool,
    pub perfect_form: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BonusXp {
    pub base_xp: u32,
    pub bonus_xp: u32,
    pub total_xp: u32,
    pub multiplier: f64,
    pub bonuses: Vec<&'static str>,
}

pub fn calculate_bonus(base_xp: u32, conditions: &BonusConditions) -> BonusXp {
    let mut multiplier = 1.0;
    let mut bonuses = Vec::new();

    if conditions.streak >= 7 {
        multiplier += 0.5;
        bonuses.push("Weekly Streak Bonus (+50%)");
    } else if conditions.streak >= 3 {
        multiplier += 0.2;
        bonuses.push("Streak Bonus (+20%)");
    }

    if conditions.first_workout_of_day {
        multiplier += 0.1;
        bonuses.push("Early Bird Bonus (+10%)");
    }

    if conditions.personal_record {
        multiplier += 0.3;
        bonuses.push("Personal Record (+30%)");
    }

    if conditions.perfect_form {
        multiplier += 0.15;
        bonuses.push("Perfect Form (+15%)");
    }

    let total_xp = (base_xp as f64 * multiplier).round() as u32;

    BonusXp {
        base_xp,
        bonus_xp: total_xp - base_xp,
        total_xp,
        multiplier,
        bonuses,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
    FirstWorkout,
    WorkoutStreak,
    ExerciseMaster,
    WeightMilestone,
    Consistency,
    StrengthGoal,
    EnduranceGoal,
    Legendary,
}

impl AchievementKind {
    fn base_xp(&self) -> u32 {
        match self {
            AchievementKind::FirstWorkout => 50,
            AchievementKind::WorkoutStreak => 100,
            AchievementKind::ExerciseMaster => 150,
            AchievementKind::WeightMilestone => 200,
            AchievementKind::Consistency => 250,
            AchievementKind::StrengthGoal => 300,
            AchievementKind::EnduranceGoal => 275,
            AchievementKind::Legendary => 500,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    #[default]
    Bronze,
    Silver,
    Gold,
    Platinum,
    Legendary,
}

impl Tier {
    fn multiplier(&self) -> f64 {
        match self {
            Tier::Bronze => 1.0,
            Tier::Silver => 1.5,
            Tier::Gold => 2.0,
            Tier::Platinum => 2.5,
            Tier::Legendary => 3.0,
        }
    }
}

pub fn achievement_xp(kind: AchievementKind, tier: Tier) -> u32 {
    (kind.base_xp() as f64 * tier.multiplier()).round() as u32
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutScore {
    pub total_xp: u32,
    pub exercise_count: usize,
    pub avg_xp_per_exercise: u32,
    pub duration_multiplier: f64,
    pub streak_multiplier: f64,
    pub final_score: u32,
}

/// Score a finished workout; `None` when nothing was logged
pub fn workout_score(exercises: &[LoggedExercise], duration: Duration, streak: u32) -> Option<WorkoutScore> {
    if exercises.is_empty() {
        return None;
    }

    let total_xp = exercises.iter().map(|e| e.xp_earned).fold(0, u32::saturating_add);
    let exercise_count = exercises.len();
    let avg = total_xp as f64 / exercise_count as f64;

    let minutes = duration.num_seconds() as f64 / 60.0;
    let duration_multiplier = if duration.num_seconds() <= 0 {
        1.0
    } else if (30.0..=90.0).contains(&minutes) {
        1.2
    } else if minutes > 90.0 {
        0.9
    } else {
        1.0
    };

    let streak_multiplier = (1.0 + streak as f64 * 0.05).min(2.0);

    let base_score = total_xp as f64 * 0.7 + exercise_count as f64 * 10.0 + avg * 0.3;
    let final_score = (base_score * duration_multiplier * streak_multiplier).round() as u32;

    Some(WorkoutScore {
        total_xp,
        exercise_count,
        avg_xp_per_exercise: avg.round() as u32,
        duration_multiplier,
        streak_multiplier,
        final_score,
    })
}
