//! Quests - static challenge templates evaluated against workout history

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::{Database, storage_keys};
use crate::error::Result;
use crate::user::{Achievement, User};
use crate::workout::{LoggedExercise, WorkoutRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestKind {
    Milestone,
    Strength,
    Consistency,
    Endurance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Legendary,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Legendary => "legendary",
        }
    }
}

/// How progress toward a quest is measured
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Criteria {
    /// Finished workouts in history
    WorkoutCount,
    /// Sets of one exercise across all workouts
    ExerciseSets(&'static str),
    /// sets × reps of one exercise across all workouts
    ExerciseReps(&'static str),
    /// sets × reps × weight of one exercise across all workouts
    ExerciseTotalWeight(&'static str),
    /// Current user streak
    Streak,
    /// Current user XP
    TotalXp,
    /// Best sets × reps of one exercise inside a single workout
    SingleWorkoutReps(&'static str),
}

#[derive(Debug, Clone)]
pub struct QuestTemplate {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub kind: QuestKind,
    pub difficulty: Difficulty,
    pub target: u32,
    pub unit: &'static str,
    pub reward_xp: u32,
    pub criteria: Criteria,
    pub unlock_level: u32,
    pub time_limit: Option<&'static str>,
    pub requirements: &'static [&'static str],
}

pub const QUEST_TEMPLATES: &[QuestTemplate] = &[
    QuestTemplate {
        id: "first_steps",
        title: "First Steps",
        description: "Complete your first workout",
        kind: QuestKind::Milestone,
        difficulty: Difficulty::Easy,
        target: 1,
        unit: "workout",
        reward_xp: 100,
        criteria: Criteria::WorkoutCount,
        unlock_level: 1,
        time_limit: None,
        requirements: &[],
    },
    QuestTemplate {
        id: "bench_master_bronze",
        title: "Bench Press Apprentice",
        description: "Perform 10 bench press sets",
        kind: QuestKind::Strength,
        difficulty: Difficulty::Easy,
        target: 10,
        unit: "sets",
        reward_xp: 150,
        criteria: Criteria::ExerciseSets("bench-press"),
        unlock_level: 1,
        time_limit: None,
        requirements: &[],
    },
    QuestTemplate {
        id: "consistency_warrior",
        title: "Consistency Warrior",
        description: "Work out for 3 consecutive days",
        kind: QuestKind::Consistency,
        difficulty: Difficulty::Medium,
        target: 3,
        unit: "days",
        reward_xp: 200,
        criteria: Criteria::Streak,
        unlock_level: 2,
        time_limit: None,
        requirements: &[],
    },
    QuestTemplate {
        id: "squat_enthusiast",
        title: "Squat Enthusiast",
        description: "Perform 100 total squat reps",
        kind: QuestKind::Strength,
        difficulty: Difficulty::Medium,
        target: 100,
        unit: "reps",
        reward_xp: 250,
        criteria: Criteria::ExerciseReps("squat"),
        unlock_level: 2,
        time_limit: None,
        requirements: &[],
    },
    QuestTemplate {
        id: "deadlift_destroyer",
        title: "Deadlift Destroyer",
        description: "Deadlift a total of 1000kg",
        kind: QuestKind::Strength,
        difficulty: Difficulty::Hard,
        target: 1000,
        unit: "kg",
        reward_xp: 400,
        criteria: Criteria::ExerciseTotalWeight("deadlift"),
        unlock_level: 3,
        time_limit: None,
        requirements: &[],
    },
    QuestTemplate {
        id: "week_warrior",
        title: "Week Warrior",
        description: "Maintain a 7-day workout streak",
        kind: QuestKind::Consistency,
        difficulty: Difficulty::Hard,
        target: 7,
        unit: "days",
        reward_xp: 500,
        criteria: Criteria::Streak,
        unlock_level: 3,
        time_limit: Some("30 days"),
        requirements: &[],
    },
    QuestTemplate {
        id: "pull_up_champion",
        title: "Pull-up Champion",
        description: "Complete 50 pull-ups in a single workout",
        kind: QuestKind::Endurance,
        difficulty: Difficulty::Hard,
        target: 50,
        unit: "reps",
        reward_xp: 350,
        criteria: Criteria::SingleWorkoutReps("pull-up"),
        unlock_level: 4,
        time_limit: None,
        requirements: &[],
    },
    QuestTemplate {
        id: "legendary_lifter",
        title: "Legendary Lifter",
        description: "Reach 5000 total XP",
        kind: QuestKind::Milestone,
        difficulty: Difficulty::Legendary,
        target: 5000,
        unit: "XP",
        reward_xp: 1000,
        criteria: Criteria::TotalXp,
        unlock_level: 5,
        time_limit: None,
        requirements: &[
            "Complete at least 20 workouts",
            "Master 3 different exercises",
            "Maintain 7-day streak",
        ],
    },
];

pub fn find_quest(id: &str) -> Option<&'static QuestTemplate> {
    QUEST_TEMPLATES.iter().find(|q| q.id == id)
}

fn entries_for<'h>(workout: &'h WorkoutRecord, exercise: &'h str) -> impl Iterator<Item = &'h LoggedExercise> {
    workout.exercises.iter().filter(move |e| e.exercise_id == exercise)
}

/// Progress toward `quest`. May exceed the target.
pub fn calculate_progress(quest: &QuestTemplate, history: &[WorkoutRecord], user: Option<&User>) -> f64 {
    let Some(user) = user else {
        return 0.0;
    };

    match quest.criteria {
        Criteria::WorkoutCount => history.len() as f64,
        Criteria::ExerciseSets(exercise) => history
            .iter()
            .flat_map(|w| entries_for(w, exercise))
            .map(|e| e.sets as f64)
            .sum(),
        Criteria::ExerciseReps(exercise) => history
            .iter()
            .flat_map(|w| entries_for(w, exercise))
            .map(|e| e.total_reps() as f64)
            .sum(),
        Criteria::ExerciseTotalWeight(exercise) => history
            .iter()
            .flat_map(|w| entries_for(w, exercise))
            .map(|e| e.volume())
            .sum(),
        Criteria::Streak => user.streak as f64,
        Criteria::TotalXp => user.xp as f64,
        Criteria::SingleWorkoutReps(exercise) => history
            .iter()
            .map(|w| entries_for(w, exercise).map(|e| e.total_reps()).fold(0, u32::saturating_add))
            .max()
            .unwrap_or(0) as f64,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedQuest {
    pub id: String,
    pub completed_at: DateTime<Utc>,
    pub progress: f64,
    #[serde(default)]
    pub claimed: bool,
}

impl CompletedQuest {
    pub fn template(&self) -> Option<&'static QuestTemplate> {
        find_quest(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestReward {
    pub xp: u32,
    pub title: &'static str,
}

/// Quest state for the current user: live progress plus completed quests
pub struct QuestBook<'a> {
    db: &'a Database,
    completed: Vec<CompletedQuest>,
    progress: BTreeMap<&'static str, f64>,
    active: Vec<&'static QuestTemplate>,
}

impl<'a> QuestBook<'a> {
    pub fn load(db: &'a Database) -> Result<Self> {
        let completed = db
            .load_json::<Vec<CompletedQuest>>(storage_keys::COMPLETED_QUESTS)?
            .unwrap_or_default();
        Ok(Self {
            db,
            completed,
            progress: BTreeMap::new(),
            active: Vec::new(),
        })
    }

    pub fn is_completed(&self, id: &str) -> bool {
        self.completed.iter().any(|c| c.id == id)
    }

    /// Recompute progress and complete every quest that reached its target.
    ///
    /// Returns one achievement per newly completed quest.
    pub fn refresh(&mut self, user: Option<&User>, history: &[WorkoutRecord], now: DateTime<Utc>) -> Result<Vec<Achievement>> {
        self.progress.clear();
        self.active.clear();

        let Some(u) = user else {
            return Ok(Vec::new());
        };

        let mut achievements = Vec::new();
        for quest in QUEST_TEMPLATES {
            if u.level < quest.unlock_level || self.is_completed(quest.id) {
                continue;
            }

            let progress = calculate_progress(quest, history, user);
            self.progress.insert(quest.id, progress);

            if progress >= quest.target as f64 {
                info!("Quest completed: {}", quest.title);
                self.completed.push(CompletedQuest {
                    id: quest.id.to_string(),
                    completed_at: now,
                    progress,
                    claimed: false,
                });
                achievements.push(Achievement {
                    id: format!("quest_{}", quest.id),
                    title: quest.title.to_string(),
                    description: format!("Completed: {}", quest.description),
                    kind: "quest".to_string(),
                    rarity: quest.difficulty.as_str().to_string(),
                    xp_reward: quest.reward_xp,
                    unlocked_at: now,
                });
            } else {
                self.active.push(quest);
            }
        }

        if !achievements.is_empty() {
            self.persist()?;
        }
        Ok(achievements)
    }

    /// Mark a completed quest's reward as claimed.
    ///
    /// `None` for unknown, unfinished or already claimed quests.
    pub fn claim_reward(&mut self, id: &str) -> Result<Option<QuestReward>> {
        let Some(quest) = self.completed.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        if quest.claimed {
            return Ok(None);
        }
        let Some(template) = quest.template() else {
            return Ok(None);
        };

        quest.claimed = true;
        self.persist()?;
        Ok(Some(QuestReward { xp: template.reward_xp, title: template.title }))
    }

    pub fn progress(&self, id: &str) -> Option<f64> {
        self.progress.get(id).copied()
    }

    /// Unlocked quests still in progress, as of the last refresh
    pub fn active_quests(&self) -> &[&'static QuestTemplate] {
        &self.active
    }

    pub fn completed_quests(&self) -> &[CompletedQuest] {
        &self.completed
    }

    pub fn by_difficulty(&self, difficulty: Difficulty) -> Vec<&'static QuestTemplate> {
        self.active.iter().copied().filter(|q| q.difficulty == difficulty).collect()
    }

    pub fn by_kind(&self, kind: QuestKind) -> Vec<&'static QuestTemplate> {
        self.active.iter().copied().filter(|q| q.kind == kind).collect()
    }

    pub fn unclaimed_rewards(&self) -> Vec<&CompletedQuest> {
        self.completed.iter().filter(|c| !c.claimed).collect()
    }

    fn persist(&self) -> Result<()> {
        self.db.save_json(storage_keys::COMPLETED_QUESTS, &self.completed)
    }
}
