//! Application state: user, workouts, body parts and quests wired together

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::auth::{LoginResponse, SignupForm, signup};
use crate::body_parts::{BodyPartStore, XpShare};
use crate::db::{Database, storage_keys};
use crate::error::{Error, Result};
use crate::exercises::find_exercise;
use crate::quests::{QuestBook, QuestReward};
use crate::user::{Achievement, User, UserStore, XpUpdate};
use crate::workout::{LoggedExercise, WorkoutRecord, WorkoutStore, next_streak};
use crate::xp::{WorkoutScore, calculate_xp, workout_score};

/// Sets, reps and load for one exercise entry
#[derive(Debug, Clone, Copy)]
pub struct ExerciseInput {
    pub sets: u32,
    pub reps: u32,
    pub weight: f64,
    pub bonus_multiplier: f64,
}

impl Default for ExerciseInput {
    fn default() -> Self {
        Self { sets: 1, reps: 10, weight: 20.0, bonus_multiplier: 1.0 }
    }
}

impl ExerciseInput {
    /// Weight and bonus must be finite and non-negative
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [("weight", self.weight), ("bonus multiplier", self.bonus_multiplier)] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidInput { field, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct LoggedResult {
    pub exercise: LoggedExercise,
    pub body_parts: Option<XpShare>,
}

#[derive(Debug, Clone)]
pub struct WorkoutSummary {
    pub record: WorkoutRecord,
    pub xp: Option<XpUpdate>,
    pub streak: Option<u32>,
    pub score: Option<WorkoutScore>,
    pub completed_quests: Vec<Achievement>,
}

pub struct GymGrowth<'a> {
    db: &'a Database,
    pub user: UserStore<'a>,
    pub workouts: WorkoutStore<'a>,
    pub body_parts: BodyPartStore<'a>,
    pub quests: QuestBook<'a>,
}

impl<'a> GymGrowth<'a> {
    pub fn load(db: &'a Database) -> Result<Self> {
        let mut app = Self {
            db,
            user: UserStore::load(db)?,
            workouts: WorkoutStore::load(db)?,
            body_parts: BodyPartStore::load(db)?,
            quests: QuestBook::load(db)?,
        };
        app.refresh_quests(Utc::now())?;
        Ok(app)
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.user()
    }

    /// Store a successful login: profile plus auth token
    pub fn login(&mut self, response: LoginResponse) -> Result<()> {
        self.db.set_item(storage_keys::TOKEN, &response.token)?;
        self.user.login(response.user)?;
        self.refresh_quests(Utc::now())?;
        Ok(())
    }

    pub fn signup(&mut self, form: SignupForm) -> Result<&User> {
        let user = signup(form)?;
        self.user.login(user)?;
        self.refresh_quests(Utc::now())?;
        self.user.user().ok_or(Error::NotLoggedIn)
    }

    pub fn logout(&mut self) -> Result<()> {
        self.user.logout()?;
        self.refresh_quests(Utc::now())?;
        Ok(())
    }

    fn require_login(&self) -> Result<()> {
        if self.user.is_authenticated() { Ok(()) } else { Err(Error::NotLoggedIn) }
    }

    pub fn start_workout(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.require_login()?;
        self.workouts.start(now)
    }

    /// Log one exercise: score it, add it to the workout, credit body parts
    pub fn log_exercise(&mut self, exercise_id: &str, input: ExerciseInput, now: DateTime<Utc>) -> Result<LoggedResult> {
        self.require_login()?;
        input.validate()?;
        let exercise = find_exercise(exercise_id).ok_or_else(|| Error::UnknownExercise(exercise_id.to_string()))?;

        let xp_earned = calculate_xp(input.sets, input.reps, input.weight, exercise.id, input.bonus_multiplier);
        let logged = LoggedExercise {
            exercise_id: exercise.id.to_string(),
            exercise_name: exercise.name.to_string(),
            sets: input.sets,
            reps: input.reps,
            weight: input.weight,
            xp_earned,
        };

        self.workouts.add_exercise(logged.clone())?;
        let body_parts = self.body_parts.add_body_part_xp(exercise.id, xp_earned, now)?;
        info!("Logged {} for {} XP", exercise.name, xp_earned);

        Ok(LoggedResult { exercise: logged, body_parts })
    }

    pub fn remove_exercise(&mut self, index: usize) -> Result<Option<LoggedExercise>> {
        self.workouts.remove_exercise(index)
    }

    pub fn cancel_workout(&mut self) -> Result<()> {
        self.workouts.cancel()
    }

    /// Close the workout, grant XP, advance the streak and check quests
    pub fn finish_workout(&mut self, now: DateTime<Utc>) -> Result<WorkoutSummary> {
        self.require_login()?;
        let finished = self.workouts.finish(now)?;
        let xp = self.user.update_xp(finished.record.total_xp)?;

        let streak = self
            .user
            .user()
            .map(|u| next_streak(u.streak, finished.previous_date, now.date_naive()));
        if let Some(streak) = streak {
            self.user.update_streak(streak)?;
        }

        let score = workout_score(
            &finished.record.exercises,
            finished.record.duration().unwrap_or_else(Duration::zero),
            streak.unwrap_or(0),
        );
        let completed_quests = self.refresh_quests(now)?;
        Ok(WorkoutSummary { record: finished.record, xp, streak, score, completed_quests })
    }

    /// Claim a quest reward and credit its XP to the user
    pub fn claim_quest(&mut self, quest_id: &str) -> Result<Option<(QuestReward, Option<XpUpdate>)>> {
        self.require_login()?;
        let Some(reward) = self.quests.claim_reward(quest_id)? else {
            return Ok(None);
        };
        let update = self.user.update_xp(reward.xp)?;
        // The extra XP can complete XP-based quests
        self.refresh_quests(Utc::now())?;
        Ok(Some((reward, update)))
    }

    /// Re-evaluate quests and record achievements for newly completed ones
    pub fn refresh_quests(&mut self, now: DateTime<Utc>) -> Result<Vec<Achievement>> {
        let achievements = self.quests.refresh(self.user.user(), self.workouts.history(), now)?;
        for achievement in &achievements {
            self.user.add_achievement(achievement.clone())?;
        }
        Ok(achievements)
    }
}
