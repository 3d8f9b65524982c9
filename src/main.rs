//! gymgrowth - Gamified workout tracker
//!
//! Log workouts, earn XP, level up every body part and complete quests.

use std::path::PathBuf;

use anyhow::{Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gymgrowth::api::{ApiRequest, Endpoint};
use gymgrowth::app::{ExerciseInput, GymGrowth};
use gymgrowth::auth::{SignupForm, mock_login};
use gymgrowth::config::{Config, ENV_API_URL, ENV_DB, ENV_LOGIN_DELAY_MS};
use gymgrowth::db::{Database, storage_keys};
use gymgrowth::exercises::{BodyPart, get_available_exercises};
use gymgrowth::motivation::random_message;
use gymgrowth::progress::{Period, daily_chart, exercise_breakdown, streak_calendar};
use gymgrowth::tui::App;
use gymgrowth::user::Goals;
use gymgrowth::xp::progress_to_next_level;

#[derive(Parser)]
#[command(name = "gymgrowth")]
#[command(author, version, about = "Gym Growth - level up by working out")]
struct Cli {
    /// Database file (defaults to the platform data dir)
    #[arg(long, global = true, env = ENV_DB)]
    db: Option<PathBuf>,

    /// Artificial delay of the mocked login, in milliseconds
    #[arg(long, global = true, env = ENV_LOGIN_DELAY_MS)]
    login_delay_ms: Option<u64>,

    /// Base URL of the REST backend
    #[arg(long, global = true, env = ENV_API_URL)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open TUI dashboard
    Tui,

    /// Create a local profile
    Signup {
        name: String,
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
        #[arg(long)]
        strength: bool,
        #[arg(long)]
        endurance: bool,
        #[arg(long)]
        weight_loss: bool,
    },

    /// Log in with the demo account (test@example.com / password)
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Log out and forget the profile
    Logout,

    /// Show profile, level progress and workout stats
    Whoami,

    /// List exercises, optionally only those for a body part
    Exercises {
        /// Body part id (e.g. "left_bicep", "chest")
        #[arg(short, long)]
        part: Option<String>,
    },

    /// Start a new workout
    Start,

    /// Log an exercise into the current workout
    Log {
        /// Exercise id (e.g. "bench-press", "squat")
        exercise: String,

        #[arg(short, long, default_value = "1")]
        sets: u32,

        #[arg(short, long, default_value = "10")]
        reps: u32,

        /// Weight in kg
        #[arg(short, long, default_value = "20")]
        weight: f64,

        #[arg(short, long, default_value = "1.0")]
        bonus: f64,
    },

    /// Remove an exercise from the current workout by position
    Remove { index: usize },

    /// Finish the current workout
    Finish,

    /// Discard the current workout
    Cancel,

    /// List workout history
    History {
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Show progress charts for a period (7d, 30d, 90d, all)
    Stats {
        #[arg(short, long, default_value = "30d")]
        period: Period,
    },

    /// Show body part levels
    Body,

    /// Show quests
    Quests,

    /// Claim a completed quest's reward
    Claim { quest_id: String },

    /// Print the REST request an endpoint would send
    Api {
        /// One of: login, profile, workouts, exercises, quests, progress
        endpoint: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let config = Config::new(cli.db, cli.login_delay_ms, cli.api_url)?;
    let db = Database::open(&config.db_path)?;

    match cli.command {
        Some(Commands::Tui) | None => {
            let mut app = App::new(&db)?;
            app.run()?;
        }

        Some(Commands::Signup { name, email, password, confirm_password, strength, endurance, weight_loss }) => {
            let mut app = GymGrowth::load(&db)?;
            let user = app.signup(SignupForm {
                name,
                email,
                password,
                confirm_password,
                goals: Goals { strength, endurance, weight_loss },
            })?;
            println!("Welcome, {}! You start at level {}.", user.name, user.level);
        }

        Some(Commands::Login { email, password }) => {
            println!("Logging in...");
            let response = mock_login(&email, &password, config.login_delay).await?;
            let mut app = GymGrowth::load(&db)?;
            app.login(response)?;
            if let Some(user) = app.current_user() {
                println!("Welcome back, {}! Level {} | {} XP", user.name, user.level, user.xp);
            }
        }

        Some(Commands::Logout) => {
            let mut app = GymGrowth::load(&db)?;
            app.logout()?;
            println!("Logged out.");
        }

        Some(Commands::Whoami) => {
            let app = GymGrowth::load(&db)?;
            let Some(user) = app.current_user() else {
                bail!("not logged in");
            };
            let level = progress_to_next_level(user.xp, user.level);
            let stats = app.workouts.stats();

            println!("{} <{}>", user.name, user.email);
            println!("{:-<40}", "");
            println!("Level {} | {} XP | streak {} days", user.level, user.xp, user.streak);
            println!("Next level: {}/{} ({:.0}%)", level.current, level.required, level.percentage);
            println!("Workouts: {} | Total XP: {} | Avg: {} min", stats.total_workouts, stats.total_xp, stats.avg_workout_minutes);
            if let Some(fav) = stats.favorite_exercise {
                println!("Favorite exercise: {}", fav);
            }
            println!("Achievements: {}", user.achievements.len());
            println!();
            println!("{}", random_message());
        }

        Some(Commands::Exercises { part }) => {
            let mut app = GymGrowth::load(&db)?;
            if let Some(id) = part {
                let Some(part) = BodyPart::from_id(&id) else {
                    bail!("unknown body part: {}", id);
                };
                app.body_parts.select(part);
            }
            for e in app.body_parts.filtered_exercises(get_available_exercises()) {
                println!("{} {:16} {:16} base {} XP", e.category.emoji(), e.id, e.name, e.base_xp);
            }
        }

        Some(Commands::Start) => {
            let mut app = GymGrowth::load(&db)?;
            app.start_workout(Utc::now())?;
            println!("Workout started. Log exercises with `gymgrowth log <exercise>`.");
        }

        Some(Commands::Log { exercise, sets, reps, weight, bonus }) => {
            let mut app = GymGrowth::load(&db)?;
            let input = ExerciseInput { sets, reps, weight, bonus_multiplier: bonus };
            let logged = app.log_exercise(&exercise, input, Utc::now())?;
            println!(
                "Logged: {} - {}x{} @ {}kg (+{} XP)",
                logged.exercise.exercise_name, sets, reps, weight, logged.exercise.xp_earned
            );
            if let Some(share) = logged.body_parts {
                let names: Vec<&str> = share.parts.iter().map(|p| p.display_name()).collect();
                println!("  +{} XP each to {}", share.xp_each, names.join(", "));
            }
        }

        Some(Commands::Remove { index }) => {
            let mut app = GymGrowth::load(&db)?;
            match app.remove_exercise(index)? {
                Some(removed) => println!("Removed {} (-{} XP)", removed.exercise_name, removed.xp_earned),
                None => println!("No exercise at position {}", index),
            }
        }

        Some(Commands::Finish) => {
            let mut app = GymGrowth::load(&db)?;
            let summary = app.finish_workout(Utc::now())?;
            println!("Workout complete! +{} XP", summary.record.total_xp);
            if let Some(update) = summary.xp
                && update.leveled_up
            {
                println!("LEVEL UP! You are now level {}", update.new_level);
            }
            if let Some(streak) = summary.streak {
                println!("Streak: {} days", streak);
            }
            if let Some(score) = &summary.score {
                println!("Workout score: {}", score.final_score);
            }
            for quest in &summary.completed_quests {
                println!("Quest completed: {} (+{} XP to claim)", quest.title, quest.xp_reward);
            }
        }

        Some(Commands::Cancel) => {
            let mut app = GymGrowth::load(&db)?;
            app.cancel_workout()?;
            println!("Workout cancelled.");
        }

        Some(Commands::History { limit }) => {
            let app = GymGrowth::load(&db)?;
            if let Some(active) = app.workouts.active() {
                println!("In progress: {} exercises, {} XP", active.exercises.len(), active.total_xp);
                for (i, e) in active.exercises.iter().enumerate() {
                    println!("  [{}] {} {}x{} @ {}kg +{} XP", i, e.exercise_name, e.sets, e.reps, e.weight, e.xp_earned);
                }
            }
            println!("Recent workouts:");
            println!("{:-<60}", "");
            for w in app.workouts.history().iter().take(limit) {
                let names: Vec<&str> = w.exercises.iter().map(|e| e.exercise_name.as_str()).collect();
                println!("{} | {:40} | {} XP", w.date.format("%Y-%m-%d"), names.join(", "), w.total_xp);
            }
        }

        Some(Commands::Stats { period }) => {
            let app = GymGrowth::load(&db)?;
            let today = Utc::now().date_naive();
            let history = app.workouts.history();

            println!("Progress - {}", period.label());
            println!("{:-<40}", "");
            for point in daily_chart(history, period, today) {
                println!("{} | {:5} XP | {} workouts | {} exercises", point.date, point.xp, point.workouts, point.exercises);
            }

            println!();
            println!("Top exercises:");
            for (name, count) in exercise_breakdown(history, period, today) {
                println!("  {:20} {}", name, count);
            }

            let calendar: String = streak_calendar(history, today)
                .iter()
                .map(|(_, worked)| if *worked { '#' } else { '.' })
                .collect();
            println!();
            println!("Last 30 days: {}", calendar);
        }

        Some(Commands::Body) => {
            let app = GymGrowth::load(&db)?;
            let stats = app.body_parts.stats();
            println!("Body parts (avg level {:.1}, total {} XP)", stats.average_level, stats.total_xp);
            println!("{:-<50}", "");
            for part in BodyPart::all() {
                let p = app.body_parts.progress(*part);
                println!(
                    "{:16} Lv {:2} | {:3}/{} XP | {} sessions",
                    part.display_name(),
                    p.level,
                    p.current_xp,
                    p.required_xp,
                    p.workout_count
                );
            }
            println!("Most developed: {}", stats.most_developed.display_name());
            println!("Least developed: {}", stats.least_developed.display_name());
        }

        Some(Commands::Quests) => {
            let app = GymGrowth::load(&db)?;
            println!("Active quests:");
            for q in app.quests.active_quests() {
                let progress = app.quests.progress(q.id).unwrap_or(0.0);
                println!(
                    "  [{}] {} - {} ({:.0}/{} {}) +{} XP",
                    q.difficulty.as_str(),
                    q.title,
                    q.description,
                    progress,
                    q.target,
                    q.unit,
                    q.reward_xp
                );
            }
            let unclaimed = app.quests.unclaimed_rewards();
            if !unclaimed.is_empty() {
                println!("Unclaimed rewards:");
                for c in unclaimed {
                    if let Some(q) = c.template() {
                        println!("  {} ({}) +{} XP", q.title, q.id, q.reward_xp);
                    }
                }
            }
        }

        Some(Commands::Claim { quest_id }) => {
            let mut app = GymGrowth::load(&db)?;
            match app.claim_quest(&quest_id)? {
                Some((reward, update)) => {
                    println!("Claimed {}: +{} XP", reward.title, reward.xp);
                    if let Some(update) = update
                        && update.leveled_up
                    {
                        println!("LEVEL UP! You are now level {}", update.new_level);
                    }
                }
                None => println!("Nothing to claim for {}", quest_id),
            }
        }

        Some(Commands::Api { endpoint }) => {
            let endpoint = match endpoint.as_str() {
                "login" => Endpoint::Login,
                "profile" => Endpoint::GetProfile,
                "workouts" => Endpoint::GetWorkouts,
                "exercises" => Endpoint::GetExercises,
                "quests" => Endpoint::GetQuests,
                "progress" => Endpoint::GetProgress { period: "30d".to_string() },
                other => bail!("unknown endpoint: {}", other),
            };
            let token = db.get_item(storage_keys::TOKEN)?;
            let request = ApiRequest::build(&config.api, &endpoint, token.as_deref());
            println!("{}", request);
            for (name, value) in &request.headers {
                println!("{}: {}", name, value);
            }
        }
    }

    Ok(())
}
