//! gymgrowth - Gamified workout tracker
//!
//! Log workouts, earn XP, level up every body part and complete quests.

pub mod api;
pub mod app;
pub mod auth;
pub mod body_parts;
pub mod config;
pub mod db;
pub mod error;
pub mod exercises;
pub mod motivation;
pub mod progress;
pub mod quests;
pub mod tui;
pub mod user;
pub mod workout;
pub mod xp;

pub use app::GymGrowth;
pub use db::Database;
pub use error::{Error, Result};
