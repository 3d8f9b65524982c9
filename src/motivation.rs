//! Motivation module - dashboard messages

use chrono::{Datelike, NaiveDate};
use rand::seq::SliceRandom;

pub const MESSAGES: &[&str] = &[
    "You're crushing your fitness goals! 💪",
    "Every rep counts towards greatness! 🔥",
    "Stay consistent, champion! 🏆",
    "Your dedication is inspiring! ⭐",
    "Push harder, achieve more! 🚀",
];

/// Message of the day: the same all day, rotating daily
pub fn message_for_day(day: NaiveDate) -> &'static str {
    let days = day.num_days_from_ce();
    MESSAGES[days.rem_euclid(MESSAGES.len() as i32) as usize]
}

pub fn random_message() -> &'static str {
    MESSAGES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(MESSAGES[0])
}
