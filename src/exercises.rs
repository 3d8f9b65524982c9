//! Exercise definitions and the exercise → body part map

use serde::{Deserialize, Serialize};

/// Body regions that level up independently
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum BodyPart {
    Head,
    Chest,
    Abs,
    LeftShoulder,
    RightShoulder,
    LeftBicep,
    RightBicep,
    LeftForearm,
    RightForearm,
    LeftQuad,
    RightQuad,
    LeftCalf,
    RightCalf,
    Back,
    Glutes,
}

impl BodyPart {
    /// All body parts for iteration
    pub fn all() -> &'static [BodyPart] {
        &[
            BodyPart::Head,
            BodyPart::Chest,
            BodyPart::Abs,
            BodyPart::LeftShoulder,
            BodyPart::RightShoulder,
            BodyPart::LeftBicep,
            BodyPart::RightBicep,
            BodyPart::LeftForearm,
            BodyPart::RightForearm,
            BodyPart::LeftQuad,
            BodyPart::RightQuad,
            BodyPart::LeftCalf,
            BodyPart::RightCalf,
            BodyPart::Back,
            BodyPart::Glutes,
        ]
    }

    pub fn id(&self) -> &'static str {
        match self {
            BodyPart::Head => "head",
            BodyPart::Chest => "chest",
            BodyPart::Abs => "abs",
            BodyPart::LeftShoulder => "left_shoulder",
            BodyPart::RightShoulder => "right_shoulder",
            BodyPart::LeftBicep => "left_bicep",
            BodyPart::RightBicep => "right_bicep",
            BodyPart::LeftForearm => "left_forearm",
            BodyPart::RightForearm => "right_forearm",
            BodyPart::LeftQuad => "left_quad",
            BodyPart::RightQuad => "right_quad",
            BodyPart::LeftCalf => "left_calf",
            BodyPart::RightCalf => "right_calf",
            BodyPart::Back => "back",
            BodyPart::Glutes => "glutes",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BodyPart::Head => "Head",
            BodyPart::Chest => "Chest",
            BodyPart::Abs => "Abs",
            BodyPart::LeftShoulder => "Left Shoulder",
            BodyPart::RightShoulder => "Right Shoulder",
            BodyPart::LeftBicep => "Left Bicep",
            BodyPart::RightBicep => "Right Bicep",
            BodyPart::LeftForearm => "Left Forearm",
            BodyPart::RightForearm => "Right Forearm",
            BodyPart::LeftQuad => "Left Quad",
            BodyPart::RightQuad => "Right Quad",
            BodyPart::LeftCalf => "Left Calf",
            BodyPart::RightCalf => "Right Calf",
            BodyPart::Back => "Back",
            BodyPart::Glutes => "Glutes",
        }
    }

    /// Exercise category used when filtering by a selected part.
    /// The head has no exercises of its own.
    pub fn category(&self) -> Option<Category> {
        match self {
            BodyPart::Head => None,
            BodyPart::Chest => Some(Category::Chest),
            BodyPart::Abs => Some(Category::Abs),
            BodyPart::LeftShoulder | BodyPart::RightShoulder => Some(Category::Shoulders),
            BodyPart::LeftBicep
            | BodyPart::RightBicep
            | BodyPart::LeftForearm
            | BodyPart::RightForearm => Some(Category::Arms),
            BodyPart::LeftQuad
            | BodyPart::RightQuad
            | BodyPart::LeftCalf
            | BodyPart::RightCalf
            | BodyPart::Glutes => Some(Category::Legs),
            BodyPart::Back => Some(Category::Back),
        }
    }

    pub fn from_id(id: &str) -> Option<BodyPart> {
        BodyPart::all().iter().copied().find(|p| p.id() == id)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Category {
    Chest,
    Abs,
    Shoulders,
    Arms,
    Legs,
    Back,
}

impl Category {
    pub fn emoji(&self) -> &'static str {
        match self {
            Category::Chest => "🏋️",
            Category::Abs => "🎯",
            Category::Shoulders => "💪",
            Category::Arms => "💪",
            Category::Legs => "🦵",
            Category::Back => "🔝",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Exercise {
    pub id: &'static str,
    pub name: &'static str,
    pub category: Category,
    pub base_xp: u32,
}

/// Exercises offered in the workout log
pub const AVAILABLE_EXERCISES: &[Exercise] = &[
    Exercise { id: "bench-press", name: "Bench Press", category: Category::Chest, base_xp: 15 },
    Exercise { id: "squat", name: "Squat", category: Category::Legs, base_xp: 20 },
    Exercise { id: "deadlift", name: "Deadlift", category: Category::Back, base_xp: 25 },
    Exercise { id: "pull-up", name: "Pull-up", category: Category::Back, base_xp: 18 },
    Exercise { id: "push-up", name: "Push-up", category: Category::Chest, base_xp: 8 },
    Exercise { id: "overhead-press", name: "Overhead Press", category: Category::Shoulders, base_xp: 12 },
];

/// Which parts an exercise trains. XP is split evenly between them.
const EXERCISE_BODY_PARTS: &[(&str, &[BodyPart])] = &[
    ("bench-press", &[BodyPart::Chest, BodyPart::LeftShoulder, BodyPart::RightShoulder]),
    ("squat", &[BodyPart::LeftQuad, BodyPart::RightQuad, BodyPart::Glutes]),
    ("deadlift", &[BodyPart::Back, BodyPart::LeftQuad, BodyPart::RightQuad, BodyPart::Glutes]),
    ("pull-up", &[BodyPart::Back, BodyPart::LeftBicep, BodyPart::RightBicep]),
    ("push-up", &[BodyPart::Chest, BodyPart::LeftShoulder, BodyPart::RightShoulder]),
    ("overhead-press", &[BodyPart::LeftShoulder, BodyPart::RightShoulder, BodyPart::Chest]),
    ("bicep-curl", &[BodyPart::LeftBicep, BodyPart::RightBicep]),
    ("tricep-dip", &[BodyPart::LeftForearm, BodyPart::RightForearm]),
    ("calf-raise", &[BodyPart::LeftCalf, BodyPart::RightCalf]),
    ("plank", &[BodyPart::Abs, BodyPart::Chest]),
    ("sit-up", &[BodyPart::Abs]),
    ("lat-pulldown", &[BodyPart::Back, BodyPart::LeftBicep, BodyPart::RightBicep]),
];

const XP_MULTIPLIERS: &[(&str, f64)] = &[
    ("bench-press", 1.5),
    ("squat", 2.0),
    ("deadlift", 2.5),
    ("pull-up", 1.8),
    ("push-up", 0.8),
    ("overhead-press", 1.2),
];

pub fn get_available_exercises() -> &'static [Exercise] {
    AVAILABLE_EXERCISES
}

pub fn find_exercise(id: &str) -> Option<&'static Exercise> {
    AVAILABLE_EXERCISES.iter().find(|e| e.id == id)
}

/// Body parts trained by an exercise; empty for unmapped ids
pub fn body_parts_for(exercise_id: &str) -> &'static [BodyPart] {
    EXERCISE_BODY_PARTS
        .iter()
        .find(|(id, _)| *id == exercise_id)
        .map(|(_, parts)| *parts)
        .unwrap_or(&[])
}

/// XP multiplier for an exercise type, 1.0 when it has none
pub fn xp_multiplier(exercise_id: &str) -> f64 {
    XP_MULTIPLIERS
        .iter()
        .find(|(id, _)| *id == exercise_id)
        .map(|(_, m)| *m)
        .unwrap_or(1.0)
}
