//! Error type shared by the library modules

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Shown to the user as-is by the login screen
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Please select at least one fitness goal")]
    NoGoalSelected,

    #[error("No exercises logged")]
    EmptyWorkout,

    #[error("no workout in progress")]
    NoActiveWorkout,

    #[error("not logged in")]
    NotLoggedIn,

    #[error("unknown exercise: {0}")]
    UnknownExercise(String),

    #[error("invalid {field}: {value}")]
    InvalidInput { field: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;
