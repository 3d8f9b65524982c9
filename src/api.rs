//! REST endpoint catalog for the Gym Growth backend.
//!
//! The backend is not deployed, so nothing here performs network I/O.
//! The catalog builds fully-formed requests (method, URL, headers) that a
//! transport could send.

use std::fmt;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.gymgrowth.com";
pub const API_VERSION: &str = "/v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    // auth
    Register,
    Login,
    Logout,
    RefreshToken,
    ForgotPassword,
    // user
    GetProfile,
    UpdateProfile,
    UpdateXp,
    UpdateStreak,
    GetAchievements,
    // workouts
    LogWorkout,
    GetWorkouts,
    GetWorkout(String),
    UpdateWorkout(String),
    DeleteWorkout(String),
    GetWorkoutStats { period: String },
    // exercises
    GetExercises,
    GetExercise(String),
    CreateCustomExercise,
    // quests
    GetQuests,
    GetActiveQuests,
    ClaimQuestReward(String),
    GetQuestProgress(String),
    // progress
    GetProgress { period: String },
    GetStrengthProgress { exercise_id: String, period: String },
    GetXpHistory { period: String },
}

impl Endpoint {
    pub fn method(&self) -> Method {
        use Endpoint::*;
        match self {
            GetProfile | GetAchievements | GetWorkouts | GetWorkout(_) | GetWorkoutStats { .. }
            | GetExercises | GetExercise(_) | GetQuests | GetActiveQuests | GetQuestProgress(_)
            | GetProgress { .. } | GetStrengthProgress { .. } | GetXpHistory { .. } => Method::Get,
            UpdateProfile | UpdateWorkout(_) => Method::Put,
            DeleteWorkout(_) => Method::Delete,
            Register | Login | Logout | RefreshToken | ForgotPassword | UpdateXp | UpdateStreak
            | LogWorkout | CreateCustomExercise | ClaimQuestReward(_) => Method::Post,
        }
    }

    /// Path relative to the versioned base URL
    pub fn path(&self) -> String {
        use Endpoint::*;
        match self {
            Register => "/auth/register".into(),
            Login => "/auth/login".into(),
            Logout => "/auth/logout".into(),
            RefreshToken => "/auth/refresh".into(),
            ForgotPassword => "/auth/forgot-password".into(),
            GetProfile | UpdateProfile => "/user/profile".into(),
            UpdateXp => "/user/xp".into(),
            UpdateStreak => "/user/streak".into(),
            GetAchievements => "/user/achievements".into(),
            LogWorkout | GetWorkouts => "/workouts".into(),
            GetWorkout(id) | UpdateWorkout(id) | DeleteWorkout(id) => format!("/workouts/{}", id),
            GetWorkoutStats { period } => format!("/workouts/stats?period={}", period),
            GetExercises => "/exercises".into(),
            GetExercise(id) => format!("/exercises/{}", id),
            CreateCustomExercise => "/exercises/custom".into(),
            GetQuests => "/quests".into(),
            GetActiveQuests => "/quests/active".into(),
            ClaimQuestReward(id) => format!("/quests/{}/claim", id),
            GetQuestProgress(id) => format!("/quests/{}/progress", id),
            GetProgress { period } => format!("/progress?period={}", period),
            GetStrengthProgress { exercise_id, period } => {
                format!("/progress/strength/{}?period={}", exercise_id, period)
            }
            GetXpHistory { period } => format!("/progress/xp?period={}", period),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Default::default() }
    }

    pub fn url(&self, endpoint: &Endpoint) -> String {
        format!("{}{}{}", self.base_url.trim_end_matches('/'), API_VERSION, endpoint.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl ApiRequest {
    /// Build a request, attaching the bearer token when one is stored
    pub fn build(config: &ApiConfig, endpoint: &Endpoint, token: Option<&str>) -> Self {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        if let Some(token) = token {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }

        Self {
            method: endpoint.method(),
            url: config.url(endpoint),
            headers,
        }
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}
