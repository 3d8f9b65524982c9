//! Authentication - mocked login and local signup
//!
//! There is no backend: login accepts one demo account after an
//! artificial delay, signup just validates the form and builds a profile.

use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::user::{Goals, User};

pub const DEMO_EMAIL: &str = "test@example.com";
pub const DEMO_PASSWORD: &str = "password";
pub const DEMO_TOKEN: &str = "mock-token-123";

/// Delay used by the UI to mimic a network round trip
pub const DEFAULT_LOGIN_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

fn demo_user() -> User {
    User {
        id: "user123".to_string(),
        name: "Test User".to_string(),
        email: DEMO_EMAIL.to_string(),
        level: 3,
        xp: 1250,
        streak: 5,
        avatar_state: "level3".to_string(),
        goals: Goals { strength: true, endurance: true, weight_loss: false },
        achievements: Vec::new(),
    }
}

/// Check credentials against the demo account
pub async fn mock_login(email: &str, password: &str, delay: Duration) -> Result<LoginResponse> {
    tokio::time::sleep(delay).await;

    if email == DEMO_EMAIL && password == DEMO_PASSWORD {
        info!("Mock login succeeded for {}", email);
        return Ok(LoginResponse {
            user: demo_user(),
            token: DEMO_TOKEN.to_string(),
        });
    }

    warn!("Mock login rejected for {}", email);
    Err(Error::InvalidCredentials)
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub goals: Goals,
}

/// Validate a signup form and build the new level-1 user
pub fn signup(form: SignupForm) -> Result<User> {
    if form.password != form.confirm_password {
        return Err(Error::PasswordMismatch);
    }
    if !form.goals.any() {
        return Err(Error::NoGoalSelected);
    }

    let id = Utc::now().timestamp_millis().to_string();
    Ok(User::new(id, form.name, form.email, form.goals))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_login_demo_account() {
        let response = mock_login(DEMO_EMAIL, DEMO_PASSWORD, Duration::ZERO).await.unwrap();
        assert_eq!(response.token, DEMO_TOKEN);
        assert_eq!(response.user.level, 3);
        assert_eq!(response.user.xp, 1250);
        assert_eq!(response.user.streak, 5);
    }

    #[tokio::test]
    async fn test_mock_login_wrong_password() {
        let err = mock_login(DEMO_EMAIL, "hunter2", Duration::ZERO).await.unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials));
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[tokio::test]
    async fn test_mock_login_waits() {
        let delay = Duration::from_millis(20);
        let start = std::time::Instant::now();
        mock_login(DEMO_EMAIL, DEMO_PASSWORD, delay).await.unwrap();
        assert!(start.elapsed() >= delay);
    }

    fn form() -> SignupForm {
        SignupForm {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "secret".into(),
            confirm_password: "secret".into(),
            goals: Goals { endurance: true, ..Default::default() },
        }
    }

    #[test]
    fn test_signup() {
        let user = signup(form()).unwrap();
        assert_eq!(user.level, 1);
        assert_eq!(user.xp, 0);
        assert_eq!(user.streak, 0);
        assert_eq!(user.avatar_state, "level1");
    }

    #[test]
    fn test_signup_password_mismatch() {
        let mut f = form();
        f.confirm_password = "other".into();
        assert!(matches!(signup(f), Err(Error::PasswordMismatch)));
    }

    #[test]
    fn test_signup_requires_goal() {
        let mut f = form();
        f.goals = Goals::default();
        let err = signup(f).unwrap_err();
        assert_eq!(err.to_string(), "Please select at least one fitness goal");
    }
}
