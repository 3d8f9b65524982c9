//! User profile state, persisted as a single JSON blob

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::{Database, storage_keys};
use crate::error::Result;
use crate::xp::level_from_xp;

/// Fitness goals picked at signup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Goals {
    pub strength: bool,
    pub endurance: bool,
    pub weight_loss: bool,
}

impl Goals {
    pub fn any(&self) -> bool {
        self.strength || self.endurance || self.weight_loss
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub rarity: String,
    pub xp_reward: u32,
    pub unlocked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub level: u32,
    pub xp: u32,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub avatar_state: String,
    #[serde(default)]
    pub goals: Goals,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
}

impl User {
    /// Level-1 profile for a fresh signup
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>, goals: Goals) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            level: 1,
            xp: 0,
            streak: 0,
            avatar_state: "level1".to_string(),
            goals,
            achievements: Vec::new(),
        }
    }
}

/// Result of granting XP
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpUpdate {
    pub xp_gained: u32,
    pub leveled_up: bool,
    pub new_level: u32,
}

/// Holds the logged-in user and mirrors every change to storage
pub struct UserStore<'a> {
    db: &'a Database,
    user: Option<User>,
}

impl<'a> UserStore<'a> {
    /// Restore the saved user, if any
    pub fn load(db: &'a Database) -> Result<Self> {
        let user = db.load_json::<User>(storage_keys::USER)?;
        Ok(Self { db, user })
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn login(&mut self, user: User) -> Result<()> {
        info!("User {} logged in", user.email);
        self.user = Some(user);
        self.persist()
    }

    pub fn logout(&mut self) -> Result<()> {
        if let Some(user) = self.user.take() {
            info!("User {} logged out", user.email);
        }
        self.db.remove_item(storage_keys::TOKEN)?;
        self.persist()
    }

    /// Add XP and recompute the level. Levels never go down.
    pub fn update_xp(&mut self, xp_gained: u32) -> Result<Option<XpUpdate>> {
        let Some(user) = self.user.as_mut() else {
            return Ok(None);
        };

        let current_level = user.level;
        user.xp = user.xp.saturating_add(xp_gained);
        let new_level = level_from_xp(user.xp).max(current_level);
        let leveled_up = new_level > current_level;

        if leveled_up {
            user.level = new_level;
            user.avatar_state = format!("level{}", new_level);
            info!("{} reached level {}", user.name, new_level);
        }

        self.persist()?;
        Ok(Some(XpUpdate { xp_gained, leveled_up, new_level }))
    }

    pub fn update_streak(&mut self, streak: u32) -> Result<()> {
        if let Some(user) = self.user.as_mut() {
            user.streak = streak;
            self.persist()?;
        }
        Ok(())
    }

    pub fn add_achievement(&mut self, achievement: Achievement) -> Result<()> {
        if let Some(user) = self.user.as_mut() {
            user.achievements.push(achievement);
            self.persist()?;
        }
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        match &self.user {
            Some(user) => self.db.save_json(storage_keys::USER, user),
            None => self.db.remove_item(storage_keys::USER),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User::new("u1", "Ada", "ada@example.com", Goals { strength: true, ..Default::default() })
    }

    #[test]
    fn test_login_persists_and_reloads() {
        let db = Database::open_in_memory().unwrap();
        let mut store = UserStore::load(&db).unwrap();
        assert!(!store.is_authenticated());

        store.login(test_user()).unwrap();

        let reloaded = UserStore::load(&db).unwrap();
        assert_eq!(reloaded.user().unwrap().email, "ada@example.com");
    }

    #[test]
    fn test_logout_clears_storage() {
        let db = Database::open_in_memory().unwrap();
        db.set_item(storage_keys::TOKEN, "mock-token-123").unwrap();
        let mut store = UserStore::load(&db).unwrap();
        store.login(test_user()).unwrap();

        store.logout().unwrap();

        assert!(store.user().is_none());
        assert_eq!(db.get_item(storage_keys::USER).unwrap(), None);
        assert_eq!(db.get_item(storage_keys::TOKEN).unwrap(), None);
    }

    #[test]
    fn test_update_xp_without_user() {
        let db = Database::open_in_memory().unwrap();
        let mut store = UserStore::load(&db).unwrap();
        assert_eq!(store.update_xp(100).unwrap(), None);
    }

    #[test]
    fn test_update_xp_levels_up() {
        let db = Database::open_in_memory().unwrap();
        let mut store = UserStore::load(&db).unwrap();
        store.login(test_user()).unwrap();

        let update = store.update_xp(150).unwrap().unwrap();
        assert!(!update.leveled_up);
        assert_eq!(update.new_level, 1);

        let update = store.update_xp(200).unwrap().unwrap();
        assert!(update.leveled_up);
        assert_eq!(update.new_level, 2);

        let user = store.user().unwrap();
        assert_eq!(user.xp, 350);
        assert_eq!(user.avatar_state, "level2");
    }

    #[test]
    fn test_level_never_drops() {
        let db = Database::open_in_memory().unwrap();
        let mut store = UserStore::load(&db).unwrap();
        let mut user = test_user();
        user.level = 5;
        store.login(user).unwrap();

        let update = store.update_xp(10).unwrap().unwrap();
        assert_eq!(update.new_level, 5);
        assert!(!update.leveled_up);
    }

    #[test]
    fn test_streak_and_achievement() {
        let db = Database::open_in_memory().unwrap();
        let mut store = UserStore::load(&db).unwrap();
        store.login(test_user()).unwrap();

        store.update_streak(4).unwrap();
        store
            .add_achievement(Achievement {
                id: "quest_first_steps".into(),
                title: "First Steps".into(),
                description: "Completed: Complete your first workout".into(),
                kind: "quest".into(),
                rarity: "easy".into(),
                xp_reward: 100,
                unlocked_at: Utc::now(),
            })
            .unwrap();

        let reloaded = UserStore::load(&db).unwrap();
        let user = reloaded.user().unwrap();
        assert_eq!(user.streak, 4);
        assert_eq!(user.achievements.len(), 1);
    }

    #[test]
    fn test_user_blob_uses_camel_case() {
        let json = serde_json::to_value(test_user()).unwrap();
        assert!(json.get("avatarState").is_some());
        assert_eq!(json["goals"]["weightLoss"], false);
    }
}
