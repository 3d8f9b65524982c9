//! Runtime configuration from the environment

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::{ApiConfig, DEFAULT_BASE_URL};
use crate::auth::DEFAULT_LOGIN_DELAY;
use crate::error::Result;

pub const DEFAULT_DB_NAME: &str = "gymgrowth.db";

pub const ENV_DB: &str = "GYMGROWTH_DB";
pub const ENV_LOGIN_DELAY_MS: &str = "GYMGROWTH_LOGIN_DELAY_MS";
pub const ENV_API_URL: &str = "GYMGROWTH_API_URL";

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub login_delay: Duration,
    pub api: ApiConfig,
}

/// Database under the platform data dir, or the working dir as fallback
pub fn default_db_path() -> Result<PathBuf> {
    let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    db_path_in(&base)
}

/// `<base>/gymgrowth/gymgrowth.db`, creating the directory
fn db_path_in(base: &Path) -> Result<PathBuf> {
    let data_dir = base.join("gymgrowth");
    std::fs::create_dir_all(&data_dir)?;
    Ok(data_dir.join(DEFAULT_DB_NAME))
}

impl Config {
    /// Build from explicit overrides, falling back to defaults
    pub fn new(db_path: Option<PathBuf>, login_delay_ms: Option<u64>, api_url: Option<String>) -> Result<Self> {
        let db_path = match db_path {
            Some(path) => path,
            None => default_db_path()?,
        };
        Ok(Self {
            db_path,
            login_delay: login_delay_ms.map(Duration::from_millis).unwrap_or(DEFAULT_LOGIN_DELAY),
            api: ApiConfig::new(api_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new(Some(PathBuf::from(DEFAULT_DB_NAME)), None, None).unwrap();
        assert_eq!(config.login_delay, Duration::from_millis(1000));
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_overrides() {
        let config = Config::new(Some(PathBuf::from("/tmp/x.db")), Some(0), Some("http://localhost".into())).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/x.db"));
        assert_eq!(config.login_delay, Duration::ZERO);
        assert_eq!(config.api.base_url, "http://localhost");
    }

    #[test]
    fn test_data_dir_creation_error_surfaces() {
        let base = std::env::temp_dir().join(format!("gymgrowth-config-{}", std::process::id()));
        std::fs::write(&base, b"not a directory").unwrap();

        let err = db_path_in(&base).unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));

        std::fs::remove_file(&base).unwrap();
    }

    #[test]
    fn test_data_dir_is_created() {
        let base = std::env::temp_dir().join(format!("gymgrowth-config-ok-{}", std::process::id()));
        let path = db_path_in(&base).unwrap();
        assert!(base.join("gymgrowth").is_dir());
        assert!(path.ends_with(DEFAULT_DB_NAME));

        std::fs::remove_dir_all(&base).unwrap();
    }
}
