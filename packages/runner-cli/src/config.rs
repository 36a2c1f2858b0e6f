use anyhow::Result;
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

use tenant_runner::{ConfigError, ConfigResult, Credentials};

/// Settings read from the environment. Command-line flags take precedence.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub tenant_url: Option<String>,
    pub tenant_user: Option<String>,
    pub tenant_secret: Option<String>,
    pub snapshot: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            tenant_url: env::var("TENANT_URL").ok(),
            tenant_user: env::var("TENANT_USER").ok(),
            tenant_secret: env::var("TENANT_SECRET").ok(),
            snapshot: env::var_os("TENANT_SNAPSHOT").map(PathBuf::from),
        })
    }

    /// Snapshot to crawl: `flag` if given, else `TENANT_SNAPSHOT`.
    pub fn snapshot_path(&self, flag: Option<PathBuf>) -> ConfigResult<PathBuf> {
        flag.or_else(|| self.snapshot.clone())
            .ok_or(ConfigError::Missing("TENANT_SNAPSHOT"))
    }

    /// Anonymous unless a user is configured.
    pub fn credentials(&self) -> Credentials {
        match &self.tenant_user {
            Some(user) => Credentials::new(user, self.tenant_secret.clone().unwrap_or_default()),
            None => Credentials::anonymous(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_default_to_anonymous() {
        let config = Config::default();
        assert_eq!(config.credentials().user, "anonymous");
    }

    #[test]
    fn test_snapshot_flag_wins_over_env() {
        let config = Config {
            snapshot: Some(PathBuf::from("env.json")),
            ..Config::default()
        };
        let path = config.snapshot_path(Some(PathBuf::from("flag.json"))).unwrap();
        assert_eq!(path, PathBuf::from("flag.json"));
        assert_eq!(config.snapshot_path(None).unwrap(), PathBuf::from("env.json"));
    }

    #[test]
    fn test_missing_snapshot_is_reported() {
        let err = Config::default().snapshot_path(None).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("TENANT_SNAPSHOT")));
    }

    #[test]
    fn test_credentials_from_user_and_secret() {
        let config = Config {
            tenant_user: Some("admin@contoso.example.com".into()),
            tenant_secret: Some("hunter2".into()),
            ..Config::default()
        };
        let credentials = config.credentials();
        assert_eq!(credentials.user, "admin@contoso.example.com");
        assert_eq!(credentials.secret.expose(), "hunter2");
    }
}
