//! Execution handle: the target root plus the credentials used to reach it.
//!
//! Uses the `secrecy` crate so a session can be logged without leaking its
//! secret.

use secrecy::{ExposeSecret, SecretBox};
use std::fmt;
use url::Url;

use crate::error::{ConfigError, ConfigResult};

/// A secret that won't be logged or displayed.
pub struct Secret(SecretBox<str>);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretBox::new(Box::from(value.into().as_str())))
    }

    /// Only call this when actually authenticating.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for Secret {
    fn clone(&self) -> Self {
        Self::new(self.expose().to_string())
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Who the crawl runs as.
#[derive(Clone)]
pub struct Credentials {
    pub user: String,
    pub secret: Secret,
}

impl Credentials {
    pub fn new(user: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            secret: Secret::new(secret),
        }
    }

    /// Credentials for stores that need none.
    pub fn anonymous() -> Self {
        Self::new("anonymous", "")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Opaque session handed to every store call.
///
/// The tenant and taxonomy branch share one session; every site collection
/// gets its own, built with [`Session::for_root`].
#[derive(Debug, Clone)]
pub struct Session {
    root: Url,
    credentials: Credentials,
}

impl Session {
    pub fn new(root: &str, credentials: Credentials) -> ConfigResult<Self> {
        let root = Url::parse(root).map_err(|source| ConfigError::InvalidUrl {
            url: root.to_string(),
            source,
        })?;
        Ok(Self { root, credentials })
    }

    /// Same credentials, different target root.
    pub fn for_root(&self, root: Url) -> Self {
        Self {
            root,
            credentials: self.credentials.clone(),
        }
    }

    pub fn root(&self) -> &Url {
        &self.root
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_not_in_debug() {
        let session =
            Session::new("https://contoso-admin.example.com", Credentials::new("admin", "hunter2"))
                .unwrap();
        let debug = format!("{:?}", session);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
        assert!(debug.contains("admin"));
    }

    #[test]
    fn test_for_root_keeps_credentials() {
        let session =
            Session::new("https://contoso-admin.example.com", Credentials::new("admin", "pw"))
                .unwrap();
        let other = session.for_root(Url::parse("https://contoso.example.com/sites/hr").unwrap());
        assert_eq!(other.root().path(), "/sites/hr");
        assert_eq!(other.credentials().user, "admin");
        assert_eq!(other.credentials().secret.expose(), "pw");
    }

    #[test]
    fn test_malformed_root_is_config_error() {
        let err = Session::new("not a url", Credentials::anonymous()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }
}
