use std::fmt;

use crate::{Error, Result};

pub const API_KEY_VAR: &str = "API_KEY";
pub const API_SECRET_VAR: &str = "API_SECRET";
pub const ACCESS_TOKEN_VAR: &str = "ACCESS_TOKEN";
pub const ACCESS_TOKEN_SECRET_VAR: &str = "ACCESS_TOKEN_SECRET";

/// OAuth 1.0a user-context credentials for one run
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl Credentials {
    /// Read all four secrets from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build credentials from any name -> value lookup.
    /// Missing and empty values are both rejected.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &'static str| -> Result<String> {
            match lookup(name) {
                Some(value) if !value.trim().is_empty() => Ok(value),
                _ => Err(Error::MissingCredential(name)),
            }
        };

        let credentials = Self {
            api_key: require(API_KEY_VAR)?,
            api_secret: require(API_SECRET_VAR)?,
            access_token: require(ACCESS_TOKEN_VAR)?,
            access_token_secret: require(ACCESS_TOKEN_SECRET_VAR)?,
        };

        tracing::debug!("Loaded API credentials from environment");
        Ok(credentials)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("access_token_secret", &"<redacted>")
            .finish()
    }
}
