use std::env;

use tracing::warn;

use crate::server::Environment;

const DEV_SECRET: &str = "your-secret-key-change-in-production";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum JwtConfigError {
    #[error("JWT_SECRET must be set outside development")]
    MissingSecret,
}

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Access token lifetime in seconds.
    pub access_token_expiry: i64,
}

impl JwtConfig {
    pub fn from_env(environment: Environment) -> Result<Self, JwtConfigError> {
        Self::from_vars(|key| env::var(key).ok(), environment)
    }

    /// Only development may sign with the built-in secret.
    pub fn from_vars<F>(lookup: F, environment: Environment) -> Result<Self, JwtConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = match lookup("JWT_SECRET").filter(|s| !s.trim().is_empty()) {
            Some(secret) => secret,
            None if environment == Environment::Development => {
                warn!("JWT_SECRET is not set; falling back to the development secret");
                DEV_SECRET.to_string()
            }
            None => return Err(JwtConfigError::MissingSecret),
        };

        Ok(Self {
            secret,
            access_token_expiry: lookup("JWT_ACCESS_EXPIRY")
                .and_then(|s| s.parse().ok())
                .unwrap_or(3600), // 1 hour
        })
    }
}
