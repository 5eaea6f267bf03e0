// Environment-driven application configuration

use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: String,
    pub database_url: String,
    /// Secret used to sign access tokens
    pub jwt_secret: String,
    /// Secret used to sign refresh tokens (must differ from `jwt_secret`)
    pub jwt_refresh_secret: String,
    /// Access token lifetime in seconds
    pub access_token_seconds: i64,
    /// Refresh token lifetime in seconds
    pub refresh_token_seconds: i64,
    /// Invite expiry in hours
    pub invite_expires_hours: i64,
}

impl Config {
    /// Load configuration from environment variables with development defaults.
    ///
    /// Returns an error when DATABASE_URL is missing, a duration string is
    /// malformed, or the access and refresh secrets are identical.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?;

        let jwt_secret = env::var("JWT_SECRET")
            .unwrap_or_else(|_| "dev-jwt-secret-change-in-production".to_string());
        let jwt_refresh_secret = env::var("JWT_REFRESH_SECRET")
            .unwrap_or_else(|_| "dev-refresh-secret-change-in-production".to_string());

        let access_token_seconds = parse_duration_seconds(
            &env::var("JWT_EXPIRES_IN").unwrap_or_else(|_| "15m".to_string()),
        )?;
        let refresh_token_seconds = parse_duration_seconds(
            &env::var("JWT_REFRESH_EXPIRES_IN").unwrap_or_else(|_| "7d".to_string()),
        )?;

        let invite_expires_hours = env::var("INVITE_EXPIRES_HOURS")
            .unwrap_or_else(|_| "48".to_string())
            .parse::<i64>()
            .map_err(|_| ConfigError::InvalidValue("INVITE_EXPIRES_HOURS"))?;

        let config = Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT").unwrap_or_else(|_| "8080".to_string()),
            database_url,
            jwt_secret,
            jwt_refresh_secret,
            access_token_seconds,
            refresh_token_seconds,
            invite_expires_hours,
        };
        config.validate()?;
        Ok(config)
    }

    /// A compromised refresh secret must not allow forging access tokens,
    /// so the two secrets are required to differ.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret == self.jwt_refresh_secret {
            return Err(ConfigError::IdenticalSecrets);
        }
        if self.invite_expires_hours <= 0 {
            return Err(ConfigError::InvalidValue("INVITE_EXPIRES_HOURS"));
        }
        Ok(())
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),

    #[error("Invalid duration string: {0}")]
    InvalidDuration(String),

    #[error("JWT_SECRET and JWT_REFRESH_SECRET must differ")]
    IdenticalSecrets,
}

/// Parse a short-form duration string ("900s", "15m", "12h", "7d") into seconds.
/// A bare number is treated as seconds.
pub fn parse_duration_seconds(input: &str) -> Result<i64, ConfigError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidDuration(input.to_string()));
    }

    let (value, multiplier) = match trimmed.chars().last() {
        Some('s') => (&trimmed[..trimmed.len() - 1], 1),
        Some('m') => (&trimmed[..trimmed.len() - 1], 60),
        Some('h') => (&trimmed[..trimmed.len() - 1], 3600),
        Some('d') => (&trimmed[..trimmed.len() - 1], 86400),
        Some(c) if c.is_ascii_digit() => (trimmed, 1),
        _ => return Err(ConfigError::InvalidDuration(input.to_string())),
    };

    let amount = value
        .parse::<i64>()
        .map_err(|_| ConfigError::InvalidDuration(input.to_string()))?;
    if amount <= 0 {
        return Err(ConfigError::InvalidDuration(input.to_string()));
    }

    amount
        .checked_mul(multiplier)
        .ok_or_else(|| ConfigError::InvalidDuration(input.to_string()))
}
