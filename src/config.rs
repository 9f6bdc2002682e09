use std::str::FromStr;

use strum_macros::{AsRefStr, EnumString};
use thiserror::Error;
use tracing::warn;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_EXPIRATION_HOURS: i64 = 3;
/// One hundred years
const MAX_EXPIRATION_HOURS: i64 = 24 * 365 * 100;
const DEVELOPMENT_SECRET: &str = "your-secret-key-change-in-production";

/// How the access token travels between client and server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TransportKind {
    /// Returned in the response body, presented as `Authorization: Bearer`
    Bearer,
    /// Set as an HTTP-only cookie, presented by the browser
    Cookie,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Process configuration, read once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: Option<String>,
    pub token_secret: String,
    pub token_expiration_hours: i64,
    pub transport: TransportKind,
    pub production: bool,
}

impl AppConfig {
    /// Reads configuration from the environment (and `.env` when present).
    ///
    /// Recognised variables: `PORT`, `DATABASE_URL` (falls back to `DB_URI`),
    /// `ACCESS_TOKEN`, `TOKEN_TRANSPORT`, `TOKEN_EXPIRATION_HOURS`, `APP_ENV`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_or("PORT", lookup("PORT"), DEFAULT_PORT)?;
        let token_expiration_hours = parse_or(
            "TOKEN_EXPIRATION_HOURS",
            lookup("TOKEN_EXPIRATION_HOURS"),
            DEFAULT_EXPIRATION_HOURS,
        )?;
        if !(1..=MAX_EXPIRATION_HOURS).contains(&token_expiration_hours)
            || chrono::Duration::try_hours(token_expiration_hours).is_none()
        {
            return Err(ConfigError::InvalidValue {
                name: "TOKEN_EXPIRATION_HOURS",
                value: token_expiration_hours.to_string(),
            });
        }

        let transport = match lookup("TOKEN_TRANSPORT") {
            Some(value) => TransportKind::from_str(value.trim()).map_err(|_| {
                ConfigError::InvalidValue {
                    name: "TOKEN_TRANSPORT",
                    value,
                }
            })?,
            None => TransportKind::Bearer,
        };

        let token_secret = lookup("ACCESS_TOKEN").unwrap_or_else(|| {
            warn!("ACCESS_TOKEN not set, using development signing secret");
            DEVELOPMENT_SECRET.to_string()
        });

        let database_url = lookup("DATABASE_URL")
            .or_else(|| lookup("DB_URI"))
            .filter(|url| !url.trim().is_empty());

        let production = lookup("APP_ENV")
            .map(|env| env.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        Ok(Self {
            port,
            database_url,
            token_secret,
            token_expiration_hours,
            transport,
            production,
        })
    }
}

fn parse_or<T: FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        None => Ok(default),
    }
}
