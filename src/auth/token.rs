use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, instrument, warn};

use super::types::TokenClaims;
use crate::config::AppConfig;
use crate::shared::AppError;

/// Configuration for JWT token operations
#[derive(Clone)]
pub struct TokenConfig {
    secret: String,
    pub expiration: Duration,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>, expiration: Duration) -> Self {
        Self {
            secret: secret.into(),
            expiration,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        // Out-of-range lifetimes saturate; create_token then refuses to sign
        let expiration =
            Duration::try_hours(config.token_expiration_hours).unwrap_or(Duration::MAX);
        Self::new(config.token_secret.clone(), expiration)
    }

    /// Creates a signed token carrying the caller's email
    #[instrument(skip(self))]
    pub fn create_token(&self, email: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(self.expiration)
            .ok_or_else(|| {
                warn!(
                    expiration_secs = self.expiration.num_seconds(),
                    "Token expiry overflows the calendar"
                );
                AppError::JwtError("token expiration out of range".to_string())
            })?
            .timestamp()
            .max(0) as usize;

        debug!(
            expiration_secs = self.expiration.num_seconds(),
            exp_timestamp = exp,
            "Creating JWT token with expiration"
        );

        let claims = TokenClaims {
            email: email.to_string(),
            exp,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .map_err(|e| {
            debug!(error = %e, "Failed to encode JWT token");
            AppError::JwtError(e.to_string())
        })
    }

    /// Validates signature and expiry, returning the claims if valid
    #[instrument(skip(self, token))]
    pub fn validate_token(&self, token: &str) -> Result<TokenClaims, AppError> {
        debug!("Decoding and validating JWT token");

        decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &Validation::default(),
        )
        .map(|data| {
            debug!(
                email = %data.claims.email,
                exp = data.claims.exp,
                "JWT token decoded successfully"
            );
            data.claims
        })
        .map_err(|e| {
            debug!(error = %e, "Failed to decode JWT token");
            AppError::Unauthorized("unauthorized".to_string())
        })
    }
}
