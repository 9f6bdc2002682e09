use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::auth::{CredentialTransport, TokenConfig};
use crate::booking::repository::BookingRepository;
use crate::catalog::repository::TestRepository;
use crate::user::repository::UserRepository;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub token_config: TokenConfig,
    pub transport: Arc<dyn CredentialTransport>,
    pub test_repository: Arc<dyn TestRepository + Send + Sync>,
    pub booking_repository: Arc<dyn BookingRepository + Send + Sync>,
    pub user_repository: Arc<dyn UserRepository + Send + Sync>,
}

impl AppState {
    pub fn new(
        token_config: TokenConfig,
        transport: Arc<dyn CredentialTransport>,
        test_repository: Arc<dyn TestRepository + Send + Sync>,
        booking_repository: Arc<dyn BookingRepository + Send + Sync>,
        user_repository: Arc<dyn UserRepository + Send + Sync>,
    ) -> Self {
        Self {
            token_config,
            transport,
            test_repository,
            booking_repository,
            user_repository,
        }
    }
}

/// `?email=` query used by the lookup routes
#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("JWT error: {0}")]
    JwtError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("Internal server error")]
    Internal,
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        AppError::DatabaseError(error.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::JwtError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Token error: {}", msg),
            ),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
            AppError::InvalidBody(rejection) => (rejection.status(), rejection.body_text()),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "message": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
pub mod test_utils {
    use super::*;
    use crate::auth::BearerTransport;
    use crate::booking::repository::InMemoryBookingRepository;
    use crate::catalog::repository::InMemoryTestRepository;
    use crate::user::repository::InMemoryUserRepository;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::Duration;

    pub const TEST_SECRET: &str = "test-secret";

    /// Builder for creating AppState with overrides for testing.
    /// Anything not overridden is a fresh in-memory repository.
    pub struct AppStateBuilder {
        transport: Option<Arc<dyn CredentialTransport>>,
        test_repository: Option<Arc<dyn TestRepository + Send + Sync>>,
        booking_repository: Option<Arc<dyn BookingRepository + Send + Sync>>,
        user_repository: Option<Arc<dyn UserRepository + Send + Sync>>,
    }

    impl AppStateBuilder {
        pub fn new() -> Self {
            Self {
                transport: None,
                test_repository: None,
                booking_repository: None,
                user_repository: None,
            }
        }

        pub fn with_transport(mut self, transport: Arc<dyn CredentialTransport>) -> Self {
            self.transport = Some(transport);
            self
        }

        pub fn with_test_repository(
            mut self,
            repo: Arc<dyn TestRepository + Send + Sync>,
        ) -> Self {
            self.test_repository = Some(repo);
            self
        }

        pub fn with_booking_repository(
            mut self,
            repo: Arc<dyn BookingRepository + Send + Sync>,
        ) -> Self {
            self.booking_repository = Some(repo);
            self
        }

        pub fn with_user_repository(
            mut self,
            repo: Arc<dyn UserRepository + Send + Sync>,
        ) -> Self {
            self.user_repository = Some(repo);
            self
        }

        pub fn build(self) -> AppState {
            AppState {
                token_config: TokenConfig::new(TEST_SECRET, Duration::hours(3)),
                transport: self.transport.unwrap_or_else(|| Arc::new(BearerTransport)),
                test_repository: self
                    .test_repository
                    .unwrap_or_else(|| Arc::new(InMemoryTestRepository::new())),
                booking_repository: self
                    .booking_repository
                    .unwrap_or_else(|| Arc::new(InMemoryBookingRepository::new())),
                user_repository: self
                    .user_repository
                    .unwrap_or_else(|| Arc::new(InMemoryUserRepository::new())),
            }
        }
    }

    impl Default for AppStateBuilder {
        fn default() -> Self {
            Self::new()
        }
    }

    /// Request carrying a bearer token signed with the test secret
    pub fn authorized_request(method: &str, uri: &str, email: &str, body: Body) -> Request<Body> {
        let token = TokenConfig::new(TEST_SECRET, Duration::hours(3))
            .create_token(email)
            .unwrap();

        Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", format!("Bearer {}", token))
            .header("content-type", "application/json")
            .body(body)
            .unwrap()
    }

    pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }
}
