// Library crate for the diagnostic booking server
// This file exposes the public API for integration tests

pub mod auth;
pub mod booking;
pub mod catalog;
pub mod config;
pub mod database;
pub mod routes;
pub mod shared;
pub mod user;

// Re-export commonly used types for easier access in tests
pub use auth::{Access, BearerTransport, CookieTransport, CredentialTransport, TokenConfig};
pub use config::{AppConfig, TransportKind};
pub use routes::create_router;
pub use shared::{AppError, AppState};
