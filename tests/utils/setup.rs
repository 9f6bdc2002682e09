use axum::Router;
use chrono::Duration;
use std::sync::Arc;

use diagnostic_booking::{
    booking::repository::InMemoryBookingRepository,
    catalog::repository::InMemoryTestRepository,
    create_router,
    user::{repository::InMemoryUserRepository, Role, UserModel},
    AppState, BearerTransport, CookieTransport, CredentialTransport, TokenConfig,
};

pub const TEST_SECRET: &str = "integration-secret";

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

/// A fully routed app over in-memory repositories.
/// The repositories stay reachable so tests can check what was (not) written.
pub struct TestApp {
    pub router: Router,
    pub token_config: TokenConfig,
    pub tests: Arc<InMemoryTestRepository>,
    pub bookings: Arc<InMemoryBookingRepository>,
    pub users: Arc<InMemoryUserRepository>,
    pub seeded_users: Vec<UserModel>,
}

impl TestApp {
    /// Id of a user seeded through the builder
    pub fn user_id(&self, email: &str) -> String {
        self.seeded_users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.id.to_string())
            .unwrap_or_else(|| panic!("{} was not seeded", email))
    }
}

pub struct TestAppBuilder {
    users: Vec<UserModel>,
    transport: Arc<dyn CredentialTransport>,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            users: vec![],
            transport: Arc::new(BearerTransport),
        }
    }

    pub fn with_admin(mut self, email: &str) -> Self {
        self.users
            .push(UserModel::new(email.to_string(), None, None, Role::Admin));
        self
    }

    pub fn with_member(mut self, email: &str) -> Self {
        self.users
            .push(UserModel::new(email.to_string(), None, None, Role::User));
        self
    }

    pub fn with_cookie_transport(mut self) -> Self {
        self.transport = Arc::new(CookieTransport::new(false));
        self
    }

    pub fn build(self) -> TestApp {
        let token_config = TokenConfig::new(TEST_SECRET, Duration::hours(3));
        let tests = Arc::new(InMemoryTestRepository::new());
        let bookings = Arc::new(InMemoryBookingRepository::new());
        let users = Arc::new(InMemoryUserRepository::with_users(self.users.clone()));

        let state = AppState::new(
            token_config.clone(),
            self.transport,
            tests.clone(),
            bookings.clone(),
            users.clone(),
        );

        TestApp {
            router: create_router(state),
            token_config,
            tests,
            bookings,
            users,
            seeded_users: self.users,
        }
    }
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}
