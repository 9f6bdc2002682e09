use axum::{
    routing::{delete, get, patch, post, put, MethodRouter},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::{self, Access};
use crate::booking;
use crate::catalog;
use crate::config::TransportKind;
use crate::shared::AppState;
use crate::user;

pub const LIVENESS_MESSAGE: &str = "diagnostic server is running";

/// Builds the full HTTP surface.
///
/// Every route states its access level next to its handler; routes sharing
/// a path are merged so each method keeps its own guard.
pub fn create_router(state: AppState) -> Router {
    let guard = |access: Access, route: MethodRouter<AppState>| access.guard(route, &state);

    // Cookies only travel cross-origin when credentials are allowed,
    // which rules out the wildcard origin.
    let cors = match state.transport.kind() {
        TransportKind::Bearer => CorsLayer::permissive(),
        TransportKind::Cookie => CorsLayer::very_permissive(),
    };

    Router::new()
        .route("/", guard(Access::Open, get(liveness)))
        // Credentials
        .route("/jwt", guard(Access::Open, post(auth::issue_token)))
        .route("/logout", guard(Access::Open, get(auth::logout)))
        // Catalog
        .route(
            "/allTests",
            guard(Access::Open, get(catalog::list_tests))
                .merge(guard(Access::Admin, post(catalog::create_test))),
        )
        .route(
            "/allTests/:id",
            guard(Access::Open, patch(catalog::update_test))
                .merge(guard(Access::Admin, delete(catalog::delete_test))),
        )
        // Bookings
        .route(
            "/userTest",
            guard(Access::Open, post(booking::create_booking))
                .merge(guard(Access::Open, get(booking::list_bookings))),
        )
        .route(
            "/userTest/:id",
            guard(Access::Authenticated, delete(booking::delete_booking)),
        )
        .route(
            "/userSingleTest",
            guard(Access::Open, get(booking::list_all_bookings)),
        )
        // Users
        .route("/users", guard(Access::Admin, get(user::list_users)))
        .route("/userDetails", guard(Access::Open, get(user::user_details)))
        .route(
            "/users/admin/:key",
            // GET takes an email (self-only check), PATCH takes a user id
            guard(Access::Authenticated, get(user::check_admin))
                .merge(guard(Access::Admin, patch(user::promote_user))),
        )
        .route("/users/user/:id", guard(Access::Open, patch(user::demote_user)))
        .route(
            "/users/:key",
            // DELETE takes a user id, PUT takes an email
            guard(Access::Open, delete(user::delete_user))
                .merge(guard(Access::Open, put(user::upsert_user))),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone())
}

async fn liveness() -> &'static str {
    LIVENESS_MESSAGE
}
