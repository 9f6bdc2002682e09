use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Extension, Json,
};
use tracing::{info, instrument, warn};

use super::{
    models::{Role, UserModel},
    service::UserService,
    types::{AdminStatusResponse, UpsertUserRequest},
};
use crate::auth::TokenClaims;
use crate::database::{DeleteResult, UpdateResult};
use crate::shared::{AppError, AppState, EmailQuery};

/// GET /users
#[instrument(name = "list_users", skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserModel>>, AppError> {
    let users = UserService::new(state.user_repository.clone()).list().await?;
    info!(user_count = users.len(), "Users listed successfully");
    Ok(Json(users))
}

/// GET /userDetails?email=
#[instrument(name = "user_details", skip(state))]
pub async fn user_details(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<UserModel>>, AppError> {
    let users = UserService::new(state.user_repository.clone())
        .list_by_email(query.email.as_deref())
        .await?;
    Ok(Json(users))
}

/// GET /users/admin/:email
///
/// Callers may only ask about themselves.
#[instrument(name = "check_admin", skip(state, claims))]
pub async fn check_admin(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path(email): Path<String>,
) -> Result<Json<AdminStatusResponse>, AppError> {
    if email != claims.email {
        warn!(
            requested = %email,
            caller = %claims.email,
            "Admin check for another user's email"
        );
        return Err(AppError::Forbidden("forbidden access".to_string()));
    }

    let admin = UserService::new(state.user_repository.clone())
        .is_admin(&email)
        .await?;
    Ok(Json(AdminStatusResponse { admin }))
}

/// PATCH /users/admin/:id
#[instrument(name = "promote_user", skip(state))]
pub async fn promote_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UpdateResult>, AppError> {
    let result = UserService::new(state.user_repository.clone())
        .set_role(&id, Role::Admin)
        .await?;
    Ok(Json(result))
}

/// PATCH /users/user/:id
#[instrument(name = "demote_user", skip(state))]
pub async fn demote_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UpdateResult>, AppError> {
    let result = UserService::new(state.user_repository.clone())
        .set_role(&id, Role::User)
        .await?;
    Ok(Json(result))
}

/// DELETE /users/:id
#[instrument(name = "delete_user", skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, AppError> {
    let result = UserService::new(state.user_repository.clone())
        .delete(&id)
        .await?;
    info!(id = %id, deleted = result.deleted_count, "User delete finished");
    Ok(Json(result))
}

/// PUT /users/:email
///
/// Find-or-create keyed by email. The body is optional and only used for
/// new users, but a body that is sent must be valid JSON.
#[instrument(name = "upsert_user", skip(state, request))]
pub async fn upsert_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
    request: Result<Json<UpsertUserRequest>, JsonRejection>,
) -> Result<Json<UserModel>, AppError> {
    let request = match request {
        Ok(Json(request)) => request,
        // No JSON body sent at all
        Err(JsonRejection::MissingJsonContentType(_)) => UpsertUserRequest::default(),
        Err(rejection) => {
            warn!(email = %email, error = %rejection.body_text(), "Rejected user body");
            return Err(rejection.into());
        }
    };
    let user = UserService::new(state.user_repository.clone())
        .upsert_by_email(email, request)
        .await?;
    Ok(Json(user))
}
